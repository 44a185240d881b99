use super::record::{AnswerSet, DsRecord, ResourceKey, TrustRecord};
use super::store::AnswerStore;
use crate::dns::DomainName;
use crate::dnssec::constants::{ROOT_DS_DIGEST, ROOT_DS_KEY_TAG};
use crate::dnssec::{DigestType, DnsSecAlgorithm};
use crate::error::{AnchorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
    Installed,
    /// A DS set for the root already exists, e.g. from an operator file
    AlreadyPresent,
}

/// The root zone DS record compiled into the resolver
pub fn root_ds() -> Result<DsRecord> {
    let mut digest = Vec::new();
    digest.try_reserve_exact(ROOT_DS_DIGEST.len())?;
    digest.extend_from_slice(&ROOT_DS_DIGEST);

    Ok(DsRecord {
        key_tag: ROOT_DS_KEY_TAG,
        algorithm: DnsSecAlgorithm::RsaSha256,
        digest_type: DigestType::Sha256,
        digest,
    })
}

/// Make sure the store holds a DS set for the root zone.
///
/// Any existing set is left untouched. Allocation failure is reported as
/// [`AnchorError::ResourceExhausted`].
pub fn install_root_anchor(store: &mut AnswerStore) -> Result<BuiltinOutcome> {
    let key = ResourceKey::ds(DomainName::root());
    if store.contains_key(&key) {
        return Ok(BuiltinOutcome::AlreadyPresent);
    }

    let set = AnswerSet::single(key, TrustRecord::Ds(root_ds()?))
        .map_err(|e| AnchorError::ResourceExhausted(format!("{:?}", e)))?;
    store.insert_set(set)?;

    Ok(BuiltinOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installs_into_empty_store() {
        let mut store = AnswerStore::new();
        assert_eq!(
            install_root_anchor(&mut store).unwrap(),
            BuiltinOutcome::Installed
        );

        let set = store.get(&ResourceKey::ds(DomainName::root())).unwrap();
        assert_eq!(set.len(), 1);
        let ds = set.records().next().and_then(TrustRecord::as_ds).unwrap();
        assert_eq!(ds, &root_ds().unwrap());
        assert_eq!(ds.key_tag, 19036);
        assert_eq!(ds.digest.len(), 32);
        assert!(set.iter().all(|item| item.authenticated));
    }

    #[test]
    fn test_is_idempotent() {
        let mut store = AnswerStore::new();
        install_root_anchor(&mut store).unwrap();
        assert_eq!(
            install_root_anchor(&mut store).unwrap(),
            BuiltinOutcome::AlreadyPresent
        );
        assert_eq!(
            store
                .get(&ResourceKey::ds(DomainName::root()))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_respects_operator_root_ds() {
        let mut store = AnswerStore::new();
        let operator = TrustRecord::Ds(DsRecord {
            key_tag: 20326,
            algorithm: DnsSecAlgorithm::RsaSha256,
            digest_type: DigestType::Sha256,
            digest: vec![0xE0; 32],
        });
        store.merge(ResourceKey::ds(DomainName::root()), operator.clone());

        assert_eq!(
            install_root_anchor(&mut store).unwrap(),
            BuiltinOutcome::AlreadyPresent
        );
        let set = store.get(&ResourceKey::ds(DomainName::root())).unwrap();
        assert_eq!(set.records().collect::<Vec<_>>(), vec![&operator]);
    }

    #[test]
    fn test_root_dnskey_does_not_count_as_root_ds() {
        let mut store = AnswerStore::new();
        store.merge(
            ResourceKey::dnskey(DomainName::root()),
            TrustRecord::Dnskey(crate::dnssec::DnskeyRecord::new(
                257,
                DnsSecAlgorithm::RsaSha256,
                vec![3, 1, 0, 1],
            )),
        );

        assert_eq!(
            install_root_anchor(&mut store).unwrap(),
            BuiltinOutcome::Installed
        );
        assert_eq!(store.positive_len(), 2);
    }
}
