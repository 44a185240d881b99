use crate::dns::{DNSResourceClass, DNSResourceType, DomainName};
use crate::dnssec::constants::{DNSKEY_FLAG_SEP, DNSKEY_PROTOCOL};
use crate::dnssec::{DigestType, DnsSecAlgorithm, calculate_key_tag};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Identity of an answer set: class, type and owner name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceKey {
    pub class: DNSResourceClass,
    pub rtype: DNSResourceType,
    pub name: DomainName,
}

impl ResourceKey {
    pub fn new(class: DNSResourceClass, rtype: DNSResourceType, name: DomainName) -> Self {
        Self { class, rtype, name }
    }

    /// Key in the Internet class
    pub fn internet(rtype: DNSResourceType, name: DomainName) -> Self {
        Self::new(DNSResourceClass::IN, rtype, name)
    }

    pub fn ds(name: DomainName) -> Self {
        Self::internet(DNSResourceType::DS, name)
    }

    pub fn dnskey(name: DomainName) -> Self {
        Self::internet(DNSResourceType::DNSKEY, name)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name.to_fqdn(), self.class, self.rtype)
    }
}

/// Delegation signer record data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: DnsSecAlgorithm,
    pub digest_type: DigestType,
    #[serde(serialize_with = "serialize_hex")]
    pub digest: Vec<u8>,
}

impl fmt::Display for DsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm.to_u8(),
            self.digest_type.to_u8(),
            hex::encode_upper(&self.digest)
        )
    }
}

/// Public key record data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DnskeyRecord {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: DnsSecAlgorithm,
    #[serde(serialize_with = "serialize_base64")]
    pub key: Vec<u8>,
}

impl DnskeyRecord {
    pub fn new(flags: u16, algorithm: DnsSecAlgorithm, key: Vec<u8>) -> Self {
        Self {
            flags,
            protocol: DNSKEY_PROTOCOL,
            algorithm,
            key,
        }
    }

    pub fn key_tag(&self) -> u16 {
        calculate_key_tag(self.flags, self.protocol, self.algorithm.to_u8(), &self.key)
    }

    /// Check if this is a Key Signing Key (KSK)
    pub fn is_ksk(&self) -> bool {
        self.flags & DNSKEY_FLAG_SEP != 0
    }
}

impl fmt::Display for DnskeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ; {} ; alg = {} ; key_tag = {}",
            self.flags,
            self.protocol,
            self.algorithm.to_u8(),
            STANDARD.encode(&self.key),
            if self.is_ksk() { "KSK" } else { "ZSK" },
            self.algorithm,
            self.key_tag()
        )
    }
}

/// Record data of a trust anchor; only DS and DNSKEY exist
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TrustRecord {
    Ds(DsRecord),
    Dnskey(DnskeyRecord),
}

impl TrustRecord {
    pub fn rtype(&self) -> DNSResourceType {
        match self {
            TrustRecord::Ds(_) => DNSResourceType::DS,
            TrustRecord::Dnskey(_) => DNSResourceType::DNSKEY,
        }
    }

    pub fn as_ds(&self) -> Option<&DsRecord> {
        match self {
            TrustRecord::Ds(ds) => Some(ds),
            TrustRecord::Dnskey(_) => None,
        }
    }

    pub fn as_dnskey(&self) -> Option<&DnskeyRecord> {
        match self {
            TrustRecord::Dnskey(dnskey) => Some(dnskey),
            TrustRecord::Ds(_) => None,
        }
    }
}

impl fmt::Display for TrustRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustRecord::Ds(ds) => ds.fmt(f),
            TrustRecord::Dnskey(dnskey) => dnskey.fmt(f),
        }
    }
}

impl From<DsRecord> for TrustRecord {
    fn from(ds: DsRecord) -> Self {
        TrustRecord::Ds(ds)
    }
}

impl From<DnskeyRecord> for TrustRecord {
    fn from(dnskey: DnskeyRecord) -> Self {
        TrustRecord::Dnskey(dnskey)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerItem {
    pub record: TrustRecord,
    /// Trust anchors are authenticated by definition
    pub authenticated: bool,
}

/// Duplicate-free, insertion-ordered records for one [`ResourceKey`].
///
/// Sets are never modified once shared: merging a record yields a new set,
/// so a set handed out by a lookup stays valid after later loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    key: ResourceKey,
    items: SmallVec<[AnswerItem; 2]>,
}

impl AnswerSet {
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            items: SmallVec::new(),
        }
    }

    /// Build a set holding one authenticated record, reporting allocation failure
    pub fn single(
        key: ResourceKey,
        record: TrustRecord,
    ) -> Result<Self, smallvec::CollectionAllocErr> {
        let mut items = SmallVec::new();
        items.try_reserve(1)?;
        items.push(AnswerItem {
            record,
            authenticated: true,
        });
        Ok(Self { key, items })
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnswerItem> {
        self.items.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &TrustRecord> {
        self.items.iter().map(|item| &item.record)
    }

    /// Structural membership: every field of the record must match
    pub fn contains(&self, record: &TrustRecord) -> bool {
        self.items.iter().any(|item| &item.record == record)
    }

    /// Union of this set and `record`, or `None` when the record is already present
    pub fn with_record(&self, record: TrustRecord) -> Option<Self> {
        if self.contains(&record) {
            return None;
        }

        let mut items = self.items.clone();
        items.push(AnswerItem {
            record,
            authenticated: true,
        });

        Some(Self {
            key: self.key.clone(),
            items,
        })
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode_upper(bytes))
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}
