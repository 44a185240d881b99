use super::record::{DnskeyRecord, DsRecord, ResourceKey, TrustRecord};
use super::tokenizer::{WordError, Words};
use crate::dns::{DNSResourceClass, DNSResourceType, DomainName, NameError};
use crate::dnssec::constants::DNSKEY_PROTOCOL;
use crate::dnssec::{DigestType, DnsSecAlgorithm};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// The two classes of trust anchor files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// `*.positive`: DS and DNSKEY records
    Positive,
    /// `*.negative`: domains exempt from validation
    Negative,
}

impl AnchorKind {
    /// File name suffix, without the leading dot
    pub fn suffix(self) -> &'static str {
        match self {
            AnchorKind::Positive => "positive",
            AnchorKind::Negative => "negative",
        }
    }

    /// Parse one trimmed, non-comment line of a file of this kind
    pub fn parse_line(self, line: &str) -> ParseOutcome {
        match self {
            AnchorKind::Positive => parse_positive(line),
            AnchorKind::Negative => parse_negative(line),
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Result of parsing one anchor line
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Positive { key: ResourceKey, record: TrustRecord },
    Negative(DomainName),
    Rejected(RejectReason),
}

/// Why a line was skipped
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    Unparsable(WordError),
    InvalidDomain { name: String, error: NameError },
    MissingClassOrType,
    UnsupportedClass(String),
    UnsupportedType(String),
    MissingDsParameters,
    MissingDnskeyParameters,
    InvalidKeyTag(String),
    InvalidAlgorithm(String),
    InvalidDigestType(String),
    InvalidDigest(String),
    InvalidFlags(String),
    InvalidProtocol(String),
    InvalidKey(String),
    TrailingGarbage(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparsable(WordError::UnbalancedQuote) => {
                write!(f, "Unable to parse line: unbalanced quote")
            }
            Self::Unparsable(WordError::TrailingBackslash) => {
                write!(f, "Unable to parse line: trailing backslash")
            }
            Self::InvalidDomain { name, error } => {
                write!(f, "Domain name {} is invalid ({})", name, error)
            }
            Self::MissingClassOrType => write!(f, "Missing class or type"),
            Self::UnsupportedClass(class) => write!(f, "RR class {} is not supported", class),
            Self::UnsupportedType(rtype) => write!(f, "RR type {} is not supported", rtype),
            Self::MissingDsParameters => write!(f, "Missing DS parameters"),
            Self::MissingDnskeyParameters => write!(f, "Missing DNSKEY parameters"),
            Self::InvalidKeyTag(tag) => write!(f, "Failed to parse DS key tag {}", tag),
            Self::InvalidAlgorithm(alg) => write!(f, "Failed to parse algorithm {}", alg),
            Self::InvalidDigestType(dt) => write!(f, "Failed to parse DS digest type {}", dt),
            Self::InvalidDigest(digest) => write!(f, "Failed to parse DS digest {}", digest),
            Self::InvalidFlags(flags) => write!(f, "Failed to parse DNSKEY flags field {}", flags),
            Self::InvalidProtocol(p) => write!(f, "DNSKEY protocol is not 3 (got {})", p),
            Self::InvalidKey(key) => write!(f, "Failed to parse DNSKEY key data {}", key),
            Self::TrailingGarbage(rest) => write!(f, "Trailing garbage: {}", rest),
        }
    }
}

impl From<WordError> for RejectReason {
    fn from(err: WordError) -> Self {
        RejectReason::Unparsable(err)
    }
}

impl From<RejectReason> for ParseOutcome {
    fn from(reason: RejectReason) -> Self {
        ParseOutcome::Rejected(reason)
    }
}

/// Parse `<domain> IN DS <key-tag> <algorithm> <digest-type> <hex>` or
/// `<domain> IN DNSKEY <flags> 3 <algorithm> <base64>`
pub fn parse_positive(line: &str) -> ParseOutcome {
    match positive_record(line) {
        Ok((key, record)) => ParseOutcome::Positive { key, record },
        Err(reason) => reason.into(),
    }
}

/// Parse a single domain name
pub fn parse_negative(line: &str) -> ParseOutcome {
    let mut words = Words::new(line);

    let name = match domain(&mut words) {
        Ok(name) => name,
        Err(reason) => return reason.into(),
    };

    match trailing(&words) {
        Ok(()) => ParseOutcome::Negative(name),
        Err(reason) => reason.into(),
    }
}

fn positive_record(line: &str) -> Result<(ResourceKey, TrustRecord), RejectReason> {
    let mut words = Words::new(line);
    let name = domain(&mut words)?;

    let (n, [class, rtype]) = words.next_words::<2>()?;
    if n != 2 {
        return Err(RejectReason::MissingClassOrType);
    }

    if class.parse::<DNSResourceClass>() != Ok(DNSResourceClass::IN) {
        return Err(RejectReason::UnsupportedClass(class));
    }

    let record = match rtype.parse::<DNSResourceType>() {
        Ok(DNSResourceType::DS) => ds_fields(&mut words)?,
        Ok(DNSResourceType::DNSKEY) => dnskey_fields(&mut words)?,
        _ => return Err(RejectReason::UnsupportedType(rtype)),
    };

    trailing(&words)?;

    Ok((ResourceKey::internet(record.rtype(), name), record))
}

fn domain(words: &mut Words<'_>) -> Result<DomainName, RejectReason> {
    let name = words.next_escaped_word()?.unwrap_or_default();
    DomainName::parse(&name).map_err(|error| RejectReason::InvalidDomain { name, error })
}

fn ds_fields(words: &mut Words<'_>) -> Result<TrustRecord, RejectReason> {
    let (n, [key_tag, algorithm, digest_type, digest]) = words.next_words::<4>()?;
    if n != 4 {
        return Err(RejectReason::MissingDsParameters);
    }

    let key_tag = key_tag
        .parse::<u16>()
        .map_err(|_| RejectReason::InvalidKeyTag(key_tag.clone()))?;
    let algorithm = DnsSecAlgorithm::from_mnemonic(&algorithm)
        .ok_or(RejectReason::InvalidAlgorithm(algorithm))?;
    let digest_type =
        DigestType::from_mnemonic(&digest_type).ok_or(RejectReason::InvalidDigestType(digest_type))?;
    let digest = hex::decode(&digest).map_err(|_| RejectReason::InvalidDigest(digest.clone()))?;

    Ok(TrustRecord::Ds(DsRecord {
        key_tag,
        algorithm,
        digest_type,
        digest,
    }))
}

fn dnskey_fields(words: &mut Words<'_>) -> Result<TrustRecord, RejectReason> {
    let (n, [flags, protocol, algorithm, key]) = words.next_words::<4>()?;
    if n != 4 {
        return Err(RejectReason::MissingDnskeyParameters);
    }

    if protocol != DNSKEY_PROTOCOL.to_string() {
        return Err(RejectReason::InvalidProtocol(protocol));
    }

    let flags = flags
        .parse::<u16>()
        .map_err(|_| RejectReason::InvalidFlags(flags.clone()))?;
    let algorithm = DnsSecAlgorithm::from_mnemonic(&algorithm)
        .ok_or(RejectReason::InvalidAlgorithm(algorithm))?;
    let key = STANDARD
        .decode(&key)
        .map_err(|_| RejectReason::InvalidKey(key.clone()))?;

    Ok(TrustRecord::Dnskey(DnskeyRecord::new(flags, algorithm, key)))
}

fn trailing(words: &Words<'_>) -> Result<(), RejectReason> {
    if words.is_exhausted() {
        Ok(())
    } else {
        Err(RejectReason::TrailingGarbage(words.remainder().to_string()))
    }
}
