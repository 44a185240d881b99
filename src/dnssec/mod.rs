pub mod algorithm;
pub mod digest;
pub mod key_tag;
pub mod trust_anchor;

pub use algorithm::DnsSecAlgorithm;
pub use digest::DigestType;
pub use key_tag::calculate_key_tag;
pub use trust_anchor::{
    AnswerItem, AnswerSet, DnskeyRecord, DsRecord, ResourceKey, TrustAnchorStore, TrustRecord,
};

/// DNSSEC constants
pub mod constants {
    /// Key tag of the root KSK published by IANA (KSK-2010)
    pub const ROOT_DS_KEY_TAG: u16 = 19036;

    /// SHA-256 digest of the root KSK-2010 DNSKEY, from
    /// https://data.iana.org/root-anchors/root-anchors.xml
    pub const ROOT_DS_DIGEST: [u8; 32] = [
        0x49, 0xAA, 0xC1, 0x1D, 0x7B, 0x6F, 0x64, 0x46, 0x70, 0x2E, 0x54, 0xA1, 0x60, 0x73,
        0x71, 0x60, 0x7A, 0x1A, 0x41, 0x85, 0x52, 0x00, 0xFD, 0x2C, 0xE1, 0xCD, 0xDE, 0x32,
        0xF2, 0x4E, 0x8F, 0xB5,
    ];

    /// The only DNSKEY protocol value defined (RFC 4034 2.1.2)
    pub const DNSKEY_PROTOCOL: u8 = 3;

    /// Zone Key flag (RFC 4034 2.1.1)
    pub const DNSKEY_FLAG_ZONE: u16 = 0x0100;

    /// Secure Entry Point flag, set on key signing keys
    pub const DNSKEY_FLAG_SEP: u16 = 0x0001;
}
