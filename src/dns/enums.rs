use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DNSResourceType {
    #[default]
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    SRV,
    SSHFP,
    TLSA,
    HTTPS,
    CAA,
    DS,
    DNSKEY,
    NSEC,
    NSEC3,
    RRSIG,
}

impl DNSResourceType {
    /// Whether records of this type can act as a DNSSEC trust anchor
    pub fn is_trust_anchor_type(self) -> bool {
        matches!(self, DNSResourceType::DS | DNSResourceType::DNSKEY)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DNSResourceType::A => "A",
            DNSResourceType::NS => "NS",
            DNSResourceType::CNAME => "CNAME",
            DNSResourceType::SOA => "SOA",
            DNSResourceType::PTR => "PTR",
            DNSResourceType::MX => "MX",
            DNSResourceType::TXT => "TXT",
            DNSResourceType::AAAA => "AAAA",
            DNSResourceType::SRV => "SRV",
            DNSResourceType::SSHFP => "SSHFP",
            DNSResourceType::TLSA => "TLSA",
            DNSResourceType::HTTPS => "HTTPS",
            DNSResourceType::CAA => "CAA",
            DNSResourceType::DS => "DS",
            DNSResourceType::DNSKEY => "DNSKEY",
            DNSResourceType::NSEC => "NSEC",
            DNSResourceType::NSEC3 => "NSEC3",
            DNSResourceType::RRSIG => "RRSIG",
        }
    }
}

impl FromStr for DNSResourceType {
    type Err = String;

    /// Parse a type mnemonic, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rtype = match s.to_ascii_uppercase().as_str() {
            "A" => DNSResourceType::A,
            "NS" => DNSResourceType::NS,
            "CNAME" => DNSResourceType::CNAME,
            "SOA" => DNSResourceType::SOA,
            "PTR" => DNSResourceType::PTR,
            "MX" => DNSResourceType::MX,
            "TXT" => DNSResourceType::TXT,
            "AAAA" => DNSResourceType::AAAA,
            "SRV" => DNSResourceType::SRV,
            "SSHFP" => DNSResourceType::SSHFP,
            "TLSA" => DNSResourceType::TLSA,
            "HTTPS" => DNSResourceType::HTTPS,
            "CAA" => DNSResourceType::CAA,
            "DS" => DNSResourceType::DS,
            "DNSKEY" => DNSResourceType::DNSKEY,
            "NSEC" => DNSResourceType::NSEC,
            "NSEC3" => DNSResourceType::NSEC3,
            "RRSIG" => DNSResourceType::RRSIG,
            _ => return Err(s.to_string()),
        };
        Ok(rtype)
    }
}

impl fmt::Display for DNSResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DNSResourceClass {
    #[default]
    IN,
    CS,
    CH,
    HS,
}

impl FromStr for DNSResourceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(DNSResourceClass::IN),
            "CS" => Ok(DNSResourceClass::CS),
            "CH" => Ok(DNSResourceClass::CH),
            "HS" => Ok(DNSResourceClass::HS),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for DNSResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DNSResourceClass::IN => "IN",
            DNSResourceClass::CS => "CS",
            DNSResourceClass::CH => "CH",
            DNSResourceClass::HS => "HS",
        };
        f.write_str(s)
    }
}
