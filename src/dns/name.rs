use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum wire length of a name, including the root label
pub const MAX_NAME_WIRE_LEN: usize = 255;
pub const MAX_LABEL_LEN: usize = 63;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("empty domain name")]
    Empty,
    #[error("empty label")]
    EmptyLabel,
    #[error("label too long: {0} bytes")]
    LabelTooLong(usize),
    #[error("domain name too long: {0} bytes")]
    NameTooLong(usize),
    #[error("invalid character {0:?} in label")]
    InvalidCharacter(char),
    #[error("invalid escape sequence")]
    InvalidEscape,
}

/// A validated DNS name in normalized presentation form (RFC 1035 5.1).
///
/// Labels may hold any byte. Printable ASCII appears as is, `\.` and
/// `\DDD` escapes carry everything else. Normalization lowercases ASCII
/// letters, rewrites escapes in one canonical spelling and drops the trailing
/// dot, so `Example.COM.` and `example.com` compare equal, as do `a\.b` and
/// `a\046b`. The root is `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    pub fn root() -> Self {
        Self(".".to_string())
    }

    pub fn parse(s: &str) -> Result<Self, NameError> {
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        if s == "." {
            return Ok(Self::root());
        }

        let labels = split_labels(s)?;

        let mut wire_len = 1;
        for label in &labels {
            if label.len() > MAX_LABEL_LEN {
                return Err(NameError::LabelTooLong(label.len()));
            }
            wire_len += label.len() + 1;
        }
        if wire_len > MAX_NAME_WIRE_LEN {
            return Err(NameError::NameTooLong(wire_len));
        }

        let mut normalized = String::with_capacity(s.len());
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                normalized.push('.');
            }
            escape_label(label, &mut normalized);
        }

        Ok(Self(normalized))
    }

    pub fn is_root(&self) -> bool {
        self.0 == "."
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified form with a trailing dot, as used in dumps
    pub fn to_fqdn(&self) -> String {
        if self.is_root() {
            self.0.clone()
        } else {
            format!("{}.", self.0)
        }
    }
}

/// Decode a presentation name into raw, lowercased labels.
/// A single unescaped trailing dot is accepted.
fn split_labels(s: &str) -> Result<Vec<Vec<u8>>, NameError> {
    let mut labels = Vec::new();
    let mut label = Vec::new();
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if label.is_empty() {
                    return Err(NameError::EmptyLabel);
                }
                labels.push(std::mem::take(&mut label));
            }
            '\\' => label.push(unescape(&mut chars)?),
            c if c.is_ascii_graphic() => label.push(c as u8),
            c => return Err(NameError::InvalidCharacter(c)),
        }
    }

    if !label.is_empty() {
        labels.push(label);
    }

    for label in &mut labels {
        label.make_ascii_lowercase();
    }

    Ok(labels)
}

/// Decode the character(s) following a backslash: `\DDD` or `\X`
fn unescape<I: Iterator<Item = char>>(chars: &mut I) -> Result<u8, NameError> {
    let first = chars.next().ok_or(NameError::InvalidEscape)?;

    let Some(d1) = first.to_digit(10) else {
        return if first.is_ascii() && !first.is_ascii_control() {
            Ok(first as u8)
        } else {
            Err(NameError::InvalidCharacter(first))
        };
    };

    let mut value = d1;
    for _ in 0..2 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or(NameError::InvalidEscape)?;
        value = value * 10 + digit;
    }

    u8::try_from(value).map_err(|_| NameError::InvalidEscape)
}

fn escape_label(label: &[u8], out: &mut String) {
    for &b in label {
        match b {
            b'.' | b'\\' | b'"' | b'(' | b')' | b';' | b'@' | b'$' => {
                out.push('\\');
                out.push(b as char);
            }
            0x21..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\{:03}", b)),
        }
    }
}

impl FromStr for DomainName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let name = DomainName::parse("Example.COM.").unwrap();
        assert_eq!(name.as_str(), "example.com");
        assert_eq!(name, DomainName::parse("example.com").unwrap());
        assert_eq!(name.to_fqdn(), "example.com.");
    }

    #[test]
    fn test_root() {
        let root = DomainName::parse(".").unwrap();
        assert!(root.is_root());
        assert_eq!(root, DomainName::root());
        assert_eq!(root.to_fqdn(), ".");
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(DomainName::parse(""), Err(NameError::Empty));
        assert_eq!(DomainName::parse("a..b"), Err(NameError::EmptyLabel));
        assert_eq!(DomainName::parse(".com"), Err(NameError::EmptyLabel));
        assert_eq!(
            DomainName::parse("exa mple.com"),
            Err(NameError::InvalidCharacter(' '))
        );
        assert_eq!(
            DomainName::parse("caf\u{e9}.example"),
            Err(NameError::InvalidCharacter('\u{e9}'))
        );
        assert_eq!(DomainName::parse("a\\"), Err(NameError::InvalidEscape));
        assert_eq!(DomainName::parse("a\\25"), Err(NameError::InvalidEscape));
        assert_eq!(DomainName::parse("a\\256"), Err(NameError::InvalidEscape));
        assert_eq!(
            DomainName::parse(&format!("{}.com", "a".repeat(64))),
            Err(NameError::LabelTooLong(64))
        );
    }

    #[test]
    fn test_name_length_limit() {
        // 4 labels of 63 bytes: 4 * 64 + 1 = 257 bytes on the wire
        let label = "a".repeat(63);
        let long = [label.as_str(); 4].join(".");
        assert!(matches!(
            DomainName::parse(&long),
            Err(NameError::NameTooLong(257))
        ));

        // 3 labels of 63 plus one of 61: exactly 255
        let fits = format!("{}.{}", [label.as_str(); 3].join("."), "b".repeat(61));
        assert!(DomainName::parse(&fits).is_ok());
    }

    #[test]
    fn test_service_and_wildcard_labels() {
        assert!(DomainName::parse("_dns._udp.example.com").is_ok());
        assert!(DomainName::parse("*.example.com").is_ok());
        assert!(DomainName::parse("xn--bcher-kva.example").is_ok());
        assert!(DomainName::parse("www.*.example.com").is_ok());
    }

    #[test]
    fn test_presentation_format_names() {
        let classless = DomainName::parse("0/25.2.0.192.IN-ADDR.ARPA").unwrap();
        assert_eq!(classless.as_str(), "0/25.2.0.192.in-addr.arpa");

        assert_eq!(DomainName::parse("-x.example").unwrap().as_str(), "-x.example");
        assert!(DomainName::parse("x-.example").is_ok());
    }

    #[test]
    fn test_escaped_labels() {
        let dotted = DomainName::parse("a\\.b.example").unwrap();
        assert_eq!(dotted.as_str(), "a\\.b.example");
        assert_eq!(dotted, DomainName::parse("A\\046B.example.").unwrap());
        assert_eq!(dotted.to_fqdn(), "a\\.b.example.");

        // an escaped dot at the end is part of the label, not a terminator
        assert_eq!(DomainName::parse("example\\.").unwrap().as_str(), "example\\.");

        let spaced = DomainName::parse("two\\ words.example").unwrap();
        assert_eq!(spaced.as_str(), "two\\032words.example");
        assert_eq!(DomainName::parse("\\097bc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_escaped_bytes_count_once_towards_label_length() {
        let label = "\\000".repeat(63);
        assert!(DomainName::parse(&format!("{}.example", label)).is_ok());
        assert_eq!(
            DomainName::parse(&format!("{}\\000.example", label)),
            Err(NameError::LabelTooLong(64))
        );
    }
}
