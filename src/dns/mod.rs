pub mod enums;
pub mod name;

pub use enums::{DNSResourceClass, DNSResourceType};
pub use name::{DomainName, NameError};
