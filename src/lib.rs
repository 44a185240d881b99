pub mod config;
pub mod dns;
pub mod dnssec;
pub mod error;

pub use config::AnchorConfig;
pub use dnssec::TrustAnchorStore;
pub use error::{AnchorError, Result};
