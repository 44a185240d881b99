//! DNSSEC trust anchor store.
//!
//! Holds the DS/DNSKEY records accepted as a-priori trusted, and the
//! negative anchors (domains exempt from validation). Anchors come from
//! `*.positive` and `*.negative` files found in layered configuration
//! directories, plus the compiled-in root zone DS.
//!
//! Loading takes the store's write lock for its whole duration, lookups take
//! the read lock and never perform I/O.

pub mod builtin;
pub mod parser;
pub mod record;
pub mod sources;
pub mod store;
pub mod tokenizer;

pub use builtin::BuiltinOutcome;
pub use parser::{AnchorKind, ParseOutcome, RejectReason};
pub use record::{AnswerItem, AnswerSet, DnskeyRecord, DsRecord, ResourceKey, TrustRecord};
pub use sources::{LoadStats, Override, OverrideKind, SourceFile, SourceLoader, SourceSet};
pub use store::{AnswerStore, MergeOutcome};

use crate::config::AnchorConfig;
use crate::dns::{DNSResourceClass, DomainName};
use crate::error::Result;
use parking_lot::RwLock;
use serde_json::json;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Trust anchor store consulted by the validator.
///
/// Cloning yields another handle to the same anchors.
#[derive(Clone)]
pub struct TrustAnchorStore {
    config: Arc<AnchorConfig>,
    loader: SourceLoader,
    anchors: Arc<RwLock<AnswerStore>>,
}

impl TrustAnchorStore {
    /// Create an empty store; call [`load`](Self::load) before serving lookups
    pub fn new(config: AnchorConfig) -> Self {
        let loader = SourceLoader::new(config.search_dirs.clone());
        Self {
            config: Arc::new(config),
            loader,
            anchors: Arc::new(RwLock::new(AnswerStore::new())),
        }
    }

    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Read positive then negative anchor files, then add the builtin root DS.
    ///
    /// Unreadable files and malformed lines are logged and skipped. Only a
    /// failure to install the builtin anchor is returned as an error, in which
    /// case the store must not be used for validation.
    pub fn load(&self) -> Result<()> {
        {
            let mut anchors = self.anchors.write();
            self.load_into(&mut anchors)?;
        }

        if self.config.dump_on_load {
            self.dump();
        }

        Ok(())
    }

    /// Drop every positive and negative anchor
    pub fn flush(&self) {
        self.anchors.write().clear();
        debug!("Flushed trust anchors");
    }

    /// Flush and load again without letting lookups observe the empty store
    pub fn reload(&self) -> Result<()> {
        info!("Reloading trust anchors");
        {
            let mut anchors = self.anchors.write();
            anchors.clear();
            self.load_into(&mut anchors)?;
        }

        if self.config.dump_on_load {
            self.dump();
        }

        Ok(())
    }

    fn load_into(&self, anchors: &mut AnswerStore) -> Result<()> {
        for kind in [AnchorKind::Positive, AnchorKind::Negative] {
            let result = self.loader.load(kind, |path, line_number, line| {
                apply_line(anchors, kind, path, line_number, line)
            });

            match result {
                Ok(stats) => info!(
                    "Loaded {} {} trust anchor lines from {} files ({} rejected)",
                    stats.accepted, kind, stats.files, stats.rejected
                ),
                Err(e) => error!("{}", e),
            }
        }

        match builtin::install_root_anchor(anchors) {
            Ok(BuiltinOutcome::Installed) => debug!("Installed built-in root trust anchor"),
            Ok(BuiltinOutcome::AlreadyPresent) => {
                debug!("Root DS configured explicitly, not adding built-in trust anchor")
            }
            Err(e) => {
                error!("Failed to add built-in trust anchor: {}", e);
                return Err(e);
            }
        }

        Ok(())
    }

    /// The answer set for a DS or DNSKEY key. Other types are never served.
    pub fn lookup_positive(&self, key: &ResourceKey) -> Option<Arc<AnswerSet>> {
        if key.class != DNSResourceClass::IN || !key.rtype.is_trust_anchor_type() {
            return None;
        }

        self.anchors.read().get(key)
    }

    /// Whether `name` is a negative anchor. Exact match only: parents and
    /// wildcards are not consulted.
    pub fn lookup_negative(&self, name: &str) -> bool {
        match DomainName::parse(name) {
            Ok(name) => self.is_negative(&name),
            Err(_) => false,
        }
    }

    pub fn is_negative(&self, name: &DomainName) -> bool {
        self.anchors.read().contains_negative(name)
    }

    pub fn positive_count(&self) -> usize {
        self.anchors.read().positive_len()
    }

    pub fn negative_count(&self) -> usize {
        self.anchors.read().negative_len()
    }

    pub fn is_empty(&self) -> bool {
        let anchors = self.anchors.read();
        anchors.positive_len() == 0 && anchors.negative_len() == 0
    }

    /// The layered-source view of one anchor file class
    pub fn sources(&self, kind: AnchorKind) -> Result<SourceSet> {
        self.loader.enumerate(kind)
    }

    /// Human readable rendering of every anchor, one line per record or name
    pub fn render(&self) -> Vec<String> {
        let anchors = self.anchors.read();
        let mut lines = vec!["Positive Trust Anchors:".to_string()];

        for set in anchors.sorted_sets() {
            for record in set.records() {
                lines.push(format!("{} {}", set.key(), record));
            }
        }

        let negative = anchors.sorted_negative();
        if !negative.is_empty() {
            lines.push("Negative trust anchors:".to_string());
            lines.extend(negative.iter().map(DomainName::to_fqdn));
        }

        lines
    }

    /// Log every anchor at info level
    pub fn dump(&self) {
        for line in self.render() {
            info!("{}", line);
        }
    }

    pub fn dump_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for line in self.render() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    pub fn dump_json(&self) -> serde_json::Value {
        let anchors = self.anchors.read();
        let sets = anchors.sorted_sets();
        let positive: Vec<&AnswerSet> = sets.iter().map(Arc::as_ref).collect();
        json!({
            "positive": positive,
            "negative": anchors.sorted_negative(),
        })
    }
}

impl std::fmt::Debug for TrustAnchorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustAnchorStore")
            .field("search_dirs", &self.loader.dirs())
            .field("positive", &self.positive_count())
            .field("negative", &self.negative_count())
            .finish()
    }
}

/// Parse one line and merge the result, returning whether it was accepted
fn apply_line(
    anchors: &mut AnswerStore,
    kind: AnchorKind,
    path: &Path,
    line_number: usize,
    line: &str,
) -> bool {
    match kind.parse_line(line) {
        ParseOutcome::Positive { key, record } => {
            check_advisories(path, line_number, &record);
            if anchors.merge(key, record) == MergeOutcome::Duplicate {
                debug!(
                    "Duplicate trust anchor at {}:{}, ignoring",
                    path.display(),
                    line_number
                );
            }
            true
        }
        ParseOutcome::Negative(name) => {
            if !anchors.insert_negative(name) {
                debug!(
                    "Duplicate negative trust anchor at {}:{}, ignoring",
                    path.display(),
                    line_number
                );
            }
            true
        }
        ParseOutcome::Rejected(reason) => {
            warn!(
                "{} at line {}:{}, ignoring line.",
                reason,
                path.display(),
                line_number
            );
            false
        }
    }
}

/// Warn about anchors that parse but cannot serve as a validation root
fn check_advisories(path: &Path, line_number: usize, record: &TrustRecord) {
    let algorithm = match record {
        TrustRecord::Ds(ds) => {
            if ds.digest_type.is_supported() && ds.digest.len() != ds.digest_type.digest_len() {
                warn!(
                    "DS digest at {}:{} is {} bytes, {} expects {}",
                    path.display(),
                    line_number,
                    ds.digest.len(),
                    ds.digest_type,
                    ds.digest_type.digest_len()
                );
            }
            ds.algorithm
        }
        TrustRecord::Dnskey(dnskey) => dnskey.algorithm,
    };

    if !algorithm.is_supported() {
        warn!(
            "Trust anchor at {}:{} uses algorithm {} which cannot be validated",
            path.display(),
            line_number,
            algorithm
        );
    } else if !algorithm.is_recommended() {
        debug!(
            "Trust anchor at {}:{} uses algorithm {}, not recommended by RFC 8624",
            path.display(),
            line_number,
            algorithm
        );
    }
}
