use clap::{Parser, Subcommand, ValueEnum};
use heimdall_anchors::dns::DomainName;
use heimdall_anchors::dnssec::ResourceKey;
use heimdall_anchors::dnssec::trust_anchor::{AnchorKind, OverrideKind};
use heimdall_anchors::{AnchorConfig, TrustAnchorStore};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Inspect the DNSSEC trust anchors a Heimdall resolver would load
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trust anchor directory, highest precedence first (repeatable).
    /// Replaces the configured directory list.
    #[arg(short, long = "dir")]
    dirs: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and print every trust anchor
    Dump {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the trust anchors for a domain
    Lookup {
        domain: String,
        #[arg(short = 't', long = "type", value_enum, default_value = "ds")]
        rtype: AnchorType,
    },
    /// Report whether a domain is a negative trust anchor
    Negative { domain: String },
    /// Show which anchor files are in effect, overridden or masked
    Sources {
        #[arg(short, long, value_enum)]
        suffix: Option<Suffix>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnchorType {
    Ds,
    Dnskey,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Suffix {
    Positive,
    Negative,
}

impl From<Suffix> for AnchorKind {
    fn from(suffix: Suffix) -> Self {
        match suffix {
            Suffix::Positive => AnchorKind::Positive,
            Suffix::Negative => AnchorKind::Negative,
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => AnchorConfig::from_file(path)?,
        None => AnchorConfig::from_env()?,
    };
    if !args.dirs.is_empty() {
        config.search_dirs = args.dirs.clone();
        config.validate()?;
    }
    config.dump_on_load = false;

    let store = TrustAnchorStore::new(config);
    let mut out = io::stdout().lock();

    match args.command {
        Command::Sources { suffix } => {
            let kinds = match suffix {
                Some(suffix) => vec![suffix.into()],
                None => vec![AnchorKind::Positive, AnchorKind::Negative],
            };
            for kind in kinds {
                print_sources(&store, kind, &mut out)?;
            }
        }
        Command::Dump { json } => {
            store.load()?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&store.dump_json())?)?;
            } else {
                store.dump_to(&mut out)?;
            }
        }
        Command::Lookup { domain, rtype } => {
            store.load()?;
            let name = DomainName::parse(&domain)?;
            let key = match rtype {
                AnchorType::Ds => ResourceKey::ds(name),
                AnchorType::Dnskey => ResourceKey::dnskey(name),
            };

            let Some(set) = store.lookup_positive(&key) else {
                writeln!(out, "{}: not found", key)?;
                return Ok(ExitCode::FAILURE);
            };
            for record in set.records() {
                writeln!(out, "{} {}", key, record)?;
            }
        }
        Command::Negative { domain } => {
            store.load()?;
            if !store.lookup_negative(&domain) {
                writeln!(out, "{}: not a negative trust anchor", domain)?;
                return Ok(ExitCode::FAILURE);
            }
            writeln!(out, "{}: negative trust anchor", domain)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_sources<W: Write>(
    store: &TrustAnchorStore,
    kind: AnchorKind,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let set = store.sources(kind)?;

    for file in &set.files {
        writeln!(out, "[IN EFFECT]  {}", file.path.display())?;
    }
    for path in &set.masked {
        writeln!(out, "[MASKED]     {}", path.display())?;
    }
    for o in &set.overrides {
        let tag = match o.kind {
            OverrideKind::Overridden => "[OVERRIDDEN]",
            OverrideKind::Masked => "[MASKED]    ",
        };
        writeln!(out, "{} {} -> {}", tag, o.winner.display(), o.shadowed.display())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level_is_info() {
        let args = Args::try_parse_from(["heimdall-anchors", "dump"]).unwrap();
        assert_eq!(args.log_level, "info");
        assert!(matches!(args.command, Command::Dump { json: false }));
    }

    #[test]
    fn test_dirs_and_lookup_type() {
        let args = Args::try_parse_from([
            "heimdall-anchors",
            "--dir",
            "/etc/a",
            "-d",
            "/usr/lib/b",
            "--log-level",
            "debug",
            "lookup",
            "example.com",
            "--type",
            "dnskey",
        ])
        .unwrap();

        assert_eq!(
            args.dirs,
            vec![PathBuf::from("/etc/a"), PathBuf::from("/usr/lib/b")]
        );
        assert_eq!(args.log_level, "debug");
        assert!(matches!(
            args.command,
            Command::Lookup {
                rtype: AnchorType::Dnskey,
                ..
            }
        ));
    }
}
