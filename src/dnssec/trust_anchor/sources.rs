use super::parser::AnchorKind;
use crate::error::{AnchorError, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DEV_NULL: &str = "/dev/null";

/// A file selected to be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// A file of the same name in a higher precedence directory replaces this one
    Overridden,
    /// The higher precedence entry is empty or links to /dev/null, disabling the name
    Masked,
}

/// A lower precedence file hidden by an entry of the same name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub name: String,
    pub winner: PathBuf,
    pub shadowed: PathBuf,
    pub kind: OverrideKind,
}

/// Outcome of enumerating one file suffix across all search directories
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    /// Effective files, sorted by file name
    pub files: Vec<SourceFile>,
    /// Highest precedence entries that mask their name
    pub masked: Vec<PathBuf>,
    pub overrides: Vec<Override>,
}

/// Counters for one pass over a suffix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub files: usize,
    pub accepted: usize,
    pub rejected: usize,
}

struct Candidate {
    path: PathBuf,
    masked: bool,
}

/// Finds and reads anchor files across layered configuration directories.
///
/// Directories are given highest precedence first. For every file name only
/// the entry in the first directory containing it is used.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    dirs: Vec<PathBuf>,
}

impl SourceLoader {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Enumerate the effective `*.<suffix>` files.
    /// Missing directories are skipped; any other directory error is returned.
    pub fn enumerate(&self, kind: AnchorKind) -> Result<SourceSet> {
        let extension = format!(".{}", kind.suffix());
        let mut winners: BTreeMap<String, Candidate> = BTreeMap::new();
        let mut overrides = Vec::new();

        for dir in &self.dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Trust anchor directory {} does not exist", dir.display());
                    continue;
                }
                Err(e) => return Err(enumerate_error(kind, dir, e)),
            };

            let mut names = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| enumerate_error(kind, dir, e))?;
                let Ok(name) = entry.file_name().into_string() else {
                    debug!("Skipping non UTF-8 file name in {}", dir.display());
                    continue;
                };
                if name.starts_with('.') || !name.ends_with(&extension) {
                    continue;
                }
                names.push(name);
            }
            names.sort();

            for name in names {
                let path = dir.join(&name);
                let Some(masked) = classify(&path) else {
                    continue;
                };

                if let Some(winner) = winners.get(&name) {
                    let kind = if winner.masked {
                        OverrideKind::Masked
                    } else {
                        OverrideKind::Overridden
                    };
                    debug!(
                        "{} is {:?} by {}",
                        path.display(),
                        kind,
                        winner.path.display()
                    );
                    overrides.push(Override {
                        name,
                        winner: winner.path.clone(),
                        shadowed: path,
                        kind,
                    });
                    continue;
                }

                winners.insert(name, Candidate { path, masked });
            }
        }

        let mut set = SourceSet {
            overrides,
            ..SourceSet::default()
        };
        for (name, candidate) in winners {
            if candidate.masked {
                debug!("Trust anchor file {} is masked", candidate.path.display());
                set.masked.push(candidate.path);
            } else {
                set.files.push(SourceFile {
                    name,
                    path: candidate.path,
                });
            }
        }

        Ok(set)
    }

    /// Feed every relevant line of every effective file to `handler`.
    ///
    /// The handler receives the file path, the 1-based line number and the
    /// trimmed line, and returns whether the line was accepted. Unreadable
    /// files are logged and skipped.
    pub fn load<F>(&self, kind: AnchorKind, mut handler: F) -> Result<LoadStats>
    where
        F: FnMut(&Path, usize, &str) -> bool,
    {
        let set = self.enumerate(kind)?;
        let mut stats = LoadStats::default();

        for file in &set.files {
            let reader = match File::open(&file.path) {
                Ok(f) => BufReader::new(f),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!("Failed to open {}: {}", file.path.display(), e);
                    continue;
                }
            };

            stats.files += 1;
            read_lines(&file.path, reader, |n, line| {
                if handler(&file.path, n, line) {
                    stats.accepted += 1;
                } else {
                    stats.rejected += 1;
                }
            });
        }

        Ok(stats)
    }
}

/// Call `f` for each non-blank, non-comment line.
/// A line that is not UTF-8 is skipped; only an I/O error ends the file.
fn read_lines<R: BufRead, F: FnMut(usize, &str)>(path: &Path, mut reader: R, mut f: F) {
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => line_number += 1,
            Err(e) => {
                warn!("Failed to read {}, ignoring: {}", path.display(), e);
                return;
            }
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            warn!(
                "Line {}:{} is not valid UTF-8, ignoring line.",
                path.display(),
                line_number
            );
            continue;
        };

        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        f(line_number, line);
    }
}

/// `Some(masked)` for a usable entry, `None` for entries to ignore
fn classify(path: &Path) -> Option<bool> {
    if fs::read_link(path).is_ok_and(|target| target == Path::new(DEV_NULL)) {
        return Some(true);
    }

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.len() == 0),
        Ok(_) => None,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                debug!("Cannot stat {}: {}", path.display(), e);
            }
            None
        }
    }
}

fn enumerate_error(kind: AnchorKind, dir: &Path, err: io::Error) -> AnchorError {
    AnchorError::Enumerate {
        suffix: kind.suffix().to_string(),
        dir: dir.to_path_buf(),
        reason: err.to_string(),
    }
}
