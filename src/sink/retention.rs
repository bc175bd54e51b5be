//! Numbered log file discovery and retention
//!
//! Log files are named `{base_name}.{n}.log`. Before a new file is opened, the
//! directory is scanned for files of the same family, files whose number cannot
//! be parsed are removed, the oldest files are removed until there is room for
//! one more, and the new file gets the next number. Directories carrying a log
//! file name are never removed, but the new number is chosen past them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension shared by every log file
pub const LOG_EXTENSION: &str = ".log";

/// Outcome of preparing a new log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationReport {
    /// Path the new log file should be created at
    pub path: PathBuf,
    /// Sequence number of the new file
    pub sequence: u64,
    /// Files deleted, malformed names first, then oldest first
    pub removed: Vec<PathBuf>,
}

/// File name for sequence number `sequence`
pub fn log_file_name(base_name: &str, sequence: u64) -> String {
    format!("{}.{}{}", base_name, sequence, LOG_EXTENSION)
}

/// Extract the sequence number from a log file name
///
/// The number is whatever sits between the last two dots. Returns `None` if
/// there are fewer than two dots, the segment is empty, or it is not a plain
/// non-negative decimal number.
pub fn extract_sequence(file_name: &str) -> Option<u64> {
    let (stem, _extension) = file_name.rsplit_once('.')?;
    let (_, digits) = stem.rsplit_once('.')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug)]
struct Candidate {
    name: String,
    sequence: Option<u64>,
}

/// Entries of the `base_name` family found in the log directory
#[derive(Debug, Default)]
struct Scan {
    /// Removable entries (files and symlinks), ordered by sequence number;
    /// names without a valid number sort after all numbered ones
    run: Vec<Candidate>,
    /// Highest number held by an entry that cannot be removed, e.g. a directory
    reserved: Option<u64>,
}

/// List entries of the `base_name` family, matching by name only
fn scan(directory: &Path, base_name: &str) -> Result<Scan> {
    let entries = fs::read_dir(directory)
        .map_err(|e| Error::io(format!("Failed to read {}", directory.display()), e))?;

    let mut scan = Scan::default();
    for entry in entries {
        let entry =
            entry.map_err(|e| Error::io(format!("Failed to read {}", directory.display()), e))?;

        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.starts_with(base_name) || !name.ends_with(LOG_EXTENSION) {
            continue;
        }

        let sequence = extract_sequence(&name);
        // file_type does not follow symlinks, so a link is removable like a file
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            // Still occupies its name, so the new number must go past it
            scan.reserved = scan.reserved.max(sequence);
            continue;
        }
        scan.run.push(Candidate { name, sequence });
    }

    // Numeric order: "app.9.log" comes before "app.10.log"
    scan.run.sort_by(|a, b| {
        (a.sequence.is_none(), a.sequence, &a.name).cmp(&(b.sequence.is_none(), b.sequence, &b.name))
    });
    Ok(scan)
}

fn remove(directory: &Path, candidate: &Candidate) -> Result<PathBuf> {
    let path = directory.join(&candidate.name);
    match fs::remove_file(&path) {
        Ok(()) => {}
        // Already gone, e.g. swept by another logger
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(Error::io(
                format!("Failed to remove old log file {}", path.display()),
                e,
            ))
        }
    }
    Ok(path)
}

/// Sweep `directory` and choose the path of the next log file
///
/// With `max_files > 0`, at most `max_files - 1` existing files are kept so the
/// new file brings the total to `max_files`. `max_files == 0` keeps everything.
pub fn prepare_log_file(
    directory: &Path,
    base_name: &str,
    max_files: usize,
) -> Result<RotationReport> {
    if !directory.is_dir() {
        return Err(Error::PathNotFound {
            path: directory.to_path_buf(),
        });
    }

    let Scan { mut run, reserved } = scan(directory, base_name)?;
    let mut removed = Vec::new();

    // Malformed names sit at the newest end of the run
    let first_malformed = run
        .iter()
        .position(|c| c.sequence.is_none())
        .unwrap_or(run.len());
    for candidate in run.drain(first_malformed..).rev() {
        tracing::debug!("Removing malformed log file name: {}", candidate.name);
        removed.push(remove(directory, &candidate)?);
    }

    if max_files > 0 && run.len() >= max_files {
        let excess = run.len() - (max_files - 1);
        for candidate in run.drain(..excess) {
            tracing::debug!("Removing old log file: {}", candidate.name);
            removed.push(remove(directory, &candidate)?);
        }
    }

    let newest = run.last().and_then(|c| c.sequence).max(reserved);
    let sequence = match newest {
        Some(newest) => newest.checked_add(1).ok_or_else(|| {
            Error::io(
                "Failed to pick next log file number",
                io::Error::new(io::ErrorKind::Other, "sequence number overflow"),
            )
        })?,
        None => 0,
    };

    Ok(RotationReport {
        path: directory.join(log_file_name(base_name, sequence)),
        sequence,
        removed,
    })
}
