use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use super::domain::FormInput;

#[derive(Debug)]
pub enum RosterError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Io(err) => write!(f, "failed to read attendee roster: {}", err),
            RosterError::Csv(err) => write!(f, "invalid attendee roster CSV: {}", err),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Io(err) => Some(err),
            RosterError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One attendee row: the form text plus where to find the avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub line: u64,
    pub input: FormInput,
    pub avatar: Option<PathBuf>,
}

/// Reads `full_name,email,github,avatar` CSV rosters for batch issuance.
pub struct RosterImporter;

impl RosterImporter {
    /// Relative avatar paths are resolved against the roster's directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, RosterError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let entries = Self::from_reader(file)?
            .into_iter()
            .map(|mut entry| {
                entry.avatar = entry.avatar.map(|avatar| {
                    if avatar.is_relative() {
                        base.join(avatar)
                    } else {
                        avatar
                    }
                });
                entry
            })
            .collect();
        Ok(entries)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Vec<RosterEntry>, RosterError> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(raw.as_slice());
        let headers = csv_reader.headers()?.clone();
        let mut entries = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record
                .position()
                .map(|pos| record_start_line(&raw, pos))
                .unwrap_or_default();
            let row: RosterRow = record.deserialize(Some(&headers))?;
            entries.push(RosterEntry {
                line,
                input: FormInput {
                    full_name: row.full_name,
                    email: row.email,
                    github: row.github.unwrap_or_default(),
                },
                avatar: row.avatar.map(PathBuf::from),
            });
        }

        Ok(entries)
    }
}

// The reader stamps a record with the position where it started looking, before any blank
// lines it skipped.
fn record_start_line(raw: &[u8], pos: &csv::Position) -> u64 {
    let offset = usize::try_from(pos.byte()).unwrap_or(raw.len());
    let skipped = raw
        .get(offset..)
        .unwrap_or_default()
        .iter()
        .copied()
        .take_while(|byte| matches!(byte, b'\r' | b'\n'))
        .filter(|byte| *byte == b'\n')
        .count();
    pos.line() + skipped as u64
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    github: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    avatar: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
