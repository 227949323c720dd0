use std::fs;
use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{warn, debug};

// @module: Subtitle track reading

// @const: SRT timing line regex, keeps the original timestamp text
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2,}:\d{2}:\d{2}[,.]\d{3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: 1-based index as written in the track
    pub index: usize,

    // @field: Start timestamp, subtitle syntax (HH:MM:SS,mmm)
    pub start: String,

    // @field: End timestamp, subtitle syntax
    pub end: String,

    // @field: Raw caption text, may span lines
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without checking its timing
    pub fn new(index: usize, start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        SubtitleEntry {
            index,
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Positive index, parseable timestamps, end after start, non-empty text
    pub fn new_validated(index: usize, start: &str, end: &str, text: &str) -> Result<Self> {
        if index == 0 {
            return Err(anyhow!("Subtitle index must be positive"));
        }

        let start_ms = Self::parse_timestamp(start)?;
        let end_ms = Self::parse_timestamp(end)?;
        if end_ms <= start_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end, start
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", index));
        }

        Ok(Self::new(index, start, end, trimmed_text))
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Subtitle entries read from one track, in order of appearance
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Subtitle file the entries came from
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Read and parse an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {:?}", path))?;

        // Tolerate a UTF-8 byte order mark, common in SRT files saved on Windows
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let entries = Self::parse_srt_string(content)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", path))?;
        debug!("Read {} subtitle entries from {:?}", entries.len(), path);

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Entries keep their written index and order; malformed blocks are skipped with a warning.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let mut entries = Vec::new();

        let mut current_index: Option<usize> = None;
        let mut current_times: Option<(String, String)> = None;
        let mut current_text = String::new();

        let mut add_current_entry = |index: usize, times: &(String, String), text: &str| {
            match SubtitleEntry::new_validated(index, &times.0, &times.1, text) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", index, e),
            }
        };

        let lines: Vec<&str> = content.lines().map(str::trim).collect();

        for (line_number, &trimmed) in lines.iter().enumerate() {
            if trimmed.is_empty() {
                // A blank line closes the block once its timing is known, even without text
                if let (Some(index), Some(times)) = (current_index, current_times.take()) {
                    add_current_entry(index, &times, &current_text);
                    current_index = None;
                    current_text.clear();
                }
                continue;
            }

            // An index directly followed by a timing line opens a new block
            let opens_block = current_times.is_some()
                && trimmed.parse::<usize>().is_ok()
                && lines.get(line_number + 1).is_some_and(|next| TIMESTAMP_REGEX.is_match(next));
            if opens_block {
                if let (Some(index), Some(times)) = (current_index, current_times.take()) {
                    add_current_entry(index, &times, &current_text);
                }
                current_index = None;
                current_text.clear();
            }

            if current_index.is_none() {
                match trimmed.parse::<usize>() {
                    Ok(index) => current_index = Some(index),
                    Err(_) => warn!("Unexpected text at line {} before index: {}", line_number + 1, trimmed),
                }
                continue;
            }

            if current_times.is_none() {
                match TIMESTAMP_REGEX.captures(trimmed) {
                    Some(caps) => {
                        current_times = Some((caps[1].to_string(), caps[2].to_string()));
                    }
                    None => {
                        warn!("Invalid timestamp line at line {}: {}", line_number + 1, trimmed);
                        current_index = None;
                    }
                }
                continue;
            }

            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        }

        if let (Some(index), Some(times)) = (current_index, current_times.as_ref()) {
            add_current_entry(index, times, &current_text);
        }

        if entries.is_empty() {
            return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
        }

        Ok(entries)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
