/*!
 * Manifest records.
 *
 * A record is `<clip filename>\t<normalized text>` followed by a blank line.
 * Normalized text is a single line without `, . - : "`, so consumers can split
 * on the first tab.
 */

use std::fmt;

/// Characters removed from caption text
pub const STRIPPED_CHARS: [char; 5] = [',', '.', '-', ':', '"'];

/// Flatten caption text to one line and drop the stripped characters.
///
/// Newlines become single spaces. A removed character never leaves a doubled
/// space behind: `"a - b"` becomes `"a b"`, while `"a,b"` becomes `"ab"`.
pub fn normalize_transcript(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut dropped_since_last = false;

    for c in raw.chars() {
        let c = if c == '\n' { ' ' } else { c };

        if STRIPPED_CHARS.contains(&c) {
            dropped_since_last = true;
            continue;
        }

        if c == ' ' && dropped_since_last && normalized.ends_with(' ') {
            dropped_since_last = false;
            continue;
        }

        dropped_since_last = false;
        normalized.push(c);
    }

    normalized
}

/// One manifest record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    /// Clip the text belongs to
    pub audio_filename: String,
    /// Normalized caption text
    pub text: String,
}

impl TranscriptLine {
    /// Pair normalized caption text with its clip filename
    pub fn build(raw_text: &str, audio_filename: &str) -> Self {
        Self {
            audio_filename: audio_filename.to_string(),
            text: normalize_transcript(raw_text),
        }
    }
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}\n\n", self.audio_filename, self.text)
    }
}
