// @module: Subtitle to decoder timestamp conversion

/// Convert a subtitle timestamp (`HH:MM:SS,mmm`) into decoder syntax (`HH:MM:SS.mmm`).
///
/// Only the first comma is replaced. Nothing is validated: malformed input is
/// passed through and surfaces as a decoder failure.
pub fn to_decoder_timestamp(timestamp: &str) -> String {
    timestamp.replacen(',', ".", 1)
}
