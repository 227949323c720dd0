/*!
 * Tests for subtitle track reading
 */

use anyhow::Result;
use subclip::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::common;

/// Test that a valid entry keeps its fields and trims its text
#[test]
fn test_new_validated_withValidInput_shouldCreateEntry() -> Result<()> {
    let entry = SubtitleEntry::new_validated(1, "00:00:01,000", "00:00:04,000", "  Hello world  ")?;

    assert_eq!(entry.index, 1);
    assert_eq!(entry.start, "00:00:01,000");
    assert_eq!(entry.end, "00:00:04,000");
    assert_eq!(entry.text, "Hello world");

    Ok(())
}

/// Test that inverted or empty ranges are rejected
#[test]
fn test_new_validated_withInvertedRange_shouldFail() {
    assert!(SubtitleEntry::new_validated(1, "00:00:05,000", "00:00:04,000", "Oops").is_err());
    assert!(SubtitleEntry::new_validated(1, "00:00:05,000", "00:00:05,000", "Oops").is_err());
}

/// Test that a zero index and blank text are rejected
#[test]
fn test_new_validated_withZeroIndexOrBlankText_shouldFail() {
    assert!(SubtitleEntry::new_validated(0, "00:00:01,000", "00:00:02,000", "Text").is_err());
    assert!(SubtitleEntry::new_validated(1, "00:00:01,000", "00:00:02,000", "   ").is_err());
}

/// Test timestamp parsing with both decimal separators
#[test]
fn test_parse_timestamp_withEitherSeparator_shouldReturnMilliseconds() -> Result<()> {
    assert_eq!(SubtitleEntry::parse_timestamp("01:02:03,456")?, 3_723_456);
    assert_eq!(SubtitleEntry::parse_timestamp("00:00:01.500")?, 1_500);
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("garbage").is_err());

    Ok(())
}

/// Test that entries keep their written indices, order and multi-line text
#[test]
fn test_parse_srt_string_withOutOfOrderIndices_shouldKeepWrittenOrder() -> Result<()> {
    let content = "5\n00:00:05,000 --> 00:00:06,000\nFive\n\n2\n00:00:01,000 --> 00:00:02,000\nTwo\nlines\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries, vec![
        SubtitleEntry::new(5, "00:00:05,000", "00:00:06,000", "Five"),
        SubtitleEntry::new(2, "00:00:01,000", "00:00:02,000", "Two\nlines"),
    ]);

    Ok(())
}

/// Test that malformed blocks are skipped and the rest survive
#[test]
fn test_parse_srt_string_withMalformedBlock_shouldSkipIt() -> Result<()> {
    common::init_logger();
    let content = "1\nnot a timing line\nLost\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].index, 2);
    assert_eq!(entries[0].text, "Kept");

    Ok(())
}

/// Test that content without any entry is an error
#[test]
fn test_parse_srt_string_withNoEntries_shouldFail() {
    assert!(SubtitleCollection::parse_srt_string("").is_err());
    assert!(SubtitleCollection::parse_srt_string("just some words\n").is_err());
}

/// Test reading a track from disk, including a byte order mark
#[test]
fn test_from_srt_file_withBom_shouldParseAllEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let plain = common::create_test_subtitle(temp_dir.path(), "plain.srt")?;
    let content = std::fs::read_to_string(&plain)?;
    let with_bom = common::create_test_file(temp_dir.path(), "bom.srt", &format!("\u{feff}{}", content))?;

    let collection = SubtitleCollection::from_srt_file(&with_bom)?;

    assert_eq!(collection.source_file, with_bom);
    assert_eq!(collection.entries.len(), 3);
    assert_eq!(collection.entries[0].index, 1);
    assert_eq!(collection.entries[2].text, "\"Wait...\"\n- No, stay: please.");

    Ok(())
}

/// Test that a missing file is an error
#[test]
fn test_from_srt_file_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(SubtitleCollection::from_srt_file(temp_dir.path().join("absent.srt")).is_err());

    Ok(())
}

/// Test that an entry renders as an SRT block
#[test]
fn test_entry_display_shouldRenderSrtBlock() {
    let entry = SubtitleEntry::new(3, "00:00:01,000", "00:00:02,000", "Hi.");

    assert_eq!(entry.to_string(), "3\n00:00:01,000 --> 00:00:02,000\nHi.\n\n");
}

/// Test that a caption without text is dropped without swallowing the next block
#[test]
fn test_parse_srt_string_withEmptyCaption_shouldKeepFollowingEntry() -> Result<()> {
    common::init_logger();
    let content = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nHello\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries, vec![SubtitleEntry::new(2, "00:00:03,000", "00:00:04,000", "Hello")]);

    Ok(())
}

/// Test that an index and timing pair opens a new block even without a blank line before it
#[test]
fn test_parse_srt_string_withoutBlankSeparator_shouldSplitBlocks() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nOne\n2\n00:00:03,000 --> 00:00:04,000\nTwo\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries, vec![
        SubtitleEntry::new(1, "00:00:01,000", "00:00:02,000", "One"),
        SubtitleEntry::new(2, "00:00:03,000", "00:00:04,000", "Two"),
    ]);

    Ok(())
}

/// Test that a number inside caption text stays part of the caption
#[test]
fn test_parse_srt_string_withNumericCaptionLine_shouldKeepItAsText() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nCount with me\n42\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Count with me\n42");

    Ok(())
}

/// Test that absurdly large hours are rejected instead of overflowing
#[test]
fn test_parse_timestamp_withHugeHours_shouldFail() -> Result<()> {
    common::init_logger();
    assert!(SubtitleEntry::parse_timestamp("99999999999999999:00:00,000").is_err());

    let content = "1\n99999999999999999:00:00,000 --> 99999999999999999:00:01,000\nFar away\n\n2\n00:00:01,000 --> 00:00:02,000\nNear\n";
    let entries = SubtitleCollection::parse_srt_string(content)?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].index, 2);

    Ok(())
}
