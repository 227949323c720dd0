/*!
 * Common test utilities for the subclip test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use subclip::app_config::Config;
use subclip::subtitle_processor::SubtitleEntry;

/// Route library logs through env_logger once per test binary
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:02,000
Hi.

2
00:00:02,500 --> 00:00:03,000
Bye

3
00:00:04,000 --> 00:00:06,500
"Wait..."
- No, stay: please.
"#;
    create_test_file(dir, filename, content)
}

/// The two entries of the reference end-to-end scenario
pub fn two_entries() -> Vec<SubtitleEntry> {
    vec![
        SubtitleEntry::new(1, "00:00:01,000", "00:00:02,000", "Hi."),
        SubtitleEntry::new(2, "00:00:02,500", "00:00:03,000", "Bye"),
    ]
}

/// `count` consecutive one-second entries starting at index 1
pub fn numbered_entries(count: usize) -> Vec<SubtitleEntry> {
    (1..=count)
        .map(|i| {
            SubtitleEntry::new(
                i,
                format!("00:00:{:02},000", i),
                format!("00:00:{:02},900", i),
                format!("line {}", i),
            )
        })
        .collect()
}

/// A config whose subtitle and source exist inside `dir`, writing clips to `dir/clips`
pub fn valid_config(dir: &Path) -> Result<Config> {
    let subtitle = create_test_subtitle(dir, "movie.srt")?;
    let source = create_test_file(dir, "movie.mkv", "not really a video")?;
    let output_dir = dir.join("clips");
    fs::create_dir_all(&output_dir)?;

    Ok(Config {
        subtitle: Some(subtitle),
        source: Some(source),
        output_dir,
        settle_delay_ms: 0,
        ..Config::default()
    })
}
