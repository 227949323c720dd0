/*!
 * Input validation.
 *
 * Collects every problem with a run's inputs instead of stopping at the first,
 * so a single re-run can address all of them.
 */

use futures::future::join_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::ValidationError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::SubtitleEntry;

/// Required configuration keys, in reporting order
pub const REQUIRED_KEYS: [&str; 2] = ["subtitle", "source"];

fn required_value<'a>(config: &'a Config, key: &str) -> Option<&'a Path> {
    let value = match key {
        "subtitle" => config.subtitle.as_deref(),
        "source" => config.source.as_deref(),
        _ => None,
    };
    value.filter(|path| !path.as_os_str().is_empty())
}

/// Check required keys and the existence of the files they name.
///
/// Missing-argument errors come first, then file-not-found errors, each in key
/// order. A missing key is not checked for existence. Existence checks run
/// concurrently.
pub async fn validate_config(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut present: Vec<PathBuf> = Vec::new();

    for key in REQUIRED_KEYS {
        match required_value(config, key) {
            Some(path) => present.push(path.to_path_buf()),
            None => errors.push(ValidationError::MissingArgument(key.to_string())),
        }
    }

    let checks = present.iter().map(|path| async move {
        (path, FileManager::path_accessible(path).await)
    });

    for (path, accessible) in join_all(checks).await {
        if !accessible {
            errors.push(ValidationError::FileNotFound(path.clone()));
        }
    }

    errors
}

/// Report every index used by more than one entry, in order of first appearance
pub fn validate_entries(entries: &[SubtitleEntry]) -> Vec<ValidationError> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    let mut order = Vec::new();

    for entry in entries {
        let count = counts.entry(entry.index).or_insert(0);
        if *count == 0 {
            order.push(entry.index);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|index| {
            let count = counts[&index];
            (count > 1).then_some(ValidationError::DuplicateIndex { index, count })
        })
        .collect()
}
