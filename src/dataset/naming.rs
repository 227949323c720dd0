/*!
 * Clip naming.
 *
 * Every subtitle entry maps to `{prefix}{index:06}.wav` under the output
 * directory. Names sort in entry order as long as indices stay below one million.
 */

use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// Width the index is zero-padded to
pub const INDEX_WIDTH: usize = 6;

/// Extension of every produced clip
pub const CLIP_EXTENSION: &str = "wav";

/// Filename and absolute destination of one clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClipDescriptor {
    /// Bare filename, as referenced by the manifest
    pub filename: String,
    /// Absolute, normalized output path
    pub path: PathBuf,
}

/// `prefix + zero-padded index + ".wav"`; indices wider than six digits are kept whole
pub fn clip_filename(prefix: &str, index: usize) -> String {
    format!("{}{:0width$}.{}", prefix, index, CLIP_EXTENSION, width = INDEX_WIDTH)
}

/// Join `filename` onto `output_dir` and resolve the result to an absolute path
pub fn resolve_clip_path<P: AsRef<Path>>(output_dir: P, filename: &str) -> std::io::Result<PathBuf> {
    FileManager::resolve_absolute(output_dir.as_ref().join(filename))
}

/// Names clips for one run; the output directory is resolved once up front
#[derive(Debug, Clone)]
pub struct ClipNamer {
    prefix: String,
    output_dir: PathBuf,
}

impl ClipNamer {
    /// Fails only when the current directory cannot be determined
    pub fn new<P: AsRef<Path>>(output_dir: P, prefix: impl Into<String>) -> std::io::Result<Self> {
        Ok(Self {
            prefix: prefix.into(),
            output_dir: FileManager::resolve_absolute(output_dir)?,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn filename(&self, index: usize) -> String {
        clip_filename(&self.prefix, index)
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        FileManager::normalize_lexically(&self.output_dir.join(filename))
    }

    /// Filename and path for an entry, computed together so they cannot drift apart
    pub fn describe(&self, index: usize) -> AudioClipDescriptor {
        let filename = self.filename(index);
        let path = self.path(&filename);
        AudioClipDescriptor { filename, path }
    }
}
