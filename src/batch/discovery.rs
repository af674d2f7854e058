//! Target discovery for batch marking.
//!
//! Expands directories given on the command line into the image files they
//! contain.

use crate::format::ImageKind;
use glob::{glob, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Error during target discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, glob::PatternError),
    /// Input path does not exist
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),
}

/// Discover watermarkable files inside `dir`.
///
/// Only direct children are returned unless `recursive` is set.
pub fn discover_dir(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, DiscoveryError> {
    // The directory is matched literally; only the trailing wildcard is a pattern.
    let base = PathBuf::from(Pattern::escape(&dir.to_string_lossy()));
    let pattern = if recursive { base.join("**").join("*") } else { base.join("*") };
    let pattern_str = pattern.to_string_lossy().into_owned();

    let paths = glob(&pattern_str).map_err(|e| DiscoveryError::InvalidPattern(pattern_str.clone(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() && ImageKind::from_path(&path).is_some() {
                    files.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("error reading path: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Expand command-line inputs into a sorted, de-duplicated list of targets.
///
/// Files are kept as given, whatever their extension, so that unsupported
/// files are reported instead of silently skipped. Directories contribute the
/// supported images they contain.
pub fn discover_targets(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut targets = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            targets.extend(discover_dir(input, recursive)?);
        } else if input.exists() {
            targets.insert(input.clone());
        } else {
            return Err(DiscoveryError::NotFound(input.clone()));
        }
    }

    Ok(targets.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_discover_dir_filters_extensions() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a.png"));
        touch(&temp.path().join("b.JPG"));
        touch(&temp.path().join("c.txt"));
        touch(&temp.path().join("nested/d.gif"));

        let files = discover_dir(temp.path(), false).unwrap();
        assert_eq!(files, vec![temp.path().join("a.png"), temp.path().join("b.JPG")]);
    }

    #[test]
    fn test_discover_dir_recursive() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a.png"));
        touch(&temp.path().join("nested/deeper/d.gif"));

        let files = discover_dir(temp.path(), true).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&temp.path().join("nested/deeper/d.gif")));
    }

    #[test]
    fn test_discover_dir_with_glob_characters_in_name() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("shots[1]");
        touch(&dir.join("a.png"));
        touch(&dir.join("nested*/b.gif"));
        // Would match `shots[1]/*` if the brackets were a character class.
        touch(&temp.path().join("shots1/decoy.png"));

        assert_eq!(discover_dir(&dir, false).unwrap(), vec![dir.join("a.png")]);

        let files = discover_dir(&dir, true).unwrap();
        assert_eq!(files, vec![dir.join("a.png"), dir.join("nested*/b.gif")]);
    }

    #[test]
    fn test_discover_targets_dedups_and_keeps_files() {
        let temp = TempDir::new().unwrap();
        let png = temp.path().join("a.png");
        let bmp = temp.path().join("b.bmp");
        touch(&png);
        touch(&bmp);

        let targets =
            discover_targets(&[temp.path().to_path_buf(), png.clone(), bmp.clone()], false).unwrap();
        assert_eq!(targets, vec![png, bmp]);
    }

    #[test]
    fn test_discover_targets_missing_input() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.png");
        let err = discover_targets(&[missing.clone()], false).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(p) if p == missing));
    }
}
