use std::{fs, io, path::PathBuf};

use canvas_snake_core::{ScoreStore, ScoreStoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Keeps the high score in a small TOML file.
///
/// A missing file reads as "no high score yet".
#[derive(Clone, Debug)]
pub(crate) struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for FileScoreStore {
    fn load_high_score(&self) -> Result<Option<u32>, ScoreStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(ScoreStoreError::Unavailable {
                    reason: format!("{}: {error}", self.path.display()),
                })
            }
        };

        let record: HighScoreRecord =
            toml::from_str(&contents).map_err(|_| ScoreStoreError::Corrupt {
                value: contents.trim().to_owned(),
            })?;
        Ok(Some(record.high_score))
    }

    fn store_high_score(&mut self, high_score: u32) -> Result<(), ScoreStoreError> {
        let unavailable = |reason: String| ScoreStoreError::Unavailable {
            reason: format!("{}: {reason}", self.path.display()),
        };

        let contents = toml::to_string(&HighScoreRecord { high_score })
            .map_err(|error| unavailable(error.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| unavailable(error.to_string()))?;
            }
        }
        fs::write(&self.path, contents).map_err(|error| unavailable(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("canvas-snake-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir is writable");
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_has_no_high_score() {
        let store = FileScoreStore::new(scratch_path("missing.toml"));

        assert_eq!(store.load_high_score(), Ok(None));
    }

    #[test]
    fn stored_score_reads_back() {
        let path = scratch_path("round.toml");
        let mut store = FileScoreStore::new(&path);

        store.store_high_score(12).expect("write succeeds");

        assert_eq!(store.load_high_score(), Ok(Some(12)));
        let contents = fs::read_to_string(&path).expect("file exists");
        assert_eq!(contents.trim(), "high_score = 12");
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let path = scratch_path("garbage.toml");
        fs::write(&path, "high_score = \"lots\"\n").expect("write succeeds");
        let store = FileScoreStore::new(&path);

        assert_eq!(
            store.load_high_score(),
            Err(ScoreStoreError::Corrupt {
                value: "high_score = \"lots\"".to_owned(),
            })
        );
    }

    #[test]
    fn unreadable_path_is_unavailable() {
        let dir = scratch_path("a-directory");
        fs::create_dir_all(&dir).expect("temp dir is writable");
        let store = FileScoreStore::new(&dir);

        assert!(matches!(
            store.load_high_score(),
            Err(ScoreStoreError::Unavailable { .. })
        ));
    }
}
