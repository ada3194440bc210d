//! Lookup of the precomputed per-(HMO, tier) medical context.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ContextError, Result};
use crate::hmo::{Hmo, MembershipTier};

/// Source of the context text injected into the medical Q&A prompt.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Context text for the pair, or [`ContextError::NotFound`].
    async fn load(&self, hmo: Hmo, tier: MembershipTier) -> Result<String>;

    /// `{hmo}_{tier}` names of every supported pair that has context available.
    async fn available(&self) -> Vec<String>;
}

/// File name holding the context for a pair.
pub fn context_file_name(hmo: Hmo, tier: MembershipTier) -> String {
    format!("{}_{}.txt", hmo.hebrew(), tier.hebrew())
}

/// True iff both values are canonical Hebrew names.
pub fn is_supported_context(hmo: &str, tier: &str) -> bool {
    Hmo::ALL.iter().any(|h| h.hebrew() == hmo)
        && MembershipTier::ALL.iter().any(|t| t.hebrew() == tier)
}

/// Reads `{hmo}_{tier}.txt` files from a folder.
#[derive(Debug, Clone)]
pub struct FileContextLoader {
    data_folder: PathBuf,
}

impl FileContextLoader {
    pub fn new(data_folder: impl Into<PathBuf>) -> Self {
        Self {
            data_folder: data_folder.into(),
        }
    }

    pub fn data_folder(&self) -> &Path {
        &self.data_folder
    }
}

#[async_trait]
impl ContextSource for FileContextLoader {
    async fn load(&self, hmo: Hmo, tier: MembershipTier) -> Result<String> {
        let path = self.data_folder.join(context_file_name(hmo, tier));
        debug!(path = %path.display(), "loading medical context");

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "context file not found");
                Err(ContextError::NotFound { hmo, tier })
            }
            Err(e) => Err(ContextError::Io(e)),
        }
    }

    async fn available(&self) -> Vec<String> {
        let mut entries = match tokio::fs::read_dir(&self.data_folder).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    folder = %self.data_folder.display(),
                    error = %e,
                    "cannot list context folder"
                );
                return Vec::new();
            }
        };

        let mut contexts = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        folder = %self.data_folder.display(),
                        error = %e,
                        listed = contexts.len(),
                        "context folder listing stopped early"
                    );
                    break;
                }
            };
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(".txt") else {
                continue;
            };
            match stem.split_once('_') {
                Some((hmo, tier)) if is_supported_context(hmo, tier) => {
                    contexts.push(stem.to_string());
                }
                _ => debug!(file = %name, "skipping unrecognised context file"),
            }
        }
        contexts.sort();
        contexts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_existing_pair() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("מכבי_זהב.txt"), "שירותי זהב").unwrap();

        let loader = FileContextLoader::new(dir.path());
        let text = loader.load(Hmo::Maccabi, MembershipTier::Gold).await.unwrap();

        assert_eq!(text, "שירותי זהב");
    }

    #[tokio::test]
    async fn test_missing_pair_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileContextLoader::new(dir.path());

        let err = loader
            .load(Hmo::Clalit, MembershipTier::Bronze)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ContextError::NotFound {
                hmo: Hmo::Clalit,
                tier: MembershipTier::Bronze
            }
        ));
    }

    #[tokio::test]
    async fn test_available_lists_supported_pairs_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "כללית_כסף.txt",
            "מכבי_זהב.txt",
            "notes.txt",
            "מכבי_זהב_old.txt",
            "Maccabi_Gold.txt",
            "כללית_ארד.json",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let loader = FileContextLoader::new(dir.path());
        let available = loader.available().await;

        assert_eq!(available, vec!["כללית_כסף", "מכבי_זהב"]);
    }

    #[tokio::test]
    async fn test_available_on_missing_folder_is_empty() {
        let loader = FileContextLoader::new("/definitely/not/here");
        assert!(loader.available().await.is_empty());
    }

    #[tokio::test]
    async fn test_available_on_unreadable_folder_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_folder = dir.path().join("מכבי_זהב.txt");
        std::fs::write(&not_a_folder, "").unwrap();

        let loader = FileContextLoader::new(&not_a_folder);
        assert!(loader.available().await.is_empty());
    }

    #[test]
    fn test_supported_context_requires_hebrew_names() {
        assert!(is_supported_context("מאוחדת", "ארד"));
        assert!(!is_supported_context("Meuhedet", "ארד"));
        assert!(!is_supported_context("מאוחדת", "platinum"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            context_file_name(Hmo::Meuhedet, MembershipTier::Silver),
            "מאוחדת_כסף.txt"
        );
    }
}
