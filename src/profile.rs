//! Practitioner profile (`bot_profile.txt`) and reference documents.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions accepted for reference documents.
pub const REFERENCE_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported reference file type: {0} (expected .txt or .md)")]
    UnsupportedReference(String),
}

/// Plain-text profile stored at one path.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Profile text, or an empty string when no profile was saved yet.
    pub fn load(&self) -> Result<String, ProfileError> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Overwrite the profile, creating the parent directory if needed.
    pub fn save(&self, text: &str) -> Result<(), ProfileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, text)?;
        tracing::info!(chars = text.chars().count(), "Profile saved");
        Ok(())
    }
}

/// Read a `.txt`/`.md` reference document as UTF-8.
pub fn load_reference(path: &Path) -> Result<String, ProfileError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !REFERENCE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ProfileError::UnsupportedReference(path.display().to_string()));
    }

    let text = fs::read_to_string(path)?;
    tracing::info!(chars = text.chars().count(), "Reference document loaded");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_profile_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("bot_profile.txt"));
        assert_eq!(store.load().unwrap(), "");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("nested").join("bot_profile.txt"));
        store.save("体幹より股関節の可動を重視\n朝のルーティン例を必ず入れる").unwrap();
        assert_eq!(
            store.load().unwrap(),
            "体幹より股関節の可動を重視\n朝のルーティン例を必ず入れる"
        );
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("bot_profile.txt"));
        store.save("古い方針").unwrap();
        store.save("新しい方針").unwrap();
        assert_eq!(store.load().unwrap(), "新しい方針");
    }

    #[test]
    fn reference_txt_and_md_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        let md = dir.path().join("guide.MD");
        fs::write(&txt, "参考資料").unwrap();
        fs::write(&md, "# ガイド").unwrap();
        assert_eq!(load_reference(&txt).unwrap(), "参考資料");
        assert_eq!(load_reference(&md).unwrap(), "# ガイド");
    }

    #[test]
    fn reference_other_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("paper.pdf");
        fs::write(&pdf, "%PDF").unwrap();
        let err = load_reference(&pdf).unwrap_err();
        assert!(matches!(err, ProfileError::UnsupportedReference(_)));
        assert!(err.to_string().contains("paper.pdf"));
    }

    #[test]
    fn reference_invalid_utf8_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.txt");
        fs::write(&bad, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(load_reference(&bad), Err(ProfileError::Io(_))));
    }

    #[test]
    fn missing_reference_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_reference(&dir.path().join("absent.md")),
            Err(ProfileError::Io(_))
        ));
    }
}
