use std::path::PathBuf;

use include_dir::{include_dir, Dir};
use tracing::info;

use crate::error::LoadError;
use crate::tables::RawTables;

static ASSETS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

pub const BUNDLED_EXPORT: &str = "vocab_export.json";

/// Somewhere raw export text can come from.
pub trait DeckSource {
    fn describe(&self) -> String;
    fn load_raw_text(&self) -> Result<String, LoadError>;

    fn load_tables(&self) -> Result<RawTables, LoadError> {
        let text = self.load_raw_text()?;
        let tables = RawTables::from_json(&text)?;
        info!("Loaded {} tables from {}", tables.len(), self.describe());
        Ok(tables)
    }
}

#[derive(Debug, Clone)]
pub struct FileSource(pub PathBuf);

impl DeckSource for FileSource {
    fn describe(&self) -> String {
        self.0.display().to_string()
    }

    fn load_raw_text(&self) -> Result<String, LoadError> {
        std::fs::read_to_string(&self.0).map_err(|source| LoadError::Io {
            path: self.0.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UrlSource(pub String);

impl DeckSource for UrlSource {
    fn describe(&self) -> String {
        self.0.clone()
    }

    fn load_raw_text(&self) -> Result<String, LoadError> {
        let response = reqwest::blocking::get(&self.0)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus { url: self.0.clone(), status: status.as_u16() });
        }
        Ok(response.text()?)
    }
}

/// The export compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct BundledSource;

impl DeckSource for BundledSource {
    fn describe(&self) -> String {
        format!("bundled {}", BUNDLED_EXPORT)
    }

    fn load_raw_text(&self) -> Result<String, LoadError> {
        ASSETS_DIR
            .get_file(BUNDLED_EXPORT)
            .and_then(|file| file.contents_utf8())
            .map(String::from)
            .ok_or(LoadError::MissingAsset(BUNDLED_EXPORT))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_bundled_export_decodes() {
        let tables = BundledSource.load_tables().unwrap();
        assert!(!tables.is_empty());
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Table_1": [["ことば", "漢字", "ベトナム語"], ["たべる", "食べる", "ăn"]]}}"#)
            .unwrap();
        let tables = FileSource(file.path().to_path_buf()).load_tables().unwrap();
        assert_eq!(tables.get("Table_1").map(Vec::len), Some(2));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = FileSource(path.clone()).load_tables().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"Table_1\": [[").unwrap();
        let err = FileSource(file.path().to_path_buf()).load_tables().unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
