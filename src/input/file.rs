//! Desired-schema file loading

use std::path::Path;
use std::sync::Arc;

use crate::input::LoadError;
use crate::token::SourceText;

/// Read a SQL schema file into a shared source buffer. The file is read
/// whole and closed; the buffer name is the path as given.
pub fn load_schema_file(path: &Path) -> Result<Arc<SourceText>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(SourceText::new(path.to_string_lossy(), &text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_load_schema_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("schema.sql");
        fs::write(&path, "CREATE TABLE t (a INT);").expect("write");

        let source = load_schema_file(&path).expect("load");
        assert_eq!(source.file_name, path.to_string_lossy());
        let text: String = source.raw.iter().collect();
        assert_eq!(text, "CREATE TABLE t (a INT);");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_schema_file(Path::new("/nonexistent/schema.sql"));
        match result {
            Err(LoadError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/schema.sql"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
