use std::io::ErrorKind;
use std::path::Path;

use crate::error::PipelineError;

/// List the files in `dir` whose extension is one of `extensions`.
///
/// Names are returned in directory-listing order. Extensions are matched
/// ASCII case-insensitively and without the leading dot.
pub fn list_datasets(dir: &Path, extensions: &[String]) -> Result<Vec<String>, PipelineError> {
    let display = dir.display().to_string();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(PipelineError::DirectoryNotFound(display));
        }
        Err(e) => {
            return Err(PipelineError::LoadFailure {
                file: display,
                message: e.to_string(),
            });
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::LoadFailure {
            file: display.clone(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if !matches {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("Skipping non UTF-8 file name {raw:?}"),
        }
    }

    if names.is_empty() {
        return Err(PipelineError::EmptyDirectory(display));
    }
    Ok(names)
}

/// Pick the requested file if it is still present, else the first one.
pub fn select_dataset<'a>(available: &'a [String], requested: Option<&str>) -> Option<&'a str> {
    requested
        .and_then(|want| available.iter().find(|name| name.as_str() == want))
        .or_else(|| available.first())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn csv_ext() -> Vec<String> {
        vec!["csv".to_string()]
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let err = list_datasets(&missing, &csv_ext()).unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_directory_without_csv_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.csv")).unwrap();

        let err = list_datasets(temp_dir.path(), &csv_ext()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDirectory(_)));
        assert!(err.to_string().starts_with("No datasets found"));
    }

    #[test]
    fn test_lists_only_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("INFY.csv"), "Date\n").unwrap();
        std::fs::write(temp_dir.path().join("TCS.CSV"), "Date\n").unwrap();
        std::fs::write(temp_dir.path().join("readme.md"), "").unwrap();

        let mut names = list_datasets(temp_dir.path(), &csv_ext()).unwrap();
        names.sort();
        assert_eq!(names, vec!["INFY.csv", "TCS.CSV"]);
    }

    #[test]
    fn test_select_dataset_falls_back_to_first() {
        let available = vec!["a.csv".to_string(), "b.csv".to_string()];
        assert_eq!(select_dataset(&available, Some("b.csv")), Some("b.csv"));
        assert_eq!(select_dataset(&available, Some("gone.csv")), Some("a.csv"));
        assert_eq!(select_dataset(&available, None), Some("a.csv"));
        assert_eq!(select_dataset(&[], None), None);
    }
}
