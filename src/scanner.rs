use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Error;
use crate::language::LanguageTable;
use crate::registry::SourceFile;

/// Expand source arguments into the files to parse, each paired with its
/// language. Directories are walked recursively in file-name order and keep
/// only files some language covers. An explicit file that no language covers
/// is a configuration error. The result keeps argument order, which fixes the
/// fragment order of the registry.
///
/// # Errors
///
/// Returns `Error::FileNotFound` for a missing argument, `Error::NoLanguage`
/// for an unclassifiable file argument, or `Error::Io` if a walk fails.
pub fn scan(sources: &[PathBuf], languages: &LanguageTable) -> Result<Vec<SourceFile>, Error> {
    let mut files = Vec::new();
    for source in sources {
        if source.is_dir() {
            collect_directory_sources(source, languages, &mut files)?;
        } else if source.is_file() {
            let language = languages.for_path(source)?;
            files.push(SourceFile { language, path: source.clone() });
        } else {
            return Err(Error::FileNotFound { path: source.clone() });
        }
    }
    log::debug!("scanning {} source files", files.len());
    return Ok(files);
}

/// Walk one directory, keeping files any language covers.
fn collect_directory_sources(
    dir: &Path,
    languages: &LanguageTable,
    files: &mut Vec<SourceFile>,
) -> Result<(), Error> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| return Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(language) = languages.for_path(entry.path()) else {
            continue;
        };
        files.push(SourceFile { language, path: entry.into_path() });
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(files: &[SourceFile]) -> Vec<String> {
        return files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
    }

    #[test]
    fn directories_keep_only_known_languages_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        for name in ["b.rs", "a.py", "notes.txt", "nested/c.go"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let table = LanguageTable::builtin().unwrap();
        let files = scan(&[dir.path().to_path_buf()], &table).unwrap();
        assert_eq!(names(&files), vec!["a.py", "b.rs", "c.go"]);
        assert_eq!(files[2].language.name, "go");
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("z.rs");
        let first = dir.path().join("a.sh");
        std::fs::write(&second, "").unwrap();
        std::fs::write(&first, "").unwrap();
        let table = LanguageTable::builtin().unwrap();
        let files = scan(&[second, first], &table).unwrap();
        assert_eq!(names(&files), vec!["z.rs", "a.sh"]);
    }

    #[test]
    fn explicit_unknown_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "").unwrap();
        let table = LanguageTable::builtin().unwrap();
        assert!(matches!(scan(&[path], &table).unwrap_err(), Error::NoLanguage { .. }));
    }

    #[test]
    fn missing_argument_is_an_error() {
        let table = LanguageTable::builtin().unwrap();
        let err = scan(&[PathBuf::from("no/such/dir")], &table).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
