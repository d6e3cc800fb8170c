use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{RdfxError, Result};
use crate::format::has_known_suffix;

/// Expand `paths` into the list of files to process.
///
/// Directories contribute their direct children with a known RDF suffix,
/// sorted by name; nested directories are not entered. Files named
/// explicitly are kept whatever their suffix. Duplicates are dropped,
/// keeping the first occurrence.
pub fn prepare_files_list<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let walker = WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name();
            for entry in walker {
                let entry = entry.map_err(|e| {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    RdfxError::io(path, source)
                })?;
                if entry.file_type().is_file() && has_known_suffix(entry.path()) {
                    let file = entry.into_path();
                    if seen.insert(file.clone()) {
                        out.push(file);
                    }
                }
            }
        } else if path.is_file() {
            if seen.insert(path.to_path_buf()) {
                out.push(path.to_path_buf());
            }
        } else {
            return Err(RdfxError::PathNotFound(path.to_path_buf()));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn expands_directory_one_level() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.ttl"), "").unwrap();
        fs::write(dir.path().join("a.rdf"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.ttl"), "").unwrap();

        let files = prepare_files_list(&[dir.path()]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.rdf"), dir.path().join("b.ttl")]
        );
    }

    #[test]
    fn keeps_explicit_files_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let ttl = dir.path().join("a.ttl");
        let txt = dir.path().join("notes.txt");
        fs::write(&ttl, "").unwrap();
        fs::write(&txt, "").unwrap();

        let files = prepare_files_list(&[
            ttl.clone(),
            txt.clone(),
            dir.path().to_path_buf(),
            ttl.clone(),
        ])
        .unwrap();
        assert_eq!(files, vec![ttl, txt]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ttl");
        let err = prepare_files_list(&[&missing]).unwrap_err();
        assert!(matches!(err, RdfxError::PathNotFound(p) if p == missing));
    }
}
