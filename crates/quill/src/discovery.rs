//! Collect the JavaScript files named on the command line.

use std::path::{Path, PathBuf};

/// Expand `paths` into the files to format.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked recursively for `.js` files, skipping hidden entries, and each
/// directory's files come back sorted.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            discover_recursive(path, &mut found)
                .map_err(|e| format!("Failed to walk directory '{}': {}", path.display(), e))?;
            found.sort();
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(format!("'{}' does not exist", path.display()));
        }
    }
    Ok(files)
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry_path.is_dir() {
            discover_recursive(&entry_path, files)?;
        } else if entry_path.extension().and_then(|e| e.to_str()) == Some("js") {
            files.push(entry_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_directories_for_js_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("lib");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(dir.path().join(".cache")).unwrap();
        std::fs::write(dir.path().join("b.js"), "").unwrap();
        std::fs::write(dir.path().join("a.js"), "").unwrap();
        std::fs::write(nested.join("c.js"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();
        std::fs::write(dir.path().join(".cache").join("d.js"), "").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.js"),
                PathBuf::from("b.js"),
                PathBuf::from("lib").join("c.js"),
            ]
        );
    }

    #[test]
    fn explicit_files_keep_their_order() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("z.mjs");
        let first = dir.path().join("y.js");
        std::fs::write(&second, "").unwrap();
        std::fs::write(&first, "").unwrap();
        let files = collect_files(&[second.clone(), first.clone()]).unwrap();
        assert_eq!(files, vec![second, first]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_files(&[dir.path().join("nope.js")]).unwrap_err();
        assert!(err.contains("does not exist"), "{err}");
    }
}
