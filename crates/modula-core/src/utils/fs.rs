use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files below `root` accepted by `predicate`, sorted by path.
///
/// A missing root yields nothing and a root that is a file is tested itself.
/// Entries whose name starts with `.` are skipped, directories included.
pub fn find_files<P, F>(root: P, predicate: &F) -> io::Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    F: Fn(&Path) -> bool + ?Sized,
{
    let root = root.as_ref();
    if root.is_file() {
        return Ok(if predicate(root) { vec![root.to_path_buf()] } else { Vec::new() });
    }
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if is_hidden(&path) {
                continue;
            }
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() && predicate(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Files below `root` with `extension`, compared case-insensitively
pub fn find_files_with_extension<P: AsRef<Path>>(root: P, extension: &str) -> io::Result<Vec<PathBuf>> {
    find_files(root, &|path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
