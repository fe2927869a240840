use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use bzip2::read::MultiBzDecoder;
use tracing::info;
use walkdir::{DirEntry, WalkDir};

use crate::error::{ImportError, Result};
use crate::settings::NewsmlSettings;

/// Read a whole text file and split it into lines, terminators kept.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
    let text = read_text(file, path)?;
    Ok(split_lines(&text))
}

/// Like `read_lines`, but transparently bunzips files ending in `.bz2`.
pub fn read_lines_maybe_compressed(path: &Path) -> Result<Vec<String>> {
    if !is_bzip2(path) {
        return read_lines(path);
    }
    let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
    let text = read_text(MultiBzDecoder::new(file), path)?;
    Ok(split_lines(&text))
}

fn is_bzip2(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "bz2")
}

fn read_text(mut reader: impl Read, path: &Path) -> Result<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| ImportError::io(path, e))?;
    Ok(text)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// The first `max_count` candidate NewsML files under `root`, in file-name
/// order at each directory level. The walk stops once the cap is reached;
/// excluded directories are pruned entirely.
pub fn discover_newsml(
    root: &Path,
    settings: &NewsmlSettings,
    max_count: usize,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, &settings.excluded_dirs));

    for entry in walker {
        if paths.len() >= max_count {
            break;
        }
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), &settings.extension) {
            paths.push(entry.into_path());
        }
    }

    info!(root = %root.display(), files = paths.len(), max_count, "discovered newsml candidates");
    Ok(paths)
}

fn is_excluded_dir(entry: &DirEntry, excluded: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded.iter().any(|x| x == name))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ImportError::io(path, e))
}
