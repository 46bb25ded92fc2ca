//! BLAKE3 content hashing for unchanged-entry detection

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn hash_reader(hasher: &mut Hasher, path: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..bytes_read]);
    }
}

/// Calculate BLAKE3 hash of a directory's contents
///
/// Hashes every file's relative path and contents, sorted by path, so two
/// trees with the same files hash the same regardless of where they live.
pub fn hash_directory(path: &Path) -> io::Result<String> {
    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", path.display()),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut hasher = Hasher::new();
    for file_path in files {
        let relative = file_path.strip_prefix(path).unwrap_or(&file_path);
        hasher.update(crate::path_utils::to_forward_slashes(relative).as_bytes());
        hasher.update(b"\0");
        hash_reader(&mut hasher, &file_path)?;
        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Whether two directories hold identical content; a missing side is "different"
pub fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    if !a.is_dir() || !b.is_dir() {
        return Ok(false);
    }
    Ok(hash_directory(a)? == hash_directory(b)?)
}
