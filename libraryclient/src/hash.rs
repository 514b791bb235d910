use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Prefix the registry expects on image hashes.
pub const HASH_PREFIX: &str = "sha256.";

/// Hash image content the way the registry identifies images, `sha256.<hex>`.
pub fn image_hash<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{}{}", HASH_PREFIX, hex::encode(hasher.finalize())))
}

/// Hash the image file at `path`.
pub fn image_file_hash(path: impl AsRef<Path>) -> io::Result<String> {
    let file = File::open(path)?;
    image_hash(BufReader::new(file))
}
