//! Streamed content hashing
//!
//! Files are read in fixed-size chunks and fed to BLAKE3, so hashing a large
//! file never holds more than one chunk in memory.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::HASH_CHUNK_SIZE;

/// 256-bit BLAKE3 digest of a file's content
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}

	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}
}

impl From<blake3::Hash> for ContentHash {
	fn from(h: blake3::Hash) -> Self {
		ContentHash(*h.as_bytes())
	}
}

impl fmt::Display for ContentHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_hex())
	}
}

impl fmt::Debug for ContentHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ContentHash({})", &self.to_hex()[..16])
	}
}

/// Hash everything readable from `reader`, `HASH_CHUNK_SIZE` bytes at a time
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<ContentHash> {
	let mut hasher = blake3::Hasher::new();
	let mut buf = vec![0u8; HASH_CHUNK_SIZE];
	loop {
		let n = match reader.read(&mut buf) {
			Ok(0) => break,
			Ok(n) => n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		};
		hasher.update(&buf[..n]);
	}
	Ok(hasher.finalize().into())
}

/// Hash the content of the file at `path`
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
	let file = File::open(path)?;
	hash_reader(file)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;
	use tempfile::TempDir;

	#[test]
	fn test_hash_matches_one_shot() {
		let data = vec![0x5Au8; HASH_CHUNK_SIZE * 3 + 17];
		let streamed = hash_reader(Cursor::new(&data)).unwrap();
		assert_eq!(streamed, ContentHash::from(blake3::hash(&data)));
	}

	#[test]
	fn test_hash_file_differs_by_content() {
		let dir = TempDir::new().unwrap();
		let a = dir.path().join("a.txt");
		let b = dir.path().join("b.txt");
		std::fs::write(&a, b"hello").unwrap();
		std::fs::write(&b, b"hellp").unwrap();

		assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
		assert_eq!(hash_file(&a).unwrap(), hash_file(&a).unwrap());
	}

	#[test]
	fn test_hash_missing_file_is_error() {
		let dir = TempDir::new().unwrap();
		let err = hash_file(&dir.path().join("missing")).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}

	#[test]
	fn test_hex_display() {
		let h = hash_reader(Cursor::new(b"")).unwrap();
		assert_eq!(h.to_string().len(), 64);
		assert_eq!(h.to_string(), blake3::hash(b"").to_hex().to_string());
	}
}
