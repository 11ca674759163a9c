use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};

/// Hex SHA-256 of the raw image bytes (64 chars). Identifies a stored receipt.
pub fn receipt_ref(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let hash: [u8; 32] = hasher.finalize().into();
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
    pub receipt_ref: String,
    pub path: PathBuf,
}

/// Content-addressed store for captured receipt images.
/// Layout: `<root>/<first_2_hex_chars>/<full_hex>.<ext>`
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    root: PathBuf,
}

impl ReceiptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, receipt_ref: &str, ext: &str) -> PathBuf {
        let shard = receipt_ref.get(..2).unwrap_or("00");
        self.root.join(shard).join(format!("{receipt_ref}.{}", sanitize_ext(ext)))
    }

    /// Writes `data` unless an identical image is already stored.
    pub async fn put(&self, data: &[u8], ext: &str) -> io::Result<StoredReceipt> {
        let receipt_ref = receipt_ref(data);
        let path = self.path_for(&receipt_ref, ext);
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(%receipt_ref, "receipt already stored");
        } else {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, data).await?;
        }
        Ok(StoredReceipt { receipt_ref, path })
    }
}

fn sanitize_ext(ext: &str) -> String {
    let clean: String = ext
        .trim_start_matches('.')
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if clean.is_empty() { "bin".to_string() } else { clean }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_ref_known_vector() {
        assert_eq!(
            receipt_ref(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn receipt_ref_deterministic() {
        assert_eq!(receipt_ref(b"struk"), receipt_ref(b"struk"));
        assert_ne!(receipt_ref(b"struk"), receipt_ref(b"nota"));
        assert_eq!(receipt_ref(b"struk").len(), 64);
    }

    #[test]
    fn path_layout() {
        let store = ReceiptStore::new("/data/receipts");
        let path = store.path_for("abcdef12", "JPG");
        assert_eq!(path, PathBuf::from("/data/receipts/ab/abcdef12.jpg"));
    }

    #[test]
    fn ext_is_sanitized() {
        let store = ReceiptStore::new("/r");
        assert_eq!(store.path_for("ab", ".png"), PathBuf::from("/r/ab/ab.png"));
        assert_eq!(store.path_for("ab", "../x"), PathBuf::from("/r/ab/ab.x"));
        assert_eq!(store.path_for("ab", ""), PathBuf::from("/r/ab/ab.bin"));
    }

    #[tokio::test]
    async fn put_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path());

        let a = store.put(b"receipt bytes", "jpg").await.unwrap();
        let b = store.put(b"receipt bytes", "jpg").await.unwrap();

        assert_eq!(a, b);
        assert!(a.path.exists());
        assert_eq!(std::fs::read(&a.path).unwrap(), b"receipt bytes");
    }
}
