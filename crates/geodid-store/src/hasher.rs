use geodid_types::Cid;

/// Domain-separated BLAKE3 content hasher producing [`Cid`]s.
///
/// The domain tag is prepended to every hash computation so that hashes from
/// different domains never collide on identical bytes.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for staged blobs (documents and assets alike).
    pub const BLOB: Self = Self {
        domain: "geodid-blob-v1",
    };

    /// Multibase-style prefix marking a BLAKE3 hex digest.
    pub const PREFIX: &'static str = "b3";

    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    pub fn hash(&self, data: &[u8]) -> Cid {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Cid::new(format!(
            "{}{}",
            Self::PREFIX,
            hex::encode(hasher.finalize().as_bytes())
        ))
    }

    /// Verify that `data` hashes to `expected`.
    pub fn verify(&self, data: &[u8], expected: &Cid) -> bool {
        self.hash(data) == *expected
    }

    pub fn domain(&self) -> &str {
        self.domain
    }
}
