//! ID generation utilities.

use ulid::Ulid;

/// Suffix given to every stored media file.
pub const MEDIA_FILE_SUFFIX: &str = ".tmp";

/// Generator for storage-level identifiers.
///
/// Row ids are assigned by the database; this only names things that live
/// outside it, such as uploaded files.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs sort by creation time and carry 80 random bits, so two uploads in
    /// the same millisecond still get distinct names.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a unique file name for an uploaded media blob.
    #[must_use]
    pub fn media_file_name(&self) -> String {
        format!("{}{MEDIA_FILE_SUFFIX}", self.generate())
    }
}
