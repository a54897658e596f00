//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities and sessions.
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

    /// Generate a new ULID-based entity ID.
    ///
    /// ULIDs are lexicographically sortable, which keeps `ORDER BY id`
    /// equivalent to creation order for catalog listings.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque session identifier.
    ///
    /// Uses UUID v4 so session ids carry no time component.
    #[must_use]
    pub fn generate_session_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_session_id() {
        let id_gen = IdGenerator::new();
        let sid = id_gen.generate_session_id();

        assert_eq!(sid.len(), 32); // Simple UUID without hyphens
    }
}
