//! Domain entities produced by the mapping layer. Immutable once mapped;
//! held only as long as a screen shows them, never persisted.

/// One character from the catalogue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    /// Sub-species or variant ("Genetic experiment", "Clone"). Often empty.
    pub kind: String,
    pub gender: String,
    pub origin: Origin,
    pub location: Location,
    /// Avatar URL. Kept for completeness; never fetched.
    pub image: String,
    /// URLs of the episodes the character appears in.
    pub episodes: Vec<String>,
    /// Canonical URL of this record.
    pub url: String,
    /// Creation timestamp as the backend serves it (RFC 3339).
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Origin {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Location {
    pub name: String,
    pub url: String,
}
