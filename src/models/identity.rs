//! Identity-or-footprint equality shared by catalog entities.

use std::fmt::Display;

/// Equality strategy for catalog entities that may not be persisted yet.
///
/// Two values are the same entity when both carry an identifier and the
/// identifiers are equal. As long as one side has no identifier, the
/// footprint (the display string) decides. Two unsaved homonyms therefore
/// compare equal.
pub trait CatalogIdentity: Display {
    /// Database identifier, `None` until the entity is saved
    fn identifier(&self) -> Option<i32>;

    /// Canonical string key, also used as the human readable label
    fn footprint(&self) -> String {
        self.to_string()
    }

    fn same_as(&self, other: &Self) -> bool {
        match (self.identifier(), other.identifier()) {
            (Some(a), Some(b)) => a == b,
            _ => self.footprint() == other.footprint(),
        }
    }
}
