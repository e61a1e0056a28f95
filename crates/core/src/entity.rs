//! Entity trait: identity that persists across state changes.

/// Entity marker + minimal interface.
///
/// Two entities with the same id are the same entity, regardless of how their
/// attributes have since diverged.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
