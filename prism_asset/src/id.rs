use static_assertions::assert_eq_size;
use std::fmt::{Debug, Display, Formatter};

/// Identifier of a resource inside one kind of a [`ResourceStore`](crate::store::ResourceStore).
///
/// Ids are scoped per [`ResourceKind`](crate::ResourceKind): Mesh `#3` and Shader `#3` are
/// unrelated. Every negative value is invalid, [`ResourceId::INVALID`] is the canonical
/// "unset" marker.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ResourceId(i64);

assert_eq_size!(ResourceId, i64);

impl ResourceId {
    pub const INVALID: ResourceId = ResourceId(-1);

    #[inline]
    pub const fn new(raw: i64) -> Self {
        ResourceId(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// `Some(self)` for a valid id.
    #[inline]
    pub const fn valid(self) -> Option<ResourceId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        ResourceId::INVALID
    }
}

impl From<Option<ResourceId>> for ResourceId {
    fn from(value: Option<ResourceId>) -> Self {
        value.unwrap_or(ResourceId::INVALID)
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#invalid")
        }
    }
}

impl Debug for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_ids_are_invalid() {
        assert!(!ResourceId::INVALID.is_valid());
        assert!(!ResourceId::new(-42).is_valid());
        assert!(ResourceId::new(0).is_valid());
        assert_eq!(ResourceId::new(-7).valid(), None);
        assert_eq!(ResourceId::default(), ResourceId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(ResourceId::new(3).to_string(), "#3");
        assert_eq!(ResourceId::new(-3).to_string(), "#invalid");
    }
}
