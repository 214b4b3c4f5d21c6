//! Identity handles for scopes and types.
//!
//! Both are plain `u32` newtypes. Equality is identity: two handles are the
//! same scope (or type) exactly when their raw values match.

use std::fmt;

/// Opaque identity of a lexical scope.
///
/// Issued by the scope manager; the variable store never creates or
/// destroys scopes, it only compares these handles.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The outermost scope of a session.
    pub const GLOBAL: ScopeId = ScopeId(0);

    /// Create a new `ScopeId` from a raw value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the next handle in issue order, or `None` on exhaustion.
    #[inline]
    pub const fn successor(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::GLOBAL {
            write!(f, "ScopeId::GLOBAL")
        } else {
            write!(f, "ScopeId({})", self.0)
        }
    }
}

/// Handle to a descriptor registered in a [`TypeTable`](crate::TypeTable).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// Create a new `TypeId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index into the table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
