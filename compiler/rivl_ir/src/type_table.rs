//! Element-type descriptors and their registry.
//!
//! A RIVL user type is an ordered list of enumerated members. The variable
//! store only asks one question of it: how many payloads does a scalar
//! variable of this type carry? Member sizes are kept for the evaluator.

use rustc_hash::FxHashMap;

use crate::TypeId;

/// One member of an enumerated-member type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    /// Member name as written in the declaration.
    pub name: Box<str>,
    /// Size in bytes of the member's payload.
    pub size: usize,
}

impl Member {
    pub fn new(name: impl Into<Box<str>>, size: usize) -> Self {
        Member {
            name: name.into(),
            size,
        }
    }
}

/// Layout of a registered element type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    id: TypeId,
    name: Box<str>,
    members: Vec<Member>,
}

impl TypeDescriptor {
    /// Handle this descriptor is registered under.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of payloads a scalar variable of this type holds.
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Error returned by [`TypeTable::register`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeTableError {
    /// A type with this name is already registered.
    #[error("type `{0}` is already registered")]
    Duplicate(Box<str>),
    /// The table ran out of `u32` handles.
    #[error("type table exceeded capacity: {0} types")]
    Overflow(usize),
}

/// Registry of element types for one interpreter session.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    descriptors: Vec<TypeDescriptor>,
    by_name: FxHashMap<Box<str>, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new type, returning its handle.
    pub fn register(
        &mut self,
        name: &str,
        members: impl IntoIterator<Item = Member>,
    ) -> Result<TypeId, TypeTableError> {
        if self.by_name.contains_key(name) {
            return Err(TypeTableError::Duplicate(name.into()));
        }
        let raw = u32::try_from(self.descriptors.len())
            .map_err(|_| TypeTableError::Overflow(self.descriptors.len()))?;
        let id = TypeId::new(raw);
        self.descriptors.push(TypeDescriptor {
            id,
            name: name.into(),
            members: members.into_iter().collect(),
        });
        self.by_name.insert(name.into(), id);
        Ok(id)
    }

    /// Resolve a handle to its descriptor.
    #[inline]
    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.descriptors.get(id.index())
    }

    /// Find a descriptor by its declared name.
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
