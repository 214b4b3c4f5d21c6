//! The variable record: a named binding and the payloads it owns.
//!
//! A `Variable` carries no links. Its position in the global sequence and
//! in its scope chain belongs to the [`VariableStore`](crate::VariableStore)
//! that owns it.

use rivl_ir::{ScopeId, TypeDescriptor, TypeId};

use crate::ValuePayload;

/// Whether a variable is a scalar of its element type or a fixed-size array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    /// One payload per member of the element type.
    Scalar,
    /// One payload per array element.
    Array(usize),
}

impl Shape {
    /// Number of payloads a variable of this shape holds for `ty`.
    #[inline]
    pub fn payload_count(self, ty: &TypeDescriptor) -> usize {
        match self {
            Shape::Scalar => ty.member_count(),
            Shape::Array(len) => len,
        }
    }
}

/// Error returned when a variable cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    /// Variables must be findable by name.
    #[error("variable name must not be empty")]
    EmptyName,
    /// Arrays are fixed-size and at least one element long.
    #[error("array `{0}` must have at least one element")]
    EmptyArray(Box<str>),
    /// The supplied payloads do not match the variable's shape.
    #[error("variable `{name}` expects {expected} payloads, got {found}")]
    PayloadCount {
        name: Box<str>,
        expected: usize,
        found: usize,
    },
}

/// A named binding holding one or more typed value payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    name: Box<str>,
    /// `None` is the undefined scope; such variables chain together but are
    /// never returned by scope lookup.
    scope: Option<ScopeId>,
    shape: Shape,
    element_type: TypeId,
    values: Vec<ValuePayload>,
    /// Interpreter-side cached representation, released with the variable.
    internal_value: Option<Vec<u8>>,
}

impl Variable {
    /// Declare a scalar with one empty payload per member of `ty`.
    pub fn scalar(
        name: &str,
        scope: Option<ScopeId>,
        ty: &TypeDescriptor,
    ) -> Result<Self, VariableError> {
        let values = vec![ValuePayload::new(); ty.member_count()];
        Self::with_values(name, scope, ty, Shape::Scalar, values)
    }

    /// Declare a fixed-size array of `len` empty elements.
    pub fn array(
        name: &str,
        scope: Option<ScopeId>,
        ty: &TypeDescriptor,
        len: usize,
    ) -> Result<Self, VariableError> {
        let values = vec![ValuePayload::new(); len];
        Self::with_values(name, scope, ty, Shape::Array(len), values)
    }

    /// Build a variable from pre-filled payloads, checking the count against
    /// the shape.
    pub fn with_values(
        name: &str,
        scope: Option<ScopeId>,
        ty: &TypeDescriptor,
        shape: Shape,
        values: Vec<ValuePayload>,
    ) -> Result<Self, VariableError> {
        if name.is_empty() {
            return Err(VariableError::EmptyName);
        }
        if shape == Shape::Array(0) {
            return Err(VariableError::EmptyArray(name.into()));
        }
        let expected = shape.payload_count(ty);
        if values.len() != expected {
            return Err(VariableError::PayloadCount {
                name: name.into(),
                expected,
                found: values.len(),
            });
        }
        Ok(Variable {
            name: name.into(),
            scope,
            shape,
            element_type: ty.id(),
            values,
            internal_value: None,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.shape, Shape::Array(_))
    }

    /// Element count for arrays; `None` for scalars.
    #[inline]
    pub fn array_length(&self) -> Option<usize> {
        match self.shape {
            Shape::Array(len) => Some(len),
            Shape::Scalar => None,
        }
    }

    #[inline]
    pub fn element_type(&self) -> TypeId {
        self.element_type
    }

    #[inline]
    pub fn values(&self) -> &[ValuePayload] {
        &self.values
    }

    #[inline]
    pub fn payload_count(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, index: usize) -> Option<&ValuePayload> {
        self.values.get(index)
    }

    pub fn value_mut(&mut self, index: usize) -> Option<&mut ValuePayload> {
        self.values.get_mut(index)
    }

    pub fn internal_value(&self) -> Option<&[u8]> {
        self.internal_value.as_deref()
    }

    /// Cache an internal representation, returning the one it replaces.
    pub fn set_internal_value(&mut self, bytes: Vec<u8>) -> Option<Vec<u8>> {
        self.internal_value.replace(bytes)
    }

    pub fn take_internal_value(&mut self) -> Option<Vec<u8>> {
        self.internal_value.take()
    }
}
