//! RIVL IR - handles and descriptors shared across the interpreter.
//!
//! This crate holds the narrow interfaces the variable store consumes from
//! its collaborators:
//! - `ScopeId`: opaque identity of a lexical scope, issued by the scope manager
//! - `TypeId`: handle to a registered element type
//! - `TypeDescriptor`: member layout of an enumerated-member type
//! - `TypeTable`: registry of descriptors, keyed by name
//!
//! # Design Philosophy
//!
//! - **Handles, not references**: scopes and types are `u32` newtypes, so
//!   identity comparison is O(1) and nothing borrows across the store.
//! - **Minimal surface**: the store only needs a member count; everything
//!   else about types belongs to the evaluator.

mod ids;
mod type_table;

pub use ids::{ScopeId, TypeId};
pub use type_table::{Member, TypeDescriptor, TypeTable, TypeTableError};
