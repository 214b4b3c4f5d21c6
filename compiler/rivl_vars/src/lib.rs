//! RIVL Vars - scoped variable store for the RIVL interpreter.
//!
//! Every declared variable lives in one [`VariableStore`] owned by the
//! interpreter session. The store keeps two orderings over the same
//! entries:
//!
//! - the **global sequence**, in insertion order, used by name lookup
//! - one **scope chain** per scope, the subsequence of the global sequence
//!   whose variables share that scope
//!
//! Both chains are arena handles ([`VarId`]) owned by the store, so removal
//! of any entry relinks its neighbors without a dangling reference.
//!
//! # Usage
//!
//! ```text
//! let mut store = VariableStore::new();
//! let id = store.add(Variable::scalar("mac", Some(scope), &mac_type)?);
//! assert_eq!(store.find_by_name("mac"), Some(id));
//! for (id, var) in store.scope_iter(scope) { ... }
//! store.remove_by_name("mac");
//! ```

mod payload;
mod store;
mod variable;

pub use payload::ValuePayload;
pub use store::{Iter, ScopeIter, VarId, VariableStore};
pub use variable::{Shape, Variable, VariableError};
