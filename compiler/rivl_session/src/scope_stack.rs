//! Stack of live lexical scopes.
//!
//! Issues fresh [`ScopeId`]s as blocks are entered. Handles are never
//! reused within a session, so a scope that has been left can never alias
//! a newer one in the variable store.

use rivl_ir::ScopeId;
use smallvec::SmallVec;

/// Live scopes, innermost last. The global scope is always at the bottom.
#[derive(Clone, Debug)]
pub struct ScopeStack {
    stack: SmallVec<[ScopeId; 8]>,
    /// Next handle to issue; `None` once the `u32` space is exhausted.
    next: Option<ScopeId>,
}

impl ScopeStack {
    pub fn new() -> Self {
        let mut stack = SmallVec::new();
        stack.push(ScopeId::GLOBAL);
        ScopeStack {
            stack,
            next: ScopeId::GLOBAL.successor(),
        }
    }

    /// Enter a new innermost scope.
    ///
    /// Returns `None` if the session has run out of scope handles.
    pub fn enter(&mut self) -> Option<ScopeId> {
        let scope = self.next?;
        self.next = scope.successor();
        self.stack.push(scope);
        Some(scope)
    }

    /// Leave the innermost scope. The global scope is never left.
    pub fn leave(&mut self) -> Option<ScopeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    #[inline]
    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::GLOBAL)
    }

    #[inline]
    pub fn global(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// Number of live scopes, including the global scope.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Live scopes from innermost to global.
    pub fn innermost_first(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.stack.iter().rev().copied()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
