//! Session context: owns the variable store for one interpreter run.
//!
//! The evaluator declares variables through the session, which resolves
//! element types by name and tags each variable with the current scope.
//! Leaving a scope removes its variables; ending the session destroys the
//! rest.

use rivl_ir::{Member, ScopeId, TypeDescriptor, TypeId, TypeTable, TypeTableError};
use rivl_vars::{VarId, Variable, VariableError, VariableStore};
use tracing::{debug, trace};

use crate::ScopeStack;

/// Tunables for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Expected number of live variables; pre-sizes the store.
    pub variable_capacity: usize,
    /// Deepest scope nesting allowed, counting the global scope.
    pub max_scope_depth: usize,
    /// Log each variable destroyed when a block is left.
    pub log_scope_removals: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            variable_capacity: 64,
            max_scope_depth: 256,
            log_scope_removals: false,
        }
    }
}

/// Error returned by session-level declarations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown type `{0}`")]
    UnknownType(Box<str>),
    #[error("variable `{0}` is already declared in this scope")]
    Redeclared(Box<str>),
    #[error("scope nesting exceeds {0} levels")]
    ScopeDepth(usize),
    #[error("session ran out of scope handles")]
    ScopesExhausted,
    #[error(transparent)]
    Variable(#[from] VariableError),
    #[error(transparent)]
    Type(#[from] TypeTableError),
}

/// One interpreter run's types, scopes, and variables.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    types: TypeTable,
    scopes: ScopeStack,
    store: VariableStore,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            config,
            types: TypeTable::new(),
            scopes: ScopeStack::new(),
            store: VariableStore::with_capacity(config.variable_capacity),
        }
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    #[inline]
    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    #[inline]
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Direct store access for the evaluator's payload writes.
    #[inline]
    pub fn store_mut(&mut self) -> &mut VariableStore {
        &mut self.store
    }

    /// Register an element type for later declarations.
    pub fn define_type(
        &mut self,
        name: &str,
        members: impl IntoIterator<Item = Member>,
    ) -> Result<TypeId, SessionError> {
        Ok(self.types.register(name, members)?)
    }

    /// Enter a nested block.
    pub fn enter_scope(&mut self) -> Result<ScopeId, SessionError> {
        if self.scopes.depth() >= self.config.max_scope_depth {
            return Err(SessionError::ScopeDepth(self.config.max_scope_depth));
        }
        let scope = self.scopes.enter().ok_or(SessionError::ScopesExhausted)?;
        trace!(?scope, depth = self.scopes.depth(), "entered scope");
        Ok(scope)
    }

    /// Leave the innermost block, destroying the variables declared in it.
    ///
    /// Returns the scope left and how many variables went with it, or
    /// `None` at the global scope.
    pub fn leave_scope(&mut self) -> Option<(ScopeId, usize)> {
        let scope = self.scopes.leave()?;
        if self.config.log_scope_removals {
            for (id, var) in self.store.scope_iter(scope) {
                debug!(?scope, ?id, name = var.name(), "removing scoped variable");
            }
        }
        let removed = self.store.remove_scope(scope);
        trace!(?scope, removed, "left scope");
        Some((scope, removed))
    }

    /// Declare a scalar of type `type_name` in the current scope.
    pub fn declare_scalar(&mut self, name: &str, type_name: &str) -> Result<VarId, SessionError> {
        self.check_redeclared(name)?;
        let ty = self.resolve_type(type_name)?;
        let var = Variable::scalar(name, Some(self.scopes.current()), ty)?;
        Ok(self.store.add(var))
    }

    /// Declare a fixed-size array of type `type_name` in the current scope.
    pub fn declare_array(
        &mut self,
        name: &str,
        type_name: &str,
        len: usize,
    ) -> Result<VarId, SessionError> {
        self.check_redeclared(name)?;
        let ty = self.resolve_type(type_name)?;
        let var = Variable::array(name, Some(self.scopes.current()), ty, len)?;
        Ok(self.store.add(var))
    }

    /// Declare a built-in scalar outside every lexical scope.
    ///
    /// Built-ins live in the undefined scope: no block owns them, so only
    /// [`Session::shutdown`] or an explicit removal destroys them.
    pub fn declare_builtin(&mut self, name: &str, type_name: &str) -> Result<VarId, SessionError> {
        if self
            .store
            .iter()
            .any(|(_, var)| var.scope().is_none() && var.name() == name)
        {
            return Err(SessionError::Redeclared(name.into()));
        }
        let ty = self.resolve_type(type_name)?;
        let var = Variable::scalar(name, None, ty)?;
        Ok(self.store.add(var))
    }

    /// Resolve `name` from the innermost live scope outwards, then among
    /// built-ins and anything else linked outside the scope stack.
    pub fn lookup(&self, name: &str) -> Option<VarId> {
        self.scopes
            .innermost_first()
            .find_map(|scope| {
                self.store
                    .scope_iter(scope)
                    .find(|(_, var)| var.name() == name)
                    .map(|(id, _)| id)
            })
            .or_else(|| self.store.find_by_name(name))
    }

    /// Remove the first variable named `name`, in global declaration order.
    pub fn remove(&mut self, name: &str) -> bool {
        self.store.remove_by_name(name)
    }

    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.store.get(id)
    }

    pub fn get_mut(&mut self, id: VarId) -> Option<&mut Variable> {
        self.store.get_mut(id)
    }

    /// Destroy every variable and return to the global scope.
    pub fn shutdown(&mut self) {
        while self.scopes.leave().is_some() {}
        if !self.store.is_empty() {
            debug!(len = self.store.len(), "destroying session variables");
            self.store.destroy_all();
        }
    }

    fn resolve_type(&self, type_name: &str) -> Result<&TypeDescriptor, SessionError> {
        self.types
            .lookup(type_name)
            .ok_or_else(|| SessionError::UnknownType(type_name.into()))
    }

    fn check_redeclared(&self, name: &str) -> Result<(), SessionError> {
        let current = self.scopes.current();
        if self
            .store
            .scope_iter(current)
            .any(|(_, var)| var.name() == name)
        {
            return Err(SessionError::Redeclared(name.into()));
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
