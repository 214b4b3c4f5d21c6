//! The variable store: one arena, two chains.
//!
//! Entries live in a slot arena addressed by generational [`VarId`]s. Each
//! linked entry carries two links:
//!
//! - `next`: its successor in the global insertion-ordered sequence
//! - `next_by_scope`: its successor among the variables sharing its scope
//!
//! There is no table of scope heads. The head of a scope chain is the first
//! variable of that scope in global order, found by scanning.
//!
//! # Invariants
//!
//! - Every linked entry appears exactly once in the global sequence.
//! - Each scope chain is the global sequence restricted to that scope, in
//!   the same order, with no gaps.
//! - Only the last variable of a scope has `next_by_scope == None`.
//!
//! Removal restores all three by relinking the removed entry's predecessor
//! in each chain. Freed slots bump their generation, so a handle to a
//! removed variable never resolves again. A slot that exhausts its
//! generations stays empty instead of wrapping.

use rivl_ir::ScopeId;
use tracing::{debug, trace};

use crate::Variable;

/// Handle to a variable linked into a [`VariableStore`].
///
/// Valid until the variable is removed; afterwards every lookup with it
/// returns `None`, even once the slot is reused.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VarId {
    index: u32,
    generation: u32,
}

impl VarId {
    /// Slot index in the store's arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

/// A linked variable and its two chain links.
#[derive(Debug)]
struct Entry {
    var: Variable,
    next: Option<VarId>,
    next_by_scope: Option<VarId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Convert an arena length to a `u32` slot index.
///
/// # Panics
/// Panics if the arena exceeds `u32::MAX` slots.
#[inline]
fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(index) => index,
        Err(_) => panic!("{what} exceeded u32 capacity: {len}"),
    }
}

/// Store of every variable declared in one interpreter session.
///
/// All operations are synchronous and bounded by a scan of the current
/// entries. Dropping the store releases every variable it owns.
#[derive(Debug, Default)]
pub struct VariableStore {
    slots: Vec<Slot>,
    /// Indices of empty slots, reused before the arena grows.
    free: Vec<u32>,
    /// Head of the global sequence.
    head: Option<VarId>,
    len: usize,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` variables.
    pub fn with_capacity(capacity: usize) -> Self {
        VariableStore {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of linked variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    fn entry(&self, id: VarId) -> Option<&Entry> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    #[inline]
    fn entry_mut(&mut self, id: VarId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Resolve a handle to its variable.
    #[inline]
    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.entry(id).map(|entry| &entry.var)
    }

    /// Resolve a handle for in-place updates of the variable's payloads.
    ///
    /// Name and scope are fixed once linked, so the chains stay valid.
    #[inline]
    pub fn get_mut(&mut self, id: VarId) -> Option<&mut Variable> {
        self.entry_mut(id).map(|entry| &mut entry.var)
    }

    /// Successor of `id` in the global sequence.
    #[inline]
    pub fn next(&self, id: VarId) -> Option<VarId> {
        self.entry(id)?.next
    }

    /// Successor of `id` among the variables of its scope.
    #[inline]
    pub fn next_in_scope(&self, id: VarId) -> Option<VarId> {
        self.entry(id)?.next_by_scope
    }

    /// Place `entry` in a free slot, growing the arena if none is free.
    fn alloc(&mut self, entry: Entry) -> VarId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.entry = Some(entry);
                return VarId {
                    index,
                    generation: slot.generation,
                };
            }
        }
        let index = to_u32(self.slots.len(), "variable store");
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        VarId {
            index,
            generation: 0,
        }
    }

    /// Empty the slot behind `id` and retire its generation.
    ///
    /// After `u32::MAX` reuses the slot is never handed out again.
    fn release(&mut self, id: VarId) -> Option<Variable> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        // A slot whose generation cannot advance is retired for good.
        if let Some(generation) = slot.generation.checked_add(1) {
            slot.generation = generation;
            self.free.push(id.index);
        }
        self.len -= 1;
        Some(entry.var)
    }

    /// Link a variable at the tail of the global sequence and of its scope
    /// chain. The store takes ownership.
    #[tracing::instrument(level = "trace", skip_all, fields(name = variable.name()))]
    pub fn add(&mut self, variable: Variable) -> VarId {
        let scope = variable.scope();

        // One pass finds both tails: the last entry overall and the last
        // entry sharing this scope.
        let mut global_tail = None;
        let mut scope_tail = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(entry) = self.entry(id) else { break };
            if entry.var.scope() == scope {
                scope_tail = Some(id);
            }
            global_tail = Some(id);
            cursor = entry.next;
        }

        let id = self.alloc(Entry {
            var: variable,
            next: None,
            next_by_scope: None,
        });
        self.len += 1;

        match global_tail.and_then(|tail| self.entry_mut(tail)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
        match scope_tail.and_then(|tail| self.entry_mut(tail)) {
            Some(tail) => tail.next_by_scope = Some(id),
            None => trace!(?scope, "new scope chain"),
        }

        trace!(?id, len = self.len, "variable linked");
        id
    }

    /// First variable in global order named exactly `name`.
    ///
    /// An empty name never matches.
    pub fn find_by_name(&self, name: &str) -> Option<VarId> {
        if name.is_empty() {
            return None;
        }
        self.iter()
            .find(|(_, var)| var.name() == name)
            .map(|(id, _)| id)
    }

    /// First variable in global order belonging to `scope`: the head of
    /// that scope's chain.
    ///
    /// The undefined scope (`None`) is never found.
    pub fn get_by_scope(&self, scope: Option<ScopeId>) -> Option<VarId> {
        let scope = scope?;
        self.iter()
            .find(|(_, var)| var.scope() == Some(scope))
            .map(|(id, _)| id)
    }

    /// Remove and destroy the first variable in global order named `name`.
    ///
    /// A missing name (or an empty store) leaves the store untouched.
    /// Returns whether a variable was removed; callers that only need the
    /// no-op semantics may ignore it.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        let Some(target) = self.find_by_name(name) else {
            trace!("no such variable");
            return false;
        };
        let removed = self.remove(target);
        let found = removed.is_some();
        Self::destroy(removed);
        found
    }

    /// Unlink the variable behind `id` from both chains and hand it back.
    ///
    /// Returns `None` if `id` is stale.
    pub fn remove(&mut self, target: VarId) -> Option<Variable> {
        let (next, next_by_scope) = {
            let entry = self.entry(target)?;
            (entry.next, entry.next_by_scope)
        };

        // Global chain: the head unlinks directly, anything else through
        // its predecessor.
        if self.head == Some(target) {
            self.head = next;
        } else {
            let mut cursor = self.head;
            while let Some(id) = cursor {
                let Some(entry) = self.entry_mut(id) else { break };
                if entry.next == Some(target) {
                    entry.next = next;
                    break;
                }
                cursor = entry.next;
            }
        }

        // Scope chain: a chain head has no predecessor. Its successor then
        // becomes the first of the scope in global order.
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(entry) = self.entry_mut(id) else { break };
            if entry.next_by_scope == Some(target) {
                entry.next_by_scope = next_by_scope;
                break;
            }
            cursor = entry.next;
        }

        let removed = self.release(target);
        if let Some(var) = &removed {
            debug!(name = var.name(), len = self.len, "variable unlinked");
        }
        removed
    }

    /// Remove and destroy every variable of `scope`. Returns how many were
    /// removed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn remove_scope(&mut self, scope: ScopeId) -> usize {
        let members: Vec<VarId> = self.scope_iter(scope).map(|(id, _)| id).collect();
        for &id in &members {
            Self::destroy(self.remove(id));
        }
        members.len()
    }

    /// Release a variable: its internal value, every payload buffer, the
    /// payload sequence, then the record itself. `None` is a no-op.
    pub fn destroy(variable: Option<Variable>) {
        let Some(variable) = variable else { return };
        trace!(
            name = variable.name(),
            payloads = variable.payload_count(),
            internal = variable.internal_value().is_some(),
            "destroying variable"
        );
        drop(variable);
    }

    /// Destroy every variable and reset the store to its initial state.
    ///
    /// Walks the global sequence only; scope chains are not repaired since
    /// every entry goes.
    #[tracing::instrument(level = "debug", skip(self), fields(len = self.len))]
    pub fn destroy_all(&mut self) {
        let mut cursor = self.head.take();
        while let Some(id) = cursor {
            cursor = self.next(id);
            Self::destroy(self.release(id));
        }
    }

    /// Iterate over every variable in global insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            cursor: self.head,
        }
    }

    /// Iterate over the variables of `scope` in global insertion order,
    /// starting at the chain head and following `next_by_scope`.
    pub fn scope_iter(&self, scope: ScopeId) -> ScopeIter<'_> {
        ScopeIter {
            store: self,
            cursor: self.get_by_scope(Some(scope)),
        }
    }
}

/// Iterator over the global sequence. See [`VariableStore::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    store: &'a VariableStore,
    cursor: Option<VarId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (VarId, &'a Variable);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let entry = self.store.entry(id)?;
        self.cursor = entry.next;
        Some((id, &entry.var))
    }
}

/// Iterator over one scope chain. See [`VariableStore::scope_iter`].
#[derive(Clone, Debug)]
pub struct ScopeIter<'a> {
    store: &'a VariableStore,
    cursor: Option<VarId>,
}

impl<'a> Iterator for ScopeIter<'a> {
    type Item = (VarId, &'a Variable);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let entry = self.store.entry(id)?;
        self.cursor = entry.next_by_scope;
        Some((id, &entry.var))
    }
}

impl<'a> IntoIterator for &'a VariableStore {
    type Item = (VarId, &'a Variable);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
