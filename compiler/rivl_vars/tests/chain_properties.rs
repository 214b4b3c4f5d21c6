//! Property-based tests for the variable store.
//!
//! Random sequences of adds and removals run against both the store and a
//! plain `Vec` model of the global sequence. After every step:
//! 1. the global sequence matches the model in order and length
//! 2. every scope chain, the undefined scope included, is the model
//!    filtered to that scope
//! 3. name lookup finds the first matching entry of the model

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    reason = "Tests can panic; proptest macros generate these patterns"
)]

use proptest::prelude::*;
use rivl_ir::{Member, ScopeId, TypeDescriptor, TypeTable};
use rivl_vars::{Variable, VariableStore};

const NAMES: [&str; 5] = ["x", "y", "mac", "port", "retries"];
const SCOPES: u32 = 3;

#[derive(Clone, Debug)]
enum Op {
    Add { name: usize, scope: Option<u32> },
    RemoveByName(usize),
    RemoveScope(u32),
    DestroyAll,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..NAMES.len(), prop::option::weighted(0.9, 1..=SCOPES))
            .prop_map(|(name, scope)| Op::Add { name, scope }),
        3 => (0..NAMES.len()).prop_map(Op::RemoveByName),
        1 => (1..=SCOPES).prop_map(Op::RemoveScope),
        1 => Just(Op::DestroyAll),
    ]
}

fn pair_type() -> TypeTable {
    let mut table = TypeTable::new();
    table
        .register("Pair", [Member::new("lo", 1), Member::new("hi", 1)])
        .unwrap();
    table
}

fn apply(
    store: &mut VariableStore,
    model: &mut Vec<(&'static str, Option<ScopeId>)>,
    ty: &TypeDescriptor,
    op: &Op,
) {
    match *op {
        Op::Add { name, scope } => {
            let scope = scope.map(ScopeId::new);
            store.add(Variable::scalar(NAMES[name], scope, ty).unwrap());
            model.push((NAMES[name], scope));
        }
        Op::RemoveByName(name) => {
            let position = model.iter().position(|&(n, _)| n == NAMES[name]);
            let removed = store.remove_by_name(NAMES[name]);
            assert_eq!(removed, position.is_some());
            if let Some(position) = position {
                model.remove(position);
            }
        }
        Op::RemoveScope(scope) => {
            let scope = ScopeId::new(scope);
            let before = model.len();
            model.retain(|&(_, s)| s != Some(scope));
            assert_eq!(store.remove_scope(scope), before - model.len());
        }
        Op::DestroyAll => {
            store.destroy_all();
            model.clear();
        }
    }
}

fn check(store: &VariableStore, model: &[(&'static str, Option<ScopeId>)]) {
    let global: Vec<_> = store
        .iter()
        .map(|(_, var)| (var.name(), var.scope()))
        .collect();
    assert_eq!(global, model, "global sequence diverged from model");
    assert_eq!(store.len(), model.len());
    assert_eq!(store.is_empty(), model.is_empty());

    for raw in 1..=SCOPES {
        let scope = ScopeId::new(raw);
        let expected: Vec<&str> = model
            .iter()
            .filter(|&&(_, s)| s == Some(scope))
            .map(|&(n, _)| n)
            .collect();

        // Walk the chain by hand, the way the evaluator does.
        let mut walked = Vec::new();
        let mut cursor = store.get_by_scope(Some(scope));
        while let Some(id) = cursor {
            walked.push(store.get(id).unwrap().name());
            cursor = store.next_in_scope(id);
        }
        assert_eq!(walked, expected, "chain of {scope:?}");
    }

    // The undefined scope has no lookup entry point; start from its first
    // member in global order instead.
    let expected: Vec<&str> = model
        .iter()
        .filter(|&&(_, s)| s.is_none())
        .map(|&(n, _)| n)
        .collect();
    let mut walked = Vec::new();
    let mut cursor = store
        .iter()
        .find(|(_, var)| var.scope().is_none())
        .map(|(id, _)| id);
    while let Some(id) = cursor {
        walked.push(store.get(id).unwrap().name());
        cursor = store.next_in_scope(id);
    }
    assert_eq!(walked, expected, "chain of the undefined scope");
    assert_eq!(store.get_by_scope(None), None);

    for name in NAMES {
        let found = store.find_by_name(name).map(|id| {
            let var = store.get(id).unwrap();
            (var.name(), var.scope())
        });
        let expected = model.iter().find(|&&(n, _)| n == name).copied();
        assert_eq!(found, expected);
    }
}

proptest! {
    #[test]
    fn chains_match_model(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let table = pair_type();
        let ty = table.lookup("Pair").unwrap();
        let mut store = VariableStore::new();
        let mut model = Vec::new();

        for op in &ops {
            apply(&mut store, &mut model, ty, op);
            check(&store, &model);
        }
    }

    #[test]
    fn removing_global_head_keeps_chains(scopes in prop::collection::vec(1..=SCOPES, 2..16)) {
        let table = pair_type();
        let ty = table.lookup("Pair").unwrap();
        let mut store = VariableStore::new();
        let mut model = Vec::new();

        store.add(Variable::scalar("head", Some(ScopeId::new(scopes[0])), ty).unwrap());
        model.push(("head", Some(ScopeId::new(scopes[0]))));
        for &raw in &scopes[1..] {
            let scope = Some(ScopeId::new(raw));
            store.add(Variable::scalar("tail", scope, ty).unwrap());
            model.push(("tail", scope));
        }

        prop_assert!(store.remove_by_name("head"));
        model.remove(0);
        check(&store, &model);
    }
}
