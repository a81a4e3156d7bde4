//! Randomized session-store sequences

use crate::chat::store::{ChatSessionStore, PendingSend, SendStart};
use crate::test_utils::memory_store;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create,
    Delete(usize),
    DeleteUnknown,
    Switch(usize),
    Rename(usize, String),
    Clear,
    Begin(String),
    Complete(usize, bool),
    Abandon(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        2 => any::<usize>().prop_map(Op::Delete),
        1 => Just(Op::DeleteUnknown),
        2 => any::<usize>().prop_map(Op::Switch),
        1 => (any::<usize>(), "[a-zA-Z ]{0,40}").prop_map(|(i, title)| Op::Rename(i, title)),
        1 => Just(Op::Clear),
        3 => "[a-zA-Z0-9 *.]{0,60}".prop_map(Op::Begin),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(i, ok)| Op::Complete(i, ok)),
        1 => any::<usize>().prop_map(Op::Abandon),
    ]
}

/// Apply `op`, resolving indexes against the current sessions or pending sends
fn apply(store: &mut ChatSessionStore, pending: &mut Vec<PendingSend>, op: Op) {
    let ids: Vec<String> = store.sessions().iter().map(|s| s.id.clone()).collect();
    let pick = |i: usize| (!ids.is_empty()).then(|| ids[i % ids.len()].clone());

    match op {
        Op::Create => {
            store.create_session().unwrap();
        }
        Op::Delete(i) => {
            if let Some(id) = pick(i) {
                store.delete_session(&id).unwrap();
            }
        }
        Op::DeleteUnknown => assert!(store.delete_session("missing").is_err()),
        Op::Switch(i) => {
            if let Some(id) = pick(i) {
                store.switch_session(&id).unwrap();
            }
        }
        Op::Rename(i, title) => {
            if let Some(id) = pick(i) {
                store.rename_session(&id, &title).unwrap();
            }
        }
        Op::Clear => store.clear_active_session().unwrap(),
        Op::Begin(text) => {
            if let SendStart::Pending(p) = store.begin_send(&text).unwrap() {
                pending.push(p);
            }
        }
        Op::Complete(i, ok) => {
            if !pending.is_empty() {
                let p = pending.remove(i % pending.len());
                if ok {
                    store.complete_send(p, Ok("* **Sure**".to_string())).unwrap();
                } else {
                    assert!(store
                        .complete_send(p, Err(anyhow::anyhow!("quota")))
                        .is_err());
                }
            }
        }
        Op::Abandon(i) => {
            if !pending.is_empty() {
                let p = pending.remove(i % pending.len());
                store.abandon_send(p.session_id());
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_active_id_names_a_present_session(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut store, _, clock) = memory_store(0);
        let mut pending = Vec::new();

        for op in ops {
            clock.advance(1);
            apply(&mut store, &mut pending, op);
            match store.active_id() {
                Some(id) => prop_assert!(store.session(id).is_some()),
                None => prop_assert!(store.sessions().is_empty()),
            }
        }
    }

    #[test]
    fn prop_reload_reproduces_sessions_and_active_id(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut store, storage, clock) = memory_store(0);
        let mut pending = Vec::new();

        for op in ops {
            clock.advance(1);
            apply(&mut store, &mut pending, op);

            let reloaded = ChatSessionStore::load(Box::new(storage.clone()));
            prop_assert_eq!(reloaded.sessions(), store.sessions());
            prop_assert_eq!(reloaded.active_id(), store.active_id());
        }
    }
}
