//! Property-based tests for the pending-change queue

use proptest::prelude::*;
use std::collections::HashMap;

use taskboard_sync::offline::PendingChanges;

#[derive(Debug, Clone, Copy)]
enum Op {
    Upsert(u64),
    Delete(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(1u64..20).prop_map(Op::Upsert), (1u64..20).prop_map(Op::Delete)]
}

proptest! {
    /// An id sits in at most one set, and the last call for it decides which
    #[test]
    fn test_last_call_wins(ops in prop::collection::vec(op(), 0..100)) {
        let mut pending = PendingChanges::new();
        let mut last: HashMap<u64, bool> = HashMap::new();
        for op in &ops {
            match *op {
                Op::Upsert(id) => {
                    pending.queue_upsert(id);
                    last.insert(id, true);
                }
                Op::Delete(id) => {
                    pending.queue_delete(id);
                    last.insert(id, false);
                }
            }
        }

        for id in 1u64..20 {
            prop_assert!(!(pending.is_pending_upsert(id) && pending.is_pending_delete(id)));
            match last.get(&id) {
                Some(true) => prop_assert!(pending.is_pending_upsert(id)),
                Some(false) => prop_assert!(pending.is_pending_delete(id)),
                None => prop_assert!(!pending.is_pending_upsert(id) && !pending.is_pending_delete(id)),
            }
        }
        prop_assert_eq!(pending.len(), last.len());
    }

    /// Acknowledging a snapshot never drops a change queued after it was taken
    #[test]
    fn test_acknowledge_keeps_later_changes(
        before in prop::collection::vec(op(), 0..40),
        after in prop::collection::vec(op(), 0..40),
    ) {
        let mut pending = PendingChanges::new();
        let apply = |pending: &mut PendingChanges, ops: &[Op]| {
            for op in ops {
                match *op {
                    Op::Upsert(id) => pending.queue_upsert(id),
                    Op::Delete(id) => pending.queue_delete(id),
                };
            }
        };
        apply(&mut pending, &before);
        let snapshot = pending.snapshot();
        apply(&mut pending, &after);
        let expected = {
            let mut only_after = PendingChanges::new();
            apply(&mut only_after, &after);
            only_after
        };

        pending.acknowledge(&snapshot);

        prop_assert_eq!(pending.upserts(), expected.upserts());
        prop_assert_eq!(pending.deletes(), expected.deletes());
    }
}
