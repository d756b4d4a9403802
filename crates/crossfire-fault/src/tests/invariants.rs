//! Registry invariants under arbitrary operation sequences.

use std::time::Duration;

use proptest::prelude::*;

use crate::kind::FaultKind;
use crate::manager::FaultLifecycleManager;
use crate::record::{FaultRecord, FaultStatus};

#[derive(Debug, Clone)]
enum Op {
    Inject(usize, u64),
    Remove(usize),
    RemoveAll,
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..FaultKind::ALL.len(), 1u64..60).prop_map(|(k, d)| Op::Inject(k, d)),
        2 => (0..FaultKind::ALL.len()).prop_map(Op::Remove),
        1 => Just(Op::RemoveAll),
        3 => (0u64..90).prop_map(Op::Advance),
    ]
}

fn check_transition(before: &[FaultRecord], after: &[FaultRecord]) {
    assert!(after.len() >= before.len(), "registry shrank");
    for (old, new) in before.iter().zip(after) {
        assert_eq!(old.id, new.id, "insertion order changed");
        if old.status == FaultStatus::Removed {
            assert_eq!(new.status, FaultStatus::Removed, "record reactivated");
            assert_eq!(old.end_time, new.end_time, "end_time rewritten");
        }
    }
    for record in after {
        assert_eq!(
            record.end_time.is_some(),
            record.status == FaultStatus::Removed,
            "end_time present iff removed"
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn registry_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        runtime.block_on(async {
            let manager = FaultLifecycleManager::simulated();
            let mut injected = 0usize;

            for op in ops {
                let before = manager.records();
                match op {
                    Op::Inject(k, d) => {
                        manager.inject(FaultKind::ALL[k], d).await.unwrap();
                        injected += 1;
                    }
                    Op::Remove(k) => {
                        manager.remove(FaultKind::ALL[k]).await.unwrap();
                    }
                    Op::RemoveAll => {
                        let summary = manager.remove_all().await;
                        assert!(summary.is_success());
                        assert!(manager.list_active().is_empty());
                    }
                    Op::Advance(secs) => {
                        tokio::time::sleep(Duration::from_secs(secs)).await;
                    }
                }

                let after = manager.records();
                check_transition(&before, &after);

                let report = manager.generate_report();
                assert_eq!(report.total_faults, injected);
                assert_eq!(report.active_faults, manager.list_active().len());
                assert_eq!(report.active_faults, manager.active_count());
            }
        });
    }
}
