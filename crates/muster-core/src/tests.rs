/// Whole-crate scenario tests: full batches run through the orchestrator,
/// scaled down from the demo timings so nothing sleeps for real seconds.
#[cfg(test)]
mod scenario {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use rand::seq::SliceRandom;

    use crate::operation::{NamedOperation, OperationContext};
    use crate::orchestrator::Orchestrator;
    use crate::outcome::{OpResult, Outcome};

    /// Sleeps cooperatively; on cancellation raises `observed` and fails.
    fn cancel_aware_sleeper(
        name: &str,
        input: &str,
        delay: Duration,
        observed: Arc<AtomicBool>,
    ) -> NamedOperation {
        NamedOperation::new(name, input, move |ctx: OperationContext| async move {
            if ctx.cancel.sleep(delay).await.is_err() {
                observed.store(true, Ordering::SeqCst);
                anyhow::bail!("cancelled mid-delay");
            }
            Ok(OpResult::ok(ctx.input))
        })
    }

    async fn wait_for(flag: &AtomicBool) {
        for _ in 0..100 {
            if flag.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("cancellation was never observed by the workload");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mixed_batch_end_to_end() {
        let broadcast_seen = Arc::new(AtomicBool::new(false));

        let operations = vec![
            cancel_aware_sleeper(
                "slow-alpha",
                "test1",
                Duration::from_millis(2500),
                Arc::clone(&broadcast_seen),
            ),
            cancel_aware_sleeper(
                "slow-beta",
                "test2",
                Duration::from_millis(2500),
                Arc::clone(&broadcast_seen),
            ),
            cancel_aware_sleeper(
                "quick",
                "test3",
                Duration::from_millis(50),
                Arc::clone(&broadcast_seen),
            ),
            NamedOperation::new("crasher", "test4", |_ctx| async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                anyhow::bail!("crasher crashed")
            }),
        ];

        let started = Instant::now();
        let report = Orchestrator::new(Duration::from_millis(500))
            .execute(operations)
            .await;

        // The run lasts one deadline, not the slow operations' full delay.
        assert!(started.elapsed() < Duration::from_millis(2000));

        assert_eq!(report.entries.len(), 4);
        assert_eq!(report.outcome("slow-alpha"), Some(&Outcome::TimedOut));
        assert_eq!(report.outcome("slow-beta"), Some(&Outcome::TimedOut));
        assert_eq!(
            report.outcome("quick"),
            Some(&Outcome::Completed {
                result: OpResult::ok("test3")
            })
        );
        assert_eq!(
            report.outcome("crasher"),
            Some(&Outcome::Failed {
                error: "crasher crashed".into()
            })
        );
        assert!(report.has_failures());

        // The first timeout broadcast cancellation and the still-sleeping
        // workloads woke to it.
        wait_for(&broadcast_seen).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn report_order_is_launch_order_not_completion_order() {
        // Reversed delays: the first-launched operation finishes last.
        let operations: Vec<NamedOperation> = (0..6)
            .map(|i| {
                let delay = Duration::from_millis(80 - 12 * i as u64);
                NamedOperation::new(format!("op-{i}"), format!("input-{i}"), {
                    move |ctx: OperationContext| async move {
                        tokio::time::sleep(delay).await;
                        Ok(OpResult::ok(ctx.input))
                    }
                })
            })
            .collect();

        let report = Orchestrator::new(Duration::from_secs(5))
            .execute(operations)
            .await;

        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["op-0", "op-1", "op-2", "op-3", "op-4", "op-5"]);
        assert!(!report.has_failures());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn report_order_is_stable_under_permuted_completion_timing() {
        let mut delays: Vec<u64> = vec![5, 20, 35, 50, 65, 80];

        for _ in 0..4 {
            delays.shuffle(&mut rand::thread_rng());
            let operations: Vec<NamedOperation> = delays
                .iter()
                .enumerate()
                .map(|(i, &ms)| {
                    NamedOperation::new(format!("op-{i}"), format!("input-{i}"), {
                        move |ctx: OperationContext| async move {
                            tokio::time::sleep(Duration::from_millis(ms)).await;
                            Ok(OpResult::ok(ctx.input))
                        }
                    })
                })
                .collect();

            let report = Orchestrator::new(Duration::from_secs(5))
                .execute(operations)
                .await;

            let names: Vec<String> = report.entries.iter().map(|e| e.name.clone()).collect();
            let expected: Vec<String> = (0..6).map(|i| format!("op-{i}")).collect();
            assert_eq!(names, expected);
        }
    }

    #[tokio::test]
    async fn convenience_execute_runs_a_batch() {
        let report = crate::execute(
            vec![NamedOperation::new("greet", "hi", |ctx| async move {
                Ok(OpResult::ok(ctx.input))
            })],
            Duration::from_secs(2),
        )
        .await;

        assert_eq!(report.entries.len(), 1);
        assert!(!report.has_failures());
        assert_eq!(
            report.outcome("greet"),
            Some(&Outcome::Completed {
                result: OpResult::ok("hi")
            })
        );
    }
}
