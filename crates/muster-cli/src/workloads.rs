//! The demo operations raced by the `muster` binary.

use std::time::Duration;

use anyhow::{bail, Context};
use muster_core::{NamedOperation, OperationContext, OpResult};
use tracing::info;

// ─── Demo batch ───────────────────────────────────────────────────────────

/// The standard demo batch, in launch order: two deadline-busting delays,
/// one quick delay, one crash, one HTTP fetch.
pub fn demo_batch(url: &str) -> Vec<NamedOperation> {
    vec![
        simulated_delay("slow-alpha", "test1", Duration::from_millis(10_000)),
        simulated_delay("slow-beta", "test2", Duration::from_millis(10_000)),
        simulated_delay("quick", "test3", Duration::from_millis(100)),
        crash_after("crasher", "test4", Duration::from_millis(100)),
        http_fetch("fetch", "test5", url),
    ]
}

// ─── Workloads ────────────────────────────────────────────────────────────

/// Simulates `delay` of work, honoring cancellation at its one suspension
/// point. Succeeds with `message == input`.
pub fn simulated_delay(name: &str, input: &str, delay: Duration) -> NamedOperation {
    let task = name.to_string();
    NamedOperation::new(name, input, move |ctx: OperationContext| async move {
        info!(operation = %task, delay = ?delay, "executing");
        ctx.cancel.sleep(delay).await?;
        info!(operation = %task, "done");
        Ok(OpResult::ok(ctx.input))
    })
}

/// Does a little work, then fails with its own name in the error text.
pub fn crash_after(name: &str, input: &str, delay: Duration) -> NamedOperation {
    let task = name.to_string();
    NamedOperation::new(name, input, move |ctx: OperationContext| async move {
        info!(operation = %task, "executing");
        ctx.cancel.sleep(delay).await?;
        bail!("{task} crashed")
    })
}

/// Performs a real HTTP GET, racing the request against cancellation. A
/// non-success status is an error; the success message carries the status.
pub fn http_fetch(name: &str, input: &str, url: &str) -> NamedOperation {
    let task = name.to_string();
    let url = url.to_string();
    NamedOperation::new(name, input, move |ctx: OperationContext| async move {
        info!(operation = %task, url = %url, "executing");
        let response = tokio::select! {
            response = reqwest::get(&url) => {
                response.with_context(|| format!("GET {url} failed"))?
            }
            () = ctx.cancel.cancelled() => bail!("cancelled before the response arrived"),
        };

        let status = response.status();
        let response = response.error_for_status()?;
        let body = response.text().await?;
        info!(operation = %task, status = %status, bytes = body.len(), "done");
        Ok(OpResult::ok(format!(
            "{}: request succeeded with status {status}",
            ctx.input
        )))
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use muster_core::{Orchestrator, Outcome};

    async fn run_one(op: NamedOperation) -> Outcome {
        let report = Orchestrator::new(Duration::from_secs(5))
            .execute(vec![op])
            .await;
        report.entries[0].outcome.clone()
    }

    #[test]
    fn demo_batch_launch_order_is_fixed() {
        let names: Vec<String> = demo_batch("http://localhost/")
            .iter()
            .map(|op| op.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["slow-alpha", "slow-beta", "quick", "crasher", "fetch"]
        );
    }

    #[tokio::test]
    async fn quick_delay_echoes_its_input() {
        let outcome = run_one(simulated_delay("quick", "test3", Duration::from_millis(10))).await;
        assert_eq!(
            outcome,
            Outcome::Completed {
                result: OpResult::ok("test3")
            }
        );
    }

    #[tokio::test]
    async fn crash_carries_its_own_name() {
        let outcome = run_one(crash_after("crasher", "test4", Duration::from_millis(10))).await;
        assert_eq!(
            outcome,
            Outcome::Failed {
                error: "crasher crashed".into()
            }
        );
    }

    #[tokio::test]
    async fn fetch_succeeds_against_a_local_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let outcome = run_one(http_fetch("fetch", "test5", &server.url())).await;
        match outcome {
            Outcome::Completed { result } => {
                assert!(result.success);
                assert_eq!(result.message, "test5: request succeeded with status 200 OK");
            }
            other => panic!("expected Completed, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_treats_an_error_status_as_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let outcome = run_one(http_fetch("fetch", "test5", &server.url())).await;
        match outcome {
            Outcome::Failed { error } => assert!(error.contains("500")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_reports_an_unreachable_host() {
        // Port 1 is never listening locally, so the connection is refused.
        let outcome = run_one(http_fetch("fetch", "test5", "http://127.0.0.1:1/")).await;
        match outcome {
            Outcome::Failed { error } => assert!(error.starts_with("GET http://127.0.0.1:1/")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
