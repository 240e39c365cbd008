//! Shared helpers for controller tests.

use std::time::Duration;

/// Poll `condition` until it holds, failing the test after one second.
pub async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not reached within 1s");
}
