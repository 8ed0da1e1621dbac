//! Bridge between an external automation engine and the notifier.
//!
//! The engine writes one JSON [`LifecycleEvent`] per line; each is handed to
//! the callback in arrival order.

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use playgram_common::types::LifecycleEvent;
use playgram_notifier::{PlaybookCallback, dispatch};

/// Feed every event read from `reader` to `callback` until end of input.
///
/// Malformed lines are logged and skipped. The first delivery error stops
/// the relay and is returned. Returns the number of events dispatched.
pub async fn relay<R, C>(reader: R, callback: &mut C) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
    C: PlaybookCallback + ?Sized,
{
    // Raw segments, so a line that is not UTF-8 is skipped like any other bad line.
    let mut lines = reader.split(b'\n');
    let mut line_no = 0u64;
    let mut dispatched = 0u64;

    while let Some(line) = lines.next_segment().await.context("reading event stream")? {
        line_no += 1;
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let event: LifecycleEvent = match serde_json::from_slice(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed lifecycle event");
                continue;
            }
        };

        dispatch(callback, &event)
            .await
            .with_context(|| format!("delivering {} event from line {line_no}", event.kind()))?;
        dispatched += 1;
    }

    Ok(dispatched)
}
