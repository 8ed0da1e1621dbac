use async_trait::async_trait;

use playgram_common::error::Result;
use playgram_common::types::{LifecycleEvent, Play, Playbook, PlaybookStats, TaskResult};

/// Lifecycle hooks invoked by the automation engine during a playbook run.
///
/// The engine calls these sequentially, in run order:
/// playbook start, then play start(s) and task failures, then stats.
/// Errors are returned to the engine, which decides whether they abort the run.
#[async_trait]
pub trait PlaybookCallback: Send {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    async fn on_playbook_start(&mut self, playbook: &Playbook) -> Result<()>;

    async fn on_play_start(&mut self, play: &Play) -> Result<()>;

    /// `ignore_errors` mirrors the task's own flag.
    async fn on_task_failed(&mut self, result: &TaskResult, ignore_errors: bool) -> Result<()>;

    async fn on_stats(&mut self, stats: &PlaybookStats) -> Result<()>;
}

/// Route a decoded lifecycle event to the matching callback method.
pub async fn dispatch<C>(callback: &mut C, event: &LifecycleEvent) -> Result<()>
where
    C: PlaybookCallback + ?Sized,
{
    tracing::debug!(callback = callback.name(), event = event.kind(), "Dispatching event");

    match event {
        LifecycleEvent::PlaybookStart { playbook } => callback.on_playbook_start(playbook).await,
        LifecycleEvent::PlayStart { play } => callback.on_play_start(play).await,
        LifecycleEvent::TaskFailed {
            result,
            ignore_errors,
        } => callback.on_task_failed(result, *ignore_errors).await,
        LifecycleEvent::Stats { stats } => callback.on_stats(stats).await,
    }
}
