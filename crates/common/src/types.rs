use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The playbook being executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    /// Path of the playbook file as given to the engine.
    pub file_name: PathBuf,
}

/// A play within the running playbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    #[serde(default)]
    pub name: Option<String>,
    /// Target host patterns, in the order the play lists them.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Tags the run was limited to.
    #[serde(default)]
    pub only_tags: Vec<String>,
}

/// Outcome record of one failed task on one host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub host: String,
    #[serde(default)]
    pub stderr: String,
}

/// Per-host counters from the end-of-run recap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSummary {
    pub ok: u32,
    pub changed: u32,
    pub unreachable: u32,
    pub failures: u32,
    pub rescued: u32,
    pub ignored: u32,
}

impl HostSummary {
    /// A host counts against the run when it failed or could not be reached.
    pub fn is_failed(&self) -> bool {
        self.failures > 0 || self.unreachable > 0
    }
}

/// Aggregated run statistics, keyed by host name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookStats {
    #[serde(default)]
    pub processed: BTreeMap<String, HostSummary>,
}

impl PlaybookStats {
    pub fn outcome(&self) -> Outcome {
        if self.processed.values().any(HostSummary::is_failed) {
            Outcome::Failure
        } else {
            Outcome::Success
        }
    }
}

/// Overall result of a playbook run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn glyph(&self) -> &'static str {
        match self {
            Outcome::Success => "✅",
            Outcome::Failure => "❌",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

/// A lifecycle callback as it travels between the engine and the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    PlaybookStart {
        playbook: Playbook,
    },
    PlayStart {
        play: Play,
    },
    TaskFailed {
        result: TaskResult,
        #[serde(default)]
        ignore_errors: bool,
    },
    Stats {
        stats: PlaybookStats,
    },
}

impl LifecycleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::PlaybookStart { .. } => "playbook_start",
            LifecycleEvent::PlayStart { .. } => "play_start",
            LifecycleEvent::TaskFailed { .. } => "task_failed",
            LifecycleEvent::Stats { .. } => "stats",
        }
    }
}
