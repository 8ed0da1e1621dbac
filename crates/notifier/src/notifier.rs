//! Telegram notifier for playbook lifecycle events.
//!
//! Sends one message per play start, one per failed task and one at the end
//! of the run. Each is a single awaited Bot API call with no queue and no
//! retry. Send errors go back to the engine.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;

use playgram_common::config::NotifierConfig;
use playgram_common::error::Result;
use playgram_common::types::{Play, Playbook, PlaybookStats, TaskResult};

use crate::callback::PlaybookCallback;
use crate::message::{self, Header};
use crate::table::stats_table;
use crate::telegram::{ParseMode, TelegramClient};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where messages go once the notifier is enabled.
#[derive(Debug)]
struct Delivery {
    client: TelegramClient,
    chat_id: String,
}

/// Forwards playbook events to a Telegram chat.
///
/// A notifier built without a token or chat id is disabled for its whole
/// lifetime: every callback succeeds without sending anything.
#[derive(Debug)]
pub struct TelegramNotifier {
    delivery: Option<Delivery>,
    playbook_name: Option<PathBuf>,
    play: Option<Play>,
    // Captured once; every message of the run carries this same time.
    now: String,
}

impl TelegramNotifier {
    pub fn new(config: &NotifierConfig) -> Self {
        let now = Local::now().format(TIMESTAMP_FORMAT).to_string();

        Self {
            delivery: Self::build_delivery(config),
            playbook_name: None,
            play: None,
            now,
        }
    }

    fn build_delivery(config: &NotifierConfig) -> Option<Delivery> {
        for option in config.missing() {
            let env = option.to_uppercase();
            tracing::warn!(
                option,
                "{option} was not provided. The {option} can be provided using the `{env}` \
                 environment variable. Disabling the Telegram callback plugin."
            );
        }

        let (Some(token), Some(chat_id)) = (&config.tg_token, &config.tg_chat_id) else {
            return None;
        };

        match TelegramClient::new(token.as_str(), config.socks5_uri.as_deref()) {
            Ok(client) => {
                tracing::info!(
                    chat_id = %chat_id,
                    proxied = config.socks5_uri.is_some(),
                    "Telegram notifier enabled"
                );
                Some(Delivery {
                    client,
                    chat_id: chat_id.clone(),
                })
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Could not build the Telegram client. Disabling the Telegram callback plugin."
                );
                None
            }
        }
    }

    /// Send through a different Bot API server, e.g. a self-hosted one.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.delivery = self.delivery.map(|d| Delivery {
            client: d.client.with_api_base(api_base),
            chat_id: d.chat_id,
        });
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.delivery.is_some()
    }

    /// Absolute path of the running playbook, once it has started.
    pub fn playbook_name(&self) -> Option<&Path> {
        self.playbook_name.as_deref()
    }

    /// The most recently started play.
    pub fn current_play(&self) -> Option<&Play> {
        self.play.as_ref()
    }

    /// Timestamp stamped on every message of this run.
    pub fn timestamp(&self) -> &str {
        &self.now
    }

    fn header(&self) -> Header<'_> {
        Header {
            timestamp: &self.now,
            playbook: self.playbook_name.as_deref(),
        }
    }

    /// Post one HTML message to the configured chat.
    pub async fn send(&self, text: &str) -> Result<()> {
        let Some(delivery) = &self.delivery else {
            tracing::debug!("Telegram notifier disabled, message dropped");
            return Ok(());
        };

        delivery
            .client
            .send_message(&delivery.chat_id, text, ParseMode::Html)
            .await
    }
}

#[async_trait]
impl PlaybookCallback for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn on_playbook_start(&mut self, playbook: &Playbook) -> Result<()> {
        let path = std::path::absolute(&playbook.file_name)
            .map(|p| collapse_dots(&p))
            .unwrap_or_else(|_| playbook.file_name.clone());
        tracing::debug!(playbook = %path.display(), "Playbook started");
        self.playbook_name = Some(path);
        Ok(())
    }

    async fn on_play_start(&mut self, play: &Play) -> Result<()> {
        tracing::debug!(
            play = play.name.as_deref().unwrap_or("-"),
            hosts = play.hosts.len(),
            "Play started"
        );
        self.play = Some(play.clone());
        if !self.is_enabled() {
            return Ok(());
        }

        let msg = message::play_started(self.header(), play);
        self.send(&msg).await
    }

    // Sent whether or not the task's errors are ignored.
    async fn on_task_failed(&mut self, result: &TaskResult, _ignore_errors: bool) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let msg = message::task_failed(self.header(), result);
        self.send(&msg).await
    }

    async fn on_stats(&mut self, stats: &PlaybookStats) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let outcome = stats.outcome();
        tracing::info!(
            hosts = stats.processed.len(),
            outcome = %outcome,
            "Playbook ended"
        );

        let msg = message::playbook_ended(self.header(), outcome, &stats_table(stats));
        self.send(&msg).await
    }
}

/// Drop `.` and resolve `..` without touching the filesystem. `..` never
/// climbs above the root.
fn collapse_dots(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> NotifierConfig {
        NotifierConfig {
            tg_token: Some("123:abc".into()),
            tg_chat_id: Some("-100".into()),
            socks5_uri: None,
        }
    }

    #[test]
    fn test_enabled_with_token_and_chat() {
        assert!(TelegramNotifier::new(&configured()).is_enabled());
    }

    #[test]
    fn test_disabled_without_token() {
        let config = NotifierConfig {
            tg_token: None,
            ..configured()
        };
        assert!(!TelegramNotifier::new(&config).is_enabled());
    }

    #[test]
    fn test_disabled_without_chat_id() {
        let config = NotifierConfig {
            tg_chat_id: None,
            ..configured()
        };
        assert!(!TelegramNotifier::new(&config).is_enabled());
    }

    #[test]
    fn test_disabled_with_unusable_proxy() {
        let config = NotifierConfig {
            socks5_uri: Some("ftp://127.0.0.1:21".into()),
            ..configured()
        };
        assert!(!TelegramNotifier::new(&config).is_enabled());
    }

    #[test]
    fn test_timestamp_format() {
        let notifier = TelegramNotifier::new(&configured());
        let ts = notifier.timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok());
    }

    #[tokio::test]
    async fn test_playbook_start_records_absolute_path() {
        let mut notifier = TelegramNotifier::new(&NotifierConfig::default());
        notifier
            .on_playbook_start(&Playbook {
                file_name: "playbooks/site.yml".into(),
            })
            .await
            .unwrap();

        let path = notifier.playbook_name().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("playbooks/site.yml"));
    }

    #[test]
    fn test_collapse_dots() {
        assert_eq!(collapse_dots(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(collapse_dots(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(collapse_dots(Path::new("/a/b/../..")), PathBuf::from("/"));
    }

    #[tokio::test]
    async fn test_playbook_start_collapses_parent_components() {
        let mut notifier = TelegramNotifier::new(&NotifierConfig::default());
        notifier
            .on_playbook_start(&Playbook {
                file_name: "../site.yml".into(),
            })
            .await
            .unwrap();

        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.parent().unwrap_or(&cwd).join("site.yml");
        assert_eq!(notifier.playbook_name(), Some(expected.as_path()));
    }

    #[tokio::test]
    async fn test_disabled_notifier_is_a_no_op() {
        let mut notifier = TelegramNotifier::new(&NotifierConfig::default());
        let play = Play {
            hosts: vec!["web1".into()],
            ..Default::default()
        };

        notifier.on_play_start(&play).await.unwrap();
        notifier
            .on_task_failed(&TaskResult::default(), false)
            .await
            .unwrap();
        notifier.on_stats(&PlaybookStats::default()).await.unwrap();

        assert_eq!(notifier.current_play(), Some(&play));
    }
}
