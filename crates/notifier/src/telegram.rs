//! Minimal Telegram Bot API client over reqwest.
//!
//! Only `sendMessage` is needed. No timeout is set beyond reqwest's defaults
//! and nothing is retried.

use serde::{Deserialize, Serialize};

use playgram_common::error::{AppError, Result};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Text formatting mode for `sendMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: ParseMode,
}

#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    description: Option<String>,
    error_code: Option<i64>,
}

/// Telegram Bot API client bound to a single bot token.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramClient {
    /// Build a client, routing every request through `socks5_uri` when given.
    pub fn new(bot_token: impl Into<String>, socks5_uri: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(uri) = socks5_uri {
            builder = builder.proxy(reqwest::Proxy::all(uri)?);
        }

        Ok(Self {
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            client: builder.build()?,
        })
    }

    /// Point the client at a different Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    /// Send one text message to `chat_id`.
    pub async fn send_message(&self, chat_id: &str, text: &str, parse_mode: ParseMode) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        match serde_json::from_str::<TgResponse>(&body) {
            Ok(reply) if reply.ok && status.is_success() => {
                tracing::debug!(chat_id, chars = text.chars().count(), "Telegram message sent");
                Ok(())
            }
            Ok(reply) => Err(AppError::TelegramApi {
                code: reply.error_code.or(Some(i64::from(status.as_u16()))),
                description: reply
                    .description
                    .unwrap_or_else(|| status.to_string()),
            }),
            Err(_) => Err(AppError::TelegramApi {
                code: Some(i64::from(status.as_u16())),
                description: format!("unexpected response: {}", truncate(&body, 200)),
            }),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
