use thiserror::Error;

/// Common error types used across the workspace.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error{}: {description}", .code.map(|c| format!(" {c}")).unwrap_or_default())]
    TelegramApi {
        code: Option<i64>,
        description: String,
    },
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_api_display_with_code() {
        let err = AppError::TelegramApi {
            code: Some(401),
            description: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "Telegram API error 401: Unauthorized");
    }

    #[test]
    fn test_telegram_api_display_without_code() {
        let err = AppError::TelegramApi {
            code: None,
            description: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Telegram API error: bad gateway");
    }
}
