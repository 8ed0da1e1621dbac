use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};

/// INI section holding the notifier's options.
pub const INI_SECTION: &str = "callback_telegram";

/// Telegram notifier configuration, resolved once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Telegram bot token (required)
    pub tg_token: Option<String>,

    /// Chat to post in (required)
    pub tg_chat_id: Option<String>,

    /// SOCKS5 proxy URI for all Bot API calls
    pub socks5_uri: Option<String>,
}

impl NotifierConfig {
    /// Load configuration from the process environment and the Ansible config file.
    ///
    /// Missing options are not an error here; see [`NotifierConfig::missing`].
    pub fn from_env() -> crate::error::Result<Self> {
        dotenvy::dotenv().ok();

        let lookup = |key: &str| std::env::var(key).ok();
        let ini_path = locate_ini(lookup);
        Self::resolve(lookup, ini_path.as_deref())
    }

    /// Resolve options from an environment lookup and an optional INI file.
    ///
    /// Environment values win over INI values. Blank values count as unset.
    pub fn resolve<F>(env: F, ini_path: Option<&Path>) -> crate::error::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ini = match ini_path {
            Some(path) => Some(
                Config::builder()
                    .add_source(File::from(path).format(FileFormat::Ini))
                    .build()?,
            ),
            None => None,
        };

        let option = |env_key: &str, ini_key: &str| {
            non_blank(env(env_key)).or_else(|| {
                ini.as_ref().and_then(|cfg| {
                    non_blank(cfg.get_string(&format!("{INI_SECTION}.{ini_key}")).ok())
                })
            })
        };

        let resolved = Self {
            tg_token: option("TG_TOKEN", "tg_token"),
            tg_chat_id: option("TG_CHAT_ID", "tg_chat_id"),
            socks5_uri: option("SOCKS5_URI", "socks5_uri"),
        };

        tracing::debug!(
            ini = ?ini_path,
            has_token = resolved.tg_token.is_some(),
            has_chat_id = resolved.tg_chat_id.is_some(),
            proxied = resolved.socks5_uri.is_some(),
            "Notifier configuration resolved"
        );

        Ok(resolved)
    }

    /// Names of the required options that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.tg_token.is_none() {
            missing.push("tg_token");
        }
        if self.tg_chat_id.is_none() {
            missing.push("tg_chat_id");
        }
        missing
    }
}

/// Find the Ansible config file the way the engine does:
/// `$ANSIBLE_CONFIG`, `./ansible.cfg`, `~/.ansible.cfg`, `/etc/ansible/ansible.cfg`.
pub fn locate_ini<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let mut candidates = Vec::new();
    if let Some(explicit) = non_blank(env("ANSIBLE_CONFIG")) {
        candidates.push(PathBuf::from(explicit));
    }
    candidates.push(PathBuf::from("ansible.cfg"));
    if let Some(home) = non_blank(env("HOME")) {
        candidates.push(Path::new(&home).join(".ansible.cfg"));
    }
    candidates.push(PathBuf::from("/etc/ansible/ansible.cfg"));

    candidates.into_iter().find(|path| path.is_file())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn ini_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".cfg").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_resolve_from_env() {
        let env = env_of(&[
            ("TG_TOKEN", "123:abc"),
            ("TG_CHAT_ID", "-100200"),
            ("SOCKS5_URI", "socks5://127.0.0.1:1080"),
        ]);
        let config = NotifierConfig::resolve(env, None).unwrap();

        assert_eq!(config.tg_token.as_deref(), Some("123:abc"));
        assert_eq!(config.tg_chat_id.as_deref(), Some("-100200"));
        assert_eq!(config.socks5_uri.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert!(config.missing().is_empty());
    }

    #[test]
    fn test_resolve_from_ini() {
        let file = ini_file(
            "[defaults]\ncallbacks_enabled = telegram\n\n\
             [callback_telegram]\ntg_token = 42:xyz\ntg_chat_id = 777\n",
        );
        let config = NotifierConfig::resolve(env_of(&[]), Some(file.path())).unwrap();

        assert_eq!(config.tg_token.as_deref(), Some("42:xyz"));
        assert_eq!(config.tg_chat_id.as_deref(), Some("777"));
        assert_eq!(config.socks5_uri, None);
    }

    #[test]
    fn test_env_overrides_ini() {
        let file = ini_file("[callback_telegram]\ntg_token = from-ini\ntg_chat_id = 1\n");
        let env = env_of(&[("TG_TOKEN", "from-env")]);
        let config = NotifierConfig::resolve(env, Some(file.path())).unwrap();

        assert_eq!(config.tg_token.as_deref(), Some("from-env"));
        assert_eq!(config.tg_chat_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_blank_values_are_missing() {
        let env = env_of(&[("TG_TOKEN", "  "), ("TG_CHAT_ID", "")]);
        let config = NotifierConfig::resolve(env, None).unwrap();

        assert_eq!(config.missing(), vec!["tg_token", "tg_chat_id"]);
    }

    #[test]
    fn test_missing_chat_id_only() {
        let env = env_of(&[("TG_TOKEN", "123:abc")]);
        let config = NotifierConfig::resolve(env, None).unwrap();
        assert_eq!(config.missing(), vec!["tg_chat_id"]);
    }

    #[test]
    fn test_locate_ini_prefers_ansible_config() {
        let file = ini_file("[callback_telegram]\n");
        let path = file.path().to_string_lossy().to_string();
        let found = locate_ini(env_of(&[("ANSIBLE_CONFIG", path.as_str())]));
        assert_eq!(found.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_locate_ini_in_home() {
        let home = tempfile::tempdir().unwrap();
        let cfg = home.path().join(".ansible.cfg");
        std::fs::write(&cfg, "[callback_telegram]\n").unwrap();

        let home_str = home.path().to_string_lossy().to_string();
        let found = locate_ini(env_of(&[
            ("ANSIBLE_CONFIG", "/nonexistent/ansible.cfg"),
            ("HOME", home_str.as_str()),
        ]));
        // Assumes no ansible.cfg in the crate directory.
        assert_eq!(found, Some(cfg));
    }
}
