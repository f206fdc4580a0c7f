use nirc_config::{load_from_env, LoadFromEnv, Secret};

use crate::{client::ClientConfig, format::Quoting, session::DEFAULT_NAME};

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub address: String,
    pub nick: String,
    pub user: String,
    pub real_name: String,
    pub password: Option<Secret>,
    pub channels: Vec<String>,
    pub quoting: Quoting,
    pub log_raw: bool,
    pub queue_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            address: String::new(),
            nick: DEFAULT_NAME.to_string(),
            user: DEFAULT_NAME.to_string(),
            real_name: DEFAULT_NAME.to_string(),
            password: None,
            channels: Vec::new(),
            quoting: client.quoting,
            log_raw: client.log_raw,
            queue_size: client.queue_size,
        }
    }
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            quoting: self.quoting,
            log_raw: self.log_raw,
            queue_size: self.queue_size,
        }
    }

    fn split_channels(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl LoadFromEnv for Config {
    fn load_from_env() -> anyhow::Result<Self> {
        let mut this = load_from_env::<Self>(
            &[
                ("NIRC_ADDRESS", |t, v| t.address = v),
                ("NIRC_NICK", |t, v| t.nick = v),
            ],
            &[
                ("NIRC_USER", |t, v| t.user = v),
                ("NIRC_REAL_NAME", |t, v| t.real_name = v),
                ("NIRC_PASSWORD", |t, v| t.password = Some(Secret::from(v))),
                ("NIRC_CHANNELS", |t, v| t.channels = Self::split_channels(&v)),
                ("NIRC_LOG_RAW", |t, v| t.log_raw = matches!(&*v, "1" | "true" | "yes")),
            ],
        )?;

        if let Ok(quoting) = std::env::var("NIRC_QUOTING") {
            this.quoting = quoting.parse()?;
        }
        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json() {
        let config: Config = serde_json::from_str(
            r##"{
                "address": "irc.example.net:6667",
                "nick": "Guest42",
                "password": "hunter2",
                "channels": ["#a", "#b"],
                "quoting": "trailing"
            }"##,
        )
        .unwrap();

        assert_eq!(config.address, "irc.example.net:6667");
        assert_eq!(config.nick, "Guest42");
        assert_eq!(config.user, "nirc");
        assert_eq!(config.password.as_deref(), Some("hunter2"));
        assert_eq!(config.channels, ["#a", "#b"]);
        assert_eq!(config.quoting, Quoting::Trailing);
        assert_eq!(config.client_config().queue_size, 32);
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn from_env() {
        std::env::set_var("NIRC_ADDRESS", "localhost:6667");
        std::env::set_var("NIRC_NICK", "Guest42");
        std::env::set_var("NIRC_CHANNELS", "#a, #b,,");
        std::env::set_var("NIRC_QUOTING", "trailing");

        let config = Config::load_from_env().unwrap();
        assert_eq!(config.address, "localhost:6667");
        assert_eq!(config.nick, "Guest42");
        assert_eq!(config.real_name, "nirc");
        assert_eq!(config.channels, ["#a", "#b"]);
        assert_eq!(config.quoting, Quoting::Trailing);
    }
}
