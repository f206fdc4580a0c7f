use std::collections::BTreeSet;

use nirc_config::Secret;

pub const DEFAULT_NAME: &str = "nirc";

/// Identity and joined channels for one client.
///
/// The channel set only reflects the joins and parts issued locally.
#[derive(Debug)]
pub struct Session {
    pub(crate) nick: String,
    pub(crate) user: String,
    pub(crate) real_name: String,
    pub(crate) password: Secret,
    channels: BTreeSet<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            nick: DEFAULT_NAME.to_string(),
            user: DEFAULT_NAME.to_string(),
            real_name: DEFAULT_NAME.to_string(),
            password: Secret::default(),
            channels: BTreeSet::new(),
        }
    }
}

impl Session {
    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn clear_password(&mut self) {
        self.password.clear()
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.iter().map(String::as_str)
    }

    pub fn is_joined(&self, channel: &str) -> bool {
        self.channels.contains(channel)
    }

    /// Returns whether the channel was newly added
    pub fn join(&mut self, channel: &str) -> bool {
        self.channels.insert(channel.to_string())
    }

    /// Returns whether the channel was present
    pub fn leave(&mut self, channel: &str) -> bool {
        self.channels.remove(channel)
    }
}
