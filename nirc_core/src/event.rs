use crate::{client::Client, Error};

/// A `PRIVMSG` sent to a channel we're in or directly to us
#[derive(Clone)]
pub struct ChatEvent {
    client: Client,
    sender: String,
    body: String,
    target: String,
}

impl ChatEvent {
    pub(crate) fn new(client: Client, sender: &str, body: String, target: &str) -> Self {
        Self {
            client,
            sender: sender.to_string(),
            body,
            target: target.to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_channel(&self) -> bool {
        self.target.starts_with(['#', '&'])
    }

    /// Answers in the channel, or to the sender for a private message
    pub async fn reply(&self, text: &str) -> Result<(), Error> {
        let target = if self.is_channel() {
            &self.target
        } else {
            &self.sender
        };
        self.client.send_message(target, text).await
    }
}

impl std::fmt::Debug for ChatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEvent")
            .field("sender", &self.sender)
            .field("body", &self.body)
            .field("target", &self.target)
            .finish()
    }
}
