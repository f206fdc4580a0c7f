use nirc_core::{
    config::Config,
    prelude::{ChatEvent, Client},
};

/// Sends the registration commands for `config`.
///
/// The password is moved out of `config`, the client keeps the only copy.
pub async fn register(client: &Client, config: &mut Config) -> anyhow::Result<()> {
    if let Some(password) = config.password.take().filter(|p| !p.is_empty()) {
        log::debug!("sending password");
        client.set_password(password).await?;
    }

    client.set_nick(&config.nick).await?;
    client.set_username(&config.user).await?;
    client.set_real_name(&config.real_name).await?;
    Ok(())
}

/// Joins the configured channels whenever the server welcomes us
pub fn join_on_login(client: &Client, channels: Vec<String>) {
    let weak = client.downgrade();
    client.add_login_hook(move || {
        let weak = weak.clone();
        let channels = channels.clone();
        async move {
            let client = match weak.upgrade() {
                Some(client) => client,
                None => return Ok(()),
            };
            for channel in &channels {
                log::info!("joining {channel}");
                client.join_channel(channel).await?;
            }
            anyhow::Ok(())
        }
    });
}

/// Logs every message and answers the builtin commands
pub fn builtin(client: &Client) {
    client.add_listener(|ev: ChatEvent| async move {
        log::info!("[{}] {}: {}", ev.target(), ev.sender(), ev.body());

        let (command, rest) = ev
            .body()
            .split_once(' ')
            .unwrap_or_else(|| (ev.body(), ""));

        match command {
            "!hello" => ev.reply(&format!("hello, {}", ev.sender())).await?,
            "!me" if !rest.trim().is_empty() => {
                let target = if ev.is_channel() {
                    ev.target()
                } else {
                    ev.sender()
                };
                ev.client().action_message(target, rest.trim()).await?
            }
            _ => {}
        }
        anyhow::Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use nirc_core::{client::ClientConfig, config::Config, testing::MockConnection};

    #[tokio::test]
    async fn registration_order() {
        let (conn, handle) = MockConnection::new();
        let client = Client::new(conn, ClientConfig::default());
        let mut config = Config {
            nick: "Guest42".into(),
            user: "guest".into(),
            password: Some("hunter2".into()),
            ..Config::default()
        };

        register(&client, &mut config).await.unwrap();
        assert_eq!(
            handle.sent(),
            ["PASS hunter2", "NICK Guest42", "USER guest", "NAME nirc"]
        );
        assert!(config.password.is_none());
        assert!(client.has_password());
    }

    #[tokio::test]
    async fn joins_after_welcome_and_answers() {
        let (conn, handle) = MockConnection::new();
        let client = Client::new(conn, ClientConfig::default());
        join_on_login(&client, vec!["#a".into(), "#b".into()]);
        builtin(&client);

        handle.push(":irc.example.net 001 Guest42 :Welcome");
        handle.push(":Macha!~macha@host PRIVMSG #a :!hello");
        handle.push(":Macha!~macha@host PRIVMSG #a :!me waves");
        handle.push(":Macha!~macha@host PRIVMSG #a :just talking");
        handle.close();

        client.start().wait().await.unwrap();
        assert_eq!(client.channels(), ["#a", "#b"]);
        assert_eq!(
            handle.sent(),
            [
                "JOIN #a",
                "JOIN #b",
                "PRIVMSG #a :hello, Macha:",
                "PRIVMSG #a :\x01ACTION waves\x01:",
            ]
        );
    }
}
