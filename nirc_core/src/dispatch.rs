use std::{
    future::Future,
    sync::{Arc, RwLock},
};

use crate::{client::Client, event::ChatEvent, BoxedFuture, Command, Error, Response};

pub trait ChatListener
where
    Self: Send + Sync + 'static,
{
    fn on_chat(&self, event: ChatEvent) -> BoxedFuture<'static, anyhow::Result<()>>;
}

impl<F, Fut> ChatListener for F
where
    F: Fn(ChatEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn on_chat(&self, event: ChatEvent) -> BoxedFuture<'static, anyhow::Result<()>> {
        Box::pin((self)(event))
    }
}

/// Runs every time the server confirms registration
pub trait LoginHook
where
    Self: Send + Sync + 'static,
{
    fn on_login(&self) -> BoxedFuture<'static, anyhow::Result<()>>;
}

impl<F, Fut> LoginHook for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn on_login(&self) -> BoxedFuture<'static, anyhow::Result<()>> {
        Box::pin((self)())
    }
}

/// Sees every parsed response before any other observer
pub trait RawListener
where
    Self: Send + Sync + 'static,
{
    fn on_response(&self, response: Arc<Response>) -> BoxedFuture<'static, anyhow::Result<()>>;
}

impl<F, Fut> RawListener for F
where
    F: Fn(Arc<Response>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn on_response(&self, response: Arc<Response>) -> BoxedFuture<'static, anyhow::Result<()>> {
        Box::pin((self)(response))
    }
}

pub type SharedChatListener = Arc<dyn ChatListener>;
pub type SharedLoginHook = Arc<dyn LoginHook>;
pub type SharedRawListener = Arc<dyn RawListener>;

/// The registered observers, invoked in registration order.
///
/// A failing observer is logged and does not stop the ones after it.
#[derive(Default)]
pub struct Dispatcher {
    chat: RwLock<Vec<SharedChatListener>>,
    login: RwLock<Vec<SharedLoginHook>>,
    raw: RwLock<Vec<SharedRawListener>>,
}

impl Dispatcher {
    pub fn add_listener(&self, listener: impl ChatListener) {
        write(&self.chat).push(Arc::new(listener))
    }

    pub fn add_login_hook(&self, hook: impl LoginHook) {
        write(&self.login).push(Arc::new(hook))
    }

    pub fn add_raw_listener(&self, listener: impl RawListener) {
        write(&self.raw).push(Arc::new(listener))
    }

    pub async fn dispatch(&self, client: &Client, response: Response) -> Result<(), Error> {
        let response = Arc::new(response);

        let raw = read(&self.raw);
        for listener in raw {
            if let Err(err) = listener.on_response(Arc::clone(&response)).await {
                log::warn!("raw listener failed on {}: {err:#}", response.command);
            }
        }

        match response.kind() {
            Command::Welcome => {
                log::debug!("registered as {}", client.nick());
                let hooks = read(&self.login);
                for hook in hooks {
                    if let Err(err) = hook.on_login().await {
                        log::warn!("login hook failed: {err:#}");
                    }
                }
            }

            Command::Privmsg => {
                let event = chat_event(client, &response)?;
                log::debug!("[{}] {}: {}", event.target(), event.sender(), event.body());

                let listeners = read(&self.chat);
                for listener in listeners {
                    if let Err(err) = listener.on_chat(event.clone()).await {
                        log::warn!("chat listener failed: {err:#}");
                    }
                }
            }

            Command::Quit | Command::Ping | Command::Other => {}
        }

        Ok(())
    }
}

fn chat_event(client: &Client, response: &Response) -> Result<ChatEvent, Error> {
    let source = response.source().unwrap_or_default();
    let sender = match source.split_once('!') {
        Some((nick, ..)) if !nick.is_empty() => nick,
        _ => return Err(Error::MalformedPrefix(source.to_string())),
    };

    let (target, rest) = response
        .args
        .split_first()
        .ok_or_else(|| Error::MalformedMessage(response.raw.clone()))?;

    Ok(ChatEvent::new(client.clone(), sender, rest.join(" "), target))
}

fn read<T: Clone>(list: &RwLock<Vec<T>>) -> Vec<T> {
    list.read().unwrap_or_else(|err| err.into_inner()).clone()
}

fn write<T>(list: &RwLock<Vec<T>>) -> std::sync::RwLockWriteGuard<'_, Vec<T>> {
    list.write().unwrap_or_else(|err| err.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{client::ClientConfig, parser::parse, testing::MockConnection};

    fn client() -> Client {
        let (conn, _handle) = MockConnection::new();
        Client::new(conn, ClientConfig::default())
    }

    fn recorder() -> Arc<Mutex<Vec<String>>> {
        Arc::default()
    }

    #[tokio::test]
    async fn privmsg_becomes_chat_event() {
        let client = client();
        let seen = recorder();
        client.add_listener({
            let seen = Arc::clone(&seen);
            move |ev: ChatEvent| {
                let seen = Arc::clone(&seen);
                async move {
                    let line = format!("{}|{}|{}", ev.sender(), ev.target(), ev.body());
                    seen.lock().unwrap().push(line);
                    anyhow::Ok(())
                }
            }
        });

        let resp = parse(":Macha!~macha@unaffiliated/macha PRIVMSG #botwar :Test response").unwrap();
        client.dispatch(resp).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), ["Macha|#botwar|Test response"]);
    }

    #[tokio::test]
    async fn body_joins_remaining_args() {
        let client = client();
        let seen = recorder();
        client.add_listener({
            let seen = Arc::clone(&seen);
            move |ev: ChatEvent| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(ev.body().to_string());
                    anyhow::Ok(())
                }
            }
        });

        let resp = parse(":a!b@c PRIVMSG #chan one two :three four").unwrap();
        client.dispatch(resp).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), ["one two three four"]);
    }

    #[tokio::test]
    async fn malformed_prefix_is_surfaced() {
        let client = client();
        for line in [
            ":irc.example.net PRIVMSG #a :hi",
            "PRIVMSG #a :hi",
            ":!user@host PRIVMSG #a :hi",
        ] {
            let resp = parse(line).unwrap();
            let err = client.dispatch(resp).await.unwrap_err();
            assert!(matches!(err, Error::MalformedPrefix(..)), "{line}: {err}");
        }
    }

    #[tokio::test]
    async fn privmsg_without_target() {
        let client = client();
        let resp = parse(":a!b@c PRIVMSG").unwrap();
        let err = client.dispatch(resp).await.unwrap_err();
        assert!(matches!(err, Error::MalformedMessage(..)));
    }

    #[tokio::test]
    async fn login_hooks_run_in_order() {
        let client = client();
        let seen = recorder();
        for name in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            client.add_login_hook(move || {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(name.to_string());
                    anyhow::Ok(())
                }
            });
        }

        let resp = parse(":irc.example.net 001 Guest42 :Welcome").unwrap();
        client.dispatch(resp).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn welcome_without_hooks() {
        let client = client();
        let resp = parse(":irc.example.net 001 Guest42 :Welcome").unwrap();
        client.dispatch(resp).await.unwrap();
    }

    #[tokio::test]
    async fn failing_observer_is_isolated() {
        let client = client();
        let seen = recorder();
        client.add_login_hook(|| async { anyhow::Result::<()>::Err(anyhow::anyhow!("nope")) });
        client.add_login_hook({
            let seen = Arc::clone(&seen);
            move || {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push("ran".to_string());
                    anyhow::Ok(())
                }
            }
        });

        let resp = parse(":server 001 me :Welcome").unwrap();
        client.dispatch(resp).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), ["ran"]);
    }

    #[tokio::test]
    async fn raw_listeners_see_everything() {
        let client = client();
        let seen = recorder();
        client.add_raw_listener({
            let seen = Arc::clone(&seen);
            move |resp: Arc<Response>| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(resp.command.clone());
                    anyhow::Ok(())
                }
            }
        });

        for line in [
            ":nick!user@host QUIT :bye",
            ":server 001 me :Welcome",
            ":server NOTICE * :hello",
        ] {
            let resp = parse(line).unwrap();
            client.dispatch(resp).await.unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), ["QUIT", "001", "NOTICE"]);
    }
}
