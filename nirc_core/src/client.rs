use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, Weak,
};

use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::{wrappers::ReceiverStream, StreamExt as _};

use nirc_config::Secret;

use crate::{
    connection::Connection,
    dispatch::{ChatListener, Dispatcher, LoginHook, RawListener},
    format::{format, Quoting},
    parser::parse,
    session::Session,
    Error, Response,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub quoting: Quoting,
    /// Log every inbound line (except keep-alives) at `info`
    pub log_raw: bool,
    /// How many parsed responses can wait for the dispatch worker
    pub queue_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            quoting: Quoting::default(),
            log_raw: false,
            queue_size: 32,
        }
    }
}

struct Inner {
    conn: Arc<dyn Connection>,
    session: Mutex<Session>,
    dispatcher: Dispatcher,
    config: ClientConfig,
    running: AtomicBool,
}

/// A cheaply cloneable handle to one IRC session
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

/// A handle that doesn't keep the client alive, for observers that need to
/// reach back into the client that owns them.
#[derive(Clone)]
pub struct WeakClient {
    inner: Weak<Inner>,
}

impl WeakClient {
    pub fn upgrade(&self) -> Option<Client> {
        self.inner.upgrade().map(|inner| Client { inner })
    }
}

impl Client {
    pub fn new(conn: impl Connection, config: ClientConfig) -> Self {
        Self::from_shared(Arc::new(conn), config)
    }

    pub fn from_shared(conn: Arc<dyn Connection>, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                conn,
                session: Mutex::default(),
                dispatcher: Dispatcher::default(),
                config,
                running: AtomicBool::new(false),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakClient {
        WeakClient {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn nick(&self) -> String {
        self.session().nick().to_string()
    }

    pub fn username(&self) -> String {
        self.session().user().to_string()
    }

    pub fn real_name(&self) -> String {
        self.session().real_name().to_string()
    }

    pub fn has_password(&self) -> bool {
        self.session().has_password()
    }

    pub fn channels(&self) -> Vec<String> {
        self.session().channels().map(ToString::to_string).collect()
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Formats and sends an arbitrary command
    pub async fn command(&self, command: &str, args: &[&str]) -> Result<(), Error> {
        let line = format(command, args, self.inner.config.quoting)?;
        self.inner.conn.send_line(&line).await.map_err(Into::into)
    }

    pub async fn set_nick(&self, nick: &str) -> Result<(), Error> {
        self.session().nick = nick.to_string();
        self.command("NICK", &[nick]).await
    }

    pub async fn set_username(&self, user: &str) -> Result<(), Error> {
        self.session().user = user.to_string();
        self.command("USER", &[user]).await
    }

    pub async fn set_real_name(&self, name: &str) -> Result<(), Error> {
        self.session().real_name = name.to_string();
        self.command("NAME", &[name]).await
    }

    pub async fn set_password(&self, password: impl Into<Secret>) -> Result<(), Error> {
        let password = password.into();
        let mut line = Secret::from(format(
            "PASS",
            &[password.expose()],
            self.inner.config.quoting,
        )?);
        self.session().password = password;

        let res = self.inner.conn.send_line(line.expose()).await;
        line.clear();
        res.map_err(Into::into)
    }

    /// Zeroes the stored password
    pub fn clear_password(&self) {
        self.session().clear_password()
    }

    pub async fn join_channel(&self, channel: &str) -> Result<(), Error> {
        if !self.session().join(channel) {
            log::debug!("already in {channel}");
        }
        self.command("JOIN", &[channel]).await
    }

    pub async fn leave_channel(&self, channel: &str) -> Result<(), Error> {
        if !self.session().leave(channel) {
            log::debug!("not in {channel}");
        }
        self.command("PART", &[channel]).await
    }

    pub async fn send_message(&self, target: &str, text: &str) -> Result<(), Error> {
        self.command("PRIVMSG", &[target, text]).await
    }

    /// Sends `text` as a CTCP ACTION
    pub async fn action_message(&self, target: &str, text: &str) -> Result<(), Error> {
        let action = format!("\x01ACTION {text}\x01");
        self.send_message(target, &action).await
    }

    pub fn add_listener(&self, listener: impl ChatListener) {
        self.inner.dispatcher.add_listener(listener)
    }

    pub fn add_login_hook(&self, hook: impl LoginHook) {
        self.inner.dispatcher.add_login_hook(hook)
    }

    pub fn add_raw_listener(&self, listener: impl RawListener) {
        self.inner.dispatcher.add_raw_listener(listener)
    }

    /// Runs the dispatcher for one response on the calling task
    pub async fn dispatch(&self, response: Response) -> Result<(), Error> {
        self.inner.dispatcher.dispatch(self, response).await
    }

    /// Spawns the listen loop and the dispatch worker.
    ///
    /// Both stop once the connection ends or fails to read.
    pub fn start(&self) -> Listening {
        let (tx, rx) = mpsc::channel(self.inner.config.queue_size.max(1));
        self.inner.running.store(true, Ordering::Release);

        let listen = tokio::spawn({
            let this = self.clone();
            async move {
                let res = this.listen(tx).await;
                this.inner.running.store(false, Ordering::Release);
                res
            }
        });

        let worker = tokio::spawn({
            let this = self.clone();
            async move { this.work(rx).await }
        });

        Listening { listen, worker }
    }

    async fn listen(&self, tx: mpsc::Sender<Response>) -> Result<(), Error> {
        let conn = &self.inner.conn;
        loop {
            let line = match conn.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    log::info!("connection closed");
                    return Ok(());
                }
                Err(err) => {
                    log::error!("cannot read from the connection: {err}");
                    return Err(err.into());
                }
            };

            if line.is_empty() {
                continue;
            }

            if line.starts_with("PING") {
                let pong = line.replacen("PING", "PONG", 1);
                if let Err(err) = conn.send_line(&pong).await {
                    log::error!("cannot reply to a ping: {err}");
                    return Err(err.into());
                }
                continue;
            }

            if self.inner.config.log_raw {
                log::info!(target: "nirc::raw", "{line}");
            }

            let response = match parse(&line) {
                Ok(response) => response,
                Err(err) => {
                    log::warn!("discarding: {err}");
                    continue;
                }
            };

            if tx.send(response).await.is_err() {
                log::warn!("dispatch worker is gone");
                return Ok(());
            }
        }
    }

    async fn work(&self, rx: mpsc::Receiver<Response>) {
        let mut stream = ReceiverStream::new(rx);
        while let Some(response) = stream.next().await {
            if let Err(err) = self.dispatch(response).await {
                log::error!("cannot dispatch: {err}");
            }
        }
        log::debug!("dispatch worker finished");
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(|err| err.into_inner())
    }
}

/// The running listen loop and dispatch worker
pub struct Listening {
    listen: JoinHandle<Result<(), Error>>,
    worker: JoinHandle<()>,
}

impl Listening {
    /// Waits for the connection to end and every queued response to be
    /// dispatched, returning the read error that stopped the loop, if any.
    pub async fn wait(self) -> anyhow::Result<()> {
        let res = self.listen.await?;
        self.worker.await?;
        res.map_err(Into::into)
    }
}
