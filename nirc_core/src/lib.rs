use std::{future::Future, pin::Pin};

mod error;
pub use error::Error;

pub mod client;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod event;
pub mod format;
pub mod parser;
pub mod session;
pub mod testing;

mod response;
pub use response::{Command, Response};

pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

pub mod prelude {
    pub use crate::client::{Client, ClientConfig, Listening, WeakClient};
    pub use crate::connection::{Connection, TcpConnection};
    pub use crate::dispatch::{ChatListener, LoginHook, RawListener};
    pub use crate::event::ChatEvent;
    pub use crate::format::Quoting;
    pub use crate::{Command, Error, Response};
    pub use nirc_config::Secret;
}
