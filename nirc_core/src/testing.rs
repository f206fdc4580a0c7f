//! An in-memory [`Connection`] for driving a client in tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use tokio::sync::mpsc;

use crate::connection::Connection;

#[derive(Default)]
struct Shared {
    sent: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

pub struct MockConnection {
    inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
    shared: Arc<Shared>,
}

impl MockConnection {
    pub fn new() -> (Self, MockHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::<Shared>::default();
        let conn = Self {
            inbound: tokio::sync::Mutex::new(rx),
            shared: Arc::clone(&shared),
        };
        let handle = MockHandle {
            tx: Mutex::new(Some(tx)),
            shared,
        };
        (conn, handle)
    }
}

/// Scripts what the client reads and records what it writes
pub struct MockHandle {
    tx: Mutex<Option<mpsc::UnboundedSender<String>>>,
    shared: Arc<Shared>,
}

impl MockHandle {
    /// Queues a line for the client to read
    pub fn push(&self, line: &str) {
        if let Some(tx) = &*self.tx.lock().unwrap() {
            let _ = tx.send(line.to_string());
        }
    }

    /// Ends the stream once the queued lines have been read
    pub fn close(&self) {
        self.tx.lock().unwrap().take();
    }

    pub fn fail_reads(&self) {
        self.shared.fail_reads.store(true, Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.shared.fail_writes.store(true, Ordering::SeqCst)
    }

    /// Every line written so far, in order
    pub fn sent(&self) -> Vec<String> {
        self.shared.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Connection for MockConnection {
    async fn send_line(&self, line: &str) -> std::io::Result<()> {
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::ErrorKind::BrokenPipe.into());
        }
        self.shared.sent.lock().unwrap().push(line.to_string());
        Ok(())
    }

    async fn read_line(&self) -> std::io::Result<Option<String>> {
        if self.shared.fail_reads.load(Ordering::SeqCst) {
            return Err(std::io::ErrorKind::ConnectionReset.into());
        }
        Ok(self.inbound.lock().await.recv().await)
    }
}
