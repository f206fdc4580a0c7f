use std::time::Duration;

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    sync::Mutex,
};

/// A line-oriented transport.
///
/// `send_line` can be called from many tasks at once, implementations are
/// expected to serialize writes.
#[async_trait::async_trait]
pub trait Connection
where
    Self: Send + Sync + 'static,
{
    async fn send_line(&self, line: &str) -> std::io::Result<()>;

    /// `None` when the stream has ended
    async fn read_line(&self) -> std::io::Result<Option<String>>;
}

pub struct TcpConnection {
    reader: Mutex<(BufReader<OwnedReadHalf>, Vec<u8>)>,
    writer: Mutex<BufWriter<OwnedWriteHalf>>,
}

impl TcpConnection {
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        log::debug!("connecting to {addr}");
        let stream = tokio::time::timeout(Duration::from_secs(10), TcpStream::connect(addr))
            .await
            .map_err(|_| anyhow::anyhow!("connection to {addr} timed out"))??;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: Mutex::new((BufReader::new(read), Vec::with_capacity(1024))),
            writer: Mutex::new(BufWriter::new(write)),
        }
    }
}

#[async_trait::async_trait]
impl Connection for TcpConnection {
    async fn send_line(&self, line: &str) -> std::io::Result<()> {
        log::trace!("-> {}", loggable(line));

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            writer.write_all(b"\r\n").await?;
        }
        writer.flush().await
    }

    async fn read_line(&self) -> std::io::Result<Option<String>> {
        let mut guard = self.reader.lock().await;
        let (reader, buf) = &mut *guard;
        buf.clear();

        if reader.read_until(b'\n', buf).await? == 0 {
            return Ok(None);
        }

        // invalid utf-8 is replaced, it is not a read error
        let line = String::from_utf8_lossy(buf);
        let line = line.trim_end_matches(['\r', '\n']);
        log::trace!("<- {}", line.escape_debug());
        Ok(Some(line.to_string()))
    }
}

/// The outbound line as it may appear in the log, with `PASS` arguments hidden
fn loggable(line: &str) -> std::borrow::Cow<'_, str> {
    let command = line.split_once(' ').map_or(line, |(head, _)| head);
    if command.eq_ignore_ascii_case("PASS") {
        format!("{command} <redacted>").into()
    } else {
        line.escape_debug().to_string().into()
    }
}
