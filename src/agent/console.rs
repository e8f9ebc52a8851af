//! Line-oriented session I/O

use crate::Result;
use async_trait::async_trait;
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

/// Typing this ends the session
pub const EXIT_SENTINEL: &str = "exit";

/// Where the orchestrator asks for answers and shows messages
#[async_trait]
pub trait SessionIo: Send {
    /// Ask for one field. `None` means the user left (EOF or `exit`).
    async fn prompt_field(&mut self, field: &str) -> Result<Option<String>>;

    async fn emit(&mut self, text: &str) -> Result<()>;
}

pub struct ConsoleIo<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> ConsoleIo<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl ConsoleIo<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

#[async_trait]
impl<R, W> SessionIo for ConsoleIo<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn prompt_field(&mut self, field: &str) -> Result<Option<String>> {
        self.writer
            .write_all(format!("{} 값을 입력하세요: ", field).as_bytes())
            .await?;
        self.writer.flush().await?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        let answer = line.trim();
        if answer == EXIT_SENTINEL {
            return Ok(None);
        }

        Ok(Some(answer.to_string()))
    }

    async fn emit(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}
