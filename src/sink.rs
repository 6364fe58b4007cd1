/*!
 * Key name sink
 *
 * Receives one token per listed entry, in listing order.
 */

use crate::error::{Result, SizerError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for listed key tokens
pub trait KeySink {
    fn write_token(&mut self, token: &str) -> Result<()>;

    /// Release the sink once the listing has stopped.
    ///
    /// Returns the path of the written file, if there is one.
    fn finish(self) -> Result<Option<PathBuf>>
    where
        Self: Sized,
    {
        Ok(None)
    }
}

/// Collects tokens in memory
impl KeySink for Vec<String> {
    fn write_token(&mut self, token: &str) -> Result<()> {
        self.push(token.to_string());
        Ok(())
    }
}

/// Newline-terminated tokens in a local file
#[derive(Debug)]
pub struct FileKeySink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl FileKeySink {
    /// Create the file, truncating any previous contents
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| SizerError::SinkOpen {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "opened key file");

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Flush buffered tokens and sync the file to disk
    pub fn close(mut self) -> Result<PathBuf> {
        let synced = self
            .writer
            .flush()
            .and_then(|_| self.writer.get_ref().sync_all());

        match synced {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), tokens = self.written, "closed key file");
                Ok(self.path)
            }
            Err(source) => Err(SizerError::SinkClose {
                path: self.path,
                source,
            }),
        }
    }
}

impl KeySink for FileKeySink {
    fn write_token(&mut self, token: &str) -> Result<()> {
        self.writer
            .write_all(token.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|source| SizerError::SinkWrite {
                path: self.path.clone(),
                source,
            })?;
        self.written += 1;
        Ok(())
    }

    fn finish(self) -> Result<Option<PathBuf>> {
        self.close().map(Some)
    }
}
