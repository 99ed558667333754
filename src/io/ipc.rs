//! Arrow IPC decoders (file and stream formats).
//!
//! - [`IpcFileDecoder`]: random-access IPC files (`.arrow`, `.feather`, `.ipc`)
//! - [`IpcStreamDecoder`]: IPC streams (`.arrows`), optionally compressed,
//!   e.g. `table.arrows.gz`

use crate::io::arrow::RecordBatchDecoder;
use crate::io::compression::auto_detect_reader;
use crate::series::Batch;
use crate::source::Decoder;
use anyhow::{Context, Result};
use arrow::ipc::reader::{FileReader, StreamReader};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// [`Decoder`] over an Arrow IPC file.
pub struct IpcFileDecoder {
    inner: RecordBatchDecoder<FileReader<BufReader<File>>>,
}

impl IpcFileDecoder {
    /// Open `path` and read the IPC footer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not an IPC file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let reader = FileReader::try_new(BufReader::new(file), None)
            .with_context(|| format!("read arrow ipc footer of {}", path.display()))?;
        let schema = reader.schema();
        Ok(Self {
            inner: RecordBatchDecoder::new(schema, reader),
        })
    }
}

impl Decoder for IpcFileDecoder {
    fn column_names(&self) -> &[String] {
        self.inner.column_names()
    }

    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>> {
        self.inner.pull(max_rows)
    }
}

/// [`Decoder`] over an Arrow IPC stream from any reader.
pub struct IpcStreamDecoder {
    inner: RecordBatchDecoder<StreamReader<Box<dyn Read>>>,
}

impl IpcStreamDecoder {
    /// Open `path`, unwrapping compression detected from the extension or
    /// magic bytes.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the stream schema
    /// message is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let reader = auto_detect_reader(file, path)
            .with_context(|| format!("setup decompression for {}", path.display()))?;
        Self::from_reader(reader).with_context(|| format!("read arrow ipc stream {}", path.display()))
    }

    /// Decode a stream from an arbitrary reader.
    ///
    /// # Errors
    /// Returns an error if the schema message cannot be read.
    pub fn from_reader(reader: Box<dyn Read>) -> Result<Self> {
        let reader = StreamReader::try_new(reader, None).context("read stream schema")?;
        let schema = reader.schema();
        Ok(Self {
            inner: RecordBatchDecoder::new(schema, reader),
        })
    }
}

impl Decoder for IpcStreamDecoder {
    fn column_names(&self) -> &[String] {
        self.inner.column_names()
    }

    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>> {
        self.inner.pull(max_rows)
    }
}
