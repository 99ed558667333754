//! File-level I/O: source format detection, decoders and CSV sinks.

pub mod compression;
pub mod csv;
pub mod glob;

#[cfg_attr(docsrs, doc(cfg(feature = "io-arrow")))]
#[cfg(feature = "io-arrow")]
pub mod arrow;

#[cfg_attr(docsrs, doc(cfg(feature = "io-arrow")))]
#[cfg(feature = "io-arrow")]
pub mod ipc;

#[cfg_attr(docsrs, doc(cfg(feature = "io-parquet")))]
#[cfg(feature = "io-parquet")]
pub mod parquet;

use crate::source::Decoder;
use anyhow::{Result, anyhow, bail};
use std::fmt;
use std::path::Path;

/// Columnar source formats recognised by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.parquet`, `.parq`
    Parquet,
    /// `.arrow`, `.feather`, `.ipc`
    ArrowFile,
    /// `.arrows`, optionally followed by a compression suffix
    ArrowStream,
}

impl SourceFormat {
    /// Infer the format from the file name, case-insensitively.
    ///
    /// A trailing compression suffix is only accepted for stream input, since
    /// the other formats need random access.
    ///
    /// # Errors
    /// Returns an error naming the file when the suffix is not recognised.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("{} is not a file name", path.display()))?;
        let (base, codec) = compression::split_compression_suffix(&name);
        let base = base.to_lowercase();

        let format = if base.ends_with(".arrows") {
            Self::ArrowStream
        } else if base.ends_with(".parquet") || base.ends_with(".parq") {
            Self::Parquet
        } else if base.ends_with(".arrow") || base.ends_with(".feather") || base.ends_with(".ipc") {
            Self::ArrowFile
        } else {
            bail!("{} file cannot be read: unrecognized file type", path.display());
        };

        if let Some(codec) = codec
            && format != Self::ArrowStream
        {
            bail!(
                "{} file cannot be read: {} compression is only supported for .arrows streams",
                path.display(),
                codec.name()
            );
        }
        Ok(format)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parquet => "parquet",
            Self::ArrowFile => "arrow-ipc-file",
            Self::ArrowStream => "arrow-ipc-stream",
        })
    }
}

/// Open `path` with the decoder matching its suffix.
///
/// # Errors
/// Returns an error for an unknown suffix, a format whose feature is not
/// compiled in, or a file that cannot be opened.
pub fn open_decoder(path: impl AsRef<Path>) -> Result<Box<dyn Decoder>> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    tracing::debug!(path = %path.display(), %format, "opening source");
    match format {
        #[cfg(feature = "io-parquet")]
        SourceFormat::Parquet => Ok(Box::new(parquet::ParquetDecoder::open(path)?)),
        #[cfg(feature = "io-arrow")]
        SourceFormat::ArrowFile => Ok(Box::new(ipc::IpcFileDecoder::open(path)?)),
        #[cfg(feature = "io-arrow")]
        SourceFormat::ArrowStream => Ok(Box::new(ipc::IpcStreamDecoder::open(path)?)),
        #[allow(unreachable_patterns)]
        other => bail!("{}: support for {other} was not compiled in", path.display()),
    }
}
