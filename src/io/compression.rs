//! Compression for converted output and streamed input.
//!
//! Output CSV written to `table.csv.gz` is gzip-compressed; an Arrow IPC
//! stream at `table.arrows.zst` is decompressed before decoding. Readers fall
//! back to magic-byte sniffing when the file name carries no codec suffix.
//!
//! | Codec   | Suffixes          | Feature             | Crate   |
//! |---------|-------------------|---------------------|---------|
//! | gzip    | `.gz`, `.gzip`    | `compression-gzip`  | `flate2`|
//! | zstd    | `.zst`, `.zstd`   | `compression-zstd`  | `zstd`  |
//! | bzip2   | `.bz2`, `.bzip2`  | `compression-bzip2` | `bzip2` |
//! | xz      | `.xz`             | `compression-xz`    | `xz2`   |
//!
//! ```no_run
//! use statcsv::io::compression::auto_detect_writer;
//! use std::fs::File;
//! # fn main() -> anyhow::Result<()> {
//! let file = File::create("out.csv.zst")?;
//! let mut writer = auto_detect_writer(file, "out.csv.zst")?;
//! std::io::Write::write_all(&mut writer, b"id\n1\n")?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fmt;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A compression codec compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    #[cfg(feature = "compression-gzip")]
    Gzip,
    #[cfg(feature = "compression-zstd")]
    Zstd,
    #[cfg(feature = "compression-bzip2")]
    Bzip2,
    #[cfg(feature = "compression-xz")]
    Xz,
}

/// Every codec available in this build, in lookup order.
pub const CODECS: &[Codec] = &[
    #[cfg(feature = "compression-gzip")]
    Codec::Gzip,
    #[cfg(feature = "compression-zstd")]
    Codec::Zstd,
    #[cfg(feature = "compression-bzip2")]
    Codec::Bzip2,
    #[cfg(feature = "compression-xz")]
    Codec::Xz,
];

impl Codec {
    pub fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "compression-gzip")]
            Self::Gzip => "gzip",
            #[cfg(feature = "compression-zstd")]
            Self::Zstd => "zstd",
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2 => "bzip2",
            #[cfg(feature = "compression-xz")]
            Self::Xz => "xz",
        }
    }

    /// Lowercase suffixes with the leading dot; the first names output files.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Self::Gzip => &[".gz", ".gzip"],
            #[cfg(feature = "compression-zstd")]
            Self::Zstd => &[".zst", ".zstd"],
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2 => &[".bz2", ".bzip2"],
            #[cfg(feature = "compression-xz")]
            Self::Xz => &[".xz"],
        }
    }

    fn magic(self) -> &'static [u8] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Self::Gzip => &[0x1f, 0x8b],
            #[cfg(feature = "compression-zstd")]
            Self::Zstd => &[0x28, 0xb5, 0x2f, 0xfd],
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2 => b"BZh",
            #[cfg(feature = "compression-xz")]
            Self::Xz => &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00],
        }
    }

    /// Decompress everything read through `reader`.
    ///
    /// # Errors
    /// Returns an error if the decoder cannot be set up on the stream.
    pub fn decompress<'a>(self, reader: Box<dyn Read + 'a>) -> std::io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            #[cfg(feature = "compression-gzip")]
            Self::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            #[cfg(feature = "compression-xz")]
            Self::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        })
    }

    /// Start compressing everything written through `writer`.
    ///
    /// # Errors
    /// Returns an error if the encoder cannot be set up on the stream.
    pub fn encoder<W: Write>(self, writer: W) -> std::io::Result<EncodedWriter<W>> {
        Ok(match self {
            #[cfg(feature = "compression-gzip")]
            Self::Gzip => EncodedWriter::Gzip(flate2::write::GzEncoder::new(writer, flate2::Compression::default())),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd => EncodedWriter::Zstd(zstd::stream::write::Encoder::new(writer, 3)?),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2 => EncodedWriter::Bzip2(bzip2::write::BzEncoder::new(writer, bzip2::Compression::default())),
            #[cfg(feature = "compression-xz")]
            Self::Xz => EncodedWriter::Xz(xz2::write::XzEncoder::new(writer, 6)),
        })
    }
}

/// A writer that compresses with one codec, or passes bytes through.
///
/// Compressed streams end with a trailer that only [`finish`](Self::finish)
/// writes. Dropping the writer instead leaves a truncated stream and swallows
/// the error.
pub enum EncodedWriter<W: Write> {
    Plain(W),
    #[cfg(feature = "compression-gzip")]
    Gzip(flate2::write::GzEncoder<W>),
    #[cfg(feature = "compression-zstd")]
    Zstd(zstd::stream::write::Encoder<'static, W>),
    #[cfg(feature = "compression-bzip2")]
    Bzip2(bzip2::write::BzEncoder<W>),
    #[cfg(feature = "compression-xz")]
    Xz(xz2::write::XzEncoder<W>),
}

impl<W: Write> EncodedWriter<W> {
    /// Write the codec trailer, flush, and return the underlying writer.
    ///
    /// # Errors
    /// Returns the first I/O error hit while writing the trailer or flushing.
    pub fn finish(self) -> std::io::Result<W> {
        let mut inner = match self {
            Self::Plain(w) => w,
            #[cfg(feature = "compression-gzip")]
            Self::Gzip(e) => e.finish()?,
            #[cfg(feature = "compression-zstd")]
            Self::Zstd(e) => e.finish()?,
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2(e) => e.finish()?,
            #[cfg(feature = "compression-xz")]
            Self::Xz(e) => e.finish()?,
        };
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for EncodedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            #[cfg(feature = "compression-gzip")]
            Self::Gzip(e) => e.write(buf),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd(e) => e.write(buf),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2(e) => e.write(buf),
            #[cfg(feature = "compression-xz")]
            Self::Xz(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            #[cfg(feature = "compression-gzip")]
            Self::Gzip(e) => e.flush(),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd(e) => e.flush(),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2(e) => e.flush(),
            #[cfg(feature = "compression-xz")]
            Self::Xz(e) => e.flush(),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec whose suffix ends `path`, case-insensitively.
pub fn detect_from_extension(path: impl AsRef<Path>) -> Option<Codec> {
    let lower = path.as_ref().to_string_lossy().to_lowercase();
    CODECS
        .iter()
        .copied()
        .find(|c| c.extensions().iter().any(|ext| lower.ends_with(ext)))
}

/// Codec by name or suffix: `"gz"`, `".gz"` and `"gzip"` all find gzip.
pub fn find_codec(name: &str) -> Option<Codec> {
    let wanted = name.trim_start_matches('.').to_lowercase();
    CODECS.iter().copied().find(|c| {
        c.name() == wanted || c.extensions().iter().any(|ext| ext[1..] == wanted)
    })
}

/// Split a trailing codec suffix off a file name, matching it
/// case-insensitively.
///
/// The remainder keeps its original spelling: `"Data.ARROWS.gz"` gives
/// `("Data.ARROWS", Some(Codec::Gzip))`.
pub fn split_compression_suffix(file_name: &str) -> (&str, Option<Codec>) {
    // ASCII folding keeps byte offsets aligned with `file_name`.
    let folded = file_name.to_ascii_lowercase();
    for &codec in CODECS {
        if let Some(ext) = codec.extensions().iter().find(|ext| folded.ends_with(*ext)) {
            return (&file_name[..file_name.len() - ext.len()], Some(codec));
        }
    }
    (file_name, None)
}

fn sniff<R: BufRead>(reader: &mut R) -> Option<Codec> {
    let head = reader.fill_buf().ok()?;
    CODECS.iter().copied().find(|c| head.starts_with(c.magic()))
}

/// Wrap `reader` with decompression chosen by the suffix of `path_hint`,
/// then by magic bytes. Plain input is returned buffered.
///
/// # Errors
/// Returns an error if the codec fails to initialize on the stream.
pub fn auto_detect_reader<R: Read + 'static>(reader: R, path_hint: impl AsRef<Path>) -> Result<Box<dyn Read>> {
    if let Some(codec) = detect_from_extension(&path_hint) {
        return codec
            .decompress(Box::new(reader))
            .with_context(|| format!("set up {codec} decoder"));
    }
    let mut buffered = BufReader::new(reader);
    match sniff(&mut buffered) {
        Some(codec) => codec
            .decompress(Box::new(buffered))
            .with_context(|| format!("set up {codec} decoder")),
        None => Ok(Box::new(buffered)),
    }
}

/// Wrap `writer` with buffering and, when `path_hint` carries a codec
/// suffix, compression. Call [`EncodedWriter::finish`] once everything is
/// written.
///
/// # Errors
/// Returns an error if the codec fails to initialize on the stream.
pub fn auto_detect_writer<W: Write>(writer: W, path_hint: impl AsRef<Path>) -> Result<EncodedWriter<BufWriter<W>>> {
    let buffered = BufWriter::new(writer);
    match detect_from_extension(&path_hint) {
        Some(codec) => codec
            .encoder(buffered)
            .with_context(|| format!("set up {codec} encoder")),
        None => Ok(EncodedWriter::Plain(buffered)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_lookup_ignores_case() {
        for &codec in CODECS {
            let name = format!("t.csv{}", codec.extensions()[0].to_uppercase());
            assert_eq!(detect_from_extension(&name), Some(codec));
        }
        assert_eq!(detect_from_extension("t.csv"), None);
    }

    #[test]
    fn empty_input_is_not_sniffed() {
        let mut empty: &[u8] = &[];
        assert_eq!(sniff(&mut empty), None);
    }

    /// Accepts `room` bytes, then fails every write.
    #[derive(Debug)]
    struct FullDisk {
        room: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.room == 0 {
                return Err(std::io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    #[cfg(feature = "compression-gzip")]
    fn failed_trailer_write_surfaces_from_finish() {
        // Room for the 10-byte gzip header only; the deflate body and
        // trailer stay buffered until finish.
        let mut w = Codec::Gzip.encoder(FullDisk { room: 10 }).unwrap();
        w.write_all(b"id,score\n1.000000,2.000000\n").unwrap();
        let err = w.finish().unwrap_err();
        assert_eq!(err.to_string(), "no space left on device");
    }

    #[test]
    fn plain_finish_returns_the_inner_writer() {
        let mut w = EncodedWriter::Plain(Vec::new());
        w.write_all(b"a,b\n").unwrap();
        assert_eq!(w.finish().unwrap(), b"a,b\n");
    }

    #[test]
    fn suffix_split_keeps_original_spelling() {
        assert_eq!(split_compression_suffix("plain.arrows"), ("plain.arrows", None));
        #[cfg(feature = "compression-gzip")]
        assert_eq!(split_compression_suffix("İ.Arrows.GZ"), ("İ.Arrows", Some(Codec::Gzip)));
    }
}
