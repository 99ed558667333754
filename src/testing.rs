//! Testing utilities for conversion pipelines.
//!
//! This module lets tests drive [`convert`](crate::convert::convert) without
//! any real file format:
//!
//! - **Mock I/O**: [`MemoryDecoder`] manufactures batches (scripted or
//!   generated, including short, failing and malformed ones) and
//!   [`MemorySink`] records rows, flushes and can fail on demand
//! - **Fixtures**: series constructors and Arrow file writers for decoder tests
//!
//! # Quick Start
//!
//! ```
//! use statcsv::convert::{convert, ConvertOptions};
//! use statcsv::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut decoder = MemoryDecoder::scripted(
//!     ["id", "name"],
//!     vec![Step::Batch(batch(vec![int32(&[1, 2]), text(&["a", "b"])]))],
//! );
//! let mut sink = MemorySink::new();
//! convert(&mut decoder, &mut sink, &ConvertOptions::default())?;
//! assert_eq!(sink.rows()[1], ["1.000000", "a"]);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod mock_io;

pub use fixtures::*;
pub use mock_io::*;
