//! In-memory decoder and sink.

use crate::series::Batch;
use crate::sink::RowSink;
use crate::source::Decoder;
use anyhow::{Result, bail};
use std::collections::VecDeque;

/// One scripted response of a [`MemoryDecoder`].
#[derive(Debug, Clone)]
pub enum Step {
    /// Return this batch regardless of the requested size.
    Batch(Batch),
    /// Report end of data.
    End,
    /// Fail the pull with this message.
    Fail(String),
}

type Generator = Box<dyn FnMut(usize, usize) -> Batch>;

enum Mode {
    Scripted(VecDeque<Step>),
    Generated {
        total_rows: usize,
        produced: usize,
        make: Generator,
    },
}

/// Synthetic [`Decoder`] for tests.
///
/// Two flavours:
/// - [`scripted`](MemoryDecoder::scripted) replays a fixed list of [`Step`]s,
///   then reports end of data forever
/// - [`generated`](MemoryDecoder::generated) serves `total_rows` rows in
///   pieces of the requested size, calling `make(start, len)` for each piece
///
/// Every call to `pull` is recorded so tests can check how often, and with
/// what size, the pipeline asked for data.
pub struct MemoryDecoder {
    names: Vec<String>,
    mode: Mode,
    requests: Vec<usize>,
}

impl MemoryDecoder {
    pub fn scripted<I, S>(names: I, steps: Vec<Step>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            mode: Mode::Scripted(steps.into()),
            requests: Vec::new(),
        }
    }

    pub fn generated<I, S, F>(names: I, total_rows: usize, make: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(usize, usize) -> Batch + 'static,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            mode: Mode::Generated {
                total_rows,
                produced: 0,
                make: Box::new(make),
            },
            requests: Vec::new(),
        }
    }

    /// Number of `pull` calls so far.
    pub fn pulls(&self) -> usize {
        self.requests.len()
    }

    /// `max_rows` of every `pull` call, in order.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }
}

impl Decoder for MemoryDecoder {
    fn column_names(&self) -> &[String] {
        &self.names
    }

    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>> {
        self.requests.push(max_rows);
        match &mut self.mode {
            Mode::Scripted(steps) => match steps.pop_front() {
                Some(Step::Batch(b)) => Ok(Some(b)),
                Some(Step::End) | None => Ok(None),
                Some(Step::Fail(msg)) => bail!("{msg}"),
            },
            Mode::Generated {
                total_rows,
                produced,
                make,
            } => {
                let len = max_rows.min(*total_rows - *produced);
                if len == 0 {
                    return Ok(None);
                }
                let batch = make(*produced, len);
                *produced += len;
                Ok(Some(batch))
            }
        }
    }
}

/// [`RowSink`] that keeps every row in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<Vec<String>>,
    flushes: usize,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that accepts `rows` rows (header included) and fails on the next.
    pub fn failing_after(rows: usize) -> Self {
        Self {
            fail_after: Some(rows),
            ..Self::default()
        }
    }

    /// All rows written so far, header first.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl RowSink for MemorySink {
    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        if self.fail_after == Some(self.rows.len()) {
            bail!("sink closed after {} rows", self.rows.len());
        }
        self.rows.push(fields.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
