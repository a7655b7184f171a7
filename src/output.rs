//! Serializes buffers produced out of order by parallel workers back into submission order.
//!
//! A producer whose index is next in line writes its buffer, together with every buffer
//! that already arrived right behind it, while not holding the bookkeeping lock. Any other
//! producer parks its buffer and returns immediately. Only the producer holding the next
//! index ever writes, so writes never interleave.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::info;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const POLLS_PER_REPORT: usize = 100;

#[derive(Debug, Default)]
struct SinkState {
    next: usize,
    backlog: BTreeMap<usize, Vec<u8>>,
    /// Bytes parked in the backlog
    size: usize,
    max_size: usize,
}

impl SinkState {
    /// Pops the buffers contiguous with `next`, without advancing it
    fn take_ready(&mut self, mut n: usize) -> Vec<Vec<u8>> {
        let mut ready = vec![];
        while let Some(buf) = self.backlog.remove(&n) {
            self.size -= buf.len();
            ready.push(buf);
            n += 1;
        }
        ready
    }
}

/// Counters of an [`OrderedSink`] after all buffers were written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Buffers written
    pub written: usize,
    /// Peak number of bytes parked while waiting for an earlier index
    pub max_size: usize,
}

#[derive(Debug)]
pub struct OrderedSink<W> {
    state: Mutex<SinkState>,
    writer: Mutex<W>,
}

impl<W: Write> OrderedSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(SinkState::default()),
            writer: Mutex::new(writer),
        }
    }

    fn state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submits the buffer of index `n`. Every index must be pushed exactly once.
    ///
    /// Returns the error of a failed write when this producer performed it. After a
    /// failure the sink stops advancing.
    pub fn push(&self, n: usize, buf: Vec<u8>) -> io::Result<()> {
        let mut state = self.state();
        if n != state.next {
            debug_assert!(n > state.next, "index {n} pushed twice");
            state.size += buf.len();
            state.max_size = state.max_size.max(state.size);
            state.backlog.insert(n, buf);
            return Ok(());
        }

        let mut ready = vec![buf];
        ready.extend(state.take_ready(n + 1));
        loop {
            drop(state);
            self.write(&ready)?;

            state = self.state();
            state.next += ready.len();
            let next = state.next;
            ready = state.take_ready(next);
            if ready.is_empty() {
                return Ok(());
            }
        }
    }

    fn write(&self, bufs: &[Vec<u8>]) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        for buf in bufs {
            writer.write_all(buf)?;
        }
        writer.flush()
    }

    /// Index of the next buffer to be written
    pub fn next(&self) -> usize {
        self.state().next
    }

    /// Bytes currently parked
    pub fn size(&self) -> usize {
        self.state().size
    }

    /// Peak of [`Self::size`] so far
    pub fn max_size(&self) -> usize {
        self.state().max_size
    }

    pub fn stats(&self) -> SinkStats {
        let state = self.state();
        SinkStats {
            written: state.next,
            max_size: state.max_size,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reports the progress of `sink` until `end` buffers are written or `stop` is raised
pub fn heartbeat<W: Write>(sink: &OrderedSink<W>, end: usize, stop: &AtomicBool) {
    let mut polls = 0;
    while !stop.load(Ordering::Relaxed) && sink.next() < end {
        thread::sleep(POLL_INTERVAL);
        polls += 1;
        if polls % POLLS_PER_REPORT == 0 {
            info!(
                "written {}/{} chunks, {} bytes buffered, peak {} bytes",
                sink.next(),
                end,
                sink.size(),
                sink.max_size()
            );
        }
    }
}
