//! In-memory transport for tests.
//!
//! Reads are served from a scripted buffer and writes are captured. Clones
//! share state, so a test can keep a handle while a link owns the transport.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

#[derive(Debug, Default)]
struct MockState {
    incoming: VecDeque<u8>,
    written: Vec<u8>,
    read_limit: Option<usize>,
    write_limit: Option<usize>,
    write_error: Option<ErrorKind>,
    write_calls: usize,
    clear_calls: usize,
    closed: bool,
}

/// A scripted duplex byte stream.
///
/// An empty read buffer reads as end-of-stream.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a mock with nothing to read.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that will yield `data` to readers.
    pub fn with_incoming(data: &[u8]) -> Self {
        let mock = Self::new();
        mock.push_incoming(data);
        mock
    }

    /// Appends bytes for subsequent reads.
    pub fn push_incoming(&self, data: &[u8]) {
        self.lock().incoming.extend(data.iter().copied());
    }

    /// Caps every read call at `limit` bytes to simulate short reads.
    pub fn set_read_limit(&self, limit: usize) {
        self.lock().read_limit = Some(limit);
    }

    /// Accepts at most `limit` bytes in total; later writes come up short.
    pub fn set_write_limit(&self, limit: usize) {
        self.lock().write_limit = Some(limit);
    }

    /// Makes every subsequent write fail with `kind`.
    pub fn fail_writes(&self, kind: ErrorKind) {
        self.lock().write_error = Some(kind);
    }

    /// Everything written so far.
    pub fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    /// Number of bytes still waiting to be read.
    pub fn remaining(&self) -> usize {
        self.lock().incoming.len()
    }

    /// Number of `write` calls that reached the mock.
    pub fn write_calls(&self) -> usize {
        self.lock().write_calls
    }

    /// Number of times [`Transport::clear_buffers`] was called.
    pub fn clear_calls(&self) -> usize {
        self.lock().clear_calls
    }

    /// Whether [`Transport::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut state = self.lock();
        let mut want = buf.len().min(state.incoming.len());
        if let Some(limit) = state.read_limit {
            want = want.min(limit);
        }
        for (slot, byte) in buf.iter_mut().zip(state.incoming.drain(..want)) {
            *slot = byte;
        }
        Ok(want)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut state = self.lock();
        state.write_calls += 1;
        if let Some(kind) = state.write_error {
            return Err(std::io::Error::from(kind));
        }
        let accepted = match state.write_limit {
            Some(limit) => buf.len().min(limit.saturating_sub(state.written.len())),
            None => buf.len(),
        };
        state.written.extend_from_slice(&buf[..accepted]);
        Ok(accepted)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Transport for MockTransport {
    fn clear_buffers(&mut self) -> Result<()> {
        // Scripted input must survive the open-time clear.
        self.lock().clear_calls += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        state.closed = true;
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}
