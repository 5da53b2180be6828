use std::io::{ErrorKind, Read};

use tracing::{debug, info, trace};

use crate::codec::{parse_body, Frame, HEADER_SIZE, MAX_BODY_SIZE, PREAMBLE, TRAILER_SIZE};
use crate::error::{FrameError, Result};

/// Scratch space for the largest body plus its trailer.
pub(crate) const SCRATCH_SIZE: usize = MAX_BODY_SIZE + TRAILER_SIZE;

/// Reads complete frames from any `Read` stream.
///
/// The stream may start anywhere: noise and partial frames ahead of the next
/// preamble are dropped. Short reads are handled internally.
pub struct FrameReader<T> {
    inner: T,
    scratch: Box<[u8]>,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            scratch: scratch_buffer(),
        }
    }

    /// Read the next valid frame (blocking).
    ///
    /// Framing errors reject only the current frame; calling again resumes
    /// scanning at the following bytes. Returns
    /// `Err(FrameError::ConnectionClosed)` when the stream ends.
    pub fn read_frame(&mut self) -> Result<Frame> {
        read_frame_from(&mut self.inner, &mut self.scratch)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

pub(crate) fn scratch_buffer() -> Box<[u8]> {
    vec![0u8; SCRATCH_SIZE].into_boxed_slice()
}

/// Where the preamble scan over the header window stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sync {
    /// Looking for the first preamble byte at or after `cursor`.
    SeekFirstMarker { cursor: usize },
    /// `window[0]` holds the first preamble byte.
    SeekSecondMarker,
    /// The window holds the preamble and the body length.
    HaveHeader,
}

pub(crate) fn read_frame_from<R: Read + ?Sized>(
    inner: &mut R,
    scratch: &mut [u8],
) -> Result<Frame> {
    let size = usize::from(read_header(inner)?);
    debug!(payload_size = size, "frame header");

    let body = &mut scratch[..size + TRAILER_SIZE];
    read_full(inner, body)?;

    let frame = parse_body(body)?;
    debug!(
        id = %frame.id,
        name = frame.id.name(),
        payload_size = frame.payload.len(),
        "found frame"
    );
    Ok(frame)
}

/// Scan for the preamble and return the body length that follows it.
fn read_header<R: Read + ?Sized>(inner: &mut R) -> Result<u16> {
    let mut window = [0u8; HEADER_SIZE];
    read_full(inner, &mut window)?;

    let mut state = Sync::SeekFirstMarker { cursor: 0 };
    loop {
        state = match state {
            Sync::SeekFirstMarker { cursor } => {
                match window[cursor..].iter().position(|&b| b == PREAMBLE[0]) {
                    None => {
                        trace!(window = ?window, "no preamble in window, discarding");
                        read_full(inner, &mut window)?;
                        Sync::SeekFirstMarker { cursor: 0 }
                    }
                    Some(offset) => {
                        let start = cursor + offset;
                        if start > 0 {
                            info!(offset = start, "misaligned data received");
                            window.copy_within(start.., 0);
                            read_full(inner, &mut window[HEADER_SIZE - start..])?;
                        }
                        Sync::SeekSecondMarker
                    }
                }
            }
            Sync::SeekSecondMarker => {
                if window[1] == PREAMBLE[1] {
                    Sync::HaveHeader
                } else {
                    Sync::SeekFirstMarker { cursor: 1 }
                }
            }
            Sync::HaveHeader => return Ok(u16::from_be_bytes([window[2], window[3]])),
        }
    }
}

/// Fill `buf` completely, issuing as many reads as the stream needs.
pub(crate) fn read_full<R: Read + ?Sized>(inner: &mut R, buf: &mut [u8]) -> Result<()> {
    let target = buf.len();
    let mut filled = 0usize;
    while filled < target {
        match inner.read(&mut buf[filled..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => {
                filled += n;
                if filled < target {
                    debug!(wanted = target - filled + n, received = n, "incomplete read");
                }
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}
