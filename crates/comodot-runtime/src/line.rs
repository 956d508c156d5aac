//! The `readLine` algorithm over any buffered byte source.

use std::io::{self, BufRead};

use tracing::{debug, warn};

use crate::buffer::LineBuffer;
use crate::error::RuntimeResult;
use crate::prefixed::LengthPrefixed;

/// Buffer bookkeeping of one completed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    /// Payload capacity reached before the final trim.
    pub capacity: usize,
    pub growths: u32,
}

/// Read one line, newline included, into a fresh length-prefixed string.
///
/// Stops after `\n` or at end of stream; a partial line at end of stream
/// is returned as-is and an empty stream yields a lone terminator. A read
/// error other than `Interrupted` ends the line the same way end of
/// stream does. Only allocation failures are errors.
pub fn read_line<R: BufRead + ?Sized>(
    reader: &mut R,
    initial_capacity: usize,
) -> RuntimeResult<LengthPrefixed> {
    read_line_with_stats(reader, initial_capacity).map(|(line, _)| line)
}

/// [`read_line`], also reporting how the buffer grew.
pub fn read_line_with_stats<R: BufRead + ?Sized>(
    reader: &mut R,
    initial_capacity: usize,
) -> RuntimeResult<(LengthPrefixed, LineStats)> {
    let mut buffer = LineBuffer::with_capacity(initial_capacity)?;

    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "read failed, ending line early");
                break;
            }
        };
        if chunk.is_empty() {
            break;
        }

        let mut consumed = 0;
        let mut terminated = false;
        for &byte in chunk {
            buffer.push(byte)?;
            consumed += 1;
            if byte == b'\n' {
                terminated = true;
                break;
            }
        }
        reader.consume(consumed);

        if terminated {
            break;
        }
    }

    let stats = LineStats {
        capacity: buffer.capacity(),
        growths: buffer.growths(),
    };
    let line = buffer.finish()?;
    debug!(length = line.len(), growths = stats.growths, "line read");
    Ok((line, stats))
}
