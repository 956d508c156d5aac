//! Byte-string output behind `print` and `println`.

use std::io::Write;

use crate::error::RuntimeResult;

/// Write `text` verbatim, optionally followed by `\n`, then flush.
///
/// Compiled programs exit through their own `main`, which never runs the
/// standard library's stdout flush, so nothing may stay buffered here.
pub fn write_text<W: Write + ?Sized>(out: &mut W, text: &[u8], newline: bool) -> RuntimeResult<()> {
    out.write_all(text)?;
    if newline {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
