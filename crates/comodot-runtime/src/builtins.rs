//! Built-in functions for comodot programs
//!
//! These are the symbols compiled code links against. Each one locks the
//! process stdin or stdout for the duration of the call and never unwinds:
//! failures come back as sentinels, null pointers or status codes.
//!
//! | Symbol             | Signature                             |
//! |--------------------|---------------------------------------|
//! | `print`            | `int64_t (const char*)`               |
//! | `println`          | `int64_t (const char*)`               |
//! | `readInt`          | `int64_t (void)`, `-1` on failure     |
//! | `readFloat`        | `int64_t (void)`, `-1` on failure     |
//! | `readLine`         | `char* (void)`, null on failure       |
//! | `readIntChecked`   | `int32_t (int64_t* out)`              |
//! | `readFloatChecked` | `int32_t (double* out)`               |
//! | `lineLength`       | `uint64_t (const char*)`              |
//! | `freeLine`         | `void (char*)`                        |

use std::ffi::{CStr, c_char};
use std::io;

use tracing::warn;

use crate::config::{self, RuntimeConfig};
use crate::error::ReadError;
use crate::prefixed::LengthPrefixed;
use crate::{line, logging, output, scan};

/// Returned by `print` and `println`; no failure is distinguished.
pub const STATUS_OK: i64 = 0;

/// Returned by `readInt` and `readFloat` when no value could be read.
/// Indistinguishable from a legitimate `-1`; see the checked variants.
pub const READ_SENTINEL: i64 = -1;

pub const STATUS_VALUE: i32 = 0;
pub const STATUS_NO_VALUE: i32 = 1;
pub const STATUS_OUT_OF_RANGE: i32 = 2;

/// Load the configuration and install logging.
///
/// Optional: the first primitive call does the same.
#[unsafe(no_mangle)]
pub extern "C" fn __comodot_init() {
    setup();
}

/// Configuration for a primitive call, with logging installed first so
/// configuration problems are reported even without `__comodot_init`.
fn setup() -> &'static RuntimeConfig {
    let loaded = config::loaded();
    logging::init(loaded);
    &loaded.config
}

unsafe fn emit(text: *const c_char, newline: bool) -> i64 {
    setup();
    let bytes = if text.is_null() {
        warn!("print called with a null string");
        &[][..]
    } else {
        unsafe { CStr::from_ptr(text) }.to_bytes()
    };
    if let Err(error) = output::write_text(&mut io::stdout().lock(), bytes, newline) {
        warn!(%error, "write to stdout failed");
    }
    STATUS_OK
}

/// Write a NUL-terminated string to stdout.
///
/// # Safety
///
/// `text` must be null or point to a NUL-terminated byte string.
#[unsafe(export_name = "print")]
pub unsafe extern "C" fn comodot_print(text: *const c_char) -> i64 {
    unsafe { emit(text, false) }
}

/// Write a NUL-terminated string and a newline to stdout.
///
/// # Safety
///
/// `text` must be null or point to a NUL-terminated byte string.
#[unsafe(export_name = "println")]
pub unsafe extern "C" fn comodot_println(text: *const c_char) -> i64 {
    unsafe { emit(text, true) }
}

fn read_int() -> Result<i64, ReadError> {
    setup();
    scan::scan_int(&mut io::stdin().lock())
}

fn read_float() -> Result<f64, ReadError> {
    let config = setup();
    let value = scan::scan_float(&mut io::stdin().lock())?;
    if config.echo_read_float {
        let echo = format!("{value:.6}");
        if let Err(error) = output::write_text(&mut io::stdout().lock(), echo.as_bytes(), false) {
            warn!(%error, "readFloat echo failed");
        }
    }
    Ok(value)
}

fn sentinel_on_failure(result: Result<i64, ReadError>, primitive: &str) -> i64 {
    result.unwrap_or_else(|error| {
        warn!(primitive, %error, "returning sentinel");
        READ_SENTINEL
    })
}

/// Read one integer token from stdin, `-1` when none is available.
#[unsafe(export_name = "readInt")]
pub extern "C" fn comodot_read_int() -> i64 {
    sentinel_on_failure(read_int(), "readInt")
}

/// Read one float token from stdin, truncated toward zero; `-1` when none
/// is available or the value does not fit.
#[unsafe(export_name = "readFloat")]
pub extern "C" fn comodot_read_float() -> i64 {
    sentinel_on_failure(read_float().and_then(scan::truncate_float), "readFloat")
}

/// Read one integer token into `*out`.
///
/// Returns [`STATUS_VALUE`] and writes `*out`, or a failure status and
/// leaves `*out` alone. A null `out` reads nothing.
///
/// # Safety
///
/// `out` must be null or valid for writing an `i64`.
#[unsafe(export_name = "readIntChecked")]
pub unsafe extern "C" fn comodot_read_int_checked(out: *mut i64) -> i32 {
    if out.is_null() {
        return STATUS_NO_VALUE;
    }
    match read_int() {
        Ok(value) => {
            unsafe { out.write(value) };
            STATUS_VALUE
        }
        Err(error) => error.status(),
    }
}

/// Read one float token into `*out`, without truncation.
///
/// # Safety
///
/// `out` must be null or valid for writing an `f64`.
#[unsafe(export_name = "readFloatChecked")]
pub unsafe extern "C" fn comodot_read_float_checked(out: *mut f64) -> i32 {
    if out.is_null() {
        return STATUS_NO_VALUE;
    }
    match read_float() {
        Ok(value) => {
            unsafe { out.write(value) };
            STATUS_VALUE
        }
        Err(error) => error.status(),
    }
}

/// Read a line from stdin into a length-prefixed string.
///
/// The caller owns the result and releases it with `freeLine`. Null means
/// the buffer could not be allocated; end of input is not a failure.
#[unsafe(export_name = "readLine")]
pub extern "C" fn comodot_read_line() -> *mut c_char {
    let capacity = setup().initial_line_capacity;
    match line::read_line(&mut io::stdin().lock(), capacity) {
        Ok(line) => line.into_raw().cast(),
        Err(error) => {
            warn!(%error, "readLine failed");
            std::ptr::null_mut()
        }
    }
}

/// Header value of a string returned by `readLine` (0 for null).
///
/// # Safety
///
/// `line` must be null or a live pointer returned by `readLine`.
#[unsafe(export_name = "lineLength")]
pub unsafe extern "C" fn comodot_line_length(line: *const c_char) -> u64 {
    unsafe { LengthPrefixed::length_of(line.cast()) }
}

/// Release a string returned by `readLine`. Null is a no-op.
///
/// # Safety
///
/// `line` must be null or a pointer returned by `readLine` that has not
/// been released yet.
#[unsafe(export_name = "freeLine")]
pub unsafe extern "C" fn comodot_free_line(line: *mut c_char) {
    drop(unsafe { LengthPrefixed::from_raw(line.cast()) });
}
