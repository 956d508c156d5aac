//! comodot runtime library.
//!
//! Provides the host I/O primitives that programs compiled by `comodotc`
//! link against:
//! - Output (`print`, `println`)
//! - Scalar input (`readInt`, `readFloat` and their checked variants)
//! - Line input (`readLine`), returning length-prefixed strings released
//!   with `freeLine`
//!
//! The exported symbols live in [`builtins`]. Everything behind them is
//! generic over `BufRead`/`Write` so it can run against in-memory streams.

pub mod buffer;
pub mod builtins;
pub mod config;
pub mod error;
pub mod line;
pub mod logging;
pub mod output;
pub mod prefixed;
pub mod scan;


pub use buffer::LineBuffer;
pub use config::{RuntimeConfig, runtime_config};
pub use error::{ReadError, RuntimeError, RuntimeResult};
pub use line::{LineStats, read_line, read_line_with_stats};
pub use prefixed::{HEADER_SIZE, LengthPrefixed};
