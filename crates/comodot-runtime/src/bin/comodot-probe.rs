//! Drive the exported runtime primitives against the real stdin/stdout.
//!
//! Used by the integration tests the way a compiled program would use the
//! runtime. Read results are reported on stderr, one line per operation.

use std::ffi::CString;

use clap::Parser;
use comodot_runtime::builtins::*;

#[derive(Parser)]
#[command(name = "comodot-probe")]
#[command(about = "Call comodot runtime primitives in sequence", long_about = None)]
struct Cli {
    /// Operations: line, int, float, int-checked, float-checked,
    /// print=TEXT, println=TEXT
    #[arg(value_parser = parse_op)]
    ops: Vec<Op>,

    /// Do not call `__comodot_init` first, like programs from older compilers
    #[arg(long)]
    skip_init: bool,
}

#[derive(Clone, Debug)]
enum Op {
    Line,
    Int,
    Float,
    IntChecked,
    FloatChecked,
    Print(CString),
    Println(CString),
}

fn parse_op(raw: &str) -> Result<Op, String> {
    let text = |t: &str| CString::new(t).map_err(|e| e.to_string());
    match raw.split_once('=') {
        Some(("print", t)) => Ok(Op::Print(text(t)?)),
        Some(("println", t)) => Ok(Op::Println(text(t)?)),
        Some(_) => Err(format!("unknown operation `{raw}`")),
        None => match raw {
            "line" => Ok(Op::Line),
            "int" => Ok(Op::Int),
            "float" => Ok(Op::Float),
            "int-checked" => Ok(Op::IntChecked),
            "float-checked" => Ok(Op::FloatChecked),
            _ => Err(format!("unknown operation `{raw}`")),
        },
    }
}

fn checked_report<T: std::fmt::Display>(name: &str, status: i32, value: T) -> String {
    match status {
        STATUS_VALUE => format!("{name} ok {value}"),
        STATUS_OUT_OF_RANGE => format!("{name} out-of-range"),
        _ => format!("{name} none"),
    }
}

fn run(op: &Op) -> Option<String> {
    match op {
        Op::Line => {
            let line = comodot_read_line();
            if line.is_null() {
                return Some("line null".to_owned());
            }
            let report = unsafe {
                let length = comodot_line_length(line);
                let bytes = std::slice::from_raw_parts(line as *const u8, length as usize);
                format!("line len={length} bytes={}", bytes.escape_ascii())
            };
            unsafe { comodot_free_line(line) };
            Some(report)
        }
        Op::Int => Some(format!("int {}", comodot_read_int())),
        Op::Float => Some(format!("float {}", comodot_read_float())),
        Op::IntChecked => {
            let mut value = 0i64;
            let status = unsafe { comodot_read_int_checked(&mut value) };
            Some(checked_report("int-checked", status, value))
        }
        Op::FloatChecked => {
            let mut value = 0f64;
            let status = unsafe { comodot_read_float_checked(&mut value) };
            Some(checked_report("float-checked", status, value))
        }
        Op::Print(text) => {
            unsafe { comodot_print(text.as_ptr()) };
            None
        }
        Op::Println(text) => {
            unsafe { comodot_println(text.as_ptr()) };
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if !cli.skip_init {
        __comodot_init();
    }

    for op in &cli.ops {
        if let Some(report) = run(op) {
            eprintln!("{report}");
        }
    }
}
