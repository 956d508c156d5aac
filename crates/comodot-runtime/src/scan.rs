//! Scalar token readers behind `readInt` and `readFloat`.
//!
//! Lexing follows `scanf`: leading whitespace is skipped, the token is
//! taken greedily, and the first byte that cannot extend it stays in the
//! stream for the next read. Only one byte of lookahead is ever used.

use std::io::{self, BufRead};

use tracing::debug;

use crate::error::ReadError;

fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

fn peek<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

fn skip_space<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<()> {
    while let Some(byte) = peek(reader)? {
        if !is_space(byte) {
            break;
        }
        reader.consume(1);
    }
    Ok(())
}

/// Move the next byte into `token` if it satisfies `accept`.
fn take_if<R: BufRead + ?Sized>(
    reader: &mut R,
    token: &mut Vec<u8>,
    accept: impl Fn(u8) -> bool,
) -> io::Result<bool> {
    match peek(reader)? {
        Some(byte) if accept(byte) => {
            token.push(byte);
            reader.consume(1);
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn take_digits<R: BufRead + ?Sized>(reader: &mut R, token: &mut Vec<u8>) -> io::Result<usize> {
    let mut count = 0;
    while take_if(reader, token, |b| b.is_ascii_digit())? {
        count += 1;
    }
    Ok(count)
}

fn is_sign(byte: u8) -> bool {
    byte == b'+' || byte == b'-'
}

fn token_str(token: &[u8]) -> Result<&str, ReadError> {
    // Tokens only ever hold ASCII.
    std::str::from_utf8(token).map_err(|_| ReadError::NoValue)
}

/// Read one decimal integer token: `[+-]digits`.
pub fn scan_int<R: BufRead + ?Sized>(reader: &mut R) -> Result<i64, ReadError> {
    skip_space(reader)?;
    let mut token = Vec::new();
    take_if(reader, &mut token, is_sign)?;
    if take_digits(reader, &mut token)? == 0 {
        debug!(token = %token.escape_ascii(), "no integer token");
        return Err(ReadError::NoValue);
    }
    token_str(&token)?
        .parse::<i64>()
        .map_err(|_| ReadError::OutOfRange)
}

/// Read one floating-point token: `[+-]digits[.digits][(e|E)[+-]digits]`,
/// with at least one mantissa digit on either side of the point.
///
/// An exponent marker without digits is consumed but ignored.
pub fn scan_float<R: BufRead + ?Sized>(reader: &mut R) -> Result<f64, ReadError> {
    skip_space(reader)?;
    let mut token = Vec::new();
    take_if(reader, &mut token, is_sign)?;
    let mut digits = take_digits(reader, &mut token)?;
    if take_if(reader, &mut token, |b| b == b'.')? {
        digits += take_digits(reader, &mut token)?;
    }
    if digits == 0 {
        debug!(token = %token.escape_ascii(), "no float token");
        return Err(ReadError::NoValue);
    }

    let mantissa_end = token.len();
    if take_if(reader, &mut token, |b| b == b'e' || b == b'E')? {
        take_if(reader, &mut token, is_sign)?;
        if take_digits(reader, &mut token)? == 0 {
            token.truncate(mantissa_end);
        }
    }

    token_str(&token)?
        .parse::<f64>()
        .map_err(|_| ReadError::NoValue)
}

/// Truncate toward zero, as the integer-returning `readFloat` does.
pub fn truncate_float(value: f64) -> Result<i64, ReadError> {
    // 2^63 is exact in f64, so the bounds check is exact too.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value >= -LIMIT && value < LIMIT {
        Ok(value.trunc() as i64)
    } else {
        Err(ReadError::OutOfRange)
    }
}
