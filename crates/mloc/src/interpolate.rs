//! printf-style interpolation for resolved texts.
//!
//! Supports `%%` and the conversions `s r d i u f F e E g G x X o c` with
//! the flags `- + space 0 #`, a minimum width and a precision:
//!
//! ```text
//! %[flags][width][.precision]conversion
//! ```
//!
//! Every placeholder consumes exactly one argument, in order. Leftover or
//! missing arguments are errors, as are arguments of the wrong kind.
//!
//! Width and precision are limited to [`MAX_FIELD_SIZE`]. `%d`, `%i` and
//! `%u` truncate floats; `%x`, `%X` and `%o` reject them. `%r` quotes and
//! escapes strings and renders other values like `%s`.

use thiserror::Error;
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::types::Value;

/// Largest width or precision a placeholder may request.
pub const MAX_FIELD_SIZE: usize = 10_000;

const CONVERSIONS: [char; 15] = [
    's', 'r', 'd', 'i', 'u', 'f', 'F', 'e', 'E', 'g', 'G', 'x', 'X', 'o', 'c',
];

/// An interpolation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolateError {
    /// Malformed or unsupported placeholder.
    #[error("invalid placeholder at column {column}: {message}")]
    Syntax { column: usize, message: String },

    /// Fewer arguments than placeholders.
    #[error("not enough arguments: text has {expected} placeholders, got {got}")]
    NotEnoughArguments { expected: usize, got: usize },

    /// More arguments than placeholders.
    #[error("not all arguments converted: text has {expected} placeholders, got {got}")]
    TooManyArguments { expected: usize, got: usize },

    /// Argument kind does not fit the conversion.
    #[error("%{conversion} requires {expected}, got {found} for argument {index}")]
    ArgumentType {
        conversion: char,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spec {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'i> {
    Literal(&'i str),
    Placeholder(Spec),
}

/// Interpolate `args` into `template`.
///
/// # Example
///
/// ```
/// use mloc::interpolate::interpolate;
///
/// let text = interpolate("%s has %d new messages", &["Ana".into(), 3.into()]).unwrap();
/// assert_eq!(text, "Ana has 3 new messages");
/// assert_eq!(interpolate("%5.1f%%", &[99.26.into()]).unwrap(), " 99.3%");
/// ```
pub fn interpolate(template: &str, args: &[Value]) -> Result<String, InterpolateError> {
    let pieces = parse_pieces(template)?;

    let expected = pieces
        .iter()
        .filter(|piece| matches!(piece, Piece::Placeholder(_)))
        .count();
    if args.len() < expected {
        return Err(InterpolateError::NotEnoughArguments {
            expected,
            got: args.len(),
        });
    }
    if args.len() > expected {
        return Err(InterpolateError::TooManyArguments {
            expected,
            got: args.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut next = 0;
    for piece in pieces {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Placeholder(spec) => {
                out.push_str(&render(&spec, next, &args[next])?);
                next += 1;
            }
        }
    }
    Ok(out)
}

/// Count the placeholders in `template`, ignoring `%%`.
pub fn placeholder_count(template: &str) -> Result<usize, InterpolateError> {
    Ok(parse_pieces(template)?
        .iter()
        .filter(|piece| matches!(piece, Piece::Placeholder(_)))
        .count())
}

fn parse_pieces(template: &str) -> Result<Vec<Piece<'_>>, InterpolateError> {
    let mut remaining = template;
    let mut pieces = Vec::new();
    while !remaining.is_empty() {
        let start = remaining;
        match piece.parse_next(&mut remaining) {
            Ok(parsed) => {
                if let Piece::Placeholder(spec) = &parsed {
                    check_field_sizes(spec, column_of(template, start))?;
                }
                pieces.push(parsed);
            }
            Err(_) => {
                remaining = start;
                break;
            }
        }
    }

    if remaining.is_empty() {
        return Ok(pieces);
    }

    let after_percent = remaining.trim_start_matches('%');
    let message = match after_percent
        .trim_start_matches(['-', '+', ' ', '0', '#'])
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.')
        .chars()
        .next()
    {
        Some(c) => format!("unsupported conversion character '{c}'"),
        None => "incomplete placeholder".to_string(),
    };
    Err(InterpolateError::Syntax {
        column: column_of(template, remaining),
        message,
    })
}

fn check_field_sizes(spec: &Spec, column: usize) -> Result<(), InterpolateError> {
    let too_big = |what: &str| InterpolateError::Syntax {
        column,
        message: format!("{what} too big (at most {MAX_FIELD_SIZE})"),
    };
    if spec.width.is_some_and(|width| width > MAX_FIELD_SIZE) {
        return Err(too_big("width"));
    }
    if spec.precision.is_some_and(|precision| precision > MAX_FIELD_SIZE) {
        return Err(too_big("precision"));
    }
    Ok(())
}

fn column_of(original: &str, remaining: &str) -> usize {
    original[..original.len() - remaining.len()].chars().count() + 1
}

fn piece<'i>(input: &mut &'i str) -> ModalResult<Piece<'i>> {
    alt((literal, escaped_percent, placeholder)).parse_next(input)
}

fn literal<'i>(input: &mut &'i str) -> ModalResult<Piece<'i>> {
    take_while(1.., |c: char| c != '%')
        .map(Piece::Literal)
        .parse_next(input)
}

fn escaped_percent<'i>(input: &mut &'i str) -> ModalResult<Piece<'i>> {
    "%%".value(Piece::Literal("%")).parse_next(input)
}

fn placeholder<'i>(input: &mut &'i str) -> ModalResult<Piece<'i>> {
    preceded(
        '%',
        (flags, opt(number), opt(preceded('.', opt(number))), one_of(CONVERSIONS)),
    )
    .map(|(flags, width, precision, conversion)| {
        Piece::Placeholder(Spec {
            flags,
            width,
            precision: precision.map(|p| p.unwrap_or(0)),
            conversion,
        })
    })
    .parse_next(input)
}

fn flags(input: &mut &str) -> ModalResult<Flags> {
    take_while(0.., ['-', '+', ' ', '0', '#'])
        .map(|chars: &str| Flags {
            left: chars.contains('-'),
            plus: chars.contains('+'),
            space: chars.contains(' '),
            zero: chars.contains('0'),
            alternate: chars.contains('#'),
        })
        .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<usize> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .map(|digits: &str| digits.parse::<usize>().unwrap_or(usize::MAX))
        .parse_next(input)
}

fn render(spec: &Spec, index: usize, arg: &Value) -> Result<String, InterpolateError> {
    let type_error = |expected: &'static str| InterpolateError::ArgumentType {
        conversion: spec.conversion,
        index,
        expected,
        found: arg.kind(),
    };

    match spec.conversion {
        's' => Ok(pad_text(spec, truncate(arg.to_string(), spec.precision))),
        'r' => Ok(pad_text(spec, truncate(repr(arg), spec.precision))),
        'c' => {
            let c = match arg {
                Value::String(s) if s.chars().count() == 1 => s.chars().next(),
                Value::Int(n) => u32::try_from(*n).ok().and_then(char::from_u32),
                _ => None,
            };
            let c = c.ok_or_else(|| type_error("a single character or code point"))?;
            Ok(pad_text(spec, c.to_string()))
        }
        'd' | 'i' | 'u' => {
            let n = as_integer(arg, true).ok_or_else(|| type_error("a number"))?;
            Ok(render_integer(spec, n))
        }
        'x' | 'X' | 'o' => {
            let n = as_integer(arg, false).ok_or_else(|| type_error("an integer"))?;
            Ok(render_integer(spec, n))
        }
        _ => {
            let f = as_number(arg).ok_or_else(|| type_error("a number"))?;
            Ok(render_float(spec, f))
        }
    }
}

fn as_integer(arg: &Value, truncate_floats: bool) -> Option<i128> {
    match arg {
        Value::Int(n) => Some(i128::from(*n)),
        Value::Bool(b) => Some(i128::from(*b)),
        Value::Float(f) if truncate_floats && f.is_finite() => Some(f.trunc() as i128),
        _ => None,
    }
}

fn as_number(arg: &Value) -> Option<f64> {
    match arg {
        Value::Float(f) => Some(*f),
        Value::Int(n) => Some(*n as f64),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn repr(arg: &Value) -> String {
    match arg {
        Value::String(s) => quote(s),
        other => other.to_string(),
    }
}

/// Single quotes unless the text contains one and no double quote.
fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(max) => text.chars().take(max).collect(),
        None => text,
    }
}

fn pad_text(spec: &Spec, text: String) -> String {
    let width = spec.width.unwrap_or(0);
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let fill = " ".repeat(width - len);
    if spec.flags.left {
        text + &fill
    } else {
        fill + &text
    }
}

fn render_integer(spec: &Spec, n: i128) -> String {
    let magnitude = n.unsigned_abs();
    let mut digits = match spec.conversion {
        'x' => format!("{magnitude:x}"),
        'X' => format!("{magnitude:X}"),
        'o' => format!("{magnitude:o}"),
        _ => magnitude.to_string(),
    };
    if let Some(min_digits) = spec.precision {
        if digits.len() < min_digits {
            digits = "0".repeat(min_digits - digits.len()) + &digits;
        }
    }
    let prefix = match (spec.flags.alternate, spec.conversion) {
        (true, 'x') => "0x",
        (true, 'X') => "0X",
        (true, 'o') => "0o",
        _ => "",
    };
    pad_number(spec, sign(spec, n < 0), prefix, digits)
}

fn render_float(spec: &Spec, f: f64) -> String {
    let upper = spec.conversion.is_ascii_uppercase();
    let body = if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        "inf".to_string()
    } else {
        let precision = spec.precision.unwrap_or(6);
        let magnitude = f.abs();
        match spec.conversion.to_ascii_lowercase() {
            'e' => exponent_form(magnitude, precision),
            'g' => general_form(magnitude, precision, spec.flags.alternate),
            _ => format!("{magnitude:.precision$}"),
        }
    };
    let body = if upper { body.to_uppercase() } else { body };
    let negative = f.is_sign_negative() && !f.is_nan();
    pad_number(spec, sign(spec, negative), "", body)
}

/// `d.ddde±XX` with at least two exponent digits.
fn exponent_form(magnitude: f64, precision: usize) -> String {
    let rendered = format!("{magnitude:.precision$e}");
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((&rendered, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

fn general_form(magnitude: f64, precision: usize, alternate: bool) -> String {
    let precision = precision.max(1);
    let digits = precision - 1;
    let probe = format!("{magnitude:.digits$e}");
    let exponent: i64 = probe
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0);

    let rendered = if exponent >= -4 && exponent < precision as i64 {
        let decimals = (precision as i64 - 1 - exponent).max(0) as usize;
        format!("{magnitude:.decimals$}")
    } else {
        exponent_form(magnitude, precision - 1)
    };

    if alternate {
        return rendered;
    }
    match rendered.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{exp}", strip_fraction_zeros(mantissa)),
        None => strip_fraction_zeros(&rendered).to_string(),
    }
}

fn strip_fraction_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn sign(spec: &Spec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if spec.flags.plus {
        "+"
    } else if spec.flags.space {
        " "
    } else {
        ""
    }
}

fn pad_number(spec: &Spec, sign: &str, prefix: &str, digits: String) -> String {
    let width = spec.width.unwrap_or(0);
    let len = sign.len() + prefix.len() + digits.chars().count();
    if len >= width {
        return format!("{sign}{prefix}{digits}");
    }
    let fill = width - len;
    if spec.flags.left {
        format!("{sign}{prefix}{digits}{}", " ".repeat(fill))
    } else if spec.flags.zero {
        format!("{sign}{prefix}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{sign}{prefix}{digits}", " ".repeat(fill))
    }
}
