//! Renderers for the non-floating-point conversions.
//!
//! Covers `%d`/`%i`, `%u`, `%o`, `%x`/`%X`, `%c`, `%s`, `%p` and `%n`.
//! Numbers are converted least-significant-digit-first into a fixed local
//! buffer and emitted back-to-front with the padding, precision and prefix
//! machinery wrapped around them.
//!
//! Shared pipeline for every integer conversion:
//! 1. digits into the buffer (nothing at all for value 0 with an explicit
//!    zero precision),
//! 2. `precision_length` = max(digit count, precision) and the zero padding
//!    needed to reach it,
//! 3. sign or base prefix characters,
//! 4. `width_padding` = width − precision_length − prefix characters,
//! 5. emission in the order the flag combination dictates.

use std::cell::Cell;

use crate::diag::PrintfError;
use crate::sink::OutputSink;
use crate::spec::{FormatSpecifier, LengthMod};

const DIGITS_LOWER: &[u8; 16] = b"0123456789abcdef";
const DIGITS_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// What a null `char *` renders as (unless precision is zero).
const NULL_STRING_TEXT: &[u8] = b"(null)";
/// What a null pointer renders as.
const NULL_POINTER_TEXT: &[u8] = b"(nil)";

/// Digit scratch space; u64 in octal needs 22 digits, so this is ample.
const DIGIT_BUFFER_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// Emission helpers
// ---------------------------------------------------------------------------

/// Emit `length` copies of `pad_character`.
fn pad_output(
    sink: &mut OutputSink<'_>,
    length: usize,
    pad_character: u8,
) -> Result<(), PrintfError> {
    for _ in 0..length {
        sink.emit(pad_character)?;
    }
    Ok(())
}

/// Emit a digit buffer whose content is stored backwards.
fn write_backwards_buffer(
    sink: &mut OutputSink<'_>,
    buffer: &[u8],
    length: usize,
) -> Result<(), PrintfError> {
    for i in (0..length).rev() {
        sink.emit(buffer[i])?;
    }
    Ok(())
}

/// Emit a byte buffer front-to-back.
fn write_forwards_buffer(sink: &mut OutputSink<'_>, buffer: &[u8]) -> Result<(), PrintfError> {
    for &byte in buffer {
        sink.emit(byte)?;
    }
    Ok(())
}

/// Emit a backwards digit buffer wrapped in its sign/base prefixes,
/// precision zeros and width padding, in the order the flags dictate.
///
/// Zero padding goes between the prefix and the digits; space padding goes
/// outside the prefix on whichever side `left_justify` selects.
fn write_backwards_buffer_with_padding(
    sink: &mut OutputSink<'_>,
    buffer: &[u8],
    length: usize,
    spec: &FormatSpecifier,
    prefix: Option<u8>,
    prefix2: Option<u8>,
    width_padding: usize,
    precision_padding: usize,
) -> Result<(), PrintfError> {
    if spec.flags.zero_padded {
        // Right justified, zero padded.
        if let Some(byte) = prefix {
            sink.emit(byte)?;
        }
        if let Some(byte) = prefix2 {
            sink.emit(byte)?;
        }
        pad_output(sink, width_padding, b'0')?;
        pad_output(sink, precision_padding, b'0')?;
        write_backwards_buffer(sink, buffer, length)?;
    } else if !spec.flags.left_justify {
        // Right justified, space padded.
        pad_output(sink, width_padding, b' ')?;
        if let Some(byte) = prefix {
            sink.emit(byte)?;
        }
        if let Some(byte) = prefix2 {
            sink.emit(byte)?;
        }
        pad_output(sink, precision_padding, b'0')?;
        write_backwards_buffer(sink, buffer, length)?;
    } else {
        // Left justified, space padded on the right.
        if let Some(byte) = prefix {
            sink.emit(byte)?;
        }
        if let Some(byte) = prefix2 {
            sink.emit(byte)?;
        }
        pad_output(sink, precision_padding, b'0')?;
        write_backwards_buffer(sink, buffer, length)?;
        pad_output(sink, width_padding, b' ')?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Digit generation
// ---------------------------------------------------------------------------

/// Write `value` into `buffer` least-significant-digit-first in `base`.
/// `%X` selects the uppercase alphabet. Returns the digit count; a zero
/// value still produces one `0` digit.
fn write_integer_backwards(
    buffer: &mut [u8; DIGIT_BUFFER_SIZE],
    mut value: u64,
    spec: &FormatSpecifier,
    base: u64,
) -> usize {
    let alphabet = if spec.conversion == b'X' {
        DIGITS_UPPER
    } else {
        DIGITS_LOWER
    };
    let mut length = 0;
    loop {
        buffer[length] = alphabet[(value % base) as usize];
        length += 1;
        value /= base;
        if value == 0 {
            break;
        }
    }
    length
}

/// Decimal digits of a negative value, least-significant-first, without
/// negating it (so `i64::MIN` needs no special case).
fn write_decimal_negative_backwards(buffer: &mut [u8; DIGIT_BUFFER_SIZE], mut value: i64) -> usize {
    let mut length = 0;
    loop {
        // The remainder is in -9..=0 for a negative dividend.
        buffer[length] = (i64::from(b'0') - (value % 10)) as u8;
        length += 1;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    length
}

/// How much zero padding `precision` asks for on top of `length` digits,
/// and the padded length.
fn precision_fields(spec: &FormatSpecifier, length: usize) -> (usize, usize) {
    if spec.precision == -1 {
        (length, 0)
    } else if spec.precision as usize > length {
        (spec.precision as usize, spec.precision as usize - length)
    } else {
        (length, 0)
    }
}

// ---------------------------------------------------------------------------
// Integer renderers
// ---------------------------------------------------------------------------

/// `%d`/`%i`/`%u` with a non-negative value. The sign prefix machinery is
/// shared, so an explicit `+` or ` ` flag surfaces for `%u` too.
pub fn write_decimal_positive(
    sink: &mut OutputSink<'_>,
    value: u64,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let mut buffer = [0u8; DIGIT_BUFFER_SIZE];

    // An explicit zero precision with a zero value prints no digits.
    let length = if spec.precision == 0 && value == 0 {
        0
    } else {
        write_integer_backwards(&mut buffer, value, spec, 10)
    };

    let (precision_length, precision_padding) = precision_fields(spec, length);

    let sign_chars = usize::from(spec.flags.always_sign || spec.flags.empty_sign);
    let width = spec.width as usize;
    let width_padding = width.saturating_sub(precision_length + sign_chars);

    let prefix = if spec.flags.always_sign {
        Some(b'+')
    } else if spec.flags.empty_sign {
        Some(b' ')
    } else {
        None
    };

    write_backwards_buffer_with_padding(
        sink,
        &buffer,
        length,
        spec,
        prefix,
        None,
        width_padding,
        precision_padding,
    )
}

/// `%d`/`%i` with a negative value.
pub fn write_decimal_negative(
    sink: &mut OutputSink<'_>,
    value: i64,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let mut buffer = [0u8; DIGIT_BUFFER_SIZE];
    let length = write_decimal_negative_backwards(&mut buffer, value);

    let (precision_length, precision_padding) = precision_fields(spec, length);

    // One column is spent on the minus sign.
    let width = spec.width as usize;
    let width_padding = width.saturating_sub(precision_length + 1);

    write_backwards_buffer_with_padding(
        sink,
        &buffer,
        length,
        spec,
        Some(b'-'),
        None,
        width_padding,
        precision_padding,
    )
}

/// `%o`. The `#` leading zero is dropped when precision padding already
/// begins the number with a zero.
pub fn write_octal(
    sink: &mut OutputSink<'_>,
    value: u64,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let mut spec = *spec;
    let mut buffer = [0u8; DIGIT_BUFFER_SIZE];

    let length = if spec.precision == 0 && value == 0 {
        0
    } else {
        write_integer_backwards(&mut buffer, value, &spec, 8)
    };

    let (precision_length, precision_padding) = precision_fields(&spec, length);

    if precision_length > length {
        spec.flags.alternate_form = false;
    }

    let prefix_chars = usize::from(spec.flags.alternate_form);
    let width = spec.width as usize;
    let width_padding = width.saturating_sub(precision_length + prefix_chars);

    let prefix = if spec.flags.alternate_form {
        Some(b'0')
    } else {
        None
    };

    write_backwards_buffer_with_padding(
        sink,
        &buffer,
        length,
        &spec,
        prefix,
        None,
        width_padding,
        precision_padding,
    )
}

/// `%x`/`%X`. The `#` prefix does not consult the value, so zero renders
/// as `0x0`.
pub fn write_hexadecimal(
    sink: &mut OutputSink<'_>,
    value: u64,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let mut buffer = [0u8; DIGIT_BUFFER_SIZE];

    let length = if spec.precision == 0 && value == 0 {
        0
    } else {
        write_integer_backwards(&mut buffer, value, spec, 16)
    };

    let (precision_length, precision_padding) = precision_fields(spec, length);

    let (prefix, prefix2) = if spec.flags.alternate_form {
        let x_char = if spec.conversion == b'X' { b'X' } else { b'x' };
        (Some(b'0'), Some(x_char))
    } else {
        (None, None)
    };

    let prefix_chars = if spec.flags.alternate_form { 2 } else { 0 };
    let width = spec.width as usize;
    let width_padding = width.saturating_sub(precision_length + prefix_chars);

    write_backwards_buffer_with_padding(
        sink,
        &buffer,
        length,
        spec,
        prefix,
        prefix2,
        width_padding,
        precision_padding,
    )
}

/// Non-negative integer dispatch for `%d`/`%i`/`%u`/`%o`/`%x`/`%X`.
pub fn write_integer_positive(
    sink: &mut OutputSink<'_>,
    value: u64,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    match spec.conversion {
        b'u' | b'd' | b'i' => write_decimal_positive(sink, value, spec),
        b'o' => write_octal(sink, value, spec),
        b'x' | b'X' => write_hexadecimal(sink, value, spec),
        other => Err(PrintfError::Unimplemented(other as char)),
    }
}

// ---------------------------------------------------------------------------
// String, character, pointer, %n
// ---------------------------------------------------------------------------

/// Length of the string up to `max` bytes or its first NUL, whichever
/// comes first. Safe on any slice.
fn strnlen_safe(s: &[u8], max: usize) -> usize {
    let window = &s[..max.min(s.len())];
    window.iter().position(|&b| b == 0).unwrap_or(window.len())
}

/// `%s`. A null input renders the `(null)` literal unless the precision is
/// an explicit zero.
pub fn write_string(
    sink: &mut OutputSink<'_>,
    input: Option<&[u8]>,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let input = match input {
        Some(bytes) => bytes,
        None if spec.precision != 0 => NULL_STRING_TEXT,
        None => b"",
    };

    // Precision bounds the scan as well as the output, so a non-terminated
    // buffer longer than the precision is never read past it.
    let length = if spec.precision != -1 {
        strnlen_safe(input, spec.precision as usize)
    } else {
        strnlen_safe(input, input.len())
    };

    let width = spec.width as usize;
    let padding_amount = width.saturating_sub(length);

    if spec.flags.left_justify {
        write_forwards_buffer(sink, &input[..length])?;
        pad_output(sink, padding_amount, b' ')
    } else {
        pad_output(sink, padding_amount, b' ')?;
        write_forwards_buffer(sink, &input[..length])
    }
}

/// `%c`: one byte inside its width padding.
pub fn write_character(
    sink: &mut OutputSink<'_>,
    value: u8,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let buffer = [value];
    let width = spec.width as usize;
    let padding_amount = width.saturating_sub(1);
    write_backwards_buffer_with_padding(sink, &buffer, 1, spec, None, None, padding_amount, 0)
}

/// `%p`: a null pointer renders the `(nil)` literal; anything else renders
/// as `%#x` with width and justification carried over and precision forced
/// back to unspecified.
pub fn write_pointer(
    sink: &mut OutputSink<'_>,
    pointer: usize,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let mut pointer_spec = FormatSpecifier {
        width: spec.width,
        conversion: b'x',
        ..FormatSpecifier::default()
    };
    pointer_spec.flags.left_justify = spec.flags.left_justify;

    if pointer == 0 {
        write_string(sink, Some(NULL_POINTER_TEXT), &pointer_spec)
    } else {
        pointer_spec.flags.alternate_form = true;
        write_hexadecimal(sink, pointer as u64, &pointer_spec)
    }
}

/// `%n`: store the running character count into the target, narrowed to the
/// declared width. A null target fails the call.
pub fn write_characters_written(
    sink: &OutputSink<'_>,
    target: Option<&Cell<i64>>,
    spec: &FormatSpecifier,
) -> Result<(), PrintfError> {
    let Some(target) = target else {
        return Err(PrintfError::NullCountTarget);
    };
    let count = sink.characters_written() as i64;
    let narrowed = match spec.length {
        LengthMod::Hh => i64::from(count as i8),
        LengthMod::H => i64::from(count as i16),
        LengthMod::None => i64::from(count as i32),
        _ => count,
    };
    target.set(narrowed);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
