//! Format directive model and parser.
//!
//! Clean-room implementation of the printf directive grammar
//! `%[pos$][flags][width][.precision][length]type`, including the POSIX
//! numbered-positional extension (`%n$`, `*m$`).
//!
//! Reference: POSIX.1-2024 fprintf, ISO C99 7.19.6.1
//!
//! The grammar is processed as a fixed pipeline: position, flags, width,
//! precision, length, type. A leading decimal run starting with 1-9 is
//! ambiguous until the byte after it is seen: `digits$` is a position and
//! parsing continues with flags; bare digits are a width and parsing
//! resumes at precision (flags cannot follow a width, so the flags stage
//! is not re-entered).

use crate::diag::FormatDiagnostic;
use crate::validate::check_length_conversion;

// ---------------------------------------------------------------------------
// Directive model
// ---------------------------------------------------------------------------

/// Flags parsed from a printf directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    /// `-`: pad on the right instead of the left.
    pub left_justify: bool,
    /// `+`: non-negative numbers carry an explicit `+`.
    pub always_sign: bool,
    /// ` `: non-negative numbers carry a leading space.
    pub empty_sign: bool,
    /// `#`: `0` / `0x` / `0X` prefixes for octal and hex.
    pub alternate_form: bool,
    /// `0`: pad numbers with zeros instead of spaces.
    pub zero_padded: bool,
}

/// Length modifier selecting the declared argument width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthMod {
    /// No modifier.
    #[default]
    None,
    /// `hh` — signed/unsigned char.
    Hh,
    /// `h` — signed/unsigned short.
    H,
    /// `l` — signed/unsigned long.
    L,
    /// `ll` — signed/unsigned long long.
    Ll,
    /// `j` — intmax_t/uintmax_t.
    J,
    /// `z` — size_t.
    Z,
    /// `t` — ptrdiff_t.
    T,
    /// `L` — long double.
    BigL,
}

/// A parsed printf directive.
///
/// `conversion` holds the raw type letter (`b'd'`, `b'x'`, ...). `position`
/// is 0 outside positional mode, otherwise the 1-based argument index.
/// `preceding_width`/`preceding_precision` are 0 when absent; in sequential
/// mode a `*` stores the sentinel 1 ("consume one int"), in positional mode
/// the 1-based index of the int argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpecifier {
    /// Bytes consumed from the template, counted from just after the `%`.
    pub input_length: usize,
    /// The five boolean flags.
    pub flags: FormatFlags,
    /// `*` width source (0 = inline/absent).
    pub preceding_width: i32,
    /// Minimum field width.
    pub width: u32,
    /// `.*` precision source (0 = inline/absent).
    pub preceding_precision: i32,
    /// Precision; -1 means unspecified, 0 means an explicit zero.
    pub precision: i32,
    /// Declared argument width class.
    pub length: LengthMod,
    /// The conversion letter.
    pub conversion: u8,
    /// 1-based positional index, or 0 when not positional.
    pub position: i32,
}

impl Default for FormatSpecifier {
    fn default() -> Self {
        Self {
            input_length: 0,
            flags: FormatFlags::default(),
            preceding_width: 0,
            width: 0,
            preceding_precision: 0,
            precision: -1,
            length: LengthMod::None,
            conversion: 0,
            position: 0,
        }
    }
}

impl std::fmt::Display for FormatSpecifier {
    /// Reconstruct the directive text, e.g. `%2$-08.3llx`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%")?;
        if self.position != 0 {
            write!(f, "{}$", self.position)?;
        }
        if self.flags.left_justify {
            write!(f, "-")?;
        }
        if self.flags.always_sign {
            write!(f, "+")?;
        }
        if self.flags.empty_sign {
            write!(f, " ")?;
        }
        if self.flags.alternate_form {
            write!(f, "#")?;
        }
        if self.flags.zero_padded {
            write!(f, "0")?;
        }
        if self.preceding_width != 0 {
            if self.position != 0 {
                write!(f, "*{}$", self.preceding_width)?;
            } else {
                write!(f, "*")?;
            }
        } else if self.width != 0 {
            write!(f, "{}", self.width)?;
        }
        if self.preceding_precision != 0 {
            if self.position != 0 {
                write!(f, ".*{}$", self.preceding_precision)?;
            } else {
                write!(f, ".*")?;
            }
        } else if self.precision != -1 {
            write!(f, ".{}", self.precision)?;
        }
        let length = match self.length {
            LengthMod::None => "",
            LengthMod::Hh => "hh",
            LengthMod::H => "h",
            LengthMod::L => "l",
            LengthMod::Ll => "ll",
            LengthMod::J => "j",
            LengthMod::Z => "z",
            LengthMod::T => "t",
            LengthMod::BigL => "L",
        };
        write!(f, "{}{}", length, self.conversion as char)
    }
}

/// A successfully parsed directive plus the last warning raised while
/// parsing it (or [`FormatDiagnostic::Okay`]).
#[derive(Debug, Clone, Copy)]
pub struct ParsedSpecifier {
    /// The parsed directive.
    pub spec: FormatSpecifier,
    /// `Okay` or one of the warning variants; never an error.
    pub warning: FormatDiagnostic,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single directive starting just after the `%` byte.
///
/// `fmt` points at the first byte after `%`; pass `b"5d"` for `"%5d"`. The
/// returned specifier records in `input_length` how many bytes it consumed.
/// Fatal grammar problems come back as `Err`; recoverable oddities are
/// reported in [`ParsedSpecifier::warning`] with the directive intact.
pub fn parse_specifier(fmt: &[u8]) -> Result<ParsedSpecifier, FormatDiagnostic> {
    let mut spec = FormatSpecifier::default();
    let mut warning = FormatDiagnostic::Okay;
    parse_position(fmt, &mut spec, &mut warning)?;
    check_length_conversion(&spec)?;
    Ok(ParsedSpecifier { spec, warning })
}

/// Position stage. A leading run of digits starting 1-9 is either a
/// `digits$` position (continue with flags) or a width (skip straight to
/// precision).
fn parse_position(
    fmt: &[u8],
    spec: &mut FormatSpecifier,
    warning: &mut FormatDiagnostic,
) -> Result<(), FormatDiagnostic> {
    // A '0' here is the zero-padding flag, never a position.
    if matches!(fmt.first(), Some(b'1'..=b'9')) {
        let (value, read) = read_decimal(fmt);
        spec.input_length += read;
        if fmt.get(read) == Some(&b'$') {
            spec.input_length += 1;
            spec.position = value;
            parse_flags(&fmt[read + 1..], spec, warning)
        } else {
            spec.width = value as u32;
            parse_precision(&fmt[read..], spec, warning)
        }
    } else {
        parse_flags(fmt, spec, warning)
    }
}

/// Flags stage: any mix of `-`, `+`, space, `#`, `0`. A repeat raises the
/// repeated-flag warning but the flag stays set.
fn parse_flags(
    fmt: &[u8],
    spec: &mut FormatSpecifier,
    warning: &mut FormatDiagnostic,
) -> Result<(), FormatDiagnostic> {
    let mut pos = 0;
    loop {
        let flag = match fmt.get(pos) {
            Some(b'-') => &mut spec.flags.left_justify,
            Some(b'+') => &mut spec.flags.always_sign,
            Some(b' ') => &mut spec.flags.empty_sign,
            Some(b'#') => &mut spec.flags.alternate_form,
            Some(b'0') => &mut spec.flags.zero_padded,
            _ => break,
        };
        if *flag {
            *warning = FormatDiagnostic::RepeatFlag;
        }
        *flag = true;
        spec.input_length += 1;
        pos += 1;
    }
    parse_width(&fmt[pos..], spec, warning)
}

/// Width stage: inline digits, or `*` (sequential sentinel), or `*digits$`
/// (positional index, mandatory once the directive carries a position).
fn parse_width(
    fmt: &[u8],
    spec: &mut FormatSpecifier,
    warning: &mut FormatDiagnostic,
) -> Result<(), FormatDiagnostic> {
    let mut pos = 0;
    if fmt.first() == Some(&b'*') {
        spec.input_length += 1;
        pos += 1;
        if spec.position != 0 {
            // One positional argument makes every argument positional.
            let (value, read) = read_decimal(&fmt[pos..]);
            spec.preceding_width = value;
            spec.input_length += read;
            pos += read;
            if value == 0 || fmt.get(pos) != Some(&b'$') {
                return Err(FormatDiagnostic::NoPositionalWidth);
            }
            spec.input_length += 1;
            pos += 1;
        } else {
            spec.preceding_width = 1;
        }
    } else {
        let (value, read) = read_decimal(fmt);
        spec.width = value as u32;
        spec.input_length += read;
        pos += read;
    }
    parse_precision(&fmt[pos..], spec, warning)
}

/// Precision stage: `.` introduces it. Bare `.` means an explicit zero;
/// `.*` mirrors the width's preceding-argument handling.
fn parse_precision(
    fmt: &[u8],
    spec: &mut FormatSpecifier,
    warning: &mut FormatDiagnostic,
) -> Result<(), FormatDiagnostic> {
    let mut pos = 0;
    if fmt.first() == Some(&b'.') {
        spec.input_length += 1;
        pos += 1;
        if fmt.get(pos) == Some(&b'*') {
            spec.input_length += 1;
            pos += 1;
            if spec.position != 0 {
                let (value, read) = read_decimal(&fmt[pos..]);
                spec.preceding_precision = value;
                spec.input_length += read;
                pos += read;
                if value == 0 || fmt.get(pos) != Some(&b'$') {
                    return Err(FormatDiagnostic::NoPositionalPrecision);
                }
                spec.input_length += 1;
                pos += 1;
            } else {
                spec.preceding_precision = 1;
            }
        } else {
            // Missing digits read as zero, which is the explicit-zero case.
            let (value, read) = read_decimal(&fmt[pos..]);
            spec.precision = value;
            spec.input_length += read;
            pos += read;
        }
    }
    parse_length(&fmt[pos..], spec, warning)
}

/// Length stage: `hh` and `ll` are matched greedily before `h` and `l`.
fn parse_length(
    fmt: &[u8],
    spec: &mut FormatSpecifier,
    warning: &mut FormatDiagnostic,
) -> Result<(), FormatDiagnostic> {
    let (length, read) = if fmt.starts_with(b"hh") {
        (LengthMod::Hh, 2)
    } else if fmt.first() == Some(&b'h') {
        (LengthMod::H, 1)
    } else if fmt.starts_with(b"ll") {
        (LengthMod::Ll, 2)
    } else if fmt.first() == Some(&b'l') {
        (LengthMod::L, 1)
    } else if fmt.first() == Some(&b'j') {
        (LengthMod::J, 1)
    } else if fmt.first() == Some(&b'z') {
        (LengthMod::Z, 1)
    } else if fmt.first() == Some(&b't') {
        (LengthMod::T, 1)
    } else if fmt.first() == Some(&b'L') {
        (LengthMod::BigL, 1)
    } else {
        (LengthMod::None, 0)
    };
    spec.length = length;
    spec.input_length += read;
    parse_type(&fmt[read..], spec, warning)
}

/// Type stage: one conversion letter, or the unknown-type error.
fn parse_type(
    fmt: &[u8],
    spec: &mut FormatSpecifier,
    _warning: &mut FormatDiagnostic,
) -> Result<(), FormatDiagnostic> {
    let Some(&letter) = fmt.first() else {
        return Err(FormatDiagnostic::UnknownType);
    };
    match letter {
        b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'f' | b'F' | b'e' | b'E' | b'g' | b'G'
        | b'a' | b'A' | b'c' | b's' | b'p' | b'n' => {
            spec.conversion = letter;
            spec.input_length += 1;
            Ok(())
        }
        _ => Err(FormatDiagnostic::UnknownType),
    }
}

/// Read a decimal run, saturating at `i32::MAX`. Returns the value (0 when
/// no digits are present) and the number of bytes consumed.
fn read_decimal(fmt: &[u8]) -> (i32, usize) {
    let mut value = 0i32;
    let mut read = 0;
    while let Some(&digit @ b'0'..=b'9') = fmt.get(read) {
        value = value
            .saturating_mul(10)
            .saturating_add(i32::from(digit - b'0'));
        read += 1;
    }
    (value, read)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
