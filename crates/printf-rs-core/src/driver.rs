//! The template walk.
//!
//! A single pass over the template: literal bytes go straight to the sink,
//! `%%` emits one `%`, and every other `%` starts a directive. The first
//! directive decides whether the whole call is positional; a positional
//! call sweeps the template and captures every argument before anything
//! renders (variadic arguments can only be popped in declaration order).
//!
//! Floating-point conversions parse and validate but have no renderer, so
//! they fail the call cleanly at dispatch.

use crate::args::{ArgList, ArgSource};
use crate::diag::{FormatDiagnostic, PrintfError};
use crate::positional::PositionalSlots;
use crate::render::{
    write_character, write_characters_written, write_decimal_negative, write_integer_positive,
    write_pointer, write_string,
};
use crate::sink::OutputSink;
use crate::spec::parse_specifier;
use crate::validate::normalise;

/// Render `format` with `args` into `sink`.
///
/// The template ends at the slice end or the first NUL byte. On success the
/// sink's `characters_written` is the call's result; any error aborts the
/// whole call.
pub fn format_into<'a>(
    sink: &mut OutputSink<'_>,
    format: &[u8],
    args: &mut ArgList<'a>,
) -> Result<(), PrintfError> {
    let mut using_positions = false;
    let mut first_directive = true;
    let mut slots: Option<PositionalSlots<'a>> = None;

    let mut pos = 0;
    while pos < format.len() && format[pos] != 0 {
        if format[pos] == b'%' && format.get(pos + 1) == Some(&b'%') {
            sink.emit(b'%')?;
            pos += 2;
            continue;
        }
        if format[pos] != b'%' {
            sink.emit(format[pos])?;
            pos += 1;
            continue;
        }

        // A directive.
        pos += 1;
        let parsed = parse_specifier(&format[pos..]).map_err(PrintfError::Directive)?;
        let mut spec = parsed.spec;

        // The first directive elects the mode; a positional call captures
        // every argument up front.
        if first_directive && spec.position != 0 {
            using_positions = true;
            let mut built = PositionalSlots::scan(format)?;
            built.populate(args)?;
            slots = Some(built);
        }
        first_directive = false;

        if (spec.position != 0) != using_positions {
            return Err(PrintfError::MixedMode);
        }

        let mut source = match (&slots, using_positions) {
            (Some(cache), true) => ArgSource::Positional(cache),
            _ => ArgSource::Sequential(&mut *args),
        };

        // A `*` width from the arguments; a negative value means
        // left-justify with the absolute width, saturating at i32::MAX.
        if spec.preceding_width != 0 {
            let width = source.width_precision(spec.preceding_width)?;
            if width >= 0 {
                spec.width = width as u32;
            } else {
                spec.flags.left_justify = true;
                spec.width = negate_width(width);
            }
        }

        // A `*` precision from the arguments; negative means unspecified.
        if spec.preceding_precision != 0 {
            let precision = source.width_precision(spec.preceding_precision)?;
            if precision >= 0 {
                spec.precision = precision;
            }
        }

        normalise(&mut spec);

        match spec.conversion {
            b'd' | b'i' => {
                let value = source.int_value(&spec)?;
                if value >= 0 {
                    write_integer_positive(sink, value as u64, &spec)?;
                } else {
                    write_decimal_negative(sink, value, &spec)?;
                }
            }
            b'u' | b'o' | b'x' | b'X' => {
                let value = source.uint_value(&spec)?;
                write_integer_positive(sink, value, &spec)?;
            }
            b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
                return Err(PrintfError::Unimplemented(spec.conversion as char));
            }
            b'c' => {
                let value = source.character_value(&spec)?;
                write_character(sink, value, &spec)?;
            }
            b's' => {
                let value = source.string_value(&spec)?;
                write_string(sink, value, &spec)?;
            }
            b'p' => {
                let value = source.pointer_value(&spec)?;
                write_pointer(sink, value, &spec)?;
            }
            b'n' => {
                let target = source.count_target(&spec)?;
                write_characters_written(sink, target, &spec)?;
            }
            _ => return Err(PrintfError::Directive(FormatDiagnostic::UnknownType)),
        }

        pos += spec.input_length;
    }
    Ok(())
}

/// Absolute value of a negative `*` width; `i32::MIN` saturates to
/// `i32::MAX`.
fn negate_width(width: i32) -> u32 {
    if width == i32::MIN {
        i32::MAX as u32
    } else {
        (-width) as u32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Arg;

    fn run(format: &[u8], args: &[Arg<'_>]) -> Result<Vec<u8>, PrintfError> {
        let mut out = Vec::new();
        {
            let mut sink = OutputSink::stream(&mut out);
            let mut list = ArgList::new(args);
            format_into(&mut sink, format, &mut list)?;
        }
        Ok(out)
    }

    #[test]
    fn test_literals_and_escape() {
        assert_eq!(run(b"100%% done", &[]).expect("run"), b"100% done");
    }

    #[test]
    fn test_interior_nul_terminates() {
        assert_eq!(run(b"ab\0cd", &[]).expect("run"), b"ab");
    }

    #[test]
    fn test_trailing_percent_is_an_error() {
        assert!(matches!(
            run(b"50%", &[]),
            Err(PrintfError::Directive(FormatDiagnostic::UnknownType))
        ));
    }

    #[test]
    fn test_mixed_directives() {
        assert_eq!(
            run(b"%s=%d", &[Arg::Str(Some(b"x")), Arg::Int(7)]).expect("run"),
            b"x=7"
        );
    }

    #[test]
    fn test_sequential_star_width_consumed_before_value() {
        assert_eq!(
            run(b"%*.*d", &[Arg::Int(6), Arg::Int(3), Arg::Int(42)]).expect("run"),
            b"   042"
        );
    }

    #[test]
    fn test_negative_star_width_left_justifies() {
        assert_eq!(
            run(b"%*d|", &[Arg::Int(-6), Arg::Int(42)]).expect("run"),
            b"42    |"
        );
    }

    #[test]
    fn test_min_star_width_saturates() {
        assert_eq!(negate_width(i32::MIN), i32::MAX as u32);
        assert_eq!(negate_width(-6), 6);
    }

    #[test]
    fn test_negative_star_precision_unspecified() {
        assert_eq!(
            run(b"%.*d", &[Arg::Int(-3), Arg::Int(42)]).expect("run"),
            b"42"
        );
    }

    #[test]
    fn test_positional_reorders_arguments() {
        assert_eq!(
            run(b"%2$s %1$s", &[Arg::Str(Some(b"world")), Arg::Str(Some(b"hello"))])
                .expect("run"),
            b"hello world"
        );
    }

    #[test]
    fn test_positional_value_served_twice() {
        assert_eq!(
            run(b"%1$d %1$d", &[Arg::Int(9)]).expect("run"),
            b"9 9"
        );
    }

    #[test]
    fn test_mode_mixing_fails_both_ways() {
        assert!(matches!(
            run(b"%1$d %d", &[Arg::Int(1), Arg::Int(2)]),
            Err(PrintfError::MixedMode)
        ));
        assert!(matches!(
            run(b"%d %2$d", &[Arg::Int(1), Arg::Int(2)]),
            Err(PrintfError::MixedMode)
        ));
    }

    #[test]
    fn test_float_fails_cleanly() {
        assert!(matches!(
            run(b"%f", &[Arg::Float(1.5)]),
            Err(PrintfError::Unimplemented('f'))
        ));
        // Positional float capture succeeds; dispatch still fails.
        assert!(matches!(
            run(b"%1$g", &[Arg::Float(1.5)]),
            Err(PrintfError::Unimplemented('g'))
        ));
    }

    #[test]
    fn test_count_writeback_mid_template() {
        let cell = std::cell::Cell::new(-1i64);
        let out = run(b"abc%nde", &[Arg::Count(Some(&cell))]).expect("run");
        assert_eq!(out, b"abcde");
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn test_length_narrowing_applies() {
        assert_eq!(
            run(b"%hhd", &[Arg::Int(300)]).expect("run"),
            b"44"
        );
        assert_eq!(
            run(b"%hhu", &[Arg::Uint(300)]).expect("run"),
            b"44"
        );
    }

    #[test]
    fn test_missing_argument_fails() {
        assert!(matches!(
            run(b"%d %d", &[Arg::Int(1)]),
            Err(PrintfError::MissingArgument)
        ));
    }
}
