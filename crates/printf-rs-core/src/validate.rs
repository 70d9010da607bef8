//! Directive validation and normalisation.
//!
//! Two passes over a parsed [`FormatSpecifier`]:
//!
//! - Pass A ([`check_length_conversion`]) rejects length/type pairs the
//!   standard leaves undefined, e.g. `%llp`. Fatal.
//! - Pass B ([`normalise`]) silently clears flags and fields that have no
//!   effect for the conversion (e.g. `#` on `%d`, `0` together with `-`),
//!   reporting the category of the last correction as a warning.
//!
//! Reference: ISO C99 7.19.6.1p5-p8 (flag semantics), p7 (length/type).

use crate::diag::FormatDiagnostic;
use crate::spec::{FormatSpecifier, LengthMod};

/// Reject undefined length/type combinations.
///
/// The legal table:
///
/// | conversion | legal lengths |
/// |---|---|
/// | d i u o x X n | none, hh, h, l, ll, j, z, t |
/// | f F e E g G a A | none, L |
/// | c s | none, l |
/// | p | none |
pub fn check_length_conversion(spec: &FormatSpecifier) -> Result<(), FormatDiagnostic> {
    let legal = match spec.conversion {
        b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'n' => spec.length != LengthMod::BigL,
        b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
            matches!(spec.length, LengthMod::None | LengthMod::BigL)
        }
        b'c' | b's' => matches!(spec.length, LengthMod::None | LengthMod::L),
        b'p' => spec.length == LengthMod::None,
        _ => return Err(FormatDiagnostic::UnknownType),
    };
    if legal {
        Ok(())
    } else {
        Err(FormatDiagnostic::IncompatibleLengthType)
    }
}

/// Clear flags and fields that do nothing for this conversion.
///
/// Run just before dispatching to a renderer, after any `*` width and
/// precision have been resolved (a negative `*` width sets `left_justify`,
/// which interacts with `0`). Returns the category of the last correction
/// applied, or `Okay`.
pub fn normalise(spec: &mut FormatSpecifier) -> FormatDiagnostic {
    let mut result = FormatDiagnostic::Okay;

    // '+' wins over ' ' when both are given.
    if spec.flags.always_sign && spec.flags.empty_sign {
        spec.flags.empty_sign = false;
        result = FormatDiagnostic::FlagDoesNothing;
    }

    // '#' means nothing in decimal.
    if matches!(spec.conversion, b'd' | b'i' | b'u') && spec.flags.alternate_form {
        spec.flags.alternate_form = false;
        result = FormatDiagnostic::FlagDoesNothing;
    }

    // Hex output never carries a sign.
    if matches!(spec.conversion, b'x' | b'X') {
        if spec.flags.always_sign {
            spec.flags.always_sign = false;
            result = FormatDiagnostic::FlagDoesNothing;
        }
        if spec.flags.empty_sign {
            spec.flags.empty_sign = false;
            result = FormatDiagnostic::FlagDoesNothing;
        }
    }

    // For c, s, p only '-' survives.
    if matches!(spec.conversion, b'c' | b's' | b'p') {
        if spec.flags.always_sign {
            spec.flags.always_sign = false;
            result = FormatDiagnostic::FlagDoesNothing;
        }
        if spec.flags.empty_sign {
            spec.flags.empty_sign = false;
            result = FormatDiagnostic::FlagDoesNothing;
        }
        if spec.flags.alternate_form {
            spec.flags.alternate_form = false;
            result = FormatDiagnostic::FlagDoesNothing;
        }
        if spec.flags.zero_padded {
            spec.flags.zero_padded = false;
            result = FormatDiagnostic::FlagDoesNothing;
        }
    }

    // %n prints nothing, so every presentation field is inert. The
    // preceding width/precision indices are kept so argument consumption
    // is not disturbed.
    if spec.conversion == b'n' {
        if spec.flags.always_sign {
            spec.flags.always_sign = false;
            result = FormatDiagnostic::DoesNotPrint;
        }
        if spec.flags.empty_sign {
            spec.flags.empty_sign = false;
            result = FormatDiagnostic::DoesNotPrint;
        }
        if spec.flags.alternate_form {
            spec.flags.alternate_form = false;
            result = FormatDiagnostic::DoesNotPrint;
        }
        if spec.flags.zero_padded {
            spec.flags.zero_padded = false;
            result = FormatDiagnostic::DoesNotPrint;
        }
        if spec.flags.left_justify {
            spec.flags.left_justify = false;
            result = FormatDiagnostic::DoesNotPrint;
        }
        if spec.width != 0 {
            spec.width = 0;
            result = FormatDiagnostic::DoesNotPrint;
        }
        if spec.precision != -1 {
            spec.precision = -1;
            result = FormatDiagnostic::DoesNotPrint;
        }
    }

    // Precision is meaningless for single characters and pointers.
    if matches!(spec.conversion, b'c' | b'p') && spec.precision != -1 {
        spec.precision = -1;
        result = FormatDiagnostic::PrecisionDoesNothing;
    }

    // '-' wins over '0'.
    if spec.flags.zero_padded && spec.flags.left_justify {
        spec.flags.zero_padded = false;
        result = FormatDiagnostic::FlagDoesNothing;
    }

    // An explicit precision disables zero padding.
    if spec.precision != -1 && spec.flags.zero_padded {
        spec.flags.zero_padded = false;
        result = FormatDiagnostic::FlagDoesNothing;
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
