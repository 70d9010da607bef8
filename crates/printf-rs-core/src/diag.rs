//! Directive diagnostics and the call-level error type.
//!
//! Parsing and normalising a directive produces a [`FormatDiagnostic`]:
//! four of its variants are fatal errors that abort the whole call, five
//! are warnings that are silently applied as normalisations. A warning is
//! never visible through the public entry points.
//!
//! [`PrintfError`] is the internal failure union for a whole call. Every
//! variant maps to `-1` at the public boundary; the type itself exists for
//! tests and diagnostic tooling.

use thiserror::Error;

/// Outcome classification for parsing or normalising one `%` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatDiagnostic {
    /// The directive is well formed and needed no correction.
    #[error("directive is well formed")]
    Okay,
    /// A positional `*` width was not followed by `digits$`.
    #[error("positional `*` width missing its `digits$` index")]
    NoPositionalWidth,
    /// A positional `.*` precision was not followed by `digits$`.
    #[error("positional `.*` precision missing its `digits$` index")]
    NoPositionalPrecision,
    /// The conversion letter is not one this engine knows.
    #[error("unknown conversion letter")]
    UnknownType,
    /// The length modifier cannot be combined with the conversion.
    #[error("length modifier is incompatible with the conversion")]
    IncompatibleLengthType,
    /// A flag was given that has no effect for this conversion.
    #[error("flag has no effect for this conversion")]
    FlagDoesNothing,
    /// The same flag appeared more than once.
    #[error("flag repeated in one directive")]
    RepeatFlag,
    /// A width was given where width cannot apply.
    #[error("width has no effect for this conversion")]
    WidthDoesNothing,
    /// A precision was given where precision cannot apply.
    #[error("precision has no effect for this conversion")]
    PrecisionDoesNothing,
    /// The directive consumes an argument but never produces output.
    #[error("directive produces no output")]
    DoesNotPrint,
}

impl FormatDiagnostic {
    /// True for the four fatal parse/validation errors.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::NoPositionalWidth
                | Self::NoPositionalPrecision
                | Self::UnknownType
                | Self::IncompatibleLengthType
        )
    }

    /// True for the five recoverable normalisation warnings.
    #[must_use]
    pub fn is_warning(self) -> bool {
        matches!(
            self,
            Self::FlagDoesNothing
                | Self::RepeatFlag
                | Self::WidthDoesNothing
                | Self::PrecisionDoesNothing
                | Self::DoesNotPrint
        )
    }
}

/// Why a whole printf call failed.
///
/// Public entry points collapse every variant to `-1`.
#[derive(Debug, Error)]
pub enum PrintfError {
    /// A directive failed to parse or validate.
    #[error("malformed directive: {0}")]
    Directive(FormatDiagnostic),
    /// Some directives carried `n$` positions and others did not.
    #[error("positional and sequential directives mixed in one template")]
    MixedMode,
    /// One positional slot was declared with two different (conversion,
    /// length) pairs.
    #[error("argument position {position} declared with conflicting types")]
    SlotConflict {
        /// 1-based positional index of the conflicting slot.
        position: i32,
    },
    /// Positions 1..max must all be declared; this one was skipped.
    #[error("argument position {position} is never used by the template")]
    SlotUnassigned {
        /// 1-based positional index of the gap.
        position: i32,
    },
    /// The argument list ran out before the template was satisfied.
    #[error("argument list exhausted")]
    MissingArgument,
    /// An argument's variant does not match what its directive requires.
    #[error("argument type does not match its directive")]
    ArgumentType,
    /// The conversion is recognised by the parser but has no renderer.
    #[error("conversion '%{0}' is not implemented")]
    Unimplemented(char),
    /// `%n` was given a null writeback target.
    #[error("null writeback target for %n")]
    NullCountTarget,
    /// The allocated-buffer sink could not grow.
    #[error("allocation failure while growing output buffer")]
    Alloc,
    /// The underlying stream or descriptor rejected a write.
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
