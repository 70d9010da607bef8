//! Typed variadic arguments and their retrieval.
//!
//! Arguments arrive the way the C calling convention delivers them:
//! already promoted. Every signed integer class travels as an `i64`, every
//! unsigned one as a `u64`, floats as `f64`, and `%c`'s character as a
//! promoted int. Retrieval narrows the promoted value back to the width
//! the directive declares, exactly as C narrows a popped va_arg by
//! assignment.
//!
//! [`ArgList`] is the sequential source: a cursor over the argument slice
//! with typed pops. [`ArgSource`] is the seam the driver renders through —
//! either the live sequential list or the positional cache populated ahead
//! of rendering.

use std::cell::Cell;

use crate::diag::PrintfError;
use crate::positional::PositionalSlots;
use crate::spec::{FormatSpecifier, LengthMod};

/// One variadic argument, promoted per the C calling convention.
///
/// `Str(None)` models a null `char *`; `Ptr(0)` is the null pointer;
/// `Count(None)` models a null `%n` target and fails the call cleanly.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    /// Any signed integer class, and the promoted `%c` / `*` int.
    Int(i64),
    /// Any unsigned integer class.
    Uint(u64),
    /// Any floating-point class. Retrieved, never rendered.
    Float(f64),
    /// A `%s` string as raw bytes; scanning stops at an interior NUL.
    Str(Option<&'a [u8]>),
    /// A `%p` pointer value; 0 is null.
    Ptr(usize),
    /// A `%n` writeback target.
    Count(Option<&'a Cell<i64>>),
}

/// Narrow a promoted signed value to its declared width.
pub(crate) fn narrow_int(value: i64, length: LengthMod) -> i64 {
    match length {
        LengthMod::Hh => i64::from(value as i8),
        LengthMod::H => i64::from(value as i16),
        LengthMod::None => i64::from(value as i32),
        _ => value,
    }
}

/// Narrow a promoted unsigned value to its declared width.
pub(crate) fn narrow_uint(value: u64, length: LengthMod) -> u64 {
    match length {
        LengthMod::Hh => u64::from(value as u8),
        LengthMod::H => u64::from(value as u16),
        LengthMod::None => u64::from(value as u32),
        _ => value,
    }
}

/// The sequential variadic source: a cursor over the caller's arguments.
///
/// The `v*` entry points take this by reference and copy it, so a caller's
/// list is never advanced by a callee (the `va_copy` contract).
#[derive(Debug, Clone)]
pub struct ArgList<'a> {
    args: &'a [Arg<'a>],
    next: usize,
}

impl<'a> ArgList<'a> {
    /// Wrap an argument slice.
    #[must_use]
    pub fn new(args: &'a [Arg<'a>]) -> Self {
        Self { args, next: 0 }
    }

    /// Pop the next argument in declaration order.
    pub fn pop(&mut self) -> Result<Arg<'a>, PrintfError> {
        let arg = self
            .args
            .get(self.next)
            .copied()
            .ok_or(PrintfError::MissingArgument)?;
        self.next += 1;
        Ok(arg)
    }

    /// Pop a signed integer, narrowed to the declared width.
    pub fn pop_int(&mut self, length: LengthMod) -> Result<i64, PrintfError> {
        match self.pop()? {
            Arg::Int(value) => Ok(narrow_int(value, length)),
            _ => Err(PrintfError::ArgumentType),
        }
    }

    /// Pop an unsigned integer, narrowed to the declared width.
    pub fn pop_uint(&mut self, length: LengthMod) -> Result<u64, PrintfError> {
        match self.pop()? {
            Arg::Uint(value) => Ok(narrow_uint(value, length)),
            _ => Err(PrintfError::ArgumentType),
        }
    }

    /// Pop a float. The width class does not matter at `f64`.
    pub fn pop_float(&mut self) -> Result<f64, PrintfError> {
        match self.pop()? {
            Arg::Float(value) => Ok(value),
            _ => Err(PrintfError::ArgumentType),
        }
    }

    /// Pop the promoted `%c` argument, narrowed to an unsigned byte.
    pub fn pop_character(&mut self) -> Result<u8, PrintfError> {
        match self.pop()? {
            Arg::Int(value) => Ok(value as u8),
            _ => Err(PrintfError::ArgumentType),
        }
    }

    /// Pop a `%s` string.
    pub fn pop_str(&mut self) -> Result<Option<&'a [u8]>, PrintfError> {
        match self.pop()? {
            Arg::Str(value) => Ok(value),
            _ => Err(PrintfError::ArgumentType),
        }
    }

    /// Pop a `%p` pointer value.
    pub fn pop_ptr(&mut self) -> Result<usize, PrintfError> {
        match self.pop()? {
            Arg::Ptr(value) => Ok(value),
            _ => Err(PrintfError::ArgumentType),
        }
    }

    /// Pop a `%n` writeback target.
    pub fn pop_count(&mut self) -> Result<Option<&'a Cell<i64>>, PrintfError> {
        match self.pop()? {
            Arg::Count(target) => Ok(target),
            _ => Err(PrintfError::ArgumentType),
        }
    }

    /// Pop the int feeding a `*` width or precision.
    pub fn pop_width_precision(&mut self) -> Result<i32, PrintfError> {
        match self.pop()? {
            Arg::Int(value) => Ok(value as i32),
            _ => Err(PrintfError::ArgumentType),
        }
    }
}

/// Where a directive's values come from: the live sequential list, or the
/// positional cache filled before any rendering.
pub enum ArgSource<'a, 'b> {
    /// Pop one argument per directive, in encounter order.
    Sequential(&'b mut ArgList<'a>),
    /// Serve values by 1-based position from the populated cache.
    Positional(&'b PositionalSlots<'a>),
}

impl<'a> ArgSource<'a, '_> {
    /// The signed integer for a `d`/`i` directive.
    pub fn int_value(&mut self, spec: &FormatSpecifier) -> Result<i64, PrintfError> {
        match self {
            Self::Sequential(list) => list.pop_int(spec.length),
            Self::Positional(slots) => match slots.load(spec.position)? {
                Arg::Int(value) => Ok(narrow_int(value, spec.length)),
                _ => Err(PrintfError::ArgumentType),
            },
        }
    }

    /// The unsigned integer for a `u`/`o`/`x`/`X` directive.
    pub fn uint_value(&mut self, spec: &FormatSpecifier) -> Result<u64, PrintfError> {
        match self {
            Self::Sequential(list) => list.pop_uint(spec.length),
            Self::Positional(slots) => match slots.load(spec.position)? {
                Arg::Uint(value) => Ok(narrow_uint(value, spec.length)),
                _ => Err(PrintfError::ArgumentType),
            },
        }
    }

    /// The byte for a `%c` directive (promoted int, narrowed).
    pub fn character_value(&mut self, spec: &FormatSpecifier) -> Result<u8, PrintfError> {
        match self {
            Self::Sequential(list) => list.pop_character(),
            Self::Positional(slots) => match slots.load(spec.position)? {
                Arg::Int(value) => Ok(value as u8),
                _ => Err(PrintfError::ArgumentType),
            },
        }
    }

    /// The string for a `%s` directive.
    pub fn string_value(&mut self, spec: &FormatSpecifier) -> Result<Option<&'a [u8]>, PrintfError> {
        match self {
            Self::Sequential(list) => list.pop_str(),
            Self::Positional(slots) => match slots.load(spec.position)? {
                Arg::Str(value) => Ok(value),
                _ => Err(PrintfError::ArgumentType),
            },
        }
    }

    /// The pointer for a `%p` directive.
    pub fn pointer_value(&mut self, spec: &FormatSpecifier) -> Result<usize, PrintfError> {
        match self {
            Self::Sequential(list) => list.pop_ptr(),
            Self::Positional(slots) => match slots.load(spec.position)? {
                Arg::Ptr(value) => Ok(value),
                _ => Err(PrintfError::ArgumentType),
            },
        }
    }

    /// The writeback target for a `%n` directive.
    pub fn count_target(
        &mut self,
        spec: &FormatSpecifier,
    ) -> Result<Option<&'a Cell<i64>>, PrintfError> {
        match self {
            Self::Sequential(list) => list.pop_count(),
            Self::Positional(slots) => match slots.load(spec.position)? {
                Arg::Count(target) => Ok(target),
                _ => Err(PrintfError::ArgumentType),
            },
        }
    }

    /// The int feeding a `*` width or precision. In sequential mode this
    /// consumes the next argument; in positional mode `position` names the
    /// slot.
    pub fn width_precision(&mut self, position: i32) -> Result<i32, PrintfError> {
        match self {
            Self::Sequential(list) => list.pop_width_precision(),
            Self::Positional(slots) => match slots.load(position)? {
                Arg::Int(value) => Ok(value as i32),
                _ => Err(PrintfError::ArgumentType),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
