//! Positional argument planning and caching.
//!
//! Variadic arguments can only be popped in declaration order, but a
//! positional template consumes them in directive order. So before any
//! rendering, the whole template is swept once: every numbered position is
//! recorded with the (conversion, length) pair it was declared with, the
//! argument list is popped once per slot in index order, and the values are
//! then served by position while the driver renders.
//!
//! Slot declarations are a closed equality check: a position referenced
//! twice must carry the same (conversion, length) both times, and a `*m$`
//! width or precision slot is declared as a plain int. Positions 1..max
//! must all be declared; a gap fails the whole call.

use crate::args::{Arg, ArgList};
use crate::diag::PrintfError;
use crate::spec::{parse_specifier, LengthMod};

/// Starting slot count; doubled whenever a higher position appears.
const DEFAULT_SLOT_COUNT: usize = 8;

/// One positional slot: what the template declared for it, and the
/// captured argument once populated.
#[derive(Debug, Clone, Copy, Default)]
struct Slot<'a> {
    declared: Option<(u8, LengthMod)>,
    value: Option<Arg<'a>>,
}

/// The positional cache. Slot `i` holds the argument declared at position
/// `i + 1`.
pub struct PositionalSlots<'a> {
    slots: Vec<Slot<'a>>,
    count: usize,
}

impl<'a> PositionalSlots<'a> {
    /// Sweep the whole template and record every position's declared type.
    ///
    /// Called once, as soon as the first directive reveals the call is
    /// positional. Every directive must carry a position; rendering-only
    /// fields are ignored here.
    pub fn scan(format: &[u8]) -> Result<Self, PrintfError> {
        let mut slots = Self {
            slots: vec![Slot::default(); DEFAULT_SLOT_COUNT],
            count: 0,
        };

        let mut pos = 0;
        while pos < format.len() && format[pos] != 0 {
            if format[pos] == b'%' && format.get(pos + 1) == Some(&b'%') {
                pos += 2;
            } else if format[pos] == b'%' {
                pos += 1;
                let parsed =
                    parse_specifier(&format[pos..]).map_err(PrintfError::Directive)?;
                let spec = parsed.spec;
                if spec.position == 0 {
                    return Err(PrintfError::MixedMode);
                }
                if spec.preceding_width != 0 {
                    // The width argument is a plain int.
                    slots.record(spec.preceding_width, (b'i', LengthMod::None))?;
                }
                if spec.preceding_precision != 0 {
                    slots.record(spec.preceding_precision, (b'i', LengthMod::None))?;
                }
                slots.record(spec.position, (spec.conversion, spec.length))?;
                pos += spec.input_length;
            } else {
                pos += 1;
            }
        }

        // Every position up to the highest must have been declared.
        for index in 0..slots.count {
            if slots.slots[index].declared.is_none() {
                return Err(PrintfError::SlotUnassigned {
                    position: (index + 1) as i32,
                });
            }
        }
        Ok(slots)
    }

    /// Declare `position` as holding `declared`, growing the slot array as
    /// needed. Redeclaring with a different pair is fatal.
    fn record(&mut self, position: i32, declared: (u8, LengthMod)) -> Result<(), PrintfError> {
        let index = (position - 1) as usize;
        if index >= self.slots.len() {
            let mut new_len = self.slots.len();
            while new_len <= index {
                new_len = new_len.checked_mul(2).ok_or(PrintfError::Alloc)?;
            }
            self.slots
                .try_reserve_exact(new_len - self.slots.len())
                .map_err(|_| PrintfError::Alloc)?;
            self.slots.resize(new_len, Slot::default());
        }
        let slot = &mut self.slots[index];
        match slot.declared {
            Some(existing) if existing != declared => {
                return Err(PrintfError::SlotConflict { position });
            }
            _ => slot.declared = Some(declared),
        }
        if position as usize > self.count {
            self.count = position as usize;
        }
        Ok(())
    }

    /// Pop one argument per slot, in index order, into the cache.
    ///
    /// Index order is declaration order, so this is the only place the
    /// sequential list is touched in a positional call.
    pub fn populate(&mut self, args: &mut ArgList<'a>) -> Result<(), PrintfError> {
        for index in 0..self.count {
            let Some((conversion, _length)) = self.slots[index].declared else {
                return Err(PrintfError::SlotUnassigned {
                    position: (index + 1) as i32,
                });
            };
            let arg = args.pop()?;
            let matches_class = match conversion {
                b'd' | b'i' | b'c' => matches!(arg, Arg::Int(_)),
                b'u' | b'o' | b'x' | b'X' => matches!(arg, Arg::Uint(_)),
                b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
                    matches!(arg, Arg::Float(_))
                }
                b's' => matches!(arg, Arg::Str(_)),
                b'p' => matches!(arg, Arg::Ptr(_)),
                b'n' => matches!(arg, Arg::Count(_)),
                _ => false,
            };
            if !matches_class {
                return Err(PrintfError::ArgumentType);
            }
            self.slots[index].value = Some(arg);
        }
        Ok(())
    }

    /// Serve the captured argument for a 1-based position.
    pub fn load(&self, position: i32) -> Result<Arg<'a>, PrintfError> {
        self.slots
            .get((position - 1) as usize)
            .and_then(|slot| slot.value)
            .ok_or(PrintfError::SlotUnassigned { position })
    }

    /// Highest declared position.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_records_positions_and_types() {
        let slots = PositionalSlots::scan(b"%2$s %1$d").expect("scan");
        assert_eq!(slots.count(), 2);
    }

    #[test]
    fn test_scan_skips_escapes_and_literals() {
        let slots = PositionalSlots::scan(b"100%% of %1$d").expect("scan");
        assert_eq!(slots.count(), 1);
    }

    #[test]
    fn test_scan_rejects_sequential_directive() {
        assert!(matches!(
            PositionalSlots::scan(b"%1$d %d"),
            Err(PrintfError::MixedMode)
        ));
    }

    #[test]
    fn test_scan_rejects_gap() {
        assert!(matches!(
            PositionalSlots::scan(b"%1$d %3$d"),
            Err(PrintfError::SlotUnassigned { position: 2 })
        ));
    }

    #[test]
    fn test_scan_rejects_conflicting_redeclaration() {
        // Same position as signed decimal and as string.
        assert!(matches!(
            PositionalSlots::scan(b"%1$d %1$s"),
            Err(PrintfError::SlotConflict { position: 1 })
        ));
        // d and i are distinct declarations even though they render alike.
        assert!(matches!(
            PositionalSlots::scan(b"%1$d %1$i"),
            Err(PrintfError::SlotConflict { position: 1 })
        ));
    }

    #[test]
    fn test_scan_accepts_matching_redeclaration() {
        let slots = PositionalSlots::scan(b"%1$d %1$d").expect("scan");
        assert_eq!(slots.count(), 1);
    }

    #[test]
    fn test_scan_width_slot_is_an_int() {
        // Position 2 feeds a width, so it is declared as an int; reusing it
        // as a string conflicts.
        assert!(matches!(
            PositionalSlots::scan(b"%1$*2$d %2$s"),
            Err(PrintfError::SlotConflict { position: 2 })
        ));
        // Reusing it as %2$i matches the int declaration.
        let slots = PositionalSlots::scan(b"%1$*2$d %2$i").expect("scan");
        assert_eq!(slots.count(), 2);
    }

    #[test]
    fn test_scan_precision_slot_checked_at_its_own_index() {
        // The precision index (3) must be validated against slot 3, not the
        // width slot.
        assert!(matches!(
            PositionalSlots::scan(b"%1$*2$.*3$d %3$s"),
            Err(PrintfError::SlotConflict { position: 3 })
        ));
    }

    #[test]
    fn test_scan_grows_past_default_size() {
        let slots = PositionalSlots::scan(
            b"%1$d %2$d %3$d %4$d %5$d %6$d %7$d %8$d %9$d %10$d %11$d %12$d",
        )
        .expect("scan");
        assert_eq!(slots.count(), 12);
    }

    #[test]
    fn test_populate_and_load() {
        let mut slots = PositionalSlots::scan(b"%2$s %1$d").expect("scan");
        let args = [Arg::Int(42), Arg::Str(Some(b"hello"))];
        let mut list = ArgList::new(&args);
        slots.populate(&mut list).expect("populate");
        assert!(matches!(slots.load(1), Ok(Arg::Int(42))));
        assert!(matches!(slots.load(2), Ok(Arg::Str(Some(s))) if s == b"hello"));
    }

    #[test]
    fn test_populate_checks_argument_class() {
        let mut slots = PositionalSlots::scan(b"%1$d").expect("scan");
        let args = [Arg::Uint(42)];
        let mut list = ArgList::new(&args);
        assert!(matches!(
            slots.populate(&mut list),
            Err(PrintfError::ArgumentType)
        ));
    }

    #[test]
    fn test_populate_detects_exhaustion() {
        let mut slots = PositionalSlots::scan(b"%1$d %2$d").expect("scan");
        let args = [Arg::Int(1)];
        let mut list = ArgList::new(&args);
        assert!(matches!(
            slots.populate(&mut list),
            Err(PrintfError::MissingArgument)
        ));
    }
}
