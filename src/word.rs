//! Word motions over a segment buffer.
//!
//! Provides the two boundary motions a composer needs (Ctrl+Arrow jumps and
//! word-wise deletion):
//!
//! - [`word_forward`]: forward to the start of the next word, or the end of
//!   the line when no word follows.
//! - [`word_backward`]: backward to the start of the current or previous
//!   word, or the start of the line.
//!
//! A **word** is a run of word characters (letters, digits, underscore) or
//! a run of other non-blank characters: `hello.world` holds three words.
//! A **chip is always its own word**, one unit wide; two adjacent chips are
//! two words, so repeated jumps visit each attachment.
//!
//! Motion works in unit space (one unit per char, one per chip) so token
//! scanning does not care where segment boundaries fall.

use crate::buffer::SegmentBuffer;
use crate::position::Position;
use crate::segment::Segment;

// ---------------------------------------------------------------------------
// Unit classification
// ---------------------------------------------------------------------------

/// Class of a single unit for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters (operators, brackets, etc.).
    Punct,
    /// Whitespace, including newlines inside a multi-line draft.
    Blank,
    /// An attachment chip. Atomic: one unit, one word.
    Chip,
}

fn classify(ch: char) -> UnitClass {
    if ch.is_whitespace() {
        UnitClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        UnitClass::Word
    } else {
        UnitClass::Punct
    }
}

/// Flatten the buffer into one class per unit.
fn unit_classes(buf: &SegmentBuffer) -> Vec<UnitClass> {
    let mut out = Vec::with_capacity(buf.total_units());
    for seg in buf.segments() {
        match seg {
            Segment::Text(v) => out.extend(v.chars().map(classify)),
            Segment::Chip(_) => out.push(UnitClass::Chip),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// Forward to the start of the next word.
///
/// 1. Skip the current token (a chip is a one-unit token).
/// 2. Skip blanks.
/// 3. Land on the first unit of the next token, or the end of the line.
#[must_use]
pub fn word_forward(buf: &SegmentBuffer, pos: Position) -> Position {
    let classes = unit_classes(buf);
    let total = classes.len();
    let mut u = buf.pos_to_unit(pos);
    if u >= total {
        return buf.clamp(pos);
    }

    match classes[u] {
        UnitClass::Chip => u += 1,
        cls @ (UnitClass::Word | UnitClass::Punct) => {
            while u < total && classes[u] == cls {
                u += 1;
            }
        }
        UnitClass::Blank => {}
    }
    while u < total && classes[u] == UnitClass::Blank {
        u += 1;
    }

    buf.unit_to_pos(u)
}

/// Backward to the start of the current or previous word.
///
/// 1. Step back one unit, then skip blanks backward.
/// 2. A chip is its own word; otherwise walk back to the token's start.
/// 3. Land on the token's first unit, or the start of the line when only
///    blanks precede.
#[must_use]
pub fn word_backward(buf: &SegmentBuffer, pos: Position) -> Position {
    let classes = unit_classes(buf);
    let mut u = buf.pos_to_unit(pos);
    if u == 0 {
        return buf.clamp(pos);
    }
    u -= 1;

    while u > 0 && classes[u] == UnitClass::Blank {
        u -= 1;
    }
    if classes[u] == UnitClass::Blank {
        // Nothing but blanks before the cursor.
        return buf.unit_to_pos(0);
    }

    if classes[u] != UnitClass::Chip {
        let cls = classes[u];
        while u > 0 && classes[u - 1] == cls {
            u -= 1;
        }
    }

    buf.unit_to_pos(u)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
