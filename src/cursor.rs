//! Cursor: position tracking with atomic movement and selection.
//!
//! The `Cursor` tracks a position in a segment buffer plus an optional
//! selection anchor. Movement is by *unit*: one grapheme cluster inside a
//! text run, or one whole chip in a single step. The cursor never comes to
//! rest "inside" a chip; crossing one lands on the far boundary, expressed
//! in the neighboring run when one exists.
//!
//! # Selection
//!
//! The cursor has an optional `anchor` position. When set, the span between
//! the anchor and the current position forms the selection (normalized by
//! [`Range::ordered`], so dragging backwards works). The model does not
//! decide *when* a selection exists; the host sets the anchor on
//! shift-movement or mouse drag and clears it on plain movement.
//!
//! Like the rest of the model, movement is total: out-of-range positions
//! clamp, and motion at a sequence boundary is a no-op.

use crate::buffer::{SegmentBuffer, next_grapheme_end, prev_grapheme_start};
use crate::position::{Position, Range};
use crate::segment::Segment;
use crate::word;

/// A cursor in a segment buffer.
///
/// Lightweight value type: a position and an optional anchor. Does not own
/// or reference the buffer; the buffer is passed to movement methods as a
/// parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Current position in the buffer.
    pos: Position,

    /// Selection anchor. When `Some`, the span between `anchor` and `pos`
    /// is selected. The anchor is the "other end": it stays put while the
    /// cursor moves.
    anchor: Option<Position>,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            anchor: None,
        }
    }

    /// Create a cursor at a specific position.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self { pos, anchor: None }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    /// The selection anchor, if a selection is active.
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// True if a selection is active (anchor is set).
    #[inline]
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        self.anchor.is_some()
    }

    /// The selected range, if a selection is active. Always ordered
    /// (start <= end) regardless of drag direction. May be empty when the
    /// cursor has not moved off the anchor.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        self.anchor.map(|anchor| Range::ordered(anchor, self.pos))
    }

    // -- Selection control --------------------------------------------------

    /// Set the selection anchor at the current position.
    pub const fn set_anchor(&mut self) {
        self.anchor = Some(self.pos);
    }

    /// Set the selection anchor at a specific position, clamped.
    pub fn set_anchor_at(&mut self, pos: Position, buf: &SegmentBuffer) {
        self.anchor = Some(buf.clamp(pos));
    }

    /// Clear the selection (remove the anchor).
    pub const fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    // -- Direct positioning -------------------------------------------------

    /// Move the cursor to an exact position, clamped to the buffer.
    /// Does not touch the selection anchor.
    pub fn set_position(&mut self, pos: Position, buf: &SegmentBuffer) {
        self.pos = buf.clamp(pos);
    }

    /// Jump to the start of the sequence.
    pub const fn move_to_start(&mut self) {
        self.pos = Position::ZERO;
    }

    /// Jump to the position after the last unit.
    pub fn move_to_end(&mut self, buf: &SegmentBuffer) {
        self.pos = buf.end_position();
    }

    // -- Unit movement ------------------------------------------------------

    /// Move one unit left: one grapheme cluster within a run, or across a
    /// whole chip. No-op at the start of the sequence.
    pub fn move_left(&mut self, buf: &SegmentBuffer) {
        self.pos = buf.clamp(self.pos);
        let Position {
            segment: i,
            offset: o,
        } = self.pos;
        match buf.get(i) {
            Some(Segment::Text(v)) if o > 0 => {
                self.pos.offset = prev_grapheme_start(v, o);
            }
            Some(Segment::Chip(_)) if o >= 1 => {
                self.pos = before_chip(buf, i);
            }
            Some(_) => {
                // Offset 0: step over whatever precedes this segment.
                if let Some(pos) = prev_unit_from(buf, i) {
                    self.pos = pos;
                }
            }
            None => {}
        }
    }

    /// Move one unit right: one grapheme cluster within a run, or across a
    /// whole chip. No-op at the end of the sequence.
    pub fn move_right(&mut self, buf: &SegmentBuffer) {
        self.pos = buf.clamp(self.pos);
        let Position {
            segment: i,
            offset: o,
        } = self.pos;
        match buf.get(i) {
            Some(Segment::Text(v)) if o < v.chars().count() => {
                self.pos.offset = next_grapheme_end(v, o);
            }
            Some(Segment::Chip(_)) if o == 0 => {
                self.pos = after_chip(buf, i);
            }
            Some(_) => {
                // Back boundary: step over whatever follows this segment.
                if let Some(pos) = next_unit_from(buf, i) {
                    self.pos = pos;
                }
            }
            None => {}
        }
    }

    // -- Word movement ------------------------------------------------------

    /// Move to the previous word boundary. Chips are atomic words.
    pub fn word_left(&mut self, buf: &SegmentBuffer) {
        self.pos = word::word_backward(buf, self.pos);
    }

    /// Move to the next word boundary. Chips are atomic words.
    pub fn word_right(&mut self, buf: &SegmentBuffer) {
        self.pos = word::word_forward(buf, self.pos);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Boundary helpers
// ---------------------------------------------------------------------------

/// The position just after the chip at `chip_idx`: offset 0 of a following
/// run when one exists, else offset 1 on the chip itself.
fn after_chip(buf: &SegmentBuffer, chip_idx: usize) -> Position {
    if buf.get(chip_idx + 1).is_some_and(Segment::is_text) {
        Position::new(chip_idx + 1, 0)
    } else {
        Position::new(chip_idx, 1)
    }
}

/// The position just before the chip at `chip_idx`: the end of a preceding
/// run when one exists, else offset 0 on the chip itself.
fn before_chip(buf: &SegmentBuffer, chip_idx: usize) -> Position {
    if chip_idx > 0 {
        if let Some(Segment::Text(v)) = buf.get(chip_idx - 1) {
            return Position::new(chip_idx - 1, v.chars().count());
        }
    }
    Position::new(chip_idx, 0)
}

/// One unit forward from the back boundary of segment `i`, skipping empty
/// runs. `None` at the end of the sequence.
fn next_unit_from(buf: &SegmentBuffer, i: usize) -> Option<Position> {
    let mut j = i + 1;
    while let Some(seg) = buf.get(j) {
        match seg {
            Segment::Text(v) if v.is_empty() => j += 1,
            Segment::Text(v) => return Some(Position::new(j, next_grapheme_end(v, 0))),
            Segment::Chip(_) => return Some(after_chip(buf, j)),
        }
    }
    None
}

/// One unit backward from the front boundary of segment `i`, skipping empty
/// runs. `None` at the start of the sequence.
fn prev_unit_from(buf: &SegmentBuffer, i: usize) -> Option<Position> {
    let mut j = i;
    while j > 0 {
        j -= 1;
        match buf.get(j) {
            Some(Segment::Text(v)) if v.is_empty() => {}
            Some(Segment::Text(v)) => {
                let len = v.chars().count();
                return Some(Position::new(j, prev_grapheme_start(v, len)));
            }
            Some(Segment::Chip(_)) => return Some(before_chip(buf, j)),
            None => return None,
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Chip;
    use pretty_assertions::assert_eq;

    fn p(segment: usize, offset: usize) -> Position {
        Position::new(segment, offset)
    }

    /// [Text("ab"), Chip(p1), Text("cd")]
    fn sandwich() -> SegmentBuffer {
        SegmentBuffer::from_segments(vec![
            Segment::text("ab"),
            Segment::Chip(Chip::property("p1", "x")),
            Segment::text("cd"),
        ])
    }

    // -- Construction & accessors -------------------------------------------

    #[test]
    fn new_at_origin() {
        let c = Cursor::new();
        assert_eq!(c.position(), Position::ZERO);
        assert!(!c.has_selection());
    }

    #[test]
    fn set_position_clamps() {
        let buf = sandwich();
        let mut c = Cursor::new();
        c.set_position(p(99, 99), &buf);
        assert_eq!(c.position(), p(2, 2));
    }

    // -- Horizontal movement ------------------------------------------------

    #[test]
    fn move_right_within_run() {
        let buf = sandwich();
        let mut c = Cursor::new();
        c.move_right(&buf);
        assert_eq!(c.position(), p(0, 1));
    }

    #[test]
    fn move_right_crosses_chip_whole() {
        let buf = sandwich();
        let mut c = Cursor::at(p(0, 2));
        c.move_right(&buf);
        // One step lands past the chip, expressed in the following run.
        assert_eq!(c.position(), p(2, 0));
    }

    #[test]
    fn move_right_noop_at_end() {
        let buf = sandwich();
        let mut c = Cursor::at(p(2, 2));
        c.move_right(&buf);
        assert_eq!(c.position(), p(2, 2));
    }

    #[test]
    fn move_right_walks_full_line() {
        let buf = sandwich();
        let mut c = Cursor::new();
        let mut seen = vec![c.position()];
        for _ in 0..buf.total_units() {
            c.move_right(&buf);
            seen.push(c.position());
        }
        assert_eq!(
            seen,
            vec![p(0, 0), p(0, 1), p(0, 2), p(2, 0), p(2, 1), p(2, 2)]
        );
        // Saturated: one more step changes nothing.
        c.move_right(&buf);
        assert_eq!(c.position(), p(2, 2));
    }

    #[test]
    fn move_left_within_run() {
        let buf = sandwich();
        let mut c = Cursor::at(p(2, 2));
        c.move_left(&buf);
        assert_eq!(c.position(), p(2, 1));
    }

    #[test]
    fn move_left_crosses_chip_whole() {
        let buf = sandwich();
        let mut c = Cursor::at(p(2, 0));
        c.move_left(&buf);
        assert_eq!(c.position(), p(0, 2));
    }

    #[test]
    fn move_left_noop_at_start() {
        let buf = sandwich();
        let mut c = Cursor::new();
        c.move_left(&buf);
        assert_eq!(c.position(), p(0, 0));
    }

    #[test]
    fn move_left_walks_full_line() {
        let buf = sandwich();
        let mut c = Cursor::at(buf.end_position());
        let mut seen = vec![c.position()];
        for _ in 0..buf.total_units() {
            c.move_left(&buf);
            seen.push(c.position());
        }
        assert_eq!(
            seen,
            vec![p(2, 2), p(2, 1), p(2, 0), p(0, 2), p(0, 1), p(0, 0)]
        );
    }

    #[test]
    fn movement_over_leading_chip() {
        // [Chip, Text(" ")]
        let mut buf = SegmentBuffer::from_parts("", vec![Chip::property("p1", "x")], vec![]);
        buf.insert_text_at(p(0, 1), " ");

        let mut c = Cursor::new();
        c.move_right(&buf);
        assert_eq!(c.position(), p(1, 0));
        c.move_right(&buf);
        assert_eq!(c.position(), p(1, 1));
        c.move_left(&buf);
        assert_eq!(c.position(), p(1, 0));
        c.move_left(&buf);
        assert_eq!(c.position(), p(0, 0));
    }

    #[test]
    fn movement_between_adjacent_chips() {
        let buf = SegmentBuffer::from_parts(
            "",
            vec![Chip::property("p1", "x"), Chip::property("p2", "y")],
            vec![],
        );
        let mut c = Cursor::new();
        c.move_right(&buf);
        // Past the first chip; no run follows it, so the boundary is
        // expressed on the crossed chip itself.
        assert_eq!(c.position(), p(0, 1));
        c.move_right(&buf);
        assert_eq!(c.position(), p(1, 1));
        c.move_left(&buf);
        assert_eq!(c.position(), p(1, 0));
        c.move_left(&buf);
        assert_eq!(c.position(), p(0, 0));
    }

    #[test]
    fn movement_steps_over_grapheme_cluster() {
        // "e" + combining acute is one step.
        let buf = SegmentBuffer::from_parts("xe\u{0301}y", vec![], vec![]);
        let mut c = Cursor::at(p(0, 1));
        c.move_right(&buf);
        assert_eq!(c.position(), p(0, 3));
        c.move_left(&buf);
        assert_eq!(c.position(), p(0, 1));
    }

    #[test]
    fn movement_skips_empty_run_between_chips() {
        // [Chip, Text(""), Chip]: the empty run holds no units.
        let mut buf = SegmentBuffer::from_segments(vec![
            Segment::Chip(Chip::property("p1", "x")),
            Segment::text("a"),
            Segment::Chip(Chip::property("p2", "y")),
        ]);
        buf.backspace_at(p(1, 1));
        let mut c = Cursor::at(p(1, 0));
        c.move_right(&buf);
        assert_eq!(c.position(), p(2, 1));
        c.move_left(&buf);
        // Back to before p2; the run before it is empty, so the boundary
        // resolves into it.
        assert_eq!(c.position(), p(1, 0));
    }

    // -- Jumps --------------------------------------------------------------

    #[test]
    fn move_to_start_and_end() {
        let buf = sandwich();
        let mut c = Cursor::at(p(1, 0));
        c.move_to_end(&buf);
        assert_eq!(c.position(), p(2, 2));
        c.move_to_start();
        assert_eq!(c.position(), p(0, 0));
    }

    #[test]
    fn end_of_chip_terminated_line() {
        let buf = SegmentBuffer::from_parts("ab", vec![Chip::property("p1", "x")], vec![]);
        let mut c = Cursor::new();
        c.move_to_end(&buf);
        assert_eq!(c.position(), p(1, 1));
    }

    // -- Selection ----------------------------------------------------------

    #[test]
    fn selection_none_without_anchor() {
        let c = Cursor::new();
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn selection_ordered_when_dragged_backwards() {
        let buf = sandwich();
        let mut c = Cursor::at(p(2, 1));
        c.set_anchor();
        c.move_left(&buf);
        c.move_left(&buf);
        let sel = c.selection().unwrap();
        assert_eq!(sel.start, p(0, 2));
        assert_eq!(sel.end, p(2, 1));
    }

    #[test]
    fn clear_anchor_removes_selection() {
        let mut c = Cursor::at(p(0, 1));
        c.set_anchor();
        assert!(c.has_selection());
        c.clear_anchor();
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn set_anchor_at_clamps() {
        let buf = sandwich();
        let mut c = Cursor::new();
        c.set_anchor_at(p(99, 99), &buf);
        assert_eq!(c.anchor(), Some(p(2, 2)));
    }
}
