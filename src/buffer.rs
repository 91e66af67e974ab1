//! Segment buffer: the invariant-preserving content store.
//!
//! A `SegmentBuffer` owns the ordered segment sequence and every primitive
//! splice over it. It knows nothing about hooks, history, or selections;
//! the [`Composer`](crate::composer::Composer) layers those on top. Removal
//! primitives hand removed chips back to the caller so notification stays a
//! caller concern.
//!
//! # Coordinate systems
//!
//! Three coordinate systems meet here:
//!
//! - **Positions**: (segment index, intra-segment offset), the cursor's
//!   native coordinates. See [`Position`].
//! - **Unit offsets**: a flat index where every text char counts 1 and every
//!   chip counts 1. Multi-segment removal and cursor arithmetic across
//!   merges happen in unit space, because unit offsets survive the segment
//!   fusion that removal causes.
//! - **Plain offsets**: indices into the plain-text projection, where chips
//!   contribute nothing. This is the host's coordinate system for "what the
//!   user typed".
//!
//! Boundary positions alias (the end of run `i` is the same point as offset
//! 0 of segment `i + 1`). [`unit_to_pos`](SegmentBuffer::unit_to_pos)
//! resolves a boundary to the first segment that can express it, which
//! keeps a cursor at a text-run end inside that run, and a cursor after a
//! trailing chip on the chip itself.
//!
//! # Invariants
//!
//! After every mutation: the sequence is non-empty (all content removed
//! collapses to a single empty run), and no two text runs are adjacent.
//! Runs emptied by single-character deletion are kept so the cursor has a
//! run to rest in; builder and insert paths never create empty runs.
//! Violations self-heal on the next operation that walks into one, and are
//! debug-asserted so test builds catch them.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::position::Position;
use crate::segment::{Chip, Segment};

// ---------------------------------------------------------------------------
// SegmentBuffer
// ---------------------------------------------------------------------------

/// The segment sequence of one composer line.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBuffer {
    segments: Vec<Segment>,
}

impl SegmentBuffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer: a single empty text run.
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::Text(String::new())],
        }
    }

    /// Build from an initial plain text plus pre-existing chips: the text
    /// run first (skipped when empty), then property chips, then document
    /// chips, each preserving input order. An all-empty result collapses to
    /// a single empty run.
    #[must_use]
    pub fn from_parts(text: &str, properties: Vec<Chip>, documents: Vec<Chip>) -> Self {
        let mut segments = Vec::with_capacity(1 + properties.len() + documents.len());
        if !text.is_empty() {
            segments.push(Segment::Text(text.to_owned()));
        }
        segments.extend(properties.into_iter().map(Segment::Chip));
        segments.extend(documents.into_iter().map(Segment::Chip));
        if segments.is_empty() {
            segments.push(Segment::Text(String::new()));
        }
        let buf = Self { segments };
        buf.debug_assert_invariants();
        buf
    }

    /// Build from an arbitrary segment list, fusing adjacent text runs and
    /// collapsing an empty list to a single empty run.
    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut fused: Vec<Segment> = Vec::with_capacity(segments.len());
        for seg in segments {
            let fuse = matches!(
                (fused.last(), &seg),
                (Some(Segment::Text(_)), Segment::Text(_))
            );
            if fuse {
                if let (Some(Segment::Text(prev)), Segment::Text(next)) = (fused.last_mut(), seg) {
                    prev.push_str(&next);
                }
            } else {
                fused.push(seg);
            }
        }
        if fused.is_empty() {
            fused.push(Segment::Text(String::new()));
        }
        let buf = Self { segments: fused };
        buf.debug_assert_invariants();
        buf
    }

    /// Replace the whole sequence (used when restoring a history snapshot).
    /// Normalizes exactly like [`from_segments`](Self::from_segments).
    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        *self = Self::from_segments(segments);
    }

    // -- Reads --------------------------------------------------------------

    /// The segment sequence, in display order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments. Always at least 1; see
    /// [`is_blank`](Self::is_blank) for the empty-line state.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A segment by index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// True when the buffer holds no text and no chips (the empty-line
    /// state: exactly one empty run).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].unit_len() == 0
    }

    /// All chips currently in the line, in display order.
    pub fn chips(&self) -> impl Iterator<Item = &Chip> {
        self.segments.iter().filter_map(Segment::as_chip)
    }

    /// Number of chips in the line.
    #[must_use]
    pub fn chip_count(&self) -> usize {
        self.chips().count()
    }

    /// The plain-text projection: text runs concatenated in order, chips
    /// contributing nothing.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            if let Segment::Text(v) = seg {
                out.push_str(v);
            }
        }
        out
    }

    /// Character count of the plain-text projection.
    #[must_use]
    pub fn plain_len(&self) -> usize {
        self.segments.iter().map(Segment::text_len).sum()
    }

    /// Total length in cursor units (chars plus one per chip).
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.segments.iter().map(Segment::unit_len).sum()
    }

    /// Terminal-cell width of the line's content: text runs plus chip
    /// labels. Pill decoration around a label is a renderer concern and is
    /// not counted here.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.segments
            .iter()
            .map(|seg| match seg {
                Segment::Text(v) => UnicodeWidthStr::width(v.as_str()),
                Segment::Chip(c) => UnicodeWidthStr::width(c.label.as_str()),
            })
            .sum()
    }

    /// The position after the last unit of the sequence.
    #[must_use]
    pub fn end_position(&self) -> Position {
        let Some(last) = self.segments.len().checked_sub(1) else {
            return Position::ZERO;
        };
        Position::new(last, self.segments[last].unit_len())
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Clamp an externally supplied position into the valid space: the
    /// segment index to the sequence, the offset to the segment's unit
    /// length. Never rejects.
    #[must_use]
    pub fn clamp(&self, pos: Position) -> Position {
        let Some(last) = self.segments.len().checked_sub(1) else {
            return Position::ZERO;
        };
        let segment = pos.segment.min(last);
        let offset = pos.offset.min(self.segments[segment].unit_len());
        Position::new(segment, offset)
    }

    /// Position to absolute unit offset. Clamps first.
    #[must_use]
    pub fn pos_to_unit(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        let before: usize = self.segments[..pos.segment]
            .iter()
            .map(Segment::unit_len)
            .sum();
        before + pos.offset
    }

    /// Absolute unit offset to position: the first segment that can express
    /// the offset. A boundary at a run's end stays in that run; the point
    /// right after a chip resolves to the next segment's start when one
    /// exists. Clamps to the end of the sequence.
    #[must_use]
    pub fn unit_to_pos(&self, unit: usize) -> Position {
        let mut c = 0;
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Text(_) => {
                    let len = seg.unit_len();
                    if unit <= c + len {
                        return Position::new(i, unit - c);
                    }
                    c += len;
                }
                Segment::Chip(_) => {
                    if unit == c {
                        return Position::new(i, 0);
                    }
                    c += 1;
                }
            }
        }
        self.end_position()
    }

    /// Position to plain-text offset: the text lengths of all segments
    /// before the cursor's, plus the offset when the cursor's segment is a
    /// run (a chip segment contributes nothing at either of its offsets).
    #[must_use]
    pub fn pos_to_plain(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        let before: usize = self.segments[..pos.segment]
            .iter()
            .map(Segment::text_len)
            .sum();
        if self.segments[pos.segment].is_text() {
            before + pos.offset
        } else {
            before
        }
    }

    /// Plain-text offset to position: walk the runs accumulating text
    /// length and return the first (segment, offset) pair that contains the
    /// target; chips are skipped. An offset past the total plain length
    /// clamps to the end of the sequence.
    #[must_use]
    pub fn plain_to_pos(&self, n: usize) -> Position {
        let mut cum = 0;
        for (i, seg) in self.segments.iter().enumerate() {
            if seg.is_text() {
                let len = seg.text_len();
                if n <= cum + len {
                    return Position::new(i, n - cum);
                }
                cum += len;
            }
        }
        self.end_position()
    }

    // -- Insertion ----------------------------------------------------------

    /// Insert text at a position; returns the cursor position after the
    /// inserted text. Inside a run the text is spliced at the offset. On a
    /// chip the text lands on the side the offset names (0 before, 1
    /// after), fusing into the adjacent run when one exists so no run
    /// neighbors another run.
    pub fn insert_text_at(&mut self, pos: Position, text: &str) -> Position {
        if self.segments.is_empty() {
            // Invariant breach from outside: heal by becoming the text.
            self.segments.push(Segment::Text(text.to_owned()));
            return Position::new(0, count_chars(text));
        }
        if text.is_empty() {
            return self.clamp(pos);
        }
        let pos = self.clamp(pos);
        let Position {
            segment: i,
            offset: o,
        } = pos;
        let tlen = count_chars(text);

        let result = match &self.segments[i] {
            Segment::Text(_) => {
                if let Segment::Text(v) = &mut self.segments[i] {
                    insert_at_char(v, o, text);
                }
                Position::new(i, o + tlen)
            }
            Segment::Chip(_) if o == 0 => {
                if i > 0 && self.segments[i - 1].is_text() {
                    let plen = self.segments[i - 1].unit_len();
                    if let Segment::Text(v) = &mut self.segments[i - 1] {
                        insert_at_char(v, plen, text);
                    }
                    Position::new(i - 1, plen + tlen)
                } else {
                    self.segments.insert(i, Segment::Text(text.to_owned()));
                    Position::new(i, tlen)
                }
            }
            Segment::Chip(_) => {
                if i + 1 < self.segments.len() && self.segments[i + 1].is_text() {
                    if let Segment::Text(v) = &mut self.segments[i + 1] {
                        insert_at_char(v, 0, text);
                    }
                    Position::new(i + 1, tlen)
                } else {
                    self.segments.insert(i + 1, Segment::Text(text.to_owned()));
                    Position::new(i + 1, tlen)
                }
            }
        };
        self.debug_assert_invariants();
        result
    }

    /// Insert a chip at a position, splitting the run under the cursor
    /// (empty fragments are dropped, not inserted). On a chip boundary the
    /// new chip lands adjacent: before at offset 0, after otherwise.
    /// `trailing_space` appends a single space after the chip, fusing with
    /// a following run when present.
    ///
    /// Returns the cursor position after everything inserted: the end of
    /// the trailing space when requested, else offset 0 of a following
    /// run, else offset 1 on the chip itself.
    pub fn insert_chip_at(&mut self, pos: Position, chip: Chip, trailing_space: bool) -> Position {
        if self.segments.is_empty() {
            self.segments.push(Segment::Text(String::new()));
        }
        let pos = self.clamp(pos);
        let Position {
            segment: i,
            offset: o,
        } = pos;

        let chip_idx;
        if let Some(Segment::Text(v)) = self.segments.get(i) {
            let b = byte_of_char(v, o);
            let left = v[..b].to_owned();
            let right = v[b..].to_owned();
            self.segments.remove(i);
            let mut at = i;
            if !left.is_empty() {
                self.segments.insert(at, Segment::Text(left));
                at += 1;
            }
            self.segments.insert(at, Segment::Chip(chip));
            chip_idx = at;
            if !right.is_empty() {
                self.segments.insert(at + 1, Segment::Text(right));
            }
        } else {
            chip_idx = if o == 0 { i } else { i + 1 };
            self.segments.insert(chip_idx, Segment::Chip(chip));
        }

        let cursor = if trailing_space {
            self.insert_text_at(Position::new(chip_idx, 1), " ")
        } else if self.segments.get(chip_idx + 1).is_some_and(Segment::is_text) {
            Position::new(chip_idx + 1, 0)
        } else {
            Position::new(chip_idx, 1)
        };
        self.debug_assert_invariants();
        cursor
    }

    // -- Single-unit deletion ------------------------------------------------

    /// Delete the unit before `pos` (backspace). Returns the new cursor and
    /// the removed chip, if the unit was a chip. No-op at the absolute
    /// start. A run emptied by a character deletion is kept so the cursor
    /// keeps a run to rest in.
    pub fn backspace_at(&mut self, pos: Position) -> (Position, Option<Chip>) {
        if self.segments.is_empty() {
            self.segments.push(Segment::Text(String::new()));
            return (Position::ZERO, None);
        }
        let pos = self.clamp(pos);
        let Position {
            segment: i,
            offset: o,
        } = pos;
        let is_text = self.segments[i].is_text();

        // Inside a run: drop the grapheme ending at the cursor.
        if is_text && o > 0 {
            let mut start = o;
            if let Segment::Text(v) = &mut self.segments[i] {
                start = prev_grapheme_start(v, o);
                remove_char_span(v, start, o);
            }
            return (Position::new(i, start), None);
        }

        // At a run start whose neighbor is also a run: an invariant breach
        // reached us. Self-heal by merging; that is the whole operation.
        if is_text && o == 0 && i > 0 && self.segments[i - 1].is_text() {
            let boundary = self.segments[i - 1].unit_len();
            if let Segment::Text(right) = self.segments.remove(i) {
                if let Segment::Text(left) = &mut self.segments[i - 1] {
                    left.push_str(&right);
                }
            }
            return (Position::new(i - 1, boundary), None);
        }

        // Just after a chip: the unit before the cursor is the chip itself.
        if !is_text && o >= 1 {
            return match self.take_chip(i) {
                Some((cursor, chip)) => (cursor, Some(chip)),
                None => (pos, None),
            };
        }

        // Offset 0 at the sequence position `i`: delete the last unit of
        // whatever precedes, skipping empty runs.
        self.delete_unit_before_segment(i)
    }

    /// Delete the unit at/after `pos` (forward delete). Mirror of
    /// [`backspace_at`](Self::backspace_at); no-op at the absolute end.
    pub fn delete_forward_at(&mut self, pos: Position) -> (Position, Option<Chip>) {
        if self.segments.is_empty() {
            self.segments.push(Segment::Text(String::new()));
            return (Position::ZERO, None);
        }
        let pos = self.clamp(pos);
        let Position {
            segment: i,
            offset: o,
        } = pos;
        let is_text = self.segments[i].is_text();

        if is_text {
            let len = self.segments[i].unit_len();
            // Inside a run: drop the grapheme under the cursor.
            if o < len {
                if let Segment::Text(v) = &mut self.segments[i] {
                    let end = next_grapheme_end(v, o);
                    remove_char_span(v, o, end);
                }
                return (pos, None);
            }
            // At the run's end with another run adjacent: self-heal merge.
            if i + 1 < self.segments.len() && self.segments[i + 1].is_text() {
                if let Segment::Text(right) = self.segments.remove(i + 1) {
                    if let Segment::Text(left) = &mut self.segments[i] {
                        left.push_str(&right);
                    }
                }
                return (pos, None);
            }
            return self.delete_unit_after_segment(i, pos);
        }

        // Before a chip: the unit under the cursor is the chip itself.
        if o == 0 {
            return match self.take_chip(i) {
                Some((cursor, chip)) => (cursor, Some(chip)),
                None => (pos, None),
            };
        }

        // After a chip: delete the first unit of whatever follows.
        self.delete_unit_after_segment(i, pos)
    }

    // -- Span removal --------------------------------------------------------

    /// Remove everything between two positions, given in either order.
    /// Chips whose unit falls inside the span are removed whole and
    /// returned (in display order) for notification; partially covered
    /// runs keep their out-of-span substrings, fused into one run when
    /// both ends survive with nothing left between them. The cursor lands
    /// at the junction. Empty fragments are dropped.
    pub fn remove_span(&mut self, a: Position, b: Position) -> (Position, Vec<Chip>) {
        let (ua, ub) = {
            let x = self.pos_to_unit(a);
            let y = self.pos_to_unit(b);
            if x <= y { (x, y) } else { (y, x) }
        };
        if ua == ub {
            return (self.unit_to_pos(ua), Vec::new());
        }

        let mut removed = Vec::new();
        let mut rebuilt: Vec<Segment> = Vec::with_capacity(self.segments.len());
        let mut c = 0;
        for seg in std::mem::take(&mut self.segments) {
            let l = seg.unit_len();
            match seg {
                Segment::Chip(chip) => {
                    if c >= ua && c < ub {
                        removed.push(chip);
                    } else {
                        rebuilt.push(Segment::Chip(chip));
                    }
                }
                Segment::Text(v) => {
                    let kept: String = v
                        .chars()
                        .enumerate()
                        .filter(|&(k, _)| {
                            let u = c + k;
                            u < ua || u >= ub
                        })
                        .map(|(_, ch)| ch)
                        .collect();
                    if !kept.is_empty() {
                        if let Some(Segment::Text(prev)) = rebuilt.last_mut() {
                            prev.push_str(&kept);
                        } else {
                            rebuilt.push(Segment::Text(kept));
                        }
                    }
                }
            }
            c += l;
        }
        if rebuilt.is_empty() {
            rebuilt.push(Segment::Text(String::new()));
        }
        self.segments = rebuilt;
        self.debug_assert_invariants();
        (self.unit_to_pos(ua), removed)
    }

    /// Remove exactly the chip at `index`. Returns `None` (and changes
    /// nothing) when that segment is not a chip. The caller's cursor is
    /// shifted in unit space: back by one when it sat past the chip,
    /// onto the preceding boundary when it sat on the chip, untouched
    /// otherwise.
    pub fn remove_chip_at(&mut self, index: usize, cursor: Position) -> Option<(Position, Chip)> {
        if !self.segments.get(index).is_some_and(Segment::is_chip) {
            return None;
        }
        let chip_u = self.pos_to_unit(Position::new(index, 0));
        let cursor_u = self.pos_to_unit(cursor);
        let target = if cursor_u > chip_u {
            cursor_u - 1
        } else {
            cursor_u
        };
        let (_, chip) = self.take_chip(index)?;
        Some((self.unit_to_pos(target), chip))
    }

    /// The retained legacy span removal in plain-text coordinates: removes
    /// chars `[start, end)` of the plain projection and reattaches **all**
    /// chips after the remaining text. Lossy with respect to chip position
    /// and deliberately so; it removes no chips, so nothing is returned
    /// for notification. Endpoints are clamped and reordered. The cursor
    /// lands at the removal point.
    pub fn remove_plain_range(&mut self, start: usize, end: usize) -> Position {
        let len = self.plain_len();
        let (start, end) = {
            let a = start.min(len);
            let b = end.min(len);
            if a <= b { (a, b) } else { (b, a) }
        };
        let plain = self.to_plain_text();
        let kept: String = plain
            .chars()
            .take(start)
            .chain(plain.chars().skip(end))
            .collect();
        let chips: Vec<Segment> = std::mem::take(&mut self.segments)
            .into_iter()
            .filter(Segment::is_chip)
            .collect();
        if !kept.is_empty() {
            self.segments.push(Segment::Text(kept));
        }
        self.segments.extend(chips);
        if self.segments.is_empty() {
            self.segments.push(Segment::Text(String::new()));
        }
        self.debug_assert_invariants();
        if self.segments[0].is_text() {
            Position::new(0, start)
        } else {
            Position::ZERO
        }
    }

    // -- Internals -----------------------------------------------------------

    /// Remove the chip at `j`, fuse runs made adjacent by the removal, and
    /// return the removed chip plus the cursor at the chip's old boundary.
    /// `None` when `j` is not a chip.
    fn take_chip(&mut self, j: usize) -> Option<(Position, Chip)> {
        if !self.segments.get(j).is_some_and(Segment::is_chip) {
            return None;
        }
        let u = self.pos_to_unit(Position::new(j, 0));
        match self.segments.remove(j) {
            Segment::Chip(chip) => {
                self.fuse_runs_at(j);
                if self.segments.is_empty() {
                    self.segments.push(Segment::Text(String::new()));
                }
                self.debug_assert_invariants();
                Some((self.unit_to_pos(u), chip))
            }
            other => {
                self.segments.insert(j, other);
                None
            }
        }
    }

    /// Fuse the runs at `j - 1` and `j` when a removal left them adjacent.
    fn fuse_runs_at(&mut self, j: usize) {
        if j == 0 || j >= self.segments.len() {
            return;
        }
        if self.segments[j - 1].is_text() && self.segments[j].is_text() {
            if let Segment::Text(right) = self.segments.remove(j) {
                if let Segment::Text(left) = &mut self.segments[j - 1] {
                    left.push_str(&right);
                }
            }
        }
    }

    /// Backspace resolution for a cursor at offset 0 of segment `i`: delete
    /// the last unit of whatever precedes, skipping empty runs. No-op when
    /// nothing does.
    fn delete_unit_before_segment(&mut self, i: usize) -> (Position, Option<Chip>) {
        let mut j = i;
        while j > 0 {
            j -= 1;
            let text_len = match &self.segments[j] {
                Segment::Text(v) if v.is_empty() => continue,
                Segment::Text(v) => Some(v.chars().count()),
                Segment::Chip(_) => None,
            };
            if let Some(len) = text_len {
                let mut start = len;
                if let Segment::Text(v) = &mut self.segments[j] {
                    start = prev_grapheme_start(v, len);
                    remove_char_span(v, start, len);
                }
                return (Position::new(j, start), None);
            }
            return match self.take_chip(j) {
                Some((cursor, chip)) => (cursor, Some(chip)),
                None => (self.clamp(Position::new(i, 0)), None),
            };
        }
        (self.clamp(Position::new(i, 0)), None)
    }

    /// Forward-delete resolution for a cursor at the back boundary of
    /// segment `i`: delete the first unit of whatever follows, skipping
    /// empty runs. The cursor does not move. No-op when nothing follows.
    fn delete_unit_after_segment(&mut self, i: usize, pos: Position) -> (Position, Option<Chip>) {
        let mut j = i + 1;
        while j < self.segments.len() {
            let text_nonempty = match &self.segments[j] {
                Segment::Text(v) if v.is_empty() => {
                    j += 1;
                    continue;
                }
                Segment::Text(_) => true,
                Segment::Chip(_) => false,
            };
            if text_nonempty {
                if let Segment::Text(v) = &mut self.segments[j] {
                    let end = next_grapheme_end(v, 0);
                    remove_char_span(v, 0, end);
                }
                return (pos, None);
            }
            let before = self.pos_to_unit(pos);
            return match self.take_chip(j) {
                Some((_, chip)) => (self.unit_to_pos(before), Some(chip)),
                None => (pos, None),
            };
        }
        (pos, None)
    }

    fn debug_assert_invariants(&self) {
        debug_assert!(
            !self.segments.is_empty(),
            "segment sequence must never be empty"
        );
        debug_assert!(
            !self
                .segments
                .windows(2)
                .any(|w| w[0].is_text() && w[1].is_text()),
            "adjacent text runs must be fused"
        );
    }
}

impl Default for SegmentBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Char and grapheme helpers
// ---------------------------------------------------------------------------

fn count_chars(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `char_off`-th char; the string's length when the
/// offset is at or past the end.
fn byte_of_char(s: &str, char_off: usize) -> usize {
    s.char_indices().nth(char_off).map_or(s.len(), |(b, _)| b)
}

fn insert_at_char(s: &mut String, char_off: usize, text: &str) {
    let b = byte_of_char(s, char_off);
    s.insert_str(b, text);
}

fn remove_char_span(s: &mut String, start: usize, end: usize) {
    let b0 = byte_of_char(s, start);
    let b1 = byte_of_char(s, end);
    s.replace_range(b0..b1, "");
}

/// Char offset of the start of the grapheme cluster that contains or ends
/// at `off`. Deleting `[prev_grapheme_start(s, off), off)` removes one
/// whole cluster for any cluster-aligned `off`.
pub(crate) fn prev_grapheme_start(s: &str, off: usize) -> usize {
    if off == 0 {
        return 0;
    }
    let mut cum = 0;
    for g in s.graphemes(true) {
        let len = g.chars().count();
        if cum + len >= off {
            return cum;
        }
        cum += len;
    }
    cum
}

/// Char offset of the end of the grapheme cluster that contains or starts
/// at `off`.
pub(crate) fn next_grapheme_end(s: &str, off: usize) -> usize {
    let mut cum = 0;
    for g in s.graphemes(true) {
        let len = g.chars().count();
        if cum + len > off {
            return cum + len;
        }
        cum += len;
    }
    cum
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
