//! Segment types: the content units of a composer line.
//!
//! A composer line is an ordered sequence of [`Segment`]s. Two kinds exist:
//!
//! - **Text runs**: plain editable character runs.
//! - **Chips**: atomic attachment tokens (a property or a document pinned
//!   into the line). A chip is never split, never partially selected, and
//!   counts as exactly one cursor unit; editing operations either keep it
//!   whole or remove it whole.
//!
//! Modeling the two as a sum type keeps every match over segment kind
//! exhaustive at compile time; there are no nullable "maybe chip" fields.
//!
//! Chip payloads are opaque host JSON ([`serde_json::Value`]). The model
//! carries them through insert notifications untouched and never inspects
//! them. All types here serialize, so a host can checkpoint a draft line;
//! the model itself performs no I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// ChipKind
// ---------------------------------------------------------------------------

/// What a chip is attached to.
///
/// The kind selects which pair of host notification slots fires when the
/// chip enters or leaves the line (see [`ChipHooks`](crate::hooks::ChipHooks)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipKind {
    /// A property attachment (a listing pinned from the map or a search).
    Property,
    /// A document attachment (an uploaded or referenced file).
    Document,
}

impl fmt::Display for ChipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => f.write_str("property"),
            Self::Document => f.write_str("document"),
        }
    }
}

// ---------------------------------------------------------------------------
// Chip
// ---------------------------------------------------------------------------

/// An atomic attachment token.
///
/// `id` identifies the attachment to the host (the host's own key space);
/// `label` is what the host renders inside the pill. `payload` is opaque
/// host data handed back verbatim when a property chip is inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    pub kind: ChipKind,
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Chip {
    /// A property chip with no payload.
    #[must_use]
    pub fn property(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ChipKind::Property,
            id: id.into(),
            label: label.into(),
            payload: None,
        }
    }

    /// A document chip.
    #[must_use]
    pub fn document(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: ChipKind::Document,
            id: id.into(),
            label: label.into(),
            payload: None,
        }
    }

    /// Attach an opaque host payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One unit of composer content: a text run or a chip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    /// A run of plain characters. Runs are kept maximal: no two text runs
    /// are ever adjacent in a valid sequence. A run may be empty where an
    /// operation's defined result keeps it (the sole segment of an empty
    /// line, or a run whose last character was just deleted).
    Text(String),
    /// An atomic attachment token.
    Chip(Chip),
}

impl Segment {
    /// A text run segment.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True for text runs.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// True for chips.
    #[inline]
    #[must_use]
    pub const fn is_chip(&self) -> bool {
        matches!(self, Self::Chip(_))
    }

    /// The text run's value, or `None` for a chip.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            Self::Chip(_) => None,
        }
    }

    /// The chip, or `None` for a text run.
    #[inline]
    #[must_use]
    pub const fn as_chip(&self) -> Option<&Chip> {
        match self {
            Self::Text(_) => None,
            Self::Chip(c) => Some(c),
        }
    }

    /// Length of this segment in cursor units. Each char of a text run is
    /// one unit; a whole chip is one unit. This is also the largest valid
    /// cursor offset inside the segment.
    #[must_use]
    pub fn unit_len(&self) -> usize {
        match self {
            Self::Text(v) => v.chars().count(),
            Self::Chip(_) => 1,
        }
    }

    /// Characters this segment contributes to the plain-text projection.
    /// Chips contribute nothing.
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(v) => v.chars().count(),
            Self::Chip(_) => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
