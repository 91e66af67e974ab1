//! # chipline: segmented composer input core
//!
//! The input model of a chat composer whose drafts mix plain text with
//! atomic attachment *chips* (a property pinned from the map, a document
//! pulled into the conversation). The model owns an ordered sequence of
//! segments (text runs and chips), a cursor expressed as (segment index,
//! intra-segment offset), and every operation that mutates the two
//! consistently:
//!
//! - **[`segment`]**: the `Segment` sum type, `Chip`, `ChipKind`
//! - **[`position`]**: `Position` and `Range`, with normalization for
//!   backwards selections
//! - **[`buffer`]**: `SegmentBuffer`, the invariant-preserving sequence
//!   with primitive splices and coordinate conversion
//! - **[`cursor`]**: `Cursor` with atomic unit movement and a selection
//!   anchor
//! - **[`word`]**: word-boundary motions (chips are atomic words)
//! - **[`history`]**: transaction-based undo/redo over snapshots
//! - **[`hooks`]**: the `ChipHooks` host notification trait
//! - **[`composer`]**: `Composer`, the facade tying it all together
//!
//! No rendering, no keyboard wiring, no networking, no persistence: the
//! host drives the model from its input events and renders from the
//! model's read surface. Host-side attachment lists stay in sync through
//! the hook object injected at construction.
//!
//! Every operation is total: out-of-range positions clamp, boundary
//! operations are no-ops, and nothing panics in release builds.
//!
//! ```
//! use chipline::{Chip, Composer};
//!
//! let mut composer = Composer::new("ask about ", vec![], vec![]);
//! composer.insert_chip(Chip::property("p1", "123 Main St"), true);
//! composer.insert_text("please");
//! assert_eq!(composer.to_plain_text(), "ask about  please");
//! assert_eq!(composer.chip_count(), 1);
//! ```

pub mod buffer;
pub mod composer;
pub mod cursor;
pub mod history;
pub mod hooks;
pub mod position;
pub mod segment;
pub mod word;

pub use buffer::SegmentBuffer;
pub use composer::Composer;
pub use cursor::Cursor;
pub use history::{History, Snapshot};
pub use hooks::{ChipHooks, NoopHooks};
pub use position::{Position, Range};
pub use segment::{Chip, ChipKind, Segment};
