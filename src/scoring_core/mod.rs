//! Scoring Core - event parsing, windowing and keyed score aggregation
//!
//! # Architecture
//!
//! ```text
//! raw line → EventParser (ParseErrorCounter on failure)
//!     ↓
//! TimeBounds (drop late/early events)
//!     ↓
//! WindowStrategy (event-time window)
//!     ↓
//! ScoreTable (GroupingDimension key, i128 partial sums)
//!     ↓
//! OutputTemplate → ResultWriter → text, stdout, JSONL or SQLite
//! ```

pub mod aggregate;
pub mod bounds;
pub mod counter;
pub mod event;
pub mod formatter;
pub mod jsonl_sink;
pub mod key;
pub mod reader;
pub mod sink;
pub mod sqlite_sink;
pub mod text_sink;
pub mod window;
pub mod writer;

pub use aggregate::{AggregateResult, OverflowError, OverflowPolicy, ScoreSum, ScoreTable, Totals};
pub use bounds::TimeBounds;
pub use counter::{AtomicCounter, ParseErrorCounter};
pub use event::{EventParser, GameEvent, ParseFailure};
pub use formatter::OutputTemplate;
pub use key::GroupingDimension;
pub use reader::LineReader;
pub use sink::{ResultSink, SinkError};
pub use window::{Window, WindowStrategy};
pub use writer::ResultWriter;
