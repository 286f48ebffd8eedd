//! Recognition analytics engine.
//!
//! Pure, synchronous derivations over a [`kudos_core::snapshot::Snapshot`]:
//! upcoming birthdays, the monthly leaderboard, per-user and per-team value
//! distributions, the relationship graph and its force-directed layout, and
//! engagement statistics.
//!
//! Nothing here performs I/O, mutates its input, or keeps state between
//! calls (the layout simulation owns per-instance buffers, nothing shared).
//! Data-quality problems — unresolvable references, empty inputs, missing
//! birthdays — degrade to partial or empty results with a `tracing`
//! diagnostic; they are never errors.

pub mod birthdays;
pub mod dna;
pub mod graph;
pub mod highlights;
pub mod layout;
pub mod stats;

pub use birthdays::{BirthdayEntry, days_until_birthday, upcoming_birthdays};
pub use dna::{ValueSegment, received_by, received_by_team, value_distribution};
pub use graph::{
  EdgeDirection, GraphEdge, GraphNode, GraphView, RelationshipGraph,
  build_graph,
};
pub use highlights::{HighlightEntry, monthly_highlights, split_podium};
pub use layout::{ForceLayout, LayoutParams, Vec2, layout};
pub use stats::{EngagementSummary, engagement_summary};
