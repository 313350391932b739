//! Pure sheet logic: numeric parsing, column classification, aggregation and
//! the incremental sync engine

pub mod aggregator;
pub mod classifier;
pub mod insight;
pub mod number;
pub mod sync_engine;

pub use aggregator::{growth_percent, Aggregator, SourceColumns};
pub use classifier::{classify, Classification, ColumnClassifier};
pub use insight::{format_rupees, generate_insight, Insight, NO_DATA_INSIGHT};
pub use number::{parse_number, NumberParser};
pub use sync_engine::{default_period_label, SyncEngine, SyncOutcome};
