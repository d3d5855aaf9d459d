//! Type-safe wrappers and enums shared by the CLI and the library.

pub mod ids;
pub mod season;
pub mod source;

pub use ids::RecordKind;
pub use season::Season;
pub use source::{MergePolicy, SourceKind};
