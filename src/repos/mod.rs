//! Specialized repos composing decoded rows into model values.
//!
//! Each repo owns the indexes for its slice of the tables and memoizes the
//! expensive derivations. They are built once per [`crate::loader::Loader`]
//! and share row data through the decoding cache in
//! [`crate::repository::MasterDataRepo`].

mod class_changes;
mod jobs;
mod skills;
mod stats;
mod tags;

pub use class_changes::CcRepo;
pub use jobs::JobsRepo;
pub use skills::SkillsRepo;
pub use stats::StatsRepo;
pub use tags::TagRepo;
