//! Decoder and composition layer for Phantom of the Kill master data.
//!
//! The raw game data ships as one binary payload per table. This crate
//! decodes those payloads into typed rows ([`schema`]), joins them across
//! tables and derives the values the game itself computes (stat growth,
//! evolution bonuses, dupe-value bonuses, equip eligibility), surfacing
//! complete units through [`loader::Loader`].

pub mod binary;
pub mod error;
pub mod loader;
pub mod model;
pub mod repos;
pub mod repository;
pub mod schema;

pub use error::{DecodeError, MasterDataError, Result};
pub use loader::Loader;
pub use repository::{DirectorySource, MasterDataRepo, MasterDataSource};
