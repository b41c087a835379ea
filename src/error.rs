//! Error taxonomy for master data loading.
//!
//! Decode and join failures are fatal: the data source is a static snapshot,
//! so retrying cannot help, and substituting defaults would silently produce
//! wrong game values. The only locally-recovered case is an unmapped numeric
//! enumeration code, which is logged at the call site and never surfaces here.

use thiserror::Error;

use crate::schema::Table;

/// Low-level failure while decoding a binary payload.
///
/// Carries byte offsets only; the owning [`Table`] is attached by the
/// repository layer via [`MasterDataError::Decode`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload truncated: wanted {wanted} bytes at offset {offset}")]
    Truncated { offset: usize, wanted: usize },

    #[error("payload shorter than the 12-byte header ({len} bytes)")]
    MissingHeader { len: usize },

    #[error("declared length {declared} exceeds physical payload ({len} bytes)")]
    DeclaredLength { declared: usize, len: usize },

    #[error("negative string length {len} at offset {offset}")]
    NegativeLength { offset: usize, len: i32 },

    #[error("undecodable string data at offset {offset}")]
    InvalidString { offset: usize },

    #[error("record decode overran declared end {declared} (cursor at {offset})")]
    Overrun { offset: usize, declared: usize },
}

/// Top-level failure while loading or composing master data.
#[derive(Debug, Error)]
pub enum MasterDataError {
    #[error("failed to decode {table}: {source}")]
    Decode {
        table: Table,
        #[source]
        source: DecodeError,
    },

    #[error("failed to obtain bytes for {table}: {source}")]
    Source {
        table: Table,
        #[source]
        source: anyhow::Error,
    },

    #[error("duplicate key {key} in {table}")]
    DuplicateKey { table: Table, key: String },

    #[error("{table} has no row for key {key}")]
    MissingRow { table: Table, key: String },

    #[error("invalid value {value:?} for {field} in {table} row {key}")]
    InvalidField {
        table: Table,
        key: i32,
        field: &'static str,
        value: String,
    },

    #[error("evolution chain for unit {unit_id} contains a cycle")]
    EvolutionCycle { unit_id: i32 },
}

impl MasterDataError {
    pub(crate) fn missing_row(table: Table, key: impl std::fmt::Display) -> Self {
        MasterDataError::MissingRow {
            table,
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MasterDataError>;
