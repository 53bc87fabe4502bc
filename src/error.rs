//! Recoverable errors surfaced by the hMETIS reader.
//!
//! Structural invariant violations inside the core algorithm (a pin with no local mapping, a
//! hypernode contracted twice, a Phase-1 write cursor landing in the wrong place) are
//! programming bugs, not user-input problems, and fail hard via `assert!` rather than through
//! this type - see §7 of SPEC_FULL.md.

use thiserror::Error;

/// Errors that can occur while parsing an hMETIS `.hgr` file or an accompanying
/// community-assignment file.
#[derive(Debug, Error)]
pub enum HgrError {
    #[error("I/O error reading hMETIS file: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty or missing hMETIS header line")]
    MissingHeader,

    #[error("malformed hMETIS header: expected 'num_hyperedges num_hypernodes [type]', got {0:?}")]
    MalformedHeader(String),

    #[error("unsupported hypergraph_type {0}, expected one of {{0, 1, 10, 11}}")]
    UnsupportedType(u32),

    #[error("pin id {pin} on hyperedge {hyperedge} is out of range for {num_hypernodes} hypernodes")]
    PinOutOfRange {
        hyperedge: usize,
        pin: u32,
        num_hypernodes: usize,
    },

    #[error("expected {expected} hyperedge lines, found {found}")]
    HyperedgeCountMismatch { expected: usize, found: usize },

    #[error("expected {expected} hypernode weight lines, found {found}")]
    NodeWeightCountMismatch { expected: usize, found: usize },

    #[error("failed to parse integer: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}
