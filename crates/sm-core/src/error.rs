use thiserror::Error;

/// Errors raised by the core selection/projection pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A record store must hold at least one record
    #[error("record store is empty; nothing was loaded")]
    EmptyStore,

    /// Two records were loaded with the same identifier
    #[error("duplicate record id {0}")]
    DuplicateId(u64),

    /// A selection was handed to a store it was not computed from
    #[error("selection from {found} cannot be projected against {expected}")]
    ForeignSelection { expected: String, found: String },

    /// Markers and table rows of one frame disagree about the records they show
    #[error("view frame {revision} is misaligned: {markers} markers vs {rows} rows (first mismatch at position {position})")]
    Misaligned {
        revision: u64,
        markers: usize,
        rows: usize,
        position: usize,
    },
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
