use thiserror::Error;

/// Why a `resize_table` request was ignored. The table is left exactly as it
/// was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    #[error("requested capacity must be at least 1")]
    ZeroCapacity,
    #[error("requested capacity {requested} is below the {len} live entries")]
    BelowSize { requested: usize, len: usize },
}
