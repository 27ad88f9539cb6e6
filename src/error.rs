/// Programmer-error taxonomy for the world. All four variants are raised by
/// misuse, not by bad data, and leave the world's invariants untouched: every
/// mutating operation validates before it touches any state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("cell size must be positive, got {0}")]
    BadArgument(f64),

    #[error("item already present in the world")]
    DuplicateItem,

    #[error("item is not present in the world")]
    UnknownItem,

    #[error("no response registered named {0:?}")]
    UnknownResponse(String),
}
