use alloc::string::String;

/// Errors raised while building table state from caller input.
///
/// Runtime interactions (toggles, filters, resizes) never fail; they degrade to no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("duplicate column key `{0}` in header tree")]
    DuplicateColumnKey(String),
    #[error("header group `{0}` has no children")]
    EmptyGroup(String),
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("unknown filter operator `{0}`")]
    UnknownOperator(String),
    #[error("unknown sort direction `{0}`")]
    UnknownSortDirection(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
