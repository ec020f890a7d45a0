use thiserror::Error;

/// Failure taxonomy for the simulation core.
///
/// Every operation either succeeds completely or fails with one of these and
/// leaves previously valid state untouched. `StaleResponse` is the one member
/// the session layer swallows instead of surfacing: a superseded backend
/// response is discarded, not reported.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AllotError {
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("no catchment: population requested with no centres defined")]
    NoCatchment,

    #[error("{referrer} references unknown {kind} '{id}'")]
    DanglingReference {
        kind: &'static str,
        id: String,
        referrer: String,
    },

    #[error("stale {operation} response: seq {seq} superseded by seq {latest}")]
    StaleResponse {
        operation: &'static str,
        seq: u64,
        latest: u64,
    },

    #[error("precondition not met: {0}")]
    Precondition(&'static str),

    #[error("backend call failed: {0}")]
    Backend(String),
}
