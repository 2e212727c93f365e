use derive_more::Display;

/// Failures the reconciliation engine can surface to its callers.
///
/// Missing or partial raw data is never an error: it always resolves to a
/// classification. Only malformed requests and storage failures reach this
/// type, so callers can tell "no rows" apart from "store unavailable".
#[derive(Debug, Display)]
pub enum EngineError {
    /// Rejected before any classification runs (month out of 1..=12,
    /// end date before start date).
    #[display(fmt = "invalid range: {}", _0)]
    InvalidRange(String),

    /// A collaborator store could not be read. Never substituted with
    /// empty data, since that would misreport absences.
    #[display(fmt = "storage fetch failed: {}", _0)]
    Fetch(sqlx::Error),
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Fetch(e) => Some(e),
            EngineError::InvalidRange(_) => None,
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(e: sqlx::Error) -> Self {
        EngineError::Fetch(e)
    }
}
