use crate::placement::Violation;

/// Closed set of failures a generation request can surface.
///
/// Everything here is either caller-recoverable (retry with different
/// letters, a new seed, or relaxed params) or a programmer error
/// (`InvalidPlacement`), which is raised immediately rather than papered
/// over. A rejected candidate inside the search is *not* an error — the
/// search simply skips it.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("found {found} valid words; need at least {required}")]
    InsufficientWords { found: usize, required: usize },
    #[error("no connected layout found after exhausting all attempts")]
    NoValidLayout,
    #[error("invalid placement at ({},{}): {rule}", .at.0, .at.1)]
    InvalidPlacement { rule: Violation, at: (i32, i32) },
    #[error("dictionary has no entries within the configured length bounds")]
    EmptyDictionary,
    #[error("parameter out of range: {field}")]
    BadParam { field: &'static str },
    #[error("letter bags may only contain A-Z; got {letter:?}")]
    BadLetter { letter: char },
    #[error("generation cancelled by caller")]
    Cancelled,
}

/// Failures from the offline curation pipeline's load/save paths.
#[derive(Debug, thiserror::Error)]
pub enum CurationError {
    #[error("curated wordlist I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("curated wordlist serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
