use thiserror::Error;

/// Errors that abort the whole run.
///
/// Per-record lookup failures during assembly are not represented here;
/// they are [`crate::lookup::LookupError`] and never escape the assembler.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch {url}")]
    SourceUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A logical table name has no entry in the source directory listing.
    /// This is a configuration error, not a transient one.
    #[error("table {0:?} is not listed in the source directory")]
    TableNotFound(String),

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("table {table}: row does not match the expected shape")]
    BadRow {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to initialize HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("could not determine a cache directory")]
    NoCacheDir,

    #[error("cache error")]
    Cache(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
