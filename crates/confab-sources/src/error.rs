//! Source-fetch error types.

use thiserror::Error;

/// Errors produced while paging through one upstream source.
///
/// The aggregator absorbs these per source: a failed source contributes zero
/// events and is reported in the run summary, it never aborts the pipeline.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The retry budget was exhausted or the endpoint answered with a
    /// terminal non-success status.
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The endpoint answered, but not with a page we understand.
    #[error("Unexpected API response: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_names_the_source_condition() {
        let err = SourceError::Unavailable("discover returned 503".into());
        assert!(err.to_string().contains("unavailable"));
        assert!(err.to_string().contains("503"));
    }
}
