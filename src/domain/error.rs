//! Domain error types.

/// Top-level error type for stratlab.
#[derive(Debug, thiserror::Error)]
pub enum StratlabError {
    #[error("insufficient data: have {available} observations, need {required}")]
    InsufficientData { available: usize, required: usize },

    #[error("degenerate return series: zero variance over {periods} periods")]
    DegenerateSeries { periods: usize },

    #[error("invalid configuration for {parameter}: {reason}")]
    InvalidConfiguration { parameter: String, reason: String },

    #[error("invalid price series at index {index}: {reason}")]
    InvalidPriceSeries { index: usize, reason: String },

    #[error("series length mismatch: {expected} prices but {actual} signals")]
    SeriesLengthMismatch { expected: usize, actual: usize },

    #[error("series misaligned at index {index}: price dated {expected}, signal dated {actual}")]
    SeriesMisaligned {
        index: usize,
        expected: chrono::NaiveDate,
        actual: chrono::NaiveDate,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StratlabError {
    pub(crate) fn invalid_config(parameter: &str, reason: impl Into<String>) -> Self {
        StratlabError::InvalidConfiguration {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StratlabError> for std::process::ExitCode {
    fn from(err: &StratlabError) -> Self {
        let code: u8 = match err {
            StratlabError::Io(_) => 1,
            StratlabError::ConfigParse { .. }
            | StratlabError::ConfigMissing { .. }
            | StratlabError::ConfigInvalid { .. }
            | StratlabError::InvalidConfiguration { .. } => 2,
            StratlabError::Data { .. } | StratlabError::InvalidPriceSeries { .. } => 3,
            StratlabError::SeriesLengthMismatch { .. }
            | StratlabError::SeriesMisaligned { .. }
            | StratlabError::DegenerateSeries { .. } => 4,
            StratlabError::NoData { .. } | StratlabError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
