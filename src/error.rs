use thiserror::Error;

/// Main error type for caption encoding and decoding
#[derive(Error, Debug)]
pub enum CaptionError {
    /// A `<SYNC>` tag carried a `Start` value that is not a non-negative integer
    #[error("Invalid timestamp in SYNC event #{index}: {value:?}")]
    InvalidTimestamp { index: usize, value: String },

    /// A `<SYNC>` tag had no `Start` attribute at all
    #[error("SYNC event #{index} has no Start attribute")]
    MissingTimestamp { index: usize },

    /// A computed timestamp does not fit in `u64` milliseconds
    #[error("Caption timing overflows at line #{line}")]
    TimingOverflow { line: usize },

    /// Tuning parameters that cannot produce sane timing
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CaptionError>;
