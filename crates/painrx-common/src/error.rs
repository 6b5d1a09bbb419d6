use thiserror::Error;

#[derive(Debug, Error)]
pub enum PainRxError {
    #[error("Missing clinical value '{value}' required by the {rule} rule")]
    MissingClinicalValue {
        rule: &'static str,
        value: &'static str,
    },

    #[error("Invalid pain score: {0} (expected 0-10)")]
    InvalidPainScore(i32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Protocol source error: {0}")]
    ProtocolSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PainRxError>;
