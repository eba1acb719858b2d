use thiserror::Error;

/// Failures while turning a query response into a table
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The response text is not valid JSON
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON is not an array of objects
    #[error("unexpected JSON shape: {0}")]
    Shape(String),

    /// The flatten settings cannot produce unambiguous paths
    #[error("invalid flatten configuration: {0}")]
    Config(String),
}

/// Failures while talking to the AsterixDB HTTP API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("request to AsterixDB failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AsterixDB returned status {0} with an empty body")]
    Status(u16),
}
