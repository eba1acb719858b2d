//! HTTP access to the AsterixDB query endpoints

use crate::config::ClientConfig;
use crate::error::ClientError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Query language accepted by the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Aql,
    SqlPp,
}

impl Dialect {
    /// Endpoint path below the API root
    pub fn path(&self) -> &'static str {
        match self {
            Dialect::Aql => "aql",
            Dialect::SqlPp => "sqlpp",
        }
    }

    /// Interpreter name the notebook host binds this dialect to
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Aql => "aql",
            Dialect::SqlPp => "sqlpp",
        }
    }
}

/// Anything able to run query text and hand back the raw response body
pub trait QueryExecutor {
    fn execute(&self, dialect: Dialect, query: &str) -> Result<String, ClientError>;
}

/// Blocking client for the AsterixDB HTTP API
pub struct AsterixClient {
    client: Client,
    config: ClientConfig,
}

impl AsterixClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(AsterixClient { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn execute_aql(&self, query: &str) -> Result<String, ClientError> {
        self.execute(Dialect::Aql, query)
    }

    pub fn execute_sqlpp(&self, query: &str) -> Result<String, ClientError> {
        self.execute(Dialect::SqlPp, query)
    }
}

impl QueryExecutor for AsterixClient {
    /// POST the query text and return the body. Query errors come back as
    /// JSON bodies, so a non-success status only fails when the body is empty.
    fn execute(&self, dialect: Dialect, query: &str) -> Result<String, ClientError> {
        let url = self.config.endpoint(dialect);
        debug!(dialect = dialect.name(), url = %url, "Sending query");

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain; charset=UTF-8")
            .body(query.to_string())
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        if body.is_empty() && !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(body)
    }
}
