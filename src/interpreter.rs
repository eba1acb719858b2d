//! Notebook interpreter for AQL and SQL++ paragraphs
//!
//! The host hands over paragraph text, the interpreter sends it to the
//! cluster and returns a typed result: an HTML tree view by default, or a
//! tab-separated table when the paragraph starts with `%flat`.

use crate::client::{AsterixClient, Dialect, QueryExecutor};
use crate::config::{property_descriptors, ClientConfig, PropertyDescriptor};
use crate::error::ClientError;
use crate::flatten_json;
use crate::render::json_viewer;
use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Paragraph prefix that selects table output
pub const FLAT_DIRECTIVE: &str = "%flat";

const CONNECTION_PROBE: &str = "let $x := 'Hello World'; return $x";
const ERROR_CODE_FIELD: &str = "error-code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Code {
    Success,
    Error,
}

/// How the host should display the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultType {
    Text,
    Html,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormType {
    None,
    Native,
    Simple,
}

/// Outcome of one interpreted paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpreterResult {
    pub code: Code,
    pub kind: ResultType,
    pub body: String,
}

impl InterpreterResult {
    pub fn success(kind: ResultType, body: String) -> Self {
        InterpreterResult {
            code: Code::Success,
            kind,
            body,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        InterpreterResult {
            code: Code::Error,
            kind: ResultType::Text,
            body: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Code::Success
    }
}

/// What the host needs to know to offer an interpreter to its users
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: &'static str,
    pub group: &'static str,
    pub dialect: Dialect,
    pub properties: Vec<PropertyDescriptor>,
}

/// Both interpreters this crate provides, grouped under `asterixdb`
pub fn registrations() -> Vec<Registration> {
    [Dialect::Aql, Dialect::SqlPp]
        .into_iter()
        .map(|dialect| Registration {
            name: dialect.name(),
            group: "asterixdb",
            dialect,
            properties: property_descriptors(),
        })
        .collect()
}

pub struct Interpreter<E: QueryExecutor = AsterixClient> {
    dialect: Dialect,
    executor: E,
}

impl Interpreter<AsterixClient> {
    /// Build an interpreter backed by the HTTP client, configured from the
    /// host's interpreter properties
    pub fn from_properties(dialect: Dialect, props: &HashMap<String, String>) -> Result<Self, ClientError> {
        let config = ClientConfig::from_properties(props)?;
        Ok(Interpreter::new(dialect, AsterixClient::new(config)?))
    }
}

impl<E: QueryExecutor> Interpreter<E> {
    pub fn new(dialect: Dialect, executor: E) -> Self {
        Interpreter { dialect, executor }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Check the cluster answers a trivial AQL query
    pub fn open(&self) -> Result<()> {
        let outcome = match self.executor.execute(Dialect::Aql, CONNECTION_PROBE) {
            Ok(body) if body.contains("Hello World") => Ok(()),
            Ok(body) => Err(anyhow!(
                "AsterixDB did not return correct result: \n{}",
                body
            )),
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(()) => {
                info!(interpreter = self.dialect.name(), "Connected to AsterixDB HTTP API");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Couldn't connect to AsterixDB HTTP API");
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        debug!("Connection closed.");
    }

    /// Run one paragraph and shape the response for display
    pub fn interpret(&self, paragraph: &str, paragraph_id: &str) -> InterpreterResult {
        let (flat, query) = split_directive(paragraph);
        debug!(
            interpreter = self.dialect.name(),
            flat,
            paragraph_id,
            "Interpreting paragraph"
        );

        let body = match self.executor.execute(self.dialect, query) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Query failed");
                return InterpreterResult::error(e.to_string());
            }
        };

        if let Some(message) = error_message(&body) {
            return InterpreterResult::error(message);
        }

        if flat {
            match flatten_json(&body) {
                Ok(table) => InterpreterResult::success(ResultType::Table, table),
                Err(e) => InterpreterResult::error(e.to_string()),
            }
        } else {
            InterpreterResult::success(ResultType::Html, json_viewer(&body, paragraph_id))
        }
    }

    /// No-op: requests are blocking
    pub fn cancel(&self) {}

    pub fn progress(&self) -> u8 {
        0
    }

    pub fn form_type(&self) -> FormType {
        FormType::Simple
    }
}

/// Strip a leading `%flat` directive, reporting whether it was present
fn split_directive(paragraph: &str) -> (bool, &str) {
    match paragraph.strip_prefix(FLAT_DIRECTIVE) {
        Some(rest) => (true, rest),
        None => (false, paragraph),
    }
}

/// Extract the message of an `error-code` response, if the body is one.
/// The member holds `[code, message]`; when it cannot be read the whole
/// body is the message.
fn error_message(body: &str) -> Option<String> {
    if !body.contains(ERROR_CODE_FIELD) {
        return None;
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        // "error-code" can legitimately appear inside result data
        Err(_) => return None,
    };

    let field = parsed.as_object()?.get(ERROR_CODE_FIELD)?;

    let message = field
        .as_array()
        .and_then(|parts| parts.get(1))
        .map(|msg| match msg {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| body.to_string());

    Some(message)
}
