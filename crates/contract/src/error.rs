//! Error types for contract testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Configuration error: {0}")]
    Config(#[from] apitest_common::Error),

    #[error("Invalid base URI '{uri}': {reason}")]
    InvalidBaseUri { uri: String, reason: String },

    #[error("Invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Status mismatch: expected {expected}, got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },

    #[error("Content type mismatch: expected JSON, got {actual}")]
    ContentTypeMismatch { actual: String },

    #[error("Field mismatch on '{field}': expected {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Count mismatch on {what}: expected {expected}, got {actual}")]
    CountMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate test case: {0}")]
    DuplicateCase(String),

    #[error("Test case '{case}' depends on unknown case '{prerequisite}'")]
    UnknownPrerequisite { case: String, prerequisite: String },

    #[error("Test case '{case}' lists prerequisite '{prerequisite}' more than once")]
    DuplicatePrerequisite { case: String, prerequisite: String },

    #[error("Dependency cycle: {0}")]
    DependencyCycle(String),

    #[error("Test case not found: {0}")]
    CaseNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ContractResult<T> = Result<T, ContractError>;
