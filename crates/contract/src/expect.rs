//! Assertions that report expected vs actual instead of panicking

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use std::fmt::Debug;

use crate::error::{ContractError, ContractResult};

/// Check a response status
pub fn status(expected: StatusCode, actual: StatusCode) -> ContractResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ContractError::StatusMismatch {
            expected: expected.as_u16(),
            actual: actual.as_u16(),
        })
    }
}

/// Check that a `Content-Type` value names a JSON media type.
/// Parameters such as `charset` are ignored.
pub fn json_content_type(content_type: Option<&str>) -> ContractResult<()> {
    let raw = content_type.unwrap_or("");
    let media = raw
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if media == "application/json" || (media.starts_with("application/") && media.ends_with("+json")) {
        Ok(())
    } else {
        Err(ContractError::ContentTypeMismatch {
            actual: if raw.is_empty() { "<none>".to_string() } else { raw.to_string() },
        })
    }
}

/// `json_content_type` applied to a response's header
pub fn response_is_json(response: &Response) -> ContractResult<()> {
    json_content_type(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    )
}

/// Check a single field value
pub fn eq<T: PartialEq + Debug>(field: &str, expected: T, actual: T) -> ContractResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ContractError::FieldMismatch {
            field: field.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

/// Check the number of elements in a collection
pub fn count(what: &str, expected: usize, actual: usize) -> ContractResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ContractError::CountMismatch {
            what: what.to_string(),
            expected,
            actual,
        })
    }
}
