//! API Transformers
//!
//! Wire shapes for each resource and the pure functions that map them to
//! the flat form models and back. Each resource also implements
//! `RestResource` here, which is how the generic service finds its endpoint
//! and transformers.

mod client;
mod employee;
mod job;
mod quote;

pub use client::{transform_client_for_api, transform_client_from_api, ClientApi, ClientPayload};
pub use employee::{transform_employee_for_api, transform_employee_from_api, EmployeeApi, ManagerApi};
pub use job::{
    transform_attachment, transform_instruction, transform_job_for_api, transform_job_from_api,
    transform_task, AttachmentApi, InstructionApi, JobApi, TaskApi,
};
pub use quote::{transform_quote_for_api, transform_quote_from_api, QuoteApi};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Trimmed value, or `None` when blank
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Accepts `2024-05-01` as well as full timestamps.
pub(crate) fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Decimal columns arrive as numbers or as strings ("12.50").
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_date(Some("2024-05-01")), expected);
        assert_eq!(parse_date(Some("2024-05-01T08:30:00.000000Z")), expected);
        assert_eq!(parse_date(Some("May 1st")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" a "), Some("a".to_string()));
    }

    #[derive(Deserialize)]
    struct Amount {
        #[serde(default, deserialize_with = "number_or_string")]
        value: Option<f64>,
    }

    #[test]
    fn test_number_or_string() {
        let a: Amount = serde_json::from_str(r#"{"value":"12.50"}"#).unwrap();
        assert_eq!(a.value, Some(12.5));
        let b: Amount = serde_json::from_str(r#"{"value":3}"#).unwrap();
        assert_eq!(b.value, Some(3.0));
        let c: Amount = serde_json::from_str(r#"{"value":null}"#).unwrap();
        assert_eq!(c.value, None);
        let d: Amount = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(d.value, None);
    }
}
