//! Frontend Models
//!
//! Flat, form-friendly records. Wire shapes live in `transform`.

mod auth;
mod client;
mod dashboard;
mod employee;
mod job;
mod quote;

pub use auth::{LoginForm, User};
pub use client::{Client, ClientStatus};
pub use dashboard::DashboardStats;
pub use employee::{Employee, EmployeeRole, ManagerOption};
pub use job::{Attachment, Instruction, InstructionDraft, Job, JobPriority, JobStatus, Task, TaskDraft};
pub use quote::{LineItem, Quote, QuoteStatus};

use std::collections::BTreeMap;

/// Local form validation messages keyed by field name
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Loose email shape check; the server has the final word.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("dana@example.com"));
        assert!(!looks_like_email("dana@example"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("dana smith@example.com"));
    }
}
