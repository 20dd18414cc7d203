//! Response Envelope
//!
//! Backend responses are wrapped as `{success, message, data, meta?, errors?}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<PaginationMeta>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

fn default_true() -> bool {
    true
}

impl<T> Envelope<T> {
    /// Unwrap `data`, treating `success: false` or a missing payload as an error.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(self.failure());
        }
        match self.data {
            Some(data) => Ok(data),
            None => Err(ApiError::decode("response contained no data")),
        }
    }

    fn failure(&self) -> ApiError {
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "Request was not successful".to_string());
        // Field errors in a 2xx body are still a validation failure.
        let code = if self.errors.as_ref().is_some_and(|e| !e.is_empty()) {
            crate::ErrorCode::Http(422)
        } else {
            crate::ErrorCode::Rejected
        };
        let mut err = ApiError::new(code, message.clone());
        err.response = Some(crate::ErrorBody {
            success: false,
            message: Some(message),
            errors: self.errors.clone().unwrap_or_default(),
        });
        err
    }

    /// Like [`Envelope::into_data`] but accepts an empty payload.
    pub fn into_ack(self) -> Result<Option<String>, ApiError> {
        if !self.success {
            return Err(self.failure());
        }
        Ok(self.message)
    }
}

/// Pagination block as sent by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Normalized pagination kept in list state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            per_page: 10,
            total: 0,
            total_pages: 0,
        }
    }
}

impl Pagination {
    pub fn from_meta(meta: &PaginationMeta, fallback_per_page: u32) -> Self {
        let per_page = if meta.per_page == 0 {
            fallback_per_page.max(1)
        } else {
            meta.per_page
        };
        let total_pages = meta
            .last_page
            .or(meta.total_pages)
            .unwrap_or_else(|| pages_for(meta.total, per_page));
        Self {
            current_page: meta.current_page.max(1),
            per_page,
            total: meta.total,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// 1-based index range of rows shown on the current page, for "Showing x-y of z"
    pub fn row_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let start = (self.current_page as u64 - 1) * self.per_page as u64 + 1;
        let end = (start + self.per_page as u64 - 1).min(self.total);
        Some((start, end))
    }
}

fn pages_for(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page as u64) as u32
}

/// List payloads arrive either flat (`data: [...]` with top-level `meta`) or
/// nested (`data: {data: [...], meta}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListData<T> {
    Flat(Vec<T>),
    Nested {
        data: Vec<T>,
        #[serde(default)]
        meta: Option<PaginationMeta>,
    },
}

/// One page of a resource list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

impl<T> Envelope<ListData<T>> {
    /// Flatten either list shape into a [`Page`].
    ///
    /// Without any pagination meta, the whole response is treated as one page.
    pub fn into_page(self, requested_per_page: u32) -> Result<Page<T>, ApiError> {
        let top_meta = self.meta.clone();
        let data = self.into_data()?;
        let (items, meta) = match data {
            ListData::Flat(items) => (items, top_meta),
            ListData::Nested { data, meta } => (data, meta.or(top_meta)),
        };
        let pagination = match meta {
            Some(meta) => Pagination::from_meta(&meta, requested_per_page),
            None => Pagination {
                current_page: 1,
                per_page: requested_per_page.max(1),
                total: items.len() as u64,
                total_pages: pages_for(items.len() as u64, requested_per_page.max(1)),
            },
        };
        Ok(Page { items, pagination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_flat_list_with_top_level_meta() {
        let body = r#"{"success":true,"data":[{"id":1},{"id":2}],"meta":{"total":12,"per_page":2,"current_page":3,"last_page":6}}"#;
        let env: Envelope<ListData<Value>> = serde_json::from_str(body).unwrap();
        let page = env.into_page(2).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.current_page, 3);
        assert_eq!(page.pagination.total_pages, 6);
        assert_eq!(page.pagination.total, 12);
    }

    #[test]
    fn test_nested_list_with_total_pages() {
        let body = r#"{"success":true,"message":"ok","data":{"data":[{"id":1}],"meta":{"total":21,"per_page":10,"current_page":1,"total_pages":3}}}"#;
        let env: Envelope<ListData<Value>> = serde_json::from_str(body).unwrap();
        let page = env.into_page(10).unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_missing_meta_derives_pagination() {
        let body = r#"{"success":true,"data":[{"id":1},{"id":2},{"id":3}]}"#;
        let env: Envelope<ListData<Value>> = serde_json::from_str(body).unwrap();
        let page = env.into_page(2).unwrap();

        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[test]
    fn test_unsuccessful_envelope_is_error() {
        let body = r#"{"success":false,"message":"Quota exceeded","data":null}"#;
        let env: Envelope<Value> = serde_json::from_str(body).unwrap();
        let err = env.into_data().unwrap_err();
        assert_eq!(err.message, "Quota exceeded");
        assert_eq!(err.code, crate::ErrorCode::Rejected);
    }

    #[test]
    fn test_unsuccessful_envelope_with_field_errors_is_validation() {
        let body = r#"{"success":false,"message":"Invalid","errors":{"email":["Email is taken"]}}"#;
        let env: Envelope<Value> = serde_json::from_str(body).unwrap();
        let err = env.into_ack().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::Http(422));
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert_eq!(err.field_error("email").as_deref(), Some("Email is taken"));
    }

    #[test]
    fn test_pagination_row_range() {
        let p = Pagination { current_page: 3, per_page: 10, total: 25, total_pages: 3 };
        assert_eq!(p.row_range(), Some((21, 25)));
        assert!(!p.has_next());
        assert!(p.has_previous());
        assert_eq!(Pagination::default().row_range(), None);
    }
}
