//! List Queries
//!
//! `{page, per_page, filters, sort}` and their query-string form.

use std::collections::BTreeMap;
use std::fmt;

pub type Filters = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: "created_at".to_string(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based
    pub page: u32,
    pub per_page: u32,
    pub filters: Filters,
    pub sort: Sort,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            filters: Filters::new(),
            sort: Sort::default(),
        }
    }
}

impl ListQuery {
    /// Query-string pairs. Blank filter values are omitted.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.max(1).to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        for (key, value) in &self.filters {
            let value = value.trim();
            if !value.is_empty() {
                params.push((key.clone(), value.to_string()));
            }
        }
        if !self.sort.field.is_empty() {
            params.push(("sort_by".to_string(), self.sort.field.clone()));
            params.push(("sort_direction".to_string(), self.sort.direction.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_skip_blank_filters() {
        let mut query = ListQuery::default();
        query.page = 2;
        query.filters.insert("search".into(), "  acme ".into());
        query.filters.insert("status".into(), "".into());

        let params = query.to_params();
        assert!(params.contains(&("page".into(), "2".into())));
        assert!(params.contains(&("search".into(), "acme".into())));
        assert!(!params.iter().any(|(k, _)| k == "status"));
        assert!(params.contains(&("sort_direction".into(), "desc".into())));
    }

    #[test]
    fn test_page_zero_is_sent_as_one() {
        let query = ListQuery { page: 0, ..ListQuery::default() };
        assert_eq!(query.to_params()[0], ("page".to_string(), "1".to_string()));
    }
}
