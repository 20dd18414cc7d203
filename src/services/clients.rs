//! Customer lookups for pickers on other forms

use rest_resource::{ApiError, ListQuery, ResourceService, Sort, SortDirection, Transport, SEARCH_FILTER};

use crate::models::Client;

/// Most customers a picker loads at once
pub const PICKER_LIMIT: u32 = 100;

/// `(id, display name)` pairs, alphabetical, optionally narrowed by `search`.
pub async fn client_options<T: Transport>(
    service: &ResourceService<Client, T>,
    search: &str,
) -> Result<Vec<(u64, String)>, ApiError> {
    let mut query = ListQuery {
        per_page: PICKER_LIMIT,
        sort: Sort {
            field: "name".to_string(),
            direction: SortDirection::Asc,
        },
        ..ListQuery::default()
    };
    if !search.trim().is_empty() {
        query.filters.insert(SEARCH_FILTER.to_string(), search.trim().to_string());
    }
    let page = service.get_all(&query).await?;
    Ok(page
        .items
        .into_iter()
        .map(|c| (c.id, c.display_name().to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_resource::MockTransport;

    #[tokio::test]
    async fn test_client_options_use_display_name() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            r#"{"success":true,"data":[{"id":3,"name":"Jo Park","company_name":"Park Plumbing"},{"id":5,"name":"Ray Chu"}]}"#,
        );
        let service = ResourceService::new(crate::services::testing::signed_in_api(&mock));

        let options = client_options(&service, " park ").await.unwrap();
        assert_eq!(options, vec![(3, "Park Plumbing".to_string()), (5, "Ray Chu".to_string())]);

        let sent = &mock.requests()[0];
        assert!(sent.url.ends_with("/vendors/clients"));
        assert!(sent.query.contains(&("search".to_string(), "park".to_string())));
        assert!(sent.query.contains(&("per_page".to_string(), "100".to_string())));
        assert!(sent.query.contains(&("sort_by".to_string(), "name".to_string())));
    }
}
