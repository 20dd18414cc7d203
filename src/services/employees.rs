//! Employee lookups beyond CRUD

use rest_resource::{ApiClient, ApiError, ListData, Transport, DEFAULT_PREFIX};

use crate::models::ManagerOption;
use crate::transform::ManagerApi;

/// Employees eligible to manage others. `exclude` drops the employee being
/// edited so nobody can pick themselves.
pub async fn get_managers<T: Transport>(
    api: &ApiClient<T>,
    exclude: Option<u64>,
) -> Result<Vec<ManagerOption>, ApiError> {
    let query = exclude
        .map(|id| vec![("exclude_id".to_string(), id.to_string())])
        .unwrap_or_default();
    let data: ListData<ManagerApi> = api
        .get(&format!("{}/employees/managers", DEFAULT_PREFIX), query)
        .await?
        .into_data()?;
    let managers = match data {
        ListData::Flat(items) => items,
        ListData::Nested { data, .. } => data,
    };
    Ok(managers
        .into_iter()
        .filter(|m| Some(m.id) != exclude)
        .map(ManagerApi::into_option)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_resource::MockTransport;

    #[tokio::test]
    async fn test_managers_exclude_self() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            r#"{"success":true,"data":[{"id":1,"name":"Ana Gomez"},{"id":4,"first_name":"Sam","last_name":"Ortiz"}]}"#,
        );
        let api = crate::services::testing::signed_in_api(&mock);

        let managers = get_managers(&api, Some(4)).await.unwrap();
        assert_eq!(managers, vec![ManagerOption { id: 1, name: "Ana Gomez".into() }]);

        let sent = &mock.requests()[0];
        assert!(sent.url.ends_with("/vendors/employees/managers"));
        assert_eq!(sent.query, vec![("exclude_id".to_string(), "4".to_string())]);
    }

    #[tokio::test]
    async fn test_nested_manager_list() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true,"data":{"data":[{"id":2,"name":"Lee"}]}}"#);
        let api = crate::services::testing::signed_in_api(&mock);

        let managers = get_managers(&api, None).await.unwrap();
        assert_eq!(managers.len(), 1);
        assert!(mock.requests()[0].query.is_empty());
    }
}
