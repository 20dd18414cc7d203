//! Dashboard counters

use rest_resource::{ApiClient, ApiError, Transport, DEFAULT_PREFIX};

use crate::models::DashboardStats;

pub async fn fetch_stats<T: Transport>(api: &ApiClient<T>) -> Result<DashboardStats, ApiError> {
    api.get(&format!("{}/dashboard", DEFAULT_PREFIX), Vec::new())
        .await?
        .into_data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_resource::MockTransport;

    #[tokio::test]
    async fn test_missing_counters_default_to_zero() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true,"data":{"active_jobs":4,"pending_quotes":2}}"#);
        let api = crate::services::testing::signed_in_api(&mock);

        let stats = fetch_stats(&api).await.unwrap();
        assert_eq!(stats.active_jobs, 4);
        assert_eq!(stats.total_clients, 0);
        assert!(mock.requests()[0].url.ends_with("/vendors/dashboard"));
    }
}
