//! Quote actions beyond CRUD

use rest_resource::{ApiClient, ApiError, RestResource, Transport, DEFAULT_PREFIX};
use serde_json::json;

use crate::models::{Job, Quote};
use crate::transform::JobApi;

/// Turn an accepted quote into a job; returns the new job.
pub async fn convert_to_job<T: Transport>(api: &ApiClient<T>, quote_id: u64) -> Result<Job, ApiError> {
    let path = format!("{}/{}/{}/convert", DEFAULT_PREFIX, Quote::PATH, quote_id);
    let job: JobApi = api.post(&path, json!({})).await?.into_data()?;
    tracing::info!("[QUOTES] quote {} converted to job {}", quote_id, job.id);
    Ok(Job::from_api(job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_resource::{ErrorCode, MockTransport};

    #[tokio::test]
    async fn test_convert_returns_job() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true,"data":{"id":31,"title":"Bathroom refit","quote_id":7}}"#);
        let api = crate::services::testing::signed_in_api(&mock);

        let job = convert_to_job(&api, 7).await.unwrap();
        assert_eq!(job.id, 31);
        assert_eq!(job.quote_id, Some(7));
        assert!(mock.requests()[0].url.ends_with("/vendors/quotes/7/convert"));
    }

    #[tokio::test]
    async fn test_convert_conflict() {
        let mock = MockTransport::new();
        mock.respond(409, r#"{"success":false,"message":"Quote already converted"}"#);
        let api = crate::services::testing::signed_in_api(&mock);

        let err = convert_to_job(&api, 7).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Http(409));
        assert_eq!(err.message, "Quote already converted");
    }
}
