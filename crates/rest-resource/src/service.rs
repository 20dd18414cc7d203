//! Resource Service
//!
//! One generic CRUD client parameterized by the resource type. Each resource
//! supplies its endpoint path and its API↔form transformers through
//! [`RestResource`].

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiClient;
use crate::envelope::{ListData, Page};
use crate::error::ApiError;
use crate::query::ListQuery;
use crate::transport::Transport;

/// A REST-backed record with list/detail CRUD endpoints
pub trait RestResource: Clone + PartialEq + 'static {
    /// Wire shape returned by the API
    type Api: DeserializeOwned;
    /// Wire shape sent on create/update
    type Payload: Serialize;

    /// Collection path segment, e.g. `"clients"`
    const PATH: &'static str;
    /// Singular display name, e.g. `"Client"`
    const LABEL: &'static str;

    /// Server-assigned id (0 for an unsaved draft)
    fn id(&self) -> u64;
    fn from_api(api: Self::Api) -> Self;
    fn to_payload(&self) -> Self::Payload;
}

pub const DEFAULT_PREFIX: &str = "vendors";

pub struct ResourceService<R, T> {
    api: ApiClient<T>,
    prefix: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R, T> Clone for ResourceService<R, T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            prefix: self.prefix.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: RestResource, T: Transport> ResourceService<R, T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Self::with_prefix(api, DEFAULT_PREFIX)
    }

    pub fn with_prefix(api: ApiClient<T>, prefix: &str) -> Self {
        Self {
            api,
            prefix: prefix.trim_matches('/').to_string(),
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn collection_path(&self) -> String {
        if self.prefix.is_empty() {
            R::PATH.to_string()
        } else {
            format!("{}/{}", self.prefix, R::PATH)
        }
    }

    pub fn member_path(&self, id: u64) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    pub async fn get_all(&self, query: &ListQuery) -> Result<Page<R>, ApiError> {
        let envelope = self
            .api
            .get::<ListData<R::Api>>(&self.collection_path(), query.to_params())
            .await?;
        let page = envelope.into_page(query.per_page)?;
        tracing::debug!(
            "{} page {} -> {} rows of {}",
            R::PATH,
            query.page,
            page.items.len(),
            page.pagination.total
        );
        Ok(page.map(R::from_api))
    }

    pub async fn get_by_id(&self, id: u64) -> Result<R, ApiError> {
        let api = self.api.get::<R::Api>(&self.member_path(id), Vec::new()).await?.into_data()?;
        Ok(R::from_api(api))
    }

    pub async fn create(&self, record: &R) -> Result<R, ApiError> {
        let body = serde_json::to_value(record.to_payload()).map_err(ApiError::decode)?;
        let api = self.api.post::<R::Api>(&self.collection_path(), body).await?.into_data()?;
        tracing::info!("{} created", R::LABEL);
        Ok(R::from_api(api))
    }

    pub async fn update(&self, id: u64, record: &R) -> Result<R, ApiError> {
        let body = serde_json::to_value(record.to_payload()).map_err(ApiError::decode)?;
        let api = self.api.put::<R::Api>(&self.member_path(id), body).await?.into_data()?;
        tracing::info!("{} {} updated", R::LABEL, id);
        Ok(R::from_api(api))
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete(&self.member_path(id)).await?.into_ack()?;
        tracing::info!("{} {} deleted", R::LABEL, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::session::SessionContext;
    use crate::transport::mock::MockTransport;
    use crate::transport::{Method, RequestBody};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        id: u64,
        label: String,
    }

    #[derive(Deserialize)]
    struct WidgetApi {
        id: u64,
        name: String,
    }

    #[derive(Serialize)]
    struct WidgetPayload {
        name: String,
    }

    impl RestResource for Widget {
        type Api = WidgetApi;
        type Payload = WidgetPayload;
        const PATH: &'static str = "widgets";
        const LABEL: &'static str = "Widget";

        fn id(&self) -> u64 {
            self.id
        }

        fn from_api(api: WidgetApi) -> Self {
            Widget { id: api.id, label: api.name }
        }

        fn to_payload(&self) -> WidgetPayload {
            WidgetPayload { name: self.label.clone() }
        }
    }

    fn service(mock: &MockTransport) -> ResourceService<Widget, MockTransport> {
        let api = ApiClient::new(mock.clone(), "http://localhost/api/v1", SessionContext::in_memory());
        ResourceService::new(api)
    }

    #[tokio::test]
    async fn test_get_all_applies_transformer_and_query() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            r#"{"success":true,"data":[{"id":1,"name":"a"},{"id":2,"name":"b"}],"meta":{"total":2,"per_page":25,"current_page":1,"last_page":1}}"#,
        );
        let svc = service(&mock);
        let mut query = ListQuery { per_page: 25, ..ListQuery::default() };
        query.filters.insert("search".into(), "a".into());

        let page = svc.get_all(&query).await.unwrap();
        assert_eq!(page.items[1], Widget { id: 2, label: "b".into() });

        let sent = &mock.requests()[0];
        assert!(sent.url.ends_with("/vendors/widgets"));
        assert!(sent.query.contains(&("search".to_string(), "a".to_string())));
        assert!(sent.query.contains(&("per_page".to_string(), "25".to_string())));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_keeps_body() {
        let mock = MockTransport::new();
        mock.respond(404, r#"{"success":false,"message":"Widget not found"}"#);
        let err = service(&mock).get_by_id(9).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Http(404));
        assert_eq!(err.message, "Widget not found");
        assert!(err.response.is_some());
    }

    #[tokio::test]
    async fn test_create_sends_payload_shape() {
        let mock = MockTransport::new();
        mock.respond(201, r#"{"success":true,"data":{"id":5,"name":"new"}}"#);
        let created = service(&mock)
            .create(&Widget { id: 0, label: "new".into() })
            .await
            .unwrap();
        assert_eq!(created.id, 5);

        let sent = &mock.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.body, RequestBody::Json(serde_json::json!({"name": "new"})));
    }

    #[tokio::test]
    async fn test_update_and_delete_use_member_path() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true,"data":{"id":5,"name":"renamed"}}"#)
            .respond(200, r#"{"success":true,"message":"Deleted"}"#);
        let svc = service(&mock);

        svc.update(5, &Widget { id: 5, label: "renamed".into() }).await.unwrap();
        svc.delete(5).await.unwrap();

        let sent = mock.requests();
        assert_eq!(sent[0].method, Method::Put);
        assert!(sent[0].url.ends_with("/vendors/widgets/5"));
        assert_eq!(sent[1].method, Method::Delete);
    }
}
