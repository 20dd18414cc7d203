//! API Client
//!
//! Joins paths onto the API base URL, attaches the bearer token from the
//! injected [`SessionContext`], decodes the response envelope and
//! normalizes failures into [`ApiError`].
//!
//! A 401 triggers one token refresh and one retry of the original request.
//! Requests that hit a 401 while a refresh is in flight wait on that same
//! refresh instead of starting their own. The login and refresh endpoints
//! themselves are never retried. If the refresh fails the session is
//! expired once, which fires the session's hook.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::session::{SessionContext, TokenGrant};
use crate::transport::{FormPart, HttpRequest, HttpResponse, Method, RequestBody, Transport};

pub const LOGIN_PATH: &str = "auth/login";
pub const REFRESH_PATH: &str = "auth/refresh";

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    fn allows_refresh(&self) -> bool {
        let path = self.path.trim_matches('/');
        path != LOGIN_PATH && path != REFRESH_PATH
    }
}

type RefreshFuture = Shared<LocalBoxFuture<'static, Result<(), ApiError>>>;

struct Inner<T> {
    transport: T,
    base_url: String,
    session: SessionContext,
    refreshing: RefCell<Option<RefreshFuture>>,
}

pub struct ApiClient<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                session,
                refreshing: RefCell::new(None),
            }),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<D: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Envelope<D>, ApiError> {
        self.request(ApiRequest::new(Method::Get, path).query(query)).await
    }

    pub async fn post<D: DeserializeOwned>(&self, path: &str, body: Value) -> Result<Envelope<D>, ApiError> {
        self.request(ApiRequest::new(Method::Post, path).json(body)).await
    }

    pub async fn put<D: DeserializeOwned>(&self, path: &str, body: Value) -> Result<Envelope<D>, ApiError> {
        self.request(ApiRequest::new(Method::Put, path).json(body)).await
    }

    pub async fn patch<D: DeserializeOwned>(&self, path: &str, body: Value) -> Result<Envelope<D>, ApiError> {
        self.request(ApiRequest::new(Method::Patch, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Envelope<Value>, ApiError> {
        self.request(ApiRequest::new(Method::Delete, path)).await
    }

    pub async fn post_multipart<D: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<Envelope<D>, ApiError> {
        self.request(ApiRequest::new(Method::Post, path).multipart(parts)).await
    }

    /// Send and decode the envelope. An empty 2xx body decodes as a bare success.
    pub async fn request<D: DeserializeOwned>(&self, request: ApiRequest) -> Result<Envelope<D>, ApiError> {
        let response = self.execute(&request).await?;
        decode(&response)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Concurrent callers share one in-flight exchange. A failed exchange
    /// expires the session.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let pending = self.inner.refreshing.borrow().clone();
        let pending = match pending {
            Some(pending) => pending,
            None => {
                let client = self.clone();
                let exchange = async move {
                    let result = client.exchange_refresh_token().await;
                    if let Err(e) = &result {
                        tracing::warn!("token refresh failed: {}", e);
                        client.inner.session.expire();
                    }
                    result
                }
                .boxed_local()
                .shared();
                *self.inner.refreshing.borrow_mut() = Some(exchange.clone());
                exchange
            }
        };

        let result = pending.clone().await;
        let mut slot = self.inner.refreshing.borrow_mut();
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&pending)) {
            *slot = None;
        }
        result
    }

    async fn exchange_refresh_token(&self) -> Result<(), ApiError> {
        let Some(token) = self.inner.session.refresh_token() else {
            return Err(ApiError::new(
                crate::ErrorCode::Http(401),
                "No refresh token available",
            ));
        };
        let request = ApiRequest::new(Method::Post, REFRESH_PATH)
            .json(serde_json::json!({ "refresh_token": token }));
        let response = check(self.dispatch(&request).await?)?;
        let grant = decode::<TokenGrant>(&response)?.into_data()?;
        self.inner.session.establish(grant);
        tracing::info!("access token refreshed");
        Ok(())
    }

    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let sent_token = self.inner.session.access_token();
        let response = self.dispatch(request).await?;
        if response.status != 401 || !request.allows_refresh() {
            return check(response);
        }

        // Another request already rotated the token while this one was out.
        let current_token = self.inner.session.access_token();
        if current_token.is_some() && current_token != sent_token {
            tracing::debug!("401 on {} with a superseded token, retrying", request.path);
            return self.retry(request).await;
        }

        tracing::debug!("401 on {}, attempting token refresh", request.path);
        match self.refresh().await {
            Ok(()) => self.retry(request).await,
            Err(_) => check(response),
        }
    }

    async fn retry(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let retried = self.dispatch(request).await?;
        if retried.status == 401 {
            self.inner.session.expire();
        }
        check(retried)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let http = HttpRequest {
            method: request.method,
            url: self.url(&request.path),
            query: request.query.clone(),
            bearer: self.inner.session.access_token(),
            body: request.body.clone(),
        };
        tracing::debug!("{} {}", http.method.as_str(), http.url);
        let response = self.inner.transport.send(http).await.map_err(|e| {
            tracing::error!("{} {} failed: {}", request.method.as_str(), request.path, e);
            ApiError::from(e)
        })?;
        Ok(response)
    }
}

fn check(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

fn decode<D: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<D>, ApiError> {
    if response.body.trim().is_empty() {
        return Ok(Envelope {
            success: true,
            message: None,
            data: None,
            meta: None,
            errors: None,
        });
    }
    serde_json::from_str(&response.body).map_err(ApiError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, TransportError};
    use crate::transport::mock::MockTransport;
    use std::cell::Cell;

    fn client_with_session(mock: &MockTransport) -> ApiClient<MockTransport> {
        let session = SessionContext::in_memory();
        session.establish(TokenGrant {
            access_token: "stale".into(),
            token_type: "Bearer".into(),
            expires_in: None,
            refresh_token: Some("r1".into()),
            user: None,
        });
        ApiClient::new(mock.clone(), "https://api.test/api/v1/", session)
    }

    #[tokio::test]
    async fn test_attaches_bearer_and_joins_url() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true,"data":{"ok":true}}"#);
        let api = client_with_session(&mock);

        let env: Envelope<Value> = api.get("/vendors/clients/1", vec![]).await.unwrap();
        assert_eq!(env.into_data().unwrap()["ok"], true);

        let sent = &mock.requests()[0];
        assert_eq!(sent.url, "https://api.test/api/v1/vendors/clients/1");
        assert_eq!(sent.bearer.as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn test_refreshes_once_and_retries_on_401() {
        let mock = MockTransport::new();
        mock.respond(401, r#"{"message":"Unauthenticated."}"#)
            .respond(200, r#"{"success":true,"data":{"access_token":"fresh","token_type":"Bearer"}}"#)
            .respond(200, r#"{"success":true,"data":[]}"#);
        let api = client_with_session(&mock);

        let result: Result<Envelope<Value>, _> = api.get("vendors/jobs", vec![]).await;
        assert!(result.is_ok());

        let sent = mock.requests();
        assert_eq!(sent.len(), 3);
        assert!(sent[1].url.ends_with("/auth/refresh"));
        assert_eq!(sent[2].bearer.as_deref(), Some("fresh"));
        assert_eq!(api.session().refresh_token().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_failed_refresh_expires_session() {
        let mock = MockTransport::new();
        mock.respond(401, r#"{"message":"Unauthenticated."}"#)
            .respond(401, r#"{"message":"Refresh token expired"}"#);
        let api = client_with_session(&mock);
        let expired = Rc::new(Cell::new(false));
        let flag = expired.clone();
        api.session().on_expired(move || flag.set(true));

        let err = api.get::<Value>("vendors/jobs", vec![]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Http(401));
        assert!(expired.get());
        assert!(!api.session().is_authenticated());
        assert_eq!(mock.requests().len(), 2);
    }

    /// Accepts only the newest access token and rotates the refresh token on
    /// every exchange. Yields before replying so calls interleave.
    #[derive(Clone, Default)]
    struct RotatingAuthServer {
        refresh_calls: Rc<Cell<u32>>,
        generation: Rc<Cell<u32>>,
    }

    #[async_trait::async_trait(?Send)]
    impl Transport for RotatingAuthServer {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            tokio::task::yield_now().await;
            let current = self.generation.get();
            if request.url.ends_with(REFRESH_PATH) {
                self.refresh_calls.set(self.refresh_calls.get() + 1);
                let presented = match &request.body {
                    RequestBody::Json(body) => body["refresh_token"].as_str().unwrap_or_default().to_string(),
                    _ => String::new(),
                };
                if presented != format!("r{}", current) {
                    return Ok(HttpResponse {
                        status: 401,
                        body: r#"{"message":"Refresh token already used"}"#.into(),
                    });
                }
                let next = current + 1;
                self.generation.set(next);
                return Ok(HttpResponse {
                    status: 200,
                    body: format!(
                        r#"{{"success":true,"data":{{"access_token":"a{next}","token_type":"Bearer","refresh_token":"r{next}"}}}}"#
                    ),
                });
            }
            let status = if request.bearer == Some(format!("a{}", current)) { 200 } else { 401 };
            Ok(HttpResponse {
                status,
                body: r#"{"success":true,"data":[]}"#.into(),
            })
        }
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let server = RotatingAuthServer::default();
        server.generation.set(1);
        let session = SessionContext::in_memory();
        session.establish(TokenGrant {
            access_token: "a0".into(),
            token_type: "Bearer".into(),
            expires_in: None,
            refresh_token: Some("r1".into()),
            user: None,
        });
        let api = ApiClient::new(server.clone(), "https://api.test/api/v1", session);
        let expired = Rc::new(Cell::new(false));
        let flag = expired.clone();
        api.session().on_expired(move || flag.set(true));

        let (jobs, employees) = tokio::join!(
            api.get::<Value>("vendors/jobs", vec![]),
            api.get::<Value>("vendors/employees", vec![]),
        );

        assert!(jobs.is_ok());
        assert!(employees.is_ok());
        assert_eq!(server.refresh_calls.get(), 1);
        assert!(api.session().is_authenticated());
        assert!(!expired.get());
        assert_eq!(api.session().refresh_token().as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_login_401_is_not_refreshed() {
        let mock = MockTransport::new();
        mock.respond(401, r#"{"message":"Invalid credentials"}"#);
        let api = ApiClient::new(mock.clone(), "https://api.test/api/v1", SessionContext::in_memory());

        let err = api
            .post::<Value>(LOGIN_PATH, serde_json::json!({"email": "a", "password": "b"}))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        let mock = MockTransport::new();
        mock.fail(TransportError::from_message("Failed to fetch"));
        let api = client_with_session(&mock);

        let err = api.get::<Value>("vendors/clients", vec![]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_is_bare_success() {
        let mock = MockTransport::new();
        mock.respond(204, "");
        let api = client_with_session(&mock);

        let env = api.delete("vendors/clients/4").await.unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
    }
}
