//! Auth Service
//!
//! Login, logout, current user and password reset. Token bookkeeping lives
//! in the injected `SessionContext`; this module only talks to `auth/*`.

use rest_resource::{ApiClient, ApiError, SessionContext, TokenGrant, Transport, LOGIN_PATH};
use serde_json::{json, Value};

use crate::models::{LoginForm, User};

const LOGOUT_PATH: &str = "auth/logout";
const ME_PATH: &str = "auth/me";
const FORGOT_PASSWORD_PATH: &str = "auth/forgot-password";

/// Decoded user from the session, if any
pub fn current_user(session: &SessionContext) -> Option<User> {
    session.user().and_then(|v| serde_json::from_value(v).ok())
}

pub async fn login<T: Transport>(api: &ApiClient<T>, form: &LoginForm) -> Result<Option<User>, ApiError> {
    let body = json!({
        "email": form.email.trim(),
        "password": form.password,
        "remember": form.remember,
    });
    let grant: TokenGrant = api.post(LOGIN_PATH, body).await?.into_data()?;
    let session = api.session();
    session.establish(grant);
    session.remember_email(form.remember.then(|| form.email.trim()));
    tracing::info!("[AUTH] signed in as {}", form.email.trim());

    match current_user(session) {
        Some(user) => Ok(Some(user)),
        // Some backends omit the user from the token response.
        None => me(api).await.map(Some),
    }
}

/// Server-side logout is best effort; the local session is always cleared.
pub async fn logout<T: Transport>(api: &ApiClient<T>) {
    if let Err(e) = api.post::<Value>(LOGOUT_PATH, json!({})).await {
        tracing::warn!("[AUTH] logout request failed: {}", e);
    }
    api.session().clear();
    tracing::info!("[AUTH] signed out");
}

pub async fn me<T: Transport>(api: &ApiClient<T>) -> Result<User, ApiError> {
    let raw: Value = api.get(ME_PATH, Vec::new()).await?.into_data()?;
    let user: User = serde_json::from_value(raw.clone()).map_err(ApiError::decode)?;
    api.session().set_user(raw);
    Ok(user)
}

/// Returns the server's confirmation message.
pub async fn forgot_password<T: Transport>(api: &ApiClient<T>, email: &str) -> Result<String, ApiError> {
    let message = api
        .post::<Value>(FORGOT_PASSWORD_PATH, json!({ "email": email.trim() }))
        .await?
        .into_ack()?;
    Ok(message.unwrap_or_else(|| "Check your inbox for a reset link".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_resource::MockTransport;

    fn form(remember: bool) -> LoginForm {
        LoginForm { email: " ops@example.com ".into(), password: "secret".into(), remember }
    }

    #[tokio::test]
    async fn test_login_establishes_session_and_remembers_email() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            r#"{"success":true,"data":{"access_token":"a1","refresh_token":"r1","expires_in":3600,
                "user":{"id":3,"name":"Ops Desk","email":"ops@example.com"}}}"#,
        );
        let api = ApiClient::new(mock.clone(), "https://api.test/api/v1", SessionContext::in_memory());

        let user = login(&api, &form(true)).await.unwrap().unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(api.session().access_token().as_deref(), Some("a1"));
        assert_eq!(api.session().remembered_email().as_deref(), Some("ops@example.com"));

        let sent = &mock.requests()[0];
        assert!(sent.url.ends_with("/auth/login"));
        assert_eq!(sent.bearer, None);
    }

    #[tokio::test]
    async fn test_login_fetches_me_when_user_missing() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true,"data":{"access_token":"a1"}}"#)
            .respond(200, r#"{"success":true,"data":{"id":8,"name":"Field Lead","email":"lead@example.com"}}"#);
        let api = ApiClient::new(mock.clone(), "https://api.test/api/v1", SessionContext::in_memory());

        let user = login(&api, &form(false)).await.unwrap().unwrap();
        assert_eq!(user.name, "Field Lead");
        assert_eq!(api.session().remembered_email(), None);
        assert_eq!(mock.requests()[1].bearer.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_bad_credentials_leave_session_empty() {
        let mock = MockTransport::new();
        mock.respond(401, r#"{"success":false,"message":"Invalid credentials"}"#);
        let api = ApiClient::new(mock.clone(), "https://api.test/api/v1", SessionContext::in_memory());

        let err = login(&api, &form(false)).await.unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_request_fails() {
        let mock = MockTransport::new();
        mock.respond(500, r#"{"message":"boom"}"#);
        let api = crate::services::testing::signed_in_api(&mock);

        logout(&api).await;
        assert!(!api.session().is_authenticated());
    }
}
