#[cfg(test)]
mod tests {
    use crate::middleware::require_bearer;
    use crate::password::hash_password;
    use crate::routes::routes;
    use crate::session::SessionManager;
    use crate::store::{CredentialRecord, InMemoryCredentialStore};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn sessions() -> Arc<SessionManager> {
        let store = InMemoryCredentialStore::new([CredentialRecord {
            email: "doctor@example.com".into(),
            password_hash: hash_password("password").unwrap(),
            role: "doctor".into(),
        }]);
        Arc::new(SessionManager::new(
            Arc::new(store),
            b"handler-secret",
            Duration::minutes(60),
        ))
    }

    fn login_request(username: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .unwrap()
    }

    fn me_request(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/me");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_token_then_me() {
        let sessions = sessions();
        let app = routes(sessions.clone());

        let response = app
            .clone()
            .oneshot(login_request("doctor%40example.com", "password"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["token_type"], "bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let response = app.oneshot(me_request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "email": "doctor@example.com", "role": "doctor" })
        );
    }

    #[tokio::test]
    async fn test_wrong_password_is_bad_request() {
        let response = routes(sessions())
            .oneshot(login_request("doctor%40example.com", "nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({ "detail": "Incorrect username or password" })
        );
    }

    #[tokio::test]
    async fn test_me_without_token_is_unauthorized() {
        let response = routes(sessions()).oneshot(me_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(
            read_json(response).await,
            json!({ "detail": "Invalid credentials" })
        );
    }

    #[tokio::test]
    async fn test_require_bearer_guards_route() {
        let sessions = sessions();
        let app = Router::new()
            .route("/guarded", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(sessions.clone(), require_bearer));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/guarded").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = sessions.login("doctor@example.com", "password").await.unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/guarded")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
