#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{extract::Query, http::HeaderMap, routing::post, Form, Json, Router};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use http::StatusCode;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    use crate::config::manager::ManagerConfig;
    use crate::credentials::ClientCredentials;
    use crate::error::EndpointError;
    use crate::sources::{HttpTokenEndpoint, ObtainRequest, TokenEndpoint};
    use crate::tests::common::{spawn_axum, test_client, test_user};
    use crate::utils::constants::USER_AGENT;

    type Captured = Arc<Mutex<Option<(HashMap<String, String>, HeaderMap, HashMap<String, String>)>>>;

    fn endpoint(config: &ManagerConfig) -> HttpTokenEndpoint {
        HttpTokenEndpoint::new(HttpTokenEndpoint::build_client(config).unwrap(), config)
    }

    fn request(client: ClientCredentials, scope: &str) -> ObtainRequest {
        ObtainRequest {
            client,
            user: test_user(),
            scope: scope.to_owned(),
        }
    }

    /// Token endpoint that remembers the last request it saw.
    async fn capturing_issuer() -> (Captured, String) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let sink = captured.clone();
        let router = Router::new().route(
            "/oauth2/access_token",
            post(
                move |Query(query): Query<HashMap<String, String>>,
                      headers: HeaderMap,
                      Form(form): Form<HashMap<String, String>>| {
                    let sink = sink.clone();
                    async move {
                        *sink.lock().unwrap() = Some((query, headers, form));
                        Json(json!({"access_token": "abc", "expires_in": 3600, "token_type": "Bearer"}))
                    }
                },
            ),
        );
        let (_handle, addr) = spawn_axum(router).await;
        (captured, format!("http://{}/oauth2/access_token", addr))
    }

    #[tokio::test]
    async fn obtain_sends_password_grant() {
        let (captured, url) = capturing_issuer().await;
        let mut config = ManagerConfig::with_endpoints(url, None);
        config.realm = "realm".to_owned();

        let response = endpoint(&config)
            .obtain(&request(test_client(), "write read"))
            .await
            .unwrap();

        assert_eq!(response.access_token, "abc");
        assert_eq!(response.expires_in, 3600);

        let (query, headers, form) = captured.lock().unwrap().take().expect("request captured");
        assert_eq!(query.get("realm").map(String::as_str), Some("realm"));
        assert_eq!(
            headers.get("authorization").unwrap(),
            &format!("Basic {}", STANDARD.encode("clientid:clientsecret"))
        );
        assert_eq!(
            headers.get("content-type").unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(headers.get("user-agent").unwrap(), USER_AGENT);
        assert_eq!(form.get("grant_type").map(String::as_str), Some("password"));
        assert_eq!(form.get("username").map(String::as_str), Some("user"));
        assert_eq!(form.get("password").map(String::as_str), Some("password"));
        assert_eq!(form.get("scope").map(String::as_str), Some("write read"));
    }

    #[tokio::test]
    async fn obtain_without_client_secret_uses_placeholder() {
        let (captured, url) = capturing_issuer().await;
        let config = ManagerConfig::with_endpoints(url, None);
        let client = ClientCredentials {
            client_id: "clientid".to_owned(),
            client_secret: None,
        };

        endpoint(&config).obtain(&request(client, "")).await.unwrap();

        let (query, headers, form) = captured.lock().unwrap().take().unwrap();
        assert_eq!(query.get("realm").map(String::as_str), Some("/services"));
        assert_eq!(
            headers.get("authorization").unwrap(),
            &format!("Basic {}", STANDARD.encode("clientid:NOT_A_SECRET"))
        );
        assert_eq!(form.get("scope").map(String::as_str), Some(""));
    }

    #[tokio::test]
    async fn rejected_obtain_reports_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(401)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"error": "invalid_grant"}));
            })
            .await;
        let config = ManagerConfig::with_endpoints(server.url("/token"), None);

        let err = endpoint(&config)
            .obtain(&request(test_client(), "read"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        match &err {
            EndpointError::Status { status, body } => {
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.reason(), "rejected");
    }

    #[tokio::test]
    async fn unavailable_issuer_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(503);
            })
            .await;
        let config = ManagerConfig::with_endpoints(server.url("/token"), None);

        let err = endpoint(&config)
            .obtain(&request(test_client(), "read"))
            .await
            .unwrap_err();

        assert_eq!(err.reason(), "unavailable");
    }

    #[tokio::test]
    async fn response_without_expiry_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"access_token": "abc"}));
            })
            .await;
        let config = ManagerConfig::with_endpoints(server.url("/token"), None);

        let err = endpoint(&config)
            .obtain(&request(test_client(), "read"))
            .await
            .unwrap_err();

        assert!(matches!(err, EndpointError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_issuer_is_a_transport_error() {
        let config = ManagerConfig::with_endpoints("http://127.0.0.1:1/token", None);

        let err = endpoint(&config)
            .obtain(&request(test_client(), "read"))
            .await
            .unwrap_err();

        assert!(matches!(err, EndpointError::Transport(_)));
        assert_eq!(err.reason(), "transport");
    }

    #[tokio::test]
    async fn token_info_sends_access_token_as_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/tokeninfo")
                    .query_param("access_token", "abcd");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"expires_in": 1234, "scope": ["read"], "uid": "svc"}));
            })
            .await;
        let config = ManagerConfig::with_endpoints(server.url("/token"), Some(server.url("/tokeninfo")));

        let info = endpoint(&config).token_info("abcd").await.unwrap();

        mock.assert_async().await;
        assert_eq!(info.expires_in, 1234);
        assert_eq!(info.scope, Some(vec!["read".to_owned()]));
    }

    #[tokio::test]
    async fn token_info_rejection_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tokeninfo");
                then.status(400)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"error": "invalid_token"}));
            })
            .await;
        let config = ManagerConfig::with_endpoints(server.url("/token"), Some(server.url("/tokeninfo")));

        let err = endpoint(&config).token_info("expired").await.unwrap_err();

        assert!(matches!(err, EndpointError::Status { status, .. } if status == StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn token_info_without_url_is_not_configured() {
        let config = ManagerConfig::with_endpoints("http://127.0.0.1:1/token", None);

        let err = endpoint(&config).token_info("abcd").await.unwrap_err();

        assert!(matches!(err, EndpointError::NotConfigured(_)));
    }
}
