//! Health endpoint and response header integration tests.

#[cfg(test)]
mod tests {
    use crate::TestServer;

    #[tokio::test]
    async fn test_should_serve_health_without_signature() {
        let server = TestServer::start().await;
        let client = reqwest::Client::new();

        for path in ["/health", "/_health"] {
            let resp = client.get(server.url(path)).send().await.unwrap();
            assert_eq!(resp.status(), reqwest::StatusCode::OK, "{path}");
            let json: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(json["status"], "running");
        }

        server.stop().await;
    }

    #[tokio::test]
    async fn test_should_attach_request_id_to_errors() {
        let server = TestServer::start().await;

        let resp = reqwest::get(server.url("/anything")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
        let request_id = resp
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        assert!(request_id.is_some_and(|id| !id.is_empty()));
        assert_eq!(resp.headers()["www-authenticate"], "Signature");

        server.stop().await;
    }
}
