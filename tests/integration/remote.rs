use chief_cli::core::ChiefError;
use chief_cli::manifest::ManifestKind;
use chief_cli::remote::{Endpoints, HttpRemote, RemoteSource};

#[tokio::test]
async fn test_version_tokens_are_trimmed() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/version").with_body("v1.4.2\n").create_async().await;
    server
        .mock("GET", "/version-cli")
        .with_body("9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08\r\n")
        .create_async()
        .await;

    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    assert_eq!(remote.controller_version().await.unwrap(), "v1.4.2");
    assert_eq!(
        remote.cli_build_id().await.unwrap(),
        "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
    );
}

#[tokio::test]
async fn test_templates_are_returned_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let body = "${DOMAIN} {\n  reverse_proxy controller:3000\n}\n";
    server.mock("GET", "/Caddyfile.template").with_body(body).create_async().await;

    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    assert_eq!(remote.manifest_template(ManifestKind::Proxy).await.unwrap(), body);
}

#[tokio::test]
async fn test_error_status_is_network_error() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/version").with_status(503).create_async().await;

    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    let err = remote.controller_version().await.unwrap_err();
    match err.downcast_ref::<ChiefError>() {
        Some(ChiefError::NetworkError { operation, reason }) => {
            assert_eq!(operation, "Unable to retrieve Chief version");
            assert!(reason.contains("503"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_template_names_the_file() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/stack.yml.template").with_status(404).create_async().await;

    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    let err = remote.manifest_template(ManifestKind::Stack).await.unwrap_err();
    assert!(err.to_string().contains("stack.yml"));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // nothing listens on port 1
    let remote = HttpRemote::new(Endpoints::from_origin("http://127.0.0.1:1"));
    let err = remote.cli_build_id().await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ChiefError>(), Some(ChiefError::NetworkError { .. })));
}
