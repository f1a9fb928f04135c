mod common;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use twitch_gql::{Error, User};

use common::{client_for, CLIENT_ID};

#[tokio::test]
async fn fetch_user_posts_query_with_client_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gql"))
        .and(header("Client-Id", CLIENT_ID))
        .and(body_json(json!({"query": r#"query{user(login:"twitch"){id,login}}"#})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"user": {"id": "12826", "login": "twitch"}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = assert_ok!(client.fetch_user(None, Some("twitch")).await);

    assert_eq!(
        user,
        Some(User {
            id: 12826,
            login: "twitch".to_string()
        })
    );
}

#[tokio::test]
async fn oauth_token_is_sent_when_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gql"))
        .and(header("Authorization", "OAuth secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"user": null}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_access_token("secret-token".to_string()).await;

    let user = assert_ok!(client.fetch_user(Some(1), None).await);
    assert!(user.is_none());
}

#[tokio::test]
async fn graphql_errors_are_joined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "first"}, {"message": "second"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(client.fetch_channel(Some(1), None).await);

    assert!(matches!(err, Error::GraphQl(ref m) if m == "first second"));
}

#[tokio::test]
async fn server_error_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gql"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Internal"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(client.fetch_game(None, Some("Chess")).await);

    assert!(matches!(err, Error::Protocol { status: 500, .. }));
}

#[tokio::test]
async fn non_json_body_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(client.send("query{user(id:1){id}}").await);

    match err {
        Error::Protocol {
            status,
            content_type,
        } => {
            assert_eq!(status, 200);
            assert!(content_type.is_some_and(|ct| ct.starts_with("text/plain")));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_input_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert!(matches!(
        client.fetch_user(None, None).await,
        Err(Error::Input(_))
    ));
    assert!(matches!(
        client.fetch_users(Some(&[]), None).await,
        Err(Error::Input(_))
    ));
    assert!(matches!(
        client.fetch_channel(None, Some("quote\"d")).await,
        Err(Error::Input(_))
    ));
}

#[tokio::test]
async fn chatters_are_listed_by_role() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"channel": {
            "chatters": {
                "broadcasters": [{"login": "host"}],
                "moderators": [],
                "staff": [{"login": "admin"}],
                "viewers": [{"login": "v1"}, {"login": "v2"}],
                "vips": []
            }
        }}})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let chatters = assert_ok!(client.fetch_channel_chatters(None, Some("host")).await);

    let logins: Vec<&str> = chatters
        .iter()
        .filter_map(|chatter| chatter.user.login.as_deref())
        .collect();
    assert_eq!(logins, vec!["host", "admin", "v1", "v2"]);
}
