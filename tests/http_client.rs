use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use revox::app::App;
use revox::client::HttpClient;
use revox::config::Config;
use revox::error::{RevoxError, TIMEOUT_MESSAGE};
use revox::forms::BikeForm;
use revox::navigation::Route;
use revox::notify::{Level, RecordingNotifier};
use revox::storage::{KeyValueStorage, MemoryStorage, AUTH_TOKEN_KEY, USER_DATA_KEY};
use revox_protocol::common::{Claims, User};

const USER_ID: i64 = 7;

fn token_for(user_id: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + chrono::Duration::hours(1)).timestamp(),
        iat: Utc::now().timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
}

fn user_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "uniqueUserId": format!("google-{}", id),
        "nickname": "Rider",
        "displayEmail": "rider@example.com",
        "createdAt": "2024-05-01T09:30:00",
        "updatedAt": "2024-05-01T09:30:00",
    })
}

fn bike_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "userId": USER_ID,
        "manufacturer": "Honda",
        "modelName": "CBR250RR",
        "createdAt": "2024-05-01T09:30:00",
        "updatedAt": "2024-05-01T09:30:00",
    })
}

struct Harness {
    app: App<HttpClient>,
    storage: Arc<MemoryStorage>,
    notifier: Arc<RecordingNotifier>,
    token: String,
}

/// App against `server` with a persisted, unexpired session for `USER_ID`
fn signed_in(server: &MockServer, timeout: u64) -> Harness {
    let token = token_for(USER_ID);
    let storage = Arc::new(MemoryStorage::new());
    let user: User = serde_json::from_value(user_json(USER_ID)).unwrap();
    storage.set(AUTH_TOKEN_KEY, &token).unwrap();
    storage
        .set(USER_DATA_KEY, &serde_json::to_string(&user).unwrap())
        .unwrap();

    let config = Config {
        api_base_url: server.uri(),
        timeout,
        query_retry: 0,
        ..Config::default()
    };
    let notifier = Arc::new(RecordingNotifier::new());
    let app = App::connect(config, storage.clone(), notifier.clone()).unwrap();
    assert!(app.restore_session());

    Harness {
        app,
        storage,
        notifier,
        token,
    }
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 5);

    Mock::given(method("GET"))
        .and(path(format!("/bikes/user/{}", USER_ID)))
        .and(header("authorization", format!("Bearer {}", h.token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([bike_json(1)])))
        .expect(1)
        .mount(&server)
        .await;

    let bikes = h.app.load_bikes().await.unwrap();
    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes[0].display_name(), "Honda CBR250RR");
}

#[tokio::test]
async fn test_create_bike_sends_only_filled_fields() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 5);

    Mock::given(method("POST"))
        .and(path(format!("/bikes/user/{}", USER_ID)))
        .and(body_json(json!({"manufacturer": "Honda", "modelName": "CBR250RR"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(bike_json(12)))
        .expect(1)
        .mount(&server)
        .await;

    let request = BikeForm {
        manufacturer: "Honda".to_string(),
        model_name: "CBR250RR".to_string(),
        ..BikeForm::default()
    }
    .to_request()
    .unwrap();

    let bike = h.app.create_bike(&request).await.applied().unwrap();
    assert_eq!(bike.id, 12);
    assert_eq!(h.app.bikes().bikes().len(), 1);
    assert_eq!(h.notifier.messages(Level::Success), vec!["Bike registered"]);
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_redirects() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 5);
    h.app.open("/bikes");

    Mock::given(method("GET"))
        .and(path(format!("/bikes/user/{}", USER_ID)))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = h.app.load_bikes().await.unwrap_err();
    assert!(err.is_unauthorized());

    assert!(!h.app.auth().is_authenticated());
    assert_eq!(h.storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(h.storage.get(USER_DATA_KEY).unwrap(), None);
    assert_eq!(h.app.navigator().current(), Route::Login);
}

#[tokio::test]
async fn test_server_message_is_shown() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 5);

    Mock::given(method("PATCH"))
        .and(path(format!("/bikes/user/{}/bike/3/softDelete", USER_ID)))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Bike has open tasks"})),
        )
        .mount(&server)
        .await;

    let outcome = h.app.delete_bike(3).await;
    match outcome.into_result() {
        Err(RevoxError::Http { status, .. }) => assert_eq!(status, 409),
        other => panic!("expected an HTTP error, got {:?}", other),
    }
    assert_eq!(h.notifier.messages(Level::Error), vec!["Bike has open tasks"]);
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 5);

    Mock::given(method("PATCH"))
        .and(path("/maintenance-task/5/softDelete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(h.app.delete_task(5).await.is_applied());
}

#[tokio::test]
async fn test_guest_login_sends_no_bearer() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 5);

    Mock::given(method("POST"))
        .and(path("/auth/guest"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": token_for(99_999_999)})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = h.app.login_as_guest().await.applied().unwrap();
    assert!(user.is_guest());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 1);

    Mock::given(method("POST"))
        .and(path("/maintenance-task"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let request = revox_protocol::api::MaintenanceTaskRequest {
        name: "Chain".to_string(),
        description: "Lubed the chain".to_string(),
        category_id: 2,
        bike_id: 1,
    };
    let outcome = h.app.create_task(&request).await;
    assert!(matches!(outcome.into_result(), Err(RevoxError::Timeout)));
    assert_eq!(h.notifier.messages(Level::Error), vec![TIMEOUT_MESSAGE]);
}
