use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use wayfare_api::{app, middleware::Claims, AppState, AuthConfig};
use wayfare_core::password::hash_password;
use wayfare_core::repository::{AccommodationRepository, TripRequestRepository, UserRepository};
use wayfare_core::user::NewUser;
use wayfare_core::{Accommodation, RequestStatus, Role, TripUpdate, User};
use wayfare_store::memory::InMemoryStore;
use wayfare_store::seed::DEMO_ACCOMMODATION_ID;

// Hashing once per test binary keeps the suite fast.
static PASSWORD_HASH: Lazy<String> = Lazy::new(|| hash_password("password").unwrap());

struct TestApp {
    router: Router,
    store: Arc<InMemoryStore>,
    auth: AuthConfig,
    requester: User,
    manager: User,
    outsider: User,
    admin: User,
}

fn make_user(email: &str, role: Role, manager_id: Option<Uuid>) -> User {
    let mut user = User::new(
        NewUser {
            first_name: "Demo".to_string(),
            last_name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            manager_id,
        },
        PASSWORD_HASH.clone(),
    );
    user.role = role;
    user
}

async fn setup() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let auth = AuthConfig {
        secret: "integration-secret".to_string(),
        expiration: 3600,
    };

    let manager = make_user("manager@demo.com", Role::Manager, None);
    let requester = make_user("demo1@demo.com", Role::Requester, Some(manager.id));
    let outsider = make_user("demo2@demo.com", Role::Requester, None);
    let admin = make_user("admin@demo.com", Role::Admin, None);
    for user in [&manager, &requester, &outsider, &admin] {
        store.create_user(user).await.unwrap();
    }
    store
        .create_accommodation(&Accommodation::new(DEMO_ACCOMMODATION_ID, "Transcorp Hilton", "Abuja"))
        .await
        .unwrap();

    let router = app(AppState::in_memory(store.clone(), auth.clone()));
    TestApp {
        router,
        store,
        auth,
        requester,
        manager,
        outsider,
        admin,
    }
}

impl TestApp {
    fn token(&self, user: &User) -> String {
        Claims::for_user(user, &self.auth)
            .unwrap()
            .encode(&self.auth)
            .unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-access-token", token);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn book(&self, user: &User, uri: &str, body: Value) -> (StatusCode, Value) {
        let token = self.token(user);
        self.send(Method::POST, uri, Some(&token), Some(body)).await
    }

    async fn book_trip_id(&self) -> String {
        let (status, body) = self
            .book(&self.requester, "/api/v1/request/book_trip", valid_trip())
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["tripCreated"]["id"].as_str().unwrap().to_string()
    }
}

fn trip_details() -> Value {
    json!({
        "origin": "Lagos",
        "destination": "Kaduna",
        "flightDate": "2019-06-21",
        "returnDate": "2019-03-21",
        "accommodationId": DEMO_ACCOMMODATION_ID.to_string(),
        "userId": "79ddfd3b-5c83-4beb-815e-55b1c95230e1",
        "reason": "EXPEDITION"
    })
}

fn valid_trip() -> Value {
    json!({
        "origin": "Lagos",
        "destination": "Kaduna",
        "flightDate": "2019-06-21",
        "returnDate": "2019-08-21",
        "accommodationId": DEMO_ACCOMMODATION_ID.to_string()
    })
}

fn update_body(request_id: &str, return_date: &str) -> Value {
    json!({
        "requestId": request_id,
        "origin": "eko",
        "destination": "miami",
        "flightDate": "2019-02-01",
        "returnDate": return_date,
        "reason": "VACATION"
    })
}

fn assert_failure(body: &Value, message: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], message);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = setup().await;
    let (status, body) = app
        .send(Method::POST, "/api/v1/request/book_return_trip", None, Some(trip_details()))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "No token provided");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = setup().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/request/book_return_trip",
            Some("hbhfbdhhabdkh"),
            Some(trip_details()),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "Invalid token");
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let app = setup().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/request/book_trip")
        .header("authorization", format!("Bearer {}", app.token(&app.requester)))
        .header("content-type", "application/json")
        .body(Body::from(valid_trip().to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_returns_usable_token() {
    let app = setup().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "demo1@demo.com", "password": "password" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let details = &body["data"]["userDetails"];
    assert_eq!(details["email"], "demo1@demo.com");
    assert_eq!(details["role"], "REQUESTER");
    assert!(details.get("passwordHash").is_none());

    let token = details["token"].as_str().unwrap();
    let (status, _) = app
        .send(Method::POST, "/api/v1/request/book_trip", Some(token), Some(valid_trip()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_failures() {
    let app = setup().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "demo1@demo.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "Invalid email or password");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@demo.com", "password": "password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "Invalid email or password");

    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/login", None, Some(json!({ "password": "password" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "The \"email\" field is required");
}

#[tokio::test]
async fn test_signup_then_duplicate() {
    let app = setup().await;
    let body = json!({
        "firstName": "Ada",
        "lastName": "Obi",
        "email": "ada@demo.com",
        "password": "password1",
        "managerId": app.manager.id.to_string()
    });

    let (status, created) = app
        .send(Method::POST, "/api/v1/auth/signup", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["userDetails"]["managerId"], app.manager.id.to_string());
    assert!(created["data"]["userDetails"]["token"].is_string());

    let (status, dup) = app.send(Method::POST, "/api/v1/auth/signup", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_failure(&dup, "Email already in use");
}

#[tokio::test]
async fn test_signup_with_non_manager_line_manager() {
    let app = setup().await;
    let body = json!({
        "firstName": "Ada",
        "lastName": "Obi",
        "email": "ada@demo.com",
        "password": "password1",
        "managerId": app.outsider.id.to_string()
    });

    let (status, body) = app.send(Method::POST, "/api/v1/auth/signup", None, Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Manager not found");
}

// ============================================================================
// Booking
// ============================================================================

#[tokio::test]
async fn test_book_one_way_trip() {
    let app = setup().await;
    let (status, body) = app
        .book(&app.requester, "/api/v1/request/book_trip", trip_details())
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["message"], "Trip booked successfully");
    assert_eq!(data["success"], true);
    assert!(data["tripCreated"].is_object());
    assert_eq!(data["tripCreated"]["returnDate"], Value::Null);
    assert_eq!(data["tripCreated"]["status"], "Pending");
    assert_eq!(data["tripCreated"]["reason"], "EXPEDITION");
    // The owner always comes from the token, never from the body.
    assert_eq!(data["tripCreated"]["userId"], app.requester.id.to_string());
}

#[tokio::test]
async fn test_book_return_trip() {
    let app = setup().await;
    let (status, body) = app
        .book(&app.requester, "/api/v1/request/book_return_trip", valid_trip())
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["message"], "Trip booked successfully");
    assert_eq!(body["data"]["tripCreated"]["returnDate"], "2019-08-21");
    assert_eq!(body["data"]["tripCreated"]["reason"], "BUSINESS");
}

#[tokio::test]
async fn test_one_way_trip_missing_field() {
    let app = setup().await;
    let mut details = trip_details();
    details.as_object_mut().unwrap().remove("flightDate");

    let (status, body) = app
        .book(&app.requester, "/api/v1/request/book_trip", details)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "The \"flightDate\" field is required");
}

#[tokio::test]
async fn test_return_trip_missing_return_date() {
    let app = setup().await;
    let mut details = trip_details();
    details.as_object_mut().unwrap().remove("flightDate");
    details.as_object_mut().unwrap().remove("returnDate");

    let (status, body) = app
        .book(&app.requester, "/api/v1/request/book_return_trip", details)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "The returnDate field is required.");
}

#[tokio::test]
async fn test_return_trip_rejects_return_before_flight() {
    let app = setup().await;
    let (status, body) = app
        .book(&app.requester, "/api/v1/request/book_return_trip", trip_details())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid Date Parameters");
}

#[tokio::test]
async fn test_unknown_accommodation() {
    let app = setup().await;
    let mut details = valid_trip();
    details["accommodationId"] = json!(Uuid::new_v4().to_string());

    let (status, body) = app
        .book(&app.requester, "/api/v1/request/book_trip", details)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Accommodation not found");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = setup().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/request/book_trip")
        .header("x-access-token", app.token(&app.requester))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

// ============================================================================
// Updates
// ============================================================================

#[tokio::test]
async fn test_update_trip_request() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let token = app.token(&app.requester);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/request/",
            Some(&token),
            Some(update_body(&request_id, "2019-06-04")),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["message"], "Trip udpdated successfully");
    assert_eq!(data["success"], true);
    assert_eq!(data["updatedData"]["origin"], "eko");
    assert_eq!(data["updatedData"]["returnDate"], "2019-06-04");
    assert_eq!(data["updatedData"]["reason"], "VACATION");
}

#[tokio::test]
async fn test_update_rejects_bad_date_order() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let token = app.token(&app.requester);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/request/",
            Some(&token),
            Some(update_body(&request_id, "2017-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid Date Parameters");
}

#[tokio::test]
async fn test_update_unknown_request_is_not_found() {
    let app = setup().await;
    let token = app.token(&app.requester);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/request/",
            Some(&token),
            Some(update_body("1b26c8d1-768d-4bcb-8407-f6d85b1f1dee", "2017-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Request not found");
}

#[tokio::test]
async fn test_update_someone_elses_request_is_not_found() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let token = app.token(&app.outsider);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/request/",
            Some(&token),
            Some(update_body(&request_id, "2019-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Request not found");
}

#[tokio::test]
async fn test_update_requires_request_id() {
    let app = setup().await;
    let token = app.token(&app.requester);

    let (status, body) = app
        .send(Method::PATCH, "/api/v1/request", Some(&token), Some(json!({ "origin": "eko" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "The \"requestId\" field is required");
}

// ============================================================================
// Approval and notifications
// ============================================================================

#[tokio::test]
async fn test_manager_approves_and_requester_is_notified() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let manager_token = app.token(&app.manager);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/request/{}/approve", request_id),
            Some(&manager_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Request approved successfully");
    assert_eq!(body["data"]["status"], "Approved");

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/request/{}/reject", request_id),
            Some(&manager_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Request has already been approved");

    let requester_token = app.token(&app.requester);
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/userNotification/{}", app.requester.id),
            Some(&requester_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["kind"], "TRIP_APPROVED");

    // Decided requests can no longer be edited.
    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/request/",
            Some(&requester_token),
            Some(update_body(&request_id, "2019-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Only pending requests can be updated");
}

#[tokio::test]
async fn test_decision_rights() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let uri = format!("/api/v1/request/{}/reject", request_id);

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&app.token(&app.outsider)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_failure(&body, "Only managers can approve or reject requests");

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/request/{}/reject", Uuid::new_v4()),
            Some(&app.token(&app.manager)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Request not found");

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&app.token(&app.admin)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Rejected");
}

#[tokio::test]
async fn test_manager_cannot_decide_for_other_teams() {
    let app = setup().await;
    let (status, body) = app
        .book(&app.outsider, "/api/v1/request/book_trip", valid_trip())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = body["data"]["tripCreated"]["id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/request/{}/approve", request_id),
            Some(&app.token(&app.manager)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_failure(&body, "You are not the manager of this requester");
}

#[tokio::test]
async fn test_manager_notifications() {
    let app = setup().await;
    app.book_trip_id().await;
    let request_id = app.book_trip_id().await;
    let requester_token = app.token(&app.requester);
    app.send(
        Method::PATCH,
        "/api/v1/request/",
        Some(&requester_token),
        Some(update_body(&request_id, "2019-06-04")),
    )
    .await;

    let manager_token = app.token(&app.manager);
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/managerNotification/{}", app.manager.id),
            Some(&manager_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 3);
    assert_eq!(notifications[0]["kind"], "TRIP_UPDATED");
    assert_eq!(notifications[1]["kind"], "TRIP_REQUESTED");
    assert_eq!(notifications[0]["isRead"], false);

    let notification_id = notifications[0]["id"].as_str().unwrap();
    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/notifications/{}/read", notification_id),
            Some(&manager_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], true);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/notifications/{}/read", notification_id),
            Some(&requester_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Notification not found");
}

#[tokio::test]
async fn test_notification_access_rules() {
    let app = setup().await;
    let requester_token = app.token(&app.requester);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/managerNotification/{}", app.requester.id),
            Some(&requester_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Manager not found");

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/managerNotification/{}", app.manager.id),
            Some(&requester_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_failure(&body, "You are not allowed to view these notifications");

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/userNotification/{}", Uuid::new_v4()),
            Some(&requester_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "User not found");

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/v1/userNotification/{}", app.requester.id),
            Some(&app.token(&app.admin)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/v1/userNotification/{}", app.requester.id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_list_and_get_requests() {
    let app = setup().await;
    let first = app.book_trip_id().await;
    let second = app.book_trip_id().await;
    let token = app.token(&app.requester);

    let (status, body) = app.send(Method::GET, "/api/v1/request/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], second);
    assert_eq!(listed[1]["id"], first);

    let uri = format!("/api/v1/request/{}", first);
    let (status, body) = app
        .send(Method::GET, &uri, Some(&app.token(&app.manager)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], first);

    let (status, body) = app
        .send(Method::GET, &uri, Some(&app.token(&app.outsider)), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Request not found");

    let (status, _) = app
        .send(Method::GET, "/api/v1/request/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_accommodations() {
    let app = setup().await;
    let (status, body) = app
        .send(
            Method::GET,
            "/api/v1/accommodations",
            Some(&app.token(&app.requester)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], DEMO_ACCOMMODATION_ID.to_string());
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ============================================================================
// Update edge cases
// ============================================================================

#[tokio::test]
async fn test_update_with_unknown_accommodation() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let token = app.token(&app.requester);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/request/",
            Some(&token),
            Some(json!({
                "requestId": request_id,
                "accommodationId": Uuid::new_v4().to_string()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Accommodation not found");

    let (_, body) = app
        .send(Method::GET, &format!("/api/v1/request/{}", request_id), Some(&token), None)
        .await;
    assert_eq!(body["data"]["accommodationId"], DEMO_ACCOMMODATION_ID.to_string());
}

#[tokio::test]
async fn test_update_with_unknown_reason() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let token = app.token(&app.requester);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/request/",
            Some(&token),
            Some(json!({ "requestId": request_id, "reason": "HOLIDAY" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid reason. Allowed values are BUSINESS, VACATION, EXPEDITION");
}

#[tokio::test]
async fn test_edit_loaded_before_approval_is_not_saved() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;
    let id = Uuid::parse_str(&request_id).unwrap();

    // The requester's edit reads the row while it is still Pending.
    let mut edit = app.store.get_request(id).await.unwrap().unwrap();

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/request/{}/approve", request_id),
            Some(&app.token(&app.manager)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    edit.apply_update(&TripUpdate {
        origin: Some("eko".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert!(!app
        .store
        .update_request(&edit, RequestStatus::Pending)
        .await
        .unwrap());

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/request/{}", request_id),
            Some(&app.token(&app.requester)),
            None,
        )
        .await;
    assert_eq!(body["data"]["status"], "Approved");
    assert_eq!(body["data"]["origin"], "Lagos");
}

// ============================================================================
// Signup validation
// ============================================================================

#[tokio::test]
async fn test_signup_rejects_bad_email_and_short_password() {
    let app = setup().await;
    let signup = |email: &str, password: &str| {
        json!({
            "firstName": "Ada",
            "lastName": "Obi",
            "email": email,
            "password": password
        })
    };

    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/signup", None, Some(signup("ada-at-demo.com", "password1")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid email address");

    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/signup", None, Some(signup("ada@demo.com", "short")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Password must be at least 8 characters");
}

// ============================================================================
// Roles come from the account, not the token
// ============================================================================

#[tokio::test]
async fn test_admin_role_in_token_is_not_trusted() {
    let app = setup().await;
    let request_id = app.book_trip_id().await;

    // Token says ADMIN, stored account says REQUESTER.
    let mut claims = Claims::for_user(&app.outsider, &app.auth).unwrap();
    claims.role = Role::Admin;
    let token = claims.encode(&app.auth).unwrap();

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/request/{}", request_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Request not found");

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/userNotification/{}", app.requester.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_failure(&body, "You are not allowed to view these notifications");
}
