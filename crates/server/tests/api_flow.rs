use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use configs::AppConfig;
use models::user::Role;
use server::routes::auth::ServerState;
use service::auth::AuthConfig;
use service::image_host::StubImageHost;
use service::mock::MockStore;

const BOUNDARY: &str = "hotel-form-boundary";

struct TestApp {
    app: Router,
    state: ServerState,
    store: Arc<MockStore>,
    images: Arc<StubImageHost>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MockStore::default());
        let images = Arc::new(StubImageHost::default());
        let state = ServerState::in_memory(store.clone(), images.clone(), AuthConfig::new("test-secret", 1));
        let app = server::startup::build_app(state.clone(), &AppConfig::default());
        Self { app, state, store, images }
    }

    async fn token_for(&self, email: &str, role: Role) -> (uuid::Uuid, String) {
        let user = self.store.seed_user(email, role).await;
        let token = self.state.auth.issue_token(&user).expect("token");
        (user.id, token)
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.expect("response");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json body") };
        (status, body)
    }
}

fn json_req(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::from(body.to_string())).expect("request")
}

fn empty_req(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::empty()).expect("request")
}

/// multipart/form-data with text fields and `images` file parts.
fn hotel_form(uri: &str, method: &str, token: &str, fields: &[(&str, &str)], files: &[&str]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"));
    }
    for file in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file}\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request")
}

const SEA_VIEW: &[(&str, &str)] = &[
    ("name", "Sea View"),
    ("location", "Biarritz"),
    ("description", "Rooms facing the ocean"),
    ("price", "149.5"),
    ("street", ""),
];

#[tokio::test]
async fn health_is_public() {
    let t = TestApp::new();
    let (status, body) = t.send(empty_req("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_me() {
    let t = TestApp::new();
    let (status, user) = t
        .send(json_req(
            "POST",
            "/auth/register",
            None,
            json!({"firstname": "Ada", "lastname": "Byron", "email": " Ada@Example.com ", "pseudo": "ada", "password": "correct-horse", "role": "admin"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let login = json_req("POST", "/auth/login", None, json!({"email": "ada@example.com", "password": "correct-horse"}));
    let resp = t.app.clone().oneshot(login).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get(header::SET_COOKIE).expect("cookie").to_str().expect("ascii").to_string();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    let token = body["token"].as_str().expect("token").to_string();

    let (status, me) = t.send(empty_req("GET", "/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);

    // the cookie alone is accepted too
    let cookie_pair = cookie.split(';').next().expect("pair").to_string();
    let req = Request::builder().uri("/auth/me").header(header::COOKIE, cookie_pair).body(Body::empty()).expect("request");
    let (status, _) = t.send(req).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t
        .send(json_req("POST", "/auth/login", None, json!({"email": "ada@example.com", "password": "wrong-horse"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let t = TestApp::new();
    let (status, body) = t.send(empty_req("GET", "/booking", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["code"], 401);
    assert!(body["message"].is_string());

    let (status, _) = t.send(empty_req("GET", "/auth/me", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = ServerState::in_memory(t.store.clone(), t.images.clone(), AuthConfig::new("other-secret", 1));
    let user = t.store.seed_user("eve@example.com", Role::User).await;
    let token = foreign.auth.issue_token(&user).expect("token");
    let (status, _) = t.send(empty_req("GET", "/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let t = TestApp::new();
    let payload = json!({"firstname": "Bob", "lastname": "Stone", "email": "bob@example.com", "pseudo": "bob", "password": "long-enough"});
    let (status, _) = t.send(json_req("POST", "/auth/register", None, payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = t.send(json_req("POST", "/auth/register", None, payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn malformed_json_gets_an_error_body() {
    let t = TestApp::new();
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = t.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn bad_path_ids_and_non_form_bodies_get_error_bodies() {
    let t = TestApp::new();
    let (_, admin) = t.token_for("root@example.com", Role::Admin).await;

    let (status, body) = t.send(empty_req("GET", "/hotel/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, body) = t.send(empty_req("GET", "/booking/not-a-uuid", Some(&admin))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, body) = t.send(json_req("POST", "/hotel", Some(&admin), json!({"name": "Sea View"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn role_change_needs_admin() {
    let t = TestApp::new();
    let (uid, token) = t.token_for("carl@example.com", Role::User).await;
    let (status, _) = t.send(json_req("PATCH", &format!("/user/{uid}"), Some(&token), json!({"role": "admin"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t.send(json_req("PATCH", &format!("/user/{uid}"), Some(&token), json!({"pseudo": "carl"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pseudo"], "carl");

    let (_, admin) = t.token_for("root@example.com", Role::Admin).await;
    let (status, body) = t.send(json_req("PATCH", &format!("/user/{uid}"), Some(&admin), json!({"role": "employee"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "employee");
}

#[tokio::test]
async fn user_listing_is_admin_only() {
    let t = TestApp::new();
    let (_, user) = t.token_for("dora@example.com", Role::User).await;
    let (_, admin) = t.token_for("root@example.com", Role::Admin).await;

    let (status, _) = t.send(empty_req("GET", "/user", Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = t.send(empty_req("GET", "/user?page=1&per_page=1", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = t.send(empty_req("GET", "/user/search/DORA", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["email"], "dora@example.com");
}

#[tokio::test]
async fn hotel_needs_an_image_and_an_admin() {
    let t = TestApp::new();
    let (_, admin) = t.token_for("root@example.com", Role::Admin).await;
    let (_, user) = t.token_for("fay@example.com", Role::User).await;

    let (status, body) = t.send(hotel_form("/hotel", "POST", &admin, SEA_VIEW, &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(t.images.uploaded(), 0);

    let (status, _) = t.send(hotel_form("/hotel", "POST", &user, SEA_VIEW, &["a.png"])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, hotel) = t.send(hotel_form("/hotel", "POST", &admin, SEA_VIEW, &["a.png", "b.png"])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(hotel["picture_list"].as_array().map(Vec::len), Some(2));
    assert!(hotel["street"].is_null());
    assert_eq!(hotel["price"], 149.5);

    let mut bad_price = SEA_VIEW.to_vec();
    bad_price[0] = ("name", "Other Place");
    bad_price[3] = ("price", "cheap");
    let (status, _) = t.send(hotel_form("/hotel", "POST", &admin, &bad_price, &["c.png"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = hotel["id"].as_str().expect("id");
    let (status, updated) = t
        .send(hotel_form(&format!("/hotel/{id}"), "PATCH", &admin, &[("price", "99"), ("name", "")], &["c.png"]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Sea View");
    assert_eq!(updated["price"], 99.0);
    assert_eq!(updated["picture_list"].as_array().map(Vec::len), Some(3));

    // reads are public
    let (status, list) = t.send(empty_req("GET", "/hotel?limit=5&sortBy=price&order=ASC", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    let (status, found) = t.send(empty_req("GET", "/hotel/search/sea", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found[0]["id"], hotel["id"]);
}

#[tokio::test]
async fn bookings_are_private_to_their_owner() {
    let t = TestApp::new();
    let (owner_id, owner) = t.token_for("gus@example.com", Role::User).await;
    let (_, other) = t.token_for("hal@example.com", Role::User).await;
    let (_, admin) = t.token_for("root@example.com", Role::Admin).await;
    let hotel = t.store.seed_hotel("Harbour Inn").await;

    let (status, booking) = t
        .send(json_req(
            "POST",
            "/booking",
            Some(&owner),
            json!({"hotelId": hotel.id, "checkInDate": "2030-06-01T14:00:00+02:00", "checkOutDate": "2030-06-04T11:00:00+02:00"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["user_id"], json!(owner_id));
    let uri = format!("/booking/{}", booking["id"].as_str().expect("id"));

    let (status, _) = t.send(empty_req("GET", &uri, Some(&other))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = t.send(json_req("PATCH", &uri, Some(&other), json!({"checkInDate": "2030-06-02T14:00:00+02:00"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = t.send(empty_req("DELETE", &uri, Some(&other))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, listed) = t.send(empty_req("GET", "/booking", Some(&other))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
    let (status, _) = t.send(empty_req("GET", &format!("/booking/user/{owner_id}"), Some(&other))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.send(empty_req("GET", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, listed) = t.send(empty_req("GET", &format!("/booking/user/{owner_id}"), Some(&owner))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    // removing the hotel keeps the booking
    let (status, _) = t.send(empty_req("DELETE", &format!("/hotel/{}", hotel.id), Some(&admin))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, kept) = t.send(empty_req("GET", &uri, Some(&owner))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(kept["hotel_id"].is_null());

    let (status, _) = t.send(empty_req("DELETE", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = t.send(empty_req("GET", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn booking_for_unknown_hotel_is_not_found() {
    let t = TestApp::new();
    let (_, token) = t.token_for("ivy@example.com", Role::User).await;
    let (status, _) = t
        .send(json_req(
            "POST",
            "/booking",
            Some(&token),
            json!({"hotel_id": uuid::Uuid::new_v4(), "check_in": "2030-06-01T14:00:00Z", "check_out": "2030-06-02T11:00:00Z"}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
