//! JSON REST API for the kudos platform.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`RecognitionStore`] + [`SnapshotProvider`]. TLS and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kudos_api::api_router(AppState::new(store)))
//! ```

pub mod auth;
pub mod error;
pub mod insights;
pub mod medals;
pub mod users;
pub mod values;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};

use kudos_core::{
  clock::{Clock, SystemClock},
  snapshot::SnapshotProvider,
  store::RecognitionStore,
};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  /// Injectable so the monthly window and birthday views are testable.
  pub clock: Arc<dyn Clock>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S) -> Self {
    Self::with_clock(store, Arc::new(SystemClock))
  }

  pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
    Self { store: Arc::new(store), clock }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RecognitionStore + SnapshotProvider + Clone + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/auth/signin", post(auth::signin::<S>))
    .route("/auth/signout", post(auth::signout::<S>))
    .route("/auth/me", get(auth::me::<S>))
    // Roster
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/{id}", patch(users::update::<S>))
    // Values
    .route("/values", get(values::list::<S>))
    // Medals
    .route("/medals", get(medals::list::<S>).post(medals::create::<S>))
    .route("/medals/{id}/like", post(medals::like::<S>))
    .route("/medals/{id}/comments", post(medals::comment::<S>))
    // Read models
    .route("/insights/birthdays", get(insights::birthdays::<S>))
    .route("/insights/highlights", get(insights::highlights::<S>))
    .route("/insights/dna", get(insights::dna::<S>))
    .route("/insights/summary", get(insights::summary::<S>))
    .route("/insights/graph", get(insights::graph::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::NaiveDate;
  use rand_core::OsRng;
  use serde_json::{Value as Json, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use kudos_core::{store::RecognitionStore, user::NewUser};
  use kudos_store_sqlite::SqliteStore;

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn new_user(name: &str, email: &str, password: Option<&str>) -> NewUser {
    NewUser {
      name:          name.into(),
      email:         email.into(),
      department:    "Engineering".into(),
      team:          "Platform".into(),
      area:          "IT".into(),
      avatar:        String::new(),
      birthday:      NaiveDate::from_ymd_opt(1990, 3, 15),
      is_admin:      false,
      password_hash: password.map(hash),
    }
  }

  /// Store with one admin (`admin@example.com` / `secret`) and one regular
  /// user (`user@example.com` / `secret`).
  async fn seeded_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let mut admin = new_user("Ada Admin", "admin@example.com", Some("secret"));
    admin.is_admin = true;
    store.add_user(admin).await.unwrap();
    store
      .add_user(new_user("Uma User", "user@example.com", Some("secret")))
      .await
      .unwrap();

    AppState::new(store)
  }

  async fn send(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Json>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
      builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    api_router(state.clone()).oneshot(request).await.unwrap()
  }

  async fn json_body(response: axum::response::Response) -> Json {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Sign in and return the session cookie pair (`kudos_session=<uuid>`).
  async fn sign_in(state: &AppState<SqliteStore>, email: &str) -> String {
    let response = send(
      state,
      "POST",
      "/auth/signin",
      None,
      Some(json!({ "email": email, "password": "secret" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
      .headers()
      .get(header::SET_COOKIE)
      .unwrap()
      .to_str()
      .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
  }

  // ── Auth ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn signin_signout_round_trip() {
    let state = seeded_state().await;
    let cookie = sign_in(&state, "user@example.com").await;

    let me = send(&state, "GET", "/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status(), StatusCode::OK);
    let body = json_body(me).await;
    assert_eq!(body["email"], "user@example.com");

    let out =
      send(&state, "POST", "/auth/signout", Some(&cookie), None).await;
    assert_eq!(out.status(), StatusCode::NO_CONTENT);

    let me_again = send(&state, "GET", "/auth/me", Some(&cookie), None).await;
    assert_eq!(me_again.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn signin_rejects_wrong_password() {
    let state = seeded_state().await;
    let response = send(
      &state,
      "POST",
      "/auth/signin",
      None,
      Some(json!({ "email": "user@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn signin_rejects_account_without_password() {
    let state = seeded_state().await;
    state
      .store
      .add_user(new_user("No Pass", "nopass@example.com", None))
      .await
      .unwrap();

    let response = send(
      &state,
      "POST",
      "/auth/signin",
      None,
      Some(json!({ "email": "nopass@example.com", "password": "anything" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn protected_routes_require_a_session() {
    let state = seeded_state().await;
    for uri in ["/users", "/values", "/medals", "/insights/highlights"] {
      let response = send(&state, "GET", uri, None, None).await;
      assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
  }

  // ── Roster ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn roster_create_is_admin_only() {
    let state = seeded_state().await;
    let body = json!({ "name": "New Person", "email": "new@example.com" });

    let user_cookie = sign_in(&state, "user@example.com").await;
    let denied = send(
      &state,
      "POST",
      "/users",
      Some(&user_cookie),
      Some(body.clone()),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let admin_cookie = sign_in(&state, "admin@example.com").await;
    let created =
      send(&state, "POST", "/users", Some(&admin_cookie), Some(body.clone()))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate =
      send(&state, "POST", "/users", Some(&admin_cookie), Some(body)).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn roster_update_and_search() {
    let state = seeded_state().await;
    let admin_cookie = sign_in(&state, "admin@example.com").await;

    let users = json_body(
      send(&state, "GET", "/users", Some(&admin_cookie), None).await,
    )
    .await;
    let uma = users
      .as_array()
      .unwrap()
      .iter()
      .find(|u| u["name"] == "Uma User")
      .unwrap();
    let uma_id = uma["id"].as_str().unwrap().to_string();

    let patched = send(
      &state,
      "PATCH",
      &format!("/users/{uma_id}"),
      Some(&admin_cookie),
      Some(json!({ "team": "Architecture" })),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::OK);
    assert_eq!(json_body(patched).await["team"], "Architecture");

    let found = json_body(
      send(&state, "GET", "/users?q=uma", Some(&admin_cookie), None).await,
    )
    .await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let missing = send(
      &state,
      "PATCH",
      &format!("/users/{}", Uuid::new_v4()),
      Some(&admin_cookie),
      Some(json!({ "team": "Nowhere" })),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }

  // ── Medals ──────────────────────────────────────────────────────────────

  async fn recipient_id(state: &AppState<SqliteStore>, cookie: &str) -> String {
    let users =
      json_body(send(state, "GET", "/users", Some(cookie), None).await).await;
    users
      .as_array()
      .unwrap()
      .iter()
      .find(|u| u["name"] == "Ada Admin")
      .unwrap()["id"]
      .as_str()
      .unwrap()
      .to_string()
  }

  #[tokio::test]
  async fn medal_flow_create_like_comment() {
    let state = seeded_state().await;
    let cookie = sign_in(&state, "user@example.com").await;
    let recipient = recipient_id(&state, &cookie).await;

    let created = send(
      &state,
      "POST",
      "/medals",
      Some(&cookie),
      Some(json!({
        "recipient_id": recipient,
        "value": "Collaboration",
        "message": "carried the release",
      })),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let medal = json_body(created).await;
    let medal_id = medal["id"].as_str().unwrap().to_string();
    assert_eq!(medal["giver"]["email"], "user@example.com");

    let liked = json_body(
      send(
        &state,
        "POST",
        &format!("/medals/{medal_id}/like"),
        Some(&cookie),
        None,
      )
      .await,
    )
    .await;
    assert_eq!(liked["liked"], true);

    let commented = send(
      &state,
      "POST",
      &format!("/medals/{medal_id}/comments"),
      Some(&cookie),
      Some(json!({ "message": "congrats!" })),
    )
    .await;
    assert_eq!(commented.status(), StatusCode::CREATED);

    let medals = json_body(
      send(&state, "GET", "/medals", Some(&cookie), None).await,
    )
    .await;
    let listed = &medals.as_array().unwrap()[0];
    assert_eq!(listed["likes"], 1);
    assert_eq!(listed["comments"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn self_recognition_is_rejected_at_the_edge() {
    let state = seeded_state().await;
    let cookie = sign_in(&state, "user@example.com").await;
    let me =
      json_body(send(&state, "GET", "/auth/me", Some(&cookie), None).await)
        .await;

    let response = send(
      &state,
      "POST",
      "/medals",
      Some(&cookie),
      Some(json!({
        "recipient_id": me["id"],
        "value": "Excellence",
        "message": "I am great",
      })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn liking_a_missing_medal_is_404() {
    let state = seeded_state().await;
    let cookie = sign_in(&state, "user@example.com").await;

    let response = send(
      &state,
      "POST",
      &format!("/medals/{}/like", Uuid::new_v4()),
      Some(&cookie),
      None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  // ── Insights ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn insight_endpoints_derive_from_live_data() {
    let state = seeded_state().await;
    let cookie = sign_in(&state, "user@example.com").await;
    let recipient = recipient_id(&state, &cookie).await;

    for _ in 0..2 {
      let created = send(
        &state,
        "POST",
        "/medals",
        Some(&cookie),
        Some(json!({
          "recipient_id": recipient,
          "value": "Collaboration",
          "message": "great pairing",
        })),
      )
      .await;
      assert_eq!(created.status(), StatusCode::CREATED);
    }

    let birthdays = json_body(
      send(&state, "GET", "/insights/birthdays", Some(&cookie), None).await,
    )
    .await;
    assert_eq!(birthdays.as_array().unwrap().len(), 2);

    let highlights = json_body(
      send(&state, "GET", "/insights/highlights", Some(&cookie), None).await,
    )
    .await;
    assert_eq!(highlights["podium"].as_array().unwrap().len(), 1);
    assert_eq!(highlights["podium"][0]["count"], 2);
    assert!(highlights["rest"].as_array().unwrap().is_empty());

    let dna = json_body(
      send(&state, "GET", "/insights/dna?scope=team", Some(&cookie), None)
        .await,
    )
    .await;
    assert_eq!(dna["team"], "Platform");
    assert_eq!(dna["segments"].as_array().unwrap().len(), 1);
    assert_eq!(dna["segments"][0]["percentage"], 100.0);

    let summary = json_body(
      send(&state, "GET", "/insights/summary", Some(&cookie), None).await,
    )
    .await;
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["sent"], 2);
    assert_eq!(summary["participation_rate"], 100);

    let graph = json_body(
      send(
        &state,
        "GET",
        "/insights/graph?view=employee&layout=true",
        Some(&cookie),
        None,
      )
      .await,
    )
    .await;
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(graph["edges"][0]["direction"], "sent");
    assert_eq!(
      graph["positions"].as_object().unwrap().len(),
      graph["nodes"].as_array().unwrap().len()
    );

    let bad = send(
      &state,
      "GET",
      "/insights/graph?view=galaxy",
      Some(&cookie),
      None,
    )
    .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
  }
}
