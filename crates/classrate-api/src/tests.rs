//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use classrate_core::{
  admission::ValidatedSubmission,
  course::{Course, CourseWithReviews, NewCourse},
  profile::{NewProfile, Profile},
  revalidate::{RecordingRevalidator, RevalidateTarget},
  review::Review,
  store::{ClearedCounts, CourseStore},
};
use classrate_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{AppState, api_router};

// ─── Harness ──────────────────────────────────────────────────────────────────

struct Harness {
  store:       Arc<SqliteStore>,
  revalidator: Arc<RecordingRevalidator>,
}

impl Harness {
  async fn new() -> Self {
    Self {
      store:       Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      revalidator: Arc::new(RecordingRevalidator::new()),
    }
  }

  fn app(&self) -> Router {
    api_router(AppState::new(Some(self.store.clone()), self.revalidator.clone()))
  }

  async fn course(&self, name: &str, teacher: Option<&str>) -> Course {
    self
      .store
      .add_course(NewCourse { name: name.into(), instructor: teacher.map(Into::into) })
      .await
      .unwrap()
  }

  async fn review(&self, course_id: Uuid, rating: Option<i32>) -> Review {
    self
      .store
      .add_review(ValidatedSubmission {
        course_id,
        body: "solid course".into(),
        rating,
        author_id: "student-1".into(),
      })
      .await
      .unwrap()
  }

  async fn profile(&self, id: &str, admin: bool) {
    self
      .store
      .add_profile(NewProfile { id: id.into(), email: format!("{id}@stu.example.ac.jp") })
      .await
      .unwrap();
    if admin {
      self.store.set_admin(id, true).await.unwrap();
    }
  }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
  let mut builder = Request::builder().method("GET").uri(uri);
  if let Some(user) = user {
    builder = builder.header("x-user-id", user);
  }
  builder.body(Body::empty()).unwrap()
}

fn form(uri: &str, user: Option<&str>, body: &str) -> Request<Body> {
  let mut builder = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
  if let Some(user) = user {
    builder = builder.header("x-user-id", user);
  }
  builder.body(Body::from(body.to_owned())).unwrap()
}

fn json_req(method: &str, uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
  let mut builder = Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json");
  if let Some(user) = user {
    builder = builder.header("x-user-id", user);
  }
  builder.body(Body::from(body.to_string())).unwrap()
}

fn delete(uri: &str, user: Option<&str>) -> Request<Body> {
  let mut builder = Request::builder().method("DELETE").uri(uri);
  if let Some(user) = user {
    builder = builder.header("x-user-id", user);
  }
  builder.body(Body::empty()).unwrap()
}

// ── A store whose every call fails ──────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
struct Down;

struct DownStore;

impl CourseStore for DownStore {
  type Error = Down;

  async fn add_course(&self, _: NewCourse) -> Result<Course, Down> { Err(Down) }
  async fn get_course(&self, _: Uuid) -> Result<Option<Course>, Down> { Err(Down) }
  async fn list_courses_with_reviews(&self) -> Result<Vec<CourseWithReviews>, Down> {
    Err(Down)
  }
  async fn delete_course(&self, _: Uuid) -> Result<bool, Down> { Err(Down) }
  async fn add_review(&self, _: ValidatedSubmission) -> Result<Review, Down> { Err(Down) }
  async fn list_reviews(&self, _: Uuid) -> Result<Vec<Review>, Down> { Err(Down) }
  async fn delete_review(&self, _: Uuid) -> Result<Option<Review>, Down> { Err(Down) }
  async fn clear_catalog(&self) -> Result<ClearedCounts, Down> { Err(Down) }
  async fn add_profile(&self, _: NewProfile) -> Result<Profile, Down> { Err(Down) }
  async fn get_profile(&self, _: &str) -> Result<Option<Profile>, Down> { Err(Down) }
  async fn find_profile_by_email(&self, _: &str) -> Result<Option<Profile>, Down> {
    Err(Down)
  }
  async fn list_profiles(&self) -> Result<Vec<Profile>, Down> { Err(Down) }
  async fn set_admin(&self, _: &str, _: bool) -> Result<Option<Profile>, Down> { Err(Down) }
}

fn down_app(revalidator: Arc<RecordingRevalidator>) -> Router {
  api_router(AppState::new(Some(Arc::new(DownStore)), revalidator))
}

fn unconfigured_app() -> Router {
  api_router(AppState::<SqliteStore>::new(None, Arc::new(RecordingRevalidator::new())))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_empty_catalogue() {
  let h = Harness::new().await;
  let (status, body) = send(h.app(), get("/courses", None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "data": [], "count": 0 }));
}

#[tokio::test]
async fn search_filters_and_aggregates() {
  let h = Harness::new().await;
  let prog = h.course("Programming Basics", Some("Taro Teikyo")).await;
  let db = h.course("Database Design", Some("Hanako")).await;
  h.review(prog.course_id, Some(4)).await;
  h.review(prog.course_id, Some(5)).await;
  h.review(db.course_id, None).await;

  let (status, body) = send(h.app(), get("/courses?q=PROG", None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 1);
  let hit = &body["data"][0];
  assert_eq!(hit["id"], prog.course_id.to_string());
  assert_eq!(hit["name"], "Programming Basics");
  assert_eq!(hit["teacher"], "Taro Teikyo");
  assert_eq!(hit["avgRating"], "4.5");
  assert_eq!(hit["reviewCount"], 2);

  let (_, body) = send(h.app(), get("/courses?q=hanako", None)).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["data"][0]["avgRating"], Value::Null);
  assert_eq!(body["data"][0]["reviewCount"], 1);
}

#[tokio::test]
async fn search_blank_query_lists_all_newest_first() {
  let h = Harness::new().await;
  h.course("Older", None).await;
  h.course("Newer", None).await;

  let (_, body) = send(h.app(), get("/courses?q=%20%20", None)).await;
  assert_eq!(body["count"], 2);
  assert_eq!(body["data"][0]["name"], "Newer");
  assert_eq!(body["data"][1]["name"], "Older");
}

#[tokio::test]
async fn search_upstream_failure_hides_detail() {
  let app = down_app(Arc::new(RecordingRevalidator::new()));
  let (status, body) = send(app, get("/courses?q=x", None)).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "error": "Failed to search classes" }));
}

#[tokio::test]
async fn search_without_store_is_configuration_error() {
  let (status, body) = send(unconfigured_app(), get("/courses", None)).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "error": "Server configuration error" }));
}

// ─── Review submission ────────────────────────────────────────────────────────

#[tokio::test]
async fn review_submission_succeeds_and_revalidates() {
  let h = Harness::new().await;
  let course = h.course("Programming Basics", None).await;

  let req = form(
    "/reviews",
    Some("student-9"),
    &format!("class_id={}&body=Great+class&rating=4", course.course_id),
  );
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(body, Value::Null);

  let reviews = h.store.list_reviews(course.course_id).await.unwrap();
  assert_eq!(reviews.len(), 1);
  assert_eq!(reviews[0].rating, Some(4));
  assert_eq!(reviews[0].author_id, "student-9");
  assert_eq!(reviews[0].body, "Great class");

  assert_eq!(
    h.revalidator.targets(),
    vec![RevalidateTarget::CourseDetail(course.course_id), RevalidateTarget::Layout]
  );
}

#[tokio::test]
async fn review_without_rating_is_stored_unrated() {
  let h = Harness::new().await;
  let course = h.course("Seminar", None).await;

  let req = form(
    "/reviews",
    Some("student-9"),
    &format!("class_id={}&body=ok&rating=", course.course_id),
  );
  let (status, _) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(h.store.list_reviews(course.course_id).await.unwrap()[0].rating, None);
}

#[tokio::test]
async fn review_with_blank_body_is_rejected() {
  let h = Harness::new().await;
  let course = h.course("Seminar", None).await;

  let req = form(
    "/reviews",
    Some("student-9"),
    &format!("class_id={}&body=+++&rating=3", course.course_id),
  );
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "review content is required" }));
  assert!(h.revalidator.targets().is_empty());
  assert!(h.store.list_reviews(course.course_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn review_without_course_reference_is_rejected() {
  let h = Harness::new().await;
  let (status, body) = send(h.app(), form("/reviews", Some("student-9"), "body=hello")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "review content is required" }));
}

#[tokio::test]
async fn review_from_anonymous_caller_is_unauthorized() {
  let h = Harness::new().await;
  let course = h.course("Seminar", None).await;

  let req = form("/reviews", None, &format!("class_id={}&body=hello", course.course_id));
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body, json!({ "error": "login required" }));
  assert!(h.revalidator.targets().is_empty());
}

#[tokio::test]
async fn review_with_out_of_range_rating_is_rejected() {
  let h = Harness::new().await;
  let course = h.course("Seminar", None).await;

  let req = form(
    "/reviews",
    Some("student-9"),
    &format!("class_id={}&body=hello&rating=9", course.course_id),
  );
  let (status, _) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_write_failure_passes_upstream_message() {
  let revalidator = Arc::new(RecordingRevalidator::new());
  let req = form(
    "/reviews",
    Some("student-9"),
    &format!("class_id={}&body=hello&rating=2", Uuid::new_v4()),
  );
  let (status, body) = send(down_app(revalidator.clone()), req).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "error": "store unavailable" }));
  assert!(revalidator.targets().is_empty());
}

#[tokio::test]
async fn review_for_unknown_course_fails_at_write() {
  let h = Harness::new().await;
  let req = form(
    "/reviews",
    Some("student-9"),
    &format!("class_id={}&body=hello", Uuid::new_v4()),
  );
  let (status, _) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(h.revalidator.targets().is_empty());
}

// ─── Courses ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_course_returns_201() {
  let h = Harness::new().await;
  let req = form("/courses", Some("student-9"), "name=Linear+Algebra&teacher=+");
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["name"], "Linear Algebra");
  assert_eq!(body["teacher"], Value::Null);
  assert_eq!(h.revalidator.targets(), vec![RevalidateTarget::Layout]);
}

#[tokio::test]
async fn create_course_requires_name_and_identity() {
  let h = Harness::new().await;

  let (status, body) = send(h.app(), form("/courses", Some("student-9"), "name=")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "class name is required" }));

  let (status, _) = send(h.app(), form("/courses", None, "name=Physics")).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn course_detail_lists_reviews() {
  let h = Harness::new().await;
  let course = h.course("Programming Basics", Some("Taro Teikyo")).await;
  let first = h.review(course.course_id, Some(3)).await;
  let second = h.review(course.course_id, Some(4)).await;

  let (status, body) =
    send(h.app(), get(&format!("/courses/{}", course.course_id), None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["class"]["avgRating"], "3.5");
  assert_eq!(body["class"]["reviewCount"], 2);
  assert_eq!(body["reviews"][0]["id"], second.review_id.to_string());
  assert_eq!(body["reviews"][1]["id"], first.review_id.to_string());
  assert_eq!(body["reviews"][0]["class_id"], course.course_id.to_string());
}

#[tokio::test]
async fn course_detail_unknown_is_404() {
  let h = Harness::new().await;
  let (status, _) = send(h.app(), get(&format!("/courses/{}", Uuid::new_v4()), None)).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Me ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn me_reports_role() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;

  let (status, body) = send(h.app(), get("/me", Some("admin-1"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "userId": "admin-1", "role": "admin" }));

  let (_, body) = send(h.app(), get("/me", Some("stranger"))).await;
  assert_eq!(body["role"], "student");

  let (status, _) = send(h.app(), get("/me", None)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn custom_identity_header_is_honoured() {
  let h = Harness::new().await;
  let app = api_router(
    AppState::new(Some(h.store.clone()), h.revalidator.clone())
      .with_identity_header(header::HeaderName::from_static("x-forwarded-user")),
  );

  let req = Request::builder()
    .uri("/me")
    .header("x-forwarded-user", "student-3")
    .body(Body::empty())
    .unwrap();
  let (status, body) = send(app.clone(), req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["userId"], "student-3");

  let (status, _) = send(app, get("/me", Some("student-3"))).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Admin ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_routes_reject_students_and_anonymous() {
  let h = Harness::new().await;
  h.profile("student-1", false).await;

  let (status, body) = send(h.app(), get("/admin/users", Some("student-1"))).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body, json!({ "error": "admin rights required" }));

  let (status, _) = send(h.app(), get("/admin/stats", None)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_lists_users() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;
  h.profile("student-1", false).await;

  let (status, body) = send(h.app(), get("/admin/users", Some("admin-1"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 2);
  assert_eq!(body["data"][0]["id"], "student-1");
}

#[tokio::test]
async fn promote_and_revoke() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;
  h.profile("student-1", false).await;

  let req = json_req("POST", "/admin/promote", Some("admin-1"), json!({ "userId": "student-1" }));
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "success": true }));
  assert!(h.store.get_profile("student-1").await.unwrap().unwrap().is_admin);

  let req = json_req("POST", "/admin/revoke", Some("admin-1"), json!({ "userId": "student-1" }));
  let (status, _) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::OK);
  assert!(!h.store.get_profile("student-1").await.unwrap().unwrap().is_admin);
}

#[tokio::test]
async fn promote_requires_user_id() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;

  let req = json_req("POST", "/admin/promote", Some("admin-1"), json!({}));
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "userId is required" }));
}

#[tokio::test]
async fn admin_cannot_revoke_self() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;

  let req = json_req("POST", "/admin/revoke", Some("admin-1"), json!({ "userId": "admin-1" }));
  let (status, _) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(h.store.get_profile("admin-1").await.unwrap().unwrap().is_admin);
}

#[tokio::test]
async fn promote_unknown_profile_is_404() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;

  let req = json_req("POST", "/admin/promote", Some("admin-1"), json!({ "userId": "ghost" }));
  let (status, _) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_lists_and_deletes_reviews() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;
  let course = h.course("Seminar", None).await;
  let review = h.review(course.course_id, Some(1)).await;

  let (status, body) = send(h.app(), get("/admin/reviews", Some("admin-1"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 1);
  assert_eq!(body["data"][0]["class_name"], "Seminar");

  let uri = format!("/admin/reviews/{}", review.review_id);
  let (status, _) = send(h.app(), delete(&uri, Some("admin-1"))).await;
  assert_eq!(status, StatusCode::OK);
  assert!(h.store.list_reviews(course.course_id).await.unwrap().is_empty());
  assert_eq!(
    h.revalidator.targets(),
    vec![RevalidateTarget::CourseDetail(course.course_id), RevalidateTarget::Layout]
  );

  let (status, _) = send(h.app(), delete(&uri, Some("admin-1"))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_deletes_course() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;
  let course = h.course("Seminar", None).await;
  h.review(course.course_id, Some(5)).await;

  let uri = format!("/admin/courses/{}", course.course_id);
  let (status, _) = send(h.app(), delete(&uri, Some("admin-1"))).await;
  assert_eq!(status, StatusCode::OK);
  assert!(h.store.get_course(course.course_id).await.unwrap().is_none());
}

#[tokio::test]
async fn admin_stats() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;
  h.profile("student-1", false).await;
  let a = h.course("A", None).await;
  let b = h.course("B", None).await;
  h.review(a.course_id, Some(4)).await;
  h.review(b.course_id, Some(5)).await;
  h.review(b.course_id, None).await;

  let (status, body) = send(h.app(), get("/admin/stats", Some("admin-1"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({
      "totalUsers": 2,
      "adminUsers": 1,
      "totalClasses": 2,
      "totalReviews": 3,
      "avgRating": "4.5",
    })
  );
}

// ─── Error contract ───────────────────────────────────────────────────────────

#[tokio::test]
async fn read_failures_hide_store_detail() {
  let revalidator = Arc::new(RecordingRevalidator::new());
  let uri = format!("/courses/{}", Uuid::new_v4());

  let (status, body) = send(down_app(revalidator.clone()), get(&uri, None)).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "error": "Failed to load data" }));

  let (status, body) = send(down_app(revalidator), get("/me", Some("student-1"))).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "error": "Failed to load data" }));
}

#[tokio::test]
async fn malformed_user_id_is_reported_as_missing() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;

  let req = json_req("POST", "/admin/promote", Some("admin-1"), json!({ "userId": 5 }));
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "userId is required" }));

  let req = Request::builder()
    .method("POST")
    .uri("/admin/revoke")
    .header("x-user-id", "admin-1")
    .body(Body::empty())
    .unwrap();
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "userId is required" }));
}

#[tokio::test]
async fn student_with_bad_body_is_forbidden_first() {
  let h = Harness::new().await;
  h.profile("student-1", false).await;

  let req = Request::builder()
    .method("POST")
    .uri("/admin/promote")
    .header("x-user-id", "student-1")
    .body(Body::empty())
    .unwrap();
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body, json!({ "error": "admin rights required" }));
}

#[tokio::test]
async fn form_without_content_type_gets_json_error() {
  let h = Harness::new().await;
  let req = Request::builder()
    .method("POST")
    .uri("/reviews")
    .header("x-user-id", "student-1")
    .body(Body::from("body=hello"))
    .unwrap();
  let (status, body) = send(h.app(), req).await;
  assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
  assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn unparseable_path_id_gets_json_error() {
  let h = Harness::new().await;
  h.profile("admin-1", true).await;

  let (status, body) = send(h.app(), delete("/admin/reviews/not-a-uuid", Some("admin-1"))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string(), "{body}");

  let (status, body) = send(h.app(), get("/courses/not-a-uuid", None)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string(), "{body}");
}
