//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use semana_core::{ExpenseStore, NewExpense, WeekKey};
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, None, ServerConfig::default()).unwrap()
}

fn setup_test_app_with_db() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default())
        .unwrap();
    (app, db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn week(year: i32, week: u32) -> WeekKey {
    WeekKey { year, week }
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_create_expense() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "amount": 120.5,
        "concept": "Super",
        "weekNumber": 5,
        "year": 2024
    });
    let response = app
        .oneshot(json_request("POST", "/api/expenses", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 120.5);
    assert_eq!(json["concept"], "Super");
    assert_eq!(json["weekNumber"], 5);
    assert_eq!(json["year"], 2024);
    assert_eq!(json["identifier"].as_str().unwrap().len(), 24);
}

#[tokio::test]
async fn test_create_expense_derives_week() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "amount": 40.0,
        "concept": "Cena",
        "occurredAt": "2024-12-31T20:00:00Z"
    });
    let response = app
        .oneshot(json_request("POST", "/api/expenses", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["weekNumber"], 1);
    assert_eq!(json["year"], 2025);
}

#[tokio::test]
async fn test_create_expense_validation() {
    let cases = [
        serde_json::json!({ "amount": 10.0, "concept": "" }),
        serde_json::json!({ "concept": "Sin monto" }),
        serde_json::json!({ "amount": 10.0, "concept": "x", "weekNumber": 5 }),
        serde_json::json!({ "amount": 10.0, "concept": "x", "weekNumber": 60, "year": 2024 }),
    ];

    for body in cases {
        let app = setup_test_app();
        let response = app
            .oneshot(json_request("POST", "/api/expenses", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);

        let json = get_body_json(response).await;
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_create_expense_malformed_json() {
    let app = setup_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/expenses")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overspend_creates_carry_over() {
    let (app, db) = setup_test_app_with_db();

    let body = serde_json::json!({
        "amount": 2300.0,
        "concept": "Renta",
        "weekNumber": 5,
        "year": 2024
    });
    let response = app
        .oneshot(json_request("POST", "/api/expenses", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let week6 = db.find_by_week(week(2024, 6)).unwrap();
    assert_eq!(week6.len(), 1);
    assert_eq!(week6[0].identifier, "deficit-2024-5");
    assert_eq!(week6[0].amount, 300.0);
}

#[tokio::test]
async fn test_list_expenses() {
    let (app, db) = setup_test_app_with_db();
    db.insert(&NewExpense::new(10.0, "a").in_week(week(2024, 5)))
        .unwrap();
    db.insert(&NewExpense::new(20.0, "b").in_week(week(2024, 6)))
        .unwrap();

    let response = app.clone().oneshot(get("/api/expenses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/expenses?week=2024-W05"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let expenses = json.as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["concept"], "a");

    let response = app.oneshot(get("/api/expenses?week=bogus")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_expense_by_path() {
    let (app, db) = setup_test_app_with_db();
    let stored = db.insert(&NewExpense::new(10.0, "Taxi").in_week(week(2024, 5)))
        .unwrap();

    let uri = format!("/api/expenses/{}", stored.identifier);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Expense deleted");

    // Second delete finds nothing
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_expense_by_body() {
    let (app, db) = setup_test_app_with_db();
    let stored = db.insert(&NewExpense::new(10.0, "Taxi").in_week(week(2024, 5)))
        .unwrap();

    // `id` is accepted as an alias
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/expenses",
            serde_json::json!({ "id": stored.identifier }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(db.find_all().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/expenses",
            serde_json::json!({ "identifier": "missing" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/expenses",
            serde_json::json!({ "identifier": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/expenses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Week API Tests ==========

#[tokio::test]
async fn test_week_overview() {
    let (app, db) = setup_test_app_with_db();
    db.insert(&NewExpense::new(2300.0, "Renta").in_week(week(2024, 5)))
        .unwrap();
    db.insert(&NewExpense::new(100.0, "Pan").in_week(week(2024, 6)))
        .unwrap();

    let response = app.oneshot(get("/api/weeks/2024-06")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["budget"], 2000.0);
    // 100 logged + 300 carried from week 5
    assert_eq!(json["spent"], 400.0);
    assert_eq!(json["remaining"], 1600.0);
    assert_eq!(json["exhausted"], false);
    assert_eq!(json["summary"]["count"], 2);
    assert_eq!(json["startsOn"], "2024-02-05");
    assert_eq!(json["endsOn"], "2024-02-11");
}

#[tokio::test]
async fn test_week_overview_current_and_invalid() {
    let app = setup_test_app();
    let response = app
        .clone()
        .oneshot(get("/api/weeks/current"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["week"]["week"], semana_core::current_week().week);

    let response = app.oneshot(get("/api/weeks/2024-99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_week_selector() {
    let app = setup_test_app();
    let response = app
        .clone()
        .oneshot(get("/api/weeks?from=2024-51&to=2025-02"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let weeks = json.as_array().unwrap();
    assert_eq!(weeks.len(), 4);
    assert_eq!(weeks[2]["key"], "2025-01");
    assert_eq!(weeks[2]["startsOn"], "2024-12-30");

    let response = app
        .oneshot(get("/api/weeks?from=1990-01&to=2030-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_get_budget_default() {
    let app = setup_test_app();
    let response = app.oneshot(get("/api/budget?week=2024-10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 2000.0);
    assert_eq!(json["default"], 2000.0);
    assert!(json["overrideAmount"].is_null());
}

#[tokio::test]
async fn test_update_budget_this_week() {
    let (app, db) = setup_test_app_with_db();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/budget",
            serde_json::json!({ "amount": 1500.0, "scope": "this_week", "week": "2024-10" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 1500.0);
    assert_eq!(json["overrideAmount"], 1500.0);

    // Persisted
    let book = semana_core::BudgetStore::load_budgets(&db).unwrap();
    assert_eq!(book.budget_for(week(2024, 10)), 1500.0);

    let response = app.oneshot(get("/api/budget?week=2024-11")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 2000.0);
}

#[tokio::test]
async fn test_update_budget_all_future() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/budget",
            serde_json::json!({ "amount": 1800.0, "scope": "all_future", "week": "2024-10" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for (query, expected) in [("2024-09", 2000.0), ("2024-10", 1800.0), ("2025-03", 1800.0)] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/budget?week={}", query)))
            .await
            .unwrap();
        let json = get_body_json(response).await;
        assert_eq!(json["amount"], expected, "week {}", query);
    }
}

#[tokio::test]
async fn test_update_budget_corrects_carry_over() {
    let (app, db) = setup_test_app_with_db();
    db.insert(&NewExpense::new(2300.0, "Renta").in_week(week(2024, 5)))
        .unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/budget",
            serde_json::json!({ "amount": 2200.0, "scope": "this_week", "week": "2024-05" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let week6 = db.find_by_week(week(2024, 6)).unwrap();
    assert_eq!(week6.len(), 1);
    assert_eq!(week6[0].amount, 100.0);
}

#[tokio::test]
async fn test_update_budget_bad_scope() {
    let app = setup_test_app();
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/budget",
            serde_json::json!({ "amount": 10.0, "scope": "forever" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Verse API Tests ==========

#[tokio::test]
async fn test_verse_of_the_day() {
    let app = setup_test_app();
    let response = app.oneshot(get("/api/verse")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let expected = semana_core::verse_of_the_day();
    assert_eq!(json["reference"], expected.reference);
    assert!(!json["text"].as_str().unwrap().is_empty());
}

// ========== Input bounds ==========

#[tokio::test]
async fn test_create_expense_rejects_year_outside_calendar() {
    let (app, db) = setup_test_app_with_db();

    let body = serde_json::json!({
        "amount": 3000.0,
        "concept": "x",
        "weekNumber": 52,
        "year": 2147483647
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/expenses", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(db.find_all().unwrap().is_empty());

    let response = app.oneshot(get("/api/weeks/2024-05")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_weeks_huge_range_is_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/weeks?from=2024-01&to=200000-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_settle_on_latest_deficit() {
    let (app, db) = setup_test_app_with_db();

    let mut handles = Vec::new();
    for i in 0..10 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let body = serde_json::json!({
                "amount": 300.0,
                "concept": format!("Gasto {}", i),
                "weekNumber": 5,
                "year": 2024
            });
            app.oneshot(json_request("POST", "/api/expenses", body))
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let carried = db.find_by_week(week(2024, 6)).unwrap();
    assert_eq!(carried.len(), 1);
    assert_eq!(carried[0].identifier, "deficit-2024-5");
    assert_eq!(carried[0].amount, 1000.0);
}

// ========== Error mapping ==========

#[test]
fn test_core_error_mapping() {
    let err = AppError::from_core(semana_core::Error::Validation("bad".into()));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = AppError::from_core(semana_core::Error::NotFound("gone".into()));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = AppError::from_core(semana_core::Error::StoreUnavailable("down".into()));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
