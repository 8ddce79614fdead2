//! HTTP collaborator tests against a fake backend.
//!
//! An axum router bound to an ephemeral port plays both the field-sales
//! backend and the routing service, recording every request it receives.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

use field_payroll::config::ConfigLoader;
use field_payroll::error::EngineError;
use field_payroll::models::{Coordinates, Period};
use field_payroll::session::{ResolutionApplied, SalarySession};
use field_payroll::sources::{
    AttendanceSource, EmployeeProfileSource, RestBackend, RouteLookup, RoutingClient,
    TravelAllowanceSource,
};

// =============================================================================
// Fake backend
// =============================================================================

const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    query: HashMap<String, String>,
    authorization: Option<String>,
    request_id: Option<String>,
    correlation_id: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct FakeState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    travel: Arc<Mutex<Value>>,
    fail: Arc<AtomicBool>,
}

impl FakeState {
    fn record(
        &self,
        path: &str,
        query: HashMap<String, String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            query,
            authorization: header("authorization"),
            request_id: header("x-request-id"),
            correlation_id: header("x-correlation-id"),
            body,
        });
    }

    fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    fn failing(&self) -> bool {
        self.fail.load(Ordering::SeqCst)
    }
}

fn respond(state: &FakeState, body: Value) -> Response {
    if state.failing() {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    } else {
        Json(body).into_response()
    }
}

async fn attendance(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record("attendance", query, &headers, None);
    respond(
        &state,
        json!([{
            "employeeId": 11,
            "employeeFirstName": "Asha",
            "employeeLastName": "Rao",
            "fullDays": 20,
            "halfDays": 2,
            "distanceTravelledByCar": 120,
            "distanceTravelledByBike": 300,
            "pricePerKmCar": 8,
            "pricePerKmBike": 3,
            "statsDto": { "approvedExpense": 500 }
        }]),
    )
}

async fn employees(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record("employees", query, &headers, None);
    respond(
        &state,
        json!([
            { "id": 11, "firstName": "Asha", "lastName": "Rao", "dearnessAllowance": 50, "fullMonthSalary": 62000 },
            { "id": 12, "firstName": "Ravi", "lastName": "Kumar", "dearnessAllowance": null }
        ]),
    )
}

async fn travel(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record("travel", query, &headers, None);
    let detail = state.travel.lock().unwrap().clone();
    respond(&state, detail)
}

async fn travel_create(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("travel_create", HashMap::new(), &headers, Some(body.clone()));

    let total = body["distanceTravelledByCar"].as_f64().unwrap_or(0.0)
        + body["distanceTravelledByBike"].as_f64().unwrap_or(0.0);
    let mut detail = state.travel.lock().unwrap();
    if let Some(days) = detail["dateDetails"].as_array_mut() {
        for day in days.iter_mut().filter(|d| d["date"] == body["date"]) {
            day["totalDistanceTravelled"] = json!(total);
        }
    }
    StatusCode::OK.into_response()
}

async fn directions(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record("directions", query, &headers, None);
    respond(
        &state,
        json!({ "routes": [{ "legs": [{ "distance": 5230.0 }] }] }),
    )
}

async fn start_fake_backend(state: FakeState) -> String {
    let app = Router::new()
        .route("/attendance-log/getForRange", get(attendance))
        .route("/employee/getAll", get(employees))
        .route("/travel-allowance/getForEmployeeAndDate", get(travel))
        .route("/travel-allowance/create", post(travel_create))
        .route("/routing/v1/directions", post(directions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn anomalous_travel() -> Value {
    json!({
        "dateDetails": [{
            "date": "2024-07-02",
            "checkoutCount": 2,
            "totalDistanceTravelled": 0,
            "visitDetails": [
                { "checkinLatitude": 18.5204, "checkinLongitude": 73.8567, "vehicleType": "Car" },
                { "checkinLatitude": 18.5590, "checkinLongitude": 73.7868 }
            ]
        }]
    })
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
}

// =============================================================================
// SECTION 1: REST backend
// =============================================================================

#[tokio::test]
async fn test_attendance_request_shape() {
    let state = FakeState::default();
    let base = start_fake_backend(state.clone()).await;
    let backend = RestBackend::new(base, TOKEN);

    let records = backend.fetch_attendance(date(1), date(9)).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].approved_expense(), decimal("500"));

    let sent = state.requests_to("attendance");
    assert_eq!(sent[0].query["start"], "2024-07-01");
    assert_eq!(sent[0].query["end"], "2024-07-09");
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn test_profiles_are_indexed_by_id() {
    let state = FakeState::default();
    let base = start_fake_backend(state.clone()).await;
    let backend = RestBackend::new(format!("{}/", base), TOKEN);

    let profiles = backend.fetch_employee_profiles().await.unwrap();

    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[&11].full_month_salary, decimal("62000"));
    assert_eq!(profiles[&12].dearness_allowance, Decimal::ZERO);
}

#[tokio::test]
async fn test_travel_fetch_and_persist() {
    let state = FakeState::default();
    *state.travel.lock().unwrap() = anomalous_travel();
    let base = start_fake_backend(state.clone()).await;
    let backend = RestBackend::new(base, TOKEN);

    let detail = backend
        .fetch_travel_allowance(11, date(1), date(31))
        .await
        .unwrap();
    assert!(detail.date_details[0].is_anomalous());

    let sent = state.requests_to("travel");
    assert_eq!(sent[0].query["employeeId"], "11");
    assert_eq!(sent[0].query["end"], "2024-07-31");

    backend
        .persist_travel_day(11, date(2), decimal("5.23"), Decimal::ZERO)
        .await
        .unwrap();

    let body = state.requests_to("travel_create")[0].body.clone().unwrap();
    assert_eq!(body["employeeId"], 11);
    assert_eq!(body["date"], "2024-07-02");
    assert_eq!(body["distanceTravelledByCar"], 5.23);
    assert_eq!(body["distanceTravelledByBike"], 0.0);
}

#[tokio::test]
async fn test_server_error_is_io_error() {
    let state = FakeState::default();
    state.fail.store(true, Ordering::SeqCst);
    let base = start_fake_backend(state.clone()).await;
    let backend = RestBackend::new(base, TOKEN);

    let result = backend.fetch_attendance(date(1), date(31)).await;

    match result {
        Err(EngineError::Io { operation, .. }) => assert_eq!(operation, "fetch_attendance"),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_io_error() {
    let backend = RestBackend::new("http://127.0.0.1:1", TOKEN);
    let result = backend.fetch_employee_profiles().await;
    assert!(matches!(result, Err(EngineError::Io { .. })));
}

// =============================================================================
// SECTION 2: Routing client
// =============================================================================

#[tokio::test]
async fn test_directions_request_shape() {
    let state = FakeState::default();
    let base = start_fake_backend(state.clone()).await;
    let routing = RoutingClient::new(base, TOKEN);

    let km = routing
        .lookup_route_distance_km(
            Coordinates::new(18.5204, 73.8567),
            Coordinates::new(18.559, 73.7868),
        )
        .await
        .unwrap();

    assert_eq!(km, decimal("5.23"));

    let sent = &state.requests_to("directions")[0];
    assert_eq!(sent.query["origin"], "18.5204,73.8567");
    assert_eq!(sent.query["destination"], "18.559,73.7868");
    assert_eq!(sent.query["alternatives"], "false");
    assert_eq!(sent.query["traffic_metadata"], "false");
    assert_eq!(sent.authorization.as_deref(), Some("Bearer test-token"));

    let request_id = sent.request_id.as_deref().unwrap();
    let correlation_id = sent.correlation_id.as_deref().unwrap();
    assert!(Uuid::parse_str(request_id).is_ok());
    assert_ne!(request_id, correlation_id);
}

#[tokio::test]
async fn test_directions_failure_is_io_error() {
    let state = FakeState::default();
    state.fail.store(true, Ordering::SeqCst);
    let base = start_fake_backend(state).await;
    let routing = RoutingClient::new(base, TOKEN);

    let result = routing
        .lookup_route_distance_km(Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0))
        .await;
    assert!(matches!(result, Err(EngineError::Io { .. })));
}

// =============================================================================
// SECTION 3: Configured session over HTTP
// =============================================================================

#[tokio::test]
async fn test_configured_session_loads_and_resolves() {
    let state = FakeState::default();
    *state.travel.lock().unwrap() = anomalous_travel();
    let base = start_fake_backend(state.clone()).await;

    let config = ConfigLoader::from_yaml_str(&format!(
        "backend:\n  base_url: {base}\n  access_token: {TOKEN}\nrouting:\n  base_url: {base}\n  access_token: {TOKEN}\n"
    ))
    .unwrap();
    let mut session = SalarySession::from_config(&config);

    let today = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
    session.load(Period::new(2024, 7).unwrap(), today).await.unwrap();

    let rows = session.rows().unwrap();
    assert_eq!(rows[0].total_salary, decimal("45410"));
    assert_eq!(rows[0].anomaly_count, 1);

    let applied = session.resolve_all_flagged().await;
    assert_eq!(
        applied,
        vec![ResolutionApplied::Applied {
            employee_id: 11,
            remaining_anomalies: 0
        }]
    );

    let written = state.requests_to("travel_create");
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].body.as_ref().unwrap()["distanceTravelledByCar"], 5.23);
    assert_eq!(
        session.travel_detail(11).unwrap().date_details[0].total_distance_travelled,
        decimal("5.23")
    );
}
