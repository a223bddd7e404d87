//! In-process mock of the back-office API
//!
//! Serves just enough of the REST surface for the client tests, on an
//! ephemeral port. Every request is counted by `"METHOD /path"`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bistro_client::{BistroClient, ClientConfig, MemoryTokenStore, TokenStore};
use serde_json::{Value, json};
use shared::models::{DiningTable, TableStatus};

pub const FRESH_TOKEN: &str = "fresh-access";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const STALE_TOKEN: &str = "stale-access";
pub const BILL_ID: i64 = 42;

pub struct Backend {
    hits: Mutex<HashMap<String, usize>>,
    access: Mutex<String>,
    refresh_count: AtomicU64,
    pub refresh_ok: AtomicBool,
    pub fail_status_patch: AtomicBool,
    pub fail_bill_patch: AtomicBool,
    /// `add_order` and `create_bill` answer 500
    pub fail_table_writes: AtomicBool,
    pub me_delay: Mutex<Duration>,
    pub tables: Mutex<Vec<DiningTable>>,
    pub orders: Mutex<HashMap<i64, Vec<Value>>>,
    pub last_query: Mutex<Vec<(String, String)>>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            hits: Mutex::new(HashMap::new()),
            access: Mutex::new(FRESH_TOKEN.to_string()),
            refresh_count: AtomicU64::new(0),
            refresh_ok: AtomicBool::new(true),
            fail_status_patch: AtomicBool::new(false),
            fail_bill_patch: AtomicBool::new(false),
            fail_table_writes: AtomicBool::new(false),
            me_delay: Mutex::new(Duration::ZERO),
            tables: Mutex::new(vec![
                table(1, "Bàn 1", 0, TableStatus::Available),
                table(2, "Bàn 2", 0, TableStatus::Occupied),
                table(3, "Bàn 3", 1, TableStatus::Reserved),
            ]),
            orders: Mutex::new(HashMap::from([(
                2,
                vec![json!({"id": 1, "menu_item": 5, "name": "Lẩu thái", "price": "250000", "quantity": 1})],
            )])),
            last_query: Mutex::new(Vec::new()),
        }
    }
}

fn table(id: i64, name: &str, floor: i32, status: TableStatus) -> DiningTable {
    DiningTable {
        id,
        name: name.to_string(),
        floor,
        capacity: 4,
        status,
    }
}

impl Backend {
    pub fn hits(&self, key: &str) -> usize {
        self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn status_of(&self, id: i64) -> Option<TableStatus> {
        self.tables
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.status)
    }

    pub fn orders_of(&self, id: i64) -> Vec<Value> {
        self.orders.lock().unwrap().get(&id).cloned().unwrap_or_default()
    }

    fn has_table(&self, id: i64) -> bool {
        self.tables.lock().unwrap().iter().any(|t| t.id == id)
    }

    pub fn query_value(&self, key: &str) -> Option<String> {
        self.last_query
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.access.lock().unwrap());
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

type Shared = Arc<Backend>;

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response()
}

macro_rules! require_auth {
    ($backend:expr, $headers:expr) => {
        if !$backend.authorized(&$headers) {
            return unauthorized();
        }
    };
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": "Internal server error"})),
    )
        .into_response()
}

fn user_json() -> Value {
    json!({
        "id": 1,
        "username": "admin",
        "email": "admin@bistro.vn",
        "first_name": "Minh",
        "last_name": "Trần",
        "avatar": "/media/avatars/admin.png"
    })
}

async fn record(State(backend): State<Shared>, req: Request, next: Next) -> Response {
    let key = format!("{} {}", req.method(), req.uri().path());
    *backend.hits.lock().unwrap().entry(key).or_default() += 1;
    next.run(req).await
}

async fn login(Json(body): Json<Value>) -> Response {
    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("admin"), Some("secret")) => Json(json!({
            "success": true,
            "access": FRESH_TOKEN,
            "refresh": REFRESH_TOKEN,
            "user": user_json()
        }))
        .into_response(),
        (Some("nouser"), Some("secret")) => Json(json!({
            "success": true,
            "access": FRESH_TOKEN,
            "refresh": REFRESH_TOKEN
        }))
        .into_response(),
        (Some("halfway"), _) => Json(json!({"success": true, "access": FRESH_TOKEN})).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Tên đăng nhập hoặc mật khẩu không đúng"})),
        )
            .into_response(),
    }
}

async fn refresh(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    backend.refresh_count.fetch_add(1, Ordering::SeqCst);
    if !backend.refresh_ok.load(Ordering::SeqCst) || body["refresh"] != REFRESH_TOKEN {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response();
    }
    // Slow enough for concurrent 401s to pile up behind one refresh
    tokio::time::sleep(Duration::from_millis(50)).await;
    *backend.access.lock().unwrap() = FRESH_TOKEN.to_string();
    Json(json!({"access": FRESH_TOKEN})).into_response()
}

async fn me(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    require_auth!(backend, headers);
    let delay = *backend.me_delay.lock().unwrap();
    tokio::time::sleep(delay).await;
    Json(user_json()).into_response()
}

async fn tables_list(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    require_auth!(backend, headers);
    let tables = backend.tables.lock().unwrap().clone();
    Json(tables).into_response()
}

async fn tables_create(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    require_auth!(backend, headers);
    let mut tables = backend.tables.lock().unwrap();
    let id = tables.iter().map(|t| t.id).max().unwrap_or(0) + 1;
    let created = DiningTable {
        id,
        name: body["name"].as_str().unwrap_or_default().to_string(),
        floor: body["floor"].as_i64().unwrap_or(0) as i32,
        capacity: body["capacity"].as_i64().unwrap_or(0) as i32,
        status: TableStatus::Available,
    };
    tables.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn table_get(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    require_auth!(backend, headers);
    match backend.tables.lock().unwrap().iter().find(|t| t.id == id) {
        Some(table) => Json(table.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn table_patch(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    require_auth!(backend, headers);
    if backend.fail_status_patch.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"}))).into_response();
    }
    let Ok(status) = serde_json::from_value::<TableStatus>(body["status"].clone()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"status": ["Invalid"]}))).into_response();
    };
    let mut tables = backend.tables.lock().unwrap();
    match tables.iter_mut().find(|t| t.id == id) {
        Some(table) => {
            table.status = status;
            Json(table.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn table_delete(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    require_auth!(backend, headers);
    let mut tables = backend.tables.lock().unwrap();
    match tables.iter().position(|t| t.id == id) {
        Some(pos) if tables[pos].status == TableStatus::Occupied => (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "Table has guests"})),
        )
            .into_response(),
        Some(pos) => {
            tables.remove(pos);
            StatusCode::NO_CONTENT.into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn table_orders(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    require_auth!(backend, headers);
    Json(backend.orders_of(id)).into_response()
}

async fn add_order(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    require_auth!(backend, headers);
    if !backend.has_table(id) {
        return not_found();
    }
    if backend.fail_table_writes.load(Ordering::SeqCst) {
        return server_error();
    }
    let items = body["items"].as_array().cloned().unwrap_or_default();
    backend
        .orders
        .lock()
        .unwrap()
        .entry(id)
        .or_default()
        .extend(items);
    (StatusCode::CREATED, Json(json!({"message": "Đã thêm món"}))).into_response()
}

async fn create_bill(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    require_auth!(backend, headers);
    if !backend.has_table(id) {
        return not_found();
    }
    if backend.fail_table_writes.load(Ordering::SeqCst) {
        return server_error();
    }
    if body["date"].as_str().is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"date": ["Required"]}))).into_response();
    }
    let orders = backend.orders.lock().unwrap().remove(&id).unwrap_or_default();
    if let Some(table) = backend.tables.lock().unwrap().iter_mut().find(|t| t.id == id) {
        table.status = TableStatus::Available;
    }
    Json(json!({
        "bill_id": BILL_ID,
        "total_amount": "250000",
        "items_count": orders.len(),
        "table_status_new": "available"
    }))
    .into_response()
}

async fn bill_get(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    require_auth!(backend, headers);
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
}

async fn bill_patch(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    require_auth!(backend, headers);
    if backend.fail_bill_patch.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"phone": ["Số điện thoại không hợp lệ"]})),
        )
            .into_response();
    }
    Json(json!({
        "id": id,
        "customer": body["customer"],
        "phone": body["phone"],
        "date": "2025-01-15",
        "items": [],
        "total": "250000"
    }))
    .into_response()
}

async fn customers_list(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    require_auth!(backend, headers);
    *backend.last_query.lock().unwrap() = query;
    Json(json!({
        "count": 11,
        "next": "http://testserver/api/customers/?page=2",
        "previous": null,
        "results": [{"id": 1, "name": "Chị Lan", "phone": "0901234567", "loyalty_points": 120, "total_spent": "15000000"}]
    }))
    .into_response()
}

async fn customers_create(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    require_auth!(backend, headers);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"errors": {"phone": ["Số điện thoại đã tồn tại"]}})),
    )
        .into_response()
}

async fn not_configured(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    require_auth!(backend, headers);
    not_found()
}

async fn menu_list(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    require_auth!(backend, headers);
    server_error()
}

async fn always_unauthorized() -> Response {
    unauthorized()
}

async fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "<html>upstream down</html>").into_response()
}

async fn health() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

fn router(backend: Shared) -> Router {
    Router::new()
        .route("/api/health/", get(health))
        .route("/api/auth/login/", post(login))
        .route("/api/auth/token/refresh/", post(refresh))
        .route("/api/auth/me/", get(me))
        .route("/api/tables/", get(tables_list).post(tables_create))
        .route(
            "/api/tables/{id}/",
            get(table_get).patch(table_patch).delete(table_delete),
        )
        .route("/api/tables/{id}/orders/", get(table_orders))
        .route("/api/tables/{id}/add_order/", post(add_order))
        .route("/api/tables/{id}/create_bill/", post(create_bill))
        .route("/api/bills/{id}/", get(bill_get).patch(bill_patch))
        .route("/api/menu-items/", get(menu_list))
        .route("/api/customers/", get(customers_list).post(customers_create))
        .route("/api/customers/analytics/", get(not_configured))
        .route("/api/customers/{id}/loyalty_history/", get(not_configured))
        .route("/api/reservations/", get(always_unauthorized))
        .route("/api/staff/", get(unavailable))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

pub struct TestServer {
    pub base_url: String,
    pub backend: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let backend: Shared = Arc::new(Backend::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let app = router(backend.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            backend,
            handle,
        }
    }

    /// Client whose token store starts out as `store`
    pub fn client_with(&self, store: Arc<MemoryTokenStore>) -> BistroClient {
        let store: Arc<dyn TokenStore> = store;
        BistroClient::with_store(ClientConfig::new(&self.base_url), store).unwrap()
    }

    /// Client holding a valid token pair
    pub fn client(&self) -> (BistroClient, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::with_tokens(FRESH_TOKEN, REFRESH_TOKEN));
        (self.client_with(store.clone()), store)
    }

    pub fn refreshes(&self) -> u64 {
        self.backend.refresh_count.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
