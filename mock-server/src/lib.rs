use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Path prefix the vendor serves version 1 of the developer API under.
pub const API_PREFIX: &str = "/developer_api/v1";

/// Collections reachable through `{collection}/search`, `{collection}/{id}`
/// and `POST {collection}`.
pub const COLLECTIONS: [&str; 8] = [
    "users",
    "leads",
    "people",
    "companies",
    "opportunities",
    "projects",
    "tasks",
    "activities",
];

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 200;
const EPOCH: u64 = 1_500_000_000;

/// In-memory state behind the mock API.
#[derive(Debug)]
pub struct Store {
    next_id: u64,
    account: Value,
    records: HashMap<&'static str, BTreeMap<u64, Value>>,
    webhooks: BTreeMap<u64, Value>,
}

impl Default for Store {
    fn default() -> Self {
        let mut records: HashMap<&'static str, BTreeMap<u64, Value>> =
            COLLECTIONS.iter().map(|name| (*name, BTreeMap::new())).collect();
        records.entry("users").or_default().insert(
            1,
            json!({"id": 1, "name": "Mock Admin", "email": "admin@example.com"}),
        );
        Self {
            next_id: 100,
            account: json!({"id": 1, "name": "Mock Account"}),
            records,
            webhooks: BTreeMap::new(),
        }
    }
}

impl Store {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn collection(&self, name: &str) -> Result<&BTreeMap<u64, Value>, Failure> {
        self.records
            .get(name)
            .ok_or_else(|| Failure::not_found("Unknown resource"))
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_store(Arc::new(RwLock::new(Store::default())))
}

pub fn app_with_store(db: Db) -> Router {
    let mut api = Router::new()
        .route("/account", get(get_account))
        .route("/webhooks", get(list_webhooks).post(create_webhook))
        .route("/webhooks/{id}", delete(delete_webhook))
        .route("/people/fetch_by_email", post(fetch_person_by_email));
    for collection in COLLECTIONS {
        api = api
            .route(
                &format!("/{collection}"),
                post(move |State(db): State<Db>, Json(body): Json<Value>| {
                    create_record(db, collection, body)
                }),
            )
            .route(
                &format!("/{collection}/search"),
                post(
                    move |State(db): State<Db>, Query(params): Query<HashMap<String, String>>| {
                        search_records(db, collection, params)
                    },
                ),
            )
            .route(
                &format!("/{collection}/{{id}}"),
                get(move |State(db): State<Db>, Path(id): Path<String>| {
                    get_record(db, collection, id)
                }),
            );
    }
    let api = api
        .layer(middleware::from_fn(require_auth))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Error reply in the vendor's JSON shape.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "status": self.status.as_u16(),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

type Reply = Result<Json<Value>, Failure>;

async fn require_auth(request: Request, next: Next) -> Response {
    if !is_authorized(request.headers()) {
        tracing::warn!(uri = %request.uri(), "rejecting unauthenticated request");
        return Failure::new(StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }
    next.run(request).await
}

fn is_authorized(headers: &HeaderMap) -> bool {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };
    value("x-pw-accesstoken").is_some()
        && value("x-pw-useremail").is_some()
        && value("x-pw-application") == Some("developer_api")
}

async fn get_account(State(db): State<Db>) -> Json<Value> {
    Json(db.read().await.account.clone())
}

async fn search_records(
    db: Db,
    collection: &'static str,
    params: HashMap<String, String>,
) -> Reply {
    let store = db.read().await;
    let records = store.collection(collection)?;
    Ok(Json(Value::Array(search(records.values(), &params))))
}

async fn fetch_person_by_email(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let email = params
        .get("email")
        .ok_or_else(|| Failure::unprocessable("email is required"))?;
    let store = db.read().await;
    store
        .collection("people")?
        .values()
        .find(|record| has_email(record, email))
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::not_found("Resource not found"))
}

async fn get_record(db: Db, collection: &'static str, id: String) -> Reply {
    let store = db.read().await;
    let records = store.collection(collection)?;
    id.parse::<u64>()
        .ok()
        .and_then(|id| records.get(&id))
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::not_found("Resource not found"))
}

async fn create_record(db: Db, collection: &'static str, body: Value) -> Reply {
    if collection == "users" {
        return Err(Failure::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "Users cannot be created through the API",
        ));
    }
    let fields = into_object(body)?;
    for field in required_fields(collection) {
        if fields.get(*field).map_or(true, Value::is_null) {
            return Err(Failure::unprocessable(format!("{field} is required")));
        }
    }

    let mut store = db.write().await;
    let id = store.allocate();
    let record = stamp(fields, id);
    store
        .records
        .entry(collection)
        .or_default()
        .insert(id, record.clone());
    tracing::debug!(%collection, id, "created record");
    Ok(Json(record))
}

async fn list_webhooks(State(db): State<Db>) -> Json<Value> {
    Json(Value::Array(db.read().await.webhooks.values().cloned().collect()))
}

async fn create_webhook(State(db): State<Db>, Json(body): Json<Value>) -> Reply {
    let fields = into_object(body)?;
    for field in ["target", "type", "event"] {
        if !fields.get(field).is_some_and(Value::is_string) {
            return Err(Failure::unprocessable(format!("{field} is required")));
        }
    }
    let mut store = db.write().await;
    let id = store.allocate();
    let mut hook = fields;
    hook.insert("id".to_string(), json!(id));
    hook.insert("created_at".to_string(), json!(EPOCH + id));
    let hook = Value::Object(hook);
    store.webhooks.insert(id, hook.clone());
    Ok(Json(hook))
}

async fn delete_webhook(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let mut store = db.write().await;
    id.parse::<u64>()
        .ok()
        .and_then(|id| store.webhooks.remove(&id).map(|_| id))
        .map(|id| Json(json!({"id": id, "is_deleted": true})))
        .ok_or_else(|| Failure::not_found("Resource not found"))
}

fn required_fields(collection: &str) -> &'static [&'static str] {
    match collection {
        "activities" => &["parent", "type"],
        _ => &["name"],
    }
}

fn into_object(body: Value) -> Result<Map<String, Value>, Failure> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(Failure::unprocessable("request body must be a JSON object")),
    }
}

fn stamp(fields: Map<String, Value>, id: u64) -> Value {
    let mut record = Map::new();
    record.insert("id".to_string(), json!(id));
    for (key, value) in fields {
        if !matches!(key.as_str(), "id" | "date_created" | "date_modified") {
            record.insert(key, value);
        }
    }
    record.insert("date_created".to_string(), json!(EPOCH + id));
    record.insert("date_modified".to_string(), json!(EPOCH + id));
    Value::Object(record)
}

/// Apply the vendor's search filters, ordering and paging to `records`.
pub fn search<'a>(
    records: impl Iterator<Item = &'a Value>,
    params: &HashMap<String, String>,
) -> Vec<Value> {
    let mut hits: Vec<Value> = records
        .filter(|record| {
            params.get("name").map_or(true, |name| {
                record["name"]
                    .as_str()
                    .is_some_and(|value| value.eq_ignore_ascii_case(name))
            })
        })
        .filter(|record| params.get("emails").map_or(true, |email| has_email(record, email)))
        .filter(|record| {
            params
                .get("phone_number")
                .map_or(true, |phone| has_phone(record, phone))
        })
        .cloned()
        .collect();

    if let Some(field) = params.get("sort_by") {
        hits.sort_by(|a, b| compare_field(&a[field.as_str()], &b[field.as_str()]));
        if params.get("sort_direction").map(String::as_str) == Some("desc") {
            hits.reverse();
        }
    }

    let page_size = params
        .get("page_size")
        .and_then(|size| size.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page_number = params
        .get("page_number")
        .and_then(|page| page.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    hits.into_iter()
        .skip(page_number.saturating_sub(1).saturating_mul(page_size))
        .take(page_size)
        .collect()
}

fn has_email(record: &Value, email: &str) -> bool {
    let matches = |entry: &Value| {
        entry["email"]
            .as_str()
            .is_some_and(|value| value.eq_ignore_ascii_case(email))
    };
    matches(&record["email"])
        || record["emails"]
            .as_array()
            .is_some_and(|entries| entries.iter().any(matches))
}

fn has_phone(record: &Value, phone: &str) -> bool {
    record["phone_numbers"].as_array().is_some_and(|entries| {
        entries
            .iter()
            .any(|entry| entry["number"].as_str() == Some(phone))
    })
}

fn compare_field(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
