use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use despachante_admin::config::{DataBackend, EnvironmentConfig};
use despachante_admin::repositories::MemoryStore;
use despachante_admin::routes::create_router;
use despachante_admin::services::FilesystemStorage;
use despachante_admin::state::AppState;
use despachante_admin::utils::jwt::Claims;

const SECRET: &str = "test-secret";

struct TestApp {
    router: Router,
    token: String,
    today: NaiveDate,
}

impl TestApp {
    fn new() -> Self {
        let upload_dir = std::env::temp_dir().join(format!("despachante-api-{}", Uuid::new_v4()));
        let config = EnvironmentConfig {
            jwt_secret: SECRET.to_string(),
            data_backend: DataBackend::Memory,
            storage_local_path: upload_dir.clone(),
            ..EnvironmentConfig::default()
        };
        let state = AppState::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(FilesystemStorage::new(upload_dir)),
            None,
        );
        let today = state.today();

        Self {
            router: create_router(state),
            token: token_for(Uuid::new_v4()),
            today,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    async fn create_client(&self, name: &str, tax_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/clients",
                json!({ "client_type": "INDIVIDUAL", "name": name, "tax_id": tax_id }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_vehicle(&self, owner_id: &str, plate: &str) -> String {
        let (status, body) = self
            .post("/api/vehicles", json!({ "owner_id": owner_id, "plate": plate }))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        iat: None,
        email: Some("operador@despachante.test".to_string()),
        role: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

#[tokio::test]
async fn test_health_check_is_public() {
    let app = TestApp::new();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_api_requires_token() {
    let app = TestApp::new();

    let request = Request::builder().uri("/api/clients").body(Body::empty()).unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let request = Request::builder()
        .uri("/api/clients")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_client_doc_status_is_derived_on_save() {
    let app = TestApp::new();

    let (_, body) = app
        .post(
            "/api/clients",
            json!({ "client_type": "INDIVIDUAL", "name": "Ana Souza", "tax_id": "123.456.789-09" }),
        )
        .await;
    assert_eq!(body["data"]["doc_status"], "COMPLETED");

    let (_, body) = app
        .post("/api/clients", json!({ "client_type": "INDIVIDUAL", "phone": "11 99999-0000" }))
        .await;
    assert_eq!(body["data"]["doc_status"], "IN_PROGRESS");

    let (_, body) = app.post("/api/clients", json!({ "client_type": "COMPANY" })).await;
    assert_eq!(body["data"]["doc_status"], "PENDING");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // completar después también recalcula
    let (status, body) = app
        .put(
            &format!("/api/clients/{}", id),
            json!({ "client_type": "COMPANY", "name": "Auto Peças LTDA", "tax_id": "12.345.678/0001-95" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["doc_status"], "COMPLETED");
}

#[tokio::test]
async fn test_client_with_malformed_tax_id_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/clients",
            json!({ "client_type": "INDIVIDUAL", "name": "Ana", "tax_id": "1234" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_vehicle_transfer_applies_all_effects() {
    let app = TestApp::new();
    let seller = app.create_client("Ana Souza", "123.456.789-09").await;
    let buyer = app.create_client("Bruno Lima", "987.654.321-00").await;
    let vehicle = app.create_vehicle(&seller, "abc-1d23").await;

    let (status, body) = app
        .post(
            &format!("/api/vehicles/{}/transfer", vehicle),
            json!({
                "seller_id": seller,
                "new_owner_id": buyer,
                "price": "200",
                "payer_id": buyer,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, body) = app.get(&format!("/api/vehicles/{}", vehicle)).await;
    assert_eq!(body["owner_id"], buyer.as_str());
    assert_eq!(body["plate"], "ABC1D23");

    let (_, services) = app.get(&format!("/api/services?vehicle_id={}", vehicle)).await;
    let services = services.as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["client_id"], seller.as_str());
    assert_eq!(services[0]["service_type"], "TRANSFERENCIA");
    assert_eq!(decimal(&services[0]["price"]), Decimal::new(200, 0));

    let (_, transactions) = app.get("/api/transactions").await;
    let transactions = transactions.as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["status"], "PENDING");
    assert_eq!(transactions[0]["client_id"], buyer.as_str());
    assert_eq!(transactions[0]["service_id"], services[0]["id"]);
    assert_eq!(decimal(&transactions[0]["amount"]), Decimal::new(200, 0));

    let (_, logs) = app
        .get(&format!("/api/audit-logs?action=VEHICLE_TRANSFERRED&entity_id={}", vehicle))
        .await;
    assert_eq!(logs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_transfer_from_non_owner_changes_nothing() {
    let app = TestApp::new();
    let owner = app.create_client("Ana Souza", "123.456.789-09").await;
    let other = app.create_client("Bruno Lima", "987.654.321-00").await;
    let third = app.create_client("Carla Dias", "111.222.333-44").await;
    let vehicle = app.create_vehicle(&owner, "ABC1234").await;

    let (status, body) = app
        .post(
            &format!("/api/vehicles/{}/transfer", vehicle),
            json!({
                "seller_id": other,
                "new_owner_id": third,
                "price": "200",
                "payer_id": third,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, body) = app.get(&format!("/api/vehicles/{}", vehicle)).await;
    assert_eq!(body["owner_id"], owner.as_str());
    let (_, services) = app.get("/api/services").await;
    assert!(services.as_array().unwrap().is_empty());
    let (_, transactions) = app.get("/api/transactions").await;
    assert!(transactions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_transfer_payer_must_be_a_party() {
    let app = TestApp::new();
    let seller = app.create_client("Ana Souza", "123.456.789-09").await;
    let buyer = app.create_client("Bruno Lima", "987.654.321-00").await;
    let outsider = app.create_client("Carla Dias", "111.222.333-44").await;
    let vehicle = app.create_vehicle(&seller, "ABC1234").await;

    let (status, _) = app
        .post(
            &format!("/api/vehicles/{}/transfer", vehicle),
            json!({
                "seller_id": seller,
                "new_owner_id": buyer,
                "price": "200",
                "payer_id": outsider,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_zero_price_transfer_is_rejected() {
    let app = TestApp::new();
    let seller = app.create_client("Ana Souza", "123.456.789-09").await;
    let buyer = app.create_client("Bruno Lima", "987.654.321-00").await;
    let vehicle = app.create_vehicle(&seller, "ABC1234").await;

    let (status, body) = app
        .post(
            &format!("/api/vehicles/{}/transfer", vehicle),
            json!({
                "seller_id": seller,
                "new_owner_id": buyer,
                "price": "0",
                "payer_id": buyer,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, body) = app.get(&format!("/api/vehicles/{}", vehicle)).await;
    assert_eq!(body["owner_id"], seller.as_str());
    let (_, services) = app.get("/api/services").await;
    assert!(services.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_service_creation_seeds_checklist_and_billing() {
    let app = TestApp::new();
    let client = app.create_client("Ana Souza", "123.456.789-09").await;
    let vehicle = app.create_vehicle(&client, "ABC1D23").await;

    let (status, body) = app
        .post(
            "/api/services",
            json!({
                "client_id": client,
                "vehicle_id": vehicle,
                "service_type": "licenciamento",
                "price": "150.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let data = &body["data"];
    assert_eq!(data["service_type"], "LICENCIAMENTO");
    assert_eq!(data["status"], "TODO");
    assert_eq!(data["checklist"].as_array().unwrap().len(), 4);
    assert_eq!(data["progress"]["total"], 4);
    assert_eq!(data["progress"]["percentage"], 0);
    assert_eq!(data["transaction"]["status"], "PENDING");
    assert_eq!(decimal(&data["transaction"]["amount"]), Decimal::new(150, 0));

    let service_id = data["id"].as_str().unwrap();
    let item_id = data["checklist"][0]["id"].as_str().unwrap();
    let (status, _) = app
        .put(
            &format!("/api/services/{}/checklist/{}", service_id, item_id),
            json!({ "completed": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = app.get(&format!("/api/services/{}", service_id)).await;
    assert_eq!(detail["progress"]["completed"], 1);
    assert_eq!(detail["progress"]["percentage"], 25);
}

#[tokio::test]
async fn test_free_service_creates_no_transaction() {
    let app = TestApp::new();
    let client = app.create_client("Ana Souza", "123.456.789-09").await;
    let vehicle = app.create_vehicle(&client, "ABC1D23").await;

    let (status, body) = app
        .post(
            "/api/services",
            json!({
                "client_id": client,
                "vehicle_id": vehicle,
                "service_type": "Serviço avulso",
                "price": "0",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["transaction"].is_null());
    assert_eq!(body["data"]["progress"]["percentage"], 0);

    let (_, transactions) = app.get("/api/transactions").await;
    assert!(transactions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_service_status_lifecycle() {
    let app = TestApp::new();
    let client = app.create_client("Ana Souza", "123.456.789-09").await;
    let vehicle = app.create_vehicle(&client, "ABC1D23").await;
    let (_, body) = app
        .post(
            "/api/services",
            json!({
                "client_id": client,
                "vehicle_id": vehicle,
                "service_type": "LICENCIAMENTO",
                "price": "90",
            }),
        )
        .await;
    let uri = format!("/api/services/{}/status", body["data"]["id"].as_str().unwrap());

    let (status, _) = app.put(&uri, json!({ "status": "WAITING_DOCS" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.put(&uri, json!({ "status": "COMPLETED" })).await;
    assert_eq!(status, StatusCode::OK);

    // terminal: repetir es un no-op, salir no
    let (status, _) = app.put(&uri, json!({ "status": "COMPLETED" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.put(&uri, json!({ "status": "TODO" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_financial_summary() {
    let app = TestApp::new();
    let entries = [
        ("REVENUE", "PAID", "1000"),
        ("EXPENSE", "PAID", "300"),
        ("REVENUE", "PENDING", "200"),
        ("EXPENSE", "PENDING", "50"),
    ];
    for (kind, status, amount) in entries {
        let (code, body) = app
            .post(
                "/api/transactions",
                json!({ "kind": kind, "status": status, "description": "Lançamento", "amount": amount }),
            )
            .await;
        assert_eq!(code, StatusCode::OK, "{}", body);
    }

    let (status, summary) = app.get("/api/dashboard/financial").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&summary["total_revenue"]), Decimal::new(1000, 0));
    assert_eq!(decimal(&summary["current_balance"]), Decimal::new(700, 0));
    assert_eq!(decimal(&summary["accounts_receivable"]), Decimal::new(200, 0));
    assert_eq!(decimal(&summary["accounts_payable"]), Decimal::new(50, 0));

    let cash_flow = summary["monthly_cash_flow"].as_array().unwrap();
    assert_eq!(cash_flow.len(), 1);
    assert_eq!(decimal(&cash_flow[0]["revenue"]), Decimal::new(1000, 0));
    assert_eq!(decimal(&cash_flow[0]["expense"]), Decimal::new(300, 0));
}

#[tokio::test]
async fn test_mark_paid_is_idempotent() {
    let app = TestApp::new();
    let (_, body) = app
        .post(
            "/api/transactions",
            json!({ "kind": "REVENUE", "description": "Vistoria", "amount": "80" }),
        )
        .await;
    let uri = format!("/api/transactions/{}/pay", body["data"]["id"].as_str().unwrap());

    let (status, first) = app.post(&uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["status"], "PAID");
    let paid_at = first["data"]["paid_at"].clone();
    assert!(!paid_at.is_null());

    let (status, second) = app.post(&uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["paid_at"], paid_at);
}

#[tokio::test]
async fn test_transaction_amount_must_be_positive() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/transactions",
            json!({ "kind": "EXPENSE", "description": "Taxa", "amount": "0" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_transaction_amount_rejects_sub_cent_values() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/transactions",
            json!({ "kind": "REVENUE", "description": "Taxa", "amount": "0.001" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, transactions) = app.get("/api/transactions").await;
    assert!(transactions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_alerts() {
    let app = TestApp::new();
    let client = app.create_client("Ana Souza", "123.456.789-09").await;

    let soon = app.today + Duration::days(10);
    let (status, _) = app
        .post(
            "/api/vehicles",
            json!({ "owner_id": client, "plate": "ABC1D23", "licensing_expiration": soon }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let expired = app.today - Duration::days(1);
    let (status, _) = app
        .post(
            "/api/vehicles",
            json!({ "owner_id": client, "plate": "XYZ9876", "licensing_expiration": expired }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let far = app.today + Duration::days(90);
    app.post(
        "/api/vehicles",
        json!({ "owner_id": client, "plate": "DEF4G56", "licensing_expiration": far }),
    )
    .await;

    let (status, alerts) = app.get("/api/dashboard/alerts").await;
    assert_eq!(status, StatusCode::OK);
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["status"], "EXPIRED");
    assert_eq!(alerts[0]["days_remaining"], -1);
    assert_eq!(alerts[1]["status"], "EXPIRING_SOON");
    assert_eq!(alerts[1]["days_remaining"], 10);

    let (_, overview) = app.get("/api/dashboard/overview").await;
    assert_eq!(overview["total_vehicles"], 3);
    assert_eq!(overview["expired_alerts"], 1);
    assert_eq!(overview["expiring_soon_alerts"], 1);
}

#[tokio::test]
async fn test_duplicate_plate_conflicts() {
    let app = TestApp::new();
    let client = app.create_client("Ana Souza", "123.456.789-09").await;
    app.create_vehicle(&client, "ABC1D23").await;

    let (status, _) = app
        .post("/api/vehicles", json!({ "owner_id": client, "plate": "abc-1d23" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_negative_pagination_is_clamped() {
    let app = TestApp::new();
    app.create_client("Ana Souza", "123.456.789-09").await;
    app.create_client("Bruno Lima", "987.654.321-00").await;

    let (status, body) = app.get("/api/clients?limit=-1&offset=-5").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = app.get("/api/clients?offset=-5").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_avatar_upload() {
    let app = TestApp::new();
    let client = app.create_client("Ana Souza", "123.456.789-09").await;
    let uri = format!("/api/clients/{}/avatar", client);

    let request = Request::builder()
        .method(Method::POST)
        .uri(&uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(vec![0x89, b'P', b'N', b'G']))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let avatar_url = body["data"]["avatar_url"].as_str().unwrap();
    assert!(avatar_url.starts_with("file://"));
    assert!(avatar_url.ends_with(".png"));

    let request = Request::builder()
        .method(Method::POST)
        .uri(&uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .header(header::CONTENT_TYPE, "application/pdf")
        .body(Body::from("%PDF"))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checklist_templates_listing() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/checklist-templates").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|template| template["service_type"] == "TRANSFERENCIA"));
}
