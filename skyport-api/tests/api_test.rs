//! End-to-end tests of the public router over in-memory backends.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use skyport_api::{app, AppState};
use skyport_shared::models::{Ticket, TicketStatus};
use skyport_ticketing::fakes::{FakeCatalog, FakeLedger};
use skyport_ticketing::AggregationOrchestrator;
use tower::ServiceExt;
use uuid::Uuid;

const MAX: &str = "Test Max";

// ============================================================================
// Fixtures
// ============================================================================

fn router(catalog: &Arc<FakeCatalog>, ledger: &Arc<FakeLedger>) -> Router {
    let orchestrator = AggregationOrchestrator::new(catalog.clone(), ledger.clone());
    app(AppState::new(orchestrator))
}

fn paid(flight_number: &str, price: i32) -> Ticket {
    Ticket {
        ticket_uid: Uuid::new_v4(),
        flight_number: flight_number.to_string(),
        price,
        status: TicketStatus::Paid,
    }
}

fn get(uri: &str, identity: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(name) = identity {
        builder = builder.header("X-User-Name", name);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, identity: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-User-Name", identity)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn delete(uri: &str, identity: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("X-User-Name", identity)
        .body(Body::empty())
        .unwrap()
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ============================================================================
// Tickets
// ============================================================================

#[tokio::test]
async fn test_get_ticket_is_enriched() {
    let t1 = paid("PG0404", 3400);
    let uid = t1.ticket_uid;
    let catalog = Arc::new(FakeCatalog::with_flights(vec![FakeCatalog::flight("PG0404", 3400)]));
    let ledger = Arc::new(FakeLedger::new().with_ticket(MAX, t1));

    let (status, body) = send(
        router(&catalog, &ledger),
        get(&format!("/api/v1/tickets/{}", uid), Some(MAX)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticketUid"], uid.to_string());
    assert_eq!(body["flightNumber"], "PG0404");
    assert_eq!(body["fromAirport"], "PG0404 origin");
    assert_eq!(body["toAirport"], "PG0404 destination");
    assert_eq!(body["date"], "2021-10-08 20:00");
    assert_eq!(body["price"], 3400);
    assert_eq!(body["status"], "PAID");
}

#[tokio::test]
async fn test_other_users_ticket_is_not_found() {
    let t1 = paid("PG0404", 3400);
    let uid = t1.ticket_uid;
    let catalog = Arc::new(FakeCatalog::with_flights(vec![]));
    let ledger = Arc::new(FakeLedger::new().with_ticket("Someone Else", t1));

    let (status, body) = send(
        router(&catalog, &ledger),
        get(&format!("/api/v1/tickets/{}", uid), Some(MAX)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_tickets_batches_catalog_lookup() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![FakeCatalog::flight("AFL031", 1500)]));
    let ledger = Arc::new(
        FakeLedger::new()
            .with_ticket(MAX, paid("AFL031", 1500))
            .with_ticket(MAX, paid("AFL031", 1400)),
    );

    let (status, body) = send(router(&catalog, &ledger), get("/api/v1/tickets", Some(MAX))).await;

    assert_eq!(status, StatusCode::OK);
    let tickets = body.as_array().unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0]["fromAirport"], tickets[1]["fromAirport"]);
    assert_eq!(catalog.lookups(), 1);
}

#[tokio::test]
async fn test_missing_identity_is_rejected_before_backends() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![]));
    let ledger = Arc::new(FakeLedger::new());

    for uri in ["/api/v1/tickets", "/api/v1/me", "/api/v1/privilege"] {
        let (status, body) = send(router(&catalog, &ledger), get(uri, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["errors"][0]["field"], "X-User-Name");
    }
    let (status, _) = send(router(&catalog, &ledger), get("/api/v1/tickets", Some("  "))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(ledger.calls(), 0);
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_invalid_uid_is_bad_request() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![]));
    let ledger = Arc::new(FakeLedger::new());

    let (status, body) = send(router(&catalog, &ledger), get("/api/v1/tickets/not-a-uuid", Some(MAX))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "ticketUid");
    assert_eq!(ledger.calls(), 0);
}

// ============================================================================
// Purchase and refund
// ============================================================================

#[tokio::test]
async fn test_purchase_with_zero_price_never_reaches_backends() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![FakeCatalog::flight("AFL031", 1500)]));
    let ledger = Arc::new(FakeLedger::new());

    let body = json!({"flightNumber": "AFL031", "price": 0, "paidFromBalance": false}).to_string();
    let (status, resp) = send(router(&catalog, &ledger), post_json("/api/v1/tickets", MAX, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["errors"][0]["field"], "price");
    assert_eq!(ledger.calls(), 0);
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_malformed_purchase_body_is_bad_request() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![]));
    let ledger = Arc::new(FakeLedger::new());

    let (status, resp) = send(
        router(&catalog, &ledger),
        post_json("/api/v1/tickets", MAX, "{\"flightNumber\": ".to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["message"].is_string());
    assert!(!resp["errors"].as_array().unwrap().is_empty());
    assert_eq!(ledger.calls(), 0);
}

#[tokio::test]
async fn test_purchase_returns_enriched_ticket_and_payment_split() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![FakeCatalog::flight("AFL031", 1500)]));
    let ledger = Arc::new(FakeLedger::new().with_balance(200));

    let body = json!({"flightNumber": "AFL031", "price": 1500, "paidFromBalance": true}).to_string();
    let (status, resp) = send(router(&catalog, &ledger), post_json("/api/v1/tickets", MAX, body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["flightNumber"], "AFL031");
    assert_eq!(resp["fromAirport"], "AFL031 origin");
    assert_eq!(resp["status"], "PAID");
    assert_eq!(resp["paidByBonuses"], 200);
    assert_eq!(resp["paidByMoney"], 1300);
    assert_eq!(resp["privilege"]["balance"], "0");
    assert_eq!(resp["privilege"]["status"], "BRONZE");
}

#[tokio::test]
async fn test_refund_existing_then_unknown() {
    let t1 = paid("AFL031", 1500);
    let uid = t1.ticket_uid;
    let catalog = Arc::new(FakeCatalog::with_flights(vec![]));
    let ledger = Arc::new(FakeLedger::new().with_ticket(MAX, t1));

    let (status, body) = send(
        router(&catalog, &ledger),
        delete(&format!("/api/v1/tickets/{}", uid), MAX),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        router(&catalog, &ledger),
        delete(&format!("/api/v1/tickets/{}", Uuid::new_v4()), MAX),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Flights, account, failures
// ============================================================================

#[tokio::test]
async fn test_flights_page_size_is_clamped() {
    let flights = (1..=120).map(|i| FakeCatalog::flight(&format!("F{:03}", i), i)).collect();
    let catalog = Arc::new(FakeCatalog::with_flights(flights));
    let ledger = Arc::new(FakeLedger::new());

    let (status, body) = send(router(&catalog, &ledger), get("/api/v1/flights?page=1&size=1000", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 100);
    assert_eq!(body["totalElements"], 120);
    assert_eq!(body["items"].as_array().unwrap().len(), 100);

    let (_, body) = send(router(&catalog, &ledger), get("/api/v1/flights?page=-3&size=abc", None)).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["items"][0]["flightNumber"], "F001");
}

#[tokio::test]
async fn test_me_and_privilege() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![FakeCatalog::flight("AFL031", 1500)]));
    let ledger = Arc::new(FakeLedger::new().with_balance(150).with_ticket(MAX, paid("AFL031", 1500)));

    let (status, body) = send(router(&catalog, &ledger), get("/api/v1/me", Some(MAX))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickets"][0]["toAirport"], "AFL031 destination");
    assert_eq!(body["privilege"]["balance"], "150");

    let (status, body) = send(router(&catalog, &ledger), get("/api/v1/privilege", Some(MAX))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "150");
    assert_eq!(body["status"], "BRONZE");
    assert!(body["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_backend_is_bad_gateway_with_generic_body() {
    let catalog = Arc::new(FakeCatalog::with_flights(vec![]));
    let ledger = Arc::new(FakeLedger::unavailable());

    let (status, body) = send(router(&catalog, &ledger), get("/api/v1/tickets", Some(MAX))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Service temporarily unavailable");
    assert!(!body.to_string().contains("connection refused"));
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_enrichment_failure_fails_request() {
    let catalog = Arc::new(FakeCatalog::unavailable());
    let ledger = Arc::new(FakeLedger::new().with_ticket(MAX, paid("AFL031", 1500)));

    let (status, _) = send(router(&catalog, &ledger), get("/api/v1/me", Some(MAX))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_health_needs_no_backend() {
    let catalog = Arc::new(FakeCatalog::unavailable());
    let ledger = Arc::new(FakeLedger::unavailable());

    let (status, _) = send(router(&catalog, &ledger), get("/manage/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog.calls() + ledger.calls(), 0);
}
