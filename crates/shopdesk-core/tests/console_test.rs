// End-to-end tests for views against a wiremock backend.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopdesk_core::{
    Banner, Console, ConsoleConfig, CoreError, CustomerStatus, MutationOutcome, ResourceId,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let config = ConsoleConfig::new(server.uri().parse().unwrap())
        .with_token(SecretString::from("tok-abc".to_string()));
    let console = Console::new(config).unwrap();
    (server, console)
}

fn customers_body() -> serde_json::Value {
    json!([
        { "_id": "c-1", "name": "Sana", "email": "sana@example.com", "status": "active",
          "addresses": [{ "city": "Lahore", "type": "Shipping", "isDefault": true }] },
        { "_id": "c-2", "email": "omar@example.com", "status": "inactive", "addresses": [] },
        { "_id": "a-1", "email": "root@example.com", "role": "admin", "addresses": [] },
    ])
}

async fn mount_customers(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/profile/all"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customers_body()))
        .mount(server)
        .await;
}

fn statuses(console_view: &shopdesk_core::CustomersView) -> Vec<(String, CustomerStatus)> {
    console_view
        .snapshot()
        .iter()
        .map(|c| (c.id.to_string(), c.status))
        .collect()
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_decodes_and_filters_admins() {
    let (server, console) = setup().await;
    mount_customers(&server).await;

    let customers = console.customers();
    customers.refresh().await.unwrap();

    assert_eq!(
        statuses(&customers),
        vec![
            ("c-1".into(), CustomerStatus::Active),
            ("c-2".into(), CustomerStatus::Inactive),
        ]
    );
    assert_eq!(customers.find("c-1").unwrap().shipping_address().city, "Lahore");
}

#[tokio::test]
async fn refresh_tolerates_duplicate_ids_and_nulls() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/all-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "64ab", "id": "ORD-1", "customer": "A", "status": "Pending" },
            { "_id": "64ac", "customer": null, "status": null, "total": null },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "u1", "id": "u1", "name": null, "email": null, "status": null,
              "phone": null, "orders": null, "addresses": null },
        ])))
        .mount(&server)
        .await;

    let orders = console.orders();
    orders.refresh().await.unwrap();
    let ids: Vec<String> = orders.snapshot().iter().map(|o| o.id.to_string()).collect();
    assert_eq!(ids, vec!["64ab", "64ac"]);

    let customers = console.customers();
    customers.refresh().await.unwrap();
    let customer = customers.find("u1").unwrap();
    assert_eq!(customer.status, CustomerStatus::Inactive);
    assert_eq!(customer.email, "");
    assert_eq!(customer.display_name(), "Unnamed");
}

#[tokio::test]
async fn failed_refresh_leaves_store_untouched() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/profile/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customers_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let customers = console.customers();
    customers.refresh().await.unwrap();
    let before = customers.snapshot();
    let version = customers.store().version();

    Mock::given(method("GET"))
        .and(path("/api/profile/all"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
        .mount(&server)
        .await;

    let err = customers.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(500), .. }), "got {err:?}");

    let (tx, mut rx) = mpsc::unbounded_channel();
    customers.start_polling_every(Duration::from_secs(3600), move |result| {
        let _ = tx.send(result);
    });
    let polled = rx.recv().await.unwrap();
    assert!(matches!(polled, Err(CoreError::RefreshFailed { .. })));
    customers.stop_polling();

    assert_eq!(customers.snapshot(), before);
    assert_eq!(customers.store().version(), version);
}

#[tokio::test]
async fn expired_session_surfaces_on_refresh() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/all-orders"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = console.orders().refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::SessionExpired), "got {err:?}");
}

#[tokio::test]
async fn orders_report_new_arrivals_after_first_load() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/all-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "o-1", "customer": "Ayesha", "total": 900, "status": "Pending" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders/all-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "o-1", "customer": "Ayesha", "total": 900, "status": "Pending" },
            { "id": "o-2", "customer": "Bilal", "total": 450, "status": "Pending" }
        ])))
        .mount(&server)
        .await;

    let orders = console.orders();
    assert!(orders.refresh().await.unwrap().is_empty());

    let arrivals = orders.refresh().await.unwrap();
    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0].customer, "Bilal");
    assert_eq!(orders.snapshot().len(), 2);
}

// ── Optimistic mutation ─────────────────────────────────────────────

#[tokio::test]
async fn toggle_status_commits_on_success() {
    let (server, console) = setup().await;
    mount_customers(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/status/c-1"))
        .and(body_json(json!({ "userId": "c-1", "status": "inactive" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let customers = console.customers();
    customers.refresh().await.unwrap();

    let outcome = customers
        .toggle_status(&ResourceId::from("c-1"))
        .await
        .unwrap();
    assert_eq!(outcome, MutationOutcome::Committed(None));
    assert_eq!(statuses(&customers)[0].1, CustomerStatus::Inactive);
}

#[tokio::test]
async fn toggle_status_rolls_back_on_failure() {
    let (server, console) = setup().await;
    mount_customers(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/status/c-1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "database offline" })),
        )
        .mount(&server)
        .await;

    let customers = console.customers();
    customers.refresh().await.unwrap();
    let before = statuses(&customers);

    let err = customers
        .toggle_status(&ResourceId::from("c-1"))
        .await
        .unwrap_err();

    match &err {
        CoreError::MutationFailed { id, source } => {
            assert_eq!(id, "c-1");
            assert_eq!(source.to_string(), "API error: database offline");
        }
        other => panic!("expected MutationFailed, got {other:?}"),
    }
    assert_eq!(statuses(&customers), before);
}

#[tokio::test]
async fn poll_during_mutation_keeps_optimistic_value() {
    let (server, console) = setup().await;
    mount_customers(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/status/c-1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let customers = console.customers();
    customers.refresh().await.unwrap();
    let id = ResourceId::from("c-1");

    let (outcome, refreshed) = tokio::join!(customers.toggle_status(&id), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        // The server still reports "active" while the PUT is pending.
        let result = customers.refresh().await;
        (result, customers.get(&id).unwrap().status)
    });

    outcome.unwrap();
    refreshed.0.unwrap();
    assert_eq!(refreshed.1, CustomerStatus::Inactive);
    assert_eq!(customers.get(&id).unwrap().status, CustomerStatus::Inactive);
}

#[tokio::test]
async fn banner_toggle_takes_server_copy() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/banners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "b-1", "title": "Eid sale", "active": false },
            { "_id": "b-2", "title": "Winter", "active": true },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/banners/b-1/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "b-1", "title": "Eid sale (renamed)", "active": true
        })))
        .mount(&server)
        .await;

    let banners = console.banners();
    banners.refresh().await.unwrap();
    banners.toggle(&ResourceId::from("b-1")).await.unwrap();

    let snapshot = banners.snapshot();
    assert_eq!(snapshot[0].title, "Eid sale (renamed)");
    assert!(snapshot[0].active);
    assert_eq!(banners.active_count(), 2);
}

#[tokio::test]
async fn banner_reply_with_both_ids_still_wins() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/banners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "b-1", "title": "Eid sale", "active": false },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/banners/b-1/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "b-1", "id": "b-1", "title": "Eid sale", "salestext": "20% off", "active": true
        })))
        .mount(&server)
        .await;

    let banners = console.banners();
    banners.refresh().await.unwrap();
    let outcome = banners.toggle(&ResourceId::from("b-1")).await.unwrap();

    assert!(matches!(outcome, MutationOutcome::Committed(Some(_))));
    assert_eq!(banners.snapshot()[0].salestext, "20% off");
}

fn draft(title: &str) -> Banner {
    Banner {
        id: ResourceId::from("ignored"),
        title: title.into(),
        salestext: "Flat 30%".into(),
        description: String::new(),
        button_text: "Shop now".into(),
        button_link: "/sale".into(),
        image_url: String::new(),
        active: true,
    }
}

async fn mount_one_banner(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/banners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "b-1", "title": "Winter", "active": true },
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn created_banner_takes_server_id_in_place() {
    let (server, console) = setup().await;
    mount_one_banner(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/banners"))
        .and(body_json(json!({
            "title": "Eid sale", "salestext": "Flat 30%", "description": "",
            "buttonText": "Shop now", "buttonLink": "/sale", "imageUrl": "", "active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "b-9", "title": "Eid sale", "salestext": "Flat 30%", "active": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let banners = console.banners();
    banners.refresh().await.unwrap();
    let outcome = banners.create(draft("Eid sale")).await.unwrap();

    let MutationOutcome::Committed(Some(stored)) = outcome else {
        panic!("expected the server copy, got {outcome:?}");
    };
    assert_eq!(stored.id, ResourceId::from("b-9"));
    let ids: Vec<String> = banners.snapshot().iter().map(|b| b.id.to_string()).collect();
    assert_eq!(ids, vec!["b-1", "b-9"]);
}

#[tokio::test]
async fn rejected_banner_create_removes_draft() {
    let (server, console) = setup().await;
    mount_one_banner(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/banners"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "image required" })))
        .mount(&server)
        .await;

    let banners = console.banners();
    banners.refresh().await.unwrap();

    let err = banners.create(draft("Eid sale")).await.unwrap_err();
    assert!(matches!(err, CoreError::MutationFailed { .. }), "got {err:?}");
    assert_eq!(banners.snapshot().len(), 1);

    let err = banners.create(draft("  ")).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidPatch { .. }));
}

#[tokio::test]
async fn subcategory_toggle_hits_sub_status_route() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/getAllSubCategories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 40, "name": "Sandals", "status": true },
            { "id": 41, "name": "Boots", "status": false },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/categories/40/subStatus"))
        .and(body_json(json!({ "status": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let subcategories = console.subcategories();
    subcategories.refresh().await.unwrap();
    subcategories.toggle(&ResourceId::Numeric(40)).await.unwrap();

    assert!(!subcategories.get(&ResourceId::Numeric(40)).unwrap().active);
    assert!(!subcategories.get(&ResourceId::Numeric(41)).unwrap().active);
}

#[tokio::test]
async fn failed_delete_restores_position() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/coupons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "k-1", "code": "EID10", "active": true },
            { "_id": "k-2", "code": "WINTER", "active": true },
            { "_id": "k-3", "code": "FREESHIP", "active": false },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/coupons/k-2"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "in use" })))
        .mount(&server)
        .await;

    let coupons = console.coupons();
    coupons.refresh().await.unwrap();

    let err = coupons.delete(&ResourceId::from("k-2")).await.unwrap_err();
    assert!(matches!(err, CoreError::MutationFailed { .. }));

    let codes: Vec<String> = coupons.snapshot().iter().map(|c| c.code.clone()).collect();
    assert_eq!(codes, vec!["EID10", "WINTER", "FREESHIP"]);
}

// ── Polling lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn polling_delivers_results_until_disconnect() {
    let (server, console) = setup().await;
    mount_customers(&server).await;

    let customers = console.customers();
    let (tx, mut rx) = mpsc::unbounded_channel();
    customers.start_polling_every(Duration::from_millis(20), move |result| {
        let _ = tx.send(result.is_ok());
    });
    assert!(customers.is_polling());

    assert_eq!(rx.recv().await, Some(true));
    assert_eq!(rx.recv().await, Some(true));
    assert_eq!(customers.snapshot().len(), 2);

    console.disconnect();
    assert!(!customers.is_polling());
    assert!(matches!(
        customers.refresh().await,
        Err(CoreError::ConsoleDisconnected)
    ));
}

#[tokio::test]
async fn console_requires_token() {
    let config = ConsoleConfig::new("http://127.0.0.1:9".parse().unwrap());
    assert!(matches!(Console::new(config), Err(CoreError::Config { .. })));
}
