//! Tests for credit ledger HTTP handlers.

use super::*;
use crate::domain::ports::{
    LedgerListing, MockLedgerCommand, MockLedgerQuery, MockLoginService,
};
use crate::domain::{
    CompactionReport, CreditEntry, CreditItem, EntryDetail, EntryState, EntrySummary, ErrorCode,
    ItemPayment, LedgerEvent, LedgerTotals, Money, Operator, PaymentStatus, Quantity,
};
use crate::inbound::http::test_utils::{mock_state, session_cookie, test_session_middleware};
use crate::inbound::http::users::{LoginRequest, login};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn entry(id: i32, name: &str) -> CreditEntry {
    CreditEntry {
        id: EntryId::new(id).expect("valid id"),
        customer_name: name.to_owned(),
        phone_number: None,
        estimated_payment_date: NaiveDate::from_ymd_opt(2025, 2, 15).expect("valid date"),
        state: EntryState::pending(),
        created_at: created_at(),
    }
}

fn item(id: i32, entry_id: i32, cost: &str) -> CreditItem {
    CreditItem {
        id: ItemId::new(id).expect("valid id"),
        entry_id: EntryId::new(entry_id).expect("valid id"),
        product: "Rice 5kg".to_owned(),
        cost: Money::parse(cost).expect("valid money"),
        quantity: Quantity::ONE,
        unit_price: Money::ZERO,
        added_at: created_at(),
        status: PaymentStatus::Pending,
        paid_at: None,
    }
}

fn ana_detail() -> EntryDetail {
    EntryDetail::from_items(entry(1, "Ana"), vec![item(1, 1, "250.00")])
}

fn signed_in_login() -> MockLoginService {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_authenticate()
        .returning(|credentials| Ok(Operator::new(credentials.username())));
    login_service
}

fn test_app(
    ledger: MockLedgerCommand,
    ledger_query: MockLedgerQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = mock_state(signed_in_login(), ledger, ledger_query);
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(list_credits)
                .service(credit_totals)
                .service(add_credit)
                .service(view_credit)
                .service(add_credit_item)
                .service(pay_credit_item)
                .service(pay_credit)
                .service(delete_credit),
        )
}

async fn login_and_get_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let login_req = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: "annie".into(),
            password: "sari-sari".into(),
        })
        .to_request();
    let login_res = actix_test::call_service(app, login_req).await;
    assert!(login_res.status().is_success());
    session_cookie(&login_res).expect("session cookie")
}

#[rstest]
#[case(actix_test::TestRequest::get().uri("/api/v1/credits"))]
#[case(actix_test::TestRequest::get().uri("/api/v1/credits/1"))]
#[case(actix_test::TestRequest::post().uri("/api/v1/credits/1/pay"))]
#[case(actix_test::TestRequest::delete().uri("/api/v1/credits/1"))]
#[actix_web::test]
async fn ledger_requires_a_session(#[case] request: actix_test::TestRequest) {
    let mut ledger = MockLedgerCommand::new();
    ledger.expect_pay_entry().never();
    ledger.expect_delete_entry().never();
    let mut query = MockLedgerQuery::new();
    query.expect_list_entries().never();
    query.expect_view_entry().never();
    let app = actix_test::init_service(test_app(ledger, query)).await;

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["message"], "login required");
}

#[rstest]
#[case("/api/v1/credits", false)]
#[case("/api/v1/credits?q=%20%20", false)]
#[case("/api/v1/credits?q=an", true)]
#[actix_web::test]
async fn listing_searches_only_with_text(#[case] uri: &str, #[case] searched: bool) {
    let listing = LedgerListing {
        entries: vec![EntrySummary::from_items(
            entry(1, "Ana"),
            vec![item(1, 1, "250.00")],
        )],
        totals: LedgerTotals::default(),
    };
    let mut query = MockLedgerQuery::new();
    let for_search = listing.clone();
    query
        .expect_search_entries()
        .withf(|text| text.eq_ignore_ascii_case("an"))
        .times(usize::from(searched))
        .returning(move |_| Ok(for_search.clone()));
    query
        .expect_list_entries()
        .times(usize::from(!searched))
        .returning(move || Ok(listing.clone()));
    let app = actix_test::init_service(test_app(MockLedgerCommand::new(), query)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    let first = &value["entries"][0];
    assert_eq!(first["entry"]["customerName"], "Ana");
    assert_eq!(first["totalCost"], "250.00");
    assert_eq!(first["itemCount"], 1);
    assert_eq!(value["totals"]["all"], "0.00");
}

#[actix_web::test]
async fn totals_forward_the_search_text() {
    let mut query = MockLedgerQuery::new();
    query
        .expect_totals()
        .withf(|text| text.as_deref() == Some("ana"))
        .times(1)
        .returning(|_| {
            Ok(LedgerTotals {
                entry_count: 1,
                pending: Money::parse("100").expect("money"),
                paid: Money::parse("250").expect("money"),
                all: Money::parse("350").expect("money"),
            })
        });
    let app = actix_test::init_service(test_app(MockLedgerCommand::new(), query)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/credits/totals?q=ana")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value,
        json!({"entryCount": 1, "pending": "100.00", "paid": "250.00", "all": "350.00"})
    );
}

#[actix_web::test]
async fn adding_an_entry_returns_created_detail() {
    let mut ledger = MockLedgerCommand::new();
    ledger
        .expect_add_entry()
        .withf(|input| {
            input.customer_name == "Ana"
                && input.first_item.product == "Rice 5kg"
                && input.first_item.cost == "250"
                && input.first_item.quantity.is_none()
        })
        .times(1)
        .returning(|_| Ok(ana_detail()));
    let app = actix_test::init_service(test_app(ledger, MockLedgerQuery::new())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/credits")
            .cookie(cookie)
            .set_json(json!({
                "customerName": "Ana",
                "estimatedPaymentDate": "2025-02-15",
                "product": "Rice 5kg",
                "cost": 250
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/api/v1/credits/1")
    );
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["entry"]["status"], "pending");
    assert_eq!(value["total"], "250.00");
    assert_eq!(value["items"][0]["cost"], "250.00");
    assert_eq!(value["paidItems"], json!([]));
}

#[actix_web::test]
async fn validation_failures_are_bad_requests() {
    let mut ledger = MockLedgerCommand::new();
    ledger.expect_add_entry().returning(|_| {
        Err(Error::invalid_request("customer name must not be empty")
            .with_details(json!({"field": "customerName", "code": "empty_customer_name"})))
    });
    let app = actix_test::init_service(test_app(ledger, MockLedgerQuery::new())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/credits")
            .cookie(cookie)
            .set_json(json!({
                "customerName": " ",
                "estimatedPaymentDate": "2025-02-15",
                "product": "Rice 5kg",
                "cost": "250.00"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["field"], "customerName");
}

#[rstest]
#[case("/api/v1/credits/0", "id", "invalid_entry_id")]
#[case("/api/v1/credits/-3", "id", "invalid_entry_id")]
#[actix_web::test]
async fn non_positive_ids_are_rejected_before_the_ledger(
    #[case] uri: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut query = MockLedgerQuery::new();
    query.expect_view_entry().never();
    let app = actix_test::init_service(test_app(MockLedgerCommand::new(), query)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[actix_web::test]
async fn missing_entries_are_not_found() {
    let mut query = MockLedgerQuery::new();
    query
        .expect_view_entry()
        .returning(|id| Err(Error::not_found(format!("credit entry {id} not found"))));
    let app = actix_test::init_service(test_app(MockLedgerCommand::new(), query)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/credits/42")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "not_found");
}

#[actix_web::test]
async fn adding_an_item_returns_the_item() {
    let mut ledger = MockLedgerCommand::new();
    ledger
        .expect_add_item()
        .withf(|request| {
            request.entry_id.get() == 1
                && request.item.cost == "100.00"
                && request.item.quantity.as_deref() == Some("2")
        })
        .times(1)
        .returning(|_| Ok(item(2, 1, "100.00")));
    let app = actix_test::init_service(test_app(ledger, MockLedgerQuery::new())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/credits/1/items")
            .cookie(cookie)
            .set_json(json!({"product": "Oil", "cost": "100.00", "quantity": 2}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["id"], 2);
    assert_eq!(value["entryId"], 1);
}

#[rstest]
#[case(ItemPayment::NoMatch, json!({"settled": false}))]
#[case(
    ItemPayment::Paid {
        entry_state: EntryState::pending(),
        remaining_items: 1,
    },
    json!({"settled": true, "entryStatus": "pending", "remainingItems": 1})
)]
#[case(
    ItemPayment::Paid {
        entry_state: EntryState::pending().apply(LedgerEvent::OutstandingCleared, created_at()),
        remaining_items: 0,
    },
    json!({"settled": true, "entryStatus": "paid", "remainingItems": 0})
)]
#[actix_web::test]
async fn paying_an_item_reports_the_outcome(
    #[case] outcome: ItemPayment,
    #[case] expected: Value,
) {
    let mut ledger = MockLedgerCommand::new();
    ledger
        .expect_pay_item()
        .withf(|request| request.entry_id.get() == 1 && request.item_id.get() == 2)
        .times(1)
        .returning(move |_| Ok(outcome));
    let app = actix_test::init_service(test_app(ledger, MockLedgerQuery::new())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/credits/1/items/2/pay")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value, expected);
}

#[actix_web::test]
async fn settling_an_entry_has_no_body() {
    let mut ledger = MockLedgerCommand::new();
    ledger
        .expect_pay_entry()
        .withf(|id| id.get() == 3)
        .times(1)
        .returning(|_| Ok(EntryState::pending().apply(LedgerEvent::SettledInFull, created_at())));
    let app = actix_test::init_service(test_app(ledger, MockLedgerQuery::new())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/credits/3/pay")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn deleting_reports_surviving_counts() {
    let mut ledger = MockLedgerCommand::new();
    ledger
        .expect_delete_entry()
        .withf(|id| id.get() == 2)
        .times(1)
        .returning(|_| {
            Ok(CompactionReport {
                surviving_entries: 2,
                surviving_items: 5,
            })
        });
    let app = actix_test::init_service(test_app(ledger, MockLedgerQuery::new())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/credits/2")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value, json!({"survivingEntries": 2, "survivingItems": 5}));
}

#[actix_web::test]
async fn storage_failures_are_redacted() {
    let mut ledger = MockLedgerCommand::new();
    ledger
        .expect_delete_entry()
        .returning(|_| Err(Error::internal("ledger repository error: disk I/O error")));
    let app = actix_test::init_service(test_app(ledger, MockLedgerQuery::new())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/credits/2")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], serde_json::to_value(ErrorCode::InternalError).expect("code"));
    assert_eq!(value["message"], "Internal server error");
}
