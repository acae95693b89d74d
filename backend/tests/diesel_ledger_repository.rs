//! Integration tests for `DieselLedgerRepository` against a temporary SQLite
//! database.
//!
//! Each test opens a fresh database file, so migrations, identifier
//! sequences, and compaction run against real SQLite.

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use utang::domain::ports::{LedgerRecord, LedgerRepository};
use utang::domain::{
    CreditEntryInput, CreditItemInput, EntryFilter, EntryId, ItemId, ItemPayment, Money,
    NewCreditEntry, NewCreditItem, PaymentStatus,
};
use utang::outbound::persistence::{DbPool, DieselLedgerRepository, PoolConfig};

struct TestLedger {
    _dir: TempDir,
    pool: DbPool,
    repository: DieselLedgerRepository,
}

#[fixture]
fn ledger() -> TestLedger {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ledger.db");
    let pool = DbPool::new(PoolConfig::new(path.to_string_lossy()).with_max_size(2))
        .expect("pool builds");
    TestLedger {
        _dir: dir,
        repository: DieselLedgerRepository::new(pool.clone()),
        pool,
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn item_input(product: &str, cost: &str) -> CreditItemInput {
    CreditItemInput {
        product: product.to_owned(),
        cost: cost.to_owned(),
        quantity: None,
        unit_price: None,
    }
}

fn new_entry(customer: &str, product: &str, cost: &str) -> NewCreditEntry {
    NewCreditEntry::try_from(CreditEntryInput {
        customer_name: customer.to_owned(),
        phone_number: None,
        estimated_payment_date: "2025-02-15".to_owned(),
        first_item: item_input(product, cost),
    })
    .expect("valid entry")
}

fn new_item(product: &str, cost: &str) -> NewCreditItem {
    NewCreditItem::try_from(item_input(product, cost)).expect("valid item")
}

fn entry_id(raw: i32) -> EntryId {
    EntryId::new(raw).expect("positive id")
}

fn item_id(raw: i32) -> ItemId {
    ItemId::new(raw).expect("positive id")
}

fn money(raw: &str) -> Money {
    Money::parse(raw).expect("valid amount")
}

fn pending_total(record: &LedgerRecord) -> Money {
    record
        .items
        .iter()
        .filter(|item| item.is_outstanding())
        .map(|item| item.cost)
        .sum()
}

async fn seed(ledger: &TestLedger, customers: &[&str]) -> Vec<LedgerRecord> {
    let mut records = Vec::new();
    for (offset, customer) in (0_i64..).zip(customers) {
        let record = ledger
            .repository
            .create_entry(
                &new_entry(customer, "Rice 5kg", "250.00"),
                base_time() + Duration::minutes(offset),
            )
            .await
            .expect("entry created");
        records.push(record);
    }
    records
}

#[rstest]
#[tokio::test]
async fn create_entry_stores_the_first_item(ledger: TestLedger) {
    let record = ledger
        .repository
        .create_entry(&new_entry("Ana", "Rice 5kg", "250.00"), base_time())
        .await
        .expect("entry created");

    assert_eq!(record.entry.id.get(), 1);
    assert_eq!(record.entry.customer_name, "Ana");
    assert_eq!(record.entry.state.status(), PaymentStatus::Pending);
    assert_eq!(record.items.len(), 1);
    assert_eq!(record.items[0].cost, money("250.00"));
    assert_eq!(record.items[0].quantity.get(), 1);

    let listed = ledger
        .repository
        .load_ledger(&EntryFilter::all())
        .await
        .expect("ledger loads");
    assert_eq!(listed, vec![record]);
}

#[rstest]
#[tokio::test]
async fn adding_items_accumulates_the_entry_total(ledger: TestLedger) {
    seed(&ledger, &["Ana"]).await;

    ledger
        .repository
        .add_item(entry_id(1), &new_item("Cooking oil", "100.00"), base_time())
        .await
        .expect("item stored")
        .expect("entry exists");

    let record = ledger
        .repository
        .find_entry(entry_id(1))
        .await
        .expect("entry loads")
        .expect("entry exists");
    assert_eq!(record.items.len(), 2);
    assert_eq!(pending_total(&record), money("350.00"));
}

#[rstest]
#[tokio::test]
async fn paying_every_item_settles_the_entry(ledger: TestLedger) {
    seed(&ledger, &["Ana"]).await;
    ledger
        .repository
        .add_item(entry_id(1), &new_item("Cooking oil", "100.00"), base_time())
        .await
        .expect("item stored");
    let paid_at = base_time() + Duration::hours(3);

    let first = ledger
        .repository
        .pay_item(entry_id(1), item_id(1), paid_at)
        .await
        .expect("payment runs");
    let ItemPayment::Paid {
        entry_state,
        remaining_items,
    } = first
    else {
        panic!("expected the first item to be paid");
    };
    assert_eq!(remaining_items, 1);
    assert!(!entry_state.is_paid());

    let second = ledger
        .repository
        .pay_item(entry_id(1), item_id(2), paid_at)
        .await
        .expect("payment runs");
    let ItemPayment::Paid {
        entry_state,
        remaining_items,
    } = second
    else {
        panic!("expected the second item to be paid");
    };
    assert_eq!(remaining_items, 0);
    assert!(entry_state.is_paid());
    assert_eq!(entry_state.paid_at(), Some(paid_at));

    let record = ledger
        .repository
        .find_entry(entry_id(1))
        .await
        .expect("entry loads")
        .expect("entry exists");
    assert_eq!(record.entry.state.status(), PaymentStatus::Paid);
    assert_eq!(pending_total(&record), Money::ZERO);
    assert!(record.items.iter().all(|item| item.paid_at == Some(paid_at)));
}

#[rstest]
#[tokio::test]
async fn paying_an_item_twice_is_a_no_match(ledger: TestLedger) {
    seed(&ledger, &["Ana"]).await;
    let at = base_time();

    ledger
        .repository
        .pay_item(entry_id(1), item_id(1), at)
        .await
        .expect("payment runs");
    let repeat = ledger
        .repository
        .pay_item(entry_id(1), item_id(1), at)
        .await
        .expect("payment runs");

    assert_eq!(repeat, ItemPayment::NoMatch);
}

#[rstest]
#[tokio::test]
async fn paying_an_item_of_another_entry_changes_nothing(ledger: TestLedger) {
    seed(&ledger, &["Ana", "Ben"]).await;

    let outcome = ledger
        .repository
        .pay_item(entry_id(1), item_id(2), base_time())
        .await
        .expect("payment runs");

    assert_eq!(outcome, ItemPayment::NoMatch);
    let ben = ledger
        .repository
        .find_entry(entry_id(2))
        .await
        .expect("entry loads")
        .expect("entry exists");
    assert!(ben.items[0].is_outstanding());
}

#[rstest]
#[tokio::test]
async fn adding_an_item_reopens_a_paid_entry(ledger: TestLedger) {
    seed(&ledger, &["Ana"]).await;
    let state = ledger
        .repository
        .pay_entry(entry_id(1), base_time())
        .await
        .expect("payment runs")
        .expect("entry exists");
    assert!(state.is_paid());

    ledger
        .repository
        .add_item(entry_id(1), &new_item("Sardines", "45.50"), base_time())
        .await
        .expect("item stored")
        .expect("entry exists");

    let record = ledger
        .repository
        .find_entry(entry_id(1))
        .await
        .expect("entry loads")
        .expect("entry exists");
    assert_eq!(record.entry.state.status(), PaymentStatus::Pending);
    assert_eq!(record.entry.state.paid_at(), None);
}

#[rstest]
#[tokio::test]
async fn deleting_compacts_identifiers_in_creation_order(ledger: TestLedger) {
    seed(&ledger, &["Ana", "Ben", "Carla"]).await;
    ledger
        .repository
        .add_item(entry_id(3), &new_item("Soap", "38.00"), base_time())
        .await
        .expect("item stored");

    let report = ledger
        .repository
        .delete_entry(entry_id(2))
        .await
        .expect("delete runs")
        .expect("entry existed");
    assert_eq!(report.surviving_entries, 2);
    assert_eq!(report.surviving_items, 3);

    let mut records = ledger
        .repository
        .load_ledger(&EntryFilter::all())
        .await
        .expect("ledger loads");
    records.sort_by_key(|record| record.entry.id);
    let names: Vec<_> = records
        .iter()
        .map(|record| (record.entry.id.get(), record.entry.customer_name.as_str()))
        .collect();
    assert_eq!(names, vec![(1, "Ana"), (2, "Carla")]);

    let carla = &records[1];
    let mut carla_items: Vec<_> = carla.items.iter().map(|item| item.id.get()).collect();
    carla_items.sort_unstable();
    assert_eq!(carla_items, vec![2, 3]);
    assert!(carla.items.iter().all(|item| item.entry_id == entry_id(2)));

    let next = ledger
        .repository
        .create_entry(&new_entry("Dodong", "Eggs", "90.00"), base_time())
        .await
        .expect("entry created");
    assert_eq!(next.entry.id.get(), 3);
    assert_eq!(next.items[0].id.get(), 4);
}

#[rstest]
#[tokio::test]
async fn compaction_numbers_by_creation_time_not_old_id(ledger: TestLedger) {
    for (customer, minutes) in [("Alma", 10), ("Berto", 0), ("Celia", 5), ("Dado", 20)] {
        ledger
            .repository
            .create_entry(
                &new_entry(customer, &format!("{customer} groceries"), "100.00"),
                base_time() + Duration::minutes(minutes),
            )
            .await
            .expect("entry created");
    }

    ledger
        .repository
        .delete_entry(entry_id(4))
        .await
        .expect("delete runs")
        .expect("entry existed");

    let mut records = ledger
        .repository
        .load_ledger(&EntryFilter::all())
        .await
        .expect("ledger loads");
    records.sort_by_key(|record| record.entry.id);
    let renumbered: Vec<_> = records
        .iter()
        .map(|record| {
            (
                record.entry.id.get(),
                record.entry.customer_name.as_str(),
                record.items[0].id.get(),
                record.items[0].product.as_str(),
            )
        })
        .collect();
    assert_eq!(
        renumbered,
        vec![
            (1, "Berto", 1, "Berto groceries"),
            (2, "Celia", 2, "Celia groceries"),
            (3, "Alma", 3, "Alma groceries"),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn failed_compaction_leaves_the_ledger_intact(ledger: TestLedger) {
    seed(&ledger, &["Ana", "Ben", "Carla"]).await;
    ledger
        .pool
        .get()
        .expect("connection")
        .batch_execute("CREATE TABLE credit_items_shadow (id INTEGER PRIMARY KEY)")
        .expect("colliding table created");

    let outcome = ledger.repository.delete_entry(entry_id(2)).await;

    assert!(outcome.is_err(), "compaction should fail: {outcome:?}");
    let records = ledger
        .repository
        .load_ledger(&EntryFilter::all())
        .await
        .expect("ledger still loads");
    let survivors: Vec<_> = records
        .iter()
        .map(|record| {
            (
                record.entry.id.get(),
                record.entry.customer_name.as_str(),
                record.items.len(),
            )
        })
        .collect();
    assert_eq!(survivors, vec![(3, "Carla", 1), (2, "Ben", 1), (1, "Ana", 1)]);
    let ben = ledger
        .repository
        .find_entry(entry_id(2))
        .await
        .expect("entry loads")
        .expect("deleted entry restored by rollback");
    assert_eq!(ben.items[0].id, item_id(2));
}

#[rstest]
#[tokio::test]
async fn missing_entries_are_reported_as_absent(ledger: TestLedger) {
    seed(&ledger, &["Ana"]).await;
    let missing = entry_id(42);

    assert!(
        ledger
            .repository
            .add_item(missing, &new_item("Soap", "38.00"), base_time())
            .await
            .expect("query runs")
            .is_none()
    );
    assert!(
        ledger
            .repository
            .pay_entry(missing, base_time())
            .await
            .expect("query runs")
            .is_none()
    );
    assert!(
        ledger
            .repository
            .delete_entry(missing)
            .await
            .expect("query runs")
            .is_none()
    );
    assert!(
        ledger
            .repository
            .find_entry(missing)
            .await
            .expect("query runs")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn search_matches_customer_names_without_case(ledger: TestLedger) {
    seed(&ledger, &["Ana", "Ben", "DIANA"]).await;

    let records = ledger
        .repository
        .load_ledger(&EntryFilter::customer("an"))
        .await
        .expect("ledger loads");

    let names: Vec<_> = records
        .iter()
        .map(|record| record.entry.customer_name.as_str())
        .collect();
    assert_eq!(names, vec!["DIANA", "Ana"]);
    assert!(records.iter().all(|record| record.items.len() == 1));
}

#[rstest]
#[tokio::test]
async fn listings_are_newest_first(ledger: TestLedger) {
    seed(&ledger, &["Ana", "Ben", "Carla"]).await;

    let records = ledger
        .repository
        .load_ledger(&EntryFilter::all())
        .await
        .expect("ledger loads");

    let ids: Vec<_> = records.iter().map(|record| record.entry.id.get()).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}
