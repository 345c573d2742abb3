// tests/checkout_tests.rs
mod common; // Reference the common module

use common::{FailingNotifier, MemoryStore, RecordingNotifier};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use storefront::services::checkout_service::{checkout, CartEntry, Customer};

fn customer() -> Customer {
  Customer {
    id: Uuid::new_v4(),
    username: "carol".to_string(),
    email: "carol@example.com".to_string(),
  }
}

fn entry(product_id: Uuid, quantity: serde_json::Value) -> CartEntry {
  CartEntry { product_id, quantity }
}

#[tokio::test]
async fn successful_checkout_totals_and_decrements() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();
  // Product A price=10 stock=5, Product B price=20 stock=2
  let a = store.add_product("Product A", 10, 5);
  let b = store.add_product("Product B", 20, 2);
  let carol = customer();

  let cart = vec![entry(a, json!(2)), entry(b, json!(2))];
  let receipt = checkout(&store, &notifier, &carol, &cart).await.unwrap();

  assert_eq!(receipt.order.total_cents, 60);
  assert_eq!(receipt.order.user_id, carol.id);
  assert!(!receipt.order.is_paid);
  assert_eq!(store.stock_of(a), 3);
  assert_eq!(store.stock_of(b), 0);

  // Line items preserve cart order and snapshot the validation-time price
  assert_eq!(receipt.items.len(), 2);
  assert_eq!(receipt.items[0].product.id, a);
  assert_eq!(receipt.items[0].quantity, 2);
  assert_eq!(receipt.items[0].price_cents, 10);
  assert_eq!(receipt.items[1].product.id, b);
  assert_eq!(receipt.items[1].quantity, 2);
  assert_eq!(receipt.items[1].price_cents, 20);

  // Confirmation went to the customer's contact address
  let sent = notifier.sent.lock().unwrap();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].0, "carol@example.com");
  assert_eq!(sent[0].1, "Order Confirmation");
}

#[tokio::test]
async fn insufficient_stock_aborts_whole_cart() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();
  let a = store.add_product("Product A", 10, 5);
  let b = store.add_product("Product B", 20, 2);

  let cart = vec![entry(a, json!(2)), entry(b, json!(3))];
  let err = checkout(&store, &notifier, &customer(), &cart).await.unwrap_err();

  match err {
    storefront::errors::AppError::InsufficientStock {
      product_id,
      requested,
      available,
      ..
    } => {
      assert_eq!(product_id, b);
      assert_eq!(requested, 3);
      assert_eq!(available, 2);
    }
    other => panic!("expected InsufficientStock, got {:?}", other),
  }

  // Full abort: nothing was decremented, nothing was persisted or sent
  assert_eq!(store.stock_of(a), 5);
  assert_eq!(store.stock_of(b), 2);
  assert!(store.orders().is_empty());
  assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_product_aborts_without_side_effects() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();
  let a = store.add_product("Product A", 10, 5);
  let ghost = Uuid::new_v4();

  let cart = vec![entry(a, json!(1)), entry(ghost, json!(1))];
  let err = checkout(&store, &notifier, &customer(), &cart).await.unwrap_err();

  assert_eq!(err.kind(), "invalid_product");
  assert_eq!(store.stock_of(a), 5);
  assert!(store.orders().is_empty());
  assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_cart_is_rejected() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();

  let err = checkout(&store, &notifier, &customer(), &[]).await.unwrap_err();
  assert_eq!(err.kind(), "empty_cart");
}

#[tokio::test]
async fn invalid_quantity_aborts_before_any_lookup() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();
  let a = store.add_product("Product A", 10, 5);

  for bad_quantity in [json!(0), json!(-1), json!(1.5), json!("two")] {
    let cart = vec![entry(a, bad_quantity)];
    let err = checkout(&store, &notifier, &customer(), &cart).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_quantity");
  }
  assert_eq!(store.stock_of(a), 5);
  assert!(store.orders().is_empty());
}

#[tokio::test]
async fn string_quantities_are_accepted() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();
  let a = store.add_product("Product A", 10, 5);

  let cart = vec![entry(a, json!("3"))];
  let receipt = checkout(&store, &notifier, &customer(), &cart).await.unwrap();

  assert_eq!(receipt.order.total_cents, 30);
  assert_eq!(store.stock_of(a), 2);
}

#[tokio::test]
async fn duplicate_entries_cannot_oversell() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();
  let a = store.add_product("Product A", 10, 5);

  // Each entry passes the per-entry stock check (3 <= 5) but the combined
  // demand exceeds stock; the conditional decrement catches it at commit
  // and the whole cart rolls back.
  let cart = vec![entry(a, json!(3)), entry(a, json!(3))];
  let err = checkout(&store, &notifier, &customer(), &cart).await.unwrap_err();

  assert_eq!(err.kind(), "insufficient_stock");
  assert_eq!(store.stock_of(a), 5);
  assert!(store.orders().is_empty());
}

#[tokio::test]
async fn notification_failure_does_not_fail_checkout() {
  let store = MemoryStore::new();
  let a = store.add_product("Product A", 10, 5);
  let carol = customer();

  let cart = vec![entry(a, json!(2))];
  let receipt = checkout(&store, &FailingNotifier, &carol, &cart).await.unwrap();

  // The committed order stands even though the send blew up
  assert_eq!(receipt.order.total_cents, 20);
  assert_eq!(store.stock_of(a), 3);
  assert_eq!(store.orders().len(), 1);
}

#[tokio::test]
async fn line_item_prices_survive_later_catalog_edits() {
  let store = MemoryStore::new();
  let notifier = RecordingNotifier::default();
  let a = store.add_product("Product A", 10, 5);

  let cart = vec![entry(a, json!(1))];
  let receipt = checkout(&store, &notifier, &customer(), &cart).await.unwrap();

  store.set_price(a, 9999);

  let (order, items) = store.orders().pop().unwrap();
  assert_eq!(order.id, receipt.order.id);
  assert_eq!(order.total_cents, 10);
  assert_eq!(items[0].price_cents, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_never_oversell() {
  const N: usize = 8;

  let store = Arc::new(MemoryStore::new());
  let notifier = Arc::new(RecordingNotifier::default());
  let product = store.add_product("Contested", 10, (N - 1) as i32);

  let mut handles = Vec::with_capacity(N);
  for _ in 0..N {
    let store = Arc::clone(&store);
    let notifier = Arc::clone(&notifier);
    handles.push(tokio::spawn(async move {
      let cart = vec![CartEntry {
        product_id: product,
        quantity: json!(1),
      }];
      checkout(&*store, &*notifier, &customer(), &cart).await
    }));
  }

  let mut successes = 0usize;
  let mut shortfalls = 0usize;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => successes += 1,
      Err(err) => {
        assert_eq!(err.kind(), "insufficient_stock");
        shortfalls += 1;
      }
    }
  }

  assert_eq!(successes, N - 1);
  assert_eq!(shortfalls, 1);
  assert_eq!(store.stock_of(product), 0); // never negative
  assert_eq!(store.orders().len(), N - 1);
}
