//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency. The
//! database allows a single active cart at a time, so every test runs
//! under `#[serial]`. Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use common::{CartId, CategoryId, ProductId};
use domain::{
    CartError, Category, CategoryUpdate, NewCategory, NewCustomer, NewProduct, ProductUpdate,
};
use store::{PostgresStore, ShopStore, ShopStoreExt, StoreError};

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            // Run migrations using raw_sql to execute multiple statements
            sqlx::raw_sql(include_str!("../../../migrations/001_create_store.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    // Create a fresh pool for each test to avoid connection issues
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE customers, cart_items, carts, products, categories")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

async fn seed_category(store: &PostgresStore, name: &str) -> Category {
    store
        .create_category(NewCategory {
            name: name.to_string(),
        })
        .await
        .unwrap()
}

fn product_input(category_id: CategoryId, price: &str, initial_stock: i32) -> NewProduct {
    NewProduct {
        category_id,
        main_colour: "black".to_string(),
        second_colour: "white".to_string(),
        logo_colour: Some("red".to_string()),
        brand: "Nike".to_string(),
        url_img: "https://example.com/cap.png".to_string(),
        price: Decimal::from_str(price).unwrap(),
        initial_stock,
        description: "Black cap with a red logo".to_string(),
        size: None,
        sizing: None,
        fabric: None,
        sleeve: None,
    }
}

#[tokio::test]
#[serial]
async fn category_crud_roundtrip() {
    let store = get_test_store().await;

    let category = seed_category(&store, "caps").await;
    let fetched = store.get_category(category.id).await.unwrap();
    assert_eq!(fetched.id, category.id);
    assert_eq!(fetched.name.as_str(), "caps");

    let renamed = store
        .update_category(
            category.id,
            CategoryUpdate {
                name: Some("tshirts".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name.as_str(), "tshirts");
    assert!(renamed.updated_at >= renamed.created_at);

    store.delete_category(category.id).await.unwrap();
    let err = store.get_category(category.id).await.unwrap_err();
    assert!(matches!(err, StoreError::CategoryNotFound(id) if id == category.id));
}

#[tokio::test]
#[serial]
async fn product_roundtrip_and_partial_update() {
    let store = get_test_store().await;
    let category = seed_category(&store, "caps").await;

    let product = store
        .create_product(product_input(category.id, "18.80", 8))
        .await
        .unwrap();
    assert_eq!(product.current_stock, 8);

    let fetched = store.get_product(product.id).await.unwrap();
    assert_eq!(fetched.price.to_string(), "18.80");
    assert_eq!(fetched.brand, "Nike");
    assert_eq!(fetched.logo_colour, product.logo_colour);

    let update = ProductUpdate {
        price: Some(Decimal::from_str("21.00").unwrap()),
        description: Some("Restyled cap".to_string()),
        ..ProductUpdate::default()
    };
    let updated = store.update_product(product.id, update).await.unwrap();
    assert_eq!(updated.price.to_string(), "21.00");
    assert_eq!(updated.description, "Restyled cap");
    assert_eq!(updated.initial_stock, 8);
    assert_eq!(updated.current_stock, 8);

    store.delete_product(product.id).await.unwrap();
    let err = store.get_product(product.id).await.unwrap_err();
    assert!(matches!(err, StoreError::ProductNotFound(_)));
}

#[tokio::test]
#[serial]
async fn product_requires_existing_category() {
    let store = get_test_store().await;
    let missing = CategoryId::new();

    let err = store
        .create_product(product_input(missing, "12.00", 4))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CategoryNotFound(id) if id == missing));
}

#[tokio::test]
#[serial]
async fn stock_updates_stay_inside_the_window() {
    let store = get_test_store().await;
    let category = seed_category(&store, "caps").await;
    let product = store
        .create_product(product_input(category.id, "10.00", 5))
        .await
        .unwrap();

    let err = store
        .update_product(
            product.id,
            ProductUpdate {
                current_stock: Some(6),
                ..ProductUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(v) if v.field == "current_stock"));

    let unchanged = store.get_product(product.id).await.unwrap();
    assert_eq!(unchanged.current_stock, 5);
}

#[tokio::test]
#[serial]
async fn only_one_cart_may_be_open() {
    let store = get_test_store().await;

    let cart = store.create_cart().await.unwrap();
    let err = store.create_cart().await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Cart(CartError::CartInProgress { cart_id }) if cart_id == cart.id
    ));

    store.set_cart_completed(cart.id, true).await.unwrap();
    store.create_cart().await.unwrap();
}

#[tokio::test]
#[serial]
async fn adding_items_reserves_only_the_new_units() {
    let store = get_test_store().await;
    let category = seed_category(&store, "caps").await;
    let product = store
        .create_product(product_input(category.id, "4.70", 8))
        .await
        .unwrap();
    let cart = store.create_cart().await.unwrap();

    let first = store.add_cart_item(cart.id, product.id, 2).await.unwrap();
    assert_eq!(first.quantity, 2);
    assert_eq!(store.get_product(product.id).await.unwrap().current_stock, 6);

    let merged = store.add_cart_item(cart.id, product.id, 3).await.unwrap();
    assert_eq!(merged.id, first.id);
    assert_eq!(merged.quantity, 5);
    assert_eq!(store.get_product(product.id).await.unwrap().current_stock, 3);

    let err = store.add_cart_item(cart.id, product.id, 10).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Cart(CartError::InsufficientStock {
            requested: 10,
            available: 3,
            ..
        })
    ));

    // The failed add rolled back: line and stock are untouched.
    let lines = store.cart_items(cart.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0.quantity, 5);
    assert_eq!(store.get_product(product.id).await.unwrap().current_stock, 3);
}

#[tokio::test]
#[serial]
async fn a_completed_cart_rejects_changes() {
    let store = get_test_store().await;
    let category = seed_category(&store, "caps").await;
    let product = store
        .create_product(product_input(category.id, "4.70", 8))
        .await
        .unwrap();
    let cart = store.create_cart().await.unwrap();
    store.set_cart_completed(cart.id, true).await.unwrap();

    let err = store.add_cart_item(cart.id, product.id, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::Cart(CartError::CartClosed { .. })));

    // Completing twice is idempotent, reopening is not allowed.
    store.set_cart_completed(cart.id, true).await.unwrap();
    let err = store.set_cart_completed(cart.id, false).await.unwrap_err();
    assert!(matches!(err, StoreError::Cart(CartError::CartClosed { .. })));
}

#[tokio::test]
#[serial]
async fn a_nonsense_quantity_beats_nonsense_ids() {
    let store = get_test_store().await;

    let err = store
        .add_cart_item(CartId::new(), ProductId::new(), 0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Cart(CartError::InvalidQuantity { quantity: 0 })
    ));
}

#[tokio::test]
#[serial]
async fn deleting_a_product_removes_its_cart_lines() {
    let store = get_test_store().await;
    let category = seed_category(&store, "caps").await;
    let product = store
        .create_product(product_input(category.id, "4.70", 8))
        .await
        .unwrap();
    let cart = store.create_cart().await.unwrap();
    store.add_cart_item(cart.id, product.id, 2).await.unwrap();

    store.delete_product(product.id).await.unwrap();

    let lines = store.cart_items(cart.id).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
#[serial]
async fn concurrent_adds_serialize_on_the_product_row() {
    let store = get_test_store().await;
    let category = seed_category(&store, "caps").await;
    let product = store
        .create_product(product_input(category.id, "4.70", 8))
        .await
        .unwrap();
    let cart = store.create_cart().await.unwrap();

    let (a, b) = tokio::join!(
        store.add_cart_item(cart.id, product.id, 2),
        store.add_cart_item(cart.id, product.id, 3),
    );
    a.unwrap();
    b.unwrap();

    // Both adds landed on the same line and neither double-spent stock.
    let lines = store.cart_items(cart.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0.quantity, 5);
    assert_eq!(store.get_product(product.id).await.unwrap().current_stock, 3);
}

#[tokio::test]
#[serial]
async fn a_customer_checks_out_a_real_cart() {
    let store = get_test_store().await;
    let cart = store.create_cart().await.unwrap();

    let err = store
        .create_customer(NewCustomer {
            cart: CartId::new(),
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            address: "12 Analytical Lane".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+34600000000".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CartNotFound(_)));

    let customer = store
        .create_customer(NewCustomer {
            cart: cart.id,
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            address: "12 Analytical Lane".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+34600000000".to_string(),
        })
        .await
        .unwrap();

    let fetched = store.get_customer(customer.id).await.unwrap();
    assert_eq!(fetched.cart_id, cart.id);
    assert_eq!(fetched.email, "ada@example.com");
}

#[tokio::test]
#[serial]
async fn load_cart_reprices_lines_at_read_time() {
    let store = get_test_store().await;
    let category = seed_category(&store, "tshirts").await;
    let product = store
        .create_product(product_input(category.id, "4.70", 8))
        .await
        .unwrap();
    let cart = store.create_cart().await.unwrap();
    store.add_cart_item(cart.id, product.id, 2).await.unwrap();

    let loaded = store.load_cart(cart.id).await.unwrap();
    assert_eq!(loaded.total.to_string(), "9.40");

    store
        .update_product(
            product.id,
            ProductUpdate {
                price: Some(Decimal::from_str("3.00").unwrap()),
                ..ProductUpdate::default()
            },
        )
        .await
        .unwrap();

    let reloaded = store.load_cart(cart.id).await.unwrap();
    assert_eq!(reloaded.total.to_string(), "6.00");
}
