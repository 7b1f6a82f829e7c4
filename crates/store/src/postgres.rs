//! PostgreSQL store implementation.

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use uuid::Uuid;

use common::{CartId, CartItemId, CategoryId, CustomerId, ProductId};
use domain::{
    Cart, CartError, CartItem, Category, CategoryUpdate, Customer, LineChange, NewCategory,
    NewCustomer, NewProduct, Price, Product, ProductUpdate, UnknownVariant, reconcile_add,
};

use crate::error::{Result, StoreError};
use crate::store::ShopStore;

/// PostgreSQL store for production use.
///
/// Multi-row writes run in a transaction. `add_cart_item` locks the
/// product, cart, and line rows with `SELECT ... FOR UPDATE`, so
/// concurrent adds serialize instead of double-spending stock.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the given database URL and wraps the pool in a store.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Runs database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        tracing::info!("running database migrations");
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ShopStore for PostgresStore {
    async fn create_category(&self, input: NewCategory) -> Result<Category> {
        let category = Category::create(input)?;
        sqlx::query(
            "INSERT INTO categories (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(category.id.as_uuid())
        .bind(category.name.as_str())
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(category)
    }

    async fn get_category(&self, category_id: CategoryId) -> Result<Category> {
        let row =
            sqlx::query("SELECT id, name, created_at, updated_at FROM categories WHERE id = $1")
                .bind(category_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => row_to_category(row),
            None => Err(StoreError::CategoryNotFound(category_id)),
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM categories ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_category).collect()
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1 FOR UPDATE",
        )
        .bind(category_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        let mut category = match row {
            Some(row) => row_to_category(row)?,
            None => return Err(StoreError::CategoryNotFound(category_id)),
        };

        category.apply_update(&update)?;

        sqlx::query("UPDATE categories SET name = $2, updated_at = $3 WHERE id = $1")
            .bind(category_id.as_uuid())
            .bind(category.name.as_str())
            .bind(category.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    async fn delete_category(&self, category_id: CategoryId) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::CategoryNotFound(category_id));
        }
        Ok(())
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product> {
        let product = Product::create(input)?;
        sqlx::query(
            r#"
            INSERT INTO products (
                id, category_id, main_colour, second_colour, logo_colour, brand,
                inclusion_date, url_img, price, initial_stock, current_stock,
                description, size, sizing, fabric, sleeve
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.category_id.as_uuid())
        .bind(product.main_colour.as_str())
        .bind(product.second_colour.as_str())
        .bind(product.logo_colour.map(|c| c.as_str()))
        .bind(&product.brand)
        .bind(product.inclusion_date)
        .bind(&product.url_img)
        .bind(product.price.amount())
        .bind(product.initial_stock)
        .bind(product.current_stock)
        .bind(&product.description)
        .bind(product.size.map(|s| s.as_str()))
        .bind(product.sizing.map(|s| s.as_str()))
        .bind(product.fabric.map(|f| f.as_str()))
        .bind(product.sleeve)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violates(&e, "products_category_fk") {
                return StoreError::CategoryNotFound(product.category_id);
            }
            StoreError::Database(e)
        })?;
        Ok(product)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let row = sqlx::query(
            r#"
            SELECT id, category_id, main_colour, second_colour, logo_colour, brand,
                   inclusion_date, url_img, price, initial_stock, current_stock,
                   description, size, sizing, fabric, sleeve
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => row_to_product(row),
            None => Err(StoreError::ProductNotFound(product_id)),
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category_id, main_colour, second_colour, logo_colour, brand,
                   inclusion_date, url_img, price, initial_stock, current_stock,
                   description, size, sizing, fabric, sleeve
            FROM products
            ORDER BY category_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_product).collect()
    }

    async fn update_product(
        &self,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, category_id, main_colour, second_colour, logo_colour, brand,
                   inclusion_date, url_img, price, initial_stock, current_stock,
                   description, size, sizing, fabric, sleeve
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        let mut product = match row {
            Some(row) => row_to_product(row)?,
            None => return Err(StoreError::ProductNotFound(product_id)),
        };

        product.apply_update(&update)?;

        sqlx::query(
            r#"
            UPDATE products
            SET category_id = $2, main_colour = $3, second_colour = $4, logo_colour = $5,
                brand = $6, url_img = $7, price = $8, current_stock = $9, description = $10,
                size = $11, sizing = $12, fabric = $13, sleeve = $14
            WHERE id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(product.category_id.as_uuid())
        .bind(product.main_colour.as_str())
        .bind(product.second_colour.as_str())
        .bind(product.logo_colour.map(|c| c.as_str()))
        .bind(&product.brand)
        .bind(&product.url_img)
        .bind(product.price.amount())
        .bind(product.current_stock)
        .bind(&product.description)
        .bind(product.size.map(|s| s.as_str()))
        .bind(product.sizing.map(|s| s.as_str()))
        .bind(product.fabric.map(|f| f.as_str()))
        .bind(product.sleeve)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if violates(&e, "products_category_fk") {
                return StoreError::CategoryNotFound(product.category_id);
            }
            StoreError::Database(e)
        })?;

        tx.commit().await?;
        Ok(product)
    }

    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::ProductNotFound(product_id));
        }
        Ok(())
    }

    async fn create_cart(&self) -> Result<Cart> {
        // The partial unique index is the real guard; this pre-check only
        // exists to report the id of the cart that is still open.
        if let Some(active) = self.active_cart().await? {
            return Err(CartError::CartInProgress { cart_id: active.id }.into());
        }

        let cart = Cart::new();
        let inserted =
            sqlx::query("INSERT INTO carts (id, created_at, completed) VALUES ($1, $2, $3)")
                .bind(cart.id.as_uuid())
                .bind(cart.created_at)
                .bind(cart.completed)
                .execute(&self.pool)
                .await;

        match inserted {
            Ok(_) => Ok(cart),
            Err(e) if violates(&e, "one_active_cart") => {
                // Lost a race with another create; report whichever cart won.
                let winner = self.active_cart().await?.map(|c| c.id).unwrap_or(cart.id);
                tracing::debug!(cart_id = %winner, "cart creation lost the active-cart race");
                Err(CartError::CartInProgress { cart_id: winner }.into())
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn get_cart(&self, cart_id: CartId) -> Result<Cart> {
        let row = sqlx::query("SELECT id, created_at, completed FROM carts WHERE id = $1")
            .bind(cart_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => row_to_cart(row),
            None => Err(StoreError::CartNotFound(cart_id)),
        }
    }

    async fn list_carts(&self) -> Result<Vec<Cart>> {
        let rows =
            sqlx::query("SELECT id, created_at, completed FROM carts ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(row_to_cart).collect()
    }

    async fn active_cart(&self) -> Result<Option<Cart>> {
        let row = sqlx::query("SELECT id, created_at, completed FROM carts WHERE NOT completed")
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_cart).transpose()
    }

    async fn set_cart_completed(&self, cart_id: CartId, completed: bool) -> Result<Cart> {
        let mut tx = self.pool.begin().await?;

        let row =
            sqlx::query("SELECT id, created_at, completed FROM carts WHERE id = $1 FOR UPDATE")
                .bind(cart_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let mut cart = match row {
            Some(row) => row_to_cart(row)?,
            None => return Err(StoreError::CartNotFound(cart_id)),
        };

        cart.set_completed(completed)?;

        sqlx::query("UPDATE carts SET completed = $2 WHERE id = $1")
            .bind(cart_id.as_uuid())
            .bind(cart.completed)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(cart)
    }

    async fn add_cart_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem> {
        // Checked before the lookups so a nonsense quantity wins over a
        // nonsense id.
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity { quantity }.into());
        }

        let mut tx = self.pool.begin().await?;

        // Lock order is product, cart, line. Every writer takes the same
        // path, so concurrent adds cannot deadlock.
        let product_row = sqlx::query(
            r#"
            SELECT id, category_id, main_colour, second_colour, logo_colour, brand,
                   inclusion_date, url_img, price, initial_stock, current_stock,
                   description, size, sizing, fabric, sleeve
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        let product = match product_row {
            Some(row) => row_to_product(row)?,
            None => return Err(StoreError::ProductNotFound(product_id)),
        };

        let cart_row =
            sqlx::query("SELECT id, created_at, completed FROM carts WHERE id = $1 FOR UPDATE")
                .bind(cart_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        let cart = match cart_row {
            Some(row) => row_to_cart(row)?,
            None => return Err(StoreError::CartNotFound(cart_id)),
        };

        let existing_row = sqlx::query(
            r#"
            SELECT id, cart_id, product_id, quantity
            FROM cart_items
            WHERE cart_id = $1 AND product_id = $2
            FOR UPDATE
            "#,
        )
        .bind(cart_id.as_uuid())
        .bind(product_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        let existing = existing_row.map(row_to_cart_item).transpose()?;

        let outcome = reconcile_add(&cart, &product, existing.as_ref(), quantity)?;

        sqlx::query("UPDATE products SET current_stock = $2 WHERE id = $1")
            .bind(product_id.as_uuid())
            .bind(outcome.reservation.stock_after)
            .execute(&mut *tx)
            .await?;

        let item = outcome.change.applied();
        match outcome.change {
            LineChange::Create(_) => {
                sqlx::query(
                    r#"
                    INSERT INTO cart_items (id, cart_id, product_id, quantity)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(item.id.as_uuid())
                .bind(item.cart_id.as_uuid())
                .bind(item.product_id.as_uuid())
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;
            }
            LineChange::Merge { .. } => {
                sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
                    .bind(item.id.as_uuid())
                    .bind(item.quantity)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(item)
    }

    async fn cart_items(&self, cart_id: CartId) -> Result<Vec<(CartItem, Product)>> {
        // Distinguishes a missing cart from an empty one.
        let exists = sqlx::query("SELECT id FROM carts WHERE id = $1")
            .bind(cart_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::CartNotFound(cart_id));
        }

        let rows = sqlx::query(
            r#"
            SELECT ci.id AS item_id, ci.cart_id, ci.product_id, ci.quantity,
                   p.id, p.category_id, p.main_colour, p.second_colour, p.logo_colour,
                   p.brand, p.inclusion_date, p.url_img, p.price, p.initial_stock,
                   p.current_stock, p.description, p.size, p.sizing, p.fabric, p.sleeve
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id
            "#,
        )
        .bind(cart_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let item = CartItem {
                id: CartItemId::from_uuid(row.try_get::<Uuid, _>("item_id")?),
                cart_id: CartId::from_uuid(row.try_get::<Uuid, _>("cart_id")?),
                product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
                quantity: row.try_get("quantity")?,
            };
            let product = row_to_product(row)?;
            lines.push((item, product));
        }
        Ok(lines)
    }

    async fn create_customer(&self, input: NewCustomer) -> Result<Customer> {
        let customer = Customer::create(input)?;
        sqlx::query(
            r#"
            INSERT INTO customers (id, cart_id, name, surname, address, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(customer.cart_id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.surname)
        .bind(&customer.address)
        .bind(&customer.email)
        .bind(&customer.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if violates(&e, "customers_cart_fk") {
                return StoreError::CartNotFound(customer.cart_id);
            }
            StoreError::Database(e)
        })?;
        Ok(customer)
    }

    async fn get_customer(&self, customer_id: CustomerId) -> Result<Customer> {
        let row = sqlx::query(
            "SELECT id, cart_id, name, surname, address, email, phone FROM customers WHERE id = $1",
        )
        .bind(customer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => row_to_customer(row),
            None => Err(StoreError::CustomerNotFound(customer_id)),
        }
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT id, cart_id, name, surname, address, email, phone FROM customers ORDER BY surname, name",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_customer).collect()
    }
}

/// Returns true if the error is a violation of the named constraint.
fn violates(e: &sqlx::Error, constraint: &str) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        db_err.constraint() == Some(constraint)
    } else {
        false
    }
}

fn parse_column<T>(column: &'static str, value: &str) -> Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.parse().map_err(|e: UnknownVariant| StoreError::Decode {
        column,
        message: e.to_string(),
    })
}

fn parse_optional<T>(column: &'static str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.map(|v| parse_column(column, &v)).transpose()
}

fn row_to_category(row: PgRow) -> Result<Category> {
    let name: String = row.try_get("name")?;
    Ok(Category {
        id: CategoryId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: parse_column("name", &name)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_product(row: PgRow) -> Result<Product> {
    let main_colour: String = row.try_get("main_colour")?;
    let second_colour: String = row.try_get("second_colour")?;
    let logo_colour: Option<String> = row.try_get("logo_colour")?;
    let size: Option<String> = row.try_get("size")?;
    let sizing: Option<String> = row.try_get("sizing")?;
    let fabric: Option<String> = row.try_get("fabric")?;

    Ok(Product {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
        category_id: CategoryId::from_uuid(row.try_get::<Uuid, _>("category_id")?),
        main_colour: parse_column("main_colour", &main_colour)?,
        second_colour: parse_column("second_colour", &second_colour)?,
        logo_colour: parse_optional("logo_colour", logo_colour)?,
        brand: row.try_get("brand")?,
        inclusion_date: row.try_get("inclusion_date")?,
        url_img: row.try_get("url_img")?,
        price: Price::new(row.try_get::<Decimal, _>("price")?),
        initial_stock: row.try_get("initial_stock")?,
        current_stock: row.try_get("current_stock")?,
        description: row.try_get("description")?,
        size: parse_optional("size", size)?,
        sizing: parse_optional("sizing", sizing)?,
        fabric: parse_optional("fabric", fabric)?,
        sleeve: row.try_get("sleeve")?,
    })
}

fn row_to_cart(row: PgRow) -> Result<Cart> {
    Ok(Cart {
        id: CartId::from_uuid(row.try_get::<Uuid, _>("id")?),
        created_at: row.try_get("created_at")?,
        completed: row.try_get("completed")?,
    })
}

fn row_to_cart_item(row: PgRow) -> Result<CartItem> {
    Ok(CartItem {
        id: CartItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
        cart_id: CartId::from_uuid(row.try_get::<Uuid, _>("cart_id")?),
        product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
        quantity: row.try_get("quantity")?,
    })
}

fn row_to_customer(row: PgRow) -> Result<Customer> {
    Ok(Customer {
        id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
        cart_id: CartId::from_uuid(row.try_get::<Uuid, _>("cart_id")?),
        name: row.try_get("name")?,
        surname: row.try_get("surname")?,
        address: row.try_get("address")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
    })
}
