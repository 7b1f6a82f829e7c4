//! In-memory store implementation for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{CartId, CartItemId, CategoryId, CustomerId, ProductId};
use domain::{
    Cart, CartError, CartItem, Category, CategoryUpdate, Customer, NewCategory, NewCustomer,
    NewProduct, Product, ProductUpdate, reconcile_add,
};

use crate::error::{Result, StoreError};
use crate::store::ShopStore;

/// In-memory store for testing and development.
///
/// All tables live behind a single async RwLock, so multi-row operations
/// such as [`ShopStore::add_cart_item`] are atomic for free: one write
/// guard covers the whole decide-and-apply sequence.
/// Not suitable for production use - data is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    categories: HashMap<CategoryId, Category>,
    products: HashMap<ProductId, Product>,
    carts: HashMap<CartId, Cart>,
    cart_items: HashMap<CartItemId, CartItem>,
    customers: HashMap<CustomerId, Customer>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShopStore for InMemoryStore {
    async fn create_category(&self, input: NewCategory) -> Result<Category> {
        let category = Category::create(input)?;
        let mut tables = self.inner.write().await;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, category_id: CategoryId) -> Result<Category> {
        let tables = self.inner.read().await;
        tables
            .categories
            .get(&category_id)
            .cloned()
            .ok_or(StoreError::CategoryNotFound(category_id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let tables = self.inner.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by_key(|c| (c.created_at, c.id));
        Ok(categories)
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category> {
        let mut tables = self.inner.write().await;
        let category = tables
            .categories
            .get_mut(&category_id)
            .ok_or(StoreError::CategoryNotFound(category_id))?;
        category.apply_update(&update)?;
        Ok(category.clone())
    }

    async fn delete_category(&self, category_id: CategoryId) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables.categories.remove(&category_id).is_none() {
            return Err(StoreError::CategoryNotFound(category_id));
        }

        // Cascade: products of the category, then lines referencing them.
        let removed: Vec<ProductId> = tables
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .map(|p| p.id)
            .collect();
        for product_id in removed {
            tables.products.remove(&product_id);
            tables
                .cart_items
                .retain(|_, item| item.product_id != product_id);
        }
        Ok(())
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product> {
        let mut tables = self.inner.write().await;
        if !tables.categories.contains_key(&input.category_id) {
            return Err(StoreError::CategoryNotFound(input.category_id));
        }
        let product = Product::create(input)?;
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let tables = self.inner.read().await;
        tables
            .products
            .get(&product_id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(product_id))
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let tables = self.inner.read().await;
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by_key(|p| (p.category_id, p.id));
        Ok(products)
    }

    async fn update_product(
        &self,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product> {
        let mut tables = self.inner.write().await;
        if let Some(category_id) = update.category_id
            && !tables.categories.contains_key(&category_id)
        {
            return Err(StoreError::CategoryNotFound(category_id));
        }
        let product = tables
            .products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;
        product.apply_update(&update)?;
        Ok(product.clone())
    }

    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables.products.remove(&product_id).is_none() {
            return Err(StoreError::ProductNotFound(product_id));
        }
        tables
            .cart_items
            .retain(|_, item| item.product_id != product_id);
        Ok(())
    }

    async fn create_cart(&self) -> Result<Cart> {
        let mut tables = self.inner.write().await;
        if let Some(active) = tables.carts.values().find(|c| !c.completed) {
            return Err(CartError::CartInProgress { cart_id: active.id }.into());
        }
        let cart = Cart::new();
        tables.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn get_cart(&self, cart_id: CartId) -> Result<Cart> {
        let tables = self.inner.read().await;
        tables
            .carts
            .get(&cart_id)
            .cloned()
            .ok_or(StoreError::CartNotFound(cart_id))
    }

    async fn list_carts(&self) -> Result<Vec<Cart>> {
        let tables = self.inner.read().await;
        let mut carts: Vec<Cart> = tables.carts.values().cloned().collect();
        carts.sort_by_key(|c| (c.created_at, c.id));
        Ok(carts)
    }

    async fn active_cart(&self) -> Result<Option<Cart>> {
        let tables = self.inner.read().await;
        Ok(tables.carts.values().find(|c| !c.completed).cloned())
    }

    async fn set_cart_completed(&self, cart_id: CartId, completed: bool) -> Result<Cart> {
        let mut tables = self.inner.write().await;
        let cart = tables
            .carts
            .get_mut(&cart_id)
            .ok_or(StoreError::CartNotFound(cart_id))?;
        cart.set_completed(completed)?;
        Ok(cart.clone())
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

        let mut tables = self.inner.write().await;

        let product = tables
            .products
            .get(&product_id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(product_id))?;
        let cart = tables
            .carts
            .get(&cart_id)
            .cloned()
            .ok_or(StoreError::CartNotFound(cart_id))?;
        let existing = tables
            .cart_items
            .values()
            .find(|item| item.cart_id == cart_id && item.product_id == product_id)
            .cloned();

        let outcome = reconcile_add(&cart, &product, existing.as_ref(), quantity)?;

        if let Some(stored) = tables.products.get_mut(&product_id) {
            stored.current_stock = outcome.reservation.stock_after;
        }
        let item = outcome.change.applied();
        tables.cart_items.insert(item.id, item.clone());

        Ok(item)
    }

    async fn cart_items(&self, cart_id: CartId) -> Result<Vec<(CartItem, Product)>> {
        let tables = self.inner.read().await;
        if !tables.carts.contains_key(&cart_id) {
            return Err(StoreError::CartNotFound(cart_id));
        }

        let mut items: Vec<CartItem> = tables
            .cart_items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = tables
                .products
                .get(&item.product_id)
                .cloned()
                .ok_or(StoreError::ProductNotFound(item.product_id))?;
            lines.push((item, product));
        }
        Ok(lines)
    }

    async fn create_customer(&self, input: NewCustomer) -> Result<Customer> {
        let customer = Customer::create(input)?;
        let mut tables = self.inner.write().await;
        if !tables.carts.contains_key(&customer.cart_id) {
            return Err(StoreError::CartNotFound(customer.cart_id));
        }
        tables.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, customer_id: CustomerId) -> Result<Customer> {
        let tables = self.inner.read().await;
        tables
            .customers
            .get(&customer_id)
            .cloned()
            .ok_or(StoreError::CustomerNotFound(customer_id))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let tables = self.inner.read().await;
        let mut customers: Vec<Customer> = tables.customers.values().cloned().collect();
        customers.sort_by(|a, b| (&a.surname, &a.name).cmp(&(&b.surname, &b.name)));
        Ok(customers)
    }
}
