use async_trait::async_trait;

use common::{CartId, CategoryId, CustomerId, ProductId};
use domain::{
    Cart, CartItem, Category, CategoryUpdate, Customer, NewCategory, NewCustomer, NewProduct,
    Price, Product, ProductUpdate, cart_total,
};

use crate::Result;

/// A cart loaded together with its line items and a fresh total.
#[derive(Debug, Clone)]
pub struct LoadedCart {
    /// The cart itself.
    pub cart: Cart,

    /// Line items paired with the product they reference.
    pub lines: Vec<(CartItem, Product)>,

    /// Total at current prices. Never persisted; recomputed on every load
    /// so price changes show up immediately.
    pub total: Price,
}

/// Core trait for store backends.
///
/// A store persists the catalog, the carts with their line items, and the
/// customers captured at checkout. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Creates a category from validated input.
    async fn create_category(&self, input: NewCategory) -> Result<Category>;

    /// Retrieves a category by id.
    async fn get_category(&self, category_id: CategoryId) -> Result<Category>;

    /// Lists all categories, oldest first.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Applies an update to a category.
    async fn update_category(
        &self,
        category_id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category>;

    /// Deletes a category and, transitively, its products.
    async fn delete_category(&self, category_id: CategoryId) -> Result<()>;

    /// Creates a product from validated input. The owning category must
    /// exist.
    async fn create_product(&self, input: NewProduct) -> Result<Product>;

    /// Retrieves a product by id.
    async fn get_product(&self, product_id: ProductId) -> Result<Product>;

    /// Lists all products, grouped by category.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Applies an update to a product.
    async fn update_product(
        &self,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product>;

    /// Deletes a product and any cart lines that reference it.
    async fn delete_product(&self, product_id: ProductId) -> Result<()>;

    /// Opens a new cart.
    ///
    /// Fails with `CartInProgress` while another cart is still active;
    /// at most one cart may be open at a time.
    async fn create_cart(&self) -> Result<Cart>;

    /// Retrieves a cart by id.
    async fn get_cart(&self, cart_id: CartId) -> Result<Cart>;

    /// Lists all carts, oldest first.
    async fn list_carts(&self) -> Result<Vec<Cart>>;

    /// Returns the active cart, if one exists.
    async fn active_cart(&self) -> Result<Option<Cart>>;

    /// Sets the completed flag, enforcing the one-way transition.
    ///
    /// Completing twice is an idempotent re-save; un-completing fails with
    /// `CartClosed`.
    async fn set_cart_completed(&self, cart_id: CartId, completed: bool) -> Result<Cart>;

    /// Adds `quantity` units of a product to a cart.
    ///
    /// Merges into the cart's existing line for the product if there is
    /// one, reserving only the newly requested units. The stock decrement
    /// and the line write are applied atomically - either both happen or
    /// neither does.
    ///
    /// Returns the line item as it exists after the add.
    async fn add_cart_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem>;

    /// Lists a cart's line items paired with their current products.
    async fn cart_items(&self, cart_id: CartId) -> Result<Vec<(CartItem, Product)>>;

    /// Captures a customer against a cart. The cart must exist.
    async fn create_customer(&self, input: NewCustomer) -> Result<Customer>;

    /// Retrieves a customer by id.
    async fn get_customer(&self, customer_id: CustomerId) -> Result<Customer>;

    /// Lists all customers, ordered by surname and name.
    async fn list_customers(&self) -> Result<Vec<Customer>>;
}

/// Extension trait providing convenience methods for store backends.
#[async_trait]
pub trait ShopStoreExt: ShopStore {
    /// Loads a cart with its lines and a total computed at current prices.
    async fn load_cart(&self, cart_id: CartId) -> Result<LoadedCart> {
        let cart = self.get_cart(cart_id).await?;
        let lines = self.cart_items(cart_id).await?;
        let total = cart_total(&lines);
        Ok(LoadedCart { cart, lines, total })
    }

    /// Loads every cart with its lines and totals, oldest first.
    async fn load_all_carts(&self) -> Result<Vec<LoadedCart>> {
        let carts = self.list_carts().await?;
        let mut loaded = Vec::with_capacity(carts.len());
        for cart in carts {
            let lines = self.cart_items(cart.id).await?;
            let total = cart_total(&lines);
            loaded.push(LoadedCart { cart, lines, total });
        }
        Ok(loaded)
    }
}

// Blanket implementation for all ShopStore implementations
impl<T: ShopStore + ?Sized> ShopStoreExt for T {}
