use shared::{
    domain::{CartItem, Product},
    error::CartError,
    pricing::item_count,
    protocol::{decode_cart, encode_cart, CART_STORAGE_KEY},
};
use storage::KeyValueStore;
use tracing::{debug, info};

/// The cart's line items, written through to local storage on every change.
pub struct CartStore<S> {
    storage: S,
    items: Vec<CartItem>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Loads the persisted cart, or starts empty when nothing is stored.
    pub async fn load(storage: S) -> Result<Self, CartError> {
        let items = read_items(&storage).await?;
        debug!(lines = items.len(), "cart loaded");
        Ok(Self { storage, items })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of quantities across all lines.
    pub fn count(&self) -> u64 {
        item_count(&self.items)
    }

    /// Adds a product, merging into an existing line of the same name.
    pub async fn add(&mut self, product: Product) -> Result<(), CartError> {
        let incoming = product.into_cart_item()?;
        match self.items.iter_mut().find(|item| item.name == incoming.name) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(incoming.quantity);
                info!(
                    name = %existing.name,
                    quantity = existing.quantity,
                    "cart line quantity increased"
                );
            }
            None => {
                info!(name = %incoming.name, quantity = incoming.quantity, "cart line added");
                self.items.push(incoming);
            }
        }
        self.save().await
    }

    /// Removes every line named `name` and returns how many were dropped.
    /// The cart is saved even when nothing matched.
    pub async fn remove(&mut self, name: &str) -> Result<usize, CartError> {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        let removed = before - self.items.len();
        info!(name, removed, "cart line removed");
        self.save().await?;
        Ok(removed)
    }

    /// Overwrites a line's quantity. Returns whether the line exists; the
    /// cart is saved either way.
    pub async fn set_quantity(&mut self, name: &str, quantity: u32) -> Result<bool, CartError> {
        let found = match self.items.iter_mut().find(|item| item.name == name) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        };
        info!(name, quantity, found, "cart line quantity set");
        self.save().await?;
        Ok(found)
    }

    /// Drops the persisted cart and empties the in-memory list.
    pub async fn clear(&mut self) -> Result<Vec<CartItem>, CartError> {
        self.storage.remove_item(CART_STORAGE_KEY).await?;
        Ok(std::mem::take(&mut self.items))
    }

    /// Reads the cart straight from storage, ignoring the in-memory list.
    pub async fn load_persisted(&self) -> Result<Vec<CartItem>, CartError> {
        read_items(&self.storage).await
    }

    async fn save(&self) -> Result<(), CartError> {
        let raw = encode_cart(&self.items)?;
        self.storage.set_item(CART_STORAGE_KEY, &raw).await?;
        Ok(())
    }
}

async fn read_items<S: KeyValueStore>(storage: &S) -> Result<Vec<CartItem>, CartError> {
    let raw = storage.get_item(CART_STORAGE_KEY).await?;
    decode_cart(raw.as_deref())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
