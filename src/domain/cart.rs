//! Client-cart aggregation: a mutable line-item collection whose totals are
//! recomputed on every mutation. Nothing here is persisted; the durable order
//! is created later by the webhook processor.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::{round_currency, tax_rate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomizationKind {
    None,
    Dtf,
    Custom,
}

/// Optional print/design customization attached to a line item. The extra
/// cost is charged per unit, on top of the unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    #[serde(rename = "type")]
    pub kind: CustomizationKind,
    pub design_file: Option<String>,
    pub notes: Option<String>,
    pub additional_cost: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: String,
    pub title: String,
    pub price: BigDecimal,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub customization: Option<Customization>,
}

impl CartItem {
    /// Deduplication key: two items merge only when product, size, color and
    /// the serialized customization all match.
    fn identity_key(&self) -> String {
        let customization = self
            .customization
            .as_ref()
            .and_then(|c| serde_json::to_string(c).ok())
            .unwrap_or_default();
        format!(
            "{}|{}|{}|{}",
            self.product_id,
            self.size.as_deref().unwrap_or(""),
            self.color.as_deref().unwrap_or(""),
            customization
        )
    }
}

/// In-memory cart with eagerly recomputed totals.
///
/// Quantities and prices are not validated here; callers are expected to hand
/// over sane values.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add an item, merging into an existing row when the identity key
    /// matches (quantities are summed).
    pub fn add_item(&mut self, item: CartItem) {
        let key = item.identity_key();
        match self.items.iter_mut().find(|i| i.identity_key() == key) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
        self.recalculate();
    }

    /// Apply an in-place edit to the item with the given id. Returns false
    /// when no such item exists. Totals are recomputed either way.
    pub fn update_item(&mut self, id: Uuid, apply: impl FnOnce(&mut CartItem)) -> bool {
        let found = match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                apply(item);
                true
            }
            None => false,
        };
        self.recalculate();
        found
    }

    pub fn remove_item(&mut self, id: Uuid) {
        self.items.retain(|i| i.id != id);
        self.recalculate();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_shipping(&mut self, amount: BigDecimal) {
        self.shipping = amount;
        self.recalculate();
    }

    pub fn set_discount(&mut self, amount: BigDecimal) {
        self.discount = amount;
        self.recalculate();
    }

    fn recalculate(&mut self) {
        let mut subtotal = BigDecimal::from(0);
        for item in &self.items {
            let quantity = BigDecimal::from(item.quantity);
            subtotal += &item.price * &quantity;
            if let Some(customization) = &item.customization {
                subtotal += &customization.additional_cost * &quantity;
            }
        }
        let tax = round_currency(&(&subtotal * tax_rate()));
        self.total = &subtotal + &tax + &self.shipping - &self.discount;
        self.subtotal = subtotal;
        self.tax = tax;
    }
}
