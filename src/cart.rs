//! Shopping cart ledger.
//!
//! Line items are unique by product name; adding a name that is already in
//! the cart bumps its quantity instead of appending a second line.

use serde::{Deserialize, Serialize};

/// Price used when a product's price label cannot be read.
pub const FALLBACK_PRICE: f64 = 50.0;
pub const DEFAULT_PRODUCT_NAME: &str = "Eco product";
pub const DEFAULT_PRODUCT_IMAGE: &str =
    "https://images.unsplash.com/photo-1613665798979-93d4318a0888?w=400";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of `name`, matching existing lines by exact name.
    pub fn add_to_cart(&mut self, name: &str, price: f64, image: &str) -> &CartItem {
        let index = match self.items.iter().position(|item| item.name == name) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.saturating_add(1);
                index
            }
            None => {
                self.items.push(CartItem {
                    name: name.to_string(),
                    price,
                    image: image.to_string(),
                    quantity: 1,
                });
                self.items.len() - 1
            }
        };
        &self.items[index]
    }

    /// Removes the line at `index`; out-of-range indices leave the cart as is.
    pub fn remove_at(&mut self, index: usize) -> Option<CartItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total())
    }
}

/// Reads a price label such as `"$24.99"`, keeping only the leading number
/// after an optional `$`. Anything that does not yield a positive finite
/// price falls back to [`FALLBACK_PRICE`].
pub fn parse_price(label: &str) -> f64 {
    let text = label.trim();
    let text = text.strip_prefix('$').unwrap_or(text).trim_start();
    match leading_number(text) {
        Some(price) if price.is_finite() && price > 0.0 => price,
        _ => FALLBACK_PRICE,
    }
}

/// Longest numeric prefix of `text`, e.g. `"35.50 USD"` reads as 35.5.
pub(crate) fn leading_number(text: &str) -> Option<f64> {
    let end = text
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')))
        .map_or(text.len(), |(i, _)| i);
    let candidate = &text[..end];
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
}
