//! Catalog state: the in-memory ordered collection of products.
//!
//! The catalog is owned and mutated by a single session timeline, so there
//! is no interior locking. Operations are deliberately forgiving: a write
//! against an unknown id is a no-op, and field writes accept arbitrary
//! strings — validation is a non-goal of this layer, the catalog must stay
//! editable even when the user types a price like "ask sales".
//!
//! No operation deletes or reorders records; a new extraction replaces the
//! whole collection via [`Catalog::set_all`].

use crate::record::{Currency, Product};

/// One field of a [`Product`] addressable by an edit operation.
///
/// An explicit enum rather than a field-name string: which field is being
/// written is decided at the call site, not inferred later.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductField {
    Name(String),
    Price(String),
    Currency(Currency),
    Category(String),
    Description(String),
}

/// Ordered, session-owned collection of products with per-record edit mode.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, preserving the given order.
    pub fn set_all(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Drop every record (a new upload clears prior state first).
    pub fn clear(&mut self) {
        self.products.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Replace a single field on the matching record. No-op when the id is
    /// absent; the written value is not validated.
    pub fn set_field(&mut self, id: &str, field: ProductField) {
        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return;
        };
        match field {
            ProductField::Name(v) => product.name = v,
            ProductField::Price(v) => product.price = v,
            ProductField::Currency(v) => product.currency = v,
            ProductField::Category(v) => product.category = v,
            ProductField::Description(v) => product.description = v,
        }
    }

    /// Write one specification entry, preserving all others. Inserting an
    /// existing name keeps its position (last value wins).
    pub fn set_specification(&mut self, id: &str, name: &str, value: &str) {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == id) {
            product.specifications.insert(name, value);
        }
    }

    /// Flip the edit-mode flag on the matching record.
    pub fn toggle_edit(&mut self, id: &str) {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == id) {
            product.is_editing = !product.is_editing;
        }
    }

    /// A point-in-time copy for export; later edits do not affect it.
    pub fn snapshot(&self) -> Vec<Product> {
        self.products.clone()
    }
}
