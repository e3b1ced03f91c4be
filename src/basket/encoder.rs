//! Basket Encoder Module
//! Turns sales rows into a one-hot order/product presence matrix.

use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BasketError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Order/product presence matrix in sparse form.
///
/// `items` holds the distinct product ids in sorted order; each order is the
/// sorted list of item indices whose summed quantity was positive.
#[derive(Debug, Clone, Default)]
pub struct BasketMatrix {
    pub items: Vec<String>,
    pub orders: Vec<Vec<u32>>,
}

impl BasketMatrix {
    pub fn n_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Ascending order indices per item, the index the miner intersects.
    pub fn item_order_lists(&self) -> Vec<Vec<u32>> {
        let mut lists: Vec<Vec<u32>> = vec![Vec::new(); self.items.len()];
        for (order_idx, order) in self.orders.iter().enumerate() {
            for &item in order {
                lists[item as usize].push(order_idx as u32);
            }
        }
        lists
    }
}

/// Builds the presence matrix from raw sales rows.
pub struct BasketEncoder;

impl BasketEncoder {
    /// Sum quantities per (order, product) and mark the product present when
    /// the sum is positive. Rows with a null order or product id are skipped.
    pub fn encode(sales: &DataFrame) -> Result<BasketMatrix, BasketError> {
        let order_col = sales.column("order_id")?.cast(&DataType::String)?;
        let order_ca = order_col.str()?;
        let product_col = sales.column("product_id")?.cast(&DataType::String)?;
        let product_ca = product_col.str()?;
        let quantity_col = sales.column("quantity")?.cast(&DataType::Float64)?;
        let quantity_ca = quantity_col.f64()?;

        let mut quantities: BTreeMap<String, HashMap<String, f64>> = BTreeMap::new();
        for i in 0..sales.height() {
            if let (Some(order), Some(product)) = (order_ca.get(i), product_ca.get(i)) {
                let quantity = quantity_ca.get(i).unwrap_or(0.0);
                *quantities
                    .entry(order.to_string())
                    .or_default()
                    .entry(product.to_string())
                    .or_insert(0.0) += quantity;
            }
        }

        let mut item_set: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
        for products in quantities.values() {
            for (product, &total) in products {
                if total > 0.0 {
                    item_set.insert(product.as_str());
                }
            }
        }

        let items: Vec<String> = item_set.iter().map(|s| s.to_string()).collect();
        let index_of: HashMap<&str, u32> = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.as_str(), idx as u32))
            .collect();

        let mut orders: Vec<Vec<u32>> = Vec::with_capacity(quantities.len());
        for products in quantities.values() {
            let mut order: Vec<u32> = products
                .iter()
                .filter(|(_, &total)| total > 0.0)
                .filter_map(|(product, _)| index_of.get(product.as_str()).copied())
                .collect();
            order.sort_unstable();
            if !order.is_empty() {
                orders.push(order);
            }
        }

        Ok(BasketMatrix { items, orders })
    }
}
