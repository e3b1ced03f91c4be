//! Basket module - market basket encoding and rule mining

mod apriori;
mod encoder;
mod rules;

pub use apriori::{Apriori, FrequentItemset};
pub use encoder::{BasketEncoder, BasketError, BasketMatrix};
pub use rules::{AssociationRule, RuleGenerator};
