//! Association Rules Module
//! Derives scored rules from frequent itemsets.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::apriori::FrequentItemset;

/// A directed rule between two disjoint itemsets.
#[derive(Debug, Clone)]
pub struct AssociationRule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
}

/// Splits frequent itemsets into scored antecedent/consequent rules.
pub struct RuleGenerator;

impl RuleGenerator {
    /// Rules with confidence >= `min_confidence`, sorted by lift descending.
    ///
    /// Ties fall back to confidence, support, then antecedent label so equal
    /// inputs always print in the same order.
    pub fn association_rules(
        itemsets: &[FrequentItemset],
        min_confidence: f64,
    ) -> Vec<AssociationRule> {
        let support_by_set: HashMap<&[String], f64> = itemsets
            .iter()
            .map(|itemset| (itemset.items.as_slice(), itemset.support))
            .collect();

        let mut rules = Vec::new();
        for itemset in itemsets.iter().filter(|itemset| itemset.items.len() >= 2) {
            for (antecedent, consequent) in Self::splits(&itemset.items) {
                // Subsets of a frequent itemset are themselves frequent, so
                // both supports are on record.
                let Some(&antecedent_support) = support_by_set.get(antecedent.as_slice()) else {
                    continue;
                };
                let Some(&consequent_support) = support_by_set.get(consequent.as_slice()) else {
                    continue;
                };

                let confidence = itemset.support / antecedent_support;
                if confidence < min_confidence {
                    continue;
                }

                let lift = confidence / consequent_support;
                let leverage = itemset.support - antecedent_support * consequent_support;
                let conviction = if confidence < 1.0 {
                    (1.0 - consequent_support) / (1.0 - confidence)
                } else {
                    f64::INFINITY
                };

                rules.push(AssociationRule {
                    antecedent,
                    consequent,
                    antecedent_support,
                    consequent_support,
                    support: itemset.support,
                    confidence,
                    lift,
                    leverage,
                    conviction,
                });
            }
        }

        rules.sort_by(|a, b| {
            b.lift
                .partial_cmp(&a.lift)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal))
                .then_with(|| b.support.partial_cmp(&a.support).unwrap_or(Ordering::Equal))
                .then_with(|| a.antecedent.cmp(&b.antecedent))
        });
        rules
    }

    /// Every (antecedent, consequent) partition of a sorted itemset into two
    /// non-empty parts.
    fn splits(items: &[String]) -> Vec<(Vec<String>, Vec<String>)> {
        let mut out = Vec::new();
        let mut current: Vec<String> = Vec::with_capacity(items.len() - 1);
        for take in 1..items.len() {
            Self::antecedents_of_size(items, take, 0, &mut current, &mut out);
        }
        out
    }

    fn antecedents_of_size(
        items: &[String],
        take: usize,
        start: usize,
        current: &mut Vec<String>,
        out: &mut Vec<(Vec<String>, Vec<String>)>,
    ) {
        if current.len() == take {
            let consequent: Vec<String> = items
                .iter()
                .filter(|item| !current.contains(item))
                .cloned()
                .collect();
            out.push((current.clone(), consequent));
            return;
        }
        for i in start..items.len() {
            current.push(items[i].clone());
            Self::antecedents_of_size(items, take, i + 1, current, out);
            current.pop();
        }
    }
}
