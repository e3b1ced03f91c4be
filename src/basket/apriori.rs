//! Apriori Module
//! Level-wise frequent-itemset mining over the basket matrix.

use rayon::prelude::*;
use std::collections::HashSet;

use super::encoder::BasketMatrix;

/// An itemset meeting the support threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    /// Sorted item labels.
    pub items: Vec<String>,
    /// Fraction of orders containing every item.
    pub support: f64,
}

/// Level-wise frequent-itemset miner.
pub struct Apriori;

impl Apriori {
    /// All itemsets with support >= `min_support`, singletons included,
    /// sorted by size then label.
    ///
    /// Raising the threshold can only shrink the result: every itemset
    /// frequent at a higher threshold is frequent at a lower one.
    pub fn frequent_itemsets(basket: &BasketMatrix, min_support: f64) -> Vec<FrequentItemset> {
        let n_orders = basket.n_orders();
        if n_orders == 0 || basket.n_items() == 0 {
            return Vec::new();
        }

        let postings = basket.item_order_lists();
        let support_of = |count: usize| count as f64 / n_orders as f64;

        // Level 1: single items straight off the posting lists.
        let mut level: Vec<Vec<u32>> = (0..basket.n_items() as u32)
            .filter(|&item| support_of(postings[item as usize].len()) >= min_support)
            .map(|item| vec![item])
            .collect();

        let mut found: Vec<(Vec<u32>, f64)> = level
            .iter()
            .map(|set| (set.clone(), support_of(postings[set[0] as usize].len())))
            .collect();

        // Level k+1: join survivors sharing a (k-1)-prefix, prune candidates
        // with an infrequent subset, then count the rest in parallel.
        while level.len() > 1 {
            let candidates = Self::candidate_join(&level);
            if candidates.is_empty() {
                break;
            }

            let level_set: HashSet<&[u32]> = level.iter().map(|set| set.as_slice()).collect();
            let mut surviving: Vec<(Vec<u32>, f64)> = candidates
                .into_par_iter()
                .filter(|candidate| Self::all_subsets_frequent(candidate, &level_set))
                .filter_map(|candidate| {
                    let count = Self::count_orders_with(&candidate, &postings);
                    let support = support_of(count);
                    (count > 0 && support >= min_support).then_some((candidate, support))
                })
                .collect();

            if surviving.is_empty() {
                break;
            }
            surviving.sort_by(|a, b| a.0.cmp(&b.0));
            level = surviving.iter().map(|(set, _)| set.clone()).collect();
            found.extend(surviving);
        }

        let mut itemsets: Vec<FrequentItemset> = found
            .into_iter()
            .map(|(set, support)| FrequentItemset {
                items: set
                    .iter()
                    .map(|&idx| basket.items[idx as usize].clone())
                    .collect(),
                support,
            })
            .collect();
        itemsets.sort_by(|a, b| {
            a.items
                .len()
                .cmp(&b.items.len())
                .then_with(|| a.items.cmp(&b.items))
        });
        itemsets
    }

    /// Classic prefix join: two sorted k-sets sharing their first k-1 items
    /// produce one (k+1)-candidate. `level` must be sorted.
    fn candidate_join(level: &[Vec<u32>]) -> Vec<Vec<u32>> {
        let mut candidates = Vec::new();
        for (i, a) in level.iter().enumerate() {
            let k = a.len();
            for b in &level[i + 1..] {
                if a[..k - 1] != b[..k - 1] {
                    break;
                }
                let mut candidate = a.clone();
                candidate.push(b[k - 1]);
                candidates.push(candidate);
            }
        }
        candidates
    }

    /// Every k-subset of a frequent (k+1)-set must itself be frequent.
    fn all_subsets_frequent(candidate: &[u32], level: &HashSet<&[u32]>) -> bool {
        let mut subset = Vec::with_capacity(candidate.len() - 1);
        (0..candidate.len()).all(|skip| {
            subset.clear();
            subset.extend(
                candidate
                    .iter()
                    .enumerate()
                    .filter(|(pos, _)| *pos != skip)
                    .map(|(_, &item)| item),
            );
            level.contains(subset.as_slice())
        })
    }

    /// Number of orders containing every item, by intersecting posting lists
    /// starting from the rarest item.
    fn count_orders_with(items: &[u32], postings: &[Vec<u32>]) -> usize {
        let mut lists: Vec<&Vec<u32>> = items.iter().map(|&idx| &postings[idx as usize]).collect();
        lists.sort_by_key(|list| list.len());

        let Some((head, rest)) = lists.split_first() else {
            return 0;
        };
        head.iter()
            .filter(|order| rest.iter().all(|list| list.binary_search(order).is_ok()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn basket(orders: &[&[&str]]) -> BasketMatrix {
        let mut items: Vec<String> = orders
            .iter()
            .flat_map(|order| order.iter().map(|s| s.to_string()))
            .collect();
        items.sort();
        items.dedup();

        let index_of = |label: &str| items.iter().position(|i| i == label).unwrap() as u32;
        let orders = orders
            .iter()
            .map(|order| {
                let mut indices: Vec<u32> = order.iter().map(|label| index_of(label)).collect();
                indices.sort_unstable();
                indices
            })
            .collect();

        BasketMatrix { items, orders }
    }

    fn support_of(itemsets: &[FrequentItemset], items: &[&str]) -> Option<f64> {
        itemsets
            .iter()
            .find(|fi| fi.items == items)
            .map(|fi| fi.support)
    }

    #[test]
    fn finds_pairs_above_the_threshold() {
        // {A,B} in two of three orders, {A,C} in one.
        let basket = basket(&[&["A", "B"], &["A", "B"], &["A", "C"]]);
        let itemsets = Apriori::frequent_itemsets(&basket, 0.5);

        let ab = support_of(&itemsets, &["A", "B"]).unwrap();
        assert_relative_eq!(ab, 2.0 / 3.0);
        assert!(support_of(&itemsets, &["A", "C"]).is_none());
    }

    #[test]
    fn singleton_supports_match_their_frequencies() {
        let basket = basket(&[&["A", "B"], &["A"], &["B"], &["A", "B"]]);
        let itemsets = Apriori::frequent_itemsets(&basket, 0.25);

        assert_relative_eq!(support_of(&itemsets, &["A"]).unwrap(), 0.75);
        assert_relative_eq!(support_of(&itemsets, &["B"]).unwrap(), 0.75);
        assert_relative_eq!(support_of(&itemsets, &["A", "B"]).unwrap(), 0.5);
    }

    #[test]
    fn raising_the_threshold_never_adds_itemsets() {
        let basket = basket(&[
            &["A", "B", "C"],
            &["A", "B"],
            &["A", "C"],
            &["B", "C"],
            &["A"],
        ]);

        let loose = Apriori::frequent_itemsets(&basket, 0.2);
        let tight = Apriori::frequent_itemsets(&basket, 0.6);

        for itemset in &tight {
            let loose_support = support_of(&loose, &itemset.items.iter().map(String::as_str).collect::<Vec<_>>());
            assert_eq!(loose_support, Some(itemset.support));
        }
        assert!(tight.len() <= loose.len());
    }

    #[test]
    fn triples_require_all_three_items_together() {
        let basket = basket(&[
            &["A", "B", "C"],
            &["A", "B", "C"],
            &["A", "B"],
            &["C"],
        ]);
        let itemsets = Apriori::frequent_itemsets(&basket, 0.5);

        assert_relative_eq!(support_of(&itemsets, &["A", "B", "C"]).unwrap(), 0.5);
    }

    #[test]
    fn empty_basket_returns_nothing() {
        let basket = BasketMatrix::default();
        assert!(Apriori::frequent_itemsets(&basket, 0.1).is_empty());
    }

    #[test]
    fn disjoint_items_produce_no_pairs() {
        let basket = basket(&[&["A"], &["B"], &["A"], &["B"]]);
        let itemsets = Apriori::frequent_itemsets(&basket, 0.3);

        assert!(itemsets.iter().all(|fi| fi.items.len() == 1));
    }

    #[test]
    fn results_are_sorted_by_size_then_label() {
        let basket = basket(&[&["B", "A"], &["B", "A"], &["B"]]);
        let itemsets = Apriori::frequent_itemsets(&basket, 0.5);

        let labels: Vec<Vec<String>> = itemsets.iter().map(|fi| fi.items.clone()).collect();
        assert_eq!(
            labels,
            vec![
                vec!["A".to_string()],
                vec!["B".to_string()],
                vec!["A".to_string(), "B".to_string()],
            ]
        );
    }
}
