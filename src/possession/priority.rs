//! Category priority ordering
//!
//! Categories are sorted by weight, highest first. Categories sharing a
//! weight form a tie group; tie groups keep declaration order unless
//! randomization is on, in which case every query reshuffles them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{PossessionError, Result};
use crate::possession::category::{UnitCategory, CATEGORY_COUNT};

/// One weight per category, higher is preferred first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTable {
    weights: [i32; CATEGORY_COUNT],
}

impl PriorityTable {
    /// Build from a positional weight array in `UnitCategory::ALL` order
    pub fn from_weights(weights: &[i32]) -> Result<Self> {
        let weights: [i32; CATEGORY_COUNT] = weights.try_into().map_err(|_| {
            PossessionError::Configuration(format!(
                "expected {} priority weights, got {}",
                CATEGORY_COUNT,
                weights.len()
            ))
        })?;
        Ok(Self { weights })
    }

    pub fn weight(&self, category: UnitCategory) -> i32 {
        self.weights[category.index()]
    }

    pub fn weights(&self) -> &[i32; CATEGORY_COUNT] {
        &self.weights
    }

    /// Tie groups in descending weight order, members in declaration order
    pub fn tie_groups(&self) -> Vec<Vec<UnitCategory>> {
        let mut sorted = UnitCategory::ALL.to_vec();
        // Stable sort keeps declaration order inside each tie group
        sorted.sort_by_key(|c| std::cmp::Reverse(self.weight(*c)));

        let mut groups: Vec<Vec<UnitCategory>> = Vec::new();
        for category in sorted {
            match groups.last_mut() {
                Some(group) if self.weight(group[0]) == self.weight(category) => {
                    group.push(category);
                    continue;
                }
                _ => {}
            }
            groups.push(vec![category]);
        }
        groups
    }
}

impl Default for PriorityTable {
    /// Companions first, then declaration order
    fn default() -> Self {
        Self {
            weights: [9, 8, 7, 6, 5, 4, 3, 2, 1],
        }
    }
}

/// Produces the category preference order for the automatic successor search
#[derive(Debug, Clone)]
pub struct PriorityOrderer {
    table: PriorityTable,
    randomize_ties: bool,
    order: Vec<UnitCategory>,
    rng: ChaCha8Rng,
}

impl PriorityOrderer {
    pub fn new(table: PriorityTable, randomize_ties: bool) -> Self {
        Self::with_rng(table, randomize_ties, ChaCha8Rng::from_entropy())
    }

    /// Reproducible tie shuffling
    pub fn with_seed(table: PriorityTable, randomize_ties: bool, seed: u64) -> Self {
        Self::with_rng(table, randomize_ties, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Validate a raw weight array and build an orderer from it
    pub fn configure(weights: &[i32], randomize_ties: bool) -> Result<Self> {
        Ok(Self::new(PriorityTable::from_weights(weights)?, randomize_ties))
    }

    fn with_rng(table: PriorityTable, randomize_ties: bool, rng: ChaCha8Rng) -> Self {
        let mut orderer = Self {
            table,
            randomize_ties,
            order: Vec::with_capacity(CATEGORY_COUNT),
            rng,
        };
        orderer.reorder();
        orderer
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    /// Current preference order
    ///
    /// With tie randomization on, every call draws a fresh permutation
    /// inside each tie group. Otherwise the cached order is returned as is.
    pub fn current_order(&mut self) -> &[UnitCategory] {
        if self.randomize_ties {
            self.reorder();
        }
        &self.order
    }

    fn reorder(&mut self) {
        let mut order = Vec::with_capacity(CATEGORY_COUNT);
        for mut group in self.table.tie_groups() {
            if self.randomize_ties && group.len() > 1 {
                // Draw without replacement
                while !group.is_empty() {
                    let pick = self.rng.gen_range(0..group.len());
                    order.push(group.remove(pick));
                }
            } else {
                order.extend(group);
            }
        }
        tracing::debug!("Priority order: {:?}", order);
        self.order = order;
    }
}
