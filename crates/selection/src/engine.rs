//! The selection engine - 0/1 knapsack with a headcount limit.
//!
//! ```text
//! best[i][w][k] = max(best[i-1][w][k], best[i-1][w - wt_i][k - 1] + val_i)
//! ```
//!
//! `i` walks candidates in input order, `w` is the remaining weight allowance
//! and `k` the remaining count allowance. Including a candidate wins only when
//! it is strictly better, so on ties the candidate is left out.

use crate::error::{Result, SelectionError};
use crate::table::DecisionTable;
use encounter_core::{Candidate, Constraints, Selection};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Configuration for the selection engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Largest budget a call may ask for
    pub max_budget: i64,
    /// Largest working memory a call may allocate, in bytes: the decision
    /// bits plus the two rolling value layers
    pub max_table_bytes: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_budget: 1_000_000,
            max_table_bytes: 64 << 20, // 64 MiB
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the budget cap.
    pub fn with_max_budget(mut self, max_budget: i64) -> Self {
        self.max_budget = max_budget;
        self
    }

    /// Set the working memory cap.
    pub fn with_max_table_bytes(mut self, max_table_bytes: u64) -> Self {
        self.max_table_bytes = max_table_bytes;
        self
    }
}

/// Select with the default configuration.
pub fn select(candidates: &[Candidate], budget: i64, capacity: i64) -> Result<Selection> {
    SelectionEngine::new().select(candidates, budget, capacity)
}

/// Computes value-maximizing feasible subsets.
///
/// Stateless between calls: every call allocates and drops its own table,
/// so one engine can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    config: EngineConfig,
}

/// Table bounds for one validated call.
struct Dimensions {
    width: usize,
    depth: usize,
}

impl SelectionEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Select under the given constraints.
    pub fn select_with(&self, candidates: &[Candidate], constraints: &Constraints) -> Result<Selection> {
        self.select(candidates, constraints.budget, constraints.capacity)
    }

    /// Pick the subset of `candidates` with the highest total value whose
    /// total weight is at most `budget` and whose size is at most `capacity`.
    ///
    /// Selected candidates are returned in input order. Identical inputs
    /// always yield identical output.
    pub fn select(&self, candidates: &[Candidate], budget: i64, capacity: i64) -> Result<Selection> {
        let dims = self.validate(candidates, budget, capacity)?;

        if candidates.is_empty() {
            debug!("No candidates, returning empty selection");
            return Ok(Selection::empty());
        }

        let n = candidates.len();
        debug!(
            "Building selection table: {} candidates, width {}, depth {}",
            n, dims.width, dims.depth
        );

        let mut table = DecisionTable::new(n, dims.width, dims.depth);
        let stride = dims.depth + 1;
        let mut prev = vec![0i64; table.layer_len()];
        let mut cur = vec![0i64; table.layer_len()];

        for (i, candidate) in candidates.iter().enumerate() {
            // Weights above the table width can never be included.
            let weight = usize::try_from(candidate.weight).ok().filter(|&wt| wt <= dims.width);

            for w in 0..=dims.width {
                let row = w * stride;
                cur[row] = prev[row];
                for k in 1..=dims.depth {
                    let excluded = prev[row + k];
                    cur[row + k] = excluded;

                    if let Some(wt) = weight.filter(|&wt| wt <= w) {
                        let included = prev[(w - wt) * stride + k - 1] + candidate.value;
                        if included > excluded {
                            cur[row + k] = included;
                            table.mark(i, w, k);
                        }
                    }
                }
            }

            std::mem::swap(&mut prev, &mut cur);
        }

        let best = prev[dims.width * stride + dims.depth];
        let selection = backtrack(candidates, &table);

        debug_assert_eq!(selection.total_value, best);
        debug!(
            "Selected {} of {} candidates: weight {}, value {}",
            selection.len(),
            n,
            selection.total_weight,
            selection.total_value
        );

        Ok(selection)
    }

    /// Check every precondition and size the table.
    fn validate(&self, candidates: &[Candidate], budget: i64, capacity: i64) -> Result<Dimensions> {
        if capacity <= 0 {
            return Err(SelectionError::InvalidCapacity { capacity });
        }
        if budget < 0 {
            return Err(SelectionError::InvalidBudget { budget });
        }
        if budget > self.config.max_budget {
            warn!("Rejecting budget {} above cap {}", budget, self.config.max_budget);
            return Err(SelectionError::BudgetTooLarge {
                budget,
                max: self.config.max_budget,
            });
        }

        let mut seen = HashSet::with_capacity(candidates.len());
        let mut total_weight: i64 = 0;
        let mut total_value: i64 = 0;
        for candidate in candidates {
            if candidate.weight < 0 {
                return Err(SelectionError::InvalidCandidateWeight {
                    id: candidate.id.clone(),
                    weight: candidate.weight,
                });
            }
            if candidate.value < 0 {
                return Err(SelectionError::InvalidCandidateValue {
                    id: candidate.id.clone(),
                    value: candidate.value,
                });
            }
            if !seen.insert(&candidate.id) {
                return Err(SelectionError::DuplicateCandidate {
                    id: candidate.id.clone(),
                });
            }
            total_weight = total_weight.saturating_add(candidate.weight);
            total_value = total_value
                .checked_add(candidate.value)
                .ok_or(SelectionError::ValueOverflow)?;
        }

        // Allowances beyond what the candidates can use change no state of
        // the recurrence, so the table is clamped to them.
        let width = budget.min(total_weight);
        let depth = capacity.min(candidates.len() as i64);

        let bytes = table_bytes(candidates.len() as u64, width as u64, depth as u64);
        let too_large = || SelectionError::TableTooLarge {
            bytes,
            max: self.config.max_table_bytes,
        };
        if bytes > self.config.max_table_bytes {
            warn!("Rejecting selection table of {} bytes", bytes);
            return Err(too_large());
        }

        Ok(Dimensions {
            width: usize::try_from(width).map_err(|_| too_large())?,
            depth: usize::try_from(depth).map_err(|_| too_large())?,
        })
    }
}

/// Bytes one call allocates: a `u64` word per 64 decision bits plus two
/// `i64` value layers. Saturates on overflow.
fn table_bytes(items: u64, width: u64, depth: u64) -> u64 {
    let layer = width.checked_add(1).and_then(|w| w.checked_mul(depth + 1));
    let decision = layer
        .and_then(|l| l.checked_mul(items))
        .map(|cells| cells.div_ceil(64) * 8);
    let values = layer.and_then(|l| l.checked_mul(2 * 8));
    decision
        .zip(values)
        .and_then(|(d, v)| d.checked_add(v))
        .unwrap_or(u64::MAX)
}

/// Walk the decisions from the full allowance back to the first candidate.
fn backtrack(candidates: &[Candidate], table: &DecisionTable) -> Selection {
    let mut w = table.width();
    let mut k = table.depth();
    let mut picked = Vec::new();

    for i in (0..table.items()).rev() {
        if table.is_marked(i, w, k) {
            // Marked cells only exist where the weight fit and k >= 1.
            w -= candidates[i].weight as usize;
            k -= 1;
            picked.push(i);
        }
    }

    picked.reverse();
    Selection::from_candidates(picked.into_iter().map(|i| candidates[i].clone()).collect())
}
