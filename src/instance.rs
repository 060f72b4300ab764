//! `InstanceContext`: the immutable, precomputed view of a wave-picking
//! instance that every other component reads. Created once at solver
//! construction; never mutated afterwards (the PRNG field is the one
//! exception, cell-guarded so the rest of the struct stays a plain shared
//! reference).

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SolverConfig;
use crate::sparse_matrix::SparseMatrix;
use crate::wave::units_exceed_any;

/// External wall-clock oracle. The core never reads the system clock itself;
/// it only ever asks an injected `Stopwatch` how much time has elapsed.
pub trait Stopwatch {
    fn elapsed_ms(&self) -> u64;
}

/// A `Stopwatch` backed by `std::time::Instant`, for production use and for
/// tests that want to exercise the real deadline behavior.
pub struct InstantStopwatch {
    start: std::time::Instant,
}

impl InstantStopwatch {
    pub fn new() -> Self {
        InstantStopwatch {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for InstantStopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch for InstantStopwatch {
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// A `Stopwatch` that reports a fixed, caller-controlled value. Used in tests
/// that need deterministic deadline behavior without sleeping.
pub struct FixedStopwatch(pub std::cell::Cell<u64>);

impl FixedStopwatch {
    pub fn new(elapsed_ms: u64) -> Self {
        FixedStopwatch(std::cell::Cell::new(elapsed_ms))
    }

    pub fn set(&self, elapsed_ms: u64) {
        self.0.set(elapsed_ms);
    }
}

impl Stopwatch for FixedStopwatch {
    fn elapsed_ms(&self) -> u64 {
        self.0.get()
    }
}

pub struct InstanceContext {
    pub orders: Vec<Vec<(usize, i64)>>,
    pub aisles: Vec<Vec<(usize, i64)>>,
    pub n_orders: usize,
    pub n_aisles: usize,
    pub n_items: usize,
    pub lb: i64,
    pub ub: i64,
    pub stock: Vec<i64>,
    pub order_sum: Vec<i64>,
    pub valid_orders: Vec<bool>,
    pub matrix: SparseMatrix,
    pub max_runtime_ms: u64,
    rng: RefCell<StdRng>,
}

impl InstanceContext {
    /// Convenience constructor for tests: uses the default config and a
    /// fixed-seed RNG so test expectations are reproducible.
    pub fn new(
        orders: Vec<Vec<(usize, i64)>>,
        aisles: Vec<Vec<(usize, i64)>>,
        n_items: usize,
        lb: i64,
        ub: i64,
    ) -> Self {
        Self::with_config(orders, aisles, n_items, lb, ub, &SolverConfig::default(), 0)
    }

    pub fn with_config(
        orders: Vec<Vec<(usize, i64)>>,
        aisles: Vec<Vec<(usize, i64)>>,
        n_items: usize,
        lb: i64,
        ub: i64,
        config: &SolverConfig,
        seed: u64,
    ) -> Self {
        let n_orders = orders.len();
        let n_aisles = aisles.len();

        let mut stock = vec![0i64; n_items];
        for aisle in &aisles {
            for &(item, qty) in aisle {
                stock[item] += qty;
            }
        }

        let order_sum: Vec<i64> = orders.iter().map(|o| o.iter().map(|&(_, q)| q).sum()).collect();

        let valid_orders = Self::compute_validity(&orders, &order_sum, &stock, ub);

        let matrix = SparseMatrix::from_aisles(n_items, &aisles);

        tracing::info!(
            n_orders,
            n_aisles,
            n_items,
            lb,
            ub,
            "instance context constructed"
        );

        InstanceContext {
            orders,
            aisles,
            n_orders,
            n_aisles,
            n_items,
            lb,
            ub,
            stock,
            order_sum,
            valid_orders,
            matrix,
            max_runtime_ms: config.max_runtime_ms,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// An order is valid iff every item quantity is within global stock, no
    /// single item quantity exceeds UB, and the order's own total does not
    /// exceed UB.
    fn compute_validity(
        orders: &[Vec<(usize, i64)>],
        order_sum: &[i64],
        stock: &[i64],
        ub: i64,
    ) -> Vec<bool> {
        let n = orders.len();
        if n == 0 {
            return Vec::new();
        }

        let threads = num_cpus::get().max(1).min(n.max(1));
        if threads <= 1 || n < 64 {
            return (0..n)
                .map(|o| Self::order_is_valid(&orders[o], order_sum[o], stock, ub))
                .collect();
        }

        let mut result = vec![false; n];
        let chunk = (n + threads - 1) / threads;

        std::thread::scope(|s| {
            for (chunk_idx, out_chunk) in result.chunks_mut(chunk).enumerate() {
                let base = chunk_idx * chunk;
                s.spawn(move || {
                    for (offset, slot) in out_chunk.iter_mut().enumerate() {
                        let o = base + offset;
                        *slot = Self::order_is_valid(&orders[o], order_sum[o], stock, ub);
                    }
                });
            }
        });

        result
    }

    fn order_is_valid(order: &[(usize, i64)], sum: i64, stock: &[i64], ub: i64) -> bool {
        if sum > ub {
            return false;
        }
        order.iter().all(|&(item, qty)| qty <= ub && qty <= stock[item])
    }

    /// `max(MAX_RUNTIME - elapsed, 0)`.
    pub fn remaining_ms(&self, stopwatch: &dyn Stopwatch) -> u64 {
        self.max_runtime_ms.saturating_sub(stopwatch.elapsed_ms())
    }

    pub fn gen_f64(&self) -> f64 {
        self.rng.borrow_mut().gen_range(0.0..1.0)
    }

    pub fn gen_f64_range(&self, low: f64, high: f64) -> f64 {
        self.rng.borrow_mut().gen_range(low..high)
    }

    pub fn gen_bool(&self) -> bool {
        self.rng.borrow_mut().gen_bool(0.5)
    }

    pub fn gen_index(&self, len: usize) -> usize {
        self.rng.borrow_mut().gen_range(0..len)
    }

    /// Draws uniformly in `[1, total]` inclusive, for the coverage selector's
    /// cumulative weighted walk.
    pub fn gen_weight(&self, total: i64) -> i64 {
        self.rng.borrow_mut().gen_range(1..=total)
    }

    /// Global item→stock pointwise exceed check, exposed for callers that
    /// need to test a candidate demand vector against global feasibility
    /// (the "still within global feasibility" check in the constructive
    /// heuristics acceptance rule).
    pub fn exceeds_stock(&self, demand: &[i64]) -> bool {
        units_exceed_any(demand, &self.stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_matches_spec_definition() {
        // order 0: sum 5, within ub(10) and within stock(10) -> valid
        // order 1: sum 12, exceeds ub(10) -> invalid
        let orders = vec![vec![(0, 5)], vec![(0, 12)]];
        let aisles = vec![vec![(0, 10)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);
        assert!(ctx.valid_orders[0]);
        assert!(!ctx.valid_orders[1]);
    }

    #[test]
    fn validity_single_item_exceeding_stock_is_invalid() {
        // sum 7 <= ub(10), but item qty 7 exceeds stock(5) -> invalid
        let orders = vec![vec![(0, 7)]];
        let aisles = vec![vec![(0, 5)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);
        assert!(!ctx.valid_orders[0]);
    }

    #[test]
    fn parallel_and_sequential_validity_precompute_agree() {
        let n = 200;
        let orders: Vec<Vec<(usize, i64)>> = (0..n).map(|i| vec![(0, (i % 7 + 1) as i64)]).collect();
        let aisles = vec![vec![(0, 1000)]];
        let order_sum: Vec<i64> = orders.iter().map(|o| o[0].1).collect();
        let stock = vec![1000i64];

        let sequential: Vec<bool> = (0..n)
            .map(|o| InstanceContext::order_is_valid(&orders[o], order_sum[o], &stock, 10))
            .collect();
        let parallel = InstanceContext::compute_validity(&orders, &order_sum, &stock, 10);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn remaining_ms_floors_at_zero() {
        let ctx = InstanceContext::new(vec![], vec![], 1, 0, 0);
        let sw = FixedStopwatch::new(ctx.max_runtime_ms + 1000);
        assert_eq!(ctx.remaining_ms(&sw), 0);
    }
}
