//! Greedy order-first constructive heuristics: `DecreasingTotal` sorts by
//! order size, `DecreasingEffort` sorts by order size per estimated aisle
//! cost. Both share the same single-pass acceptance rule.

use crate::coverage::{select_covering_aisles, CoverageMode};
use crate::instance::InstanceContext;
use crate::wave::Wave;

/// Running state threaded through the shared acceptance loop.
struct WaveBuilder {
    orders: Vec<usize>,
    aisles: Vec<usize>,
    units_picked: Vec<i64>,
    units_available: Vec<i64>,
    total_units: i64,
}

impl WaveBuilder {
    fn new(n_items: usize) -> Self {
        WaveBuilder {
            orders: Vec::new(),
            aisles: Vec::new(),
            units_picked: vec![0; n_items],
            units_available: vec![0; n_items],
            total_units: 0,
        }
    }

    fn into_wave(self) -> Wave {
        Wave {
            orders: self.orders,
            aisles: self.aisles,
            units_picked: self.units_picked,
            units_available: self.units_available,
            total_units_picked: self.total_units,
        }
    }
}

/// Shared acceptance rule used by both constructive heuristics. `available`
/// tracks which aisles are still free to be claimed across the whole pass
/// (local state carried across the loop, per the spec).
fn build_wave(ctx: &InstanceContext, order_indices: &[usize]) -> Wave {
    let mut s = WaveBuilder::new(ctx.n_items);
    let mut used_aisle = vec![false; ctx.n_aisles];

    for &o in order_indices {
        if !ctx.valid_orders[o] {
            continue;
        }

        let tentative_total = s.total_units + ctx.order_sum[o];
        if tentative_total > ctx.ub {
            continue;
        }

        let mut tentative_picked = s.units_picked.clone();
        for &(item, qty) in &ctx.orders[o] {
            tentative_picked[item] += qty;
        }

        if tentative_total < ctx.lb {
            // Open question #2: commit without re-validating previously
            // accepted orders, and without extending aisles yet.
            if !ctx.exceeds_stock(&tentative_picked) {
                s.orders.push(o);
                s.units_picked = tentative_picked;
                s.total_units = tentative_total;
            }
            continue;
        }

        let deficit: Vec<i64> = tentative_picked
            .iter()
            .zip(s.units_available.iter())
            .map(|(&picked, &avail)| (picked - avail).max(0))
            .collect();

        if deficit.iter().all(|&d| d == 0) {
            s.orders.push(o);
            s.units_picked = tentative_picked;
            s.total_units = tentative_total;
            continue;
        }

        let mut new_aisles = Vec::new();
        let mut reserved = used_aisle.clone();
        let mut ok = true;
        for (item, &need) in deficit.iter().enumerate() {
            if need <= 0 {
                continue;
            }
            let eligible = |a: usize| !reserved[a];
            match ctx.matrix.cover_row(item, &eligible, need, true) {
                Some(picked) => {
                    for &a in &picked {
                        reserved[a] = true;
                    }
                    new_aisles.extend(picked);
                }
                None => {
                    ok = false;
                    break;
                }
            }
        }

        if !ok {
            continue;
        }

        for &a in &new_aisles {
            used_aisle[a] = true;
            s.aisles.push(a);
            for &(item, qty) in &ctx.aisles[a] {
                s.units_available[item] += qty;
            }
        }

        s.orders.push(o);
        s.units_picked = tentative_picked;
        s.total_units = tentative_total;
    }

    s.into_wave()
}

/// Sorts orders by `OrderSum` descending.
pub fn decreasing_total(ctx: &InstanceContext) -> Wave {
    let mut order_indices: Vec<usize> = (0..ctx.n_orders).collect();
    order_indices.sort_unstable_by(|&a, &b| ctx.order_sum[b].cmp(&ctx.order_sum[a]));
    build_wave(ctx, &order_indices)
}

/// Sorts orders by `OrderSum[o] / |greedy_coverage(o)|` descending: each
/// order is pre-evaluated against a greedy coverage of its own demand to
/// estimate how many aisles it would cost to serve alone.
pub fn decreasing_effort(ctx: &InstanceContext) -> Wave {
    let mut effort: Vec<(usize, f64)> = (0..ctx.n_orders)
        .map(|o| {
            let mut demand = vec![0i64; ctx.n_items];
            for &(item, qty) in &ctx.orders[o] {
                demand[item] += qty;
            }
            let aisles = select_covering_aisles(ctx, &demand, CoverageMode::Greedy, &|_| false);
            let cost = aisles.len().max(1) as f64;
            (o, ctx.order_sum[o] as f64 / cost)
        })
        .collect();

    effort.sort_unstable_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let order_indices: Vec<usize> = effort.into_iter().map(|(o, _)| o).collect();
    build_wave(ctx, &order_indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_c_lower_bound_forces_aisle_extension() {
        let orders = vec![vec![(0, 3)], vec![(1, 4)]];
        let aisles = vec![vec![(0, 5)], vec![(1, 5)]];
        let ctx = InstanceContext::new(orders, aisles, 2, 7, 10);

        let wave = decreasing_total(&ctx);
        assert_eq!(wave.orders, vec![1, 0]);
        assert_eq!(wave.total_units_picked, 7);
        let mut aisles_sorted = wave.aisles.clone();
        aisles_sorted.sort_unstable();
        assert_eq!(aisles_sorted, vec![0, 1]);
    }

    #[test]
    fn scenario_d_ub_cap_admits_only_one_order() {
        let orders = vec![vec![(0, 6)], vec![(0, 6)]];
        let aisles = vec![vec![(0, 12)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);

        let wave = decreasing_total(&ctx);
        assert_eq!(wave.orders.len(), 1);
        assert_eq!(wave.total_units_picked, 6);
        assert_eq!(wave.aisles, vec![0]);
    }

    #[test]
    fn returns_empty_wave_when_no_order_is_admissible() {
        let orders = vec![vec![(0, 50)]];
        let aisles = vec![vec![(0, 5)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);
        let wave = decreasing_total(&ctx);
        assert!(wave.orders.is_empty());
    }

    #[test]
    fn decreasing_effort_also_respects_ub() {
        let orders = vec![vec![(0, 6)], vec![(0, 6)]];
        let aisles = vec![vec![(0, 12)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);
        let wave = decreasing_effort(&ctx);
        assert!(wave.total_units_picked <= 10);
    }
}
