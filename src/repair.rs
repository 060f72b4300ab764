//! The repair operator: projects a (possibly infeasible) `Individual`
//! in place toward the feasible region. Not locally optimal by design — it
//! only pushes the individual far enough that the penalized objective has a
//! meaningful gradient across generations.

use crate::bitset::PackedBitSet;
use crate::coverage::{select_covering_aisles, CoverageMode};
use crate::individual::Individual;
use crate::instance::InstanceContext;

pub fn repair(ctx: &InstanceContext, threshold: f64, ind: &mut Individual) {
    let mut order_bits = PackedBitSet::from_continuous(&ind.orders, threshold);
    let mut aisle_bits = PackedBitSet::from_continuous(&ind.aisles, threshold);

    let mut total_units = total_of(ctx, &order_bits);

    while total_units > ctx.ub {
        match order_bits.iter_ones().next() {
            Some(lowest) => {
                order_bits.clear_bit(lowest);
                total_units -= ctx.order_sum[lowest];
            }
            None => break,
        }
    }

    while total_units < ctx.lb {
        let clear: Vec<usize> = order_bits.iter_zeros().collect();
        if clear.is_empty() {
            break;
        }
        let pick = clear[ctx.gen_index(clear.len())];
        order_bits.set(pick, true);
        total_units += ctx.order_sum[pick];
    }

    if aisle_bits.is_empty() {
        let pick = ctx.gen_index(ctx.n_aisles);
        aisle_bits.set(pick, true);
    }

    let required = required_units(ctx, &order_bits, &ctx.orders);
    let available = available_units(ctx, &aisle_bits, &ctx.aisles);

    if required.iter().zip(available.iter()).any(|(&r, &a)| r > a) {
        let mode = if ctx.gen_bool() {
            CoverageMode::Greedy
        } else {
            CoverageMode::Weighted
        };
        // per the repair contract, the selector runs against the full required
        // map (not the deficit) and considers every aisle, not just the ones
        // not already selected; the union below is idempotent for aisles
        // already set.
        let extra = select_covering_aisles(ctx, &required, mode, &|_| false);
        let extra_bits = PackedBitSet::from_indices(ctx.n_aisles, extra);
        aisle_bits.union_with(&extra_bits);
    }

    ind.orders = order_bits.to_continuous();
    ind.aisles = aisle_bits.to_continuous();
}

fn total_of(ctx: &InstanceContext, bits: &PackedBitSet) -> i64 {
    bits.iter_ones().map(|o| ctx.order_sum[o]).sum()
}

fn required_units(ctx: &InstanceContext, bits: &PackedBitSet, catalog: &[Vec<(usize, i64)>]) -> Vec<i64> {
    let mut out = vec![0i64; ctx.n_items];
    for o in bits.iter_ones() {
        for &(item, qty) in &catalog[o] {
            out[item] += qty;
        }
    }
    out
}

fn available_units(ctx: &InstanceContext, bits: &PackedBitSet, catalog: &[Vec<(usize, i64)>]) -> Vec<i64> {
    required_units(ctx, bits, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::is_feasible;

    #[test]
    fn repair_trims_above_ub_to_lowest_indexed_bit_first() {
        let orders = vec![vec![(0, 6)], vec![(0, 6)], vec![(0, 6)]];
        let aisles = vec![vec![(0, 30)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);
        let mut ind = Individual {
            orders: vec![1.0, 1.0, 1.0],
            aisles: vec![1.0],
        };
        repair(&ctx, 0.5, &mut ind);
        let wave = ind.to_wave(&ctx, 0.5);
        assert!(wave.total_units_picked <= 10);
        // the lowest-indexed order should have been dropped first
        assert_eq!(ind.orders[0], 0.0);
    }

    #[test]
    fn repair_fills_up_to_lb_when_below() {
        let orders = vec![vec![(0, 2)], vec![(0, 2)], vec![(0, 2)]];
        let aisles = vec![vec![(0, 30)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 5, 10);
        let mut ind = Individual {
            orders: vec![1.0, 0.0, 0.0],
            aisles: vec![0.0],
        };
        repair(&ctx, 0.5, &mut ind);
        let wave = ind.to_wave(&ctx, 0.5);
        assert!(wave.total_units_picked >= 5 || wave.orders.len() == 3);
    }

    #[test]
    fn repair_never_leaves_aisles_empty() {
        let orders = vec![vec![(0, 5)]];
        let aisles = vec![vec![(0, 10)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);
        let mut ind = Individual {
            orders: vec![1.0],
            aisles: vec![0.0],
        };
        repair(&ctx, 0.5, &mut ind);
        assert!(ind.aisles.iter().any(|&v| v >= 0.5));
    }

    #[test]
    fn repair_extends_aisles_to_cover_deficit() {
        let orders = vec![vec![(0, 8)]];
        let aisles = vec![vec![(0, 3)], vec![(0, 10)]];
        let ctx = InstanceContext::new(orders, aisles, 1, 1, 10);
        let mut ind = Individual {
            orders: vec![1.0],
            aisles: vec![1.0, 0.0],
        };
        repair(&ctx, 0.5, &mut ind);
        let wave = ind.to_wave(&ctx, 0.5);
        assert!(is_feasible(&ctx, &wave));
    }
}
