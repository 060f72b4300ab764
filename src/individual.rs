//! `Individual`: a population member carrying two continuous position
//! vectors in `[0,1]`, the binarization rule that turns them into a `Wave`,
//! and the single penalized objective used to score one.

use crate::config::SolverConfig;
use crate::instance::InstanceContext;
use crate::wave::{units_exceed_any, Wave};

#[derive(Debug, Clone)]
pub struct Individual {
    pub orders: Vec<f64>,
    pub aisles: Vec<f64>,
}

impl Individual {
    pub fn zeros(n_orders: usize, n_aisles: usize) -> Self {
        Individual {
            orders: vec![0.0; n_orders],
            aisles: vec![0.0; n_aisles],
        }
    }

    pub fn random(ctx: &InstanceContext) -> Self {
        Individual {
            orders: (0..ctx.n_orders).map(|_| ctx.gen_f64()).collect(),
            aisles: (0..ctx.n_aisles).map(|_| ctx.gen_f64()).collect(),
        }
    }

    pub fn from_wave(ctx: &InstanceContext, wave: &Wave) -> Self {
        let mut ind = Self::zeros(ctx.n_orders, ctx.n_aisles);
        for &o in &wave.orders {
            ind.orders[o] = 1.0;
        }
        for &a in &wave.aisles {
            ind.aisles[a] = 1.0;
        }
        ind
    }

    pub fn clamp(&mut self) {
        for v in self.orders.iter_mut().chain(self.aisles.iter_mut()) {
            *v = v.clamp(0.0, 1.0);
        }
    }

    pub fn binarize_orders(&self, threshold: f64) -> Vec<bool> {
        self.orders.iter().map(|&v| v >= threshold).collect()
    }

    pub fn binarize_aisles(&self, threshold: f64) -> Vec<bool> {
        self.aisles.iter().map(|&v| v >= threshold).collect()
    }

    pub fn to_wave(&self, ctx: &InstanceContext, threshold: f64) -> Wave {
        let order_bits = self.binarize_orders(threshold);
        let aisle_bits = self.binarize_aisles(threshold);
        let orders: Vec<usize> = order_bits
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(|(i, _)| i)
            .collect();
        let aisles: Vec<usize> = aisle_bits
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(|(i, _)| i)
            .collect();
        Wave::from_sets(ctx, orders, aisles)
    }
}

fn required_from_bits(bits: &[bool], catalog: &[Vec<(usize, i64)>], n_items: usize) -> Vec<i64> {
    let mut required = vec![0i64; n_items];
    for (i, &set) in bits.iter().enumerate() {
        if !set {
            continue;
        }
        for &(item, qty) in &catalog[i] {
            required[item] += qty;
        }
    }
    required
}

/// The only fitness function: `U / |bits_a|` penalized for out-of-band
/// totals, a missing aisle set, or any item whose picked demand exceeds
/// what the selected aisles can supply.
pub fn objective(ctx: &InstanceContext, config: &SolverConfig, order_bits: &[bool], aisle_bits: &[bool]) -> f64 {
    let u: i64 = order_bits
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b)
        .map(|(o, _)| ctx.order_sum[o])
        .sum();
    let n_aisles = aisle_bits.iter().filter(|&&b| b).count();

    let base = if n_aisles > 0 { u as f64 / n_aisles as f64 } else { 0.0 };

    let lambda = config.penalty_lambda;
    let m = (ctx.ub + ctx.lb) as f64 / 2.0;
    let mut penalty = 0.0;

    if u > ctx.ub || u < ctx.lb {
        penalty += lambda * (u as f64 - m).abs();
    }
    if n_aisles == 0 {
        penalty += lambda * u as f64;
    }

    let picked = required_from_bits(order_bits, &ctx.orders, ctx.n_items);
    let available = required_from_bits(aisle_bits, &ctx.aisles, ctx.n_items);
    if units_exceed_any(&picked, &available) {
        penalty += lambda * u as f64;
    }

    base - penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_1x1(lb: i64, ub: i64) -> InstanceContext {
        InstanceContext::new(vec![vec![(0, 5)]], vec![vec![(0, 10)]], 1, lb, ub)
    }

    #[test]
    fn objective_scenario_a() {
        let ctx = ctx_1x1(1, 10);
        let cfg = SolverConfig::default();
        let value = objective(&ctx, &cfg, &[true], &[true]);
        assert_eq!(value, 5.0);
    }

    #[test]
    fn objective_negative_when_no_aisles_selected() {
        let ctx = ctx_1x1(1, 10);
        let cfg = SolverConfig::default();
        let value = objective(&ctx, &cfg, &[true], &[false]);
        assert!(value < 0.0);
    }

    #[test]
    fn objective_zero_for_empty_orders_with_aisles() {
        // LB=0 so the empty order set (U=0) doesn't trip the below-LB penalty.
        let ctx = ctx_1x1(0, 10);
        let cfg = SolverConfig::default();
        let value = objective(&ctx, &cfg, &[false], &[true]);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn clamp_clips_out_of_range_coordinates() {
        let mut ind = Individual {
            orders: vec![-0.3, 1.4, 0.5],
            aisles: vec![2.0, -1.0],
        };
        ind.clamp();
        assert_eq!(ind.orders, vec![0.0, 1.0, 0.5]);
        assert_eq!(ind.aisles, vec![1.0, 0.0]);
    }

    #[test]
    fn from_wave_round_trips_through_binarization() {
        let ctx = ctx_1x1(1, 10);
        let wave = Wave::from_sets(&ctx, vec![0], vec![0]);
        let ind = Individual::from_wave(&ctx, &wave);
        assert_eq!(ind.orders, vec![1.0]);
        assert_eq!(ind.aisles, vec![1.0]);
        let roundtrip = ind.to_wave(&ctx, 0.5);
        assert_eq!(roundtrip.orders, vec![0]);
        assert_eq!(roundtrip.aisles, vec![0]);
    }
}
