//! The `Wave` record: a chosen subset of orders plus a chosen subset of
//! aisles, along with the derived aggregates every other component reads.

use crate::instance::InstanceContext;

#[derive(Debug, Clone, Default)]
pub struct Wave {
    pub orders: Vec<usize>,
    pub aisles: Vec<usize>,
    pub units_picked: Vec<i64>,
    pub units_available: Vec<i64>,
    pub total_units_picked: i64,
}

impl Wave {
    pub fn empty(n_items: usize) -> Self {
        Wave {
            orders: Vec::new(),
            aisles: Vec::new(),
            units_picked: vec![0; n_items],
            units_available: vec![0; n_items],
            total_units_picked: 0,
        }
    }

    pub fn from_sets(ctx: &InstanceContext, orders: Vec<usize>, aisles: Vec<usize>) -> Self {
        let mut units_picked = vec![0i64; ctx.n_items];
        let mut total_units_picked = 0i64;
        for &o in &orders {
            total_units_picked += ctx.order_sum[o];
            for &(item, qty) in &ctx.orders[o] {
                units_picked[item] += qty;
            }
        }

        let mut units_available = vec![0i64; ctx.n_items];
        for &a in &aisles {
            for &(item, qty) in &ctx.aisles[a] {
                units_available[item] += qty;
            }
        }

        Wave {
            orders,
            aisles,
            units_picked,
            units_available,
            total_units_picked,
        }
    }
}

/// "Exists greater" predicate: true as soon as `a[i] > b[i]` for some `i`,
/// short-circuiting on the first offending index rather than scanning the
/// whole domain to find the maximal violation. This is intentional — the
/// reference codebase's equivalent helper is an existence check, not a
/// pointwise-dominance check, and every caller here relies on that.
pub fn units_exceed_any(a: &[i64], b: &[i64]) -> bool {
    a.iter().zip(b.iter()).any(|(x, y)| x > y)
}

/// True iff both sets are non-empty, the total lies in `[LB, UB]`, and
/// `units_picked <= units_available` pointwise.
pub fn is_feasible(ctx: &InstanceContext, wave: &Wave) -> bool {
    if wave.orders.is_empty() || wave.aisles.is_empty() {
        return false;
    }
    if wave.total_units_picked < ctx.lb || wave.total_units_picked > ctx.ub {
        return false;
    }
    !units_exceed_any(&wave.units_picked, &wave.units_available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InstanceContext;
    use crate::ip_seed::NullIpSeedPort;

    #[test]
    fn scenario_a_trivial_single_order_wave() {
        let ctx = InstanceContext::new(
            vec![vec![(0, 5)]],
            vec![vec![(0, 10)]],
            1,
            1,
            10,
        );
        let wave = Wave::from_sets(&ctx, vec![0], vec![0]);
        assert_eq!(wave.orders, vec![0]);
        assert_eq!(wave.aisles, vec![0]);
        assert_eq!(wave.units_picked, vec![5]);
        assert_eq!(wave.units_available, vec![10]);
        assert_eq!(wave.total_units_picked, 5);
        assert!(is_feasible(&ctx, &wave));
    }

    #[test]
    fn scenario_b_infeasible_stock_below_demand() {
        let ctx = InstanceContext::new(vec![vec![(0, 7)]], vec![vec![(0, 5)]], 1, 1, 10);
        assert!(!ctx.valid_orders[0]);
        let wave = Wave::from_sets(&ctx, vec![0], vec![0]);
        assert!(!is_feasible(&ctx, &wave));
    }

    #[test]
    fn scenario_e_empty_wave_degenerate() {
        let ctx = InstanceContext::new(vec![], vec![vec![(0, 5)]], 1, 0, 0);
        let wave = Wave::empty(ctx.n_items);
        assert!(!is_feasible(&ctx, &wave));
        // driver construction succeeds even with zero orders
        let _port = NullIpSeedPort;
    }
}
