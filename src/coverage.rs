//! Aisle coverage selection: given a required-units vector, pick a set of
//! aisles whose combined stock covers it, either greedily (max contribution
//! first) or via a weighted random walk proportional to contribution.

use crate::instance::InstanceContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageMode {
    Greedy,
    Weighted,
}

/// A contribution map that remembers first-insertion order, so "first max
/// wins" ties resolve the same way regardless of a hashmap's iteration
/// order. `contrib[aisle]` is `0` until the aisle is first touched, at which
/// point it is also pushed onto `order` exactly once.
struct ContributionMap {
    contrib: Vec<i64>,
    touched: Vec<bool>,
    order: Vec<usize>,
}

impl ContributionMap {
    fn new(n_aisles: usize) -> Self {
        ContributionMap {
            contrib: vec![0; n_aisles],
            touched: vec![false; n_aisles],
            order: Vec::new(),
        }
    }

    fn add(&mut self, aisle: usize, amount: i64) {
        if !self.touched[aisle] {
            self.touched[aisle] = true;
            self.order.push(aisle);
        }
        self.contrib[aisle] += amount;
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn total(&self) -> i64 {
        self.order.iter().map(|&a| self.contrib[a]).sum()
    }

    /// First-wins argmax over insertion order.
    fn pick_max(&self) -> usize {
        let mut best_aisle = self.order[0];
        let mut best_contrib = self.contrib[best_aisle];
        for &a in &self.order[1..] {
            if self.contrib[a] > best_contrib {
                best_contrib = self.contrib[a];
                best_aisle = a;
            }
        }
        best_aisle
    }

    fn pick_weighted(&self, ctx: &InstanceContext, total: i64) -> usize {
        let mut r = ctx.gen_weight(total);
        let mut last = self.order[0];
        for &a in &self.order {
            last = a;
            r -= self.contrib[a];
            if r <= 0 {
                return a;
            }
        }
        last
    }
}

/// Selects aisles to cover `required` (dense, indexed by item). Returns the
/// aisles chosen; if full coverage is impossible, returns the best partial
/// set found before contributions dried up.
pub fn select_covering_aisles(
    ctx: &InstanceContext,
    required: &[i64],
    mode: CoverageMode,
    excluded: &dyn Fn(usize) -> bool,
) -> Vec<usize> {
    let mut remaining = required.to_vec();
    let mut selected = Vec::new();
    let mut taken = vec![false; ctx.n_aisles];

    loop {
        if remaining.iter().all(|&r| r <= 0) {
            break;
        }

        let available = |a: usize| !taken[a] && !excluded(a);
        let contributions = contribution_map(ctx, &remaining, &available);
        if contributions.is_empty() {
            break;
        }

        let total = contributions.total();
        if total <= 0 {
            break;
        }

        let chosen = match mode {
            CoverageMode::Greedy => contributions.pick_max(),
            CoverageMode::Weighted => contributions.pick_weighted(ctx, total),
        };

        selected.push(chosen);
        taken[chosen] = true;
        for (item, r) in remaining.iter_mut().enumerate() {
            if *r <= 0 {
                continue;
            }
            if let Some(qty) = aisle_qty_for_item(ctx, chosen, item) {
                *r -= qty;
            }
        }
    }

    selected
}

/// `contributions[aisle] = sum over item in remaining of min(qty(aisle,item), remaining[item])`,
/// built by iterating the sparse matrix rows of every item still owed, not by
/// scanning every aisle for every item.
fn contribution_map(
    ctx: &InstanceContext,
    remaining: &[i64],
    available: &dyn Fn(usize) -> bool,
) -> ContributionMap {
    let mut contributions = ContributionMap::new(ctx.n_aisles);
    for (item, &need) in remaining.iter().enumerate() {
        if need <= 0 {
            continue;
        }
        for (aisle, qty) in ctx.matrix.row(item) {
            if !available(aisle) {
                continue;
            }
            let contrib = qty.min(need);
            if contrib > 0 {
                contributions.add(aisle, contrib);
            }
        }
    }
    contributions
}

fn aisle_qty_for_item(ctx: &InstanceContext, aisle: usize, item: usize) -> Option<i64> {
    ctx.aisles[aisle]
        .iter()
        .find(|&&(i, _)| i == item)
        .map(|&(_, q)| q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ctx() -> InstanceContext {
        // item0: aisle0=6, aisle1=2; item1: aisle1=4
        let aisles = vec![vec![(0, 6)], vec![(0, 2), (1, 4)]];
        InstanceContext::new(vec![], aisles, 2, 0, 0)
    }

    #[test]
    fn greedy_picks_max_contribution_first() {
        let ctx = sample_ctx();
        let required = vec![5, 0];
        let picked = select_covering_aisles(&ctx, &required, CoverageMode::Greedy, &|_| false);
        assert_eq!(picked.first().copied(), Some(0));
    }

    #[test]
    fn covers_required_demand_when_possible() {
        let ctx = sample_ctx();
        let required = vec![5, 3];
        let picked = select_covering_aisles(&ctx, &required, CoverageMode::Greedy, &|_| false);
        let mut covered = vec![0i64; 2];
        for a in &picked {
            for &(item, qty) in &ctx.aisles[*a] {
                covered[item] += qty;
            }
        }
        assert!(covered[0] >= required[0]);
        assert!(covered[1] >= required[1]);
    }

    #[test]
    fn excluded_aisles_are_never_selected() {
        let ctx = sample_ctx();
        let required = vec![5, 0];
        let picked = select_covering_aisles(&ctx, &required, CoverageMode::Greedy, &|a| a == 0);
        assert!(!picked.contains(&0));
    }

    #[test]
    fn weighted_mode_terminates_and_only_uses_available_aisles() {
        let ctx = sample_ctx();
        let required = vec![5, 3];
        let picked = select_covering_aisles(&ctx, &required, CoverageMode::Weighted, &|_| false);
        for a in &picked {
            assert!(*a < ctx.n_aisles);
        }
    }
}
