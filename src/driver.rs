//! The IWOA driver: population init (MILP + two greedy seeds + random
//! fill), per-generation encircling/random-agent/spiral position updates,
//! leader tracking, and deadline-based termination.

use crate::config::SolverConfig;
use crate::heuristics::{decreasing_effort, decreasing_total};
use crate::individual::{objective, Individual};
use crate::instance::{InstanceContext, Stopwatch};
use crate::ip_seed::IpSeedPort;
use crate::prelude::{InterruptibleSolver, ResolutionStatus, Solver};
use crate::repair::repair;
use crate::wave::Wave;

pub struct IwoaSolver<'a> {
    ctx: &'a InstanceContext,
    config: SolverConfig,
    ip_seed: Box<dyn IpSeedPort>,
    stopwatch: Box<dyn Stopwatch>,
    population: Vec<Individual>,
    leader: Individual,
    leader_fitness: f64,
}

impl<'a> IwoaSolver<'a> {
    pub fn new(
        ctx: &'a InstanceContext,
        config: SolverConfig,
        ip_seed: Box<dyn IpSeedPort>,
        stopwatch: Box<dyn Stopwatch>,
    ) -> Self {
        let p = config.population_size.max(1);
        let mut population: Vec<Individual> = (0..p).map(|_| Individual::random(ctx)).collect();

        if p > 0 {
            let budget = ctx.remaining_ms(stopwatch.as_ref()) / 2;
            let seed_wave = ip_seed
                .solve(ctx, &config, budget)
                .unwrap_or_else(|_| Wave::empty(ctx.n_items));
            population[0] = Individual::from_wave(ctx, &seed_wave);
        }
        if p > 3 {
            population[3] = Individual::from_wave(ctx, &decreasing_total(ctx));
        }
        if p > 4 {
            population[4] = Individual::from_wave(ctx, &decreasing_effort(ctx));
        }

        let threshold = config.binarization_threshold;
        let fitness: Vec<f64> = population
            .iter()
            .map(|ind| {
                let order_bits = ind.binarize_orders(threshold);
                let aisle_bits = ind.binarize_aisles(threshold);
                objective(ctx, &config, &order_bits, &aisle_bits)
            })
            .collect();

        let (argmax, &best) = fitness
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, v)| (i, v))
            .unwrap_or((0, &f64::NEG_INFINITY));

        let leader = population[argmax].clone();

        IwoaSolver {
            ctx,
            config,
            ip_seed,
            stopwatch,
            population,
            leader,
            leader_fitness: best,
        }
    }

    fn run(&mut self, interrupt: &dyn Fn() -> bool) -> ResolutionStatus {
        let max_runtime = self.ctx.max_runtime_ms as f64;
        let threshold = self.config.binarization_threshold;
        let mut generation: u64 = 0;

        loop {
            let remaining = self.ctx.remaining_ms(self.stopwatch.as_ref());
            if remaining <= self.config.deadline_slack_ms || interrupt() {
                break;
            }

            let elapsed_sec = self.stopwatch.elapsed_ms() as f64;
            let a = 2.0 - 2.0 * elapsed_sec / max_runtime;
            let b = self.config.spiral_b;

            for i in 0..self.population.len() {
                if self.ctx.gen_bool() {
                    let r1 = self.ctx.gen_f64();
                    let r2 = self.ctx.gen_f64();
                    let coef_a = 2.0 * a * r1 - a;
                    let coef_c = 2.0 * r2;

                    let target = if coef_a.abs() < 1.0 {
                        self.leader.clone()
                    } else {
                        let idx = self.ctx.gen_index(self.population.len());
                        self.population[idx].clone()
                    };

                    encircle(&mut self.population[i], &target, coef_a, coef_c);
                } else {
                    spiral(self.ctx, &mut self.population[i], &self.leader, b);
                }

                let ind = &mut self.population[i];
                ind.clamp();
                repair(self.ctx, threshold, ind);

                let order_bits = ind.binarize_orders(threshold);
                let aisle_bits = ind.binarize_aisles(threshold);
                let fitness = objective(self.ctx, &self.config, &order_bits, &aisle_bits);

                if fitness > self.leader_fitness {
                    self.leader = ind.clone();
                    self.leader_fitness = fitness;
                }
            }

            tracing::debug!(generation, leader_fitness = self.leader_fitness, "generation complete");
            generation += 1;
        }

        ResolutionStatus::Interrupted
    }
}

/// Encircling / random-agent branch: `D = |C*target[j] - ind[j]|`, then
/// `ind[j] <- target[j] - A*D`, applied to both position vectors.
fn encircle(ind: &mut Individual, target: &Individual, coef_a: f64, coef_c: f64) {
    for (x, t) in ind.orders.iter_mut().zip(target.orders.iter()) {
        let d = (coef_c * t - *x).abs();
        *x = t - coef_a * d;
    }
    for (x, t) in ind.aisles.iter_mut().zip(target.aisles.iter()) {
        let d = (coef_c * t - *x).abs();
        *x = t - coef_a * d;
    }
}

/// Spiral branch: per coordinate, `D = |leader[j] - ind[j]|`, draw
/// `l in [-1, 1.1)` clamped to 1.0, `ind[j] <- D*exp(b*l)*cos(2*pi*l) + leader[j]`.
fn spiral(ctx: &InstanceContext, ind: &mut Individual, leader: &Individual, b: f64) {
    for (x, &lj) in ind.orders.iter_mut().zip(leader.orders.iter()) {
        let d = (lj - *x).abs();
        let l = ctx.gen_f64_range(-1.0, 1.1).min(1.0);
        *x = d * (b * l).exp() * (2.0 * std::f64::consts::PI * l).cos() + lj;
    }
    for (x, &lj) in ind.aisles.iter_mut().zip(leader.aisles.iter()) {
        let d = (lj - *x).abs();
        let l = ctx.gen_f64_range(-1.0, 1.1).min(1.0);
        *x = d * (b * l).exp() * (2.0 * std::f64::consts::PI * l).cos() + lj;
    }
}

impl Solver for IwoaSolver<'_> {
    fn maximize(&mut self) {
        self.run(&|| false);
    }

    fn best_value(&self) -> Option<f64> {
        Some(self.leader_fitness)
    }

    fn best_wave(&self) -> Option<Wave> {
        Some(self.leader.to_wave(self.ctx, self.config.binarization_threshold))
    }
}

impl InterruptibleSolver for IwoaSolver<'_> {
    fn maximize_with_interrupt<I>(&mut self, interrupt: I) -> ResolutionStatus
    where
        I: Fn() -> bool + Send + Sync + 'static,
    {
        self.run(&interrupt)
    }

    fn best_value_so_far(&self) -> Option<f64> {
        self.best_value()
    }

    fn best_wave_so_far(&self) -> Option<Wave> {
        self.best_wave()
    }
}
