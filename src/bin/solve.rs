//! Thin demo binary: synthesizes a random wave-picking instance and runs
//! the IWOA driver against it. Instance file parsing and result
//! serialization are explicitly out of scope for the core; this exists
//! only to exercise it end to end.

use std::time::{Duration, Instant};

use peak_alloc::PeakAlloc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use structopt::StructOpt;

use wavepick::config::SolverConfig;
use wavepick::driver::IwoaSolver;
use wavepick::instance::{InstanceContext, InstantStopwatch};
use wavepick::ip_seed::NullIpSeedPort;
use wavepick::prelude::{InterruptibleSolver, Solver};
use wavepick::wave::is_feasible;

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

#[derive(Debug, StructOpt)]
#[structopt(name = "solve", about = "Run the IWOA solver against a synthesized instance")]
struct Args {
    #[structopt(long, default_value = "200")]
    orders: usize,
    #[structopt(long, default_value = "20")]
    aisles: usize,
    #[structopt(long, default_value = "50")]
    items: usize,
    #[structopt(long, default_value = "50")]
    lb: i64,
    #[structopt(long, default_value = "200")]
    ub: i64,
    #[structopt(long, default_value = "10")]
    timeout_secs: u64,
    #[structopt(long, default_value = "42")]
    seed: u64,
}

fn synthesize(args: &Args) -> (Vec<Vec<(usize, i64)>>, Vec<Vec<(usize, i64)>>) {
    let mut rng = StdRng::seed_from_u64(args.seed);

    let orders: Vec<Vec<(usize, i64)>> = (0..args.orders)
        .map(|_| {
            let n_lines = rng.gen_range(1..=4.min(args.items));
            (0..n_lines)
                .map(|_| (rng.gen_range(0..args.items), rng.gen_range(1..=5)))
                .collect()
        })
        .collect();

    let aisles: Vec<Vec<(usize, i64)>> = (0..args.aisles)
        .map(|_| {
            let n_lines = rng.gen_range(1..=6.min(args.items));
            (0..n_lines)
                .map(|_| (rng.gen_range(0..args.items), rng.gen_range(5..=20)))
                .collect()
        })
        .collect();

    (orders, aisles)
}

fn main() {
    let args = Args::from_args();
    tracing_subscriber::fmt::init();

    let (orders, aisles) = synthesize(&args);
    let mut config = SolverConfig::default();
    config.max_runtime_ms = args.timeout_secs * 1000;

    let ctx = InstanceContext::with_config(orders, aisles, args.items, args.lb, args.ub, &config, args.seed);

    let start = Instant::now();
    let timeout = Duration::from_secs(args.timeout_secs);
    let mut solver = IwoaSolver::new(&ctx, config, Box::new(NullIpSeedPort), Box::new(InstantStopwatch::new()));
    let status = solver.maximize_with_interrupt(move || start.elapsed() >= timeout);

    let wave = solver.best_wave().unwrap_or_default();
    println!(
        "{:>10} | {:>8.2}s | {:>8.2}MB | {:>12.4} | orders={:>5} | aisles={:>5} | feasible={}",
        status,
        start.elapsed().as_secs_f32(),
        PEAK_ALLOC.peak_usage_as_mb(),
        solver.best_value().unwrap_or(f64::NEG_INFINITY),
        wave.orders.len(),
        wave.aisles.len(),
        is_feasible(&ctx, &wave),
    );
}
