//! The IP Seed Port: the one pluggable capability in the core. A conforming
//! implementation solves (or gives up on) the MILP relaxation described in
//! the spec and returns a `Wave`; the core never depends on a specific
//! solver.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use rustc_hash::FxHashMap;

use crate::config::SolverConfig;
use crate::instance::InstanceContext;
use crate::wave::Wave;

#[derive(Debug, thiserror::Error)]
pub enum IpSeedError {
    #[error("solver binary '{0}' not found on PATH")]
    BinaryNotFound(String),
    #[error("solver process failed: {0}")]
    ProcessIo(#[from] std::io::Error),
    #[error("could not parse solver output: {0}")]
    MalformedSolution(String),
}

/// The abstract port: given the instance and a millisecond budget, attempt a
/// seed. Implementations that can fail (e.g. shelling out to an external
/// binary) return `Err`; the driver is the only caller and always degrades a
/// failure to an empty `Wave` rather than letting it escape `maximize`.
pub trait IpSeedPort {
    fn solve(&self, ctx: &InstanceContext, config: &SolverConfig, budget_ms: u64) -> Result<Wave, IpSeedError>;
}

/// Always returns an empty Wave immediately. The safe default, and what the
/// test suite uses when it doesn't care about MILP seeding.
pub struct NullIpSeedPort;

impl IpSeedPort for NullIpSeedPort {
    fn solve(&self, ctx: &InstanceContext, _config: &SolverConfig, _budget_ms: u64) -> Result<Wave, IpSeedError> {
        Ok(Wave::empty(ctx.n_items))
    }
}

/// Shells out to a CBC-compatible MILP solver binary: writes the relaxation
/// as an LP file, invokes the solver bounded by `budget_ms`, and decodes its
/// solution file back into a `Wave`.
pub struct CbcIpSeedPort {
    binary: PathBuf,
}

impl CbcIpSeedPort {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        CbcIpSeedPort { binary: binary.into() }
    }
}

impl Default for CbcIpSeedPort {
    fn default() -> Self {
        CbcIpSeedPort::new("cbc")
    }
}

impl IpSeedPort for CbcIpSeedPort {
    fn solve(&self, ctx: &InstanceContext, config: &SolverConfig, budget_ms: u64) -> Result<Wave, IpSeedError> {
        let dir = tempfile::tempdir()?;
        let lp_path = dir.path().join("wave.lp");
        let sol_path = dir.path().join("wave.sol");

        let lp = write_lp(ctx, config);
        std::fs::File::create(&lp_path)?.write_all(lp.as_bytes())?;

        let budget_secs = ((budget_ms as f64) / 1000.0).ceil().max(1.0) as u64;

        let status = Command::new(&self.binary)
            .arg(&lp_path)
            .arg("-sec")
            .arg(budget_secs.to_string())
            .arg("-solve")
            .arg("-solution")
            .arg(&sol_path)
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    IpSeedError::BinaryNotFound(self.binary.display().to_string())
                } else {
                    IpSeedError::ProcessIo(e)
                }
            })?;

        if !status.success() || !sol_path.exists() {
            return Ok(Wave::empty(ctx.n_items));
        }

        let contents = std::fs::read_to_string(&sol_path)?;
        decode_solution(ctx, &contents)
    }
}

fn write_lp(ctx: &InstanceContext, config: &SolverConfig) -> String {
    let mut lp = String::new();
    lp.push_str("Maximize\n obj:");
    for o in 0..ctx.n_orders {
        lp.push_str(&format!(" + {} x{}", ctx.order_sum[o], o));
    }
    for a in 0..ctx.n_aisles {
        lp.push_str(&format!(" - {} y{}", config.ip_epsilon, a));
    }
    lp.push('\n');

    lp.push_str("Subject To\n");
    lp.push_str(&format!(" total: {} <=", ctx.lb));
    for o in 0..ctx.n_orders {
        lp.push_str(&format!(" + {} x{}", ctx.order_sum[o], o));
    }
    lp.push_str(&format!(" <= {}\n", ctx.ub));

    for item in 0..ctx.n_items {
        let mut row = String::new();
        for o in 0..ctx.n_orders {
            if let Some(&(_, qty)) = ctx.orders[o].iter().find(|&&(i, _)| i == item) {
                row.push_str(&format!(" + {} x{}", qty, o));
            }
        }
        for a in 0..ctx.n_aisles {
            if let Some(&(_, qty)) = ctx.aisles[a].iter().find(|&&(i, _)| i == item) {
                row.push_str(&format!(" - {} y{}", qty, a));
            }
        }
        // no order or aisle touches this item: drop the row entirely rather
        // than emit a constraint over no variables.
        if !row.is_empty() {
            lp.push_str(&format!(" item_{}:{} <= 0\n", item, row));
        }
    }

    lp.push_str("Binary\n");
    for o in 0..ctx.n_orders {
        lp.push_str(&format!(" x{}\n", o));
    }
    for a in 0..ctx.n_aisles {
        lp.push_str(&format!(" y{}\n", a));
    }
    lp.push_str("End\n");
    lp
}

/// Parses CBC's `-solution` output: a header line followed by rows of
/// `index name value reducedcost`. Collected into a name→value dictionary
/// first (solvers don't guarantee row order matches variable declaration
/// order) and then decoded into order/aisle bits by the `x`/`y` name prefix.
fn decode_solution(ctx: &InstanceContext, contents: &str) -> Result<Wave, IpSeedError> {
    let mut values: FxHashMap<String, f64> = FxHashMap::default();

    for line in contents.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        let name = fields[1].to_string();
        let value: f64 = fields[2]
            .parse()
            .map_err(|_| IpSeedError::MalformedSolution(line.to_string()))?;
        values.insert(name, value);
    }

    let mut orders = Vec::new();
    for o in 0..ctx.n_orders {
        if values.get(&format!("x{}", o)).copied().unwrap_or(0.0) >= 0.5 {
            orders.push(o);
        }
    }
    let mut aisles = Vec::new();
    for a in 0..ctx.n_aisles {
        if values.get(&format!("y{}", a)).copied().unwrap_or(0.0) >= 0.5 {
            aisles.push(a);
        }
    }

    Ok(Wave::from_sets(ctx, orders, aisles))
}
