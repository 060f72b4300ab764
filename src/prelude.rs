use std::fmt::Display;

use crate::wave::Wave;

/// The solver surface: a type that can search for a high-value `Wave` and
/// report the best it has found. Mirrors the shape used across the
/// reference codebase's other solvers, with `Decision`/state replaced by
/// `Wave`.
pub trait Solver {
    fn maximize(&mut self);
    fn best_value(&self) -> Option<f64>;
    fn best_wave(&self) -> Option<Wave>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStatus {
    Proved,
    Interrupted,
}
impl Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionStatus::Proved => write!(f, "Proved"),
            ResolutionStatus::Interrupted => write!(f, "Timeout"),
        }
    }
}

pub trait InterruptibleSolver: Solver {
    fn maximize_with_interrupt<I>(&mut self, interrupt: I) -> ResolutionStatus
    where
        I: Fn() -> bool + Send + Sync + 'static;

    fn best_value_so_far(&self) -> Option<f64>;
    fn best_wave_so_far(&self) -> Option<Wave>;
}
