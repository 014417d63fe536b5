use serde::{Deserialize, Serialize};

use crate::error::FinbrError;
use crate::FinbrResult;

// ---------------------------------------------------------------------------
// Solver constants
// ---------------------------------------------------------------------------

/// Default seed for the Newton phase, roughly 0.5% a.m.
pub const DEFAULT_GUESS: f64 = 0.005;

const MAX_NEWTON_ITERATIONS: u32 = 50;
const MAX_BISECTION_ITERATIONS: u32 = 100;

/// Newton stops once successive iterates are this close.
const STEP_TOLERANCE: f64 = 1e-10;
/// Bisection stops once |NPV(mid)| falls under this.
const RESIDUAL_TOLERANCE: f64 = 1e-10;
/// Derivative magnitudes under this are a flat point Newton cannot leave.
const FLAT_DERIVATIVE: f64 = 1e-15;

const BRACKET_LOW: f64 = -0.99;
const BRACKET_HIGH: f64 = 1.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveMethod {
    Newton,
    Bisection,
}

/// Outcome of an IRR solve. `converged == false` means the bisection budget
/// ran out and `rate` is the last midpoint; callers must judge its
/// plausibility before trusting it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IrrSolution {
    pub rate: f64,
    pub method: SolveMethod,
    pub iterations: u32,
    pub converged: bool,
    /// NPV left at the returned rate.
    pub residual: f64,
}

// ---------------------------------------------------------------------------
// NPV on f64
// ---------------------------------------------------------------------------

// The solver iterates on f64 rather than Decimal: the bisection bracket
// endpoint at -0.99 raises (1 + r)^t past Decimal's 28-digit underflow floor
// for t >= 14, while f64 keeps ~300 orders of magnitude in reserve. Money
// stays Decimal everywhere else; conversion happens once at this boundary.

fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_derivative(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / (1.0 + rate).powi(t as i32 + 1))
        .sum()
}

// ---------------------------------------------------------------------------
// Hybrid Newton / bisection solve
// ---------------------------------------------------------------------------

/// Periodic internal rate of return of a signed cash-flow series.
///
/// Newton-Raphson converges in a handful of iterations on well-behaved loan
/// series but can diverge or stall on a flat plateau when the series has
/// unusual sign structure; sign-change bisection over [-0.99, 1.0] is the
/// guaranteed-progress fallback. A bisection run that exhausts its budget
/// still returns the final midpoint, tagged `converged: false`.
pub fn solve_monthly_irr(cash_flows: &[f64], guess: f64) -> FinbrResult<IrrSolution> {
    if cash_flows.len() < 2 {
        return Err(FinbrError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    // Newton phase.
    let mut x0 = guess;
    for iteration in 0..MAX_NEWTON_ITERATIONS {
        let f = npv(x0, cash_flows);
        let df = npv_derivative(x0, cash_flows);

        if !f.is_finite() || !df.is_finite() || df.abs() < FLAT_DERIVATIVE {
            break;
        }

        let x1 = x0 - f / df;
        if !x1.is_finite() {
            break;
        }
        if (x1 - x0).abs() < STEP_TOLERANCE {
            return Ok(IrrSolution {
                rate: x1,
                method: SolveMethod::Newton,
                iterations: iteration + 1,
                converged: true,
                residual: npv(x1, cash_flows),
            });
        }
        x0 = x1;
    }

    // Bisection fallback.
    let mut low = BRACKET_LOW;
    let mut high = BRACKET_HIGH;
    let mut mid = 0.5 * (low + high);

    for iteration in 0..MAX_BISECTION_ITERATIONS {
        mid = 0.5 * (low + high);
        let f_mid = npv(mid, cash_flows);

        if f_mid.abs() < RESIDUAL_TOLERANCE {
            return Ok(IrrSolution {
                rate: mid,
                method: SolveMethod::Bisection,
                iterations: iteration + 1,
                converged: true,
                residual: f_mid,
            });
        }

        if npv(low, cash_flows) * f_mid < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(IrrSolution {
        rate: mid,
        method: SolveMethod::Bisection,
        iterations: MAX_BISECTION_ITERATIONS,
        converged: false,
        residual: npv(mid, cash_flows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_flows_rejected() {
        assert!(solve_monthly_irr(&[100.0], DEFAULT_GUESS).is_err());
        assert!(solve_monthly_irr(&[], DEFAULT_GUESS).is_err());
    }

    #[test]
    fn test_newton_recovers_loan_rate() {
        // 10_000 disbursed, twelve installments of the exact 1% PRICE payment.
        let installment = 888.487_886_783_417_5;
        let mut flows = vec![10_000.0];
        flows.extend(std::iter::repeat(-installment).take(12));

        let solution = solve_monthly_irr(&flows, DEFAULT_GUESS).unwrap();
        assert!(solution.converged);
        assert_eq!(solution.method, SolveMethod::Newton);
        assert!((solution.rate - 0.01).abs() < 1e-8);
        assert!(solution.residual.abs() < 1e-6);
    }

    #[test]
    fn test_npv_at_solution_is_zero() {
        let flows = vec![5_000.0, -1_000.0, -1_000.0, -1_000.0, -1_000.0, -1_000.0, -1_000.0];
        let solution = solve_monthly_irr(&flows, DEFAULT_GUESS).unwrap();
        assert!(solution.converged);
        assert!(npv(solution.rate, &flows).abs() < 1e-6);
    }

    #[test]
    fn test_flat_plateau_falls_back_to_bisection() {
        // A single far-future inflow: Newton's first step overshoots to a
        // large negative rate where the derivative vanishes, handing the
        // problem to bisection. Root: (1+r)^12 = 1/1000.
        let mut flows = vec![-1_000.0];
        flows.extend(std::iter::repeat(0.0).take(11));
        flows.push(1.0);

        let solution = solve_monthly_irr(&flows, DEFAULT_GUESS).unwrap();
        assert_eq!(solution.method, SolveMethod::Bisection);
        assert!(solution.converged);

        let expected = 0.001_f64.powf(1.0 / 12.0) - 1.0;
        assert!((solution.rate - expected).abs() < 1e-6);
    }

    #[test]
    fn test_rootless_series_is_best_effort() {
        // All-positive flows have no IRR; the solver must come back
        // unconverged rather than pretend.
        let flows = vec![100.0, 100.0, 100.0];
        let solution = solve_monthly_irr(&flows, DEFAULT_GUESS).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.method, SolveMethod::Bisection);
    }

    #[test]
    fn test_zero_rate_series() {
        // Lend 1200, get back 12 x 100: exactly zero return.
        let mut flows = vec![1_200.0];
        flows.extend(std::iter::repeat(-100.0).take(12));

        let solution = solve_monthly_irr(&flows, DEFAULT_GUESS).unwrap();
        assert!(solution.converged);
        assert!(solution.rate.abs() < 1e-8);
    }
}
