//! Portfolio ledger and derived metrics
//!
//! The portfolio is a four-field ledger of dollar amounts, one per asset
//! class. The engine owns exactly one and replaces it wholesale on every
//! step transition; nothing patches individual fields from outside.
//!
//! # Critical Invariants
//!
//! 1. All four asset classes are always present (fields, not a map)
//! 2. Amounts stay non-negative through the shock and rebalance
//!    transitions; only the distribution shortfall path can push t-bills
//!    below zero
//! 3. Metrics are pure reads; they never mutate the ledger

use crate::models::asset::AssetId;
use crate::models::params::ParameterSet;
use serde::{Deserialize, Serialize};

/// Fixed nominal liabilities figure the reserve ratio is measured against
/// (dollars). The simulation never changes it.
pub const NOMINAL_LIABILITIES: f64 = 1_000_000.0;

// Composition risk weights per asset class (see `Portfolio::risk_score`).
const USDC_RISK_WEIGHT: f64 = 5.0;
const T_BILLS_RISK_WEIGHT: f64 = 10.0;
const BONDS_RISK_WEIGHT: f64 = 80.0;
const CASH_RISK_WEIGHT: f64 = 0.0;

/// Holdings per asset class, in dollars.
///
/// # Example
///
/// ```
/// use treasury_simulator_core_rs::Portfolio;
///
/// let portfolio = Portfolio::initial();
/// assert_eq!(portfolio.total_value(), 1_000_000.0);
/// assert_eq!(portfolio.reserve_ratio(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub usdc: f64,
    #[serde(rename = "tBills")]
    pub t_bills: f64,
    pub bonds: f64,
    pub cash: f64,
}

impl Portfolio {
    /// The fixed starting allocation every run begins from.
    pub fn initial() -> Self {
        Self {
            usdc: 400_000.0,
            t_bills: 300_000.0,
            bonds: 200_000.0,
            cash: 100_000.0,
        }
    }

    /// Holding for a single asset class.
    pub fn amount(&self, id: AssetId) -> f64 {
        match id {
            AssetId::Usdc => self.usdc,
            AssetId::TBills => self.t_bills,
            AssetId::Bonds => self.bonds,
            AssetId::Cash => self.cash,
        }
    }

    /// Sum of the four holdings.
    pub fn total_value(&self) -> f64 {
        self.usdc + self.t_bills + self.bonds + self.cash
    }

    /// Total value over the fixed nominal liabilities, in percent.
    ///
    /// This is also the threshold input of the rebalance step.
    pub fn reserve_ratio(&self) -> f64 {
        self.total_value() / NOMINAL_LIABILITIES * 100.0
    }

    /// Toy 0-100 risk heuristic: composition-weighted risk scaled by the
    /// configured shock magnitude.
    ///
    /// Each asset's fractional weight of total value is multiplied by a
    /// fixed per-class weight (bonds 80, t-bills 10, usdc 5, cash 0), the
    /// sum is scaled by `1 + shock/100`, and the result is clamped to
    /// [0, 100]. A portfolio with zero total value scores 0.
    ///
    /// Not a statistical model; the exact arithmetic is kept stable so
    /// runs stay comparable.
    pub fn risk_score(&self, params: &ParameterSet) -> f64 {
        let total = self.total_value();
        if total == 0.0 {
            return 0.0;
        }

        let composition = USDC_RISK_WEIGHT * (self.usdc / total)
            + T_BILLS_RISK_WEIGHT * (self.t_bills / total)
            + BONDS_RISK_WEIGHT * (self.bonds / total)
            + CASH_RISK_WEIGHT * (self.cash / total);

        let shocked = composition * (1.0 + params.shock_magnitude / 100.0);
        shocked.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params_with_shock(shock_magnitude: f64) -> ParameterSet {
        ParameterSet {
            shock_magnitude,
            ..ParameterSet::default()
        }
    }

    #[test]
    fn test_initial_allocation() {
        let portfolio = Portfolio::initial();
        assert_eq!(portfolio.usdc, 400_000.0);
        assert_eq!(portfolio.t_bills, 300_000.0);
        assert_eq!(portfolio.bonds, 200_000.0);
        assert_eq!(portfolio.cash, 100_000.0);
        assert_eq!(portfolio.total_value(), 1_000_000.0);
    }

    #[test]
    fn test_amount_by_id() {
        let portfolio = Portfolio::initial();
        assert_eq!(portfolio.amount(AssetId::Usdc), 400_000.0);
        assert_eq!(portfolio.amount(AssetId::TBills), 300_000.0);
        assert_eq!(portfolio.amount(AssetId::Bonds), 200_000.0);
        assert_eq!(portfolio.amount(AssetId::Cash), 100_000.0);
    }

    #[test]
    fn test_reserve_ratio_of_initial_is_100() {
        assert_eq!(Portfolio::initial().reserve_ratio(), 100.0);
    }

    #[test]
    fn test_risk_score_initial_composition() {
        // 80*0.2 + 10*0.3 + 5*0.4 = 21, then scaled by the shock factor
        let portfolio = Portfolio::initial();
        assert_relative_eq!(
            portfolio.risk_score(&params_with_shock(0.0)),
            21.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            portfolio.risk_score(&params_with_shock(20.0)),
            25.2,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_risk_score_zero_total_is_zero() {
        let empty = Portfolio {
            usdc: 0.0,
            t_bills: 0.0,
            bonds: 0.0,
            cash: 0.0,
        };
        assert_eq!(empty.risk_score(&params_with_shock(50.0)), 0.0);
    }

    #[test]
    fn test_risk_score_clamps_at_100() {
        let all_bonds = Portfolio {
            usdc: 0.0,
            t_bills: 0.0,
            bonds: 1_000_000.0,
            cash: 0.0,
        };
        // 80 * 1.5 = 120 before the clamp
        assert_eq!(all_bonds.risk_score(&params_with_shock(50.0)), 100.0);
    }

    #[test]
    fn test_risk_score_all_cash_is_zero() {
        let all_cash = Portfolio {
            usdc: 0.0,
            t_bills: 0.0,
            bonds: 0.0,
            cash: 1_000_000.0,
        };
        assert_eq!(all_cash.risk_score(&params_with_shock(50.0)), 0.0);
    }
}
