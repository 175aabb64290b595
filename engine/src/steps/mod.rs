//! The fixed four-step timeline and its transition functions
//!
//! The simulation is an ordered sequence of exactly four steps. Each step
//! carries display metadata and a pure transition from (parameters,
//! previous portfolio) to the next portfolio, plus the log line describing
//! what the policy did. The sequence is the timeline: step N's transition
//! is only meaningful applied to the portfolio step N-1 produced.
//!
//! Dispatch is a single exhaustive `match`, so adding or removing a step
//! is a compile error everywhere it matters.

use crate::models::params::ParameterSet;
use crate::models::portfolio::Portfolio;
use serde::{Deserialize, Serialize};

/// One step of the timeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Initial,
    Shock,
    Rebalance,
    Distribution,
}

/// Result of applying one transition: the replacement portfolio and the
/// log line the step emitted (the engine appends it; transitions stay
/// side-effect-free).
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub portfolio: Portfolio,
    pub message: Option<String>,
}

impl Step {
    /// The timeline, in execution order.
    pub const SEQUENCE: [Step; 4] = [Step::Initial, Step::Shock, Step::Rebalance, Step::Distribution];

    /// Ordinal position in the timeline (0-3).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Step at an ordinal position. Returns `None` past the end.
    pub fn from_index(index: usize) -> Option<Step> {
        Step::SEQUENCE.get(index).copied()
    }

    /// Symbolic key.
    pub fn key(self) -> &'static str {
        match self {
            Step::Initial => "INITIAL",
            Step::Shock => "SHOCK",
            Step::Rebalance => "REBALANCE",
            Step::Distribution => "DISTRIBUTION",
        }
    }

    /// Short display title.
    pub fn title(self) -> &'static str {
        match self {
            Step::Initial => "Initial Allocation",
            Step::Shock => "Market Shock",
            Step::Rebalance => "Policy Rebalance",
            Step::Distribution => "Yield Distribution",
        }
    }

    /// What happens during this step.
    pub fn description(self) -> &'static str {
        match self {
            Step::Initial => {
                "The treasury starts from its baseline allocation across \
                 USDC, T-Bills, corporate bonds, and cash."
            }
            Step::Shock => {
                "A market downturn hits the riskiest sleeve: corporate bond \
                 holdings take the configured percentage haircut."
            }
            Step::Rebalance => {
                "The on-chain policy checks the reserve ratio against its \
                 target. If reserves are short it de-risks automatically, \
                 rotating half the remaining bonds into T-Bills."
            }
            Step::Distribution => {
                "The scheduled payout fires: a percentage of total value is \
                 distributed, drawn from cash first and then from T-Bills."
            }
        }
    }

    /// How the same moment plays out without autonomous policies.
    pub fn comparison(self) -> &'static str {
        match self {
            Step::Initial => {
                "Traditional setup: allocations wired manually through a \
                 custodian over several days."
            }
            Step::Shock => {
                "Traditional desk: the drop is noticed at the next daily \
                 reconciliation, hours after the move."
            }
            Step::Rebalance => {
                "Traditional desk: a committee signs off, then traders work \
                 the orders; the hedge lands a day later."
            }
            Step::Distribution => {
                "Traditional ops: a batch payout run, manually reconciled \
                 against the ledger."
            }
        }
    }

    /// Whether this is the last step of the timeline.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Step::Distribution)
    }

    /// The step after this one, or `None` at the end of the timeline.
    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    /// Apply this step's transition to the portfolio the previous step
    /// produced.
    ///
    /// Pure: reads the parameters, never mutates its inputs, and reports
    /// its log line in the returned [`StepOutcome`].
    pub fn apply(self, params: &ParameterSet, previous: &Portfolio) -> StepOutcome {
        match self {
            Step::Initial => StepOutcome {
                portfolio: Portfolio::initial(),
                message: None,
            },

            Step::Shock => {
                let mut next = *previous;
                next.bonds = previous.bonds * (1.0 - params.shock_magnitude / 100.0);
                let lost = previous.bonds - next.bonds;
                let message = format!(
                    "[T+1] Market shock: Bonds dropped by {}% (-${}k)",
                    params.shock_magnitude,
                    round_thousands(lost)
                );
                StepOutcome {
                    portfolio: next,
                    message: Some(message),
                }
            }

            Step::Rebalance => {
                let ratio = previous.reserve_ratio();
                if ratio < params.target_reserve_ratio {
                    let sell_amount = previous.bonds * 0.5;
                    let mut next = *previous;
                    next.bonds -= sell_amount;
                    next.t_bills += sell_amount;
                    let message = format!(
                        "[T+2] Rebalance triggered: Sold ${}k Bonds, bought T-Bills",
                        round_thousands(sell_amount)
                    );
                    StepOutcome {
                        portfolio: next,
                        message: Some(message),
                    }
                } else {
                    let message = format!(
                        "[T+2] Rebalance check: Ratio healthy ({:.1}%), no action needed",
                        ratio
                    );
                    StepOutcome {
                        portfolio: *previous,
                        message: Some(message),
                    }
                }
            }

            Step::Distribution => {
                let dist_amount = previous.total_value() * params.yield_distribution / 100.0;
                let mut next = *previous;
                if next.cash >= dist_amount {
                    next.cash -= dist_amount;
                } else {
                    // Cash floors at zero; the shortfall comes out of
                    // T-Bills, which may go negative when the payout is
                    // large relative to liquid holdings.
                    let shortfall = dist_amount - next.cash;
                    next.cash = 0.0;
                    next.t_bills -= shortfall;
                }
                let message = format!(
                    "[T+3] Distribution: Paid out ${}k ({}%) yield",
                    round_thousands(dist_amount),
                    params.yield_distribution
                );
                StepOutcome {
                    portfolio: next,
                    message: Some(message),
                }
            }
        }
    }
}

/// Dollar amount rounded to the nearest thousand, for log lines.
fn round_thousands(amount: f64) -> i64 {
    (amount / 1000.0).round() as i64
}
