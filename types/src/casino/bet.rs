use serde::{Deserialize, Serialize};

/// A wager on one round: a game-specific selection plus a stake in chips.
///
/// Callers debit the stake before submitting and are expected to reject zero stakes;
/// a zero stake that does reach a game settles as [`Outcome::Void`] and pays nothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bet<S> {
    pub selection: S,
    pub amount: u64,
}

impl<S> Bet<S> {
    pub fn new(selection: S, amount: u64) -> Self {
        Self { selection, amount }
    }

    pub fn is_void(&self) -> bool {
        self.amount == 0
    }
}

/// Classification of a settled round from the ledger's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Multiplier above 1.0.
    Win,
    /// Multiplier exactly 1.0: the stake comes back.
    Push,
    /// Multiplier below 1.0.
    Loss,
    /// Zero stake: nothing charged, nothing paid.
    Void,
}

/// Result of evaluating a stake against a round outcome.
///
/// `multiplier` is the total-return multiplier (stake included): `0.0` on a loss,
/// `1.0` on a push, `2.0` for an even-money win. `payout` is what the ledger credits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub stake: u64,
    pub multiplier: f64,
    pub payout: u64,
}

impl Settlement {
    pub fn new(stake: u64, multiplier: f64) -> Self {
        if stake == 0 || !multiplier.is_finite() || multiplier <= 0.0 {
            return Self {
                stake,
                multiplier: if stake == 0 || !multiplier.is_finite() {
                    0.0
                } else {
                    multiplier.max(0.0)
                },
                payout: 0,
            };
        }
        let payout = (stake as f64 * multiplier).round();
        let payout = if payout >= u64::MAX as f64 {
            u64::MAX
        } else {
            payout as u64
        };
        Self {
            stake,
            multiplier,
            payout,
        }
    }

    pub fn loss(stake: u64) -> Self {
        Self::new(stake, 0.0)
    }

    pub fn push(stake: u64) -> Self {
        Self::new(stake, 1.0)
    }

    /// Classified from the multiplier, not the rounded payout: a 1.004x cash-out on 100
    /// chips pays back exactly 100 but is still a win.
    pub fn outcome(&self) -> Outcome {
        if self.stake == 0 {
            Outcome::Void
        } else if self.multiplier > 1.0 {
            Outcome::Win
        } else if self.multiplier == 1.0 {
            Outcome::Push
        } else {
            Outcome::Loss
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome() == Outcome::Win
    }

    /// Profit relative to the stake (negative on a loss).
    pub fn net(&self) -> i128 {
        self.payout as i128 - self.stake as i128
    }
}
