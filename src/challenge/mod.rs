//! Challenge Engine
//!
//! The level-progression and trade-recording state machine:
//! - **Fixed 30-level ladder**: each level targets 30% growth on its opening
//!   balance; the ladder is computed once per (re)initialization and its
//!   balance columns never change afterwards.
//! - **Sign-driven trades**: a win realizes exactly the active level's target
//!   profit, a loss realizes the previous level's target (level 1 falls back
//!   to its own). The caller-supplied magnitude only carries the sign.
//! - **Absorbing boundaries**: wins clamp at level 30, losses at level 1.
//!
//! The engine is a plain owned value with synchronous methods; callers render
//! from [`ChallengeEngine::state`] and re-read after every mutating call.

use anyhow::{bail, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::types::{Level, LevelStatus, Trade, LEVEL_COUNT, LOT_SIZE_DIVISOR, TARGET_GROWTH_RATE};

/// Starting capital used when no configuration overrides it
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

// ─────────────────────────────────────────────────────────────────
// State
// ─────────────────────────────────────────────────────────────────

/// The single mutable aggregate owned by the engine
///
/// Serializable so a durability collaborator can snapshot and restore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeState {
    /// Active level number, 1..=30
    pub current_level: u32,
    /// Capital the challenge was initialized with
    pub initial_capital: f64,
    /// Capital after all recorded trades
    pub current_capital: f64,
    /// The 30-level ladder, fixed at initialization apart from statuses
    pub levels: Vec<Level>,
    /// Append-only trade log, cleared on initialize/reset
    pub trades: Vec<Trade>,
}

// ─────────────────────────────────────────────────────────────────
// Ladder generation
// ─────────────────────────────────────────────────────────────────

/// Build the 30-level ladder for the given starting capital.
///
/// Pure function: level `i` opens at the running balance of level `i - 1`,
/// targets 30% of its opening balance, and closes at opening + target.
/// Level 1 starts as `current`, everything above as `pending`.
pub fn generate_levels(initial_capital: f64) -> Vec<Level> {
    let mut levels = Vec::with_capacity(LEVEL_COUNT as usize);
    let mut current_balance = initial_capital;

    for i in 1..=LEVEL_COUNT {
        let target_profit = current_balance * TARGET_GROWTH_RATE;

        levels.push(Level {
            level: i,
            opening_balance: current_balance,
            target_profit,
            running_balance: current_balance + target_profit,
            status: if i == 1 {
                LevelStatus::Current
            } else {
                LevelStatus::Pending
            },
        });

        current_balance += target_profit;
    }

    levels
}

// ─────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────

/// In-memory, single-writer challenge state machine
#[derive(Debug, Clone)]
pub struct ChallengeEngine {
    state: ChallengeState,
}

impl Default for ChallengeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPITAL)
    }
}

impl ChallengeEngine {
    /// Create an engine already initialized at the given starting capital.
    pub fn new(initial_capital: f64) -> Self {
        Self {
            state: ChallengeState {
                current_level: 1,
                initial_capital,
                current_capital: initial_capital,
                levels: generate_levels(initial_capital),
                trades: Vec::new(),
            },
        }
    }

    /// Restore an engine from a previously saved state snapshot.
    ///
    /// A snapshot from disk is untrusted: the ladder must have exactly 30
    /// entries and `current_level` must point into it, otherwise every later
    /// `record_trade` would index out of bounds. Malformed snapshots are
    /// rejected so callers can fall back to a fresh engine.
    pub fn from_state(state: ChallengeState) -> Result<Self> {
        if state.levels.len() != LEVEL_COUNT as usize {
            bail!(
                "snapshot has {} levels, expected {}",
                state.levels.len(),
                LEVEL_COUNT
            );
        }
        if state.current_level < 1 || state.current_level > LEVEL_COUNT {
            bail!(
                "snapshot current_level {} is outside 1..={}",
                state.current_level,
                LEVEL_COUNT
            );
        }
        Ok(Self { state })
    }

    /// Read-only snapshot of the current state.
    pub fn state(&self) -> &ChallengeState {
        &self.state
    }

    /// Start the challenge over with a new initial capital.
    ///
    /// Regenerates the ladder, resets capital and level, clears the trade
    /// log. Input validation (finite, positive) is the caller's job.
    pub fn initialize(&mut self, initial_capital: f64) {
        self.state = ChallengeState {
            current_level: 1,
            initial_capital,
            current_capital: initial_capital,
            levels: generate_levels(initial_capital),
            trades: Vec::new(),
        };
        info!(initial_capital, "challenge initialized");
    }

    /// Reset all progress, keeping the originally configured capital.
    pub fn reset(&mut self) {
        let initial_capital = self.state.initial_capital;
        self.initialize(initial_capital);
    }

    /// Record one trade outcome and advance or retreat the ladder.
    ///
    /// Only the sign of `signed_amount` matters: a positive value realizes
    /// the active level's full target profit, a non-positive value realizes
    /// the previous level's target as a loss (level 1 loses its own target).
    /// Total over any real input; boundary levels clamp instead of erroring.
    /// Returns the appended trade.
    pub fn record_trade(&mut self, signed_amount: f64) -> &Trade {
        let idx = (self.state.current_level - 1) as usize;
        let active = &self.state.levels[idx];
        let is_win = signed_amount > 0.0;

        let realized = if is_win {
            active.target_profit
        } else if idx > 0 {
            -self.state.levels[idx - 1].target_profit
        } else {
            -active.target_profit
        };

        let new_balance = self.state.current_capital + realized;
        let trade = Trade {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            level: self.state.current_level,
            lot_size: active.target_profit / LOT_SIZE_DIVISOR,
            profit_loss: realized,
            balance: new_balance,
        };

        let new_level = if is_win {
            (self.state.current_level + 1).min(LEVEL_COUNT)
        } else {
            (self.state.current_level - 1).max(1)
        };

        // Status patch only; ladder balances stay as generated.
        for level in &mut self.state.levels {
            level.status = if level.level < new_level {
                LevelStatus::Completed
            } else if level.level == new_level {
                LevelStatus::Current
            } else {
                LevelStatus::Pending
            };
        }

        info!(
            level = trade.level,
            new_level,
            profit_loss = realized,
            balance = new_balance,
            "trade recorded"
        );

        self.state.current_level = new_level;
        self.state.current_capital = new_balance;
        self.state.trades.push(trade);
        self.state.trades.last().unwrap()
    }
}
