//! Core types for the 30-level challenge
//!
//! Defines the level ladder entries and trade log records shared by the
//! engine, analytics, persistence and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of levels in the challenge ladder
pub const LEVEL_COUNT: u32 = 30;

/// Target profit per level as a fraction of the opening balance
pub const TARGET_GROWTH_RATE: f64 = 0.3;

/// Lot size convention: target profit divided by this factor
pub const LOT_SIZE_DIVISOR: f64 = 200.0;

/// Progress status of a single level in the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    Completed,
    Current,
    Pending,
}

impl Default for LevelStatus {
    fn default() -> Self {
        LevelStatus::Pending
    }
}

impl fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelStatus::Completed => write!(f, "completed"),
            LevelStatus::Current => write!(f, "current"),
            LevelStatus::Pending => write!(f, "pending"),
        }
    }
}

/// One rung of the 30-level ladder
///
/// Balance fields are fixed at initialization; only `status` changes as
/// trades are recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Level number, 1..=30
    pub level: u32,
    /// Capital at which this level begins
    pub opening_balance: f64,
    /// Profit required to pass this level (30% of the opening balance)
    pub target_profit: f64,
    /// Capital after passing this level (opening + target)
    pub running_balance: f64,
    /// Progress status relative to the current level
    pub status: LevelStatus,
}

/// One entry in the append-only trade log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier (UUID v4)
    pub id: String,
    /// When the trade was recorded
    pub date: DateTime<Utc>,
    /// Level that was active when the trade was recorded
    pub level: u32,
    /// Sizing convention: target profit of the active level / 200
    pub lot_size: f64,
    /// Signed realized amount (positive = win, negative = loss)
    pub profit_loss: f64,
    /// Capital after applying this trade
    pub balance: f64,
}

impl Trade {
    /// Whether this trade was a win
    pub fn is_win(&self) -> bool {
        self.profit_loss > 0.0
    }
}
