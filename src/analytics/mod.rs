//! Performance analytics
//!
//! Derived, read-only views over the challenge state: win rate, capital
//! growth, profit/loss totals, streaks and the equity curve. Everything here
//! is a pure function of the snapshot; nothing mutates the engine.

use serde::Serialize;

use crate::challenge::ChallengeState;

/// Aggregate performance statistics for a challenge session
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceStats {
    /// Total recorded trades
    pub total_trades: u32,
    /// Trades with positive realized P&L
    pub wins: u32,
    /// Trades with zero or negative realized P&L
    pub losses: u32,
    /// Wins as a percentage of all trades (0 when no trades)
    pub win_rate_pct: f64,
    /// Capital growth since initialization, in percent
    pub total_growth_pct: f64,
    /// Sum of winning trades' P&L
    pub total_profits: f64,
    /// Sum of losing trades' P&L (zero or negative)
    pub total_losses: f64,
    /// Current win/loss streak: positive = consecutive wins, negative = losses
    pub current_streak: i32,
    /// Longest winning streak
    pub best_streak: i32,
    /// Longest losing streak (negative or zero)
    pub worst_streak: i32,
}

impl PerformanceStats {
    /// Compute statistics from the engine snapshot.
    ///
    /// Growth is reported as 0 when the initial capital is not positive; the
    /// division guard lives here because the core never divides by capital.
    pub fn from_state(state: &ChallengeState) -> Self {
        let mut stats = PerformanceStats {
            total_trades: u32::try_from(state.trades.len()).unwrap_or(u32::MAX),
            ..Default::default()
        };

        for trade in &state.trades {
            if trade.is_win() {
                stats.wins += 1;
                stats.total_profits += trade.profit_loss;
                stats.current_streak = if stats.current_streak > 0 {
                    stats.current_streak + 1
                } else {
                    1
                };
                stats.best_streak = stats.best_streak.max(stats.current_streak);
            } else {
                stats.losses += 1;
                stats.total_losses += trade.profit_loss;
                stats.current_streak = if stats.current_streak < 0 {
                    stats.current_streak - 1
                } else {
                    -1
                };
                stats.worst_streak = stats.worst_streak.min(stats.current_streak);
            }
        }

        if stats.total_trades > 0 {
            stats.win_rate_pct = f64::from(stats.wins) / f64::from(stats.total_trades) * 100.0;
        }
        if state.initial_capital > 0.0 {
            stats.total_growth_pct = (state.current_capital - state.initial_capital)
                / state.initial_capital
                * 100.0;
        }

        stats
    }
}

/// Balance after each trade, for charting: (1-based trade index, balance).
pub fn equity_curve(state: &ChallengeState) -> Vec<(usize, f64)> {
    state
        .trades
        .iter()
        .enumerate()
        .map(|(i, t)| (i + 1, t.balance))
        .collect()
}
