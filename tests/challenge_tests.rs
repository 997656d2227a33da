//! End-to-end tests for the challenge engine public API

#[cfg(test)]
mod tests {
    use pips_challenge::analytics::PerformanceStats;
    use pips_challenge::challenge::{generate_levels, ChallengeEngine, ChallengeState};
    use pips_challenge::notes::{NoteBook, TradeType};
    use pips_challenge::types::{LevelStatus, LEVEL_COUNT};

    // ============================================================================
    // Ladder generation
    // ============================================================================

    #[test]
    fn test_ladder_shape_for_various_capitals() {
        for capital in [1.0, 500.0, 10_000.0, 1_000_000.0] {
            let levels = generate_levels(capital);
            assert_eq!(levels.len(), LEVEL_COUNT as usize);
            assert_eq!(levels[0].status, LevelStatus::Current);

            for pair in levels.windows(2) {
                assert!(pair[1].opening_balance > pair[0].opening_balance);
                assert_eq!(pair[1].status, LevelStatus::Pending);
            }
            for level in &levels {
                assert!(
                    (level.running_balance - (level.opening_balance + level.target_profit)).abs()
                        < 1e-9
                );
            }
        }
    }

    // ============================================================================
    // Full challenge walkthroughs
    // ============================================================================

    #[test]
    fn test_straight_run_to_level_30() {
        let mut engine = ChallengeEngine::new(10_000.0);
        let final_running = engine.state().levels[29].running_balance;

        for _ in 0..30 {
            engine.record_trade(100.0);
        }

        let state = engine.state();
        assert_eq!(state.current_level, 30);
        assert_eq!(state.trades.len(), 30);
        // After passing all 30 levels the capital equals the last running balance.
        assert!((state.current_capital - final_running).abs() < 1e-6);
    }

    #[test]
    fn test_win_then_loss_returns_to_previous_capital() {
        let mut engine = ChallengeEngine::new(10_000.0);
        engine.record_trade(1.0);
        assert_eq!(engine.state().current_capital, 13_000.0);

        // Loss at level 2 realizes level 1's target, exactly undoing the win.
        let trade = engine.record_trade(-42.0).clone();
        assert_eq!(trade.profit_loss, -3_000.0);
        assert_eq!(engine.state().current_level, 1);
        assert_eq!(engine.state().current_capital, 10_000.0);
    }

    #[test]
    fn test_oscillation_keeps_ladder_fixed() {
        let mut engine = ChallengeEngine::new(10_000.0);
        let targets: Vec<f64> = engine
            .state()
            .levels
            .iter()
            .map(|l| l.target_profit)
            .collect();

        for _ in 0..5 {
            engine.record_trade(1.0);
            engine.record_trade(-1.0);
        }

        let after: Vec<f64> = engine
            .state()
            .levels
            .iter()
            .map(|l| l.target_profit)
            .collect();
        assert_eq!(targets, after);
        assert_eq!(engine.state().current_level, 1);
        assert_eq!(engine.state().current_capital, 10_000.0);
        assert_eq!(engine.state().trades.len(), 10);
    }

    #[test]
    fn test_floor_losses_drain_capital_at_own_target() {
        let mut engine = ChallengeEngine::new(10_000.0);
        engine.record_trade(-1.0);
        engine.record_trade(-1.0);
        engine.record_trade(-1.0);

        // Each level-1 loss realizes level 1's own 3000 target.
        assert_eq!(engine.state().current_level, 1);
        assert_eq!(engine.state().current_capital, 1_000.0);
    }

    #[test]
    fn test_reset_matches_fresh_initialize() {
        let mut engine = ChallengeEngine::new(7_500.0);
        engine.record_trade(1.0);
        engine.record_trade(1.0);
        engine.record_trade(-1.0);
        engine.reset();

        let fresh = ChallengeEngine::new(7_500.0);
        let (a, b) = (engine.state(), fresh.state());
        assert_eq!(a.current_level, b.current_level);
        assert_eq!(a.current_capital, b.current_capital);
        assert!(a.trades.is_empty());
        for (x, y) in a.levels.iter().zip(b.levels.iter()) {
            assert_eq!(x.opening_balance, y.opening_balance);
            assert_eq!(x.target_profit, y.target_profit);
            assert_eq!(x.running_balance, y.running_balance);
            assert_eq!(x.status, y.status);
        }
    }

    // ============================================================================
    // Snapshot restore
    // ============================================================================

    #[test]
    fn test_tampered_snapshot_cannot_be_restored() {
        // A hand-edited state file with a bad level pointer and a short
        // ladder must be rejected at restore time, never traded on.
        let state: ChallengeState = serde_json::from_str(
            r#"{"current_level":31,"initial_capital":10000.0,"current_capital":10000.0,"levels":[],"trades":[]}"#,
        )
        .unwrap();
        assert!(ChallengeEngine::from_state(state).is_err());

        // An unmodified snapshot restores and keeps trading.
        let mut engine = ChallengeEngine::new(10_000.0);
        engine.record_trade(1.0);
        let json = serde_json::to_string(engine.state()).unwrap();
        let restored: ChallengeState = serde_json::from_str(&json).unwrap();
        let mut engine = ChallengeEngine::from_state(restored).unwrap();
        engine.record_trade(1.0);
        assert_eq!(engine.state().current_level, 3);
    }

    // ============================================================================
    // Analytics over a session
    // ============================================================================

    #[test]
    fn test_stats_track_a_mixed_session() {
        let mut engine = ChallengeEngine::new(10_000.0);
        for amount in [1.0, 1.0, -1.0, 1.0] {
            engine.record_trade(amount);
        }

        let stats = PerformanceStats::from_state(engine.state());
        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.wins, 3);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.win_rate_pct, 75.0);
        // Ended at level 3 with level 2's running balance banked.
        assert_eq!(engine.state().current_level, 3);
        assert!((stats.total_growth_pct - 69.0).abs() < 1e-9);
    }

    // ============================================================================
    // Notes stay independent of the challenge
    // ============================================================================

    #[test]
    fn test_notes_survive_challenge_reset() {
        let mut engine = ChallengeEngine::new(10_000.0);
        let mut notes = NoteBook::new();
        notes
            .add(TradeType::Profit, 3_000.0, "EURUSD long", "level 1 pass")
            .unwrap();

        engine.record_trade(1.0);
        engine.reset();

        assert!(engine.state().trades.is_empty());
        assert_eq!(notes.notes().len(), 1);
    }
}
