//! Interactive challenge session
//!
//! Command-line front end for the challenge engine. Reads commands from
//! stdin, validates user input before it reaches the engine, and renders
//! tables from the latest state snapshot after every mutating call.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pips_challenge::analytics::{equity_curve, PerformanceStats};
use pips_challenge::challenge::ChallengeEngine;
use pips_challenge::config::AppConfig;
use pips_challenge::persistence::CsvPersistence;
use pips_challenge::types::LevelStatus;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!(config = %config.digest(), "starting challenge session");

    let persistence = if config.persistence.enabled {
        match CsvPersistence::new(&config.persistence.data_dir) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(error = %e, "persistence disabled for this session");
                None
            }
        }
    } else {
        None
    };

    let mut engine = ChallengeEngine::new(config.challenge.initial_capital);
    if config.persistence.restore_on_start {
        if let Some(p) = &persistence {
            match p.load_state() {
                Ok(Some(state)) => match ChallengeEngine::from_state(state) {
                    Ok(restored) => engine = restored,
                    Err(e) => warn!(error = %e, "saved state rejected, starting fresh"),
                },
                Ok(None) => {}
                Err(e) => warn!(error = %e, "could not restore saved state"),
            }
        }
    }

    println!("30-level challenge tracker. Type 'help' for commands.");
    print_status(&engine);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c.to_lowercase(),
            None => continue,
        };

        match command.as_str() {
            "help" => print_help(),
            "init" => {
                // Caller-side validation: the engine accepts any real, so
                // the positive-finite rule is enforced here.
                let capital = parts.next().and_then(|s| s.parse::<f64>().ok());
                match capital {
                    Some(c) if c.is_finite() && c > 0.0 => {
                        engine.initialize(c);
                        snapshot(&persistence, &engine);
                        print_status(&engine);
                    }
                    _ => println!("usage: init <capital>  (capital must be a positive number)"),
                }
            }
            "win" | "loss" => {
                let amount = if command == "win" { 1.0 } else { -1.0 };
                let trade = engine.record_trade(amount).clone();
                if let Some(p) = &persistence {
                    if let Err(e) = p.save_trade(&trade).await {
                        warn!(error = %e, "failed to append trade CSV");
                    }
                }
                snapshot(&persistence, &engine);
                println!(
                    "{}: {:+.2} at level {} -> balance ${:.2}",
                    if trade.is_win() { "WIN" } else { "LOSS" },
                    trade.profit_loss,
                    trade.level,
                    trade.balance
                );
                print_status(&engine);
            }
            "reset" => {
                engine.reset();
                snapshot(&persistence, &engine);
                println!("challenge reset to initial capital");
                print_status(&engine);
            }
            "status" => print_status(&engine),
            "levels" => print_levels(&engine),
            "trades" => print_trades(&engine),
            "stats" => print_stats(&engine),
            "quit" | "exit" => break,
            other => println!("unknown command '{}', type 'help'", other),
        }
    }

    info!("session ended");
    Ok(())
}

/// Best-effort state snapshot after a mutating command.
fn snapshot(persistence: &Option<CsvPersistence>, engine: &ChallengeEngine) {
    if let Some(p) = persistence {
        if let Err(e) = p.save_state(engine.state()) {
            warn!(error = %e, "failed to save state snapshot");
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  init <capital>  start over with a new initial capital");
    println!("  win             record a winning trade (realizes the level target)");
    println!("  loss            record a losing trade");
    println!("  status          current level and capital");
    println!("  levels          the full 30-level ladder");
    println!("  trades          the trade log");
    println!("  stats           performance statistics");
    println!("  reset           discard progress, keep initial capital");
    println!("  quit            exit");
}

fn print_status(engine: &ChallengeEngine) {
    let state = engine.state();
    let active = &state.levels[(state.current_level - 1) as usize];
    println!(
        "level {}/30 | capital ${:.2} | target +${:.2} | progress {:.1}%",
        state.current_level,
        state.current_capital,
        active.target_profit,
        f64::from(state.current_level) / 30.0 * 100.0
    );
}

fn print_levels(engine: &ChallengeEngine) {
    println!(
        "{:>5} {:>14} {:>14} {:>14}  {}",
        "level", "opening", "target", "running", "status"
    );
    for level in &engine.state().levels {
        let marker = match level.status {
            LevelStatus::Current => " <-",
            _ => "",
        };
        println!(
            "{:>5} {:>14.2} {:>14.2} {:>14.2}  {}{}",
            level.level,
            level.opening_balance,
            level.target_profit,
            level.running_balance,
            level.status,
            marker
        );
    }
}

fn print_trades(engine: &ChallengeEngine) {
    let trades = &engine.state().trades;
    if trades.is_empty() {
        println!("no trades recorded");
        return;
    }
    println!(
        "{:>4} {:>20} {:>6} {:>10} {:>12} {:>14}",
        "#", "date", "level", "lot", "p/l", "balance"
    );
    for (i, trade) in trades.iter().enumerate() {
        println!(
            "{:>4} {:>20} {:>6} {:>10.2} {:>+12.2} {:>14.2}",
            i + 1,
            trade.date.format("%Y-%m-%d %H:%M:%S"),
            trade.level,
            trade.lot_size,
            trade.profit_loss,
            trade.balance
        );
    }
}

fn print_stats(engine: &ChallengeEngine) {
    let stats = PerformanceStats::from_state(engine.state());
    println!(
        "trades {} | wins {} | losses {} | win rate {:.1}%",
        stats.total_trades, stats.wins, stats.losses, stats.win_rate_pct
    );
    println!(
        "growth {:+.1}% | profits +${:.2} | losses ${:.2}",
        stats.total_growth_pct, stats.total_profits, stats.total_losses
    );
    println!(
        "streak {} | best {} | worst {}",
        stats.current_streak, stats.best_streak, stats.worst_streak
    );

    let curve = equity_curve(engine.state());
    if let Some((_, last)) = curve.last() {
        println!("equity curve: {} points, last ${:.2}", curve.len(), last);
    }
}
