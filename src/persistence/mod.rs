//! CSV + JSON persistence
//!
//! External collaborator around the challenge engine: appends recorded trades
//! to dated CSV files and snapshots the whole challenge state as JSON so a
//! session can be restored on restart. None of this participates in the
//! transition rules; failures here are logged and surfaced to the caller,
//! which treats them as non-fatal.

use anyhow::{Context, Result};
use chrono::Utc;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock as AsyncRwLock;
use tracing::info;

use crate::challenge::ChallengeState;
use crate::types::Trade;

/// Filename of the JSON state snapshot inside the data directory
const STATE_FILE: &str = "challenge_state.json";

/// Flattened trade row for CSV storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeCsvRecord {
    pub timestamp: i64,
    pub trade_id: String,
    pub level: u32,
    pub lot_size: f64,
    pub profit_loss: f64,
    pub result: String,
    pub balance_after: f64,
}

impl TradeCsvRecord {
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            timestamp: trade.date.timestamp_millis(),
            trade_id: trade.id.clone(),
            level: trade.level,
            lot_size: trade.lot_size,
            profit_loss: trade.profit_loss,
            result: if trade.is_win() { "WIN" } else { "LOSS" }.to_string(),
            balance_after: trade.balance,
        }
    }
}

/// CSV persistence manager
pub struct CsvPersistence {
    data_dir: PathBuf,
    trade_writer: AsyncRwLock<csv::Writer<std::fs::File>>,
}

impl CsvPersistence {
    /// Create a new CSV persistence manager
    pub fn new(data_dir: &str) -> Result<Self> {
        let data_dir = PathBuf::from(data_dir);

        // Create directory if it doesn't exist
        fs::create_dir_all(&data_dir).context("Failed to create data directory")?;
        fs::create_dir_all(data_dir.join("trades"))?;

        // Get current date for filenames
        let today = Utc::now().format("%Y-%m-%d");
        let trade_writer =
            Self::create_writer(&data_dir.join("trades"), &format!("trades_{}.csv", today))?;

        Ok(Self {
            data_dir,
            trade_writer: AsyncRwLock::new(trade_writer),
        })
    }

    fn create_writer(dir: &Path, filename: &str) -> Result<csv::Writer<std::fs::File>> {
        let path = dir.join(filename);
        let file_has_data =
            path.exists() && fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open CSV file")?;

        let writer = WriterBuilder::new()
            .has_headers(!file_has_data)
            .from_writer(file);

        Ok(writer)
    }

    /// Append one recorded trade to today's CSV
    pub async fn save_trade(&self, trade: &Trade) -> Result<()> {
        let mut writer = self.trade_writer.write().await;
        writer
            .serialize(TradeCsvRecord::from_trade(trade))
            .context("Failed to write trade record")?;
        writer.flush().context("Failed to flush trade writer")?;
        Ok(())
    }

    /// Save the full challenge state to the JSON snapshot
    pub fn save_state(&self, state: &ChallengeState) -> Result<()> {
        let path = self.data_dir.join(STATE_FILE);
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), "state saved");
        Ok(())
    }

    /// Load the challenge state snapshot, if one exists
    pub fn load_state(&self) -> Result<Option<ChallengeState>> {
        let path = self.data_dir.join(STATE_FILE);
        if !path.exists() {
            info!(path = %path.display(), "no state file found, starting fresh");
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let state: ChallengeState = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse state file {}", path.display()))?;
        info!(
            path = %path.display(),
            level = state.current_level,
            capital = %format!("${:.2}", state.current_capital),
            trades = state.trades.len(),
            "state loaded"
        );
        Ok(Some(state))
    }
}
