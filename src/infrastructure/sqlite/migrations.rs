use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS trades (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            symbol TEXT NOT NULL,
            direction TEXT NOT NULL,
            entry_low REAL NOT NULL,
            entry_high REAL NOT NULL,
            take_profits TEXT NOT NULL,
            stop_loss REAL NOT NULL,
            status TEXT DEFAULT 'open',
            created_at TEXT NOT NULL,
            closed_at TEXT,
            pnl REAL DEFAULT 0,
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_trades_created ON trades(created_at);
        CREATE INDEX IF NOT EXISTS idx_trades_status ON trades(status);
        ",
    )
    .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
