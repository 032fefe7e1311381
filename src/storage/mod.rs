//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - The local player's handle and profile (record, credits, ratings)
//! - Practice high scores per mode and category

use directories::ProjectDirs;
use rusqlite::{params, Connection, Result as SqlResult};
use std::path::PathBuf;

use crate::game::GameMode;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: Initial schema with meta and profiles tables
/// - v2: Added high_scores table for practice mode
const SCHEMA_VERSION: u32 = 2;

/// Rating every profile starts from.
pub const BASE_RATING: f64 = 1200.0;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Database error from SQLite
    Database(rusqlite::Error),
    /// Could not determine data directory
    NoDataDirectory,
    /// Schema version mismatch (future version)
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    CreateDirFailed(std::io::Error),
    /// Migration failed
    MigrationFailed { from: u32, to: u32, reason: String },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "database error: {}", e),
            StorageError::NoDataDirectory => write!(f, "could not determine data directory"),
            StorageError::FutureSchemaVersion { found, supported } => {
                write!(
                    f,
                    "database schema version {} is newer than supported version {}",
                    found, supported
                )
            }
            StorageError::CreateDirFailed(e) => write!(f, "failed to create data directory: {}", e),
            StorageError::MigrationFailed { from, to, reason } => {
                write!(f, "migration from v{} to v{} failed: {}", from, to, reason)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

/// How a match ended, from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    /// Credits awarded for this result.
    pub fn credits(&self) -> u32 {
        match self {
            MatchResult::Win => 50,
            MatchResult::Draw => 20,
            MatchResult::Loss => 10,
        }
    }

    /// Rating adjustment for this result.
    pub fn rating_delta(&self) -> f64 {
        match self {
            MatchResult::Win => 16.0,
            MatchResult::Draw => 4.0,
            MatchResult::Loss => -12.0,
        }
    }
}

/// A player's persisted profile.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    pub handle: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub credits: u32,
    pub category_rating: f64,
    pub chain_rating: f64,
}

impl PlayerProfile {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn rating_for(&self, mode: GameMode) -> f64 {
        match mode {
            GameMode::Category => self.category_rating,
            GameMode::WordChain => self.chain_rating,
        }
    }

    /// Display rank derived from the given mode's rating.
    pub fn rank_for(&self, mode: GameMode) -> &'static str {
        rank_label(self.rating_for(mode))
    }
}

/// Rank label for a rating value.
pub fn rank_label(rating: f64) -> &'static str {
    if rating < 1100.0 {
        "Novice"
    } else if rating < 1300.0 {
        "Wordsmith"
    } else if rating < 1500.0 {
        "Expert"
    } else {
        "Champion"
    }
}

/// The main storage handle for player data.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/wordzones/` or `~/.local/share/wordzones/`
    /// - macOS: `~/Library/Application Support/wordzones/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;

        // Ensure directory exists
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join("wordzones.db");
        let conn = Connection::open(&db_path)?;

        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "wordzones")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Get the current handle (player name).
    pub fn handle(&self) -> SqlResult<Option<String>> {
        self.conn
            .query_row("SELECT handle FROM meta LIMIT 1", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                _ => Err(e),
            })
    }

    /// Set the handle (player name).
    pub fn set_handle(&self, handle: &str) -> SqlResult<()> {
        self.conn
            .execute("UPDATE meta SET handle = ?1", params![handle])?;
        Ok(())
    }

    /// Fetch a profile, if one exists for the handle.
    pub fn profile(&self, handle: &str) -> Result<Option<PlayerProfile>, StorageError> {
        let result = self.conn.query_row(
            "SELECT wins, losses, draws, credits, category_rating, chain_rating
             FROM profiles WHERE handle = ?1",
            params![handle],
            |row| {
                Ok(PlayerProfile {
                    handle: handle.to_string(),
                    wins: row.get(0)?,
                    losses: row.get(1)?,
                    draws: row.get(2)?,
                    credits: row.get(3)?,
                    category_rating: row.get(4)?,
                    chain_rating: row.get(5)?,
                })
            },
        );

        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Database(e)),
        }
    }

    /// Fetch a profile, creating a fresh one if the handle is new.
    pub fn profile_or_default(&self, handle: &str) -> Result<PlayerProfile, StorageError> {
        if let Some(profile) = self.profile(handle)? {
            return Ok(profile);
        }
        self.ensure_profile(handle)?;
        Ok(PlayerProfile {
            handle: handle.to_string(),
            wins: 0,
            losses: 0,
            draws: 0,
            credits: 0,
            category_rating: BASE_RATING,
            chain_rating: BASE_RATING,
        })
    }

    /// Apply one match result to a profile: record column, credits, and the
    /// mode's rating. Ratings never drop below zero.
    pub fn apply_result(
        &self,
        handle: &str,
        mode: GameMode,
        result: MatchResult,
    ) -> Result<PlayerProfile, StorageError> {
        self.ensure_profile(handle)?;

        let record_column = match result {
            MatchResult::Win => "wins",
            MatchResult::Draw => "draws",
            MatchResult::Loss => "losses",
        };
        let rating_column = match mode {
            GameMode::Category => "category_rating",
            GameMode::WordChain => "chain_rating",
        };
        let now = now_millis();

        // Column names come from the fixed match arms above, never from input
        let sql = format!(
            "UPDATE profiles SET {record} = {record} + 1,
                    credits = credits + ?1,
                    {rating} = MAX(0.0, {rating} + ?2),
                    last_updated = ?3
             WHERE handle = ?4",
            record = record_column,
            rating = rating_column,
        );
        self.conn.execute(
            &sql,
            params![result.credits(), result.rating_delta(), now, handle],
        )?;

        self.profile(handle)?.ok_or_else(|| {
            StorageError::Database(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Record a practice score; returns true when it beats the stored best.
    pub fn record_high_score(
        &self,
        mode: GameMode,
        category: Option<&str>,
        score: u32,
    ) -> Result<bool, StorageError> {
        let key = category.unwrap_or("");
        let best = self.high_score(mode, category)?;
        if best.map(|b| score <= b).unwrap_or(false) {
            return Ok(false);
        }
        self.conn.execute(
            "INSERT INTO high_scores (mode, category, best_score, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (mode, category) DO UPDATE SET
                 best_score = excluded.best_score,
                 updated_at = excluded.updated_at",
            params![mode.key(), key, score, now_millis()],
        )?;
        Ok(true)
    }

    /// Stored practice best for a mode/category pair.
    pub fn high_score(
        &self,
        mode: GameMode,
        category: Option<&str>,
    ) -> Result<Option<u32>, StorageError> {
        let key = category.unwrap_or("");
        let result = self.conn.query_row(
            "SELECT best_score FROM high_scores WHERE mode = ?1 AND category = ?2",
            params![mode.key(), key],
            |row| row.get::<_, u32>(0),
        );
        match result {
            Ok(score) => Ok(Some(score)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Database(e)),
        }
    }

    // Private helper methods

    fn ensure_profile(&self, handle: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO profiles
                 (handle, wins, losses, draws, credits, category_rating, chain_rating, last_updated)
             VALUES (?1, 0, 0, 0, 0, ?2, ?2, ?3)",
            params![handle, BASE_RATING, now_millis()],
        )?;
        Ok(())
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            // Fresh database, create schema
            self.create_schema()?;
        } else if current_version < SCHEMA_VERSION {
            self.migrate_schema(current_version)?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer build
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        // Check if meta table exists
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: stores the local handle and schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                handle TEXT,
                created_at INTEGER NOT NULL
            );

            -- Profiles: one row per handle
            CREATE TABLE profiles (
                handle TEXT PRIMARY KEY,
                wins INTEGER NOT NULL DEFAULT 0,
                losses INTEGER NOT NULL DEFAULT 0,
                draws INTEGER NOT NULL DEFAULT 0,
                credits INTEGER NOT NULL DEFAULT 0,
                category_rating REAL NOT NULL DEFAULT 1200.0,
                chain_rating REAL NOT NULL DEFAULT 1200.0,
                last_updated INTEGER NOT NULL
            );

            -- Practice bests per mode/category ('' category for chain mode)
            CREATE TABLE high_scores (
                mode TEXT NOT NULL,
                category TEXT NOT NULL,
                best_score INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (mode, category)
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, handle, created_at) VALUES (?1, NULL, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }

    fn migrate_schema(&self, from_version: u32) -> Result<(), StorageError> {
        let mut current_version = from_version;

        // Apply migrations sequentially
        while current_version < SCHEMA_VERSION {
            match current_version {
                1 => {
                    self.migrate_v1_to_v2()?;
                    current_version = 2;
                }
                _ => {
                    // Unknown version, can't migrate from it
                    return Err(StorageError::MigrationFailed {
                        from: current_version,
                        to: SCHEMA_VERSION,
                        reason: format!("no migration path from version {}", current_version),
                    });
                }
            }
        }

        self.conn.execute(
            "UPDATE meta SET schema_version = ?1",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    /// Migrate from schema v1 to v2: add the high_scores table
    fn migrate_v1_to_v2(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS high_scores (
                mode TEXT NOT NULL,
                category TEXT NOT NULL,
                best_score INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (mode, category)
            );
            "#,
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
