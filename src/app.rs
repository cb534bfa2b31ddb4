//! App Core for mdshare.
//!
//! Central struct holding the database, settings and title generator shared
//! by every request handler.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::database::connection::Database;
use crate::services::title_generator::{self, TitleGenerator};
use crate::types::settings::ServerSettings;

/// Central application struct.
///
/// Managers borrow the connection with a lifetime, so they are created on
/// demand from a locked [`Database`]: `MarkdownManager::new(db.connection())`.
pub struct App {
    db: Mutex<Database>,
    pub settings: ServerSettings,
    pub title_generator: Arc<dyn TitleGenerator>,
}

/// Handle passed to request handlers.
pub type SharedApp = Arc<App>;

impl App {
    /// Opens the database at `db_path` and builds the configured title generator.
    pub fn new<P: AsRef<Path>>(db_path: P, settings: ServerSettings) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!(path = %parent.display(), error = %e, "failed to create database directory");
                }
            }
        }
        let db = Database::open(db_path)?;
        let title_generator = title_generator::from_settings(&settings.title);
        Ok(Self::from_parts(db, settings, title_generator))
    }

    /// In-memory app, used by tests and throwaway servers.
    pub fn in_memory(settings: ServerSettings) -> Result<Self, rusqlite::Error> {
        let db = Database::open_in_memory()?;
        let title_generator = title_generator::from_settings(&settings.title);
        Ok(Self::from_parts(db, settings, title_generator))
    }

    pub fn from_parts(db: Database, settings: ServerSettings, title_generator: Arc<dyn TitleGenerator>) -> Self {
        Self {
            db: Mutex::new(db),
            settings,
            title_generator,
        }
    }

    /// Replaces the title generator.
    pub fn with_title_generator(mut self, generator: Arc<dyn TitleGenerator>) -> Self {
        self.title_generator = generator;
        self
    }

    /// Locks the database. Hold the guard only for synchronous work.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, PoisonError<MutexGuard<'_, Database>>> {
        self.db.lock()
    }

    pub fn shared(self) -> SharedApp {
        Arc::new(self)
    }
}
