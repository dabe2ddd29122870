//! Event persistence
//!
//! [`FileEventStore`] keeps one pretty-printed JSON document per event in a
//! directory. Writes go to a temporary sibling file which is then renamed
//! over the real one, so readers never observe a half-written event.
//!
//! Renaming alone doesn't stop two processes from loading the same event,
//! changing it, and saving over each other. Callers that read-modify-write
//! go through [`FileEventStore::locked`], which holds an exclusive lock on a
//! `<event id>.lock` sibling for the duration.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::event::GiftExchangeEvent;

const EVENT_EXTENSION: &str = "json";
const LOCK_EXTENSION: &str = "lock";

/// Storage for events
pub trait EventStore {
    fn load(&self, id: Uuid) -> Result<GiftExchangeEvent, StoreError>;

    fn save(&self, event: &GiftExchangeEvent) -> Result<(), StoreError>;

    /// All stored events, oldest first
    fn list(&self) -> Result<Vec<GiftExchangeEvent>, StoreError>;

    fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Directory of `<event id>.json` files
#[derive(Debug, Clone)]
pub struct FileEventStore {
    dir: PathBuf,
}

impl FileEventStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `id`
    pub fn event_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.{EVENT_EXTENSION}"))
    }

    fn lock_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.{LOCK_EXTENSION}"))
    }

    /// Run `f` while holding an exclusive lock on event `id`.
    ///
    /// Blocks until any other holder, in this process or another, releases
    /// the lock. The event itself doesn't need to exist yet.
    pub fn locked<T, E>(&self, id: Uuid, f: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.lock_path(id);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        let mut lock = fd_lock::RwLock::new(file);
        let _guard = lock
            .write()
            .map_err(|source| StoreError::Io { path, source })?;
        debug!(event_id = %id, "Holding event lock");
        f()
    }

    fn read(path: &Path) -> Result<GiftExchangeEvent, StoreError> {
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl EventStore for FileEventStore {
    fn load(&self, id: Uuid) -> Result<GiftExchangeEvent, StoreError> {
        let path = self.event_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        Self::read(&path)
    }

    fn save(&self, event: &GiftExchangeEvent) -> Result<(), StoreError> {
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        fs::create_dir_all(&self.dir).map_err(io_error(self.dir.as_path()))?;

        let path = self.event_path(event.id);
        let tmp_path = path.with_extension(format!("{EVENT_EXTENSION}.tmp"));
        let contents = serde_json::to_string_pretty(event).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;

        fs::write(&tmp_path, contents).map_err(io_error(tmp_path.as_path()))?;
        fs::rename(&tmp_path, &path).map_err(io_error(path.as_path()))?;

        debug!(event_id = %event.id, path = %path.display(), "Saved event");
        Ok(())
    }

    fn list(&self) -> Result<Vec<GiftExchangeEvent>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut events = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(EVENT_EXTENSION) {
                events.push(Self::read(&path)?);
            }
        }
        events.sort_by_key(|event| (event.created_at, event.id));
        Ok(events)
    }

    /// Remove the event document, and with it the event's roster and messages.
    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let path = self.event_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        fs::remove_file(&path).map_err(|source| StoreError::Io { path, source })?;

        let lock_path = self.lock_path(id);
        match fs::remove_file(&lock_path) {
            Ok(()) => {}
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Io {
                    path: lock_path,
                    source,
                });
            }
        }
        debug!(event_id = %id, "Deleted event");
        Ok(())
    }
}
