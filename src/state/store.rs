//! Key-value project storage and the background autosaver.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::persistence::{PersistenceError, PersistenceResult};

/// Key the autosaver writes under.
pub const AUTOSAVE_KEY: &str = "autosave";

/// Saves and loads serialized projects by name.
pub trait ProjectStore: Send {
    fn save(&mut self, key: &str, json: &str) -> PersistenceResult<()>;

    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> PersistenceResult<Option<String>>;

    fn remove(&mut self, key: &str) -> PersistenceResult<()>;
}

/// In-memory store. Clones share the same entries, so a caller can keep a
/// handle while the autosaver owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ProjectStore for MemoryStore {
    fn save(&mut self, key: &str, json: &str) -> PersistenceResult<()> {
        self.entries.lock().insert(key.to_string(), json.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Stores each project as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(PersistenceError::InvalidState(format!("bad store key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl ProjectStore for DirStore {
    fn save(&mut self, key: &str, json: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // write-then-rename so a crash mid-write never leaves a truncated file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(Some(json)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

struct Shared {
    /// Latest project offered by the editor, not yet written
    pending: Mutex<Option<String>>,
    store: Mutex<Box<dyn ProjectStore>>,
    stop: AtomicBool,
}

impl Shared {
    fn write_pending(&self) -> PersistenceResult<bool> {
        // take the slot first so the editor is never held up by the write
        let Some(json) = self.pending.lock().take() else {
            return Ok(false);
        };
        self.store.lock().save(AUTOSAVE_KEY, &json)?;
        Ok(true)
    }
}

/// Writes the most recently offered project on a fixed interval from a
/// background thread.
///
/// [`AutoSaver::offer`] only swaps a string into a slot; it never waits for
/// storage. Dropping the saver writes anything still pending.
pub struct AutoSaver {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaver")
            .field("pending", &self.has_pending())
            .field("running", &self.worker.is_some())
            .finish()
    }
}

impl AutoSaver {
    pub fn spawn(store: impl ProjectStore + 'static, interval: Duration) -> PersistenceResult<Self> {
        let shared = Arc::new(Shared {
            pending: Mutex::new(None),
            store: Mutex::new(Box::new(store)),
            stop: AtomicBool::new(false),
        });
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("autosave".to_string())
            .spawn(move || Self::run(&worker_shared, interval))?;
        log::info!("Autosave every {}s", interval.as_secs());
        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    fn run(shared: &Shared, interval: Duration) {
        let mut next = Instant::now() + interval;
        while !shared.stop.load(Ordering::Acquire) {
            let now = Instant::now();
            if now < next {
                thread::park_timeout(next - now);
                continue;
            }
            match shared.write_pending() {
                Ok(true) => log::info!("Autosaved project"),
                Ok(false) => {}
                Err(err) => log::error!("Autosave failed: {err}"),
            }
            next = now + interval;
        }
        if let Err(err) = shared.write_pending() {
            log::error!("Final autosave failed: {err}");
        }
    }

    /// Replaces the pending project with `json`.
    pub fn offer(&self, json: String) {
        *self.shared.pending.lock() = Some(json);
    }

    pub fn has_pending(&self) -> bool {
        self.shared.pending.lock().is_some()
    }

    /// Writes the pending project now, on the calling thread. Returns
    /// whether anything was written.
    pub fn flush(&self) -> PersistenceResult<bool> {
        self.shared.write_pending()
    }

    /// Reads back the last autosave.
    pub fn load(&self) -> PersistenceResult<Option<String>> {
        self.shared.store.lock().load(AUTOSAVE_KEY)
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            if worker.join().is_err() {
                log::error!("Autosave thread panicked");
            }
        }
    }
}
