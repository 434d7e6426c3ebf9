pub mod files;

use std::cell::OnceCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tempfile::NamedTempFile;

use crate::error::{AppError, Result};
use crate::models::{RoomMap, RoutingConfig, TokenIndex, UserTable};

pub use files::StoredFile;

/// Handle to the config directory (cheap to clone, shared across handlers)
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    dir: PathBuf,
    lock: Mutex<()>,
}

/// Open the store rooted at `dir`, creating the directory if needed
pub fn open_store(dir: impl AsRef<Path>) -> Result<Store> {
    let dir = dir.as_ref();
    tracing::info!("Opening config store at: {:?}", dir);

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            tracing::error!("Failed to create config directory: {}", e);
            e
        })?;
    }

    Ok(Store {
        inner: Arc::new(StoreInner {
            dir: dir.to_path_buf(),
            lock: Mutex::new(()),
        }),
    })
}

impl Store {
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Start a transaction; blocks until no other transaction is open
    ///
    /// Call from blocking context only (`spawn_blocking`).
    pub fn begin(&self) -> Transaction<'_> {
        let guard = self
            .inner
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        Transaction {
            _guard: guard,
            dir: &self.inner.dir,
            users: Slot::default(),
            routing: Slot::default(),
            tokens: Slot::default(),
            rooms: Slot::default(),
        }
    }
}

/// Exclusive view over all four files
///
/// Files are read lazily on first access. `commit` rewrites only the files
/// that were borrowed mutably; dropping without commit discards changes.
pub struct Transaction<'a> {
    _guard: MutexGuard<'a, ()>,
    dir: &'a Path,
    users: Slot<UserTable>,
    routing: Slot<RoutingConfig>,
    tokens: Slot<TokenIndex>,
    rooms: Slot<RoomMap>,
}

struct Slot<T> {
    value: OnceCell<T>,
    dirty: bool,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: OnceCell::new(),
            dirty: false,
        }
    }
}

impl<T: StoredFile> Slot<T> {
    fn get(&self, dir: &Path) -> Result<&T> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let loaded = load::<T>(dir)?;
        Ok(self.value.get_or_init(|| loaded))
    }

    fn get_mut(&mut self, dir: &Path) -> Result<&mut T> {
        self.get(dir)?;
        self.dirty = true;
        self.value
            .get_mut()
            .ok_or_else(|| AppError::Io(io::Error::other("store slot not loaded")))
    }

    /// Encoded contents in a temp file beside the target, if changed
    fn stage(&self, dir: &Path) -> Result<Option<(NamedTempFile, PathBuf)>> {
        let value = match (self.dirty, self.value.get()) {
            (true, Some(value)) => value,
            _ => return Ok(None),
        };

        let target = dir.join(T::FILE_NAME);
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&value.encode()?)?;
        if let Some(perms) = replacement_permissions(&target)? {
            temp.as_file().set_permissions(perms)?;
        }
        temp.as_file().sync_all()?;
        Ok(Some((temp, target)))
    }
}

/// Permissions for a file about to replace `target`
///
/// Temp files are created owner-only and the relay may run as another user,
/// so keep whatever the target had and make new files world-readable.
fn replacement_permissions(target: &Path) -> Result<Option<fs::Permissions>> {
    match fs::metadata(target) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

fn load<T: StoredFile>(dir: &Path) -> Result<T> {
    let path = dir.join(T::FILE_NAME);
    match fs::read(&path) {
        Ok(bytes) => T::decode(&bytes).map_err(|e| {
            tracing::error!("Failed to parse {:?}: {}", path, e);
            e
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::empty()),
        Err(e) => Err(e.into()),
    }
}

impl Transaction<'_> {
    pub fn users(&self) -> Result<&UserTable> {
        self.users.get(self.dir)
    }

    pub fn users_mut(&mut self) -> Result<&mut UserTable> {
        self.users.get_mut(self.dir)
    }

    pub fn routing(&self) -> Result<&RoutingConfig> {
        self.routing.get(self.dir)
    }

    pub fn routing_mut(&mut self) -> Result<&mut RoutingConfig> {
        self.routing.get_mut(self.dir)
    }

    pub fn tokens(&self) -> Result<&TokenIndex> {
        self.tokens.get(self.dir)
    }

    pub fn tokens_mut(&mut self) -> Result<&mut TokenIndex> {
        self.tokens.get_mut(self.dir)
    }

    pub fn rooms(&self) -> Result<&RoomMap> {
        self.rooms.get(self.dir)
    }

    pub fn rooms_mut(&mut self) -> Result<&mut RoomMap> {
        self.rooms.get_mut(self.dir)
    }

    /// Persist every changed file by write-to-temp then rename
    ///
    /// All temp files are written and synced before the first rename, so a
    /// failure while encoding or writing leaves every file untouched.
    pub fn commit(self) -> Result<()> {
        let staged: Vec<(NamedTempFile, PathBuf)> = [
            self.routing.stage(self.dir)?,
            self.tokens.stage(self.dir)?,
            self.rooms.stage(self.dir)?,
            self.users.stage(self.dir)?,
        ]
        .into_iter()
        .flatten()
        .collect();

        for (temp, path) in staged {
            temp.persist(&path).map_err(|e| {
                tracing::error!("Failed to replace {:?}: {}", path, e.error);
                e.error
            })?;
            tracing::debug!("Wrote {:?}", path);
        }

        Ok(())
    }
}
