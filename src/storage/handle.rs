//! Store handle and scoped connections

use std::ops::Deref;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use rusqlite::{ffi, Connection, OpenFlags};

use crate::config;
use crate::{Error, Result};

static INSTANCE: OnceLock<StoreHandle> = OnceLock::new();

/// Where the database lives and how to open it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    target: String,
    create_if_missing: bool,
}

impl StoreOptions {
    /// Options for a database file path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            target: path.as_ref().to_string_lossy().into_owned(),
            create_if_missing: true,
        }
    }

    /// Options for an SQLite `file:` URI
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            target: uri.into(),
            create_if_missing: true,
        }
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn creates_if_missing(&self) -> bool {
        self.create_if_missing
    }

    fn is_uri(&self) -> bool {
        self.target.starts_with("file:")
    }

    fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        flags
    }
}

/// Owner of the database location.
///
/// A handle holds no connection of its own; every operation opens a
/// [`ScopedConnection`] and drops it when done.
#[derive(Debug)]
pub struct StoreHandle {
    options: StoreOptions,
    open: Arc<AtomicUsize>,
}

impl StoreHandle {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle for a database file path
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self::new(StoreOptions::new(path))
    }

    /// The process-wide handle, resolved from the environment and
    /// `gamedata.toml` on first use.
    pub fn instance() -> &'static StoreHandle {
        Self::instance_with(|| config::resolve_options(None, None))
    }

    /// The process-wide handle; `resolve` runs only if it does not exist yet.
    pub fn instance_with(resolve: impl FnOnce() -> StoreOptions) -> &'static StoreHandle {
        INSTANCE.get_or_init(|| {
            let handle = StoreHandle::new(resolve());
            tracing::debug!("Store handle initialized for {}", handle.target());
            handle
        })
    }

    pub fn target(&self) -> &str {
        self.options.target()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Connections opened through this handle that have not been dropped yet
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Open a connection for the duration of one operation.
    ///
    /// The header is read before returning, so a corrupt or locked file
    /// fails here rather than on the first statement.
    pub fn open_connection(&self) -> Result<ScopedConnection> {
        let target = self.target();
        if self.options.create_if_missing && !self.options.is_uri() {
            config::ensure_db_dir(Path::new(target)).map_err(|e| {
                self.connection_error(rusqlite::Error::SqliteFailure(
                    ffi::Error::new(ffi::SQLITE_CANTOPEN),
                    Some(format!("cannot create database directory: {}", e)),
                ))
            })?;
        }

        let conn = Connection::open_with_flags(target, self.options.open_flags())
            .map_err(|source| self.connection_error(source))?;
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|source| self.connection_error(source))?;

        self.open.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Opened connection to {}", target);

        Ok(ScopedConnection {
            conn,
            open: Arc::clone(&self.open),
        })
    }

    fn connection_error(&self, source: rusqlite::Error) -> Error {
        tracing::error!("Error opening database {}: {}", self.target(), source);
        Error::Connection {
            target: self.target().to_string(),
            source,
        }
    }
}

/// A connection that is closed when it goes out of scope
#[derive(Debug)]
pub struct ScopedConnection {
    conn: Connection,
    open: Arc<AtomicUsize>,
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        // `conn` is closed right after this, when its field is dropped
        self.open.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!("Closed connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = config::default_database_path_in(dir.path());
        let handle = StoreHandle::at(&path);

        assert!(!path.exists());
        let conn = handle.open_connection().unwrap();
        assert_eq!(handle.open_connections(), 1);
        drop(conn);

        assert!(path.exists());
        assert_eq!(handle.open_connections(), 0);
    }

    #[test]
    fn test_no_io_before_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = config::default_database_path_in(dir.path());
        let _handle = StoreHandle::at(&path);

        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn test_missing_file_without_create() {
        let dir = tempfile::tempdir().unwrap();
        let options = StoreOptions::new(dir.path().join("absent.db")).create_if_missing(false);
        let handle = StoreHandle::new(options);

        let err = handle.open_connection().unwrap_err();
        assert!(err.is_connection());
        assert_eq!(handle.open_connections(), 0);
    }

    #[test]
    fn test_uncreatable_directory_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        // The storage root is a plain file, so Databases/ cannot be created under it
        let root = dir.path().join("root");
        std::fs::write(&root, b"").unwrap();
        let handle = StoreHandle::at(config::default_database_path_in(&root));

        let err = handle.open_connection().unwrap_err();
        assert!(err.is_connection());
        assert!(err.to_string().contains("cannot create database directory"));
        assert_eq!(handle.open_connections(), 0);
    }

    #[test]
    fn test_locked_database_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.db");
        let handle = StoreHandle::at(&path);
        handle.open_connection().unwrap().execute_batch("CREATE TABLE Saves (slot INTEGER)").unwrap();

        let holder = Connection::open(&path).unwrap();
        holder.execute_batch("PRAGMA locking_mode = EXCLUSIVE; BEGIN EXCLUSIVE;").unwrap();

        // The header read waits out rusqlite's default busy timeout, then fails
        let err = handle.open_connection().unwrap_err();
        assert!(err.is_connection());
        assert_eq!(handle.open_connections(), 0);

        holder.execute_batch("COMMIT").unwrap();
    }

    #[test]
    fn test_corrupt_header_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.db");
        std::fs::write(&path, vec![0x42u8; 4096]).unwrap();

        let err = StoreHandle::at(&path).open_connection().unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn test_connection_closed_on_error_path() {
        let dir = tempfile::tempdir().unwrap();
        let handle = StoreHandle::at(dir.path().join("game.db"));

        let failed: Result<()> = (|| {
            let conn = handle.open_connection()?;
            conn.execute_batch("NOT SQL").map_err(|source| Error::Execution {
                operation: crate::Operation::Statement,
                source,
            })?;
            Ok(())
        })();

        assert!(failed.is_err());
        assert_eq!(handle.open_connections(), 0);
    }

    #[test]
    fn test_uri_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uri.db");
        let handle = StoreHandle::new(StoreOptions::uri(format!("file:{}?mode=rwc", path.display())));

        handle.open_connection().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_instance_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();

        let first = StoreHandle::instance_with(|| StoreOptions::new(config::default_database_path_in(&root)));
        let second = StoreHandle::instance_with(|| StoreOptions::new("/elsewhere/other.db"));
        let third = StoreHandle::instance();

        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, third));
        assert_eq!(first.target(), second.target());
    }
}
