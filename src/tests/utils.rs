use crate::db::connection::{init_db, Database};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A path under the system temp dir that no other test uses.
pub fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{nanos}.{ext}",
        std::process::id()
    ))
}

/// Returns a fresh test database using the production schema
pub fn make_db(prefix: &str) -> Database {
    let db = Database::new(temp_path(prefix, "sqlite"));
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}
