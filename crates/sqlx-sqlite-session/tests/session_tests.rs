//! Integration tests for session open and diagnostics.

use sqlx::Row;
use sqlx_sqlite_session::{SessionConfig, SqliteSession};

#[tokio::test]
async fn test_open_creates_file_and_enables_wal() {
   let dir = tempfile::tempdir().unwrap();
   let config = SessionConfig::new(dir.path(), "ledger");

   let session = SqliteSession::open(&config).await.unwrap();
   assert!(session.path().exists());
   assert!(session.filename().ends_with("ledger.db"));

   let mut conn = session.conn().await;
   let row = sqlx::query("PRAGMA journal_mode")
      .fetch_one(&mut *conn)
      .await
      .unwrap();
   let mode: String = row.get(0);
   assert_eq!(mode.to_lowercase(), "wal");
}

#[tokio::test]
async fn test_open_creates_missing_directory() {
   let dir = tempfile::tempdir().unwrap();
   let config = SessionConfig::new(dir.path().join("nested/dbs"), "peers");

   let session = SqliteSession::open(&config).await.unwrap();
   assert!(session.path().exists());
}

#[tokio::test]
async fn test_session_executes_statements() {
   let dir = tempfile::tempdir().unwrap();
   let config = SessionConfig::new(dir.path(), "ledger");
   let session = SqliteSession::open(&config).await.unwrap();

   let mut conn = session.conn().await;
   sqlx::query("CREATE TABLE entries (id INTEGER PRIMARY KEY, body TEXT)")
      .execute(&mut *conn)
      .await
      .unwrap();
   sqlx::query("INSERT INTO entries (body) VALUES ('hello')")
      .execute(&mut *conn)
      .await
      .unwrap();

   let row = sqlx::query("SELECT COUNT(*) FROM entries")
      .fetch_one(&mut *conn)
      .await
      .unwrap();
   let count: i64 = row.get(0);
   assert_eq!(count, 1);
}

#[tokio::test]
async fn test_memory_diagnostics() {
   let dir = tempfile::tempdir().unwrap();
   let config = SessionConfig::new(dir.path(), "ledger");
   let session = SqliteSession::open(&config).await.unwrap();

   // Touch the database so the page cache holds something
   {
      let mut conn = session.conn().await;
      sqlx::query("CREATE TABLE entries (id INTEGER PRIMARY KEY, body TEXT)")
         .execute(&mut *conn)
         .await
         .unwrap();
   }

   // An open connection allocates engine memory
   assert!(SqliteSession::memory_used_kb() > 0);

   // The per-connection status query must succeed on a live handle
   session.page_cache_used_kb().await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_fails_before_touching_disk() {
   let config = SessionConfig::new("", "ledger");
   assert!(SqliteSession::open(&config).await.is_err());
}
