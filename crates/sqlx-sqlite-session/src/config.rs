//! Configuration for SQLite session files

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_extension() -> String {
   ".db".to_string()
}

fn default_backend() -> String {
   "sqlite".to_string()
}

/// Describes where a named database file lives and which backend serves it.
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_session::SessionConfig;
///
/// let config = SessionConfig::new("/var/lib/node/db", "transactions");
/// assert!(config.resolve_path().unwrap().ends_with("transactions.db"));
///
/// // Override the extension for databases that use a different suffix
/// let config = SessionConfig::new("/var/lib/node/db", "validators")
///     .with_extension(".sqlite");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
   /// Directory holding the database file. Created on open if missing.
   pub directory: PathBuf,

   /// Database name, without extension.
   pub name: String,

   /// File extension appended to the name.
   ///
   /// Default: `.db`
   #[serde(default = "default_extension")]
   pub extension: String,

   /// Backend serving the database. Only `sqlite` is supported; any other
   /// value fails at open time.
   ///
   /// Default: `sqlite`
   #[serde(default = "default_backend")]
   pub backend: String,
}

impl SessionConfig {
   /// Create a config with the default extension and backend.
   pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
      Self {
         directory: directory.into(),
         name: name.into(),
         extension: default_extension(),
         backend: default_backend(),
      }
   }

   /// Override the file extension (include the leading dot).
   pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
      self.extension = extension.into();
      self
   }

   /// Resolve the full path of the database file.
   ///
   /// Fails when the config does not name both a directory and a database
   /// name, or names a backend other than sqlite.
   pub fn resolve_path(&self) -> Result<PathBuf> {
      if self.backend != "sqlite" {
         return Err(Error::UnsupportedBackend(self.backend.clone()));
      }
      if self.name.is_empty() || self.directory.as_os_str().is_empty() {
         return Err(Error::InvalidConfig {
            name: self.name.clone(),
            directory: self.directory.display().to_string(),
         });
      }
      Ok(self.directory.join(format!("{}{}", self.name, self.extension)))
   }
}
