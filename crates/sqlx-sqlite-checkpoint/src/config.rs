//! Configuration for the WAL checkpoint trigger

/// Tuning for when log growth schedules a checkpoint.
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_checkpoint::CheckpointConfig;
///
/// // Use the default 1000-page threshold
/// let config = CheckpointConfig::default();
///
/// // Checkpoint more aggressively
/// let config = CheckpointConfig::new().with_threshold_pages(250);
/// ```
#[derive(Debug, Clone)]
pub struct CheckpointConfig {
   /// Number of pages the write-ahead log must reach before a growth
   /// notification schedules a checkpoint.
   ///
   /// Default: 1000
   pub threshold_pages: u32,
}

impl Default for CheckpointConfig {
   fn default() -> Self {
      Self {
         threshold_pages: 1000,
      }
   }
}

impl CheckpointConfig {
   /// Create a config with the default threshold.
   pub fn new() -> Self {
      Self::default()
   }

   /// Override the trigger threshold, in WAL pages.
   pub fn with_threshold_pages(mut self, pages: u32) -> Self {
      self.threshold_pages = pages;
      self
   }
}
