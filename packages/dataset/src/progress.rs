//! Row-count reporting while the crime CSV is read.
//!
//! The reader only knows how many rows it has decoded; how that is shown
//! (a terminal spinner, or nothing at all) is decided by the caller.

/// Receives row counts and the final status of a dataset load.
pub trait ProgressCallback: Send + Sync {
    /// Records `delta` more decoded rows.
    fn inc(&self, delta: u64);

    /// Replaces the status text.
    fn set_message(&self, msg: String);

    /// Ends the load with a summary line.
    fn finish(&self, msg: String);

    /// Ends the load and removes any indicator.
    fn finish_and_clear(&self);
}

/// Discards every update. Used by [`crate::DatasetSource::load`].
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}
