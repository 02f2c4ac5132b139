// src/progress.rs
/// Lightweight progress reporting for long-running batch runs.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of nations to process.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one nation's comparison completes.
    fn item_done(&mut self, _nation_id: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
