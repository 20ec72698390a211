pub mod sync;
pub use sync::{SyncError, SyncService, SyncSummary};
