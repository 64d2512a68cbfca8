pub mod file;
#[cfg(test)]
pub mod memory;
pub mod null;
pub mod query;
pub mod record;
pub mod store;

pub use file::FileFailedJobStore;
pub use null::NullFailedJobStore;
pub use query::{Column, FailedJobQuery, SortOrder};
pub use record::{FailureRecord, JobId};
pub use store::{FailedJobStore, StoreError};
