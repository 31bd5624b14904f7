mod error;
mod repository;
mod types;

pub use error::{GitError, Result};
pub use repository::Repository;
pub use types::{CommitEntry, TagInfo};
