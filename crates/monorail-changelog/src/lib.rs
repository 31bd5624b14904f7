mod changelog;
mod error;
mod render;

pub use changelog::{CHANGELOG_HEADER, Changelog};
pub use error::{ChangelogError, Result};
pub use render::{HASH_PLACEHOLDER, render_section};
