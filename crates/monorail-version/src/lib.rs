mod error;
mod increment;
mod metadata;

pub use error::{Result, VersionError};
pub use increment::{increment, parse_greater};
pub use metadata::apply_build_metadata;
