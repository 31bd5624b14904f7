mod error;
mod graph;

pub use error::{GraphError, Result};
pub use graph::PackageGraph;
