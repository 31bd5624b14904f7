use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("dependency cycle detected between packages: {}", members.join(" -> "))]
    CycleDetected { members: Vec<String> },

    #[error("package '{package}' depends on unknown package '{dependency}'")]
    UnknownDependency { package: String, dependency: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
