use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Graph(#[from] monorail_graph::GraphError),

    #[error("version calculation failed")]
    Version(#[from] monorail_version::VersionError),

    #[error("version selection cancelled")]
    Cancelled,

    #[error("release set names unknown package '{name}'")]
    UnknownPackage { name: String },

    #[error("prompt failed")]
    Prompt(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
