mod error;
pub mod mocks;
mod planner;
mod prompt;
mod resolver;

pub use error::{PlanError, Result};
pub use planner::{ExplicitVersion, PlanRequest, VersionPlanner};
pub use prompt::{PromptProvider, TextContract, TextInput, VersionChoice, VersionSelection};
pub use resolver::{BumpDecision, ResolverConfig, local_bump, resolve_bumps};
