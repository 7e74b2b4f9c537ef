pub mod artifact;
pub mod config;
pub mod error;
pub mod outcome;
pub mod review;

pub use artifact::{Artifact, ArtifactKind};
pub use config::{RequestSettings, ReviewConfig};
pub use error::ReviewError;
pub use outcome::{OutputGuard, ReviewOutcome};
pub use review::run_review;
