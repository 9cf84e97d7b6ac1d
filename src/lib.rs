pub mod build;
pub mod config;
pub mod error;
pub mod parse;
pub mod placeholder;
pub mod resolve;
pub mod wasm;

pub use build::{is_data_step, FormInput, RunModel, RunStep, StepKind, StepLink, WorkflowParameter};
pub use config::RunFormConfig;
pub use error::{Diagnostic, Phase, ResolverError};
pub use resolve::{resolve_replacements, StepOutput, StepOutputs};
