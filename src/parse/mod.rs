//! Parse phase: run payload JSON → Rust types + step graph.

pub mod graph;
pub mod types;

pub use graph::StepGraph;
pub use types::*;

use crate::build::RunModel;
use crate::config::RunFormConfig;
use crate::error::ResolverError;

/// Deserialize a run payload JSON string into a `RunPayload`.
///
/// The only hard requirements are valid JSON and a `steps` array; everything
/// below the step level degrades instead of failing.
pub fn parse(json: &str) -> Result<RunPayload, Vec<ResolverError>> {
    let value = serde_json::from_str::<serde_json::Value>(json).map_err(|e| {
        vec![ResolverError::parse(
            "P001",
            format!("Failed to parse run payload JSON: {}", e),
        )]
    })?;

    if !value.get("steps").is_some_and(|steps| steps.is_array()) {
        return Err(vec![ResolverError::parse(
            "P002",
            "Run payload must contain a `steps` array",
        )]);
    }

    serde_json::from_value::<RunPayload>(value).map_err(|e| {
        vec![ResolverError::parse(
            "P001",
            format!("Failed to read run payload: {}", e),
        )]
    })
}

/// Parse JSON and build the run model in one step.
pub fn parse_and_build(json: &str) -> Result<RunModel, Vec<ResolverError>> {
    parse_and_build_with(json, &RunFormConfig::default())
}

pub fn parse_and_build_with(
    json: &str,
    config: &RunFormConfig,
) -> Result<RunModel, Vec<ResolverError>> {
    let payload = parse(json)?;
    Ok(RunModel::build_with(&payload, config))
}
