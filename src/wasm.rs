//! WASM entry points for browser use.
//!
//! Results are serialized JSON-compatible (plain objects rather than `Map`s)
//! so the form renderer can read them like any fetched JSON.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::build::{FormInput, RunModel};
use crate::config::RunFormConfig;
use crate::error::ResolverError;
use crate::resolve::{self, StepOutputs};

/// Parse a run payload and build the run form model.
/// Returns `{status: "success", model}` or `{status: "errors", errors}`.
#[wasm_bindgen]
pub fn build_run_form(json: &str) -> JsValue {
    to_js(&build_run_form_inner(json, None))
}

/// Same as `build_run_form`, with display settings given as JSON.
#[wasm_bindgen]
pub fn build_run_form_with_config(json: &str, config_json: &str) -> JsValue {
    to_js(&build_run_form_inner(json, Some(config_json)))
}

fn build_run_form_inner(json: &str, config_json: Option<&str>) -> BuildResult {
    let config = match config_json {
        Some(config_json) => match RunFormConfig::from_json(config_json) {
            Ok(c) => c,
            Err(errors) => return BuildResult::errors(errors),
        },
        None => RunFormConfig::default(),
    };

    match crate::parse::parse_and_build_with(json, &config) {
        Ok(model) => BuildResult::Success {
            model: Box::new(model),
        },
        Err(errors) => BuildResult::errors(errors),
    }
}

/// Compute submission replacements for one step's flattened inputs.
///
/// `inputs_json` is a step's `inputs` object as returned by `build_run_form`,
/// `step_outputs_json` an array or object of step outputs, `values_json` a
/// name → value object of workflow parameter values.
#[wasm_bindgen]
pub fn resolve_replacements(inputs_json: &str, step_outputs_json: &str, values_json: &str) -> JsValue {
    to_js(&resolve_replacements_inner(inputs_json, step_outputs_json, values_json))
}

fn resolve_replacements_inner(
    inputs_json: &str,
    step_outputs_json: &str,
    values_json: &str,
) -> ResolveResult {
    let inputs = match serde_json::from_str::<IndexMap<String, FormInput>>(inputs_json) {
        Ok(i) => i,
        Err(e) => return ResolveResult::error(parse_error("inputs", e)),
    };
    let step_outputs = match serde_json::from_str::<StepOutputs>(step_outputs_json) {
        Ok(o) => o,
        Err(e) => return ResolveResult::error(parse_error("step outputs", e)),
    };
    let values = match serde_json::from_str::<HashMap<String, serde_json::Value>>(values_json) {
        Ok(v) => parameter_values(v),
        Err(e) => return ResolveResult::error(parse_error("workflow parameter values", e)),
    };

    ResolveResult::Success {
        replacements: resolve::resolve_replacements(&inputs, &step_outputs, &values),
    }
}

/// Form fields hand back strings, numbers or nothing; only text is substituted.
fn parameter_values(raw: HashMap<String, serde_json::Value>) -> HashMap<String, String> {
    raw.into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::String(s) => Some((name, s)),
            serde_json::Value::Number(n) => Some((name, n.to_string())),
            serde_json::Value::Bool(b) => Some((name, b.to_string())),
            _ => None,
        })
        .collect()
}

fn parse_error(what: &str, e: serde_json::Error) -> ErrorDto {
    ErrorDto::from(ResolverError::parse(
        "P001",
        format!("Failed to parse {} JSON: {}", what, e),
    ))
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    step_index: Option<usize>,
}

impl From<ResolverError> for ErrorDto {
    fn from(e: ResolverError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            step_index: e.step_index,
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum BuildResult {
    #[serde(rename = "success")]
    Success { model: Box<RunModel> },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

impl BuildResult {
    fn errors(errors: Vec<ResolverError>) -> Self {
        BuildResult::Errors {
            errors: errors.into_iter().map(ErrorDto::from).collect(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum ResolveResult {
    #[serde(rename = "success")]
    Success {
        replacements: IndexMap<String, serde_json::Value>,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

impl ResolveResult {
    fn error(error: ErrorDto) -> Self {
        ResolveResult::Errors {
            errors: vec![error],
        }
    }
}
