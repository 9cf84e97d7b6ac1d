//! Build phase: RunPayload → RunModel.
//!
//! Four ordered passes; each one reads flags written by the ones before it:
//! index & flatten, forward links, connections, then workflow parameters and
//! resolvability.

pub mod flatten;
pub mod links;
pub mod params;
pub mod resolvable;
pub mod types;

pub use types::*;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::config::RunFormConfig;
use crate::error::Diagnostic;
use crate::parse::graph::StepGraph;
use crate::parse::types::{RunPayload, StepRecord};
use crate::resolve::{resolve_replacements, StepOutputs};

impl RunModel {
    pub fn build(payload: &RunPayload) -> Self {
        Self::build_with(payload, &RunFormConfig::default())
    }

    pub fn build_with(payload: &RunPayload, config: &RunFormConfig) -> Self {
        let mut diagnostics = Vec::new();

        // 1. Index & flatten
        let mut steps: Vec<RunStep> = payload
            .steps
            .iter()
            .enumerate()
            .map(|(index, record)| index_step(index, record, config, &mut diagnostics))
            .collect();

        // 2. Forward links
        let graph = StepGraph::build(payload, &mut diagnostics);
        links::link_steps(&mut steps, &graph);

        // 3. Connections
        links::materialize_connections(&mut steps, &graph, &mut diagnostics);

        // 4. Workflow parameters, then resolvability
        let workflow_parameters = params::discover_parameters(&mut steps, config);
        let mut has_open_tool_steps = false;
        for step in steps.iter_mut() {
            has_open_tool_steps |= resolvable::evaluate_tool_step(step);
        }
        let has_replacement_parameters_in_tool_form = steps
            .iter()
            .flat_map(|step| step.inputs.values())
            .any(|input| input.wp_linked);

        debug!(
            steps = steps.len(),
            parameters = workflow_parameters.len(),
            diagnostics = diagnostics.len(),
            has_open_tool_steps,
            "run model built"
        );

        RunModel {
            name: payload.name.clone(),
            workflow_id: payload.id.clone().or_else(|| payload.workflow_id.clone()),
            history_id: payload.history_id.clone(),
            workflow_resource_parameters: payload.workflow_resource_parameters.clone(),
            has_workflow_resource_parameters: has_content(&payload.workflow_resource_parameters),
            has_upgrade_messages: payload.has_upgrade_messages,
            step_version_changes: payload.step_version_changes.clone(),
            has_step_version_changes: has_content(&payload.step_version_changes),
            steps,
            workflow_parameters,
            has_open_tool_steps,
            has_replacement_parameters_in_tool_form,
            diagnostics,
        }
    }

    pub fn step(&self, index: usize) -> Option<&RunStep> {
        self.steps.get(index)
    }

    pub fn input(&self, step: usize, name: &str) -> Option<&FormInput> {
        self.step(step)?.inputs.get(name)
    }

    /// Replacement values for one step's form, see [`resolve_replacements`].
    pub fn replacements_for(
        &self,
        step: usize,
        step_outputs: &StepOutputs,
        parameter_values: &HashMap<String, String>,
    ) -> IndexMap<String, Value> {
        match self.step(step) {
            Some(step) => resolve_replacements(&step.inputs, step_outputs, parameter_values),
            None => IndexMap::new(),
        }
    }
}

fn index_step(
    index: usize,
    record: &StepRecord,
    config: &RunFormConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> RunStep {
    RunStep {
        index,
        step_index: record.step_index.unwrap_or(index),
        step_type: record.step_type.clone(),
        title: step_title(index, record, config),
        label: record.step_label.clone(),
        name: record.step_name.clone(),
        annotation: record.annotation.clone(),
        version: record.step_version.clone(),
        errors: record.messages.clone(),
        // Data steps always ask the user for a dataset
        expanded: record.is_data_step(),
        links: Vec::new(),
        replacement_parameters: record.replacement_parameters.clone(),
        inputs: flatten::flatten_inputs(index, &record.inputs, diagnostics),
    }
}

/// `"{index+1}: {label or name}[ - {annotation}][ ({version_label} {version})]"`
fn step_title(index: usize, record: &StepRecord, config: &RunFormConfig) -> String {
    let label = non_empty(&record.step_label)
        .or_else(|| non_empty(&record.step_name))
        .unwrap_or_default();
    let mut title = format!("{}: {}", index + 1, label);
    if let Some(annotation) = non_empty(&record.annotation) {
        title.push_str(&format!(" - {}", annotation));
    }
    if let Some(version) = non_empty(&record.step_version) {
        title.push_str(&format!(" ({} {})", config.version_label, version));
    }
    title
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn has_content(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Object(entries)) => !entries.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
