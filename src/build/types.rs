//! Enriched run model records produced by the builder.
//!
//! These records are owned by the model; the payload they were built from is
//! never modified. The renderer reads steps by index and inputs by their
//! flattened name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Diagnostic;
use crate::parse::types::{is_data_input_type, InputDef, StepRecord};

// =============================================================================
// STEP KIND
// =============================================================================

/// Anything that carries a step type.
pub trait StepKind {
    fn step_type(&self) -> &str;

    /// Data steps supply a dataset or collection (`data_input`, `data_collection_input`).
    fn is_data_step(&self) -> bool {
        self.step_type().starts_with("data")
    }

    fn is_tool_step(&self) -> bool {
        self.step_type() == "tool"
    }
}

/// True only for a non-empty sequence made entirely of data steps.
pub fn is_data_step<S: StepKind>(steps: &[S]) -> bool {
    !steps.is_empty() && steps.iter().all(StepKind::is_data_step)
}

impl StepKind for StepRecord {
    fn step_type(&self) -> &str {
        &self.step_type
    }
}

impl StepKind for RunStep {
    fn step_type(&self) -> &str {
        &self.step_type
    }
}

impl StepKind for StepLink {
    fn step_type(&self) -> &str {
        &self.step_type
    }
}

// =============================================================================
// MODEL
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RunModel {
    pub name: Option<String>,
    pub workflow_id: Option<Value>,
    pub history_id: Option<Value>,
    pub workflow_resource_parameters: Option<Value>,
    pub has_workflow_resource_parameters: bool,
    pub has_upgrade_messages: bool,
    pub step_version_changes: Option<Value>,
    pub has_step_version_changes: bool,
    pub steps: Vec<RunStep>,
    /// Shared controls, in discovery order.
    pub workflow_parameters: IndexMap<String, WorkflowParameter>,
    /// At least one tool step starts expanded.
    pub has_open_tool_steps: bool,
    pub has_replacement_parameters_in_tool_form: bool,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStep {
    /// Position in submission order.
    pub index: usize,
    /// The value other steps' connections point at.
    pub step_index: usize,
    pub step_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub errors: Vec<Value>,
    pub expanded: bool,
    /// Downstream consumers, by `index`.
    pub links: Vec<usize>,
    pub replacement_parameters: Vec<String>,
    pub inputs: IndexMap<String, FormInput>,
}

/// A producing step feeding an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLink {
    pub index: usize,
    #[serde(alias = "stepType")]
    pub step_type: String,
}

/// A flattened input together with everything the builder derived for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(flatten)]
    pub def: InputDef,
    /// The input's type before any override.
    #[serde(default)]
    pub original_type: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub step_linked: Vec<StepLink>,
    #[serde(default)]
    pub wp_linked: bool,
    #[serde(default)]
    pub is_workflow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible_value: Option<Value>,
    #[serde(default)]
    pub collapsible_preview: bool,
    /// Flattened name of the input named by `data_ref`, when it resolved.
    #[serde(skip)]
    pub(crate) data_ref_target: Option<String>,
}

impl FormInput {
    pub fn new(def: &InputDef) -> Self {
        FormInput {
            original_type: def.input_type.clone(),
            def: def.clone(),
            connected: false,
            step_linked: Vec::new(),
            wp_linked: false,
            is_workflow: false,
            collapsible_value: None,
            collapsible_preview: false,
            data_ref_target: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn input_type(&self) -> &str {
        &self.def.input_type
    }

    /// Dataset or collection input, judged by the type before any override.
    pub fn is_data_input(&self) -> bool {
        is_data_input_type(&self.original_type)
    }

    /// Mark this input as fed by `producer`'s output `output_name`.
    pub fn connect(&mut self, producer: usize, producer_type: &str, output_name: &str) {
        self.connected = true;
        self.def.input_type = "hidden".into();

        let note = format!("Output dataset '{}' from step {}", output_name, producer + 1);
        self.def.help = Some(match self.def.help.take().filter(|h| !h.is_empty()) {
            Some(help) => format!("{}, {}", help, note),
            None => note,
        });

        if !self.step_linked.iter().any(|link| link.index == producer) {
            self.step_linked.push(StepLink {
                index: producer,
                step_type: producer_type.to_string(),
            });
        }
    }

    /// Mark this input as carrying workflow parameter placeholders.
    pub fn link_parameter(&mut self) {
        self.wp_linked = true;
        self.def.input_type = "text".into();
    }
}

/// One shared `${name}` control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowParameter {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub color: String,
    /// Steps referencing the parameter, by `index`, in discovery order.
    pub links: Vec<usize>,
    pub optional: bool,
}

impl WorkflowParameter {
    pub fn new(name: &str, color: String) -> Self {
        WorkflowParameter {
            name: name.to_string(),
            label: name.to_string(),
            input_type: "text".into(),
            color,
            links: Vec::new(),
            optional: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(step_type: &str) -> StepLink {
        StepLink {
            index: 0,
            step_type: step_type.into(),
        }
    }

    #[test]
    fn data_step_prefix() {
        assert!(link("data_input").is_data_step());
        assert!(link("data_collection_input").is_data_step());
        assert!(link("data").is_data_step());
        assert!(!link("tool").is_data_step());
        assert!(!link("parameter_input").is_data_step());
    }

    #[test]
    fn data_step_sequence_is_all_or_nothing() {
        assert!(is_data_step(&[link("data_input")]));
        assert!(!is_data_step(&[link("data_input"), link("tool")]));
        assert!(!is_data_step::<StepLink>(&[]));
    }

    #[test]
    fn connect_hides_and_records_provenance() {
        let mut input = FormInput::new(&InputDef {
            name: "input1".into(),
            input_type: "data".into(),
            ..Default::default()
        });
        input.connect(0, "data_input", "output");
        input.connect(2, "tool", "out_file1");
        input.connect(2, "tool", "out_file2");

        assert!(input.connected);
        assert_eq!(input.input_type(), "hidden");
        assert_eq!(input.original_type, "data");
        assert!(input.is_data_input());
        assert_eq!(input.step_linked.len(), 2);
        assert_eq!(
            input.def.help.as_deref(),
            Some(
                "Output dataset 'output' from step 1, Output dataset 'out_file1' from step 3, \
                 Output dataset 'out_file2' from step 3"
            )
        );
    }
}
