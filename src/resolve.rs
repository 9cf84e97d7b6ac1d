//! Submission-time replacement of linked input values.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::build::types::{FormInput, StepKind};
use crate::placeholder;

/// Current form value of one producing step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    #[serde(default)]
    pub input: Option<OutputValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputValues {
    #[serde(default)]
    pub values: Vec<Value>,
}

impl StepOutput {
    pub fn with_values(values: Vec<Value>) -> Self {
        StepOutput {
            input: Some(OutputValues { values }),
        }
    }
}

/// Step outputs keyed by producing step index.
///
/// Reads from a JSON array (position is the index, `null` marks a step with
/// no output yet) or from an object keyed by index. Unreadable entries count
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepOutputs(BTreeMap<usize, StepOutput>);

impl StepOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, output: StepOutput) {
        self.0.insert(index, output);
    }

    pub fn get(&self, index: usize) -> Option<&StepOutput> {
        self.0.get(&index)
    }
}

impl FromIterator<(usize, StepOutput)> for StepOutputs {
    fn from_iter<I: IntoIterator<Item = (usize, StepOutput)>>(iter: I) -> Self {
        StepOutputs(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for StepOutputs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let entries: Vec<(usize, Value)> = match value {
            Value::Array(items) => items.into_iter().enumerate().collect(),
            Value::Object(entries) => entries
                .into_iter()
                .filter_map(|(key, item)| key.parse::<usize>().ok().map(|index| (index, item)))
                .collect(),
            _ => Vec::new(),
        };
        Ok(entries
            .into_iter()
            .filter(|(_, item)| !item.is_null())
            .filter_map(|(index, item)| {
                serde_json::from_value::<StepOutput>(item)
                    .ok()
                    .map(|output| (index, output))
            })
            .collect())
    }
}

/// Compute the values to substitute into linked inputs before submission.
///
/// Only inputs with a computed value appear in the result; the caller keeps
/// its own form value for everything else. Pure: repeated calls with the same
/// arguments return the same mapping.
///
/// - Step-linked inputs gather the values of their data-step producers. An
///   input that does not accept multiple values keeps only the first one.
/// - Parameter-linked inputs with a text value get every `${name}` with a
///   non-empty value replaced; unknown names stay in the text. This result
///   replaces a step-linked one when an input is both.
pub fn resolve_replacements(
    inputs: &IndexMap<String, FormInput>,
    step_outputs: &StepOutputs,
    parameter_values: &HashMap<String, String>,
) -> IndexMap<String, Value> {
    let mut replacements = IndexMap::new();

    for (name, input) in inputs {
        let mut new_value = None;

        if !input.step_linked.is_empty() {
            new_value = linked_values(input, step_outputs);
        }
        if input.wp_linked {
            if let Some(text) = input.def.value.as_str() {
                new_value = Some(Value::String(placeholder::substitute(text, parameter_values)));
            }
        }

        if let Some(value) = new_value {
            replacements.insert(name.clone(), value);
        }
    }

    replacements
}

fn linked_values(input: &FormInput, step_outputs: &StepOutputs) -> Option<Value> {
    let mut values: Vec<Value> = input
        .step_linked
        .iter()
        .filter(|source| source.is_data_step())
        .filter_map(|source| step_outputs.get(source.index))
        .filter_map(|output| output.input.as_ref())
        .flat_map(|output| output.values.iter().cloned())
        .collect();

    if values.is_empty() {
        return None;
    }
    // First producer wins when the input takes a single value
    if !input.def.multiple {
        values.truncate(1);
    }
    Some(json!({ "values": values }))
}
