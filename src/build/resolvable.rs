//! Per-step resolvability: which tool steps need the user's attention.

use std::collections::HashMap;

use serde_json::Value;

use super::types::{is_data_step, RunStep, StepKind, StepLink};

/// Evaluate a tool step's inputs and decide whether it starts expanded.
///
/// Returns whether this step was opened by one of its inputs. Non-tool steps
/// are left untouched and return `false`.
pub fn evaluate_tool_step(step: &mut RunStep) -> bool {
    if !step.is_tool_step() {
        return false;
    }

    let linked: HashMap<String, Vec<StepLink>> = step
        .inputs
        .iter()
        .map(|(name, input)| (name.clone(), input.step_linked.clone()))
        .collect();

    // Stays false for the rest of the step once a non-data producer shows up
    let mut data_resolved = true;
    let mut open = false;

    for input in step.inputs.values_mut() {
        let is_data_input = input.is_data_input();
        let is_runtime_value = input.def.is_runtime_value();

        if !input.step_linked.is_empty() && !is_data_step(&input.step_linked) {
            data_resolved = false;
        }

        let no_static_options = input.def.options.as_ref().is_some_and(Vec::is_empty);
        input.is_workflow = (no_static_options && !data_resolved) || input.wp_linked;
        if let Some(target) = input.data_ref_target.as_ref().and_then(|t| linked.get(t)) {
            input.is_workflow = (!target.is_empty() && !is_data_step(target)) || input.wp_linked;
        }

        if is_data_input && !input.def.optional && !is_data_step(&input.step_linked) {
            open = true;
        }
        if !is_data_input && is_runtime_value && input.step_linked.is_empty() {
            open = true;
        }

        if is_runtime_value {
            input.def.value = Value::Null;
        } else if !is_data_input
            && input.input_type() != "hidden"
            && !input.wp_linked
            && (input.def.optional || !is_empty_value(&input.def.value))
        {
            input.collapsible_value = Some(input.def.value.clone());
            input.collapsible_preview = true;
        }
    }

    if open {
        step.expanded = true;
    }
    open
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
