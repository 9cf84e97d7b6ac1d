//! Workflow parameter discovery.

use indexmap::IndexMap;
use tracing::trace;

use super::types::{RunStep, StepKind, WorkflowParameter};
use crate::config::RunFormConfig;
use crate::placeholder;

struct ParameterRegistry<'c> {
    config: &'c RunFormConfig,
    parameters: IndexMap<String, WorkflowParameter>,
}

impl<'c> ParameterRegistry<'c> {
    fn new(config: &'c RunFormConfig) -> Self {
        ParameterRegistry {
            config,
            parameters: IndexMap::new(),
        }
    }

    fn fetch_or_create(&mut self, name: &str) -> &mut WorkflowParameter {
        let ordinal = self.parameters.len() as u32 + 1;
        let config = self.config;
        self.parameters
            .entry(name.to_string())
            .or_insert_with(|| WorkflowParameter::new(name, config.parameter_color(ordinal)))
    }

    /// Fetch or create the descriptor for `name` and link `step` to it.
    fn register(&mut self, name: &str, step: usize) {
        let parameter = self.fetch_or_create(name);
        if !parameter.links.contains(&step) {
            parameter.links.push(step);
        }
    }

    /// Make sure `name` has a descriptor, without linking any step.
    fn declare(&mut self, name: &str) {
        self.fetch_or_create(name);
    }
}

/// Scan input values for `${name}` placeholders and tool steps for declared
/// replacement parameters. Colors follow discovery order.
///
/// Connected inputs are skipped: their value comes from the producing step.
/// Declared names only get a descriptor; they never add to `links`.
pub fn discover_parameters(
    steps: &mut [RunStep],
    config: &RunFormConfig,
) -> IndexMap<String, WorkflowParameter> {
    let mut registry = ParameterRegistry::new(config);

    for step in steps.iter_mut() {
        let index = step.index;

        for input in step.inputs.values_mut() {
            if input.connected {
                continue;
            }
            let Some(text) = input.def.value.as_str() else {
                continue;
            };
            let names: Vec<String> = placeholder::scan(text)
                .into_iter()
                .map(|p| p.name.to_string())
                .collect();
            if names.is_empty() {
                continue;
            }
            for name in &names {
                registry.register(name, index);
            }
            input.link_parameter();
        }

        if step.is_tool_step() {
            for entry in &step.replacement_parameters {
                for name in declared_names(entry) {
                    registry.declare(name);
                }
            }
        }
    }

    trace!(count = registry.parameters.len(), "workflow parameters discovered");
    registry.parameters
}

/// A declared entry is either a bare name or text containing placeholders.
fn declared_names(entry: &str) -> Vec<&str> {
    let found = placeholder::scan(entry);
    if found.is_empty() {
        let bare = entry.trim();
        return if bare.is_empty() { Vec::new() } else { vec![bare] };
    }
    found.into_iter().map(|p| p.name).collect()
}
