//! Forward links and connection materialization.

use tracing::{debug, trace};

use super::types::RunStep;
use crate::error::Diagnostic;
use crate::parse::graph::StepGraph;

/// Record every step's downstream consumers.
pub fn link_steps(steps: &mut [RunStep], graph: &StepGraph) {
    for step in steps.iter_mut() {
        step.links = graph.consumers(step.index);
    }
}

/// Hide every consumer input that a connection feeds and record where its
/// value comes from.
pub fn materialize_connections(
    steps: &mut [RunStep],
    graph: &StepGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (producer, consumer, label) in graph.connections() {
        let producer_type = steps[producer].step_type.clone();
        let Some(input) = steps[consumer].inputs.get_mut(&label.input_name) else {
            debug!(
                step = consumer,
                input = %label.input_name,
                "connection names an input the step does not have"
            );
            diagnostics.push(Diagnostic {
                code: "W002",
                message: format!(
                    "Output '{}' of step {} is connected to a missing input",
                    label.output_name,
                    producer + 1
                ),
                step_index: Some(consumer),
                input: Some(label.input_name.clone()),
            });
            continue;
        };
        input.connect(producer, &producer_type, &label.output_name);
    }

    trace!(connections = graph.connection_count(), "connections materialized");
}
