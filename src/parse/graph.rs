//! petgraph-based directed graph of step-to-step connections.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use super::types::{OutputConnection, RunPayload};
use crate::error::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionLabel {
    pub output_name: String,
    pub input_name: String,
}

/// Producer → consumer edges between steps. Node weights are step positions.
pub struct StepGraph {
    pub graph: DiGraph<usize, ConnectionLabel>,
    pub node_indices: Vec<NodeIndex>,
}

impl StepGraph {
    /// Build the graph, matching each connection's `input_step_index` against
    /// every step's `step_index` (its position when absent).
    ///
    /// Connections whose target does not exist are left out and reported.
    pub fn build(payload: &RunPayload, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = Vec::with_capacity(payload.steps.len());
        let mut by_step_index: HashMap<usize, Vec<usize>> = HashMap::new();

        for (position, step) in payload.steps.iter().enumerate() {
            node_indices.push(graph.add_node(position));
            by_step_index
                .entry(step.step_index.unwrap_or(position))
                .or_default()
                .push(position);
        }

        for (producer, step) in payload.steps.iter().enumerate() {
            for connection in &step.output_connections {
                let Some(consumers) = by_step_index.get(&connection.input_step_index) else {
                    debug!(
                        step = producer,
                        target = connection.input_step_index,
                        "dropping connection to unknown step"
                    );
                    diagnostics.push(dangling(producer, connection));
                    continue;
                };
                for &consumer in consumers {
                    graph.add_edge(
                        node_indices[producer],
                        node_indices[consumer],
                        ConnectionLabel {
                            output_name: connection.output_name.clone(),
                            input_name: connection.input_name.clone(),
                        },
                    );
                }
            }
        }

        StepGraph { graph, node_indices }
    }

    /// Every connection as `(producer, consumer, label)`, in discovery order.
    pub fn connections(&self) -> Vec<(usize, usize, &ConnectionLabel)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()],
                    self.graph[edge.target()],
                    edge.weight(),
                )
            })
            .collect()
    }

    /// Distinct consumers of `producer`, in connection order.
    pub fn consumers(&self, producer: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for (from, to, _) in self.connections() {
            if from == producer && !out.contains(&to) {
                out.push(to);
            }
        }
        out
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn dangling(producer: usize, connection: &OutputConnection) -> Diagnostic {
    Diagnostic {
        code: "W001",
        message: format!(
            "Output '{}' is connected to step index {}, which is not part of this run",
            connection.output_name, connection.input_step_index
        ),
        step_index: Some(producer),
        input: None,
    }
}
