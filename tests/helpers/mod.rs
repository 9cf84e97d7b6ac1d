#![allow(dead_code)]

use run_resolver::parse::{self, RunPayload};
use run_resolver::RunModel;
use serde_json::{json, Value};

// =============================================================================
// Payload builders
// =============================================================================

pub fn runtime_value() -> Value {
    json!({"__class__": "RuntimeValue"})
}

pub fn data_input_step(index: usize, connections: Vec<Value>) -> Value {
    json!({
        "step_index": index,
        "step_type": "data_input",
        "step_name": "Input dataset",
        "inputs": [],
        "output_connections": connections,
    })
}

pub fn tool_step(index: usize, name: &str, inputs: Vec<Value>, connections: Vec<Value>) -> Value {
    json!({
        "step_index": index,
        "step_type": "tool",
        "step_name": name,
        "inputs": inputs,
        "output_connections": connections,
    })
}

pub fn connection(target: usize, input_name: &str, output_name: &str) -> Value {
    json!({
        "input_step_index": target,
        "input_name": input_name,
        "output_name": output_name,
    })
}

pub fn data_input(name: &str, optional: bool) -> Value {
    json!({
        "name": name,
        "type": "data",
        "value": runtime_value(),
        "optional": optional,
    })
}

pub fn text_input(name: &str, value: &str) -> Value {
    json!({"name": name, "type": "text", "value": value})
}

// =============================================================================
// Parsing shortcuts
// =============================================================================

pub fn payload(steps: Vec<Value>) -> RunPayload {
    parse::parse(&json!({ "steps": steps }).to_string()).expect("Payload should parse")
}

pub fn model(steps: Vec<Value>) -> RunModel {
    RunModel::build(&payload(steps))
}

pub fn linear_model() -> RunModel {
    parse::parse_and_build(include_str!("../fixtures/linear_run.json")).expect("Fixture should build")
}
