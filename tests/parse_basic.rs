//! Integration tests for the Parse phase: run payload parsing and leniency.

use run_resolver::parse::{self, InputNode};

#[test]
fn parse_linear_run() {
    let json = include_str!("fixtures/linear_run.json");
    let payload = parse::parse(json).expect("Should parse successfully");
    assert_eq!(payload.name.as_deref(), Some("Filter and sort reads"));
    assert_eq!(payload.steps.len(), 4);
    assert_eq!(payload.steps[1].step_type, "tool");
    assert_eq!(payload.steps[1].step_version.as_deref(), Some("1.1.0"));
    assert_eq!(payload.steps[0].output_connections.len(), 1);
    assert_eq!(payload.steps[2].replacement_parameters, vec!["wp_2"]);
}

#[test]
fn parse_input_tree_variants() {
    let json = include_str!("fixtures/linear_run.json");
    let payload = parse::parse(json).unwrap();
    let inputs = &payload.steps[1].inputs;
    assert_eq!(inputs.len(), 3);
    assert!(matches!(&inputs[0], InputNode::Leaf(def) if def.name == "input1" && def.is_runtime_value()));
    match &inputs[1] {
        InputNode::Conditional(cond) => {
            assert_eq!(cond.name, "library");
            assert_eq!(cond.cases.len(), 2);
            assert_eq!(cond.active_case(), Some(0));
        }
        other => panic!("Expected Conditional, got {:?}", other),
    }
}

#[test]
fn parse_invalid_json_returns_error() {
    let result = parse::parse("not valid json");
    assert!(result.is_err());
    let errors = result.unwrap_err();
    assert_eq!(errors[0].code, "P001");
}

#[test]
fn parse_missing_steps_returns_error() {
    let errors = parse::parse(r#"{"name": "no steps"}"#).unwrap_err();
    assert_eq!(errors[0].code, "P002");
    let errors = parse::parse(r#"{"steps": {"0": {}}}"#).unwrap_err();
    assert_eq!(errors[0].code, "P002");
}

#[test]
fn parse_error_display() {
    let errors = parse::parse("[]").unwrap_err();
    assert_eq!(
        errors[0].to_string(),
        "[Parse:P002] Run payload must contain a `steps` array"
    );
}

/// Malformed fragments keep their slot and fall back to empty values.
#[test]
fn parse_malformed_fragments_degrade() {
    let json = include_str!("fixtures/malformed_run.json");
    let payload = parse::parse(json).expect("Should parse despite malformed steps");
    assert_eq!(payload.steps.len(), 4);
    assert!(payload.steps[0].inputs.is_empty());
    assert_eq!(payload.steps[1].inputs.len(), 1);
    assert_eq!(payload.steps[1].inputs[0].name(), "a");
    assert!(payload.steps[1].output_connections.is_empty());
    assert!(payload.steps[1].replacement_parameters.is_empty());
    assert_eq!(payload.steps[2].step_type, "");
    assert_eq!(payload.steps[3].step_type, "data_input");
}
