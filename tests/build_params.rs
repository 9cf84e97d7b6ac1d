//! Integration tests for workflow parameter discovery.

mod helpers;

use helpers::*;
use run_resolver::parse;
use run_resolver::{RunFormConfig, RunModel};
use serde_json::json;

#[test]
fn parameters_discovered_in_order() {
    let model = linear_model();
    let names: Vec<&str> = model.workflow_parameters.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["wp_1", "wp_2", "sample"]);
    assert!(model.has_replacement_parameters_in_tool_form);
}

#[test]
fn workflow_parameter_descriptors() {
    let model = linear_model();
    insta::assert_json_snapshot!("workflow_parameters", model.workflow_parameters);
}

#[test]
fn parameter_links_each_step_once() {
    let model = model(vec![tool_step(
        0,
        "Cat",
        vec![
            text_input("a", "${x}"),
            text_input("b", "${x}-${x}"),
        ],
        vec![],
    )]);
    assert_eq!(model.workflow_parameters.len(), 1);
    assert_eq!(model.workflow_parameters["x"].links, vec![0]);
    assert!(model.workflow_parameters["x"].optional);
    assert_eq!(model.workflow_parameters["x"].label, "x");
}

#[test]
fn linked_inputs_become_text() {
    let model = model(vec![tool_step(
        0,
        "Cat",
        vec![json!({"name": "n", "type": "integer", "value": "${count}"})],
        vec![],
    )]);
    let input = model.input(0, "n").unwrap();
    assert!(input.wp_linked);
    assert_eq!(input.input_type(), "text");
    assert_eq!(input.original_type, "integer");
}

#[test]
fn connected_inputs_are_not_parameter_linked() {
    let model = model(vec![
        data_input_step(0, vec![connection(1, "input", "output")]),
        tool_step(
            1,
            "Cat",
            vec![json!({"name": "input", "type": "data", "value": "${not_a_param}"})],
            vec![],
        ),
    ]);
    let input = model.input(1, "input").unwrap();
    assert!(input.connected);
    assert!(!input.wp_linked);
    assert!(model.workflow_parameters.is_empty());
    assert!(!model.has_replacement_parameters_in_tool_form);
}

#[test]
fn declared_replacement_parameters_register_tool_steps() {
    let mut step = tool_step(0, "Rename", vec![], vec![]);
    step["replacement_parameters"] = json!(["sample", "${run}_${lane}"]);
    let model = model(vec![step]);

    let names: Vec<&str> = model.workflow_parameters.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["sample", "run", "lane"]);
    assert!(model.workflow_parameters["sample"].links.is_empty());
    assert_eq!(model.workflow_parameters["lane"].color, "hsl(300, 70%, 30%)");
    // Declared only, so no input is linked
    assert!(!model.has_replacement_parameters_in_tool_form);
}

#[test]
fn declaring_a_discovered_parameter_adds_no_link() {
    let mut declaring = tool_step(1, "Rename", vec![], vec![]);
    declaring["replacement_parameters"] = json!(["x"]);
    let model = model(vec![
        tool_step(0, "Cat", vec![text_input("a", "${x}")], vec![]),
        declaring,
    ]);

    assert_eq!(model.workflow_parameters.len(), 1);
    assert_eq!(model.workflow_parameters["x"].links, vec![0]);
    assert_eq!(model.workflow_parameters["x"].color, "hsl(100, 70%, 30%)");
}

#[test]
fn replacement_parameters_ignored_on_non_tool_steps() {
    let mut step = data_input_step(0, vec![]);
    step["replacement_parameters"] = json!(["sample"]);
    let model = model(vec![step]);
    assert!(model.workflow_parameters.is_empty());
}

#[test]
fn discovery_is_reproducible() {
    let json = include_str!("fixtures/linear_run.json");
    let first = parse::parse_and_build(json).unwrap();
    let second = RunModel::build(&parse::parse(json).unwrap());
    assert_eq!(first.workflow_parameters, second.workflow_parameters);
}

#[test]
fn colors_follow_config() {
    let config = RunFormConfig {
        hue_step: 45,
        saturation: 50,
        lightness: 40,
        ..Default::default()
    };
    let model = RunModel::build_with(
        &payload(vec![tool_step(
            0,
            "Cat",
            vec![text_input("a", "${x} ${y}")],
            vec![],
        )]),
        &config,
    );
    assert_eq!(model.workflow_parameters["x"].color, "hsl(45, 50%, 40%)");
    assert_eq!(model.workflow_parameters["y"].color, "hsl(90, 50%, 40%)");
}
