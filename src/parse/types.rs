//! Rust types for the workflow run payload served by the workflow definition
//! service.
//!
//! Every field is read leniently: a fragment with an unexpected shape falls
//! back to its default instead of failing the whole payload.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// TOP-LEVEL PAYLOAD
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub workflow_id: Option<Value>,
    #[serde(default)]
    pub history_id: Option<Value>,
    #[serde(default)]
    pub workflow_resource_parameters: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_upgrade_messages: bool,
    #[serde(default)]
    pub step_version_changes: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub step_index: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    pub step_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub step_label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub step_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub annotation: Option<String>,
    #[serde(default, deserialize_with = "lenient_version")]
    pub step_version: Option<String>,
    #[serde(default, deserialize_with = "deserialize_inputs")]
    pub inputs: Vec<InputNode>,
    #[serde(default, deserialize_with = "lenient")]
    pub output_connections: Vec<OutputConnection>,
    #[serde(default, deserialize_with = "lenient")]
    pub replacement_parameters: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub messages: Vec<Value>,
}

/// Where one output of the owning step flows to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConnection {
    pub input_step_index: usize,
    pub input_name: String,
    #[serde(default)]
    pub output_name: String,
}

// =============================================================================
// INPUT TREE
// =============================================================================

/// One entry of a step's input tree.
#[derive(Debug, Clone, PartialEq)]
pub enum InputNode {
    Leaf(InputDef),
    Conditional(ConditionalInput),
    Section(SectionInput),
    Repeat(RepeatInput),
}

impl InputNode {
    pub fn name(&self) -> &str {
        match self {
            InputNode::Leaf(def) => &def.name,
            InputNode::Conditional(c) => &c.name,
            InputNode::Section(s) => &s.name,
            InputNode::Repeat(r) => &r.name,
        }
    }

    /// Classify a raw JSON input by its `type`; `fallback_name` fills a
    /// missing `name` (inputs given as an object keyed by name).
    pub fn from_value(value: &Value, fallback_name: Option<&str>) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .or(fallback_name)
            .unwrap_or_default()
            .to_string();

        match value.get("type").and_then(Value::as_str) {
            Some("conditional") => InputNode::Conditional(ConditionalInput {
                name,
                test_param: value
                    .get("test_param")
                    .filter(|v| v.is_object())
                    .map(|v| InputDef::from_value(v, None)),
                cases: value
                    .get("cases")
                    .and_then(Value::as_array)
                    .map(|cases| cases.iter().map(ConditionalCase::from_value).collect())
                    .unwrap_or_default(),
            }),
            Some("section") => InputNode::Section(SectionInput {
                name,
                inputs: value.get("inputs").map(input_list).unwrap_or_default(),
            }),
            Some("repeat") => InputNode::Repeat(RepeatInput {
                name,
                cache: value
                    .get("cache")
                    .and_then(Value::as_array)
                    .map(|blocks| blocks.iter().map(input_list).collect())
                    .unwrap_or_default(),
            }),
            _ => InputNode::Leaf(InputDef::from_value(value, Some(&name))),
        }
    }
}

/// A leaf input definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputDef {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub input_type: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub optional: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub multiple: bool,
    /// Static choices. Only list-shaped options count; other shapes read as `None`.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub data_ref: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Attributes this crate does not interpret, kept for the renderer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InputDef {
    pub fn from_value(value: &Value, fallback_name: Option<&str>) -> Self {
        let mut def: InputDef = serde_json::from_value(value.clone()).unwrap_or_default();
        if def.name.is_empty() {
            if let Some(name) = fallback_name {
                def.name = name.to_string();
            }
        }
        def
    }

    pub fn is_runtime_value(&self) -> bool {
        is_runtime_value(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalInput {
    pub name: String,
    pub test_param: Option<InputDef>,
    pub cases: Vec<ConditionalCase>,
}

impl ConditionalInput {
    /// Position of the case selected by the test parameter's current value.
    pub fn active_case(&self) -> Option<usize> {
        let test = self.test_param.as_ref()?;
        let selected = scalar_text(&test.value)?;
        self.cases
            .iter()
            .position(|case| scalar_text(&case.value).as_deref() == Some(selected.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalCase {
    pub value: Value,
    pub inputs: Vec<InputNode>,
}

impl ConditionalCase {
    fn from_value(value: &Value) -> Self {
        ConditionalCase {
            value: value.get("value").cloned().unwrap_or_default(),
            inputs: value.get("inputs").map(input_list).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionInput {
    pub name: String,
    pub inputs: Vec<InputNode>,
}

/// A repeat block; each entry of `cache` is one instance of the repeated inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatInput {
    pub name: String,
    pub cache: Vec<Vec<InputNode>>,
}

// =============================================================================
// HELPERS
// =============================================================================

pub fn is_data_input_type(input_type: &str) -> bool {
    matches!(input_type, "data" | "data_collection")
}

/// True for the `{"__class__": "RuntimeValue"}` sentinel (`class` is accepted too).
pub fn is_runtime_value(value: &Value) -> bool {
    let class = value
        .get("__class__")
        .or_else(|| value.get("class"))
        .and_then(Value::as_str);
    class == Some("RuntimeValue")
}

/// Read an input list given either as an array or as an object keyed by name.
pub fn input_list(value: &Value) -> Vec<InputNode> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .map(|item| InputNode::from_value(item, None))
            .collect(),
        Value::Object(entries) => entries
            .iter()
            .filter(|(_, item)| item.is_object())
            .map(|(key, item)| InputNode::from_value(item, Some(key)))
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Versions arrive as strings or bare numbers.
fn lenient_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).filter(|v| !v.is_empty()))
}

/// A step record that cannot be read keeps its slot, so positions stay stable.
fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<StepRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let steps = match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    };
    Ok(steps)
}

fn deserialize_inputs<'de, D>(deserializer: D) -> Result<Vec<InputNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(input_list(&value))
}
