//! Input tree flattening.
//!
//! Nested names are joined with `|` the way connections address them:
//! `cond|param`, `section|param`, `repeat_0|param`.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use super::types::FormInput;
use crate::error::Diagnostic;
use crate::parse::types::{ConditionalInput, InputDef, InputNode};

/// Names visible from one nesting level: bare name → flattened name.
pub type Scope = HashMap<String, String>;

/// Call `callback` for every leaf of the tree with its flattened name and the
/// scope it was declared in.
///
/// Conditional test parameters are leaves too. Every case of a conditional is
/// visited, the active one first.
pub fn visit_inputs<'a, F>(inputs: &'a [InputNode], callback: &mut F)
where
    F: FnMut(&'a InputDef, &str, &Scope),
{
    visit_level(inputs, None, &Scope::new(), callback);
}

fn visit_level<'a, F>(inputs: &'a [InputNode], prefix: Option<&str>, parent: &Scope, callback: &mut F)
where
    F: FnMut(&'a InputDef, &str, &Scope),
{
    let mut scope = parent.clone();
    for node in inputs {
        if !node.name().is_empty() {
            scope.insert(node.name().to_string(), qualify(prefix, node.name()));
        }
    }

    for node in inputs {
        let name = qualify(prefix, node.name());
        match node {
            InputNode::Leaf(def) => callback(def, &name, &scope),
            InputNode::Conditional(cond) => {
                if let Some(test) = &cond.test_param {
                    callback(test, &format!("{}|{}", name, test.name), &scope);
                }
                for case in case_order(cond) {
                    visit_level(&cond.cases[case].inputs, Some(name.as_str()), &scope, callback);
                }
            }
            InputNode::Section(section) => {
                visit_level(&section.inputs, Some(name.as_str()), &scope, callback);
            }
            InputNode::Repeat(repeat) => {
                for (j, block) in repeat.cache.iter().enumerate() {
                    let instance = format!("{}_{}", name, j);
                    visit_level(block, Some(instance.as_str()), &scope, callback);
                }
            }
        }
    }
}

fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}|{}", prefix, name),
        None => name.to_string(),
    }
}

fn case_order(cond: &ConditionalInput) -> Vec<usize> {
    let active = cond.active_case();
    active
        .into_iter()
        .chain((0..cond.cases.len()).filter(|&i| Some(i) != active))
        .collect()
}

/// Flatten one step's input tree into enriched records keyed by name.
///
/// On a name collision the first visited definition is kept. `data_ref` is
/// resolved against the scope of the referencing input.
pub fn flatten_inputs(
    step: usize,
    inputs: &[InputNode],
    diagnostics: &mut Vec<Diagnostic>,
) -> IndexMap<String, FormInput> {
    let mut flat: IndexMap<String, FormInput> = IndexMap::new();

    visit_inputs(inputs, &mut |def, name, scope| {
        if def.name.is_empty() {
            return;
        }
        if flat.contains_key(name) {
            debug!(step, input = name, "keeping first definition of duplicate input");
            return;
        }

        let mut input = FormInput::new(def);
        if let Some(data_ref) = def.data_ref.as_deref().filter(|r| !r.is_empty()) {
            match scope.get(data_ref) {
                Some(target) => input.data_ref_target = Some(target.clone()),
                None => {
                    debug!(step, input = name, data_ref, "data_ref target not found");
                    diagnostics.push(Diagnostic {
                        code: "W003",
                        message: format!("Referenced input '{}' does not exist", data_ref),
                        step_index: Some(step),
                        input: Some(name.to_string()),
                    });
                }
            }
        }
        flat.insert(name.to_string(), input);
    });

    flat
}
