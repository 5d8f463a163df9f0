//! Dependency shapes
//!
//! An assistant never lists its dependencies explicitly. Each historical or
//! current schema pattern that embeds a dependency ID is described here as a
//! path of [`Step`]s from a top-level field down to the ID string. The
//! extractor and the rewriter walk the same table, so a shape added here is
//! picked up by both.

use crate::kind::ResourceKind;
use serde_json::{Map, Value};

/// One segment of a shape path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Descend into an object field
    Key(&'static str),
    /// Visit every element of an array
    Each,
    /// Continue only if the current object has `type == tag`
    Tagged(&'static str),
}

/// A schema pattern embedding a reference to another resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyShape {
    /// Kind of the referenced resource
    pub kind: ResourceKind,
    /// Human-readable path, for logs
    pub name: &'static str,
    /// Path from the assistant root; always starts with [`Step::Key`]
    pub steps: &'static [Step],
}

/// Every known shape, legacy and modern, in scan order
pub const SHAPES: &[DependencyShape] = &[
    DependencyShape {
        kind: ResourceKind::Tool,
        name: "model.tools[type=tool].toolId",
        steps: &[
            Step::Key("model"),
            Step::Key("tools"),
            Step::Each,
            Step::Tagged("tool"),
            Step::Key("toolId"),
        ],
    },
    DependencyShape {
        kind: ResourceKind::Tool,
        name: "model.toolIds[]",
        steps: &[Step::Key("model"), Step::Key("toolIds"), Step::Each],
    },
    DependencyShape {
        kind: ResourceKind::Tool,
        name: "hooks[].toolId",
        steps: &[Step::Key("hooks"), Step::Each, Step::Key("toolId")],
    },
    DependencyShape {
        kind: ResourceKind::Tool,
        name: "hooks[].do[type=tool].toolId",
        steps: &[
            Step::Key("hooks"),
            Step::Each,
            Step::Key("do"),
            Step::Each,
            Step::Tagged("tool"),
            Step::Key("toolId"),
        ],
    },
    DependencyShape {
        kind: ResourceKind::StructuredOutput,
        name: "analysisPlan.structuredDataPlan.structuredOutputId",
        steps: &[
            Step::Key("analysisPlan"),
            Step::Key("structuredDataPlan"),
            Step::Key("structuredOutputId"),
        ],
    },
    DependencyShape {
        kind: ResourceKind::StructuredOutput,
        name: "artifactPlan.structuredOutputId",
        steps: &[Step::Key("artifactPlan"), Step::Key("structuredOutputId")],
    },
    DependencyShape {
        kind: ResourceKind::StructuredOutput,
        name: "artifactPlan.structuredOutputIds[]",
        steps: &[
            Step::Key("artifactPlan"),
            Step::Key("structuredOutputIds"),
            Step::Each,
        ],
    },
];

/// Shapes referencing resources of `kind`
pub fn shapes_for(kind: ResourceKind) -> impl Iterator<Item = &'static DependencyShape> {
    SHAPES.iter().filter(move |shape| shape.kind == kind)
}

impl DependencyShape {
    /// Call `f` with every ID string this shape finds under `fields`
    pub(crate) fn for_each<'a, F>(&self, fields: &'a Map<String, Value>, mut f: F)
    where
        F: FnMut(&'a str),
    {
        if let Some((Step::Key(key), rest)) = self.steps.split_first() {
            if let Some(child) = fields.get(*key) {
                visit(child, rest, &mut f);
            }
        }
    }

    /// Call `f` with a mutable handle to every ID string under `fields`
    pub(crate) fn for_each_mut<F>(&self, fields: &mut Map<String, Value>, mut f: F)
    where
        F: FnMut(&mut String),
    {
        if let Some((Step::Key(key), rest)) = self.steps.split_first() {
            if let Some(child) = fields.get_mut(*key) {
                visit_mut(child, rest, &mut f);
            }
        }
    }
}

fn has_type(value: &Value, tag: &str) -> bool {
    value.get("type").and_then(Value::as_str) == Some(tag)
}

fn visit<'a, F>(value: &'a Value, steps: &[Step], f: &mut F)
where
    F: FnMut(&'a str),
{
    match steps.split_first() {
        None => {
            if let Some(id) = value.as_str() {
                f(id);
            }
        }
        Some((Step::Key(key), rest)) => {
            if let Some(child) = value.get(*key) {
                visit(child, rest, f);
            }
        }
        Some((Step::Each, rest)) => {
            if let Some(items) = value.as_array() {
                for item in items {
                    visit(item, rest, f);
                }
            }
        }
        Some((Step::Tagged(tag), rest)) => {
            if has_type(value, tag) {
                visit(value, rest, f);
            }
        }
    }
}

fn visit_mut<F>(value: &mut Value, steps: &[Step], f: &mut F)
where
    F: FnMut(&mut String),
{
    match steps.split_first() {
        None => {
            if let Value::String(id) = value {
                f(id);
            }
        }
        Some((Step::Key(key), rest)) => {
            if let Some(child) = value.get_mut(*key) {
                visit_mut(child, rest, f);
            }
        }
        Some((Step::Each, rest)) => {
            if let Some(items) = value.as_array_mut() {
                for item in items {
                    visit_mut(item, rest, f);
                }
            }
        }
        Some((Step::Tagged(tag), rest)) => {
            if has_type(value, tag) {
                visit_mut(value, rest, f);
            }
        }
    }
}
