//! Best-effort sanitization of slide-shaped JSON.
//!
//! Unlike the validator this never fails. It copies the recognized fields of
//! every node, filters `style` down to the style allowlist, and drops
//! whatever it does not recognize. Fields with the wrong JSON type are
//! treated as absent. That includes `type`: it is copied whenever it is a
//! string (empty or not allowlisted alike), and a non-string `type` leaves
//! the node untyped. The input is only borrowed; the returned tree is
//! freshly allocated.
//!
//! Sanitizing an already-sanitized tree yields the same tree.

use crate::schema::{Canvas, DEFAULT_MAX_DEPTH, Props, StyleMap, is_style_key};

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SanitizedSlide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<SanitizedNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SanitizedMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SanitizedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Map<String, Value>>,
}

/// A node with only recognized fields. No variant split here: the sanitizer
/// copies `icon`/`size` from any node that carries them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_level: Option<String>,
    #[serde(rename = "data-fragment-index", skip_serializing_if = "Option::is_none")]
    pub fragment_index: Option<Number>,
    #[serde(rename = "data-transition", skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SanitizedNode>>,
    #[serde(rename = "_streaming", skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
}

impl SanitizedNode {
    pub fn children(&self) -> &[SanitizedNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Sanitizer {
    max_depth: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes deeper than this are dropped instead of visited.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn sanitize_slide(&self, input: &Value) -> SanitizedSlide {
        let Some(obj) = input.as_object() else {
            debug!("slide is not an object; sanitized to empty");
            return SanitizedSlide::default();
        };

        SanitizedSlide {
            id: obj.get("id").and_then(Value::as_str).map(str::to_string),
            canvas: obj.get("canvas").and_then(Value::as_object).map(|c| Canvas {
                width: number_field(c, "width"),
                height: number_field(c, "height"),
            }),
            root: obj.get("root").and_then(|root| self.node(root, 0)),
            metadata: obj
                .get("metadata")
                .and_then(Value::as_object)
                .map(sanitize_metadata),
        }
    }

    /// Sanitize one node and its subtree. `None` when the value is not an object.
    pub fn sanitize_node(&self, input: &Value) -> Option<SanitizedNode> {
        self.node(input, 0)
    }

    fn node(&self, value: &Value, depth: usize) -> Option<SanitizedNode> {
        let obj = value.as_object()?;

        let style = obj.get("style").and_then(Value::as_object).map(|style| {
            style
                .iter()
                .filter(|(key, _)| is_style_key(key))
                .map(|(key, v)| (key.clone(), v.clone()))
                .collect::<StyleMap>()
        });

        // At the limit the list is kept but emptied.
        let children = obj.get("children").and_then(Value::as_array).map(|items| {
            if depth >= self.max_depth {
                if !items.is_empty() {
                    debug!(depth, dropped = items.len(), "children beyond depth limit dropped");
                }
                return Vec::new();
            }
            items
                .iter()
                .filter_map(|child| self.node(child, depth + 1))
                .collect::<Vec<_>>()
        });

        Some(SanitizedNode {
            element_type: obj.get("type").and_then(Value::as_str).map(str::to_string),
            class_name: non_empty_string(obj, "className"),
            id: non_empty_string(obj, "id"),
            text: non_empty_string(obj, "text"),
            props: obj.get("props").and_then(Value::as_object).cloned(),
            icon: non_empty_string(obj, "icon"),
            size: number_field(obj, "size"),
            role: non_empty_string(obj, "role"),
            aria_level: non_empty_string(obj, "ariaLevel"),
            fragment_index: number_field(obj, "data-fragment-index"),
            transition: non_empty_string(obj, "data-transition"),
            style,
            children,
            streaming: obj
                .get("_streaming")
                .and_then(Value::as_bool)
                .filter(|streaming| *streaming),
        })
    }
}

/// Sanitize with the default depth limit.
pub fn sanitize_slide(input: &Value) -> SanitizedSlide {
    Sanitizer::default().sanitize_slide(input)
}

/// Sanitize a single node with the default depth limit.
pub fn sanitize_node(input: &Value) -> Option<SanitizedNode> {
    Sanitizer::default().sanitize_node(input)
}

fn sanitize_metadata(meta: &Map<String, Value>) -> SanitizedMetadata {
    SanitizedMetadata {
        title: meta.get("title").and_then(Value::as_str).map(str::to_string),
        notes: meta.get("notes").and_then(Value::as_str).map(str::to_string),
        background: meta.get("background").and_then(Value::as_object).cloned(),
    }
}

fn non_empty_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<Number> {
    match obj.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}
