//! Renderer capability registry.
//!
//! A renderer only draws element types it knows: plain HTML tags, chart
//! components, slide templates, and icons. The registry is passed in
//! explicitly (no process-wide lookup table), and `audit` reports every
//! node of a sanitized slide the renderer would drop, with its path.

use crate::Result;
use crate::sanitize::{SanitizedNode, SanitizedSlide};
use crate::schema::{CHART_COMPONENTS, FieldPath, HTML_ELEMENTS, SVG_TYPE, TEMPLATE_COMPONENTS};

use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Html,
    Chart,
    Template,
    Icon,
}

/// Why a node would not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Blocked {
    #[error("slide has no root element")]
    NoRoot,

    #[error("element has no type")]
    MissingType,

    #[error("blocked or unknown element type {0:?}")]
    UnknownType(String),

    #[error("icon {0:?} is not registered")]
    UnknownIcon(String),
}

/// Registry file shape. Omitted lists fall back to the built-in ones; an
/// omitted `icons` list accepts any icon name.
///
/// {
///   "charts": ["BarChart", "Bar"],
///   "templates": ["StatCard"],
///   "icons": ["Home", "Rocket"]
/// }
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub charts: Option<Vec<String>>,
    pub templates: Option<Vec<String>>,
    pub icons: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    html_tag: Regex,
    charts: BTreeSet<String>,
    templates: BTreeSet<String>,
    icons: Option<BTreeSet<String>>,
}

/// Anchored alternation over the HTML allowlist: tags rendered as plain elements.
fn html_tag_pattern() -> String {
    let alternatives = HTML_ELEMENTS
        .iter()
        .map(|tag| regex::escape(tag))
        .collect::<Vec<_>>()
        .join("|");
    format!("^({})$", alternatives)
}

impl ComponentRegistry {
    pub fn from_config(config: RegistryConfig) -> Result<Self> {
        let builtin = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();

        Ok(Self {
            html_tag: Regex::new(&html_tag_pattern())?,
            charts: config
                .charts
                .map(|v| v.into_iter().collect())
                .unwrap_or_else(|| builtin(CHART_COMPONENTS)),
            templates: config
                .templates
                .map(|v| v.into_iter().collect())
                .unwrap_or_else(|| builtin(TEMPLATE_COMPONENTS)),
            icons: config.icons.map(|v| v.into_iter().collect()),
        })
    }

    /// Built-in charts and templates, any icon name.
    pub fn builtin() -> Result<Self> {
        Self::from_config(RegistryConfig::default())
    }

    /// Read a registry file (JSON, see `RegistryConfig`).
    pub fn load(path: &str) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read registry file {}", path))?;
        let config: RegistryConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse registry file {}", path))?;
        Self::from_config(config)
    }

    pub fn with_icons<I, S>(mut self, icons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.icons = Some(icons.into_iter().map(Into::into).collect());
        self
    }

    pub fn has_icon(&self, name: &str) -> bool {
        match &self.icons {
            Some(icons) => icons.contains(name),
            None => true,
        }
    }

    /// Decide how a node would be rendered.
    pub fn resolve(&self, node: &SanitizedNode) -> std::result::Result<Capability, Blocked> {
        let element_type = node.element_type.as_deref().ok_or(Blocked::MissingType)?;

        if element_type == SVG_TYPE {
            if let Some(icon) = node.icon.as_deref() {
                return if self.has_icon(icon) {
                    Ok(Capability::Icon)
                } else {
                    Err(Blocked::UnknownIcon(icon.to_string()))
                };
            }
        }

        if self.charts.contains(element_type) {
            Ok(Capability::Chart)
        } else if self.templates.contains(element_type) {
            Ok(Capability::Template)
        } else if self.html_tag.is_match(element_type) {
            Ok(Capability::Html)
        } else {
            Err(Blocked::UnknownType(element_type.to_string()))
        }
    }

    /// Walk a sanitized slide the way a renderer would.
    ///
    /// Only plain HTML elements render their children; charts, templates and
    /// icons take their content from `props`, so their children are not visited.
    pub fn audit(&self, slide: &SanitizedSlide) -> AuditReport {
        let mut report = AuditReport::default();
        let root_path = FieldPath::document().key("root");

        match &slide.root {
            None => report.blocked.push(BlockedElement {
                path: root_path.to_string(),
                reason: Blocked::NoRoot.to_string(),
            }),
            Some(root) => self.audit_node(root, &root_path, &mut report),
        }

        report
    }

    fn audit_node(&self, node: &SanitizedNode, path: &FieldPath, report: &mut AuditReport) {
        match self.resolve(node) {
            Ok(Capability::Html) => {
                report.rendered += 1;
                let children_path = path.key("children");
                for (idx, child) in node.children().iter().enumerate() {
                    self.audit_node(child, &children_path.index(idx), report);
                }
            }
            Ok(_) => report.rendered += 1,
            Err(blocked) => report.blocked.push(BlockedElement {
                path: path.to_string(),
                reason: blocked.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    /// Elements the renderer would draw.
    pub rendered: usize,
    /// Elements it would drop (their subtrees are not counted).
    pub blocked: Vec<BlockedElement>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.blocked.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedElement {
    pub path: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::{sanitize_node, sanitize_slide};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SanitizedNode {
        sanitize_node(&value).unwrap()
    }

    #[test]
    fn resolves_each_capability() {
        let registry = ComponentRegistry::builtin().unwrap();
        assert_eq!(registry.resolve(&node(json!({ "type": "h3" }))), Ok(Capability::Html));
        assert_eq!(registry.resolve(&node(json!({ "type": "PieChart" }))), Ok(Capability::Chart));
        assert_eq!(registry.resolve(&node(json!({ "type": "StatCard" }))), Ok(Capability::Template));
        assert_eq!(
            registry.resolve(&node(json!({ "type": "svg", "icon": "Anything" }))),
            Ok(Capability::Icon)
        );
        // Bare svg without an icon is an ordinary tag.
        assert_eq!(registry.resolve(&node(json!({ "type": "svg" }))), Ok(Capability::Html));
    }

    #[test]
    fn blocks_unknown_types() {
        let registry = ComponentRegistry::builtin().unwrap();
        assert_eq!(
            registry.resolve(&node(json!({ "type": "script" }))),
            Err(Blocked::UnknownType("script".into()))
        );
        assert_eq!(
            registry.resolve(&node(json!({ "type": "h7" }))),
            Err(Blocked::UnknownType("h7".into()))
        );
        assert_eq!(registry.resolve(&node(json!({ "text": "x" }))), Err(Blocked::MissingType));
    }

    #[test]
    fn html_gate_matches_the_element_allowlist() {
        let registry = ComponentRegistry::builtin().unwrap();
        for tag in HTML_ELEMENTS {
            assert_eq!(
                registry.resolve(&node(json!({ "type": tag }))),
                Ok(Capability::Html),
                "{tag}"
            );
        }
        for tag in ["h7", "H1", "divx", "xdiv", "p|span", "script", "iframe", ""] {
            assert_eq!(
                registry.resolve(&node(json!({ "type": tag }))),
                Err(Blocked::UnknownType(tag.into())),
                "{tag}"
            );
        }
    }

    #[test]
    fn configured_icon_set_is_enforced() {
        let registry = ComponentRegistry::builtin().unwrap().with_icons(["Home"]);
        assert_eq!(
            registry.resolve(&node(json!({ "type": "svg", "icon": "Home" }))),
            Ok(Capability::Icon)
        );
        assert_eq!(
            registry.resolve(&node(json!({ "type": "svg", "icon": "Skull" }))),
            Err(Blocked::UnknownIcon("Skull".into()))
        );
    }

    #[test]
    fn config_overrides_builtin_lists() {
        let config: RegistryConfig =
            serde_json::from_value(json!({ "charts": ["Sparkline"], "icons": [] })).unwrap();
        let registry = ComponentRegistry::from_config(config).unwrap();
        assert_eq!(
            registry.resolve(&node(json!({ "type": "Sparkline" }))),
            Ok(Capability::Chart)
        );
        assert!(registry.resolve(&node(json!({ "type": "BarChart" }))).is_err());
        assert_eq!(
            registry.resolve(&node(json!({ "type": "GlassCard" }))),
            Ok(Capability::Template)
        );
        assert!(!registry.has_icon("Home"));
    }

    #[test]
    fn config_rejects_unknown_fields() {
        let parsed = serde_json::from_value::<RegistryConfig>(json!({ "widgets": [] }));
        assert!(parsed.is_err());
    }

    #[test]
    fn audit_reports_paths_of_dropped_elements() {
        let registry = ComponentRegistry::builtin().unwrap().with_icons(["Home"]);
        let slide = sanitize_slide(&json!({
            "id": "s",
            "root": {
                "type": "div",
                "children": [
                    { "type": "h1", "text": "Hi" },
                    { "type": "marquee", "children": [ { "type": "p" } ] },
                    { "type": "section", "children": [ { "type": "svg", "icon": "Ghost" } ] },
                    { "type": "BarChart", "children": [ { "type": "blink" } ] }
                ]
            }
        }));
        let report = registry.audit(&slide);
        assert_eq!(report.rendered, 4);
        assert_eq!(
            report.blocked,
            vec![
                BlockedElement {
                    path: "root.children[1]".into(),
                    reason: "blocked or unknown element type \"marquee\"".into(),
                },
                BlockedElement {
                    path: "root.children[2].children[0]".into(),
                    reason: "icon \"Ghost\" is not registered".into(),
                },
            ]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn audit_flags_missing_root() {
        let registry = ComponentRegistry::builtin().unwrap();
        let report = registry.audit(&sanitize_slide(&json!({ "id": "s" })));
        assert_eq!(report.rendered, 0);
        assert_eq!(report.blocked[0].reason, "slide has no root element");
    }
}
