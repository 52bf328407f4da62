//! Typed slide model produced by the validator.
//!
//! JSON shape:
//! {
//!   "id": "intro",
//!   "canvas": { "width": 1920, "height": 1080 },   // optional, defaulted
//!   "root": {
//!     "type": "div",
//!     "className": "grid",
//!     "style": { "padding": "48px" },
//!     "children": [
//!       { "type": "h1", "text": "Hello" },
//!       { "type": "svg", "icon": "Home", "size": 32 }
//!     ]
//!   },
//!   "metadata": { "title": "Intro", "background": { "type": "mesh" } }
//! }
//!
//! Only serialization is derived: the validator builds these values by hand
//! so it can report every issue with its path.

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Open key-value map for trusted component props.
pub type Props = Map<String, Value>;

/// `style` map; keys are checked against the style allowlist.
pub type StyleMap = Map<String, Value>;

pub const DEFAULT_CANVAS_WIDTH: u32 = 1920;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1080;

/// Element nesting limit applied when none is configured. The root element
/// is depth 0.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub id: String,
    pub canvas: Canvas,
    pub root: SlideElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SlideMetadata>,
}

/// Canvas size. Both fields are optional once a canvas object is given;
/// the 1920x1080 default only applies when the slide omits `canvas`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canvas {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: Some(Number::from(DEFAULT_CANVAS_WIDTH)),
            height: Some(Number::from(DEFAULT_CANVAS_HEIGHT)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlideMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationSpeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<AnimationSpeed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundKind {
    Mesh,
    Particles,
    MeshParticles,
    Gradient,
    Solid,
}

impl BackgroundKind {
    pub const NAMES: &'static [&'static str] =
        &["mesh", "particles", "mesh-particles", "gradient", "solid"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "mesh" => Some(Self::Mesh),
            "particles" => Some(Self::Particles),
            "mesh-particles" => Some(Self::MeshParticles),
            "gradient" => Some(Self::Gradient),
            "solid" => Some(Self::Solid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    #[serde(rename = "none")]
    Still,
    Slow,
    Medium,
    Fast,
}

impl AnimationSpeed {
    pub const NAMES: &'static [&'static str] = &["none", "slow", "medium", "fast"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::Still),
            "slow" => Some(Self::Slow),
            "medium" => Some(Self::Medium),
            "fast" => Some(Self::Fast),
            _ => None,
        }
    }
}

/// One node of the render tree: either an icon or a generic element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlideElement {
    Icon(SvgIcon),
    Generic(GenericElement),
}

impl SlideElement {
    pub fn element_type(&self) -> &str {
        match self {
            SlideElement::Icon(_) => crate::schema::SVG_TYPE,
            SlideElement::Generic(el) => &el.element_type,
        }
    }

    /// Children in presentation order. Icons never have children.
    pub fn children(&self) -> &[SlideElement] {
        match self {
            SlideElement::Icon(_) => &[],
            SlideElement::Generic(el) => el.children.as_deref().unwrap_or_default(),
        }
    }
}

/// `{ "type": "svg", "icon": ... }`. The tag is emitted by serde.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "svg", rename_all = "camelCase")]
pub struct SvgIcon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(rename = "_streaming", skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericElement {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SlideElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_level: Option<String>,
    #[serde(rename = "data-fragment-index", skip_serializing_if = "Option::is_none")]
    pub fragment_index: Option<Number>,
    #[serde(rename = "data-transition", skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    #[serde(rename = "_streaming", skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
}

impl GenericElement {
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            id: None,
            class_name: None,
            text: None,
            props: None,
            children: None,
            style: None,
            role: None,
            aria_level: None,
            fragment_index: None,
            transition: None,
            streaming: None,
        }
    }
}
