//! Schema layer: allowlists + the typed slide model.
//!
//! This module is intentionally free of behavior. It owns:
//! - allowlists (element types, style keys)
//! - FieldPath (location of a value inside a document)
//! - the recursive element model the validator produces

pub mod allowlist;
pub mod element;
pub mod path;

pub use allowlist::{
    CHART_COMPONENTS, HTML_ELEMENTS, STYLE_KEYS, SVG_TYPE, TEMPLATE_COMPONENTS, is_element_type,
    is_style_key,
};
pub use element::{
    AnimationSpeed, Background, BackgroundKind, Canvas, DEFAULT_MAX_DEPTH, GenericElement, Props, Slide,
    SlideElement, SlideMetadata, StyleMap, SvgIcon,
};
pub use path::{FieldPath, Segment};
