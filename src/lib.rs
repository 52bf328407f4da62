//! Slide document checking.
//!
//! Slides arrive as untrusted JSON trees. Two separate operations handle them:
//! - `validate`: fail closed. Any unknown element type, unknown style key or
//!   malformed field anywhere rejects the whole slide, with every issue listed.
//! - `sanitize`: best effort. Copies only recognized fields and allowlisted
//!   style keys, silently dropping the rest. Never fails.
//!
//! Around them:
//! - `schema`: allowlists and the typed slide model
//! - `registry`: which element types a renderer can draw, and an audit walk
//! - `loader`: manifest-driven deck loading (validate, then sanitize)
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({ "id": "intro", "root": { "type": "h1", "text": "Hello" } });
//! let slide = slidecheck::validate_slide(&doc).unwrap();
//! assert_eq!(slide.canvas, slidecheck::schema::Canvas::default());
//!
//! let hostile = json!({ "id": "x", "root": { "type": "div", "style": { "onclick": "alert(1)" } } });
//! assert!(slidecheck::validate_slide(&hostile).is_err());
//! let clean = slidecheck::sanitize_slide(&hostile);
//! assert!(clean.root.unwrap().style.unwrap().is_empty());
//! ```

pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod registry;
pub mod sanitize;
pub mod schema;
pub mod validate;

pub type Result<T> = anyhow::Result<T>;

pub use error::{Allowlist, IssueKind, ValidationError, ValidationIssue};
pub use registry::{AuditReport, Capability, ComponentRegistry};
pub use sanitize::{SanitizedNode, SanitizedSlide, Sanitizer, sanitize_node, sanitize_slide};
pub use schema::{Slide, SlideElement};
pub use validate::{Validator, validate_and_sanitize, validate_slide};
