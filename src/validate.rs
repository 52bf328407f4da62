//! Fail-closed validation of untrusted slide JSON.
//!
//! The validator walks a decoded `serde_json::Value` and builds the typed
//! `Slide` model. Rules:
//! - every element `type` must be in the element allowlist
//! - every key of a `style` map must be in the style allowlist
//! - `type == "svg"` selects the icon variant: `icon` is required and the
//!   generic children/style rules do not apply
//! - present fields must have the right JSON type; unknown keys are stripped
//! - `canvas` defaults to 1920x1080 when absent
//!
//! Any issue rejects the whole document. All issues are collected so the
//! caller can report them together.

use crate::error::{IssueKind, ValidationError, ValidationIssue};
use crate::sanitize::{SanitizedSlide, Sanitizer};
use crate::schema::{
    AnimationSpeed, Background, BackgroundKind, Canvas, DEFAULT_MAX_DEPTH, FieldPath, GenericElement, Props,
    SVG_TYPE, Slide, SlideElement, SlideMetadata, StyleMap, SvgIcon, is_element_type,
    is_style_key,
};

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone)]
pub struct Validator {
    max_depth: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate a decoded JSON value and build the typed slide.
    pub fn validate(&self, input: &Value) -> Result<Slide, ValidationError> {
        let mut checker = Checker {
            max_depth: self.max_depth,
            issues: Vec::new(),
        };
        let slide = checker.slide(input);

        match slide {
            Some(slide) if checker.issues.is_empty() => Ok(slide),
            _ => {
                if checker.issues.is_empty() {
                    // Every `None` above records an issue; keep the error non-empty regardless.
                    checker.push(FieldPath::document(), IssueKind::Missing);
                }
                Err(ValidationError::new(checker.issues))
            }
        }
    }

    /// Validate, then sanitize the validated document (defaults included).
    ///
    /// This is the load-time pipeline: an invalid slide is rejected outright,
    /// a valid one comes back in its minimal sanitized form.
    pub fn validate_and_sanitize(&self, input: &Value) -> crate::Result<SanitizedSlide> {
        let slide = self.validate(input)?;
        let normalized = serde_json::to_value(&slide)?;
        Ok(Sanitizer::new()
            .with_max_depth(self.max_depth)
            .sanitize_slide(&normalized))
    }
}

/// Validate with the default limits.
pub fn validate_slide(input: &Value) -> Result<Slide, ValidationError> {
    Validator::default().validate(input)
}

/// Validate and sanitize with the default limits.
pub fn validate_and_sanitize(input: &Value) -> crate::Result<SanitizedSlide> {
    Validator::default().validate_and_sanitize(input)
}

/// Walk state for a single validation call.
///
/// Field helpers return `None` both for an absent field and for a bad one;
/// the bad case is told apart by comparing the issue count before and after.
struct Checker {
    max_depth: usize,
    issues: Vec<ValidationIssue>,
}

impl Checker {
    fn push(&mut self, path: FieldPath, kind: IssueKind) {
        self.issues.push(ValidationIssue::new(path, kind));
    }

    fn wrong_type(&mut self, path: FieldPath, expected: &'static str, found: &Value) {
        self.push(
            path,
            IssueKind::WrongType {
                expected,
                found: json_type_name(found),
            },
        );
    }

    fn object<'a>(&mut self, value: &'a Value, path: &FieldPath) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.wrong_type(path.clone(), "object", other);
                None
            }
        }
    }

    fn opt_string(&mut self, obj: &Map<String, Value>, key: &str, path: &FieldPath) -> Option<String> {
        match obj.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.wrong_type(path.key(key), "string", other);
                None
            }
        }
    }

    fn req_string(&mut self, obj: &Map<String, Value>, key: &str, path: &FieldPath) -> Option<String> {
        if !obj.contains_key(key) {
            self.push(path.key(key), IssueKind::Missing);
            return None;
        }
        self.opt_string(obj, key, path)
    }

    fn opt_number(&mut self, obj: &Map<String, Value>, key: &str, path: &FieldPath) -> Option<Number> {
        match obj.get(key)? {
            Value::Number(n) => Some(n.clone()),
            other => {
                self.wrong_type(path.key(key), "number", other);
                None
            }
        }
    }

    fn opt_bool(&mut self, obj: &Map<String, Value>, key: &str, path: &FieldPath) -> Option<bool> {
        match obj.get(key)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.wrong_type(path.key(key), "boolean", other);
                None
            }
        }
    }

    fn opt_props(&mut self, obj: &Map<String, Value>, path: &FieldPath) -> Option<Props> {
        match obj.get("props")? {
            Value::Object(map) => Some(map.clone()),
            other => {
                self.wrong_type(path.key("props"), "object", other);
                None
            }
        }
    }

    fn opt_enum<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &FieldPath,
        allowed: &'static [&'static str],
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let value = self.opt_string(obj, key, path)?;
        match parse(&value) {
            Some(v) => Some(v),
            None => {
                self.push(path.key(key), IssueKind::NotInEnum { value, allowed });
                None
            }
        }
    }

    fn opt_string_list(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &FieldPath,
    ) -> Option<Vec<String>> {
        let items = match obj.get(key)? {
            Value::Array(items) => items,
            other => {
                self.wrong_type(path.key(key), "array", other);
                return None;
            }
        };

        let list_path = path.key(key);
        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => self.wrong_type(list_path.index(idx), "string", other),
            }
        }
        (out.len() == items.len()).then_some(out)
    }

    fn slide(&mut self, value: &Value) -> Option<Slide> {
        let path = FieldPath::document();
        let obj = self.object(value, &path)?;
        let before = self.issues.len();

        let id = self.req_string(obj, "id", &path);

        let canvas = match obj.get("canvas") {
            None => Some(Canvas::default()),
            Some(v) => self.canvas(v, &path.key("canvas")),
        };

        let root = match obj.get("root") {
            None => {
                self.push(path.key("root"), IssueKind::Missing);
                None
            }
            Some(v) => self.element(v, &path.key("root"), 0),
        };

        let metadata = match obj.get("metadata") {
            None => None,
            Some(v) => self.metadata(v, &path.key("metadata")),
        };

        if self.issues.len() > before {
            return None;
        }

        Some(Slide {
            id: id?,
            canvas: canvas?,
            root: root?,
            metadata,
        })
    }

    fn canvas(&mut self, value: &Value, path: &FieldPath) -> Option<Canvas> {
        let obj = self.object(value, path)?;
        let before = self.issues.len();
        let canvas = Canvas {
            width: self.opt_number(obj, "width", path),
            height: self.opt_number(obj, "height", path),
        };
        (self.issues.len() == before).then_some(canvas)
    }

    fn metadata(&mut self, value: &Value, path: &FieldPath) -> Option<SlideMetadata> {
        let obj = self.object(value, path)?;
        let before = self.issues.len();

        let title = self.opt_string(obj, "title", path);
        let notes = self.opt_string(obj, "notes", path);
        let background = match obj.get("background") {
            None => None,
            Some(v) => self.background(v, &path.key("background")),
        };

        (self.issues.len() == before).then_some(SlideMetadata {
            title,
            notes,
            background,
        })
    }

    fn background(&mut self, value: &Value, path: &FieldPath) -> Option<Background> {
        let obj = self.object(value, path)?;
        let before = self.issues.len();

        if !obj.contains_key("type") {
            self.push(path.key("type"), IssueKind::Missing);
        }
        let kind = self.opt_enum(obj, "type", path, BackgroundKind::NAMES, BackgroundKind::parse);
        let colors = self.opt_string_list(obj, "colors", path);
        let color = self.opt_string(obj, "color", path);
        let animation = self.opt_enum(obj, "animation", path, AnimationSpeed::NAMES, AnimationSpeed::parse);
        let count = self.opt_number(obj, "count", path);
        let speed = self.opt_enum(obj, "speed", path, AnimationSpeed::NAMES, AnimationSpeed::parse);

        if self.issues.len() > before {
            return None;
        }

        Some(Background {
            kind: kind?,
            colors,
            color,
            animation,
            count,
            speed,
        })
    }

    fn element(&mut self, value: &Value, path: &FieldPath, depth: usize) -> Option<SlideElement> {
        if depth > self.max_depth {
            self.push(path.clone(), IssueKind::TooDeep(self.max_depth));
            return None;
        }

        let obj = self.object(value, path)?;
        let element_type = self.req_string(obj, "type", path)?;

        // Discriminated on the tag: the icon variant has its own rules.
        if element_type == SVG_TYPE {
            return self.svg_icon(obj, path).map(SlideElement::Icon);
        }

        let before = self.issues.len();

        if !is_element_type(&element_type) {
            self.push(path.key("type"), IssueKind::InvalidElementType(element_type.clone()));
        }

        let mut el = GenericElement::new(element_type);
        el.id = self.opt_string(obj, "id", path);
        el.class_name = self.opt_string(obj, "className", path);
        el.text = self.opt_string(obj, "text", path);
        el.props = self.opt_props(obj, path);
        el.style = self.style(obj, path);
        el.role = self.opt_string(obj, "role", path);
        el.aria_level = self.opt_string(obj, "ariaLevel", path);
        el.fragment_index = self.opt_number(obj, "data-fragment-index", path);
        el.transition = self.opt_string(obj, "data-transition", path);
        el.streaming = self.opt_bool(obj, "_streaming", path);
        el.children = self.children(obj, path, depth);

        (self.issues.len() == before).then_some(SlideElement::Generic(el))
    }

    fn svg_icon(&mut self, obj: &Map<String, Value>, path: &FieldPath) -> Option<SvgIcon> {
        let before = self.issues.len();

        let icon = self.req_string(obj, "icon", path);
        let id = self.opt_string(obj, "id", path);
        let size = self.opt_number(obj, "size", path);
        let class_name = self.opt_string(obj, "className", path);
        let props = self.opt_props(obj, path);
        let streaming = self.opt_bool(obj, "_streaming", path);

        if self.issues.len() > before {
            return None;
        }

        Some(SvgIcon {
            id,
            icon: icon?,
            size,
            class_name,
            props,
            streaming,
        })
    }

    fn style(&mut self, obj: &Map<String, Value>, path: &FieldPath) -> Option<StyleMap> {
        let style_path = path.key("style");
        let style = match obj.get("style")? {
            Value::Object(map) => map,
            other => {
                self.wrong_type(style_path, "object", other);
                return None;
            }
        };

        let before = self.issues.len();
        for key in style.keys() {
            if !is_style_key(key) {
                self.push(style_path.key(key), IssueKind::InvalidStyleKey(key.clone()));
            }
        }
        (self.issues.len() == before).then(|| style.clone())
    }

    fn children(
        &mut self,
        obj: &Map<String, Value>,
        path: &FieldPath,
        depth: usize,
    ) -> Option<Vec<SlideElement>> {
        let children_path = path.key("children");
        let items = match obj.get("children")? {
            Value::Array(items) => items,
            other => {
                self.wrong_type(children_path, "array", other);
                return None;
            }
        };

        // Visit every child so all issues are reported, then keep order.
        let checked: Vec<Option<SlideElement>> = items
            .iter()
            .enumerate()
            .map(|(idx, child)| self.element(child, &children_path.index(idx), depth + 1))
            .collect();
        checked.into_iter().collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
