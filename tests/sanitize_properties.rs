//! Property-based checks of the sanitize / validate contracts.
//!
//! Properties:
//!
//! 1. **Idempotence**: sanitizing a sanitized slide changes nothing, for any
//!    slide-shaped input and any depth limit.
//!
//! 2. **No loss on valid input**: a slide the validator accepts comes back
//!    from the sanitizer unchanged, except for the falsy fields the
//!    sanitizer never copies (empty strings, `_streaming: false`). This also
//!    holds when the depth limit equals the depth of the tree.
//!
//! 3. **Order**: children keep their input order, in both modes. The
//!    sanitizer only skips entries that are not objects.

use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use proptest::sample::select;
use serde_json::{Map, Value, json};
use slidecheck::schema::{
    CHART_COMPONENTS, DEFAULT_MAX_DEPTH, HTML_ELEMENTS, STYLE_KEYS, SVG_TYPE, SlideElement,
    TEMPLATE_COMPONENTS,
};
use slidecheck::{SanitizedNode, Sanitizer, Validator};

/// Element string fields the sanitizer copies only when non-empty.
const NON_EMPTY_FIELDS: &[&str] = &[
    "className",
    "id",
    "text",
    "icon",
    "role",
    "ariaLevel",
    "data-transition",
];

// ═══════════════════════════════════════════════════════════════════════
// Strategies
// ═══════════════════════════════════════════════════════════════════════

/// Short lowercase strings, empty included.
fn text() -> impl Strategy<Value = String> {
    "[a-z]{0,6}"
}

/// Any scalar, used wherever a field may carry the wrong JSON type.
fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        text().prop_map(Value::from),
    ]
}

/// Non-svg types the validator accepts.
fn generic_types() -> Vec<&'static str> {
    HTML_ELEMENTS
        .iter()
        .chain(CHART_COMPONENTS)
        .chain(TEMPLATE_COMPONENTS)
        .copied()
        .filter(|name| *name != SVG_TYPE)
        .collect()
}

fn props() -> impl Strategy<Value = Value> {
    btree_map("[a-z]{1,5}", scalar(), 0..3)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

fn allowed_style() -> impl Strategy<Value = Value> {
    btree_map(select(STYLE_KEYS), "[a-z0-9]{1,4}", 0..4).prop_map(|map| {
        Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_string(), Value::from(value)))
                .collect(),
        )
    })
}

/// Style maps mixing allowed and unknown keys, or not an object at all.
fn any_style() -> impl Strategy<Value = Value> {
    let keys = STYLE_KEYS
        .iter()
        .take(6)
        .chain(&["onclick", "cursor", "behavior"])
        .copied()
        .collect::<Vec<_>>();
    prop_oneof![
        3 => btree_map(select(keys), scalar(), 0..4).prop_map(|map| {
            Value::Object(map.into_iter().map(|(key, value)| (key.to_string(), value)).collect())
        }),
        1 => scalar(),
    ]
}

/// `type` values: allowlisted, unknown, svg, or the wrong JSON type.
fn any_type() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => select(generic_types()).prop_map(Value::from),
        1 => select(vec![SVG_TYPE, "ScriptTag", "iframe", "marquee", ""]).prop_map(Value::from),
        1 => scalar(),
    ]
}

fn set(obj: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        obj.insert(key.to_string(), value);
    }
}

/// Node fields with no regard for the schema.
fn any_fields() -> impl Strategy<Value = Map<String, Value>> {
    (
        option::of(any_type()),
        option::of(scalar()),
        option::of(scalar()),
        option::of(scalar()),
        option::of(scalar()),
        option::of(scalar()),
        option::of(any_style()),
        option::of(prop_oneof![props(), scalar()]),
        option::of(scalar()),
        option::of(scalar()),
    )
        .prop_map(
            |(ty, class_name, text, icon, size, streaming, style, props, fragment, junk)| {
                let mut obj = Map::new();
                set(&mut obj, "type", ty);
                set(&mut obj, "className", class_name);
                set(&mut obj, "text", text);
                set(&mut obj, "icon", icon);
                set(&mut obj, "size", size);
                set(&mut obj, "_streaming", streaming);
                set(&mut obj, "style", style);
                set(&mut obj, "props", props);
                set(&mut obj, "data-fragment-index", fragment);
                set(&mut obj, "onclick", junk);
                obj
            },
        )
}

/// Slide-shaped trees: objects mostly, with stray scalars, non-array
/// `children` and nesting past small depth limits.
fn any_node() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        4 => any_fields().prop_map(Value::Object),
        1 => scalar(),
    ];
    leaf.prop_recursive(6, 64, 4, |inner| {
        let children = prop_oneof![
            4 => vec(inner, 0..4).prop_map(Value::Array),
            1 => scalar(),
        ];
        (any_fields(), option::of(children)).prop_map(|(mut obj, children)| {
            set(&mut obj, "children", children);
            Value::Object(obj)
        })
    })
}

fn any_slide() -> impl Strategy<Value = Value> {
    (
        option::of(scalar()),
        option::of(prop_oneof![
            (option::of(scalar()), option::of(scalar())).prop_map(|(w, h)| {
                let mut canvas = Map::new();
                set(&mut canvas, "width", w);
                set(&mut canvas, "height", h);
                Value::Object(canvas)
            }),
            scalar(),
        ]),
        any_node(),
        option::of(prop_oneof![
            Just(json!({ "title": "Deck", "background": { "type": "solid", "color": "#111" } })),
            Just(json!({ "notes": 3, "background": "mesh" })),
            scalar(),
        ]),
    )
        .prop_map(|(id, canvas, root, metadata)| {
            let mut slide = Map::new();
            set(&mut slide, "id", id);
            set(&mut slide, "canvas", canvas);
            slide.insert("root".into(), root);
            set(&mut slide, "metadata", metadata);
            slide.insert("theme".into(), json!("dark"));
            Value::Object(slide)
        })
}

fn valid_generic() -> impl Strategy<Value = Map<String, Value>> {
    (
        select(generic_types()),
        option::of(text()),
        option::of(text()),
        option::of(text()),
        option::of(text()),
        option::of(text()),
        option::of(text()),
        option::of(any::<bool>()),
        option::of(0u32..8),
        option::of(allowed_style()),
        option::of(props()),
    )
        .prop_map(
            |(ty, class_name, id, text, role, aria_level, transition, streaming, fragment, style, props)| {
                let mut obj = Map::new();
                obj.insert("type".into(), Value::from(ty));
                set(&mut obj, "className", class_name.map(Value::from));
                set(&mut obj, "id", id.map(Value::from));
                set(&mut obj, "text", text.map(Value::from));
                set(&mut obj, "role", role.map(Value::from));
                set(&mut obj, "ariaLevel", aria_level.map(Value::from));
                set(&mut obj, "data-transition", transition.map(Value::from));
                set(&mut obj, "_streaming", streaming.map(Value::from));
                set(&mut obj, "data-fragment-index", fragment.map(Value::from));
                set(&mut obj, "style", style);
                set(&mut obj, "props", props);
                obj
            },
        )
}

fn valid_icon() -> impl Strategy<Value = Value> {
    (
        text(),
        option::of(8u32..64),
        option::of(text()),
        option::of(text()),
        option::of(any::<bool>()),
    )
        .prop_map(|(icon, size, class_name, id, streaming)| {
            let mut obj = Map::new();
            obj.insert("type".into(), Value::from(SVG_TYPE));
            obj.insert("icon".into(), Value::from(icon));
            set(&mut obj, "size", size.map(Value::from));
            set(&mut obj, "className", class_name.map(Value::from));
            set(&mut obj, "id", id.map(Value::from));
            set(&mut obj, "_streaming", streaming.map(Value::from));
            Value::Object(obj)
        })
}

/// Trees that satisfy every validator rule.
fn valid_node() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        3 => valid_generic().prop_map(Value::Object),
        1 => valid_icon(),
    ];
    leaf.prop_recursive(5, 48, 4, |inner| {
        (valid_generic(), option::of(vec(inner, 0..4))).prop_map(|(mut obj, children)| {
            set(&mut obj, "children", children.map(Value::Array));
            Value::Object(obj)
        })
    })
}

fn valid_slide() -> impl Strategy<Value = Value> {
    (
        "[a-z]{1,8}",
        option::of((option::of(640u32..4096), option::of(480u32..2160))),
        valid_node(),
        option::of((option::of(text()), option::of(text()), any::<bool>())),
    )
        .prop_map(|(id, canvas, root, metadata)| {
            let mut slide = Map::new();
            slide.insert("id".into(), Value::from(id));
            if let Some((width, height)) = canvas {
                let mut obj = Map::new();
                set(&mut obj, "width", width.map(Value::from));
                set(&mut obj, "height", height.map(Value::from));
                slide.insert("canvas".into(), Value::Object(obj));
            }
            slide.insert("root".into(), root);
            if let Some((title, notes, with_background)) = metadata {
                let mut obj = Map::new();
                set(&mut obj, "title", title.map(Value::from));
                set(&mut obj, "notes", notes.map(Value::from));
                if with_background {
                    obj.insert(
                        "background".into(),
                        json!({ "type": "mesh", "colors": ["#0b1020", "#312e81"], "speed": "slow" }),
                    );
                }
                slide.insert("metadata".into(), Value::Object(obj));
            }
            Value::Object(slide)
        })
}

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

/// Drop the element fields the sanitizer leaves out when falsy.
fn strip_falsy_fields(node: &mut Value) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };
    for key in NON_EMPTY_FIELDS {
        if obj.get(*key) == Some(&json!("")) {
            obj.remove(*key);
        }
    }
    if obj.get("_streaming") == Some(&json!(false)) {
        obj.remove("_streaming");
    }
    if let Some(Value::Array(children)) = obj.get_mut("children") {
        children.iter_mut().for_each(strip_falsy_fields);
    }
}

/// Element levels below the root.
fn tree_depth(node: &Value) -> usize {
    node.get("children")
        .and_then(Value::as_array)
        .and_then(|children| children.iter().map(tree_depth).max().map(|d| d + 1))
        .unwrap_or(0)
}

fn input_children(node: &Value) -> Vec<&Value> {
    node.get("children")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|item| item.is_object()).collect())
        .unwrap_or_default()
}

fn type_of(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}

/// Sanitized children are the object children of the input, in order.
fn check_sanitized_order(input: &Value, out: &SanitizedNode) -> Result<(), TestCaseError> {
    let expected = input_children(input);
    prop_assert_eq!(
        expected.iter().map(|child| type_of(child)).collect::<Vec<_>>(),
        out.children()
            .iter()
            .map(|child| child.element_type.as_deref())
            .collect::<Vec<_>>()
    );
    for (child_in, child_out) in expected.iter().zip(out.children()) {
        check_sanitized_order(child_in, child_out)?;
    }
    Ok(())
}

/// Validated children match the input children one for one, in order.
fn check_validated_order(input: &Value, out: &SlideElement) -> Result<(), TestCaseError> {
    let expected = input_children(input);
    prop_assert_eq!(
        expected.iter().map(|child| type_of(child)).collect::<Vec<_>>(),
        out.children()
            .iter()
            .map(|child| Some(child.element_type()))
            .collect::<Vec<_>>()
    );
    for (child_in, child_out) in expected.iter().zip(out.children()) {
        check_validated_order(child_in, child_out)?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sanitizing_twice_changes_nothing(doc in any_slide(), max_depth in 0usize..8) {
        for sanitizer in [Sanitizer::new(), Sanitizer::new().with_max_depth(max_depth)] {
            let once = sanitizer.sanitize_slide(&doc);
            let twice = sanitizer.sanitize_slide(&serde_json::to_value(&once).unwrap());
            prop_assert_eq!(twice, once);
        }
    }

    #[test]
    fn sanitized_children_keep_input_order(root in any_node()) {
        if let Some(out) = Sanitizer::new().sanitize_node(&root) {
            check_sanitized_order(&root, &out)?;
        }
    }

    #[test]
    fn valid_slides_sanitize_without_loss(doc in valid_slide()) {
        let slide = Validator::new()
            .validate(&doc)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        check_validated_order(&doc["root"], &slide.root)?;

        let mut validated = serde_json::to_value(&slide).unwrap();
        let sanitized = Sanitizer::new().sanitize_slide(&validated);
        let sanitized_root = sanitized.root.clone().unwrap();
        check_sanitized_order(&validated["root"], &sanitized_root)?;

        strip_falsy_fields(&mut validated["root"]);
        prop_assert_eq!(serde_json::to_value(&sanitized).unwrap(), validated);
    }

    #[test]
    fn valid_slides_survive_a_tight_depth_limit(doc in valid_slide()) {
        let max_depth = tree_depth(&doc["root"]);
        prop_assert!(max_depth < DEFAULT_MAX_DEPTH);

        let validator = Validator::new().with_max_depth(max_depth);
        let clean = validator
            .validate_and_sanitize(&doc)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let mut expected = serde_json::to_value(validator.validate(&doc).unwrap()).unwrap();
        strip_falsy_fields(&mut expected["root"]);
        prop_assert_eq!(serde_json::to_value(&clean).unwrap(), expected);

        if max_depth > 0 {
            let too_tight = Validator::new().with_max_depth(max_depth - 1);
            prop_assert!(too_tight.validate(&doc).is_err());
        }
    }
}
