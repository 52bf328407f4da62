//! Fixed allowlists shared by the validator, the sanitizer and the registry.

/// Structural and text tags a slide may use. `svg` is the icon variant.
pub const HTML_ELEMENTS: &[&str] = &[
    "div", "section", "article", "aside", "header", "footer", "h1", "h2", "h3", "h4", "h5", "h6",
    "p", "span", "strong", "em", "ul", "ol", "li", "button", "a", "img", "code", "pre",
    "blockquote", "svg",
];

/// Chart components (Recharts names).
pub const CHART_COMPONENTS: &[&str] = &[
    "BarChart",
    "LineChart",
    "AreaChart",
    "PieChart",
    "RadarChart",
    "ResponsiveContainer",
    "XAxis",
    "YAxis",
    "CartesianGrid",
    "Tooltip",
    "Legend",
    "Bar",
    "Line",
    "Area",
    "Pie",
    "Radar",
    "PolarGrid",
    "PolarAngleAxis",
    "PolarRadiusAxis",
    "Cell",
];

/// Slide template components.
pub const TEMPLATE_COMPONENTS: &[&str] = &[
    "StatCard",
    "GlassCard",
    "IconBadge",
    "Timeline",
    "Comparison",
    "CodeBlock",
];

/// CSS-like property names permitted inside a `style` map.
pub const STYLE_KEYS: &[&str] = &[
    "position",
    "left",
    "top",
    "right",
    "bottom",
    "zIndex",
    "width",
    "height",
    "maxWidth",
    "maxHeight",
    "minWidth",
    "minHeight",
    "color",
    "background",
    "backgroundColor",
    "backgroundImage",
    "borderRadius",
    "boxShadow",
    "padding",
    "paddingLeft",
    "paddingRight",
    "paddingTop",
    "paddingBottom",
    "margin",
    "marginLeft",
    "marginRight",
    "marginTop",
    "marginBottom",
    "transform",
    "opacity",
    "backdropFilter",
];

/// Discriminator of the icon variant.
pub const SVG_TYPE: &str = "svg";

pub fn is_element_type(name: &str) -> bool {
    HTML_ELEMENTS.contains(&name)
        || CHART_COMPONENTS.contains(&name)
        || TEMPLATE_COMPONENTS.contains(&name)
}

pub fn is_style_key(key: &str) -> bool {
    STYLE_KEYS.contains(&key)
}
