use crate::core::ElementKind;

/// Output bucket a declared prop is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBucket {
    /// Copied verbatim onto the element.
    Common,
    /// Nested under `shape`.
    Shape,
    /// Nested under `style`.
    Style,
}

/// Placement, visibility, transform and animation fields shared by every kind.
pub const COMMON_FIELDS: &[&str] = &[
    "name",
    "x",
    "y",
    "rotation",
    "scaleX",
    "scaleY",
    "originX",
    "originY",
    "skewX",
    "skewY",
    "left",
    "right",
    "top",
    "bottom",
    "width",
    "height",
    "bounding",
    "z",
    "zlevel",
    "z2",
    "silent",
    "invisible",
    "ignore",
    "cursor",
    "draggable",
    "progressive",
    "diffChildrenByName",
    "textContent",
    "textConfig",
    "transition",
    "enterFrom",
    "leaveTo",
    "enterAnimation",
    "updateAnimation",
    "leaveAnimation",
    "keyframeAnimation",
    "focus",
    "blurScope",
    "emphasis",
    "blur",
    "select",
];

/// Paint fields accepted by every non-group kind.
pub const PAINT_BASE_FIELDS: &[&str] = &[
    "fill",
    "stroke",
    "lineWidth",
    "lineDash",
    "lineDashOffset",
    "lineCap",
    "lineJoin",
    "miterLimit",
    "shadowBlur",
    "shadowOffsetX",
    "shadowOffsetY",
    "shadowColor",
    "opacity",
    "blend",
    "decal",
];

const RECT_SHAPE: &[&str] = &["x", "y", "width", "height", "r"];
const CIRCLE_SHAPE: &[&str] = &["cx", "cy", "r"];
const RING_SHAPE: &[&str] = &["cx", "cy", "r", "r0"];
const SECTOR_SHAPE: &[&str] = &[
    "cx",
    "cy",
    "r",
    "r0",
    "startAngle",
    "endAngle",
    "clockwise",
    "cornerRadius",
];
const ARC_SHAPE: &[&str] = &["cx", "cy", "r", "startAngle", "endAngle", "clockwise"];
const POLY_SHAPE: &[&str] = &["points", "smooth", "smoothConstraint"];
const LINE_SHAPE: &[&str] = &["x1", "y1", "x2", "y2", "percent"];
const BEZIER_SHAPE: &[&str] = &[
    "x1", "y1", "x2", "y2", "cpx1", "cpy1", "cpx2", "cpy2", "percent",
];

const TEXT_STYLE: &[&str] = &[
    "text",
    "x",
    "y",
    "font",
    "fontSize",
    "fontFamily",
    "fontStyle",
    "fontWeight",
    "align",
    "verticalAlign",
    "textAlign",
    "textVerticalAlign",
    "lineHeight",
    "width",
    "overflow",
    "ellipsis",
    "padding",
    "backgroundColor",
    "borderColor",
    "borderWidth",
    "borderRadius",
    "rich",
];
const IMAGE_STYLE: &[&str] = &["image", "x", "y", "width", "height"];

/// Geometry field names nested under `shape` for `kind`.
#[must_use]
pub fn geometry_fields(kind: ElementKind) -> &'static [&'static str] {
    match kind {
        ElementKind::Rect => RECT_SHAPE,
        ElementKind::Circle => CIRCLE_SHAPE,
        ElementKind::Ring => RING_SHAPE,
        ElementKind::Sector => SECTOR_SHAPE,
        ElementKind::Arc => ARC_SHAPE,
        ElementKind::Polygon | ElementKind::Polyline => POLY_SHAPE,
        ElementKind::Line => LINE_SHAPE,
        ElementKind::BezierCurve => BEZIER_SHAPE,
        ElementKind::Group | ElementKind::Image | ElementKind::Text => &[],
    }
}

/// Paint fields beyond `PAINT_BASE_FIELDS` for `kind`.
#[must_use]
pub fn extra_paint_fields(kind: ElementKind) -> &'static [&'static str] {
    match kind {
        ElementKind::Text => TEXT_STYLE,
        ElementKind::Image => IMAGE_STYLE,
        _ => &[],
    }
}

/// Routes a declared prop to its output bucket.
///
/// Geometry wins over paint and paint wins over common fields, so `x` on a
/// rect is a shape coordinate while `x` on a group is a translation.
/// Groups carry no paint. Returns `None` for props the kind does not accept.
#[must_use]
pub fn route_prop(kind: ElementKind, name: &str) -> Option<FieldBucket> {
    if geometry_fields(kind).contains(&name) {
        return Some(FieldBucket::Shape);
    }
    if !kind.is_group()
        && (extra_paint_fields(kind).contains(&name) || PAINT_BASE_FIELDS.contains(&name))
    {
        return Some(FieldBucket::Style);
    }
    if COMMON_FIELDS.contains(&name) {
        return Some(FieldBucket::Common);
    }
    None
}
