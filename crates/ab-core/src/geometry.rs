//! Percent-of-canvas geometry and its normalization.
//!
//! All element geometry is expressed as percentages of the canvas so it
//! survives zoom and container resizes unchanged. The fit-into-area pass
//! is a post-condition enforcer, not a layout solver: after it runs,
//! `0 ≤ x`, `0 ≤ y`, `x + width ≤ 100`, `y + height ≤ 100`.

use crate::model::ContentType;
use serde::{Deserialize, Serialize};

/// Full canvas extent in percent.
pub const FULL: f64 = 100.0;

/// Default element width and height in percent.
pub const DEFAULT_SIZE_PERCENT: f64 = 50.0;

const HORIZONTAL_CENTER: f64 = 50.0;
const VERTICAL_CENTER: f64 = 50.0;

/// Default x: horizontally centered.
pub const DEFAULT_X: f64 = HORIZONTAL_CENTER - DEFAULT_SIZE_PERCENT / 2.0;

/// Default y: slightly above center (half the default height is used as offset).
pub const DEFAULT_Y: f64 = VERTICAL_CENTER - DEFAULT_SIZE_PERCENT * 0.5 / 2.0;

/// Minimum size of line shapes in percent.
pub const MIN_SIZE_LINE: f64 = 3.0;

/// Minimum size of filled shapes in percent.
pub const MIN_SIZE_SHAPE: f64 = 10.0;

/// Fallback video aspect ratio when the media does not report one.
pub const DEFAULT_VIDEO_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Tolerance used when checking the bounds invariant.
pub const EPSILON: f64 = 1e-9;

/// Position and size of an element in percent of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: DEFAULT_X,
            y: DEFAULT_Y,
            width: DEFAULT_SIZE_PERCENT,
            height: DEFAULT_SIZE_PERCENT,
        }
    }
}

impl Geometry {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Replace non-finite components with their defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pick = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            x: pick(self.x, d.x),
            y: pick(self.y, d.y),
            width: pick(self.width, d.width),
            height: pick(self.height, d.height),
        }
    }

    /// Whether the bounds invariant holds (within `EPSILON`).
    pub fn is_within_bounds(&self) -> bool {
        self.x >= -EPSILON
            && self.y >= -EPSILON
            && self.x + self.width <= FULL + EPSILON
            && self.y + self.height <= FULL + EPSILON
    }

    /// Ensure the geometry fits into the canvas.
    ///
    /// 1. Oversized elements are scaled uniformly so the dominant dimension
    ///    (height on landscape boards, width otherwise) becomes 100. A
    ///    non-dominant dimension still above 100 is then capped at 100.
    /// 2. The element is right- and bottom-justified if it overflows.
    ///
    /// Scaling must run before positioning. The result is a fixed point:
    /// fitting it again changes nothing.
    #[must_use]
    pub fn fit_into_area(self, board_aspect_ratio: f64) -> Self {
        let mut g = self.sanitized();
        g.width = g.width.max(0.0);
        g.height = g.height.max(0.0);

        if g.width > FULL || g.height > FULL {
            let dominant = if board_aspect_ratio > 1.0 {
                g.height
            } else {
                g.width
            };
            if dominant > 0.0 {
                let scale = FULL / dominant;
                g.width *= scale;
                g.height *= scale;
            }
            g.width = g.width.min(FULL);
            g.height = g.height.min(FULL);
        }

        if g.x + g.width > FULL {
            g.x = FULL - g.width;
        }
        if g.y + g.height > FULL {
            g.y = FULL - g.height;
        }
        g.x = g.x.max(0.0);
        g.y = g.y.max(0.0);

        g
    }
}

/// Clamp a coordinate to `[0, 100]`. Non-finite input yields `None`.
pub fn clamp_percent(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, FULL))
}

// ─── Geometry policies ───────────────────────────────────────────────────

/// A resize axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// How an element may be resized, selected once from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryPolicy {
    /// Text and unknown content types.
    #[default]
    FreeResize,
    /// Filled, non-circular shapes: free resize with a size floor.
    FilledShape,
    /// Media keeps its aspect ratio while resizing.
    LockedAspect { corner_lock: bool },
    /// A line shape that can only be resized along one axis.
    AxisLockedLine(Axis),
    /// A circle: squared on entry and resized with a locked ratio.
    CircleLocked,
}

const MACHINE_IMAGE: &str = "H5P.Image";
const MACHINE_VIDEO: &str = "H5P.Video";
const MACHINE_SHAPE: &str = "H5P.Shape";

impl GeometryPolicy {
    pub fn for_content(content_type: &ContentType) -> Self {
        match content_type.machine_name() {
            MACHINE_IMAGE => GeometryPolicy::LockedAspect { corner_lock: true },
            MACHINE_VIDEO => GeometryPolicy::LockedAspect { corner_lock: false },
            MACHINE_SHAPE => match content_type.variant() {
                Some("vertical-line") => GeometryPolicy::AxisLockedLine(Axis::Vertical),
                Some("horizontal-line") => GeometryPolicy::AxisLockedLine(Axis::Horizontal),
                Some("circle") => GeometryPolicy::CircleLocked,
                _ => GeometryPolicy::FilledShape,
            },
            _ => GeometryPolicy::FreeResize,
        }
    }

    /// Options handed to the host's drag/resize library.
    pub fn resize_options(&self) -> ResizeOptions {
        match *self {
            GeometryPolicy::FreeResize => ResizeOptions::default(),
            GeometryPolicy::FilledShape => ResizeOptions {
                min_size: Some(MIN_SIZE_SHAPE),
                ..Default::default()
            },
            GeometryPolicy::LockedAspect { corner_lock } => ResizeOptions {
                lock_ratio: true,
                corner_lock,
                ..Default::default()
            },
            GeometryPolicy::AxisLockedLine(axis) => ResizeOptions {
                corner_lock: true,
                direction_lock: Some(axis),
                min_size: Some(MIN_SIZE_LINE),
                ..Default::default()
            },
            GeometryPolicy::CircleLocked => ResizeOptions {
                lock_ratio: true,
                min_size: Some(MIN_SIZE_SHAPE),
                ..Default::default()
            },
        }
    }

    /// Adjust geometry when an element's policy changes from `previous` to `self`.
    ///
    /// Leaving a line resets the dimension the line had locked; entering a
    /// circle squares the element in canvas pixels.
    #[must_use]
    pub fn transition_from(
        &self,
        previous: Option<GeometryPolicy>,
        geometry: Geometry,
        board_aspect_ratio: f64,
    ) -> Geometry {
        let mut g = geometry;
        match (previous, *self) {
            (Some(GeometryPolicy::AxisLockedLine(Axis::Vertical)), next)
                if next != GeometryPolicy::AxisLockedLine(Axis::Vertical) =>
            {
                g.width = DEFAULT_SIZE_PERCENT;
            }
            (Some(GeometryPolicy::AxisLockedLine(Axis::Horizontal)), next)
                if next != GeometryPolicy::AxisLockedLine(Axis::Horizontal) =>
            {
                g.height = DEFAULT_SIZE_PERCENT;
            }
            (prev, GeometryPolicy::CircleLocked) if prev != Some(GeometryPolicy::CircleLocked) => {
                g = square_in_canvas(g, board_aspect_ratio);
            }
            _ => {}
        }
        g
    }
}

/// Make width and height equal in canvas pixels, keeping the larger side.
fn square_in_canvas(g: Geometry, board_aspect_ratio: f64) -> Geometry {
    if board_aspect_ratio <= 0.0 || !board_aspect_ratio.is_finite() {
        return g;
    }
    let mut out = g;
    if g.width > g.height {
        out.height = g.width * board_aspect_ratio;
    } else {
        out.width = g.height / board_aspect_ratio;
    }
    out
}

/// Resize constraints for the host's drag/resize library.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOptions {
    pub disable_resize: bool,
    /// Keep the aspect ratio while resizing.
    pub lock_ratio: bool,
    /// Restrict resizing to corner handles.
    pub corner_lock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_lock: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
}

// ─── Natural media size ──────────────────────────────────────────────────

/// Intrinsic media information reported once a file has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MediaInfo {
    Image { width: f64, height: f64 },
    #[serde(rename_all = "camelCase")]
    Video {
        #[serde(default)]
        aspect_ratio: Option<f64>,
    },
}

impl MediaInfo {
    pub fn aspect_ratio(&self) -> Option<f64> {
        match *self {
            MediaInfo::Image { width, height } => {
                (width > 0.0 && height > 0.0).then(|| width / height)
            }
            MediaInfo::Video { aspect_ratio } => Some(
                aspect_ratio
                    .filter(|r| r.is_finite() && *r > 0.0)
                    .unwrap_or(DEFAULT_VIDEO_ASPECT_RATIO),
            ),
        }
    }
}

/// Size matching the media's natural ratio, keeping width for landscape
/// media and height for portrait media. Returns `(width, height)`.
pub fn natural_size(current: Geometry, media: MediaInfo, board_aspect_ratio: f64) -> Option<(f64, f64)> {
    let media_ratio = media.aspect_ratio()?;
    if media_ratio > 1.0 {
        let width = current.width;
        Some((width, width / media_ratio * board_aspect_ratio))
    } else {
        let height = current.height;
        Some((height * media_ratio / board_aspect_ratio, height))
    }
}
