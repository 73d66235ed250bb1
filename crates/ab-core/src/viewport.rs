//! Canvas viewport: zoom table, scroll position and the pixel basis for
//! percent conversions.
//!
//! The host reports the size of the scrolling container; the canvas is
//! rendered `zoom × container width` wide and `width / aspect` high.

use crate::aspect::AspectRatio;
use crate::geometry::{FULL, Geometry};
use crate::model::Background;
use serde::{Deserialize, Serialize};

/// Available zoom factors, ascending.
pub const ZOOM_FACTORS: [f64; 11] = [1.0, 1.1, 1.33, 1.4, 1.5, 1.75, 2.0, 2.5, 3.0, 4.0, 5.0];

pub const ZOOM_LEVEL_MIN: usize = 0;
pub const ZOOM_LEVEL_MAX: usize = ZOOM_FACTORS.len() - 1;

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_usable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    container: Size,
    aspect_ratio: AspectRatio,
    zoom_index: usize,
    scroll: ScrollOffset,
    background_color: Option<String>,
    background_image_url: Option<String>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(AspectRatio::default())
    }
}

impl Viewport {
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self {
            container: Size::default(),
            aspect_ratio,
            zoom_index: ZOOM_LEVEL_MIN,
            scroll: ScrollOffset::default(),
            background_color: None,
            background_image_url: None,
        }
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    pub fn zoom_index(&self) -> usize {
        self.zoom_index
    }

    pub fn zoom_factor(&self) -> f64 {
        ZOOM_FACTORS[self.zoom_index]
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom_index < ZOOM_LEVEL_MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom_index > ZOOM_LEVEL_MIN
    }

    /// Snap to the nearest table factor. Returns the new level index, or
    /// `None` when `requested` lies outside the table or is not a number.
    pub fn set_zoom_factor(&mut self, requested: f64) -> Option<usize> {
        let min = ZOOM_FACTORS[ZOOM_LEVEL_MIN];
        let max = ZOOM_FACTORS[ZOOM_LEVEL_MAX];
        if !requested.is_finite() || requested < min || requested > max {
            return None;
        }

        let mut best = 0;
        let mut best_distance = (ZOOM_FACTORS[0] - requested).abs();
        for (i, factor) in ZOOM_FACTORS.iter().enumerate().skip(1) {
            let distance = (factor - requested).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }

        self.zoom_index = best;
        self.clamp_scroll();
        log::trace!("zoom level {best} ({}×)", self.zoom_factor());
        Some(best)
    }

    pub fn zoom_in(&mut self) -> Option<usize> {
        if !self.can_zoom_in() {
            return None;
        }
        self.set_zoom_factor(ZOOM_FACTORS[self.zoom_index + 1])
    }

    pub fn zoom_out(&mut self) -> Option<usize> {
        if !self.can_zoom_out() {
            return None;
        }
        self.set_zoom_factor(ZOOM_FACTORS[self.zoom_index - 1])
    }

    /// Zoom one step around the mouse position (container pixels), keeping
    /// the point under the cursor fixed. Negative `delta_y` zooms in.
    ///
    /// Returns the new level index if the level changed.
    pub fn wheel_zoom(&mut self, delta_y: f64, mouse_x: f64, mouse_y: f64) -> Option<usize> {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return None;
        }

        let changed = if delta_y < 0.0 {
            self.zoom_in()
        } else {
            self.zoom_out()
        };

        let factor = self.zoom_factor();
        self.scroll = ScrollOffset {
            left: mouse_x * factor - mouse_x,
            top: mouse_y * factor - mouse_y,
        };
        self.clamp_scroll();
        changed
    }

    // ─── Scroll ──────────────────────────────────────────────────────────

    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    /// Set the scroll offset as reported by the host, clamped to content.
    pub fn set_scroll(&mut self, left: f64, top: f64) {
        self.scroll = ScrollOffset { left, top };
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let content = self.size();
        let max_left = (content.width - self.container.width).max(0.0);
        let max_top = (content.height - self.container.height).max(0.0);
        let clamp = |v: f64, max: f64| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
        self.scroll.left = clamp(self.scroll.left, max_left);
        self.scroll.top = clamp(self.scroll.top, max_top);
    }

    // ─── Size ────────────────────────────────────────────────────────────

    pub fn container_size(&self) -> Size {
        self.container
    }

    /// Record the container's client size. Non-usable sizes are ignored.
    pub fn set_container_size(&mut self, width: f64, height: f64) -> bool {
        let size = Size::new(width, height);
        if !size.is_usable() {
            return false;
        }
        self.container = size;
        self.clamp_scroll();
        true
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.aspect_ratio = aspect_ratio;
        self.clamp_scroll();
    }

    /// Current rendered pixel size of the canvas.
    ///
    /// Computed on every call: zoom and container resizes change it.
    pub fn size(&self) -> Size {
        let width = self.container.width * self.zoom_factor();
        Size::new(width, width / self.aspect_ratio.value())
    }

    /// Convert a pixel offset relative to the canvas origin into percent.
    pub fn to_percent(&self, px_x: f64, px_y: f64) -> Option<(f64, f64)> {
        let size = self.size();
        if !size.is_usable() {
            return None;
        }
        Some((px_x * FULL / size.width, px_y * FULL / size.height))
    }

    /// Convert a pixel box relative to the canvas origin into percent geometry.
    pub fn rect_to_percent(&self, left: f64, top: f64, width: f64, height: f64) -> Option<Geometry> {
        let (x, y) = self.to_percent(left, top)?;
        let (w, h) = self.to_percent(width, height)?;
        Some(Geometry::new(x, y, w, h))
    }

    // ─── Background ──────────────────────────────────────────────────────

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn set_background_color(&mut self, color: Option<String>) {
        self.background_color = color.filter(|c| !c.is_empty());
    }

    pub fn background_image_url(&self) -> Option<&str> {
        self.background_image_url.as_deref()
    }

    /// `None` or an empty URL clears the image.
    pub fn set_background_image_url(&mut self, url: Option<String>) {
        self.background_image_url = url.filter(|u| !u.is_empty());
    }

    /// Apply persisted background params. `resolve_path` turns a content
    /// path into a URL.
    pub fn apply_background(&mut self, background: &Background, resolve_path: impl Fn(&str) -> String) {
        self.set_background_color(background.background_color.clone());
        self.set_background_image_url(background.image_path().map(resolve_path));
    }
}
