pub mod aspect;
pub mod error;
pub mod geometry;
pub mod id;
pub mod lint;
pub mod model;
pub mod viewport;

pub use aspect::AspectRatio;
pub use error::CoreError;
pub use geometry::{Axis, Geometry, GeometryPolicy, MediaInfo, ResizeOptions};
pub use id::{AnimationId, SubContentId};
pub use lint::{LintDiagnostic, LintSeverity, LintTarget, lint_params, prune_orphaned_animations};
pub use model::*;
pub use viewport::{ScrollOffset, Size, Viewport, ZOOM_FACTORS};
