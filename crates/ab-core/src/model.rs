//! Persisted parameter model for an animator board.
//!
//! The board is stored by the host as a single params object holding two
//! ordered sequences: `elements` (whose order *is* the z-order, later =
//! painted on top) and `animations` (whose order is the playback order).
//! Everything the board does not interpret is preserved verbatim through
//! flattened `extra` maps so a load/save cycle never drops host data.

use crate::error::CoreError;
use crate::geometry::{DEFAULT_X, DEFAULT_Y, DEFAULT_SIZE_PERCENT, Geometry};
use crate::id::SubContentId;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ─── Board ───────────────────────────────────────────────────────────────

/// The complete persisted parameter tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardParams {
    #[serde(default)]
    pub elements: Vec<ElementParams>,

    #[serde(default)]
    pub animations: Vec<AnimationParams>,

    /// Raw aspect ratio as entered by the author (`"16/9"`, `"4:3"`, `2`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<RawAspectRatio>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BoardParams {
    /// Parse persisted params from the host's JSON.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let params: BoardParams = serde_json::from_str(json)?;
        Ok(params)
    }

    /// Build params from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        if !value.is_object() {
            return Err(CoreError::InvalidParams(
                "board params must be a JSON object".into(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Array position of the element with the given id.
    pub fn element_position(&self, id: SubContentId) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.content_type.sub_content_id == Some(id))
    }

    pub fn element(&self, id: SubContentId) -> Option<&ElementParams> {
        self.element_position(id).map(|pos| &self.elements[pos])
    }

    /// Whether any element carries the given id.
    pub fn has_element(&self, id: SubContentId) -> bool {
        self.element_position(id).is_some()
    }
}

/// Aspect ratio as stored: either a bare number or a `W/H` / `W:H` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAspectRatio {
    Number(f64),
    Text(String),
}

/// Background styling of the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// Params of the host's image widget (`{ "path": ..., "width": ... }`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<Value>,
}

impl Background {
    /// Content path of the background image, if one is set.
    pub fn image_path(&self) -> Option<&str> {
        self.background_image
            .as_ref()
            .and_then(|img| img.get("path"))
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Persisted params of one placed element. Geometry is percent of canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementParams {
    pub content_type: ContentType,

    #[serde(default = "default_x", deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(default = "default_y", deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(default = "default_size", deserialize_with = "lenient_f64")]
    pub width: f64,
    #[serde(default = "default_size", deserialize_with = "lenient_f64")]
    pub height: f64,

    #[serde(default)]
    pub hidden: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementParams {
    /// A new element of the given content type with default geometry.
    pub fn new(content_type: ContentType) -> Self {
        let g = Geometry::default();
        Self {
            content_type,
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
            hidden: false,
            extra: Map::new(),
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_geometry(&mut self, g: Geometry) {
        self.x = g.x;
        self.y = g.y;
        self.width = g.width;
        self.height = g.height;
    }

    pub fn sub_content_id(&self) -> Option<SubContentId> {
        self.content_type.sub_content_id
    }
}

/// The embedded widget payload. Opaque apart from library and title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// Library "uber name", e.g. `"H5P.Image 1.1"`.
    #[serde(default)]
    pub library: String,

    #[serde(default = "empty_object")]
    pub params: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_content_id: Option<SubContentId>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentType {
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            params: empty_object(),
            metadata: None,
            sub_content_id: None,
            extra: Map::new(),
        }
    }

    /// Library machine name without version (`"H5P.Image 1.1"` → `"H5P.Image"`).
    pub fn machine_name(&self) -> &str {
        self.library.split(' ').next().unwrap_or_default()
    }

    /// Short content-type name (`"H5P.AdvancedText"` → `"AdvancedText"`).
    pub fn type_name(&self) -> &str {
        self.machine_name().rsplit('.').next().unwrap_or_default()
    }

    /// Author-given title from the metadata, if any.
    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.title.as_deref())
    }

    /// `params.type` of the embedded widget (shape sub-type for shapes).
    pub fn variant(&self) -> Option<&str> {
        self.params.get("type").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─── Animations ──────────────────────────────────────────────────────────

/// Persisted params of one animation. Only the summary fields are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationParams {
    /// The element this animation targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_content_id: Option<SubContentId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_with: Option<String>,

    /// Duration in seconds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_f64"
    )]
    pub duration: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnimationParams {
    pub fn targeting(id: SubContentId) -> Self {
        Self {
            sub_content_id: Some(id),
            ..Default::default()
        }
    }
}

// ─── Serde helpers ───────────────────────────────────────────────────────

fn default_x() -> f64 {
    DEFAULT_X
}

fn default_y() -> f64 {
    DEFAULT_Y
}

fn default_size() -> f64 {
    DEFAULT_SIZE_PERCENT
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Accepts numbers and numeric strings. Anything else becomes NaN, which
/// the element model replaces with the default geometry.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(LenientF64)
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let v = deserializer.deserialize_any(LenientF64)?;
    Ok(v.is_finite().then_some(v))
}

struct LenientF64;

impl<'de> Visitor<'de> for LenientF64 {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        Ok(v.trim().parse().unwrap_or(f64::NAN))
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(f64::NAN)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<f64, E> {
        Ok(f64::NAN)
    }
}
