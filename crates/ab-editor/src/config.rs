//! Board configuration supplied by the host once at construction.

use crate::dictionary::Dictionary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A content type the author may place on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOption {
    /// Library machine name, e.g. `"H5P.Image"`.
    #[serde(alias = "name")]
    pub machine_name: String,
    /// Library uber name, e.g. `"H5P.Image 1.1"`.
    pub uber_name: String,
    pub title: String,
    #[serde(default, alias = "isRestricted")]
    pub restricted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    /// Field schema of one element, passed verbatim to the form renderer.
    #[serde(default)]
    pub element_fields: Value,

    /// Field schema of one animation.
    #[serde(default)]
    pub animation_fields: Value,

    #[serde(default)]
    pub content_options: Vec<ContentOption>,

    #[serde(default)]
    pub dictionary: Dictionary,
}
