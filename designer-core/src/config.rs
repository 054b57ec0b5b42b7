//! Editor configuration.
//!
//! Every field has a default, so a host can deserialize a partial JSON
//! object (or nothing at all) and override only what it needs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::EditorResult;

/// How references to unknown element ids are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// Return [`crate::EditorError::ElementNotFound`].
    #[default]
    Strict,
    /// Treat the operation as a silent no-op.
    Lenient,
}

/// Which candidate wins when several elements are within guide tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideMode {
    /// The last match in document order.
    #[default]
    LastMatch,
    /// The match with the smallest distance; ties go to the later element.
    Closest,
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum undo frames kept.
    pub history_limit: usize,
    /// Guide tolerance in document units.
    pub snap_tolerance: f32,
    /// Guide candidate selection.
    pub guide_mode: GuideMode,
    /// Lower bound of the user zoom.
    pub min_user_zoom: f32,
    /// Upper bound of the user zoom.
    pub max_user_zoom: f32,
    /// Zoom in/out step.
    pub zoom_step: f32,
    /// Screen padding kept around the canvas when fitting it to the viewport.
    pub fit_margin: f32,
    /// Arrow-key move distance.
    pub nudge_step: f32,
    /// Arrow-key move distance with shift held.
    pub nudge_step_large: f32,
    /// Rotation shortcut step in degrees.
    pub rotate_step: f32,
    /// Offset applied to duplicated elements.
    pub duplicate_offset: f32,
    /// Unknown-id handling.
    pub id_policy: IdPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            snap_tolerance: 5.0,
            guide_mode: GuideMode::LastMatch,
            min_user_zoom: 0.25,
            max_user_zoom: 3.0,
            zoom_step: 0.1,
            fit_margin: 40.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            rotate_step: 15.0,
            duplicate_offset: 20.0,
            id_policy: IdPolicy::Strict,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> EditorResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EditorConfig::from_json(r#"{"snap_tolerance": 8, "id_policy": "lenient"}"#)
                .expect("parse");
        assert!((config.snap_tolerance - 8.0).abs() < f32::EPSILON);
        assert_eq!(config.id_policy, IdPolicy::Lenient);
        assert_eq!(config.history_limit, 30);
        assert_eq!(config.guide_mode, GuideMode::LastMatch);
    }

    #[test]
    fn test_malformed_json_fails() {
        assert!(EditorConfig::from_json("{ not json").is_err());
    }
}
