//! # Batch Config — Loading Vertex-Stage Settings From JSON
//!
//! A [`BatchConfig`] is everything one draw batch feeds the vertex stage, in a
//! form that can be saved next to an asset and loaded back:
//!
//! ```json
//! {
//!   "skinning": {
//!     "bones_per_vertex": 2,
//!     "bone_matrices": [[1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]],
//!     "projection_matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]
//!   },
//!   "point": { "is_drawing_points": true, "size": 8.0 }
//! }
//! ```
//!
//! Matrices are 16 floats in column-major order. Every field is optional and
//! falls back to its default (rigid identity transforms, points off).
//!
//! Loading validates the batch-level invariants, so a config that comes back
//! from [`BatchConfig::from_json`] or [`BatchConfig::from_file`] is safe to
//! evaluate (vertex bone indices still need
//! [`VertexStage::validate_vertices`](crate::stage::VertexStage::validate_vertices)).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StageResult;
use crate::point::PointConfig;
use crate::skinning::SkinningConfig;
use crate::stage::VertexStage;

/// Serializable per-batch inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub skinning: SkinningConfig,
    pub point: PointConfig,
}

impl BatchConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json(json: &str) -> StageResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: impl AsRef<Path>) -> StageResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json).inspect_err(|e| {
            log::warn!("rejected batch config '{}': {e}", path.display());
        })?;
        log::info!(
            "loaded batch config '{}' ({} bones/vertex, {} palette entries, points {})",
            path.display(),
            config.skinning.bones_per_vertex,
            config.skinning.bone_matrices.len(),
            if config.point.is_drawing_points { "on" } else { "off" },
        );
        Ok(config)
    }

    pub fn to_json(&self) -> StageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> StageResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn validate(&self) -> StageResult<()> {
        VertexStage::validate_configs(&self.skinning, &self.point)
    }

    pub fn into_stage(self) -> VertexStage {
        VertexStage::new(self.skinning, self.point)
    }
}

impl From<VertexStage> for BatchConfig {
    fn from(stage: VertexStage) -> Self {
        Self {
            skinning: stage.skinning,
            point: stage.point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;
    use crate::math::{Mat4, Vec3};
    use crate::skinning::BonePalette;

    #[test]
    fn empty_object_gives_defaults() {
        let config = BatchConfig::from_json("{}").unwrap();
        assert_eq!(config, BatchConfig::default());
        assert_eq!(config.skinning.model_view_matrix, Mat4::IDENTITY);
        assert!(!config.point.is_drawing_points);
        assert_eq!(config.point.size_attenuation, Vec3::X);
    }

    #[test]
    fn partial_point_section_keeps_other_defaults() {
        let config = BatchConfig::from_json(r#"{ "point": { "is_drawing_points": true, "size": 8.0 } }"#)
            .unwrap();
        assert!(config.point.is_drawing_points);
        assert_eq!(config.point.size, 8.0);
        assert_eq!(config.point.maximum_size, PointConfig::default().maximum_size);
    }

    #[test]
    fn reads_column_major_matrices() {
        let json = r#"{
            "skinning": {
                "bones_per_vertex": 1,
                "bone_matrices": [[1,0,0,0, 0,1,0,0, 0,0,1,0, 4,5,6,1]]
            }
        }"#;
        let config = BatchConfig::from_json(json).unwrap();
        assert_eq!(
            config.skinning.bone_matrices.get(0),
            Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0))
        );
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let err = BatchConfig::from_json(r#"{ "skinning": { "bones_per_vertex": 7 } }"#).unwrap_err();
        assert!(matches!(err, StageError::BonesPerVertex(7)));

        let err = BatchConfig::from_json(r#"{ "point": { "minimum_size": 9, "maximum_size": 3 } }"#)
            .unwrap_err();
        assert!(matches!(err, StageError::SizeRange { .. }));

        let err = BatchConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, StageError::Json(_)));
    }

    #[test]
    fn oversized_palette_fails_to_parse() {
        let palette = serde_json::to_string(&vec![Mat4::IDENTITY; 12]).unwrap();
        let json = format!(r#"{{ "skinning": {{ "bone_matrices": {palette} }} }}"#);
        assert!(matches!(BatchConfig::from_json(&json), Err(StageError::Json(_))));
    }

    #[test]
    fn saved_file_loads_back() {
        let config = BatchConfig {
            skinning: SkinningConfig::skinned(3, BonePalette::identity(4), Mat4::IDENTITY),
            point: PointConfig::points(6.0).with_attenuation(1.0, 0.5, 0.0),
        };
        let path = std::env::temp_dir().join(format!("vertex-stage-config-{}.json", std::process::id()));
        config.save_to_file(&path).unwrap();
        let loaded = BatchConfig::from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BatchConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, StageError::Io(_)));
    }
}
