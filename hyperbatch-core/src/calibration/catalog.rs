// ============================================================================
// hyperbatch-core/src/calibration/catalog.rs
// ============================================================================
//
// CALIBRATION CATALOG: Known Camera Profiles
//
// The catalog is built once at startup, either from the built-in generic
// profiles or from a JSON file, and is read-only afterwards. Profile order
// matters: it is the final tie-break when several profiles match a video.
//
// JSON layout:
//
//   { "profiles": [
//       { "id": "gopro-4k", "camera": "GoPro",
//         "video_mode": { "width": 3840, "height": 2160, "max_frame_rate": 60 },
//         "lens": { "k1": -0.24, "k2": 0.04 } }
//   ] }

// ---- Standard library imports ----
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ---- External crate imports ----
use serde::Deserialize;

// ---- Internal crate imports ----
use super::{CalibrationProfile, LensCalibration, VideoMode};
use crate::error::{CoreError, CoreResult};

#[derive(Deserialize)]
struct CatalogFile {
    profiles: Vec<CalibrationProfile>,
}

/// Ordered, immutable set of calibration profiles with unique identifiers.
#[derive(Debug, Clone)]
pub struct CalibrationCatalog {
    profiles: Vec<CalibrationProfile>,
}

impl CalibrationCatalog {
    /// Builds a catalog, rejecting duplicate ids and degenerate modes.
    pub fn from_profiles(profiles: Vec<CalibrationProfile>) -> CoreResult<Self> {
        if profiles.is_empty() {
            return Err(CoreError::Catalog("catalog contains no profiles".to_string()));
        }

        let mut seen = HashSet::new();
        for profile in &profiles {
            if profile.id.trim().is_empty() {
                return Err(CoreError::Catalog("profile with empty id".to_string()));
            }
            if !seen.insert(profile.id.as_str()) {
                return Err(CoreError::Catalog(format!("duplicate profile id '{}'", profile.id)));
            }
            let mode = &profile.video_mode;
            if mode.width == 0 || mode.height == 0 {
                return Err(CoreError::Catalog(format!(
                    "profile '{}' has zero-sized video mode",
                    profile.id
                )));
            }
            if !(mode.max_frame_rate.is_finite() && mode.max_frame_rate > 0.0) {
                return Err(CoreError::Catalog(format!(
                    "profile '{}' has invalid max frame rate {}",
                    profile.id, mode.max_frame_rate
                )));
            }
        }

        Ok(Self { profiles })
    }

    /// Parses a catalog from its JSON representation.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_profiles(file.profiles)
    }

    /// Loads a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded {} calibration profile(s) from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Loads `path` when given, otherwise returns the built-in catalog.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Generic profiles for common 16:9 and 4:3 recording modes.
    ///
    /// Ordered from narrow to wide so that equal-ranked matches prefer the
    /// smaller mode.
    pub fn builtin() -> Self {
        let profiles = vec![
            generic("generic-480p-4x3", 640, 480, 60.0, -0.02),
            generic("generic-720p", 1280, 720, 60.0, -0.03),
            generic("generic-1080p30", 1920, 1080, 30.0, -0.05),
            generic("generic-1080p60", 1920, 1080, 60.0, -0.05),
            generic("generic-1080p240", 1920, 1080, 240.0, -0.06),
            generic("generic-1440p-4x3", 1920, 1440, 60.0, -0.08),
            generic("generic-2.7k", 2704, 1520, 60.0, -0.07),
            generic("generic-2.7k-4x3", 2704, 2028, 60.0, -0.09),
            generic("generic-4k", 3840, 2160, 60.0, -0.08),
            generic("generic-4k-4x3", 4000, 3000, 60.0, -0.10),
            generic("generic-5.3k", 5312, 2988, 60.0, -0.08),
        ];
        Self { profiles }
    }

    pub fn profiles(&self) -> &[CalibrationProfile] {
        &self.profiles
    }

    pub fn get(&self, id: &str) -> Option<&CalibrationProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for CalibrationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn generic(id: &str, width: u32, height: u32, max_fps: f64, k1: f64) -> CalibrationProfile {
    CalibrationProfile::new(
        id,
        "Generic action camera",
        VideoMode::new(width, height, max_fps),
        LensCalibration::radial(k1, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let builtin = CalibrationCatalog::builtin();
        let rebuilt = CalibrationCatalog::from_profiles(builtin.profiles().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), builtin.len());
        assert!(builtin.get("generic-4k").is_some());
    }

    #[test]
    fn parses_json() {
        let json = r#"{ "profiles": [
            { "id": "cam-4k", "camera": "Test cam",
              "video_mode": { "width": 3840, "height": 2160, "max_frame_rate": 30 },
              "lens": { "k1": -0.24, "k2": 0.04, "cx": 0.51 } }
        ] }"#;
        let catalog = CalibrationCatalog::from_json_str(json).unwrap();
        let profile = catalog.get("cam-4k").unwrap();
        assert_eq!(profile.video_mode, VideoMode::new(3840, 2160, 30.0));
        assert_eq!(profile.lens.cx, 0.51);
        assert_eq!(profile.lens.cy, 0.5);
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        let json = r#"{ "profiles": [
            { "id": "a", "video_mode": { "width": 10, "height": 10, "max_frame_rate": 30 }, "lens": { "k1": 0 } },
            { "id": "a", "video_mode": { "width": 20, "height": 20, "max_frame_rate": 30 }, "lens": { "k1": 0 } }
        ] }"#;
        assert!(matches!(
            CalibrationCatalog::from_json_str(json),
            Err(CoreError::Catalog(_))
        ));
        assert!(CalibrationCatalog::from_json_str(r#"{ "profiles": [] }"#).is_err());
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = CalibrationCatalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(
            &path,
            r#"{ "profiles": [ { "id": "x", "video_mode": { "width": 1280, "height": 720, "max_frame_rate": 60 }, "lens": { "k1": -0.1 } } ] }"#,
        )
        .unwrap();
        assert_eq!(CalibrationCatalog::load(Some(&path)).unwrap().len(), 1);
        assert_eq!(
            CalibrationCatalog::load(None).unwrap().len(),
            CalibrationCatalog::builtin().len()
        );
        assert!(CalibrationCatalog::from_json_file(&tmp.path().join("missing.json")).is_err());
    }
}
