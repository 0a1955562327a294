//! The `video_positions.json` export: every video plane's placement keyed
//! by its media source.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::PanelError;
use crate::scene::VideoSnapshot;

/// Default download name for the export.
pub const EXPORT_FILE_NAME: &str = "video_positions.json";

/// MIME type announced for the download.
pub const EXPORT_MIME: &str = "text/json";

/// The consumed file-download interface.
pub trait FileSink {
    /// Offer `contents` to the user as a downloadable file.
    fn save(
        &mut self,
        file_name: &str,
        mime: &str,
        contents: &str,
    ) -> Result<(), PanelError>;
}

/// One video's exported placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoTransform {
    /// World X.
    #[serde(serialize_with = "js_number")]
    pub x: f64,
    /// World Y.
    #[serde(serialize_with = "js_number")]
    pub y: f64,
    /// World Z.
    #[serde(serialize_with = "js_number")]
    pub z: f64,
    /// Yaw in degrees.
    #[serde(rename = "rotationY", serialize_with = "js_number")]
    pub rotation_y: f64,
}

/// Ordered source → transform mapping.
///
/// Keys keep first-seen order; a repeated source overwrites the earlier
/// value in place, like assigning to a JS object key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoTransforms {
    entries: Vec<(String, VideoTransform)>,
}

impl VideoTransforms {
    /// Empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from scene snapshots in document order.
    #[must_use]
    pub fn from_snapshots(snapshots: &[VideoSnapshot]) -> Self {
        let mut out = Self::new();
        for snap in snapshots {
            out.insert(
                &snap.source,
                VideoTransform {
                    x: snap.position.x,
                    y: snap.position.y,
                    z: snap.position.z,
                    rotation_y: snap.rotation_y,
                },
            );
        }
        out
    }

    /// Insert or overwrite the entry for `source`.
    pub fn insert(&mut self, source: &str, transform: VideoTransform) {
        match self.entries.iter_mut().find(|(key, _)| key == source) {
            Some((_, existing)) => *existing = transform,
            None => self.entries.push((source.to_owned(), transform)),
        }
    }

    /// Lookup by source.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&VideoTransform> {
        self.entries
            .iter()
            .find(|(key, _)| key == source)
            .map(|(_, t)| t)
    }

    /// Number of distinct sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no videos were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON document (two-space indent).
    pub fn to_json_pretty(&self) -> Result<String, PanelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for VideoTransforms {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, transform) in &self.entries {
            map.serialize_entry(source, transform)?;
        }
        map.end()
    }
}

/// Largest integer magnitude a JS number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Serialize a number the way `JSON.stringify` would: integral values
/// without a fraction, fractions via their shortest round-trip spelling,
/// non-finite values as `null`.
fn js_number<S: Serializer>(
    value: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let value = *value;
    if !value.is_finite() {
        return serializer.serialize_unit();
    }
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return serializer.serialize_i64(value as i64);
    }
    serializer.serialize_f64(value)
}
