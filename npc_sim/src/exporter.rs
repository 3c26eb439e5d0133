//! JSON exporter for session results.
//!
//! Flattens the objects a session produced into a compact record that is
//! easy to plot or diff between runs.

use npc_core::{Object, ObjectVariant};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// One placed object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Header stamp in seconds
    pub time_sec: f64,
    /// Topic the object was published on, if the tool was bound
    pub topic: Option<String>,
    pub frame_id: String,
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
    pub velocity: f64,
}

impl PlacedObject {
    pub fn new(object: &Object, topic: Option<&str>) -> Self {
        let pose = object.pose();
        Self {
            time_sec: object.header.stamp.as_secs_f64(),
            topic: topic.map(str::to_string),
            frame_id: object.header.frame_id.clone(),
            id: object.id.as_uuid().to_string(),
            x: pose.position.x,
            y: pose.position.y,
            z: pose.position.z,
            yaw: pose.yaw(),
            velocity: object.twist().linear.x,
        }
    }
}

/// Complete session export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    /// Tool variant
    pub variant: ObjectVariant,

    /// Seed used
    pub seed: u64,

    /// All placed objects
    pub objects: Vec<PlacedObject>,

    /// Messages the transport accepted
    pub published: u64,

    /// Rejected edits and time steps
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

impl SessionExport {
    /// Creates a new export container.
    pub fn new(variant: ObjectVariant, seed: u64) -> Self {
        Self {
            variant,
            seed,
            objects: Vec::new(),
            published: 0,
            errors: Vec::new(),
        }
    }

    /// Adds an object.
    pub fn add_object(&mut self, object: &Object, topic: Option<&str>) {
        self.objects.push(PlacedObject::new(object, topic));
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, published: u64, errors: Vec<String>) {
        self.published = published;
        self.errors = errors;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
