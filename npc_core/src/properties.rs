//! Tool properties: the values an operator edits in the property panel.
//!
//! Every float property with a minimum is clamped on write, the way the
//! panel widget refuses values below its minimum. Nothing downstream
//! re-validates them.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

/// Topic the NPC simulator listens on for dummy objects.
pub const DEFAULT_TOPIC: &str = "/simulation/npc_simulator/object_info";

/// Identifies one entry of the property panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Topic,
    StdDevX,
    StdDevY,
    StdDevZ,
    StdDevTheta,
    PositionZ,
    Velocity,
}

impl PropertyKey {
    /// All keys in panel order.
    pub fn all() -> [PropertyKey; 7] {
        [
            PropertyKey::Topic,
            PropertyKey::StdDevX,
            PropertyKey::StdDevY,
            PropertyKey::StdDevZ,
            PropertyKey::StdDevTheta,
            PropertyKey::PositionZ,
            PropertyKey::Velocity,
        ]
    }

    /// Label shown in the panel.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKey::Topic => "Pose Topic",
            PropertyKey::StdDevX => "X std deviation",
            PropertyKey::StdDevY => "Y std deviation",
            PropertyKey::StdDevZ => "Z std deviation",
            PropertyKey::StdDevTheta => "Theta std deviation",
            PropertyKey::PositionZ => "Z position",
            PropertyKey::Velocity => "Velocity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PropertyKey::Topic => "The topic on which to publish dummy object info.",
            PropertyKey::StdDevX => "X standard deviation for initial pose [m]",
            PropertyKey::StdDevY => "Y standard deviation for initial pose [m]",
            PropertyKey::StdDevZ => "Z standard deviation for initial pose [m]",
            PropertyKey::StdDevTheta => "Theta standard deviation for initial pose [rad]",
            PropertyKey::PositionZ => "Z position for initial pose [m]",
            PropertyKey::Velocity => "velocity [m/s]",
        }
    }

    /// Lower bound enforced on write, if any.
    pub fn min(&self) -> Option<f64> {
        match self {
            PropertyKey::Topic | PropertyKey::Velocity => None,
            _ => Some(0.0),
        }
    }

    /// Whether changing this property rebinds the publisher.
    pub fn rebinds_topic(&self) -> bool {
        matches!(self, PropertyKey::Topic)
    }

    /// Looks a key up by panel label or snake_case field name.
    pub fn from_name(name: &str) -> Result<Self, ToolError> {
        let trimmed = name.trim();
        PropertyKey::all()
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(trimmed) || k.field_name() == trimmed)
            .ok_or_else(|| ToolError::UnknownProperty(name.to_string()))
    }

    fn field_name(&self) -> &'static str {
        match self {
            PropertyKey::Topic => "topic",
            PropertyKey::StdDevX => "std_dev_x",
            PropertyKey::StdDevY => "std_dev_y",
            PropertyKey::StdDevZ => "std_dev_z",
            PropertyKey::StdDevTheta => "std_dev_theta",
            PropertyKey::PositionZ => "position_z",
            PropertyKey::Velocity => "velocity",
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A value written into the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Float(f64),
    Text(String),
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

/// Configuration shared by both dummy object tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolProperties {
    /// Topic the tool publishes on
    pub topic: String,

    /// Position noise std-dev along x [m]
    pub std_dev_x: f64,

    /// Position noise std-dev along y [m]
    pub std_dev_y: f64,

    /// Position noise std-dev along z [m]
    pub std_dev_z: f64,

    /// Heading noise std-dev [rad]
    pub std_dev_theta: f64,

    /// Fixed height of the placed object [m]
    pub position_z: f64,

    /// Constant forward velocity [m/s]
    pub velocity: f64,
}

impl Default for ToolProperties {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            std_dev_x: 0.03,
            std_dev_y: 0.03,
            std_dev_z: 0.03,
            std_dev_theta: 5.0 * PI / 180.0,
            position_z: 0.0,
            velocity: 0.0,
        }
    }
}

impl ToolProperties {
    /// Reads properties from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ToolError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses properties from JSON and applies the panel minimums.
    pub fn from_json_str(json: &str) -> Result<Self, ToolError> {
        let props: ToolProperties = serde_json::from_str(json)?;
        Ok(props.clamped())
    }

    /// Returns a copy with every float clamped to its minimum.
    pub fn clamped(mut self) -> Self {
        for key in PropertyKey::all() {
            if let (Some(min), Some(slot)) = (key.min(), self.float_slot(key)) {
                *slot = clamp_min(*slot, min);
            }
        }
        self
    }

    pub fn get(&self, key: PropertyKey) -> PropertyValue {
        match key {
            PropertyKey::Topic => PropertyValue::Text(self.topic.clone()),
            PropertyKey::StdDevX => PropertyValue::Float(self.std_dev_x),
            PropertyKey::StdDevY => PropertyValue::Float(self.std_dev_y),
            PropertyKey::StdDevZ => PropertyValue::Float(self.std_dev_z),
            PropertyKey::StdDevTheta => PropertyValue::Float(self.std_dev_theta),
            PropertyKey::PositionZ => PropertyValue::Float(self.position_z),
            PropertyKey::Velocity => PropertyValue::Float(self.velocity),
        }
    }

    /// Writes one property, clamping floats to the key's minimum.
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue) -> Result<(), ToolError> {
        match (key, value) {
            (PropertyKey::Topic, PropertyValue::Text(topic)) => {
                self.topic = topic;
                Ok(())
            }
            (PropertyKey::Topic, PropertyValue::Float(_)) => Err(ToolError::PropertyType {
                name: key.name().to_string(),
                expected: "a topic name",
            }),
            (_, PropertyValue::Float(v)) => {
                let v = match key.min() {
                    Some(min) => clamp_min(v, min),
                    None => v,
                };
                if let Some(slot) = self.float_slot(key) {
                    *slot = v;
                }
                Ok(())
            }
            (_, PropertyValue::Text(_)) => Err(ToolError::PropertyType {
                name: key.name().to_string(),
                expected: "a number",
            }),
        }
    }

    /// Writes a property from its textual form, as typed into the panel.
    pub fn set_from_str(&mut self, key: PropertyKey, raw: &str) -> Result<(), ToolError> {
        let value = if key == PropertyKey::Topic {
            PropertyValue::Text(raw.trim().to_string())
        } else {
            raw.trim()
                .parse::<f64>()
                .map(PropertyValue::Float)
                .map_err(|_| ToolError::PropertyType {
                    name: key.name().to_string(),
                    expected: "a number",
                })?
        };
        self.set(key, value)
    }

    fn float_slot(&mut self, key: PropertyKey) -> Option<&mut f64> {
        match key {
            PropertyKey::Topic => None,
            PropertyKey::StdDevX => Some(&mut self.std_dev_x),
            PropertyKey::StdDevY => Some(&mut self.std_dev_y),
            PropertyKey::StdDevZ => Some(&mut self.std_dev_z),
            PropertyKey::StdDevTheta => Some(&mut self.std_dev_theta),
            PropertyKey::PositionZ => Some(&mut self.position_z),
            PropertyKey::Velocity => Some(&mut self.velocity),
        }
    }
}

// NaN also lands on the minimum
fn clamp_min(v: f64, min: f64) -> f64 {
    if v >= min {
        v
    } else {
        min
    }
}
