//! Message model for dummy object info.
//!
//! Field layout follows the NPC simulator's `Object` message: a stamped
//! header, a 128-bit id, a semantic tag, a shape, an initial pose/twist with
//! covariance, and an action. All covariances are 6x6 row-major with axis
//! order (x, y, z, roll, pitch, yaw).

use nalgebra as na;
use npc_env::ObjectId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of entries in a 6x6 covariance.
pub const COVARIANCE_LEN: usize = 36;

/// Row-major 6x6 covariance (x, y, z, roll, pitch, yaw).
pub type Covariance = [f64; COVARIANCE_LEN];

/// Diagonal covariance indices.
pub mod covariance_index {
    pub const X: usize = 0;
    pub const Y: usize = 7;
    pub const Z: usize = 14;
    pub const ROLL: usize = 21;
    pub const PITCH: usize = 28;
    pub const YAW: usize = 35;
}

// =============================================================================
// HEADER
// =============================================================================

/// Timestamp split into seconds and nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

impl Time {
    /// Converts a wall-clock time. Times before the epoch map to zero and
    /// times past the signed 32-bit range saturate.
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            sec: i32::try_from(since_epoch.as_secs()).unwrap_or(i32::MAX),
            nanosec: since_epoch.subsec_nanos(),
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.nanosec as f64 * 1e-9
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

// =============================================================================
// SEMANTIC & SHAPE
// =============================================================================

/// Classification label with confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Semantic {
    #[serde(rename = "type")]
    pub semantic_type: u8,
    pub confidence: f64,
}

impl Semantic {
    pub const UNKNOWN: u8 = 0;
    pub const CAR: u8 = 1;
    pub const TRUCK: u8 = 2;
    pub const BUS: u8 = 3;
    pub const BICYCLE: u8 = 4;
    pub const MOTORBIKE: u8 = 5;
    pub const PEDESTRIAN: u8 = 6;
    pub const ANIMAL: u8 = 7;
}

/// Object extent.
///
/// For a bounding box `dimensions` is (length, width, height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub shape_type: u8,
    pub dimensions: Vector3,
}

impl Shape {
    pub const BOUNDING_BOX: u8 = 0;
    pub const CYLINDER: u8 = 1;
    pub const POLYGON: u8 = 2;

    /// Axis-aligned box in the object frame.
    pub fn bounding_box(length: f64, width: f64, height: f64) -> Self {
        Self {
            shape_type: Self::BOUNDING_BOX,
            dimensions: Vector3 {
                x: length,
                y: width,
                z: height,
            },
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<na::Vector3<f64>> for Vector3 {
    fn from(v: na::Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vector3> for na::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        na::Vector3::new(v.x, v.y, v.z)
    }
}

/// Orientation quaternion (x, y, z, w).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<na::UnitQuaternion<f64>> for Quaternion {
    fn from(q: na::UnitQuaternion<f64>) -> Self {
        Self {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

impl Quaternion {
    /// Builds the orientation from roll, pitch and yaw (radians).
    pub fn from_rpy(roll: f64, pitch: f64, yaw: f64) -> Self {
        na::UnitQuaternion::from_euler_angles(roll, pitch, yaw).into()
    }

    /// Returns (roll, pitch, yaw) in radians.
    pub fn to_rpy(&self) -> (f64, f64, f64) {
        na::UnitQuaternion::from_quaternion(na::Quaternion::new(self.w, self.x, self.y, self.z))
            .euler_angles()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

impl Pose {
    /// Heading around +Z in radians.
    pub fn yaw(&self) -> f64 {
        self.orientation.to_rpy().2
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseWithCovariance {
    pub pose: Pose,
    #[serde(with = "covariance_serde")]
    pub covariance: Covariance,
}

impl Default for PoseWithCovariance {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            covariance: [0.0; COVARIANCE_LEN],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwistWithCovariance {
    pub twist: Twist,
    #[serde(with = "covariance_serde")]
    pub covariance: Covariance,
}

impl Default for TwistWithCovariance {
    fn default() -> Self {
        Self {
            twist: Twist::default(),
            covariance: [0.0; COVARIANCE_LEN],
        }
    }
}

/// Writes a 6x6 matrix into the flat row-major layout.
pub fn covariance_from_matrix(m: &na::Matrix6<f64>) -> Covariance {
    let mut out = [0.0; COVARIANCE_LEN];
    for row in 0..6 {
        for col in 0..6 {
            out[row * 6 + col] = m[(row, col)];
        }
    }
    out
}

// =============================================================================
// OBJECT
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub pose_covariance: PoseWithCovariance,
    pub twist_covariance: TwistWithCovariance,
}

/// What the simulator should do with the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Action {
    Add = 0,
    Modify = 1,
    Delete = 2,
}

/// Dummy object info consumed by the NPC simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub header: Header,
    pub id: ObjectId,
    pub semantic: Semantic,
    pub shape: Shape,
    pub initial_state: InitialState,
    pub action: Action,
}

impl Object {
    pub fn pose(&self) -> &Pose {
        &self.initial_state.pose_covariance.pose
    }

    pub fn twist(&self) -> &Twist {
        &self.initial_state.twist_covariance.twist
    }

    pub fn pose_covariance(&self) -> &Covariance {
        &self.initial_state.pose_covariance.covariance
    }
}

/// Serde support for `[f64; 36]` (serde derives stop at 32 elements).
mod covariance_serde {
    use super::Covariance;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cov: &Covariance, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(cov.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Covariance, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        let len = values.len();
        values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"36 covariance entries"))
    }
}
