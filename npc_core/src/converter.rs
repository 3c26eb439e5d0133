//! Pose-to-message conversion.
//!
//! Turns one confirmed planar pose into one dummy object message. The
//! conversion is total: every input produces a message, nothing is checked.

use crate::messages::{
    covariance_from_matrix, Action, Header, InitialState, Object, Point, Pose,
    PoseWithCovariance, Quaternion, Semantic, Time, Twist, TwistWithCovariance, Vector3,
};
use crate::properties::ToolProperties;
use crate::variant::ObjectVariant;
use nalgebra::{Matrix6, Vector6};
use npc_env::ObjectId;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A confirmed planar pose in the fixed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEvent {
    pub x: f64,
    pub y: f64,
    /// Heading [rad]
    pub theta: f64,
}

impl PoseEvent {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

impl std::str::FromStr for PoseEvent {
    type Err = String;

    /// Parses `x,y,theta` or `x y theta`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| format!("Invalid number '{}' in pose '{}'", part, s))
            })
            .collect::<Result<_, _>>()?;

        match values.as_slice() {
            [x, y, theta] => Ok(PoseEvent::new(*x, *y, *theta)),
            _ => Err(format!("Expected 'x,y,theta', got '{}'", s)),
        }
    }
}

/// Builds dummy object messages for one tool variant.
#[derive(Debug, Clone, Copy)]
pub struct PoseToMessageConverter {
    variant: ObjectVariant,
}

impl PoseToMessageConverter {
    pub fn new(variant: ObjectVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ObjectVariant {
        self.variant
    }

    /// Builds the message for `pose` under the current `props`.
    ///
    /// # Arguments
    /// * `stamp` - Header time
    /// * `frame_id` - Fixed frame the pose is expressed in
    /// * `id` - Identifier to carry (drawn by the caller)
    pub fn convert(
        &self,
        pose: PoseEvent,
        props: &ToolProperties,
        stamp: SystemTime,
        frame_id: String,
        id: ObjectId,
    ) -> Object {
        let header = Header {
            stamp: Time::from_system_time(stamp),
            frame_id,
        };

        let semantic = Semantic {
            semantic_type: self.variant.semantic_type(),
            confidence: 1.0,
        };

        let pose_covariance = PoseWithCovariance {
            pose: Pose {
                position: Point {
                    x: pose.x,
                    y: pose.y,
                    z: props.position_z,
                },
                orientation: Quaternion::from_rpy(0.0, 0.0, pose.theta),
            },
            covariance: pose_covariance(props),
        };

        let twist_covariance = TwistWithCovariance {
            twist: Twist {
                linear: Vector3 {
                    x: props.velocity,
                    y: 0.0,
                    z: 0.0,
                },
                angular: Vector3::default(),
            },
            ..Default::default()
        };

        Object {
            header,
            id,
            semantic,
            shape: self.variant.shape(),
            initial_state: InitialState {
                pose_covariance,
                twist_covariance,
            },
            action: Action::Add,
        }
    }
}

/// Diagonal (x, y, z, roll, pitch, yaw) variances; roll and pitch stay zero.
fn pose_covariance(props: &ToolProperties) -> crate::messages::Covariance {
    let variances = Vector6::new(
        props.std_dev_x * props.std_dev_x,
        props.std_dev_y * props.std_dev_y,
        props.std_dev_z * props.std_dev_z,
        0.0,
        0.0,
        props.std_dev_theta * props.std_dev_theta,
    );
    covariance_from_matrix(&Matrix6::from_diagonal(&variances))
}
