//! Scripted tool sessions.
//!
//! A session stands in for the operator: it replays property edits and
//! pose confirmations against one tool, on a virtual clock, and collects
//! everything the tool produced.
//!
//! # Script format
//!
//! ```text
//! {
//!   "variant": "car",
//!   "properties": { "velocity": 2.0 },
//!   "events": [
//!     { "set_property": { "name": "Z position", "value": 0.5 } },
//!     { "confirm_pose": { "x": 10.0, "y": -3.5, "theta": 1.57 } },
//!     { "advance_time": { "secs": 1.0 } },
//!     { "set_fixed_frame": { "frame": "odom" } }
//!   ]
//! }
//! ```

use crate::context::SimContext;
use npc_core::{
    DummyObjectTool, InteractiveTool, Object, ObjectVariant, PoseEvent, PropertyValue,
    ToolError, ToolProperties,
};
use npc_env::{ToolContext, Transport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors loading or starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tool failed to initialize: {0}")]
    Tool(#[from] ToolError),
}

/// One operator action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// Edit a property in the panel
    SetProperty { name: String, value: PropertyValue },

    /// Click and drag: confirm a pose
    ConfirmPose(PoseEvent),

    /// Let virtual time pass
    AdvanceTime { secs: f64 },

    /// Switch the host's fixed frame
    SetFixedFrame { frame: String },
}

/// A full session description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScript {
    pub variant: ObjectVariant,

    /// Initial properties (defaults when absent)
    #[serde(default)]
    pub properties: Option<ToolProperties>,

    pub events: Vec<SessionEvent>,
}

impl SessionScript {
    /// Reads a JSON script.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds a script confirming `poses` in order, `interval` apart.
    pub fn from_poses(variant: ObjectVariant, poses: &[PoseEvent], interval: Duration) -> Self {
        let mut events = Vec::with_capacity(poses.len() * 2);
        for (i, pose) in poses.iter().enumerate() {
            if i > 0 && !interval.is_zero() {
                events.push(SessionEvent::AdvanceTime {
                    secs: interval.as_secs_f64(),
                });
            }
            events.push(SessionEvent::ConfirmPose(*pose));
        }
        Self {
            variant,
            properties: None,
            events,
        }
    }
}

/// What a session produced.
#[derive(Debug, Default)]
pub struct SessionReport {
    /// Every message built, in confirmation order
    pub objects: Vec<Object>,

    /// Topic each object was published on (`None` when the tool was unbound)
    pub topics: Vec<Option<String>>,

    /// Messages the transport accepted
    pub published: u64,

    /// Rejected property edits and unusable time steps
    pub errors: Vec<String>,
}

/// Drives one tool through a script.
pub struct ToolSession<T: Transport> {
    context: Arc<SimContext>,
    tool: DummyObjectTool<SimContext, T>,
}

impl<T: Transport> ToolSession<T> {
    /// Creates and initializes the tool.
    pub fn new(
        variant: ObjectVariant,
        properties: ToolProperties,
        context: Arc<SimContext>,
        transport: Arc<T>,
    ) -> Result<Self, SessionError> {
        let mut tool = DummyObjectTool::new(variant, Arc::clone(&context), transport)
            .with_properties(properties);
        tool.on_initialize()?;
        info!(
            "{} ready (shortcut '{}', seed={})",
            tool.name(),
            tool.shortcut_key(),
            context.seed()
        );
        Ok(Self { context, tool })
    }

    pub fn tool(&self) -> &DummyObjectTool<SimContext, T> {
        &self.tool
    }

    /// Replays `events`, continuing past rejected edits and bad time steps.
    pub fn run(&mut self, events: &[SessionEvent]) -> SessionReport {
        let mut report = SessionReport::default();
        let published_before = self.tool.published_count();

        for event in events {
            match event {
                SessionEvent::SetProperty { name, value } => {
                    if let Err(e) = self.tool.set_property(name, value.clone()) {
                        warn!("Rejected edit of '{}': {}", name, e);
                        report.errors.push(format!("{}: {}", name, e));
                    }
                }
                SessionEvent::ConfirmPose(pose) => {
                    let object = self.tool.on_pose_confirmed(pose.x, pose.y, pose.theta);
                    report.topics.push(self.tool.bound_topic().map(str::to_string));
                    report.objects.push(object);
                }
                SessionEvent::AdvanceTime { secs } => match Duration::try_from_secs_f64(*secs) {
                    Ok(step) => {
                        self.context.advance_time(step);
                        debug!("t={:.3}s", self.context.elapsed().as_secs_f64());
                    }
                    Err(e) => {
                        warn!("Ignoring time advance of {}s: {}", secs, e);
                        report.errors.push(format!("advance_time {}: {}", secs, e));
                    }
                },
                SessionEvent::SetFixedFrame { frame } => {
                    self.context.set_fixed_frame(frame.clone());
                }
            }
        }

        report.published = self.tool.published_count() - published_before;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use npc_core::messages::covariance_index;
    use npc_core::{decode_object, Action};

    fn session(variant: ObjectVariant) -> (ToolSession<RecordingTransport>, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let session = ToolSession::new(
            variant,
            ToolProperties::default(),
            SimContext::shared(42),
            Arc::clone(&transport),
        )
        .unwrap();
        (session, transport)
    }

    #[test]
    fn test_script_parsing() {
        let script: SessionScript = serde_json::from_str(
            r#"{
                "variant": "pedestrian",
                "properties": { "velocity": 1.2 },
                "events": [
                    { "set_property": { "name": "Pose Topic", "value": "/npc/peds" } },
                    { "set_property": { "name": "Z position", "value": 0.5 } },
                    { "confirm_pose": { "x": 1.0, "y": 2.0, "theta": 0.3 } },
                    { "advance_time": { "secs": 0.5 } },
                    { "set_fixed_frame": { "frame": "odom" } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.variant, ObjectVariant::Pedestrian);
        assert_eq!(script.properties.as_ref().map(|p| p.velocity), Some(1.2));
        assert_eq!(
            script.events[0],
            SessionEvent::SetProperty {
                name: "Pose Topic".to_string(),
                value: PropertyValue::Text("/npc/peds".to_string()),
            }
        );
        assert_eq!(
            script.events[1],
            SessionEvent::SetProperty {
                name: "Z position".to_string(),
                value: PropertyValue::Float(0.5),
            }
        );
        assert_eq!(
            script.events[2],
            SessionEvent::ConfirmPose(PoseEvent::new(1.0, 2.0, 0.3))
        );
    }

    #[test]
    fn test_session_publishes_each_confirmation() {
        let (mut session, transport) = session(ObjectVariant::Car);
        let script = SessionScript::from_poses(
            ObjectVariant::Car,
            &[PoseEvent::new(1.0, 0.0, 0.0), PoseEvent::new(2.0, 0.0, 0.0)],
            Duration::from_secs(1),
        );

        let report = session.run(&script.events);

        assert_eq!(report.objects.len(), 2);
        assert_eq!(report.published, 2);
        assert!(report.errors.is_empty());

        let published = transport.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].envelope.timestamp_ms - published[0].envelope.timestamp_ms, 1000);

        let first = decode_object(&published[0].envelope).unwrap();
        assert_eq!(first.id, report.objects[0].id);
        assert_eq!(first.action, Action::Add);
        assert_ne!(report.objects[0].id, report.objects[1].id);
    }

    #[test]
    fn test_session_edits_apply_to_next_confirmation() {
        let (mut session, transport) = session(ObjectVariant::Pedestrian);
        let report = session.run(&[
            SessionEvent::SetProperty {
                name: "Theta std deviation".to_string(),
                value: PropertyValue::Float(0.1),
            },
            SessionEvent::SetProperty {
                name: "Pose Topic".to_string(),
                value: PropertyValue::Text("/npc/peds".to_string()),
            },
            SessionEvent::SetFixedFrame {
                frame: "odom".to_string(),
            },
            SessionEvent::ConfirmPose(PoseEvent::new(5.0, 5.0, -1.0)),
        ]);

        let object = &report.objects[0];
        assert_eq!(object.header.frame_id, "odom");
        assert!((object.pose_covariance()[covariance_index::YAW] - 0.01).abs() < 1e-12);
        assert_eq!(report.topics, vec![Some("/npc/peds".to_string())]);
        assert_eq!(transport.published_on("/npc/peds").len(), 1);
        assert_eq!(transport.advertisements(), 2);
    }

    #[test]
    fn test_session_keeps_going_after_bad_edit() {
        let (mut session, _) = session(ObjectVariant::Car);
        let report = session.run(&[
            SessionEvent::SetProperty {
                name: "Colour".to_string(),
                value: PropertyValue::Float(1.0),
            },
            SessionEvent::ConfirmPose(PoseEvent::new(0.0, 0.0, 0.0)),
        ]);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.objects.len(), 1);
        assert_eq!(report.published, 1);
    }

    #[test]
    fn test_rejected_topic_reported_as_unbound() {
        let (mut session, transport) = session(ObjectVariant::Car);
        let report = session.run(&[
            SessionEvent::SetProperty {
                name: "Pose Topic".to_string(),
                value: PropertyValue::Text("/bad topic".to_string()),
            },
            SessionEvent::ConfirmPose(PoseEvent::new(1.0, 2.0, 0.0)),
        ]);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.objects.len(), 1);
        assert_eq!(report.topics, vec![None]);
        assert_eq!(report.published, 0);
        assert!(transport.published().is_empty());
        assert_eq!(session.tool().bound_topic(), None);
    }

    #[test]
    fn test_huge_time_advance_is_reported() {
        let (mut session, transport) = session(ObjectVariant::Car);
        let report = session.run(&[
            SessionEvent::AdvanceTime { secs: 1e30 },
            SessionEvent::AdvanceTime { secs: f64::NAN },
            SessionEvent::AdvanceTime { secs: -1.0 },
            SessionEvent::ConfirmPose(PoseEvent::new(0.0, 0.0, 0.0)),
        ]);

        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.published, 1);
        assert_eq!(transport.published()[0].envelope.timestamp_ms, 1_704_067_200_000);
    }

    #[test]
    fn test_repeated_large_advances_saturate() {
        let (mut session, _) = session(ObjectVariant::Car);
        let report = session.run(&[
            SessionEvent::AdvanceTime { secs: 1e10 },
            SessionEvent::AdvanceTime { secs: 1e10 },
        ]);

        assert!(report.errors.is_empty());
        assert_eq!(session.context.elapsed(), Duration::from_nanos(u64::MAX));
    }

    #[test]
    fn test_publish_failure_is_not_fatal() {
        let (mut session, transport) = session(ObjectVariant::Car);
        transport.set_fail_publish(true);

        let report = session.run(&[SessionEvent::ConfirmPose(PoseEvent::new(1.0, 1.0, 1.0))]);

        assert_eq!(report.objects.len(), 1);
        assert_eq!(report.published, 0);
        assert_eq!(session.tool().published_count(), 0);
    }

    #[test]
    fn test_same_seed_same_ids() {
        let poses = [PoseEvent::new(0.0, 0.0, 0.0), PoseEvent::new(1.0, 1.0, 1.0)];
        let script = SessionScript::from_poses(ObjectVariant::Car, &poses, Duration::ZERO);

        let (mut a, _) = session(ObjectVariant::Car);
        let (mut b, _) = session(ObjectVariant::Car);
        let ids_a: Vec<_> = a.run(&script.events).objects.iter().map(|o| o.id).collect();
        let ids_b: Vec<_> = b.run(&script.events).objects.iter().map(|o| o.id).collect();
        assert_eq!(ids_a, ids_b);
    }
}
