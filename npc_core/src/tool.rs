//! Interactive dummy object tools.
//!
//! This module is the seam between the host (which owns mouse handling and
//! the property panel) and the message builder.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Host (viewer)                          │
//! │  click + drag ──► on_pose_confirmed(x, y, theta)                │
//! │  panel edit   ──► set_property() ──► on_configuration_changed() │
//! └────────────────────────────────┬────────────────────────────────┘
//!                                  │
//! ┌────────────────────────────────▼────────────────────────────────┐
//! │                     DummyObjectTool<Ctx, T>                     │
//! │  ToolProperties ──────────────┐                                 │
//! │  Ctx: stamp, frame, id bytes ─┴─► PoseToMessageConverter        │
//! │                                          │                      │
//! │                                        Object                   │
//! │                                          │                      │
//! │  T::Publisher (rebound per topic) ◄── encode_object             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use npc_core::{DummyObjectTool, InteractiveTool, ObjectVariant};
//! use npc_env::SystemContext;
//!
//! let mut tool = DummyObjectTool::new(ObjectVariant::Car, SystemContext::shared("map"), transport);
//! tool.on_initialize()?;
//! let object = tool.on_pose_confirmed(10.0, -3.5, 1.57);
//! ```

use crate::codec::encode_object;
use crate::converter::{PoseEvent, PoseToMessageConverter};
use crate::error::ToolError;
use crate::messages::Object;
use crate::properties::{PropertyKey, PropertyValue, ToolProperties};
use crate::variant::ObjectVariant;
use npc_env::{ObjectId, ToolContext, TopicPublisher, Transport};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Capabilities the host drives on an interactive tool.
///
/// The host serializes all calls; none of them block on the network.
pub trait InteractiveTool {
    /// Display name; empty until `on_initialize` ran.
    fn name(&self) -> &str;

    /// Keyboard shortcut that activates the tool.
    fn shortcut_key(&self) -> char;

    /// Called once when the host loads the tool.
    fn on_initialize(&mut self) -> Result<(), ToolError>;

    /// Called when the operator confirms a pose. Returns the message that was
    /// built (and handed to the publisher, if one is bound).
    fn on_pose_confirmed(&mut self, x: f64, y: f64, theta: f64) -> Object;

    /// Called when the configured topic changes.
    fn on_configuration_changed(&mut self) -> Result<(), ToolError>;
}

/// Places dummy cars or pedestrians for the NPC simulator.
pub struct DummyObjectTool<Ctx, T>
where
    Ctx: ToolContext,
    T: Transport,
{
    /// Display name (set on initialize)
    name: String,

    /// Message builder for this variant
    converter: PoseToMessageConverter,

    /// Panel values
    properties: ToolProperties,

    /// Host context
    context: Arc<Ctx>,

    /// Transport used to (re)declare publishers
    transport: Arc<T>,

    /// Publisher bound to `properties.topic`
    publisher: Option<T::Publisher>,

    /// Messages accepted by the publisher
    published_count: u64,
}

impl<Ctx, T> DummyObjectTool<Ctx, T>
where
    Ctx: ToolContext,
    T: Transport,
{
    /// Creates a tool with default properties. Nothing is bound until
    /// `on_initialize`.
    pub fn new(variant: ObjectVariant, context: Arc<Ctx>, transport: Arc<T>) -> Self {
        Self {
            name: String::new(),
            converter: PoseToMessageConverter::new(variant),
            properties: ToolProperties::default(),
            context,
            transport,
            publisher: None,
            published_count: 0,
        }
    }

    /// Replaces the initial properties (clamped).
    pub fn with_properties(mut self, properties: ToolProperties) -> Self {
        self.properties = properties.clamped();
        self
    }

    pub fn variant(&self) -> ObjectVariant {
        self.converter.variant()
    }

    pub fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    /// Topic of the currently bound publisher, if any.
    pub fn bound_topic(&self) -> Option<&str> {
        self.publisher.as_ref().map(|p| p.topic())
    }

    pub fn published_count(&self) -> u64 {
        self.published_count
    }

    /// Writes a property by name. Changing the topic rebinds the publisher.
    pub fn set_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<PropertyKey, ToolError> {
        let key = PropertyKey::from_name(name)?;
        self.properties.set(key, value.into())?;
        self.after_property_write(key)?;
        Ok(key)
    }

    /// Writes a property from text, as typed into the panel.
    pub fn set_property_from_str(&mut self, name: &str, raw: &str) -> Result<PropertyKey, ToolError> {
        let key = PropertyKey::from_name(name)?;
        self.properties.set_from_str(key, raw)?;
        self.after_property_write(key)?;
        Ok(key)
    }

    fn after_property_write(&mut self, key: PropertyKey) -> Result<(), ToolError> {
        debug!("{} = {:?}", key, self.properties.get(key));
        if key.rebinds_topic() {
            self.on_configuration_changed()?;
        }
        Ok(())
    }

    fn publish(&mut self, object: &Object) {
        let Some(publisher) = self.publisher.as_ref() else {
            warn!(
                "{}: no publisher bound, dropping object {}",
                self.variant(),
                object.id
            );
            return;
        };

        let result = encode_object(object)
            .and_then(|envelope| publisher.publish(envelope).map_err(ToolError::from));

        match result {
            Ok(()) => {
                self.published_count += 1;
                debug!("Published object {} on {}", object.id, publisher.topic());
            }
            Err(e) => warn!("Failed to publish object {}: {}", object.id, e),
        }
    }
}

impl<Ctx, T> InteractiveTool for DummyObjectTool<Ctx, T>
where
    Ctx: ToolContext,
    T: Transport,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn shortcut_key(&self) -> char {
        self.variant().shortcut_key()
    }

    fn on_initialize(&mut self) -> Result<(), ToolError> {
        self.name = self.variant().tool_name().to_string();
        self.on_configuration_changed()
    }

    fn on_pose_confirmed(&mut self, x: f64, y: f64, theta: f64) -> Object {
        let frame_id = self.context.fixed_frame();
        let stamp = self.context.system_time();
        let id = ObjectId::generate(self.context.as_ref());

        let object = self.converter.convert(
            PoseEvent::new(x, y, theta),
            &self.properties,
            stamp,
            frame_id,
            id,
        );

        info!(
            "Setting pose: {:.3} {:.3} {:.3} {:.3} [frame={}]",
            x, y, self.properties.position_z, theta, object.header.frame_id
        );
        info!(
            "Setting twist: {:.3} {:.3} {:.3} [frame={}]",
            self.properties.velocity, 0.0, 0.0, object.header.frame_id
        );

        self.publish(&object);
        object
    }

    fn on_configuration_changed(&mut self) -> Result<(), ToolError> {
        // Old binding goes away even if the new topic is rejected
        self.publisher = None;
        let publisher = self.transport.advertise(&self.properties.topic)?;
        info!("{} publishing on {}", self.variant().tool_name(), publisher.topic());
        self.publisher = Some(publisher);
        Ok(())
    }
}
