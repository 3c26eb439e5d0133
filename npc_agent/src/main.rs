//! NPC Agent - interactive dummy object placement over Zenoh
//!
//! Runs one dummy object tool against a live simulator. Each pose typed on
//! stdin is turned into an object message and published once on the tool's
//! topic.
//!
//! ```text
//!   stdin ──► Command ──► DummyObjectTool ──► ZenohTransport ──► simulator
//!                              │
//!                        SystemContext (wall clock, OS entropy, fixed frame)
//! ```

mod command;
mod zenoh_transport;

use anyhow::Result;
use clap::Parser;
use command::{Command, HELP};
use npc_core::{DummyObjectTool, InteractiveTool, ObjectVariant, PropertyKey, ToolProperties};
use npc_env::{SystemContext, Transport, DEFAULT_FIXED_FRAME};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use zenoh_transport::ZenohTransport;

/// Dummy object tool agent
#[derive(Parser, Debug)]
#[command(name = "npc-agent")]
#[command(about = "Place dummy cars and pedestrians in a running NPC simulator", long_about = None)]
struct Args {
    /// Tool variant (car, pedestrian)
    #[arg(short = 'V', long, default_value = "car")]
    variant: ObjectVariant,

    /// Topic to publish on (overrides the config file)
    #[arg(short, long)]
    topic: Option<String>,

    /// Fixed frame stamped on every message
    #[arg(short, long, default_value = DEFAULT_FIXED_FRAME)]
    frame: String,

    /// JSON file with tool properties
    #[arg(long)]
    config: Option<String>,

    /// Prefix prepended to every zenoh key expression
    #[arg(long)]
    key_prefix: Option<String>,

    /// Zenoh endpoint to connect to (e.g. tcp/127.0.0.1:7447)
    #[arg(short, long)]
    connect: Option<String>,

    /// Zenoh session mode (peer or client)
    #[arg(long, default_value = "peer")]
    mode: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn zenoh_config(args: &Args) -> Result<zenoh::Config> {
    let mut config = zenoh::Config::default();
    if let Some(endpoint) = &args.connect {
        config
            .insert_json5("connect/endpoints", &format!("[\"{endpoint}\"]"))
            .map_err(|e| anyhow::anyhow!("Failed to set Zenoh connect endpoint: {e}"))?;
    }
    config
        .insert_json5("mode", &format!("\"{}\"", args.mode))
        .map_err(|e| anyhow::anyhow!("Failed to set Zenoh mode: {e}"))?;
    Ok(config)
}

/// One line per panel entry: label, current value, description.
fn property_lines(properties: &ToolProperties) -> Vec<String> {
    PropertyKey::all()
        .into_iter()
        .map(|key| {
            let value = format!("{:?}", properties.get(key));
            format!("  {:<20} {:<48} {}", key.name(), value, key.description())
        })
        .collect()
}

/// Applies one operator command. Returns false when the operator quits.
fn handle<T: Transport>(tool: &mut DummyObjectTool<SystemContext, T>, command: Command) -> bool {
    match command {
        Command::Pose(pose) => {
            let object = tool.on_pose_confirmed(pose.x, pose.y, pose.theta);
            println!(
                "{} {} on {}",
                tool.variant(),
                object.id,
                tool.bound_topic().unwrap_or("<unbound>")
            );
        }
        Command::Set { name, value } => match tool.set_property_from_str(&name, &value) {
            Ok(key) => println!("{} = {:?}", key, tool.properties().get(key)),
            Err(e) => warn!("Rejected edit of '{}': {}", name, e),
        },
        Command::Props => {
            for line in property_lines(tool.properties()) {
                println!("{}", line);
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let mut properties = match &args.config {
        Some(path) => ToolProperties::load(path)?,
        None => ToolProperties::default(),
    };
    if let Some(topic) = &args.topic {
        properties.set(PropertyKey::Topic, topic.as_str().into())?;
    }

    info!("NPC Agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Connecting to Zenoh network");
    let session = zenoh::open(zenoh_config(&args)?)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open Zenoh session: {e}"))?;
    info!("Zenoh session established");

    let transport = Arc::new(ZenohTransport::new(session.clone(), args.key_prefix.clone()));
    let mut tool = DummyObjectTool::new(args.variant, SystemContext::shared(args.frame.clone()), transport)
        .with_properties(properties);
    tool.on_initialize()?;

    info!(
        "{} ready on {} (frame={})",
        tool.name(),
        tool.properties().topic,
        args.frame
    );
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => break,
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if !handle(&mut tool, command) {
                            break;
                        }
                    }
                    Err(e) => error!("{}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("{} object(s) published", tool.published_count());
    drop(tool);
    session
        .close()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to close Zenoh session: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_lines_show_value_and_description() {
        let props = ToolProperties {
            velocity: 2.5,
            ..Default::default()
        };
        let lines = property_lines(&props);

        assert_eq!(lines.len(), PropertyKey::all().len());
        assert!(lines[0].contains("Pose Topic"));
        assert!(lines[0].contains(npc_core::DEFAULT_TOPIC));
        assert!(lines[0].contains(PropertyKey::Topic.description()));

        let velocity = lines.last().unwrap();
        assert!(velocity.contains("2.5"));
        assert!(velocity.contains(PropertyKey::Velocity.description()));
    }
}
