//! NPC Tools Simulator CLI
//!
//! Place dummy cars and pedestrians without a viewer: replay a session
//! script or a list of poses against one tool and report what it published.

use clap::Parser;
use npc_core::{ObjectVariant, PoseEvent, PropertyKey, ToolProperties};
use npc_env::{ToolContext, Transport};
use npc_sim::{
    JsonLinesTransport, RecordingTransport, SessionError, SessionExport, SessionReport,
    SessionScript, SimContext, ToolSession,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Dummy object tool simulator
#[derive(Parser, Debug)]
#[command(name = "npc-sim")]
#[command(about = "Replay dummy car/pedestrian placements for the NPC simulator", long_about = None)]
struct Args {
    /// Tool variant (car, pedestrian); overrides the script's variant
    #[arg(short = 'V', long)]
    variant: Option<ObjectVariant>,

    /// Topic to publish on
    #[arg(short, long)]
    topic: Option<String>,

    /// Fixed frame reported by the host
    #[arg(short, long, default_value = "map")]
    frame: String,

    /// X standard deviation for initial pose [m]
    #[arg(long)]
    std_dev_x: Option<f64>,

    /// Y standard deviation for initial pose [m]
    #[arg(long)]
    std_dev_y: Option<f64>,

    /// Z standard deviation for initial pose [m]
    #[arg(long)]
    std_dev_z: Option<f64>,

    /// Theta standard deviation for initial pose [rad]
    #[arg(long)]
    std_dev_theta: Option<f64>,

    /// Z position for initial pose [m]
    #[arg(short, long)]
    z: Option<f64>,

    /// Forward velocity [m/s]
    #[arg(long, allow_hyphen_values = true)]
    velocity: Option<f64>,

    /// JSON file with tool properties
    #[arg(long)]
    config: Option<String>,

    /// Pose to confirm as x,y,theta (repeatable)
    #[arg(short, long = "pose", allow_hyphen_values = true)]
    poses: Vec<PoseEvent>,

    /// Virtual seconds between consecutive --pose confirmations
    #[arg(long, default_value = "1.0")]
    interval: f64,

    /// Session script (JSON) to replay instead of --pose
    #[arg(short = 'S', long)]
    script: Option<String>,

    /// Seed for identifiers and clock (0 = random, logged)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print every published message as a JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Export placed objects to a JSON file
    #[arg(long)]
    export: Option<String>,
}

impl Args {
    /// Applies the command-line property overrides (clamped like panel edits).
    fn apply_overrides(&self, props: &mut ToolProperties) -> Result<(), npc_core::ToolError> {
        if let Some(topic) = &self.topic {
            props.set(PropertyKey::Topic, topic.as_str().into())?;
        }
        let floats = [
            (PropertyKey::StdDevX, self.std_dev_x),
            (PropertyKey::StdDevY, self.std_dev_y),
            (PropertyKey::StdDevZ, self.std_dev_z),
            (PropertyKey::StdDevTheta, self.std_dev_theta),
            (PropertyKey::PositionZ, self.z),
            (PropertyKey::Velocity, self.velocity),
        ];
        for (key, value) in floats {
            if let Some(v) = value {
                props.set(key, v.into())?;
            }
        }
        Ok(())
    }
}

fn run_session<T: Transport>(
    script: &SessionScript,
    properties: ToolProperties,
    context: Arc<SimContext>,
    transport: Arc<T>,
) -> Result<SessionReport, SessionError> {
    let mut session = ToolSession::new(script.variant, properties, context, transport)?;
    Ok(session.run(&script.events))
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();

    // Initialize logging (stderr, so --json output stays clean)
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Build the script
    let mut script = match &args.script {
        Some(path) => SessionScript::load(path).unwrap_or_else(|e| fail(e)),
        None => {
            if args.poses.is_empty() {
                fail("nothing to do, pass --pose x,y,theta or --script <file>");
            }
            let interval = Duration::try_from_secs_f64(args.interval)
                .unwrap_or_else(|e| fail(format!("--interval {}: {}", args.interval, e)));
            SessionScript::from_poses(
                args.variant.unwrap_or(ObjectVariant::Car),
                &args.poses,
                interval,
            )
        }
    };
    if let Some(variant) = args.variant {
        script.variant = variant;
    }

    // Properties: config file, else script, else defaults; then CLI overrides
    let mut properties = match &args.config {
        Some(path) => ToolProperties::load(path).unwrap_or_else(|e| fail(e)),
        None => script.properties.clone().unwrap_or_default(),
    };
    if let Err(e) = args.apply_overrides(&mut properties) {
        fail(e);
    }

    let context = Arc::new(if args.seed == 0 {
        SimContext::from_entropy()
    } else {
        SimContext::new(args.seed)
    });
    context.set_fixed_frame(args.frame.clone());

    info!("NPC Tools Simulator v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "variant={} topic={} frame={} seed={}",
        script.variant,
        properties.topic,
        args.frame,
        context.seed()
    );

    let result = if args.json {
        let transport = Arc::new(JsonLinesTransport::new(std::io::stdout()));
        run_session(&script, properties, context.clone(), transport)
    } else {
        let transport = Arc::new(RecordingTransport::new());
        run_session(&script, properties, context.clone(), transport)
    };
    let report = result.unwrap_or_else(|e| fail(e));

    for (object, topic) in report.objects.iter().zip(&report.topics) {
        let topic = topic.as_deref().unwrap_or("<unbound>");
        let pose = object.pose();
        info!(
            "  {} on {} at ({:.3}, {:.3}, {:.3}) yaw={:.3}",
            object.id,
            topic,
            pose.position.x,
            pose.position.y,
            pose.position.z,
            pose.yaw()
        );
    }
    info!(
        "{} object(s) built, {} published",
        report.objects.len(),
        report.published
    );

    if let Some(export_path) = &args.export {
        let mut export = SessionExport::new(script.variant, context.seed());
        for (object, topic) in report.objects.iter().zip(&report.topics) {
            export.add_object(object, topic.as_deref());
        }
        export.finalize(report.published, report.errors.clone());

        if let Err(e) = export.write_to_file(export_path) {
            error!("Failed to write export: {:?}", e);
        } else {
            info!("Exported {} objects to {}", export.objects.len(), export_path);
        }
    }

    // Exit with proper code for scripted use
    if !report.errors.is_empty() {
        for e in &report.errors {
            error!("  - {}", e);
        }
        std::process::exit(1);
    }
    if report.published < report.objects.len() as u64 {
        error!(
            "{} object(s) were not published",
            report.objects.len() as u64 - report.published
        );
        std::process::exit(1);
    }
}
