use clap::{Parser, Subcommand, ValueEnum};
use rk_geometry::{AxisymmetricProperties, Profile, SolidOfRevolution, integrate};
use rk_tree::{
    Component, Motor, MotorDelay, MotorSlot, RelativePosition, Rocket, SubtreeSummary, TreeError,
    mass_summary_label,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uom::si::area::square_centimeter;
use uom::si::mass::gram;
use uom::si::volume::cubic_centimeter;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "rk-cli")]
#[command(about = "RocketKit CLI - Rocket component geometry and mass properties", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate a cylindrical tube
    Tube {
        /// Length in metres
        #[arg(long, default_value_t = 0.3)]
        length: f64,
        /// Outer radius in metres
        #[arg(long, default_value_t = 0.025)]
        radius: f64,
        /// Wall thickness in metres
        #[arg(long, default_value_t = 0.002)]
        thickness: f64,
        /// Material density in kg/m³
        #[arg(long, default_value_t = 680.0)]
        density: f64,
    },
    /// Integrate a tapered body (nose cone or transition)
    Cone {
        #[arg(long, default_value_t = 0.1)]
        length: f64,
        /// Fore radius in metres
        #[arg(long, default_value_t = 0.0)]
        fore: f64,
        /// Aft radius in metres
        #[arg(long, default_value_t = 0.025)]
        aft: f64,
        #[arg(long, default_value_t = 0.002)]
        thickness: f64,
        #[arg(long, default_value_t = 680.0)]
        density: f64,
        /// Solid instead of hollow
        #[arg(long)]
        filled: bool,
        /// Ellipsoidal instead of conical profile
        #[arg(long)]
        ellipsoid: bool,
    },
    /// Build a small single-stage rocket and summarise it
    Demo {
        /// Launch lug clock angle in degrees
        #[arg(long, default_value_t = 0.0)]
        lug_angle: f64,
        /// Motor designation loaded in the default configuration
        #[arg(long)]
        motor: Option<String>,
        /// Ejection delay in seconds (omit for plugged)
        #[arg(long)]
        delay: Option<f64>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tube {
            length,
            radius,
            thickness,
            density,
        } => cmd_shape(
            cli.format,
            SolidOfRevolution::new(length, Profile::Cylinder { radius }, thickness, false),
            density,
        ),
        Commands::Cone {
            length,
            fore,
            aft,
            thickness,
            density,
            filled,
            ellipsoid,
        } => {
            let profile = if ellipsoid {
                Profile::Ellipsoid { fore, aft }
            } else {
                Profile::Conical { fore, aft }
            };
            cmd_shape(
                cli.format,
                SolidOfRevolution::new(length, profile, thickness, filled),
                density,
            )
        }
        Commands::Demo {
            lug_angle,
            motor,
            delay,
        } => cmd_demo(cli.format, lug_angle, motor, delay),
    }
}

#[derive(Serialize)]
struct ShapeReport {
    shape: SolidOfRevolution,
    density: f64,
    properties: AxisymmetricProperties,
}

fn cmd_shape(format: Format, shape: SolidOfRevolution, density: f64) -> CliResult<()> {
    let properties = integrate(&shape, density);
    match format {
        Format::Yaml => {
            let report = ShapeReport {
                shape,
                density,
                properties,
            };
            print!("{}", serde_yaml::to_string(&report)?);
        }
        Format::Text => print_properties(&properties),
    }
    Ok(())
}

fn print_properties(p: &AxisymmetricProperties) {
    println!("  Volume:          {:.4} cm³", p.volume_si().get::<cubic_centimeter>());
    println!("  Wetted area:     {:.4} cm²", p.wetted_area_si().get::<square_centimeter>());
    println!("  Planform area:   {:.4} cm²", p.planform_area_si().get::<square_centimeter>());
    println!("  Planform center: {:.4} m", p.planform_center);
    println!("  Mass:            {:.4} g", p.mass_si().get::<gram>());
    println!("  CG:              {:.4} m", p.cg.x);
    println!("  Long. inertia:   {:.6e} m²", p.longitudinal_unit_inertia);
    println!("  Rot. inertia:    {:.6e} m²", p.rotational_unit_inertia);
}

#[derive(Serialize)]
struct DemoReport {
    length: f64,
    lug_shift: rk_tree::MountShift,
    summary: SubtreeSummary,
    motor_configuration: String,
    mass_label: String,
    modification_id: u64,
}

fn cmd_demo(
    format: Format,
    lug_angle: f64,
    motor: Option<String>,
    delay: Option<f64>,
) -> CliResult<()> {
    let mut rocket = Rocket::new();

    let lug = rocket.batch(|r| -> CliResult<_> {
        let stage = r.add_child(r.root(), Component::stage().named("Sustainer"))?;
        r.add_child(
            stage,
            Component::nose_cone().with_profile(Profile::Ellipsoid {
                fore: 0.0,
                aft: 0.025,
            }),
        )?;
        let body = r.add_child(stage, Component::body_tube().with_length(0.4))?;
        let lug = r.add_child(body, Component::launch_lug())?;
        r.modify(lug, |c| {
            c.launch_lug_mut()
                .and_then(|l| l.set_radial_direction(lug_angle.to_radians()))
        })?;
        let mount = r.add_child(
            body,
            Component::inner_tube().with_position(RelativePosition::Bottom, 0.0),
        )?;

        if let Some(designation) = &motor {
            let slot = MotorSlot {
                motor: Motor::new("", designation.as_str()),
                delay: delay.map_or(MotorDelay::Plugged, MotorDelay::Seconds),
            };
            let config = r.default_configuration().motor_config().clone();
            r.modify(mount, |c| c.set_motor(config, Some(slot)))?;
        }
        Ok(lug)
    })?;
    info!(components = rocket.tree().len(), "demo rocket built");

    let config = rocket.default_configuration().motor_config().clone();
    let report = DemoReport {
        length: rocket.length(),
        lug_shift: rocket.mount_shift(lug)?,
        summary: rocket.subtree_summary(rocket.root())?,
        motor_configuration: rocket.motor_config_description(&config)?,
        mass_label: mass_summary_label(rocket.has_active_motors()).to_owned(),
        modification_id: rocket.modification_id().get(),
    };

    match format {
        Format::Yaml => print!("{}", serde_yaml::to_string(&report)?),
        Format::Text => {
            println!("Rocket length: {:.3} m", report.length);
            println!(
                "Launch lug offset: y = {:.4} m, z = {:.4} m",
                report.lug_shift.y, report.lug_shift.z
            );
            println!("Motors: {}", report.motor_configuration);
            println!(
                "{}: {:.2} g",
                report.mass_label,
                report.summary.mass() * 1000.0
            );
            println!("  CG:            {:.4} m", report.summary.cg.x);
            println!("  Volume:        {:.4} cm³", report.summary.volume * 1e6);
            println!("  Wetted area:   {:.4} cm²", report.summary.wetted_area * 1e4);
            println!(
                "  Inertia (long / rot): {:.6e} / {:.6e} kg·m²",
                report.summary.longitudinal_inertia, report.summary.rotational_inertia
            );
            println!("✓ Modification ID: {}", report.modification_id);
        }
    }
    Ok(())
}
