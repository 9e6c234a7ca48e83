use crate::conversion::{ConversionOptions, DEFAULT_SNAP_EPSILON};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "axisfix")]
#[command(version = concat!(env!("VERGEN_GIT_BRANCH"), "/", env!("VERGEN_GIT_SHA")))]
#[command(about = "Rebases imported Z-up scenes into the Y-up, left-handed engine convention")]
pub struct CliArgs {
    /// Scene document to convert.
    pub input: PathBuf,

    /// Where to write the converted document, defaults to overwriting the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, env = "AXISFIX_NO_GEOMETRY_FIX")]
    pub no_geometry_fix: bool,

    #[arg(long, env = "AXISFIX_NO_ANIMATION_FIX")]
    pub no_animation_fix: bool,

    #[arg(long, env = "AXISFIX_NO_FLOAT_FIX")]
    pub no_float_fix: bool,

    #[arg(long, env = "AXISFIX_NO_OBJECT_COMMANDS")]
    pub no_object_commands: bool,

    /// Share one buffer between structurally identical meshes.
    #[arg(long, env = "AXISFIX_OPTIMIZE_INSTANCES")]
    pub optimize_instances: bool,

    /// Additionally turn the scene 180° around the up axis.
    #[arg(long, env = "AXISFIX_TURN_AROUND")]
    pub turn_around: bool,

    /// Treat the root as first-level object, even when it has no mesh.
    #[arg(long, env = "AXISFIX_FORCE_FIX_ROOT")]
    pub force_fix_root: bool,

    #[arg(long, env = "AXISFIX_SNAP_EPSILON", default_value_t = DEFAULT_SNAP_EPSILON, value_parser = parse_epsilon)]
    pub snap_epsilon: f32,
}

fn parse_epsilon(input: &str) -> Result<f32, String> {
    let epsilon = input
        .parse::<f32>()
        .map_err(|err| format!("{} is not a number: {}", input, err))?;

    if epsilon.is_finite() && epsilon >= 0.0 && epsilon < 0.5 {
        Ok(epsilon)
    } else {
        Err(format!("Snap epsilon has to be within [0, 0.5), got {}", epsilon))
    }
}

impl CliArgs {
    pub fn output_path(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.input)
    }
}

impl From<&CliArgs> for ConversionOptions {
    fn from(args: &CliArgs) -> Self {
        Self {
            geometry_fix: !args.no_geometry_fix,
            optimize_instances: args.optimize_instances,
            turn_around: args.turn_around,
            animation_fix: !args.no_animation_fix,
            float_fix: !args.no_float_fix,
            object_commands: !args.no_object_commands,
            force_fix_root: args.force_fix_root,
            snap_epsilon: args.snap_epsilon,
        }
    }
}
