use anyhow::Context;
use axisfix::conversion::ConversionOptions;
use axisfix::pipeline::ImportPipeline;
use axisfix::settings::CliArgs;
use axisfix_scene::document::reader::SceneReader;
use axisfix_scene::document::writer::SceneWriter;
use clap::Parser;
use log::{info, trace, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    #[cfg(feature = "tracy")]
    tracy_client::Client::start();

    let args = CliArgs::parse();
    info!(
        "axisfix {}/{}{}",
        env!("VERGEN_GIT_BRANCH"),
        env!("VERGEN_GIT_SHA"),
        if option_env!("VERGEN_GIT_DIRTY") == Some("true") { " (dirty)" } else { "" }
    );
    trace!("Starting with args: {:?}", args);

    let input = File::open(&args.input).with_context(|| format!("Failed to open {}", args.input.display()))?;
    let mut scene = SceneReader::read_scene(BufReader::new(input))
        .with_context(|| format!("Failed to read scene {}", args.input.display()))?;

    let options = ConversionOptions::from(&args);
    let mut report = ImportPipeline::new(options).run(&mut scene);

    let warnings = report.log.warnings().count();
    if !report.log.is_empty() {
        info!("{}", report.log.flush());
    }
    if warnings > 0 {
        warn!("{} problems during conversion, see above", warnings);
    }

    let output_path = args.output_path();
    let output = File::create(output_path).with_context(|| format!("Failed to create {}", output_path.display()))?;
    SceneWriter::write_scene(BufWriter::new(output), &scene)
        .with_context(|| format!("Failed to write scene {}", output_path.display()))?;

    info!("Wrote {}", output_path.display());
    Ok(())
}
