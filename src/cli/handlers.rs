use super::commands::{CheckArgs, RenderArgs, SourceArgs, UpArgs};
use super::output::OutputFormatter;
use crate::config::{ConfigSource, EnvSource, LaunchProfileSource, LayeredSource};
use crate::provisioner::Provisioner;
use crate::runner::{SystemCommandRunner, SystemResourceOpener};
use crate::sink::MemorySink;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Launch profile (when given) layered over the process environment
pub fn build_source(args: &SourceArgs) -> Result<Box<dyn ConfigSource>> {
    let mut source = LayeredSource::new();

    if let Some(path) = &args.launch_profile {
        let profile = LaunchProfileSource::from_file(path, args.profile.as_deref())
            .with_context(|| format!("Failed to load launch profile {}", path.display()))?;
        debug!(profile = profile.profile_name(), "Using launch profile");
        source = source.layer(profile);
    }

    Ok(Box::new(source.layer(EnvSource::new())))
}

fn system_provisioner(runtime: &str) -> Provisioner<SystemCommandRunner, SystemResourceOpener> {
    Provisioner::new(SystemCommandRunner::new(), SystemResourceOpener::new()).with_runtime(runtime)
}

pub fn handle_up(args: &UpArgs) -> i32 {
    match run_up(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run_up(args: &UpArgs) -> Result<()> {
    let source = build_source(&args.source)?;
    let mut sink = MemorySink::new();

    let outcome = system_provisioner(&args.runtime)
        .provision(source.as_ref(), &mut sink)
        .context("Local SQL provisioning failed")?;

    let formatter = OutputFormatter::new(args.format.into());
    if let Some(output) = formatter.format_outcome(&outcome, &sink)? {
        println!("{}", output);
    }
    Ok(())
}

pub fn handle_render(args: &RenderArgs) -> i32 {
    match run_render(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let source = build_source(&args.source)?;

    match system_provisioner("docker")
        .render_descriptor(source.as_ref())
        .context("Failed to render compose descriptor")?
    {
        Some(rendered) => {
            info!(path = %rendered.path.display(), "Descriptor rendered");
            println!("{}", OutputFormatter::new(super::OutputFormat::Human).format_rendered(&rendered));
        }
        None => {
            println!("Local Docker SQL is disabled (set Use_Local_Docker_SQL=true to enable)");
        }
    }
    Ok(())
}

pub fn handle_check(args: &CheckArgs) -> i32 {
    match system_provisioner(&args.runtime).check_runtime() {
        Ok(()) => {
            println!("{} is installed and running", args.runtime);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
