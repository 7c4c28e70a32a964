//! Implementation of the `brevity generate` command.
//!
//! Responsibility: resolve the library and render-only setting, call the
//! core generate service, and display the report. No business logic lives here.

use brevity_core::application::{GenerationReport, GeneratorOptions, Step};
use tracing::{debug, instrument};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(spec = %args.spec.display()))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let options = GeneratorOptions {
        library: config.library(args.library.lib)?,
        render_only: args.render || config.generate.render_only,
    };
    debug!(library = %options.library.display(), render_only = options.render_only, "generate");

    let service = super::service(options);
    let mut spec = service.read_spec(&args.spec)?;
    let report = service.generate(&mut spec, &args.destination)?;

    if output.format() == OutputFormat::Json {
        output.json(&report)?;
        return Ok(());
    }
    print_report(&report, &output)?;
    Ok(())
}

fn print_report(report: &GenerationReport, output: &OutputManager) -> std::io::Result<()> {
    for step in &report.steps {
        output.print(&describe(step))?;
    }
    output.success(&format!(
        "Generated {} project(s): {} ({} files)",
        report.projects.len(),
        report.projects.join(", "),
        report.files().count(),
    ))
}

fn describe(step: &Step) -> String {
    match step {
        Step::File { path, element, .. } => format!("  wrote  {} ({element})", path.display()),
        Step::Action {
            command,
            executed: true,
            ..
        } => format!("  ran    {}", command.join(" ")),
        Step::Action {
            command,
            executed: false,
            ..
        } => format!("  render {}", command.join(" ")),
    }
}
