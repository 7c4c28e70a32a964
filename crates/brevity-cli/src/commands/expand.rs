//! Implementation of the `brevity expand` command.

use brevity_core::application::GeneratorOptions;
use serde_json::json;

use crate::{
    cli::{ExpandArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Print every project after macro expansion and merge, in brief syntax.
pub fn execute(args: ExpandArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = super::service(GeneratorOptions {
        library: config.library(args.library.lib)?,
        render_only: true,
    });
    let mut spec = service.read_spec(&args.spec)?;
    let rounds = service.expand(&mut spec)?;

    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "rounds": rounds,
            "document": spec.encode(),
        }))?;
    } else {
        output.raw(&spec.encode())?;
    }
    Ok(())
}
