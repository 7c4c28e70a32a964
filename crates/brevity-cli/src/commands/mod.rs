//! Command handlers, one module per subcommand.

use brevity_adapters::{LocalFilesystem, ProcessRunner, handlebars_engines};
use brevity_core::application::{GenerateService, GeneratorOptions};

pub mod completions;
pub mod config;
pub mod expand;
pub mod generate;
pub mod init;
pub mod list;

/// Generate service wired to the local filesystem, real processes and handlebars.
fn service(options: GeneratorOptions) -> GenerateService {
    GenerateService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(ProcessRunner::new()),
        handlebars_engines(),
        options,
    )
}
