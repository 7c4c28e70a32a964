//! Implementation of the `brevity list` command.

use brevity_core::application::{GeneratorOptions, SectionInfo};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let library = config.library(args.library.lib)?;
    let service = super::service(GeneratorOptions {
        library: library.clone(),
        render_only: true,
    });
    let sections = service.list_sections()?;

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Sections in {}:", library.display()))?;
            for section in &sections {
                output.print(&table_row(section))?;
            }
        }
        ListFormat::List => {
            for section in &sections {
                output.print(&section.kind)?;
            }
        }
        ListFormat::Json => output.json(&sections)?,
    }
    Ok(())
}

fn table_row(section: &SectionInfo) -> String {
    let variations = if section.variations.is_empty() {
        "-".to_string()
    } else {
        section.variations.join(", ")
    };
    let mut row = format!("  {:<16} variations: {variations}", section.kind);
    if !section.has_generator {
        row.push_str("  (macros only)");
    }
    if !section.macros.is_empty() {
        row.push_str(&format!("  macros: {}", section.macros.join(", ")));
    }
    row
}
