//! Command implementations for ext-cli

pub mod configure;
pub mod list;
pub mod resolve;
pub mod show;

pub use configure::{run_reset, run_set};
pub use list::{run_default, run_list};
pub use resolve::run_resolve;
pub use show::run_show;

use colored::Colorize;
use ext_config::OptionInfo;
use ext_registry::Extension;
use serde::Serialize;

use crate::catalog::StringResolver;
use crate::error::Result;

/// JSON view of an extension's metadata.
#[derive(Debug, Serialize)]
pub struct ExtensionSummary {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub document_types: Vec<String>,
    pub generic: bool,
    pub configurable: bool,
}

impl ExtensionSummary {
    pub fn of(extension: &dyn StringResolver) -> Self {
        Self {
            key: extension.key().to_string(),
            name: extension.name().to_string(),
            description: extension.description().map(str::to_string),
            document_types: extension.document_types().to_vec(),
            generic: extension.is_generic(),
            configurable: extension.configuration().is_configurable(),
        }
    }
}

/// JSON view of an extension with its options.
#[derive(Debug, Serialize)]
pub struct ExtensionDetails {
    #[serde(flatten)]
    pub summary: ExtensionSummary,
    pub options: Vec<OptionInfo>,
    pub assignments: String,
}

impl ExtensionDetails {
    pub fn of(extension: &dyn StringResolver) -> Result<Self> {
        let configuration = extension.configuration();
        Ok(Self {
            summary: ExtensionSummary::of(extension),
            options: configuration.options()?,
            assignments: configuration.export_assignments()?,
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line listing entry.
fn print_summary_line(summary: &ExtensionSummary) {
    let scope = if summary.generic {
        "generic".dimmed().to_string()
    } else {
        summary.document_types.join(", ").cyan().to_string()
    };
    println!("  {:<20} {} ({})", summary.key.green(), summary.name, scope);
}
