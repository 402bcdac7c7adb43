//! Show command implementation

use colored::Colorize;

use super::{ExtensionDetails, print_json};
use crate::context::Context;
use crate::error::Result;

/// Run the show command
pub fn run_show(ctx: &Context, key: &str, json: bool) -> Result<()> {
    let extension = ctx.extension(key)?;
    let details = ExtensionDetails::of(extension.as_ref())?;

    if json {
        return print_json(&details);
    }

    let summary = &details.summary;
    println!("{}", summary.name.bold());
    println!();
    println!("{}:          {}", "Key".dimmed(), summary.key.green());
    if let Some(description) = &summary.description {
        println!("{}:  {}", "Description".dimmed(), description);
    }
    let scope = if summary.generic {
        "generic".to_string()
    } else {
        summary.document_types.join(", ")
    };
    println!("{}:    {}", "Applies to".dimmed(), scope.cyan());
    println!();

    println!("{}:", "Options".bold());
    if details.options.is_empty() {
        println!("  {} (not configurable)", "None".dimmed());
        return Ok(());
    }
    for option in &details.options {
        let value = option.value.as_deref().unwrap_or("<unset>");
        let default = option.default_value.as_deref().unwrap_or("<unset>");
        let bounds = match (&option.min, &option.max) {
            (Some(min), Some(max)) => format!(" [{min}..{max}]"),
            (Some(min), None) => format!(" [{min}..]"),
            (None, Some(max)) => format!(" [..{max}]"),
            (None, None) => String::new(),
        };
        println!(
            "  {:<14} {} {}",
            option.key.green(),
            value,
            format!("({}, default {}{})", option.type_name, default, bounds).dimmed()
        );
    }
    println!();
    println!("{}: {}", "Assignments".dimmed(), details.assignments);
    if ctx.preferences().get(&summary.key).is_some() {
        println!(
            "{}",
            format!("Stored in {}", ctx.preferences().path().display()).dimmed()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tempfile::TempDir;

    #[test]
    fn test_show_runs() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::load(&temp.path().join("preferences.toml")).unwrap();
        assert!(run_show(&ctx, "resolver.qualified", false).is_ok());
        assert!(run_show(&ctx, "resolver.identity", true).is_ok());
    }

    #[test]
    fn test_show_unknown_key() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::load(&temp.path().join("preferences.toml")).unwrap();
        assert!(matches!(
            run_show(&ctx, "resolver.nope", false),
            Err(CliError::Registry(ext_registry::Error::UnknownExtension(_)))
        ));
    }
}
