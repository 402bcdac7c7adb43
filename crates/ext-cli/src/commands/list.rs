//! List and default-selection commands

use colored::Colorize;

use super::{ExtensionSummary, print_json, print_summary_line};
use crate::context::Context;
use crate::error::Result;

/// Run the list command
pub fn run_list(ctx: &Context, doc_types: &[String], json: bool) -> Result<()> {
    let extensions = if doc_types.is_empty() {
        ctx.manager().extensions()
    } else {
        ctx.manager().extensions_for(doc_types, true)
    };
    let summaries: Vec<ExtensionSummary> = extensions
        .iter()
        .map(|e| ExtensionSummary::of(e.as_ref()))
        .collect();

    if json {
        return print_json(&summaries);
    }

    if doc_types.is_empty() {
        println!("{}", "Available Extensions".bold());
    } else {
        println!(
            "{} {}",
            "Extensions for".bold(),
            doc_types.join(", ").cyan().bold()
        );
    }
    println!();

    if summaries.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for summary in &summaries {
        print_summary_line(summary);
    }

    println!();
    println!(
        "{} {} extensions. Use {} for details.",
        "Total:".dimmed(),
        summaries.len(),
        "ext show <key>".cyan()
    );
    Ok(())
}

/// Run the default command
pub fn run_default(ctx: &Context, doc_types: &[String], json: bool) -> Result<()> {
    let default = ctx.manager().default_extension(doc_types);
    let summary = default.as_ref().map(|e| ExtensionSummary::of(e.as_ref()));

    if json {
        return print_json(&summary);
    }

    match summary {
        Some(summary) => {
            println!(
                "{} {}",
                "Default for".bold(),
                doc_types.join(", ").cyan().bold()
            );
            print_summary_line(&summary);
        }
        None => println!(
            "{} No extension applies to {}",
            "warning:".yellow().bold(),
            doc_types.join(", ")
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> Context {
        Context::load(&temp.path().join("preferences.toml")).unwrap()
    }

    #[test]
    fn test_list_runs() {
        let temp = TempDir::new().unwrap();
        assert!(run_list(&context(&temp), &[], false).is_ok());
        assert!(run_list(&context(&temp), &["uml".to_string()], true).is_ok());
    }

    #[test]
    fn test_default_runs() {
        let temp = TempDir::new().unwrap();
        assert!(run_default(&context(&temp), &["ecore".to_string()], false).is_ok());
        assert!(run_default(&context(&temp), &["ecore".to_string()], true).is_ok());
    }
}
