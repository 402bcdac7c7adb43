//! Set and reset commands

use colored::Colorize;
use ext_config::assignment::parse_assignments;
use ext_registry::Extension;
use serde_json::json;

use super::print_json;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the set command
pub fn run_set(ctx: &mut Context, key: &str, assignments: &str, json: bool) -> Result<()> {
    let extension = ctx.extension(key)?;
    let configuration = extension.configuration();
    if !configuration.is_configurable() {
        return Err(CliError::user(format!("Extension '{key}' has no options")));
    }

    // Unknown keys are ignored on import; tell the user about them
    let known = configuration.option_keys()?;
    let ignored: Vec<&str> = parse_assignments(assignments)
        .into_iter()
        .map(|(option, _)| option)
        .filter(|option| !known.iter().any(|k| k == option))
        .collect();

    configuration.import_assignments(assignments)?;
    ctx.persist(extension.as_ref())?;
    let stored = configuration.export_assignments()?;
    tracing::debug!(key, assignments = %stored, "Stored extension configuration");

    if json {
        return print_json(&json!({
            "key": extension.key(),
            "assignments": stored,
            "ignored": ignored,
        }));
    }

    for option in &ignored {
        eprintln!(
            "{} Unknown option '{}' ignored",
            "warning:".yellow().bold(),
            option
        );
    }
    println!("{} {}", "Updated".green().bold(), extension.key().cyan());
    println!("  {}", stored);
    Ok(())
}

/// Run the reset command
pub fn run_reset(ctx: &mut Context, key: &str, json: bool) -> Result<()> {
    let extension = ctx.extension(key)?;
    let configuration = extension.configuration();
    configuration.reset_to_defaults()?;
    let removed = ctx.forget(extension.key())?;
    let assignments = configuration.export_assignments()?;

    if json {
        return print_json(&json!({
            "key": extension.key(),
            "assignments": assignments,
            "removed_stored": removed,
        }));
    }

    println!("{} {}", "Reset".green().bold(), extension.key().cyan());
    if !assignments.is_empty() {
        println!("  {}", assignments);
    }
    if !removed {
        println!("  {}", "(nothing was stored)".dimmed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ext_config::PreferenceStore;
    use tempfile::TempDir;

    #[test]
    fn test_set_persists_assignments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.toml");
        let mut ctx = Context::load(&path).unwrap();

        run_set(&mut ctx, "resolver.uml", "stereotype=block;bogus=1", false).unwrap();

        let store = PreferenceStore::load(&path).unwrap();
        assert_eq!(
            store.get("resolver.uml"),
            Some("stereotype=block;max_length=60;uppercase=false")
        );
        let uml = ctx.extension("resolver.uml").unwrap();
        assert_eq!(uml.resolve("sys::Pump"), "\u{ab}block\u{bb} Pump");
    }

    #[test]
    fn test_set_rejects_non_configurable() {
        let temp = TempDir::new().unwrap();
        let mut ctx = Context::load(&temp.path().join("preferences.toml")).unwrap();
        let err = run_set(&mut ctx, "resolver.identity", "a=b", false).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn test_reset_drops_stored_configuration() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.toml");
        let mut ctx = Context::load(&path).unwrap();

        run_set(&mut ctx, "resolver.simple", "uppercase=true", true).unwrap();
        run_reset(&mut ctx, "resolver.simple", false).unwrap();

        assert!(PreferenceStore::load(&path).unwrap().get("resolver.simple").is_none());
        let simple = ctx.extension("resolver.simple").unwrap();
        assert_eq!(simple.resolve("a::b"), "b");
    }

    #[test]
    fn test_reset_identity_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut ctx = Context::load(&temp.path().join("preferences.toml")).unwrap();
        assert!(run_reset(&mut ctx, "resolver.identity", true).is_ok());
    }
}
