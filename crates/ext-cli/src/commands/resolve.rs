//! Resolve command implementation

use serde_json::json;

use super::print_json;
use crate::context::Context;
use crate::error::Result;

/// Run the resolve command
pub fn run_resolve(ctx: &Context, key: &str, element: &str, json: bool) -> Result<()> {
    let resolver = ctx.extension(key)?;
    let label = resolver.resolve(element);

    if json {
        return print_json(&json!({
            "key": key,
            "element": element,
            "label": label,
        }));
    }

    println!("{label}");
    Ok(())
}
