use crate::cmd::build_registry;
use crate::config::{CatalogArgs, InspectConfig};
use crate::error::InspectError;

pub fn run(args: CatalogArgs) -> Result<(), InspectError> {
    let config = InspectConfig::load(&args.config)?;
    let registry = build_registry(&config.dispatch)?;
    let listing = if args.pretty {
        serde_json::to_string_pretty(registry.handlers())?
    } else {
        serde_json::to_string(registry.handlers())?
    };
    println!("{listing}");
    Ok(())
}
