//! `prebuild configure` command

use anyhow::Result;

use crate::cli::ConfigureArgs;
use prebuild::ops::configure;

pub fn execute(args: ConfigureArgs) -> Result<()> {
    let opts = super::configure_options(args.project, Some(args.output_file))?;

    let result = configure(&opts)?;

    if let Some(ref mod_json) = result.mod_json {
        tracing::debug!("wrote {}", mod_json.display());
    }

    eprintln!(
        "Config done in {:.3}s ({} modules)",
        result.elapsed.as_secs_f64(),
        result.plan.modules.len()
    );

    Ok(())
}
