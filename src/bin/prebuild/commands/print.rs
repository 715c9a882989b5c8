//! `prebuild print` command
//!
//! Renders the CMake file for the given inputs to stdout.

use anyhow::Result;

use crate::cli::PrintArgs;
use prebuild::core::Manifest;
use prebuild::ops::plan;

pub fn execute(args: PrintArgs) -> Result<()> {
    let opts = super::configure_options(args.project, None)?;
    let manifest = Manifest::load(&opts.manifest_path)?;

    let plan = plan(&manifest, &opts)?;
    print!("{}", plan.cmake.render()?);

    Ok(())
}
