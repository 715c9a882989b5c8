//! Command implementations

pub mod completions;
pub mod configure;
pub mod print;

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::ProjectArgs;
use prebuild::core::{find_manifest, CompilerInfo};
use prebuild::ops::ConfigureOptions;
use prebuild::util::fs::absolute;

/// Turn the shared command-line inputs into options for a configuration pass.
pub fn configure_options(
    args: ProjectArgs,
    output_file: Option<PathBuf>,
) -> Result<ConfigureOptions> {
    let source_dir = match args.source_dir {
        Some(dir) => absolute(&dir)?,
        None => absolute(&std::env::current_dir()?)?,
    };

    let build_dir = if args.build_dir.is_absolute() {
        args.build_dir
    } else {
        source_dir.join(args.build_dir)
    };

    let manifest_path = match args.manifest {
        Some(path) => absolute(&path)?,
        None => match find_manifest(&source_dir) {
            Some(path) => path,
            None => bail!("could not find Prebuild.toml in {}", source_dir.display()),
        },
    };

    let output_file = output_file.map(|p| absolute(&p)).transpose()?;

    Ok(ConfigureOptions {
        manifest_path,
        source_dir,
        build_dir,
        output_file,
        platform: args.platform,
        debug: args.debug,
        release: args.release,
        modules: args.modules,
        params: args.params.into_iter().collect(),
        compiler: CompilerInfo::new(
            args.compiler_id,
            args.compiler_frontend,
            args.compiler_version,
        ),
    })
}
