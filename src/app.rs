//! Application orchestrator.
//! Loads/merges config, initializes logging, validates the root, runs the
//! normalization pass and writes the manifest.

use anyhow::Result;
use tracing::{debug, error, info};
use webnorm::output as out;
use webnorm::{
    build_manifest, load_config_from_xml_path, normalize_tree, validate_and_normalize,
    write_manifest, Config, WebnormError,
};

use crate::logging::init_tracing;
use webnorm::cli::Args;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Build config: XML file (only when named explicitly), then CLI overrides.
    let mut cfg = match args.config.as_deref() {
        Some(path) => load_config_from_xml_path(path).inspect_err(|e| {
            out::print_error(&format!("{e:#}"));
        })?,
        None => Config::default(),
    };
    args.apply_overrides(&mut cfg);

    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    debug!("Starting webnorm: {:?}", args);

    let result = execute(&mut cfg);
    if let Err(e) = &result {
        report(e);
    }

    // Flush buffered file logs before exit.
    drop(guard);
    result
}

fn execute(cfg: &mut Config) -> Result<()> {
    validate_and_normalize(cfg)?;

    if cfg.normalize {
        let summary = normalize_tree(cfg)?;
        out::print_summary(&summary, cfg.dry_run);
    } else {
        info!("Normalization skipped");
    }

    if !cfg.manifest {
        info!("Manifest skipped");
        return Ok(());
    }
    let manifest = build_manifest(cfg)?;
    if cfg.dry_run {
        out::print_info(&format!(
            "Dry-run: would write {} image(s) to '{}'",
            manifest.images.len(),
            cfg.output.display()
        ));
        return Ok(());
    }
    write_manifest(&cfg.output, &manifest)?;
    out::print_user(&format!(
        "Wrote {} image(s) to {}",
        manifest.images.len(),
        cfg.output.display()
    ));
    Ok(())
}

fn report(e: &anyhow::Error) {
    if let Some(typed) = e.downcast_ref::<WebnormError>() {
        let (code, kind) = (typed.code(), typed.kind());
        match typed {
            WebnormError::RootInvalid(root) => {
                error!(code, kind, root = %root.display(), "Root directory invalid or unreadable")
            }
            WebnormError::ManifestWrite { path, reason } => {
                error!(code, kind, path = %path.display(), %reason, "Manifest not written")
            }
            _ => error!(code, kind, error = %typed, "Run failed"),
        }
    } else {
        error!(error = ?e, "Run failed");
    }
    out::print_error(&format!("{e:#}"));
}
