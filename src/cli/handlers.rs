//! Command handlers. Each returns a process exit code.

use super::commands::{
    EnrichArgs, EnrichmentArgs, GenerateArgs, InferArgs, StackOverrideArgs, SweepArgs,
};
use super::files::{load_project, write_project};
use super::output::OutputFormatter;
use crate::assembler::{GenerateOptions, GeneratedProject, ProjectAssembler};
use crate::config::UpgConfig;
use crate::enrich::{EnrichmentFlags, ProjectEnricher};
use crate::inference::StackInferrer;
use crate::registry::{RegistryEntry, RegistryManifest};
use crate::stack::{Dimension, PartialStack};
use crate::strategy::ProjectFiles;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.8;

pub async fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    report(run_generate(args, quiet).await)
}

pub async fn handle_infer(args: &InferArgs) -> i32 {
    report(run_infer(args))
}

pub async fn handle_enrich(args: &EnrichArgs, quiet: bool) -> i32 {
    report(run_enrich(args, quiet).await)
}

pub async fn handle_sweep(args: &SweepArgs) -> i32 {
    report(run_sweep(args).await)
}

fn report(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

fn load_config() -> Result<UpgConfig> {
    let config = UpgConfig::default();
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);
    Ok(config)
}

fn emit(rendered: String, quiet: bool) {
    if !quiet {
        println!("{rendered}");
    }
}

/// Parses pinned dimension values, suggesting the closest id on a typo.
pub fn parse_overrides(args: &StackOverrideArgs) -> Result<PartialStack> {
    let mut overrides = PartialStack::new();
    for (dimension, raw) in args.pinned() {
        match dimension.parse_value(raw) {
            Some(value) => overrides.set(value),
            None => anyhow::bail!("{}", unknown_value_message(dimension, raw)),
        }
    }
    Ok(overrides)
}

fn unknown_value_message(dimension: Dimension, raw: &str) -> String {
    let needle = raw.trim().to_lowercase();
    let best = dimension
        .values()
        .into_iter()
        .map(|v| (strsim::jaro_winkler(&needle, v.as_str()), v.as_str()))
        .max_by(|a, b| a.0.total_cmp(&b.0));

    match best {
        Some((score, candidate)) if score >= SUGGESTION_THRESHOLD => {
            format!("unknown {dimension} '{raw}', did you mean '{candidate}'?")
        }
        _ => {
            let valid: Vec<&str> = dimension.values().iter().map(|v| v.as_str()).collect();
            format!(
                "unknown {dimension} '{raw}', expected one of: {}",
                valid.join(", ")
            )
        }
    }
}

fn enrichment_flags(args: &EnrichmentArgs, config: &UpgConfig) -> Result<EnrichmentFlags> {
    let depth = match args.depth {
        Some(depth) => depth,
        None => config.depth()?,
    };
    Ok(EnrichmentFlags::with_overrides(depth, &args.overrides()))
}

async fn run_generate(args: &GenerateArgs, quiet: bool) -> Result<i32> {
    let config = load_config()?;
    let overrides = parse_overrides(&args.stack)?;
    let formatter = OutputFormatter::new(args.format.into());

    let project = ProjectAssembler::standard()
        .generate(args.seed, &GenerateOptions::with_overrides(overrides))
        .await?;
    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(&project.id));

    if args.enrich {
        let flags = enrichment_flags(&args.enrichment, &config)?;
        let enriched = ProjectEnricher::standard().enrich(&project, &flags).await?;
        if !args.dry_run {
            write_project(&dir, &enriched.project.files)?;
        }
        emit(formatter.format_enriched(&enriched)?, quiet);
    } else {
        if !args.dry_run {
            write_project(&dir, &project.files)?;
        }
        emit(formatter.format_project(&project)?, quiet);
    }
    Ok(0)
}

fn run_infer(args: &InferArgs) -> Result<i32> {
    let root = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let files = load_project(&root)?;
    if files.is_empty() {
        warn!(path = %root.display(), "No readable files found");
    }

    let inferred = StackInferrer::default().infer(&files);
    println!(
        "{}",
        OutputFormatter::new(args.format.into()).format_inferred(&inferred)?
    );
    Ok(0)
}

fn project_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string())
}

async fn run_enrich(args: &EnrichArgs, quiet: bool) -> Result<i32> {
    let config = load_config()?;
    let flags = enrichment_flags(&args.enrichment, &config)?;

    let files = load_project(&args.path)?;
    let inferred = StackInferrer::default().infer(&files);
    info!(stack = %inferred.stack, "Inferred stack for enrichment");

    let project =
        GeneratedProject::from_existing(args.seed, project_name(&args.path), files, inferred.stack);
    let enriched = ProjectEnricher::standard().enrich(&project, &flags).await?;

    if !args.dry_run {
        match &args.output {
            Some(dir) => write_project(dir, &enriched.project.files)?,
            None => {
                let changed: ProjectFiles = enriched
                    .files_added
                    .iter()
                    .chain(&enriched.files_modified)
                    .filter_map(|path| {
                        enriched
                            .project
                            .files
                            .get(path)
                            .map(|content| (path.clone(), content.clone()))
                    })
                    .collect();
                write_project(&args.path, &changed)?;
            }
        }
    }

    emit(
        OutputFormatter::new(args.format.into()).format_enriched(&enriched)?,
        quiet,
    );
    Ok(0)
}

async fn run_sweep(args: &SweepArgs) -> Result<i32> {
    let config = load_config()?;
    let concurrency = args.concurrency.unwrap_or(config.sweep_concurrency).max(1);
    let end = args
        .start
        .checked_add(args.count)
        .context("Seed range overflows u64")?;

    info!(start = args.start, count = args.count, concurrency, "Starting sweep");

    let assembler = ProjectAssembler::standard();
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();
    for seed in args.start..end {
        let assembler = assembler.clone();
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            (seed, assembler.generate(seed, &GenerateOptions::default()).await)
        });
    }

    let validated_at = Utc::now();
    let mut entries = Vec::new();
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(project))) => entries.push(RegistryEntry::from_project(&project, validated_at)),
            Ok((seed, Err(e))) => {
                failures += 1;
                warn!(seed, error = %e, "Seed failed, continuing sweep");
            }
            Err(e) => {
                failures += 1;
                warn!(error = %e, "Sweep task panicked");
            }
        }
    }

    let mut manifest = match &args.registry {
        Some(path) => RegistryManifest::load_or_new(path, validated_at)?,
        None => RegistryManifest::new(validated_at),
    };
    let generated = entries.len();
    manifest.merge(entries, validated_at);
    if let Some(path) = &args.registry {
        manifest.save(path)?;
    }

    info!(generated, failures, total = manifest.total_entries, "Sweep completed");
    println!(
        "{}",
        OutputFormatter::new(args.format.into()).format_manifest(&manifest)?
    );

    Ok(if generated == 0 && failures > 0 { 1 } else { 0 })
}
