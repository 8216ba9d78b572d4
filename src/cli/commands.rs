use crate::enrich::{EnrichDepth, EnrichmentFlag};
use crate::stack::Dimension;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Seed-deterministic project generator
#[derive(Parser, Debug)]
#[command(
    name = "upg",
    about = "Seed-deterministic tech stack resolution and project synthesis",
    version,
    author,
    long_about = "upg turns an integer seed into a complete, internally consistent software \
                  project. The same seed and options always produce byte-identical files. \
                  Existing projects can be inferred and enriched with CI, tests, linting, \
                  production packaging and docs."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a project from a seed",
        long_about = "Resolves a tech stack from the seed and any pinned dimensions, then \
                      renders the project files.\n\n\
                      Examples:\n  \
                      upg generate 82910\n  \
                      upg generate 82910 --archetype backend --language rust\n  \
                      upg generate 7 --enrich --depth full --output ./out/7\n  \
                      upg generate 7 --enrich --without docs --format json"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Infer the tech stack of an existing project",
        long_about = "Reads manifests and file layout to guess each stack dimension with a \
                      confidence score. No randomness is involved.\n\n\
                      Examples:\n  \
                      upg infer\n  \
                      upg infer /path/to/project --format json"
    )]
    Infer(InferArgs),

    #[command(
        about = "Enrich an existing project",
        long_about = "Infers the stack of a project on disk and applies the enrichment \
                      strategies selected by depth and flags.\n\n\
                      Examples:\n  \
                      upg enrich ./my-app --seed 5\n  \
                      upg enrich ./my-app --seed 5 --depth minimal --with tests --dry-run"
    )]
    Enrich(EnrichArgs),

    #[command(
        about = "Generate a range of seeds into a registry manifest",
        long_about = "Generates seeds in parallel. A failing seed is logged and skipped; \
                      successful seeds are merged into the registry manifest by seed.\n\n\
                      Examples:\n  \
                      upg sweep --start 1 --count 100\n  \
                      upg sweep --count 500 --concurrency 16 --registry manifests/generated.json"
    )]
    Sweep(SweepArgs),
}

/// One optional flag per stack dimension. Values are validated later so
/// typos can get a suggestion.
#[derive(Args, Debug, Clone, Default)]
pub struct StackOverrideArgs {
    #[arg(long, value_name = "ID")]
    pub archetype: Option<String>,
    #[arg(long, value_name = "ID")]
    pub language: Option<String>,
    #[arg(long, value_name = "ID")]
    pub runtime: Option<String>,
    #[arg(long, value_name = "ID")]
    pub framework: Option<String>,
    #[arg(long, value_name = "ID")]
    pub database: Option<String>,
    #[arg(long, value_name = "ID")]
    pub orm: Option<String>,
    #[arg(long, value_name = "ID")]
    pub transport: Option<String>,
    #[arg(long, value_name = "ID")]
    pub packaging: Option<String>,
    #[arg(long, value_name = "ID")]
    pub cicd: Option<String>,
    #[arg(long, value_name = "ID")]
    pub build_tool: Option<String>,
    #[arg(long, value_name = "ID")]
    pub styling: Option<String>,
    #[arg(long, value_name = "ID")]
    pub testing: Option<String>,
}

impl StackOverrideArgs {
    /// The pinned dimensions in resolution order.
    pub fn pinned(&self) -> Vec<(Dimension, &str)> {
        let slots = [
            (Dimension::Archetype, &self.archetype),
            (Dimension::Language, &self.language),
            (Dimension::Runtime, &self.runtime),
            (Dimension::Framework, &self.framework),
            (Dimension::Database, &self.database),
            (Dimension::Orm, &self.orm),
            (Dimension::Transport, &self.transport),
            (Dimension::Packaging, &self.packaging),
            (Dimension::Cicd, &self.cicd),
            (Dimension::BuildTool, &self.build_tool),
            (Dimension::Styling, &self.styling),
            (Dimension::Testing, &self.testing),
        ];
        slots
            .into_iter()
            .filter_map(|(dim, value)| value.as_deref().map(|v| (dim, v)))
            .collect()
    }
}

#[derive(Args, Debug, Clone)]
pub struct EnrichmentArgs {
    #[arg(
        long,
        value_name = "DEPTH",
        value_parser = parse_depth,
        help = "Enrichment preset: minimal, standard or full (defaults to UPG_ENRICH_DEPTH)"
    )]
    pub depth: Option<EnrichDepth>,

    #[arg(
        long = "with",
        value_name = "FLAG",
        value_parser = parse_flag,
        help = "Turn an enrichment on (repeatable), e.g. release, fill-logic"
    )]
    pub with: Vec<EnrichmentFlag>,

    #[arg(
        long = "without",
        value_name = "FLAG",
        value_parser = parse_flag,
        help = "Turn an enrichment off (repeatable)"
    )]
    pub without: Vec<EnrichmentFlag>,
}

impl EnrichmentArgs {
    /// `--with` first, then `--without`, so an explicit off wins.
    pub fn overrides(&self) -> Vec<(EnrichmentFlag, bool)> {
        self.with
            .iter()
            .map(|f| (*f, true))
            .chain(self.without.iter().map(|f| (*f, false)))
            .collect()
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "SEED", help = "Integer seed")]
    pub seed: u64,

    #[command(flatten)]
    pub stack: StackOverrideArgs,

    #[arg(long, help = "Run the enrichment pass after generation")]
    pub enrich: bool,

    #[command(flatten)]
    pub enrichment: EnrichmentArgs,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write files under DIR (defaults to UPG_OUTPUT_DIR/<id>)"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Print the result without writing files")]
    pub dry_run: bool,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct InferArgs {
    #[arg(value_name = "PATH", help = "Project directory (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct EnrichArgs {
    #[arg(value_name = "PATH", help = "Project directory")]
    pub path: PathBuf,

    #[arg(long, default_value = "0", help = "Seed for enrichment draws")]
    pub seed: u64,

    #[command(flatten)]
    pub enrichment: EnrichmentArgs,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write the enriched project under DIR instead of in place"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Print the result without writing files")]
    pub dry_run: bool,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    #[arg(long, default_value = "1", help = "First seed")]
    pub start: u64,

    #[arg(long, default_value = "10", help = "Number of seeds")]
    pub count: u64,

    #[arg(
        short = 'j',
        long,
        value_name = "N",
        help = "Seeds generated in parallel (defaults to UPG_SWEEP_CONCURRENCY)"
    )]
    pub concurrency: Option<usize>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Registry manifest to merge into and save"
    )]
    pub registry: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_depth(s: &str) -> Result<EnrichDepth, String> {
    s.parse()
}

fn parse_flag(s: &str) -> Result<EnrichmentFlag, String> {
    EnrichmentFlag::from_name(s).ok_or_else(|| {
        let valid: Vec<&str> = EnrichmentFlag::ALL.iter().map(|f| f.as_str()).collect();
        format!(
            "Invalid enrichment flag: {}. Valid options: {}",
            s,
            valid.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let args = CliArgs::parse_from(["upg", "generate", "82910"]);
        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(generate.seed, 82910);
                assert!(generate.stack.pinned().is_empty());
                assert!(!generate.enrich);
                assert!(generate.enrichment.depth.is_none());
                assert!(!generate.dry_run);
                assert_eq!(generate.format, OutputFormatArg::Human);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_with_overrides() {
        let args = CliArgs::parse_from([
            "upg",
            "generate",
            "82910",
            "--archetype",
            "backend",
            "--language",
            "rust",
            "--build-tool",
            "cargo",
        ]);
        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(
                    generate.stack.pinned(),
                    vec![
                        (Dimension::Archetype, "backend"),
                        (Dimension::Language, "rust"),
                        (Dimension::BuildTool, "cargo"),
                    ]
                );
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_with_enrichment() {
        let args = CliArgs::parse_from([
            "upg",
            "generate",
            "7",
            "--enrich",
            "--depth",
            "minimal",
            "--with",
            "fill-logic",
            "--without",
            "cicd",
            "--format",
            "json",
        ]);
        match args.command {
            Commands::Generate(generate) => {
                assert!(generate.enrich);
                assert_eq!(generate.enrichment.depth, Some(EnrichDepth::Minimal));
                assert_eq!(
                    generate.enrichment.overrides(),
                    vec![
                        (EnrichmentFlag::FillLogic, true),
                        (EnrichmentFlag::Cicd, false)
                    ]
                );
                assert_eq!(generate.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_invalid_enrichment_flag_rejected() {
        let result = CliArgs::try_parse_from(["upg", "generate", "1", "--with", "telemetry"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_infer_defaults_to_cwd() {
        let args = CliArgs::parse_from(["upg", "infer"]);
        match args.command {
            Commands::Infer(infer) => assert!(infer.path.is_none()),
            _ => panic!("Expected Infer command"),
        }
    }

    #[test]
    fn test_enrich_args() {
        let args = CliArgs::parse_from(["upg", "enrich", "/tmp/app", "--seed", "5", "--dry-run"]);
        match args.command {
            Commands::Enrich(enrich) => {
                assert_eq!(enrich.path, PathBuf::from("/tmp/app"));
                assert_eq!(enrich.seed, 5);
                assert!(enrich.dry_run);
                assert!(enrich.output.is_none());
            }
            _ => panic!("Expected Enrich command"),
        }
    }

    #[test]
    fn test_sweep_defaults() {
        let args = CliArgs::parse_from(["upg", "sweep"]);
        match args.command {
            Commands::Sweep(sweep) => {
                assert_eq!(sweep.start, 1);
                assert_eq!(sweep.count, 10);
                assert!(sweep.concurrency.is_none());
                assert!(sweep.registry.is_none());
            }
            _ => panic!("Expected Sweep command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["upg", "-v", "infer"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["upg", "--log-level", "debug", "sweep"]);
        assert_eq!(args.log_level, Some("debug".to_string()));

        assert!(CliArgs::try_parse_from(["upg", "-v", "-q", "infer"]).is_err());
    }
}
