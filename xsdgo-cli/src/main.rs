//! `xsdgo` command-line entry point.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use xsdgo_codegen::{
    CommandFormatter, ConflictPolicy, Formatter, Generator, GeneratorConfig, Passthrough,
};

/// Formatter run when none is given; generated code relies on it for imports.
const DEFAULT_FORMATTER: &str = "goimports";

/// CLI-side conflict policy with clap value parsing.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliConflictPolicy {
    KeepFirst,
    Reject,
}

impl From<CliConflictPolicy> for ConflictPolicy {
    fn from(policy: CliConflictPolicy) -> Self {
        match policy {
            CliConflictPolicy::KeepFirst => Self::KeepFirst,
            CliConflictPolicy::Reject => Self::Reject,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "xsdgo")]
#[command(about = "Generate Go structs with encoding/xml tags from an XSD schema")]
struct Cli {
    /// XSD schema to read.
    input: PathBuf,
    /// Write the generated code here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Go package name; omit to emit a fragment without package clause.
    #[arg(short, long, default_value = "")]
    package: String,
    /// Prefix prepended to every generated type name.
    #[arg(long, default_value = "")]
    prefix: String,
    /// Force generated type names to be exported.
    #[arg(short, long)]
    exported: bool,
    /// How to handle differently shaped elements sharing a name.
    #[arg(long, value_enum, default_value = "keep-first")]
    on_conflict: CliConflictPolicy,
    /// External formatter the output is piped through; it resolves imports.
    #[arg(long, default_value = DEFAULT_FORMATTER, conflicts_with = "no_format")]
    formatter: String,
    /// Write the generated code without running the formatter.
    #[arg(long)]
    no_format: bool,
}

impl Cli {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .package(self.package.as_str())
            .prefix(self.prefix.as_str())
            .exported(self.exported)
            .conflict_policy(self.on_conflict.into())
    }

    /// Command line of the formatter to run, if formatting is enabled.
    fn formatter_command(&self) -> Option<&str> {
        (!self.no_format).then_some(self.formatter.as_str())
    }

    fn formatter(&self) -> anyhow::Result<Box<dyn Formatter>> {
        match self.formatter_command() {
            Some(line) => {
                let formatter = CommandFormatter::from_command_line(line)
                    .context("--formatter must name a program")?;
                Ok(Box::new(formatter))
            }
            None => Ok(Box::new(Passthrough)),
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let tree = xsdgo_schema::parse_schema_file(&cli.input)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    let config = cli.config();
    let formatter = cli.formatter()?;
    let source = Generator::new(&tree, &config)
        .generate_with(&*formatter)
        .with_context(|| match cli.formatter_command() {
            Some(line) => format!(
                "code generation failed (output is piped through '{line}'; pass --no-format to skip it)"
            ),
            None => "code generation failed".to_string(),
        })?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &source)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => std::io::stdout()
            .lock()
            .write_all(source.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}
