//! dynasql: render and check XML statement documents.
//!
//! # Usage
//!
//! ```bash
//! # Render a document as SQL Server SQL
//! dynasql render query.xml --dialect sqlserver
//!
//! # Write, re-read and compare a document
//! dynasql roundtrip query.xml
//!
//! # What each dialect can express
//! dynasql dialects
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dynasql::ast::{Clause, Operator, Param};
use dynasql::transpiler::traits::ProcedureStyle;
use dynasql::xml::{from_xml, to_xml};
use dynasql::{Dialect, DynaConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dynasql")]
#[command(version)]
#[command(about = "Render XML statement documents as SQL for any dialect", long_about = None)]
#[command(after_help = "EXAMPLES:
    dynasql render query.xml --dialect mysql
    dynasql render schema.xml --pretty --format json
    dynasql roundtrip script.xml --dialect sqlserver")]
struct Cli {
    /// Configuration file (defaults to the per-user dynasql/config.toml)
    #[arg(long, global = true, env = "DYNASQL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Sql,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Read an XML document and print its SQL
    Render {
        /// The XML statement document
        file: PathBuf,

        /// Target dialect (postgres, mysql, sqlite, sqlserver, oracle)
        #[arg(short, long)]
        dialect: Option<String>,

        /// One clause per line
        #[arg(short, long)]
        pretty: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "sql")]
        format: OutputFormat,
    },
    /// Re-write a document as XML, read it back and compare the SQL
    Roundtrip {
        /// The XML statement document
        file: PathBuf,

        /// Target dialect used for the comparison
        #[arg(short, long)]
        dialect: Option<String>,
    },
    /// List dialects and what they support
    Dialects,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dynasql=debug" } else { "dynasql=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(false)` when the command ran but its check failed.
fn run(cli: &Cli) -> Result<bool> {
    let mut config = DynaConfig::resolve(cli.config.as_deref()).context("loading configuration")?;

    match &cli.command {
        Commands::Render {
            file,
            dialect,
            pretty,
            format,
        } => {
            apply_dialect(&mut config, dialect.as_deref())?;
            config.pretty |= *pretty;
            render_file(file, &config, *format)?;
            Ok(true)
        }
        Commands::Roundtrip { file, dialect } => {
            apply_dialect(&mut config, dialect.as_deref())?;
            roundtrip_file(file, &config)
        }
        Commands::Dialects => {
            show_dialects();
            Ok(true)
        }
    }
}

fn apply_dialect(config: &mut DynaConfig, dialect: Option<&str>) -> Result<()> {
    if let Some(name) = dialect {
        config.dialect = name.parse()?;
    }
    Ok(())
}

fn read_document(path: &Path, config: &DynaConfig) -> Result<Box<dyn Clause>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut ctx = config.xml_context();
    let clause = from_xml(&text, &mut ctx)?
        .ok_or_else(|| anyhow!("{}: the root element is not a known clause", path.display()))?;
    debug!(root = clause.xml_element_name(), "read document");
    Ok(clause)
}

fn render(clause: &dyn Clause, config: &DynaConfig) -> Result<(String, Vec<Param>)> {
    let mut builder = config.sql_builder();
    if !clause.build_statement(&mut builder)? {
        return Err(anyhow!("the document contains nothing to render"));
    }
    let parameters = builder.parameters().to_vec();
    Ok((builder.finish(), parameters))
}

fn render_file(path: &Path, config: &DynaConfig, format: OutputFormat) -> Result<()> {
    let clause = read_document(path, config)?;
    let (sql, parameters) = render(clause.as_ref(), config)?;
    info!(dialect = %config.dialect, parameters = parameters.len(), "rendered");

    match format {
        OutputFormat::Sql => println!("{}", sql),
        OutputFormat::Json => {
            let parameters: Vec<serde_json::Value> = parameters
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name(),
                        "type": p.db_type().as_str(),
                        "direction": p.direction().as_str(),
                        "value": p.value().map(|v| v.to_xml_text()),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "dialect": config.dialect.key(),
                "sql": sql,
                "parameters": parameters,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn roundtrip_file(path: &Path, config: &DynaConfig) -> Result<bool> {
    let original = read_document(path, config)?;

    let mut ctx = config.xml_context();
    let xml = to_xml(original.as_ref(), &mut ctx)?;
    let reread = from_xml(&xml, &mut ctx)?
        .ok_or_else(|| anyhow!("the re-written document could not be read back"))?;

    let (before, _) = render(original.as_ref(), config)?;
    let (after, _) = render(reread.as_ref(), config)?;

    if before == after {
        println!("{} {}", "✓".green().bold(), "SQL is identical after the round trip".green());
        if config.pretty {
            println!("{}", before.dimmed());
        }
        Ok(true)
    } else {
        println!("{} {}", "✗".red().bold(), "SQL differs after the round trip".red());
        println!("  {} {}", "before:".dimmed(), before);
        println!("  {} {}", "after: ".dimmed(), after);
        Ok(false)
    }
}

fn show_dialects() {
    println!("{}", "Dialects".cyan().bold());
    println!();
    for dialect in Dialect::ALL {
        let generator = dialect.generator();
        let yes_no = |flag: bool| if flag { "yes".green() } else { "no".red() };
        println!("  {} {}", format!("{:<10}", dialect.key()).yellow(), generator.name().dimmed());
        println!("    multiple statements  {}", yes_no(generator.supports_multiple_statements()));
        println!("    sequences            {}", yes_no(generator.supports_sequences()));
        println!("    table hints          {}", yes_no(generator.supports_table_hints()));
        println!(
            "    stored procedures    {}",
            yes_no(generator.procedure_style() != ProcedureStyle::Unsupported)
        );
        println!(
            "    xor operator         {}",
            yes_no(generator.operator_symbol(Operator::XOr).is_some())
        );
    }
}
