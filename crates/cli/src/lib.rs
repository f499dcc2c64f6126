use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use thoughts_formatter::{FormatterConfig, ThoughtFormatter};
use thoughts_protocol::{serialize_json, ThoughtDisplay};

mod input;

use input::{parse_thoughts, read_input};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "thoughts")]
#[command(about = "Normalize model thought traces for display", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file with label and meta synonym overrides
    #[arg(long, global = true, env = "THOUGHTS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print html, markdown or text for the input
    Classify(InputArgs),

    /// Print the input as sanitized plain text
    Plain(InputArgs),

    /// Print the "Label: value" transcript of a thoughts payload
    Transcript(InputArgs),

    /// Print metadata fields found in a thoughts payload as JSON
    Meta(MetaArgs),

    /// Print the context documents of a thoughts payload as JSON
    Docs(JsonArgs),

    /// Run every stage and print the combined result as JSON
    Render(JsonArgs),

    /// Print the JSON Schema of the render output
    Schema,
}

#[derive(Args)]
struct InputArgs {
    /// File to read; `-` or nothing reads stdin
    input: Option<PathBuf>,
}

#[derive(Args)]
struct JsonArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct MetaArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Parse the whole transcript, including text after the `Content:` marker
    #[arg(long)]
    full: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn load_config(cli: &Cli) -> Result<FormatterConfig> {
    match &cli.config {
        Some(path) => FormatterConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(FormatterConfig::default()),
    }
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut config = load_config(&cli)?;
    if let Commands::Meta(args) = &cli.command {
        if args.full {
            config.pre_content_only = false;
        }
    }
    let formatter = ThoughtFormatter::new(&config).context("Invalid formatter config")?;

    let output = match &cli.command {
        Commands::Classify(args) => {
            let text = read_input(args.input.as_deref())?;
            formatter.classify(&text).to_string()
        }
        Commands::Plain(args) => {
            let text = read_input(args.input.as_deref())?;
            formatter.plain_text(&text)
        }
        Commands::Transcript(args) => {
            let thoughts = parse_thoughts(&read_input(args.input.as_deref())?);
            formatter.transcript(&thoughts)
        }
        Commands::Meta(args) => {
            let thoughts = parse_thoughts(&read_input(args.input.input.as_deref())?);
            let transcript = formatter.transcript(&thoughts);
            let meta = formatter.meta(&formatter.plain_text(&transcript));
            serialize_json(&meta, args.pretty)?
        }
        Commands::Docs(args) => {
            let thoughts = parse_thoughts(&read_input(args.input.input.as_deref())?);
            serialize_json(&formatter.context_docs(&thoughts), args.pretty)?
        }
        Commands::Render(args) => {
            let thoughts = parse_thoughts(&read_input(args.input.input.as_deref())?);
            serialize_json(&formatter.render(&thoughts), args.pretty)?
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(ThoughtDisplay);
            serialize_json(&schema, true)?
        }
    };

    print_stdout(&output)
}
