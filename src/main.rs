//! agentgen CLI - compile AgentO knowledge graphs into CrewAI code

use agentgen::batch;
use agentgen::config::{AgentgenConfig, CONFIG_FILE};
use agentgen::pipeline;
use agentgen_emit::{create_default_registry, Target};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agentgen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compile AgentO knowledge graphs into CrewAI code",
    arg_required_else_help = true
)]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Print the effective config (after flag overrides) and exit
    #[arg(long, global = true)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Compile every graph document under a directory
    Batch {
        /// Input directory (default from config)
        input_dir: Option<PathBuf>,

        /// Output directory (default from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Targets to generate, comma separated
        #[arg(long = "target", value_delimiter = ',')]
        targets: Vec<Target>,

        /// Files processed concurrently
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Regenerate outputs that already exist
        #[arg(long)]
        force: bool,
    },

    /// Compile one graph document
    Compile {
        /// Graph document, or `-` for stdin
        file: PathBuf,

        /// Output file, or directory for project targets. Stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target to generate (default: first configured target)
        #[arg(long)]
        target: Option<Target>,
    },
}

impl Command {
    /// Fold command-line overrides into the file config.
    fn apply(&self, config: &mut AgentgenConfig) {
        match self {
            Command::Batch {
                input_dir,
                output,
                targets,
                jobs,
                force,
            } => {
                if let Some(dir) = input_dir {
                    config.input.dir = dir.clone();
                }
                if let Some(dir) = output {
                    config.output.dir = dir.clone();
                }
                if !targets.is_empty() {
                    config.output.targets = targets.clone();
                }
                if let Some(jobs) = jobs {
                    config.batch.jobs = *jobs;
                }
                if *force {
                    config.batch.skip_existing = false;
                }
            }
            Command::Compile { target, .. } => {
                if let Some(target) = target {
                    config.output.targets = vec![*target];
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentgen=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AgentgenConfig::load(&cli.config);
    if let Some(command) = &cli.command {
        command.apply(&mut config);
    }
    if cli.print_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let registry = create_default_registry()?;

    match cli.command {
        Some(Command::Batch { .. }) => {
            let summary = batch::run(&config, &registry).await?;
            println!("{}", summary);
        }
        Some(Command::Compile { file, output, .. }) => {
            let target = config
                .output
                .targets
                .first()
                .copied()
                .unwrap_or(Target::Crewai);
            let emitter = registry.require(target)?;
            let artifact = if file.as_os_str() == "-" {
                let text = std::io::read_to_string(std::io::stdin())?;
                pipeline::compile_str(&text, "stdin", emitter.as_ref())?
            } else {
                pipeline::compile_file(&file, emitter.as_ref())?
            };
            match output {
                Some(dest) => {
                    artifact.write_to(&dest)?;
                    tracing::info!("wrote {}", dest.display());
                }
                None => print!("{}", artifact.to_display_string()),
            }
        }
        None => anyhow::bail!("no command given (see --help)"),
    }

    Ok(())
}
