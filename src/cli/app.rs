//! Main CLI application structure

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::task::{self, NewTask};
use super::tree::{self, TreeArgs};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "tasktree")]
#[command(author, version, about = "Render task records as aligned terminal trees")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Log diagnostics to stderr (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new tasktree project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Add a task
    Add {
        /// Task name
        name: String,

        /// Explicit ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Parent task ID
        #[arg(long)]
        parent: Option<String>,

        /// Priority (lower is more urgent)
        #[arg(long, short)]
        priority: Option<i64>,

        /// Initial status (default: todo)
        #[arg(long)]
        status: Option<String>,

        /// Task type (bug, feature, chore, docs, test, epic)
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,

        /// Tag (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Numeric score
        #[arg(long)]
        score: Option<f64>,

        /// Description text
        #[arg(long, short)]
        description: Option<String>,
    },

    /// List all tasks
    List,

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Set the status of a task
    Status {
        /// Task ID
        id: String,

        /// New status (todo, in_progress, blocked, done, cancelled, ...)
        status: String,
    },

    /// Add a comment to a task
    Comment {
        /// Task ID
        id: String,

        /// Comment text
        text: String,

        /// Author (defaults to the configured author, then $USER)
        #[arg(long)]
        author: Option<String>,
    },

    /// Add a relation between tasks, e.g. `link A blocks B`
    Link {
        from: String,
        relation: String,
        to: String,
    },

    /// Remove a relation between tasks
    Unlink {
        from: String,
        relation: String,
        to: String,
    },

    /// Render tasks as a tree
    Tree(TreeArgs),
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG directives win over the verbosity default
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    // Already installed (e.g. by a test harness): keep the existing one
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let output = Output::new(cli.format);

    tracing::debug!("tasktree starting");

    match cli.command {
        Commands::Init { path } => {
            let project = Project::init(&path)?;
            tracing::debug!(dir = %project.project_dir().display(), "project initialized");
            output.success(&format!(
                "Initialized tasktree project at {}",
                project.root().display()
            ));
        }

        Commands::Add {
            name,
            id,
            parent,
            priority,
            status,
            kind,
            tags,
            score,
            description,
        } => task::add(
            &output,
            NewTask {
                name,
                id,
                parent,
                priority,
                status,
                kind,
                tags,
                score,
                description,
            },
        )?,

        Commands::List => task::list(&output)?,
        Commands::Show { id } => task::show(&output, &id)?,
        Commands::Status { id, status } => task::set_status(&output, &id, &status)?,
        Commands::Comment { id, text, author } => task::comment(&output, &id, &text, author)?,
        Commands::Link { from, relation, to } => task::link(&output, &from, &relation, &to)?,
        Commands::Unlink { from, relation, to } => task::unlink(&output, &from, &relation, &to)?,

        Commands::Tree(args) => tree::run(&output, &args)?,
    }

    tracing::debug!("command completed");
    Ok(())
}
