//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health, workflow-failure), and their associated
//! argument structs. Every flag has an environment variable equivalent
//! for container deployments.

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "alertdesk",
    version,
    about = "Alert enrichment API service",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        alertdesk run                        Start the API on port 3000\n  \
        alertdesk run -p 8080 --pretty       Local dev mode\n  \
        alertdesk health                     Check a running instance\n\n  \
        Docs: https://github.com/alertdesk/alertdesk"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Run(Box<RunArgs>),

    /// Check health of a running instance
    Health(HealthArgs),

    /// Log a failure event from the enrichment workflow
    WorkflowFailure(WorkflowFailureArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        alertdesk run                                  In-memory backend\n  \
        alertdesk run -p 8080 --pretty                 Local dev mode\n  \
        alertdesk run --state-machine-arn arn:...      Step Functions orchestrator")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Orchestrator --
    /// Step Functions state machine ARN for enrichment executions
    #[cfg(feature = "sfn")]
    #[arg(long, env = "STATE_MACHINE_ARN", help_heading = "Orchestrator")]
    pub state_machine_arn: Option<String>,

    /// AWS region for Step Functions
    #[cfg(feature = "sfn")]
    #[arg(
        long,
        env = "SFN_REGION",
        default_value = "us-east-1",
        help_heading = "Orchestrator"
    )]
    pub sfn_region: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Observability --
    /// Sentry DSN (enables error tracking)
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_DSN", help_heading = "Observability")]
    pub sentry_dsn: Option<String>,

    /// Sentry environment tag
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_ENVIRONMENT", help_heading = "Observability")]
    pub sentry_environment: Option<String>,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        alertdesk workflow-failure --event '{\"report_id\":\"...\"}'\n  \
        cat event.json | alertdesk workflow-failure")]
pub struct WorkflowFailureArgs {
    /// Failure event as a JSON literal (reads stdin when omitted)
    #[arg(long, env = "WORKFLOW_FAILURE_EVENT")]
    pub event: Option<String>,

    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
