use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use reconciler::Action;
use std::path::PathBuf;

use crate::config::ENV_CONFIG;

#[derive(Parser)]
#[command(name = "profilectl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Drive application inference profile lifecycle handlers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/profilectl/config.toml)
    #[arg(long, global = true, env = ENV_CONFIG, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one lifecycle handler invocation and print the progress event
    Invoke(InvokeArgs),

    /// Print the effective configuration as TOML
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct InvokeArgs {
    /// Lifecycle action to run
    #[arg(value_enum)]
    pub action: ActionArg,

    /// Handler request as JSON ('-' reads stdin)
    #[arg(short, long, value_name = "FILE")]
    pub request: PathBuf,

    /// Callback context returned by a previous invocation
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Write the returned callback context to this file
    #[arg(long, value_name = "FILE")]
    pub save_context: Option<PathBuf>,

    /// Keep re-invoking after each delay hint until the event is terminal
    #[arg(short, long)]
    pub wait: bool,

    /// Give up waiting after this many invocations (default from config)
    #[arg(long, value_name = "N", requires = "wait")]
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Create => Self::Create,
            ActionArg::Read => Self::Read,
            ActionArg::Update => Self::Update,
            ActionArg::Delete => Self::Delete,
            ActionArg::List => Self::List,
        }
    }
}
