// Command-line surface.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "A simple CLI todo list with authentication")]
#[command(version)]
pub struct Cli {
    /// Directory holding users.txt, tasks.txt and auth_status.txt
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in to access the todo list
    Login(CredentialArgs),
    /// Register a new user
    Register(CredentialArgs),
    /// Add a task to the todo list
    Add {
        /// Task words, joined with single spaces
        #[arg(required = true)]
        task: Vec<String>,
    },
    /// List all tasks in the todo list
    List,
}

/// `-u`/`-p` for login and register. Missing values are prompted for.
#[derive(Args, Clone, Default, PartialEq, Eq)]
pub struct CredentialArgs {
    /// Your username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Your password
    #[arg(short, long)]
    pub password: Option<String>,
}

// Commands are logged with `?command`; the password must never show up.
impl fmt::Debug for CredentialArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialArgs")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
