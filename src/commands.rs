// Command dispatch.
//
// Every command declares the access it needs. `dispatch` runs the single
// guard before any handler body, so a handler never re-checks the session.

use tracing::{debug, warn};

use crate::auth::Authenticator;
use crate::cli::{Command, CredentialArgs};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::{Result, TodoError};
use crate::session::{Session, SessionFlag};
use crate::tasks::TaskStore;
use crate::ui;

/// What a command requires before it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Runs without a session (login, register).
    Public,
    /// Needs an authenticated session.
    Authenticated,
}

impl Command {
    pub fn access(&self) -> Access {
        match self {
            Command::Login(_) | Command::Register(_) => Access::Public,
            Command::Add { .. } | Command::List => Access::Authenticated,
        }
    }
}

/// Everything a handler may touch, built once per process.
pub struct Context {
    session: Session,
    authenticator: Authenticator,
    tasks: TaskStore,
}

impl Context {
    pub fn from_config(config: &Config) -> Self {
        Context {
            session: Session::load(SessionFlag::new(config.auth_status_path())),
            authenticator: Authenticator::new(CredentialStore::new(config.users_path())),
            tasks: TaskStore::new(config.tasks_path()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// The authorization guard.
pub fn authorize(access: Access, session: &Session) -> Result<()> {
    match access {
        Access::Public => Ok(()),
        Access::Authenticated if session.is_authenticated() => Ok(()),
        Access::Authenticated => Err(TodoError::AuthenticationRequired),
    }
}

pub fn dispatch(command: Command, ctx: &mut Context) -> Result<()> {
    if let Err(err) = authorize(command.access(), &ctx.session) {
        warn!(?command, "rejected: not authenticated");
        return Err(err);
    }
    debug!(?command, "dispatching");

    match command {
        Command::Login(args) => login(ctx, args),
        Command::Register(args) => register(ctx, args),
        Command::Add { task } => add(ctx, &task.join(" ")),
        Command::List => list(ctx),
    }
}

fn login(ctx: &mut Context, args: CredentialArgs) -> Result<()> {
    let username = ui::username_or_prompt(args.username)?;
    let password = ui::password_or_prompt(args.password, false)?;

    if ctx
        .authenticator
        .authenticate(&mut ctx.session, &username, &password)
    {
        println!("Login successful!");
    } else {
        println!("Invalid credentials. Login failed.");
    }
    Ok(())
}

fn register(ctx: &mut Context, args: CredentialArgs) -> Result<()> {
    let username = ui::username_or_prompt(args.username)?;
    let password = ui::password_or_prompt(args.password, true)?;

    ctx.authenticator
        .register_and_authenticate(&mut ctx.session, &username, &password)?;
    println!("User registered successfully!");
    Ok(())
}

fn add(ctx: &mut Context, task: &str) -> Result<()> {
    ctx.tasks.append(task)?;
    println!("Added task: {}", task);
    Ok(())
}

fn list(ctx: &mut Context) -> Result<()> {
    println!("Todo List:");
    match ctx.tasks.list_all()? {
        Some(tasks) => {
            for task in tasks {
                println!("- {}", task?);
            }
        }
        None => println!("No tasks found."),
    }
    Ok(())
}
