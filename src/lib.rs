// Library root
// -----------
// The binary (`main.rs`) parses arguments and hands the command to
// `commands::dispatch`; everything else lives here so it can be tested
// without spawning a process.
//
// Module responsibilities:
// - `credentials`: the `users.txt` store and password hashing.
// - `auth`: credential verification and registration-as-login.
// - `session`: the persisted `auth_status.txt` flag and the session context.
// - `tasks`: the `tasks.txt` store.
// - `commands`: per-command access declarations, the guard and handlers.
// - `cli`, `config`, `ui`, `store`, `error`: plumbing.
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod session;
pub mod store;
pub mod tasks;
pub mod ui;
