// Authenticator: checks credentials against the credential store and flips
// the session on success.

use tracing::{info, warn};

use crate::credentials::{self, CredentialStore};
use crate::error::Result;
use crate::session::Session;
use crate::ui;

pub struct Authenticator {
    credentials: CredentialStore,
}

impl Authenticator {
    pub fn new(credentials: CredentialStore) -> Self {
        Authenticator { credentials }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Verify `username`/`password`. Every record carrying the username is
    /// tried in file order; the first one that verifies wins and the session
    /// is granted. An unknown user and a wrong password look the same.
    pub fn authenticate(&self, session: &mut Session, username: &str, password: &str) -> bool {
        let records = match self.credentials.records() {
            Ok(records) => records,
            Err(err) => {
                println!("Error: {}", err);
                return false;
            }
        };

        let spinner = ui::spinner("Checking credentials...");
        let mut matched = false;
        for record in records {
            match record {
                Ok(record) if record.username == username => {
                    if credentials::verify_password(password, &record.password_hash) {
                        matched = true;
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    spinner.finish_and_clear();
                    println!("Error: {}", err);
                    return false;
                }
            }
        }
        spinner.finish_and_clear();

        if !matched {
            info!(username, "authentication failed");
            return false;
        }

        info!(username, "authenticated");
        if let Err(err) = session.grant() {
            warn!(error = %err, "could not persist session flag");
            println!("Error: {}", err);
        }
        true
    }

    /// Register the user and treat the registration as a login. A failed
    /// write leaves the session untouched.
    pub fn register_and_authenticate(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let spinner = ui::spinner("Registering...");
        let registered = self.credentials.register(username, password);
        spinner.finish_and_clear();
        registered?;

        if let Err(err) = session.grant() {
            warn!(error = %err, "could not persist session flag");
            println!("Error: {}", err);
        }
        Ok(())
    }
}
