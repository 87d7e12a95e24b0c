// Credential store: `users.txt`, one `username|hash` record per line.
//
// Records are only ever appended. Usernames are not unique; lookups walk the
// file top to bottom and the first matching line wins.

use std::fs::File;
use std::io::{BufReader, Lines};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, TodoError};
use crate::store;

/// Separates the username from the hash on each line.
pub const DELIMITER: char = '|';

/// bcrypt work factor for new records. Fixed; existing records carry
/// their own cost and verify regardless.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// One line of the credential file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
}

impl UserRecord {
    /// Split a stored line on the first delimiter. Lines without one are
    /// not records.
    pub fn parse(line: &str) -> Option<Self> {
        let (username, password_hash) = line.split_once(DELIMITER)?;
        Some(UserRecord {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    fn to_line(&self) -> String {
        format!("{}{}{}", self.username, DELIMITER, self.password_hash)
    }
}

/// Append-only store of username/password-hash pairs.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hash `password` and append a record for `username`. Existing records
    /// with the same username are left alone.
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        validate_username(username)?;
        let record = UserRecord {
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };
        store::append_line(&self.path, &record.to_line())?;
        info!(username, "registered user");
        Ok(())
    }

    /// Lazily iterate the stored records in file order. A missing file
    /// yields nothing.
    pub fn records(&self) -> Result<Records> {
        Ok(Records {
            lines: store::read_lines(&self.path)?,
            path: self.path.clone(),
        })
    }

    /// Hash stored for the first record named `username`.
    pub fn find_hash(&self, username: &str) -> Result<Option<String>> {
        for record in self.records()? {
            let record = record?;
            if record.username == username {
                return Ok(Some(record.password_hash));
            }
        }
        debug!(username, "no credential record");
        Ok(None)
    }
}

/// Iterator over the records of a credential file.
pub struct Records {
    lines: Option<Lines<BufReader<File>>>,
    path: PathBuf,
}

impl Iterator for Records {
    type Item = Result<UserRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.as_mut()?.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.lines = None;
                    return Some(Err(TodoError::io("read", self.path.clone(), e)));
                }
            };
            if let Some(record) = UserRecord::parse(&line) {
                return Some(Ok(record));
            }
            if !line.is_empty() {
                warn!(path = %self.path.display(), "skipping malformed credential line");
            }
        }
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(TodoError::InvalidUsername("must not be empty"));
    }
    if username.contains(DELIMITER) {
        return Err(TodoError::InvalidUsername("must not contain '|'"));
    }
    if username.contains(&['\n', '\r'][..]) {
        return Err(TodoError::InvalidUsername("must not contain line breaks"));
    }
    Ok(())
}

/// Salted bcrypt hash of `password` at [`HASH_COST`].
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST).map_err(|e| TodoError::Hash(e.to_string()))
}

/// Check `password` against a stored bcrypt hash (`$2a$`, `$2b$` or `$2y$`).
/// The cost comes from the stored string. Anything unparseable is a
/// mismatch.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // `hunter2` hashed by a Go `bcrypt.GenerateFromPassword` style `$2a$10$`
    // record, as older `users.txt` files contain.
    const LEGACY_2A_HUNTER2: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyerQKEVFj1vJdjpgp6AGhdEpgLcn6nAea";

    fn test_store() -> (TempDir, CredentialStore) {
        let tmp = TempDir::new().unwrap();
        let store = CredentialStore::new(tmp.path().join("users.txt"));
        (tmp, store)
    }

    #[test]
    fn register_appends_delimited_line() {
        let (_tmp, store) = test_store();

        store.register("alice", "hunter2").unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        let line = contents.lines().next().unwrap();
        let (username, hash) = line.split_once('|').unwrap();
        assert_eq!(username, "alice");
        assert!(hash.starts_with(&format!("$2b${:02}$", HASH_COST)));
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn find_hash_returns_stored_hash() {
        let (_tmp, store) = test_store();
        store.register("alice", "hunter2").unwrap();

        let hash = store.find_hash("alice").unwrap().unwrap();
        assert!(verify_password("hunter2", &hash));
    }

    #[test]
    fn find_hash_missing_user_is_none() {
        let (_tmp, store) = test_store();
        store.register("alice", "hunter2").unwrap();

        assert!(store.find_hash("bob").unwrap().is_none());
    }

    #[test]
    fn find_hash_on_missing_file_is_none() {
        let (_tmp, store) = test_store();
        assert!(store.find_hash("alice").unwrap().is_none());
    }

    #[test]
    fn duplicate_usernames_are_kept_and_first_wins() {
        let (_tmp, store) = test_store();
        store.register("alice", "first").unwrap();
        store.register("alice", "second").unwrap();

        let records: Vec<UserRecord> = store.records().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);

        let hash = store.find_hash("alice").unwrap().unwrap();
        assert_eq!(hash, records[0].password_hash);
        assert!(verify_password("first", &hash));
        assert!(!verify_password("second", &hash));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (_tmp, store) = test_store();
        fs::write(store.path(), format!("garbage\n\nbob|{LEGACY_2A_HUNTER2}\n")).unwrap();

        let records: Vec<UserRecord> = store.records().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "bob");
    }

    #[test]
    fn register_rejects_unstorable_usernames() {
        let (_tmp, store) = test_store();

        for bad in ["", "a|b", "line\nbreak", "cr\r"] {
            let err = store.register(bad, "pw").unwrap_err();
            assert!(matches!(err, TodoError::InvalidUsername(_)), "{bad:?}");
        }
        assert!(!store.path().exists());
    }

    #[test]
    fn password_containing_delimiter_round_trips() {
        let (_tmp, store) = test_store();
        store.register("carol", "pa|ss").unwrap();

        let hash = store.find_hash("carol").unwrap().unwrap();
        assert!(verify_password("pa|ss", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let h1 = hash_password("same").unwrap();
        let h2 = hash_password("same").unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password("same", &h1));
        assert!(verify_password("same", &h2));
    }

    #[test]
    fn legacy_2a_record_verifies() {
        let (_tmp, store) = test_store();
        fs::write(store.path(), format!("alice|{LEGACY_2A_HUNTER2}\n")).unwrap();

        let hash = store.find_hash("alice").unwrap().unwrap();
        assert_eq!(hash, LEGACY_2A_HUNTER2);
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn other_bcrypt_prefixes_verify() {
        // crypt_blowfish reference vector.
        assert!(verify_password(
            "U*U",
            "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW"
        ));
        assert!(verify_password(
            "hunter2",
            "$2b$04$abcdefghijklmnopqrstuuV3duMsC0HpUex6N9qapiuOHHWkwRXVm"
        ));
        assert!(verify_password(
            "hunter2",
            "$2y$04$abcdefghijklmnopqrstuuV3duMsC0HpUex6N9qapiuOHHWkwRXVm"
        ));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("pw", "not-a-bcrypt-hash"));
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "$pbkdf2-sha256$i=1000,l=32$c2FsdA$aGFzaA"));
    }
}
