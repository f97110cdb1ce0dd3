//! Flat CSV archive of registered users.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{directory::UserDirectory, models::User, validation};

/// File name used under the data directory.
pub const DEFAULT_USERS_FILE: &str = "users.csv";

/// Reads and writes `username,email,phoneNumber` lines.
pub struct UserArchive {
    path: PathBuf,
}

impl UserArchive {
    /// Archive backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the archive with every user in the directory.
    pub fn save(&self, directory: &UserDirectory) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut out = String::new();
        for user in directory.iter() {
            let _ = writeln!(out, "{},{},{}", user.username, user.email, user.phone_number);
        }
        fs::write(&self.path, out)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(path = %self.path.display(), users = directory.count(), "Users saved");
        Ok(directory.count())
    }

    /// Read every valid three-field line as a fresh user.
    ///
    /// Rows go through the same rules as registration; anything else is
    /// skipped with a warning.
    pub fn load(&self) -> Result<Vec<User>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut users = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_user(line) {
                Ok(user) => users.push(user),
                Err(reason) => warn!(line = idx + 1, %reason, "Skipping malformed user row"),
            }
        }
        Ok(users)
    }

    /// Load the archive into `directory`, skipping usernames or emails already present.
    ///
    /// Returns the number of users added.
    pub fn restore_into(&self, directory: &mut UserDirectory) -> Result<usize> {
        let mut added = 0;
        for user in self.load()? {
            if directory.find_by_username(&user.username).is_some()
                || directory.find_by_email(&user.email).is_some()
            {
                warn!(username = %user.username, "Skipping archived user already registered");
                continue;
            }
            directory.add(user);
            added += 1;
        }
        info!(path = %self.path.display(), added, "Users restored");
        Ok(added)
    }
}

fn parse_user(line: &str) -> Result<User, String> {
    let fields: Vec<&str> = line.split(',').collect();
    let [username, email, phone] = fields.as_slice() else {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    };
    let username = validation::username(username).map_err(|err| err.to_string())?;
    let email = validation::email(email).map_err(|err| err.to_string())?;
    let phone = validation::phone(phone).map_err(|err| err.to_string())?;
    Ok(User::new(username, email, phone))
}
