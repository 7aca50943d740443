// file: src/repository/credentials.rs
// description: Username and token pair passed through to the hosting API

use crate::error::{CrawlError, Result};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Pairs optional command-line values. A token without a username is a usage
    /// error; a username on its own carries nothing to authenticate with.
    pub fn from_parts(username: Option<String>, token: Option<String>) -> Result<Option<Self>> {
        let token = token.filter(|t| !t.is_empty());
        let username = username.filter(|u| !u.is_empty());

        match (username, token) {
            (Some(username), Some(token)) => Ok(Some(Self::new(username, token))),
            (None, Some(_)) => Err(CrawlError::usage(
                "When using --token, you must also provide --username.",
            )),
            (_, None) => Ok(None),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}
