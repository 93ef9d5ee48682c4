//! Connection settings for the administered instance

use std::fmt;

/// Credentials and connect descriptor, built once from the server configuration
#[derive(Clone, Default)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    /// EZConnect string or TNS alias, e.g. `localhost:1521/XE`
    pub connect_string: String,
}

impl DatabaseSettings {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        connect_string: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            connect_string: connect_string.into(),
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("username", &self.username)
            .field("password", &"******")
            .field("connect_string", &self.connect_string)
            .finish()
    }
}
