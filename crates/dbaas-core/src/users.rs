//! User list options for instance creation

use std::fmt;

use serde_json::Value;

use crate::client::JsonMap;
use crate::databases::BatchCreateOpts as DatabaseList;
use crate::error::{Error, Result};

/// Reserved by the service for the superuser
pub const RESERVED_USER: &str = "root";

/// Produces the `users` entry of a create request
pub trait UserListBuilder: fmt::Debug + Send + Sync {
    /// Map with a single `users` key
    fn to_user_create_map(&self) -> Result<JsonMap>;
}

/// A user to create alongside an instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOpts {
    pub name: String,
    pub password: String,
    /// Databases the user is granted access to
    pub databases: DatabaseList,
    /// Host the user may connect from, `%` when unset
    pub host: Option<String>,
}

impl CreateOpts {
    #[must_use]
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_databases(mut self, databases: impl Into<DatabaseList>) -> Self {
        self.databases = databases.into();
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Validate and render one user entry
    ///
    /// Granted databases are referenced by name only.
    pub fn to_map(&self) -> Result<JsonMap> {
        if self.name.is_empty() {
            return Err(Error::missing_input("users::CreateOpts::name"));
        }
        if self.name == RESERVED_USER {
            return Err(Error::invalid_input(
                "users::CreateOpts::name",
                &self.name,
                "root is a reserved user name and cannot be used",
            ));
        }
        if self.password.is_empty() {
            return Err(Error::missing_input("users::CreateOpts::password"));
        }

        let mut map = JsonMap::new();
        map.insert("name".to_string(), Value::from(self.name.as_str()));
        map.insert("password".to_string(), Value::from(self.password.as_str()));
        if let Some(host) = &self.host {
            map.insert("host".to_string(), Value::from(host.as_str()));
        }
        if !self.databases.is_empty() {
            let databases = self
                .databases
                .iter()
                .map(|db| {
                    let mut entry = JsonMap::new();
                    entry.insert("name".to_string(), Value::from(db.name.as_str()));
                    Value::Object(entry)
                })
                .collect();
            map.insert("databases".to_string(), Value::Array(databases));
        }
        Ok(map)
    }
}

/// Ordered list of users to create
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchCreateOpts(pub Vec<CreateOpts>);

impl BatchCreateOpts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user
    #[must_use]
    pub fn with(mut self, opts: CreateOpts) -> Self {
        self.0.push(opts);
        self
    }
}

impl From<Vec<CreateOpts>> for BatchCreateOpts {
    fn from(opts: Vec<CreateOpts>) -> Self {
        Self(opts)
    }
}

impl UserListBuilder for BatchCreateOpts {
    fn to_user_create_map(&self) -> Result<JsonMap> {
        let users = self
            .0
            .iter()
            .map(|user| user.to_map().map(Value::Object))
            .collect::<Result<Vec<_>>>()?;

        let mut map = JsonMap::new();
        map.insert("users".to_string(), Value::Array(users));
        Ok(map)
    }
}
