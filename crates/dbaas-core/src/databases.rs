//! Database list options for instance creation
//!
//! [`BatchCreateOpts`] is the stock [`DatabaseListBuilder`]; anything else
//! that can produce a `{"databases": [...]}` map can be plugged into
//! [`CreateOpts::with_databases`](crate::instances::CreateOpts::with_databases).

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::client::{JsonMap, to_json_map};
use crate::error::{Error, Result};

/// Longest database name the service accepts
pub const MAX_NAME_LEN: usize = 64;

/// Produces the `databases` entry of a create request
pub trait DatabaseListBuilder: fmt::Debug + Send + Sync {
    /// Map with a single `databases` key
    fn to_db_create_map(&self) -> Result<JsonMap>;
}

/// A database to create alongside an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateOpts {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,
}

impl CreateOpts {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_character_set(mut self, character_set: impl Into<String>) -> Self {
        self.character_set = Some(character_set.into());
        self
    }

    #[must_use]
    pub fn with_collate(mut self, collate: impl Into<String>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    /// Validate and render one database entry
    pub fn to_map(&self) -> Result<JsonMap> {
        if self.name.is_empty() {
            return Err(Error::missing_input("databases::CreateOpts::name"));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(Error::invalid_input(
                "databases::CreateOpts::name",
                &self.name,
                format!("Must be at most {MAX_NAME_LEN} chars long"),
            ));
        }
        to_json_map(self)
    }
}

/// Ordered list of databases to create
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchCreateOpts(pub Vec<CreateOpts>);

impl BatchCreateOpts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a database
    #[must_use]
    pub fn with(mut self, opts: CreateOpts) -> Self {
        self.0.push(opts);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CreateOpts> {
        self.0.iter()
    }
}

impl From<Vec<CreateOpts>> for BatchCreateOpts {
    fn from(opts: Vec<CreateOpts>) -> Self {
        Self(opts)
    }
}

impl DatabaseListBuilder for BatchCreateOpts {
    fn to_db_create_map(&self) -> Result<JsonMap> {
        let databases = self
            .0
            .iter()
            .map(|db| db.to_map().map(Value::Object))
            .collect::<Result<Vec<_>>>()?;

        let mut map = JsonMap::new();
        map.insert("databases".to_string(), Value::Array(databases));
        Ok(map)
    }
}
