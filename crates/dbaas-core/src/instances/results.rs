//! Typed views over instance API responses

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiResponse, Headers};
use crate::error::Result;
use crate::pagination::{LinkedPage, Link, Page, PageResult};

/// Flavor an instance runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub id: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Attached storage volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Size in GB
    pub size: u32,
    /// Used space in GB, when reported
    #[serde(default)]
    pub used: Option<f64>,
}

/// Engine running on an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datastore {
    #[serde(rename = "type")]
    pub datastore_type: String,
    #[serde(default)]
    pub version: String,
}

/// Network address of an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "type")]
    pub address_type: String,
    pub address: String,
}

/// Reference to a related instance (replication source or replica)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRef {
    pub id: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A database instance as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// e.g. `BUILD`, `ACTIVE`, `ERROR`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated: Option<NaiveDateTime>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ip: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub flavor: Option<Flavor>,
    #[serde(default)]
    pub volume: Option<Volume>,
    #[serde(default)]
    pub datastore: Option<Datastore>,
    #[serde(default)]
    pub replica_of: Option<InstanceRef>,
    #[serde(default)]
    pub replicas: Vec<InstanceRef>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Generated root credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootUser {
    pub name: String,
    pub password: String,
}

/// Decode `body[key]`
fn extract_key<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T> {
    let value = body.get(key).cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(value)?)
}

/// Response carrying a single instance (create, get)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceResult {
    pub body: Value,
    pub headers: Headers,
}

impl InstanceResult {
    pub fn extract(&self) -> Result<Instance> {
        extract_key(&self.body, "instance")
    }
}

pub type CreateResult = InstanceResult;
pub type GetResult = InstanceResult;

/// Response to enabling the root user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnableRootUserResult {
    pub body: Value,
    pub headers: Headers,
}

impl EnableRootUserResult {
    pub fn extract(&self) -> Result<RootUser> {
        extract_key(&self.body, "user")
    }
}

/// Response to the root-enabled check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsRootEnabledResult {
    pub body: Value,
    pub headers: Headers,
}

impl IsRootEnabledResult {
    pub fn extract(&self) -> Result<bool> {
        extract_key(&self.body, "rootEnabled")
    }
}

/// Response with no meaningful body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionResult {
    pub headers: Headers,
}

pub type DeleteResult = ActionResult;
pub type ConfigurationResult = ActionResult;
pub type DetachReplicaResult = ActionResult;

macro_rules! impl_from_response {
    ($($result:ident),+ $(,)?) => {
        $(
            impl From<ApiResponse> for $result {
                fn from(response: ApiResponse) -> Self {
                    Self {
                        body: response.body.unwrap_or(Value::Null),
                        headers: response.headers,
                    }
                }
            }
        )+
    };
}

impl_from_response!(InstanceResult, EnableRootUserResult, IsRootEnabledResult);

impl From<ApiResponse> for ActionResult {
    fn from(response: ApiResponse) -> Self {
        Self {
            headers: response.headers,
        }
    }
}

/// One page of the instance listing
#[derive(Debug, Clone, PartialEq)]
pub struct InstancePage(LinkedPage);

impl InstancePage {
    #[must_use]
    pub fn new(result: PageResult) -> Self {
        Self(LinkedPage::new(result, "instances_links"))
    }

    /// Instances on this page
    pub fn extract_instances(&self) -> Result<Vec<Instance>> {
        match self.0.result.body.get("instances") {
            Some(instances) => Ok(serde_json::from_value(instances.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// Raw page as returned by the service
    #[must_use]
    pub fn result(&self) -> &PageResult {
        &self.0.result
    }
}

impl Page for InstancePage {
    fn next_page_url(&self) -> Result<Option<String>> {
        self.0.next_page_url()
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.extract_instances()?.is_empty())
    }
}
