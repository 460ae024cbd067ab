//! Create options for database instances
//!
//! [`CreateOpts`] gathers everything needed to provision an instance and owns
//! the validation; the smaller option structs only know how to render
//! themselves.
//!
//! # Example
//!
//! ```rust
//! use dbaas_core::instances::{CreateOpts, CreateOptsBuilder, DatastoreOpts, NetworkOpts};
//!
//! let opts = CreateOpts::new("2", 2)
//!     .with_name("db1")
//!     .with_datastore(DatastoreOpts::new("mysql", "5.6"))
//!     .with_network(NetworkOpts::network("4a6f1f0c-6b5e-4d3a-9f7e-0d2c1f8a9b10"));
//!
//! let payload = opts.to_request_payload().unwrap();
//! assert_eq!(payload["instance"]["flavorRef"], "2");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::{JsonMap, to_json_map};
use crate::databases::DatabaseListBuilder;
use crate::error::{Error, Result};
use crate::users::UserListBuilder;

/// Smallest volume the service provisions, in GB
pub const MIN_VOLUME_SIZE_GB: u32 = 1;

/// Largest volume the service provisions, in GB
pub const MAX_VOLUME_SIZE_GB: u32 = 300;

/// Payload key for network attachments
pub const NICS_KEY: &str = "nics";

/// Payload key for the backup an instance is restored from
pub const RESTORE_POINT_KEY: &str = "RestorePoint";

/// Anything that can render an instance create payload
pub trait CreateOptsBuilder {
    /// Full request body, wrapped under `instance`
    fn to_request_payload(&self) -> Result<JsonMap>;
}

/// Prebuilt payloads are sent as-is
impl CreateOptsBuilder for JsonMap {
    fn to_request_payload(&self) -> Result<JsonMap> {
        Ok(self.clone())
    }
}

/// Database engine and version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreOpts {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub datastore_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DatastoreOpts {
    #[must_use]
    pub fn new(datastore_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            datastore_type: Some(datastore_type.into()),
            version: Some(version.into()),
        }
    }

    /// Engine only; the service picks its default version
    #[must_use]
    pub fn of_type(datastore_type: impl Into<String>) -> Self {
        Self {
            datastore_type: Some(datastore_type.into()),
            version: None,
        }
    }

    pub fn to_map(&self) -> Result<JsonMap> {
        to_json_map(self)
    }
}

/// Network attachment for a new instance
///
/// The service expects exactly one of `net_id` or `port_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOpts {
    #[serde(rename = "net-id", skip_serializing_if = "Option::is_none")]
    pub net_id: Option<String>,
    #[serde(rename = "port-id", skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(rename = "v4-fixed-ip", skip_serializing_if = "Option::is_none")]
    pub v4_fixed_ip: Option<String>,
    #[serde(rename = "v6-fixed-ip", skip_serializing_if = "Option::is_none")]
    pub v6_fixed_ip: Option<String>,
}

impl NetworkOpts {
    /// Attach to a network by id
    #[must_use]
    pub fn network(net_id: impl Into<String>) -> Self {
        Self {
            net_id: Some(net_id.into()),
            ..Default::default()
        }
    }

    /// Attach through an existing port
    #[must_use]
    pub fn port(port_id: impl Into<String>) -> Self {
        Self {
            port_id: Some(port_id.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_v4_fixed_ip(mut self, ip: impl Into<String>) -> Self {
        self.v4_fixed_ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn with_v6_fixed_ip(mut self, ip: impl Into<String>) -> Self {
        self.v6_fixed_ip = Some(ip.into());
        self
    }

    pub fn to_map(&self) -> Result<JsonMap> {
        to_json_map(self)
    }
}

/// Public exposure of the instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessOpts {
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_cidrs: Vec<String>,
}

impl AccessOpts {
    #[must_use]
    pub fn public() -> Self {
        Self {
            is_public: true,
            allowed_cidrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn private() -> Self {
        Self::default()
    }

    /// Allow connections from `cidr`; order is kept
    #[must_use]
    pub fn with_allowed_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.allowed_cidrs.push(cidr.into());
        self
    }

    pub fn to_map(&self) -> Result<JsonMap> {
        to_json_map(self)
    }
}

/// Backup to restore a new instance from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreOpts {
    pub backup_ref: String,
}

impl RestoreOpts {
    #[must_use]
    pub fn new(backup_ref: impl Into<String>) -> Self {
        Self {
            backup_ref: backup_ref.into(),
        }
    }

    /// Render the restore point; the backup reference is required
    pub fn to_map(&self) -> Result<JsonMap> {
        if self.backup_ref.is_empty() {
            return Err(Error::missing_input("instances::RestoreOpts::backup_ref"));
        }
        to_json_map(self)
    }
}

/// Options for provisioning a database instance
///
/// `flavor_ref` and `size` are required; everything else is optional and only
/// appears in the payload when set.
#[derive(Debug, Default)]
pub struct CreateOpts {
    /// Flavor id or URI reference
    pub flavor_ref: String,
    /// Volume size in GB, 1-300
    pub size: u32,
    /// Instance name, up to 255 characters
    pub name: String,
    pub databases: Option<Box<dyn DatabaseListBuilder>>,
    pub users: Option<Box<dyn UserListBuilder>>,
    /// Engine selection; the service defaults to MySQL when absent
    pub datastore: Option<DatastoreOpts>,
    pub networks: Vec<NetworkOpts>,
    pub access: Option<AccessOpts>,
    pub restore_point: Option<RestoreOpts>,
    /// Id or name of the instance to replicate from
    pub replica_of: String,
    /// Number of replicas; the service creates one when unset
    pub replica_count: u32,
}

impl CreateOpts {
    /// Create options with the required fields
    #[must_use]
    pub fn new(flavor_ref: impl Into<String>, size: u32) -> Self {
        Self {
            flavor_ref: flavor_ref.into(),
            size,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Databases to create on the instance
    #[must_use]
    pub fn with_databases(mut self, databases: impl DatabaseListBuilder + 'static) -> Self {
        self.databases = Some(Box::new(databases));
        self
    }

    /// Users to create on the instance
    #[must_use]
    pub fn with_users(mut self, users: impl UserListBuilder + 'static) -> Self {
        self.users = Some(Box::new(users));
        self
    }

    #[must_use]
    pub fn with_datastore(mut self, datastore: DatastoreOpts) -> Self {
        self.datastore = Some(datastore);
        self
    }

    /// Append a network attachment
    #[must_use]
    pub fn with_network(mut self, network: NetworkOpts) -> Self {
        self.networks.push(network);
        self
    }

    #[must_use]
    pub fn with_access(mut self, access: AccessOpts) -> Self {
        self.access = Some(access);
        self
    }

    #[must_use]
    pub fn with_restore_point(mut self, restore_point: RestoreOpts) -> Self {
        self.restore_point = Some(restore_point);
        self
    }

    #[must_use]
    pub fn with_replica_of(mut self, replica_of: impl Into<String>) -> Self {
        self.replica_of = replica_of.into();
        self
    }

    #[must_use]
    pub fn with_replica_count(mut self, replica_count: u32) -> Self {
        self.replica_count = replica_count;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(MIN_VOLUME_SIZE_GB..=MAX_VOLUME_SIZE_GB).contains(&self.size) {
            return Err(Error::invalid_input(
                "instances::CreateOpts::size",
                self.size,
                format!("Size (GB) must be between {MIN_VOLUME_SIZE_GB}-{MAX_VOLUME_SIZE_GB}"),
            ));
        }
        if self.flavor_ref.is_empty() {
            return Err(Error::missing_input("instances::CreateOpts::flavor_ref"));
        }
        Ok(())
    }
}

impl CreateOptsBuilder for CreateOpts {
    fn to_request_payload(&self) -> Result<JsonMap> {
        self.validate()?;

        let mut instance = JsonMap::new();
        instance.insert("volume".to_string(), json!({ "size": self.size }));
        instance.insert("flavorRef".to_string(), Value::from(self.flavor_ref.as_str()));

        if !self.name.is_empty() {
            instance.insert("name".to_string(), Value::from(self.name.as_str()));
        }

        if let Some(databases) = &self.databases {
            let mut map = databases.to_db_create_map()?;
            if let Some(list) = map.remove("databases") {
                instance.insert("databases".to_string(), list);
            }
        }

        if let Some(users) = &self.users {
            let mut map = users.to_user_create_map()?;
            if let Some(list) = map.remove("users") {
                instance.insert("users".to_string(), list);
            }
        }

        if let Some(datastore) = &self.datastore {
            instance.insert("datastore".to_string(), Value::Object(datastore.to_map()?));
        }

        if !self.networks.is_empty() {
            let nics = self
                .networks
                .iter()
                .map(|net| net.to_map().map(Value::Object))
                .collect::<Result<Vec<_>>>()?;
            instance.insert(NICS_KEY.to_string(), Value::Array(nics));
        }

        if let Some(access) = &self.access {
            instance.insert("access".to_string(), Value::Object(access.to_map()?));
        }

        if let Some(restore_point) = &self.restore_point {
            // RestoreOpts::to_map repeats this check for standalone use.
            if restore_point.backup_ref.is_empty() {
                return Err(Error::missing_input("restore_point.backup_ref"));
            }
            instance.insert(
                RESTORE_POINT_KEY.to_string(),
                Value::Object(restore_point.to_map()?),
            );
        }

        if !self.replica_of.is_empty() {
            instance.insert("replica_of".to_string(), Value::from(self.replica_of.as_str()));
        }

        if self.replica_count > 1 {
            instance.insert("replica_count".to_string(), Value::from(self.replica_count));
        }

        let mut payload = JsonMap::new();
        payload.insert("instance".to_string(), Value::Object(instance));
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::databases::{BatchCreateOpts as Databases, CreateOpts as DatabaseOpts};
    use crate::users::{BatchCreateOpts as Users, CreateOpts as UserOpts};
    use pretty_assertions::assert_eq;

    /// Builder that always fails, to check errors pass through untouched
    #[derive(Debug)]
    struct FailingDatabases;

    impl DatabaseListBuilder for FailingDatabases {
        fn to_db_create_map(&self) -> Result<JsonMap> {
            Err(Error::invalid_input("custom.databases", "x", "nope"))
        }
    }

    fn payload(opts: &CreateOpts) -> Value {
        Value::Object(opts.to_request_payload().unwrap())
    }

    #[test]
    fn test_minimal_payload() {
        let opts = CreateOpts::new("F", 10);
        assert_eq!(
            payload(&opts),
            json!({"instance": {"volume": {"size": 10}, "flavorRef": "F"}})
        );
    }

    #[test]
    fn test_minimal_payload_with_name() {
        let opts = CreateOpts::new("F", 10).with_name("db");
        assert_eq!(
            payload(&opts),
            json!({"instance": {"volume": {"size": 10}, "flavorRef": "F", "name": "db"}})
        );
    }

    #[test]
    fn test_datastore_scenario() {
        let opts = CreateOpts::new("2", 2)
            .with_name("db1")
            .with_datastore(DatastoreOpts::new("mysql", "5.6"));
        assert_eq!(
            payload(&opts),
            json!({
                "instance": {
                    "volume": {"size": 2},
                    "flavorRef": "2",
                    "name": "db1",
                    "datastore": {"type": "mysql", "version": "5.6"}
                }
            })
        );
    }

    #[test]
    fn test_payload_key_order() {
        let opts = CreateOpts::new("2", 2)
            .with_name("db1")
            .with_datastore(DatastoreOpts::new("mysql", "5.6"));
        let body = opts.to_request_payload().unwrap();
        let keys: Vec<_> = body["instance"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["volume", "flavorRef", "name", "datastore"]);
    }

    #[test]
    fn test_size_bounds() {
        for size in [0, 301, 1000, u32::MAX] {
            let err = CreateOpts::new("F", size).to_request_payload().unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }), "size {size}");
            assert_eq!(err.argument(), Some("instances::CreateOpts::size"));
            assert!(err.to_string().contains(&size.to_string()));
        }
        for size in [1, 150, 300] {
            assert!(CreateOpts::new("F", size).to_request_payload().is_ok());
        }
    }

    #[test]
    fn test_size_checked_before_flavor() {
        let err = CreateOpts::new("", 0).to_request_payload().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_missing_flavor() {
        let opts = CreateOpts::new("", 5)
            .with_name("db")
            .with_datastore(DatastoreOpts::of_type("postgresql"));
        let err = opts.to_request_payload().unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
        assert_eq!(err.argument(), Some("instances::CreateOpts::flavor_ref"));
    }

    #[test]
    fn test_empty_backup_ref_rejected() {
        let opts = CreateOpts::new("F", 5)
            .with_name("db")
            .with_restore_point(RestoreOpts::new(""));
        let err = opts.to_request_payload().unwrap_err();
        assert_eq!(err.argument(), Some("restore_point.backup_ref"));
    }

    #[test]
    fn test_restore_opts_checks_on_its_own() {
        let err = RestoreOpts::default().to_map().unwrap_err();
        assert_eq!(err.argument(), Some("instances::RestoreOpts::backup_ref"));
    }

    #[test]
    fn test_restore_point() {
        let opts = CreateOpts::new("F", 5).with_restore_point(RestoreOpts::new("bk-1"));
        let body = payload(&opts);
        assert_eq!(body["instance"][RESTORE_POINT_KEY], json!({"backup_ref": "bk-1"}));
    }

    #[test]
    fn test_replica_count() {
        for count in [0, 1] {
            let body = payload(&CreateOpts::new("F", 5).with_replica_count(count));
            assert!(body["instance"].get("replica_count").is_none());
        }
        let body = payload(&CreateOpts::new("F", 5).with_replica_count(2));
        assert_eq!(body["instance"]["replica_count"], json!(2));
    }

    #[test]
    fn test_replica_of() {
        let body = payload(&CreateOpts::new("F", 5).with_replica_of("src-instance"));
        assert_eq!(body["instance"]["replica_of"], "src-instance");

        let body = payload(&CreateOpts::new("F", 5));
        assert!(body["instance"].get("replica_of").is_none());
    }

    #[test]
    fn test_network_order_preserved() {
        let opts = CreateOpts::new("F", 5)
            .with_network(NetworkOpts::network("net-a").with_v4_fixed_ip("10.0.0.5"))
            .with_network(NetworkOpts::port("port-b").with_v6_fixed_ip("fd00::5"));
        let body = payload(&opts);
        assert_eq!(
            body["instance"][NICS_KEY],
            json!([
                {"net-id": "net-a", "v4-fixed-ip": "10.0.0.5"},
                {"port-id": "port-b", "v6-fixed-ip": "fd00::5"}
            ])
        );
    }

    #[test]
    fn test_access() {
        let opts = CreateOpts::new("F", 5).with_access(
            AccessOpts::public()
                .with_allowed_cidr("10.0.0.0/8")
                .with_allowed_cidr("192.168.0.0/16"),
        );
        let body = payload(&opts);
        assert_eq!(
            body["instance"]["access"],
            json!({"is_public": true, "allowed_cidrs": ["10.0.0.0/8", "192.168.0.0/16"]})
        );

        let body = payload(&CreateOpts::new("F", 5).with_access(AccessOpts::private()));
        assert_eq!(body["instance"]["access"], json!({"is_public": false}));
    }

    #[test]
    fn test_databases_and_users_spliced() {
        let opts = CreateOpts::new("1", 2)
            .with_name("json_rack_instance")
            .with_databases(
                Databases::new()
                    .with(DatabaseOpts::new("sampledb").with_character_set("utf8"))
                    .with(DatabaseOpts::new("nextround")),
            )
            .with_users(
                Users::new().with(
                    UserOpts::new("demouser", "demopassword")
                        .with_databases(vec![DatabaseOpts::new("sampledb")]),
                ),
            );

        assert_eq!(
            payload(&opts),
            json!({
                "instance": {
                    "volume": {"size": 2},
                    "flavorRef": "1",
                    "name": "json_rack_instance",
                    "databases": [
                        {"name": "sampledb", "character_set": "utf8"},
                        {"name": "nextround"}
                    ],
                    "users": [
                        {"name": "demouser", "password": "demopassword", "databases": [{"name": "sampledb"}]}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_builder_error_passes_through() {
        let opts = CreateOpts::new("F", 5).with_databases(FailingDatabases);
        let err = opts.to_request_payload().unwrap_err();
        assert_eq!(err.argument(), Some("custom.databases"));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_user_error_passes_through() {
        let opts = CreateOpts::new("F", 5).with_users(Users::new().with(UserOpts::new("app", "")));
        let err = opts.to_request_payload().unwrap_err();
        assert_eq!(err.argument(), Some("users::CreateOpts::password"));
    }

    #[test]
    fn test_prebuilt_map_passthrough() {
        let mut map = JsonMap::new();
        map.insert("instance".to_string(), json!({"flavorRef": "x"}));
        assert_eq!(map.to_request_payload().unwrap(), map);
    }
}
