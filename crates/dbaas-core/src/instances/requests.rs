//! Instance lifecycle operations
//!
//! Each function sends exactly one request through the given
//! [`ServiceClient`] and wraps the response. None of them retry or wait for
//! the instance to settle; an instance returned by [`create`] is typically
//! still in `BUILD`.

use serde_json::{Value, json};
use tracing::debug;

use super::params::CreateOptsBuilder;
use super::results::{
    ActionResult, ConfigurationResult, CreateResult, DeleteResult, DetachReplicaResult,
    EnableRootUserResult, GetResult, InstancePage, IsRootEnabledResult,
};
use super::urls::{action_url, base_url, resource_url, user_root_url};
use crate::client::{RequestOpts, ServiceClient};
use crate::error::Result;
use crate::pagination::Pager;

/// Provision a new instance
///
/// The payload is built and validated before anything is sent.
///
/// # Example
///
/// ```rust,ignore
/// use dbaas_core::instances::{self, CreateOpts, DatastoreOpts};
///
/// let opts = CreateOpts::new("1", 2)
///     .with_name("json_rack_instance")
///     .with_datastore(DatastoreOpts::new("mysql", "5.7"));
///
/// let instance = instances::create(&client, &opts).await?.extract()?;
/// println!("{} is {}", instance.id, instance.status);
/// ```
pub async fn create<C, B>(client: &C, opts: &B) -> Result<CreateResult>
where
    C: ServiceClient + ?Sized,
    B: CreateOptsBuilder + ?Sized,
{
    let body = opts.to_request_payload()?;
    debug!("creating database instance");
    let response = client
        .post(
            &base_url(client),
            Some(Value::Object(body)),
            Some(RequestOpts::ok_codes(&[200])),
        )
        .await?;
    Ok(response.into())
}

/// Page through all instances visible to the project
pub fn list<C: ServiceClient + ?Sized>(client: &C) -> Pager<'_, C, InstancePage> {
    Pager::new(client, base_url(client), InstancePage::new)
}

/// Fetch a single instance
pub async fn get<C: ServiceClient + ?Sized>(client: &C, id: &str) -> Result<GetResult> {
    debug!(instance_id = id, "fetching database instance");
    let response = client.get(&resource_url(client, id), None).await?;
    Ok(response.into())
}

/// Permanently destroy an instance
pub async fn delete<C: ServiceClient + ?Sized>(client: &C, id: &str) -> Result<DeleteResult> {
    debug!(instance_id = id, "deleting database instance");
    let response = client.delete(&resource_url(client, id), None).await?;
    Ok(response.into())
}

/// Enable remote login for `root` and return its generated password
pub async fn enable_root_user<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
) -> Result<EnableRootUserResult> {
    debug!(instance_id = id, "enabling root user");
    let response = client
        .post(
            &user_root_url(client, id),
            None,
            Some(RequestOpts::ok_codes(&[200])),
        )
        .await?;
    Ok(response.into())
}

/// Check whether the root user has ever been enabled
pub async fn is_root_enabled<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
) -> Result<IsRootEnabledResult> {
    debug!(instance_id = id, "checking root user");
    let response = client.get(&user_root_url(client, id), None).await?;
    Ok(response.into())
}

/// Restart the database service on an instance
///
/// Dynamic configuration applied inside the database is lost.
pub async fn restart<C: ServiceClient + ?Sized>(client: &C, id: &str) -> Result<ActionResult> {
    debug!(instance_id = id, "restarting database instance");
    action(client, id, json!({ "restart": {} })).await
}

/// Move an instance to another flavor
pub async fn resize<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
    flavor_ref: &str,
) -> Result<ActionResult> {
    debug!(instance_id = id, flavor_ref, "resizing database instance");
    action(client, id, json!({ "resize": { "flavorRef": flavor_ref } })).await
}

/// Grow the attached volume to `size` GB; shrinking is not supported
pub async fn resize_volume<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
    size: u32,
) -> Result<ActionResult> {
    debug!(instance_id = id, size, "resizing database volume");
    action(client, id, json!({ "resize": { "volume": { "size": size } } })).await
}

/// Attach a configuration group
pub async fn attach_configuration_group<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
    config_id: &str,
) -> Result<ConfigurationResult> {
    debug!(instance_id = id, config_id, "attaching configuration group");
    replace(client, id, json!({ "instance": { "configuration": config_id } })).await
}

/// Detach whatever configuration group is attached
pub async fn detach_configuration_group<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
) -> Result<ConfigurationResult> {
    debug!(instance_id = id, "detaching configuration group");
    replace(client, id, json!({ "instance": {} })).await
}

/// Stop replicating from `replica_of`, promoting the instance to standalone
pub async fn detach_replica<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
    replica_of: &str,
) -> Result<DetachReplicaResult> {
    debug!(instance_id = id, replica_of, "detaching replica");
    replace(client, id, json!({ "instance": { "replica_of": replica_of } })).await
}

/// POST a verb-keyed body to the action endpoint with default success codes
async fn action<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
    body: Value,
) -> Result<ActionResult> {
    let response = client.post(&action_url(client, id), Some(body), None).await?;
    Ok(response.into())
}

/// PUT a partial instance document; the service answers 202
async fn replace<C: ServiceClient + ?Sized>(
    client: &C,
    id: &str,
    body: Value,
) -> Result<ActionResult> {
    let response = client
        .put(
            &resource_url(client, id),
            body,
            Some(RequestOpts::ok_codes(&[202])),
        )
        .await?;
    Ok(response.into())
}
