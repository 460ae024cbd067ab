//! Resource URLs for instance operations

use crate::client::ServiceClient;

/// Collection endpoint
pub fn base_url<C: ServiceClient + ?Sized>(client: &C) -> String {
    client.service_url(&["instances"])
}

/// Single instance; the id is percent-encoded as one path segment
pub fn resource_url<C: ServiceClient + ?Sized>(client: &C, id: &str) -> String {
    let id = urlencoding::encode(id);
    client.service_url(&["instances", &*id])
}

/// Root user sub-resource
pub fn user_root_url<C: ServiceClient + ?Sized>(client: &C, id: &str) -> String {
    let id = urlencoding::encode(id);
    client.service_url(&["instances", &*id, "root"])
}

/// Action endpoint accepting verb-keyed bodies
pub fn action_url<C: ServiceClient + ?Sized>(client: &C, id: &str) -> String {
    let id = urlencoding::encode(id);
    client.service_url(&["instances", &*id, "action"])
}
