//! Member schemas and their endpoints.
//!
//! `POST /members` stores a member sent in any schema version and
//! `GET /members/@id` serves it back in the version the client accepts.

pub mod api;
pub mod domain;
pub mod generated;

use std::sync::Arc;

use simple_endpoints::Router;

pub use api::endpoints::{CreateMemberEndpoint, GetMemberEndpoint, MemberParams};
pub use domain::error::MemberError;
pub use domain::store::{upgrade, MemberStore};

/// Register the member endpoints on `router`.
///
/// `development` pretty-prints response bodies.
pub fn register(router: &mut Router, store: Arc<MemberStore>, development: bool) {
    router
        .register(CreateMemberEndpoint::new(store.clone(), development))
        .register(GetMemberEndpoint::new(store, development));
}
