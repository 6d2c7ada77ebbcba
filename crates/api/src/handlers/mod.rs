//! Request handlers for the ingress API.
//!
//! [`notify`] hosts the publish endpoints the backend calls; [`status`]
//! answers presence and service-info queries.

pub mod notify;
pub mod status;
