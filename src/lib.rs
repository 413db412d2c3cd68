//! Build/runtime glue for a statically generated personal site: the
//! form-submission webhook, the code block bridge, and the host bootstrap
//! that answers the UI application's scroll signals.

pub mod blocks;
pub mod configuration;
pub mod domain;
pub mod routes;
pub mod scroll;
pub mod startup;
pub mod subscription_client;
pub mod telemetry;
