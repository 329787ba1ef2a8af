//! End-to-end tests against a real server bound to an ephemeral port.

mod helpers;

mod auth_test;
mod http_test;
mod liveness_test;
mod presence_test;
mod relay_test;
mod typing_test;
