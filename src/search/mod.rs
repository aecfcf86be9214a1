//! Photo search: the single-route proxy, its upstream client, and the caller-side client.

pub mod client;
pub mod model;
pub mod proxy;
pub mod upstream;
