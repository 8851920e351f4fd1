pub mod adapters;
pub mod aws;
pub mod configuration;
pub mod domain;
pub mod handlers;
pub mod lambda;
pub mod routes;
pub mod startup;
pub mod transport;
pub mod utils;
