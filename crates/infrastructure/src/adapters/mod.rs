//! Adapters implementing application ports

mod downstream;
mod grpc_client;
mod http_client;
mod http_egress;

pub use downstream::build_clients;
pub use grpc_client::{GrpcClientAdapter, build_grpc_clients};
pub use http_client::{HttpClientAdapter, build_http_clients};
pub use http_egress::{HttpEgressStrategy, METHOD_ARG, TIMEOUT_ARG, URL_ARG};
