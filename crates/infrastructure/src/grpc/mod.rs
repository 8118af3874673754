//! tonic channel construction and target validation

mod channel;

pub use channel::{build_channel, parse_grpc_target};
