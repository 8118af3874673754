//! Application services

mod fire_and_forget;
mod request_handler;
mod service;
mod termination;

pub use fire_and_forget::FireAndForgetClient;
pub use request_handler::RequestHandler;
pub use service::{Service, StopReason};
pub use termination::TerminationSignal;
