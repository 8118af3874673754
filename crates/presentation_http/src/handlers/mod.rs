//! HTTP request handlers

pub mod envelope;
