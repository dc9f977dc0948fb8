//! HTTP plumbing for external services

mod client;

pub use client::{HttpClient, HttpClientBuilder};
