//! Integration test common infrastructure.
//!
//! Provides utilities for spawning `usagid` instances and driving them over
//! HTTP without following redirects.

pub mod server;

#[allow(unused_imports)]
pub use server::TestServer;
