//! Test utilities for the twitch-gql crate
//!
//! This module provides fixtures and a simulated GraphQL server for testing.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
