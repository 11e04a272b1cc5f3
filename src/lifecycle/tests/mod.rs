//! Unit tests for the lifecycle controller and its adapters.

mod controller_tests;
mod support;
