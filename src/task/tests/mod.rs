//! Unit tests for the task codec.
