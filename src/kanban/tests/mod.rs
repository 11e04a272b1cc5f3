//! Unit tests for the board, its markdown store and the sync engine.

mod sync_tests;
