//! End-to-End Integration Tests
//!
//! These tests drive full login events through the sync hook against the
//! in-memory storage backend.

mod common;
mod group_sync;
mod migration;
