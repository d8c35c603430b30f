//! Active-poll synchronization and anonymous device identity for live-event
//! audience views.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod identity;
pub mod panel;
pub mod sse;
pub mod startup;
