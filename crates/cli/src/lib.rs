//! Conformance harness for LMS sessions.
//!
//! Replays a JSON session script against an in-memory LMS placed somewhere in
//! a mock window hierarchy, and reports what each public operation returned.

pub mod cli;
pub mod commands;
pub mod error;
pub mod fixture;
pub mod logging;
pub mod output;
pub mod run;
