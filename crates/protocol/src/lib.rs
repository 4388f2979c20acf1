//! Wire vocabulary for the LMS runtime APIs.
//!
//! This crate holds the names and values that appear on the boundary with a
//! host-injected LMS API object: which global property exposes it, which
//! method names each protocol variant answers to, which data-model fields
//! carry completion and exit state, and how loosely-typed host results
//! coerce to booleans and strings.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No host calls, no session state
//! - **1:1 with the host surface**: Method and field names match the SCORM
//!   1.2, SCORM 2004 and AICC run-time environments
//! - **Stable**: Changes only when a host surface changes
//!
//! The session state machine that drives these calls lives in `scorm-rs`.

pub mod fields;
pub mod methods;
pub mod value;
pub mod version;

pub use fields::*;
pub use methods::*;
pub use value::*;
pub use version::*;
