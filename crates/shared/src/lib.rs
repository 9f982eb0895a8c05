//! Types shared between the users client core and its front ends.

pub mod domain;
pub mod error;
