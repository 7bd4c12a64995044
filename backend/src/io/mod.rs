//! # IO Layer
//!
//! Interfaces that expose the domain to the outside world. Today that is the
//! versioned JSON REST API.

pub mod rest;
