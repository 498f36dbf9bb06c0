//! Provider dispatch core for omnipkg.
//!
//! This crate defines the contract between the front-end command and an
//! arbitrary number of package-management provider backends. It depends
//! only on `omnipkg-types` -- never on `omnipkg-infra` or any IO crate.

pub mod source;
