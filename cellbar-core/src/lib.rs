// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # cellbar Core
//!
//! Core types and models for the cellbar workspace.
//!
//! This crate provides the domain vocabulary shared by the store boundary
//! and the monitor layer:
//!
//! - [`TrafficProfile`] - which tracking context a data counter follows
//! - [`CounterSnapshot`] - the state tuple delivered to counter subscribers
//! - [`NetworkState`] / [`RegistrationStatus`] / [`RadioAccess`] - cellular
//!   registration state as reported by the telephony middleware
//! - [`SimStatus`] - SIM card state
//!
//! Everything here is plain data: no IO, no locking, no platform calls.

pub mod models;

pub use models::{
    CounterSnapshot, NetworkInfo, NetworkState, RadioAccess, RegistrationStatus, SimStatus,
    TrafficProfile,
};
