//! Bima Review - Insurance plan bundle extraction and review.
//!
//! Uploads a policy document to an external extraction service, lets the
//! user review and edit the returned NHCX insurance plan bundle as text,
//! and exports it as `NHCX_InsurancePlan_Bundle.json` once the text is
//! well-formed JSON.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
