//! Shared building blocks for the staking contracts in this workspace.
//!
//! - [`admin_tiers`]: tiered administrator registry used to guard
//!   configuration entry points.

#![no_std]

pub mod admin_tiers;

pub use admin_tiers::*;
