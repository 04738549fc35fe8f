//! Tiered thumbnail cache for timeline filmstrips.

pub mod cache;
pub mod service;
pub mod tiers;
pub mod view;
