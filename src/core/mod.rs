//! Estimation building blocks: NDVI helpers, endmember search, threshold
//! derivation and the two bare-soil classifiers. These are pure functions
//! over in-memory bands, consumed by the high-level `api` module.
pub mod classify;
pub mod endmembers;
pub mod ndvi;
pub mod params;
pub mod threshold;
