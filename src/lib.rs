pub mod allocation;
pub mod applications;
pub mod config;
pub mod display;
pub mod eligibility;
pub mod export;
pub mod model;
pub mod stats;
pub mod store;
