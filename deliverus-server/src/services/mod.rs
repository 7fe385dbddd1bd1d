//! Business services
//!
//! Handlers receive entities already loaded and authorized by the guard
//! chain; services validate payloads, apply pricing and visibility rules
//! and talk to the repositories.

pub mod order;
pub mod product;
pub mod restaurant;
pub mod user;
