//! Feasibility and prioritisation engine for municipal biogas potential.
//!
//! The engine turns per-municipality resource potential into revenue projections, investment
//! requirements, payback, NPV, risk classification and a weighted priority ranking, then
//! aggregates the results by region.
#![warn(missing_docs)]

pub mod appraisal;
pub mod cli;
pub mod entity;
pub mod error;
pub mod example;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod portfolio;
pub mod regional;
pub mod scenario;
pub mod settings;

#[cfg(test)]
mod fixture;
