//! Client for the lifecycle-assessment (LCA) backend.
//!
//! [`pipeline::Assessor`] validates an [`assessment::AssessmentRequest`],
//! sends it through [`api::LcaClient`] with bounded retry, and turns the
//! backend's loosely typed answer into a [`report::AssessmentReport`] via
//! [`normalize::Normalizer`].

pub mod api;
pub mod assessment;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod http;
pub mod normalize;
pub mod pipeline;
pub mod report;
