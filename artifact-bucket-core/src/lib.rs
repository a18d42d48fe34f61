#![doc = "artifact-bucket-core: packaging and publishing logic for artifact-bucket."]

//! This crate turns a [`config::BuildConfig`] into files in a staging folder and pushes
//! them through an [`contract::Uploader`]. It has no cloud SDK dependency; the CLI crate
//! supplies the S3 implementation.
//!
//! # Usage
//! - [`generate::build`] prepares the staging folder and generates every artifact.
//! - [`publish::publish`] uploads generated artifacts and reports per-artifact outcomes.

pub mod archive;
pub mod artifact;
pub mod config;
pub mod contract;
pub mod error;
pub mod generate;
pub mod publish;
pub mod staging;
