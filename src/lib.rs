//! package-update - dependency update pull requests for npm projects
//!
//! This library provides the core functionality for:
//! - Reading the project and installed package manifests
//! - Comparing installed versions before and after an update
//! - Rendering the comparison as Markdown or an aligned text table
//! - Driving git and the hosting API to propose the update

pub mod cli;
pub mod domain;
pub mod error;
pub mod forge;
pub mod git;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
