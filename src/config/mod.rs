//! Configuration module for beanbudget
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BeanbudgetPaths;
pub use settings::{ReportLayout, Settings};
