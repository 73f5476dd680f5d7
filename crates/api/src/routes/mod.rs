//! HTTP Route Handlers

pub mod model;
pub mod predict;
pub mod service;
