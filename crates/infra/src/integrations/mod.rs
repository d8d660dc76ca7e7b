//! External service integrations

pub mod acuity;
pub mod igloo;
