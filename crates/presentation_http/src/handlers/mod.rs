//! HTTP request handlers

pub mod faults;
pub mod health;
