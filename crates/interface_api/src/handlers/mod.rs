//! Request handlers

pub mod admin;
pub mod claims;
pub mod compliances;
pub mod health;
