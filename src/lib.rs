//! Bootstrap installer for the RoadRunner application server.

pub mod cli;
pub mod config;
pub mod install;
