#![allow(dead_code)]

pub mod config;
pub mod fixtures;
pub mod mock_gcs;
pub mod mock_origin;
pub mod server;
