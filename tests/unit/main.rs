//! Integration tests, organized by area:
//! - `proto_pipeline` - coordinate unit driven end to end on literal sequences
//! - `database` - annotation store round trips on disk
//! - `workflow` - full CLI command chain on a synthetic genome

mod database;
mod proto_pipeline;
mod workflow;
