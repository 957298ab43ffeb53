//! Dog weight-management backend: health math, milestone tracking and an
//! offline-first write path in front of a Postgres store.

pub mod app;
pub mod config;
pub mod dogs;
pub mod error;
pub mod feeding;
pub mod health;
pub mod milestones;
pub mod models;
pub mod offline;
pub mod remote;
pub mod state;
pub mod weigh_ins;
