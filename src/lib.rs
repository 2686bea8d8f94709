//! Contact, organization, note and task management.
//!
//! Every operation runs against one of two interchangeable backends: the
//! local SQLite store in [`db`], or a remote peer speaking the HTTP API in
//! [`api`]. The [`service`] module selects the backend once at startup and
//! hides the choice from callers.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
