//! Step-driven clearance workflow for creative-rights requests.
//!
//! A client opens projects and files requests (processes) for works. Each
//! process then moves through a fixed sequence of steps; processors whose
//! roles permit a step pick processes from that step's queue, fill in the
//! step's form, and submit them onward.
//!
//! [`store::WorkflowStore`] is the processor session and
//! [`client::ClientStore`] the client session. Both talk to storage only
//! through [`service::DataService`].
pub mod brief;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod message;
pub mod model;
pub mod navigator;
pub mod notes;
pub mod service;
pub mod steps;
pub mod store;
mod templates;
pub mod util;
pub mod workflow;
