//! Job orchestration over the shared coordination store.
//!
//! The pieces, in dispatch order:
//!
//! - [`JobDispatcher`] — admits a job (quota and concurrency checks), writes
//!   its record and live-registry entry, appends the id to the durable
//!   execution history, and publishes a dispatch notification.
//! - [`DispatchListener`] / [`DispatchFeed`] — the worker side: a
//!   subscription to the dispatch channel that resolves published job ids
//!   into full [`Job`](volley_core::Job) records.
//! - [`StatusMutator`] — applies worker-reported status transitions to the
//!   live registry, deleting the entry once a job reaches a terminal state.
//! - [`RunRegistry`] — read side of the registry: list and count per
//!   workspace.
//! - [`gates`] — the external collaborator traits (quota, membership)
//!   consulted at admission and before checked reads.
//!
//! Everything is stateless between calls and coordinates exclusively
//! through the store handle passed in at construction.

pub mod dispatcher;
pub mod error;
pub mod gates;
pub mod mutator;
pub mod registry;
pub mod worker;

pub use dispatcher::{JobDispatcher, SubmitRequest};
pub use error::OrchestratorError;
pub use gates::{MembershipGate, PlanLimits, QuotaGate};
pub use mutator::StatusMutator;
pub use registry::RunRegistry;
pub use worker::{DispatchFeed, DispatchListener};
