//! Client and polling loop for the autonomous agent service.
//!
//! The service exposes agent statuses, their notifications, recent
//! thoughts, manual triggers, and a health check over HTTP/JSON.
//! [`StatusPoller`] keeps a cached snapshot of statuses and notifications
//! that is only ever replaced as a whole.

pub mod client;
pub mod poller;
pub mod protocol;

pub use client::{AgentDirectory, AgentServiceClient, AgentServiceConfig, AgentServiceError};
pub use poller::{AgentSnapshot, StatusPoller};
pub use protocol::{AgentNotification, AgentStatus, HealthStatus, Thought};
