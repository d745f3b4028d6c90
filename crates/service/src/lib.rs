//! Forge Service - data bindings for administered entities
//!
//! Defines the [`CrudService`] contract and its bindings:
//! - [`RemoteService`]: REST resource over HTTP
//! - [`MockService`]: in-memory list with optional simulated latency
//! - [`ReadOnlyService`]: refuses mutations
//! - [`ParentScopedService`] / [`ParentKeyed`]: parent scoping for nested entities

pub mod http;
pub mod mock;
pub mod parent;
pub mod read_only;
pub mod remote;
pub mod service;

pub use mock::MockService;
pub use parent::{ParentKeyed, ParentScopedService, Unscoped};
pub use read_only::ReadOnlyService;
pub use remote::RemoteService;
pub use service::{CrudService, ParentAwareService, ServiceBinding};
