//! Blocking client for the Zuora event trigger, notification definition and
//! communication profile APIs.
//!
//! [`HttpBackend`] implements [`Backend`] against a live tenant. The
//! [`TriggerStore`] and [`NotificationStore`] adapters plug a backend into
//! the `reconcile` executor.

pub mod auth;
pub mod backend;
pub mod error;
pub mod store;

pub use auth::{Credentials, Token};
pub use backend::http::{ClientConfig, HttpBackend};
pub use backend::{Backend, MockBackend};
pub use error::{Error, ErrorCategory, Result};
pub use store::{NotificationStore, TriggerStore};
