//! Provider and callback traits
//!
//! These traits keep the executor independent of any particular remote
//! client, progress display or confirmation prompt.

use crate::error::Operation;
use crate::resource::Reconcilable;
use crate::types::ApplyResult;
use anyhow::Result;

/// Writer of remote state for one resource type
///
/// The executor is the only caller; implementations perform one blocking
/// remote call per method.
pub trait RemoteStore<T: Reconcilable> {
    /// Create the resource remotely, returning the id it was assigned
    fn insert(&self, resource: &T) -> Result<String>;

    /// Destroy the remote resource with the given id
    fn destroy(&self, id: &str) -> Result<()>;
}

/// Progress callback for execution operations
pub trait ProgressCallback {
    /// Called when starting a batch of creates or deletes
    fn on_phase_start(&mut self, operation: Operation, count: usize);

    /// Called before a single remote call
    fn on_resource_start(&mut self, operation: Operation, resource: &str);

    /// Called when a resource has been handled
    fn on_resource_complete(&mut self, resource: &str, result: &ApplyResult);

    /// Called when a batch completes
    fn on_phase_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// Returns `true` if the user confirmed.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&mut self, _operation: Operation, _count: usize) {}
    fn on_resource_start(&mut self, _operation: Operation, _resource: &str) {}
    fn on_resource_complete(&mut self, _resource: &str, _result: &ApplyResult) {}
    fn on_phase_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
