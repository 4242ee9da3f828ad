//! Authorization and notification seams
//!
//! The engine never computes permissions itself: it asks an external
//! `Authorizer` before mutating state and fails `PermissionDenied` on deny.
//! Capabilities are a closed {module, action} pair rather than arbitrary
//! strings, so a misspelled permission cannot silently allow anything.

use crate::types::{ActorId, ProjectId, TaskId};
use async_trait::async_trait;
use std::fmt;

/// Engine modules a capability can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Project,
    Board,
    Column,
    Task,
    Sprint,
    Analytics,
}

/// Actions a capability can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Create,
    Read,
    Update,
    Delete,
    Move,
    Transition,
}

/// A typed {module, action} capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability {
    pub module: Module,
    pub action: ActionKind,
}

impl Capability {
    /// Build a capability
    pub const fn new(module: Module, action: ActionKind) -> Self {
        Self { module, action }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}.{:?}", self.module, self.action)
    }
}

/// External authorization check supplied by the RBAC subsystem
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Whether `actor` may perform `capability` within `project`
    async fn check(&self, actor: &ActorId, project: &ProjectId, capability: Capability) -> bool;
}

/// Permits everything. Default for embedded and test use.
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    async fn check(&self, _actor: &ActorId, _project: &ProjectId, _capability: Capability) -> bool {
        true
    }
}

/// Notification emitter invoked fire-and-forget after assignee changes.
/// The engine never waits on or fails from it.
pub trait Notifier: Send + Sync {
    /// A task's assignee set changed
    fn task_assigned(&self, task: &TaskId, assignees: &[ActorId]);
}

/// Swallows all notifications. Default for embedded and test use.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn task_assigned(&self, _task: &TaskId, _assignees: &[ActorId]) {}
}
