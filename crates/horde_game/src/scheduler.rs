//! Deferred tasks on the simulation clock
//!
//! Death teardown is split into a fade and a removal scheduled for later
//! ticks. Tasks carry the agent they belong to, so removing the agent
//! through another path can cancel them, and a task that fires for an agent
//! that is already gone does nothing.

use horde_core::Id;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Work to run once its due time passes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Start fading an agent's node out
    FadeOut { agent: Id, duration: f32 },
    /// Release an agent's body and node
    RemoveAgent { agent: Id },
}

impl DeferredTask {
    pub fn agent(&self) -> Id {
        match self {
            Self::FadeOut { agent, .. } | Self::RemoveAgent { agent } => *agent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scheduled {
    id: TaskId,
    due: f64,
    task: DeferredTask,
}

/// Pending deferred tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to run at simulation time `due`
    pub fn schedule(&mut self, due: f64, task: DeferredTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { id, due, task });
        id
    }

    /// Cancel a task. Returns false if it already ran or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Cancel every task belonging to an agent, returning how many were dropped
    pub fn cancel_for_agent(&mut self, agent: Id) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| s.task.agent() != agent);
        before - self.pending.len()
    }

    /// Remove and return every task due at `now`, earliest first.
    ///
    /// Tasks due at the same time come back in scheduling order.
    pub fn take_due(&mut self, now: f64) -> Vec<(TaskId, DeferredTask)> {
        let (mut due, pending): (Vec<Scheduled>, Vec<Scheduled>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|s| (s.id, s.task)).collect()
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|s| s.due).min_by(|a, b| a.total_cmp(b))
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Id = Id::new(1, 0);
    const B: Id = Id::new(2, 0);

    #[test]
    fn test_take_due_orders_by_time() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(5.0, DeferredTask::RemoveAgent { agent: A });
        let early = scheduler.schedule(4.0, DeferredTask::FadeOut { agent: A, duration: 1.0 });
        scheduler.schedule(9.0, DeferredTask::RemoveAgent { agent: B });

        assert!(scheduler.take_due(3.9).is_empty());
        let due: Vec<TaskId> = scheduler.take_due(5.0).into_iter().map(|(id, _)| id).collect();
        assert_eq!(due, vec![early, late]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(9.0));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(1.0, DeferredTask::RemoveAgent { agent: A });
        assert!(scheduler.is_scheduled(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.take_due(2.0).is_empty());
    }

    #[test]
    fn test_cancel_for_agent() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, DeferredTask::FadeOut { agent: A, duration: 1.0 });
        scheduler.schedule(2.0, DeferredTask::RemoveAgent { agent: A });
        let other = scheduler.schedule(2.0, DeferredTask::RemoveAgent { agent: B });

        assert_eq!(scheduler.cancel_for_agent(A), 2);
        assert_eq!(scheduler.cancel_for_agent(A), 0);
        assert_eq!(scheduler.take_due(10.0), vec![(other, DeferredTask::RemoveAgent { agent: B })]);
    }
}
