use super::observable::Observable;
use crate::api::{ApiError, ApiResult, TaskService};
use crate::types::{Task, TaskDraft, TaskPatch};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct TaskBoardState {
    /// Server order, newest creations first.
    pub tasks: Vec<Task>,
    /// True until the first load settles.
    pub loading: bool,
}

impl Default for TaskBoardState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
        }
    }
}

impl TaskBoardState {
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn count_label(&self) -> String {
        match self.tasks.len() {
            1 => "1 task total".to_string(),
            n => format!("{n} tasks total"),
        }
    }
}

/// Issues per-task tickets. Only the most recently issued ticket for an id
/// may write that task back into the list, and an id whose delete succeeded
/// never comes back, not even through a list fetch that was already in
/// flight.
#[derive(Default)]
struct RequestSequencer {
    next: Cell<u64>,
    latest: RefCell<HashMap<String, u64>>,
    deleted: RefCell<HashSet<String>>,
}

impl RequestSequencer {
    fn issue(&self, id: &str) -> u64 {
        let ticket = self.next.get() + 1;
        self.next.set(ticket);
        self.latest.borrow_mut().insert(id.to_string(), ticket);
        ticket
    }

    fn is_latest(&self, id: &str, ticket: u64) -> bool {
        self.latest.borrow().get(id) == Some(&ticket)
    }

    fn mark_deleted(&self, id: &str) {
        self.latest.borrow_mut().remove(id);
        self.deleted.borrow_mut().insert(id.to_string());
    }

    fn is_deleted(&self, id: &str) -> bool {
        self.deleted.borrow().contains(id)
    }
}

/// The dashboard's task list and the operations that keep it in step with
/// the server.
///
/// Overlapping requests on the same task are resolved by issue order: a
/// response is applied only if no newer request for that id was started
/// since. A successful delete is always applied and nothing re-inserts a
/// deleted id. Any failed mutation triggers [`TaskBoard::reconcile`].
#[derive(Clone)]
pub struct TaskBoard {
    service: TaskService,
    state: Observable<TaskBoardState>,
    sequencer: Rc<RequestSequencer>,
}

impl TaskBoard {
    pub fn new(service: TaskService) -> Self {
        Self {
            service,
            state: Observable::new(TaskBoardState::default()),
            sequencer: Rc::new(RequestSequencer::default()),
        }
    }

    pub fn state(&self) -> &Observable<TaskBoardState> {
        &self.state
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.with(|s| s.tasks.clone())
    }

    /// Loads the list. Failures are logged and leave the current list alone.
    pub async fn refresh(&self) {
        self.state.update(|s| s.loading = true);
        match self.service.list().await {
            Ok(tasks) => self.state.update(|s| {
                s.tasks = self.settle(tasks);
                s.loading = false;
            }),
            Err(err) => {
                warn!("failed to fetch tasks: {err}");
                self.state.update(|s| s.loading = false);
            }
        }
    }

    /// Re-reads the list after a failed mutation so local state matches the
    /// server again.
    pub async fn reconcile(&self) {
        match self.service.list().await {
            Ok(tasks) => {
                let tasks = self.settle(tasks);
                self.state.update(|s| s.tasks = tasks);
            }
            Err(err) => warn!("failed to resynchronize tasks: {err}"),
        }
    }

    pub async fn create(&self, draft: &TaskDraft) -> ApiResult<Task> {
        let task = self.service.create(draft).await?;
        self.state.update(|s| {
            s.tasks.retain(|existing| existing.id != task.id);
            s.tasks.insert(0, task.clone());
        });
        Ok(task)
    }

    pub async fn update(&self, id: &str, patch: &TaskPatch) -> ApiResult<Task> {
        let ticket = self.sequencer.issue(id);
        match self.service.update(id, patch).await {
            Ok(task) => {
                self.apply(id, ticket, &task);
                Ok(task)
            }
            Err(err) => Err(self.recover(id, err).await),
        }
    }

    /// Flips `completed` based on the local copy.
    pub async fn toggle(&self, id: &str) -> ApiResult<Task> {
        let current = self.state.with(|s| s.find(id).map(|task| task.completed));
        let target = !current.unwrap_or(false);
        self.set_completed(id, target).await
    }

    /// Sends an explicit completion value, showing it locally right away.
    pub async fn set_completed(&self, id: &str, completed: bool) -> ApiResult<Task> {
        let ticket = self.sequencer.issue(id);
        self.state.update(|s| {
            if let Some(task) = s.tasks.iter_mut().find(|task| task.id == id) {
                task.completed = completed;
            }
        });

        match self.service.set_completed(id, completed).await {
            Ok(task) => {
                self.apply(id, ticket, &task);
                Ok(task)
            }
            Err(err) => Err(self.recover(id, err).await),
        }
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.sequencer.issue(id);
        match self.service.delete(id).await {
            Ok(_) => {
                self.sequencer.mark_deleted(id);
                self.state
                    .update(|s| s.tasks.retain(|task| task.id != id));
                Ok(())
            }
            Err(err) => Err(self.recover(id, err).await),
        }
    }

    fn apply(&self, id: &str, ticket: u64, task: &Task) -> bool {
        if !self.sequencer.is_latest(id, ticket) {
            debug!(task_id = id, ticket, "dropping superseded task response");
            return false;
        }
        self.state.update(|s| {
            match s.tasks.iter_mut().find(|existing| existing.id == id) {
                Some(slot) => {
                    *slot = task.clone();
                    true
                }
                None => false,
            }
        })
    }

    /// Server list minus duplicates and anything deleted since it was read.
    fn settle(&self, tasks: Vec<Task>) -> Vec<Task> {
        dedupe(tasks)
            .into_iter()
            .filter(|task| !self.sequencer.is_deleted(&task.id))
            .collect()
    }

    async fn recover(&self, id: &str, err: ApiError) -> ApiError {
        warn!(task_id = id, "task update failed: {err}");
        self.reconcile().await;
        err
    }
}

fn dedupe(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect()
}
