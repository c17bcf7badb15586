use tracing::{debug, info, warn};

use crate::persistence::Persistence;
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskId, normalize_text};
use crate::view::remaining_count;

/// Owns the ordered task list. Every mutator returns `true` when the list
/// changed, in which case the new state has already been written through
/// the persistence adapter and the caller should re-render.
#[derive(Debug, Clone)]
pub struct TaskStore<S> {
    tasks: Vec<Task>,
    persistence: Persistence<S>,
    last_save_ok: bool,
}

impl<S: KeyValueStore> TaskStore<S> {
    #[tracing::instrument(skip(persistence), fields(key = %persistence.key()))]
    pub fn open(persistence: Persistence<S>) -> Self {
        let tasks = persistence.load();
        info!(count = tasks.len(), "task store opened");
        Self {
            tasks,
            persistence,
            last_save_ok: true,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn remaining_count(&self) -> usize {
        remaining_count(&self.tasks)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.remaining_count()
    }

    /// Whether the most recent write reached the backing store.
    pub fn last_save_ok(&self) -> bool {
        self.last_save_ok
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<S> {
        &mut self.persistence
    }

    #[tracing::instrument(skip(self, text))]
    pub fn add(&mut self, text: &str) -> bool {
        let Some(text) = normalize_text(text) else {
            debug!("ignoring blank task text");
            return false;
        };

        let task = Task::new(text);
        debug!(id = %task.id, "adding task");
        self.tasks.push(task);
        self.commit()
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle_complete(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.find_mut(id) else {
            return false;
        };
        task.completed = !task.completed;
        debug!(completed = task.completed, "toggled task");
        self.commit()
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.tasks.remove(idx);
        debug!(index = idx, "deleted task");
        self.commit()
    }

    /// Replaces a task's text. Text that trims to nothing deletes the task.
    #[tracing::instrument(skip(self, new_text), fields(id = %id))]
    pub fn edit(&mut self, id: &TaskId, new_text: &str) -> bool {
        let Some(text) = normalize_text(new_text) else {
            debug!("blank edit; deleting task");
            return self.delete(id);
        };

        let Some(task) = self.find_mut(id) else {
            return false;
        };
        if task.text == text {
            return false;
        }
        task.text = text;
        self.commit()
    }

    #[tracing::instrument(skip(self))]
    pub fn clear_completed(&mut self) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return false;
        }
        debug!(removed, "cleared completed tasks");
        self.commit()
    }

    /// Moves `source` so it sits immediately before `target`, keeping every
    /// other task in its relative order.
    #[tracing::instrument(skip(self), fields(source = %source, target = %target))]
    pub fn reorder(&mut self, source: &TaskId, target: &TaskId) -> bool {
        if !move_before(&mut self.tasks, source, target) {
            return false;
        }
        self.commit()
    }

    pub fn move_up(&mut self, id: &TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        if idx == 0 {
            return false;
        }
        let previous = self.tasks[idx - 1].id.clone();
        self.reorder(id, &previous)
    }

    pub fn move_down(&mut self, id: &TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let Some(next) = self.tasks.get(idx + 1).map(|task| task.id.clone()) else {
            return false;
        };
        self.reorder(&next, id)
    }

    /// Re-reads the list from storage, dropping in-memory state.
    #[tracing::instrument(skip(self))]
    pub fn reload(&mut self) -> bool {
        self.tasks = self.persistence.load();
        info!(count = self.tasks.len(), "reloaded tasks");
        true
    }

    fn commit(&mut self) -> bool {
        self.last_save_ok = self.persistence.save(&self.tasks);
        if !self.last_save_ok {
            warn!(
                count = self.tasks.len(),
                "change kept in memory only; next successful save will catch up"
            );
        }
        true
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        let idx = self.tasks.iter().position(|task| &task.id == id);
        if idx.is_none() {
            debug!(id = %id, "no task with id");
        }
        idx
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        let idx = self.position(id)?;
        self.tasks.get_mut(idx)
    }
}

/// Removes `source` and re-inserts it at `target`'s index in the shortened
/// list. No-op when either id is absent or both are the same.
pub fn move_before(tasks: &mut Vec<Task>, source: &TaskId, target: &TaskId) -> bool {
    if source == target {
        return false;
    }
    let Some(src_idx) = tasks.iter().position(|task| &task.id == source) else {
        return false;
    };
    if !tasks.iter().any(|task| &task.id == target) {
        return false;
    }

    let item = tasks.remove(src_idx);
    let Some(dst_idx) = tasks.iter().position(|task| &task.id == target) else {
        tasks.insert(src_idx, item);
        return false;
    };
    tasks.insert(dst_idx, item);
    true
}
