use tracing::debug;

use crate::drag::{DragController, ReorderRequest};
use crate::filter::{Filter, FilterController};
use crate::persistence::Persistence;
use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::view::ListView;

/// Discrete UI intents. Front-ends translate their own events into these
/// and hand them to [`Session::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Add(String),
    Toggle(TaskId),
    Delete(TaskId),
    Edit(TaskId, String),
    ClearCompleted,
    Reorder { source: TaskId, target: TaskId },
    MoveUp(TaskId),
    MoveDown(TaskId),
    SetFilter(String),
    DragStart(TaskId),
    Drop {
        target: TaskId,
        payload: Option<TaskId>,
    },
    DragEnd,
    Reload,
}

/// Single owner of the task store, the active filter and the drag
/// gesture. One message is applied at a time, to completion.
#[derive(Debug, Clone)]
pub struct Session<S> {
    store: TaskStore<S>,
    filter: FilterController,
    drag: DragController,
}

impl<S: KeyValueStore> Session<S> {
    pub fn open(persistence: Persistence<S>) -> Self {
        Self {
            store: TaskStore::open(persistence),
            filter: FilterController::new(),
            drag: DragController::new(),
        }
    }

    /// Applies `msg`; returns whether the view needs to be redrawn.
    #[tracing::instrument(skip(self))]
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        match msg {
            Msg::Add(text) => self.store.add(&text),
            Msg::Toggle(id) => self.store.toggle_complete(&id),
            Msg::Delete(id) => self.store.delete(&id),
            Msg::Edit(id, text) => self.store.edit(&id, &text),
            Msg::ClearCompleted => self.store.clear_completed(),
            Msg::Reorder { source, target } => self.store.reorder(&source, &target),
            Msg::MoveUp(id) => self.store.move_up(&id),
            Msg::MoveDown(id) => self.store.move_down(&id),
            Msg::SetFilter(token) => self.filter.set_filter(&token),
            Msg::DragStart(id) => {
                self.drag.start(id);
                true
            }
            Msg::Drop { target, payload } => {
                match self.drag.drop_on(target, payload) {
                    Some(ReorderRequest { source, target }) => {
                        self.store.reorder(&source, &target);
                    }
                    None => debug!("drop produced no reorder"),
                }
                // the dragging highlight goes away either way
                true
            }
            Msg::DragEnd => {
                let was_dragging = self.drag.dragging().is_some();
                self.drag.end();
                was_dragging
            }
            Msg::Reload => self.reload(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn reload(&mut self) -> bool {
        self.store.reload()
    }

    pub fn filter(&self) -> Filter {
        self.filter.active()
    }

    pub fn set_filter(&mut self, filter: Filter) -> bool {
        self.filter.set(filter)
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    pub fn dragging(&self) -> Option<&TaskId> {
        self.drag.dragging()
    }

    pub fn view(&self) -> ListView {
        ListView::derive(self.store.tasks(), self.filter.active(), self.drag.dragging())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session(texts: &[&str]) -> Session<MemoryStore> {
        let mut session = Session::open(Persistence::new(MemoryStore::new()));
        for text in texts {
            session.dispatch(Msg::Add(text.to_string()));
        }
        session
    }

    fn texts(session: &Session<MemoryStore>) -> Vec<String> {
        session.tasks().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn drag_and_drop_reorders() {
        let mut session = session(&["A", "B", "C", "D"]);
        let c = session.tasks()[2].id.clone();
        let a = session.tasks()[0].id.clone();

        assert!(session.dispatch(Msg::DragStart(c)));
        assert!(session.view().rows[2].dragging);
        assert!(session.dispatch(Msg::Drop {
            target: a,
            payload: None
        }));

        assert_eq!(texts(&session), vec!["C", "A", "B", "D"]);
        assert!(session.dragging().is_none());
    }

    #[test]
    fn drop_on_unknown_target_only_resets_drag() {
        let mut session = session(&["A", "B"]);
        let a = session.tasks()[0].id.clone();

        session.dispatch(Msg::DragStart(a));
        session.dispatch(Msg::Drop {
            target: TaskId::from("gone"),
            payload: None,
        });
        assert_eq!(texts(&session), vec!["A", "B"]);
        assert!(session.dragging().is_none());
    }

    #[test]
    fn drag_end_without_drop_changes_nothing() {
        let mut session = session(&["A", "B"]);
        let b = session.tasks()[1].id.clone();

        session.dispatch(Msg::DragStart(b));
        assert!(session.dispatch(Msg::DragEnd));
        assert!(!session.dispatch(Msg::DragEnd));
        assert_eq!(texts(&session), vec!["A", "B"]);
    }

    #[test]
    fn filter_messages() {
        let mut session = session(&["A", "B"]);
        let a = session.tasks()[0].id.clone();
        session.dispatch(Msg::Toggle(a));

        assert!(session.dispatch(Msg::SetFilter("active".to_string())));
        assert!(!session.dispatch(Msg::SetFilter("bogus".to_string())));
        assert_eq!(session.filter(), Filter::Active);

        let view = session.view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].text, "B");
        assert_eq!(view.remaining, 1);
    }

    #[test]
    fn reload_reads_store_again() {
        let mut session = session(&["A"]);
        session
            .store_mut()
            .persistence_mut()
            .store_mut()
            .insert_raw(crate::persistence::DEFAULT_STORAGE_KEY, "{not json");

        assert!(session.dispatch(Msg::Reload));
        assert!(session.tasks().is_empty());
    }

    #[test]
    fn filter_is_not_persisted() {
        let mut first = session(&["A"]);
        first.set_filter(Filter::Completed);
        let store = first.store().persistence().store().clone();

        let second = Session::open(Persistence::new(store));
        assert_eq!(second.filter(), Filter::All);
        assert_eq!(texts(&second), vec!["A"]);
    }
}
