use crate::filter::{
  Filter,
  visible_tasks
};
use crate::task::{
  Task,
  TaskId
};

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct TaskRow {
  pub id:           TaskId,
  pub text:         String,
  pub completed:    bool,
  pub dragging:     bool,
  pub toggle_label: &'static str,
  pub pressed:      &'static str
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct FilterTab {
  pub filter:   Filter,
  pub label:    &'static str,
  pub selected: bool
}

impl FilterTab {
  pub fn aria_selected(
    &self
  ) -> &'static str {
    if self.selected {
      "true"
    } else {
      "false"
    }
  }
}

/// Everything a front-end needs to draw the list. Derived, never mutated.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct ListView {
  pub rows:                Vec<TaskRow>,
  pub filter:              Filter,
  pub tabs:                Vec<FilterTab>,
  /// Incomplete tasks across the whole list, whatever the filter.
  pub remaining:           usize,
  pub remaining_label:     String,
  pub is_empty:            bool,
  pub empty_message:       &'static str,
  pub can_clear_completed: bool
}

impl ListView {
  pub fn derive(
    tasks: &[Task],
    filter: Filter,
    dragging: Option<&TaskId>
  ) -> Self {
    let rows: Vec<TaskRow> =
      visible_tasks(tasks, filter)
        .into_iter()
        .map(|task| {
          TaskRow {
            id:           task.id.clone(),
            text:         task.text.clone(),
            completed:    task.completed,
            dragging:     dragging
              == Some(&task.id),
            toggle_label: if task.completed {
              "Mark as active"
            } else {
              "Mark as completed"
            },
            pressed:      if task.completed {
              "true"
            } else {
              "false"
            }
          }
        })
        .collect();

    let remaining =
      remaining_count(tasks);
    let tabs = Filter::ALL
      .into_iter()
      .map(|candidate| FilterTab {
        filter:   candidate,
        label:    candidate.label(),
        selected: candidate == filter
      })
      .collect();

    Self {
      is_empty: rows.is_empty(),
      empty_message: empty_message(
        filter
      ),
      rows,
      filter,
      tabs,
      remaining,
      remaining_label: remaining_label(
        remaining
      ),
      can_clear_completed: tasks
        .iter()
        .any(|task| task.completed)
    }
  }
}

pub fn remaining_count(
  tasks: &[Task]
) -> usize {
  tasks
    .iter()
    .filter(|task| !task.completed)
    .count()
}

pub fn remaining_label(
  remaining: usize
) -> String {
  if remaining == 1 {
    "1 item left".to_string()
  } else {
    format!("{remaining} items left")
  }
}

fn empty_message(
  filter: Filter
) -> &'static str {
  match filter {
    | Filter::All => {
      "No tasks yet. Add one above."
    }
    | Filter::Active => {
      "Nothing left to do."
    }
    | Filter::Completed => {
      "No completed tasks."
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{
    ListView,
    remaining_label
  };
  use crate::filter::Filter;
  use crate::task::Task;

  fn tasks(
    flags: &[bool]
  ) -> Vec<Task> {
    flags
      .iter()
      .map(|done| {
        let mut task =
          Task::new("t".to_string());
        task.completed = *done;
        task
      })
      .collect()
  }

  #[test]
  fn remaining_ignores_filter() {
    let list =
      tasks(&[true, false, true, false]);
    for filter in Filter::ALL {
      let view = ListView::derive(
        &list, filter, None
      );
      assert_eq!(view.remaining, 2);
      assert_eq!(
        view.remaining_label,
        "2 items left"
      );
    }
  }

  #[test]
  fn empty_state_follows_filtered_view()
   {
    let list = tasks(&[false, false]);
    let view = ListView::derive(
      &list,
      Filter::Completed,
      None
    );
    assert!(view.is_empty);
    assert!(!view.can_clear_completed);
    assert_eq!(
      view.empty_message,
      "No completed tasks."
    );

    let view = ListView::derive(
      &list,
      Filter::Active,
      None
    );
    assert!(!view.is_empty);
    assert_eq!(view.rows.len(), 2);

    let view = ListView::derive(
      &[],
      Filter::All,
      None
    );
    assert!(view.is_empty);
  }

  #[test]
  fn rows_expose_state_attributes() {
    let list = tasks(&[true, false]);
    let dragged = list[1].id.clone();
    let view = ListView::derive(
      &list,
      Filter::All,
      Some(&dragged)
    );

    assert_eq!(view.rows[0].pressed, "true");
    assert_eq!(
      view.rows[0].toggle_label,
      "Mark as active"
    );
    assert!(!view.rows[0].dragging);
    assert_eq!(
      view.rows[1].pressed,
      "false"
    );
    assert!(view.rows[1].dragging);
    assert!(view.can_clear_completed);

    let selected: Vec<_> = view
      .tabs
      .iter()
      .filter(|tab| tab.selected)
      .map(|tab| tab.filter)
      .collect();
    assert_eq!(
      selected,
      vec![Filter::All]
    );
    assert_eq!(
      view.tabs[1].aria_selected(),
      "false"
    );
  }

  #[test]
  fn singular_label() {
    assert_eq!(
      remaining_label(1),
      "1 item left"
    );
    assert_eq!(
      remaining_label(0),
      "0 items left"
    );
  }
}
