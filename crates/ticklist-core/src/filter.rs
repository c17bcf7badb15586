use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::task::Task;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
)]
pub enum Filter {
  #[default]
  All,
  Active,
  Completed
}

#[derive(Debug, Clone, Error)]
#[error("unknown filter: {0:?}")]
pub struct UnknownFilter(pub String);

impl Filter {
  pub const ALL: [Filter; 3] = [
    Filter::All,
    Filter::Active,
    Filter::Completed
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Filter::All => "all",
      | Filter::Active => "active",
      | Filter::Completed => {
        "completed"
      }
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Filter::All => "All",
      | Filter::Active => "Active",
      | Filter::Completed => {
        "Completed"
      }
    }
  }

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Filter::All => true,
      | Filter::Active => {
        !task.completed
      }
      | Filter::Completed => {
        task.completed
      }
    }
  }
}

impl fmt::Display for Filter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Filter {
  type Err = UnknownFilter;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s {
      | "all" => Ok(Filter::All),
      | "active" => Ok(Filter::Active),
      | "completed" => {
        Ok(Filter::Completed)
      }
      | other => Err(UnknownFilter(
        other.to_string()
      ))
    }
  }
}

/// Visible subset of `tasks` for `filter`, in list order.
pub fn visible_tasks(
  tasks: &[Task],
  filter: Filter
) -> Vec<&Task> {
  tasks
    .iter()
    .filter(|task| filter.matches(task))
    .collect()
}

#[derive(Debug, Clone, Default)]
pub struct FilterController {
  active: Filter
}

impl FilterController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn active(&self) -> Filter {
    self.active
  }

  /// Applies a filter token coming from the UI. Unrecognized tokens leave
  /// the current filter in place. Returns whether the filter changed.
  pub fn set_filter(
    &mut self,
    token: &str
  ) -> bool {
    match token.parse::<Filter>() {
      | Ok(filter) => self.set(filter),
      | Err(err) => {
        debug!(
          %err,
          current = %self.active,
          "ignoring filter token"
        );
        false
      }
    }
  }

  pub fn set(
    &mut self,
    filter: Filter
  ) -> bool {
    if self.active == filter {
      return false;
    }
    debug!(from = %self.active, to = %filter, "filter changed");
    self.active = filter;
    true
  }
}

#[cfg(test)]
mod tests {
  use super::{
    Filter,
    FilterController,
    visible_tasks
  };
  use crate::task::Task;

  fn flagged(
    flags: &[bool]
  ) -> Vec<Task> {
    flags
      .iter()
      .enumerate()
      .map(|(idx, done)| {
        let mut task = Task::new(
          format!("task {idx}")
        );
        task.completed = *done;
        task
      })
      .collect()
  }

  #[test]
  fn active_keeps_incomplete_in_order()
   {
    let tasks = flagged(&[
      true, false, true, false
    ]);

    let shown = visible_tasks(
      &tasks,
      Filter::Active
    );
    let texts: Vec<&str> = shown
      .iter()
      .map(|t| t.text.as_str())
      .collect();
    assert_eq!(
      texts,
      vec!["task 1", "task 3"]
    );
  }

  #[test]
  fn completed_and_all() {
    let tasks = flagged(&[
      true, false, true, false
    ]);

    assert_eq!(
      visible_tasks(
        &tasks,
        Filter::Completed
      )
      .len(),
      2
    );
    assert_eq!(
      visible_tasks(&tasks, Filter::All)
        .len(),
      4
    );
  }

  #[test]
  fn tokens_parse_exactly() {
    for filter in Filter::ALL {
      assert_eq!(
        filter
          .as_str()
          .parse::<Filter>()
          .unwrap(),
        filter
      );
    }
    assert!(
      "Active".parse::<Filter>().is_err()
    );
    assert!(
      "".parse::<Filter>().is_err()
    );
  }

  #[test]
  fn unknown_token_keeps_prior_filter()
   {
    let mut controller =
      FilterController::new();
    assert_eq!(
      controller.active(),
      Filter::All
    );

    assert!(
      controller.set_filter("completed")
    );
    assert!(
      !controller.set_filter("archived")
    );
    assert_eq!(
      controller.active(),
      Filter::Completed
    );

    assert!(
      !controller.set_filter("completed")
    );
  }
}
