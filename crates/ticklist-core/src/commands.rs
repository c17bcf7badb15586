use std::io::Write;

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  info,
  warn
};

use crate::cli::Command;
use crate::filter::Filter;
use crate::render::Renderer;
use crate::session::{
  Msg,
  Session
};
use crate::storage::KeyValueStore;
use crate::task::{
  Task,
  TaskId
};

/// Runs one CLI command against `session`, then prints the resulting list.
#[tracing::instrument(skip(
  session, renderer, out
))]
pub fn dispatch<S: KeyValueStore>(
  session: &mut Session<S>,
  renderer: &Renderer,
  out: &mut impl Write,
  command: Command
) -> anyhow::Result<()> {
  let msg = match command {
    | Command::List {
      filter
    } => {
      let filter =
        filter.parse::<Filter>()?;
      session.set_filter(filter);
      None
    }
    | Command::Check => {
      return check(session, out);
    }
    | Command::Add {
      text
    } => Some(Msg::Add(text.join(" "))),
    | Command::Done {
      id
    } => Some(Msg::Toggle(
      resolve_id(session.tasks(), &id)?
    )),
    | Command::Edit {
      id,
      text
    } => Some(Msg::Edit(
      resolve_id(session.tasks(), &id)?,
      text.join(" ")
    )),
    | Command::Delete {
      id
    } => Some(Msg::Delete(
      resolve_id(session.tasks(), &id)?
    )),
    | Command::ClearCompleted => {
      Some(Msg::ClearCompleted)
    }
    | Command::Move {
      source,
      target
    } => Some(Msg::Reorder {
      source: resolve_id(
        session.tasks(),
        &source
      )?,
      target: resolve_id(
        session.tasks(),
        &target
      )?
    }),
    | Command::Up {
      id
    } => Some(Msg::MoveUp(
      resolve_id(session.tasks(), &id)?
    )),
    | Command::Down {
      id
    } => Some(Msg::MoveDown(
      resolve_id(session.tasks(), &id)?
    ))
  };

  if let Some(msg) = msg {
    let changed = session.dispatch(msg);
    if !changed {
      warn!("nothing changed");
    } else if !session
      .store()
      .last_save_ok()
    {
      return Err(anyhow!(
        "change could not be saved"
      ));
    }
    info!(changed, "command applied");
  }

  renderer
    .write_list(
      out,
      &session.view(),
      session.tasks()
    )
    .context("failed writing output")?;
  Ok(())
}

fn check<S: KeyValueStore>(
  session: &Session<S>,
  out: &mut impl Write
) -> anyhow::Result<()> {
  let persistence =
    session.store().persistence();
  let tasks =
    persistence.try_load().with_context(
      || {
        format!(
          "stored value under {:?} is \
           unusable",
          persistence.key()
        )
      }
    )?;
  writeln!(
    out,
    "ok: {} task(s) under {:?}",
    tasks.len(),
    persistence.key()
  )?;
  Ok(())
}

/// Exact id, else a unique id prefix. Unmatched input is passed through
/// untouched so the store treats it as an unknown id.
pub fn resolve_id(
  tasks: &[Task],
  raw: &str
) -> anyhow::Result<TaskId> {
  let raw = raw.trim();
  if tasks
    .iter()
    .any(|task| task.id.as_str() == raw)
  {
    return Ok(TaskId::from(raw));
  }

  let matches: Vec<&Task> = tasks
    .iter()
    .filter(|task| {
      !raw.is_empty()
        && task
          .id
          .as_str()
          .starts_with(raw)
    })
    .collect();

  match matches.as_slice() {
    | [] => Ok(TaskId::from(raw)),
    | [only] => Ok(only.id.clone()),
    | many => Err(anyhow!(
      "id prefix {raw:?} is ambiguous \
       ({} tasks match)",
      many.len()
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::{
    dispatch,
    resolve_id
  };
  use crate::cli::Command;
  use crate::persistence::Persistence;
  use crate::render::Renderer;
  use crate::session::Session;
  use crate::storage::MemoryStore;
  use crate::task::{
    Task,
    TaskId
  };

  fn task(id: &str) -> Task {
    Task {
      id:        TaskId::from(id),
      text:      id.to_string(),
      completed: false,
      extra:     Default::default()
    }
  }

  fn run(
    session: &mut Session<MemoryStore>,
    command: Command
  ) -> anyhow::Result<String> {
    let mut out = Vec::new();
    dispatch(
      session,
      &Renderer::new(false),
      &mut out,
      command
    )?;
    Ok(String::from_utf8(out)?)
  }

  #[test]
  fn prefix_resolution() {
    let tasks =
      vec![task("abc1"), task("abd2"), task("ab")];

    assert_eq!(
      resolve_id(&tasks, "ab").unwrap(),
      TaskId::from("ab")
    );
    assert_eq!(
      resolve_id(&tasks, "abc").unwrap(),
      TaskId::from("abc1")
    );
    assert!(
      resolve_id(&tasks, "a").is_err()
    );
    assert_eq!(
      resolve_id(&tasks, "zzz").unwrap(),
      TaskId::from("zzz")
    );
  }

  #[test]
  fn add_then_done_then_list_active() {
    let mut session = Session::open(
      Persistence::new(MemoryStore::new())
    );
    run(&mut session, Command::Add {
      text: vec![
        "buy".to_string(),
        "milk".to_string(),
      ]
    })
    .unwrap();
    run(&mut session, Command::Add {
      text: vec!["walk".to_string()]
    })
    .unwrap();

    let id = session.tasks()[0]
      .id
      .as_str()
      .to_string();
    run(&mut session, Command::Done {
      id
    })
    .unwrap();

    let listing =
      run(&mut session, Command::List {
        filter: "active".to_string()
      })
      .unwrap();
    assert!(listing.contains("walk"));
    assert!(!listing.contains("buy milk"));
    assert!(listing.contains("1 item left"));
  }

  #[test]
  fn list_rejects_unknown_filter() {
    let mut session = Session::open(
      Persistence::new(MemoryStore::new())
    );
    assert!(
      run(&mut session, Command::List {
        filter: "someday".to_string()
      })
      .is_err()
    );
  }

  #[test]
  fn check_reports_corruption() {
    let mut store = MemoryStore::new();
    store.insert_raw(
      crate::persistence::DEFAULT_STORAGE_KEY,
      "{not json"
    );
    let mut session =
      Session::open(Persistence::new(store));

    assert!(
      run(&mut session, Command::Check)
        .is_err()
    );
  }

  #[test]
  fn failed_save_is_an_error() {
    let mut session = Session::open(
      Persistence::new(
        MemoryStore::with_quota(4)
      )
    );
    assert!(
      run(&mut session, Command::Add {
        text: vec!["too long".to_string()]
      })
      .is_err()
    );
    assert_eq!(session.tasks().len(), 1);
  }

  #[test]
  fn listed_prefix_addresses_timestamp_ids() {
    let mut store = MemoryStore::new();
    store.insert_raw(
      crate::persistence::DEFAULT_STORAGE_KEY,
      r#"[{"id":"1700000000000","text":"first","completed":false},{"id":"1700000000502","text":"second","completed":false}]"#
    );
    let mut session =
      Session::open(Persistence::new(store));

    let listing =
      run(&mut session, Command::List {
        filter: "all".to_string()
      })
      .unwrap();
    let shown: Vec<&str> = listing
      .lines()
      .filter(|line| line.contains("[ ]"))
      .filter_map(|line| {
        line.split_whitespace().next()
      })
      .collect();
    assert_eq!(shown, vec![
      "17000000000",
      "17000000005"
    ]);

    run(&mut session, Command::Done {
      id: shown[1].to_string()
    })
    .unwrap();
    assert!(!session.tasks()[0].completed);
    assert!(session.tasks()[1].completed);
  }
}
