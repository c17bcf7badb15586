pub mod drag;
pub mod filter;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod render;

pub use drag::{
  DragController,
  DragState,
  ReorderRequest
};
pub use filter::{
  Filter,
  FilterController,
  visible_tasks
};
pub use persistence::{
  DEFAULT_STORAGE_KEY,
  Persistence
};
pub use session::{
  Msg,
  Session
};
pub use storage::{
  KeyValueStore,
  MemoryStore,
  StorageError
};
pub use store::TaskStore;
pub use task::{
  Task,
  TaskId
};
pub use view::ListView;

#[cfg(not(target_arch = "wasm32"))]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<std::ffi::OsString>
) -> anyhow::Result<()> {
  use anyhow::Context;
  use clap::Parser;
  use tracing::{
    debug,
    info
  };

  let cli =
    cli::GlobalCli::parse_from(raw_args);

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .rc_overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  )?;

  cli::init_tracing(
    cli.verbose,
    cli.quiet,
    cfg.log.filter.as_deref()
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting ticklist"
  );
  debug!(?cfg, "resolved config");

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let store =
    storage::FileStore::open(&data_dir)
      .with_context(|| {
        format!(
          "failed to open store at {}",
          data_dir.display()
        )
      })?;

  let mut session = Session::open(
    Persistence::with_key(
      store,
      cfg.storage.key.clone()
    )
  );
  let renderer =
    render::Renderer::for_stdout();
  let command =
    cli.command.unwrap_or(
      cli::Command::List {
        filter: Filter::All
          .as_str()
          .to_string()
      }
    );

  let mut out = std::io::stdout().lock();
  commands::dispatch(
    &mut session,
    &renderer,
    &mut out,
    command
  )?;

  info!("done");
  Ok(())
}
