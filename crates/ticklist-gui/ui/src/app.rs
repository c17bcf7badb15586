use std::rc::Rc;

use gloo::events::EventListener;
use ticklist_core::{
  DEFAULT_STORAGE_KEY,
  Msg,
  Persistence,
  Session,
  TaskId
};
use wasm_bindgen::JsCast;
use yew::{
  Callback,
  Html,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_reducer
};

use crate::components::{
  AddForm,
  FilterBar,
  TaskList
};
use crate::storage::LocalStorage;

#[derive(Clone)]
struct AppState {
  session:  Session<LocalStorage>,
  revision: u64
}

impl AppState {
  fn open() -> Self {
    Self {
      session:  Session::open(
        Persistence::new(LocalStorage)
      ),
      revision: 0
    }
  }
}

impl PartialEq for AppState {
  fn eq(
    &self,
    other: &Self
  ) -> bool {
    self.revision == other.revision
  }
}

impl Reducible for AppState {
  type Action = Msg;

  fn reduce(
    self: Rc<Self>,
    action: Msg
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    if next.session.dispatch(action) {
      next.revision += 1;
      Rc::new(next)
    } else {
      self
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let state = use_reducer(AppState::open);

  // another tab writing the same key shows up as a `storage` event
  {
    let dispatcher = state.dispatcher();
    use_effect_with((), move |_| {
      let listener =
        web_sys::window().map(|window| {
          EventListener::new(
            &window,
            "storage",
            move |event| {
              let ours = event
                .dyn_ref::<web_sys::StorageEvent>()
                .and_then(|event| event.key())
                .is_none_or(|key| {
                  key == DEFAULT_STORAGE_KEY
                });
              if ours {
                tracing::info!(
                  "stored tasks changed \
                   elsewhere; reloading"
                );
                dispatcher
                  .dispatch(Msg::Reload);
              }
            }
          )
        });
      move || drop(listener)
    });
  }

  let send = {
    let dispatcher = state.dispatcher();
    Callback::from(move |msg: Msg| {
      dispatcher.dispatch(msg)
    })
  };

  let view = state.session.view();

  let on_add = send.reform(Msg::Add);
  let on_filter = send.reform(
    |filter: ticklist_core::Filter| {
      Msg::SetFilter(
        filter.as_str().to_string()
      )
    }
  );
  let on_toggle = send.reform(Msg::Toggle);
  let on_delete = send.reform(Msg::Delete);
  let on_edit = send.reform(
    |(id, text): (TaskId, String)| {
      Msg::Edit(id, text)
    }
  );
  let on_move_up = send.reform(Msg::MoveUp);
  let on_move_down =
    send.reform(Msg::MoveDown);
  let on_drag_start =
    send.reform(Msg::DragStart);
  let on_drag_end =
    send.reform(|()| Msg::DragEnd);
  let on_drop = send.reform(
    |(target, payload): (
      TaskId,
      Option<TaskId>
    )| {
      Msg::Drop {
        target,
        payload
      }
    }
  );
  let on_clear_completed = {
    let send = send.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        send.emit(Msg::ClearCompleted)
      }
    )
  };

  html! {
      <main class="todo-app">
          <h1>{ "Tasks" }</h1>
          <AddForm on_add={on_add} />
          <FilterBar tabs={view.tabs.clone()} on_select={on_filter} />
          <TaskList
              rows={view.rows.clone()}
              on_toggle={on_toggle}
              on_delete={on_delete}
              on_edit={on_edit}
              on_move_up={on_move_up}
              on_move_down={on_move_down}
              on_drag_start={on_drag_start}
              on_drag_end={on_drag_end}
              on_drop={on_drop}
          />
          {
              if view.is_empty {
                  html! { <p class="empty" role="status">{ view.empty_message }</p> }
              } else {
                  html! {}
              }
          }
          <footer class="summary">
              <span class="count" aria-live="polite">{ view.remaining_label.clone() }</span>
              <button
                  class="clear-completed"
                  disabled={!view.can_clear_completed}
                  onclick={on_clear_completed}
              >
                  { "Clear completed" }
              </button>
          </footer>
      </main>
  }
}
