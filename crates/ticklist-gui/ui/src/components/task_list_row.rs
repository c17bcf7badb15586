use ticklist_core::TaskId;
use ticklist_core::view::TaskRow;
use web_sys::{
  DragEvent,
  HtmlInputElement
};
use yew::{
  Callback,
  FocusEvent,
  Html,
  KeyboardEvent,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_node_ref,
  use_state
};

const DRAG_MIME: &str = "text/plain";

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub row:           TaskRow,
  pub on_toggle:     Callback<TaskId>,
  pub on_delete:     Callback<TaskId>,
  pub on_edit:
    Callback<(TaskId, String)>,
  pub on_move_up:    Callback<TaskId>,
  pub on_move_down:  Callback<TaskId>,
  pub on_drag_start: Callback<TaskId>,
  pub on_drag_end:   Callback<()>,
  pub on_drop:
    Callback<(TaskId, Option<TaskId>)>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let id = props.row.id.clone();
  let editing = use_state(|| false);
  // set once Enter/Escape already settled the edit, so the blur that
  // follows does not commit a second time
  let settled = use_mut_ref(|| false);
  let input_ref = use_node_ref();

  {
    let input_ref = input_ref.clone();
    use_effect_with(*editing, move |editing| {
      if *editing
        && let Some(input) = input_ref
          .cast::<HtmlInputElement>()
      {
        if let Err(error) = input.focus() {
          tracing::debug!(
            ?error,
            "failed focusing edit input"
          );
        }
        input.select();
      }
    });
  }

  let enter_edit = {
    let editing = editing.clone();
    let settled = settled.clone();
    Callback::from(move |()| {
      *settled.borrow_mut() = false;
      editing.set(true);
    })
  };

  let commit = {
    let editing = editing.clone();
    let settled = settled.clone();
    let on_edit = props.on_edit.clone();
    let id = id.clone();
    Callback::from(
      move |value: String| {
        if std::mem::replace(
          &mut *settled.borrow_mut(),
          true
        ) {
          return;
        }
        // blank text deletes the task
        on_edit.emit((id.clone(), value));
        editing.set(false);
      }
    )
  };

  let cancel = {
    let editing = editing.clone();
    let settled = settled.clone();
    Callback::from(move |()| {
      *settled.borrow_mut() = true;
      editing.set(false);
    })
  };

  let ondragstart = {
    let on_drag_start =
      props.on_drag_start.clone();
    let id = id.clone();
    Callback::from(
      move |event: DragEvent| {
        if let Some(data_transfer) =
          event.data_transfer()
        {
          data_transfer
            .set_effect_allowed("move");
          if let Err(error) = data_transfer
            .set_data(DRAG_MIME, id.as_str())
          {
            tracing::warn!(
              ?error,
              "failed writing drag data"
            );
          }
        }
        on_drag_start.emit(id.clone());
      }
    )
  };

  let ondragend = {
    let on_drag_end =
      props.on_drag_end.clone();
    Callback::from(move |_: DragEvent| {
      on_drag_end.emit(());
    })
  };

  let ondragover =
    Callback::from(|event: DragEvent| {
      event.prevent_default();
      if let Some(data_transfer) =
        event.data_transfer()
      {
        data_transfer
          .set_drop_effect("move");
      }
    });

  let ondrop = {
    let on_drop = props.on_drop.clone();
    let id = id.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        let payload = event
          .data_transfer()
          .and_then(|data_transfer| {
            data_transfer
              .get_data(DRAG_MIME)
              .ok()
          })
          .map(|raw| raw.trim().to_string())
          .filter(|raw| !raw.is_empty())
          .map(TaskId::from);
        on_drop
          .emit((id.clone(), payload));
      }
    )
  };

  let onkeydown_row = {
    let on_move_up =
      props.on_move_up.clone();
    let on_move_down =
      props.on_move_down.clone();
    let id = id.clone();
    Callback::from(
      move |event: KeyboardEvent| {
        if !event.alt_key() {
          return;
        }
        match event.key().as_str() {
          | "ArrowUp" => {
            event.prevent_default();
            on_move_up.emit(id.clone());
          }
          | "ArrowDown" => {
            event.prevent_default();
            on_move_down.emit(id.clone());
          }
          | _ => {}
        }
      }
    )
  };

  let on_toggle_click = {
    let on_toggle =
      props.on_toggle.clone();
    let id = id.clone();
    Callback::from(move |_: MouseEvent| {
      on_toggle.emit(id.clone());
    })
  };

  let on_delete_click = {
    let on_delete =
      props.on_delete.clone();
    let id = id.clone();
    Callback::from(move |_: MouseEvent| {
      on_delete.emit(id.clone());
    })
  };

  let body = if *editing {
    let onkeydown = {
      let commit = commit.clone();
      let cancel = cancel.clone();
      let input_ref = input_ref.clone();
      Callback::from(
        move |event: KeyboardEvent| {
          match event.key().as_str() {
            | "Enter" => {
              if let Some(input) =
                input_ref.cast::<HtmlInputElement>()
              {
                commit.emit(input.value());
              }
            }
            | "Escape" => cancel.emit(()),
            | _ => {}
          }
        }
      )
    };
    let onblur = {
      let commit = commit.clone();
      let input_ref = input_ref.clone();
      Callback::from(move |_: FocusEvent| {
        if let Some(input) =
          input_ref.cast::<HtmlInputElement>()
        {
          commit.emit(input.value());
        }
      })
    };

    html! {
        <input
            ref={input_ref.clone()}
            class="edit-input"
            aria-label="Edit task"
            value={props.row.text.clone()}
            {onkeydown}
            {onblur}
        />
    }
  } else {
    let ondblclick = {
      let enter_edit = enter_edit.clone();
      Callback::from(move |_: MouseEvent| {
        enter_edit.emit(())
      })
    };
    let onkeydown = {
      let enter_edit = enter_edit.clone();
      Callback::from(
        move |event: KeyboardEvent| {
          if event.key() == "Enter" {
            enter_edit.emit(());
          }
        }
      )
    };

    html! {
        <div
            class={classes!("task-text", props.row.completed.then_some("completed"))}
            tabindex="0"
            role="textbox"
            aria-label={format!("Task: {}", props.row.text)}
            {ondblclick}
            {onkeydown}
        >
            { &props.row.text }
        </div>
    }
  };

  let on_edit_click = Callback::from(
    move |_: MouseEvent| {
      enter_edit.emit(())
    }
  );

  html! {
      <li
          class={classes!("task", props.row.dragging.then_some("dragging"))}
          draggable="true"
          data-id={id.as_str().to_string()}
          {ondragstart}
          {ondragend}
          {ondragover}
          {ondrop}
          onkeydown={onkeydown_row}
      >
          <div class="left">
              <button
                  class={classes!("checkbox", props.row.completed.then_some("checked"))}
                  aria-pressed={props.row.pressed}
                  title={props.row.toggle_label}
                  onclick={on_toggle_click}
              >
                  { if props.row.completed { "✓" } else { "" } }
              </button>
              { body }
          </div>
          <div class="actions">
              <button class="icon-btn" title="Edit" onclick={on_edit_click}>{ "Edit" }</button>
              <button class="icon-btn" title="Delete" onclick={on_delete_click}>{ "Delete" }</button>
          </div>
      </li>
  }
}
