use ticklist_core::TaskId;
use ticklist_core::view::TaskRow;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskListRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub rows:          Vec<TaskRow>,
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

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  html! {
      <ul class="task-list">
          {
              for props.rows.iter().cloned().map(|row| html! {
                  <TaskListRow
                      key={row.id.as_str().to_string()}
                      row={row.clone()}
                      on_toggle={props.on_toggle.clone()}
                      on_delete={props.on_delete.clone()}
                      on_edit={props.on_edit.clone()}
                      on_move_up={props.on_move_up.clone()}
                      on_move_down={props.on_move_down.clone()}
                      on_drag_start={props.on_drag_start.clone()}
                      on_drag_end={props.on_drag_end.clone()}
                      on_drop={props.on_drop.clone()}
                  />
              })
          }
      </ul>
  }
}
