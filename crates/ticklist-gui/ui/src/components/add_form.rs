use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  NodeRef,
  Properties,
  SubmitEvent,
  function_component,
  html,
  use_node_ref
};

#[derive(Properties, PartialEq)]
pub struct AddFormProps {
  pub on_add: Callback<String>
}

#[function_component(AddForm)]
pub fn add_form(
  props: &AddFormProps
) -> Html {
  let input_ref: NodeRef =
    use_node_ref();

  let onsubmit = {
    let on_add = props.on_add.clone();
    let input_ref = input_ref.clone();
    Callback::from(
      move |event: SubmitEvent| {
        event.prevent_default();
        let Some(input) = input_ref
          .cast::<HtmlInputElement>()
        else {
          return;
        };
        // blank input is dropped by the store
        on_add.emit(input.value());
        input.set_value("");
        if let Err(error) = input.focus() {
          tracing::debug!(
            ?error,
            "failed refocusing new-task input"
          );
        }
      }
    )
  };

  html! {
      <form class="add-form" {onsubmit}>
          <input
              ref={input_ref}
              class="new-task"
              type="text"
              placeholder="What needs doing?"
              aria-label="New task"
              autofocus=true
          />
          <button type="submit">{ "Add" }</button>
      </form>
  }
}
