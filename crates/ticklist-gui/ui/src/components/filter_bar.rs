use ticklist_core::Filter;
use ticklist_core::view::FilterTab;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub tabs:      Vec<FilterTab>,
  pub on_select: Callback<Filter>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  html! {
      <div class="filters" role="tablist">
          {
              for props.tabs.iter().map(|tab| {
                  let filter = tab.filter;
                  let on_select = props.on_select.clone();
                  html! {
                      <button
                          class={classes!("filter-btn", tab.selected.then_some("active"))}
                          role="tab"
                          data-filter={filter.as_str()}
                          aria-selected={tab.aria_selected()}
                          onclick={move |_| on_select.emit(filter)}
                      >
                          { tab.label }
                      </button>
                  }
              })
          }
      </div>
  }
}
