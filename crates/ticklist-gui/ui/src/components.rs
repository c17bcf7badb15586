mod add_form;
mod filter_bar;
mod task_list;
mod task_list_row;

pub use add_form::AddForm;
pub use filter_bar::FilterBar;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
