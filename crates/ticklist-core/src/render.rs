use std::collections::HashSet;
use std::io::{self, IsTerminal, Write};

use crate::task::Task;
use crate::view::ListView;

/// Minimum id prefix shown in listings; the CLI accepts any unique prefix.
pub const SHORT_ID_LEN: usize = 8;

/// Shortest prefix length, at least [`SHORT_ID_LEN`], at which every id in
/// `tasks` is distinct. Legacy timestamp ids share long common prefixes.
pub fn short_id_len(tasks: &[Task]) -> usize {
    let longest = tasks
        .iter()
        .map(|task| task.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(SHORT_ID_LEN);

    (SHORT_ID_LEN..longest)
        .find(|&len| {
            let mut seen = HashSet::new();
            tasks
                .iter()
                .all(|task| seen.insert(id_prefix(task.id.as_str(), len)))
        })
        .unwrap_or(longest)
}

fn id_prefix(id: &str, len: usize) -> String {
    id.chars().take(len).collect()
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn for_stdout() -> Self {
        Self::new(io::stdout().is_terminal())
    }

    /// Prints `view`. `tasks` is the full list, so shown prefixes stay
    /// unambiguous even for rows hidden by the filter.
    #[tracing::instrument(skip(self, out, view, tasks), fields(rows = view.rows.len()))]
    pub fn write_list(
        &self,
        out: &mut impl Write,
        view: &ListView,
        tasks: &[Task],
    ) -> io::Result<()> {
        let width = short_id_len(tasks);
        let tabs = view
            .tabs
            .iter()
            .map(|tab| {
                if tab.selected {
                    self.paint(&format!("[{}]", tab.label), "1")
                } else {
                    tab.label.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{tabs}")?;

        if view.is_empty {
            writeln!(out, "  {}", self.paint(view.empty_message, "2"))?;
        }

        for row in &view.rows {
            let short = id_prefix(row.id.as_str(), width);
            let mark = if row.completed { "[x]" } else { "[ ]" };
            let text = if row.completed {
                self.paint(&row.text, "9")
            } else {
                row.text.clone()
            };
            let short = format!("{short:<width$}");
            writeln!(out, "  {} {mark} {text}", self.paint(&short, "33"))?;
        }

        let mut footer = view.remaining_label.clone();
        if view.can_clear_completed {
            footer.push_str("  (clear-completed available)");
        }
        writeln!(out, "{footer}")?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Renderer, SHORT_ID_LEN, short_id_len};
    use crate::filter::Filter;
    use crate::task::{Task, TaskId};
    use crate::view::ListView;

    fn task(id: &str, text: &str, completed: bool) -> Task {
        Task {
            id: TaskId::from(id),
            text: text.to_string(),
            completed,
            extra: Default::default(),
        }
    }

    fn render(view: &ListView, tasks: &[Task]) -> String {
        let mut out = Vec::new();
        Renderer::new(false)
            .write_list(&mut out, view, tasks)
            .expect("write to vec");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn plain_listing() {
        let tasks = vec![
            task("1700000000001", "buy milk", false),
            task("b", "walk dog", true),
        ];
        let text = render(&ListView::derive(&tasks, Filter::All, None), &tasks);

        assert_eq!(
            text,
            "[All] Active Completed\n  17000000 [ ] buy milk\n  b        [x] walk dog\n1 item left  (clear-completed available)\n"
        );
    }

    #[test]
    fn empty_filtered_view_shows_message() {
        let tasks = vec![task("a", "x", false)];
        let text = render(&ListView::derive(&tasks, Filter::Completed, None), &tasks);

        assert!(text.contains("No completed tasks."));
        assert!(text.ends_with("1 item left\n"));
    }

    #[test]
    fn timestamp_ids_widen_the_prefix() {
        let tasks = vec![
            task("1700000000000", "first", false),
            task("1700000000502", "second", true),
        ];
        assert_eq!(short_id_len(&tasks), 11);

        let text = render(&ListView::derive(&tasks, Filter::All, None), &tasks);
        assert!(text.contains("  17000000000 [ ] first\n"));
        assert!(text.contains("  17000000005 [x] second\n"));
    }

    #[test]
    fn hidden_rows_still_count_for_the_prefix() {
        let tasks = vec![
            task("1700000000000", "first", false),
            task("1700000000502", "second", true),
        ];
        let text = render(&ListView::derive(&tasks, Filter::Active, None), &tasks);
        assert!(text.contains("  17000000000 [ ] first\n"));
    }

    #[test]
    fn distinct_ids_keep_the_minimum() {
        assert_eq!(short_id_len(&[]), SHORT_ID_LEN);
        let tasks = vec![task("ab", "x", false), task("abcdefghijkl", "y", false)];
        assert_eq!(short_id_len(&tasks), SHORT_ID_LEN);
    }
}
