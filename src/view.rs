//! Filtering, sorting and reordering over the task list.
//!
//! The visible list is kept as indices into the store so that every row on
//! screen can be mapped back to the task it shows.

use std::fmt;

use crate::task::Task;

/// Indices of the tasks whose title contains `query`, ignoring case.
///
/// A blank query shows everything.
pub fn apply_filter(tasks: &[Task], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..tasks.len()).collect();
    }

    let query_lower = query.to_lowercase();
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.title.to_lowercase().contains(&query_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Ascending ordinal title order. Stable, so equal titles keep their order.
pub fn sort_alphabetical(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.title.cmp(&b.title));
}

/// Done tasks first, then by title.
pub fn sort_by_done(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.is_done
            .cmp(&a.is_done)
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Moves the element at `from` to `to`. Returns whether anything moved.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to {
        return false;
    }
    if from >= items.len() || to >= items.len() {
        tracing::warn!(from, to, len = items.len(), "ignoring out-of-range reorder");
        return false;
    }

    let moved = items.remove(from);
    items.insert(to, moved);
    true
}

/// Totals shown in the status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub done: usize,
}

impl Stats {
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Stats::default(), |mut stats, task| {
            stats.total += 1;
            if task.is_done {
                stats.done += 1;
            }
            stats
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tasks ({} done)", self.total, self.done)
    }
}

/// Search query plus the visible list derived from it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    query: String,
    visible: Vec<usize>,
}

impl ViewState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Store indices of the visible rows, in display order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Store index shown at visible position `pos`.
    pub fn store_index(&self, pos: usize) -> Option<usize> {
        self.visible.get(pos).copied()
    }

    /// Visible position of store index `idx`, if it passes the filter.
    pub fn position_of(&self, idx: usize) -> Option<usize> {
        self.visible.iter().position(|&i| i == idx)
    }

    pub fn refresh(&mut self, tasks: &[Task]) {
        self.visible = apply_filter(tasks, &self.query);
    }

    pub fn stats(&self, tasks: &[Task]) -> Stats {
        Stats::of(self.visible.iter().filter_map(|&idx| tasks.get(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_and_trimmed() {
        let tasks = vec![Task::new("Buy Milk"), Task::new("walk dog"), Task::new("milkshake")];
        assert_eq!(apply_filter(&tasks, "  MILK "), vec![0, 2]);
        assert_eq!(apply_filter(&tasks, "cat"), Vec::<usize>::new());
    }

    #[test]
    fn blank_filter_shows_everything() {
        let tasks = vec![Task::new("a"), Task::new("b")];
        assert_eq!(apply_filter(&tasks, ""), vec![0, 1]);
        assert_eq!(apply_filter(&tasks, "   "), vec![0, 1]);
    }

    #[test]
    fn alphabetical_sort_is_ordinal() {
        let mut tasks = vec![Task::new("banana"), Task::new("Zebra"), Task::new("Apple")];
        sort_alphabetical(&mut tasks);
        assert_eq!(titles(&tasks), vec!["Apple", "Zebra", "banana"]);
    }

    #[test]
    fn sort_by_done_puts_done_first() {
        let mut tasks = vec![
            Task::new("c"),
            Task::done("b"),
            Task::new("a"),
            Task::done("a"),
        ];
        sort_by_done(&mut tasks);
        assert_eq!(
            tasks,
            vec![Task::done("a"), Task::done("b"), Task::new("a"), Task::new("c")]
        );
    }

    #[test]
    fn reorder_moves_forward_and_back() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(reorder(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        assert!(reorder(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn reorder_same_index_or_out_of_range_is_noop() {
        let mut items = vec![1, 2, 3];
        assert!(!reorder(&mut items, 1, 1));
        assert!(!reorder(&mut items, 0, 3));
        assert!(!reorder(&mut items, 5, 0));
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn stats_display() {
        let tasks = vec![Task::new("a"), Task::done("b"), Task::done("c")];
        let stats = Stats::of(&tasks);
        assert_eq!(stats, Stats { total: 3, done: 2 });
        assert_eq!(stats.to_string(), "3 tasks (2 done)");
    }

    #[test]
    fn view_state_counts_only_visible_rows() {
        let tasks = vec![Task::done("apple pie"), Task::new("apple"), Task::done("pear")];
        let mut view = ViewState::default();
        view.set_query("apple");
        view.refresh(&tasks);

        assert_eq!(view.visible(), &[0, 1]);
        assert_eq!(view.store_index(1), Some(1));
        assert_eq!(view.position_of(2), None);
        assert_eq!(view.stats(&tasks).to_string(), "2 tasks (1 done)");
    }
}
