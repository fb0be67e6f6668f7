use proptest::prelude::*;

use taskmanager::store::DEFAULT_TASKS_FILE;
use taskmanager::view::{apply_filter, reorder, sort_by_done};
use taskmanager::{Task, TaskStore};
use tempfile::TempDir;

fn task_strategy() -> impl Strategy<Value = Task> {
    ("[a-zA-Z ]{0,8}", any::<bool>()).prop_map(|(title, is_done)| Task { title, is_done })
}

fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(task_strategy(), 0..20)
}

proptest! {
    #[test]
    fn filter_is_ordered_case_insensitive_subsequence(
        tasks in tasks_strategy(),
        query in "[a-zA-Z]{0,3}",
    ) {
        let visible = apply_filter(&tasks, &query);

        prop_assert!(visible.windows(2).all(|w| w[0] < w[1]));
        let expected: Vec<usize> = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| query.is_empty() || t.title.to_lowercase().contains(&query.to_lowercase()))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(visible, expected);
    }

    #[test]
    fn blank_filter_is_identity(tasks in tasks_strategy()) {
        let all: Vec<usize> = (0..tasks.len()).collect();
        prop_assert_eq!(apply_filter(&tasks, ""), all);
    }

    #[test]
    fn sort_by_done_groups_and_orders(mut tasks in tasks_strategy()) {
        sort_by_done(&mut tasks);

        let first_open = tasks.iter().position(|t| !t.is_done).unwrap_or(tasks.len());
        prop_assert!(tasks[first_open..].iter().all(|t| !t.is_done));
        for group in [&tasks[..first_open], &tasks[first_open..]] {
            prop_assert!(group.windows(2).all(|w| w[0].title <= w[1].title));
        }
    }

    #[test]
    fn reorder_moves_one_element(
        len in 1usize..15,
        from_seed in any::<usize>(),
        to_seed in any::<usize>(),
    ) {
        let original: Vec<usize> = (0..len).collect();
        let (from, to) = (from_seed % len, to_seed % len);

        let mut items = original.clone();
        reorder(&mut items, from, to);

        prop_assert_eq!(items.len(), len);
        prop_assert_eq!(items[to], original[from]);
        let mut sorted = items.clone();
        sorted.sort();
        prop_assert_eq!(&sorted, &original);

        let rest: Vec<usize> = items.iter().copied().filter(|&x| x != original[from]).collect();
        let expected: Vec<usize> = original.iter().copied().filter(|&x| x != original[from]).collect();
        prop_assert_eq!(rest, expected);
    }

    #[test]
    fn save_then_load_round_trips(tasks in tasks_strategy()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_TASKS_FILE);
        let mut store = TaskStore::new(&path);
        for task in &tasks {
            if store.add(&task.title).unwrap() && task.is_done {
                let last = store.len() - 1;
                store.toggle_done(last).unwrap();
            }
        }
        store.save().unwrap();

        let first = TaskStore::load(&path).unwrap();
        prop_assert_eq!(&first, &store.tasks().to_vec());

        TaskStore::open(&path).save().unwrap();
        prop_assert_eq!(TaskStore::load(&path).unwrap(), first);
    }
}
