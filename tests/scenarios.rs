use std::fs;

use taskmanager::store::DEFAULT_TASKS_FILE;
use taskmanager::theme::{Palette, Palettes, ThemeKind, ThemeTransition, DEFAULT_STEPS, DEFAULT_TICK};
use taskmanager::{Action, Controller, Task, TaskStore};
use tempfile::TempDir;

fn open_controller(dir: &TempDir) -> Controller {
    Controller::new(
        TaskStore::open(dir.path().join(DEFAULT_TASKS_FILE)),
        ThemeKind::Dark,
        Palettes::default(),
        ThemeTransition::new(Palette::LIGHT.background, DEFAULT_STEPS, DEFAULT_TICK),
    )
}

fn reload(dir: &TempDir) -> Vec<Task> {
    TaskStore::load(&dir.path().join(DEFAULT_TASKS_FILE)).unwrap()
}

#[test]
fn adding_to_empty_store() {
    let dir = TempDir::new().unwrap();
    let mut controller = open_controller(&dir);

    controller.dispatch(Action::Add("Buy milk".into())).unwrap();

    let visible: Vec<_> = controller.visible().cloned().collect();
    assert_eq!(visible, vec![Task::new("Buy milk")]);
    assert_eq!(controller.stats().to_string(), "1 tasks (0 done)");
    assert_eq!(reload(&dir), visible);
}

#[test]
fn blank_add_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut controller = open_controller(&dir);
    controller.dispatch(Action::Add("  \t".into())).unwrap();
    assert_eq!(controller.visible_len(), 0);
    assert!(!dir.path().join(DEFAULT_TASKS_FILE).exists());
}

#[test]
fn sort_alphabetical_reorders_store() {
    let dir = TempDir::new().unwrap();
    let mut controller = open_controller(&dir);
    controller.dispatch(Action::Add("Zebra".into())).unwrap();
    controller.dispatch(Action::Add("Apple".into())).unwrap();

    controller.dispatch(Action::SortAlphabetical).unwrap();

    let titles: Vec<_> = reload(&dir).into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["Apple", "Zebra"]);
}

#[test]
fn toggling_done_is_persisted() {
    let dir = TempDir::new().unwrap();
    let mut controller = open_controller(&dir);
    controller.dispatch(Action::Add("Apple".into())).unwrap();
    controller.dispatch(Action::Select(Some(0))).unwrap();

    controller.dispatch(Action::ToggleDone).unwrap();

    assert_eq!(controller.selected_task(), Some(&Task::done("Apple")));
    assert_eq!(reload(&dir), vec![Task::done("Apple")]);

    let content = fs::read_to_string(dir.path().join(DEFAULT_TASKS_FILE)).unwrap();
    assert!(content.contains(r#""IsDone": true"#));
}

#[test]
fn loading_empty_array() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(DEFAULT_TASKS_FILE), "[]").unwrap();

    let controller = open_controller(&dir);
    assert_eq!(controller.visible_len(), 0);
    assert_eq!(controller.stats().to_string(), "0 tasks (0 done)");
}

#[test]
fn file_written_by_previous_version_loads() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(DEFAULT_TASKS_FILE),
        "[\r\n  {\r\n    \"Title\": \"Pay rent\",\r\n    \"IsDone\": true\r\n  },\r\n  {\r\n    \"Title\": \"Call mom\",\r\n    \"IsDone\": false\r\n  }\r\n]",
    )
    .unwrap();

    let mut controller = open_controller(&dir);
    assert_eq!(controller.stats().to_string(), "2 tasks (1 done)");

    controller.dispatch(Action::Search("MOM".into())).unwrap();
    let visible: Vec<_> = controller.visible().cloned().collect();
    assert_eq!(visible, vec![Task::new("Call mom")]);
}

#[test]
fn corrupt_file_is_kept_and_app_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DEFAULT_TASKS_FILE);
    fs::write(&path, "[{\"Title\": ").unwrap();

    let mut controller = open_controller(&dir);
    assert_eq!(controller.visible_len(), 0);

    controller.dispatch(Action::Add("fresh start".into())).unwrap();
    assert_eq!(reload(&dir), vec![Task::new("fresh start")]);
    assert_eq!(
        fs::read_to_string(dir.path().join("tasks.json.corrupt")).unwrap(),
        "[{\"Title\": "
    );
}
