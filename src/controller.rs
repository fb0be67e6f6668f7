//! Dispatches user actions to the task store and keeps the view in sync.
//!
//! Selection and drag positions are visible-row positions; the controller
//! maps them to store indices through the current [`ViewState`].

use std::time::Instant;

use eframe::egui::Color32;

use crate::error::StoreResult;
use crate::store::TaskStore;
use crate::task::Task;
use crate::theme::{Palette, Palettes, ThemeKind, ThemeTransition, Tick};
use crate::view::{Stats, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    /// Retitles the selected task.
    Edit(String),
    Delete,
    ToggleDone,
    SortAlphabetical,
    SortByDone,
    Search(String),
    Select(Option<usize>),
    /// Drag from one visible row onto another.
    Reorder { from: usize, to: usize },
    ToggleTheme,
}

/// How the selection is restored once the visible list is rebuilt.
enum Reselect {
    /// Follow this store index; cleared if it is no longer visible.
    Task(Option<usize>),
    /// Keep this visible position, clamped to the new length.
    Position(Option<usize>),
}

pub struct Controller {
    store: TaskStore,
    view: ViewState,
    selected: Option<usize>,
    theme: ThemeKind,
    palettes: Palettes,
    transition: ThemeTransition,
}

impl Controller {
    /// Builds a controller and starts the transition into `theme`, beginning
    /// from the light background.
    pub fn new(
        store: TaskStore,
        theme: ThemeKind,
        palettes: Palettes,
        transition: ThemeTransition,
    ) -> Self {
        let mut controller = Self {
            store,
            view: ViewState::default(),
            selected: None,
            theme,
            palettes,
            transition,
        };
        controller.view.refresh(controller.store.tasks());
        controller.transition.start(controller.palette().background);
        controller
    }

    pub fn dispatch(&mut self, action: Action) -> StoreResult<()> {
        tracing::debug!(?action, "dispatch");
        let (reselect, result) = self.apply(action);
        self.refresh(reselect);
        result
    }

    fn apply(&mut self, action: Action) -> (Reselect, StoreResult<()>) {
        let anchor = self.selected_index();
        match action {
            Action::Add(title) => (Reselect::Task(anchor), self.store.add(&title).map(drop)),
            Action::Edit(title) => {
                let result = match anchor {
                    Some(idx) => self.store.edit(idx, &title).map(drop),
                    None => Ok(()),
                };
                (Reselect::Task(anchor), result)
            }
            Action::Delete => {
                let result = match anchor {
                    Some(idx) => self.store.delete(idx).map(drop),
                    None => Ok(()),
                };
                (Reselect::Position(self.selected), result)
            }
            Action::ToggleDone => {
                let result = match anchor {
                    Some(idx) => self.store.toggle_done(idx).map(drop),
                    None => Ok(()),
                };
                (Reselect::Task(anchor), result)
            }
            Action::SortAlphabetical => (Reselect::Task(None), self.store.sort_alphabetical()),
            Action::SortByDone => (Reselect::Task(None), self.store.sort_by_done()),
            Action::Search(query) => {
                self.view.set_query(query);
                (Reselect::Task(None), Ok(()))
            }
            Action::Select(pos) => {
                let idx = pos.and_then(|p| self.view.store_index(p));
                (Reselect::Task(idx), Ok(()))
            }
            Action::Reorder { from, to } => {
                let (Some(from_idx), Some(to_idx)) =
                    (self.view.store_index(from), self.view.store_index(to))
                else {
                    return (Reselect::Task(anchor), Ok(()));
                };
                // The dragged task lands at `to_idx`.
                (Reselect::Task(Some(to_idx)), self.store.reorder(from_idx, to_idx).map(drop))
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggle();
                self.transition.start(self.palette().background);
                (Reselect::Task(anchor), Ok(()))
            }
        }
    }

    /// Rebuilds the visible list and restores the selection.
    fn refresh(&mut self, reselect: Reselect) {
        self.view.refresh(self.store.tasks());
        self.selected = match reselect {
            Reselect::Task(idx) => idx.and_then(|idx| self.view.position_of(idx)),
            Reselect::Position(pos) => {
                pos.and_then(|pos| self.view.len().checked_sub(1).map(|last| pos.min(last)))
            }
        };
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|pos| self.view.store_index(pos))
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn query(&self) -> &str {
        self.view.query()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_index().and_then(|idx| self.store.get(idx))
    }

    /// Visible tasks in display order.
    pub fn visible(&self) -> impl Iterator<Item = &Task> + '_ {
        self.view
            .visible()
            .iter()
            .filter_map(|&idx| self.store.get(idx))
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    pub fn stats(&self) -> Stats {
        self.view.stats(self.store.tasks())
    }

    pub fn theme(&self) -> ThemeKind {
        self.theme
    }

    pub fn palette(&self) -> Palette {
        self.palettes.get(self.theme)
    }

    pub fn background(&self) -> Color32 {
        self.transition.displayed()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_animating()
    }

    pub fn transition(&self) -> &ThemeTransition {
        &self.transition
    }

    /// Advances the theme transition to `now`.
    pub fn tick_theme(&mut self, now: Instant) -> Tick {
        self.transition.advance(now)
    }
}
