use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::{Config, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::controller::{Action, Controller};
use crate::store::TaskStore;
use crate::theme::{apply_palette, Palette, ThemeKind, ThemeTransition, Tick};

const ROW_HEIGHT_FACTOR: f32 = 1.8;
const TITLE_COLUMN_SHARE: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    MoveDown,
    MoveUp,
    AddNew,
    EditSelected,
    DeleteSelected,
    ToggleSelected,
    ToggleTheme,
    IncreaseFontSize,
    DecreaseFontSize,
    ResetFontSize,
}

/// Maps a key press to a shortcut. Letters and editing keys only fire without
/// modifiers; font size keys need Ctrl.
fn key_action(key: egui::Key, modifiers: egui::Modifiers) -> Option<KeyAction> {
    let bare = modifiers.is_none();
    match key {
        egui::Key::ArrowDown if bare => Some(KeyAction::MoveDown),
        egui::Key::ArrowUp if bare => Some(KeyAction::MoveUp),
        egui::Key::A if bare => Some(KeyAction::AddNew),
        egui::Key::Enter if bare => Some(KeyAction::EditSelected),
        egui::Key::Delete if bare => Some(KeyAction::DeleteSelected),
        egui::Key::X | egui::Key::Space if bare => Some(KeyAction::ToggleSelected),
        egui::Key::T if bare => Some(KeyAction::ToggleTheme),
        egui::Key::Plus | egui::Key::Equals if modifiers.ctrl => Some(KeyAction::IncreaseFontSize),
        egui::Key::Minus if modifiers.ctrl => Some(KeyAction::DecreaseFontSize),
        egui::Key::Num0 if modifiers.ctrl => Some(KeyAction::ResetFontSize),
        _ => None,
    }
}

fn step_font_size(current: f32, step: f32) -> f32 {
    (current + step).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

#[derive(Clone, Copy, PartialEq)]
enum PromptKind {
    Add,
    Edit,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::Add => "Add Task",
            PromptKind::Edit => "Edit",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PromptKind::Add => "Task name:",
            PromptKind::Edit => "Edit task:",
        }
    }
}

struct Prompt {
    kind: PromptKind,
    text: String,
}

enum PromptOutcome {
    Submit,
    Cancel,
}

pub struct TaskManagerApp {
    controller: Controller,
    visuals: egui::Visuals,
    search: String,
    prompt: Option<Prompt>,
    drag_from: Option<usize>,
    base_font_size: f32,
    font_size: f32,
}

impl TaskManagerApp {
    pub fn new(config: &Config) -> Self {
        let palettes = config.palettes();
        let theme = config.initial_theme();
        let transition = ThemeTransition::new(
            palettes.light.background,
            config.animation.steps,
            config.animation.tick(),
        );
        let store = TaskStore::open(config.tasks_path());
        let controller = Controller::new(store, theme, palettes, transition);

        Self {
            controller,
            visuals: styled_visuals(ThemeKind::Light, &palettes.light),
            search: String::new(),
            prompt: None,
            drag_from: None,
            base_font_size: config.font_size(),
            font_size: config.font_size(),
        }
    }

    fn dispatch(&mut self, action: Action) {
        if let Err(err) = self.controller.dispatch(action) {
            tracing::error!("failed to save tasks: {err}");
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        let text = match kind {
            PromptKind::Add => String::new(),
            PromptKind::Edit => match self.controller.selected_task() {
                Some(task) => task.title.clone(),
                None => return,
            },
        };
        self.prompt = Some(Prompt { kind, text });
    }

    fn update_theme(&mut self, ctx: &egui::Context) {
        match self.controller.tick_theme(Instant::now()) {
            Tick::Idle => {}
            Tick::Stepped(_) => {
                ctx.request_repaint_after(self.controller.transition().interval());
            }
            Tick::Finished(_) => {
                self.visuals =
                    styled_visuals(self.controller.theme(), &self.controller.palette());
                tracing::debug!(theme = self.controller.theme().name(), "theme applied");
            }
        }

        let mut visuals = self.visuals.clone();
        visuals.panel_fill = self.controller.background();
        ctx.set_visuals(visuals);
    }

    fn apply_font_size(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(self.font_size, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::new(self.font_size, egui::FontFamily::Proportional),
        );
        ctx.set_style(style);
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let actions: Vec<KeyAction> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key { key, pressed: true, modifiers, .. } => {
                        key_action(*key, *modifiers)
                    }
                    _ => None,
                })
                .collect()
        });

        for action in actions {
            self.handle_key_action(action);
        }
    }

    /// Ctrl + mouse wheel scales the font like Ctrl +/-.
    fn handle_font_wheel(&mut self, ctx: &egui::Context) {
        let delta = ctx.input(|i| if i.modifiers.ctrl { i.raw_scroll_delta.y } else { 0.0 });
        if delta > 0.0 {
            self.handle_key_action(KeyAction::IncreaseFontSize);
        } else if delta < 0.0 {
            self.handle_key_action(KeyAction::DecreaseFontSize);
        }
    }

    fn handle_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::MoveDown => {
                let len = self.controller.visible_len();
                if len > 0 {
                    let next = self.controller.selected().map_or(0, |pos| (pos + 1).min(len - 1));
                    self.dispatch(Action::Select(Some(next)));
                }
            }
            KeyAction::MoveUp => {
                if let Some(pos) = self.controller.selected() {
                    self.dispatch(Action::Select(Some(pos.saturating_sub(1))));
                }
            }
            KeyAction::AddNew => self.open_prompt(PromptKind::Add),
            KeyAction::EditSelected => self.open_prompt(PromptKind::Edit),
            KeyAction::DeleteSelected => self.dispatch(Action::Delete),
            KeyAction::ToggleSelected => self.dispatch(Action::ToggleDone),
            KeyAction::ToggleTheme => self.dispatch(Action::ToggleTheme),
            KeyAction::IncreaseFontSize => self.font_size = step_font_size(self.font_size, 1.0),
            KeyAction::DecreaseFontSize => self.font_size = step_font_size(self.font_size, -1.0),
            KeyAction::ResetFontSize => {
                self.font_size = self.base_font_size;
            }
        }
    }

    fn render_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        let mut outcome = None;
        egui::Window::new(prompt.kind.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(350.0);
                ui.label(prompt.kind.label());
                let response = ui.add(
                    egui::TextEdit::singleline(&mut prompt.text)
                        .desired_width(ui.available_width()),
                );
                response.request_focus();

                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        outcome = Some(PromptOutcome::Submit);
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = Some(PromptOutcome::Cancel);
                    }
                });

                ctx.input(|i| {
                    if i.key_pressed(egui::Key::Enter) {
                        outcome = Some(PromptOutcome::Submit);
                    } else if i.key_pressed(egui::Key::Escape) {
                        outcome = Some(PromptOutcome::Cancel);
                    }
                });
            });

        match outcome {
            Some(PromptOutcome::Submit) => {
                if let Some(prompt) = self.prompt.take() {
                    match prompt.kind {
                        PromptKind::Add => self.dispatch(Action::Add(prompt.text)),
                        PromptKind::Edit => self.dispatch(Action::Edit(prompt.text)),
                    }
                }
            }
            Some(PromptOutcome::Cancel) => self.prompt = None,
            None => {}
        }
    }

    fn render_search(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("🔍");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search tasks...")
                    .desired_width(ui.available_width()),
            );
            if response.changed() {
                let query = self.search.clone();
                self.dispatch(Action::Search(query));
            }
        });
    }

    fn render_buttons(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;
        let mut prompt = None;
        egui::Grid::new("task_buttons")
            .num_columns(4)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                if ui.button("Add").on_hover_text("Add a new task").clicked() {
                    prompt = Some(PromptKind::Add);
                }
                if ui.button("Edit").on_hover_text("Edit the selected task").clicked() {
                    prompt = Some(PromptKind::Edit);
                }
                if ui.button("Delete").on_hover_text("Delete the selected task").clicked() {
                    clicked = Some(Action::Delete);
                }
                if ui
                    .button("Toggle Done")
                    .on_hover_text("Mark the selected task done or not done")
                    .clicked()
                {
                    clicked = Some(Action::ToggleDone);
                }
                ui.end_row();

                if ui.button("Sort A-Z").on_hover_text("Sort tasks alphabetically").clicked() {
                    clicked = Some(Action::SortAlphabetical);
                }
                if ui
                    .button("Sort Done")
                    .on_hover_text("Sort tasks by completion")
                    .clicked()
                {
                    clicked = Some(Action::SortByDone);
                }
                if ui
                    .button("Toggle Theme")
                    .on_hover_text("Dark mode / Light mode")
                    .clicked()
                {
                    clicked = Some(Action::ToggleTheme);
                }
                ui.label(format!("Stats: {}", self.controller.stats()));
                ui.end_row();
            });

        if let Some(kind) = prompt {
            self.open_prompt(kind);
        }
        if let Some(action) = clicked {
            self.dispatch(action);
        }
    }

    fn render_task_list(&mut self, ui: &mut egui::Ui) {
        let palette = self.controller.palette();
        let row_height = self.font_size * ROW_HEIGHT_FACTOR;
        let font = egui::FontId::proportional(self.font_size);

        let width = ui.available_width();
        let title_width = (width * TITLE_COLUMN_SHARE).max(100.0);
        ui.horizontal(|ui| {
            ui.add_sized([title_width, row_height], egui::Label::new(egui::RichText::new("Task").strong()));
            ui.label(egui::RichText::new("Done").strong());
        });
        ui.separator();

        let rows: Vec<(String, &'static str)> = self
            .controller
            .visible()
            .map(|task| (task.title.clone(), task.done_marker()))
            .collect();

        if rows.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                let text = if self.controller.query().trim().is_empty() {
                    "No tasks yet. Press 'Add' to create one."
                } else {
                    "No matching tasks."
                };
                ui.label(egui::RichText::new(text).weak());
            });
            return;
        }

        let selected = self.controller.selected();
        let released = ui.input(|i| i.pointer.any_released());
        let mut clicked = None;
        let mut double_clicked = false;
        let mut drop_target = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for (pos, (title, marker)) in rows.iter().enumerate() {
                    let (rect, response) = ui.allocate_exact_size(
                        egui::vec2(ui.available_width(), row_height),
                        egui::Sense::click_and_drag(),
                    );

                    if response.drag_started() {
                        self.drag_from = Some(pos);
                    }
                    if response.clicked() {
                        clicked = Some(pos);
                    }
                    if response.double_clicked() {
                        clicked = Some(pos);
                        double_clicked = true;
                    }

                    let hovered_drop = self.drag_from.is_some() && ui.rect_contains_pointer(rect);
                    if hovered_drop && released {
                        drop_target = Some(pos);
                    }

                    let fill = if selected == Some(pos) {
                        Some(ui.visuals().selection.bg_fill)
                    } else if hovered_drop {
                        Some(palette.widget_fill(0.2))
                    } else if response.hovered() {
                        Some(palette.widget_fill(0.08))
                    } else {
                        None
                    };
                    if let Some(fill) = fill {
                        ui.painter().rect_filled(rect, 2.0, fill);
                    }

                    let text_color = ui.visuals().text_color();
                    let painter = ui.painter();
                    painter.text(
                        rect.left_center() + egui::vec2(4.0, 0.0),
                        egui::Align2::LEFT_CENTER,
                        title,
                        font.clone(),
                        text_color,
                    );
                    painter.text(
                        egui::pos2(rect.left() + title_width + 4.0, rect.center().y),
                        egui::Align2::LEFT_CENTER,
                        *marker,
                        font.clone(),
                        text_color,
                    );
                }
            });

        if let Some(pos) = clicked {
            self.dispatch(Action::Select(Some(pos)));
            if double_clicked {
                self.open_prompt(PromptKind::Edit);
            }
        }

        if released {
            if let (Some(from), Some(to)) = (self.drag_from.take(), drop_target) {
                self.dispatch(Action::Reorder { from, to });
            }
        }
    }
}

impl eframe::App for TaskManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_prompt = self.prompt.is_some();

        self.update_theme(ctx);
        self.apply_font_size(ctx);
        if had_prompt {
            self.render_prompt(ctx);
        } else {
            self.handle_keyboard(ctx);
            self.handle_font_wheel(ctx);
        }

        let enabled = self.prompt.is_none();

        egui::TopBottomPanel::top("search")
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.add_enabled_ui(enabled, |ui| self.render_search(ui));
                ui.add_space(4.0);
            });

        egui::TopBottomPanel::bottom("buttons")
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.add_enabled_ui(enabled, |ui| self.render_buttons(ui));
                ui.add_space(6.0);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.render_task_list(ui));
        });

        // A prompt opened this frame is drawn on the next one.
        if self.prompt.is_some() != had_prompt {
            ctx.request_repaint();
        }
        if self.drag_from.is_some() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}

/// Fresh egui visuals for `kind` with `palette` applied to every widget state.
fn styled_visuals(kind: ThemeKind, palette: &Palette) -> egui::Visuals {
    let mut visuals = match kind {
        ThemeKind::Dark => egui::Visuals::dark(),
        ThemeKind::Light => egui::Visuals::light(),
    };
    apply_palette(&mut visuals, palette);
    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_shortcuts_need_bare_keys() {
        let none = egui::Modifiers::NONE;
        assert_eq!(key_action(egui::Key::A, none), Some(KeyAction::AddNew));
        assert_eq!(key_action(egui::Key::X, none), Some(KeyAction::ToggleSelected));
        assert_eq!(key_action(egui::Key::A, egui::Modifiers::CTRL), None);
        assert_eq!(key_action(egui::Key::X, egui::Modifiers::CTRL), None);
        assert_eq!(key_action(egui::Key::T, egui::Modifiers::SHIFT), None);
        assert_eq!(key_action(egui::Key::Delete, egui::Modifiers::ALT), None);
    }

    #[test]
    fn font_keys_need_ctrl() {
        let ctrl = egui::Modifiers::CTRL;
        assert_eq!(key_action(egui::Key::Plus, ctrl), Some(KeyAction::IncreaseFontSize));
        assert_eq!(key_action(egui::Key::Minus, ctrl), Some(KeyAction::DecreaseFontSize));
        assert_eq!(key_action(egui::Key::Num0, ctrl), Some(KeyAction::ResetFontSize));
        assert_eq!(key_action(egui::Key::Minus, egui::Modifiers::NONE), None);
    }

    #[test]
    fn font_size_steps_stay_in_range() {
        assert_eq!(step_font_size(14.0, 1.0), 15.0);
        assert_eq!(step_font_size(MAX_FONT_SIZE, 1.0), MAX_FONT_SIZE);
        assert_eq!(step_font_size(MIN_FONT_SIZE, -1.0), MIN_FONT_SIZE);
    }
}
