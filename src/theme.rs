//! Light/dark presets and the animated background transition between them.

use std::time::{Duration, Instant};

use anyhow::Result;
use eframe::egui;
use egui::Color32;

pub const DEFAULT_STEPS: u32 = 30;
pub const DEFAULT_TICK: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub fn toggle(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
        }
    }
}

/// Background/foreground pair applied to every styled element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color32,
    pub foreground: Color32,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: Color32::from_rgb(30, 30, 30),
        foreground: Color32::WHITE,
    };

    pub const LIGHT: Palette = Palette {
        background: Color32::from_rgb(240, 240, 240),
        foreground: Color32::BLACK,
    };

    /// Fill for widgets, a shade of the background pulled toward the text color.
    pub fn widget_fill(&self, amount: f32) -> Color32 {
        lerp_color(self.background, self.foreground, amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palettes {
    pub dark: Palette,
    pub light: Palette,
}

impl Default for Palettes {
    fn default() -> Self {
        Self {
            dark: Palette::DARK,
            light: Palette::LIGHT,
        }
    }
}

impl Palettes {
    pub fn get(&self, kind: ThemeKind) -> Palette {
        match kind {
            ThemeKind::Dark => self.dark,
            ThemeKind::Light => self.light,
        }
    }
}

pub fn parse_hex_color(hex: &str) -> Result<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(anyhow::anyhow!("Invalid hex color length"));
    }
    let r = u8::from_str_radix(&hex[0..2], 16)?;
    let g = u8::from_str_radix(&hex[2..4], 16)?;
    let b = u8::from_str_radix(&hex[4..6], 16)?;
    Ok(Color32::from_rgb(r, g, b))
}

/// Per-channel linear interpolation, truncated toward zero.
pub fn lerp_color(start: Color32, target: Color32, progress: f32) -> Color32 {
    let progress = progress.clamp(0.0, 1.0);
    let channel = |s: u8, t: u8| (s as f32 + (t as f32 - s as f32) * progress) as u8;
    Color32::from_rgb(
        channel(start.r(), target.r()),
        channel(start.g(), target.g()),
        channel(start.b(), target.b()),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Animating {
        step: u32,
        start: Color32,
        target: Color32,
    },
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Stepped(Color32),
    Finished(Color32),
}

/// Background transition advanced by discrete ticks.
#[derive(Debug, Clone)]
pub struct ThemeTransition {
    state: TransitionState,
    displayed: Color32,
    steps: u32,
    interval: Duration,
    last_tick: Option<Instant>,
}

impl ThemeTransition {
    pub fn new(displayed: Color32, steps: u32, interval: Duration) -> Self {
        Self {
            state: TransitionState::Idle,
            displayed,
            steps: steps.max(1),
            interval,
            last_tick: None,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn displayed(&self) -> Color32 {
        self.displayed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, TransitionState::Animating { .. })
    }

    /// Starts (or restarts) from whatever color is on screen right now.
    pub fn start(&mut self, target: Color32) {
        self.state = TransitionState::Animating {
            step: 0,
            start: self.displayed,
            target,
        };
        self.last_tick = None;
    }

    pub fn tick(&mut self) -> Tick {
        let TransitionState::Animating { step, start, target } = self.state else {
            return Tick::Idle;
        };

        let step = step + 1;
        if step >= self.steps {
            self.displayed = target;
            self.state = TransitionState::Idle;
            return Tick::Finished(target);
        }

        self.displayed = lerp_color(start, target, step as f32 / self.steps as f32);
        self.state = TransitionState::Animating { step, start, target };
        Tick::Stepped(self.displayed)
    }

    /// Runs every tick that fell due since the last call.
    ///
    /// The first call after `start` only arms the clock.
    pub fn advance(&mut self, now: Instant) -> Tick {
        if !self.is_animating() {
            return Tick::Idle;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return Tick::Stepped(self.displayed);
        };

        let mut outcome = Tick::Stepped(self.displayed);
        let mut last = last;
        while now.saturating_duration_since(last) >= self.interval {
            last += self.interval;
            outcome = self.tick();
            if matches!(outcome, Tick::Finished(_)) {
                break;
            }
        }
        self.last_tick = Some(last);
        outcome
    }
}

/// Something that takes palette colors and may contain further styled nodes.
pub trait Styleable {
    fn set_colors(&mut self, palette: &Palette);

    fn children_mut(&mut self) -> Vec<&mut dyn Styleable> {
        Vec::new()
    }
}

/// Applies `palette` to `node` and all of its descendants, depth first.
pub fn apply_palette(node: &mut dyn Styleable, palette: &Palette) {
    node.set_colors(palette);
    for child in node.children_mut() {
        apply_palette(child, palette);
    }
}

impl Styleable for egui::Visuals {
    fn set_colors(&mut self, palette: &Palette) {
        self.dark_mode = palette.background.r() < 128;
        self.override_text_color = Some(palette.foreground);
        self.panel_fill = palette.background;
        self.window_fill = palette.background;
        self.extreme_bg_color = palette.widget_fill(0.06);
        self.faint_bg_color = palette.widget_fill(0.04);
        self.window_stroke.color = palette.widget_fill(0.3);
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Styleable> {
        vec![&mut self.widgets as &mut dyn Styleable]
    }
}

impl Styleable for egui::style::Widgets {
    fn set_colors(&mut self, _palette: &Palette) {}

    fn children_mut(&mut self) -> Vec<&mut dyn Styleable> {
        vec![
            &mut self.noninteractive as &mut dyn Styleable,
            &mut self.inactive as &mut dyn Styleable,
            &mut self.hovered as &mut dyn Styleable,
            &mut self.active as &mut dyn Styleable,
            &mut self.open as &mut dyn Styleable,
        ]
    }
}

impl Styleable for egui::style::WidgetVisuals {
    fn set_colors(&mut self, palette: &Palette) {
        self.bg_fill = palette.widget_fill(0.12);
        self.weak_bg_fill = palette.widget_fill(0.12);
        self.bg_stroke.color = palette.widget_fill(0.3);
        self.fg_stroke.color = palette.foreground;
    }
}
