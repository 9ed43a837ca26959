//! Card widgets for each climate category.
//!
//! Renders each view model as a fixed-height card:
//! - thermostat: name, current/target temperature, mode, action accent bar
//! - heater: name, temperature, on/off state
//! - average temperature: one wide card with a caption
//! - mold sensor: name, value, severity chip

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::theme::{mold_severity, temperature_band, Theme};
use crate::view_model::{HeaterView, HvacAction, MoldSensorView, ThermostatView};

/// Height of every category card in lines
pub const CARD_HEIGHT: u16 = 5;

/// "21.4°C", or placeholder dashes when there is no reading
pub fn format_temperature(temp: Option<f64>) -> String {
    match temp {
        Some(t) => format!("{t:.1}°C"),
        None => "--°C".to_string(),
    }
}

pub struct ThermostatCard<'a> {
    view: &'a ThermostatView,
    theme: &'a Theme,
    selected: bool,
}

impl<'a> ThermostatCard<'a> {
    pub fn new(view: &'a ThermostatView, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for ThermostatCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = CardFrame::prepare(area, buf, self.theme, self.selected) else {
            return;
        };

        // Accent bar only while the thermostat is active
        if self.view.hvac_mode.is_active() {
            let bar_color = match self.view.hvac_action {
                HvacAction::Heating => self.theme.heating,
                HvacAction::Cooling => self.theme.cooling,
                _ => self.theme.dimmed_alt,
            };
            frame.accent_bar(buf, bar_color);
        }

        frame.title(buf, &self.view.name);
        match self.view.hvac_action {
            HvacAction::Heating => frame.chip(buf, "Heating", self.theme.heating),
            HvacAction::Cooling => frame.chip(buf, "Cooling", self.theme.cooling),
            _ => {}
        }

        let temp = self.view.current_temperature;
        frame.line(
            buf,
            2,
            &format_temperature(temp),
            Style::default()
                .fg(temperature_band(temp).color())
                .bg(frame.bg)
                .add_modifier(Modifier::BOLD),
        );

        if let Some(target) = self.view.target_temperature {
            frame.line(
                buf,
                3,
                &format!("Target: {target:.1}°C"),
                Style::default().fg(frame.fg).bg(frame.bg),
            );
        }

        let mode_text = if self.view.hvac_mode.is_active() {
            format!("Mode: {}", self.view.hvac_mode.label())
        } else {
            "Off".to_string()
        };
        frame.line(
            buf,
            4,
            &mode_text,
            Style::default().fg(self.theme.dimmed).bg(frame.bg),
        );
    }
}

pub struct HeaterCard<'a> {
    view: &'a HeaterView,
    theme: &'a Theme,
    selected: bool,
}

impl<'a> HeaterCard<'a> {
    pub fn new(view: &'a HeaterView, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for HeaterCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = CardFrame::prepare(area, buf, self.theme, self.selected) else {
            return;
        };

        if self.view.is_on {
            frame.accent_bar(buf, self.theme.heating);
            frame.chip(buf, "Active", self.theme.heating);
        } else {
            frame.chip(buf, "Off", self.theme.dimmed_alt);
        }
        frame.title(buf, &self.view.name);

        let temp = self.view.current_temperature;
        frame.line(
            buf,
            2,
            &format_temperature(temp),
            Style::default()
                .fg(temperature_band(temp).color())
                .bg(frame.bg)
                .add_modifier(Modifier::BOLD),
        );

        let (toggle, style) = if self.view.is_on {
            ("● On", Style::default().fg(self.theme.heating).bg(frame.bg))
        } else {
            ("○ Off", Style::default().fg(self.theme.dimmed).bg(frame.bg))
        };
        frame.line(buf, 4, toggle, style);
    }
}

pub struct AverageCard<'a> {
    average: f64,
    theme: &'a Theme,
}

impl<'a> AverageCard<'a> {
    pub fn new(average: f64, theme: &'a Theme) -> Self {
        Self { average, theme }
    }
}

impl Widget for AverageCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = CardFrame::prepare(area, buf, self.theme, false) else {
            return;
        };

        frame.line(
            buf,
            1,
            &format_temperature(Some(self.average)),
            Style::default()
                .fg(temperature_band(Some(self.average)).color())
                .bg(frame.bg)
                .add_modifier(Modifier::BOLD),
        );
        frame.line(
            buf,
            3,
            "Average of all sensors",
            Style::default().fg(self.theme.dimmed).bg(frame.bg),
        );
    }
}

pub struct MoldCard<'a> {
    view: &'a MoldSensorView,
    theme: &'a Theme,
    selected: bool,
}

impl<'a> MoldCard<'a> {
    pub fn new(view: &'a MoldSensorView, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for MoldCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = CardFrame::prepare(area, buf, self.theme, self.selected) else {
            return;
        };

        let severity = mold_severity(self.view.value);
        frame.title(buf, &self.view.name);
        frame.chip(buf, severity.label(), severity.color());

        let value = if self.view.unit.is_empty() {
            format!("{:.1}", self.view.value)
        } else {
            format!("{:.1} {}", self.view.value, self.view.unit)
        };
        frame.line(
            buf,
            2,
            &value,
            Style::default()
                .fg(severity.color())
                .bg(frame.bg)
                .add_modifier(Modifier::BOLD),
        );
    }
}

/// Shared card scaffold: background fill, accent bar column, title row,
/// right-aligned chip, body lines.
struct CardFrame {
    area: Rect,
    bg: ratatui::style::Color,
    fg: ratatui::style::Color,
}

impl CardFrame {
    /// Fills the background and returns the frame, or None if there is no
    /// room to draw anything.
    fn prepare(area: Rect, buf: &mut Buffer, theme: &Theme, selected: bool) -> Option<Self> {
        if area.width < 4 || area.height == 0 {
            return None;
        }

        let bg = if selected {
            theme.selection_bg
        } else {
            theme.background
        };
        let fg = if selected {
            theme.selection_fg
        } else {
            theme.foreground
        };

        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(bg);
                }
            }
        }

        Some(Self { area, bg, fg })
    }

    fn accent_bar(&self, buf: &mut Buffer, color: ratatui::style::Color) {
        for y in self.area.y..self.area.y + self.area.height {
            buf.set_string(
                self.area.x,
                y,
                "▌",
                Style::default().fg(color).bg(self.bg),
            );
        }
    }

    fn title(&self, buf: &mut Buffer, name: &str) {
        self.line(
            buf,
            0,
            name,
            Style::default()
                .fg(self.fg)
                .bg(self.bg)
                .add_modifier(Modifier::BOLD),
        );
    }

    /// Right-aligned status chip on the title row
    fn chip(&self, buf: &mut Buffer, label: &str, color: ratatui::style::Color) {
        let width = label.width() as u16;
        if width + 2 >= self.area.width {
            return;
        }
        let x = self.area.x + self.area.width - width - 1;
        buf.set_string(x, self.area.y, label, Style::default().fg(color).bg(self.bg));
    }

    fn line(&self, buf: &mut Buffer, row: u16, text: &str, style: Style) {
        if row >= self.area.height {
            return;
        }
        let max = self.area.width.saturating_sub(3) as usize;
        buf.set_string(
            self.area.x + 2,
            self.area.y + row,
            truncate(text, max),
            style,
        );
    }
}

/// Truncate string to fit within max_width, adding ellipsis if needed
fn truncate(s: &str, max_width: usize) -> String {
    let width = s.width();
    if width <= max_width {
        s.to_string()
    } else if max_width <= 1 {
        "…".to_string()
    } else {
        let mut result = String::new();
        let mut current_width = 0;

        for c in s.chars() {
            let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            current_width += char_width;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_model::HvacMode;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello w…");
        assert_eq!(truncate("hi", 2), "hi");
        assert_eq!(truncate("hello", 1), "…");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(Some(21.46)), "21.5°C");
        assert_eq!(format_temperature(Some(-3.0)), "-3.0°C");
        assert_eq!(format_temperature(None), "--°C");
    }

    #[test]
    fn test_thermostat_card_renders_placeholder() {
        let view = ThermostatView {
            name: "Bedroom".to_string(),
            climate_entity: "climate.bedroom".to_string(),
            current_temperature: None,
            target_temperature: None,
            hvac_mode: HvacMode::Off,
            hvac_action: crate::view_model::HvacAction::Idle,
        };
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 30, CARD_HEIGHT);
        let mut buf = Buffer::empty(area);
        ThermostatCard::new(&view, &theme).render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf.cell((x, y)).unwrap().symbol())
                .collect()
        };
        assert!(row(0).contains("Bedroom"));
        assert!(row(2).contains("--°C"));
        assert!(row(4).contains("Off"));
    }
}
