//! Frame composition for the card.
//!
//! Layout:
//! - header block: card title, tab strip (hidden when show_all is set)
//! - content block: the active category's cards, or every non-empty
//!   category stacked in fixed order under show_all
//! - status bar with key hints

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, CardRef, Tab};

use super::card::{AverageCard, HeaterCard, MoldCard, ThermostatCard, CARD_HEIGHT};
use super::layout::{CardGrid, COLUMN_GAP};
use super::theme::Theme;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let theme = app.config().resolve_theme();

    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header: title + tab strip
            Constraint::Min(1),    // content
            Constraint::Length(1), // status bar
        ])
        .split(area);

    draw_header(f, app, chunks[0], &theme);
    draw_content(f, app, chunks[1], &theme);
    draw_status_bar(f, app, chunks[2], &theme);
}

/// Card title with the tab strip inside; just the title under show_all
fn draw_header(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" {} ", app.title()))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.show_all() {
        return;
    }

    let tabs = app.visible_tabs();
    let titles: Vec<Line> = tabs
        .iter()
        .map(|tab| Line::from(format!("{} {}", tab.glyph(), tab.label())))
        .collect();
    let selected = tabs.iter().position(|t| *t == app.active_tab());

    let strip = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme.dimmed_alt).bg(theme.background))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    f.render_widget(strip, inner);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let selected = app.selected_card();

    if app.show_all() {
        // every non-empty category, fixed order
        let mut y = inner.y;
        for tab in Tab::ALL {
            if section_is_empty(app, tab) {
                continue;
            }
            if y >= inner.y + inner.height {
                break;
            }
            let remaining = Rect {
                x: inner.x,
                y,
                width: inner.width,
                height: inner.y + inner.height - y,
            };
            y = draw_section(f, app, tab, remaining, theme, selected);
        }
    } else if !section_is_empty(app, app.active_tab()) {
        draw_section(f, app, app.active_tab(), inner, theme, selected);
    }
    // an active tab whose category is empty renders an empty content area
}

fn section_is_empty(app: &App, tab: Tab) -> bool {
    let views = app.views();
    match tab {
        Tab::Thermostats => views.thermostats.is_empty(),
        Tab::Heaters => views.heaters.is_empty(),
        Tab::Temperature => false,
        Tab::Mold => views.mold_sensors.is_empty(),
    }
}

/// Section title plus its card grid; returns the y where the next section
/// starts.
fn draw_section(
    f: &mut Frame,
    app: &App,
    tab: Tab,
    area: Rect,
    theme: &Theme,
    selected: Option<CardRef>,
) -> u16 {
    let views = app.views();

    let title = Paragraph::new(format!("{} {}", tab.glyph(), tab.label())).style(
        Style::default()
            .fg(theme.foreground)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(
        title,
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    let body = Rect {
        x: area.x,
        y: area.y + 2.min(area.height),
        width: area.width,
        height: area.height.saturating_sub(2),
    };

    let grid = CardGrid::for_width(body.width, CARD_HEIGHT);
    let consumed = match tab {
        Tab::Thermostats => {
            render_cards(f, views.thermostats.len(), body, grid, |i| {
                ThermostatCard::new(&views.thermostats[i], theme)
                    .selected(selected == Some(CardRef::Thermostat(i)))
            });
            grid.height_for(views.thermostats.len())
        }
        Tab::Heaters => {
            render_cards(f, views.heaters.len(), body, grid, |i| {
                HeaterCard::new(&views.heaters[i], theme)
                    .selected(selected == Some(CardRef::Heater(i)))
            });
            grid.height_for(views.heaters.len())
        }
        Tab::Temperature => {
            if body.height > 0 {
                let card_area = Rect {
                    x: body.x,
                    y: body.y,
                    width: body.width,
                    height: CARD_HEIGHT.min(body.height),
                };
                f.render_widget(AverageCard::new(views.average_temperature, theme), card_area);
            }
            CARD_HEIGHT
        }
        Tab::Mold => {
            render_cards(f, views.mold_sensors.len(), body, grid, |i| {
                MoldCard::new(&views.mold_sensors[i], theme)
                    .selected(selected == Some(CardRef::MoldSensor(i)))
            });
            grid.height_for(views.mold_sensors.len())
        }
    };

    // one blank line before the next section
    body.y + consumed + 1
}

/// Lay cards out in the grid, clipping whole rows at the bottom edge
fn render_cards<W: ratatui::widgets::Widget>(
    f: &mut Frame,
    count: usize,
    body: Rect,
    grid: CardGrid,
    mut card_at: impl FnMut(usize) -> W,
) {
    if body.width == 0 || body.height == 0 {
        return;
    }
    let col_width = grid.column_width(body.width);
    if col_width == 0 {
        return;
    }

    for i in 0..count {
        let (row, col) = grid.position(i);
        let y = body.y + row * grid.card_height;
        if y + grid.card_height > body.y + body.height {
            break;
        }
        let card_area = Rect {
            x: body.x + col * (col_width + COLUMN_GAP),
            y,
            width: col_width,
            height: grid.card_height,
        };
        f.render_widget(card_at(i), card_area);
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let count = app.actionable_cards().len();

    let status = if count > 0 {
        let position = format!(" {}/{}", app.selected_index() + 1, count);
        if app.show_all() {
            format!("{position} | ↑↓: select | Enter: open/toggle | q: quit")
        } else {
            format!("{position} | Tab: switch | ↑↓: select | Enter: open/toggle | q: quit")
        }
    } else if app.show_all() {
        " q: quit".to_string()
    } else {
        " Tab: switch | q: quit".to_string()
    };

    let status_bar =
        Paragraph::new(status).style(Style::default().fg(theme.dimmed).bg(theme.background));
    f.render_widget(status_bar, area);
}
