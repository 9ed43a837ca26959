use crate::config::{CardConfig, Entities};
use crate::hass::{HostRequest, StateSnapshot};
use crate::view_model::{derive_views, DerivedViews};

/// One tab per climate category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Thermostats,
    Heaters,
    Temperature,
    Mold,
}

impl Tab {
    /// Fixed render order, also used for the show-all concatenation
    pub const ALL: [Tab; 4] = [
        Self::Thermostats,
        Self::Heaters,
        Self::Temperature,
        Self::Mold,
    ];

    /// Tab named in the configuration; None for anything unknown so the
    /// built-in default stands.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "thermostats" => Some(Self::Thermostats),
            "heaters" => Some(Self::Heaters),
            "temperature" => Some(Self::Temperature),
            "mold" => Some(Self::Mold),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Thermostats => "Thermostats",
            Self::Heaters => "Heaters",
            Self::Temperature => "Temperature",
            Self::Mold => "Mold Index",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Thermostats => "🌡",
            Self::Heaters => "🔥",
            Self::Temperature => "🏠",
            Self::Mold => "💧",
        }
    }
}

/// Reference to one actionable card in the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRef {
    Thermostat(usize),
    Heater(usize),
    MoldSensor(usize),
}

/// Card state
pub struct App {
    /// Configuration as accepted (validated by the loader)
    config: CardConfig,
    /// Entity mapping extracted from the configuration
    entities: Entities,
    /// View models derived from the latest host snapshot
    views: DerivedViews,
    /// Currently active tab; changes only on explicit user input
    active_tab: Tab,
    /// Selected index into `actionable_cards()`
    selected: usize,
}

impl App {
    pub fn new(config: CardConfig) -> Self {
        let entities = config.entities.clone().unwrap_or_default();
        let active_tab = config
            .options
            .default_tab
            .as_deref()
            .and_then(Tab::from_name)
            .unwrap_or(Tab::Thermostats);

        Self {
            config,
            entities,
            views: DerivedViews::default(),
            active_tab,
            selected: 0,
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn views(&self) -> &DerivedViews {
        &self.views
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn show_all(&self) -> bool {
        self.config.options.show_all
    }

    pub fn title(&self) -> &str {
        self.config.title()
    }

    /// Recompute every view from a fresh host snapshot. The snapshot is not
    /// retained; only the derived views are.
    pub fn update_states(&mut self, snapshot: &StateSnapshot) {
        self.views = derive_views(&self.entities, snapshot, self.views.average_temperature);
        self.clamp_selection();
    }

    /// Tabs shown in the strip. Empty categories are omitted; the
    /// temperature tab is always present.
    pub fn visible_tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .iter()
            .copied()
            .filter(|tab| match tab {
                Tab::Thermostats => !self.views.thermostats.is_empty(),
                Tab::Heaters => !self.views.heaters.is_empty(),
                Tab::Temperature => true,
                Tab::Mold => !self.views.mold_sensors.is_empty(),
            })
            .collect()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.selected = 0;
        }
    }

    /// Next visible tab, wrapping. Inert under show-all (there is no strip).
    pub fn next_tab(&mut self) {
        self.cycle_tab(1);
    }

    /// Previous visible tab, wrapping
    pub fn prev_tab(&mut self) {
        self.cycle_tab(-1);
    }

    fn cycle_tab(&mut self, step: isize) {
        if self.show_all() {
            return;
        }
        let tabs = self.visible_tabs();
        if tabs.is_empty() {
            return;
        }
        // An active tab whose category emptied is no longer in the strip;
        // cycling restarts from the front
        let current = tabs
            .iter()
            .position(|t| *t == self.active_tab)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(tabs.len() as isize) as usize;
        self.select_tab(tabs[next]);
    }

    /// Actionable cards of the current view, in render order. The average
    /// temperature card is display-only and never appears here. Under
    /// show-all the selection spans the concatenated categories.
    pub fn actionable_cards(&self) -> Vec<CardRef> {
        let mut cards = Vec::new();
        if self.show_all() {
            for tab in Tab::ALL {
                self.push_tab_cards(tab, &mut cards);
            }
        } else {
            self.push_tab_cards(self.active_tab, &mut cards);
        }
        cards
    }

    fn push_tab_cards(&self, tab: Tab, out: &mut Vec<CardRef>) {
        match tab {
            Tab::Thermostats => {
                out.extend((0..self.views.thermostats.len()).map(CardRef::Thermostat));
            }
            Tab::Heaters => out.extend((0..self.views.heaters.len()).map(CardRef::Heater)),
            Tab::Mold => {
                out.extend((0..self.views.mold_sensors.len()).map(CardRef::MoldSensor));
            }
            Tab::Temperature => {}
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_card(&self) -> Option<CardRef> {
        self.actionable_cards().get(self.selected).copied()
    }

    /// Move selection up
    pub fn previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down
    pub fn next(&mut self) {
        if self.selected + 1 < self.actionable_cards().len() {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.actionable_cards().len() {
            self.selected = 0;
        }
    }

    /// Host request for activating the selected card: thermostat and mold
    /// cards open the host's detail view, heater cards toggle their switch.
    /// None when nothing is selected.
    pub fn activate_selected(&self) -> Option<HostRequest> {
        match self.selected_card()? {
            CardRef::Thermostat(i) => {
                let thermostat = self.views.thermostats.get(i)?;
                Some(HostRequest::show_details(thermostat.climate_entity.clone()))
            }
            CardRef::Heater(i) => self.toggle_heater_request(i),
            CardRef::MoldSensor(i) => {
                let sensor = self.views.mold_sensors.get(i)?;
                Some(HostRequest::show_details(sensor.entity_id.clone()))
            }
        }
    }

    /// Toggle request for the selected heater; None when the selection is
    /// not a heater.
    pub fn toggle_selected_heater(&self) -> Option<HostRequest> {
        match self.selected_card()? {
            CardRef::Heater(i) => self.toggle_heater_request(i),
            _ => None,
        }
    }

    fn toggle_heater_request(&self, index: usize) -> Option<HostRequest> {
        let heater = self.views.heaters.get(index)?;
        Some(HostRequest::turn_switch(
            heater.switch_entity.clone(),
            !heater.is_on,
        ))
    }
}
