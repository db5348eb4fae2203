//! Menu controller
//!
//! The controller is the central piece that:
//! - Processes encoder input
//! - Resolves, formats and pre-renders the current menu
//! - Runs edit sessions and their live previews
//! - Refreshes dynamic values and blanks the panel when idle
//!
//! Every entry point takes the current time in milliseconds; the
//! controller never reads a clock itself.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::{debug, info, warn};

use crate::edit::{EditSession, EditState, EditValue};
use crate::format::{format_item, DynamicValueCache, FormatContext, FormattedRow};
use crate::menu::synth::{self, ScanState};
use crate::menu::{
    Action, ChoiceGroup, Generator, MenuDefinition, MenuId, MenuItem, Query, Setting, ROOT_MENU,
};
use crate::render::{render_bar, Bitmap, FrameCache};
use crate::sleep::{Activity, SleepTimer};
use crate::traits::settings::{keys, DEFAULT_DISPLAY_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS};
use crate::traits::system::UNKNOWN;
use crate::traits::{
    effective_contrast, hue_to_rgb, Hardware, InputEvent, Network, Rotation, ScanTicket,
    ServiceState,
};

/// Notable outcomes of input handling
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Input only woke the panel
    Woke,
    /// Cursor moved within the current menu
    Moved,
    /// Entered a menu
    Entered(MenuId),
    /// Returned to the parent menu
    Left,
    /// An edit session opened
    EditStarted(crate::edit::EditKind),
    /// The value of the open session changed
    EditAdjusted,
    /// The open session was committed
    EditCommitted,
    /// A choice group option was picked
    ChoiceSelected(ChoiceGroup, i32),
    /// An action row ran
    ActionRun(Action),
}

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Menu engine state and its collaborators
pub struct MenuController<H: Hardware> {
    hw: H,
    definition: MenuDefinition,
    nav: crate::nav::Navigation,
    edit: Option<EditSession>,
    values: DynamicValueCache,
    sleep: SleepTimer,
    scan: ScanState,
    next_ticket: u32,
    /// Resolved items of the current menu
    items: Vec<MenuItem>,
    /// Formatted rows, parallel to `items`
    rows: Vec<FormattedRow>,
    frames: FrameCache,
    /// Sorted sensor names behind the last expansion
    sensors: Vec<String>,
    /// Threshold snapshot for editor rows
    limits: BTreeMap<String, i32>,
}

impl<H: Hardware> MenuController<H> {
    /// Create a controller showing the root menu
    ///
    /// Nothing is drawn until `start`.
    pub fn new(hw: H, definition: MenuDefinition, timeout_ms: u64, now_ms: u64) -> Self {
        Self {
            hw,
            definition,
            nav: crate::nav::Navigation::new(MenuId::named(ROOT_MENU)),
            edit: None,
            values: DynamicValueCache::new(),
            sleep: SleepTimer::new(timeout_ms, now_ms),
            scan: ScanState::Idle,
            next_ticket: 0,
            items: Vec::new(),
            rows: Vec::new(),
            frames: FrameCache::default(),
            sensors: Vec::new(),
            limits: BTreeMap::new(),
        }
    }

    /// Apply stored settings to the hardware and draw the root menu
    pub fn start(&mut self, now_ms: u64) {
        let settings = self.hw.settings();
        let brightness = settings.get_int(keys::DISPLAY_BRIGHTNESS, DEFAULT_DISPLAY_BRIGHTNESS);
        let led = settings.get_int(keys::LED_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS);
        let orientation = settings.get_int(
            ChoiceGroup::Orientation.key(),
            ChoiceGroup::Orientation.default_value(),
        );

        self.set_contrast(brightness);
        self.apply_choice(ChoiceGroup::Orientation, orientation);
        self.hw.led().set_brightness(clamp_u8(led));
        self.sleep.record_activity(now_ms);

        info!(
            "menu engine started: brightness {}, led {}, orientation {}",
            brightness, led, orientation
        );
        self.rebuild(false, now_ms);
    }

    // Accessors

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn current_menu(&self) -> &MenuId {
        self.nav.current()
    }

    pub fn navigation(&self) -> &crate::nav::Navigation {
        &self.nav
    }

    /// Index of the highlighted item
    pub fn selected_index(&self) -> usize {
        self.nav.offset()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn rows(&self) -> &[FormattedRow] {
        &self.rows
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn edit_state(&self) -> EditState {
        self.edit
            .as_ref()
            .map(EditSession::state)
            .unwrap_or(EditState::Closed)
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleep.is_sleeping()
    }

    pub fn scan_state(&self) -> &ScanState {
        &self.scan
    }

    pub fn values(&self) -> &DynamicValueCache {
        &self.values
    }

    /// Cached frame for the current offset
    pub fn current_frame(&self) -> &Bitmap {
        self.frames.frame(self.nav.offset())
    }

    // Input

    /// Note activity; returns true if the panel was asleep
    ///
    /// Clears the sleeping flag without drawing. Callers that use this
    /// directly must `redraw` and drop the waking input themselves.
    pub fn wake(&mut self, now_ms: u64) -> bool {
        self.sleep.record_activity(now_ms) == Activity::WokeUp
    }

    /// Process one input event
    ///
    /// The hub handles waking itself through `wake` before calling this.
    pub fn process_input(&mut self, input: InputEvent, now_ms: u64) -> Option<UiEvent> {
        if self.wake(now_ms) {
            debug!("input woke the display");
            self.redraw();
            return Some(UiEvent::Woke);
        }

        match input {
            InputEvent::Rotation(delta) => self.handle_rotation(delta),
            InputEvent::Press => self.handle_press(now_ms),
        }
    }

    fn handle_rotation(&mut self, delta: i32) -> Option<UiEvent> {
        if let Some(session) = self.edit.as_mut() {
            if !session.adjust(delta) {
                return None;
            }
            self.apply_live_value();
            self.render_edit();
            return Some(UiEvent::EditAdjusted);
        }

        if self.nav.scroll(delta) {
            self.redraw();
            Some(UiEvent::Moved)
        } else {
            None
        }
    }

    fn handle_press(&mut self, now_ms: u64) -> Option<UiEvent> {
        if self.edit.is_some() {
            self.commit_edit();
            return Some(UiEvent::EditCommitted);
        }

        // Offset may be stale if the menu emptied under us
        let item = self.items.get(self.nav.offset()).cloned()?;

        match item {
            MenuItem::Back { .. } => self.navigate_back(now_ms).then_some(UiEvent::Left),
            MenuItem::Submenu { submenu, .. } => {
                self.navigate_to(submenu.clone(), now_ms);
                Some(UiEvent::Entered(submenu))
            }
            MenuItem::DynamicSubmenu { generator, .. } => {
                let id = MenuId::Generated(generator);
                self.navigate_to(id.clone(), now_ms);
                Some(UiEvent::Entered(id))
            }
            MenuItem::Checkbox { group, value, .. } => {
                self.select_choice(group, value);
                Some(UiEvent::ChoiceSelected(group, value))
            }
            MenuItem::Action { action, .. } => {
                self.run_action(action, now_ms);
                Some(UiEvent::ActionRun(action))
            }
            other if other.is_editor() => self.begin_edit(&other).map(UiEvent::EditStarted),
            _ => None,
        }
    }

    // Navigation

    /// Push a menu and draw it from the top
    pub fn navigate_to(&mut self, id: MenuId, now_ms: u64) {
        if let MenuId::Named(name) = &id {
            if !self.definition.contains(name) {
                warn!("no menu named '{}'", name);
                return;
            }
        }

        debug!("entering {:?}", id);
        if id == MenuId::Generated(Generator::NetworkScan) {
            self.start_scan();
        }
        self.nav.push(id);
        self.rebuild(false, now_ms);
    }

    /// Pop to the parent menu; returns false at the root
    pub fn navigate_back(&mut self, now_ms: u64) -> bool {
        if !self.nav.pop() {
            return false;
        }
        debug!("back to {:?}", self.nav.current());
        self.rebuild(false, now_ms);
        true
    }

    // Resolution and rendering

    /// Re-resolve the current menu, re-run its queries and redraw
    fn rebuild(&mut self, keep_offset: bool, now_ms: u64) {
        self.items = self.resolve_current(now_ms, true);
        self.refresh_queries(now_ms, true);
        self.reformat(keep_offset);
    }

    fn resolve_current(&mut self, now_ms: u64, fetch_sensors: bool) -> Vec<MenuItem> {
        match self.nav.current().clone() {
            MenuId::Named(name) => {
                let mut items = self
                    .definition
                    .get(&name)
                    .map(<[MenuItem]>::to_vec)
                    .unwrap_or_default();

                if items
                    .iter()
                    .any(|i| matches!(i, MenuItem::SensorSummary { .. }))
                {
                    if fetch_sensors {
                        let mut sensors = self.hw.sensors().list_active_sensors();
                        sensors.sort();
                        self.sensors = sensors;
                    }
                    self.values.store(
                        Query::ActiveSensorCount,
                        self.sensors.len().to_string(),
                        now_ms,
                    );
                    items = synth::expand_sensor_summaries(&items, &self.sensors);
                }

                if items
                    .iter()
                    .any(|i| matches!(i, MenuItem::ThresholdBar { .. }))
                {
                    self.limits = self.hw.sensors().get_limits();
                }
                items
            }
            MenuId::Sensor(name) => {
                let detail = self.hw.sensors().get_sensor_detail(&name);
                self.limits = self.hw.sensors().get_limits();
                synth::sensor_detail_rows(&name, &detail)
            }
            MenuId::Generated(Generator::NetworkScan) => synth::scan_rows(&self.scan),
            MenuId::Generated(Generator::ServiceStatus) => {
                let facts = self.hw.facts();
                let services: Vec<(String, ServiceState)> = facts
                    .monitored_services()
                    .into_iter()
                    .map(|name| {
                        let state = facts.service_status(&name);
                        (name, state)
                    })
                    .collect();
                synth::service_rows(&services)
            }
        }
    }

    /// Format every item, rebuild the frame cache and present
    fn reformat(&mut self, keep_offset: bool) {
        let ctx = FormatContext {
            values: &self.values,
            edit: self.edit.as_ref(),
            settings: self.hw.settings(),
            limits: &self.limits,
        };
        self.rows = self.items.iter().map(|item| format_item(item, &ctx)).collect();
        self.frames = FrameCache::build(&self.rows);
        self.nav.set_item_count(self.items.len(), keep_offset);
        self.redraw();
    }

    /// Present whatever the current view is; a sleeping panel stays dark
    pub fn redraw(&mut self) {
        if self.sleep.is_sleeping() {
            return;
        }

        let result = match &self.edit {
            Some(session) if session.kind().is_bar() => {
                let frame = render_bar(
                    session.label(),
                    &session.value().to_string(),
                    session.bar_fill(),
                );
                self.hw.display().present(&frame)
            }
            _ => {
                let frame = self.frames.frame(self.nav.offset());
                self.hw.display().present(frame)
            }
        };

        if let Err(e) = result {
            warn!("display present failed: {:?}", e);
        }
    }

    fn blank(&mut self) {
        if let Err(e) = self.hw.display().blank() {
            warn!("display blank failed: {:?}", e);
        }
    }

    // Dynamic values

    fn run_query(&mut self, query: Query) -> String {
        let value = match query {
            Query::WifiSsid => self.hw.facts().wifi_ssid(),
            Query::IpAddress => self.hw.facts().ip_address(),
            Query::Uptime => self.hw.facts().uptime(),
            Query::LoadAverage => self.hw.facts().load_average(),
            Query::ServiceStatus => {
                let facts = self.hw.facts();
                match facts.monitored_services().first() {
                    Some(name) => facts.service_status(name).label(),
                    None => String::from(UNKNOWN),
                }
            }
            Query::ActiveSensorCount => self.hw.sensors().list_active_sensors().len().to_string(),
        };

        if value.is_empty() {
            String::from(UNKNOWN)
        } else {
            value
        }
    }

    /// Re-run the queries of dynamic rows; all of them when `force`,
    /// otherwise only those whose interval has elapsed
    ///
    /// Returns whether any displayed value changed.
    fn refresh_queries(&mut self, now_ms: u64, force: bool) -> bool {
        let mut due: Vec<Query> = self
            .items
            .iter()
            .filter_map(|item| match item {
                MenuItem::Dynamic {
                    function, refresh, ..
                } => {
                    let is_due = force
                        || refresh
                            .interval_ms()
                            .is_some_and(|iv| self.values.is_due(*function, iv, now_ms));
                    is_due.then_some(*function)
                }
                _ => None,
            })
            .collect();
        due.sort();
        due.dedup();

        let mut changed = false;
        for query in due {
            let value = self.run_query(query);
            changed |= self.values.store(query, value, now_ms);
        }
        changed
    }

    fn sensor_list_due(&self, now_ms: u64) -> bool {
        self.items.iter().any(|item| match item {
            MenuItem::SensorSummary { refresh, .. } => refresh
                .interval_ms()
                .is_some_and(|iv| self.values.is_due(Query::ActiveSensorCount, iv, now_ms)),
            _ => false,
        })
    }

    /// Periodic work: sleep check and timed refreshes
    ///
    /// Returns true if the panel was redrawn. Nothing refreshes while the
    /// panel sleeps or an edit session is open, and an open session also
    /// holds off sleep.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.edit.is_none() && self.sleep.check(now_ms) {
            info!("display idle for {} ms, sleeping", self.sleep.timeout_ms());
            self.blank();
            return false;
        }
        if self.sleep.is_sleeping() || self.edit.is_some() {
            return false;
        }

        if self.sensor_list_due(now_ms) {
            let mut fresh = self.hw.sensors().list_active_sensors();
            fresh.sort();
            if fresh != self.sensors {
                debug!("sensor list changed: {} -> {}", self.sensors.len(), fresh.len());
                self.sensors = fresh;
                self.items = self.resolve_current(now_ms, false);
                self.refresh_queries(now_ms, false);
                self.reformat(false);
                return true;
            }
            self.values
                .store(Query::ActiveSensorCount, fresh.len().to_string(), now_ms);
        }

        if self.refresh_queries(now_ms, false) {
            self.reformat(true);
            return true;
        }
        false
    }

    // Scanning

    fn start_scan(&mut self) {
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = ScanTicket(self.next_ticket);
        debug!("starting wifi scan {:?}", ticket);
        self.scan = ScanState::Scanning(ticket);
        self.hw.scanner().start_scan(ticket);
    }

    /// Deliver scan results
    ///
    /// Results for any ticket but the latest are dropped. The scan menu is
    /// only redrawn if it is still the current menu. Returns whether it was.
    pub fn complete_scan(&mut self, ticket: ScanTicket, networks: Vec<Network>) -> bool {
        if self.scan != ScanState::Scanning(ticket) {
            debug!("dropping stale scan result {:?}", ticket);
            return false;
        }

        let ranked = synth::rank_networks(networks);
        debug!("scan {:?} found {} networks", ticket, ranked.len());
        self.scan = ScanState::Complete(ranked);

        if *self.nav.current() != MenuId::Generated(Generator::NetworkScan) {
            return false;
        }
        self.items = synth::scan_rows(&self.scan);
        self.reformat(false);
        true
    }

    // Choices and actions

    fn apply_choice(&mut self, group: ChoiceGroup, value: i32) {
        match group {
            ChoiceGroup::Orientation => {
                let rotation = if value == 0 {
                    Rotation::Deg180
                } else {
                    Rotation::Deg0
                };
                if let Err(e) = self.hw.display().set_rotation(rotation) {
                    warn!("display rotation failed: {:?}", e);
                }
            }
        }
    }

    fn select_choice(&mut self, group: ChoiceGroup, value: i32) {
        if let Err(e) = self.hw.settings().set_int(group.key(), value) {
            warn!("failed to store {}: {}", group.key(), e);
        }
        self.apply_choice(group, value);
        self.reformat(true);
    }

    fn run_action(&mut self, action: Action, now_ms: u64) {
        info!("running {:?}", action);
        match action {
            Action::RescanSensors => self.rebuild(true, now_ms),
            Action::BlankDisplay => {
                self.sleep.force_sleep();
                self.blank();
            }
        }
    }

    // Editing

    fn set_contrast(&mut self, brightness: i32) {
        if let Err(e) = self.hw.display().set_contrast(effective_contrast(brightness)) {
            warn!("display contrast failed: {:?}", e);
        }
    }

    fn begin_edit(&mut self, item: &MenuItem) -> Option<crate::edit::EditKind> {
        let setting = item.setting()?;
        let fallback = match item {
            MenuItem::ThresholdBar { min, .. } => *min,
            _ => 0,
        };
        let current = EditValue::read(&setting, self.hw.settings(), &self.limits, fallback);
        let session = EditSession::open(item, current)?;
        let kind = session.kind();
        debug!("editing {:?} from {}", setting, session.value());

        if setting.previews_led() {
            self.hw.led().suppress_status(true);
        }
        self.edit = Some(session);

        if setting == Setting::LedBrightness {
            self.hw.led().preview_rainbow();
        }
        self.apply_live_value();
        self.render_edit();
        Some(kind)
    }

    /// Push the session's value to the hardware it previews on
    fn apply_live_value(&mut self) {
        let Some(session) = &self.edit else {
            return;
        };
        let setting = session.setting().clone();
        let units = session.value().units;

        match setting {
            Setting::DisplayBrightness => self.set_contrast(units),
            Setting::LedBrightness => self.hw.led().set_brightness(clamp_u8(units)),
            Setting::AlertHue(_) => self.hw.led().preview_color(hue_to_rgb(units)),
            Setting::SensorThreshold(_) => {}
        }
    }

    fn render_edit(&mut self) {
        let Some(kind) = self.edit.as_ref().map(EditSession::kind) else {
            return;
        };
        if kind.is_bar() {
            self.redraw();
        } else {
            self.reformat(true);
        }
    }

    fn commit_edit(&mut self) {
        let Some(session) = self.edit.take() else {
            return;
        };
        let value = session.value();
        let setting = session.setting();

        let result = match setting {
            Setting::DisplayBrightness => {
                self.set_contrast(value.units);
                self.hw
                    .settings()
                    .set_int(keys::DISPLAY_BRIGHTNESS, value.units)
            }
            Setting::LedBrightness => {
                self.hw.led().set_brightness(clamp_u8(value.units));
                self.hw.settings().set_int(keys::LED_BRIGHTNESS, value.units)
            }
            Setting::AlertHue(level) => {
                self.hw.settings().set_float(level.key(), value.as_fraction())
            }
            Setting::SensorThreshold(name) => {
                if self.hw.sensors().set_limit(name, value.units) {
                    self.limits.insert(name.clone(), value.units);
                } else {
                    warn!("sensor service rejected threshold {} for {}", value, name);
                }
                Ok(())
            }
        };

        match result {
            Ok(()) => info!("{:?} set to {}", setting, value),
            Err(e) => warn!("failed to persist {:?}: {}", setting, e),
        }

        if setting.previews_led() {
            self.hw.led().clear_preview();
            self.hw.led().suppress_status(false);
        }
        self.reformat(true);
    }
}
