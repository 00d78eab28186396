use std::time::{
    Duration,
    Instant,
};

use eframe::egui::{
    self,
    containers,
    RichText,
};
use tracing::{
    error,
    info,
};

use super::pages::{
    self,
    PageAction,
    Tab,
};
use crate::{
    api::types::ResourceKind,
    catalog::Catalog,
};

const BUSY_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct PortalFinderApp {
    catalog: Catalog,
    tab: Tab,
    notice: Option<String>,
}

impl PortalFinderApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, catalog: Catalog) -> Self {
        Self { catalog, tab: Tab::default(), notice: None }
    }

    fn switch_tab(&mut self, tab: Tab, now: Instant) {
        if tab == self.tab {
            return;
        }
        if let Some(kind) = self.tab.kind() {
            self.catalog.leave(kind);
        }
        if let Some(kind) = tab.kind() {
            self.catalog.visit(kind, now);
        }
        self.tab = tab;
    }

    fn handle_action(&mut self, kind: ResourceKind, action: PageAction, now: Instant) {
        match action {
            PageAction::NameInput(text) => self.catalog.set_name_input(kind, &text, now),
            PageAction::Status(status) => self.catalog.set_status(kind, status, now),
            PageAction::PrevPage => {
                self.catalog.prev_page(kind, now);
            }
            PageAction::NextPage => {
                self.catalog.next_page(kind, now);
            }
            PageAction::Refresh => self.catalog.refresh(kind, now),
            PageAction::SelectLocation(location) => self.catalog.select_location(&location),
            PageAction::SelectEpisode(episode) => self.catalog.select_episode(&episode),
            PageAction::ClearSelection => self.catalog.clear_selection(kind),
            PageAction::ToggleFavorite(id) => match self.catalog.toggle_favorite(id) {
                Ok(added) => {
                    info!(episode = id, added, "favorite toggled");
                    self.notice = None;
                }
                Err(e) => {
                    error!(episode = id, "Failed to save favorites: {}", e);
                    self.notice = Some(format!("Could not save favorites: {e}"));
                }
            },
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.catalog.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT_INTERVAL);
        } else if let Some(deadline) = self.catalog.next_wakeup() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

impl eframe::App for PortalFinderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.catalog.poll(now);

        let mut next_tab = self.tab;
        let busy = self.catalog.is_busy();
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);
                ui.separator();
                for tab in Tab::ALL {
                    ui.selectable_value(&mut next_tab, tab, tab.label());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if busy {
                        ui.spinner();
                    }
                });
            });
        });
        self.switch_tab(next_tab, now);

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(notice) = &self.notice {
                ui.label(RichText::new(notice).color(egui::Color32::LIGHT_RED));
            }
            match self.tab {
                Tab::Home => pages::home_page(ui, &self.catalog),
                Tab::Characters => pages::characters_page(ui, &self.catalog, &mut actions),
                Tab::Locations => pages::locations_page(ui, &self.catalog, &mut actions),
                Tab::Episodes => pages::episodes_page(ui, &self.catalog, &mut actions),
            }
        });

        if let Some(kind) = self.tab.kind() {
            for action in actions {
                self.handle_action(kind, action, now);
            }
        }

        self.schedule_repaint(ctx, now);
    }
}
