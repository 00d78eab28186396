use eframe::egui::{
    self,
    Color32,
    RichText,
};
use egui_extras::{
    Column,
    TableBuilder,
};

use crate::{
    api::types::{
        Character,
        CharacterStatus,
        Episode,
        Location,
        Page,
        ResourceKind,
    },
    catalog::{
        Catalog,
        ListStatus,
        ListView,
        RelatedView,
    },
    core::FetchError,
};

const TABLE_HEADER_HEIGHT: f32 = 22.0;
const TABLE_ROW_HEIGHT: f32 = 20.0;
const LIST_TABLE_HEIGHT: f32 = 320.0;
const RELATED_TABLE_HEIGHT: f32 = 240.0;
const NAME_COLUMN_WIDTH: f32 = 220.0;
const SMALL_SPACING: f32 = 4.0;
const SECTION_SPACING: f32 = 12.0;

const ERROR_COLOR: Color32 = Color32::from_rgb(0xf7, 0x76, 0x8e);
const FAVORITE_COLOR: Color32 = Color32::from_rgb(0xe0, 0xaf, 0x68);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Characters,
    Locations,
    Episodes,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Characters, Tab::Locations, Tab::Episodes];

    /// List kind shown on this tab; the home page has none.
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Tab::Home => None,
            Tab::Characters => Some(ResourceKind::Character),
            Tab::Locations => Some(ResourceKind::Location),
            Tab::Episodes => Some(ResourceKind::Episode),
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().map_or("Home", |kind| kind.label())
    }
}

/// Something the user asked for while a page was drawn. Applied after drawing so the
/// catalog is only borrowed immutably while rendering.
#[derive(Debug, Clone)]
pub enum PageAction {
    NameInput(String),
    Status(Option<CharacterStatus>),
    PrevPage,
    NextPage,
    Refresh,
    SelectLocation(Location),
    SelectEpisode(Episode),
    ClearSelection,
    ToggleFavorite(u32),
}

pub fn home_page(ui: &mut egui::Ui, catalog: &Catalog) {
    ui.heading("Portal Finder");
    ui.label("Browse characters, locations and episodes across the multiverse.");
    ui.add_space(SECTION_SPACING);

    let favorites = catalog.favorites();
    if favorites.is_empty() {
        ui.label("No favorite episodes yet. Mark some with ★ on the Episodes tab.");
    } else {
        let ids: Vec<String> = favorites.ids().iter().map(|id| format!("#{id}")).collect();
        ui.label(format!("{} favorite episodes: {}", favorites.len(), ids.join(", ")));
    }
}

pub fn characters_page(ui: &mut egui::Ui, catalog: &Catalog, actions: &mut Vec<PageAction>) {
    let view = catalog.characters_view();

    ui.horizontal(|ui| {
        name_filter(ui, &view, actions);

        ui.label("Status:");
        let selected = view.status_filter.map_or("Any", |s| s.label());
        egui::ComboBox::from_id_salt("character_status_combo").selected_text(selected).show_ui(
            ui,
            |ui| {
                if ui.selectable_label(view.status_filter.is_none(), "Any").clicked() {
                    actions.push(PageAction::Status(None));
                }
                for status in CharacterStatus::ALL {
                    let is_selected = view.status_filter == Some(status);
                    if ui.selectable_label(is_selected, status.label()).clicked() {
                        actions.push(PageAction::Status(Some(status)));
                    }
                }
            },
        );
    });
    ui.add_space(SMALL_SPACING);

    list_body(ui, &view, actions, |ui, page, _| {
        ui.push_id("characters_table", |ui| {
            character_table(ui, &page.results, LIST_TABLE_HEIGHT);
        });
    });
}

pub fn locations_page(ui: &mut egui::Ui, catalog: &Catalog, actions: &mut Vec<PageAction>) {
    let view = catalog.locations_view();
    let related = catalog.residents();
    let selected_id = related.selected.map(|l| l.id);

    list_body(ui, &view, actions, |ui, page, actions| {
        ui.push_id("locations_table", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(LIST_TABLE_HEIGHT)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(NAME_COLUMN_WIDTH).resizable(true))
                .column(Column::auto().at_least(80.0))
                .column(Column::remainder())
                .header(TABLE_HEADER_HEIGHT, |mut header| {
                    header.col(|ui| {
                        ui.strong("Name");
                    });
                    header.col(|ui| {
                        ui.strong("Type");
                    });
                    header.col(|ui| {
                        ui.strong("Dimension");
                    });
                })
                .body(|mut body| {
                    body.rows(TABLE_ROW_HEIGHT, page.results.len(), |mut row| {
                        let location = &page.results[row.index()];
                        row.col(|ui| {
                            let is_selected = selected_id == Some(location.id);
                            if ui.selectable_label(is_selected, location.name.as_str()).clicked() {
                                actions.push(PageAction::SelectLocation(location.clone()));
                            }
                        });
                        row.col(|ui| {
                            ui.label(&location.kind);
                        });
                        row.col(|ui| {
                            ui.label(&location.dimension);
                        });
                    });
                });
        });
    });

    ui.add_space(SECTION_SPACING);
    let parent_name = related.selected.map(|l| l.name.as_str());
    related_section(ui, &related, "Residents", parent_name, actions);
}

pub fn episodes_page(ui: &mut egui::Ui, catalog: &Catalog, actions: &mut Vec<PageAction>) {
    let view = catalog.episodes_view();
    let related = catalog.episode_characters();
    let selected_id = related.selected.map(|e| e.id);

    ui.horizontal(|ui| {
        name_filter(ui, &view, actions);
    });
    ui.add_space(SMALL_SPACING);

    list_body(ui, &view, actions, |ui, page, actions| {
        ui.push_id("episodes_table", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(LIST_TABLE_HEIGHT)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::exact(24.0))
                .column(Column::auto().at_least(70.0))
                .column(Column::initial(NAME_COLUMN_WIDTH).resizable(true))
                .column(Column::remainder())
                .header(TABLE_HEADER_HEIGHT, |mut header| {
                    header.col(|ui| {
                        ui.strong("★");
                    });
                    header.col(|ui| {
                        ui.strong("Code");
                    });
                    header.col(|ui| {
                        ui.strong("Name");
                    });
                    header.col(|ui| {
                        ui.strong("Air date");
                    });
                })
                .body(|mut body| {
                    body.rows(TABLE_ROW_HEIGHT, page.results.len(), |mut row| {
                        let episode = &page.results[row.index()];
                        row.col(|ui| {
                            let star = if catalog.is_favorite(episode.id) {
                                RichText::new("★").color(FAVORITE_COLOR)
                            } else {
                                RichText::new("☆")
                            };
                            if ui.small_button(star).on_hover_text("Toggle favorite").clicked() {
                                actions.push(PageAction::ToggleFavorite(episode.id));
                            }
                        });
                        row.col(|ui| {
                            ui.label(&episode.episode);
                        });
                        row.col(|ui| {
                            let is_selected = selected_id == Some(episode.id);
                            if ui.selectable_label(is_selected, episode.name.as_str()).clicked() {
                                actions.push(PageAction::SelectEpisode(episode.clone()));
                            }
                        });
                        row.col(|ui| {
                            ui.label(&episode.air_date);
                        });
                    });
                });
        });
    });

    ui.add_space(SECTION_SPACING);
    let parent_name = related.selected.map(|e| e.name.as_str());
    related_section(ui, &related, "Characters", parent_name, actions);
}

fn name_filter<T>(ui: &mut egui::Ui, view: &ListView<'_, T>, actions: &mut Vec<PageAction>) {
    ui.label("Name:");
    let mut text = view.name_input.to_string();
    if ui.text_edit_singleline(&mut text).changed() {
        actions.push(PageAction::NameInput(text));
    }
}

/// Pagination bar plus either the rows, a spinner or the error that replaced them.
fn list_body<T>(
    ui: &mut egui::Ui,
    view: &ListView<'_, T>,
    actions: &mut Vec<PageAction>,
    rows: impl FnOnce(&mut egui::Ui, &Page<T>, &mut Vec<PageAction>),
) {
    ui.horizontal(|ui| {
        if ui.add_enabled(view.can_prev(), egui::Button::new("◀ Prev")).clicked() {
            actions.push(PageAction::PrevPage);
        }
        match view.total_pages() {
            Some(total) => ui.label(format!("Page {} / {}", view.page, total)),
            None => ui.label(format!("Page {}", view.page)),
        };
        if ui.add_enabled(view.can_next(), egui::Button::new("Next ▶")).clicked() {
            actions.push(PageAction::NextPage);
        }
        if ui.add_enabled(!view.is_fetching(), egui::Button::new("⟳ Refresh")).clicked() {
            actions.push(PageAction::Refresh);
        }
        if view.is_refreshing() {
            ui.spinner();
        }
    });

    match view.status() {
        ListStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }
        ListStatus::Failed(error) => error_label(ui, error),
        ListStatus::Ready(page) => {
            // A failed revalidation keeps the last rows on screen.
            if let Some(error) = view.error().filter(|_| !view.is_fetching()) {
                ui.label(RichText::new(format!("Refresh failed: {error}")).color(ERROR_COLOR));
            }
            if page.is_empty() {
                ui.label("Nothing found.");
            } else {
                rows(ui, page, actions);
            }
        }
    }
}

fn related_section<P>(
    ui: &mut egui::Ui,
    related: &RelatedView<'_, P, Character>,
    title: &str,
    parent_name: Option<&str>,
    actions: &mut Vec<PageAction>,
) {
    let Some(parent_name) = parent_name else {
        ui.label(format!("Select a row to see its {}.", title.to_lowercase()));
        return;
    };

    ui.horizontal(|ui| {
        ui.heading(format!("{} of {}", title, parent_name));
        if ui.small_button("✖").on_hover_text("Clear selection").clicked() {
            actions.push(PageAction::ClearSelection);
        }
    });

    if related.is_loading() {
        ui.spinner();
    } else if let Some(error) = related.error() {
        error_label(ui, error);
    } else if let Some(items) = related.items() {
        if items.is_empty() {
            ui.label("None.");
        } else {
            ui.push_id(title, |ui| {
                character_table(ui, items, RELATED_TABLE_HEIGHT);
            });
        }
    }
}

const CHARACTER_COLUMNS: [&str; 6] =
    ["Name", "Status", "Species", "Gender", "Origin", "Last known location"];

/// Row text for one character, in [`CHARACTER_COLUMNS`] order.
fn character_cells(character: &Character) -> [&str; 6] {
    [
        character.name.as_str(),
        character.status.label(),
        character.species.as_str(),
        character.gender.as_str(),
        character.origin.name.as_str(),
        character.location.name.as_str(),
    ]
}

fn character_table(ui: &mut egui::Ui, characters: &[Character], max_height: f32) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(max_height)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(NAME_COLUMN_WIDTH).resizable(true))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(TABLE_HEADER_HEIGHT, |mut header| {
            for title in CHARACTER_COLUMNS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            body.rows(TABLE_ROW_HEIGHT, characters.len(), |mut row| {
                for cell in character_cells(&characters[row.index()]) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

fn error_label(ui: &mut egui::Ui, error: &FetchError) {
    let text = if error.is_not_found() {
        "Nothing matches these filters.".to_string()
    } else {
        error.to_string()
    };
    ui.label(RichText::new(text).color(ERROR_COLOR));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::character_json;

    #[test]
    fn test_character_row_shows_origin() {
        let character: Character = serde_json::from_value(character_json(1)).unwrap();
        let cells = character_cells(&character);

        let origin = CHARACTER_COLUMNS.iter().position(|c| *c == "Origin").unwrap();
        assert_eq!(cells[origin], "Earth (C-137)");
        assert_eq!(cells[0], "Character 1");
        assert_eq!(cells[5], "Citadel of Ricks");
    }

    #[test]
    fn test_tabs_map_to_list_kinds() {
        assert_eq!(Tab::Home.kind(), None);
        assert_eq!(Tab::Locations.kind(), Some(ResourceKind::Location));
        assert_eq!(Tab::Episodes.label(), "Episodes");
    }
}
