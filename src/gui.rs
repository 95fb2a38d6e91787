use crate::statics;
use crate::{
    ChangeReport, ConfigError, DebugInfo, EditSession, LoadedConfig, PropertyRegistry,
    SearchResults, Settings,
};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::{Path, PathBuf};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 750.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(EditorApp::new()))
        }),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CloseChoice {
    SaveAndClose,
    Discard,
    Cancel,
}

/// The main application state and GUI logic.
/// Owns the registry, the loaded config and the edit session; every edit goes
/// through the session so the dirty flag stays accurate.
struct EditorApp {
    registry: PropertyRegistry,
    settings: Settings,
    settings_path: Option<PathBuf>,
    config_path: PathBuf,
    config: Option<LoadedConfig>,
    session: EditSession,
    selected_category: usize,

    search_query: String,
    search: SearchResults,
    scroll_to_current: bool,

    status: String,
    last_error: Option<String>,
    warning: Option<String>,
    missing_file: bool,

    changes_open: bool,
    about_open: bool,
    close_prompt_open: bool,
    close_confirmed: bool,
    theme_dark: bool,
}

impl EditorApp {
    fn new() -> Self {
        let settings_path = Settings::default_location();
        let settings = Settings::load_or_default(settings_path.as_deref());
        let config_path = settings.last_known_path();

        let mut app = Self {
            registry: PropertyRegistry::builtin(),
            settings,
            settings_path,
            config_path,
            config: None,
            session: EditSession::new(),
            selected_category: 0,
            search_query: String::new(),
            search: SearchResults::default(),
            scroll_to_current: false,
            status: String::new(),
            last_error: None,
            warning: None,
            missing_file: false,
            changes_open: false,
            about_open: false,
            close_prompt_open: false,
            close_confirmed: false,
            theme_dark: true,
        };
        app.load_configuration();
        app
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    fn load_configuration(&mut self) {
        self.open_path(self.config_path.clone());
    }

    /// Load `path` and make it the current file. On failure the previously
    /// loaded config, session and path stay as they were.
    fn open_path(&mut self, path: PathBuf) {
        match self.session.open(&self.registry, &path) {
            Ok(config) => {
                self.status = format!(
                    "Loaded {} • {} properties",
                    Self::file_name(&path),
                    config.property_count()
                );
                if config.repaired {
                    self.status.push_str(" (XML was repaired)");
                }
                self.config = Some(config);
                self.config_path = path;
                self.missing_file = false;
                self.last_error = None;
                self.warning = None;
                self.remember_path();
                self.run_search();
            }
            Err(e) => {
                // Nothing loaded yet: show the path that was tried.
                if self.config.is_none() {
                    self.config_path = path;
                }
                self.missing_file = matches!(e, ConfigError::FileNotFound(_));
                self.status = if self.missing_file {
                    "Error: Configuration file not found".to_string()
                } else {
                    format!("Error: {}", e.kind())
                };
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn browse_for_file(&mut self) {
        let mut dlg = rfd::FileDialog::new()
            .set_title("Select serverconfig.xml")
            .add_filter("XML Files", &["xml"]);
        if let Some(dir) = self.config_path.parent().filter(|d| d.is_dir()) {
            dlg = dlg.set_directory(dir);
        } else if let Some(home) = dirs::home_dir() {
            dlg = dlg.set_directory(home);
        }

        let Some(path) = dlg.pick_file() else {
            return;
        };
        self.open_path(path);
    }

    fn remember_path(&mut self) {
        if self.settings.config_path.as_ref() == Some(&self.config_path) {
            return;
        }
        self.settings.config_path = Some(self.config_path.clone());
        self.save_settings();
    }

    fn save_settings(&mut self) {
        let Some(path) = self.settings_path.as_deref() else {
            return;
        };
        if let Err(e) = self.settings.save_to(path) {
            self.last_error = Some(format!("{}: {e:#}", statics::EN_ERR_SETTINGS));
        }
    }

    /// Returns `true` when the file was written.
    fn save_configuration(&mut self) -> bool {
        let Some(config) = self.config.as_mut() else {
            self.last_error = Some(ConfigError::NoDocument.to_string());
            return false;
        };

        let path = config.source_path.clone();
        match self.session.save(config, &path) {
            Ok(outcome) => {
                self.status = format!(
                    "Saved successfully at {}",
                    chrono::Local::now().format("%H:%M:%S")
                );
                self.warning = outcome.backup_warning;
                self.last_error = None;
                true
            }
            Err(e) => {
                self.status = "Error: Save failed".to_string();
                self.last_error = Some(format!("{}: {e}", e.kind()));
                false
            }
        }
    }

    fn run_search(&mut self) {
        self.search = self.session.search(&self.registry, &self.search_query);
        self.focus_current_hit();
    }

    fn clear_search(&mut self) {
        self.search_query.clear();
        self.search = SearchResults::default();
    }

    fn focus_current_hit(&mut self) {
        let Some(hit) = self.search.current() else {
            return;
        };
        if let Some(idx) = self.registry.categories().position(|c| c == hit.category) {
            self.selected_category = idx;
        }
        self.scroll_to_current = true;
    }

    fn copy_debug_info(&mut self, ctx: &egui::Context) {
        let count = self.config.as_ref().map_or(0, LoadedConfig::property_count);
        ctx.copy_text(DebugInfo::collect(&self.config_path, count).to_text());
        self.status = statics::EN_DEBUG_COPIED.to_string();
    }

    fn finish_close(&mut self, ctx: &egui::Context) {
        self.close_confirmed = true;
        self.close_prompt_open = false;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn render_search_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_SEARCH);
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.search_query)
                    .hint_text(statics::EN_HINT_SEARCH)
                    .desired_width(420.0),
            );
            if resp.changed() {
                self.run_search();
            }
            if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.search.next();
                self.focus_current_hit();
            }

            let has_hits = !self.search.is_empty();
            if ui
                .add_enabled(has_hits, egui::Button::new(statics::EN_BTN_PREV))
                .clicked()
            {
                self.search.previous();
                self.focus_current_hit();
            }
            if ui
                .add_enabled(has_hits, egui::Button::new(statics::EN_BTN_NEXT))
                .clicked()
            {
                self.search.next();
                self.focus_current_hit();
            }
            if ui.button(statics::EN_BTN_CLEAR).clicked() {
                self.clear_search();
            }
            ui.label(self.search.counter_label(statics::EN_SEARCH_NO_RESULTS));
        });
    }

    fn render_properties(&mut self, ui: &mut egui::Ui) {
        let categories: Vec<String> = self.registry.categories().map(str::to_owned).collect();

        ui.horizontal_wrapped(|ui| {
            for (idx, category) in categories.iter().enumerate() {
                if ui
                    .selectable_label(self.selected_category == idx, category)
                    .clicked()
                {
                    self.selected_category = idx;
                }
            }
        });
        ui.separator();

        let Some(category) = categories.get(self.selected_category) else {
            return;
        };
        let names = self.registry.properties_in(category).to_vec();
        let scroll = std::mem::take(&mut self.scroll_to_current);

        egui::ScrollArea::vertical()
            .id_salt(category.as_str())
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.columns(2, |columns| {
                    // Even rows on the left, odd rows on the right.
                    for (idx, name) in names.iter().enumerate() {
                        let ui = &mut columns[idx % 2];
                        let description = self
                            .registry
                            .effective_description(name, self.session.description_overrides())
                            .map(str::to_owned);
                        let in_file = self
                            .config
                            .as_ref()
                            .is_some_and(|c| c.document.contains(name));
                        let highlighted = self.search.is_current(name);

                        let Some(value) = self.session.value_mut(name) else {
                            continue;
                        };
                        let changed = property_row(
                            ui,
                            name,
                            description.as_deref(),
                            value,
                            in_file,
                            highlighted,
                            scroll,
                        );
                        if changed {
                            self.session.mark_dirty();
                        }
                    }
                });
            });
    }

    fn render_changes_window(&mut self, ctx: &egui::Context) {
        let mut open = self.changes_open;
        let report = ChangeReport::build(&self.session, &self.config_path);

        egui::Window::new(statics::EN_WINDOW_CHANGES)
            .collapsible(false)
            .open(&mut open)
            .default_width(640.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} {}",
                        statics::EN_LABEL_CHANGES_COUNT,
                        report.modified_count()
                    ));
                    if ui.button(statics::EN_BTN_COPY_REPORT).clicked() {
                        match report.to_xml() {
                            Ok(xml) => ctx.copy_text(xml),
                            Err(e) => self.last_error = Some(e.to_string()),
                        }
                    }
                });
                ui.separator();

                if report.modified_count() == 0 {
                    ui.label(statics::EN_CHANGES_NONE);
                    return;
                }

                let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
                ui.push_id("changes_table", |ui| {
                    TableBuilder::new(ui)
                        .striped(true)
                        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                        .column(Column::initial(200.0).resizable(true))
                        .column(Column::initial(160.0).resizable(true))
                        .column(Column::initial(160.0).resizable(true))
                        .column(Column::remainder())
                        .header(row_h, |#[allow(unused_mut)] mut header| {
                            for title in [
                                statics::EN_COL_PROPERTY,
                                statics::EN_COL_ORIGINAL,
                                statics::EN_COL_CURRENT,
                                statics::EN_COL_STATUS,
                            ] {
                                header.col(|ui| {
                                    ui.strong(title);
                                });
                            }
                        })
                        .body(|#[allow(unused_mut)] mut body| {
                            for entry in report.modified() {
                                body.row(row_h, |#[allow(unused_mut)] mut row| {
                                    row.col(|ui| {
                                        ui.label(&entry.name);
                                    });
                                    row.col(|ui| {
                                        ui.label(&entry.original);
                                    });
                                    row.col(|ui| {
                                        ui.label(&entry.current);
                                    });
                                    row.col(|ui| {
                                        ui.label(entry.status());
                                    });
                                });
                            }
                        });
                });
            });

        self.changes_open = open;
    }
}

/// One labelled text field. Returns `true` when the text changed.
fn property_row(
    ui: &mut egui::Ui,
    name: &str,
    description: Option<&str>,
    value: &mut String,
    in_file: bool,
    highlighted: bool,
    scroll: bool,
) -> bool {
    let fill = if highlighted {
        ui.visuals().selection.bg_fill.gamma_multiply(0.5)
    } else {
        egui::Color32::TRANSPARENT
    };

    let frame = egui::Frame::new()
        .fill(fill)
        .inner_margin(egui::Margin::same(4))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                if let Some(text) = description {
                    ui.label(statics::EN_HELP_GLYPH).on_hover_text(text);
                }
                let label = if in_file {
                    egui::RichText::new(name)
                } else {
                    egui::RichText::new(format!("{name} {}", statics::EN_NOT_IN_FILE)).weak()
                };
                ui.add_sized(
                    [220.0, ui.spacing().interact_size.y],
                    egui::Label::new(label).truncate(),
                );
                ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY))
                    .changed()
            })
            .inner
        });

    if highlighted && scroll {
        frame.response.scroll_to_me(Some(egui::Align::Center));
    }
    frame.inner
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut do_save = false;
        let mut do_reload = false;
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::S) {
                do_save = true;
            }
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::R) {
                do_reload = true;
            }
        });
        if do_save {
            self.save_configuration();
        }
        if do_reload {
            self.load_configuration();
        }

        // Unsaved edits are never dropped without asking.
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.session.is_dirty() && !self.close_confirmed {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.close_prompt_open = true;
            } else {
                self.save_settings();
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN).clicked() {
                    self.browse_for_file();
                }

                let loaded = self.config.is_some();
                if ui
                    .add_enabled(loaded, egui::Button::new(statics::EN_BTN_SAVE))
                    .clicked()
                {
                    self.save_configuration();
                }
                let reload = ui.add_enabled(loaded, egui::Button::new(statics::EN_BTN_RELOAD));
                let reload = if self.session.is_dirty() {
                    reload.on_hover_text(statics::EN_RELOAD_DISCARDS)
                } else {
                    reload
                };
                if reload.clicked() {
                    self.load_configuration();
                }
                if ui
                    .add_enabled(loaded, egui::Button::new(statics::EN_BTN_CHANGES))
                    .clicked()
                {
                    self.changes_open = true;
                }

                if ui.button(statics::EN_BTN_DEBUG_INFO).clicked() {
                    self.copy_debug_info(ctx);
                }
                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
                if self.session.is_dirty() {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, statics::EN_BADGE_DIRTY);
                }
            });
            self.render_search_bar(ui);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.config_path.display().to_string());
                if let Some(warning) = &self.warning {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, warning);
                }
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.config.is_none() {
                ui.heading(statics::EN_APP_TITLE);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
                if self.missing_file {
                    ui.label(self.config_path.display().to_string());
                }
                if ui.button(statics::EN_BTN_BROWSE).clicked() {
                    self.browse_for_file();
                }
                return;
            }
            self.render_properties(ui);
        });

        if self.changes_open {
            self.render_changes_window(ctx);
        }

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_SHORTCUTS);
                    ui.label(statics::EN_ABOUT_SHORTCUT_SAVE);
                    ui.label(statics::EN_ABOUT_SHORTCUT_RELOAD);
                });
            self.about_open = open;
        }

        if self.close_prompt_open {
            let mut choice = None;
            egui::Window::new(statics::EN_WINDOW_UNSAVED)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(statics::EN_UNSAVED_PROMPT);
                    ui.horizontal(|ui| {
                        if ui.button(statics::EN_BTN_SAVE_AND_CLOSE).clicked() {
                            choice = Some(CloseChoice::SaveAndClose);
                        }
                        if ui.button(statics::EN_BTN_DISCARD).clicked() {
                            choice = Some(CloseChoice::Discard);
                        }
                        if ui.button(statics::EN_BTN_CANCEL).clicked() {
                            choice = Some(CloseChoice::Cancel);
                        }
                    });
                });

            match choice {
                Some(CloseChoice::SaveAndClose) => {
                    // A failed save keeps the window open with the error shown.
                    if self.save_configuration() {
                        self.finish_close(ctx);
                    } else {
                        self.close_prompt_open = false;
                    }
                }
                Some(CloseChoice::Discard) => self.finish_close(ctx),
                Some(CloseChoice::Cancel) => self.close_prompt_open = false,
                None => {}
            }
        }
    }
}
