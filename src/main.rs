use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use image::ImageReader;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod hn_client;
mod models;
mod search_state;
mod sort;

use crate::config::Config;
use crate::error::ClientError;
use crate::hn_client::{HackerNewsClient, SearchPage};
use crate::models::{format_age, HackerNewsItem};
use crate::search_state::{FetchTicket, SearchState};
use crate::sort::{SortKey, SortState};

// Function to load an image as an icon
fn load_icon(path: &str) -> Result<egui::IconData, Box<dyn std::error::Error>> {
    let img = ImageReader::open(path)?.decode()?;
    let rgba_image = img.into_rgba8();
    let (width, height) = rgba_image.dimensions();

    Ok(egui::IconData {
        rgba: rgba_image.into_raw(),
        width,
        height,
    })
}

const THEME_KEY: &str = "is_dark_mode";

// Read the saved theme preference, if the previous session stored one
fn load_theme_preference(storage: &dyn eframe::Storage) -> Option<bool> {
    storage.get_string(THEME_KEY)?.parse::<bool>().ok()
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> anyhow::Result<()> {
    let config = config::load_config()?;
    init_logging(&config);

    let client = HackerNewsClient::new(&config)?;

    let icon_data = match load_icon("logo/logo.png") {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::debug!("No window icon loaded: {}", e);
            None
        }
    };

    let mut options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("HN Search"),
        ..Default::default()
    };
    if let Some(icon) = icon_data {
        options.viewport.icon = Some(Arc::new(icon));
    }

    eframe::run_native(
        "HN Search",
        options,
        Box::new(move |cc| {
            let mut app = SearchApp::new(cc.egui_ctx.clone(), &config, client);

            // Restore the theme from the last session
            if let Some(is_dark_mode) = cc.storage.and_then(load_theme_preference) {
                app.set_dark_mode(is_dark_mode);
            }

            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}

struct AppTheme {
    background: Color32,
    card_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    separator: Color32,
    score_high: Color32,
    score_medium: Color32,
    score_low: Color32,
    button_background: Color32,
    button_foreground: Color32,
    button_active_background: Color32,
    button_hover_background: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 102, 0), // HN orange
            separator: Color32::from_rgb(60, 60, 60),
            score_high: Color32::from_rgb(76, 175, 80),
            score_medium: Color32::from_rgb(255, 193, 7),
            score_low: Color32::from_rgb(158, 158, 158),
            button_background: Color32::from_rgb(66, 66, 66),
            button_foreground: Color32::from_rgb(240, 240, 240),
            button_active_background: Color32::from_rgb(255, 102, 0),
            button_hover_background: Color32::from_rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            card_background: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            highlight: Color32::from_rgb(235, 92, 0),
            separator: Color32::from_rgb(200, 200, 200),
            score_high: Color32::from_rgb(30, 110, 40),
            score_medium: Color32::from_rgb(190, 130, 0),
            score_low: Color32::from_rgb(80, 80, 80),
            button_background: Color32::from_rgb(235, 235, 235),
            button_foreground: Color32::from_rgb(20, 20, 20),
            button_active_background: Color32::from_rgb(235, 92, 0),
            button_hover_background: Color32::from_rgb(210, 210, 210),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        // Set base colors
        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.extreme_bg_color = self.card_background;
        style.visuals.faint_bg_color = self.card_background;
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);
        style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.separator);

        // Set button styles
        style.visuals.widgets.inactive.bg_fill = self.button_background;
        style.visuals.widgets.inactive.weak_bg_fill = self.button_background;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.active.bg_fill = self.button_active_background;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.weak_bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);

        // Set selection color
        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);

        // Set various rounding amounts
        style.visuals.window_corner_radius = CornerRadius::same(8);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        ctx.set_style(style);
    }

    fn score_color(&self, points: u32) -> Color32 {
        if points >= 300 {
            self.score_high
        } else if points >= 100 {
            self.score_medium
        } else {
            self.score_low
        }
    }
}

/// Result of one page request, sent back from the worker thread.
struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<SearchPage, ClientError>,
}

struct SearchApp {
    hn_client: HackerNewsClient,
    ctx: egui::Context,
    state: SearchState,
    sort: SortState,
    // Text in the search box; only becomes the active query on submit
    search_term: String,
    heading: String,
    theme: AppTheme,
    is_dark_mode: bool,
    fetch_tx: Sender<FetchOutcome>,
    fetch_rx: Receiver<FetchOutcome>,
    // Pending actions to avoid borrow checker issues while rendering
    pending_dismiss: Option<String>,
    pending_sort: Option<SortKey>,
}

impl SearchApp {
    fn new(ctx: egui::Context, config: &Config, hn_client: HackerNewsClient) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();

        let mut app = Self {
            hn_client,
            ctx,
            state: SearchState::new(),
            sort: SortState::default(),
            search_term: config.default_query.clone(),
            heading: config.heading.clone(),
            theme: AppTheme::dark(),
            is_dark_mode: true,
            fetch_tx,
            fetch_rx,
            pending_dismiss: None,
            pending_sort: None,
        };

        // Initial search for the configured default term
        app.submit_search();
        app
    }

    fn set_dark_mode(&mut self, is_dark_mode: bool) {
        self.is_dark_mode = is_dark_mode;
        self.theme = if is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
    }

    fn toggle_theme(&mut self) {
        self.set_dark_mode(!self.is_dark_mode);
    }

    fn submit_search(&mut self) {
        let term = self.search_term.clone();
        if let Some(ticket) = self.state.submit_query(&term) {
            self.spawn_fetch(ticket);
        }
    }

    fn load_more(&mut self) {
        let ticket = self.state.load_more();
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let client = self.hn_client.clone();
        let tx = self.fetch_tx.clone();
        let ctx = self.ctx.clone();

        thread::spawn(move || {
            let result = client.search(&ticket.term, ticket.page);
            // The receiver is gone once the window has closed
            if tx.send(FetchOutcome { ticket, result }).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn check_fetch_results(&mut self) {
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            match outcome.result {
                Ok(page) => self.state.on_fetch_success(&outcome.ticket, page.hits, page.page),
                Err(e) => self.state.on_fetch_failure(&outcome.ticket, e),
            }
        }
    }

    fn open_link(&self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::error!("Failed to open URL {}: {}", url, e);
        }
    }

    fn render_search_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            // Search input, Enter submits just like the button
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.search_term)
                    .hint_text("Search stories...")
                    .desired_width(320.0),
            );
            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let search_btn = ui.add(
                egui::Button::new(RichText::new("Search").color(self.theme.button_foreground))
                    .corner_radius(CornerRadius::same(4))
                    .fill(self.theme.button_background),
            );

            // Keep focus in the box so the next term can be typed right away
            if entered || search_btn.clicked() {
                self.submit_search();
                input.request_focus();
            }

            // Theme toggle on the right side
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon = if self.is_dark_mode { "☀" } else { "🌙" };
                if ui.button(RichText::new(icon).size(18.0)).clicked() {
                    self.toggle_theme();
                }
            });
        });
    }

    fn sort_header(&mut self, ui: &mut Ui, label: &str, key: SortKey) {
        let is_active = self.sort.key == key;
        let text = format!("{} {}", label, self.sort.indicator(key));
        let color = if is_active { self.theme.highlight } else { self.theme.text };

        let btn = ui.add(egui::Button::new(RichText::new(text.trim_end()).color(color).strong()).frame(false));
        if btn.clicked() {
            self.pending_sort = Some(key);
        }
        if btn.hovered() {
            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
        }
    }

    fn render_stories_table(&mut self, ui: &mut Ui) {
        let stories = self.sort.apply(self.state.active_hits());
        let now = chrono::Utc::now();

        egui::Grid::new("stories_table")
            .num_columns(5)
            .striped(true)
            .spacing([16.0, 8.0])
            .min_col_width(60.0)
            .show(ui, |ui| {
                self.sort_header(ui, "Title", SortKey::Title);
                self.sort_header(ui, "Author", SortKey::Author);
                self.sort_header(ui, "Comments", SortKey::Comments);
                self.sort_header(ui, "Points", SortKey::Points);
                ui.label(RichText::new("Archive").color(self.theme.text).strong());
                ui.end_row();

                for story in &stories {
                    self.render_story_row(ui, story, now);
                    ui.end_row();
                }
            });
    }

    fn render_story_row(&mut self, ui: &mut Ui, story: &HackerNewsItem, now: chrono::DateTime<chrono::Utc>) {
        let title_label = ui.add(
            egui::Label::new(RichText::new(&story.title).color(self.theme.text).size(15.0))
                .sense(egui::Sense::click())
                .wrap(),
        );
        if title_label.clicked() {
            self.open_link(&story.link());
        }
        if title_label.hovered() {
            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
        }

        ui.vertical(|ui| {
            ui.label(RichText::new(&story.author).color(self.theme.text));
            let age = story.time_ago(now);
            if !age.is_empty() {
                ui.label(RichText::new(age).color(self.theme.secondary_text).size(12.0));
            }
        });

        ui.label(RichText::new(story.comment_count.to_string()).color(self.theme.secondary_text));
        ui.label(
            RichText::new(story.points.to_string())
                .color(self.theme.score_color(story.points))
                .strong(),
        );

        let dismiss_btn = ui.add(
            egui::Button::new(RichText::new("Dismiss").color(self.theme.button_foreground).size(13.0))
                .corner_radius(CornerRadius::same(4))
                .fill(self.theme.button_background),
        );
        if dismiss_btn.clicked() {
            self.pending_dismiss = Some(story.id.clone());
        }
    }

    fn render_status_line(&self, ui: &mut Ui) {
        let Some(result) = self.state.active_result() else {
            return;
        };
        let age = format_age(chrono::Utc::now().signed_duration_since(result.fetched_at));
        ui.label(
            RichText::new(format!(
                "{} stories for '{}' · {} page(s) loaded · updated {}",
                result.hits.len(),
                self.state.search_key(),
                result.page.saturating_add(1),
                age
            ))
            .color(self.theme.secondary_text)
            .size(13.0),
        );
    }

    fn render_more_button(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            if self.state.is_loading() {
                ui.add(egui::Spinner::new().size(28.0));
            } else {
                let more_btn = ui.add(
                    egui::Button::new(RichText::new("More...").color(self.theme.button_foreground))
                        .min_size(egui::Vec2::new(120.0, 28.0))
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_background),
                );
                if more_btn.clicked() {
                    self.load_more();
                }
            }
        });
    }
}

impl eframe::App for SearchApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(THEME_KEY, self.is_dark_mode.to_string());
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.teardown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply our custom theme
        self.theme.apply_to_ctx(ctx);

        // Merge any pages that arrived since the last frame
        self.check_fetch_results();

        // Process any pending actions
        if let Some(id) = self.pending_dismiss.take() {
            self.state.dismiss(&id);
        }
        if let Some(key) = self.pending_sort.take() {
            self.sort.select(key);
        }

        // Set up main layout
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(RichText::new(&self.heading).color(self.theme.highlight).strong());
            ui.add_space(8.0);

            self.render_search_bar(ui);
            ui.add_space(6.0);
            self.render_status_line(ui);
            ui.separator();

            ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                // A failed fetch replaces the table until the next success
                if self.state.error().is_some() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(
                            RichText::new("Something Went Wrong!!")
                                .color(self.theme.secondary_text)
                                .size(18.0)
                                .italics(),
                        );
                        ui.add_space(20.0);
                    });
                } else {
                    self.render_stories_table(ui);
                }

                // Load-more button, or a spinner while a page is in flight
                ui.add_space(12.0);
                self.render_more_button(ui);
                ui.add_space(12.0);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage(HashMap<String, String>);

    impl eframe::Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.0.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn theme_preference_round_trips_through_storage() {
        let mut storage = MemoryStorage::default();
        assert_eq!(load_theme_preference(&storage), None);

        eframe::Storage::set_string(&mut storage, THEME_KEY, false.to_string());
        assert_eq!(load_theme_preference(&storage), Some(false));
    }

    #[test]
    fn garbage_theme_value_is_ignored() {
        let mut storage = MemoryStorage::default();
        eframe::Storage::set_string(&mut storage, THEME_KEY, "dim".to_string());
        assert_eq!(load_theme_preference(&storage), None);
    }
}
