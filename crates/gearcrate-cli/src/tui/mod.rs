//! Interactive TUI (Terminal User Interface) for GearCrate.
//!
//! Provides the four views of the application:
//! - Inventory with sorting and category filter
//! - Debounced as-you-type search over the whole catalog
//! - Gear set completion with filters and favorites
//! - Statistics

use crate::app::App;
use crate::commands::inventory::sort_key_label;
use crate::commands::sets::load_variants;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gearcrate_core::gear_sets::{CompletionFilter, FilterCounts, SetVariant};
use gearcrate_core::state::{Message, View};
use gearcrate_core::types::FAVORITES_CATEGORY;
use gearcrate_core::{CatalogItem, CatalogStats, Config, Language, SearchDebouncer};
use ratatui::{prelude::*, widgets::*};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Limits offered when cycling with Ctrl+L
const LIMIT_STEPS: [usize; 4] = [25, 50, 100, 250];

/// Longest wait for input before redrawing
const TICK: Duration = Duration::from_millis(100);

/// TUI application state.
struct TuiApp {
    /// The main application
    app: App,

    /// Current search query string
    query_string: String,

    /// Holds back searches while typing
    debouncer: SearchDebouncer,

    /// Names of the displayed search results, in rank order
    results: Vec<String>,

    /// Number of matches before truncation; `None` if no search ran
    total: Option<usize>,

    /// Current inventory listing
    inventory: Vec<CatalogItem>,

    /// Known set names
    set_names: Vec<String>,

    /// Variants of the selected set
    variants: Vec<SetVariant>,

    /// Latest statistics
    stats: Option<CatalogStats>,

    /// Selected row in the active list
    selected: usize,

    /// Vertical scroll offset
    scroll_offset: usize,

    /// Whether we should quit
    should_quit: bool,

    /// Last search time
    last_search_time: Duration,

    /// Status message
    status_message: Option<String>,
}

impl TuiApp {
    fn new(app: App) -> Self {
        let debouncer = SearchDebouncer::new(app.config.ui.debounce());
        TuiApp {
            app,
            query_string: String::new(),
            debouncer,
            results: Vec::new(),
            total: None,
            inventory: Vec::new(),
            set_names: Vec::new(),
            variants: Vec::new(),
            stats: None,
            selected: 0,
            scroll_offset: 0,
            should_quit: false,
            last_search_time: Duration::ZERO,
            status_message: None,
        }
    }

    fn view(&self) -> View {
        self.app.prefs().view
    }

    /// Show an error from a backend call without leaving the UI.
    fn report<T>(&mut self, key: &str, result: anyhow::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Action failed");
                self.status_message = Some(format!("{}: {}", self.app.tr(key), e));
                None
            }
        }
    }

    fn dispatch(&mut self, message: Message) {
        let result = self.app.dispatch(message);
        if let Some(notice) = self.report("errorGeneric", result).flatten() {
            self.status_message = Some(notice);
        }
    }

    /// Refetch the data shown by the active view.
    fn refresh(&mut self) {
        match self.view() {
            View::Inventory => self.load_inventory(),
            View::Search => self.search_now(),
            View::GearSets => self.load_sets(),
            View::Stats => {
                let result = self.app.api.get_stats().map_err(Into::into);
                self.stats = self.report("errorGeneric", result);
            }
        }
        self.clamp_selection();
    }

    fn load_inventory(&mut self) {
        let query = self.app.prefs().inventory_query();
        let result = self.app.api.inventory(&query).map_err(Into::into);
        match self.report("inventoryLoadError", result) {
            Some(items) => self.inventory = items,
            None => self.inventory.clear(),
        }
    }

    fn load_sets(&mut self) {
        let result = self.app.api.get_all_gear_sets().map_err(Into::into);
        self.set_names = self
            .report("errorGeneric", result)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.set_name)
            .collect();

        let selected = self.app.prefs().selected_set.clone();
        let set_name = if self.set_names.contains(&selected) {
            Some(selected)
        } else {
            self.set_names.first().cloned()
        };

        self.variants = match set_name {
            Some(name) => {
                let result = load_variants(&self.app, Some(name.as_str()));
                self.report("errorGeneric", result).unwrap_or_default()
            }
            None => Vec::new(),
        };
    }

    /// Variants passing the current completion filter
    fn visible_variants(&self) -> Vec<&SetVariant> {
        let prefs = self.app.prefs();
        prefs
            .gear_sets_filter
            .apply(&self.variants, &prefs.favorite_sets)
    }

    fn list_len(&self) -> usize {
        match self.view() {
            View::Inventory => self.inventory.len(),
            View::Search => self.results.len(),
            View::GearSets => self.visible_variants().len(),
            View::Stats => 0,
        }
    }

    /// Name of the item under the cursor
    fn selected_item(&self) -> Option<String> {
        match self.view() {
            View::Inventory => self.inventory.get(self.selected).map(|i| i.name.clone()),
            View::Search => self.results.get(self.selected).cloned(),
            _ => None,
        }
    }

    /// Search the snapshot with the current query right away.
    fn search_now(&mut self) {
        self.debouncer.cancel();
        let query = self.query_string.clone();
        self.run_search(&query);
    }

    fn run_search(&mut self, query: &str) {
        let start = Instant::now();
        let limit = self.app.prefs().search_limit;

        match self.app.catalog.search(query, limit) {
            Some(page) => {
                self.results = page.items.iter().map(|i| i.name.clone()).collect();
                self.total = Some(page.total);
                self.status_message = None;
            }
            None => {
                self.results.clear();
                self.total = None;
                if !query.trim().is_empty() {
                    self.status_message = Some(self.app.tr("searchTooShort"));
                }
            }
        }
        self.last_search_time = start.elapsed();
        debug!(query, results = self.results.len(), "Search finished");

        self.selected = 0;
        self.scroll_offset = 0;
    }

    /// Handle input character.
    fn on_char(&mut self, c: char) {
        self.query_string.push(c);
        self.debouncer.input(self.query_string.clone(), Instant::now());
    }

    /// Handle backspace.
    fn on_backspace(&mut self) {
        self.query_string.pop();
        self.debouncer.input(self.query_string.clone(), Instant::now());
    }

    /// Run the pending search once typing has paused.
    fn tick(&mut self) {
        if let Some(query) = self.debouncer.poll(Instant::now()) {
            self.run_search(&query);
        }
    }

    fn switch_view(&mut self, view: View) {
        self.dispatch(Message::SwitchView(view));
        self.selected = 0;
        self.scroll_offset = 0;
        self.status_message = None;
        self.refresh();
    }

    /// Change the count of the selected item by `delta`.
    fn adjust_selected(&mut self, delta: i64) {
        let Some(name) = self.selected_item() else {
            return;
        };
        let result = self.app.adjust_count(&name, delta);
        if let Some(count) = self.report("errorUpdating", result) {
            self.status_message = Some(
                self.app
                    .t("countUpdated", &[("name", &name), ("count", &count.to_string())]),
            );
            if self.view() == View::Inventory {
                self.load_inventory();
                self.clamp_selection();
            }
        }
    }

    fn toggle_selected_favorite(&mut self) {
        let Some(name) = self.selected_item() else {
            return;
        };
        let is_favorite = self.app.catalog.get(&name).is_some_and(|i| i.is_favorite);
        let result = self.app.set_favorite(&name, !is_favorite);
        if self.report("errorGeneric", result).is_some() {
            let key = if is_favorite { "unfavoriteItem" } else { "favoriteItem" };
            self.status_message = Some(format!("{}: {}", self.app.tr(key), name));
            if self.view() == View::Inventory {
                self.load_inventory();
                self.clamp_selection();
            }
        }
    }

    /// Step to the next search limit.
    fn cycle_limit(&mut self) {
        let current = self.app.prefs().search_limit.get();
        let next = LIMIT_STEPS
            .iter()
            .copied()
            .find(|&step| step > current)
            .unwrap_or(LIMIT_STEPS[0]);
        self.dispatch(Message::SetSearchLimit(next));
        self.rerun_search();
    }

    fn reset_limit(&mut self) {
        self.dispatch(Message::ResetSearchLimit);
        self.rerun_search();
    }

    /// Re-run the search for a new limit, keeping the notice visible.
    fn rerun_search(&mut self) {
        let notice = self.status_message.take();
        self.search_now();
        self.status_message = notice;
    }

    fn cycle_sort(&mut self) {
        use gearcrate_core::SortKey;
        let next = match self.app.prefs().sort_by {
            SortKey::Name => SortKey::Count,
            SortKey::Count => SortKey::Date,
            SortKey::Date => SortKey::Name,
        };
        self.dispatch(Message::SetSort(next));
        self.load_inventory();
    }

    fn toggle_order(&mut self) {
        self.dispatch(Message::ToggleSortOrder);
        self.load_inventory();
    }

    fn cycle_category(&mut self) {
        let mut options: Vec<Option<String>> = vec![None, Some(FAVORITES_CATEGORY.to_string())];
        let result = self.app.api.get_categories().map_err(Into::into);
        options.extend(
            self.report("errorGeneric", result)
                .unwrap_or_default()
                .into_iter()
                .map(Some),
        );

        let current = self.app.prefs().category_filter.clone();
        let idx = options.iter().position(|o| *o == current).unwrap_or(0);
        let next = options[(idx + 1) % options.len()].clone();

        self.dispatch(Message::SetCategory(next));
        self.selected = 0;
        self.scroll_offset = 0;
        self.load_inventory();
    }

    fn step_set(&mut self, forward: bool) {
        if self.set_names.is_empty() {
            return;
        }
        let current = &self.app.prefs().selected_set;
        let idx = self.set_names.iter().position(|s| s == current).unwrap_or(0);
        let len = self.set_names.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };

        self.dispatch(Message::SelectSet(self.set_names[next].clone()));
        self.selected = 0;
        self.scroll_offset = 0;
        self.load_sets();
    }

    fn cycle_set_filter(&mut self) {
        let current = self.app.prefs().gear_sets_filter;
        let idx = CompletionFilter::ALL
            .iter()
            .position(|f| *f == current)
            .unwrap_or(0);
        let next = CompletionFilter::ALL[(idx + 1) % CompletionFilter::ALL.len()];
        self.dispatch(Message::SetGearSetsFilter(next));
        self.clamp_selection();
    }

    fn toggle_favorite_set(&mut self) {
        let Some((set_name, variant)) = self
            .visible_variants()
            .get(self.selected)
            .map(|v| (v.set_name.clone(), v.variant.clone()))
        else {
            return;
        };
        self.dispatch(Message::ToggleFavoriteSet { set_name, variant });
        self.clamp_selection();
    }

    fn cycle_language(&mut self) {
        let current = self.app.translator.language();
        let idx = Language::ALL.iter().position(|l| *l == current).unwrap_or(0);
        let next = Language::ALL[(idx + 1) % Language::ALL.len()];
        let result = self.app.set_language(next);
        if self.report("errorGeneric", result).is_some() {
            self.status_message = Some(format!("{} {}", self.app.tr("language"), next.native_name()));
        }
    }

    /// Move selection up.
    fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down.
    fn select_next(&mut self) {
        if self.selected + 1 < self.list_len() {
            self.selected += 1;
        }
    }

    /// Page up.
    fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    /// Page down.
    fn page_down(&mut self, page_size: usize) {
        self.selected = (self.selected + page_size).min(self.list_len().saturating_sub(1));
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.list_len().saturating_sub(1));
    }

    /// Handle one key press.
    fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let view = self.view();

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Tab => self.switch_view(view.next()),
            KeyCode::F(2) => self.cycle_language(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::PageUp => self.page_up(10),
            KeyCode::PageDown => self.page_down(10),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.list_len().saturating_sub(1),
            KeyCode::Right if view == View::GearSets => self.step_set(true),
            KeyCode::Left if view == View::GearSets => self.step_set(false),
            KeyCode::Right => self.adjust_selected(1),
            KeyCode::Left => self.adjust_selected(-1),
            KeyCode::Char(c) if view == View::Search => match c {
                'l' if ctrl => self.cycle_limit(),
                'r' if ctrl => self.reset_limit(),
                'f' if ctrl => self.toggle_selected_favorite(),
                _ if !ctrl => self.on_char(c),
                _ => {}
            },
            KeyCode::Backspace if view == View::Search => self.on_backspace(),
            KeyCode::Enter if view == View::Search => self.search_now(),
            KeyCode::Char(c) => match (view, c) {
                (View::Inventory, '+') => self.adjust_selected(1),
                (View::Inventory, '-') => self.adjust_selected(-1),
                (View::Inventory, 's') => self.cycle_sort(),
                (View::Inventory, 'o') => self.toggle_order(),
                (View::Inventory, 'c') => self.cycle_category(),
                (View::Inventory, 'f') => self.toggle_selected_favorite(),
                (View::GearSets, 'f') => self.cycle_set_filter(),
                (View::GearSets, ' ') | (View::GearSets, '*') => self.toggle_favorite_set(),
                (_, 'r') => {
                    let result = self.app.reload();
                    self.report("errorGeneric", result);
                    self.refresh();
                }
                _ => {}
            },
            _ => {}
        }
    }
}

/// Run the TUI application.
pub fn run(config: Config) -> anyhow::Result<()> {
    let app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut tui_app = TuiApp::new(app);
    tui_app.refresh();

    // Main loop
    let result = run_loop(&mut terminal, &mut tui_app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Main event loop.
fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut TuiApp) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = app
            .debouncer
            .remaining(Instant::now())
            .map_or(TICK, |remaining| remaining.min(TICK));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

mod ui {
    use super::*;

    /// Draw the UI.
    pub fn draw(f: &mut Frame, app: &mut TuiApp) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(10),   // Active view
                Constraint::Length(2), // Status bar
            ])
            .split(f.area());

        draw_tabs(f, app, chunks[0]);
        match app.view() {
            View::Inventory => draw_inventory(f, app, chunks[1]),
            View::Search => draw_search(f, app, chunks[1]),
            View::GearSets => draw_sets(f, app, chunks[1]),
            View::Stats => draw_stats(f, app, chunks[1]),
        }
        draw_status_bar(f, app, chunks[2]);
    }

    fn draw_tabs(f: &mut Frame, app: &TuiApp, area: Rect) {
        let titles: Vec<String> = View::ALL
            .iter()
            .map(|v| app.app.tr(v.title_key()))
            .collect();
        let selected = View::ALL.iter().position(|v| *v == app.view()).unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", app.app.tr("appTitle"))),
            );
        f.render_widget(tabs, area);
    }

    /// Render rows with the selected one highlighted.
    fn draw_list(f: &mut Frame, app: &mut TuiApp, area: Rect, rows: Vec<String>, title: String) {
        let visible_height = area.height.saturating_sub(2) as usize;

        // Update scroll offset based on visible height
        if app.selected < app.scroll_offset {
            app.scroll_offset = app.selected;
        } else if visible_height > 0 && app.selected >= app.scroll_offset + visible_height {
            app.scroll_offset = app.selected - visible_height + 1;
        }

        let items: Vec<ListItem> = rows
            .into_iter()
            .enumerate()
            .skip(app.scroll_offset)
            .take(visible_height)
            .map(|(i, line)| {
                let style = if i == app.selected {
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(list, area);
    }

    fn item_row(app: &TuiApp, item: &CatalogItem) -> String {
        crate::commands::item_line(item, &app.app.tr("times"))
    }

    fn draw_inventory(f: &mut Frame, app: &mut TuiApp, area: Rect) {
        let prefs = app.app.prefs();
        let category = match prefs.category_filter.as_deref() {
            None => app.app.tr("categoryAll"),
            Some(FAVORITES_CATEGORY) => app.app.tr("categoryFavorites"),
            Some(other) => other.to_string(),
        };
        let order = match prefs.sort_order {
            gearcrate_core::SortOrder::Asc => app.app.tr("sortAscending"),
            gearcrate_core::SortOrder::Desc => app.app.tr("sortDescending"),
        };
        let title = format!(
            " {} ({}) | {} {} {} ",
            category,
            app.inventory.len(),
            app.app.tr("sortBy"),
            app.app.tr(sort_key_label(prefs.sort_by)),
            order
        );

        let rows: Vec<String> = if app.inventory.is_empty() {
            vec![match prefs.category_filter {
                Some(_) => app.app.t("inventoryCategoryEmpty", &[("category", &category)]),
                None => app.app.tr("inventoryEmpty"),
            }]
        } else {
            app.inventory.iter().map(|i| item_row(app, i)).collect()
        };
        draw_list(f, app, area, rows, title);
    }

    fn draw_search(f: &mut Frame, app: &mut TuiApp, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        let limit = app.app.prefs().search_limit;
        let input = Paragraph::new(app.query_string.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(format!(
                " {} | {} {} ",
                app.app.tr("search"),
                app.app.tr("searchLimit"),
                limit
            )));
        f.render_widget(input, chunks[0]);

        // Show cursor
        f.set_cursor_position(Position::new(
            chunks[0].x + app.query_string.chars().count() as u16 + 1,
            chunks[0].y + 1,
        ));

        let rows: Vec<String> = app
            .results
            .iter()
            .filter_map(|name| app.app.catalog.get(name))
            .map(|item| item_row(app, item))
            .collect();

        let title = match app.total {
            Some(0) => format!(" {} ", app.app.tr("searchNoResults")),
            Some(total) => format!(
                " {} ({:.1}ms) ",
                app.app.t(
                    "searchShowingResults",
                    &[
                        ("shown", &app.results.len().to_string()),
                        ("total", &total.to_string()),
                    ],
                ),
                app.last_search_time.as_secs_f64() * 1000.0
            ),
            None => String::new(),
        };
        draw_list(f, app, chunks[1], rows, title);
    }

    fn draw_sets(f: &mut Frame, app: &mut TuiApp, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let prefs = app.app.prefs();
        let counts = FilterCounts::tally(&app.variants, &prefs.favorite_sets);
        let filter = prefs.gear_sets_filter;
        let set_name = prefs.selected_set.clone();

        let visible = app.visible_variants();
        let rows: Vec<String> = if app.set_names.is_empty() {
            vec![app.app.tr("setsNone")]
        } else if visible.is_empty() {
            vec![app.app.tr("setsNoneForFilter")]
        } else {
            visible
                .iter()
                .map(|v| {
                    let star = if prefs.is_favorite_set(&v.set_name, &v.variant) {
                        "★"
                    } else {
                        " "
                    };
                    format!("{} {} {}", star, v.variant, v.completion())
                })
                .collect()
        };
        let detail = visible.get(app.selected).map(|v| (*v).clone());
        let title = format!(" ◀ {} ▶ | {} ({}) ", set_name, filter, counts.get(filter));

        draw_list(f, app, chunks[0], rows, title);

        let lines: Vec<Line> = match detail {
            Some(variant) => variant
                .pieces
                .iter()
                .map(|(slot, piece)| {
                    let (mark, color) = match (piece.exists, piece.owned) {
                        (true, true) => ("✓", Color::Green),
                        (true, false) => ("✗", Color::Red),
                        (false, _) => ("-", Color::DarkGray),
                    };
                    Line::from(vec![
                        Span::styled(format!("{} ", mark), Style::default().fg(color)),
                        Span::raw(format!(
                            "{:<7} {} {}",
                            slot.to_string(),
                            piece.name.as_deref().unwrap_or(""),
                            if piece.owned {
                                format!("({}{})", piece.count, app.app.tr("times"))
                            } else {
                                String::new()
                            }
                        )),
                    ])
                })
                .collect(),
            None => Vec::new(),
        };
        let details = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        f.render_widget(details, chunks[1]);
    }

    fn draw_stats(f: &mut Frame, app: &TuiApp, area: Rect) {
        let tr = |key: &str| app.app.tr(key);
        let mut lines = Vec::new();

        if let Some(ref stats) = app.stats {
            lines.push(Line::from(format!("{} {}", tr("statsTotalInDb"), stats.total_items_in_db)));
            lines.push(Line::from(format!(
                "{} {}",
                tr("statsInInventory"),
                stats.inventory_unique_items
            )));
            lines.push(Line::from(format!("{} {}", tr("statsTotalCount"), stats.total_item_count)));
            if let Some(size) = stats.cache_size_mb {
                lines.push(Line::from(format!("{} {:.2} MB", tr("statsCacheSize"), size)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                tr("statsByCategory"),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for (category, count) in &stats.category_counts {
                lines.push(Line::from(format!("  {:<20} {}{}", category, count, tr("times"))));
            }
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", tr("statsTitle"))),
        );
        f.render_widget(paragraph, area);
    }

    /// Draw the status bar.
    fn draw_status_bar(f: &mut Frame, app: &TuiApp, area: Rect) {
        let status = if let Some(ref msg) = app.status_message {
            msg.clone()
        } else {
            let keys = match app.view() {
                View::Inventory => "←→/+-:Count s:Sort o:Order c:Category f:Favorite",
                View::Search => "←→:Count Ctrl+F:Favorite Ctrl+L:Limit Ctrl+R:Reset limit",
                View::GearSets => "←→:Set f:Filter Space:Favorite",
                View::Stats => "r:Reload",
            };
            format!(
                "{} {} | {} Tab:View F2:Language Esc:Quit",
                app.app.catalog.len(),
                app.app.tr("times"),
                keys
            )
        };

        let status_bar = Paragraph::new(status).style(Style::default().fg(Color::Gray));

        f.render_widget(status_bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearcrate_core::api::LocalCatalogApi;
    use gearcrate_core::gear_sets::GearSetCatalog;
    use gearcrate_core::state::MemoryStore;
    use gearcrate_core::SearchLimit;

    fn tui() -> TuiApp {
        let items = (0..40)
            .map(|i| CatalogItem::new(format!("ADP Arms Color{:02}", i), i % 3))
            .chain([CatalogItem::new("Overlord Helmet", 1)])
            .collect();
        let api = LocalCatalogApi::in_memory(items, GearSetCatalog::default());
        let mut config = Config::default();
        config.ui.language = Some("en".to_string());
        let app = App::with_parts(config, Box::new(api), Box::new(MemoryStore::new())).unwrap();
        let mut tui = TuiApp::new(app);
        tui.switch_view(View::Search);
        tui
    }

    fn type_query(tui: &mut TuiApp, text: &str) {
        for c in text.chars() {
            tui.on_char(c);
        }
    }

    #[test]
    fn test_search_waits_for_debounce() {
        let mut tui = tui();
        type_query(&mut tui, "adp");
        assert!(tui.results.is_empty());
        assert!(tui.debouncer.is_pending());

        tui.search_now();
        assert_eq!(tui.results.len(), 25);
        assert_eq!(tui.total, Some(40));
    }

    #[test]
    fn test_short_query_clears_results() {
        let mut tui = tui();
        type_query(&mut tui, "adp");
        tui.search_now();
        tui.on_backspace();
        tui.on_backspace();
        tui.search_now();
        assert!(tui.results.is_empty());
        assert_eq!(tui.total, None);
    }

    #[test]
    fn test_limit_cycle_and_reset() {
        let mut tui = tui();
        type_query(&mut tui, "adp");
        tui.search_now();

        tui.cycle_limit();
        assert_eq!(tui.app.prefs().search_limit.get(), 50);
        assert_eq!(tui.results.len(), 40);
        assert_eq!(
            tui.status_message.as_deref(),
            Some("Search result limit set to 50")
        );

        tui.reset_limit();
        assert_eq!(tui.app.prefs().search_limit, SearchLimit::DEFAULT);
        assert_eq!(tui.results.len(), 25);
    }

    #[test]
    fn test_count_change_updates_snapshot() {
        let mut tui = tui();
        type_query(&mut tui, "overlord");
        tui.search_now();
        tui.adjust_selected(1);
        assert_eq!(tui.app.catalog.get("Overlord Helmet").unwrap().count, 2);
        assert_eq!(tui.results, vec!["Overlord Helmet"]);
    }

    #[test]
    fn test_inventory_view_reloads_after_zero_count() {
        let mut tui = tui();
        tui.switch_view(View::Inventory);
        let before = tui.inventory.len();
        let name = tui.selected_item().unwrap();
        let count = tui.app.catalog.get(&name).unwrap().count;

        tui.adjust_selected(-i64::from(count));
        assert_eq!(tui.inventory.len(), before - 1);
    }
}
