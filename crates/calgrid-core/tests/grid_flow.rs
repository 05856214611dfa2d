use calgrid_core::{
    Bucketing, Event, FnHandler, LayoutConfig, MonthGrid, SelectionHandler, WeekGrid,
};
use chrono::{Datelike, NaiveDate, Weekday};

const EVENTS_JSON: &str = r##"[
    {"title": "Standup", "date": "2024-03-15", "startTime": "09:00", "endTime": "10:00"},
    {"title": "Pairing", "date": "2024-03-15", "startTime": "09:00", "endTime": "10:00", "color": "#22c55e"},
    {"title": "Design review", "date": "2024-03-15", "startTime": "09:30", "endTime": "11:00"},
    {"title": "Lunch", "date": "2024-03-15", "startTime": "12:00", "endTime": "13:00"},
    {"title": "Late sync", "date": "2024-03-15", "startTime": "17:00", "endTime": "17:30"},
    {"title": "Broken", "date": "2024-03-14", "startTime": "9", "endTime": "10:00"},
    {"title": "Spring break", "date": "2024-04-15", "startTime": "08:00", "endTime": "09:00"}
]"##;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn fixture() -> Vec<Event> {
    serde_json::from_str(EVENTS_JSON).expect("fixture parses")
}

#[derive(Default)]
struct Recorder {
    cells: Vec<(NaiveDate, u32)>,
    events: Vec<String>,
}

impl SelectionHandler for Recorder {
    fn on_cell_or_slot_select(&mut self, date: NaiveDate, hour: u32) {
        self.cells.push((date, hour));
    }

    fn on_event_select(&mut self, event: &Event) {
        self.events.push(event.title.clone());
    }
}

#[test]
fn month_grid_from_json_fixture() {
    let events = fixture();
    let config = LayoutConfig::default();
    let grid = MonthGrid::build(ymd(2024, 3, 1), ymd(2024, 3, 15), &events, &config);

    assert_eq!(grid.cells.len(), 42);
    assert_eq!(grid.cells[0].date.weekday(), Weekday::Sun);
    assert_eq!(grid.weekday_labels[0], "Sun");

    let busy = grid.cell(ymd(2024, 3, 15)).expect("15th present");
    assert!(busy.is_today);
    assert_eq!(busy.events.len(), 3);
    assert!(busy.has_more);
    assert_eq!(busy.hidden_count, 2);
    assert_eq!(busy.events[1].style.border, "#22c55e");

    // April 15 is outside the March grid (which ends April 6).
    assert!(grid.cells.iter().all(|cell| cell
        .events
        .iter()
        .all(|e| e.event.title != "Spring break")));

    assert_eq!(grid.skipped.len(), 1);
    assert_eq!(grid.skipped[0].event.title, "Broken");
}

#[test]
fn month_selection_routes_to_handler() {
    let events = fixture();
    let grid = MonthGrid::build(
        ymd(2024, 3, 1),
        ymd(2024, 3, 1),
        &events,
        &LayoutConfig::default(),
    );
    let mut recorder = Recorder::default();

    assert!(grid.select_cell(ymd(2024, 2, 27), &mut recorder));
    assert!(grid.select_event(ymd(2024, 3, 15), 2, &mut recorder));
    assert!(!grid.select_event(ymd(2024, 3, 15), 3, &mut recorder));
    assert!(!grid.select_cell(ymd(2024, 5, 1), &mut recorder));

    assert_eq!(recorder.cells, vec![(ymd(2024, 2, 27), 9)]);
    assert_eq!(recorder.events, vec!["Design review".to_string()]);
}

#[test]
fn week_grid_exact_and_overlap_modes() {
    let events = fixture();
    let mut config = LayoutConfig::default();

    let exact = WeekGrid::build(ymd(2024, 3, 13), ymd(2024, 3, 13), &events, &config);
    assert_eq!(exact.start, ymd(2024, 3, 10));
    assert_eq!(exact.end, ymd(2024, 3, 16));
    let friday = exact.column(ymd(2024, 3, 15)).expect("friday");
    let widths: Vec<(String, f64)> = friday
        .events
        .iter()
        .map(|b| (b.event.title.clone(), b.width))
        .collect();
    assert_eq!(widths[0], ("Standup".to_string(), 50.0));
    assert_eq!(widths[1], ("Pairing".to_string(), 50.0));
    assert_eq!(widths[2], ("Design review".to_string(), 100.0));

    config.week.bucketing = Bucketing::Overlap;
    let overlap = WeekGrid::build(ymd(2024, 3, 13), ymd(2024, 3, 13), &events, &config);
    let friday = overlap.column(ymd(2024, 3, 15)).expect("friday");
    let review = friday
        .events
        .iter()
        .find(|b| b.event.title == "Design review")
        .expect("review placed");
    assert!((review.width - 100.0 / 3.0).abs() < 1e-9);
    assert!((review.left - 200.0 / 3.0).abs() < 1e-9);
    let lunch = friday
        .events
        .iter()
        .find(|b| b.event.title == "Lunch")
        .expect("lunch placed");
    assert!((lunch.width - 100.0).abs() < 1e-9);
    assert!((lunch.top - 48.0).abs() < 1e-9);

    assert_eq!(overlap.skipped.len(), 1);
}

#[test]
fn week_selection_with_closures() {
    let events = fixture();
    let grid = WeekGrid::build(
        ymd(2024, 3, 15),
        ymd(2024, 3, 15),
        &events,
        &LayoutConfig::default(),
    );

    let mut slots = Vec::new();
    let mut titles = Vec::new();
    {
        let mut handler = FnHandler::new(
            |date, hour| slots.push((date, hour)),
            |event: &Event| titles.push(event.title.clone()),
        );
        assert!(grid.select_slot(ymd(2024, 3, 11), 14, &mut handler));
        assert!(!grid.select_slot(ymd(2024, 3, 11), 24, &mut handler));
        assert!(!grid.select_slot(ymd(2024, 3, 17), 8, &mut handler));
        assert!(grid.select_event(ymd(2024, 3, 15), 0, &mut handler));
    }

    assert_eq!(slots, vec![(ymd(2024, 3, 11), 14)]);
    assert_eq!(titles, vec!["Standup".to_string()]);
}
