use almanac::grid::GRID_CELLS;
use almanac::{
    CalendarDate, CalendarEngine, CalendarEvent, ColorKey, ColorMap, DayExpansionTracker,
    ExpansionState, MonthGridBuilder, MonthIndex, WeekStart,
};
use serde_json::json;

fn date(year: i32, month0: u32, day: u32) -> CalendarDate {
    CalendarDate::new(year, month0, day).unwrap()
}

fn events(value: serde_json::Value) -> Vec<CalendarEvent> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn leap_february_has_29_target_days() {
    let grid = MonthGridBuilder::new(WeekStart::Monday).build(2024, 1).unwrap();

    let target = grid.target_dates();
    assert_eq!(target.len(), 29);
    assert_eq!(*target.last().unwrap(), date(2024, 1, 29));
}

#[test]
fn december_and_january_cover_both_months() {
    for week_start in [WeekStart::Monday, WeekStart::Sunday].iter() {
        let builder = MonthGridBuilder::new(*week_start);
        let december = builder.build(2023, 11).unwrap();
        let january = builder.build(2024, 0).unwrap();

        let covered: Vec<CalendarDate> = december
            .target_dates()
            .iter()
            .chain(january.target_dates().iter())
            .copied()
            .collect();

        assert_eq!(covered.len(), 31 + 31);
        assert_eq!(covered[0], date(2023, 11, 1));
        assert_eq!(*covered.last().unwrap(), date(2024, 0, 31));
        for pair in covered.windows(2) {
            assert_eq!(pair[0].succ(), Some(pair[1]));
        }
    }
}

#[test]
fn late_utc_timestamp_lands_on_its_written_day() {
    let engine = CalendarEngine::with_colors(vec!["a", "b"], WeekStart::Monday).unwrap();
    let input = events(json!([
        { "id": 1, "occursAt": "2024-03-05T23:59:00Z", "colorKey": 7 }
    ]));

    let (view, _) = engine
        .build_month_view(2024, 2, &input, ColorMap::new(), None)
        .unwrap();

    let cell = view.cell(&date(2024, 2, 5)).unwrap();
    assert_eq!(cell.events.len(), 1);
    assert_eq!(cell.events[0].event.id, "1");
    assert_eq!(view.total_events(), 1);
}

#[test]
fn fifth_key_wraps_to_first_color() {
    let engine =
        CalendarEngine::with_colors(vec!["red", "green", "blue", "yellow"], WeekStart::Sunday)
            .unwrap();
    let input = events(json!([
        { "id": "p1", "occursAt": "2024-03-01T09:00:00", "colorKey": 1 },
        { "id": "p2", "occursAt": "2024-03-02T09:00:00", "colorKey": 2 },
        { "id": "p3", "occursAt": "2024-03-03T09:00:00", "colorKey": 3 },
        { "id": "p4", "occursAt": "2024-03-04T09:00:00", "colorKey": 4 },
        { "id": "p5", "occursAt": "2024-03-05T09:00:00", "colorKey": 5 }
    ]));

    let (_, colors) = engine
        .build_month_view(2024, 2, &input, ColorMap::new(), None)
        .unwrap();

    assert_eq!(colors.len(), 5);
    assert_eq!(
        colors.get(&ColorKey::from(5u64)),
        colors.get(&ColorKey::from(1u64))
    );
    assert_ne!(
        colors.get(&ColorKey::from(2u64)),
        colors.get(&ColorKey::from(1u64))
    );
}

#[test]
fn out_of_window_event_is_dropped_without_diagnostics() {
    let engine = CalendarEngine::with_colors(vec!["a"], WeekStart::Monday).unwrap();
    let input = events(json!([
        { "id": "in", "occursAt": "2024-03-15T10:00:00Z", "colorKey": "x" },
        { "id": "out", "occursAt": "2024-08-15T10:00:00Z", "colorKey": "x" },
        { "id": "bad", "occursAt": "15.03.2024", "colorKey": "x" }
    ]));

    let (view, _) = engine
        .build_month_view(2024, 2, &input, ColorMap::new(), None)
        .unwrap();

    let holding: Vec<_> = view
        .cells()
        .iter()
        .filter(|cell| cell.events.iter().any(|e| e.event.id == "in"))
        .collect();
    assert_eq!(holding.len(), 1);
    assert_eq!(holding[0].date, date(2024, 2, 15));
    assert_eq!(view.total_events(), 1);
    assert_eq!(view.diagnostics().skipped(), 1);
    assert_eq!(view.diagnostics().out_of_window, 1);
}

#[test]
fn color_map_threads_through_navigation() {
    let engine = CalendarEngine::with_colors(vec!["a", "b", "c"], WeekStart::Monday).unwrap();
    let input = events(json!([
        { "id": "n1", "occursAt": "2024-03-10T10:00:00", "colorKey": "admins" },
        { "id": "n2", "occursAt": "2024-04-10T10:00:00", "colorKey": "sellers" },
        { "id": "n3", "occursAt": "2024-04-11T10:00:00", "colorKey": "admins" }
    ]));

    let march = MonthIndex::new(2024, 2);
    let (_, colors) = engine
        .build_month_view(march.year(), march.month0() as i32, &input, ColorMap::new(), None)
        .unwrap();
    let april = march.next();
    let (view, colors) = engine
        .build_month_view(april.year(), april.month0() as i32, &input, colors, None)
        .unwrap();

    let n3 = view.events().find(|e| e.event.id == "n3").unwrap();
    assert_eq!(n3.color.as_str(), "a");
    let n2 = view.events().find(|e| e.event.id == "n2").unwrap();
    assert_eq!(n2.color.as_str(), "b");
    assert_eq!(colors.len(), 2);
}

#[test]
fn expansion_on_a_busy_day() {
    let engine = CalendarEngine::with_colors(vec!["a"], WeekStart::Sunday).unwrap();
    let input: Vec<CalendarEvent> = (0..6)
        .map(|i| CalendarEvent::new(&i.to_string(), &format!("2024-03-08T1{}:00:00", i), 1u64))
        .collect();
    let tracker = DayExpansionTracker::default();

    let (view, _) = engine
        .build_month_view(2024, 2, &input, ColorMap::new(), None)
        .unwrap();
    let cell = view.cell(&date(2024, 2, 8)).unwrap();

    let collapsed = ExpansionState::new();
    assert_eq!(tracker.visible_events(cell, &collapsed).len(), 3);
    assert_eq!(tracker.remaining_count(cell, &collapsed), 3);

    let expanded = tracker.toggle(cell.date, &collapsed);
    assert_eq!(tracker.visible_events(cell, &expanded).len(), 6);
    assert_eq!(tracker.toggle(cell.date, &expanded), collapsed);

    // Navigating away drops expansion of days no longer visible
    let (june, _) = engine
        .build_month_view::<CalendarEvent>(2024, 5, &[], ColorMap::new(), None)
        .unwrap();
    assert!(expanded.retain_within(&june).is_empty());
    assert_eq!(expanded.retain_within(&view), expanded);
}

#[test]
fn every_view_has_42_cells_starting_on_week_start() {
    for week_start in [WeekStart::Monday, WeekStart::Sunday].iter() {
        let engine = CalendarEngine::with_colors(vec!["a"], *week_start).unwrap();
        let mut month = MonthIndex::new(2019, 0);

        while month < MonthIndex::new(2029, 0) {
            let (view, _) = engine
                .build_month_view::<CalendarEvent>(
                    month.year(),
                    month.month0() as i32,
                    &[],
                    ColorMap::new(),
                    None,
                )
                .unwrap();

            assert_eq!(view.cells().len(), GRID_CELLS);
            assert_eq!(view.cells()[0].date.weekday(), week_start.first_weekday());
            month = month.next();
        }
    }
}

#[test]
fn event_without_usable_timestamp_does_not_blank_the_month() {
    let engine = CalendarEngine::with_colors(vec!["a"], WeekStart::Monday).unwrap();
    let input = events(json!([
        { "id": 1, "occursAt": "2024-03-05T10:00:00Z", "colorKey": 1 },
        { "id": 2, "occursAt": null, "colorKey": 1 },
        { "id": 3, "occursAt": 20240305, "colorKey": 1 },
        { "id": 4, "occursAt": "2024-03-06T10:00:00Z", "colorKey": 1 }
    ]));

    let (view, _) = engine
        .build_month_view(2024, 2, &input, ColorMap::new(), None)
        .unwrap();

    assert_eq!(view.total_events(), 2);
    let skipped: Vec<&str> = view
        .diagnostics()
        .malformed
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(skipped, vec!["2", "3"]);
}

#[test]
fn timestamps_without_seconds_are_placed() {
    let engine = CalendarEngine::with_colors(vec!["a"], WeekStart::Monday).unwrap();
    let input = events(json!([
        { "id": "z", "occursAt": "2024-03-05T10:30Z", "colorKey": 1 },
        { "id": "o", "occursAt": "2024-03-05T10:30+01:00", "colorKey": 1 },
        { "id": "n", "occursAt": "2024-03-05T10:30", "colorKey": 1 }
    ]));

    let (view, _) = engine
        .build_month_view(2024, 2, &input, ColorMap::new(), None)
        .unwrap();

    let cell = view.cell(&date(2024, 2, 5)).unwrap();
    let ids: Vec<&str> = cell.events.iter().map(|e| e.event.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "o", "n"]);
    assert!(view.diagnostics().is_clean());
}
