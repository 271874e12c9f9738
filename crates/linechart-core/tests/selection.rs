// File: crates/linechart-core/tests/selection.rs
// Purpose: Click selection toggles selected/fade exclusively and clearing resets everything.

use std::cell::RefCell;
use std::rc::Rc;

use linechart_core::events::{CustomEvent, EventDetail, Host, LINE_SELECTED};
use linechart_core::{Dataset, Linechart, LinechartOptions, Series};

// 520x440 body with default margins: rw = 470, rh = 400, x domain [0, 10], y domain [0, 80].
fn drawn_chart() -> (Rc<Host>, Linechart) {
    let host = Host::with_size(520.0, 440.0);
    let data = Dataset::new(vec![
        Series::new("apple").with_values([(0, 20.0), (5, 20.0), (10, 20.0)]),
        Series::new("pear").with_values([(0, 80.0), (5, 80.0), (10, 80.0)]),
        Series::new("plum").with_values([(0, 50.0), (10, 60.0)]),
    ]);
    let mut chart = Linechart::new(Rc::clone(&host), LinechartOptions::new(data));
    chart.draw();
    (host, chart)
}

fn classes(host: &Host, chart: &Linechart) -> Vec<(bool, bool)> {
    let doc = host.document.borrow();
    chart
        .paths()
        .iter()
        .map(|p| (doc.has_class(*p, "selected"), doc.has_class(*p, "fade")))
        .collect()
}

#[test]
fn click_selects_one_and_fades_the_rest() {
    let (host, mut chart) = drawn_chart();
    let target = chart.paths()[1];
    assert!(chart.click_series(target));
    assert_eq!(chart.selected(), Some(1));
    assert_eq!(classes(&host, &chart), vec![(false, true), (true, false), (false, true)]);

    // Selecting another series moves the highlight; never two selected at once.
    let other = chart.paths()[2];
    chart.click_series(other);
    assert_eq!(chart.selected(), Some(2));
    assert_eq!(classes(&host, &chart), vec![(false, true), (false, true), (true, false)]);
}

#[test]
fn clear_selection_removes_all_state() {
    let (host, mut chart) = drawn_chart();
    chart.click_series(chart.paths()[0]);
    chart.clear_selection();
    assert_eq!(chart.selected(), None);
    assert!(classes(&host, &chart).iter().all(|c| *c == (false, false)));

    let doc = host.document.borrow();
    let svg = chart.svg().expect("drawn");
    assert!(doc.select_all(svg, ".selected").is_empty());
    assert!(doc.select_all(svg, ".fade").is_empty());
}

#[test]
fn background_click_clears() {
    let (host, mut chart) = drawn_chart();
    chart.click_series(chart.paths()[2]);
    chart.click_background();
    assert_eq!(chart.selected(), None);
    assert!(classes(&host, &chart).iter().all(|c| *c == (false, false)));
}

#[test]
fn line_selected_carries_the_clicked_path() {
    let (host, mut chart) = drawn_chart();
    let seen: Rc<RefCell<Vec<CustomEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let reader = Rc::clone(&host);
    host.window.add_event_listener(
        LINE_SELECTED,
        Rc::new(move |e: &CustomEvent| {
            // The document must be readable from inside a listener.
            assert_eq!(reader.document.borrow().tag(reader.document.borrow().body()), Some("body"));
            log.borrow_mut().push(e.clone());
        }),
    );

    let target = chart.paths()[1];
    chart.click_series(target);
    let events = seen.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].detail,
        EventDetail::Element { node: target, id: Some("linechart0_p1".to_string()) }
    );
}

#[test]
fn foreign_nodes_are_ignored() {
    let (host, mut chart) = drawn_chart();
    let stray = {
        let mut doc = host.document.borrow_mut();
        let body = doc.body();
        doc.append(body, "div")
    };
    assert!(!chart.click_series(stray));
    assert_eq!(chart.selected(), None);
}

#[test]
fn click_at_hits_the_line_under_the_pointer() {
    let (host, mut chart) = drawn_chart();
    // apple at x = 5 sits on canvas (235, 300), surface (255, 320).
    assert_eq!(chart.series_at(255.0, 320.0), Some(0));
    assert_eq!(chart.series_at(255.0, 322.0), Some(0));
    assert_eq!(chart.click_at(255.0, 320.0), Some(0));
    assert_eq!(chart.selected(), Some(0));

    // Empty space clears the selection.
    assert_eq!(chart.click_at(255.0, 200.0), None);
    assert_eq!(chart.selected(), None);
    assert!(classes(&host, &chart).iter().all(|c| *c == (false, false)));
}

#[test]
fn selection_stays_inside_its_own_chart() {
    let host = Host::with_size(520.0, 440.0);
    let data = || Dataset::new(vec![Series::new("a").with_values([(0, 1.0), (1, 2.0)]), Series::new("b").with_values([(0, 2.0), (1, 1.0)])]);
    let mut left = Linechart::new(Rc::clone(&host), LinechartOptions::new(data()));
    let mut right = Linechart::new(Rc::clone(&host), LinechartOptions::new(data()));
    left.draw();
    right.draw();

    right.click_series(right.paths()[0]);
    left.click_series(left.paths()[1]);
    left.clear_selection();

    assert_eq!(right.selected(), Some(0));
    let doc = host.document.borrow();
    assert!(doc.has_class(right.paths()[0], "selected"));
    assert!(doc.has_class(right.paths()[1], "fade"));
}

#[test]
fn growing_the_dataset_after_draw_keeps_clicks_in_bounds() {
    let host = Host::with_size(520.0, 440.0);
    let one = Dataset::new(vec![Series::new("apple").with_values([(0, 20.0), (10, 20.0)])]);
    let mut chart = Linechart::new(Rc::clone(&host), LinechartOptions::new(one));
    chart.draw();
    chart.data(Dataset::new(vec![
        Series::new("apple").with_values([(0, 20.0), (5, 20.0), (10, 20.0)]),
        Series::new("pear").with_values([(0, 80.0), (5, 80.0), (10, 80.0)]),
        Series::new("plum").with_values([(0, 50.0), (10, 60.0)]),
    ]));
    assert_eq!(chart.paths().len(), 3);

    chart.pointer_enter();
    for sx in (0..=52).map(|i| i as f64 * 10.0) {
        for sy in (0..=44).map(|j| j as f64 * 10.0) {
            chart.pointer_move(sx, sy);
            if let Some(i) = chart.click_at(sx, sy) {
                assert!(i < 3);
                assert_eq!(chart.selected(), Some(i));
            }
        }
    }

    // pear at x = 5 sits on canvas (235, 0), surface (255, 20).
    assert_eq!(chart.click_at(255.0, 20.0), Some(1));
    assert_eq!(classes(&host, &chart), vec![(false, true), (true, false), (false, true)]);
}
