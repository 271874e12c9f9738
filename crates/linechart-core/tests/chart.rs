// File: crates/linechart-core/tests/chart.rs
// Purpose: Widget construction, drawing into the document, redraws, hover marker, hide-menu and destroy.

use std::rc::Rc;

use linechart_core::events::{CustomEvent, Host, HIDE_MENU};
use linechart_core::scale::{Scale, ScaleKind};
use linechart_core::theme::SCHEME_PAIRED;
use linechart_core::{Dataset, InputMode, Linechart, LinechartError, LinechartOptions, Margin, Series, XValue};

// 520x440 body with default margins: rw = 470, rh = 400, x domain [0, 10], y domain [0, 80].
fn fruit() -> Dataset {
    Dataset::new(vec![
        Series::new("apple").with_values([(0, 20.0), (5, 20.0), (10, 20.0)]),
        Series::new("pear").with_values([(0, 80.0), (5, 80.0), (10, 80.0)]),
        Series::new("plum").with_values([(0, 50.0), (10, 60.0)]),
    ])
    .with_axis_labels("Day", "Kg")
}

fn drawn(data: Dataset) -> (Rc<Host>, Linechart) {
    let host = Host::with_size(520.0, 440.0);
    let mut chart = Linechart::new(Rc::clone(&host), LinechartOptions::new(data));
    chart.draw();
    (host, chart)
}

fn texts_under(host: &Host, scope: linechart_core::NodeId, selector: &str) -> Vec<String> {
    let doc = host.document.borrow();
    let group = doc.select(scope, selector).expect("group exists");
    doc.select_all(group, "text")
        .into_iter()
        .filter_map(|t| doc.text(t).map(str::to_string))
        .collect()
}

#[test]
fn construction_measures_container() {
    let host = Host::new();
    let chart = Linechart::new(Rc::clone(&host), LinechartOptions::default());
    assert_eq!((chart.w, chart.h), (1024.0, 640.0));
    assert_eq!((chart.rw, chart.rh), (974.0, 600.0));
    assert_eq!(chart.locale, "en-GB");
    assert_eq!((chart.ticks_x, chart.ticks_y), (10, 10));
    assert_eq!(chart.margin, Margin::new(20.0, 30.0, 20.0, 20.0));
    assert_eq!(chart.svg(), None);
}

#[test]
fn nan_margins_become_zero() {
    let host = Host::with_size(300.0, 200.0);
    let opts = LinechartOptions { margin: Margin::new(f64::NAN, 10.0, f64::NAN, 5.0), ..LinechartOptions::default() };
    let chart = Linechart::new(host, opts);
    assert_eq!(chart.margin, Margin::new(0.0, 10.0, 0.0, 5.0));
    assert_eq!((chart.rw, chart.rh), (285.0, 200.0));
}

#[test]
fn draw_builds_the_element_tree() {
    let (host, chart) = drawn(fruit());
    let doc = host.document.borrow();
    let svg = chart.svg().expect("svg");
    assert_eq!(doc.attr(svg, "id"), Some("linechart0"));
    assert!(doc.has_class(svg, "linechart"));
    assert_eq!(doc.attr(svg, "width"), Some("520"));
    assert_eq!(doc.attr(svg, "height"), Some("440"));

    let canvas = chart.canvas().expect("canvas");
    assert!(doc.has_class(canvas, "canvas"));
    assert_eq!(doc.attr(canvas, "transform"), Some("translate(20,20)"));

    let axis_x = doc.select(canvas, "g.line-axis-x").expect("x axis");
    assert_eq!(doc.attr(axis_x, "transform"), Some("translate(0,400)"));
    assert_eq!(doc.select_children(axis_x, "g.tick").len(), 11);
    assert!(doc.select(axis_x, ".domain").is_none());
    let first_tick = doc.select_children(axis_x, "g.tick")[1];
    assert_eq!(doc.attr(first_tick, "transform"), Some("translate(47,0)"));

    let paths = doc.select_all(svg, "path.linechart");
    assert_eq!(paths, chart.paths());
    let ids: Vec<_> = paths.iter().map(|p| doc.attr(*p, "id").unwrap_or_default().to_string()).collect();
    assert_eq!(ids, ["linechart0_p0", "linechart0_p1", "linechart0_p2"]);
    assert_eq!(doc.attr(paths[0], "d"), Some("M0,300L235,300L470,300"));
    assert_eq!(doc.style(paths[0], "mix-blend-mode"), Some("multiply"));
    assert_eq!(doc.style(paths[0], "stroke"), Some(SCHEME_PAIRED[0]));
    let title = doc.select(paths[2], "title").expect("title");
    assert_eq!(doc.text(title), Some("plum"));

    let lx = doc.select(canvas, "text.line-axis-x-text").expect("x label");
    assert_eq!(doc.text(lx), Some("Day"));
    assert_eq!(doc.attr(lx, "text-anchor"), Some("end"));
    assert_eq!((doc.attr(lx, "x"), doc.attr(lx, "y")), (Some("470"), Some("390")));
    let ly = doc.select(canvas, "text.line-axis-y-text").expect("y label");
    assert_eq!(doc.text(ly), Some("Kg"));
}

#[test]
fn tick_labels_use_locale_formatters() {
    let (host, chart) = drawn(fruit());
    let canvas = chart.canvas().expect("canvas");
    let y = texts_under(&host, canvas, "g.line-axis-y");
    assert_eq!(y, ["0", "10", "20", "30", "40", "50", "60", "70", "80"]);

    let big = Dataset::new(vec![Series::new("big").with_values([(0, 1500.0), (1, 4200.5)])]);
    let (host, chart) = drawn(big);
    let y = texts_under(&host, chart.canvas().expect("canvas"), "g.line-axis-y");
    assert!(y.contains(&"1,500".to_string()), "{y:?}");
}

#[test]
fn custom_formatter_and_date_axis() {
    let host = Host::with_size(1024.0, 640.0);
    let data = Dataset::new(vec![Series::new("months").with_values(
        (1..=7).map(|m| (format!("2020-0{m}-01"), m as f64)),
    )]);
    let opts = LinechartOptions {
        format_y: Some(Box::new(|v: f64| format!("{v}%"))),
        ..LinechartOptions::new(data)
    };
    let mut chart = Linechart::new(Rc::clone(&host), opts);
    chart.draw();
    assert_eq!(chart.scale_x().kind(), ScaleKind::Time);
    assert!(chart.dataset().series[0].values.iter().all(|(x, _)| matches!(x, XValue::Date(_))));

    let canvas = chart.canvas().expect("canvas");
    let x = texts_under(&host, canvas, "g.line-axis-x");
    assert_eq!(x, ["2020", "February", "March", "April", "May", "June", "July"]);
    let y = texts_under(&host, canvas, "g.line-axis-y");
    assert_eq!(y.first().map(String::as_str), Some("0%"));
}

#[test]
fn redraw_is_idempotent() {
    let (host, mut chart) = drawn(fruit());
    chart.draw().draw();
    let doc = host.document.borrow();
    let body = doc.body();
    assert_eq!(doc.select_all(body, "svg.linechart").len(), 1);
    let svg = chart.svg().expect("svg");
    assert_eq!(doc.select_all(svg, "g.marker").len(), 1);
    assert_eq!(doc.select_all(svg, "path.linechart").len(), 3);
    assert_eq!(doc.select_all(svg, "g.tick").len(), 11 + 9);
    assert_eq!(doc.select_all(svg, "text.line-axis-x-text").len(), 1);
}

#[test]
fn replacing_data_updates_and_prunes_paths() {
    let (host, mut chart) = drawn(fruit());
    chart.data(Dataset::new(vec![Series::new("pear").with_values([(0, 1.0), (2, 2.0)])])).draw();
    let doc = host.document.borrow();
    let svg = chart.svg().expect("svg");
    let paths = doc.select_all(svg, "path.linechart");
    assert_eq!(paths.len(), 1);
    assert_eq!(doc.attr(paths[0], "id"), Some("linechart0_p0"));
    // The palette remembers labels across data replacement.
    assert_eq!(chart.dataset().series[0].color.as_deref(), Some(SCHEME_PAIRED[1]));
    assert_eq!(chart.xvalues(), &[0.0, 2.0]);
}

#[test]
fn repeated_redraws_reuse_document_nodes() {
    let (host, mut chart) = drawn(fruit());
    let (live, slots) = {
        let doc = host.document.borrow();
        (doc.len(), doc.capacity())
    };
    for _ in 0..200 {
        chart.draw();
    }
    {
        let doc = host.document.borrow();
        assert_eq!((doc.len(), doc.capacity()), (live, slots));
    }

    // Swapping between datasets with different tick and path counts settles too.
    let small = || Dataset::new(vec![Series::new("pear").with_values([(0, 1.0), (2, 2.0)])]);
    chart.data(small());
    chart.data(fruit());
    let settled = host.document.borrow().capacity();
    for _ in 0..50 {
        chart.data(small());
        chart.data(fruit());
    }
    let doc = host.document.borrow();
    assert_eq!(doc.capacity(), settled);
    assert_eq!(doc.len(), live);
}

#[test]
fn charts_in_one_document_get_distinct_ids() {
    let host = Host::with_size(520.0, 440.0);
    let mut a = Linechart::new(Rc::clone(&host), LinechartOptions::new(fruit()));
    let mut b = Linechart::new(Rc::clone(&host), LinechartOptions::new(fruit()));
    a.draw();
    b.draw();
    assert_eq!(a.id(), "linechart0");
    assert_eq!(b.id(), "linechart1");
    let doc = host.document.borrow();
    assert_eq!(doc.attr(b.paths()[0], "id"), Some("linechart1_p0"));
}

#[test]
fn hover_moves_marker_and_mutes_other_series() {
    let (host, mut chart) = drawn(fruit());
    chart.pointer_enter();
    {
        let doc = host.document.borrow();
        assert!(chart.paths().iter().all(|p| doc.style(*p, "stroke") == Some("#dddddd")));
        assert!(chart.paths().iter().all(|p| doc.style(*p, "mix-blend-mode").is_none()));
    }

    // Canvas (235, 290) is x = 5, y = 22: apple (y = 20) is closest, plum has no point at x = 5.
    let h = chart.pointer_move(255.0, 310.0).expect("hit");
    assert_eq!((h.x, h.y, h.series), (5.0, 20.0, 0));
    assert_eq!(h.label, "apple");
    assert_eq!(chart.hover(), Some(&h));

    let doc = host.document.borrow();
    let dot = chart.marker().expect("marker");
    assert_eq!(doc.attr(dot, "display"), None);
    assert_eq!(doc.attr(dot, "transform"), Some("translate(235,300)"));
    let label = doc.select(dot, "text").expect("label");
    assert_eq!(doc.text(label), Some("apple"));

    let apple = chart.paths()[0];
    assert_eq!(doc.style(apple, "stroke"), Some(SCHEME_PAIRED[0]));
    assert_eq!(doc.style(chart.paths()[1], "stroke"), Some("#dddddd"));
    let group = doc.parent(apple).expect("series group");
    assert_eq!(doc.children(group).last(), Some(&apple), "hovered series is raised");
}

#[test]
fn pointer_leave_restores_series() {
    let (host, mut chart) = drawn(fruit());
    chart.pointer_enter();
    chart.pointer_move(255.0, 310.0);
    chart.pointer_leave();
    assert_eq!(chart.hover(), None);
    let doc = host.document.borrow();
    for (i, p) in chart.paths().iter().enumerate() {
        assert_eq!(doc.style(*p, "stroke"), Some(SCHEME_PAIRED[i]));
        assert_eq!(doc.style(*p, "mix-blend-mode"), Some("multiply"));
    }
    assert_eq!(doc.attr(chart.marker().expect("marker"), "display"), Some("none"));
}

#[test]
fn hide_menu_hides_the_marker() {
    let (host, mut chart) = drawn(fruit());
    chart.pointer_enter();
    chart.pointer_move(255.0, 310.0);
    assert!(chart.hover().is_some());

    host.dispatch(&CustomEvent::new(HIDE_MENU));
    assert_eq!(chart.hover(), None);
    let doc = host.document.borrow();
    assert_eq!(doc.attr(chart.marker().expect("marker"), "display"), Some("none"));
}

#[test]
fn destroy_removes_svg_and_listener() {
    let (host, mut chart) = drawn(fruit());
    assert_eq!(host.window.listener_count(HIDE_MENU), 1);
    let svg = chart.svg().expect("svg");
    chart.destroy();
    assert_eq!(host.window.listener_count(HIDE_MENU), 0);
    assert_eq!(chart.svg(), None);
    let doc = host.document.borrow();
    assert!(!doc.contains(svg));
    assert!(doc.select_all(doc.body(), "svg").is_empty());
    drop(doc);

    // A destroyed chart can be drawn again.
    chart.draw();
    assert_eq!(host.window.listener_count(HIDE_MENU), 1);
    assert_eq!(chart.paths().len(), 3);
}

#[test]
fn resize_follows_the_container() {
    let (host, mut chart) = drawn(fruit());
    {
        let mut doc = host.document.borrow_mut();
        let body = doc.body();
        doc.set_size(body, 600.0, 400.0);
    }
    chart.resize();
    assert_eq!((chart.rw, chart.rh), (550.0, 360.0));
    assert_eq!(chart.scale_x().range(), (0.0, 550.0));
    let doc = host.document.borrow();
    let svg = chart.svg().expect("svg");
    assert_eq!(doc.attr(svg, "width"), Some("600"));
    let axis_x = doc.select(svg, "g.line-axis-x").expect("x axis");
    assert_eq!(doc.attr(axis_x, "transform"), Some("translate(0,360)"));
}

#[test]
fn touch_input_disables_tap_highlight() {
    let host = Host::with_size(520.0, 440.0);
    let opts = LinechartOptions { input: InputMode::Touch, ..LinechartOptions::new(fruit()) };
    let mut chart = Linechart::new(Rc::clone(&host), opts);
    chart.draw();
    let doc = host.document.borrow();
    let canvas = chart.canvas().expect("canvas");
    assert_eq!(doc.style(canvas, "-webkit-tap-highlight-color"), Some("transparent"));
}

#[test]
fn strict_data_rejects_bad_x() {
    let host = Host::new();
    let mut chart = Linechart::new(host, LinechartOptions::default());
    let bad = Dataset::new(vec![Series::new("s").with_values([("2020-01-01", 1.0), ("later", 2.0)])]);
    match chart.try_data(bad) {
        Err(LinechartError::InvalidX { series, index, value }) => {
            assert_eq!((series.as_str(), index, value.as_str()), ("s", 1, "later"));
        }
        other => panic!("expected InvalidX, got {:?}", other.map(|_| ())),
    }
    assert!(chart.plot_series().is_empty(), "rejected data must not be loaded");
}

#[test]
fn strict_data_rejects_non_finite_text() {
    let host = Host::new();
    let mut chart = Linechart::new(host, LinechartOptions::default());
    for word in ["inf", "-infinity", "NaN"] {
        let bad = Dataset::new(vec![Series::new("s").with_values([("1", 1.0), (word, 2.0)])]);
        match chart.try_data(bad) {
            Err(LinechartError::InvalidX { index, value, .. }) => assert_eq!((index, value.as_str()), (1, word)),
            other => panic!("expected InvalidX for {word}, got {:?}", other.map(|_| ())),
        }
    }

    // The lenient path keeps the point but leaves it off the axis.
    chart.data(Dataset::new(vec![Series::new("s").with_values([("1", 1.0), ("inf", 2.0), ("4", 3.0)])]));
    assert!(chart.plot_series()[0].points[1].x.is_nan());
    assert_eq!(chart.xvalues(), &[1.0, 4.0]);
}

#[test]
fn empty_and_degenerate_data_still_draw() {
    let (host, chart) = drawn(Dataset::default());
    assert!(chart.paths().is_empty());
    assert_eq!(chart.scale_y().domain(), (0.0, 0.0));

    let (host2, chart2) = drawn(Dataset::new(vec![Series::new("junk").with_values([("n/a", 1.0)])]));
    let doc = host2.document.borrow();
    assert_eq!(doc.attr(chart2.paths()[0], "d"), None);
    drop(doc);
    drop(host);
}

#[test]
fn display_lists_series() {
    let data = Dataset::new(vec![
        Series::new("apple").with_color("#ff0000").with_values([(1, 2.0), (3, 4.0)]),
        Series::new("pear").with_values([(1, 5.0)]),
    ]);
    let chart = Linechart::new(Host::new(), LinechartOptions::new(data));
    assert_eq!(
        chart.to_string(),
        format!("data:\napple (#ff0000): [1, 2] [3, 4]\npear ({}): [1, 5]", SCHEME_PAIRED[0])
    );
}
