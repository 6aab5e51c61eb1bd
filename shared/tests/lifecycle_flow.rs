mod common;

use common::{browser_ops, id, started, started_with, startup, timer_ops, Tester};
use portfolio_shared::capabilities::{BrowserOperation, TimerOperation, WorkerOutput};
use portfolio_shared::event::{KeyInput, ScrollSample, Support};
use portfolio_shared::media::{LazyImage, ObserverGroup};
use portfolio_shared::perf::NavigationTiming;
use portfolio_shared::scroll::ParallaxLayer;
use portfolio_shared::subscription::Route;
use portfolio_shared::view::ImageView;
use portfolio_shared::{Effect, Event, Model};

fn with_media() -> portfolio_shared::event::Startup {
    let mut s = startup();
    s.layout.reveal_targets = vec![id("card-1"), id("about-text")];
    s.layout.lazy_images = vec![LazyImage {
        id: id("shot-1"),
        data_src: "/img/shot-1.webp".into(),
    }];
    s
}

fn sample(offset: f64, at_ms: u64) -> ScrollSample {
    ScrollSample {
        offset,
        document_height: 3_200.0,
        viewport_height: 800.0,
        at_ms,
    }
}

#[test]
fn startup_attaches_listeners_and_observers() {
    let app = Tester::default();
    let mut model = Model::default();
    let update = app.update(Event::Started(Box::new(with_media())), &mut model);
    let ops = browser_ops(&update.effects);

    let routes: Vec<Route> = ops
        .iter()
        .filter_map(|op| match op {
            BrowserOperation::Listen(sub) => Some(sub.spec.route),
            _ => None,
        })
        .collect();
    for route in [
        Route::ThemeToggle,
        Route::SystemTheme,
        Route::MenuToggle,
        Route::KeyRouter,
        Route::Scroll,
        Route::Resize,
        Route::FilterSelect,
        Route::FormSubmit,
        Route::PageLoad,
        Route::ScriptError,
        Route::UnhandledRejection,
    ] {
        assert!(routes.contains(&route), "missing listener for {route:?}");
    }
    assert_eq!(routes.len(), model.subscriptions.len());
    assert!(!routes.contains(&Route::FocusTrap));

    assert!(ops.contains(&BrowserOperation::Observe {
        group: ObserverGroup::Reveal,
        root_margin: "0px 0px -50px 0px".into(),
        threshold: 0.1,
        targets: vec![id("card-1"), id("about-text")],
    }));
    assert!(ops.contains(&BrowserOperation::Observe {
        group: ObserverGroup::LazyImages,
        root_margin: "50px".into(),
        threshold: 0.0,
        targets: vec![id("shot-1")],
    }));
    assert!(ops.contains(&BrowserOperation::ObserveLongTasks));
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));
}

#[test]
fn second_start_is_ignored() {
    let (app, mut model) = started();
    let listening = model.subscriptions.len();
    let update = app.update(Event::Started(Box::new(startup())), &mut model);
    assert!(update.effects.is_empty());
    assert_eq!(model.subscriptions.len(), listening);
}

#[test]
fn without_intersection_observer_everything_is_revealed() {
    let mut s = with_media();
    s.environment.support = Support {
        intersection_observer: false,
        ..Support::all()
    };
    let (app, model) = started_with(s);
    let view = app.view(&model);
    assert!(view.reveal.iter().all(|r| r.visible));
    assert!(view.images.is_empty());
}

#[test]
fn intersections_reveal_once_and_swap_image_sources() {
    let (app, mut model) = started_with(with_media());

    let update = app.update(
        Event::Intersected {
            group: ObserverGroup::Reveal,
            targets: vec![id("card-1")],
        },
        &mut model,
    );
    assert!(browser_ops(&update.effects).contains(&BrowserOperation::Unobserve {
        group: ObserverGroup::Reveal,
        target: id("card-1"),
    }));
    let again = app.update(
        Event::Intersected {
            group: ObserverGroup::Reveal,
            targets: vec![id("card-1")],
        },
        &mut model,
    );
    assert!(again.effects.is_empty());

    let view = app.view(&model);
    let visible: Vec<_> = view.reveal.iter().filter(|r| r.visible).map(|r| &r.id).collect();
    assert_eq!(visible, vec![&id("card-1")]);
    assert_eq!(view.images, vec![ImageView::Loading { id: id("shot-1") }]);

    let _ = app.update(
        Event::Intersected {
            group: ObserverGroup::LazyImages,
            targets: vec![id("shot-1")],
        },
        &mut model,
    );
    assert_eq!(
        app.view(&model).images,
        vec![ImageView::Loaded {
            id: id("shot-1"),
            src: "/img/shot-1.webp".into()
        }]
    );
}

#[test]
fn scroll_updates_header_progress_and_active_link() {
    let (app, mut model) = started();
    let update = app.update(Event::Scrolled(sample(1_200.0, 100)), &mut model);
    assert!(common::renders(&update.effects));

    let view = app.view(&model);
    assert!(view.header.scrolled);
    // 1200 / (3200 - 800)
    assert_eq!(view.scroll_progress, "50%");
    assert!(view.nav_links[0].active);

    // Within the throttle window the sample is dropped.
    let update = app.update(Event::Scrolled(sample(0.0, 105)), &mut model);
    assert!(!common::renders(&update.effects));
    assert!(app.view(&model).header.scrolled);
}

#[test]
fn parallax_follows_scroll_unless_motion_is_reduced() {
    let mut s = startup();
    s.layout.parallax = vec![
        ParallaxLayer {
            id: id("hero-bg"),
            speed: None,
        },
        ParallaxLayer {
            id: id("hero-fg"),
            speed: Some(0.25),
        },
    ];
    let (app, mut model) = started_with(s.clone());
    let _ = app.update(Event::Scrolled(sample(100.0, 100)), &mut model);
    let view = app.view(&model);
    assert_eq!(view.parallax[0].transform, "translateY(-50px)");
    assert_eq!(view.parallax[1].transform, "translateY(-25px)");

    s.environment.prefers_reduced_motion = true;
    let (app, model) = started_with(s);
    assert!(app.view(&model).parallax.is_empty());
}

#[test]
fn page_load_records_metrics_and_registers_worker() {
    let (app, mut model) = started();
    let timing = NavigationTiming {
        navigation_start: 0.0,
        load_event_end: 850.0,
        ..NavigationTiming::default()
    };
    let update = app.update(
        Event::PageLoaded {
            timing: Some(timing),
        },
        &mut model,
    );
    assert!(browser_ops(&update.effects).contains(&BrowserOperation::Analytics {
        event: "page_load_time".into(),
        value: 850.0,
    }));
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Worker(_))));

    // A repeated load event does not report twice.
    let update = app.update(
        Event::PageLoaded {
            timing: Some(timing),
        },
        &mut model,
    );
    assert!(!browser_ops(&update.effects)
        .iter()
        .any(|op| matches!(op, BrowserOperation::Analytics { .. })));

    let update = app.update(
        Event::WorkerRegistered(WorkerOutput::Failed {
            reason: "blocked".into(),
        }),
        &mut model,
    );
    assert!(update.effects.is_empty());
}

#[test]
fn missing_worker_support_skips_registration() {
    let mut s = startup();
    s.environment.support.service_worker = false;
    let (app, mut model) = started_with(s);
    let update = app.update(Event::PageLoaded { timing: None }, &mut model);
    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Worker(_))));
}

#[test]
fn long_tasks_are_only_logged() {
    let (app, mut model) = started();
    for duration_ms in [30.0, 120.0] {
        let update = app.update(Event::LongTaskObserved { duration_ms }, &mut model);
        assert!(update.effects.is_empty());
    }
    assert_eq!(model.perf.record_task(75.0, 50.0), Some(2));
}

#[test]
fn script_errors_are_logged_without_effects() {
    let (app, mut model) = started();
    let update = app.update(
        Event::ScriptError {
            message: "x is undefined".into(),
        },
        &mut model,
    );
    assert!(update.effects.is_empty());
    let update = app.update(
        Event::UnhandledRejection {
            reason: "timeout".into(),
        },
        &mut model,
    );
    assert!(update.effects.is_empty());
    assert!(model.started);
}

#[test]
fn config_overrides_apply_and_bad_config_falls_back() {
    let mut s = startup();
    s.config_json = Some(r#"{"desktop_breakpoint_px": 1024.0}"#.into());
    let (_, model) = started_with(s);
    assert!((model.config.desktop_breakpoint_px - 1024.0).abs() < f64::EPSILON);

    let mut s = startup();
    s.config_json = Some("{ not json".into());
    let (_, model) = started_with(s);
    assert!(model.started);
    assert!((model.config.desktop_breakpoint_px - 768.0).abs() < f64::EPSILON);
}

#[test]
fn focus_ring_only_after_keyboard_use() {
    let (app, mut model) = started();
    let _ = app.update(Event::FocusIn { element: id("nav-about") }, &mut model);
    assert_eq!(app.view(&model).focus_visible, None);

    let _ = app.update(Event::KeyPressed(KeyInput::new("Tab")), &mut model);
    let _ = app.update(Event::FocusIn { element: id("nav-about") }, &mut model);
    assert_eq!(app.view(&model).focus_visible, Some(id("nav-about")));

    let _ = app.update(Event::FocusOut { element: id("nav-about") }, &mut model);
    assert_eq!(app.view(&model).focus_visible, None);
}

#[test]
fn teardown_cancels_every_pending_timer() {
    let (app, mut model) = started_with(with_media());
    let _ = app.update(Event::MenuOpenRequested { active: None }, &mut model);
    let update = app.update(Event::Destroyed, &mut model);

    let cancelled = timer_ops(&update.effects)
        .into_iter()
        .filter(|op| matches!(op, TimerOperation::Cancel { .. }))
        .count();
    // Focus of the first menu item plus the startup announcement clear.
    assert_eq!(cancelled, 2);
    let ops = browser_ops(&update.effects);
    assert!(ops.contains(&BrowserOperation::Disconnect {
        group: ObserverGroup::Reveal
    }));
    assert!(ops.contains(&BrowserOperation::Disconnect {
        group: ObserverGroup::LazyImages
    }));
    assert!(!model.started);
}
