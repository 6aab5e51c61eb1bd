mod common;

use common::{browser_ops, cancelled_timers, id, started, started_timers, started_with, startup, timer_for};
use portfolio_shared::capabilities::BrowserOperation;
use portfolio_shared::event::{KeyInput, Resize, ScrollSample, Viewport};
use portfolio_shared::navigation::ClickRegion;
use portfolio_shared::subscription::Route;
use portfolio_shared::timing::Task;
use portfolio_shared::Event;

fn trap_listener(ops: &[BrowserOperation]) -> Option<u64> {
    ops.iter().find_map(|op| match op {
        BrowserOperation::Listen(sub) if sub.spec.route == Route::FocusTrap => Some(sub.id.0),
        _ => None,
    })
}

#[test]
fn menu_open_close_restores_focus_and_attributes() {
    let (app, mut model) = started();

    let update = app.update(
        Event::MenuToggled {
            active: Some(id("menu-toggle")),
        },
        &mut model,
    );
    let ops = browser_ops(&update.effects);
    let trap = trap_listener(&ops).expect("focus trap attached on open");
    let timers = started_timers(&update.effects);
    assert_eq!(timers.len(), 1);

    let view = app.view(&model);
    assert!(view.menu.open);
    assert!(!view.menu.aria_hidden);
    assert!(view.menu.toggle_expanded);
    assert!(view.menu.body_scroll_locked);

    // Focus lands on the first item once the open transition settles.
    let update = app.update(Event::TimerFired { id: timers[0] }, &mut model);
    assert!(browser_ops(&update.effects).contains(&BrowserOperation::Focus { element: id("m-home") }));

    let update = app.update(Event::KeyPressed(KeyInput::new("Escape")), &mut model);
    let ops = browser_ops(&update.effects);
    assert!(ops.iter().any(|op| matches!(op, BrowserOperation::Unlisten { id } if id.0 == trap)));
    assert!(ops.contains(&BrowserOperation::Focus { element: id("menu-toggle") }));
    // Escape closing the menu must not swallow the key.
    assert!(!ops.contains(&BrowserOperation::ConsumeKey));

    let view = app.view(&model);
    assert!(!view.menu.open);
    assert!(view.menu.aria_hidden);
    assert!(!view.menu.toggle_expanded);
    assert!(!view.menu.body_scroll_locked);
    assert!(!model.menu.has_trap_listener());
}

#[test]
fn tab_wraps_inside_open_menu() {
    let (app, mut model) = started();
    let _ = app.update(Event::MenuOpenRequested { active: None }, &mut model);

    let update = app.update(
        Event::FocusTrapKey(KeyInput::new("Tab").on(id("m-contact"))),
        &mut model,
    );
    assert_eq!(
        browser_ops(&update.effects),
        vec![
            BrowserOperation::ConsumeKey,
            BrowserOperation::Focus { element: id("m-home") }
        ]
    );

    let update = app.update(
        Event::FocusTrapKey(KeyInput::new("Tab").with_shift().on(id("m-home"))),
        &mut model,
    );
    assert!(browser_ops(&update.effects).contains(&BrowserOperation::Focus { element: id("m-contact") }));

    let update = app.update(
        Event::FocusTrapKey(KeyInput::new("Tab").on(id("m-about"))),
        &mut model,
    );
    assert!(browser_ops(&update.effects).is_empty());
}

#[test]
fn outside_click_closes_but_inside_click_does_not() {
    let (app, mut model) = started();
    let _ = app.update(Event::MenuOpenRequested { active: None }, &mut model);

    let _ = app.update(
        Event::DocumentClicked {
            region: ClickRegion::Menu,
        },
        &mut model,
    );
    assert!(model.menu.is_open());

    let _ = app.update(
        Event::DocumentClicked {
            region: ClickRegion::Outside,
        },
        &mut model,
    );
    assert!(!model.menu.is_open());
}

#[test]
fn closing_cancels_pending_first_item_focus() {
    let (app, mut model) = started();
    let update = app.update(Event::MenuOpenRequested { active: None }, &mut model);
    let focus_timer = started_timers(&update.effects)[0];

    let update = app.update(Event::MenuCloseRequested, &mut model);
    assert_eq!(cancelled_timers(&update.effects), vec![focus_timer]);

    // A late fire of the cancelled timer does nothing.
    let update = app.update(Event::TimerFired { id: focus_timer }, &mut model);
    assert!(browser_ops(&update.effects).is_empty());
}

#[test]
fn widening_past_breakpoint_closes_menu_after_debounce() {
    let (app, mut model) = started();
    let _ = app.update(Event::MenuOpenRequested { active: None }, &mut model);

    let resize = |width: f64| {
        Event::Resized(Box::new(Resize {
            viewport: Viewport {
                width,
                height: 800.0,
            },
            header_height: 80.0,
            sections: model_sections(),
            scroll: ScrollSample {
                offset: 0.0,
                document_height: 3_200.0,
                viewport_height: 800.0,
                at_ms: 10,
            },
        }))
    };

    let first = app.update(resize(700.0), &mut model);
    let first_timer = started_timers(&first.effects)[0];
    let second = app.update(resize(1_024.0), &mut model);
    // The debounce restarts on every resize.
    assert_eq!(cancelled_timers(&second.effects), vec![first_timer]);
    let timer = started_timers(&second.effects)[0];
    assert!(model.menu.is_open());

    let _ = app.update(Event::TimerFired { id: timer }, &mut model);
    assert!(!model.menu.is_open());
    assert!((model.layout.header_height - 80.0).abs() < f64::EPSILON);
    assert_eq!(app.view(&model).header.height, "80px");
}

fn model_sections() -> Vec<portfolio_shared::scroll::SectionBox> {
    common::layout().sections
}

#[test]
fn resize_moves_scroll_state_at_once_and_header_after_debounce() {
    let (app, mut model) = started();
    let mut sections = model_sections();
    for section in &mut sections {
        section.top *= 0.5;
    }
    let update = app.update(
        Event::Resized(Box::new(Resize {
            viewport: Viewport {
                width: 1_280.0,
                height: 800.0,
            },
            header_height: 64.0,
            sections,
            scroll: ScrollSample {
                offset: 1_200.0,
                document_height: 3_200.0,
                viewport_height: 800.0,
                at_ms: 10,
            },
        })),
        &mut model,
    );
    assert!(common::renders(&update.effects));
    let debounce = timer_for(&update.effects, Task::ApplyResize).expect("debounce started");

    let view = app.view(&model);
    assert!(view.header.scrolled);
    assert_eq!(view.scroll_progress, "50%");
    // Sections moved up: the probe at 1300 now lands in "contact", not "about".
    assert!(!view.nav_links[0].active);
    assert_eq!(view.header.height, "70px");

    let _ = app.update(Event::TimerFired { id: debounce }, &mut model);
    assert_eq!(app.view(&model).header.height, "64px");
}

#[test]
fn menu_without_focusables_opens_untrapped() {
    let mut s = startup();
    if let Some(menu) = s.layout.menu.as_mut() {
        menu.focusables.clear();
    }
    let (app, mut model) = started_with(s);

    let update = app.update(Event::MenuToggled { active: None }, &mut model);
    assert!(model.menu.is_open());
    assert_eq!(trap_listener(&browser_ops(&update.effects)), None);
    assert_eq!(timer_for(&update.effects, Task::FocusFirstMenuItem), None);
    assert!(!model.menu.has_trap_listener());

    let update = app.update(Event::MenuToggled { active: None }, &mut model);
    assert!(!model.menu.is_open());
    assert!(!browser_ops(&update.effects)
        .iter()
        .any(|op| matches!(op, BrowserOperation::Unlisten { .. })));
}

#[test]
fn anchor_click_scrolls_under_header_and_moves_focus() {
    let (app, mut model) = started();
    let _ = app.update(Event::MenuOpenRequested { active: None }, &mut model);

    let update = app.update(
        Event::AnchorClicked {
            href: "#about".into(),
        },
        &mut model,
    );
    let ops = browser_ops(&update.effects);
    assert!(!model.menu.is_open());
    // Section top 800, header 70, extra 20.
    assert!(ops.contains(&BrowserOperation::ScrollTo {
        top: 710.0,
        smooth: true
    }));
    assert!(ops.contains(&BrowserOperation::PushHistory {
        href: "#about".into()
    }));
    assert!(ops.contains(&BrowserOperation::FocusSection { element: id("about") }));
}

#[test]
fn unknown_anchor_does_nothing_but_close_menu() {
    let (app, mut model) = started();
    let update = app.update(
        Event::AnchorClicked {
            href: "#missing".into(),
        },
        &mut model,
    );
    assert!(browser_ops(&update.effects).is_empty());
}

#[test]
fn alt_digit_shortcut_navigates_and_announces() {
    let (app, mut model) = started();
    let update = app.update(Event::KeyPressed(KeyInput::new("2").with_alt()), &mut model);
    let ops = browser_ops(&update.effects);
    assert!(ops.contains(&BrowserOperation::ConsumeKey));
    assert!(ops.contains(&BrowserOperation::FocusSection { element: id("projects") }));
    assert_eq!(app.view(&model).live_region, "Navigated to projects section");
}

#[test]
fn teardown_releases_every_listener_including_trap() {
    let (app, mut model) = started();
    let listening = model.subscriptions.len();
    let _ = app.update(Event::MenuOpenRequested { active: None }, &mut model);
    assert_eq!(model.subscriptions.len(), listening + 1);

    let update = app.update(Event::Destroyed, &mut model);
    let unlistened = browser_ops(&update.effects)
        .iter()
        .filter(|op| matches!(op, BrowserOperation::Unlisten { .. }))
        .count();
    assert_eq!(unlistened, listening + 1);
    assert!(model.subscriptions.is_empty());
    assert!(!model.menu.is_open());

    // Events after teardown are ignored.
    let update = app.update(Event::MenuOpenRequested { active: None }, &mut model);
    assert!(update.effects.is_empty());
}
