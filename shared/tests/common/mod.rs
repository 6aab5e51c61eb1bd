#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_kv::KeyValueOperation;
use portfolio_shared::capabilities::{BrowserOperation, TimerId, TimerOperation};
use portfolio_shared::config::SiteConfig;
use portfolio_shared::dom::ElementId;
use portfolio_shared::event::{Environment, PageLayout, ScrollSample, Startup, Support, Viewport};
use portfolio_shared::filter::{CardLink, FilterControl, ProjectCard};
use portfolio_shared::navigation::MenuLayout;
use portfolio_shared::scroll::{NavLink, SectionBox};
use portfolio_shared::timing::Task;
use portfolio_shared::{App, Effect, Event, Model};

pub type Tester = AppTester<App, Effect>;

pub fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

pub fn environment() -> Environment {
    Environment {
        viewport: Viewport {
            width: 390.0,
            height: 800.0,
        },
        support: Support::all(),
        ..Environment::default()
    }
}

pub fn layout() -> PageLayout {
    let sections = ["home", "about", "projects", "contact"]
        .iter()
        .enumerate()
        .map(|(i, name)| SectionBox {
            id: id(name),
            top: i as f64 * 800.0,
            height: 800.0,
        })
        .collect();
    let card = |n: u32, category: &str| ProjectCard {
        id: id(&format!("card-{n}")),
        category: category.to_string(),
        link: Some(CardLink {
            id: id(&format!("card-{n}-link")),
            text: format!("Project {n}"),
        }),
    };
    PageLayout {
        header_height: 70.0,
        sections,
        nav_links: vec![NavLink {
            id: id("nav-about"),
            href: "#about".into(),
        }],
        menu: Some(MenuLayout {
            container: id("mobile-menu"),
            focusables: vec![id("m-home"), id("m-about"), id("m-contact")],
        }),
        filters: ["all", "web", "ml"]
            .into_iter()
            .map(|key| FilterControl {
                id: id(&format!("filter-{key}")),
                key: key.to_string(),
            })
            .collect(),
        cards: vec![card(1, "web"), card(2, "ml"), card(3, "web")],
        form: Some(Vec::new()),
        ..PageLayout::default()
    }
}

pub fn startup() -> Startup {
    Startup {
        environment: environment(),
        layout: layout(),
        scroll: ScrollSample {
            offset: 0.0,
            document_height: 3_200.0,
            viewport_height: 800.0,
            at_ms: 0,
        },
        config_json: None,
        page_url: Some("https://portfolio.example/".into()),
    }
}

/// A started app with the effects of startup already discarded.
pub fn started() -> (Tester, Model) {
    started_with(startup())
}

pub fn started_with(startup: Startup) -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();
    let _ = app.update(Event::Started(Box::new(startup)), &mut model);
    (app, model)
}

pub fn browser_ops(effects: &[Effect]) -> Vec<BrowserOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Browser(req) => Some(req.operation.clone()),
            _ => None,
        })
        .collect()
}

pub fn timer_ops(effects: &[Effect]) -> Vec<TimerOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Timer(req) => Some(req.operation.clone()),
            _ => None,
        })
        .collect()
}

pub fn started_timers(effects: &[Effect]) -> Vec<TimerId> {
    timer_ops(effects)
        .into_iter()
        .filter_map(|op| match op {
            TimerOperation::Start { id, .. } => Some(id),
            TimerOperation::Cancel { .. } => None,
        })
        .collect()
}

pub fn cancelled_timers(effects: &[Effect]) -> Vec<TimerId> {
    timer_ops(effects)
        .into_iter()
        .filter_map(|op| match op {
            TimerOperation::Cancel { id } => Some(id),
            TimerOperation::Start { .. } => None,
        })
        .collect()
}

/// Timer started for `task`, told apart by its default delay.
pub fn timer_for(effects: &[Effect], task: Task) -> Option<TimerId> {
    let delay = task.delay_ms(&SiteConfig::default());
    timer_ops(effects).into_iter().find_map(|op| match op {
        TimerOperation::Start { id, millis } if millis == delay => Some(id),
        _ => None,
    })
}

pub fn key_value_ops(effects: &[Effect]) -> Vec<KeyValueOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::KeyValue(req) => Some(req.operation.clone()),
            _ => None,
        })
        .collect()
}

pub fn renders(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Render(_)))
}

pub fn http_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Http(_)))
        .count()
}
