//! Deterministic projection of the [`Model`] onto document attributes,
//! classes and style variables. The shell applies it verbatim after every
//! render.

use serde::{Deserialize, Serialize};

use crate::dom::{self, ElementId};
use crate::filter::CardPresence;
use crate::form::{Banner, ContactForm};
use crate::model::Model;
use crate::scroll::parallax_offset;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ThemeView {
    /// `data-theme` on the root element.
    pub mode: String,
    /// `aria-label` and `title` of every toggle control.
    pub toggle_label: String,
    /// `<meta name="theme-color">`.
    pub meta_color: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct MenuView {
    pub open: bool,
    pub aria_hidden: bool,
    pub toggle_expanded: bool,
    /// `overflow: hidden` on the body while the menu is open.
    pub body_scroll_locked: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HeaderView {
    pub scrolled: bool,
    /// `--header-height`.
    pub height: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NavLinkView {
    pub id: ElementId,
    pub active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParallaxView {
    pub id: ElementId,
    pub transform: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FilterButtonView {
    pub id: ElementId,
    pub active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CardView {
    pub id: ElementId,
    pub presence: CardPresence,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub error: Option<String>,
    pub error_id: ElementId,
    pub aria_invalid: bool,
    /// `aria-describedby`, set only while an error is shown.
    pub described_by: Option<ElementId>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CounterView {
    pub text: String,
    pub warning: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SubmitView {
    pub text: String,
    pub disabled: bool,
    pub class: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BannerView {
    pub message: String,
    pub class: String,
    pub role: String,
}

impl From<&Banner> for BannerView {
    fn from(banner: &Banner) -> Self {
        Self {
            message: banner.message.clone(),
            class: banner.class(),
            role: "alert".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub counter: Option<CounterView>,
    pub submit: SubmitView,
    pub banner: Option<BannerView>,
    /// Input values as the core knows them; empty after a successful send.
    pub values: Vec<(String, String)>,
}

impl From<&ContactForm> for FormView {
    fn from(form: &ContactForm) -> Self {
        let button = form.button();
        Self {
            fields: form
                .fields()
                .iter()
                .map(|field| {
                    let error = field.error.as_ref().map(ToString::to_string);
                    let error_id = dom::field_error_id(&field.spec.name);
                    FieldView {
                        name: field.spec.name.clone(),
                        aria_invalid: error.is_some(),
                        described_by: error.as_ref().map(|_| error_id.clone()),
                        error,
                        error_id,
                    }
                })
                .collect(),
            counter: form.counter().map(|c| CounterView {
                text: c.text(),
                warning: c.warning,
            }),
            submit: SubmitView {
                text: button.text().to_string(),
                disabled: button.disabled(),
                class: button.class().map(str::to_string),
            },
            banner: form.banner().map(BannerView::from),
            values: form
                .values()
                .into_iter()
                .map(|v| (v.name, v.value))
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ImageView {
    /// `loading` class, real source still in `data-src`.
    Loading { id: ElementId },
    Loaded { id: ElementId, src: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RevealView {
    pub id: ElementId,
    /// `visible` once intersected, `fade-in` before.
    pub visible: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub theme: ThemeView,
    pub high_contrast: bool,
    pub menu: MenuView,
    pub header: HeaderView,
    /// `--scroll-progress`.
    pub scroll_progress: String,
    pub nav_links: Vec<NavLinkView>,
    pub parallax: Vec<ParallaxView>,
    pub filters: Vec<FilterButtonView>,
    pub cards: Vec<CardView>,
    pub form: Option<FormView>,
    pub live_region: String,
    pub focus_visible: Option<ElementId>,
    pub reveal: Vec<RevealView>,
    pub images: Vec<ImageView>,
}

fn css_number(value: f64) -> String {
    // `-0` would leak into CSS as "-0".
    format!("{}", value + 0.0)
}

impl ViewModel {
    pub fn project(model: &Model) -> Self {
        let mode = model.theme.mode();
        let metrics = model.scroll.metrics();
        let menu_open = model.menu.is_open();

        let parallax = if model.parallax_enabled() {
            model
                .layout
                .parallax
                .iter()
                .map(|layer| ParallaxView {
                    id: layer.id.clone(),
                    transform: format!(
                        "translateY({}px)",
                        css_number(parallax_offset(metrics.offset, layer.speed()))
                    ),
                })
                .collect()
        } else {
            Vec::new()
        };

        let reveal = model
            .layout
            .reveal_targets
            .iter()
            .map(|id| RevealView {
                id: id.clone(),
                visible: model.media.is_revealed(id),
            })
            .collect();

        let images = model
            .media
            .pending_images()
            .map(|image| ImageView::Loading {
                id: image.id.clone(),
            })
            .chain(model.media.loaded().iter().map(|image| ImageView::Loaded {
                id: image.id.clone(),
                src: image.src.clone(),
            }))
            .collect();

        Self {
            theme: ThemeView {
                mode: mode.as_str().to_string(),
                toggle_label: mode.toggle_label().to_string(),
                meta_color: mode.meta_color().to_string(),
            },
            high_contrast: model.a11y.high_contrast,
            menu: MenuView {
                open: menu_open,
                aria_hidden: !menu_open,
                toggle_expanded: menu_open,
                body_scroll_locked: menu_open,
            },
            header: HeaderView {
                scrolled: metrics.header_collapsed,
                height: format!("{}px", css_number(model.layout.header_height)),
            },
            scroll_progress: format!("{}%", css_number(metrics.progress)),
            nav_links: model
                .layout
                .nav_links
                .iter()
                .map(|link| NavLinkView {
                    id: link.id.clone(),
                    active: metrics
                        .active_section
                        .as_ref()
                        .is_some_and(|section| link.targets(section)),
                })
                .collect(),
            parallax,
            filters: model
                .layout
                .filters
                .iter()
                .map(|control| FilterButtonView {
                    id: control.id.clone(),
                    active: control.key == model.filter.active(),
                })
                .collect(),
            cards: model
                .filter
                .cards()
                .map(|(id, presence)| CardView {
                    id: id.clone(),
                    presence: *presence,
                })
                .collect(),
            form: model.form.as_ref().map(FormView::from),
            live_region: model.a11y.announcer.message().unwrap_or_default().to_string(),
            focus_visible: model.a11y.focus_visible().cloned(),
            reveal,
            images,
        }
    }
}
