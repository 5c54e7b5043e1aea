use gloo_net::http::Request;
use log::{debug, info};
use serde::Deserialize;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use crate::config::{SiteCopy, DESIGN_URL};
use crate::dom;
use crate::error::DomError;

#[derive(Debug, Deserialize)]
struct Design {
    hero: Option<HeroSection>,
}

#[derive(Debug, Deserialize)]
struct HeroSection {
    content: Option<HeroContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeroContent {
    title: Option<String>,
    subtitle: Option<String>,
    title_style: Option<TitleStyle>,
    #[serde(default)]
    cta_buttons: Vec<CtaButton>,
}

#[derive(Debug, Deserialize)]
struct TitleStyle {
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CtaButton {
    label: Option<String>,
    href: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cta {
    pub label: String,
    pub href: String,
}

/// What gets rendered into the hero mount point.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroView {
    pub title: String,
    pub title_size: String,
    pub subtitle: String,
    pub primary: Cta,
    pub secondary: Option<Cta>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn cta(button: Option<&CtaButton>, label: &str, href: &str) -> Cta {
    Cta {
        label: button
            .and_then(|b| non_empty(&b.label))
            .unwrap_or(label)
            .to_string(),
        href: button
            .and_then(|b| non_empty(&b.href))
            .unwrap_or(href)
            .to_string(),
    }
}

impl HeroView {
    /// `None` when the document isn't JSON of the expected shape or has no
    /// `hero` record. Missing fields inside the record fall back to `copy`.
    pub fn parse(text: &str, copy: &SiteCopy) -> Option<HeroView> {
        let design: Design = match serde_json::from_str(text) {
            Ok(design) => design,
            Err(e) => {
                debug!("design descriptor rejected: {}", e);
                return None;
            }
        };
        let content = design.hero?.content.unwrap_or_default();

        let title = non_empty(&content.title)
            .unwrap_or(copy.hero_title)
            .replace("\n+", " – ");
        let title_size = content
            .title_style
            .as_ref()
            .and_then(|style| non_empty(&style.size))
            .unwrap_or(copy.hero_title_size)
            .to_string();
        let subtitle = content.subtitle.clone().unwrap_or_default();

        let buttons = &content.cta_buttons;
        let primary = cta(buttons.first(), copy.hero_primary_label, copy.hero_primary_href);
        let secondary = buttons.get(1).map(|b| {
            cta(Some(b), copy.hero_secondary_label, copy.hero_secondary_href)
        });

        Some(HeroView {
            title,
            title_size,
            subtitle,
            primary,
            secondary,
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct HeroProps {
    pub view: HeroView,
}

#[function_component(HeroBlock)]
pub fn hero_block(props: &HeroProps) -> Html {
    let view = &props.view;
    html! {
        <>
            <h1 class="title" style={format!("font-size: {}", view.title_size)}>
                {&view.title}
            </h1>
            <p class="subtitle">{&view.subtitle}</p>
            <div class="buttons">
                <a href={view.primary.href.clone()} class="btn btn-primary">
                    {&view.primary.label}
                </a>
                {
                    if let Some(secondary) = &view.secondary {
                        html! {
                            <a href={secondary.href.clone()} class="btn btn-outline">
                                {&secondary.label}
                            </a>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </>
    }
}

async fn fetch_design() -> Result<String, gloo_net::Error> {
    let response = Request::get(DESIGN_URL).send().await?;
    if !response.ok() {
        return Err(gloo_net::Error::GlooError(format!(
            "status {}",
            response.status()
        )));
    }
    response.text().await
}

/// Where the hero block is inserted. The renderer clears whatever element
/// it mounts into, so the block gets a fresh child and markup already in the
/// host stays.
pub trait HeroHost {
    type Slot;

    fn append_slot(&self) -> Result<Self::Slot, DomError>;
}

impl HeroHost for Element {
    type Slot = Element;

    fn append_slot(&self) -> Result<Element, DomError> {
        let slot = dom::document()?.create_element("div")?;
        slot.set_class_name("hero-dyn-content");
        self.append_child(&slot)?;
        Ok(slot)
    }
}

/// Parses the descriptor and only then appends a slot for it. Nothing is
/// added to `host` when the descriptor is unusable.
pub fn insert<H: HeroHost>(
    host: &H,
    text: &str,
    copy: &SiteCopy,
) -> Result<Option<(H::Slot, HeroView)>, DomError> {
    let Some(view) = HeroView::parse(text, copy) else {
        return Ok(None);
    };
    Ok(Some((host.append_slot()?, view)))
}

pub fn attach(copy: &SiteCopy) -> Result<(), DomError> {
    let mount: Element = dom::query("#hero-dyn")?;
    let copy = copy.clone();
    spawn_local(async move {
        let text = match fetch_design().await {
            Ok(text) => text,
            Err(e) => {
                debug!("no design descriptor: {}", e);
                return;
            }
        };
        match insert(&mount, &text, &copy) {
            Ok(Some((slot, view))) => {
                info!("hero content loaded");
                yew::Renderer::<HeroBlock>::with_root_and_props(slot, HeroProps { view }).render();
            }
            Ok(None) => {}
            Err(e) => debug!("hero slot not created: {}", e),
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Host whose children are just names.
    struct FakeHost {
        children: RefCell<Vec<String>>,
    }

    impl FakeHost {
        fn with_static_markup() -> Self {
            Self {
                children: RefCell::new(vec!["static-title".to_string()]),
            }
        }
    }

    impl HeroHost for FakeHost {
        type Slot = usize;

        fn append_slot(&self) -> Result<usize, DomError> {
            let mut children = self.children.borrow_mut();
            children.push("hero-dyn-content".to_string());
            Ok(children.len() - 1)
        }
    }

    fn copy() -> SiteCopy {
        SiteCopy::icelandic()
    }

    #[test]
    fn full_descriptor_is_used_verbatim() {
        let text = r##"{
            "hero": {
                "content": {
                    "title": "Coach Kolla\n+Fjarþjálfun",
                    "subtitle": "Styrkur og úthald",
                    "titleStyle": { "size": "3rem" },
                    "ctaButtons": [
                        { "label": "Byrja", "href": "#contact" },
                        { "label": "Prógrömm", "href": "#programs" },
                        { "label": "Ignored", "href": "#faq" }
                    ]
                }
            }
        }"##;
        let view = HeroView::parse(text, &copy()).unwrap();
        assert_eq!(view.title, "Coach Kolla – Fjarþjálfun");
        assert_eq!(view.title_size, "3rem");
        assert_eq!(view.subtitle, "Styrkur og úthald");
        assert_eq!(view.primary.label, "Byrja");
        assert_eq!(
            view.secondary,
            Some(Cta {
                label: "Prógrömm".to_string(),
                href: "#programs".to_string()
            })
        );
    }

    #[test]
    fn empty_hero_falls_back_to_copy() {
        let view = HeroView::parse(r#"{"hero": {}}"#, &copy()).unwrap();
        assert_eq!(view.title, "Coach Kolla");
        assert_eq!(view.title_size, "clamp(2rem,5vw,4rem)");
        assert_eq!(view.subtitle, "");
        assert_eq!(view.primary.href, "#contact");
        assert_eq!(view.primary.label, "Skrá mig í fjarþjálfun");
        assert_eq!(view.secondary, None);
    }

    #[test]
    fn second_button_fields_fall_back_individually() {
        let text = r#"{"hero": {"content": {"ctaButtons": [{}, {"label": "Meira"}]}}}"#;
        let view = HeroView::parse(text, &copy()).unwrap();
        let secondary = view.secondary.unwrap();
        assert_eq!(secondary.label, "Meira");
        assert_eq!(secondary.href, "#programs");
    }

    #[test]
    fn malformed_or_missing_hero_yields_nothing() {
        assert_eq!(HeroView::parse("", &copy()), None);
        assert_eq!(HeroView::parse("<html>404</html>", &copy()), None);
        assert_eq!(HeroView::parse("null", &copy()), None);
        assert_eq!(HeroView::parse(r#"{"footer": {}}"#, &copy()), None);
        assert_eq!(HeroView::parse(r#"{"hero": null}"#, &copy()), None);
        assert_eq!(
            HeroView::parse(r#"{"hero": {"content": {"ctaButtons": "nope"}}}"#, &copy()),
            None
        );
    }

    #[test]
    fn loaded_hero_is_appended_after_existing_markup() {
        let host = FakeHost::with_static_markup();
        let (slot, view) = insert(&host, r#"{"hero": {}}"#, &copy()).unwrap().unwrap();
        assert_eq!(slot, 1);
        assert_eq!(view.title, "Coach Kolla");
        assert_eq!(
            *host.children.borrow(),
            vec!["static-title".to_string(), "hero-dyn-content".to_string()]
        );
    }

    #[test]
    fn unusable_descriptor_leaves_host_untouched() {
        let host = FakeHost::with_static_markup();
        for text in ["", "{", r#"{"hero": null}"#, r#"{"other": 1}"#] {
            assert!(insert(&host, text, &copy()).unwrap().is_none());
        }
        assert_eq!(*host.children.borrow(), vec!["static-title".to_string()]);
    }
}
