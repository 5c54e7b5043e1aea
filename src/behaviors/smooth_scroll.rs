use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::behaviors::nav_menu::Menus;
use crate::dom;
use crate::error::DomError;

/// Fragment id for same-page links: `#about` gives `about`, a bare `#` or
/// anything else gives `None`.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

fn scroll_to(target: &Element, id: &str, menus: &Menus) -> Result<(), DomError> {
    menus.close_all();

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);

    dom::window()?
        .history()?
        .push_state_with_url(&JsValue::NULL, "", Some(&format!("#{}", id)))?;
    Ok(())
}

pub fn attach(menus: &Menus) -> Result<(), DomError> {
    for link in dom::query_all(r##"a[href^="#"]"##)? {
        let menus = menus.clone();
        let anchor = link.clone();
        dom::on(&link, "click", move |event| {
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            let Some(id) = fragment_target(&href) else {
                return;
            };
            // Unknown targets keep the browser's default behavior.
            let Ok(Some(target)) = dom::by_id(id) else {
                return;
            };
            event.prevent_default();
            if let Err(e) = scroll_to(&target, id, &menus) {
                debug!("smooth scroll to #{} failed: {}", id, e);
            }
        })?;
    }
    Ok(())
}
