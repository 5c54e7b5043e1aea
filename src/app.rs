use log::{info, warn};

use crate::behaviors::{
    accordion, contact_form, hero, lazy_images, nav_menu, scroll_effects, scroll_spy,
    smooth_scroll, theme,
};
use crate::config::{SiteCopy, PRIMARY_SPY, SIDE_SPY};
use crate::error::DomError;

/// State shared across behaviors during attachment.
pub struct Page {
    pub copy: SiteCopy,
    pub menus: nav_menu::Menus,
}

type Attach = fn(&Page) -> Result<(), DomError>;

/// Every behavior on the page, in attach order.
pub const BEHAVIORS: &[(&str, Attach)] = &[
    ("theme", |_| theme::attach()),
    ("hero", |page| hero::attach(&page.copy)),
    ("nav menus", |page| nav_menu::attach(&page.menus)),
    ("smooth scroll", |page| smooth_scroll::attach(&page.menus)),
    ("scroll spy", |_| scroll_spy::attach(PRIMARY_SPY)),
    ("side scroll spy", |_| scroll_spy::attach(SIDE_SPY)),
    ("parallax", |_| scroll_effects::attach_parallax()),
    ("header", |_| scroll_effects::attach_header()),
    ("side nav", |_| scroll_effects::attach_side_nav()),
    ("lazy images", |_| lazy_images::attach()),
    ("contact form", |page| contact_form::attach(&page.copy)),
    ("faq", |_| accordion::attach_faq()),
    ("programs", |_| accordion::attach_programs()),
];

/// Runs each entry of `table` in order. A failing entry is logged and
/// skipped; the rest still attach. Returns how many attached.
fn attach_all(page: &Page, table: &[(&str, Attach)]) -> usize {
    let mut attached = 0;
    for (name, attach) in table {
        match attach(page) {
            Ok(()) => attached += 1,
            Err(e) => warn!("{} not attached: {}", name, e),
        }
    }
    attached
}

/// Attaches every behavior once.
pub fn start() {
    let page = Page {
        copy: SiteCopy::default(),
        menus: nav_menu::Menus::default(),
    };
    let attached = attach_all(&page, BEHAVIORS);
    info!("{}/{} behaviors attached", attached, BEHAVIORS.len());
}
