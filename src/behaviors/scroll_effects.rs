use web_sys::{Element, HtmlElement};

use crate::config::{
    HEADER_OFFSET, PARALLAX_EPSILON, PARALLAX_FACTOR, PARALLAX_MAX_OFFSET, PARALLAX_SCALE,
    SIDE_NAV_THRESHOLD,
};
use crate::dom;
use crate::error::DomError;

pub fn parallax_offset(scroll_y: f64) -> f64 {
    (scroll_y * PARALLAX_FACTOR).min(PARALLAX_MAX_OFFSET)
}

pub fn parallax_transform(offset: f64) -> String {
    format!("translateY({}px) scale({})", offset, PARALLAX_SCALE)
}

/// Remembers the last offset written so near-identical scroll positions
/// don't touch the style again.
#[derive(Debug, Default)]
pub struct Parallax {
    last: f64,
}

impl Parallax {
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<f64> {
        let offset = parallax_offset(scroll_y);
        if (offset - self.last).abs() > PARALLAX_EPSILON {
            self.last = offset;
            Some(offset)
        } else {
            None
        }
    }
}

pub fn header_scrolled(scroll_y: f64, hero_height: f64) -> bool {
    scroll_y > hero_height - HEADER_OFFSET
}

pub fn side_nav_visible(scroll_y: f64) -> bool {
    scroll_y > SIDE_NAV_THRESHOLD
}

pub fn attach_parallax() -> Result<(), DomError> {
    let image: HtmlElement = dom::query(".hero-img")?;
    let mut parallax = Parallax::default();
    dom::on_passive(&*dom::document()?, "scroll", move |_| {
        if let Some(offset) = parallax.on_scroll(dom::scroll_y()) {
            let _ = image
                .style()
                .set_property("transform", &parallax_transform(offset));
        }
    })
}

fn render_header(header: &Element) {
    let hero_height = dom::try_query(".hero")
        .ok()
        .flatten()
        .map(|hero| hero.get_bounding_client_rect().height())
        .unwrap_or(0.0);
    if header_scrolled(dom::scroll_y(), hero_height) {
        let _ = header.remove_attribute("aria-hidden");
        dom::set_class(header, "scrolled", true);
    } else {
        let _ = header.set_attribute("aria-hidden", "true");
        dom::set_class(header, "scrolled", false);
    }
}

pub fn attach_header() -> Result<(), DomError> {
    let header: Element = dom::query(".site-header")?;
    render_header(&header);
    dom::on_passive(&*dom::document()?, "scroll", move |_| render_header(&header))
}

pub fn attach_side_nav() -> Result<(), DomError> {
    let side_nav: Element = dom::query(".side-nav")?;
    dom::set_class(&side_nav, "visible", side_nav_visible(dom::scroll_y()));
    dom::on_passive(&*dom::document()?, "scroll", move |_| {
        dom::set_class(&side_nav, "visible", side_nav_visible(dom::scroll_y()));
    })
}
