use std::collections::HashSet;

use log::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Reflect;
use web_sys::{Element, HtmlImageElement};

use crate::dom;
use crate::error::DomError;

/// Tracks which staged images are still waiting to be loaded. Each image is
/// released at most once.
#[derive(Debug, Default)]
pub struct LazyQueue {
    pending: HashSet<usize>,
}

impl LazyQueue {
    pub fn new(count: usize) -> Self {
        Self {
            pending: (0..count).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// True the first time `image` becomes visible.
    pub fn release(&mut self, image: usize, intersecting: bool) -> bool {
        intersecting && self.pending.remove(&image)
    }
}

/// Source to load: the staged `data-src`, else whatever is already set.
pub fn staged_source(data_src: Option<&str>, current: &str) -> String {
    data_src
        .filter(|src| !src.is_empty())
        .unwrap_or(current)
        .to_string()
}

fn native_lazy_loading() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    Reflect::get(&window, &JsValue::from_str("HTMLImageElement"))
        .and_then(|ctor| Reflect::get(&ctor, &JsValue::from_str("prototype")))
        .and_then(|proto| Reflect::has(&proto, &JsValue::from_str("loading")))
        .unwrap_or(false)
}

pub fn attach() -> Result<(), DomError> {
    if native_lazy_loading() {
        debug!("native lazy loading available");
        return Ok(());
    }

    let images: Vec<Element> = dom::query_all(r#"img[loading="lazy"]"#)?;
    info!("lazy loading {} images", images.len());
    let mut queue = LazyQueue::new(images.len());
    let tracked = images.clone();

    dom::observe(&images, None, move |entries, observer| {
        for entry in entries {
            let target = entry.target();
            let Some(index) = tracked.iter().position(|img| *img == target) else {
                continue;
            };
            if !queue.release(index, entry.is_intersecting()) {
                continue;
            }
            if let Ok(image) = target.clone().dyn_into::<HtmlImageElement>() {
                let src = staged_source(image.get_attribute("data-src").as_deref(), &image.src());
                image.set_src(&src);
            }
            observer.unobserve(&target);
            debug!("{} lazy images pending", queue.remaining());
        }
    })?;
    Ok(())
}
