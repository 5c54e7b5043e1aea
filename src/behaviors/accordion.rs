use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, KeyboardEvent};

use crate::behaviors::nav_menu::aria_expanded;
use crate::dom;
use crate::error::DomError;

/// Open state of one disclosure group. At most one item is open.
#[derive(Debug, Default)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    #[cfg(test)]
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    pub fn with_open(len: usize, open: Option<usize>) -> Self {
        Self {
            len,
            open: open.filter(|&item| item < len),
        }
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, item: usize) -> bool {
        self.open == Some(item)
    }

    /// Opens `item` (closing whichever was open) or closes it if it already
    /// was. Returns the `(item, open)` changes to render.
    pub fn toggle(&mut self, item: usize) -> Vec<(usize, bool)> {
        if item >= self.len {
            return Vec::new();
        }
        if self.open == Some(item) {
            self.open = None;
            return vec![(item, false)];
        }
        let mut changes = Vec::with_capacity(2);
        if let Some(previous) = self.open.replace(item) {
            changes.push((previous, false));
        }
        changes.push((item, true));
        changes
    }
}

pub fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

struct Item {
    root: Element,
    trigger: Option<Element>,
}

impl Item {
    fn render(&self, open: bool) {
        dom::set_class(&self.root, "open", open);
        if let Some(trigger) = &self.trigger {
            let _ = trigger.set_attribute("aria-expanded", aria_expanded(open));
        }
    }
}

#[derive(Clone)]
struct Group {
    state: Rc<RefCell<Accordion>>,
    items: Rc<Vec<Item>>,
}

impl Group {
    fn new(items: Vec<Item>, open: Option<usize>) -> Self {
        let group = Self {
            state: Rc::new(RefCell::new(Accordion::with_open(items.len(), open))),
            items: Rc::new(items),
        };
        let state = group.state.borrow();
        debug!("accordion of {} items, open: {:?}", group.items.len(), state.open_item());
        for (index, item) in group.items.iter().enumerate() {
            item.render(state.is_open(index));
        }
        drop(state);
        group
    }

    fn toggle(&self, item: usize) {
        let changes = self.state.borrow_mut().toggle(item);
        for (index, open) in changes {
            if let Some(item) = self.items.get(index) {
                item.render(open);
            }
        }
    }

    fn bind_click(&self, target: &Element, item: usize) -> Result<(), DomError> {
        let group = self.clone();
        dom::on(target, "click", move |_| group.toggle(item))
    }

    fn bind_keys(&self, target: &Element, item: usize) -> Result<(), DomError> {
        let group = self.clone();
        dom::on(target, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
                return;
            };
            if is_activation_key(&key) {
                event.prevent_default();
                group.toggle(item);
            }
        })
    }
}

/// FAQ entries: `.faq-item` with a `.faq-q` trigger and `.faq-a` panel.
pub fn attach_faq() -> Result<(), DomError> {
    for panel in dom::query_all(".faq-a[hidden]")? {
        let _ = panel.remove_attribute("hidden");
    }

    let mut items = Vec::new();
    for root in dom::query_all(".faq-item")? {
        match dom::query_in::<Element>(&root, ".faq-q") {
            Ok(trigger) => items.push(Item {
                root,
                trigger: Some(trigger),
            }),
            Err(e) => debug!("skipping faq item: {}", e),
        }
    }

    let open = items.iter().position(|item| {
        item.trigger
            .as_ref()
            .and_then(|t| t.get_attribute("aria-expanded"))
            .as_deref()
            == Some("true")
    });
    let group = Group::new(items, open);

    for (index, item) in group.items.iter().enumerate() {
        let Some(trigger) = &item.trigger else {
            continue;
        };
        group.bind_click(trigger, index)?;
        // Native buttons already turn Enter/Space into clicks.
        if !trigger.is_instance_of::<HtmlButtonElement>() {
            group.bind_keys(trigger, index)?;
        }
    }
    Ok(())
}

/// Program cards: `.program-expand` with a `.program-body`. All start closed.
pub fn attach_programs() -> Result<(), DomError> {
    let mut items = Vec::new();
    for root in dom::query_all(".program-expand")? {
        match dom::query_in::<Element>(&root, ".program-body") {
            Ok(_) => items.push(Item {
                root,
                trigger: None,
            }),
            Err(e) => debug!("skipping program card: {}", e),
        }
    }

    let group = Group::new(items, None);
    for (index, item) in group.items.iter().enumerate() {
        group.bind_click(&item.root, index)?;
        group.bind_keys(&item.root, index)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_count(accordion: &Accordion, len: usize) -> usize {
        (0..len).filter(|&i| accordion.is_open(i)).count()
    }

    #[test]
    fn opening_one_closes_the_other() {
        let mut accordion = Accordion::new(3);
        assert_eq!(accordion.toggle(0), vec![(0, true)]);
        assert_eq!(accordion.toggle(2), vec![(0, false), (2, true)]);
        assert_eq!(accordion.open_item(), Some(2));
    }

    #[test]
    fn clicking_the_open_item_closes_everything() {
        let mut accordion = Accordion::new(3);
        accordion.toggle(1);
        assert_eq!(accordion.toggle(1), vec![(1, false)]);
        assert_eq!(accordion.open_item(), None);
        assert_eq!(open_count(&accordion, 3), 0);
    }

    #[test]
    fn out_of_range_clicks_are_ignored() {
        let mut accordion = Accordion::new(2);
        accordion.toggle(0);
        assert!(accordion.toggle(7).is_empty());
        assert_eq!(accordion.open_item(), Some(0));
    }

    #[test]
    fn initial_open_item_must_exist() {
        assert_eq!(Accordion::with_open(2, Some(1)).open_item(), Some(1));
        assert_eq!(Accordion::with_open(2, Some(5)).open_item(), None);
    }

    #[test]
    fn never_more_than_one_open() {
        let mut accordion = Accordion::new(4);
        for click in [0, 1, 1, 3, 2, 2, 2, 0, 3, 3] {
            accordion.toggle(click);
            assert!(open_count(&accordion, 4) <= 1);
        }
        assert_eq!(accordion.open_item(), None);
    }

    #[test]
    fn enter_and_space_activate() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
        assert!(!is_activation_key("Spacebar"));
    }
}
