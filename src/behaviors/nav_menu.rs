use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom;
use crate::error::DomError;

/// Open/closed state of every small-viewport menu on the page, one slot per
/// `.nav` instance. Instances never affect each other.
#[derive(Debug, Default)]
pub struct MenuRegistry {
    open: Vec<bool>,
}

impl MenuRegistry {
    /// Adds a menu in the state its markup starts in.
    pub fn register(&mut self, open: bool) -> usize {
        self.open.push(open);
        self.open.len() - 1
    }

    pub fn is_open(&self, menu: usize) -> bool {
        self.open.get(menu).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, menu: usize) -> bool {
        if let Some(open) = self.open.get_mut(menu) {
            *open = !*open;
        }
        self.is_open(menu)
    }

    /// Returns whether the menu was open.
    pub fn close(&mut self, menu: usize) -> bool {
        self.open
            .get_mut(menu)
            .map(|open| std::mem::replace(open, false))
            .unwrap_or(false)
    }

    /// Closes every menu, returning the ones that were open.
    pub fn close_all(&mut self) -> Vec<usize> {
        (0..self.open.len()).filter(|&m| self.close(m)).collect()
    }
}

pub fn aria_expanded(open: bool) -> &'static str {
    if open {
        "true"
    } else {
        "false"
    }
}

struct MenuElements {
    toggle: Element,
    menu: Element,
}

impl MenuElements {
    fn render(&self, open: bool) {
        dom::set_class(&self.menu, "open", open);
        let _ = self.toggle.set_attribute("aria-expanded", aria_expanded(open));
    }
}

/// Shared handle used by the nav toggles and by the smooth-scroll router.
#[derive(Clone, Default)]
pub struct Menus {
    state: Rc<RefCell<MenuRegistry>>,
    elements: Rc<RefCell<Vec<MenuElements>>>,
}

impl Menus {
    pub fn close_all(&self) {
        let closed = self.state.borrow_mut().close_all();
        let elements = self.elements.borrow();
        for menu in closed {
            if let Some(el) = elements.get(menu) {
                el.render(false);
            }
        }
    }

    fn toggle(&self, menu: usize) {
        let open = self.state.borrow_mut().toggle(menu);
        debug!("menu {} open: {}", menu, open);
        if let Some(el) = self.elements.borrow().get(menu) {
            el.render(open);
        }
    }

    fn close(&self, menu: usize) {
        self.state.borrow_mut().close(menu);
        if let Some(el) = self.elements.borrow().get(menu) {
            el.render(false);
        }
    }
}

pub fn attach(menus: &Menus) -> Result<(), DomError> {
    for nav in dom::query_all(".nav")? {
        let (toggle, menu) = match (
            dom::query_in::<Element>(&nav, ".nav-toggle"),
            dom::query_in::<Element>(&nav, ".nav-menu"),
        ) {
            (Ok(toggle), Ok(menu)) => (toggle, menu),
            (Err(e), _) | (_, Err(e)) => {
                debug!("skipping nav without menu parts: {}", e);
                continue;
            }
        };

        let open = menu.class_list().contains("open");
        let index = menus.state.borrow_mut().register(open);
        let elements = MenuElements {
            toggle: toggle.clone(),
            menu: menu.clone(),
        };
        elements.render(open);
        menus.elements.borrow_mut().push(elements);

        let handle = menus.clone();
        dom::on(&toggle, "click", move |_| handle.toggle(index))?;

        let handle = menus.clone();
        dom::on(&menu, "click", move |event| {
            let clicked_link = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map(|el| el.matches("a").unwrap_or(false))
                .unwrap_or(false);
            if clicked_link {
                handle.close(index);
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_flips_only_that_menu() {
        let mut registry = MenuRegistry::default();
        let hero = registry.register(false);
        let header = registry.register(false);

        assert!(registry.toggle(hero));
        assert!(registry.is_open(hero));
        assert!(!registry.is_open(header));

        assert!(!registry.toggle(hero));
        assert!(!registry.is_open(hero));
    }

    #[test]
    fn close_all_reports_previously_open_menus() {
        let mut registry = MenuRegistry::default();
        let a = registry.register(false);
        let b = registry.register(false);
        let c = registry.register(false);
        registry.toggle(a);
        registry.toggle(c);

        assert_eq!(registry.close_all(), vec![a, c]);
        assert!(!registry.is_open(b));
        assert!(registry.close_all().is_empty());
    }

    #[test]
    fn closing_a_closed_menu_is_a_no_op() {
        let mut registry = MenuRegistry::default();
        let menu = registry.register(false);
        assert!(!registry.close(menu));
        assert!(!registry.close(42));
        assert!(!registry.toggle(42));
    }

    #[test]
    fn menus_open_in_markup_close_in_one_step() {
        let mut registry = MenuRegistry::default();
        let hero = registry.register(true);
        let header = registry.register(false);
        assert!(registry.is_open(hero));
        assert!(!registry.toggle(hero));

        let mut registry = MenuRegistry::default();
        registry.register(true);
        registry.register(false);
        assert_eq!(registry.close_all(), vec![0]);
        assert!(!registry.is_open(header));
    }

    #[test]
    fn expanded_attribute_mirrors_state() {
        assert_eq!(aria_expanded(true), "true");
        assert_eq!(aria_expanded(false), "false");
    }
}
