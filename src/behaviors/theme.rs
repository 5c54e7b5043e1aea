use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use web_sys::{Element, HtmlElement};

use crate::config::THEME_STORAGE_KEY;
use crate::dom;
use crate::error::DomError;
use crate::storage::{LocalStore, PreferenceStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    /// Value for the toggle's `aria-pressed`.
    pub fn pressed(self) -> &'static str {
        match self {
            Theme::Light => "false",
            Theme::Dark => "true",
        }
    }

    /// The toggle shows the theme you would switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Dark => r#"<i class="fa-solid fa-sun" aria-hidden="true"></i>"#,
            Theme::Light => r#"<i class="fa-solid fa-moon" aria-hidden="true"></i>"#,
        }
    }
}

/// Stored preference, then system preference. Dark if storage can't be read.
pub fn resolve_initial(store: &impl PreferenceStore, prefers_dark: bool) -> Theme {
    match store.get(THEME_STORAGE_KEY) {
        Ok(saved) => saved
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light }),
        Err(e) => {
            debug!("theme preference unreadable: {}", e);
            Theme::Dark
        }
    }
}

pub struct ThemeController<S> {
    store: S,
    current: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    pub fn load(store: S, prefers_dark: bool) -> Self {
        let current = resolve_initial(&store, prefers_dark);
        let mut controller = Self { store, current };
        controller.apply(current);
        controller
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Makes `theme` current and persists it. A failed write still leaves
    /// the theme applied for this session.
    pub fn apply(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        if let Err(e) = self.store.set(THEME_STORAGE_KEY, theme.as_str()) {
            debug!("theme preference not persisted: {}", e);
        }
        theme
    }

    pub fn toggle(&mut self) -> Theme {
        self.apply(self.current.toggled())
    }
}

fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false)
}

fn render(body: &HtmlElement, toggle: Option<&Element>, theme: Theme) {
    dom::set_class(body, Theme::Light.body_class(), false);
    dom::set_class(body, Theme::Dark.body_class(), false);
    dom::set_class(body, theme.body_class(), true);
    if let Some(button) = toggle {
        let _ = button.set_attribute("aria-pressed", theme.pressed());
        button.set_inner_html(theme.toggle_icon());
    }
}

pub fn attach() -> Result<(), DomError> {
    let body = dom::document()?.body().ok_or(DomError::NoGlobal("body"))?;
    let toggle = dom::try_query(".theme-toggle")?;

    let controller = ThemeController::load(LocalStore, prefers_dark());
    info!("theme: {}", controller.current().as_str());
    render(&body, toggle.as_ref(), controller.current());

    let Some(button) = toggle else {
        return Err(DomError::Missing(".theme-toggle".to_string()));
    };

    let controller = Rc::new(RefCell::new(controller));
    let target = button.clone();
    dom::on(&target, "click", move |_| {
        let theme = controller.borrow_mut().toggle();
        render(&body, Some(&button), theme);
    })
}
