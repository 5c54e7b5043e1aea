//! Typed accessors over the page markup. Lookups that the behaviors depend on
//! fail here with a `DomError` naming the selector, so the adapters can
//! use `?` instead of checking every node by hand.

use std::any::type_name;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, NodeList, Window,
};

use crate::error::DomError;

pub fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::NoGlobal("window"))
}

pub fn document() -> Result<Document, DomError> {
    window()?.document().ok_or(DomError::NoGlobal("document"))
}

fn short_name<T>() -> &'static str {
    type_name::<T>().rsplit("::").next().unwrap_or("element")
}

/// Casts `element` (found by `selector`) to a concrete element type.
pub fn cast<T: JsCast>(element: Element, selector: &str) -> Result<T, DomError> {
    element.dyn_into::<T>().map_err(|_| DomError::WrongType {
        selector: selector.to_string(),
        expected: short_name::<T>(),
    })
}

pub fn query<T: JsCast>(selector: &str) -> Result<T, DomError> {
    let element = document()?
        .query_selector(selector)?
        .ok_or_else(|| DomError::Missing(selector.to_string()))?;
    cast(element, selector)
}

pub fn query_in<T: JsCast>(scope: &Element, selector: &str) -> Result<T, DomError> {
    let element = scope
        .query_selector(selector)?
        .ok_or_else(|| DomError::Missing(selector.to_string()))?;
    cast(element, selector)
}

/// Optional lookup: `Ok(None)` when nothing matches.
pub fn try_query(selector: &str) -> Result<Option<Element>, DomError> {
    Ok(document()?.query_selector(selector)?)
}

pub fn by_id(id: &str) -> Result<Option<Element>, DomError> {
    Ok(document()?.get_element_by_id(id))
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(selector: &str) -> Result<Vec<Element>, DomError> {
    Ok(elements(document()?.query_selector_all(selector)?))
}

pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let list = element.class_list();
    let _ = if on { list.add_1(class) } else { list.remove_1(class) };
}

/// Registers `handler` for the page lifetime. Listeners are never removed.
pub fn on<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), DomError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

pub fn on_passive<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), DomError>
where
    F: FnMut(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

/// Root margin and threshold for an intersection observer on the viewport.
#[derive(Clone, Copy, Debug)]
pub struct Trigger<'a> {
    pub root_margin: &'a str,
    pub threshold: f64,
}

/// Watches `targets` for the page lifetime. The handler receives each batch
/// of entries in delivery order.
pub fn observe<F>(
    targets: &[Element],
    trigger: Option<Trigger<'_>>,
    mut handler: F,
) -> Result<IntersectionObserver, DomError>
where
    F: FnMut(Vec<IntersectionObserverEntry>, &IntersectionObserver) + 'static,
{
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let entries = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .collect();
            handler(entries, &observer);
        },
    );

    let observer = match trigger {
        Some(trigger) => {
            let init = IntersectionObserverInit::new();
            init.set_root_margin(trigger.root_margin);
            init.set_threshold(&JsValue::from_f64(trigger.threshold));
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?
        }
        None => IntersectionObserver::new(callback.as_ref().unchecked_ref())?,
    };
    callback.forget();

    for target in targets {
        observer.observe(target);
    }
    Ok(observer)
}
