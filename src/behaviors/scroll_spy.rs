use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use web_sys::Element;

use crate::config::{SpyOptions, SECTION_IDS};
use crate::dom::{self, Trigger};
use crate::error::DomError;

/// One visibility report for a watched section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionEntry<'a> {
    pub id: &'a str,
    pub intersecting: bool,
}

/// Active-link state for one group of navigation links.
#[derive(Debug, Default)]
pub struct SpyGroup {
    hrefs: Vec<Option<String>>,
    active: Option<usize>,
}

impl SpyGroup {
    pub fn new(hrefs: Vec<Option<String>>) -> Self {
        Self {
            hrefs,
            active: None,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, link: usize) -> bool {
        self.active == Some(link)
    }

    /// First link pointing at `#section`.
    pub fn link_for(&self, section: &str) -> Option<usize> {
        self.hrefs.iter().position(|href| {
            href.as_deref()
                .and_then(|h| h.strip_prefix('#'))
                .map_or(false, |id| id == section)
        })
    }

    /// Applies a batch in delivery order, so when several sections enter at
    /// once the last one processed ends up active. Returns the new active
    /// link if anything in the batch activated one.
    pub fn observe(&mut self, batch: &[SectionEntry<'_>]) -> Option<usize> {
        let mut changed = None;
        for entry in batch.iter().filter(|e| e.intersecting) {
            if let Some(link) = self.link_for(entry.id) {
                self.active = Some(link);
                changed = Some(link);
            }
        }
        changed
    }
}

fn render(links: &[Element], group: &SpyGroup) {
    for (index, link) in links.iter().enumerate() {
        dom::set_class(link, "active", group.is_active(index));
    }
}

/// Watches the page sections and highlights matching links in one group.
pub fn attach(options: SpyOptions) -> Result<(), DomError> {
    let mut sections = Vec::new();
    for id in SECTION_IDS {
        match dom::by_id(id)? {
            Some(section) => sections.push(section),
            None => debug!("section #{} not on page", id),
        }
    }

    let links = dom::query_all(options.link_selector)?;
    let group = SpyGroup::new(links.iter().map(|l| l.get_attribute("href")).collect());
    let group = Rc::new(RefCell::new(group));

    let trigger = Trigger {
        root_margin: options.root_margin,
        threshold: options.threshold,
    };
    dom::observe(&sections, Some(trigger), move |entries, _| {
        let ids: Vec<(String, bool)> = entries
            .iter()
            .map(|entry| (entry.target().id(), entry.is_intersecting()))
            .collect();
        let batch: Vec<SectionEntry<'_>> = ids
            .iter()
            .map(|(id, intersecting)| SectionEntry {
                id: id.as_str(),
                intersecting: *intersecting,
            })
            .collect();
        let mut group = group.borrow_mut();
        if group.observe(&batch).is_some() {
            debug!("active link: {:?}", group.active());
            render(&links, &group);
        }
    })?;
    Ok(())
}
