use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::dom::{Element, Scheduler, Viewport};
use crate::error::Result;
use crate::handles::MenuHandles;

pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const SCROLLED_CLASS: &str = "scrolled";

/// Mobile menu with two states, closed (initial) and open. The panel, icon
/// pair and `aria-expanded` are always written together. Opening needs the
/// icon pair; closing only needs the panel.
pub struct MobileMenu<E> {
    handles: MenuHandles<E>,
}

impl<E: Element> MobileMenu<E> {
    pub fn new(handles: MenuHandles<E>) -> Self {
        MobileMenu { handles }
    }

    pub fn is_open(&self) -> bool {
        !self.handles.panel.has_class("hidden")
    }

    pub fn has_button(&self) -> bool {
        self.handles.button.is_some()
    }

    pub fn can_toggle(&self) -> bool {
        self.handles.menu_icon.is_some() && self.handles.close_icon.is_some()
    }

    pub fn toggle(&self) -> Result<()> {
        if !self.can_toggle() {
            debug!("Menu icons missing, toggle ignored");
            return Ok(());
        }
        self.set_open(!self.is_open())
    }

    pub fn close(&self) -> Result<()> {
        if self.is_open() {
            self.set_open(false)?;
        }
        Ok(())
    }

    /// Returns whether the key closed the menu.
    pub fn handle_key(&self, key: &str) -> Result<bool> {
        if key == "Escape" && self.is_open() {
            self.set_open(false)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn set_open(&self, open: bool) -> Result<()> {
        let MenuHandles {
            button,
            panel,
            menu_icon,
            close_icon,
        } = &self.handles;
        panel.set_hidden(!open)?;
        if let Some(menu_icon) = menu_icon {
            menu_icon.set_hidden(open)?;
        }
        if let Some(close_icon) = close_icon {
            close_icon.set_hidden(!open)?;
        }
        if let Some(button) = button {
            button.set_attribute(ARIA_EXPANDED, if open { "true" } else { "false" })?;
        }
        debug!("Mobile menu {}", if open { "opened" } else { "closed" });
        Ok(())
    }
}

/// Adds `scrolled` to the nav bar past the threshold. Scroll events only
/// request a frame; the offset is sampled once per rendered frame.
pub struct NavScrollStyle<E> {
    nav: E,
    threshold: f64,
    frame_pending: Cell<bool>,
}

impl<E: Element> NavScrollStyle<E> {
    pub fn new(nav: E, threshold: f64) -> Rc<Self> {
        Rc::new(NavScrollStyle {
            nav,
            threshold,
            frame_pending: Cell::new(false),
        })
    }

    pub fn on_scroll(self: &Rc<Self>, scheduler: &dyn Scheduler, viewport: Rc<dyn Viewport>) {
        if self.frame_pending.replace(true) {
            return;
        }
        let this = Rc::clone(self);
        scheduler.next_frame(Box::new(move || this.update(viewport.scroll_y())));
    }

    pub fn update(&self, offset: f64) {
        let result = if offset > self.threshold {
            self.nav.add_class(SCROLLED_CLASS)
        } else {
            self.nav.remove_class(SCROLLED_CLASS)
        };
        if let Err(e) = result {
            debug!("Nav scroll style not applied: {}", e);
        }
        self.frame_pending.set(false);
    }
}
