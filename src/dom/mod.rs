//! Capability traits the page behaviors are written against.
//!
//! The browser bindings in `web` implement these over `web_sys`, tests use the
//! in-memory versions in `fake`.

use crate::error::Result;

#[cfg(test)]
pub mod fake;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }
}

/// Viewport coordinates of a pointer (or synthesized) activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub trait Element: Clone + 'static {
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str) -> Result<()>;
    fn remove_class(&self, class: &str) -> Result<()>;

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str) -> Result<()>;
    fn remove_attribute(&self, name: &str) -> Result<()>;

    /// Inline style property, e.g. `("display", "none")`.
    fn set_style(&self, property: &str, value: &str) -> Result<()>;

    fn text_content(&self) -> String;
    fn parent(&self) -> Option<Self>;

    fn query(&self, selector: &str) -> Result<Option<Self>>;
    fn query_all(&self, selector: &str) -> Result<Vec<Self>>;

    fn append_child(&self, child: &Self) -> Result<()>;
    /// Detaches the element from its parent. No-op when already detached.
    fn remove(&self);

    fn click(&self) -> Result<()>;

    fn offset_top(&self) -> f64;
    fn bounding_rect(&self) -> Rect;

    /// Sets or clears the `hidden` utility class.
    fn set_hidden(&self, hidden: bool) -> Result<()> {
        if hidden {
            self.add_class("hidden")
        } else {
            self.remove_class("hidden")
        }
    }
}

pub trait Document {
    type Element: Element;

    fn by_id(&self, id: &str) -> Option<Self::Element>;
    fn query(&self, selector: &str) -> Result<Option<Self::Element>>;
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;
    fn create_element(&self, tag: &str) -> Result<Self::Element>;
    fn head(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
}

/// Timers and animation frames. Scheduled tasks cannot be cancelled.
pub trait Scheduler {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
    fn next_frame(&self, task: Box<dyn FnOnce()>);
}

pub trait Viewport {
    fn scroll_y(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64) -> Result<()>;
    /// Swaps the URL fragment in place, without a navigation or a new history entry.
    fn replace_fragment(&self, fragment: &str) -> Result<()>;
    fn navigate(&self, href: &str) -> Result<()>;
    fn alert(&self, message: &str);
}
