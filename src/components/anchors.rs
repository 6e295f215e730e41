use std::rc::Rc;

use log::{error, warn};

use crate::dom::{Document, Element, Viewport};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FragmentLink<'a> {
    /// `#` or `#!`, used by markup as a do-nothing link.
    Placeholder,
    Target(&'a str),
}

impl<'a> FragmentLink<'a> {
    pub fn parse(href: &'a str) -> Option<Self> {
        match href {
            "#" | "#!" => Some(FragmentLink::Placeholder),
            _ if href.starts_with('#') => Some(FragmentLink::Target(href)),
            _ => None,
        }
    }
}

/// Every same-page link has its default navigation cancelled, placeholders included.
pub fn suppresses_default(href: &str) -> bool {
    FragmentLink::parse(href).is_some()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollOutcome {
    NotFragment,
    Ignored,
    Scrolled { top: f64 },
    TargetMissing,
    FellBack,
}

/// Animated scrolling for same-page anchors, leaving room for the fixed header.
pub struct SmoothScroll<D> {
    document: Rc<D>,
    viewport: Rc<dyn Viewport>,
    offset: f64,
}

impl<D: Document> SmoothScroll<D> {
    pub fn new(document: Rc<D>, viewport: Rc<dyn Viewport>, offset: f64) -> Self {
        SmoothScroll {
            document,
            viewport,
            offset,
        }
    }

    /// Handles an anchor activation. The caller suppresses the default
    /// navigation for every href starting with `#`.
    pub fn follow(&self, href: &str) -> ScrollOutcome {
        let target = match FragmentLink::parse(href) {
            None => return ScrollOutcome::NotFragment,
            Some(FragmentLink::Placeholder) => return ScrollOutcome::Ignored,
            Some(FragmentLink::Target(target)) => target,
        };

        match self.scroll_to(target) {
            Ok(Some(top)) => ScrollOutcome::Scrolled { top },
            Ok(None) => ScrollOutcome::TargetMissing,
            Err(e) => {
                warn!("Smooth scroll error: {}", e);
                if let Err(e) = self.viewport.navigate(href) {
                    error!("Fallback navigation to {} failed: {}", href, e);
                }
                ScrollOutcome::FellBack
            }
        }
    }

    fn scroll_to(&self, fragment: &str) -> Result<Option<f64>> {
        let Some(target) = self.document.query(fragment)? else {
            return Ok(None);
        };
        let top = target.offset_top() - self.offset;
        self.viewport.smooth_scroll_to(top)?;
        self.viewport.replace_fragment(fragment)?;
        Ok(Some(top))
    }
}
