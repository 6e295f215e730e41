use log::{debug, warn};

use crate::config::SiteConfig;
use crate::dom::{Document, Element};

pub const LOADING_SCREEN_ID: &str = "loading-screen";
pub const CONTENT_WRAPPER_SELECTOR: &str = ".content-wrapper";
pub const MENU_BUTTON_ID: &str = "mobile-menu-btn";
pub const MENU_PANEL_ID: &str = "mobile-menu";
pub const MENU_ICON_ID: &str = "menu-icon";
pub const CLOSE_ICON_ID: &str = "close-icon";
pub const PREFERRED_NAV_SELECTOR: &str = "nav.nav-professional";
pub const NAV_SELECTOR: &str = "nav";
pub const FRAGMENT_ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
pub const COURSE_CARD_SELECTOR: &str = ".course-card";

#[derive(Clone)]
pub struct MenuHandles<E> {
    pub button: Option<E>,
    pub panel: E,
    pub menu_icon: Option<E>,
    pub close_icon: Option<E>,
}

/// Elements the controller needs as soon as it starts.
pub struct PageHandles<E> {
    pub loading_screen: Option<E>,
    pub content_wrapper: Option<E>,
    pub menu: Option<MenuHandles<E>>,
    pub nav: Option<E>,
    pub fragment_anchors: Vec<E>,
}

/// Elements wired once the document has been parsed.
pub struct ContentHandles<E> {
    pub images: Vec<E>,
    pub hero_image: Option<E>,
    pub course_cards: Vec<E>,
}

fn first<D: Document>(document: &D, selector: &str) -> Option<D::Element> {
    match document.query(selector) {
        Ok(found) => found,
        Err(e) => {
            warn!("Lookup of {} failed: {}", selector, e);
            None
        }
    }
}

fn all<D: Document>(document: &D, selector: &str) -> Vec<D::Element> {
    document.query_all(selector).unwrap_or_else(|e| {
        warn!("Lookup of {} failed: {}", selector, e);
        Vec::new()
    })
}

impl<E: Element> PageHandles<E> {
    pub fn resolve<D: Document<Element = E>>(document: &D) -> Self {
        let menu = match document.by_id(MENU_PANEL_ID) {
            Some(panel) => Some(MenuHandles {
                button: document.by_id(MENU_BUTTON_ID),
                panel,
                menu_icon: document.by_id(MENU_ICON_ID),
                close_icon: document.by_id(CLOSE_ICON_ID),
            }),
            None => {
                debug!("No mobile menu on this page");
                None
            }
        };

        let nav = first(document, PREFERRED_NAV_SELECTOR).or_else(|| first(document, NAV_SELECTOR));

        PageHandles {
            loading_screen: document.by_id(LOADING_SCREEN_ID),
            content_wrapper: first(document, CONTENT_WRAPPER_SELECTOR),
            menu,
            nav,
            fragment_anchors: all(document, FRAGMENT_ANCHOR_SELECTOR),
        }
    }
}

impl<E: Element> ContentHandles<E> {
    pub fn resolve<D: Document<Element = E>>(document: &D, config: &SiteConfig) -> Self {
        ContentHandles {
            images: all(document, &config.image_selector()),
            hero_image: first(document, &config.hero_image_selector),
            course_cards: all(document, COURSE_CARD_SELECTOR),
        }
    }
}
