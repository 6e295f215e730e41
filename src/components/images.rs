use log::debug;

use crate::dom::{Document, Element};
use crate::error::{PageError, Result};

pub const DEFERRED_SRC_ATTR: &str = "data-src";
pub const IMAGE_OVERLAY_CLASS: &str = "image-overlay";
pub const FALLBACK_BACKGROUND: [&str; 3] = ["bg-gradient-to-br", "from-gray-100", "to-gray-200"];

/// Called for every intersection notification of an observed image.
/// Returns true once the image should no longer be observed.
pub fn on_intersection<E: Element>(image: &E, is_intersecting: bool) -> Result<bool> {
    if !is_intersecting {
        return Ok(false);
    }
    if let Some(src) = image.attribute(DEFERRED_SRC_ATTR) {
        image.set_attribute("src", &src)?;
        image.remove_attribute(DEFERRED_SRC_ATTR)?;
        debug!("Lazy loaded {}", src);
    }
    Ok(true)
}

/// Hides a broken image and paints a neutral background in its overlay slot.
pub fn on_load_failure<E: Element>(image: &E) -> Result<()> {
    image.set_style("display", "none")?;
    if let Some(parent) = image.parent() {
        if parent.has_class(IMAGE_OVERLAY_CLASS) {
            for class in FALLBACK_BACKGROUND {
                parent.add_class(class)?;
            }
        }
    }
    Ok(())
}

/// Adds `<link rel="preload" as="image">` for the hero image to the head.
pub fn preload_hero<D: Document>(document: &D, hero: &D::Element) -> Result<Option<D::Element>> {
    let Some(src) = hero.attribute("src").filter(|src| !src.is_empty()) else {
        return Ok(None);
    };
    let head = document
        .head()
        .ok_or_else(|| PageError::MissingElement("head".to_string()))?;

    let link = document.create_element("link")?;
    link.set_attribute("rel", "preload")?;
    link.set_attribute("as", "image")?;
    link.set_attribute("href", &src)?;
    head.append_child(&link)?;
    Ok(Some(link))
}
