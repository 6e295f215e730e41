use std::rc::Rc;

use log::{debug, warn};

use crate::config::SiteConfig;
use crate::dom::{Element, Scheduler};
use crate::error::Result;

pub const OVERLAY_HIDDEN_CLASS: &str = "hidden";
pub const CONTENT_VISIBLE_CLASS: &str = "visible";

/// Fades the loading overlay out and the content in once the page has loaded,
/// then drops the overlay from layout.
pub fn schedule_reveal<E: Element>(
    overlay: Option<E>,
    content: Option<E>,
    scheduler: Rc<dyn Scheduler>,
    config: &SiteConfig,
) {
    let (Some(overlay), Some(content)) = (overlay, content) else {
        debug!("No loading screen on this page");
        return;
    };

    let removal_ms = config.overlay_removal_ms;
    let follow_up = Rc::clone(&scheduler);
    scheduler.after(
        config.reveal_delay_ms,
        Box::new(move || {
            if let Err(e) = reveal(&overlay, &content) {
                warn!("Loading screen error: {}", e);
            }
            // Still drop the overlay so it can never cover the page
            follow_up.after(
                removal_ms,
                Box::new(move || {
                    if let Err(e) = overlay.set_style("display", "none") {
                        warn!("Loading screen error: {}", e);
                    }
                }),
            );
        }),
    );
}

fn reveal<E: Element>(overlay: &E, content: &E) -> Result<()> {
    overlay.add_class(OVERLAY_HIDDEN_CLASS)?;
    content.add_class(CONTENT_VISIBLE_CLASS)?;
    Ok(())
}
