use log::{warn, Level};
use serde::Deserialize;

use crate::dom::{Document, Element};
use crate::error::Result;

/// Id of the optional `<script type="application/json">` block carrying overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub business_name: String,
    pub inquiry_email: String,
    pub image_host_prefix: String,
    pub hero_image_selector: String,
    pub scroll_threshold_px: f64,
    pub anchor_offset_px: f64,
    pub reveal_delay_ms: u32,
    pub overlay_removal_ms: u32,
    pub dispatch_delay_ms: u32,
    pub sending_clear_ms: u32,
    pub ripple_lifetime_ms: u32,
    pub link_cleanup_ms: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            business_name: "E-Tech Cyber Cafe".to_string(),
            inquiry_email: "edisonkipkemoi319@gmail.com".to_string(),
            image_host_prefix: "https://images.pexels.com".to_string(),
            hero_image_selector: "section img".to_string(),
            scroll_threshold_px: 50.0,
            anchor_offset_px: 80.0,
            reveal_delay_ms: 1200,
            overlay_removal_ms: 500,
            dispatch_delay_ms: 150,
            sending_clear_ms: 500,
            ripple_lifetime_ms: 600,
            link_cleanup_ms: 100,
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads overrides embedded in the page, falling back to the defaults.
    pub fn from_document<D: Document>(document: &D) -> Self {
        let Some(element) = document.by_id(CONFIG_ELEMENT_ID) else {
            return SiteConfig::default();
        };
        match SiteConfig::from_json(&element.text_content()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring invalid site config: {}", e);
                SiteConfig::default()
            }
        }
    }

    pub fn image_selector(&self) -> String {
        format!("img[src^=\"{}\"]", self.image_host_prefix)
    }
}
