use gloo_timers::callback::Timeout;
use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{ScrollBehavior, ScrollToOptions, Window};

use crate::dom::{Scheduler, Viewport};
use crate::error::Result;

pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        BrowserScheduler { window }
    }
}

impl Scheduler for BrowserScheduler {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        // Fire and forget, nothing ever cancels these
        Timeout::new(delay_ms, task).forget();
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move |_timestamp: f64| task());
        if let Err(e) = self.window.request_animation_frame(callback.unchecked_ref()) {
            warn!("requestAnimationFrame unavailable: {:?}", e);
            // The closure was handed to JS already, so call it directly
            if let Some(function) = callback.dyn_ref::<web_sys::js_sys::Function>() {
                if let Err(e) = function.call1(&JsValue::NULL, &JsValue::from_f64(0.0)) {
                    debug!("Frame task failed: {:?}", e);
                }
            }
        }
    }
}

pub struct BrowserViewport {
    window: Window,
}

impl BrowserViewport {
    pub fn new(window: Window) -> Self {
        BrowserViewport { window }
    }
}

impl Viewport for BrowserViewport {
    fn scroll_y(&self) -> f64 {
        self.window
            .scroll_y()
            .or_else(|_| self.window.page_y_offset())
            .unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) -> Result<()> {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(())
    }

    fn replace_fragment(&self, fragment: &str) -> Result<()> {
        self.window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(fragment))?;
        Ok(())
    }

    fn navigate(&self, href: &str) -> Result<()> {
        self.window.location().set_href(href)?;
        Ok(())
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            debug!("Alert suppressed: {:?}", e);
        }
    }
}
