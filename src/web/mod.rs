//! Browser bindings: wires the page behaviors to DOM events.

mod element;
mod window;

use std::rc::Rc;

use log::{debug, error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, KeyboardEvent, MouseEvent,
};

use crate::components::anchors::{suppresses_default, SmoothScroll};
use crate::components::images;
use crate::components::inquiry::{is_activation_key, CourseInquiry};
use crate::components::loading;
use crate::components::navigation::{MobileMenu, NavScrollStyle};
use crate::components::startup::{StartupPlan, Trigger};
use crate::config::SiteConfig;
use crate::dom::{Element, Point, Scheduler, Viewport};
use crate::error::{PageError, Result};
use crate::handles::{ContentHandles, MenuHandles, PageHandles};

pub use element::{WebDocument, WebElement};
pub use window::{BrowserScheduler, BrowserViewport};

struct Page {
    document: Rc<WebDocument>,
    scheduler: Rc<dyn Scheduler>,
    viewport: Rc<dyn Viewport>,
    config: Rc<SiteConfig>,
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    callback.forget();
    Ok(())
}

fn listen_with<F>(target: &EventTarget, event: &str, options: &AddEventListenerOptions, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        options,
    )?;
    callback.forget();
    Ok(())
}

pub fn start() {
    let Some(window) = web_sys::window() else {
        error!("No window, page controller not started");
        return;
    };
    let Some(document) = window.document() else {
        error!("No document, page controller not started");
        return;
    };

    let web_document = Rc::new(WebDocument(document.clone()));
    let config = Rc::new(SiteConfig::from_document(&*web_document));
    let page = Rc::new(Page {
        document: web_document,
        scheduler: Rc::new(BrowserScheduler::new(window.clone())),
        viewport: Rc::new(BrowserViewport::new(window.clone())),
        config,
    });

    let handles = PageHandles::resolve(&*page.document);
    let PageHandles {
        loading_screen,
        content_wrapper,
        menu,
        nav,
        fragment_anchors,
    } = handles;

    if let Some(menu) = menu {
        if let Err(e) = wire_menu(&document, menu) {
            warn!("Mobile menu not wired: {}", e);
        }
    }
    if let Err(e) = wire_anchors(&page, fragment_anchors) {
        warn!("Smooth scrolling not wired: {}", e);
    }
    if let Some(nav) = nav {
        if let Err(e) = wire_nav_scroll(&page, &window, nav) {
            warn!("Nav scroll style not wired: {}", e);
        }
    }

    let plan = StartupPlan::from_ready_state(&document.ready_state());
    debug!("Startup plan: {:?}", plan);

    let content_page = Rc::clone(&page);
    run_on(plan.content, document.as_ref(), move || {
        let content = ContentHandles::resolve(&*content_page.document, &content_page.config);
        wire_content(&content_page, content);
    });

    let load_page = Rc::clone(&page);
    run_on(plan.reveal, window.as_ref(), move || {
        loading::schedule_reveal(
            loading_screen,
            content_wrapper,
            Rc::clone(&load_page.scheduler),
            &load_page.config,
        );
    });

    info!("Page controller started");
}

fn run_on<F>(trigger: Trigger, target: &EventTarget, step: F)
where
    F: FnOnce() + 'static,
{
    match trigger {
        Trigger::Now => step(),
        Trigger::OnEvent(event) => {
            let mut step = Some(step);
            let result = listen(target, event, move |_| {
                if let Some(step) = step.take() {
                    step();
                }
            });
            if let Err(e) = result {
                warn!("{} listener failed: {}", event, e);
            }
        }
    }
}

fn wire_menu(document: &web_sys::Document, handles: MenuHandles<WebElement>) -> Result<()> {
    let links = handles.panel.query_all("a")?;
    let button = handles.button.clone();
    let menu = Rc::new(MobileMenu::new(handles));

    if let Some(button) = button {
        let toggle_menu = Rc::clone(&menu);
        listen(button.0.as_ref(), "click", move |_| {
            if let Err(e) = toggle_menu.toggle() {
                warn!("Menu toggle failed: {}", e);
            }
        })?;

        let escape_menu = Rc::clone(&menu);
        listen(document.as_ref(), "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
                return;
            };
            if let Err(e) = escape_menu.handle_key(&key) {
                warn!("Menu close failed: {}", e);
            }
        })?;
    }

    for link in links {
        let link_menu = Rc::clone(&menu);
        listen(link.0.as_ref(), "click", move |_| {
            if let Err(e) = link_menu.close() {
                warn!("Menu close failed: {}", e);
            }
        })?;
    }
    debug!("Mobile menu wired (button: {})", menu.has_button());
    Ok(())
}

fn wire_anchors(page: &Rc<Page>, anchors: Vec<WebElement>) -> Result<()> {
    let router = Rc::new(SmoothScroll::new(
        Rc::clone(&page.document),
        Rc::clone(&page.viewport),
        page.config.anchor_offset_px,
    ));
    let count = anchors.len();
    for anchor in anchors {
        let router = Rc::clone(&router);
        let target = anchor.clone();
        listen(anchor.0.as_ref(), "click", move |event| {
            let Some(href) = target.attribute("href") else {
                return;
            };
            if suppresses_default(&href) {
                event.prevent_default();
                let outcome = router.follow(&href);
                debug!("Anchor {} -> {:?}", href, outcome);
            }
        })?;
    }
    debug!("Smooth scrolling wired for {} anchors", count);
    Ok(())
}

fn wire_nav_scroll(page: &Rc<Page>, window: &web_sys::Window, nav: WebElement) -> Result<()> {
    let style = NavScrollStyle::new(nav, page.config.scroll_threshold_px);
    let scheduler = Rc::clone(&page.scheduler);
    let viewport = Rc::clone(&page.viewport);

    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    listen_with(window.as_ref(), "scroll", &options, move |_| {
        style.on_scroll(&*scheduler, Rc::clone(&viewport));
    })
}

/// Each content behavior is wired independently; a failure is logged and the rest still run.
fn wire_content(page: &Rc<Page>, content: ContentHandles<WebElement>) {
    let ContentHandles {
        images: hosted_images,
        hero_image,
        course_cards,
    } = content;

    if let Err(e) = wire_lazy_images(&hosted_images) {
        warn!("Lazy images not wired: {}", e);
    }

    let once = AddEventListenerOptions::new();
    once.set_once(true);
    for image in &hosted_images {
        let target = image.clone();
        let result = listen_with(image.0.as_ref(), "error", &once, move |_| {
            if let Err(e) = images::on_load_failure(&target) {
                debug!("Image fallback failed: {}", e);
            }
        });
        if let Err(e) = result {
            warn!("Image fallback not wired: {}", e);
        }
    }

    if let Some(hero) = hero_image {
        match images::preload_hero(&*page.document, &hero) {
            Ok(Some(_)) => debug!("Hero image preload hinted"),
            Ok(None) => {}
            Err(e) => warn!("Hero preload failed: {}", e),
        }
    }

    wire_course_cards(page, course_cards);
}

fn wire_lazy_images(hosted_images: &[WebElement]) -> Result<()> {
    let Some(window) = web_sys::window() else {
        return Err(PageError::MissingElement("window".to_string()));
    };
    let supported = web_sys::js_sys::Reflect::has(window.as_ref(), &"IntersectionObserver".into())
        .unwrap_or(false);
    if !supported {
        debug!("IntersectionObserver unavailable, images load eagerly");
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(web_sys::js_sys::Array, IntersectionObserver)>::new(
        move |entries: web_sys::js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                match images::on_intersection(&WebElement(target.clone()), entry.is_intersecting()) {
                    Ok(true) => observer.unobserve(&target),
                    Ok(false) => {}
                    Err(e) => debug!("Lazy load failed: {}", e),
                }
            }
        },
    );
    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
    callback.forget();

    for image in hosted_images {
        observer.observe(&image.0);
    }
    debug!("Observing {} images", hosted_images.len());
    Ok(())
}

fn wire_course_cards(page: &Rc<Page>, cards: Vec<WebElement>) {
    let inquiry = Rc::new(CourseInquiry::new(
        Rc::clone(&page.document),
        Rc::clone(&page.scheduler),
        Rc::clone(&page.viewport),
        Rc::clone(&page.config),
    ));

    for card in cards {
        if let Err(e) = wire_course_card(&inquiry, card) {
            warn!("Course card not wired: {}", e);
        }
    }
}

fn wire_course_card(inquiry: &Rc<CourseInquiry<WebDocument>>, card: WebElement) -> Result<()> {
    let click_inquiry = Rc::clone(inquiry);
    let click_card = card.clone();
    listen(card.0.as_ref(), "click", move |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let point = Point {
            x: f64::from(mouse.client_x()),
            y: f64::from(mouse.client_y()),
        };
        if let Err(e) = click_inquiry.activate(&click_card, point) {
            error!("Course inquiry failed: {}", e);
        }
    })?;

    let key_inquiry = Rc::clone(inquiry);
    let key_card = card.clone();
    listen(card.0.as_ref(), "keydown", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
            return;
        };
        if is_activation_key(&key) {
            event.prevent_default();
            if let Err(e) = key_inquiry.activate_from_keyboard(&key_card) {
                error!("Course inquiry failed: {}", e);
            }
        }
    })?;
    Ok(())
}
