//! In-memory DOM, clock and viewport used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::{Document, Element, Rect, Scheduler, Viewport};
use crate::error::{PageError, Result};

#[derive(Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    children: Vec<FakeElement>,
    parent: Weak<RefCell<Node>>,
    offset_top: f64,
    rect: Rect,
    fail_mutations: bool,
    fail_click: bool,
    clicks: usize,
}

#[derive(Clone)]
pub struct FakeElement(Rc<RefCell<Node>>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        write!(f, "<{} {:?} {:?}>", node.tag, node.attributes, node.classes)
    }
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        FakeElement(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            ..Node::default()
        })))
    }

    pub fn with_id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn with_class(self, class: &str) -> Self {
        for class in class.split_whitespace() {
            self.0.borrow_mut().classes.push(class.to_string());
        }
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.to_string();
        self
    }

    pub fn with_offset_top(self, offset_top: f64) -> Self {
        self.0.borrow_mut().offset_top = offset_top;
        self
    }

    pub fn with_rect(self, rect: Rect) -> Self {
        self.0.borrow_mut().rect = rect;
        self
    }

    pub fn child(self, child: FakeElement) -> Self {
        attach(&self, &child);
        self
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.0.borrow_mut().fail_mutations = fail;
    }

    pub fn fail_click(&self, fail: bool) {
        self.0.borrow_mut().fail_click = fail;
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    pub fn children(&self) -> Vec<FakeElement> {
        self.0.borrow().children.clone()
    }

    pub fn clicks(&self) -> usize {
        self.0.borrow().clicks
    }

    pub fn is_attached(&self) -> bool {
        self.0.borrow().parent.upgrade().is_some()
    }

    fn check_mutable(&self) -> Result<()> {
        if self.0.borrow().fail_mutations {
            Err(PageError::Js("mutation rejected".to_string()))
        } else {
            Ok(())
        }
    }

    fn descendants(&self) -> Vec<FakeElement> {
        let mut found = Vec::new();
        for child in self.children() {
            found.push(child.clone());
            found.extend(child.descendants());
        }
        found
    }

    fn select(&self, selector: &str) -> Result<Vec<FakeElement>> {
        let parts = parse_selector(selector)?;
        Ok(self
            .descendants()
            .into_iter()
            .filter(|el| matches_selector(el, &parts))
            .collect())
    }
}

fn attach(parent: &FakeElement, child: &FakeElement) {
    child.remove();
    child.0.borrow_mut().parent = Rc::downgrade(&parent.0);
    parent.0.borrow_mut().children.push(child.clone());
}

impl Element for FakeElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) -> Result<()> {
        self.check_mutable()?;
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        self.check_mutable()?;
        self.0.borrow_mut().classes.retain(|c| c != class);
        Ok(())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.check_mutable()?;
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&self, name: &str) -> Result<()> {
        self.check_mutable()?;
        self.0.borrow_mut().attributes.remove(name);
        Ok(())
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        self.check_mutable()?;
        self.0
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn text_content(&self) -> String {
        let mut text = self.0.borrow().text.clone();
        for child in self.children() {
            text.push_str(&child.text_content());
        }
        text
    }

    fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.upgrade().map(FakeElement)
    }

    fn query(&self, selector: &str) -> Result<Option<Self>> {
        Ok(self.select(selector)?.into_iter().next())
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Self>> {
        self.select(selector)
    }

    fn append_child(&self, child: &Self) -> Result<()> {
        self.check_mutable()?;
        attach(self, child);
        Ok(())
    }

    fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| c != self);
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn click(&self) -> Result<()> {
        if self.0.borrow().fail_click {
            return Err(PageError::Js("click blocked".to_string()));
        }
        self.0.borrow_mut().clicks += 1;
        Ok(())
    }

    fn offset_top(&self) -> f64 {
        self.0.borrow().offset_top
    }

    fn bounding_rect(&self) -> Rect {
        self.0.borrow().rect
    }
}

// Selector subset: descendant combinators over compounds of
// `tag`, `#id`, `.class`, `[attr]`, `[attr="v"]` and `[attr^="v"]`.
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttrTest>,
}

#[derive(Debug)]
enum AttrTest {
    Exists(String),
    Equals(String, String),
    Prefix(String, String),
}

fn parse_selector(selector: &str) -> Result<Vec<Compound>> {
    let parts: Vec<&str> = selector.split_whitespace().collect();
    if parts.is_empty() {
        return Err(PageError::InvalidSelector(selector.to_string()));
    }
    parts
        .into_iter()
        .map(|part| parse_compound(part).ok_or_else(|| PageError::InvalidSelector(selector.to_string())))
        .collect()
}

fn take_ident(input: &str) -> Option<(String, &str)> {
    let end = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(input.len());
    let ident = &input[..end];
    match ident.chars().next() {
        Some(first) if !first.is_ascii_digit() => Some((ident.to_string(), &input[end..])),
        _ => None,
    }
}

fn parse_compound(mut input: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    if input.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let (tag, rest) = take_ident(input)?;
        compound.tag = Some(tag);
        input = rest;
    }
    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix('#') {
            let (id, rest) = take_ident(rest)?;
            compound.ids.push(id);
            input = rest;
        } else if let Some(rest) = input.strip_prefix('.') {
            let (class, rest) = take_ident(rest)?;
            compound.classes.push(class);
            input = rest;
        } else if let Some(rest) = input.strip_prefix('[') {
            let close = rest.find(']')?;
            let body = &rest[..close];
            input = &rest[close + 1..];
            let test = if let Some((name, value)) = body.split_once("^=") {
                AttrTest::Prefix(name.to_string(), unquote(value))
            } else if let Some((name, value)) = body.split_once('=') {
                AttrTest::Equals(name.to_string(), unquote(value))
            } else {
                AttrTest::Exists(body.to_string())
            };
            compound.attributes.push(test);
        } else {
            return None;
        }
    }
    Some(compound)
}

fn unquote(value: &str) -> String {
    value.trim_matches(|c| c == '"' || c == '\'').to_string()
}

fn matches_compound(el: &FakeElement, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if !el.tag().eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if compound
        .ids
        .iter()
        .any(|id| el.attribute("id").as_deref() != Some(id.as_str()))
    {
        return false;
    }
    if compound.classes.iter().any(|class| !el.has_class(class)) {
        return false;
    }
    compound.attributes.iter().all(|test| match test {
        AttrTest::Exists(name) => el.attribute(name).is_some(),
        AttrTest::Equals(name, value) => el.attribute(name).as_deref() == Some(value.as_str()),
        AttrTest::Prefix(name, value) => el
            .attribute(name)
            .map(|v| v.starts_with(value.as_str()))
            .unwrap_or(false),
    })
}

fn matches_selector(el: &FakeElement, parts: &[Compound]) -> bool {
    let Some((last, ancestors)) = parts.split_last() else {
        return false;
    };
    if !matches_compound(el, last) {
        return false;
    }
    let mut remaining = ancestors.len();
    let mut current = el.parent();
    while remaining > 0 {
        match current {
            Some(node) => {
                if matches_compound(&node, &ancestors[remaining - 1]) {
                    remaining -= 1;
                }
                current = node.parent();
            }
            None => return false,
        }
    }
    true
}

pub struct FakeDocument {
    root: FakeElement,
    head: FakeElement,
    body: FakeElement,
}

impl FakeDocument {
    pub fn new() -> Self {
        let head = FakeElement::new("head");
        let body = FakeElement::new("body");
        let root = FakeElement::new("html").child(head.clone()).child(body.clone());
        FakeDocument { root, head, body }
    }

    /// Appends `element` to the body and returns it.
    pub fn add(&self, element: FakeElement) -> FakeElement {
        attach(&self.body, &element);
        element
    }
}

impl Document for FakeDocument {
    type Element = FakeElement;

    fn by_id(&self, id: &str) -> Option<FakeElement> {
        self.root
            .descendants()
            .into_iter()
            .find(|el| el.attribute("id").as_deref() == Some(id))
    }

    fn query(&self, selector: &str) -> Result<Option<FakeElement>> {
        self.root.query(selector)
    }

    fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        self.root.query_all(selector)
    }

    fn create_element(&self, tag: &str) -> Result<FakeElement> {
        Ok(FakeElement::new(tag))
    }

    fn head(&self) -> Option<FakeElement> {
        Some(self.head.clone())
    }

    fn body(&self) -> Option<FakeElement> {
        Some(self.body.clone())
    }
}

struct Timer {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

/// Virtual clock plus an animation frame queue.
#[derive(Default)]
pub struct FakeScheduler {
    now: Cell<u64>,
    seq: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
    frame_requests: Cell<usize>,
}

impl FakeScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(FakeScheduler::default())
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn frame_requests(&self) -> usize {
        self.frame_requests.get()
    }

    /// Moves the clock forward, running every timer that falls due on the way.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let index = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                index.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.now.set(timer.due);
                    (timer.task)();
                }
                None => break,
            }
        }
        self.now.set(target);
    }

    /// Renders one frame: runs the callbacks queued before it started.
    pub fn run_frame(&self) {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        for task in frames {
            task();
        }
    }
}

impl Scheduler for FakeScheduler {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + u64::from(delay_ms),
            seq,
            task,
        });
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) {
        self.frame_requests.set(self.frame_requests.get() + 1);
        self.frames.borrow_mut().push(task);
    }
}

#[derive(Default)]
pub struct FakeViewport {
    pub scroll_y: Cell<f64>,
    pub scrolls: RefCell<Vec<f64>>,
    pub fragments: RefCell<Vec<String>>,
    pub navigations: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
    pub fail_scroll: Cell<bool>,
    pub fail_navigate: Cell<bool>,
    navigate_hook: RefCell<Option<Box<dyn Fn(&str)>>>,
}

impl FakeViewport {
    pub fn new() -> Rc<Self> {
        Rc::new(FakeViewport::default())
    }

    /// Runs `hook` at the start of every navigation attempt.
    pub fn on_navigate(&self, hook: impl Fn(&str) + 'static) {
        *self.navigate_hook.borrow_mut() = Some(Box::new(hook));
    }
}

impl Viewport for FakeViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) -> Result<()> {
        if self.fail_scroll.get() {
            return Err(PageError::Js("scrollTo unavailable".to_string()));
        }
        self.scrolls.borrow_mut().push(top);
        Ok(())
    }

    fn replace_fragment(&self, fragment: &str) -> Result<()> {
        self.fragments.borrow_mut().push(fragment.to_string());
        Ok(())
    }

    fn navigate(&self, href: &str) -> Result<()> {
        if let Some(hook) = self.navigate_hook.borrow().as_ref() {
            hook(href);
        }
        if self.fail_navigate.get() {
            return Err(PageError::Js("navigation blocked".to_string()));
        }
        self.navigations.borrow_mut().push(href.to_string());
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descendant_selectors() {
        let doc = FakeDocument::new();
        let card = doc.add(
            FakeElement::new("div").with_class("course-card").child(
                FakeElement::new("ul")
                    .child(FakeElement::new("li").child(FakeElement::new("span").with_text("Typing")))
                    .child(FakeElement::new("li").with_text("plain")),
            ),
        );
        assert_eq!(card.query_all("ul li").unwrap().len(), 2);
        assert_eq!(doc.query_all("div.course-card span").unwrap().len(), 1);
        assert!(doc.query("section img").unwrap().is_none());
    }

    #[test]
    fn test_attribute_prefix_selector() {
        let doc = FakeDocument::new();
        doc.add(FakeElement::new("img").attr("src", "https://images.pexels.com/a.jpg"));
        doc.add(FakeElement::new("img").attr("src", "/local.png"));
        let found = doc.query_all("img[src^=\"https://images.pexels.com\"]").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_invalid_selectors_are_rejected() {
        let doc = FakeDocument::new();
        assert!(doc.query("#").is_err());
        assert!(doc.query("#1st").is_err());
        assert!(doc.query("#ok!").is_err());
    }

    #[test]
    fn test_scheduler_runs_timers_in_due_order() {
        let scheduler = FakeScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(300u32, "c"), (100, "a"), (200, "b")] {
            let log = log.clone();
            scheduler.after(delay, Box::new(move || log.borrow_mut().push(label)));
        }
        scheduler.advance(250);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        scheduler.advance(50);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.pending_timers(), 0);
    }
}
