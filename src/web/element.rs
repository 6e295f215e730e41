use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::dom::{Document, Element, Rect};
use crate::error::{PageError, Result};

#[derive(Clone, PartialEq)]
pub struct WebElement(pub web_sys::Element);

impl WebElement {
    fn html(&self) -> Result<&HtmlElement> {
        self.0
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| PageError::Js(format!("<{}> is not an HTML element", self.0.tag_name())))
    }
}

fn collect(list: web_sys::NodeList) -> Vec<WebElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement)
        .collect()
}

impl Element for WebElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) -> Result<()> {
        Ok(self.0.class_list().add_1(class)?)
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        Ok(self.0.class_list().remove_1(class)?)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        Ok(self.0.set_attribute(name, value)?)
    }

    fn remove_attribute(&self, name: &str) -> Result<()> {
        Ok(self.0.remove_attribute(name)?)
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        Ok(self.html()?.style().set_property(property, value)?)
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(WebElement)
    }

    fn query(&self, selector: &str) -> Result<Option<Self>> {
        self.0
            .query_selector(selector)
            .map(|found| found.map(WebElement))
            .map_err(|_| PageError::InvalidSelector(selector.to_string()))
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Self>> {
        self.0
            .query_selector_all(selector)
            .map(collect)
            .map_err(|_| PageError::InvalidSelector(selector.to_string()))
    }

    fn append_child(&self, child: &Self) -> Result<()> {
        self.0.append_child(&child.0)?;
        Ok(())
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn click(&self) -> Result<()> {
        self.html()?.click();
        Ok(())
    }

    fn offset_top(&self) -> f64 {
        self.html().map(|el| f64::from(el.offset_top())).unwrap_or(0.0)
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.0.get_bounding_client_rect();
        Rect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }
}

pub struct WebDocument(pub web_sys::Document);

impl Document for WebDocument {
    type Element = WebElement;

    fn by_id(&self, id: &str) -> Option<WebElement> {
        self.0.get_element_by_id(id).map(WebElement)
    }

    fn query(&self, selector: &str) -> Result<Option<WebElement>> {
        self.0
            .query_selector(selector)
            .map(|found| found.map(WebElement))
            .map_err(|_| PageError::InvalidSelector(selector.to_string()))
    }

    fn query_all(&self, selector: &str) -> Result<Vec<WebElement>> {
        self.0
            .query_selector_all(selector)
            .map(collect)
            .map_err(|_| PageError::InvalidSelector(selector.to_string()))
    }

    fn create_element(&self, tag: &str) -> Result<WebElement> {
        Ok(WebElement(self.0.create_element(tag)?))
    }

    fn head(&self) -> Option<WebElement> {
        self.0.head().map(|head| WebElement(head.into()))
    }

    fn body(&self) -> Option<WebElement> {
        self.0.body().map(|body| WebElement(body.into()))
    }
}
