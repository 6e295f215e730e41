use std::rc::Rc;

use log::{debug, error, info};

use crate::config::SiteConfig;
use crate::dom::{Document, Element, Point, Rect, Scheduler, Viewport};
use crate::error::Result;

pub const COURSE_NAME_ATTR: &str = "data-course";
pub const COURSE_PRICE_ATTR: &str = "data-price";
pub const RIPPLE_CLASS: &str = "ripple";
pub const SENDING_CLASS: &str = "email-loading";

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

const FOLLOW_UP_QUESTIONS: [&str; 5] = [
    "Course duration and schedule",
    "Available class times",
    "Registration process",
    "Payment options and plans",
    "Prerequisites (if any)",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetails {
    pub name: String,
    pub price: String,
    pub features: Vec<String>,
}

impl CourseDetails {
    /// Reads name, price and the labelled feature list items off a card.
    pub fn from_card<E: Element>(card: &E) -> Result<Self> {
        let mut features = Vec::new();
        for item in card.query_all("ul li")? {
            if let Some(label) = item.query("span")? {
                let text = label.text_content().trim().to_string();
                if !text.is_empty() {
                    features.push(text);
                }
            }
        }
        Ok(CourseDetails {
            name: card.attribute(COURSE_NAME_ATTR).unwrap_or_default(),
            price: card.attribute(COURSE_PRICE_ATTR).unwrap_or_default(),
            features,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InquiryEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl InquiryEmail {
    pub fn compose(course: &CourseDetails, business_name: &str, recipient: &str) -> Self {
        let subject = format!("Inquiry about {} Course - {}", course.name, business_name);

        let mut lines = vec![
            format!("Hello {} Team,", business_name),
            String::new(),
            format!("I am interested in learning more about the {} course.", course.name),
            String::new(),
            "Course Information:".to_string(),
            DIVIDER.to_string(),
            format!("Course Name: {}", course.name),
            format!("Price: {}", course.price),
            String::new(),
            "Course Features:".to_string(),
        ];
        lines.extend(course.features.iter().map(|f| format!("• {}", f)));
        lines.extend([
            String::new(),
            DIVIDER.to_string(),
            String::new(),
            "I would like to know more about:".to_string(),
        ]);
        lines.extend(FOLLOW_UP_QUESTIONS.iter().map(|q| format!("• {}", q)));
        lines.extend(
            [
                "",
                "Please send me the course details and next steps.",
                "",
                "Thank you for your time!",
                "",
                "Best regards,",
                "[Your Name]",
            ]
            .map(String::from),
        );

        InquiryEmail {
            recipient: recipient.to_string(),
            subject,
            body: lines.join("\n"),
        }
    }

    /// `mailto:` link with percent-encoded fields. Line breaks go out as
    /// `%0D%0A`, which every mail client accepts.
    pub fn mailto_link(&self) -> String {
        let subject = urlencoding::encode(&self.subject);
        let body = urlencoding::encode(&self.body).replace("%0A", "%0D%0A");
        format!("mailto:{}?subject={}&body={}", self.recipient, subject, body)
    }

    /// Plain-text instructions shown when no mail handler could be opened.
    pub fn disclosure(&self, course_name: &str) -> String {
        format!(
            "To inquire about {} course, please email:\n\n{}\n\nSubject: {}",
            course_name, self.recipient, self.subject
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// Square covering the card, centered on the activation point.
    pub fn new(card: Rect, point: Point) -> Self {
        let size = card.width.max(card.height);
        RippleGeometry {
            size,
            left: point.x - card.left - size / 2.0,
            top: point.y - card.top - size / 2.0,
        }
    }
}

pub fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

/// Opens a pre-filled inquiry email for a course card.
pub struct CourseInquiry<D> {
    document: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    viewport: Rc<dyn Viewport>,
    config: Rc<SiteConfig>,
}

impl<D: Document> CourseInquiry<D> {
    pub fn new(
        document: Rc<D>,
        scheduler: Rc<dyn Scheduler>,
        viewport: Rc<dyn Viewport>,
        config: Rc<SiteConfig>,
    ) -> Self {
        CourseInquiry {
            document,
            scheduler,
            viewport,
            config,
        }
    }

    /// Keyboard activation ripples from the card's center.
    pub fn activate_from_keyboard(&self, card: &D::Element) -> Result<InquiryEmail> {
        let point = card.bounding_rect().center();
        self.activate(card, point)
    }

    pub fn activate(&self, card: &D::Element, point: Point) -> Result<InquiryEmail> {
        if let Err(e) = self.spawn_ripple(card, point) {
            debug!("Ripple skipped: {}", e);
        }

        let course = CourseDetails::from_card(card)?;
        let email = InquiryEmail::compose(&course, &self.config.business_name, &self.config.inquiry_email);
        let mailto = email.mailto_link();
        let disclosure = email.disclosure(&course.name);
        info!("Composing inquiry for {}", course.name);

        let link = match self.mail_link(&mailto) {
            Ok(link) => link,
            Err(e) => {
                error!("Error preparing email link: {}", e);
                open_directly(&*self.viewport, &mailto, &disclosure);
                return Ok(email);
            }
        };
        if let Err(e) = card.add_class(SENDING_CLASS) {
            debug!("Sending state not shown: {}", e);
        }

        let card = card.clone();
        let scheduler = Rc::clone(&self.scheduler);
        let viewport = Rc::clone(&self.viewport);
        let sending_clear_ms = self.config.sending_clear_ms;
        let link_cleanup_ms = self.config.link_cleanup_ms;

        // Short pause so the sending state gets painted first
        self.scheduler.after(
            self.config.dispatch_delay_ms,
            Box::new(move || match link.click() {
                Ok(()) => {
                    scheduler.after(sending_clear_ms, Box::new(move || clear_sending(&card)));
                    scheduler.after(link_cleanup_ms, Box::new(move || link.remove()));
                }
                Err(e) => {
                    error!("Error opening email client: {}", e);
                    clear_sending(&card);
                    open_directly(&*viewport, &mailto, &disclosure);
                    link.remove();
                }
            }),
        );

        Ok(email)
    }

    /// Hidden `mailto:` anchor attached to the body, ready to be clicked.
    fn mail_link(&self, mailto: &str) -> Result<D::Element> {
        let link = self.document.create_element("a")?;
        link.set_attribute("href", mailto)?;
        link.set_style("display", "none")?;
        if let Some(body) = self.document.body() {
            body.append_child(&link)?;
        }
        Ok(link)
    }

    fn spawn_ripple(&self, card: &D::Element, point: Point) -> Result<()> {
        let geometry = RippleGeometry::new(card.bounding_rect(), point);
        let ripple = self.document.create_element("span")?;
        ripple.add_class(RIPPLE_CLASS)?;
        ripple.set_style("width", &format!("{}px", geometry.size))?;
        ripple.set_style("height", &format!("{}px", geometry.size))?;
        ripple.set_style("left", &format!("{}px", geometry.left))?;
        ripple.set_style("top", &format!("{}px", geometry.top))?;
        card.append_child(&ripple)?;

        self.scheduler
            .after(self.config.ripple_lifetime_ms, Box::new(move || ripple.remove()));
        Ok(())
    }
}

fn clear_sending<E: Element>(card: &E) {
    if let Err(e) = card.remove_class(SENDING_CLASS) {
        debug!("Sending state not cleared: {}", e);
    }
}

/// Navigates straight to the mailto URL, showing the address as a last resort.
fn open_directly(viewport: &dyn Viewport, mailto: &str, disclosure: &str) {
    if let Err(e) = viewport.navigate(mailto) {
        error!("Fallback navigation failed: {}", e);
        viewport.alert(disclosure);
    }
}
