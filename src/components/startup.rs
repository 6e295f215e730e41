/// When a deferred step runs, relative to `document.readyState` at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Now,
    /// Wait for the named event (`DOMContentLoaded` on the document, `load` on the window).
    OnEvent(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupPlan {
    /// Images, hero preload and course cards need the parsed document.
    pub content: Trigger,
    /// The loading overlay waits for every resource.
    pub reveal: Trigger,
}

impl StartupPlan {
    pub fn from_ready_state(state: &str) -> Self {
        let content = if state == "loading" {
            Trigger::OnEvent("DOMContentLoaded")
        } else {
            Trigger::Now
        };
        let reveal = if state == "complete" {
            Trigger::Now
        } else {
            Trigger::OnEvent("load")
        };
        StartupPlan { content, reveal }
    }
}
