//! HTML page rendering.

use crate::history::ChatHistory;
use handlebars::{Handlebars, RenderError};
use serde::Serialize;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html.hbs");

#[derive(Serialize)]
struct IndexContext<'a> {
    history: &'a ChatHistory,
    llm_enabled: bool,
}

/// Renders the chat page from the embedded handlebars template.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        Self { handlebars }
    }

    /// Render the page with the given history. User and bot text is
    /// HTML-escaped.
    pub fn render_index(&self, history: &ChatHistory, llm_enabled: bool) -> Result<String, RenderError> {
        self.handlebars.render_template(
            INDEX_TEMPLATE,
            &IndexContext {
                history,
                llm_enabled,
            },
        )
    }
}
