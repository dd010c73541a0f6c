//! Email Template Engine
//!
//! Handlebars-based rendering of the shared message template. The template is
//! the whole message as it goes on the wire, headers included.

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
};
use mailshot_models::{EffectiveVariables, RenderedMessage};
use mailshot_utils::MailshotResult;
use std::path::Path;
use tracing::debug;

/// Name under which the message template is registered.
pub const TEMPLATE_NAME: &str = "email.tmpl";

/// Name of the helper formatting a bare address as `<address>`.
pub const ADDRESS_HELPER: &str = "emailAddressStructure";

/// Template engine holding the single message template of a run.
///
/// `{{Key}}` substitutes HTML-escaped, `{{{Key}}}` substitutes raw. A key missing
/// from the variables is a render error.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Load the template file at `path`.
    pub fn load(path: impl AsRef<Path>) -> MailshotResult<Self> {
        let path = path.as_ref();
        let mut handlebars = Self::registry();
        handlebars.register_template_file(TEMPLATE_NAME, path)?;
        debug!(path = %path.display(), "Loaded email template");
        Ok(Self { handlebars })
    }

    /// Build an engine from template text held in memory.
    pub fn from_source(source: &str) -> MailshotResult<Self> {
        let mut handlebars = Self::registry();
        handlebars.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { handlebars })
    }

    fn registry() -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_helper(ADDRESS_HELPER, Box::new(email_address_structure));
        handlebars
    }

    /// Render the template against one recipient's variables.
    pub fn render(&self, variables: &EffectiveVariables) -> MailshotResult<RenderedMessage> {
        let text = self.handlebars.render(TEMPLATE_NAME, variables)?;
        Ok(RenderedMessage::from(text))
    }
}

/// `{{emailAddressStructure SenderEmail}}` writes `<sender@example.com>`.
/// The output is written as-is, bypassing HTML escaping.
fn email_address_structure(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h
        .param(0)
        .ok_or_else(|| RenderError::new(format!("{ADDRESS_HELPER}: address parameter required")))?;

    if param.is_value_missing() {
        return Err(RenderError::new(format!(
            "{ADDRESS_HELPER}: address variable is not defined"
        )));
    }

    let address = param
        .value()
        .as_str()
        .ok_or_else(|| RenderError::new(format!("{ADDRESS_HELPER}: address must be a string")))?;

    out.write(&format!("<{address}>"))?;
    Ok(())
}
