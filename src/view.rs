//! Template engine shared by the pages.
//!
//! A template is plain markup with `{{__name__}}` placeholders. A render
//! substitutes into a working copy, builds repeated fragments through the
//! accumulation list, then mounts the copy and starts over from the pristine
//! template.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::error::{MountError, RenderError};
use crate::mount::OutputSink;
use crate::session::SessionState;

/// Opening of a placeholder, and what a substituted value carries instead.
const PLACEHOLDER_OPEN: &str = "{{__";
const ESCAPED_OPEN: &str = "&#123;{__";

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{__([A-Za-z0-9_]+?)__\}\}").unwrap();
}

/// A page the router can dispatch to.
#[async_trait]
pub trait Renderable: Send {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Render for `fragment`. Any fetch completes before substitution starts,
    /// so an error leaves the mounted content as it was.
    async fn render(&mut self, fragment: &str, session: &mut SessionState)
        -> Result<(), RenderError>;
}

pub struct View {
    template: String,
    render_template: String,
    html_list: Vec<String>,
    container: Arc<dyn OutputSink>,
}

impl View {
    pub fn new(container: Arc<dyn OutputSink>, template: impl Into<String>) -> Self {
        let template = template.into();
        Self {
            render_template: template.clone(),
            template,
            html_list: Vec::new(),
            container,
        }
    }

    /// Replaces the first `{{__key__}}` in the working copy.
    ///
    /// A `{{__` inside `value` is written as `&#123;{__`, which a browser
    /// shows unchanged, so text from the API can never be taken for a
    /// placeholder by a later substitution.
    pub fn set_template_data(&mut self, key: &str, value: &str) {
        let placeholder = format!("{{{{__{key}__}}}}");
        if !self.render_template.contains(&placeholder) {
            tracing::debug!(key, "placeholder not present");
            return;
        }
        let value = value.replace(PLACEHOLDER_OPEN, ESCAPED_OPEN);
        self.render_template = self.render_template.replacen(&placeholder, &value, 1);
    }

    pub fn add_html(&mut self, html: impl Into<String>) {
        self.html_list.push(html.into());
    }

    /// Joins and clears the accumulation list.
    pub fn get_html(&mut self) -> String {
        let snapshot = self.html_list.concat();
        self.html_list.clear();
        snapshot
    }

    /// Mounts the working copy, then resets it to the template. The reset
    /// happens even if the mount fails.
    pub fn update_view(&mut self) -> Result<(), MountError> {
        let leftover = unresolved_placeholders(&self.render_template);
        if !leftover.is_empty() {
            tracing::warn!(placeholders = ?leftover, "mounting markup with unset placeholders");
        }

        let rendered = std::mem::replace(&mut self.render_template, self.template.clone());
        self.container.mount(&rendered)
    }

    /// The working copy as it stands.
    pub fn render_buffer(&self) -> &str {
        &self.render_template
    }
}

/// Names of the placeholders still present in `markup`, in order.
pub fn unresolved_placeholders(markup: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(markup)
        .map(|caps| caps[1].to_string())
        .collect()
}
