//! Fragment dispatcher.
//!
//! Entries are tried in registration order with a substring test against the
//! raw fragment; the first hit renders. The empty fragment goes to the
//! default page only and skips the table. Nothing matching means nothing
//! renders and the mount keeps its content.

use crate::error::RenderError;
use crate::session::SessionState;
use crate::view::Renderable;

/// Handle to a view registered with a [`Router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub view: ViewId,
}

#[derive(Default)]
pub struct Router {
    views: Vec<Box<dyn Renderable>>,
    route_table: Vec<RouteEntry>,
    // Path is always "", the fragment it serves
    default_route: Option<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_view(&mut self, view: Box<dyn Renderable>) -> ViewId {
        self.views.push(view);
        ViewId(self.views.len() - 1)
    }

    pub fn set_default_page(&mut self, view: ViewId) {
        self.default_route = Some(RouteEntry {
            path: String::new(),
            view,
        });
    }

    pub fn add_router_path(&mut self, path: impl Into<String>, view: ViewId) {
        self.route_table.push(RouteEntry {
            path: path.into(),
            view,
        });
    }

    /// The entry `fragment` dispatches through.
    pub fn matched_route(&self, fragment: &str) -> Option<&RouteEntry> {
        let fragment = normalize(fragment);
        if fragment.is_empty() {
            if let Some(entry) = &self.default_route {
                return Some(entry);
            }
        }

        self.route_table
            .iter()
            .find(|entry| fragment.contains(entry.path.as_str()))
    }

    /// The view `fragment` dispatches to, without rendering it.
    pub fn resolve(&self, fragment: &str) -> Option<ViewId> {
        self.matched_route(fragment).map(|entry| entry.view)
    }

    /// Renders the view for `fragment`, returning which one ran.
    pub async fn route(
        &mut self,
        fragment: &str,
        session: &mut SessionState,
    ) -> Result<Option<ViewId>, RenderError> {
        let Some(entry) = self.matched_route(fragment) else {
            tracing::warn!(fragment, "no route matches, keeping current page");
            return Ok(None);
        };
        let id = entry.view;
        let route = entry.path.clone();
        let Some(view) = self.views.get_mut(id.0) else {
            tracing::warn!(fragment, %route, view = id.0, "route points at an unregistered view");
            return Ok(None);
        };

        tracing::debug!(fragment, %route, view = view.name(), "dispatching");
        view.render(normalize(fragment), session).await?;
        Ok(Some(id))
    }
}

// A lone "#" is what an emptied location hash looks like.
fn normalize(fragment: &str) -> &str {
    if fragment == "#" {
        ""
    } else {
        fragment
    }
}
