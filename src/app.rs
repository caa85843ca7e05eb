//! Wiring of one reading session: the views, their routes and the state
//! they share.

use std::sync::Arc;

use crate::detail_view::{NewsDetailView, SHOW_ROUTE};
use crate::error::RenderError;
use crate::feed_view::{NewsFeedView, PAGE_ROUTE};
use crate::hn_client::{DataFetcher, Endpoints};
use crate::models::{DetailItem, FeedItem};
use crate::mount::OutputSink;
use crate::router::{Router, ViewId};
use crate::session::SessionState;

pub struct App {
    router: Router,
    session: SessionState,
    feed_view: ViewId,
    detail_view: ViewId,
}

impl App {
    pub fn new(
        container: Arc<dyn OutputSink>,
        feed_api: Arc<dyn DataFetcher<Vec<FeedItem>>>,
        detail_api: Arc<dyn DataFetcher<DetailItem>>,
        endpoints: Endpoints,
    ) -> Self {
        let mut router = Router::new();
        let feed_view = router.add_view(Box::new(NewsFeedView::new(
            container.clone(),
            feed_api,
            endpoints.feed_url.clone(),
        )));
        let detail_view =
            router.add_view(Box::new(NewsDetailView::new(container, detail_api, endpoints)));

        router.set_default_page(feed_view);
        router.add_router_path(PAGE_ROUTE, feed_view);
        router.add_router_path(SHOW_ROUTE, detail_view);

        Self {
            router,
            session: SessionState::new(),
            feed_view,
            detail_view,
        }
    }

    /// Handles one fragment change. Runs to completion, mount write included,
    /// before returning, so callers that await each navigation in turn never
    /// see an older render land after a newer one.
    pub async fn navigate(&mut self, fragment: &str) -> Result<Option<ViewId>, RenderError> {
        self.router.route(fragment, &mut self.session).await
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn feed_view(&self) -> ViewId {
        self.feed_view
    }

    pub fn detail_view(&self) -> ViewId {
        self.detail_view
    }
}
