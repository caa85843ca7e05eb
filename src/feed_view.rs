use async_trait::async_trait;
use html_escape::encode_text;
use std::sync::Arc;

use crate::error::RenderError;
use crate::hn_client::DataFetcher;
use crate::models::FeedItem;
use crate::mount::OutputSink;
use crate::session::{SessionState, MAX_PAGE, PAGE_SIZE};
use crate::view::{Renderable, View};

/// Route prefix carrying the page number.
pub const PAGE_ROUTE: &str = "/page/";

const TEMPLATE: &str = r##"
    <div class="bg-gray-600 min-h-screen">
      <div class="bg-white text-xl">
        <div class="mx-auto px-4">
          <div class="flex justify-between items-center py-6">
            <div class="flex justify-start">
              <h1 class="font-extrabold">Hacker News</h1>
            </div>
            <div class="items-center justify-end">
              <a href="#/page/{{__prev_page__}}" class="text-gray-500">
                Previous
              </a>
              <a href="#/page/{{__next_page__}}" class="text-gray-500 ml-4">
                Next
              </a>
            </div>
          </div>
        </div>
      </div>
      <div class="p-4 text-2xl text-gray-700">
        {{__news_feed__}}
      </div>
    </div>
"##;

pub struct NewsFeedView {
    view: View,
    api: Arc<dyn DataFetcher<Vec<FeedItem>>>,
    feed_url: String,
}

impl NewsFeedView {
    pub fn new(
        container: Arc<dyn OutputSink>,
        api: Arc<dyn DataFetcher<Vec<FeedItem>>>,
        feed_url: impl Into<String>,
    ) -> Self {
        Self {
            view: View::new(container, TEMPLATE),
            api,
            feed_url: feed_url.into(),
        }
    }
}

#[async_trait]
impl Renderable for NewsFeedView {
    fn name(&self) -> &'static str {
        "feed"
    }

    async fn render(
        &mut self,
        fragment: &str,
        session: &mut SessionState,
    ) -> Result<(), RenderError> {
        if !session.has_feeds() {
            let feeds = self.api.fetch(&self.feed_url).await?;
            tracing::info!(count = feeds.len(), "feed list cached");
            session.store_feeds(feeds);
        }

        session.set_current_page(page_from_fragment(fragment));
        let page = session.current_page();
        let (start, end) = page_window(page);
        tracing::debug!(page, start, end, "rendering feed page");

        let feeds = session.feeds();
        for index in start..end {
            // Past the end of a short feed the slot stays empty
            if let Some(feed) = feeds.get(index) {
                self.view.add_html(feed_row(feed));
            }
        }

        let rows = self.view.get_html();
        let (prev, next) = page_links(page);
        self.view.set_template_data("news_feed", &rows);
        self.view.set_template_data("prev_page", &prev.to_string());
        self.view.set_template_data("next_page", &next.to_string());
        self.view.update_view()?;
        Ok(())
    }
}

/// Page number from `#/page/<n>`; anything missing or unparseable is page 1.
pub fn page_from_fragment(fragment: &str) -> u32 {
    fragment
        .find(PAGE_ROUTE)
        .and_then(|at| fragment[at + PAGE_ROUTE.len()..].trim().parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// Index range `[start, end)` of the feed rows shown on `page`.
pub fn page_window(page: u32) -> (usize, usize) {
    let page = page.max(1) as usize;
    ((page - 1) * PAGE_SIZE, page * PAGE_SIZE)
}

/// Targets of the previous and next links.
pub fn page_links(page: u32) -> (u32, u32) {
    let prev = if page > 1 { page - 1 } else { 1 };
    let next = if page < MAX_PAGE { page + 1 } else { MAX_PAGE };
    (prev, next)
}

fn feed_row(feed: &FeedItem) -> String {
    let background = if feed.read { "bg-red-300" } else { "bg-white" };
    format!(
        r##"
      <div class="p-6 {background} mt-6 rounded-lg shadow-md transition-colors duration-500 hover:bg-green-100">
        <div class="flex">
          <div class="flex-auto">
            <a href="#/show/{id}">{title}</a>
          </div>
          <div class="text-center text-sm">
            <div class="w-10 text-white bg-green-300 rounded-lg px-0 py-2">{comments_count}</div>
          </div>
        </div>
        <div class="flex mt-3">
          <div class="grid grid-cols-3 text-sm text-gray-500">
            <div><i class="fa-solid fa-user mr-1"></i>{user}</div>
            <div><i class="fa-solid fa-heart pr-1"></i>{points}</div>
            <div><i class="fa-regular fa-clock pr-1"></i>{time_ago}</div>
          </div>
        </div>
      </div>
"##,
        id = feed.news.id,
        title = encode_text(&feed.news.title),
        comments_count = feed.comments_count,
        user = encode_text(&feed.news.user),
        points = feed.points,
        time_ago = encode_text(&feed.news.time_ago),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hn_client::MemoryFetcher;
    use crate::models::NewsItem;
    use crate::mount::MemoryMount;

    const FEED_URL: &str = "http://api.test/news.json";

    fn feeds(count: i64) -> Vec<FeedItem> {
        (1..=count)
            .map(|id| FeedItem {
                news: NewsItem {
                    id,
                    title: format!("Story {id}"),
                    user: format!("user{id}"),
                    time_ago: "1 hour ago".to_string(),
                    ..NewsItem::default()
                },
                comments_count: 3,
                points: 10,
                read: false,
            })
            .collect()
    }

    fn feed_view(count: i64) -> (NewsFeedView, MemoryMount, Arc<MemoryFetcher<Vec<FeedItem>>>) {
        let mount = MemoryMount::new();
        let api = Arc::new(MemoryFetcher::new().with_response(FEED_URL, feeds(count)));
        let view = NewsFeedView::new(Arc::new(mount.clone()), api.clone(), FEED_URL);
        (view, mount, api)
    }

    fn row_count(markup: &str) -> usize {
        markup.matches("href=\"#/show/").count()
    }

    #[test]
    fn page_is_read_from_fragment_suffix() {
        assert_eq!(page_from_fragment("#/page/2"), 2);
        assert_eq!(page_from_fragment("/page/3"), 3);
        assert_eq!(page_from_fragment(""), 1);
        assert_eq!(page_from_fragment("#/page/"), 1);
        assert_eq!(page_from_fragment("#/page/abc"), 1);
        assert_eq!(page_from_fragment("#/page/0"), 1);
        assert_eq!(page_from_fragment("#/page/-2"), 1);
    }

    #[test]
    fn page_links_are_clamped() {
        assert_eq!(page_links(1), (1, 2));
        assert_eq!(page_links(2), (1, 3));
        assert_eq!(page_links(3), (2, 3));
    }

    #[test]
    fn page_window_covers_ten_rows() {
        assert_eq!(page_window(1), (0, 10));
        assert_eq!(page_window(3), (20, 30));
    }

    #[tokio::test]
    async fn renders_requested_page_with_links() {
        let (mut view, mount, _) = feed_view(30);
        let mut session = SessionState::new();

        view.render("#/page/2", &mut session).await.unwrap();

        let markup = mount.current().unwrap();
        assert_eq!(session.current_page(), 2);
        assert_eq!(row_count(&markup), 10);
        assert!(markup.contains(r##"href="#/show/11""##));
        assert!(markup.contains(r##"href="#/show/20""##));
        assert!(!markup.contains(r##"href="#/show/21""##));
        assert!(markup.contains(r##"href="#/page/1""##));
        assert!(markup.contains(r##"href="#/page/3""##));
        assert!(!markup.contains("{{__"));
    }

    #[tokio::test]
    async fn short_feed_renders_available_rows_only() {
        let (mut view, mount, _) = feed_view(7);
        let mut session = SessionState::new();

        view.render("", &mut session).await.unwrap();
        assert_eq!(row_count(&mount.current().unwrap()), 7);

        view.render("#/page/3", &mut session).await.unwrap();
        assert_eq!(row_count(&mount.current().unwrap()), 0);
    }

    #[tokio::test]
    async fn feed_is_fetched_once_per_session() {
        let (mut view, _, api) = feed_view(30);
        let mut session = SessionState::new();

        view.render("", &mut session).await.unwrap();
        view.render("#/page/2", &mut session).await.unwrap();
        view.render("#/page/3", &mut session).await.unwrap();

        assert_eq!(api.requests(), vec![FEED_URL]);
    }

    #[tokio::test]
    async fn read_items_get_highlighted() {
        let (mut view, mount, _) = feed_view(10);
        let mut session = SessionState::new();
        view.render("", &mut session).await.unwrap();
        assert!(!mount.current().unwrap().contains("bg-red-300"));

        session.mark_read(4);
        view.render("", &mut session).await.unwrap();
        assert_eq!(mount.current().unwrap().matches("bg-red-300").count(), 1);
    }

    #[tokio::test]
    async fn titles_are_escaped() {
        let mount = MemoryMount::new();
        let mut items = feeds(1);
        items[0].news.title = "<script>alert(1)</script>".to_string();
        let api = Arc::new(MemoryFetcher::new().with_response(FEED_URL, items));
        let mut view = NewsFeedView::new(Arc::new(mount.clone()), api, FEED_URL);

        view.render("", &mut SessionState::new()).await.unwrap();

        let markup = mount.current().unwrap();
        assert!(markup.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!markup.contains("<script>"));
    }

    #[tokio::test]
    async fn placeholder_text_in_titles_does_not_swallow_page_links() {
        let mount = MemoryMount::new();
        let mut items = feeds(2);
        items[0].news.title = "Show HN: {{__prev_page__}} templating".to_string();
        items[1].news.user = "{{__next_page__}}".to_string();
        let api = Arc::new(MemoryFetcher::new().with_response(FEED_URL, items));
        let mut view = NewsFeedView::new(Arc::new(mount.clone()), api, FEED_URL);

        view.render("#/page/2", &mut SessionState::new()).await.unwrap();

        let markup = mount.current().unwrap();
        assert!(markup.contains("Show HN: &#123;{__prev_page__}} templating"));
        assert!(markup.contains(r##"href="#/page/1""##));
        assert!(markup.contains(r##"href="#/page/3""##));
        assert!(!markup.contains("{{__"));
    }

    #[tokio::test]
    async fn failed_fetch_mounts_nothing_and_keeps_page() {
        let mount = MemoryMount::new();
        let api: Arc<MemoryFetcher<Vec<FeedItem>>> = Arc::new(MemoryFetcher::new());
        let mut view = NewsFeedView::new(Arc::new(mount.clone()), api, FEED_URL);
        let mut session = SessionState::new();

        let err = view.render("#/page/2", &mut session).await.unwrap_err();

        assert!(matches!(err, RenderError::Fetch(_)));
        assert!(mount.writes().is_empty());
        assert_eq!(session.current_page(), 1);
        assert!(!session.has_feeds());
    }
}
