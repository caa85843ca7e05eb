use crate::models::FeedItem;

/// Rows per feed page.
pub const PAGE_SIZE: usize = 10;
/// Highest page the pagination links will point at.
pub const MAX_PAGE: u32 = 3;

/// State shared by every view for the lifetime of one session.
///
/// Built once at startup and handed to each render by `&mut`, so read flags
/// set by the detail view are what the feed view sees next.
#[derive(Debug, Clone)]
pub struct SessionState {
    current_page: u32,
    feeds: Option<Vec<FeedItem>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            feeds: None,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Stores the page, clamped to `1..=MAX_PAGE`.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.clamp(1, MAX_PAGE);
    }

    /// Whether the feed list has been fetched this session.
    pub fn has_feeds(&self) -> bool {
        self.feeds.is_some()
    }

    /// Caches the feed list. Every item starts unread. Later calls are
    /// ignored so the first fetch stays the session's copy.
    pub fn store_feeds(&mut self, mut feeds: Vec<FeedItem>) {
        if self.feeds.is_some() {
            return;
        }
        for feed in &mut feeds {
            feed.read = false;
        }
        self.feeds = Some(feeds);
    }

    pub fn feeds(&self) -> &[FeedItem] {
        self.feeds.as_deref().unwrap_or_default()
    }

    /// Flags the item with `id` as read. Returns false when it is not cached.
    pub fn mark_read(&mut self, id: i64) -> bool {
        let Some(feeds) = self.feeds.as_mut() else {
            return false;
        };
        match feeds.iter_mut().find(|feed| feed.news.id == id) {
            Some(feed) => {
                feed.read = true;
                true
            }
            None => false,
        }
    }
}
