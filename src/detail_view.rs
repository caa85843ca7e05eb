use async_trait::async_trait;
use html_escape::encode_text;
use std::sync::Arc;

use crate::error::RenderError;
use crate::hn_client::{DataFetcher, Endpoints};
use crate::models::{Comment, DetailItem};
use crate::mount::OutputSink;
use crate::session::SessionState;
use crate::view::{Renderable, View};

/// Route prefix carrying the item id.
pub const SHOW_ROUTE: &str = "/show/";

/// Horizontal indent per comment level, in pixels.
const INDENT_PX: u32 = 40;

const TEMPLATE: &str = r##"
    <div class="bg-gray-600 min-h-screen">
      <div class="bg-white text-xl">
        <div class="mx-auto px-4">
          <div class="flex justify-between items-center py-6">
            <div class="flex justify-start">
              <h1 class="font-extrabold">Hacker News</h1>
            </div>
            <div class="items-center justify-end">
              <a href="#/page/{{__currentPage__}}" class="text-gray-500">
                <i class="fa-solid fa-x"></i>
              </a>
            </div>
          </div>
        </div>
      </div>
      <div class="m-6 p-4 bg-white rounded-xl">
        <h2>{{__title__}}</h2>
        <div class="text-gray-400 h-20">
          {{__content__}}
        </div>
        {{__comment__}}
      </div>
    </div>
"##;

pub struct NewsDetailView {
    view: View,
    api: Arc<dyn DataFetcher<DetailItem>>,
    endpoints: Endpoints,
}

impl NewsDetailView {
    pub fn new(
        container: Arc<dyn OutputSink>,
        api: Arc<dyn DataFetcher<DetailItem>>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            view: View::new(container, TEMPLATE),
            api,
            endpoints,
        }
    }

    /// Renders a comment list depth-first, each node followed by its replies.
    ///
    /// Fragments go through the view's accumulation list. Every call drains
    /// the list before returning, so a nested call hands back everything
    /// queued so far and the caller re-queues it as one piece. The result
    /// depends only on `comments`.
    pub fn make_comment(&mut self, comments: &[Comment]) -> String {
        for comment in comments {
            self.view.add_html(comment_fragment(comment));
            if !comment.comments.is_empty() {
                let replies = self.make_comment(&comment.comments);
                self.view.add_html(replies);
            }
        }
        self.view.get_html()
    }
}

#[async_trait]
impl Renderable for NewsDetailView {
    fn name(&self) -> &'static str {
        "detail"
    }

    async fn render(
        &mut self,
        fragment: &str,
        session: &mut SessionState,
    ) -> Result<(), RenderError> {
        let id = id_from_fragment(fragment);
        let url = self.endpoints.item_url_for(id);
        let detail = self.api.fetch(&url).await?;

        // Unparseable ids and items outside the cached feed leave the flags alone
        let marked = id
            .parse::<i64>()
            .map(|numeric| session.mark_read(numeric))
            .unwrap_or(false);

        let thread_size: usize = detail.comments.iter().map(Comment::thread_size).sum();
        tracing::debug!(id, marked, comments = thread_size, "rendering detail");

        let comments = self.make_comment(&detail.comments);
        self.view
            .set_template_data("currentPage", &session.current_page().to_string());
        self.view
            .set_template_data("title", &encode_text(&detail.news.title));
        self.view.set_template_data("content", &detail.news.content);
        self.view.set_template_data("comment", &comments);
        self.view.update_view()?;
        Ok(())
    }
}

/// Raw id following `/show/`, possibly empty or non-numeric.
pub fn id_from_fragment(fragment: &str) -> &str {
    fragment
        .find(SHOW_ROUTE)
        .map(|at| fragment[at + SHOW_ROUTE.len()..].trim())
        .unwrap_or_default()
}

fn comment_fragment(comment: &Comment) -> String {
    format!(
        r#"
      <div style="padding-left: {indent}px;" class="mt-4">
        <div class="text-gray-400">
          <i class="fa-solid fa-sort-up"></i>
          <strong>{user}</strong> {time_ago}
        </div>
        <p class="text-gray-700">{content}</p>
      </div>
"#,
        indent = comment.level.saturating_add(1).saturating_mul(INDENT_PX),
        user = encode_text(&comment.news.user),
        time_ago = encode_text(&comment.news.time_ago),
        content = comment.news.content,
    )
}
