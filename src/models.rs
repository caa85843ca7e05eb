use serde::{Deserialize, Deserializer};

/// Fields shared by every record the API returns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_ago: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// One row of the news list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub news: NewsItem,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i64,
    // Session state, never on the wire
    #[serde(skip)]
    pub read: bool,
}

/// A story together with its comment thread.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub struct DetailItem {
    pub news: NewsItem,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub struct Comment {
    pub news: NewsItem,
    pub comments: Vec<Comment>,
    /// Depth below the story, root comments sit at 0.
    pub level: u32,
}

// Wire shape of stories and comments. `flatten` would buffer each whole
// subtree before decoding it, so the recursive types go through this.
#[derive(Deserialize)]
struct RawNode {
    id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    time_ago: String,
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    comments: Vec<Comment>,
    #[serde(default, deserialize_with = "null_as_default")]
    level: u32,
}

impl RawNode {
    fn into_parts(self) -> (NewsItem, Vec<Comment>, u32) {
        let news = NewsItem {
            id: self.id,
            title: self.title,
            url: self.url,
            user: self.user,
            time_ago: self.time_ago,
            content: self.content,
        };
        (news, self.comments, self.level)
    }
}

impl From<RawNode> for DetailItem {
    fn from(raw: RawNode) -> Self {
        let (news, comments, _) = raw.into_parts();
        Self { news, comments }
    }
}

impl From<RawNode> for Comment {
    fn from(raw: RawNode) -> Self {
        let (news, comments, level) = raw.into_parts();
        Self {
            news,
            comments,
            level,
        }
    }
}

impl Comment {
    /// Number of comments in this subtree, the node itself included.
    pub fn thread_size(&self) -> usize {
        1 + self.comments.iter().map(Comment::thread_size).sum::<usize>()
    }
}

// Job posts and deleted comments send `null` where a value is expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_item_decodes_job_post_with_nulls() {
        let json = r#"{
            "id": 4242,
            "title": "Acme is hiring",
            "points": null,
            "user": null,
            "time": 1700000000,
            "time_ago": "2 hours ago",
            "comments_count": 0,
            "type": "job",
            "url": "https://acme.example/jobs",
            "domain": "acme.example"
        }"#;

        let item: FeedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.news.id, 4242);
        assert_eq!(item.news.title, "Acme is hiring");
        assert_eq!(item.news.user, "");
        assert_eq!(item.news.content, "");
        assert_eq!(item.points, 0);
        assert!(!item.read);
    }

    #[test]
    fn detail_item_decodes_nested_comment_tree() {
        let json = r#"{
            "id": 1,
            "title": "Story",
            "user": "op",
            "time_ago": "1 hour ago",
            "content": "<p>body</p>",
            "comments": [
                {
                    "id": 2, "user": "a", "time_ago": "50 minutes ago",
                    "content": "<p>first</p>", "level": 0,
                    "comments": [
                        { "id": 3, "user": "b", "time_ago": "40 minutes ago",
                          "content": "<p>reply</p>", "level": 1, "comments": [] }
                    ]
                },
                { "id": 4, "user": null, "time_ago": "10 minutes ago",
                  "content": "[deleted]", "level": 0 }
            ]
        }"#;

        let detail: DetailItem = serde_json::from_str(json).unwrap();
        assert_eq!(detail.news.content, "<p>body</p>");
        assert_eq!(detail.comments.len(), 2);
        assert_eq!(detail.comments[0].comments[0].news.user, "b");
        assert_eq!(detail.comments[0].comments[0].level, 1);
        assert_eq!(detail.comments[1].news.user, "");
        assert!(detail.comments[1].comments.is_empty());
    }

    #[test]
    fn thread_size_counts_every_descendant() {
        let leaf = Comment::default();
        let mid = Comment {
            comments: vec![leaf.clone(), leaf.clone()],
            ..Comment::default()
        };
        let root = Comment {
            comments: vec![mid, leaf],
            ..Comment::default()
        };
        assert_eq!(root.thread_size(), 5);
    }
}
