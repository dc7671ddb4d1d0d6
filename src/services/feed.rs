use std::sync::Arc;

use crate::{
    models::{post::PostView, user::AuthUser},
    store::{PostStore, StoreError},
};

/// Number of posts returned by the feed.
pub const FEED_LIMIT: i64 = 50;

/// Builds the public feed, annotated for the viewer when there is one.
#[derive(Clone)]
pub struct FeedAssembler {
    store: Arc<dyn PostStore>,
}

impl FeedAssembler {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn get_feed(&self, viewer: Option<&AuthUser>) -> Result<Vec<PostView>, StoreError> {
        let viewer_id = viewer.map(|user| user.user_id.as_str());
        self.store.recent_posts(FEED_LIMIT, viewer_id).await
    }
}
