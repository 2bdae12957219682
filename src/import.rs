//! Import panel: browse remote posts page by page and turn them into todos.

use crate::api::{Post, PostsClient};
use crate::error::StoreResult;
use crate::todo::{CreateTodoRequest, Origin, Priority};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_POSTS_PER_PAGE: usize = 5;
/// Post bodies longer than this are cut when they become descriptions.
pub const DESCRIPTION_LIMIT: usize = 100;
/// Pages shown on either side of the current one.
const PAGE_WINDOW: usize = 2;

pub const JSON_FORMAT: &str = "application/json";
pub const TEXT_FORMAT: &str = "text/plain";

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load posts from the API";

/// A post on the current page, with the priority it will be imported at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithPriority {
    pub post: Post,
    pub priority: Priority,
}

impl PostWithPriority {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            priority: Priority::Medium,
        }
    }

    pub fn id(&self) -> u64 {
        self.post.id
    }

    /// The request this post becomes. Origin is left for the caller to stamp.
    pub fn to_create_request(&self) -> CreateTodoRequest {
        CreateTodoRequest::new(self.post.title.clone(), self.priority)
            .with_description(truncate_body(&self.post.body))
    }
}

/// First [`DESCRIPTION_LIMIT`] characters, with `...` appended when cut.
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Format-keyed payload carried from the import panel to the todo list,
/// shaped like a drag-and-drop data transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragPayload {
    data: BTreeMap<String, String>,
}

/// What a drop delivers once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedPost {
    pub request: CreateTodoRequest,
    pub post_id: Option<u64>,
}

impl DragPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_post(post: &PostWithPriority) -> serde_json::Result<Self> {
        let mut payload = Self::new();
        payload.set_data(JSON_FORMAT, serde_json::to_string(&post.to_create_request())?);
        payload.set_data(TEXT_FORMAT, post.id().to_string());
        Ok(payload)
    }

    pub fn set_data(&mut self, format: &str, value: impl Into<String>) {
        self.data.insert(format.to_string(), value.into());
    }

    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.data.get(format).map(String::as_str)
    }

    /// `Ok(None)` when there is no JSON entry at all; an unparsable entry is an error.
    pub fn parse(&self) -> serde_json::Result<Option<DroppedPost>> {
        let Some(json) = self.get_data(JSON_FORMAT).filter(|j| !j.is_empty()) else {
            return Ok(None);
        };
        let mut request: CreateTodoRequest = serde_json::from_str(json)?;
        request.origin = Some(Origin::Api);
        let post_id = self
            .get_data(TEXT_FORMAT)
            .and_then(|id| id.trim().parse().ok());
        Ok(Some(DroppedPost { request, post_id }))
    }
}

/// Result of a background fetch, tagged with the page it was started for.
#[derive(Debug)]
pub struct PostsLoaded {
    pub page: usize,
    pub result: StoreResult<Vec<Post>>,
}

/// Fetch all posts in the background and report on `tx`.
pub fn spawn_fetch(
    client: PostsClient,
    page: usize,
    tx: mpsc::UnboundedSender<PostsLoaded>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = client.get_posts().await;
        if tx.send(PostsLoaded { page, result }).is_err() {
            debug!(page, "Posts result dropped, panel is gone");
        }
    })
}

#[derive(Debug, Clone)]
pub struct ImportPanel {
    posts: Vec<PostWithPriority>,
    selected: Vec<u64>,
    pub loading: bool,
    pub error: Option<String>,
    current_page: usize,
    per_page: usize,
    total_posts: usize,
    cursor: usize,
}

impl Default for ImportPanel {
    fn default() -> Self {
        Self::new(DEFAULT_POSTS_PER_PAGE)
    }
}

impl ImportPanel {
    pub fn new(per_page: usize) -> Self {
        Self {
            posts: Vec::new(),
            selected: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            per_page: per_page.max(1),
            total_posts: 0,
            cursor: 0,
        }
    }

    pub fn posts(&self) -> &[PostWithPriority] {
        &self.posts
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_posts(&self) -> usize {
        self.total_posts
    }

    pub fn is_loaded(&self) -> bool {
        self.total_posts > 0 || !self.posts.is_empty()
    }

    /// Mark `page` as loading. The matching [`PostsLoaded`] fills it.
    pub fn begin_load(&mut self, page: usize) {
        self.loading = true;
        self.error = None;
        self.current_page = page.max(1);
    }

    /// Apply a finished fetch. Results for a page we have since moved away
    /// from are ignored.
    pub fn finish_load(&mut self, loaded: PostsLoaded) {
        if loaded.page != self.current_page {
            debug!(page = loaded.page, current = self.current_page, "Ignoring stale posts page");
            return;
        }
        self.loading = false;
        match loaded.result {
            Ok(all) => {
                self.total_posts = all.len();
                let start = (self.current_page - 1) * self.per_page;
                self.posts = all
                    .into_iter()
                    .skip(start)
                    .take(self.per_page)
                    .map(PostWithPriority::new)
                    .collect();
                self.cursor = 0;
            }
            Err(e) => {
                warn!(error = %e, "Loading posts failed");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_posts.div_ceil(self.per_page)
    }

    /// Up to two pages either side of the current one.
    pub fn page_numbers(&self) -> Vec<usize> {
        let total = self.total_pages();
        let start = self.current_page.saturating_sub(PAGE_WINDOW).max(1);
        let end = (self.current_page + PAGE_WINDOW).min(total);
        (start..=end).collect()
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    /// The page to load if `page` is in range.
    pub fn go_to_page(&self, page: usize) -> Option<usize> {
        (page >= 1 && page <= self.total_pages()).then_some(page)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&self) -> Option<usize> {
        self.current_page
            .checked_sub(1)
            .and_then(|page| self.go_to_page(page))
    }

    pub fn update_post_priority(&mut self, post_id: u64, priority: Priority) {
        if let Some(post) = self.posts.iter_mut().find(|p| p.id() == post_id) {
            post.priority = priority;
        }
    }

    pub fn cycle_priority(&mut self, post_id: u64) {
        if let Some(post) = self.posts.iter_mut().find(|p| p.id() == post_id) {
            post.priority = post.priority.next();
        }
    }

    pub fn toggle_selection(&mut self, post_id: u64) {
        if let Some(index) = self.selected.iter().position(|id| *id == post_id) {
            self.selected.remove(index);
        } else {
            self.selected.push(post_id);
        }
    }

    pub fn is_selected(&self, post_id: u64) -> bool {
        self.selected.contains(&post_id)
    }

    pub fn select_all(&mut self) {
        self.selected = self.posts.iter().map(PostWithPriority::id).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Requests for every selected post still on the page, in selection
    /// order. Clears the selection.
    pub fn import_selected(&mut self) -> Vec<CreateTodoRequest> {
        let requests = self
            .selected
            .iter()
            .filter_map(|id| self.posts.iter().find(|p| p.id() == *id))
            .map(|p| p.to_create_request().with_origin(Origin::Api))
            .collect();
        self.selected.clear();
        requests
    }

    pub fn drag_payload(&self, post_id: u64) -> Option<DragPayload> {
        let post = self.posts.iter().find(|p| p.id() == post_id)?;
        DragPayload::from_post(post).ok()
    }

    /// Drop a post from the page after it has been turned into a todo.
    pub fn remove_post(&mut self, post_id: u64) {
        let before = self.posts.len();
        self.posts.retain(|p| p.id() != post_id);
        self.selected.retain(|id| *id != post_id);
        if self.posts.len() < before {
            self.total_posts = self.total_posts.saturating_sub(1);
        }
        self.cursor = self.cursor.min(self.posts.len().saturating_sub(1));
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.posts.len() {
            self.cursor += 1;
        }
    }

    pub fn highlighted(&self) -> Option<&PostWithPriority> {
        self.posts.get(self.cursor)
    }
}
