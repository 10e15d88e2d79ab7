use crate::api::{ApiClient, ResponseState};
use crate::internal::models::{
    ChildComment, NetworkResponse, PostComment, PostCommentRequest, SubmitState,
};
use tracing::{debug, warn};

/// Comment thread state for one post: a flat list of top-level comments,
/// each carrying one level of replies.
///
/// New comments are appended optimistically, tagged `Pending` until the
/// server write settles as `Confirmed` or `Failed`, so a lost write is
/// visible instead of silently inconsistent.
pub struct CommentProcessor {
    api: ApiClient,
    pub comments: Vec<PostComment>,
}

impl CommentProcessor {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            comments: Vec::new(),
        }
    }

    pub fn response_state(&self) -> ResponseState {
        self.api.response_state()
    }

    /// Optimistically append a top-level comment, then fire the server
    /// write and settle the submission tag from its outcome.
    pub fn add_comment(&mut self, comment: PostComment) -> ResponseState {
        let request = PostCommentRequest::from_comment(&comment);

        let mut pending = comment;
        pending.submission = SubmitState::Pending;
        self.comments.push(pending);
        let index = self.comments.len() - 1;

        let response = self.api.add_comment(&request);
        match response {
            NetworkResponse::Success(envelope) => {
                self.api.update_response_state(envelope.status_code);
                self.api.update_response_message(envelope.response_message);
                self.comments[index].submission = if envelope.status_code == 200 {
                    SubmitState::Confirmed
                } else {
                    SubmitState::Failed
                };
            }
            NetworkResponse::Error(error) => {
                warn!(
                    status_code = error.status_code,
                    "comment write failed, keeping it locally as Failed"
                );
                self.api.update_response_state(error.status_code);
                self.api.update_response_message(error.error_message);
                self.comments[index].submission = SubmitState::Failed;
            }
        }
        self.api.response_state()
    }

    /// Append a reply to the parent at `parent_index`, but only when that
    /// slot also carries `parent_id`. The double check guards against the
    /// list shifting under a stale index; on disagreement nothing is
    /// mutated. On a match the updated parent is pushed to the server and
    /// the list is re-fetched from its response.
    pub fn add_child_comment(
        &mut self,
        parent_index: usize,
        child: ChildComment,
        parent_id: &str,
    ) -> ResponseState {
        let matches = self
            .comments
            .get(parent_index)
            .map(|parent| parent.id == parent_id)
            .unwrap_or(false);

        if !matches {
            debug!(
                parent_index,
                parent_id, "reply target index and id disagree, skipping"
            );
            return self.api.response_state();
        }

        self.comments[parent_index].child_comments.push(child);

        let request = PostCommentRequest::for_update(&self.comments[parent_index]);
        self.update_child_comment(&request)
    }

    /// Focus the reply input on exactly one comment; every other comment's
    /// flag is cleared.
    pub fn update_reply_window(&mut self, selected_index: usize) {
        for (index, comment) in self.comments.iter_mut().enumerate() {
            comment.is_replying_for_this_thread = index == selected_index;
        }
    }

    /// Fetch-and-replace: overwrite the local list with the server's
    /// current comments for the post.
    pub fn fetch_comments(&mut self, post_id: &str) -> ResponseState {
        let response = self.api.get_comments(post_id);
        match response {
            NetworkResponse::Success(envelope) => {
                self.api.update_response_state(envelope.status_code);
                self.api.update_response_message(envelope.response_message);
                self.comments = envelope.data;
            }
            NetworkResponse::Error(error) => {
                self.api.update_response_state(error.status_code);
                self.api.update_response_message(error.error_message);
            }
        }
        self.api.response_state()
    }

    fn update_child_comment(&mut self, request: &PostCommentRequest) -> ResponseState {
        let post_id = request.post_id.clone();
        let response = self.api.update_child_comment(request);
        match response {
            NetworkResponse::Success(envelope) => {
                self.api.update_response_state(envelope.status_code);
                self.api.update_response_message(envelope.response_message);
                self.fetch_comments(&post_id)
            }
            NetworkResponse::Error(error) => {
                warn!(
                    status_code = error.status_code,
                    "child comment update failed"
                );
                self.api.update_response_state(error.status_code);
                self.api.update_response_message(error.error_message);
                self.api.response_state()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;

    fn comment(id: &str, post_id: &str) -> PostComment {
        PostComment {
            id: id.to_string(),
            user_name: "Jane".to_string(),
            user_email: "jane@example.com".to_string(),
            comment_date: "2024-01-02".to_string(),
            comment: "Nice post".to_string(),
            post_id: post_id.to_string(),
            ..PostComment::default()
        }
    }

    fn child(name: &str) -> ChildComment {
        ChildComment {
            user_name: name.to_string(),
            comment: "Agreed".to_string(),
            ..ChildComment::default()
        }
    }

    #[test]
    fn test_add_comment_confirmed_on_200() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/addcomment")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "created", "responseMessage": "ok", "statusCode": 200}"#)
            .create();

        let mut processor = CommentProcessor::new(ApiClient::with_base_url(server.url()));
        let state = processor.add_comment(comment("", "p1"));

        assert_eq!(state, ResponseState::Loaded);
        assert_eq!(processor.comments.len(), 1);
        assert_eq!(processor.comments[0].submission, SubmitState::Confirmed);
    }

    #[test]
    fn test_add_comment_failed_write_stays_visible() {
        let mut processor =
            CommentProcessor::new(ApiClient::with_base_url("http://localhost:1"));
        let state = processor.add_comment(comment("", "p1"));

        // The optimistic append is kept, tagged Failed.
        assert_eq!(state, ResponseState::NotFound);
        assert_eq!(processor.comments.len(), 1);
        assert_eq!(processor.comments[0].submission, SubmitState::Failed);
    }

    #[test]
    fn test_add_child_comment_requires_index_and_id_match() {
        let mut processor =
            CommentProcessor::new(ApiClient::with_base_url("http://localhost:1"));
        processor.comments = vec![comment("c1", "p1"), comment("c2", "p1")];

        // Simulated drift: index 0 no longer holds c2.
        processor.add_child_comment(0, child("Joe"), "c2");
        assert!(processor.comments[0].child_comments.is_empty());
        assert!(processor.comments[1].child_comments.is_empty());

        // Out-of-range index must not panic.
        processor.add_child_comment(7, child("Joe"), "c1");
        assert!(processor.comments[0].child_comments.is_empty());
    }

    #[test]
    fn test_add_child_comment_appends_and_refetches() {
        let mut server = mockito::Server::new();
        let _update = server
            .mock("POST", "/updatecomment")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "updated", "responseMessage": "ok", "statusCode": 200}"#)
            .create();
        let _fetch = server
            .mock("GET", "/comments?_id=p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "response": [{
                        "_id": "c1",
                        "userName": "Jane",
                        "comment": "Nice post",
                        "postId": "p1",
                        "childComments": [{"userName": "Joe", "comment": "Agreed"}]
                    }],
                    "responseMessage": "ok",
                    "statusCode": 200
                }"#,
            )
            .create();

        let mut processor = CommentProcessor::new(ApiClient::with_base_url(server.url()));
        processor.comments = vec![comment("c1", "p1")];

        let state = processor.add_child_comment(0, child("Joe"), "c1");

        assert_eq!(state, ResponseState::Loaded);
        assert_eq!(processor.comments.len(), 1);
        assert_eq!(processor.comments[0].child_comments.len(), 1);
        assert_eq!(processor.comments[0].child_comments[0].user_name, "Joe");
    }

    #[test]
    fn test_update_reply_window_is_exclusive() {
        let mut processor =
            CommentProcessor::new(ApiClient::with_base_url("http://localhost:1"));
        processor.comments = vec![comment("c1", "p1"), comment("c2", "p1"), comment("c3", "p1")];
        processor.comments[0].is_replying_for_this_thread = true;

        processor.update_reply_window(2);

        let flags: Vec<bool> = processor
            .comments
            .iter()
            .map(|c| c.is_replying_for_this_thread)
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn test_fetch_comments_replaces_list() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/comments?_id=p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "response": [
                        {"_id": "c10", "userName": "Ann", "comment": "First", "postId": "p1"},
                        {"_id": "c11", "userName": "Bob", "comment": "Second", "postId": "p1"}
                    ],
                    "responseMessage": "ok",
                    "statusCode": 200
                }"#,
            )
            .create();

        let mut processor = CommentProcessor::new(ApiClient::with_base_url(server.url()));
        processor.comments = vec![comment("stale", "p1")];

        let state = processor.fetch_comments("p1");

        assert_eq!(state, ResponseState::Loaded);
        let ids: Vec<&str> = processor.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c10", "c11"]);
        // Fetched comments are server-confirmed.
        assert!(processor
            .comments
            .iter()
            .all(|c| c.submission == SubmitState::Confirmed));
    }
}
