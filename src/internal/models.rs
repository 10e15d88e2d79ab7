use crate::utils::datetime::format_post_date;
use crate::utils::html::extract_text_from_html;
use crate::utils::url::{convert_drive_link, extract_domain};
use serde::{Deserialize, Serialize};

/// A blog post as served by the API.
///
/// `is_selected` is not server-authoritative: it marks locally saved posts
/// and is recomputed against the preference store on every fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostModel {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    #[serde(rename = "authorId")]
    pub author_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub title: String,
    pub subtitle: String,
    pub thumbnail: String,
    content: String,
    pub category: String,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    pub popular: bool,
    pub main: bool,
    pub sponsored: bool,
    pub likes: i64,
    pub views: i64,
    #[serde(rename = "isSelected")]
    pub is_selected: bool,
}

impl PostModel {
    /// A post with the given id and every other field defaulted. The HTML
    /// body is not publicly constructible, so code outside this module
    /// builds fixture posts through this instead of struct literals.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Raw HTML body of the post.
    pub fn content(&self) -> &str {
        &self.content
    }

    #[cfg(test)]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Readable text extracted from the HTML body.
    pub fn plain_text(&self) -> String {
        extract_text_from_html(&self.content)
    }

    /// Publication date formatted for display, e.g. "Jan 2, 2024".
    /// Falls back to the raw string when it is not a valid timestamp.
    pub fn created_at_date(&self) -> String {
        format_post_date(&self.created_at)
    }

    /// Thumbnail link with Google Drive share URLs normalized for direct
    /// access.
    pub fn thumbnail_url(&self) -> String {
        convert_drive_link(&self.thumbnail)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    #[serde(rename = "platformLink")]
    pub platform_link: String,
}

impl SocialLink {
    /// Host of the linked profile, e.g. "github.com".
    pub fn domain(&self) -> Option<String> {
        extract_domain(&self.platform_link)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorModel {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "aboutU")]
    pub about: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub email: String,
    #[serde(rename = "socialLinks")]
    pub social_links: Vec<SocialLink>,
    #[serde(rename = "userImage")]
    pub user_image: String,
}

impl AuthorModel {
    /// Sentinel used as the "not yet loaded" value.
    pub fn empty_body() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryModel {
    #[serde(rename = "_id")]
    pub id: String,
    pub thumbnail: String,
    pub category: String,
    pub description: String,
}

impl CategoryModel {
    /// Check that the displayable fields are non-blank. Returns a
    /// human-readable list of offending fields instead of an error.
    pub fn validate(&self) -> (bool, String) {
        let mut invalid_fields = Vec::new();

        if self.thumbnail.trim().is_empty() {
            invalid_fields.push("thumbnail");
        }
        if self.category.trim().is_empty() {
            invalid_fields.push("category");
        }

        if invalid_fields.is_empty() {
            (true, String::new())
        } else {
            (
                false,
                format!(
                    "{} are not allowed to be empty or null",
                    invalid_fields.join(", ")
                ),
            )
        }
    }
}

/// Home-screen chrome served by the API: site title, logo, and the texts
/// shown for each response state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeContent {
    #[serde(rename = "_id")]
    pub id: String,
    pub copyright: String,
    pub logo: String,
    #[serde(rename = "noData")]
    pub no_data: String,
    #[serde(rename = "notFound")]
    pub not_found: String,
    pub loading: String,
    #[serde(rename = "someError")]
    pub some_error: String,
    #[serde(rename = "siteTitle")]
    pub site_title: String,
    #[serde(rename = "socialLinks")]
    pub social_links: Vec<SocialLink>,
}

/// Submission status of an optimistically appended comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    Pending,
    #[default]
    Confirmed,
    Failed,
}

/// A top-level comment with one level of replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostComment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "userImage")]
    pub user_image: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "commentDate")]
    pub comment_date: String,
    pub comment: String,
    #[serde(rename = "postId")]
    pub post_id: String,
    /// UI focus flag: at most one comment per list has this set.
    #[serde(skip)]
    pub is_replying_for_this_thread: bool,
    #[serde(rename = "childComments")]
    pub child_comments: Vec<ChildComment>,
    /// Local submission status; never sent to or read from the server.
    #[serde(skip)]
    pub submission: SubmitState,
}

impl Default for PostComment {
    fn default() -> Self {
        Self {
            id: String::new(),
            user_name: String::new(),
            user_image: "/iconresources/SuggestionOne.png".to_string(),
            user_email: String::new(),
            comment_date: String::new(),
            comment: String::new(),
            post_id: String::new(),
            is_replying_for_this_thread: false,
            child_comments: Vec::new(),
            submission: SubmitState::default(),
        }
    }
}

/// A reply to a top-level comment. Replies cannot be nested further.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildComment {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "userImage")]
    pub user_image: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "commentDate")]
    pub comment_date: String,
    pub comment: String,
}

/// POST body for adding or updating a comment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostCommentRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "commentDate")]
    pub comment_date: String,
    pub comment: String,
    #[serde(rename = "postId")]
    pub post_id: String,
    #[serde(rename = "childComments")]
    pub child_comments: Vec<ChildComment>,
}

impl PostCommentRequest {
    /// Request shape for creating the given top-level comment.
    pub fn from_comment(comment: &PostComment) -> Self {
        Self {
            id: String::new(),
            user_name: comment.user_name.clone(),
            user_email: comment.user_email.clone(),
            comment_date: comment.comment_date.clone(),
            comment: comment.comment.clone(),
            post_id: comment.post_id.clone(),
            child_comments: comment.child_comments.clone(),
        }
    }

    /// Request shape for pushing an updated parent comment (with its
    /// replies) back to the server.
    pub fn for_update(comment: &PostComment) -> Self {
        Self {
            id: comment.id.clone(),
            ..Self::from_comment(comment)
        }
    }
}

/// Server response envelope for a successful call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCallResponse<T> {
    #[serde(rename = "response")]
    pub data: T,
    #[serde(rename = "responseMessage", default)]
    pub response_message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Error envelope produced at the client boundary when a call fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorCallResponse {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl ApiErrorCallResponse {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            ..Self::default()
        }
    }
}

impl Default for ApiErrorCallResponse {
    fn default() -> Self {
        Self {
            error_message: "Some error occurred".to_string(),
            status_code: 404,
        }
    }
}

/// Result of an API call: the decoded envelope, or the swallowed failure.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResponse<T> {
    Success(ApiCallResponse<T>),
    Error(ApiErrorCallResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_decodes_with_unknown_fields() {
        let json = r#"{
            "_id": "p1",
            "author": "Jane",
            "authorId": "a1",
            "createdAt": "2024-01-02T10:00:00Z",
            "title": "Hello",
            "categoryId": "c1",
            "likes": 3,
            "somethingNew": {"nested": true}
        }"#;

        let post: PostModel = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.author_id, "a1");
        assert_eq!(post.likes, 3);
        assert!(!post.is_selected);
        assert_eq!(post.views, 0);
    }

    #[test]
    fn test_author_empty_sentinel() {
        let author = AuthorModel::empty_body();
        assert!(author.is_empty());

        let loaded = AuthorModel {
            id: "a1".to_string(),
            name: "Jane".to_string(),
            ..AuthorModel::default()
        };
        assert!(!loaded.is_empty());
    }

    #[test]
    fn test_category_validation() {
        let valid = CategoryModel {
            id: "c1".to_string(),
            thumbnail: "thumb.png".to_string(),
            category: "Tech".to_string(),
            description: String::new(),
        };
        assert_eq!(valid.validate(), (true, String::new()));

        let invalid = CategoryModel::default();
        let (ok, message) = invalid.validate();
        assert!(!ok);
        assert_eq!(
            message,
            "thumbnail, category are not allowed to be empty or null"
        );

        let missing_thumb = CategoryModel {
            category: "Tech".to_string(),
            ..CategoryModel::default()
        };
        let (ok, message) = missing_thumb.validate();
        assert!(!ok);
        assert_eq!(message, "thumbnail are not allowed to be empty or null");
    }

    #[test]
    fn test_comment_transient_fields_not_serialized() {
        let comment = PostComment {
            id: "c1".to_string(),
            user_name: "Jane".to_string(),
            is_replying_for_this_thread: true,
            submission: SubmitState::Pending,
            ..PostComment::default()
        };

        let json = serde_json::to_string(&comment).unwrap();
        assert!(!json.contains("is_replying_for_this_thread"));
        assert!(!json.contains("submission"));

        let back: PostComment = serde_json::from_str(&json).unwrap();
        assert!(!back.is_replying_for_this_thread);
        assert_eq!(back.submission, SubmitState::Confirmed);
    }

    #[test]
    fn test_comment_default_avatar() {
        let comment: PostComment = serde_json::from_str(r#"{"_id": "c1"}"#).unwrap();
        assert_eq!(comment.user_image, "/iconresources/SuggestionOne.png");
    }

    #[test]
    fn test_post_display_helpers() {
        let post = PostModel {
            created_at: "2024-01-02T10:00:00Z".to_string(),
            thumbnail: "https://drive.google.com/uc?export=view&id=abc".to_string(),
            ..PostModel::default()
        }
        .with_content("<p>Hello <b>world</b></p>");

        assert_eq!(post.created_at_date(), "Jan 2, 2024");
        assert_eq!(post.thumbnail_url(), "https://drive.google.com/uc?id=abc");
        assert!(post.plain_text().contains("Hello"));
        assert!(post.content().contains("<b>"));
    }

    #[test]
    fn test_with_id_fixture() {
        let post = PostModel::with_id("p7");
        assert_eq!(post.id, "p7");
        assert_eq!(post.content(), "");
        assert!(!post.is_selected);
    }

    #[test]
    fn test_social_link_domain() {
        let link = SocialLink {
            platform: "github".to_string(),
            platform_link: "https://github.com/someone".to_string(),
        };
        assert_eq!(link.domain(), Some("github.com".to_string()));

        let blank = SocialLink::default();
        assert_eq!(blank.domain(), None);
    }

    #[test]
    fn test_envelope_decode() {
        let json = r#"{
            "response": {"_id": "p1", "title": "Hello"},
            "responseMessage": "ok",
            "statusCode": 200
        }"#;
        let envelope: ApiCallResponse<PostModel> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.id, "p1");
        assert_eq!(envelope.status_code, 200);
    }

    #[test]
    fn test_update_request_keeps_id() {
        let comment = PostComment {
            id: "c9".to_string(),
            user_name: "Jane".to_string(),
            post_id: "p1".to_string(),
            ..PostComment::default()
        };

        let create = PostCommentRequest::from_comment(&comment);
        assert_eq!(create.id, "");
        assert_eq!(create.post_id, "p1");

        let update = PostCommentRequest::for_update(&comment);
        assert_eq!(update.id, "c9");
    }
}
