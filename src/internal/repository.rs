use crate::api::{ApiClient, ResponseState};
use crate::internal::models::{
    ApiCallResponse, AuthorModel, CategoryModel, HomeContent, NetworkResponse, PostModel,
};
use crate::internal::store::PrefStore;
use tracing::debug;

/// Orchestrates the API client and the preference store, exposing one
/// UI-ready collection per logical resource.
///
/// Every fetch replaces its collection wholesale on success; posts are
/// annotated with the locally-saved flag on every fetch. An empty payload
/// on a successful call is forced to `NoData` regardless of what the
/// server returned. Each fetch returns the per-call `ResponseState`, so
/// callers never need to race on the shared signal.
pub struct Repository {
    api: ApiClient,
    store: PrefStore,
    pub home_content: Option<HomeContent>,
    pub author_by_id: AuthorModel,
    pub post_by_id: PostModel,
    pub category_by_id: Option<CategoryModel>,
    pub categories: Vec<CategoryModel>,
    pub posts_by_author: Vec<PostModel>,
    pub all_posts: Vec<PostModel>,
    pub posts_on_search: Vec<PostModel>,
    pub posts_by_category: Vec<PostModel>,
}

impl Repository {
    pub fn new(api: ApiClient, store: PrefStore) -> Self {
        Self {
            api,
            store,
            home_content: None,
            author_by_id: AuthorModel::empty_body(),
            post_by_id: PostModel::default(),
            category_by_id: None,
            categories: Vec::new(),
            posts_by_author: Vec::new(),
            all_posts: Vec::new(),
            posts_on_search: Vec::new(),
            posts_by_category: Vec::new(),
        }
    }

    pub fn response_state(&self) -> ResponseState {
        self.api.response_state()
    }

    pub fn response_message(&self) -> String {
        self.api.response_message()
    }

    pub fn store(&self) -> &PrefStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PrefStore {
        &mut self.store
    }

    // -- fetches --------------------------------------------------------

    pub fn get_home_content(&mut self) -> ResponseState {
        let response = self.api.get_home_content();
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.id.is_empty() {
                repo.home_content = Some(envelope.data);
            } else {
                repo.api.no_data();
            }
        })
    }

    pub fn get_author_by_id(&mut self, author_id: &str) -> ResponseState {
        let response = self.api.get_author_by_id(author_id);
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.id.is_empty() {
                repo.author_by_id = envelope.data;
            } else {
                repo.api.no_data();
            }
        })
    }

    pub fn retrieve_post(&mut self, post_id: &str) -> ResponseState {
        let response = self.api.retrieve_post(post_id);
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.id.is_empty() {
                let mut post = envelope.data;
                post.is_selected = repo.store.is_saved(&post.id);
                repo.post_by_id = post;
            } else {
                repo.api.no_data();
            }
        })
    }

    /// Title search. An empty result clears the previous search results as
    /// well as flagging `NoData`.
    pub fn posts_on_search(&mut self, search_string: &str) -> ResponseState {
        let response = self.api.get_posts_by_name(search_string);
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.is_empty() {
                repo.posts_on_search = repo.annotate_saved(envelope.data);
            } else {
                repo.api.no_data();
                repo.posts_on_search = Vec::new();
            }
        })
    }

    pub fn get_category_by_id(&mut self, category_id: &str) -> ResponseState {
        let response = self.api.get_category_by_id(category_id);
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.id.is_empty() {
                repo.category_by_id = Some(envelope.data);
            } else {
                repo.api.no_data();
            }
        })
    }

    /// Fetch the category list, prepending the two synthetic filter tabs
    /// "For you" and "Popular". The synthetic entries carry no server id;
    /// consumers select posts for them by category name, not id.
    pub fn retrieve_categories(&mut self) -> ResponseState {
        let response = self.api.retrieve_categories();
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.is_empty() {
                let mut categories = vec![
                    CategoryModel {
                        id: String::new(),
                        thumbnail: String::new(),
                        category: "For you".to_string(),
                        description: "All the latest posts".to_string(),
                    },
                    CategoryModel {
                        id: String::new(),
                        thumbnail: String::new(),
                        category: "Popular".to_string(),
                        description: "All the popular in this week".to_string(),
                    },
                ];
                categories.extend(envelope.data);
                repo.categories = categories;
            } else {
                repo.api.no_data();
            }
        })
    }

    pub fn get_authors_posts(&mut self, author_id: &str, date: Option<&str>) -> ResponseState {
        let response = self.api.get_authors_posts(author_id, date);
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.is_empty() {
                repo.posts_by_author = repo.annotate_saved(envelope.data);
            } else {
                repo.api.no_data();
            }
        })
    }

    pub fn fetch_all_posts(&mut self, post_type: Option<&str>) -> ResponseState {
        let response = self.api.fetch_all_posts(post_type);
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.is_empty() {
                repo.all_posts = repo.annotate_saved(envelope.data);
            } else {
                repo.api.no_data();
            }
        })
    }

    /// Posts for one category tab. The server has no per-category posts
    /// endpoint for this view, so the full list is fetched and filtered
    /// client-side by `category_id`.
    pub fn get_posts_by_category(&mut self, category_id: &str) -> ResponseState {
        let response = self.api.fetch_all_posts(None);
        self.handle_response(response, |repo, envelope| {
            if envelope.status_code == 200 && !envelope.data.is_empty() {
                let posts = repo.annotate_saved(envelope.data);
                repo.posts_by_category = posts
                    .into_iter()
                    .filter(|p| p.category_id == category_id)
                    .collect();
            } else {
                repo.api.no_data();
            }
        })
    }

    // -- plumbing -------------------------------------------------------

    /// Apply the envelope's status to the shared signal, run the publish
    /// step, and return the resulting per-call state (which reflects any
    /// `no_data` override the publish step applied).
    fn handle_response<T>(
        &mut self,
        response: NetworkResponse<T>,
        on_success: impl FnOnce(&mut Self, ApiCallResponse<T>),
    ) -> ResponseState {
        match response {
            NetworkResponse::Success(envelope) => {
                self.api.update_response_state(envelope.status_code);
                self.api
                    .update_response_message(envelope.response_message.clone());
                on_success(self, envelope);
            }
            NetworkResponse::Error(error) => {
                debug!(
                    status_code = error.status_code,
                    message = %error.error_message,
                    "api call returned error"
                );
                self.api.update_response_state(error.status_code);
                self.api.update_response_message(error.error_message);
            }
        }
        self.api.response_state()
    }

    /// Mark each fetched post saved iff its id is in the saved-post set.
    fn annotate_saved(&self, posts: Vec<PostModel>) -> Vec<PostModel> {
        posts
            .into_iter()
            .map(|mut post| {
                post.is_selected = self.store.is_saved(&post.id);
                post
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;

    fn envelope_body(data: &str) -> String {
        format!(
            r#"{{"response": {}, "responseMessage": "ok", "statusCode": 200}}"#,
            data
        )
    }

    fn repo_for(server: &mockito::Server) -> Repository {
        Repository::new(ApiClient::with_base_url(server.url()), PrefStore::new())
    }

    #[test]
    fn test_fetch_all_posts_annotates_saved_flag() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/post")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body(
                r#"[{"_id": "p1", "title": "One"}, {"_id": "p2", "title": "Two"}]"#,
            ))
            .create();

        let mut repo = repo_for(&server);
        repo.store_mut()
            .save_post(&PostModel::with_id("p2"))
            .unwrap();

        let state = repo.fetch_all_posts(None);

        assert_eq!(state, ResponseState::Loaded);
        assert_eq!(repo.all_posts.len(), 2);
        // is_selected iff id is in the saved set
        for post in &repo.all_posts {
            assert_eq!(post.is_selected, repo.store().is_saved(&post.id));
        }
        assert!(!repo.all_posts[0].is_selected);
        assert!(repo.all_posts[1].is_selected);
    }

    #[test]
    fn test_empty_success_forces_no_data() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/post")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body("[]"))
            .create();

        let mut repo = repo_for(&server);
        let state = repo.fetch_all_posts(None);

        // Server said 200; the empty payload still surfaces as NoData.
        assert_eq!(state, ResponseState::NoData);
        assert_eq!(repo.response_state(), ResponseState::NoData);
        assert!(repo.all_posts.is_empty());
    }

    #[test]
    fn test_categories_prepend_synthetic_tabs() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/category")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body(
                r#"[
                    {"_id": "c1", "thumbnail": "t.png", "category": "Tech", "description": ""},
                    {"_id": "c2", "thumbnail": "d.png", "category": "Design", "description": ""}
                ]"#,
            ))
            .create();

        let mut repo = repo_for(&server);
        let state = repo.retrieve_categories();

        assert_eq!(state, ResponseState::Loaded);
        let names: Vec<&str> = repo.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["For you", "Popular", "Tech", "Design"]);
        // Synthetic tabs have no server id
        assert!(repo.categories[0].id.is_empty());
        assert!(repo.categories[1].id.is_empty());
    }

    #[test]
    fn test_search_no_data_clears_results() {
        let mut server = mockito::Server::new();
        let _full = server
            .mock("GET", "/search?title=rust")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body(r#"[{"_id": "p1", "title": "Rust"}]"#))
            .create();
        let _empty = server
            .mock("GET", "/search?title=cobol")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body("[]"))
            .create();

        let mut repo = repo_for(&server);
        assert_eq!(repo.posts_on_search("rust"), ResponseState::Loaded);
        assert_eq!(repo.posts_on_search.len(), 1);

        assert_eq!(repo.posts_on_search("cobol"), ResponseState::NoData);
        assert!(repo.posts_on_search.is_empty());
    }

    #[test]
    fn test_posts_by_category_filters_client_side() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/post")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body(
                r#"[
                    {"_id": "p1", "categoryId": "c1"},
                    {"_id": "p2", "categoryId": "c2"},
                    {"_id": "p3", "categoryId": "c1"}
                ]"#,
            ))
            .create();

        let mut repo = repo_for(&server);
        let state = repo.get_posts_by_category("c1");

        assert_eq!(state, ResponseState::Loaded);
        let ids: Vec<&str> = repo.posts_by_category.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_home_content_empty_id_is_no_data() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/gethomecontent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body(r#"{"_id": "", "siteTitle": ""}"#))
            .create();

        let mut repo = repo_for(&server);
        let state = repo.get_home_content();

        assert_eq!(state, ResponseState::NoData);
        assert!(repo.home_content.is_none());
    }

    #[test]
    fn test_author_fetch_publishes() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/author?_id=a1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body(r#"{"_id": "a1", "name": "Jane"}"#))
            .create();

        let mut repo = repo_for(&server);
        assert!(repo.author_by_id.is_empty());

        let state = repo.get_author_by_id("a1");
        assert_eq!(state, ResponseState::Loaded);
        assert_eq!(repo.author_by_id.name, "Jane");
    }

    #[test]
    fn test_transport_failure_surfaces_not_found() {
        // Default error envelope carries 404; the mapping turns it into
        // NotFound and the collection stays untouched.
        let mut repo = Repository::new(
            ApiClient::with_base_url("http://localhost:1"),
            PrefStore::new(),
        );

        let state = repo.fetch_all_posts(None);
        assert_eq!(state, ResponseState::NotFound);
        assert!(repo.all_posts.is_empty());
        assert_eq!(repo.response_message(), "Some error occurred");
    }

    #[test]
    fn test_retrieve_post_saved_flag() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/post?_id=p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope_body(r#"{"_id": "p1", "title": "One"}"#))
            .create();

        let mut repo = repo_for(&server);
        repo.store_mut()
            .save_post(&PostModel::with_id("p1"))
            .unwrap();

        let state = repo.retrieve_post("p1");
        assert_eq!(state, ResponseState::Loaded);
        assert!(repo.post_by_id.is_selected);
    }
}
