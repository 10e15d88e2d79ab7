use anyhow::Result;
use std::time::Duration;

use blogdesk::api::ApiClient;
use blogdesk::config::AppConfig;
use blogdesk::internal::repository::Repository;
use blogdesk::internal::store::PrefStore;

/// Small console front end for the client core: fetches the home content,
/// the category tabs, and the feed (or a title search when an argument is
/// given) and prints a summary.
fn main() -> Result<()> {
    let config = AppConfig::load();

    // RUST_LOG takes precedence over the configured level.
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => tracing_subscriber::EnvFilter::new(config.log_level.clone()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();

    let api = ApiClient::with_settings(
        config.base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );
    let store = PrefStore::load_or_create()?;
    let mut repo = Repository::new(api, store);

    let state = repo.get_home_content();
    tracing::info!(%state, "home content");
    if let Some(home) = &repo.home_content {
        println!("{}", home.site_title);
        println!("{}", home.copyright);
    }

    let state = repo.retrieve_categories();
    tracing::info!(%state, "categories");
    if !repo.categories.is_empty() {
        let tabs: Vec<&str> = repo.categories.iter().map(|c| c.category.as_str()).collect();
        println!("categories: {}", tabs.join(" | "));
    }

    let search = std::env::args().nth(1);
    let (state, posts) = match &search {
        Some(title) => (repo.posts_on_search(title), &repo.posts_on_search),
        None => (repo.fetch_all_posts(None), &repo.all_posts),
    };
    tracing::info!(%state, count = posts.len(), "posts");

    for post in posts {
        let marker = if post.is_selected { "*" } else { " " };
        println!(
            "{} {} by {} ({})",
            marker,
            post.title,
            post.author,
            post.created_at_date()
        );
    }

    if posts.is_empty() {
        println!("{}", repo.response_message());
    }

    Ok(())
}
