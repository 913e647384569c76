#![allow(dead_code)]

use std::sync::{Arc, Once};

use fa_export::auth::AuthContext;
use fa_export::cache::MemoryStore;
use fa_export::config::Config;
use fa_export::metrics::CountingMetrics;
use fa_export::FaClient;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        sfw_base_url: base_url.to_string(),
        ..Config::for_testing()
    }
}

pub fn client_for(base_url: &str) -> FaClient {
    init_tracing();
    FaClient::with_defaults(test_config(base_url))
}

pub fn client_with_metrics(base_url: &str) -> (FaClient, Arc<CountingMetrics>) {
    init_tracing();
    let config = test_config(base_url);
    let metrics = Arc::new(CountingMetrics::default());
    let store = Box::new(MemoryStore::new(config.max_cache_entry_bytes));
    (FaClient::new(config, store, metrics.clone()), metrics)
}

pub const UUID_A: &str = "0b2d9916-7f0c-42d2-b8ed-bbc28c1d62f4";
pub const UUID_B: &str = "cb8fbe67-3514-4d86-9b4d-8a2f8c59e2bf";

pub fn logged_in() -> AuthContext {
    AuthContext::from_cookie_string(&format!("a={UUID_A}; b={UUID_B}"), false)
        .expect("valid cookie")
}

/// Wrap a body fragment in a classic-style page shell.
pub fn classic_page(body: &str) -> String {
    format!(
        r#"<html><head><title>Fur Affinity</title>
        <link rel="stylesheet" href="/themes/classic/css/common.css"/></head>
        <body>{body}</body></html>"#
    )
}

pub fn frontpage(artwork_figures: &str) -> String {
    classic_page(&format!(
        r#"<section id="frontpage-artwork">{artwork_figures}</section>
        <section id="frontpage-writing"></section>
        <section id="frontpage-music"></section>
        <section id="frontpage-crafts"></section>"#
    ))
}

pub fn figure(id: u64, title: &str, user: &str) -> String {
    format!(
        r#"<figure id="sid-{id}" class="r-general"><figcaption>
        <p><a href="/view/{id}/" title="{title}">{title}</a></p>
        <p><a href="/user/{user}/">{user}</a></p></figcaption></figure>"#
    )
}
