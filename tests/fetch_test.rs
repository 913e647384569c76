mod common;

use anyhow::Result;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{classic_page, client_for};
use fa_export::auth::AuthContext;
use fa_export::cache::TtlClass;
use fa_export::error::FaError;
use fa_export::fetch::STATUS_KEY;
use fa_export::models::SiteStatus;

#[tokio::test]
async fn test_raw_cache_serves_repeat_fetches() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(classic_page("<p>hello</p>")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let anon = AuthContext::anonymous(false);

    let first = client.fetcher.fetch(&client.cache, "/", &anon, None).await?;
    let second = client.fetcher.fetch(&client.cache, "/", &anon, None).await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_system_error_page_not_cached() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/view/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>System Error</title></head><body>oops</body></html>",
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/view/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(classic_page("<p>back</p>")))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let anon = AuthContext::anonymous(false);

    let first = client
        .fetcher
        .fetch(&client.cache, "/view/1/", &anon, None)
        .await;
    assert!(matches!(first, Err(FaError::SystemError { .. })));

    // The failure page was not stored; the retry reaches upstream again.
    let second = client
        .fetcher
        .fetch(&client.cache, "/view/1/", &anon, None)
        .await?;
    assert!(second.contains("back"));
    Ok(())
}

#[tokio::test]
async fn test_login_wall_and_disabled_account_detected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/walled/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(classic_page(
            "<p>This content is only available to registered users.</p>",
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(classic_page(
            "<p>This user has voluntarily disabled access to their account.</p>",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let anon = AuthContext::anonymous(false);

    let walled = client
        .fetcher
        .fetch(&client.cache, "/walled/", &anon, None)
        .await;
    assert!(matches!(walled, Err(FaError::LoginWall { .. })));
    assert!(walled.unwrap_err().is_auth_failure());

    let gone = client
        .fetcher
        .fetch(&client.cache, "/gone/", &anon, None)
        .await;
    assert!(matches!(gone, Err(FaError::AccountDisabled { .. })));
}

#[tokio::test]
async fn test_non_success_status_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let result = client
        .fetcher
        .fetch(&client.cache, "/", &AuthContext::anonymous(false), None)
        .await;

    assert!(matches!(
        result,
        Err(FaError::StatusCode { code: 503, .. })
    ));
}

#[tokio::test]
async fn test_site_status_scraped_from_footer() -> Result<()> {
    let server = MockServer::start().await;
    let body = classic_page(
        r#"<p>content</p>
        <div class="footer">14,562 users online &mdash; 13,023 guests,
        1,456 registered and 83 other<br/>Server Time: Aug 29th, 2026 04:15 PM</div>"#,
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    client
        .fetcher
        .fetch(&client.cache, "/", &AuthContext::anonymous(false), None)
        .await?;

    // The status landed in the cache as a side effect of the page fetch.
    let status: SiteStatus = client
        .cache
        .get_or_set_json(STATUS_KEY, TtlClass::Short, || async {
            Err(FaError::LoginRequired)
        })
        .await?;
    assert_eq!(status.online_total, 14_562);
    assert_eq!(status.online_registered, 1_456);
    assert_eq!(status.server_time, "Aug 29th, 2026 04:15 PM");
    Ok(())
}
