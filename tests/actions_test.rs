mod common;

use anyhow::Result;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{classic_page, client_for, logged_in};
use fa_export::actions;

fn detail_page(fav_link: &str) -> String {
    classic_page(&format!(
        r#"<div class="submission-title"><h2>Sunset Glade</h2></div>
        <div class="submission-artist"><a href="/user/foxpainter/">Fox Painter</a></div>
        <img id="submissionImg" src="//t.example/12345.jpg"/>
        <div class="actions">
          <a class="download" href="//d.example/glade.png">Download</a>
          {fav_link}
        </div>
        <div class="submission-description">A quiet clearing.</div>"#
    ))
}

#[tokio::test]
async fn test_toggle_favorite_flips_state_and_refreshes() -> Result<()> {
    let server = MockServer::start().await;

    // First read: not yet faved, with the one-time key.
    Mock::given(method("GET"))
        .and(path("/view/12345/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(
            r#"<a href="/fav/12345/?key=0a1b2c3d">+Fav</a>"#,
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // Re-read after the toggle: faved, fresh key.
    Mock::given(method("GET"))
        .and(path("/view/12345/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(
            r#"<a href="/unfav/12345/?key=9z8y7x6w">-Fav</a>"#,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fav/12345/"))
        .and(query_param("key", "0a1b2c3d"))
        .respond_with(ResponseTemplate::new(200).set_body_string(classic_page("<p>ok</p>")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let after = actions::toggle_favorite(&client, "12345", &logged_in()).await?;

    assert_eq!(after.fav_status, Some(true));
    assert_eq!(after.fav_key.as_deref(), Some("9z8y7x6w"));
    Ok(())
}

#[tokio::test]
async fn test_post_journal_returns_new_record() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/controls/journal/"))
        .and(body_string_contains("subject=Convention"))
        .and(body_string_contains("message=I+will+have+a+table"))
        .respond_with(ResponseTemplate::new(200).set_body_string(classic_page(
            r#"<a href="/journal/9002/">View your journal</a>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journal/9002/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(classic_page(
            r#"<div class="journal-view">
              <h2 class="journal-title">Convention plans</h2>
              <a class="journal-author" href="/user/foxpainter/">Fox Painter</a>
              <span class="popup_date" title="Aug 29th, 2026 05:00 PM">a moment ago</span>
              <div class="journal-body">I will have a table.</div>
            </div>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let journal = actions::post_journal(
        &client,
        "Convention plans",
        "I will have a table",
        &logged_in(),
    )
    .await?;

    assert_eq!(journal.id, "9002");
    assert_eq!(journal.title, "Convention plans");
    assert_eq!(journal.profile_name, "foxpainter");
    Ok(())
}
