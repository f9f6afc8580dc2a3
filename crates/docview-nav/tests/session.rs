//! End-to-end tests driving a session against in-memory sources.

use docview_nav::{
    Effect, NavError, NavMessage, NavTuple, RecordingHost, Result, Session, StaticVersionSource,
    VersionRecord, VersionSource, ViewerSettings,
};

fn source() -> StaticVersionSource {
    StaticVersionSource::new()
        .with_project(
            "demo",
            vec![
                VersionRecord::new("1.0.0"),
                VersionRecord::new("1.2.0"),
                VersionRecord::new("1.1.0"),
            ],
        )
        .with_project("single", vec![VersionRecord::new("2.0.0")])
        .with_project("empty", Vec::new())
}

async fn open(address: &str) -> Session<StaticVersionSource, RecordingHost> {
    Session::start_at(ViewerSettings::default(), address, source(), RecordingHost::new())
        .await
        .unwrap()
}

/// A source whose service is unreachable.
#[derive(Default)]
struct FailingSource;

impl VersionSource for FailingSource {
    async fn list_versions(&self, _project: &str) -> Result<Vec<VersionRecord>> {
        Err(NavError::Fetch("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_latest_resolves_and_loads_viewer() {
    let mut session = open("#/demo/latest/index.html").await;
    assert_eq!(session.navigator().tuple().version, "1.2.0");
    assert_eq!(
        session.host_mut().drain(),
        vec![
            Effect::SetAddress("#/demo/1.2.0/index.html".to_string()),
            Effect::ReloadViewer("https://docs.example.com/demo/1.2.0/index.html".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_outdated_version_shows_advisory() {
    let session = open("#/demo/1.0.0/index.html").await;
    let effects = session.into_host().effects;
    assert!(effects[0].is_reload());
    match &effects[1] {
        Effect::ShowAdvisory(advisory) => {
            assert!(advisory.to_string().contains("1.2.0"));
            let action = advisory.action.as_ref().unwrap();
            assert_eq!(action.switch_to_version, "1.2.0");
        }
        other => panic!("expected an advisory, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_version_is_not_found() {
    let session = open("#/single/9.9.9/index.html").await;
    let navigator = session.navigator();
    assert!(navigator.load_failed());
    assert_eq!(
        navigator.failure(),
        Some(&NavError::UnknownVersion {
            project: "single".to_string(),
            requested: "9.9.9".to_string(),
        })
    );
    assert!(session.host().effects.is_empty());
}

#[tokio::test]
async fn test_empty_project_is_not_found() {
    let session = open("#/empty/latest/index.html").await;
    assert!(matches!(
        session.navigator().failure(),
        Some(NavError::EmptyVersionSet { .. })
    ));
    // "latest" is never rendered as a concrete version
    assert_eq!(session.navigator().tuple().version, "latest");
    assert!(session.host().effects.is_empty());
}

#[tokio::test]
async fn test_unlisted_project_is_not_found() {
    let session = open("#/missing/latest/index.html").await;
    assert!(session.navigator().load_failed());
}

#[tokio::test]
async fn test_fetch_failure_is_not_found() {
    let session = Session::start_at(
        ViewerSettings::default(),
        "#/demo/1.0.0/index.html",
        FailingSource,
        RecordingHost::new(),
    )
    .await
    .unwrap();
    let failure = session.navigator().failure().unwrap();
    assert!(failure.is_not_found());
    assert!(failure.is_retryable());
}

#[tokio::test]
async fn test_version_switch_reuses_fetched_versions() {
    let mut session = open("#/demo/1.2.0/guide.html").await;
    session.host_mut().drain();

    session.dispatch(NavMessage::select_version("1.1.0")).await;
    let effects = session.host_mut().drain();
    assert_eq!(
        effects.iter().filter(|e| e.is_reload()).count(),
        1,
        "{effects:?}"
    );
    assert!(effects.contains(&Effect::ReloadViewer(
        "https://docs.example.com/demo/1.1.0/guide.html".to_string()
    )));
}

#[tokio::test]
async fn test_viewer_navigation_keeps_viewer_loaded() {
    let mut session = open("#/demo/1.2.0/index.html").await;
    session.host_mut().drain();

    session
        .dispatch(NavMessage::viewer_page("guide/install.html"))
        .await;
    session
        .dispatch(NavMessage::ViewerHashChanged("#linux".to_string()))
        .await;
    assert_eq!(
        session.host_mut().drain(),
        vec![
            Effect::SetAddress("#/demo/1.2.0/guide%2Finstall.html".to_string()),
            Effect::SetAddress("#/demo/1.2.0/guide%2Finstall.html#linux".to_string()),
        ]
    );

    // The host writing the address back changes nothing
    session
        .address_changed("#/demo/1.2.0/guide%2Finstall.html#linux")
        .await
        .unwrap();
    assert!(session.host().effects.is_empty());
}

#[tokio::test]
async fn test_address_to_other_project_reenters() {
    let mut session = open("#/demo/1.0.0/index.html").await;
    session.host_mut().drain();

    session
        .address_changed("#/single/latest/index.html")
        .await
        .unwrap();
    assert_eq!(
        session.host_mut().drain(),
        vec![
            Effect::ClearAdvisories,
            Effect::SetAddress("#/single/2.0.0/index.html".to_string()),
            Effect::ReloadViewer("https://docs.example.com/single/2.0.0/index.html".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_outer_hide_ui_flag() {
    let session = Session::start_at(
        ViewerSettings::default(),
        "https://host.test/docs?hide-ui=true#/demo/1.2.0/index.html",
        source(),
        RecordingHost::new(),
    )
    .await
    .unwrap();
    assert!(session.navigator().tuple().hide_ui);
    assert!(session.navigator().address().ends_with("?hide-ui=true"));
}

#[tokio::test]
async fn test_invalid_address_rejected() {
    let result = Session::start_at(
        ViewerSettings::default(),
        "#/demo",
        source(),
        RecordingHost::new(),
    )
    .await;
    assert!(matches!(result, Err(NavError::InvalidAddress(_))));
}

#[tokio::test]
async fn test_selection_after_failed_fetch_refetches() {
    let mut session = Session::start(
        ViewerSettings::default(),
        NavTuple::new("demo", "latest"),
        FailingSource,
        RecordingHost::new(),
    )
    .await;
    session.dispatch(NavMessage::select_version("1.0.0")).await;
    assert!(session.navigator().load_failed());
    assert!(session.host().effects.contains(&Effect::SetAddress(
        "#/demo/1.0.0/index.html".to_string()
    )));
}

#[tokio::test]
async fn test_enter_resets_hide_ui_and_advisory() {
    let mut session = open("#/demo/1.0.0/index.html?hide-ui=true").await;
    assert!(session.navigator().tuple().hide_ui);
    assert!(session.navigator().is_outdated());
    session.host_mut().drain();

    session.enter("#/demo/latest/index.html").await.unwrap();
    assert!(!session.navigator().tuple().hide_ui);
    assert_eq!(
        session.host_mut().drain(),
        vec![
            Effect::ClearAdvisories,
            Effect::SetAddress("#/demo/1.2.0/index.html".to_string()),
            Effect::ReloadViewer("https://docs.example.com/demo/1.2.0/index.html".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_missing_page_uses_configured_default() {
    let settings = ViewerSettings::from_toml(r#"default_page = "README.html""#).unwrap();
    let mut session = Session::start_at(settings, "#/demo/1.0.0", source(), RecordingHost::new())
        .await
        .unwrap();
    assert_eq!(session.navigator().tuple().page, "README.html");
    let effects = session.host_mut().drain();
    assert_eq!(
        effects[0],
        Effect::ReloadViewer("https://docs.example.com/demo/1.0.0/README.html".to_string())
    );

    session.address_changed("#/demo/1.0.0/").await.unwrap();
    assert_eq!(session.navigator().tuple().page, "README.html");
}
