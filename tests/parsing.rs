use std::fs;
use std::path::PathBuf;

use pl_elo::scores_fetch::parse_scores_page_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_scores_page_fixture() {
    let raw = read_fixture("scores_page.json");
    let page = parse_scores_page_json(&raw).expect("fixture should parse");
    assert_eq!(page.event_groups.len(), 1);

    let groups = &page.event_groups[0].secondary_groups;
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].title, "Matchweek 1");
    assert_eq!(groups[0].events.len(), 3);

    let first = &groups[0].events[0];
    assert_eq!(first.id.as_deref(), Some("EVP1001"));
    assert_eq!(first.start_time, "2025-08-15T19:00:00.000Z");
    assert_eq!(first.status, "PostEvent");
    let home = first.home.as_ref().expect("home side should be present");
    assert_eq!(home.full_name, "Liverpool");
    assert_eq!(home.score, Some(4));

    // The third entry carries no team sub-objects.
    let stub = &groups[0].events[2];
    assert!(stub.home.is_none());
    assert!(stub.away.is_none());
}

#[test]
fn parses_live_boundary_fixture() {
    let raw = read_fixture("scores_live_boundary.json");
    let page = parse_scores_page_json(&raw).expect("fixture should parse");
    let events = &page.event_groups[0].secondary_groups[0].events;
    assert_eq!(events.len(), 4);
    assert_eq!(events[2].status, "MidEvent");
    assert_eq!(events[3].status, "PostEvent");
}

#[test]
fn page_without_groups_parses_empty() {
    let raw = read_fixture("scores_no_groups.json");
    let page = parse_scores_page_json(&raw).expect("fixture should parse");
    assert!(page.event_groups.is_empty());
}

#[test]
fn null_and_blank_bodies_are_empty_pages() {
    assert!(
        parse_scores_page_json("null")
            .expect("null should parse")
            .event_groups
            .is_empty()
    );
    assert!(
        parse_scores_page_json("  ")
            .expect("blank should parse")
            .event_groups
            .is_empty()
    );
}

#[test]
fn missing_nesting_defaults_to_empty() {
    let page = parse_scores_page_json("{}").expect("empty object should parse");
    assert!(page.event_groups.is_empty());

    let page = parse_scores_page_json(r#"{"eventGroups":[{}]}"#).expect("bare group should parse");
    assert!(page.event_groups[0].secondary_groups.is_empty());
}

#[test]
fn garbage_body_is_an_error() {
    assert!(parse_scores_page_json("<html>maintenance</html>").is_err());
}
