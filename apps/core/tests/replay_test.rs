use typeahead_core::contract::{PageSpec, ReplayReport};
use typeahead_core::controller::ControllerOptions;
use typeahead_core::hotkey::parse_key_script;
use typeahead_core::runtime::replay;
use typeahead_core::settings::SettingsLoad;

const PAGE: &str = r#"{
    "base_url": "https://example.com/",
    "elements": [
        { "tag": "a", "id": "home", "href": "/home", "text": "Home" },
        { "tag": "nav", "positioned": true, "offset_top": 50, "children": [
            { "tag": "a", "id": "about", "href": "/about", "text": "About ",
              "offset_top": 20, "offset_left": 4,
              "children": [ { "tag": "em", "text": "Home" } ] }
        ] },
        { "tag": "a", "text": "No href" }
    ]
}"#;

fn run(script: &str, mnemonics: bool) -> ReplayReport {
    let page: PageSpec = serde_json::from_str(PAGE).unwrap();
    let keys = parse_key_script(script).unwrap();
    replay(
        &page,
        &keys,
        ControllerOptions::default(),
        SettingsLoad::resolved(mnemonics),
    )
    .unwrap()
}

#[test]
fn page_description_defaults_missing_fields() {
    let page: PageSpec = serde_json::from_str(PAGE).unwrap();
    assert_eq!(page.elements[0].offset_top, 0);
    assert!(!page.elements[0].positioned);
    assert_eq!(page.elements[2].href, None);
    assert_eq!(page.focused, None);
}

#[test]
fn replay_reports_matches_with_nested_text() {
    let report = run("/ home", false);
    assert_eq!(report.mode, "searching");
    assert_eq!(report.query, "home");
    let texts: Vec<&str> = report.matches.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["Home", "About Home"]);
    assert_eq!(report.selected, Some(0));
    assert_eq!(report.indicator.counter, "(1/2)");
    assert!(report.activated.is_empty());
    assert_eq!(report.steps[0].action, "StartSearch");
    assert!(report.steps.iter().all(|step| step.prevented));
}

#[test]
fn replay_activates_selection() {
    let report = run("/ home ArrowDown Enter", false);
    assert_eq!(report.mode, "idle");
    assert_eq!(report.activated.len(), 1);
    assert_eq!(report.activated[0].href, "https://example.com/about");
    assert!(!report.indicator.visible);
}

#[test]
fn replay_lists_mnemonic_labels() {
    let report = run("/", true);
    let letters: Vec<char> = report.labels.iter().map(|l| l.letter).collect();
    assert_eq!(letters, vec!['a', 'b']);
    assert_eq!(report.labels[1].top, 4);
    assert_eq!(report.labels[1].page_top, 54);

    let report = run("/ Ctrl+a", true);
    assert_eq!(report.activated[0].text, "Home");
    assert!(report.labels.is_empty());
}

#[test]
fn report_serializes_to_json() {
    let report = run("/ h", false);
    let encoded = serde_json::to_string(&report).unwrap();
    let decoded: ReplayReport = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, report);
}
