use typeahead_core::hotkey::{parse_key, parse_key_script, Key, KeyEvent, KeyParseError};

#[test]
fn parses_modifier_chords() {
    let chord = parse_key("Ctrl+b").unwrap();
    assert_eq!(chord.key, Key::Char('b'));
    assert!(chord.modifiers.ctrl);
    assert_eq!(chord.command_letter(), Some('b'));

    let cmd = parse_key("cmd+B").unwrap();
    assert!(cmd.modifiers.meta);
    assert_eq!(cmd.command_letter(), Some('b'));

    let back = parse_key("Shift+Tab").unwrap();
    assert_eq!(back.key, Key::Tab);
    assert!(back.modifiers.shift);
}

#[test]
fn plus_key_is_not_a_separator() {
    assert_eq!(parse_key("+").unwrap(), KeyEvent::char('+'));
    assert_eq!(parse_key("Ctrl++").unwrap(), KeyEvent::char('+').with_ctrl());
}

#[test]
fn rejects_unknown_modifiers_and_keys() {
    assert_eq!(
        parse_key("Hyper+a"),
        Err(KeyParseError::UnknownModifier("Hyper".into()))
    );
    assert_eq!(
        parse_key("Frobnicate"),
        Err(KeyParseError::UnknownKey("Frobnicate".into()))
    );
    assert_eq!(parse_key("  "), Err(KeyParseError::Empty));
}

#[test]
fn script_types_words_and_keeps_named_keys() {
    let events = parse_key_script("/ home ArrowDown Ctrl+b Space Enter").unwrap();
    let rendered: Vec<String> = events.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["/", "h", "o", "m", "e", "ArrowDown", "Ctrl+b", "Space", "Enter"]
    );
}

#[test]
fn printable_excludes_command_chords() {
    assert_eq!(KeyEvent::char('x').printable(), Some('x'));
    assert_eq!(KeyEvent::char('x').with_ctrl().printable(), None);
    assert_eq!(KeyEvent::char('X').with_shift().printable(), Some('X'));
    assert_eq!(KeyEvent::new(Key::Enter).printable(), None);
}

#[test]
fn words_with_plus_signs_are_typed_not_parsed_as_chords() {
    let events = parse_key_script("/ c++").unwrap();
    assert_eq!(
        events,
        vec![
            KeyEvent::char('/'),
            KeyEvent::char('c'),
            KeyEvent::char('+'),
            KeyEvent::char('+'),
        ]
    );

    let events = parse_key_script("a+b Ctrl+Shift+k").unwrap();
    let rendered: Vec<String> = events.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["a", "+", "b", "Ctrl+Shift+k"]);
}
