use crate::hotkey::{Key, KeyEvent};
use crate::mnemonic::MnemonicMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Not ours; the host keeps its default behaviour.
    Pass,
    StartSearch,
    Cancel,
    ActivateSelected,
    DeleteBackward,
    SelectNext,
    SelectPrevious,
    ActivateMnemonic(char),
    Append(char),
    /// Suppressed while searching without any state change.
    Swallow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDecision {
    pub action: KeyAction,
    pub prevent_default: bool,
}

impl KeyDecision {
    fn pass() -> Self {
        Self {
            action: KeyAction::Pass,
            prevent_default: false,
        }
    }

    fn handled(action: KeyAction) -> Self {
        Self {
            action,
            prevent_default: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyContext<'a> {
    pub editable_focused: bool,
    pub query_is_empty: bool,
    pub mnemonics: Option<&'a MnemonicMap>,
}

/// Key-down transition table.
pub fn decide(mode: Mode, event: &KeyEvent, context: KeyContext<'_>) -> KeyDecision {
    match mode {
        Mode::Idle => {
            if event.key == Key::Char('/') && !context.editable_focused {
                KeyDecision::handled(KeyAction::StartSearch)
            } else {
                KeyDecision::pass()
            }
        }
        Mode::Searching => KeyDecision::handled(searching_action(event, context)),
    }
}

/// Key-up handling: only the trigger key is suppressed, so the browser's own
/// quick-find binding never sees it.
pub fn decide_key_up(event: &KeyEvent, editable_focused: bool) -> bool {
    event.key == Key::Char('/') && !editable_focused
}

fn searching_action(event: &KeyEvent, context: KeyContext<'_>) -> KeyAction {
    let shift = event.modifiers.shift;
    match &event.key {
        Key::Escape => KeyAction::Cancel,
        Key::Enter => KeyAction::ActivateSelected,
        Key::Backspace if context.query_is_empty => KeyAction::Cancel,
        Key::Backspace => KeyAction::DeleteBackward,
        Key::ArrowDown => KeyAction::SelectNext,
        Key::Tab if !shift => KeyAction::SelectNext,
        Key::ArrowUp | Key::Tab => KeyAction::SelectPrevious,
        Key::Char(_) => {
            if let Some(letter) = event.command_letter() {
                return match context.mnemonics {
                    Some(map) if map.get(letter).is_some() => KeyAction::ActivateMnemonic(letter),
                    _ => KeyAction::Swallow,
                };
            }
            match event.printable() {
                Some(c) => KeyAction::Append(c),
                None => KeyAction::Swallow,
            }
        }
        Key::Other(_) => KeyAction::Swallow,
    }
}

#[cfg(test)]
mod tests {
    use super::{decide, decide_key_up, KeyAction, KeyContext, Mode};
    use crate::hotkey::{Key, KeyEvent};
    use crate::mnemonic::MnemonicMap;
    use crate::model::ElementId;

    #[test]
    fn slash_starts_search_only_outside_editable_controls() {
        let slash = KeyEvent::char('/');
        let decision = decide(Mode::Idle, &slash, KeyContext::default());
        assert_eq!(decision.action, KeyAction::StartSearch);
        assert!(decision.prevent_default);

        let in_input = KeyContext {
            editable_focused: true,
            ..Default::default()
        };
        let decision = decide(Mode::Idle, &slash, in_input);
        assert_eq!(decision.action, KeyAction::Pass);
        assert!(!decision.prevent_default);
    }

    #[test]
    fn idle_ignores_everything_else() {
        let decision = decide(Mode::Idle, &KeyEvent::char('a'), KeyContext::default());
        assert_eq!(decision.action, KeyAction::Pass);
        assert!(!decision.prevent_default);
    }

    #[test]
    fn backspace_cancels_only_with_empty_query() {
        let backspace = KeyEvent::new(Key::Backspace);
        let empty = KeyContext {
            query_is_empty: true,
            ..Default::default()
        };
        assert_eq!(
            decide(Mode::Searching, &backspace, empty).action,
            KeyAction::Cancel
        );
        assert_eq!(
            decide(Mode::Searching, &backspace, KeyContext::default()).action,
            KeyAction::DeleteBackward
        );
    }

    #[test]
    fn tab_mirrors_arrows() {
        let ctx = KeyContext::default();
        assert_eq!(
            decide(Mode::Searching, &KeyEvent::new(Key::Tab), ctx).action,
            KeyAction::SelectNext
        );
        assert_eq!(
            decide(Mode::Searching, &KeyEvent::new(Key::Tab).with_shift(), ctx).action,
            KeyAction::SelectPrevious
        );
        assert_eq!(
            decide(Mode::Searching, &KeyEvent::new(Key::ArrowUp), ctx).action,
            KeyAction::SelectPrevious
        );
    }

    #[test]
    fn command_letter_hits_mnemonic_or_is_swallowed() {
        let map = MnemonicMap::assign(&[ElementId(1), ElementId(2)], 26);
        let ctx = KeyContext {
            mnemonics: Some(&map),
            ..Default::default()
        };

        let hit = decide(Mode::Searching, &KeyEvent::char('b').with_meta(), ctx);
        assert_eq!(hit.action, KeyAction::ActivateMnemonic('b'));

        let miss = decide(Mode::Searching, &KeyEvent::char('z').with_ctrl(), ctx);
        assert_eq!(miss.action, KeyAction::Swallow);
        assert!(miss.prevent_default);

        let disabled = decide(
            Mode::Searching,
            &KeyEvent::char('a').with_ctrl(),
            KeyContext::default(),
        );
        assert_eq!(disabled.action, KeyAction::Swallow);
    }

    #[test]
    fn shifted_characters_are_typed() {
        let decision = decide(
            Mode::Searching,
            &KeyEvent::char('H').with_shift(),
            KeyContext::default(),
        );
        assert_eq!(decision.action, KeyAction::Append('H'));
    }

    #[test]
    fn unknown_keys_are_swallowed_while_searching() {
        let decision = decide(
            Mode::Searching,
            &KeyEvent::new(Key::Other("PageDown".into())),
            KeyContext::default(),
        );
        assert_eq!(decision.action, KeyAction::Swallow);
        assert!(decision.prevent_default);
    }

    #[test]
    fn key_up_suppresses_trigger_outside_inputs() {
        assert!(decide_key_up(&KeyEvent::char('/'), false));
        assert!(!decide_key_up(&KeyEvent::char('/'), true));
        assert!(!decide_key_up(&KeyEvent::char('a'), false));
    }
}
