use crate::config::Config;
use crate::document::{Document, IndicatorView};
use crate::hotkey::KeyEvent;
use crate::mnemonic::{LabelPlacement, MnemonicMap, MnemonicOverlay, MAX_MNEMONICS};
use crate::model::{ElementId, LinkRef};
use crate::overlay_state::{decide, decide_key_up, KeyAction, KeyContext, KeyDecision, Mode};
use crate::settings::SettingsLoad;

const MNEMONIC_HELP: &str = "Ctrl/Cmd+letter follows a labelled link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub match_class: String,
    pub selected_class: String,
    pub label_class: String,
    pub label_height: i32,
    pub max_mnemonics: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ControllerOptions {
    fn from(value: &Config) -> Self {
        Self {
            match_class: value.match_class.clone(),
            selected_class: value.selected_class.clone(),
            label_class: value.label_class.clone(),
            label_height: value.label_height,
            max_mnemonics: value.max_mnemonics.min(MAX_MNEMONICS),
        }
    }
}

#[derive(Debug, Default)]
struct SearchSession {
    query: String,
    matches: Vec<ElementId>,
    selected_index: usize,
    prior_focus: Option<ElementId>,
    overlay: Option<MnemonicOverlay>,
}

impl SearchSession {
    fn selected(&self) -> Option<ElementId> {
        self.matches.get(self.selected_index).copied()
    }
}

/// Per-document type-ahead controller. Owns the session state and every
/// visual marker it puts on the document.
pub struct SearchController<D: Document> {
    document: D,
    options: ControllerOptions,
    settings: SettingsLoad,
    mnemonics_enabled: bool,
    session: Option<SearchSession>,
}

impl<D: Document> SearchController<D> {
    pub fn new(document: D, options: ControllerOptions, settings: SettingsLoad) -> Self {
        let mnemonics_enabled = settings.current();
        let mut controller = Self {
            document,
            options,
            settings,
            mnemonics_enabled,
            session: None,
        };
        controller.render_indicator();
        controller
    }

    pub fn mode(&self) -> Mode {
        if self.session.is_some() {
            Mode::Searching
        } else {
            Mode::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn query(&self) -> &str {
        self.session.as_ref().map(|s| s.query.as_str()).unwrap_or("")
    }

    pub fn matches(&self) -> &[ElementId] {
        self.session
            .as_ref()
            .map(|s| s.matches.as_slice())
            .unwrap_or(&[])
    }

    /// `None` whenever there are no matches.
    pub fn selected_index(&self) -> Option<usize> {
        self.session
            .as_ref()
            .filter(|s| !s.matches.is_empty())
            .map(|s| s.selected_index)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.session.as_ref().and_then(SearchSession::selected)
    }

    pub fn mnemonic_map(&self) -> Option<&MnemonicMap> {
        self.session
            .as_ref()
            .and_then(|s| s.overlay.as_ref())
            .map(MnemonicOverlay::map)
    }

    pub fn label_placements(&self) -> &[LabelPlacement] {
        self.session
            .as_ref()
            .and_then(|s| s.overlay.as_ref())
            .map(MnemonicOverlay::placements)
            .unwrap_or(&[])
    }

    pub fn mnemonics_enabled(&self) -> bool {
        self.mnemonics_enabled
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Picks up the settings load if it has completed since the last event.
    pub fn poll_settings(&mut self) {
        if let Some(enabled) = self.settings.poll() {
            self.set_mnemonics_enabled(enabled);
        }
    }

    /// Updates the in-memory flag. Turning mnemonics off tears down an
    /// overlay that is currently shown; turning them on takes effect at the
    /// next session start.
    pub fn set_mnemonics_enabled(&mut self, enabled: bool) {
        self.mnemonics_enabled = enabled;
        if !enabled {
            if let Some(overlay) = self.session.as_mut().and_then(|s| s.overlay.as_mut()) {
                overlay.clear(&mut self.document);
            }
            if let Some(session) = self.session.as_mut() {
                session.overlay = None;
            }
        }
        tracing::debug!(mnemonics_enabled = enabled, "mnemonic setting applied");
        self.render_indicator();
    }

    pub fn handle_key_down(&mut self, event: &KeyEvent) -> KeyDecision {
        self.poll_settings();

        let editable_focused = self.mode() == Mode::Idle && self.document.editable_focused();
        let context = KeyContext {
            editable_focused,
            query_is_empty: self.query().is_empty(),
            mnemonics: self.mnemonic_map(),
        };
        let decision = decide(self.mode(), event, context);
        self.apply(decision.action);
        decision
    }

    /// Returns whether the host should suppress the key-up default.
    pub fn handle_key_up(&self, event: &KeyEvent) -> bool {
        decide_key_up(event, self.document.editable_focused())
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Pass | KeyAction::Swallow => {}
            KeyAction::StartSearch => self.start_search(),
            KeyAction::Cancel => self.end_search(),
            KeyAction::ActivateSelected => self.follow_selected_link(),
            KeyAction::DeleteBackward => self.remove_last_char(),
            KeyAction::SelectNext => self.select_next(),
            KeyAction::SelectPrevious => self.select_previous(),
            KeyAction::ActivateMnemonic(letter) => self.follow_mnemonic(letter),
            KeyAction::Append(c) => self.add_char(c),
        }
    }

    pub fn start_search(&mut self) {
        if self.session.is_some() {
            return;
        }
        let prior_focus = self.document.active_element();
        let overlay = self.mnemonics_enabled.then(|| {
            MnemonicOverlay::render(
                &mut self.document,
                self.options.max_mnemonics,
                &self.options.label_class,
                self.options.label_height,
            )
        });
        self.session = Some(SearchSession {
            prior_focus,
            overlay,
            ..SearchSession::default()
        });
        tracing::debug!(mnemonics = self.mnemonics_enabled, "search started");
        self.find_links();
    }

    /// Ends the session and removes every marker. Calling it while idle is a no-op.
    pub fn end_search(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        for element in session.matches.drain(..) {
            self.document
                .remove_class(element, &self.options.match_class);
            self.document
                .remove_class(element, &self.options.selected_class);
        }
        if let Some(mut overlay) = session.overlay.take() {
            overlay.clear(&mut self.document);
        }
        self.render_indicator();

        if let Some(prior) = session.prior_focus {
            if let Err(error) = self.document.focus(prior, false) {
                tracing::debug!(element = %prior, %error, "prior focus not restored");
            }
        }
        tracing::debug!("search ended");
    }

    pub fn add_char(&mut self, c: char) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.query.push(c);
        self.find_links();
    }

    pub fn remove_last_char(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.query.pop().is_some() {
            self.find_links();
        } else {
            self.end_search();
        }
    }

    pub fn select_next(&mut self) {
        if let Some(index) = self.selected_index() {
            self.select_link(index.saturating_add(1));
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(index) = self.selected_index() {
            self.select_link(index.saturating_sub(1));
        }
    }

    pub fn follow_selected_link(&mut self) {
        let target = self.selected();
        self.end_search();
        self.activate(target);
    }

    pub fn follow_mnemonic(&mut self, letter: char) {
        let target = self.mnemonic_map().and_then(|map| map.get(letter));
        if target.is_none() {
            return;
        }
        self.end_search();
        self.activate(target);
    }

    fn activate(&mut self, target: Option<ElementId>) {
        let Some(element) = target else {
            return;
        };
        match self.document.click(element) {
            Ok(()) => tracing::debug!(%element, "link activated"),
            Err(error) => tracing::debug!(%element, %error, "link activation skipped"),
        }
    }

    /// Recomputes the match set from scratch for the current query.
    fn find_links(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        for element in session.matches.drain(..) {
            self.document
                .remove_class(element, &self.options.match_class);
            self.document
                .remove_class(element, &self.options.selected_class);
        }
        session.selected_index = 0;

        let links: Vec<LinkRef> = if session.query.is_empty() {
            Vec::new()
        } else {
            self.document.link_refs()
        };
        session.matches = crate::search::search(&links, &session.query)
            .into_iter()
            .map(|link| link.element)
            .collect();
        for element in &session.matches {
            self.document.add_class(*element, &self.options.match_class);
        }
        tracing::debug!(query = %session.query, matches = session.matches.len(), "matches recomputed");

        if session.matches.is_empty() {
            self.render_indicator();
        } else {
            self.select_link(0);
        }
    }

    /// Marks `index` (clamped) as the single selected match.
    fn select_link(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.matches.is_empty() {
            return;
        }

        for element in &session.matches {
            self.document
                .remove_class(*element, &self.options.selected_class);
        }
        session.selected_index = index.min(session.matches.len() - 1);
        let selected = session.matches[session.selected_index];

        self.document
            .add_class(selected, &self.options.selected_class);
        if let Err(error) = self.document.scroll_into_view(selected) {
            tracing::debug!(element = %selected, %error, "scroll skipped");
        }
        if let Err(error) = self.document.focus(selected, true) {
            tracing::debug!(element = %selected, %error, "focus skipped");
        }
        self.render_indicator();
    }

    fn indicator_view(&self) -> IndicatorView {
        let help = if self.mnemonics_enabled {
            MNEMONIC_HELP.to_string()
        } else {
            String::new()
        };
        let Some(session) = self.session.as_ref() else {
            return IndicatorView {
                help,
                ..IndicatorView::default()
            };
        };
        let counter = match (session.query.is_empty(), session.matches.len()) {
            (true, _) => String::new(),
            (false, 0) => "(0 matches)".to_string(),
            (false, total) => format!("({}/{})", session.selected_index + 1, total),
        };
        IndicatorView {
            visible: true,
            query: session.query.clone(),
            counter,
            help,
        }
    }

    fn render_indicator(&mut self) {
        let view = self.indicator_view();
        self.document.render_indicator(&view);
    }
}
