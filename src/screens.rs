//! UI state for the screens that sit around the game itself.

use crate::config::NAME_MAX_LEN;
use crate::scores::RankedScore;

/// Name typed in after a game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameEntry {
    text: String,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a letter or digit, upper-cased. Anything else, or typing past
    /// the length cap, is ignored.
    pub fn push(&mut self, c: char) {
        if c.is_ascii_alphanumeric() && self.text.len() < NAME_MAX_LEN {
            self.text.push(c.to_ascii_uppercase());
        }
    }

    pub fn pop(&mut self) {
        self.text.pop();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The confirmed name, or `None` while nothing has been typed
    pub fn submit(&self) -> Option<String> {
        (!self.text.is_empty()).then(|| self.text.clone())
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AllTime,
    Today,
    Credits,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::AllTime, Page::Today, Page::Credits];

    pub fn title(self) -> &'static str {
        match self {
            Page::AllTime => "Leaderboard - All-time",
            Page::Today => "Leaderboard - Today",
            Page::Credits => "Credits",
        }
    }

    fn index(self) -> usize {
        match self {
            Page::AllTime => 0,
            Page::Today => 1,
            Page::Credits => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    MainMenu,
    Prev,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub kind: ButtonKind,
    pub label: &'static str,
    pub disabled: bool,
}

/// What activating the focused button asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardAction {
    None,
    MainMenu,
}

/// Leaderboard screen state: the fetched rankings, the page being shown,
/// and the button row along the bottom.
#[derive(Debug, Clone)]
pub struct LeaderboardView {
    all_time: Vec<RankedScore>,
    today: Vec<RankedScore>,
    page: Page,
    buttons: [Button; 3],
    active: usize,
}

impl Default for LeaderboardView {
    fn default() -> Self {
        Self::open(Vec::new(), Vec::new())
    }
}

impl LeaderboardView {
    /// Starts on the all-time page with "Main menu" focused
    pub fn open(all_time: Vec<RankedScore>, today: Vec<RankedScore>) -> Self {
        Self {
            all_time,
            today,
            page: Page::AllTime,
            buttons: [
                Button {
                    kind: ButtonKind::MainMenu,
                    label: "Main menu",
                    disabled: false,
                },
                Button {
                    kind: ButtonKind::Prev,
                    label: "Prev",
                    disabled: true,
                },
                Button {
                    kind: ButtonKind::Next,
                    label: "Next",
                    disabled: false,
                },
            ],
            active: 0,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Rows for the current page; the credits page has none
    pub fn rows(&self) -> &[RankedScore] {
        match self.page {
            Page::AllTime => &self.all_time,
            Page::Today => &self.today,
            Page::Credits => &[],
        }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn active_button(&self) -> ButtonKind {
        self.buttons[self.active].kind
    }

    /// Moves focus right, skipping disabled buttons
    pub fn focus_next(&mut self) {
        if let Some(i) = (self.active + 1..self.buttons.len()).find(|&i| !self.buttons[i].disabled) {
            self.active = i;
        }
    }

    /// Moves focus left, skipping disabled buttons
    pub fn focus_prev(&mut self) {
        if let Some(i) = (0..self.active).rev().find(|&i| !self.buttons[i].disabled) {
            self.active = i;
        }
    }

    pub fn activate(&mut self) -> LeaderboardAction {
        match self.active_button() {
            ButtonKind::MainMenu => return LeaderboardAction::MainMenu,
            ButtonKind::Next => self.turn_page(1),
            ButtonKind::Prev => self.turn_page(-1),
        }
        LeaderboardAction::None
    }

    fn turn_page(&mut self, delta: isize) {
        let Some(index) = self.page.index().checked_add_signed(delta) else {
            return;
        };
        let Some(&page) = Page::ALL.get(index) else {
            return;
        };
        self.page = page;
        self.set_disabled(ButtonKind::Prev, index == 0);
        self.set_disabled(ButtonKind::Next, index == Page::ALL.len() - 1);

        // A page button that just switched off hands focus to its partner
        if self.buttons[self.active].disabled {
            let partner = match self.active_button() {
                ButtonKind::Next => ButtonKind::Prev,
                _ => ButtonKind::Next,
            };
            if let Some(i) = self.buttons.iter().position(|b| b.kind == partner) {
                self.active = i;
            }
        }
    }

    fn set_disabled(&mut self, kind: ButtonKind, disabled: bool) {
        for button in self.buttons.iter_mut().filter(|b| b.kind == kind) {
            button.disabled = disabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(name: &str, score: u32) -> RankedScore {
        RankedScore {
            rank: 1,
            name: name.to_string(),
            affiliation: None,
            score,
        }
    }

    #[test]
    fn test_name_entry_uppercases_and_filters() {
        let mut entry = NameEntry::new();
        for c in "ar-ee ba7".chars() {
            entry.push(c);
        }
        assert_eq!(entry.text(), "AREEBA7");
        entry.pop();
        assert_eq!(entry.submit(), Some("AREEBA".to_string()));
    }

    #[test]
    fn test_name_entry_caps_length() {
        let mut entry = NameEntry::new();
        for _ in 0..20 {
            entry.push('x');
        }
        assert_eq!(entry.text().len(), NAME_MAX_LEN);
    }

    #[test]
    fn test_empty_name_is_not_submitted() {
        let mut entry = NameEntry::new();
        assert_eq!(entry.submit(), None);
        entry.push('a');
        entry.clear();
        assert_eq!(entry.submit(), None);
    }

    #[test]
    fn test_leaderboard_opens_on_all_time() {
        let view = LeaderboardView::open(vec![ranked("A", 10)], vec![]);
        assert_eq!(view.page(), Page::AllTime);
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.active_button(), ButtonKind::MainMenu);
        assert!(view.buttons()[1].disabled);
    }

    #[test]
    fn test_focus_skips_disabled_prev() {
        let mut view = LeaderboardView::default();
        view.focus_next();
        assert_eq!(view.active_button(), ButtonKind::Next);
        view.focus_next();
        assert_eq!(view.active_button(), ButtonKind::Next);
        view.focus_prev();
        assert_eq!(view.active_button(), ButtonKind::MainMenu);
        view.focus_prev();
        assert_eq!(view.active_button(), ButtonKind::MainMenu);
    }

    #[test]
    fn test_paging_through_to_credits_and_back() {
        let mut view = LeaderboardView::open(vec![ranked("A", 10)], vec![ranked("B", 5)]);
        view.focus_next();
        assert_eq!(view.activate(), LeaderboardAction::None);
        assert_eq!(view.page(), Page::Today);
        assert_eq!(view.rows()[0].name, "B");
        assert!(!view.buttons()[1].disabled);

        view.activate();
        assert_eq!(view.page(), Page::Credits);
        assert!(view.rows().is_empty());
        assert!(view.buttons()[2].disabled);
        // Next is off now, so focus moved over to Prev
        assert_eq!(view.active_button(), ButtonKind::Prev);

        view.activate();
        view.activate();
        assert_eq!(view.page(), Page::AllTime);
        assert_eq!(view.active_button(), ButtonKind::Next);
    }

    #[test]
    fn test_main_menu_button_exits() {
        let mut view = LeaderboardView::default();
        assert_eq!(view.activate(), LeaderboardAction::MainMenu);
    }
}
