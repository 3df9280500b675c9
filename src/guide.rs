use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GuideItem {
    #[serde(default)]
    pub term: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuideSection {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Render items as a numbered list instead of bullets.
    #[serde(default)]
    pub numbered: bool,
    #[serde(default)]
    pub items: Vec<GuideItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuideTab {
    pub title: String,
    pub sections: Vec<GuideSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Guide {
    pub title: String,
    pub tabs: Vec<GuideTab>,
    pub faqs: Vec<Faq>,
}

impl Guide {
    pub fn tab(&self, index: usize) -> Option<&GuideTab> {
        self.tabs.get(index)
    }
}

/// Navigation state of the guide view. The FAQ list is an accordion: any
/// number of entries may be open at once.
#[derive(Debug, Clone, Default)]
pub struct GuideState {
    tab: usize,
    tab_count: usize,
    faq_selected: usize,
    faq_open: Vec<bool>,
    scroll: u16,
}

impl GuideState {
    pub fn new(guide: &Guide) -> Self {
        Self {
            tab: 0,
            tab_count: guide.tabs.len(),
            faq_selected: 0,
            faq_open: vec![false; guide.faqs.len()],
            scroll: 0,
        }
    }

    pub fn tab(&self) -> usize {
        self.tab
    }

    pub fn next_tab(&mut self) {
        if self.tab_count > 0 {
            self.tab = (self.tab + 1) % self.tab_count;
            self.scroll = 0;
        }
    }

    pub fn prev_tab(&mut self) {
        if self.tab_count > 0 {
            self.tab = (self.tab + self.tab_count - 1) % self.tab_count;
            self.scroll = 0;
        }
    }

    pub fn faq_selected(&self) -> usize {
        self.faq_selected
    }

    pub fn select_faq_next(&mut self) {
        if !self.faq_open.is_empty() {
            self.faq_selected = (self.faq_selected + 1).min(self.faq_open.len() - 1);
        }
    }

    pub fn select_faq_prev(&mut self) {
        self.faq_selected = self.faq_selected.saturating_sub(1);
    }

    pub fn toggle_selected_faq(&mut self) {
        if let Some(open) = self.faq_open.get_mut(self.faq_selected) {
            *open = !*open;
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.faq_open.get(index).copied().unwrap_or(false)
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide() -> Guide {
        Guide {
            title: "t".to_string(),
            tabs: vec![
                GuideTab {
                    title: "a".to_string(),
                    sections: vec![],
                },
                GuideTab {
                    title: "b".to_string(),
                    sections: vec![],
                },
            ],
            faqs: vec![
                Faq {
                    question: "q1".to_string(),
                    answer: "a1".to_string(),
                },
                Faq {
                    question: "q2".to_string(),
                    answer: "a2".to_string(),
                },
            ],
        }
    }

    #[test]
    fn tabs_wrap_and_reset_scroll() {
        let mut s = GuideState::new(&guide());
        s.scroll_down();
        s.next_tab();
        assert_eq!(s.tab(), 1);
        assert_eq!(s.scroll(), 0);
        s.next_tab();
        assert_eq!(s.tab(), 0);
        s.prev_tab();
        assert_eq!(s.tab(), 1);
    }

    #[test]
    fn faqs_toggle_independently() {
        let mut s = GuideState::new(&guide());
        s.toggle_selected_faq();
        s.select_faq_next();
        s.select_faq_next();
        s.toggle_selected_faq();
        assert!(s.is_open(0));
        assert!(s.is_open(1));
        s.toggle_selected_faq();
        assert!(!s.is_open(1));
        assert!(!s.is_open(7));
    }
}
