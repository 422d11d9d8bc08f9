use super::observable::Observable;

/// Sidebar visibility for the dashboard shell.
#[derive(Clone)]
pub struct LayoutContext {
    sidebar_open: Observable<bool>,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutContext {
    pub fn new() -> Self {
        Self {
            sidebar_open: Observable::new(false),
        }
    }

    pub fn state(&self) -> &Observable<bool> {
        &self.sidebar_open
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open.get()
    }

    pub fn open_sidebar(&self) {
        self.sidebar_open.set(true);
    }

    pub fn close_sidebar(&self) {
        self.sidebar_open.set(false);
    }

    pub fn toggle_sidebar(&self) {
        self.sidebar_open.update(|open| *open = !*open);
    }
}
