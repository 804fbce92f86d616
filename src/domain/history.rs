/// Browser-style navigation history over visited directory paths.
///
/// The cursor always points at the current path; visiting a new path
/// while the cursor sits before the end discards every forward entry
/// first.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<String>,
    index: usize,
}

impl NavigationHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Records a visit. Returns `false` without touching the history
    /// when `path` equals the current entry.
    pub fn push(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path == self.current() {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index = self.entries.len() - 1;
        true
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The history always holds at least the initial path.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
