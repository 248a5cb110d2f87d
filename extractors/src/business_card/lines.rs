/// Non-blank trimmed lines of one OCR document plus the claimed marks.
///
/// Scoped to a single `extract` call.
pub struct CardLines<'a> {
    lines: Vec<&'a str>,
    used: Vec<bool>,
}

impl<'a> CardLines<'a> {
    pub fn new(raw_text: &'a str) -> Self {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let used = vec![false; lines.len()];
        Self { lines, used }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    pub fn is_used(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(true)
    }

    pub fn mark_used(&mut self, index: usize) {
        if let Some(slot) = self.used.get_mut(index) {
            *slot = true;
        }
    }

    /// Every line with its index, claimed or not
    pub fn all(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines.iter().copied().enumerate()
    }

    /// Lines not yet claimed by an earlier pass, top to bottom.
    ///
    /// Collected up front so a pass can mark lines while walking the result.
    pub fn unused(&self) -> Vec<(usize, &'a str)> {
        self.all().filter(|(i, _)| !self.used[*i]).collect()
    }
}
