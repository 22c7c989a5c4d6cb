use crate::config::{FieldSpec, GameConfig};

/// Working copy of a config while the settings screen is open.
///
/// Edits only touch the draft; the owning game decides whether the draft is
/// saved or thrown away.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsEditor<C: GameConfig> {
    draft: C,
    selected: usize,
    error: Option<String>,
}

impl<C: GameConfig> SettingsEditor<C> {
    pub fn new(config: C) -> Self {
        Self {
            draft: config,
            selected: 0,
            error: None,
        }
    }

    pub fn draft(&self) -> &C {
        &self.draft
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn rows(&self) -> impl Iterator<Item = (&'static FieldSpec, i64, bool)> + '_ {
        C::fields()
            .iter()
            .enumerate()
            .map(move |(i, spec)| (spec, self.draft.field(i), i == self.selected))
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % C::fields().len();
    }

    pub fn select_prev(&mut self) {
        let len = C::fields().len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn increase(&mut self) {
        self.adjust(1);
    }

    pub fn decrease(&mut self) {
        self.adjust(-1);
    }

    fn adjust(&mut self, direction: i64) {
        let spec = C::fields()[self.selected];
        let current = self.draft.field(self.selected);
        let next = current
            .saturating_add(direction * spec.step)
            .clamp(spec.min, spec.max);
        self.draft.set_field(self.selected, next);
        self.error = None;
    }

    /// Replaces the draft with the built-in defaults.
    pub fn load_defaults(&mut self) {
        self.draft = C::default();
        self.error = None;
    }
}
