/*
 * Portable bookkeeping shared by both tooltip manager implementations: which
 * value controls are registered as tools and the full text each one shows on
 * hover. The native side only mirrors what this registry holds.
 */

use super::types::ControlHandle;

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TooltipRegistry {
    tips: HashMap<ControlHandle, String>,
}

impl TooltipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool. Returns false if the control was already registered,
    /// in which case its text is replaced.
    pub fn add(&mut self, control: ControlHandle, text: &str) -> bool {
        self.tips.insert(control, text.to_string()).is_none()
    }

    /// Replaces the text of a registered tool. Returns false for unknown controls.
    pub fn update(&mut self, control: ControlHandle, text: &str) -> bool {
        match self.tips.get_mut(&control) {
            Some(existing) => {
                existing.clear();
                existing.push_str(text);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, control: ControlHandle) -> bool {
        self.tips.remove(&control).is_some()
    }

    pub fn text(&self, control: ControlHandle) -> Option<&str> {
        self.tips.get(&control).map(String::as_str)
    }

    pub fn contains(&self, control: ControlHandle) -> bool {
        self.tips.contains_key(&control)
    }

    pub fn len(&self) -> usize {
        self.tips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }

    pub fn controls(&self) -> impl Iterator<Item = ControlHandle> + '_ {
        self.tips.keys().copied()
    }
}
