// Selection state - which targets are charted and over which window
use crate::domain::target::TargetRegistry;
use crate::domain::time_window::{resolve, WindowError, WindowMode, WindowRequest};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error("unknown target {0}")]
    UnknownTarget(String),
}

/// User commands that change what the chart shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionCommand {
    ToggleTarget(String),
    SelectAll,
    DeselectAll,
    SetPresetWindow(u32),
    SetCustomWindow {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    selected: BTreeSet<String>,
    window: WindowMode,
}

/// Result of a successful command: the next state and whether the chart has
/// to be rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: SelectionState,
    pub needs_refresh: bool,
}

impl SelectionState {
    pub fn new(selected: impl IntoIterator<Item = String>, window: WindowMode) -> Self {
        Self {
            selected: selected.into_iter().collect(),
            window,
        }
    }

    /// Session start: the leading registry targets over a preset window.
    pub fn initial(registry: &TargetRegistry, default_selection: usize, default_hours: u32) -> Self {
        Self::new(
            registry.leading_ids(default_selection),
            WindowMode::Preset {
                hours: default_hours.max(1),
            },
        )
    }

    pub fn window(&self) -> WindowMode {
        self.window
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in registry order. Ids the registry no longer knows are skipped.
    pub fn selected_ids(&self, registry: &TargetRegistry) -> Vec<String> {
        registry
            .ids()
            .filter(|id| self.selected.contains(*id))
            .map(str::to_string)
            .collect()
    }

    pub fn apply(
        &self,
        command: SelectionCommand,
        registry: &TargetRegistry,
        now: DateTime<Utc>,
    ) -> Result<Transition, SelectionError> {
        match command {
            SelectionCommand::ToggleTarget(id) => self.toggle_target(&id, registry),
            SelectionCommand::SelectAll => Ok(self.select_all_targets(registry)),
            SelectionCommand::DeselectAll => Ok(self.deselect_all_targets()),
            SelectionCommand::SetPresetWindow(hours) => self.set_preset_window(hours, now),
            SelectionCommand::SetCustomWindow { start, end } => self.set_custom_window(start, end, now),
        }
    }

    pub fn toggle_target(&self, id: &str, registry: &TargetRegistry) -> Result<Transition, SelectionError> {
        if !registry.contains(id) {
            return Err(SelectionError::UnknownTarget(id.to_string()));
        }
        let mut next = self.clone();
        if !next.selected.remove(id) {
            next.selected.insert(id.to_string());
        }
        Ok(next.refreshing())
    }

    pub fn select_all_targets(&self, registry: &TargetRegistry) -> Transition {
        Self::new(registry.ids().map(str::to_string), self.window).refreshing()
    }

    pub fn deselect_all_targets(&self) -> Transition {
        Self::new(Vec::new(), self.window).refreshing()
    }

    pub fn set_preset_window(&self, hours: u32, now: DateTime<Utc>) -> Result<Transition, SelectionError> {
        resolve(WindowRequest::Preset { hours }, now)?;
        let mut next = self.clone();
        next.window = WindowMode::Preset { hours };
        Ok(next.refreshing())
    }

    pub fn set_custom_window(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Transition, SelectionError> {
        let window = resolve(WindowRequest::Custom { start, end }, now)?;
        let mut next = self.clone();
        next.window = WindowMode::Custom {
            start: window.start,
            end: window.end,
        };
        Ok(next.refreshing())
    }

    fn refreshing(self) -> Transition {
        Transition {
            next: self,
            needs_refresh: true,
        }
    }
}
