// Target domain model and the session-scoped registry
use serde::Serialize;

/// Line colors, assigned by registry position and cycled with modulo.
pub const PALETTE: [&str; 10] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6",
    "#ec4899", "#14b8a6", "#f97316", "#6366f1", "#84cc16",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub id: String,
    pub description: String,
    pub address: Option<String>,
    pub address_hidden: bool,
}

impl Target {
    pub fn new(id: String, description: String, address: Option<String>, address_hidden: bool) -> Self {
        // The backend blanks hidden addresses instead of omitting them
        let address = address.filter(|a| !a.is_empty());
        Self {
            id,
            description,
            address,
            address_hidden,
        }
    }

    /// Legend label: description, plus the address when it may be shown.
    pub fn display_label(&self) -> String {
        match (&self.address, self.address_hidden) {
            (Some(addr), false) => format!("{} ({})", self.description, addr),
            _ => self.description.clone(),
        }
    }
}

/// Ordered list of targets fetched once per session.
///
/// Order is treated as stable for the session: a target's ordinal decides its
/// color, so the same target keeps the same line color on every refresh.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    pub fn new(targets: Vec<Target>) -> Self {
        let mut unique: Vec<Target> = Vec::with_capacity(targets.len());
        for target in targets {
            if unique.iter().any(|t| t.id == target.id) {
                tracing::warn!("Ignoring duplicate target id {}", target.id);
                continue;
            }
            unique.push(target);
        }
        Self { targets: unique }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ordinal(&self, id: &str) -> Option<usize> {
        self.targets.iter().position(|t| t.id == id)
    }

    pub fn color_of(&self, id: &str) -> Option<&'static str> {
        self.ordinal(id).map(color_for_ordinal)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.id.as_str())
    }

    /// Ids of the first `count` targets, the initial selection of a session.
    pub fn leading_ids(&self, count: usize) -> Vec<String> {
        self.targets.iter().take(count).map(|t| t.id.clone()).collect()
    }
}

pub fn color_for_ordinal(ordinal: usize) -> &'static str {
    PALETTE[ordinal % PALETTE.len()]
}
