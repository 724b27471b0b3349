//! Task domain model
//!
//! Tasks are the records rendered as trees. They may point at a parent task
//! (hierarchy view) and carry named, directed relations to other tasks
//! (relation view).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id::TaskId;

/// Well-known relation names between tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Task A must complete before Task B can start
    Blocks,
    /// Task B was created because of Task A
    Provenance,
    /// Tasks are related but don't block each other
    Related,
    /// Task B is a duplicate of Task A
    Duplicates,
}

impl RelationKind {
    /// All well-known relation kinds
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Blocks,
        RelationKind::Provenance,
        RelationKind::Related,
        RelationKind::Duplicates,
    ];

    /// Returns the relation name used in task records
    pub fn name(&self) -> &'static str {
        match self {
            RelationKind::Blocks => "blocks",
            RelationKind::Provenance => "provenance",
            RelationKind::Related => "related",
            RelationKind::Duplicates => "duplicates",
        }
    }

    /// Looks up a well-known relation by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Named, directed relations from one task to others
///
/// Serialized as a JSON object: `{"blocks": ["T2", "T3"], "related": ["T9"]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relations(BTreeMap<String, Vec<TaskId>>);

impl Relations {
    /// Creates an empty relation map
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds an edge; returns false if it already existed
    pub fn add(&mut self, relation: &str, target: TaskId) -> bool {
        let targets = self.0.entry(relation.to_string()).or_default();
        if targets.contains(&target) {
            false
        } else {
            targets.push(target);
            true
        }
    }

    /// Removes an edge; returns true if it existed
    pub fn remove(&mut self, relation: &str, target: &TaskId) -> bool {
        let Some(targets) = self.0.get_mut(relation) else {
            return false;
        };

        let len_before = targets.len();
        targets.retain(|t| t != target);
        let removed = targets.len() != len_before;

        if targets.is_empty() {
            self.0.remove(relation);
        }
        removed
    }

    /// Returns the targets of one relation, in record order
    pub fn targets(&self, relation: &str) -> &[TaskId] {
        self.0.get(relation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the relation name appears in this map
    pub fn has(&self, relation: &str) -> bool {
        self.0.contains_key(relation)
    }

    /// Iterates over relation names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns true if no relation has any target
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// Status of a task
///
/// Unknown status strings are kept verbatim so they still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Blocked,
    Done,
    Cancelled,
    Other(String),
}

impl TaskStatus {
    /// Returns the label used in records and badges
    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Other(s) => s,
        }
    }

    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }

    /// Returns true if this task is currently being worked on
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "todo" | "open" => TaskStatus::Todo,
            "in_progress" | "doing" | "started" => TaskStatus::InProgress,
            "blocked" => TaskStatus::Blocked,
            "done" | "closed" => TaskStatus::Done,
            "cancelled" | "canceled" => TaskStatus::Cancelled,
            _ => TaskStatus::Other(value),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of work a task represents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    Bug,
    Feature,
    Chore,
    Docs,
    Test,
    Epic,
    Other(String),
}

impl TaskKind {
    /// Returns the label used in records
    pub fn label(&self) -> &str {
        match self {
            TaskKind::Bug => "bug",
            TaskKind::Feature => "feature",
            TaskKind::Chore => "chore",
            TaskKind::Docs => "docs",
            TaskKind::Test => "test",
            TaskKind::Epic => "epic",
            TaskKind::Other(s) => s,
        }
    }

    /// Returns the glyph shown in the header line
    pub fn emoji(&self) -> &'static str {
        match self {
            TaskKind::Bug => "🐛",
            TaskKind::Feature => "✨",
            TaskKind::Chore => "🔧",
            TaskKind::Docs => "📝",
            TaskKind::Test => "🧪",
            TaskKind::Epic => "🏔",
            TaskKind::Other(_) => "📌",
        }
    }
}

impl From<String> for TaskKind {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "bug" | "fix" => TaskKind::Bug,
            "feature" | "feat" => TaskKind::Feature,
            "chore" => TaskKind::Chore,
            "docs" | "doc" => TaskKind::Docs,
            "test" | "tests" => TaskKind::Test,
            "epic" => TaskKind::Epic,
            _ => TaskKind::Other(value),
        }
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        kind.label().to_string()
    }
}

/// A comment attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,

    #[serde(default)]
    pub author: String,

    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Human-readable name
    pub name: String,

    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Lower is more urgent; absent sorts after every numeric value
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_number"
    )]
    pub priority: Option<i64>,

    /// Parent task in the hierarchy view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<TaskId>,

    /// Kind of work (shown as a type glyph)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Comments in the order they were added
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_number"
    )]
    pub score: Option<f64>,

    /// Named relations to other tasks (e.g. `blocks`)
    #[serde(default, skip_serializing_if = "Relations::is_empty")]
    pub relations: Relations,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accepts a number or a numeric string; anything else becomes `None`
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.to_string().parse().ok(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

impl Task {
    /// Creates a new task with the given ID and name
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: None,
            priority: None,
            parent: None,
            kind: None,
            description: None,
            comments: Vec::new(),
            tags: BTreeSet::new(),
            score: None,
            relations: Relations::new(),
            created_at: None,
        }
    }

    /// Sets the parent task
    pub fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the priority
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Sets the status
    pub fn set_status(&mut self, status: impl Into<TaskStatus>) {
        self.status = Some(status.into());
    }

    /// Adds a tag; returns false if it was already present
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }

    /// Appends a comment
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Adds a relation edge from this task to `target`
    pub fn link(&mut self, relation: &str, target: TaskId) -> bool {
        self.relations.add(relation, target)
    }

    /// Removes a relation edge from this task to `target`
    pub fn unlink(&mut self, relation: &str, target: &TaskId) -> bool {
        self.relations.remove(relation, target)
    }

    /// Returns the targets of a relation
    pub fn targets(&self, relation: &str) -> &[TaskId] {
        self.relations.targets(relation)
    }
}
