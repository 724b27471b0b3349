//! Task record commands

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::debug;

use super::output::Output;
use crate::domain::{Comment, RelationResolver, Task, TaskId, TaskKind, TaskStatus};
use crate::storage::{Project, TaskStore};

/// Fields for a new task
#[derive(Debug, Default)]
pub struct NewTask {
    pub name: String,
    pub id: Option<String>,
    pub parent: Option<String>,
    pub priority: Option<i64>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub tags: Vec<String>,
    pub score: Option<f64>,
    pub description: Option<String>,
}

pub fn add(output: &Output, new: NewTask) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let tasks = store.read_all()?;

    let now = Utc::now();
    let id = match &new.id {
        Some(id) => id.parse::<TaskId>()?,
        None => TaskId::generate(&new.name, now),
    };
    if tasks.iter().any(|t| t.id == id) {
        bail!("Task already exists: {}", id);
    }

    let mut task = Task::new(id, new.name.trim());
    task.created_at = Some(now);
    task.priority = new.priority;
    task.score = new.score;
    task.status = Some(new.status.map(TaskStatus::from).unwrap_or(TaskStatus::Todo));
    task.kind = new.kind.map(TaskKind::from);
    task.description = new.description;
    for tag in new.tags {
        task.add_tag(tag.trim());
    }

    if let Some(parent) = &new.parent {
        let parent: TaskId = parent.parse()?;
        if !tasks.iter().any(|t| t.id == parent) {
            bail!("Parent task not found: {}", parent);
        }
        task.parent = Some(parent);
    }

    store.append(&task)?;
    debug!(id = %task.id, "task created");

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Created task: {} - {}", task.id, task.name));
    }

    Ok(())
}

pub fn list(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    if output.is_json() {
        output.data(&tasks);
        return Ok(());
    }

    if tasks.is_empty() {
        output.success("No tasks");
        return Ok(());
    }

    for task in &tasks {
        let status = task.status.as_ref().map(TaskStatus::label).unwrap_or("-");
        let priority = task.priority.map(|p| format!("P{}", p)).unwrap_or_default();
        output.row(&[task.id.as_str(), status, &priority, &task.name]);
    }

    Ok(())
}

pub fn show(output: &Output, id: &str) -> Result<()> {
    let project = Project::open_current()?;
    let task = find(&project.task_store(), id)?;

    if output.is_json() {
        output.data(&task);
        return Ok(());
    }

    println!("ID:       {}", task.id);
    println!("Name:     {}", task.name);
    if let Some(status) = &task.status {
        println!("Status:   {}", status);
    }
    if let Some(priority) = task.priority {
        println!("Priority: {}", priority);
    }
    if let Some(kind) = &task.kind {
        println!("Type:     {} {}", kind.emoji(), kind.label());
    }
    if let Some(parent) = &task.parent {
        println!("Parent:   {}", parent);
    }
    if !task.tags.is_empty() {
        let tags: Vec<&str> = task.tags.iter().map(String::as_str).collect();
        println!("Tags:     {}", tags.join(", "));
    }
    if let Some(score) = task.score {
        println!("Score:    {}", score);
    }
    if let Some(created) = task.created_at {
        println!("Created:  {}", created.format("%Y-%m-%d %H:%M"));
    }
    for name in task.relations.names() {
        let targets: Vec<&str> = task.targets(name).iter().map(TaskId::as_str).collect();
        println!("{:<9} {}", format!("{}:", name), targets.join(", "));
    }
    if let Some(description) = &task.description {
        println!();
        println!("{}", description);
    }
    if !task.comments.is_empty() {
        println!();
        for comment in &task.comments {
            println!("> {}, {}", comment.author, comment.timestamp.format("%Y-%m-%d %H:%M"));
            println!("  {}", comment.text.replace('\n', "\n  "));
        }
    }

    Ok(())
}

pub fn set_status(output: &Output, id: &str, status: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let mut task = find(&store, id)?;

    task.set_status(status);
    store.update(&task)?;

    let label = task.status.as_ref().map(TaskStatus::label).unwrap_or_default();
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id,
            "status": label,
        }));
    } else {
        output.success(&format!("{}: {}", task.id, label));
    }

    Ok(())
}

pub fn comment(output: &Output, id: &str, text: &str, author: Option<String>) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let mut task = find(&store, id)?;

    let author = author.unwrap_or_else(|| project.config().global.effective_author());
    task.add_comment(Comment::new(text, author));
    store.update(&task)?;

    output.success(&format!("Added comment to {}", task.id));
    Ok(())
}

pub fn link(output: &Output, from: &str, relation: &str, to: &str) -> Result<()> {
    let relation = RelationResolver::new(relation)?;
    let relation = relation.relation();

    let project = Project::open_current()?;
    let store = project.task_store();
    let mut task = find(&store, from)?;
    let target = find(&store, to)?;

    if task.link(relation, target.id.clone()) {
        store.update(&task)?;
        output.success(&format!("{} {} {}", task.id, relation, target.id));
    } else {
        output.success(&format!("Already linked: {} {} {}", task.id, relation, target.id));
    }

    Ok(())
}

pub fn unlink(output: &Output, from: &str, relation: &str, to: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let mut task = find(&store, from)?;
    let target: TaskId = to.parse()?;

    if !task.unlink(relation, &target) {
        bail!("No '{}' link from {} to {}", relation, task.id, target);
    }
    store.update(&task)?;

    output.success(&format!("Removed: {} {} {}", task.id, relation, target));
    Ok(())
}

fn find(store: &TaskStore, id: &str) -> Result<Task> {
    let id: TaskId = id.parse()?;
    store
        .find(&id)?
        .with_context(|| format!("Task not found: {}", id))
}
