//! Golden tests for tree rendering
//!
//! These tests pin the exact text of rendered trees. The connector layout is
//! the contract other tools parse, so any change here must be deliberate.

use chrono::{TimeZone, Utc};
use tasktree_cli::domain::{Comment, Task, TaskKind, TaskStatus};
use tasktree_cli::render::{render, render_to_string, RenderConfig, TagStyle};

fn task(id: &str, name: &str, priority: Option<i64>, parent: Option<&str>) -> Task {
    let mut t = Task::new(id.parse().unwrap(), name);
    t.priority = priority;
    t.parent = parent.map(|p| p.parse().unwrap());
    t
}

fn checked() -> RenderConfig {
    RenderConfig {
        validate_pipes: true,
        ..RenderConfig::default()
    }
}

/// A small project: two epics, nested work, an orphan and a parent cycle
fn project() -> Vec<Task> {
    let mut api = task("E1", "API", Some(1), None);
    api.kind = Some(TaskKind::Epic);
    api.set_status(TaskStatus::InProgress);
    api.add_tag("backend");
    api.set_description("Public HTTP API.\n\nVersioned under /v1.");

    let mut auth = task("T1", "Auth", Some(1), Some("E1"));
    auth.set_status(TaskStatus::Done);
    auth.add_tag("security");
    auth.score = Some(8.5);

    let mut tokens = task("T2", "Token refresh", Some(2), Some("T1"));
    tokens.kind = Some(TaskKind::Bug);
    tokens.add_comment(Comment {
        text: "Repro attached".to_string(),
        author: "lee".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
    });

    let docs = task("T3", "docs", None, Some("E1"));
    let ui = task("E2", "UI", Some(2), None);
    let lost = task("T9", "Lost", None, Some("T404"));
    let loop_a = task("L1", "Loop a", Some(5), Some("L2"));
    let loop_b = task("L2", "Loop b", Some(6), Some("L1"));

    vec![tokens, docs, ui, auth, lost, api, loop_b, loop_a]
}

#[test]
fn hierarchy_default() {
    let lines = render(&project(), &checked()).unwrap();

    assert_eq!(
        lines,
        vec![
            "├─ API",
            "│  ├─ Auth",
            "│  │  └─ Token refresh",
            "│  └─ docs",
            "├─ UI",
            "├─ Loop a [cyclic-hierarchy]",
            "│  └─ Loop b",
            "└─ Lost [orphan]",
        ]
    );
}

#[test]
fn hierarchy_everything_on() {
    let config = RenderConfig {
        show_ids: true,
        show_score: true,
        show_tags: true,
        tag_style: TagStyle::Plain,
        show_type_emoji: true,
        show_status: true,
        show_descriptions: true,
        show_comments: 1,
        ..checked()
    };

    let text = render_to_string(&project(), &config).unwrap();

    let expected = [
        "├─ API [E1] 🏔 (in_progress, P1) #backend",
        "│  Public HTTP API.",
        "│  ",
        "│  Versioned under /v1.",
        "│  ├─ Auth [T1] (done, P1) #security score=8.5",
        "│  │  └─ Token refresh [T2] 🐛 (P2)",
        "│  │     > lee, 2024-05-02 09:30",
        "│  │       Repro attached",
        "│  └─ docs [T3]",
        "├─ UI [E2] (P2)",
        "├─ Loop a [L1] (P5) [cyclic-hierarchy]",
        "│  └─ Loop b [L2] (P6)",
        "└─ Lost [T9] [orphan]",
    ]
    .join("\n");

    assert_eq!(text, expected);
}

#[test]
fn relation_view_with_shared_target_and_cycle() {
    let mut design = task("D", "Design", Some(1), None);
    design.link("blocks", "B".parse().unwrap());
    design.link("blocks", "R".parse().unwrap());

    let mut build = task("B", "Build", Some(2), None);
    build.link("blocks", "S".parse().unwrap());

    let mut review = task("R", "Review", Some(3), None);
    review.link("blocks", "S".parse().unwrap());

    let ship = task("S", "Ship", Some(4), None);

    let mut ping = task("P", "Ping", Some(8), None);
    ping.link("blocks", "Q".parse().unwrap());
    let mut pong = task("Q", "Pong", Some(9), None);
    pong.link("blocks", "P".parse().unwrap());

    let config = RenderConfig {
        validate_pipes: true,
        ..RenderConfig::default().with_relation("blocks")
    };
    let lines = render(&[ship, review, build, design, pong, ping], &config).unwrap();

    assert_eq!(
        lines,
        vec![
            "├─ Design",
            "│  ├─ Build",
            "│  │  └─ Ship",
            "│  └─ Review",
            "│     └─ Ship",
            "└─ Ping",
            "   └─ Pong",
            "      └─ Ping [cycle-reference]",
        ]
    );
}

#[test]
fn wrapped_description_under_mid_sibling() {
    let mut first = task("A", "First", Some(1), None);
    first.set_description("one two three four five six");
    let second = task("B", "Second", Some(2), None);
    let child = task("C", "Child", None, Some("A"));

    let config = RenderConfig {
        show_descriptions: true,
        description_length: 9,
        ..checked()
    };

    let lines = render(&[second, child, first], &config).unwrap();
    assert_eq!(
        lines,
        vec![
            "├─ First",
            "│  one two",
            "│  three",
            "│  four five",
            "│  six",
            "│  └─ Child",
            "└─ Second",
        ]
    );
}

#[test]
fn empty_input_renders_nothing() {
    assert!(render(&[], &checked()).unwrap().is_empty());
}
