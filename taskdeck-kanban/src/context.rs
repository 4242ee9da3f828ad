//! KanbanContext - I/O primitives for the engine's storage
//!
//! The context provides access to storage and utilities. No business logic
//! methods, just data access primitives. Commands do all the work.
//!
//! Storage is one JSON file per entity under a `.taskdeck` root, with JSONL
//! append-only streams for move events and audit logs, and one fs2 advisory
//! lock file per board to serialize ordering mutations.

use crate::auth::{AllowAll, Authorizer, Capability, Notifier, NoopNotifier};
use crate::error::{KanbanError, Result};
use crate::types::{
    ActorId, Board, BoardId, Column, ColumnId, Project, ProjectId, Sprint, SprintId, Task,
    TaskId, TaskMoveEvent, VelocityRecord,
};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use taskdeck_operations::LogEntry;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Lock acquisition attempts before giving up with `LockTimeout`
const LOCK_RETRY_ATTEMPTS: u32 = 5;
/// Base backoff between lock attempts; grows linearly per attempt
const LOCK_RETRY_BACKOFF_MS: u64 = 10;

/// Engine policy knobs. Defaults keep sprints exclusive and WIP limits
/// advisory, but integrators can flip either.
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// At most one active sprint per project
    pub single_active_sprint: bool,
    /// Reject moves into a column at its WIP limit (advisory-only when false)
    pub enforce_wip_limit: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            single_active_sprint: true,
            enforce_wip_limit: false,
        }
    }
}

/// Context passed to every command - provides access, not logic
pub struct KanbanContext {
    /// Path to the .taskdeck directory
    root: PathBuf,
    policy: EnginePolicy,
    authorizer: Arc<dyn Authorizer>,
    notifier: Arc<dyn Notifier>,
}

impl KanbanContext {
    /// Create a new context for the given .taskdeck directory.
    /// Defaults: allow-all authorization, no-op notifications, default policy.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: EnginePolicy::default(),
            authorizer: Arc::new(AllowAll),
            notifier: Arc::new(NoopNotifier),
        }
    }

    /// Override the engine policy
    pub fn with_policy(mut self, policy: EnginePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Plug in the external authorization check
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Plug in the notification emitter
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The active policy
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Run the delegated authorization check, failing `PermissionDenied` on
    /// deny. Callers without an actor identity (embedded use) are allowed.
    pub async fn authorize(
        &self,
        actor: Option<&ActorId>,
        project: &ProjectId,
        capability: Capability,
    ) -> Result<()> {
        let Some(actor) = actor else {
            return Ok(());
        };
        if self.authorizer.check(actor, project, capability).await {
            Ok(())
        } else {
            Err(KanbanError::PermissionDenied {
                actor: actor.to_string(),
                action: capability.to_string(),
            })
        }
    }

    /// Fire-and-forget assignee notification. Outcome is ignored.
    pub fn notify_assignment(&self, task: &TaskId, assignees: &[ActorId]) {
        tracing::debug!(task = %task, count = assignees.len(), "assignee change notification");
        self.notifier.task_assigned(task, assignees);
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the root .taskdeck directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the projects directory
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    /// Path to a project's JSON file
    pub fn project_path(&self, id: &ProjectId) -> PathBuf {
        self.projects_dir().join(format!("{}.json", id))
    }

    /// Path to the boards directory
    pub fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    /// Path to a board's JSON file
    pub fn board_path(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.json", id))
    }

    /// Path to the columns directory
    pub fn columns_dir(&self) -> PathBuf {
        self.root.join("columns")
    }

    /// Path to a column's JSON file
    pub fn column_path(&self, id: &ColumnId) -> PathBuf {
        self.columns_dir().join(format!("{}.json", id))
    }

    /// Path to the tasks directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    /// Path to a task's JSON file
    pub fn task_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    /// Path to a task's audit log
    pub fn task_log_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.jsonl", id))
    }

    /// Path to the sprints directory
    pub fn sprints_dir(&self) -> PathBuf {
        self.root.join("sprints")
    }

    /// Path to a sprint's JSON file
    pub fn sprint_path(&self, id: &SprintId) -> PathBuf {
        self.sprints_dir().join(format!("{}.json", id))
    }

    /// Path to the velocity records directory
    pub fn velocity_dir(&self) -> PathBuf {
        self.root.join("velocity")
    }

    /// Path to a completed sprint's velocity record
    pub fn velocity_path(&self, sprint_id: &SprintId) -> PathBuf {
        self.velocity_dir().join(format!("{}.json", sprint_id))
    }

    /// Path to the move-event streams directory
    pub fn events_dir(&self) -> PathBuf {
        self.root.join("events")
    }

    /// Path to a board's append-only move-event stream
    pub fn events_path(&self, board_id: &BoardId) -> PathBuf {
        self.events_dir().join(format!("{}.jsonl", board_id))
    }

    /// Path to the activity directory
    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    /// Path to the global audit log
    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    /// Path to the board lock directory
    pub fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    /// Path to a board's lock file
    pub fn board_lock_path(&self, board_id: &BoardId) -> PathBuf {
        self.locks_dir().join(format!("{}.lock", board_id))
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if all required directories exist
    pub fn directories_exist(&self) -> bool {
        self.root.exists()
            && self.projects_dir().exists()
            && self.boards_dir().exists()
            && self.columns_dir().exists()
            && self.tasks_dir().exists()
            && self.sprints_dir().exists()
            && self.velocity_dir().exists()
            && self.events_dir().exists()
            && self.activity_dir().exists()
            && self.locks_dir().exists()
    }

    /// Create the directory structure. Idempotent.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.projects_dir()).await?;
        fs::create_dir_all(self.boards_dir()).await?;
        fs::create_dir_all(self.columns_dir()).await?;
        fs::create_dir_all(self.tasks_dir()).await?;
        fs::create_dir_all(self.sprints_dir()).await?;
        fs::create_dir_all(self.velocity_dir()).await?;
        fs::create_dir_all(self.events_dir()).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        fs::create_dir_all(self.locks_dir()).await?;
        Ok(())
    }

    /// Ensure directories exist, creating them if needed
    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.directories_exist() {
            self.create_directories().await?;
        }
        Ok(())
    }

    // =========================================================================
    // Generic JSON I/O
    // =========================================================================

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        atomic_write(path, content.as_bytes()).await
    }

    async fn list_json_stems(&self, dir: &Path) -> Result<Vec<String>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut stems = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    stems.push(stem.to_string());
                }
            }
        }
        Ok(stems)
    }

    // =========================================================================
    // Project I/O
    // =========================================================================

    /// Read a project; NotFound if missing or soft-deleted
    pub async fn read_project(&self, id: &ProjectId) -> Result<Project> {
        let project: Option<Project> = self.read_json(&self.project_path(id)).await?;
        match project {
            Some(p) if p.is_active_record() => Ok(p),
            _ => Err(KanbanError::ProjectNotFound { id: id.to_string() }),
        }
    }

    /// Write a project file (atomic write via temp file)
    pub async fn write_project(&self, project: &Project) -> Result<()> {
        self.write_json(&self.project_path(&project.id), project).await
    }

    // =========================================================================
    // Board I/O
    // =========================================================================

    /// Read a board; NotFound if missing or soft-deleted
    pub async fn read_board(&self, id: &BoardId) -> Result<Board> {
        let board: Option<Board> = self.read_json(&self.board_path(id)).await?;
        match board {
            Some(b) if b.is_active_record() => Ok(b),
            _ => Err(KanbanError::BoardNotFound { id: id.to_string() }),
        }
    }

    /// Write a board file (atomic write via temp file)
    pub async fn write_board(&self, board: &Board) -> Result<()> {
        self.write_json(&self.board_path(&board.id), board).await
    }

    // =========================================================================
    // Column I/O
    // =========================================================================

    /// Read a column; NotFound if missing or soft-deleted
    pub async fn read_column(&self, id: &ColumnId) -> Result<Column> {
        let column: Option<Column> = self.read_json(&self.column_path(id)).await?;
        match column {
            Some(c) if c.is_active_record() => Ok(c),
            _ => Err(KanbanError::ColumnNotFound { id: id.to_string() }),
        }
    }

    /// Write a column file (atomic write via temp file)
    pub async fn write_column(&self, column: &Column) -> Result<()> {
        self.write_json(&self.column_path(&column.id), column).await
    }

    /// All active columns of a board, sorted by position
    pub async fn read_board_columns(&self, board_id: &BoardId) -> Result<Vec<Column>> {
        let mut columns = Vec::new();
        for stem in self.list_json_stems(&self.columns_dir()).await? {
            let id = ColumnId::from_string(stem);
            if let Some(column) = self.read_json::<Column>(&self.column_path(&id)).await? {
                if column.is_active_record() && &column.board_id == board_id {
                    columns.push(column);
                }
            }
        }
        columns.sort_by_key(|c| c.position);
        Ok(columns)
    }

    // =========================================================================
    // Task I/O
    // =========================================================================

    /// Read a task; NotFound if missing or soft-deleted
    pub async fn read_task(&self, id: &TaskId) -> Result<Task> {
        let task: Option<Task> = self.read_json(&self.task_path(id)).await?;
        match task {
            Some(t) if t.is_active_record() => Ok(t),
            _ => Err(KanbanError::TaskNotFound { id: id.to_string() }),
        }
    }

    /// Write a task file (atomic write via temp file)
    pub async fn write_task(&self, task: &Task) -> Result<()> {
        self.write_json(&self.task_path(&task.id), task).await
    }

    /// All active tasks, unordered
    pub async fn read_all_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        for stem in self.list_json_stems(&self.tasks_dir()).await? {
            let id = TaskId::from_string(stem);
            if let Some(task) = self.read_json::<Task>(&self.task_path(&id)).await? {
                if task.is_active_record() {
                    tasks.push(task);
                }
            }
        }
        Ok(tasks)
    }

    /// Active tasks of one column, sorted by position
    pub async fn read_column_tasks(&self, column_id: &ColumnId) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .read_all_tasks()
            .await?
            .into_iter()
            .filter(|t| &t.column_id == column_id)
            .collect();
        tasks.sort_by_key(|t| t.position);
        Ok(tasks)
    }

    /// Active tasks belonging to a sprint
    pub async fn read_sprint_tasks(&self, sprint_id: &SprintId) -> Result<Vec<Task>> {
        Ok(self
            .read_all_tasks()
            .await?
            .into_iter()
            .filter(|t| t.sprint_id.as_ref() == Some(sprint_id))
            .collect())
    }

    /// Active tasks across all boards of a project
    pub async fn read_project_tasks(&self, project_id: &ProjectId) -> Result<Vec<Task>> {
        let mut column_ids = Vec::new();
        for stem in self.list_json_stems(&self.boards_dir()).await? {
            let board_id = BoardId::from_string(stem);
            if let Some(board) = self.read_json::<Board>(&self.board_path(&board_id)).await? {
                if board.is_active_record() && &board.project_id == project_id {
                    for column in self.read_board_columns(&board.id).await? {
                        column_ids.push(column.id);
                    }
                }
            }
        }
        Ok(self
            .read_all_tasks()
            .await?
            .into_iter()
            .filter(|t| column_ids.contains(&t.column_id))
            .collect())
    }

    // =========================================================================
    // Sprint I/O
    // =========================================================================

    /// Read a sprint; NotFound if missing
    pub async fn read_sprint(&self, id: &SprintId) -> Result<Sprint> {
        let sprint: Option<Sprint> = self.read_json(&self.sprint_path(id)).await?;
        sprint.ok_or_else(|| KanbanError::SprintNotFound { id: id.to_string() })
    }

    /// Write a sprint file (atomic write via temp file)
    pub async fn write_sprint(&self, sprint: &Sprint) -> Result<()> {
        self.write_json(&self.sprint_path(&sprint.id), sprint).await
    }

    /// All sprints of a project, unordered
    pub async fn read_project_sprints(&self, project_id: &ProjectId) -> Result<Vec<Sprint>> {
        let mut sprints = Vec::new();
        for stem in self.list_json_stems(&self.sprints_dir()).await? {
            let id = SprintId::from_string(stem);
            if let Some(sprint) = self.read_json::<Sprint>(&self.sprint_path(&id)).await? {
                if &sprint.project_id == project_id {
                    sprints.push(sprint);
                }
            }
        }
        Ok(sprints)
    }

    /// Write a velocity record once; rejects overwrites to keep it immutable
    pub async fn write_velocity_record(&self, record: &VelocityRecord) -> Result<()> {
        let path = self.velocity_path(&record.sprint_id);
        if path.exists() {
            return Err(KanbanError::duplicate_id(
                "velocity record",
                record.sprint_id.to_string(),
            ));
        }
        self.write_json(&path, record).await
    }

    /// Velocity records of a project, sorted by completion time (oldest first)
    pub async fn read_velocity_records(&self, project_id: &ProjectId) -> Result<Vec<VelocityRecord>> {
        let mut records = Vec::new();
        for stem in self.list_json_stems(&self.velocity_dir()).await? {
            let id = SprintId::from_string(stem);
            if let Some(record) = self
                .read_json::<VelocityRecord>(&self.velocity_path(&id))
                .await?
            {
                if &record.project_id == project_id {
                    records.push(record);
                }
            }
        }
        records.sort_by_key(|r| r.completed_at);
        Ok(records)
    }

    // =========================================================================
    // Move events
    // =========================================================================

    /// Append a move event to the board's stream. Events are never rewritten.
    pub async fn append_move_event(&self, board_id: &BoardId, event: &TaskMoveEvent) -> Result<()> {
        append_jsonl(&self.events_path(board_id), event).await
    }

    /// All move events of a board, oldest first
    pub async fn read_move_events(&self, board_id: &BoardId) -> Result<Vec<TaskMoveEvent>> {
        let path = self.events_path(board_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).await?;
        Ok(content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }

    // =========================================================================
    // Audit logging
    // =========================================================================

    /// Append a log entry to the global audit log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        append_jsonl(&self.activity_path(), entry).await
    }

    /// Append a log entry to a task's audit log
    pub async fn append_task_log(&self, task_id: &TaskId, entry: &LogEntry) -> Result<()> {
        append_jsonl(&self.task_log_path(task_id), entry).await
    }

    /// Read audit log entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        entries.reverse();
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire the board's exclusive lock (non-blocking)
    pub async fn lock_board(&self, board_id: &BoardId) -> Result<BoardLock> {
        let lock_path = self.board_lock_path(board_id);
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(BoardLock {
                file,
                path: lock_path,
            }),
            Err(_) => Err(KanbanError::LockBusy),
        }
    }

    /// Acquire the board lock with bounded retries and linear backoff.
    /// Exhaustion surfaces as `LockTimeout` - a retryable Conflict.
    pub async fn lock_board_with_retry(&self, board_id: &BoardId) -> Result<BoardLock> {
        let start = std::time::Instant::now();
        for attempt in 1..=LOCK_RETRY_ATTEMPTS {
            match self.lock_board(board_id).await {
                Ok(lock) => return Ok(lock),
                Err(KanbanError::LockBusy) => {
                    tracing::debug!(board = %board_id, attempt, "board lock busy, backing off");
                    tokio::time::sleep(Duration::from_millis(
                        LOCK_RETRY_BACKOFF_MS * u64::from(attempt),
                    ))
                    .await;
                }
                Err(other) => return Err(other),
            }
        }
        Err(KanbanError::LockTimeout {
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// RAII lock guard - releases on drop
pub struct BoardLock {
    file: std::fs::File,
    #[allow(dead_code)]
    path: PathBuf,
}

impl Drop for BoardLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Write to temp file in same directory, rename is atomic on one filesystem
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Append one JSON object as a line to a JSONL file
async fn append_jsonl<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut line = serde_json::to_string(value)?;
    line.push('\n');

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".taskdeck"));
        ctx.create_directories().await.unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_paths() {
        let (temp, ctx) = setup().await;
        let root = temp.path().join(".taskdeck");

        assert_eq!(ctx.root(), root);
        assert_eq!(ctx.activity_path(), root.join("activity").join("current.jsonl"));
        let board = BoardId::from_string("b1");
        assert_eq!(ctx.events_path(&board), root.join("events").join("b1.jsonl"));
    }

    #[tokio::test]
    async fn test_project_io() {
        let (_temp, ctx) = setup().await;

        let project = Project::new("Test Project");
        ctx.write_project(&project).await.unwrap();

        let loaded = ctx.read_project(&project.id).await.unwrap();
        assert_eq!(loaded.name, "Test Project");

        let missing = ctx.read_project(&ProjectId::new()).await;
        assert!(matches!(missing, Err(KanbanError::ProjectNotFound { .. })));
    }

    #[tokio::test]
    async fn test_soft_deleted_entities_hidden() {
        let (_temp, ctx) = setup().await;

        let board = Board::new(ProjectId::new(), "B");
        let mut column = Column::new(board.id.clone(), "Todo", 0);
        ctx.write_board(&board).await.unwrap();
        ctx.write_column(&column).await.unwrap();

        let mut task = Task::new(column.id.clone(), "T", 0);
        ctx.write_task(&task).await.unwrap();
        assert_eq!(ctx.read_column_tasks(&column.id).await.unwrap().len(), 1);

        task.deleted_at = Some(chrono::Utc::now());
        ctx.write_task(&task).await.unwrap();
        assert!(matches!(
            ctx.read_task(&task.id).await,
            Err(KanbanError::TaskNotFound { .. })
        ));
        assert!(ctx.read_column_tasks(&column.id).await.unwrap().is_empty());

        column.deleted_at = Some(chrono::Utc::now());
        ctx.write_column(&column).await.unwrap();
        assert!(ctx.read_board_columns(&board.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_move_events_append_only() {
        let (_temp, ctx) = setup().await;
        let board = BoardId::new();

        for i in 0..3usize {
            let event = TaskMoveEvent::new(
                TaskId::new(),
                ColumnId::from_string("a"),
                i,
                ColumnId::from_string("b"),
                0,
                None,
            );
            ctx.append_move_event(&board, &event).await.unwrap();
        }

        let events = ctx.read_move_events(&board).await.unwrap();
        assert_eq!(events.len(), 3);
        // Oldest first
        assert_eq!(events[0].source_position, 0);
        assert_eq!(events[2].source_position, 2);
    }

    #[tokio::test]
    async fn test_velocity_record_immutable() {
        let (_temp, ctx) = setup().await;

        let record = VelocityRecord {
            sprint_id: SprintId::new(),
            project_id: ProjectId::new(),
            completed_points: 21,
            capacity_points: Some(30),
            completed_at: chrono::Utc::now(),
        };
        ctx.write_velocity_record(&record).await.unwrap();

        let again = ctx.write_velocity_record(&record).await;
        assert!(matches!(again, Err(KanbanError::DuplicateId { .. })));
    }

    #[tokio::test]
    async fn test_board_locking() {
        let (_temp, ctx) = setup().await;
        let board_a = BoardId::new();
        let board_b = BoardId::new();

        let lock_a = ctx.lock_board(&board_a).await.unwrap();

        // Same board: busy
        assert!(matches!(
            ctx.lock_board(&board_a).await,
            Err(KanbanError::LockBusy)
        ));

        // Different board: independent
        let _lock_b = ctx.lock_board(&board_b).await.unwrap();

        drop(lock_a);
        let _relock = ctx.lock_board(&board_a).await.unwrap();
    }

    #[tokio::test]
    async fn test_lock_retry_times_out() {
        let (_temp, ctx) = setup().await;
        let board = BoardId::new();

        let _held = ctx.lock_board(&board).await.unwrap();
        let result = ctx.lock_board_with_retry(&board).await;
        assert!(matches!(result, Err(KanbanError::LockTimeout { .. })));
    }
}
