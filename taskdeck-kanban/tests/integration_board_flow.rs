//! Integration tests for board ordering invariants

use std::sync::Arc;

use taskdeck_kanban::{
    board::{CreateBoard, GetBoard},
    column::{CreateColumn, DeleteColumn, ReorderColumns},
    project::CreateProject,
    task::{AddTask, DeleteTask, MoveTask},
    types::{BoardId, ColumnId, TaskId},
    Execute, KanbanContext,
};
use tempfile::TempDir;

struct Board {
    _temp: TempDir,
    ctx: KanbanContext,
    board_id: BoardId,
    columns: Vec<ColumnId>,
}

async fn setup_board(column_names: &[&str]) -> Board {
    let temp = TempDir::new().unwrap();
    let ctx = KanbanContext::new(temp.path().join(".taskdeck"));

    let project = CreateProject::new("Website")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    let board = CreateBoard::new(project["id"].as_str().unwrap(), "Main")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    let board_id = BoardId::from_string(board["id"].as_str().unwrap());

    let mut columns = Vec::new();
    for name in column_names {
        let column = CreateColumn::new(board_id.clone(), *name)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        columns.push(ColumnId::from_string(column["id"].as_str().unwrap()));
    }
    Board {
        _temp: temp,
        ctx,
        board_id,
        columns,
    }
}

async fn add_task(ctx: &KanbanContext, column: &ColumnId, title: &str) -> TaskId {
    let task = AddTask::new(column.clone(), title)
        .execute(ctx)
        .await
        .into_result()
        .unwrap();
    TaskId::from_string(task["id"].as_str().unwrap())
}

async fn assert_dense(ctx: &KanbanContext, column: &ColumnId) {
    let tasks = ctx.read_column_tasks(column).await.unwrap();
    let positions: Vec<_> = tasks.iter().map(|t| t.position).collect();
    let expected: Vec<_> = (0..tasks.len()).collect();
    assert_eq!(positions, expected, "column positions must be dense from 0");
}

#[tokio::test]
async fn test_backlog_todo_done_scenario() {
    let board = setup_board(&["Backlog", "Todo", "Done"]).await;
    let todo = &board.columns[1];
    let done = &board.columns[2];

    let x = add_task(&board.ctx, todo, "X").await;
    let _y = add_task(&board.ctx, todo, "Y").await;

    MoveTask::new(x.clone(), done.clone(), 0)
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();

    let todo_tasks = board.ctx.read_column_tasks(todo).await.unwrap();
    assert_eq!(todo_tasks.len(), 1);
    assert_eq!(todo_tasks[0].title, "Y");
    assert_eq!(todo_tasks[0].position, 0);

    let done_tasks = board.ctx.read_column_tasks(done).await.unwrap();
    assert_eq!(done_tasks.len(), 1);
    assert_eq!(done_tasks[0].title, "X");
    assert_eq!(done_tasks[0].position, 0);
}

#[tokio::test]
async fn test_density_survives_mixed_sequences() {
    let board = setup_board(&["Backlog", "Todo", "Done"]).await;
    let [backlog, todo, done] = [&board.columns[0], &board.columns[1], &board.columns[2]];

    let mut ids = Vec::new();
    for i in 0..6 {
        ids.push(add_task(&board.ctx, backlog, &format!("t{i}")).await);
    }

    // Interleave moves, deletes, and reorders
    MoveTask::new(ids[0].clone(), todo.clone(), 0)
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();
    MoveTask::new(ids[3].clone(), todo.clone(), 1)
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();
    DeleteTask::new(ids[1].clone())
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();
    MoveTask::new(ids[5].clone(), done.clone(), 99)
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();
    MoveTask::new(ids[0].clone(), todo.clone(), 1)
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();
    DeleteTask::new(ids[4].clone())
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();

    for column in [backlog, todo, done] {
        assert_dense(&board.ctx, column).await;
    }
}

#[tokio::test]
async fn test_column_migration_preserves_relative_order() {
    let board = setup_board(&["Todo", "Doing", "Done"]).await;
    let doing = &board.columns[1];
    let done = &board.columns[2];

    add_task(&board.ctx, done, "existing").await;
    add_task(&board.ctx, doing, "first").await;
    add_task(&board.ctx, doing, "second").await;

    DeleteColumn::new(doing.clone())
        .with_migration(done.clone())
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();

    let done_tasks = board.ctx.read_column_tasks(done).await.unwrap();
    let view: Vec<_> = done_tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(view, vec!["existing", "first", "second"]);
    assert_dense(&board.ctx, done).await;

    // Surviving columns renumbered densely
    let columns = board.ctx.read_board_columns(&board.board_id).await.unwrap();
    let positions: Vec<_> = columns.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[tokio::test]
async fn test_reorder_then_view() {
    let board = setup_board(&["A", "B", "C"]).await;

    ReorderColumns::new(
        board.board_id.clone(),
        vec![
            board.columns[2].clone(),
            board.columns[0].clone(),
            board.columns[1].clone(),
        ],
    )
    .execute(&board.ctx)
    .await
    .into_result()
    .unwrap();

    let view = GetBoard::new(board.board_id.clone())
        .execute(&board.ctx)
        .await
        .into_result()
        .unwrap();
    let names: Vec<_> = view["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_concurrent_moves_stay_dense() {
    let board = setup_board(&["Todo", "Done"]).await;
    let todo = &board.columns[0];
    let done = &board.columns[1];

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(add_task(&board.ctx, todo, &format!("t{i}")).await);
    }

    let ctx = Arc::new(board.ctx);
    let mut handles = Vec::new();
    for id in ids {
        let ctx = Arc::clone(&ctx);
        let done = done.clone();
        handles.push(tokio::spawn(async move {
            MoveTask::new(id, done, 0).execute(&ctx).await.into_result()
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_dense(&ctx, todo).await;
    assert_dense(&ctx, done).await;
    assert_eq!(ctx.read_column_tasks(done).await.unwrap().len(), 4);
    assert_eq!(ctx.read_move_events(&board.board_id).await.unwrap().len(), 4);
}
