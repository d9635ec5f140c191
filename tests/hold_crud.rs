use bloc_core::db::open_db_in_memory;
use bloc_core::{
    BoardId, BoardStore, HoldInput, HoldService, HoldStore, Point, SqliteBoardRepository,
    SqliteHoldRepository, StoreError,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

fn point(x: f64, y: f64) -> Point {
    Point { x, y }
}

fn triangle() -> Vec<Point> {
    vec![point(0.1, 0.1), point(0.5, 0.9), point(0.9, 0.1)]
}

fn create_board(conn: &Connection, name: &str) -> BoardId {
    let repo = SqliteBoardRepository::try_new(conn).unwrap();
    repo.create_board(name, b"image bytes").unwrap().id
}

fn hold_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM holds;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_and_get_roundtrip_preserves_vertices() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");
    let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();

    let created = repo
        .create_holds(board_id, &[HoldInput::new(triangle())])
        .unwrap();
    assert_eq!(created.len(), 1);
    assert!(created[0].created_at > 0);

    let loaded = repo.get_holds(board_id).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, created[0].id);
    assert_eq!(loaded[0].board_id, board_id);
    assert_eq!(loaded[0].vertices, triangle());
    assert_eq!(loaded[0].created_at, created[0].created_at);
}

#[test]
fn empty_hold_set_is_a_valid_state() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "bare board");
    let repo = SqliteHoldRepository::try_new(&mut conn).unwrap();

    assert!(repo.get_holds(board_id).unwrap().is_empty());
}

#[test]
fn invalid_geometry_blocks_create_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");

    {
        let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();
        let inputs = [
            HoldInput::new(triangle()),
            HoldInput::new(vec![point(0.1, 0.1), point(1.5, 0.2), point(0.3, -0.4)]),
        ];
        let err = repo.create_holds(board_id, &inputs).unwrap_err();
        match err {
            StoreError::Validation(err) => {
                assert_eq!(
                    err.field("holds[1].vertices[1].x"),
                    Some("vertex x must be between 0 and 1")
                );
                assert_eq!(
                    err.field("holds[1].vertices[2].y"),
                    Some("vertex y must be between 0 and 1")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(hold_count(&conn), 0);
}

#[test]
fn too_few_vertices_blocks_update_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");

    {
        let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();
        let err = repo
            .update_holds(board_id, &[HoldInput::new(vec![point(0.1, 0.1)])])
            .unwrap_err();
        match err {
            StoreError::Validation(err) => assert_eq!(
                err.field("holds[0].vertices"),
                Some("hold must have at least 3 vertices")
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(hold_count(&conn), 0);
}

#[test]
fn missing_board_fails_every_operation_with_board_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();
    let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();

    let create_err = repo
        .create_holds(missing, &[HoldInput::new(triangle())])
        .unwrap_err();
    assert!(matches!(create_err, StoreError::BoardNotFound(id) if id == missing));

    let get_err = repo.get_holds(missing).unwrap_err();
    assert!(matches!(get_err, StoreError::BoardNotFound(id) if id == missing));

    let update_err = repo
        .update_holds(missing, &[HoldInput::new(triangle())])
        .unwrap_err();
    assert!(matches!(update_err, StoreError::BoardNotFound(id) if id == missing));
}

#[test]
fn get_holds_orders_by_ascending_creation_time() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");

    let (first, second) = {
        let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();
        let first = repo
            .create_holds(board_id, &[HoldInput::new(triangle())])
            .unwrap()[0]
            .id;
        let second = repo
            .create_holds(board_id, &[HoldInput::new(triangle())])
            .unwrap()[0]
            .id;
        (first, second)
    };

    // Force distinct creation times; batch inserts can share a millisecond.
    conn.execute(
        "UPDATE holds SET created_at = 2000 WHERE id = ?1;",
        params![first.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE holds SET created_at = 1000 WHERE id = ?1;",
        params![second.to_string()],
    )
    .unwrap();

    let repo = SqliteHoldRepository::try_new(&mut conn).unwrap();
    let holds = repo.get_holds(board_id).unwrap();
    assert_eq!(holds.len(), 2);
    assert_eq!(holds[0].id, second);
    assert_eq!(holds[1].id, first);
}

#[test]
fn update_is_additive_upsert_and_never_deletes() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");
    let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();

    let created = repo
        .create_holds(
            board_id,
            &[HoldInput::new(triangle()), HoldInput::new(triangle())],
        )
        .unwrap();
    let kept = created[0].id;
    let reshaped = created[1].id;

    let new_shape = vec![point(0.2, 0.2), point(0.4, 0.6), point(0.6, 0.2)];
    let applied = repo
        .update_holds(
            board_id,
            &[
                HoldInput::existing(reshaped, new_shape.clone()),
                HoldInput::new(triangle()),
            ],
        )
        .unwrap();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].id, reshaped);

    // The hold absent from the update input is still there.
    let holds = repo.get_holds(board_id).unwrap();
    assert_eq!(holds.len(), 3);
    assert!(holds.iter().any(|hold| hold.id == kept));
    let updated = holds.iter().find(|hold| hold.id == reshaped).unwrap();
    assert_eq!(updated.vertices, new_shape);
}

#[test]
fn update_with_unknown_id_rolls_back_the_whole_batch() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");
    let missing = Uuid::new_v4();

    {
        let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();
        let err = repo
            .update_holds(
                board_id,
                &[
                    HoldInput::new(triangle()),
                    HoldInput::existing(missing, triangle()),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::HoldNotFound(id) if id == missing));
    }

    // The first input was inserted inside the transaction and must not
    // survive the rollback.
    assert_eq!(hold_count(&conn), 0);
}

#[test]
fn update_cannot_reach_another_boards_hold() {
    let mut conn = open_db_in_memory().unwrap();
    let board_a = create_board(&conn, "board a");
    let board_b = create_board(&conn, "board b");
    let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();

    let foreign = repo
        .create_holds(board_a, &[HoldInput::new(triangle())])
        .unwrap()[0]
        .id;

    let err = repo
        .update_holds(board_b, &[HoldInput::existing(foreign, triangle())])
        .unwrap_err();
    assert!(matches!(err, StoreError::HoldNotFound(id) if id == foreign));
}

#[test]
fn delete_hold_succeeds_and_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");
    let mut repo = SqliteHoldRepository::try_new(&mut conn).unwrap();

    let id = repo
        .create_holds(board_id, &[HoldInput::new(triangle())])
        .unwrap()[0]
        .id;

    repo.delete_hold(id).unwrap();
    assert!(repo.get_holds(board_id).unwrap().is_empty());

    // Deleting an id that no longer exists is a no-op, not an error.
    repo.delete_hold(id).unwrap();
    repo.delete_hold(Uuid::new_v4()).unwrap();
}

#[test]
fn service_wraps_store_calls() {
    let mut conn = open_db_in_memory().unwrap();
    let board_id = create_board(&conn, "woody");
    let repo = SqliteHoldRepository::try_new(&mut conn).unwrap();
    let mut service = HoldService::new(repo);

    let created = service
        .create_holds(board_id, &[HoldInput::new(triangle())])
        .unwrap();
    assert_eq!(service.get_holds(board_id).unwrap().len(), 1);
    service.delete_hold(created[0].id).unwrap();
    assert!(service.get_holds(board_id).unwrap().is_empty());
}
