use anyhow::Result;
use chrono::NaiveDate;
use housekeeping_bot::database::{connection::DatabaseManager, models::*};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn new_room(room_no: i64, staff: &str, cleaning_type: CleaningType) -> NewRoom {
    NewRoom {
        room_no,
        staff_name: Some(staff.to_string()),
        staff_user_id: None,
        cleaning_type,
    }
}

#[tokio::test]
async fn test_replace_day_stores_rooms_not_done() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let stored = RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[
            new_room(101, "Sevara", CleaningType::Full),
            new_room(102, "Gulnoz", CleaningType::Routine),
        ],
        "@admin",
    )
    .await?;
    assert_eq!(stored, 2);

    let rooms = RoomAssignment::find_by_date(&db.pool, day(17)).await?;
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].room_no, 101);
    assert_eq!(rooms[0].cleaning_type, CleaningType::Full);
    assert_eq!(rooms[1].cleaning_type, CleaningType::Routine);
    assert!(rooms.iter().all(|r| r.status == RoomStatus::NotDone));
    assert!(rooms.iter().all(|r| r.updated_by.as_deref() == Some("@admin")));
    assert!(rooms.iter().all(|r| !r.updated_at.is_empty()));

    Ok(())
}

#[tokio::test]
async fn test_replace_day_drops_previous_plan() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let first: Vec<NewRoom> = (101..=105)
        .map(|n| new_room(n, "Sevara", CleaningType::Routine))
        .collect();
    let second: Vec<NewRoom> = (201..=203)
        .map(|n| new_room(n, "Gulnoz", CleaningType::Full))
        .collect();

    RoomAssignment::replace_day(&db.pool, day(17), &first, "admin").await?;
    let stored = RoomAssignment::replace_day(&db.pool, day(17), &second, "admin").await?;
    assert_eq!(stored, 3);

    let rooms = RoomAssignment::find_by_date(&db.pool, day(17)).await?;
    let numbers: Vec<i64> = rooms.iter().map(|r| r.room_no).collect();
    assert_eq!(numbers, vec![201, 202, 203]);

    Ok(())
}

#[tokio::test]
async fn test_replace_day_leaves_other_dates_alone() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    RoomAssignment::replace_day(&db.pool, day(16), &[new_room(101, "A", CleaningType::Full)], "admin").await?;
    RoomAssignment::replace_day(&db.pool, day(17), &[new_room(202, "B", CleaningType::Full)], "admin").await?;

    assert_eq!(RoomAssignment::find_by_date(&db.pool, day(16)).await?.len(), 1);
    assert_eq!(RoomAssignment::find_by_date(&db.pool, day(17)).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_replace_day_is_atomic() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[new_room(101, "Sevara", CleaningType::Full)],
        "admin",
    )
    .await?;

    // A negative room number violates the CHECK constraint mid-transaction.
    let result = RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[
            new_room(301, "Gulnoz", CleaningType::Routine),
            new_room(-1, "Broken", CleaningType::Routine),
        ],
        "admin",
    )
    .await;
    assert!(result.is_err());

    let rooms = RoomAssignment::find_by_date(&db.pool, day(17)).await?;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_no, 101);

    Ok(())
}

#[tokio::test]
async fn test_replace_day_duplicate_room_last_row_wins() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let stored = RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[
            new_room(101, "Sevara", CleaningType::Routine),
            new_room(101, "Gulnoz", CleaningType::Full),
        ],
        "admin",
    )
    .await?;
    assert_eq!(stored, 1);

    let rooms = RoomAssignment::find_by_date(&db.pool, day(17)).await?;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].staff_name.as_deref(), Some("Gulnoz"));
    assert_eq!(rooms[0].cleaning_type, CleaningType::Full);

    Ok(())
}

#[tokio::test]
async fn test_set_status_and_stats() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[
            new_room(101, "Sevara", CleaningType::Full),
            new_room(102, "Sevara", CleaningType::Full),
            new_room(103, "Gulnoz", CleaningType::Routine),
        ],
        "admin",
    )
    .await?;
    let rooms = RoomAssignment::find_by_date(&db.pool, day(17)).await?;

    assert!(RoomAssignment::set_status(&db.pool, rooms[0].id, RoomStatus::Done, "@sevara").await?);
    assert!(RoomAssignment::set_status(&db.pool, rooms[2].id, RoomStatus::Done, "@gulnoz").await?);

    let stats = DailyStats::for_date(&db.pool, day(17)).await?;
    assert_eq!(
        stats,
        DailyStats {
            total: 3,
            done: 2,
            remaining: 1,
            full_total: 2,
            full_done: 1,
        }
    );
    assert_eq!(stats.done + stats.remaining, stats.total);

    let from_rows = DailyStats::from_rooms(&RoomAssignment::find_by_date(&db.pool, day(17)).await?);
    assert_eq!(from_rows, stats);

    let updated = RoomAssignment::find_by_id(&db.pool, rooms[0].id).await?.unwrap();
    assert_eq!(updated.status, RoomStatus::Done);
    assert_eq!(updated.updated_by.as_deref(), Some("@sevara"));

    Ok(())
}

#[tokio::test]
async fn test_stats_for_empty_date() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let stats = DailyStats::for_date(&db.pool, day(1)).await?;
    assert_eq!(stats, DailyStats::default());
    assert_eq!(stats.done_percent(), 0);

    Ok(())
}

#[tokio::test]
async fn test_set_status_unknown_room() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert!(!RoomAssignment::set_status(&db.pool, 9999, RoomStatus::Done, "x").await?);
    assert!(RoomAssignment::toggle_cleaning_type(&db.pool, 9999, "x").await?.is_none());
    assert!(!RoomAssignment::set_comment(&db.pool, 9999, "hi", "x").await?);

    Ok(())
}

#[tokio::test]
async fn test_toggle_cleaning_type_twice_restores() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(&db.pool, day(17), &[new_room(101, "Sevara", CleaningType::Routine)], "admin").await?;
    let id = RoomAssignment::find_by_date(&db.pool, day(17)).await?[0].id;

    assert_eq!(
        RoomAssignment::toggle_cleaning_type(&db.pool, id, "@sevara").await?,
        Some(CleaningType::Full)
    );
    assert_eq!(
        RoomAssignment::toggle_cleaning_type(&db.pool, id, "@sevara").await?,
        Some(CleaningType::Routine)
    );

    let room = RoomAssignment::find_by_id(&db.pool, id).await?.unwrap();
    assert_eq!(room.cleaning_type, CleaningType::Routine);
    assert_eq!(room.updated_by.as_deref(), Some("@sevara"));

    Ok(())
}

#[tokio::test]
async fn test_database_uses_wal_journal() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let mode: String = sqlx::query_scalar("PRAGMA journal_mode").fetch_one(&db.pool).await?;
    assert_eq!(mode.to_lowercase(), "wal");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_toggles_all_succeed() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(&db.pool, day(17), &[new_room(101, "Sevara", CleaningType::Routine)], "admin").await?;
    let id = RoomAssignment::find_by_date(&db.pool, day(17)).await?[0].id;

    for round in 0..20 {
        let tasks: Vec<_> = (0..4)
            .map(|maid| {
                let pool = db.pool.clone();
                tokio::spawn(async move {
                    RoomAssignment::toggle_cleaning_type(&pool, id, &format!("maid {maid}")).await
                })
            })
            .collect();

        for task in tasks {
            let toggled = task.await?;
            assert!(toggled.is_ok(), "round {round}: {toggled:?}");
        }
    }

    // 80 flips in total, so the room is back where it started.
    let room = RoomAssignment::find_by_id(&db.pool, id).await?.unwrap();
    assert_eq!(room.cleaning_type, CleaningType::Routine);

    Ok(())
}

#[tokio::test]
async fn test_set_comment() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(&db.pool, day(17), &[new_room(101, "Sevara", CleaningType::Routine)], "admin").await?;
    let id = RoomAssignment::find_by_date(&db.pool, day(17)).await?[0].id;

    assert!(RoomAssignment::set_comment(&db.pool, id, "нет полотенец", "@sevara").await?);

    let room = RoomAssignment::find_by_id(&db.pool, id).await?.unwrap();
    assert_eq!(room.comment.as_deref(), Some("нет полотенец"));

    Ok(())
}

#[tokio::test]
async fn test_find_for_staff_prefers_linked_id() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[
            NewRoom {
                room_no: 101,
                staff_name: Some("Sevara".to_string()),
                staff_user_id: Some(555),
                cleaning_type: CleaningType::Full,
            },
            new_room(102, "sevara", CleaningType::Routine),
            new_room(103, "Gulnoz", CleaningType::Routine),
        ],
        "admin",
    )
    .await?;

    let linked = RoomAssignment::find_for_staff(&db.pool, day(17), Some(555), Some("Sevara")).await?;
    assert_eq!(linked.iter().map(|r| r.room_no).collect::<Vec<_>>(), vec![101]);

    let by_name = RoomAssignment::find_for_staff(&db.pool, day(17), Some(777), Some(" SEVARA ")).await?;
    assert_eq!(by_name.iter().map(|r| r.room_no).collect::<Vec<_>>(), vec![101, 102]);

    let nobody = RoomAssignment::find_for_staff(&db.pool, day(17), Some(777), None).await?;
    assert!(nobody.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_day() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[new_room(101, "A", CleaningType::Full), new_room(102, "B", CleaningType::Full)],
        "admin",
    )
    .await?;

    assert_eq!(RoomAssignment::delete_day(&db.pool, day(17)).await?, 2);
    assert!(RoomAssignment::find_by_date(&db.pool, day(17)).await?.is_empty());
    assert_eq!(RoomAssignment::delete_day(&db.pool, day(17)).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_carry_over_copies_only_unfinished_rooms() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    RoomAssignment::replace_day(
        &db.pool,
        day(17),
        &[
            new_room(101, "Sevara", CleaningType::Full),
            new_room(102, "Sevara", CleaningType::Routine),
            new_room(103, "Gulnoz", CleaningType::Routine),
        ],
        "admin",
    )
    .await?;
    let rooms = RoomAssignment::find_by_date(&db.pool, day(17)).await?;
    RoomAssignment::set_status(&db.pool, rooms[0].id, RoomStatus::Done, "@sevara").await?;
    RoomAssignment::set_comment(&db.pool, rooms[1].id, "гость просил позже", "@sevara").await?;

    // Room 103 is already planned for the next day and must not be duplicated.
    RoomAssignment::replace_day(&db.pool, day(18), &[new_room(103, "Dilnoza", CleaningType::Full)], "admin").await?;

    let copied = RoomAssignment::carry_over(&db.pool, day(17), day(18), "system").await?;
    assert_eq!(copied, 1);

    let next_day = RoomAssignment::find_by_date(&db.pool, day(18)).await?;
    assert_eq!(next_day.len(), 2);
    let carried = next_day.iter().find(|r| r.room_no == 102).unwrap();
    assert_eq!(carried.status, RoomStatus::NotDone);
    assert_eq!(carried.staff_name.as_deref(), Some("Sevara"));
    assert_eq!(carried.comment.as_deref(), Some("гость просил позже"));
    assert_eq!(carried.updated_by.as_deref(), Some("system"));
    let kept = next_day.iter().find(|r| r.room_no == 103).unwrap();
    assert_eq!(kept.staff_name.as_deref(), Some("Dilnoza"));

    // Running it again copies nothing new.
    assert_eq!(RoomAssignment::carry_over(&db.pool, day(17), day(18), "system").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_user_upsert_and_roles() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let user = User::upsert(&db.pool, 42, Some("Sevara"), None).await?;
    assert_eq!(user.name.as_deref(), Some("Sevara"));
    assert_eq!(user.role(), Role::Unspecified);

    // Missing fields keep what was stored.
    let user = User::upsert(&db.pool, 42, None, Some(Role::Staff)).await?;
    assert_eq!(user.name.as_deref(), Some("Sevara"));
    assert_eq!(user.role(), Role::Staff);

    let user = User::upsert(&db.pool, 42, Some("  Севара "), None).await?;
    assert_eq!(user.name.as_deref(), Some("Севара"));
    assert_eq!(user.role(), Role::Staff);
    assert!(user.matches_name("севара"));

    User::upsert(&db.pool, 43, None, None).await?;
    let named = User::find_named(&db.pool).await?;
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].tg_id, 42);

    assert!(User::find(&db.pool, 99).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_settings_round_trip() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert_eq!(Setting::get(&db.pool, TIMEZONE_KEY).await?, None);
    Setting::set(&db.pool, TIMEZONE_KEY, "Europe/Moscow").await?;
    Setting::set(&db.pool, TIMEZONE_KEY, "Asia/Tashkent").await?;
    assert_eq!(
        Setting::get(&db.pool, TIMEZONE_KEY).await?.as_deref(),
        Some("Asia/Tashkent")
    );

    Ok(())
}
