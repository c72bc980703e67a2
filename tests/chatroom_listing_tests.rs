mod utils;

use chatrooms::chatroom::types::ListRoomsParams;
use chatrooms::{AppError, RoomLookup};
use utils::{at_minute, AppSeed, Fixture, RoomSeed};

fn page_for(uid: i64, page: i64, page_size: i64) -> ListRoomsParams {
    ListRoomsParams {
        page,
        page_size,
        uid,
        name: String::new(),
    }
}

// ============================================================================
// Paginated listing
// ============================================================================

#[tokio::test]
async fn test_room_with_empty_slot_hydrates_single_agent() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture
        .add_app(AppSeed {
            id: 2,
            name: "Analyst",
            mode: 1,
            ..AppSeed::default()
        })
        .await;
    fixture.add_room(RoomSeed::default()).await;
    fixture.add_agent(5, 2, "Summarise the thread").await;
    fixture.link_agent(2, 10, 5).await;
    fixture.link_agent(1, 10, 0).await;

    let result = fixture
        .service()
        .list_rooms(page_for(3, 1, 10))
        .await
        .unwrap();

    assert_eq!(result.total_count, 1);
    assert_eq!(result.list.len(), 1);
    let room = &result.list[0];
    assert_eq!(room.chatroom_id, 10);
    assert_eq!(room.agent_list.len(), 1);
    assert_eq!(room.agent_list[0].agent_id, 5);
    assert_eq!(room.agent_list[0].app_id, 2);
    assert_eq!(room.agent_list[0].name, "Analyst");
    assert_eq!(room.agent_list[0].obligations, "Summarise the thread");
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_but_counted() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_rooms(10, 5, 3).await;

    let result = fixture
        .service()
        .list_rooms(page_for(3, 2, 10))
        .await
        .unwrap();

    assert!(result.list.is_empty());
    assert_eq!(result.total_count, 5);
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.page, 2);
    assert_eq!(result.page_size, 10);
}

#[tokio::test]
async fn test_no_rooms_yields_zero_pages() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;

    let result = fixture
        .service()
        .list_rooms(page_for(3, 1, 10))
        .await
        .unwrap();

    assert_eq!(result.total_count, 0);
    assert_eq!(result.total_pages, 0);
    assert!(result.list.is_empty());
}

#[tokio::test]
async fn test_pages_are_ordered_by_descending_room_id() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_rooms(100, 7, 3).await;

    let service = fixture.service();
    let first = service.list_rooms(page_for(3, 1, 3)).await.unwrap();
    let second = service.list_rooms(page_for(3, 2, 3)).await.unwrap();
    let third = service.list_rooms(page_for(3, 3, 3)).await.unwrap();

    let ids = |page: &chatrooms::PaginatedResult<chatrooms::RoomSummary>| -> Vec<i64> {
        page.list.iter().map(|r| r.chatroom_id).collect()
    };
    assert_eq!(ids(&first), vec![106, 105, 104]);
    assert_eq!(ids(&second), vec![103, 102, 101]);
    assert_eq!(ids(&third), vec![100]);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_count, 7);
}

#[tokio::test]
async fn test_agent_list_follows_descending_link_id() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_room(RoomSeed::default()).await;
    for agent_id in [21, 22, 23] {
        fixture.add_agent(agent_id, 1, "Participate").await;
    }
    fixture.link_agent(7, 10, 22).await;
    fixture.link_agent(9, 10, 21).await;
    fixture.link_agent(8, 10, 23).await;

    let result = fixture
        .service()
        .list_rooms(page_for(3, 1, 10))
        .await
        .unwrap();

    let agent_ids: Vec<i64> = result.list[0]
        .agent_list
        .iter()
        .map(|a| a.agent_id)
        .collect();
    assert_eq!(agent_ids, vec![21, 23, 22]);
}

#[tokio::test]
async fn test_rooms_of_inactive_or_non_chatroom_apps_are_hidden() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture
        .add_app(AppSeed {
            id: 2,
            name: "Workflow",
            mode: 3,
            ..AppSeed::default()
        })
        .await;
    fixture
        .add_app(AppSeed {
            id: 4,
            name: "Archived",
            status: 0,
            ..AppSeed::default()
        })
        .await;
    fixture.add_room(RoomSeed::default()).await;
    fixture
        .add_room(RoomSeed {
            id: 11,
            app_id: 2,
            ..RoomSeed::default()
        })
        .await;
    fixture
        .add_room(RoomSeed {
            id: 12,
            app_id: 4,
            ..RoomSeed::default()
        })
        .await;
    fixture
        .add_room(RoomSeed {
            id: 13,
            status: 0,
            ..RoomSeed::default()
        })
        .await;
    fixture
        .add_room(RoomSeed {
            id: 14,
            app_id: 99,
            ..RoomSeed::default()
        })
        .await;

    let result = fixture
        .service()
        .list_rooms(page_for(3, 1, 10))
        .await
        .unwrap();

    assert_eq!(result.total_count, 1);
    assert_eq!(result.list.len(), 1);
    assert_eq!(result.list[0].chatroom_id, 10);
}

#[tokio::test]
async fn test_rooms_of_other_users_are_not_listed() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_rooms(10, 2, 3).await;
    fixture.add_rooms(20, 4, 8).await;

    let result = fixture
        .service()
        .list_rooms(page_for(8, 1, 10))
        .await
        .unwrap();

    assert_eq!(result.total_count, 4);
    assert!(result.list.iter().all(|r| r.chatroom_id >= 20));
}

#[tokio::test]
async fn test_name_filter_matches_substring_case_insensitively() {
    let fixture = Fixture::new();
    fixture
        .add_app(AppSeed {
            id: 1,
            name: "Morning Standup",
            ..AppSeed::default()
        })
        .await;
    fixture
        .add_app(AppSeed {
            id: 2,
            name: "Design Review",
            ..AppSeed::default()
        })
        .await;
    fixture.add_room(RoomSeed::default()).await;
    fixture
        .add_room(RoomSeed {
            id: 11,
            app_id: 2,
            ..RoomSeed::default()
        })
        .await;

    let result = fixture
        .service()
        .list_rooms(ListRoomsParams {
            name: "standup".to_string(),
            ..page_for(3, 1, 10)
        })
        .await
        .unwrap();

    assert_eq!(result.total_count, 1);
    assert_eq!(result.list[0].name, "Morning Standup");
}

#[tokio::test]
async fn test_name_filter_wildcards_are_literal() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_room(RoomSeed::default()).await;

    let result = fixture
        .service()
        .list_rooms(ListRoomsParams {
            name: "%".to_string(),
            ..page_for(3, 1, 10)
        })
        .await
        .unwrap();

    assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn test_list_rooms_surfaces_database_failure() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_room(RoomSeed::default()).await;
    fixture.db.set_unavailable(true);

    let result = fixture.service().list_rooms(page_for(3, 1, 10)).await;
    assert!(matches!(result, Err(AppError::DatabaseError(_))));
}

// ============================================================================
// Room lookup
// ============================================================================

#[tokio::test]
async fn test_room_of_another_user_is_not_found() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_room(RoomSeed::default()).await;

    let service = fixture.service();
    assert!(matches!(
        service.get_room(10, 3).await.unwrap(),
        RoomLookup::Found(_)
    ));
    assert_eq!(service.get_room(10, 4).await.unwrap(), RoomLookup::NotFound);
}

#[tokio::test]
async fn test_inactive_room_is_not_found() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture
        .add_room(RoomSeed {
            status: 0,
            ..RoomSeed::default()
        })
        .await;

    let lookup = fixture.service().get_room(10, 3).await.unwrap();
    assert_eq!(lookup, RoomLookup::NotFound);
}

// ============================================================================
// Recent-activity listing
// ============================================================================

#[tokio::test]
async fn test_recent_rooms_exclude_current_and_cap_at_five() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_rooms(1, 8, 3).await;
    for room_id in 1..=8 {
        // room 8 ran last, room 1 first
        fixture.add_run(room_id, at_minute(room_id)).await;
        fixture.add_run(room_id, at_minute(room_id - 20)).await;
    }

    let recent = fixture.service().list_recent_rooms(7, 3).await.unwrap();

    let ids: Vec<i64> = recent.list.iter().map(|r| r.chatroom_id).collect();
    assert_eq!(ids, vec![8, 6, 5, 4, 3]);
    assert_eq!(recent.list[0].last_run_time, Some(at_minute(8)));
}

#[tokio::test]
async fn test_recent_rooms_require_run_history() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_rooms(1, 3, 3).await;
    fixture.add_run(2, at_minute(0)).await;

    let recent = fixture.service().list_recent_rooms(0, 3).await.unwrap();
    assert_eq!(recent.list.len(), 1);
    assert_eq!(recent.list[0].chatroom_id, 2);
}

#[tokio::test]
async fn test_recent_rooms_only_include_visible_rooms_of_user() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture
        .add_app(AppSeed {
            id: 2,
            mode: 1,
            ..AppSeed::default()
        })
        .await;
    fixture.add_room(RoomSeed::default()).await;
    fixture
        .add_room(RoomSeed {
            id: 11,
            app_id: 2,
            ..RoomSeed::default()
        })
        .await;
    fixture
        .add_room(RoomSeed {
            id: 12,
            user_id: 9,
            ..RoomSeed::default()
        })
        .await;
    for room_id in [10, 11, 12] {
        fixture.add_run(room_id, at_minute(room_id)).await;
    }

    let recent = fixture.service().list_recent_rooms(0, 3).await.unwrap();
    let ids: Vec<i64> = recent.list.iter().map(|r| r.chatroom_id).collect();
    assert_eq!(ids, vec![10]);
}

#[tokio::test]
async fn test_recent_rooms_share_hydration_with_listing() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_room(RoomSeed::default()).await;
    fixture.add_agent(5, 1, "Moderate").await;
    fixture.add_agent(6, 1, "Take notes").await;
    fixture.link_agent(1, 10, 5).await;
    fixture.link_agent(2, 10, 0).await;
    fixture.link_agent(3, 10, 6).await;
    fixture.add_run(10, at_minute(1)).await;

    let service = fixture.service();
    let recent = service.list_recent_rooms(0, 3).await.unwrap();
    let listed = service.list_rooms(page_for(3, 1, 10)).await.unwrap();

    assert_eq!(recent.list[0].agent_list, listed.list[0].agent_list);
    let agent_ids: Vec<i64> = recent.list[0]
        .agent_list
        .iter()
        .map(|a| a.agent_id)
        .collect();
    assert_eq!(agent_ids, vec![6, 5]);
}

#[tokio::test]
async fn test_recent_rooms_surface_connectivity_errors() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_room(RoomSeed::default()).await;
    fixture.add_run(10, at_minute(0)).await;
    fixture.db.set_unavailable(true);

    let result = fixture.service().list_recent_rooms(0, 3).await;
    assert!(matches!(result, Err(AppError::DatabaseError(_))));
}

// ============================================================================
// Existence check
// ============================================================================

#[tokio::test]
async fn test_agent_existence() {
    let fixture = Fixture::new();
    fixture.add_agent(5, 1, "Anything").await;

    let service = fixture.service();
    assert!(service.agent_exists(5).await.unwrap());
    assert!(!service.agent_exists(0).await.unwrap());
    assert!(!service.agent_exists(6).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_requests_share_one_database() {
    let fixture = Fixture::new();
    fixture.add_app(AppSeed::default()).await;
    fixture.add_rooms(10, 3, 3).await;
    fixture.add_rooms(20, 2, 4).await;

    let db = fixture.db.clone();
    let handles = [3, 4, 3, 4]
        .into_iter()
        .map(|uid| {
            let service = chatrooms::ChatroomService::new(db.clone());
            tokio::spawn(async move { service.list_rooms(page_for(uid, 1, 10)).await })
        })
        .collect::<Vec<_>>();

    let results = futures::future::join_all(handles).await;
    let counts: Vec<i64> = results
        .into_iter()
        .map(|r| r.unwrap().unwrap().total_count)
        .collect();
    assert_eq!(counts, vec![3, 2, 3, 2]);
}
