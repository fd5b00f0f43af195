//! JSON round trips of the persisted records.

#![cfg(feature = "serde")]

use u_timetable::fairness::FairnessSnapshot;
use u_timetable::model::{ClassSpec, Gene, Room};
use u_timetable::store::{ExistingSession, ScheduleStatus, StoredSchedule};

#[test]
fn test_stored_schedule_json() {
    let stored = StoredSchedule {
        id: 3,
        fitness: 1520.5,
        hard_violations: 0,
        soft_score: 140,
        fairness: FairnessSnapshot {
            workload: 0.12,
            room_usage: 0.2,
            ac_access: 0.05,
        },
        notes: "best of 3 trials, 17 generations".to_string(),
        status: ScheduleStatus::Approved,
        sessions: vec![Gene::new(1, 4, 322, 2, 8, 11).unwrap()],
    };

    let json = serde_json::to_string(&stored).unwrap();
    let back: StoredSchedule = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stored);
}

#[test]
fn test_reference_data_json() {
    let room: Room = serde_json::from_str(r#"{"id":322,"code":"322","has_ac":true,"capacity":40}"#).unwrap();
    assert_eq!(room, Room::new(322, "322", true));

    let session = ExistingSession::new(1, "Ethics", 1, 8, 10, "101").with_needs_ac(true);
    let value = serde_json::to_value(&session).unwrap();
    assert_eq!(value["needs_ac"], true);
    assert_eq!(value["room"], "101");

    let spec = ClassSpec::pinned(7, "Ethics", 1, 1, 8, 10).unwrap();
    let value = serde_json::to_value(&spec).unwrap();
    assert_eq!(value["pinned"]["end_hour"], 10);
    assert_eq!(value["duration"], 2);
}
