use std::error::Error as _;

use rides_lib::test_utils::{new_ride, ride_fixtures, seed_rides, FailOn, FaultyStore, FAULT_DETAIL};
use rides_lib::{
    normalize_page_query, ErrorKind, PageQuery, RideError, RideId, RideService, SqliteRideStore,
};

fn empty_service() -> RideService<SqliteRideStore> {
    RideService::new(SqliteRideStore::open_in_memory().expect("open in-memory store"))
}

fn seeded_service() -> RideService<SqliteRideStore> {
    let service = empty_service();
    seed_rides(service.store(), &ride_fixtures());
    service
}

fn faulty_service(fail_on: FailOn) -> RideService<FaultyStore> {
    RideService::new(FaultyStore {
        inner: SqliteRideStore::open_in_memory().expect("open in-memory store"),
        fail_on,
    })
}

#[test]
fn create_ride_returns_stored_row() {
    let service = empty_service();

    let rides = service.create_ride(&new_ride()).expect("ride created");

    assert_eq!(rides.len(), 1);
    let ride = &rides[0];
    assert_eq!(ride.ride_id.get(), 1);
    assert_eq!(ride.start_lat, 48.858222);
    assert_eq!(ride.start_long, 2.2945);
    assert_eq!(ride.end_lat, 48.861111);
    assert_eq!(ride.end_long, 2.335833);
    assert_eq!(ride.rider_name, "Dominic Toretto");
    assert_eq!(ride.driver_name, "The Transporter");
    assert_eq!(ride.driver_vehicle, "Audi A8 W12");
    assert!(!ride.created.is_empty());
}

#[test]
fn create_ride_uses_first_unused_id() {
    let service = seeded_service();

    let rides = service.create_ride(&new_ride()).expect("ride created");
    assert_eq!(rides[0].ride_id.get(), 6);
}

#[test]
fn list_rides_second_page_of_two() {
    let service = seeded_service();
    let query = normalize_page_query(&[
        ("page".to_string(), "2".to_string()),
        ("limit".to_string(), "2".to_string()),
    ])
    .expect("valid query");

    let rides = service.list_rides(query).expect("rides listed");

    let fixtures = ride_fixtures();
    assert_eq!(rides, vec![fixtures[2].clone(), fixtures[3].clone()]);
}

#[test]
fn list_rides_default_page_returns_all_fixtures() {
    let service = seeded_service();

    let rides = service.list_rides(PageQuery::default()).expect("rides listed");
    assert_eq!(rides, ride_fixtures());
}

#[test]
fn list_rides_past_the_end_is_not_found() {
    let service = seeded_service();

    let err = service
        .list_rides(PageQuery { page: 4, limit: 2 })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RidesNotFound);
}

#[test]
fn list_rides_on_empty_table_is_not_found() {
    let err = empty_service().list_rides(PageQuery::default()).unwrap_err();

    assert!(matches!(err, RideError::RidesNotFound));
    assert_eq!(err.message(), "Could not find any rides");
}

#[test]
fn get_ride_by_id_returns_single_row() {
    let service = seeded_service();

    let rides = service
        .get_ride_by_id(RideId::new(4).unwrap())
        .expect("ride found");
    assert_eq!(rides, vec![ride_fixtures()[3].clone()]);
}

#[test]
fn get_ride_by_id_unknown_is_not_found() {
    let err = empty_service()
        .get_ride_by_id(RideId::new(1).unwrap())
        .unwrap_err();
    assert_eq!(err.code(), "RIDES_NOT_FOUND_ERROR");
}

#[test]
fn insert_fault_is_server_error() {
    let service = faulty_service(FailOn::Insert);

    let err = service.create_ride(&new_ride()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.message(), "Unknown error");
    assert!(!err.to_string().contains(FAULT_DETAIL));
    assert!(err.source().unwrap().to_string().contains(FAULT_DETAIL));
}

#[test]
fn read_back_fault_after_insert_is_server_error() {
    let service = faulty_service(FailOn::Select);

    let err = service.create_ride(&new_ride()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    // The insert itself went through before the read-back failed.
    assert_eq!(service.store().inner.count().unwrap(), 1);
}

#[test]
fn select_faults_are_server_errors() {
    let service = faulty_service(FailOn::Select);

    let list = service.list_rides(PageQuery::default()).unwrap_err();
    let by_id = service.get_ride_by_id(RideId::new(1).unwrap()).unwrap_err();

    for err in [list, by_id] {
        assert_eq!(err.code(), "SERVER_ERROR");
        assert_eq!(err.to_string(), "Unknown error");
    }
}
