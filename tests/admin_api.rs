use migration::{Migrator, MigratorTrait};
use rocket::config::LogLevel;
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use rocket::{async_test, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use service::config::AppConfig;
use uuid::Uuid;

async fn make_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await.expect("in-memory database");
    Migrator::up(&db, None).await.expect("migrations apply");
    db
}

async fn make_client() -> Client {
    let rocket = api::build(make_db().await, &AppConfig::with_database_url("sqlite::memory:"))
        .expect("valid rocket instance");
    let figment = rocket
        .figment()
        .clone()
        .merge((Config::LOG_LEVEL, LogLevel::Critical));
    Client::tracked(rocket.configure(figment))
        .await
        .expect("valid rocket instance")
}

async fn send(client: &Client, method: &str, uri: &str, body: Option<Value>) -> (Status, Value) {
    let request = match method {
        "POST" => client.post(uri.to_string()),
        "PUT" => client.put(uri.to_string()),
        "DELETE" => client.delete(uri.to_string()),
        _ => client.get(uri.to_string()),
    };
    let request = match body {
        Some(body) => request.json(&body),
        None => request,
    };
    let response = request.dispatch().await;
    let status = response.status();
    let text = response.into_string().await.unwrap_or_default();
    (status, serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn championship() -> Value {
    json!({"name": "Championship", "color": "Black", "rating": 74.2, "slope": 142})
}

async fn create_course(client: &Client, name: &str, holes: i32) -> i64 {
    let (status, body) = send(
        client,
        "POST",
        "/api/courses",
        Some(json!({"name": name, "location": "Test City", "holes": holes})),
    )
    .await;
    assert_eq!(status, Status::Ok, "{body}");
    body["id"].as_i64().unwrap()
}

#[async_test]
async fn wizard_creates_course_tee_sets_and_scorecard() {
    let client = make_client().await;

    let (status, body) = send(
        &client,
        "POST",
        "/api/courses/wizard",
        Some(json!({
            "step": "course_info",
            "course": {"name": "Test Course", "location": "Test City"}
        })),
    )
    .await;
    assert_eq!(status, Status::Ok, "{body}");
    assert_eq!(body["outcome"]["outcome"], "advanced");
    assert_eq!(body["outcome"]["step"], "tee_boxes");
    let course_id = body["outcome"]["course_id"].as_i64().unwrap();
    assert_eq!(body["state"]["step_index"], 1);

    let mut state = body["state"].clone();
    state["tee_sets"] = json!([championship()]);
    let (status, body) = send(&client, "POST", "/api/courses/wizard", Some(state)).await;
    assert_eq!(status, Status::Ok, "{body}");
    assert_eq!(body["outcome"]["step"], "scorecard");
    assert_eq!(body["state"]["holes"].as_array().unwrap().len(), 18);

    let (_, tee_sets) = send(&client, "GET", &format!("/api/courses/{course_id}/tee-sets"), None).await;
    assert_eq!(tee_sets.as_array().unwrap().len(), 1);
    assert_eq!(tee_sets[0]["name"], "Championship");

    let (status, body) =
        send(&client, "POST", "/api/courses/wizard", Some(body["state"].clone())).await;
    assert_eq!(status, Status::Ok, "{body}");
    assert_eq!(body["outcome"]["outcome"], "finished");
    assert_eq!(body["outcome"]["redirect_to"], "/admin/courses");

    let (status, card) =
        send(&client, "GET", &format!("/api/courses/{course_id}/scorecard"), None).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(card["holes"].as_array().unwrap().len(), 18);
    assert_eq!(card["totals"]["par_total"], 72);
    assert_eq!(card["holes"][17]["handicap_index"], 18);

    let (status, state) = send(
        &client,
        "GET",
        &format!("/api/courses/{course_id}/wizard?step=2"),
        None,
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(state["step"], "scorecard");
    assert_eq!(state["course"]["name"], "Test Course");
}

#[async_test]
async fn empty_course_name_is_rejected_before_saving() {
    let client = make_client().await;
    let (status, body) = send(
        &client,
        "POST",
        "/api/courses/wizard",
        Some(json!({"course": {"name": "", "location": "Test City"}})),
    )
    .await;
    assert_eq!(status, Status::UnprocessableEntity);
    assert!(body.as_str().unwrap().starts_with("name:"));

    let (_, courses) = send(&client, "GET", "/api/courses", None).await;
    assert_eq!(courses, json!([]));
}

#[async_test]
async fn saving_tee_sets_twice_does_not_duplicate() {
    let client = make_client().await;
    let id = create_course(&client, "Pine Valley", 18).await;
    let uri = format!("/api/courses/{id}/tee-sets");
    let list = json!([championship(), {"name": "Forward", "color": "Red", "rating": 68.0, "slope": 115}]);

    for _ in 0..2 {
        let (status, body) = send(&client, "PUT", &uri, Some(list.clone())).await;
        assert_eq!(status, Status::Ok, "{body}");
    }
    let (_, fetched) = send(&client, "GET", &uri, None).await;
    let names: Vec<_> = fetched
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Championship", "Forward"]);

    let (status, _) = send(
        &client,
        "PUT",
        &uri,
        Some(json!([championship(), championship()])),
    )
    .await;
    assert_eq!(status, Status::UnprocessableEntity);
}

#[async_test]
async fn holes_reference_tee_sets_by_name() {
    let client = make_client().await;
    let id = create_course(&client, "Short Course", 9).await;
    send(&client, "PUT", &format!("/api/courses/{id}/tee-sets"), Some(json!([championship()]))).await;

    let holes: Vec<Value> = (1..=9)
        .map(|n| json!({"number": n, "par": 3, "handicapIndex": n, "distances": {"Championship": 120 + n}}))
        .collect();
    let (status, body) = send(&client, "PUT", &format!("/api/courses/{id}/holes"), Some(json!(holes))).await;
    assert_eq!(status, Status::Ok, "{body}");
    assert_eq!(body[0]["distances"]["Championship"], 121);

    let (status, _) = send(
        &client,
        "PUT",
        &format!("/api/courses/{id}/holes"),
        Some(json!((1..=9)
            .map(|n| json!({"number": n, "par": 3, "distances": {"Gold": 140}}))
            .collect::<Vec<_>>())),
    )
    .await;
    assert_eq!(status, Status::UnprocessableEntity);

    let (_, detail) = send(&client, "GET", &format!("/api/courses/{id}"), None).await;
    assert_eq!(detail["holes"].as_array().unwrap().len(), 9);
    assert_eq!(detail["totals"]["par_total"], 27);
}

#[async_test]
async fn hole_list_must_fit_the_course() {
    let client = make_client().await;
    let id = create_course(&client, "Nine Holes", 9).await;
    let uri = format!("/api/courses/{id}/holes");
    send(&client, "PUT", &format!("/api/courses/{id}/tee-sets"), Some(json!([championship()]))).await;

    let eighteen: Vec<Value> = (1..=18).map(|n| json!({"number": n, "par": 4})).collect();
    let (status, body) = send(&client, "PUT", &uri, Some(json!(eighteen))).await;
    assert_eq!(status, Status::UnprocessableEntity);
    assert!(body.as_str().unwrap().starts_with("holes:"));

    let huge: Vec<Value> = (1..=9)
        .map(|n| json!({"number": n, "par": 4, "distances": {"Championship": 2_000_000_000}}))
        .collect();
    let (status, _) = send(&client, "PUT", &uri, Some(json!(huge))).await;
    assert_eq!(status, Status::UnprocessableEntity);

    let mut doubled: Vec<Value> = (1..=9).map(|n| json!({"number": n, "par": 4})).collect();
    doubled[0]["distances"] = json!({"Championship": 400, "championship": 410});
    let (status, body) = send(&client, "PUT", &uri, Some(json!(doubled))).await;
    assert_eq!(status, Status::UnprocessableEntity);
    assert!(body
        .as_str()
        .unwrap()
        .starts_with("holes[0].distances: More than one distance"));

    let (_, card) = send(&client, "GET", &format!("/api/courses/{id}/scorecard"), None).await;
    assert_eq!(card["holes"], json!([]));
}

#[async_test]
async fn inactive_courses_are_not_offered_for_events() {
    let client = make_client().await;
    let open = create_course(&client, "Open Course", 18).await;
    let closed = create_course(&client, "Closed Course", 18).await;
    let (status, _) = send(
        &client,
        "PUT",
        &format!("/api/courses/{closed}/active"),
        Some(json!({"is_active": false})),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let (_, active) = send(&client, "GET", "/api/courses?active=true", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["id"], open);

    let (status, series) = send(
        &client,
        "POST",
        "/api/series",
        Some(json!({"name": "Summer League", "start_date": "2024-06-01", "end_date": "2024-08-31"})),
    )
    .await;
    assert_eq!(status, Status::Ok, "{series}");
    let series_id = series["id"].as_i64().unwrap();
    assert_eq!(series["status"], "upcoming");

    let events = format!("/api/series/{series_id}/events");
    let (status, _) = send(
        &client,
        "POST",
        &events,
        Some(json!({"name": "Round 1", "course_id": closed, "event_date": "2024-06-15"})),
    )
    .await;
    assert_eq!(status, Status::UnprocessableEntity);

    let (status, _) = send(
        &client,
        "POST",
        &events,
        Some(json!({"name": "Round 1", "course_id": open, "event_date": "2024-09-15"})),
    )
    .await;
    assert_eq!(status, Status::UnprocessableEntity);

    let (status, event) = send(
        &client,
        "POST",
        &events,
        Some(json!({"name": "Round 1", "course_id": open, "event_date": "2024-06-15"})),
    )
    .await;
    assert_eq!(status, Status::Ok, "{event}");
    let event_id = event["id"].as_i64().unwrap();

    let (status, event) = send(
        &client,
        "PUT",
        &format!("/api/events/{event_id}/status"),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(event["status"], "completed");

    let (status, _) = send(&client, "DELETE", &format!("/api/courses/{open}"), None).await;
    assert_eq!(status, Status::NoContent);
    let (status, _) = send(&client, "GET", &format!("/api/events/{event_id}"), None).await;
    assert_eq!(status, Status::NotFound);
}

#[async_test]
async fn participants_move_through_statuses() {
    let client = make_client().await;
    let (_, series) = send(
        &client,
        "POST",
        "/api/series",
        Some(json!({"name": "Winter Series", "start_date": "2024-12-01", "end_date": "2025-02-28"})),
    )
    .await;
    let roster = format!("/api/series/{}/participants", series["id"]);
    let user = Uuid::new_v4();

    let (status, participant) = send(&client, "POST", &roster, Some(json!({"user_id": user.to_string()}))).await;
    assert_eq!(status, Status::Ok, "{participant}");
    assert_eq!(participant["status"], "registered");

    let (status, _) = send(&client, "POST", &roster, Some(json!({"user_id": user.to_string()}))).await;
    assert_eq!(status, Status::Conflict);

    let (status, participant) = send(
        &client,
        "PUT",
        &format!("{roster}/{user}"),
        Some(json!({"status": "no_show"})),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(participant["status"], "no_show");

    let (status, _) = send(&client, "DELETE", &format!("{roster}/{user}"), None).await;
    assert_eq!(status, Status::NoContent);
    let (_, list) = send(&client, "GET", &roster, None).await;
    assert_eq!(list, json!([]));
}

#[async_test]
async fn profile_routes_need_a_caller() {
    let client = make_client().await;
    let response = client.get("/api/profile").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .get("/api/profile")
        .header(Header::new(api::USER_HEADER, "not-a-uuid"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[async_test]
async fn bags_hold_only_the_owners_clubs() {
    let client = make_client().await;
    let owner = Header::new(api::USER_HEADER, Uuid::new_v4().to_string());
    let stranger = Header::new(api::USER_HEADER, Uuid::new_v4().to_string());

    let response = client
        .put("/api/profile")
        .header(owner.clone())
        .json(&json!({"username": "golfer"}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .post("/api/profile/clubs")
        .header(owner.clone())
        .json(&json!({"name": "Big Stick", "club_type": "driver", "loft": 9.5}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let club: Value = response.into_json().await.unwrap();

    let response = client
        .post("/api/profile/bags")
        .header(stranger.clone())
        .json(&json!({"name": "Borrowed", "club_ids": [club["id"]]}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);

    for name in ["Weekend", "Tournament"] {
        let response = client
            .post("/api/profile/bags")
            .header(owner.clone())
            .json(&json!({"name": name, "is_primary": true, "club_ids": [club["id"]]}))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    let response = client.get("/api/profile/bags").header(owner).dispatch().await;
    let bags: Value = response.into_json().await.unwrap();
    let primaries: Vec<_> = bags
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["is_primary"] == true)
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(primaries, ["Tournament"]);
    assert_eq!(bags[0]["club_ids"], json!([club["id"]]));

    let response = client.get("/api/profile/clubs").header(stranger).dispatch().await;
    let clubs: Value = response.into_json().await.unwrap();
    assert_eq!(clubs, json!([]));
}

#[async_test]
async fn scorecard_upload_without_extraction_service() {
    let client = make_client().await;
    let body = "--XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"file\"; filename=\"card.png\"\r\n\
        Content-Type: image/png\r\n\r\n\
        not really a png\r\n\
        --XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"extractType\"\r\n\r\n\
        all\r\n\
        --XBOUNDARY--\r\n";
    let response = client
        .post("/api/scorecard")
        .header(ContentType::new("multipart", "form-data").with_params(("boundary", "XBOUNDARY")))
        .body(body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::ServiceUnavailable);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some());
}

#[async_test]
async fn unknown_endpoints_get_the_api_catcher() {
    let client = make_client().await;
    let response = client.get("/api/nothing-here").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(response.into_string().await.unwrap(), "Api endpoint not found");
}
