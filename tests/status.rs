mod support;

use support::{connect, join, unique_room};

#[tokio::test]
async fn when_status_is_requested_then_server_reports_online_with_default_room() {
    let base_url = support::ensure_server();
    let room = unique_room();
    let mut ws = connect().await;
    join(&mut ws, &room, "TERRE", "Counter").await;

    let res = reqwest::get(format!("{base_url}/status"))
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = res.json().await.expect("json body");
    assert_eq!(body["status"], "online");
    assert!(body["players"].as_u64().expect("players count") >= 1);
    assert!(body["total_players"].as_u64().expect("total count") >= 1);
    assert!(body["uptime_seconds"].is_u64());
    let rooms: Vec<&str> = body["rooms"]
        .as_array()
        .expect("rooms array")
        .iter()
        .filter_map(|r| r.as_str())
        .collect();
    assert!(rooms.contains(&"principal"));
    assert!(rooms.contains(&room.as_str()));
}
