//! ClickHouse driver tests against a mock HTTP interface.

use pretty_assertions::assert_eq;
use schema_probe::config::ConnectionConfig;
use schema_probe::db::{
    ClickHouseDriver, DatabaseBackend, Driver, EngineKind, RowCursor, SchemaClient, Value,
};
use schema_probe::error::ProbeError;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ok.\n"))
        .mount(&server)
        .await;
    server
}

async fn mount_query(server: &MockServer, sql: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(query_param("default_format", "JSONCompact"))
        .and(query_param("database", "metrics"))
        .and(body_string(sql))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn connection(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::new(
        format!("{}/metrics", server.uri()),
        DatabaseBackend::Clickhouse,
    )
}

#[tokio::test]
async fn test_list_tables_and_schema() {
    let server = start_server().await;
    mount_query(
        &server,
        "SHOW TABLES",
        json!({
            "meta": [{"name": "name", "type": "String"}],
            "data": [["events"], ["sessions"]],
            "rows": 2
        }),
    )
    .await;
    mount_query(
        &server,
        "SHOW CREATE TABLE `events`",
        json!({
            "meta": [{"name": "statement", "type": "String"}],
            "data": [["CREATE TABLE metrics.events\n(\n    `id` UInt64\n)\nENGINE = MergeTree\nORDER BY id"]],
            "rows": 1
        }),
    )
    .await;

    let client = SchemaClient::connect(&connection(&server)).await.unwrap();
    assert_eq!(client.engine(), EngineKind::Columnar);
    assert_eq!(client.db_type(), "clickhouse");

    let tables = client.list_tables().await.unwrap();
    assert_eq!(tables, vec!["events", "sessions"]);

    let schema = client.get_schema("events").await.unwrap();
    assert_eq!(
        schema,
        "CREATE TABLE metrics.events\n(\n    `id` UInt64\n)\nENGINE = MergeTree\nORDER BY id"
    );

    // No mock answers for `sessions`, so the server returns 404.
    assert_eq!(client.get_schema("sessions").await.unwrap(), "");

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_desc_schema() {
    let server = start_server().await;
    mount_query(
        &server,
        "DESCRIBE TABLE `metrics`.`events`",
        json!({
            "meta": [
                {"name": "name", "type": "String"},
                {"name": "type", "type": "String"},
                {"name": "default_type", "type": "String"},
                {"name": "default_expression", "type": "String"},
                {"name": "comment", "type": "String"},
                {"name": "codec_expression", "type": "String"},
                {"name": "ttl_expression", "type": "String"}
            ],
            "data": [
                ["id", "UInt64", "", "", "", "", ""],
                ["val", "String", "DEFAULT", "''", "", "", ""]
            ],
            "rows": 2
        }),
    )
    .await;

    let client = SchemaClient::connect(&connection(&server)).await.unwrap();
    let desc = client.get_desc_schema("metrics", "events").await.unwrap();

    assert_eq!(desc, "`id` UInt64  \n`val` String DEFAULT ''");
}

#[tokio::test]
async fn test_server_error_is_query_error() {
    let server = start_server().await;
    Mock::given(method("POST"))
        .and(body_string("SHOW TABLES"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("Code: 81. DB::Exception: Database metrics does not exist.\n"),
        )
        .mount(&server)
        .await;

    let client = SchemaClient::connect(&connection(&server)).await.unwrap();
    let err = client.list_tables().await.unwrap_err();

    match err {
        ProbeError::Query(msg) => {
            assert_eq!(msg, "Code: 81. DB::Exception: Database metrics does not exist.")
        }
        other => panic!("expected query error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_credentials_and_params_are_sent() {
    let server = start_server().await;
    Mock::given(method("POST"))
        .and(header("X-ClickHouse-User", "reader"))
        .and(header("X-ClickHouse-Key", "secret"))
        .and(query_param("param_p0", "events"))
        .and(body_string("SELECT count() FROM system.columns WHERE table = {p0:String}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": [{"name": "count()", "type": "UInt64"}],
            "data": [["3"]],
            "rows": 1
        })))
        .mount(&server)
        .await;

    let dsn = server.uri().replacen("http://", "http://reader:secret@", 1);
    let driver = ClickHouseDriver::connect(&dsn).await.unwrap();
    let params = [Value::from("events")];
    let mut cursor = driver
        .query(
            "SELECT count() FROM system.columns WHERE table = {p0:String}",
            &params,
        )
        .await
        .unwrap();

    assert_eq!(cursor.columns().to_vec(), vec!["count()".to_string()]);
    let row = cursor.next_row().await.unwrap().unwrap();
    assert_eq!(
        schema_probe::db::decode(row[0].clone()),
        Value::String("3".to_string())
    );
    assert!(cursor.next_row().await.unwrap().is_none());
}

#[tokio::test]
async fn test_connect_fails_when_ping_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = SchemaClient::connect(&connection(&server)).await;

    assert!(matches!(result, Err(ProbeError::Connection(_))));
}
