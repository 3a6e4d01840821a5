//! End-to-end introspection through scripted drivers.

use pretty_assertions::assert_eq;
use schema_probe::db::{EngineKind, FailingDriver, MockDriver, RawValue, SchemaClient};
use schema_probe::error::ProbeError;

fn row_store(driver: &MockDriver) -> SchemaClient {
    SchemaClient::new(Box::new(driver.clone()), EngineKind::RowStore, "mysql", None)
}

fn columnar(driver: &MockDriver) -> SchemaClient {
    SchemaClient::new(
        Box::new(driver.clone()),
        EngineKind::Columnar,
        "clickhouse",
        Some("main".to_string()),
    )
}

fn status_row(name: &str, engine: Option<&str>) -> Vec<RawValue> {
    vec![
        RawValue::Bytes(name.as_bytes().to_vec()),
        engine.map_or(RawValue::Null, |e| RawValue::Bytes(e.as_bytes().to_vec())),
        RawValue::UInt(10),
    ]
}

const USERS_DDL: &str = "CREATE TABLE `users` (\n  `id` int NOT NULL,\n  `email` varchar(255) DEFAULT NULL,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

#[tokio::test]
async fn test_row_store_dump() {
    let driver = MockDriver::new()
        .with_rows(
            "SHOW TABLE STATUS",
            &["Name", "Engine", "Version"],
            vec![
                status_row("users", Some("InnoDB")),
                status_row("active_users", None),
                status_row("orders", Some("InnoDB")),
            ],
        )
        .with_rows(
            "SHOW CREATE TABLE `users`",
            &["Table", "Create Table"],
            vec![vec!["users".into(), USERS_DDL.as_bytes().to_vec().into()]],
        )
        .with_error("SHOW CREATE TABLE `orders`", "Table 'app.orders' doesn't exist");
    let client = row_store(&driver);

    let schema = client.introspect().await.unwrap();

    assert_eq!(schema.engine, EngineKind::RowStore);
    let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["users", "orders"]);
    assert_eq!(schema.table("users").unwrap().schema, USERS_DDL);
    assert_eq!(schema.table("orders").unwrap().schema, "");
    assert!(schema.table("active_users").is_none());

    assert_eq!(
        driver.executed_queries(),
        vec![
            "SHOW TABLE STATUS",
            "SHOW CREATE TABLE `users`",
            "SHOW CREATE TABLE `orders`",
        ]
    );
    // The failed statement never opened a cursor.
    assert_eq!(driver.released_cursors(), 2);
}

#[tokio::test]
async fn test_columnar_dump_and_desc() {
    let driver = MockDriver::new()
        .with_rows(
            "SHOW TABLES",
            &["name"],
            vec![vec!["events".into()], vec!["sessions".into()]],
        )
        .with_rows(
            "SHOW CREATE TABLE `events`",
            &["statement"],
            vec![vec!["CREATE TABLE metrics.events (`id` UInt64) ENGINE = MergeTree ORDER BY id".into()]],
        )
        .with_rows(
            "SHOW CREATE TABLE `sessions`",
            &["statement"],
            vec![vec!["CREATE TABLE metrics.sessions (`id` UInt64) ENGINE = Log".into()]],
        )
        .with_rows(
            "DESCRIBE TABLE `metrics`.`events`",
            &["name", "type", "default_type", "default_expression", "comment"],
            vec![
                vec!["id".into(), "UInt64".into(), "".into(), "".into(), "".into()],
                vec!["val".into(), "String".into(), "DEFAULT".into(), "''".into(), "".into()],
            ],
        );
    let client = columnar(&driver);

    let schema = client.introspect().await.unwrap();
    assert_eq!(schema.tables.len(), 2);
    assert!(schema
        .table("sessions")
        .unwrap()
        .schema
        .ends_with("ENGINE = Log"));

    let desc = client.get_desc_schema("metrics", "events").await.unwrap();
    assert_eq!(desc, "`id` UInt64  \n`val` String DEFAULT ''");

    client.close().await.unwrap();
    assert_eq!(driver.released_cursors(), 4);
}

#[tokio::test]
async fn test_schema_failure_degrades_but_enumeration_failure_raises() {
    let driver = MockDriver::new()
        .with_error("SHOW TABLES", "Code: 81. DB::Exception: Database metrics doesn't exist")
        .with_error("SHOW CREATE TABLE `events`", "Code: 60. DB::Exception: Table doesn't exist");
    let client = columnar(&driver);

    assert_eq!(client.get_schema("events").await.unwrap(), "");
    assert_eq!(
        client.get_desc_schema("metrics", "missing").await.unwrap(),
        ""
    );
    assert!(matches!(
        client.list_tables().await,
        Err(ProbeError::Query(_))
    ));
    assert!(matches!(
        client.introspect().await,
        Err(ProbeError::Query(_))
    ));
}

#[tokio::test]
async fn test_cursor_released_once_when_scan_fails() {
    let driver = MockDriver::new().with_failure_after(
        "SHOW TABLE STATUS",
        &["Name", "Engine"],
        vec![
            vec!["users".into(), "InnoDB".into()],
            vec!["orders".into(), "InnoDB".into()],
        ],
        1,
    );
    let client = row_store(&driver);

    let result = client.list_tables().await;

    assert!(matches!(result, Err(ProbeError::Query(_))));
    assert_eq!(driver.released_cursors(), 1);
}

#[tokio::test]
async fn test_malformed_catalog_row_is_fatal() {
    let driver = MockDriver::new().with_rows(
        "SHOW TABLES",
        &["name"],
        vec![vec!["events".into()], vec![RawValue::Int(7)]],
    );
    let client = columnar(&driver);

    let err = client.introspect().await.unwrap_err();

    assert!(matches!(err, ProbeError::Decode(_)));
    assert_eq!(err.category(), "Decode Error");
    assert_eq!(driver.executed_queries(), vec!["SHOW TABLES"]);
}

#[tokio::test]
async fn test_dropped_connection() {
    let client = SchemaClient::new(
        Box::new(FailingDriver::new("server has gone away")),
        EngineKind::RowStore,
        "mysql",
        None,
    );

    assert!(matches!(
        client.list_tables().await,
        Err(ProbeError::Query(_))
    ));
    assert_eq!(client.get_schema("users").await.unwrap(), "");
}
