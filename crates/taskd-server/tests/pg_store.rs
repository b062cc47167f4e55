//! Round-trip test against a real Postgres instance.
//!
//! Run with a database that has the `todo` schema applied:
//!
//! ```sh
//! POSTGRES_SERVICE_HOST=localhost POSTGRES_PASSWORD=todo123 \
//!     cargo test -p taskd-server --test pg_store -- --ignored
//! ```

use core::time::Duration;

use chrono::{TimeZone, Utc};
use taskd_core::Item;
use taskd_server::server::config::ServerConfig;
use taskd_server::server::store::{PgTodoStore, TodoStore, connect_pool};

fn config_from_env() -> ServerConfig {
    let env = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

    ServerConfig {
        server_addr: "127.0.0.1:0".to_string(),
        db_host: env("POSTGRES_SERVICE_HOST", "localhost"),
        db_port: env("POSTGRES_SERVICE_PORT", "5432").parse().unwrap(),
        db_user: env("POSTGRES_USER", "todo"),
        db_password: env("POSTGRES_PASSWORD", "todo123"),
        db_name: env("POSTGRES_DB", "todo"),
        max_inflight_inserts: 10,
        shutdown_timeout: Duration::from_secs(1),
        log_json: false,
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres with the todo schema"]
async fn insert_get_delete_round_trip() {
    let pool = connect_pool(&config_from_env()).await.unwrap();
    let store = PgTodoStore::new(pool);

    let item = Item {
        note: "pg round trip".to_string(),
        duedate: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        repeat: true,
        ..Item::default()
    };

    let id = store.insert(&item).await.unwrap();
    assert!(id > 0);

    let fetched = store.get(id).await.unwrap().expect("inserted row missing");
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.note, item.note);
    assert_eq!(fetched.duedate, item.duedate);
    assert_eq!(fetched.repeat, item.repeat);
    assert!(!fetched.completed);

    let mut updated = fetched.clone();
    updated.completed = true;
    store.update(&updated).await.unwrap();
    let fetched = store.get(id).await.unwrap().expect("updated row missing");
    assert!(fetched.completed);

    store.delete(id).await.unwrap();
    assert!(store.get(id).await.unwrap().is_none());
}
