use sqlx::PgPool;

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint, got {data_type}");
    }
}

/// Unique constraints and unique indexes are named `uq_*`, which the API
/// relies on to classify violations as 409 Conflict.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints_use_uq_prefix(pool: PgPool) {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT i.relname
         FROM pg_index x
         JOIN pg_class i ON i.oid = x.indexrelid
         JOIN pg_class t ON t.oid = x.indrelid
         JOIN pg_namespace n ON n.oid = t.relnamespace
         WHERE n.nspname = 'public'
           AND x.indisunique
           AND NOT x.indisprimary
           AND t.relname != '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (name,) in &rows {
        assert!(name.starts_with("uq_"), "Unique index {name} should be prefixed uq_");
    }
}

/// The one-active-session rule is a partial unique index.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_active_session_index_is_partial(pool: PgPool) {
    let (definition,): (String,) = sqlx::query_as(
        "SELECT indexdef FROM pg_indexes WHERE indexname = 'uq_queue_sessions_active_room'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    assert!(definition.contains("UNIQUE"));
    assert!(definition.contains("WHERE"));
}
