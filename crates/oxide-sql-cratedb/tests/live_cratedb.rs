//! Tests against a running CrateDB.
//!
//! Ignored by default. Run with a server listening on the PostgreSQL port:
//!
//! ```text
//! CRATEDB_URL=postgres://crate@localhost:5432/doc cargo test -- --ignored
//! ```

use oxide_sql_cratedb::prelude::*;

fn database_url() -> String {
    std::env::var("CRATEDB_URL").unwrap_or_else(|_| "postgres://crate@localhost:5432/doc".into())
}

async fn introspector(generation: CatalogGeneration) -> CrateIntrospector {
    CrateIntrospector::connect(&database_url(), DialectConfig::new().generation(generation))
        .await
        .expect("CrateDB is reachable")
}

fn live_table(name: &str) -> Table {
    Table::new(name)
        .column(Column::new("id", SqlType::BigInt).primary_key())
        .column(Column::new("login", SqlType::Varchar).not_null())
        .column(Column::new("score", SqlType::Double))
}

async fn recreate(introspector: &CrateIntrospector, table: &Table) {
    let dialect = introspector.dialect();
    sqlx::query(&dialect.drop_table_sql(&table.name))
        .execute(introspector.pool())
        .await
        .unwrap();
    sqlx::query(&dialect.create_table_sql(table))
        .execute(introspector.pool())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "needs a running CrateDB"]
async fn test_table_round_trip_pg_catalog() {
    let introspector = introspector(CatalogGeneration::PgCatalog).await;
    let table = live_table("oxide_live_pg");
    recreate(&introspector, &table).await;

    assert!(introspector.table_exists(&table.name).await.unwrap());
    assert!(introspector.is_column_exist(&table.name, "login").await.unwrap());
    assert!(!introspector.is_column_exist(&table.name, "missing").await.unwrap());

    let tables = introspector.get_tables().await.unwrap();
    assert!(tables.iter().any(|t| t.name == "doc.oxide_live_pg"));

    let columns = introspector.get_columns(&table.name).await.unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "login", "score"]);
    assert!(columns[0].is_primary_key);

    sqlx::query(&introspector.dialect().drop_table_sql(&table.name))
        .execute(introspector.pool())
        .await
        .unwrap();
    assert!(!introspector.table_exists(&table.name).await.unwrap());
}

#[tokio::test]
#[ignore = "needs a running CrateDB"]
async fn test_table_round_trip_information_schema() {
    let introspector = introspector(CatalogGeneration::InformationSchema).await;
    let table = live_table("oxide_live_is");
    recreate(&introspector, &table).await;

    assert!(introspector.table_exists(&table.name).await.unwrap());

    let columns = introspector.get_columns(&table.name).await.unwrap();
    let login = columns.iter().find(|c| c.name == "login").unwrap();
    assert_eq!(login.sql_type, SqlType::Varchar);
    // CREATE TABLE carries no nullability, so `not_null()` is not kept.
    assert!(login.nullable);

    let indexes = introspector.get_indexes(&table.name).await.unwrap();
    assert!(indexes.is_empty());

    sqlx::query(&introspector.dialect().drop_table_sql(&table.name))
        .execute(introspector.pool())
        .await
        .unwrap();
}
