use std::io::Write as _;

use pretty_assertions::assert_eq;
use relsql::dialect::{JsonPath, PathCodec, TextArrayPath};
use relsql::prelude::*;
use serde_json::json;

#[test]
fn test_postgres_preset() -> anyhow::Result<()> {
    let dialect = Dialect::postgres();

    let mut criterion = Criterion::eq("doc__a__0", 1)?;
    assert_eq!(
        criterion.render(&dialect),
        (
            "\"doc\"#>>%s=%s::JSONB".to_string(),
            vec![json!("{a,0}"), json!("1")]
        )
    );

    let mut sets = Sets::all("tags", vec!["x"])?;
    assert_eq!(
        sets.render(&dialect).0,
        "(\"tags\" @> %s::JSONB AND jsonb_array_length(\"tags\")=jsonb_array_length(%s::JSONB))"
    );
    Ok(())
}

#[test]
fn test_mysql_preset() -> anyhow::Result<()> {
    let dialect = Dialect::mysql();

    let mut criterion = Criterion::eq("doc__a", "b")?;
    assert_eq!(
        criterion.render(&dialect),
        (
            "`doc`->>%s=CAST(%s AS JSON)".to_string(),
            vec![json!("$.\"a\""), json!("\"b\"")]
        )
    );

    let mut sets = Sets::has("tags", vec!["x"])?;
    assert_eq!(sets.render(&dialect).0, "JSON_CONTAINS(`tags`,CAST(%s AS JSON))");
    Ok(())
}

#[test]
fn test_config_overrides() -> anyhow::Result<()> {
    let dialect = Dialect::from_toml(
        r#"
        preset = "postgres"
        placeholder = "?"
        wildcard = "*"
        path_syntax = "json"
        "#,
    )?;

    let mut query = Statement::select(terms!["*"])?
        .from(terms!["people"])?
        .filter(terms![doc__a = 1, name__start = "ma"])?;

    assert_eq!(
        query.render(&dialect),
        (
            "SELECT * FROM \"people\" WHERE \"doc\"#>>?=?::JSONB AND \"name\" LIKE ?".to_string(),
            vec![json!("$.\"a\""), json!("1"), json!("ma*")]
        )
    );
    assert_eq!(query.rendered().placeholders(&dialect), 3);
    Ok(())
}

#[test]
fn test_config_unquoted() -> anyhow::Result<()> {
    let dialect = Dialect::from_toml("quote = \"\"")?;
    let mut query = Statement::delete("app.people").filter(terms![id = 1])?;
    assert_eq!(query.render(&dialect).0, "DELETE FROM app.people WHERE id=%s");
    Ok(())
}

#[test]
fn test_config_errors() {
    let err = Dialect::from_toml("json = \"JSON()\"").unwrap_err();
    assert!(matches!(err, SqlError::Config(_)));

    let err = Dialect::from_toml("nope = 1").unwrap_err();
    assert!(matches!(err, SqlError::Toml(_)));

    let err = Dialect::from_file("/nonexistent/relsql/dialect.toml").unwrap_err();
    assert!(matches!(err, SqlError::Io(_)));
}

#[test]
fn test_config_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("relsql-dialect-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "preset = \"mysql\"")?;
    writeln!(file, "str_quote = \"\\\"\"")?;
    drop(file);

    let dialect = Dialect::from_file(&path)?;
    std::fs::remove_file(&path)?;

    let mut criterion = Criterion::eq("name", "mai")?;
    criterion.render(&dialect);
    assert_eq!(criterion.rendered().inline(&dialect), "`name`=\"mai\"");
    assert_eq!(dialect.json, "CAST(%s AS JSON)");
    Ok(())
}

#[test]
fn test_codecs_decode_what_they_walk() -> anyhow::Result<()> {
    let path = vec![
        PathSegment::from("a"),
        PathSegment::from(0),
        PathSegment::from(-1),
        PathSegment::from("b c"),
    ];

    assert_eq!(JsonPath.decode(&JsonPath.walk(&path))?, path);
    assert_eq!(TextArrayPath.decode(&TextArrayPath.walk(&path))?, path);

    let column = ColumnName::with_path("doc", path);
    assert!(column.is_json());
    Ok(())
}
