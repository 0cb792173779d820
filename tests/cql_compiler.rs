//! CQL Compiler Tests
//!
//! End-to-end compile behavior through the public API:
//! - Schema definition keeps declaration order within each bucket
//! - Document values bind positionally in bucket order
//! - Range clauses fold into one interval per property
//! - Enum and string predicates cannot repeat
//! - ORDER BY and LIMIT resolve against range predicates
//! - Every failure is a single structured error

use aerocql::compiler::{
    compile, Command, CompileErrorCode, Compiler, CompilerConfig, Interval, SelectQuery,
};
use aerocql::schema::{SchemaCatalog, SchemaPrototype, UintWidth};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Compiles a CREATE and registers its prototype
fn define(catalog: &mut SchemaCatalog, cql: &str) {
    match compile(cql, &*catalog, &CompilerConfig::default()).unwrap() {
        Command::DefineSchema { collection, schema } => catalog.define(collection, schema).unwrap(),
        other => panic!("expected define_schema, got {:?}", other),
    }
}

fn orders_catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    define(
        &mut catalog,
        "CREATE orders (price UINT32, color ENUM, name STR, date UINT64)",
    );
    catalog
}

fn select(catalog: &SchemaCatalog, cql: &str) -> SelectQuery {
    match compile(cql, catalog, &CompilerConfig::default()).unwrap() {
        Command::Select(query) => query,
        other => panic!("expected select, got {:?}", other),
    }
}

fn error_code(catalog: &SchemaCatalog, cql: &str) -> CompileErrorCode {
    compile(cql, catalog, &CompilerConfig::default())
        .unwrap_err()
        .code()
}

// =============================================================================
// Schema & Binding Tests
// =============================================================================

/// CREATE then INSERT binds values to properties in declaration order.
#[test]
fn test_schema_round_trip() {
    let mut catalog = SchemaCatalog::new();
    define(&mut catalog, "CREATE orders (price UINT32, name STR)");

    let cmd = compile(
        "INSERT INTO orders VALUES (1, 42, x)",
        &catalog,
        &CompilerConfig::default(),
    )
    .unwrap();

    let Command::Insert(doc) = cmd else {
        panic!("expected insert");
    };
    assert_eq!(doc.id, 1);
    assert_eq!(doc.uint_values.len(), 1);
    assert_eq!(doc.uint_values[0].name, "price");
    assert_eq!(doc.uint_values[0].width, UintWidth::W4);
    assert_eq!(doc.uint_values[0].value, 42);
    assert_eq!(doc.str_values[0].name, "name");
    assert_eq!(doc.str_values[0].value, "x");
}

/// Quoted string values keep their quotes.
#[test]
fn test_quoted_string_bound_verbatim() {
    let mut catalog = SchemaCatalog::new();
    define(&mut catalog, "CREATE orders (price UINT32, name STR)");

    let cmd = compile(
        r#"INSERT INTO orders VALUES (1, 42, "fountain pen")"#,
        &catalog,
        &CompilerConfig::default(),
    )
    .unwrap();
    let Command::Insert(doc) = cmd else {
        panic!("expected insert");
    };
    assert_eq!(doc.str_value("name"), Some("\"fountain pen\""));
}

/// Declaration order holds within each bucket; buckets concatenate as
/// uint, enum, string.
#[test]
fn test_property_order() {
    let cmd = compile(
        "CREATE t (s1 STR, u1 UINT8, e1 ENUM, u2 UINT16, s2 STRING, e2 ENUM)",
        &SchemaCatalog::new(),
        &CompilerConfig::default(),
    )
    .unwrap();
    let Command::DefineSchema { schema, .. } = cmd else {
        panic!("expected define_schema");
    };

    let expected = SchemaPrototype::new()
        .with_uint("u1", UintWidth::W1)
        .with_uint("u2", UintWidth::W2)
        .with_enum("e1")
        .with_enum("e2")
        .with_str("s1")
        .with_str("s2");
    assert_eq!(schema, expected);
}

/// Values bind in bucket order regardless of CREATE order.
#[test]
fn test_binding_follows_bucket_order() {
    let mut catalog = SchemaCatalog::new();
    define(&mut catalog, "CREATE t (name STR, color ENUM, price UINT16)");

    let cmd = compile("INSERT INTO t (5, 300, -4, pen)", &catalog, &CompilerConfig::default()).unwrap();
    let Command::Insert(doc) = cmd else {
        panic!("expected insert");
    };
    assert_eq!(doc.uint("price"), Some(300));
    assert_eq!(doc.enum_code("color"), Some(-4));
    assert_eq!(doc.str_value("name"), Some("pen"));
}

/// Three properties, two values: arity mismatch and no command.
#[test]
fn test_arity_mismatch() {
    let mut catalog = SchemaCatalog::new();
    define(&mut catalog, "CREATE orders (price UINT32, color ENUM, name STR)");

    let err = compile(
        "INSERT INTO orders VALUES (1, 42, 3)",
        &catalog,
        &CompilerConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), CompileErrorCode::AeroCqlArityMismatch);
    assert!(err.message().contains('3'));
    assert!(err.message().contains('2'));
}

#[test]
fn test_delete_binds_like_insert() {
    let catalog = orders_catalog();
    let cmd = compile(
        "DELETE FROM orders (9, 10, 20200101, 1, pen)",
        &catalog,
        &CompilerConfig::default(),
    )
    .unwrap();
    assert!(matches!(cmd, Command::Delete(ref d) if d.id == 9 && d.uint("date") == Some(20200101)));
    assert!(cmd.is_mutation());
}

#[test]
fn test_insert_value_errors() {
    let catalog = orders_catalog();
    assert_eq!(
        error_code(&catalog, "INSERT INTO missing VALUES (1)"),
        CompileErrorCode::AeroCqlSchemaNotFound
    );
    assert_eq!(
        error_code(&catalog, "INSERT INTO orders VALUES (1, ten, 1, pen, 2)"),
        CompileErrorCode::AeroCqlValueParseError
    );
    assert_eq!(
        error_code(&catalog, "INSERT INTO orders VALUES (1, 4294967296, 1, pen, 2)"),
        CompileErrorCode::AeroCqlValueOutOfRange
    );
    assert_eq!(
        error_code(&catalog, "INSERT INTO orders VALUES (x, 1, 1, pen, 2)"),
        CompileErrorCode::AeroCqlValueParseError
    );
}

#[test]
fn test_duplicate_property_in_create() {
    assert_eq!(
        error_code(&SchemaCatalog::new(), "CREATE t (a UINT8, a ENUM)"),
        CompileErrorCode::AeroCqlDuplicateProperty
    );
}

#[test]
fn test_drop_needs_no_schema() {
    let cmd = compile("DESTROY orders;", &SchemaCatalog::new(), &CompilerConfig::default()).unwrap();
    assert_eq!(
        cmd,
        Command::DropSchema {
            collection: "orders".into()
        }
    );
}

// =============================================================================
// Predicate Tests
// =============================================================================

/// price>10 AND price<100 AND price>=20 folds to [20, 99].
#[test]
fn test_interval_folding() {
    let query = select(
        &orders_catalog(),
        "SELECT FROM orders WHERE price>10 AND price<100 AND price>=20",
    );
    assert_eq!(query.uint_preds.len(), 1);
    assert_eq!(query.uint_preds["price"], Interval::new(20, 99));
}

#[test]
fn test_contradiction_compiles_to_empty_interval() {
    let query = select(&orders_catalog(), "SELECT FROM orders WHERE price<0");
    assert!(query.uint_preds["price"].is_empty());

    let query = select(&orders_catalog(), "SELECT FROM orders WHERE price>50 AND price<10");
    assert_eq!(query.uint_preds["price"], Interval::new(51, 9));
}

#[test]
fn test_equality_is_point_interval() {
    let query = select(&orders_catalog(), "SELECT FROM orders WHERE date = 20200101");
    assert_eq!(query.uint_preds["date"], Interval::new(20200101, 20200101));
}

/// A second IN on the same property is rejected.
#[test]
fn test_duplicate_set_predicate() {
    let catalog = orders_catalog();
    let err = compile(
        "SELECT FROM orders WHERE color IN (1,2) AND color IN (3)",
        &catalog,
        &CompilerConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), CompileErrorCode::AeroCqlDuplicateConjunctPredicate);
    assert_eq!(err.property(), Some("color"));
}

#[test]
fn test_duplicate_substring_predicate() {
    assert_eq!(
        error_code(
            &orders_catalog(),
            r#"SELECT FROM orders WHERE name CONTAINS "a" AND name CONTAINS "b""#
        ),
        CompileErrorCode::AeroCqlDuplicateConjunctPredicate
    );
}

#[test]
fn test_mixed_predicates() {
    let query = select(
        &orders_catalog(),
        r#"select from orders where color in (3, 1, 3) and name contains "pen" and date <= 5"#,
    );
    assert_eq!(
        query.enum_preds["color"].values.iter().copied().collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert_eq!(query.str_preds["name"].pattern, "pen");
    assert_eq!(query.uint_preds["date"], Interval::new(0, 5));
}

#[test]
fn test_predicate_kind_checked() {
    let catalog = orders_catalog();
    assert_eq!(
        error_code(&catalog, "SELECT FROM orders WHERE name IN (1)"),
        CompileErrorCode::AeroCqlUnknownProperty
    );
    assert_eq!(
        error_code(&catalog, "SELECT FROM orders WHERE weight > 1"),
        CompileErrorCode::AeroCqlUnknownProperty
    );
    assert_eq!(
        error_code(&catalog, "SELECT FROM nowhere"),
        CompileErrorCode::AeroCqlSchemaNotFound
    );
}

// =============================================================================
// ORDER BY / LIMIT Tests
// =============================================================================

/// One range predicate and no ORDER BY: order by it, default limit.
#[test]
fn test_default_ordering() {
    let query = select(&orders_catalog(), "SELECT FROM orders WHERE price>0");
    assert_eq!(query.order_by.as_deref(), Some("price"));
    assert_eq!(query.limit, Some(100));
}

#[test]
fn test_default_limit_from_config() {
    let catalog = orders_catalog();
    let config = CompilerConfig { default_limit: 3 };
    let cmd = Compiler::new(&catalog, &config)
        .compile("SELECT FROM orders WHERE date > 1 AND price > 1")
        .unwrap();
    let Command::Select(query) = cmd else {
        panic!("expected select");
    };
    assert_eq!(query.order_by.as_deref(), Some("date"));
    assert_eq!(query.limit, Some(3));
}

#[test]
fn test_explicit_order_and_limit() {
    let query = select(
        &orders_catalog(),
        "SELECT FROM orders WHERE date > 1 AND price > 1 ORDER BY price LIMIT 10",
    );
    assert_eq!(query.order_by.as_deref(), Some("price"));
    assert_eq!(query.limit, Some(10));
}

/// ORDER BY alone still gets the default limit.
#[test]
fn test_order_by_without_limit_uses_default_limit() {
    let query = select(
        &orders_catalog(),
        "SELECT FROM orders WHERE date > 1 AND price > 1 ORDER BY price",
    );
    assert_eq!(query.order_by.as_deref(), Some("price"));
    assert_eq!(query.limit, Some(100));
}

/// LIMIT alone orders by the first range predicate.
#[test]
fn test_limit_without_order_by_uses_first_range_property() {
    let query = select(
        &orders_catalog(),
        "SELECT FROM orders WHERE date > 1 AND price > 1 LIMIT 7",
    );
    assert_eq!(query.order_by.as_deref(), Some("date"));
    assert_eq!(query.limit, Some(7));
}

/// ORDER BY on a property without a range predicate is rejected.
#[test]
fn test_invalid_order_by() {
    assert_eq!(
        error_code(&orders_catalog(), "SELECT FROM orders WHERE color IN (1) ORDER BY color"),
        CompileErrorCode::AeroCqlInvalidOrderBy
    );
    assert_eq!(
        error_code(&orders_catalog(), "SELECT FROM orders WHERE price > 1 ORDER BY date"),
        CompileErrorCode::AeroCqlInvalidOrderBy
    );
    assert_eq!(
        error_code(&orders_catalog(), "SELECT FROM orders LIMIT 5"),
        CompileErrorCode::AeroCqlInvalidOrderBy
    );
}

#[test]
fn test_no_range_predicate_leaves_order_unset() {
    let query = select(&orders_catalog(), "SELECT FROM orders WHERE color IN (2)");
    assert!(query.order_by.is_none());
    assert!(query.limit.is_none());
    assert!(!Command::Select(query).is_mutation());
}

// =============================================================================
// Syntax & Catalog Tests
// =============================================================================

#[test]
fn test_syntax_error_carries_position() {
    let err = compile(
        "CREATE orders (price UINT12)",
        &SchemaCatalog::new(),
        &CompilerConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), CompileErrorCode::AeroCqlSyntaxError);
    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.line, 1);
    assert!(diagnostic.column > 1);
    assert!(err.to_string().starts_with("[REJECT] AERO_CQL_SYNTAX_ERROR"));
}

/// A catalog saved to disk compiles the same statements after reload.
#[test]
fn test_catalog_persists_across_reload() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("schemas.json");
    orders_catalog().save(&path).unwrap();

    let reloaded = SchemaCatalog::load(&path).unwrap();
    let query = select(&reloaded, "SELECT FROM orders WHERE price>10 AND price<100");
    assert_eq!(query.uint_preds["price"], Interval::new(11, 99));
}

/// Commands serialize with a kind tag.
#[test]
fn test_command_json() {
    let query = select(&orders_catalog(), "SELECT FROM orders WHERE price>0");
    let json = serde_json::to_value(Command::Select(query)).unwrap();
    assert_eq!(json["kind"], "select");
    assert_eq!(json["uint_preds"]["price"]["low"], 1);
    assert_eq!(json["limit"], 100);
}
