//! Tests for the `#[derive(Record)]` macro output.
//!
//! These tests verify that the derive macro generates:
//! - the table name, from `#[record(table = ..)]` or the struct name
//! - one `FieldDef` per field, in declaration order
//! - statically resolved semantic types, with `Option<T>` unwrapped
//! - probed types for paths it does not recognise

use automigrate_core::kind::{FieldType, SemanticType};
use automigrate_core::prelude::*;
use automigrate_derive::Record;
use chrono::{DateTime, NaiveDateTime, Utc};

// =============================================================================
// Test: explicit table name, renamed columns
// =============================================================================

#[allow(dead_code)]
#[derive(Debug, Clone, Record)]
#[record(table = "People")]
pub struct Person {
    #[column(key, name = "Id")]
    pub id: i32,
    #[column(required, name = "Name")]
    pub name: String,
    #[column(name = "Age")]
    pub age: i32,
}

#[test]
fn test_person_table_name() {
    assert_eq!(Person::TABLE, "People");
    assert_eq!(Person::TYPE_NAME, "Person");
}

#[test]
fn test_person_fields_in_order() {
    let names: Vec<&str> = Person::FIELDS.iter().map(|f| f.name.as_ref()).collect();
    assert_eq!(names, vec!["Id", "Name", "Age"]);
}

#[test]
fn test_person_markers() {
    let schema = Person::schema();
    let id = schema.field("Id").unwrap();
    assert!(id.key);
    assert!(!id.required);
    assert!(schema.field("Name").unwrap().required);
    assert!(!schema.field("Age").unwrap().not_mapped);
}

#[test]
fn test_person_rust_types() {
    assert_eq!(Person::FIELDS[0].rust_type, "i32");
    assert_eq!(Person::FIELDS[1].rust_type, "String");
}

#[test]
fn test_person_extracts() {
    let desired = extract(&Person::schema(), &SqlServerDialect::new()).unwrap();
    assert_eq!(desired.key, "Id");
    assert_eq!(desired.field("Name").unwrap().kind, ColumnKind::Text);
    assert_eq!(desired.field("Age").unwrap().kind, ColumnKind::Integer);
}

// =============================================================================
// Test: default table name, every recognised type
// =============================================================================

#[allow(dead_code)]
#[derive(Debug, Clone, Record)]
pub struct Sample {
    #[column(key)]
    pub id: i64,
    pub text: String,
    pub optional_text: Option<String>,
    pub byte: u8,
    pub small: i16,
    pub big: u64,
    pub single: f32,
    pub double: f64,
    pub flag: bool,
    pub created: NaiveDateTime,
    pub updated: Option<DateTime<Utc>>,
    pub payload: Vec<u8>,
}

fn semantic(schema: &RecordSchema, name: &str) -> SemanticType {
    schema.field(name).unwrap().semantic_type()
}

#[test]
fn test_sample_default_table_name() {
    assert_eq!(Sample::TABLE, "Sample");
}

#[test]
fn test_sample_types_resolved_statically() {
    let schema = Sample::schema();
    assert_eq!(semantic(&schema, "text"), SemanticType::Text);
    assert_eq!(semantic(&schema, "optional_text"), SemanticType::Text);
    assert_eq!(semantic(&schema, "byte"), SemanticType::Byte);
    assert_eq!(semantic(&schema, "small"), SemanticType::Int);
    assert_eq!(semantic(&schema, "big"), SemanticType::Long);
    assert_eq!(semantic(&schema, "single"), SemanticType::Float);
    assert_eq!(semantic(&schema, "double"), SemanticType::Double);
    assert_eq!(semantic(&schema, "flag"), SemanticType::Bool);
    assert_eq!(semantic(&schema, "created"), SemanticType::DateTime);
    assert_eq!(semantic(&schema, "updated"), SemanticType::DateTime);
    assert_eq!(semantic(&schema, "payload"), SemanticType::Bytes);
    assert!(schema
        .fields
        .iter()
        .all(|f| matches!(f.ty, FieldType::Known(_))));
}

#[test]
fn test_sample_nullability_policy() {
    let desired = extract(&Sample::schema(), &SqliteDialect::new()).unwrap();
    assert!(!desired.field("optional_text").unwrap().required);
    assert!(!desired.field("text").unwrap().required);
    assert!(desired.field("updated").unwrap().required);
    assert_eq!(desired.field("payload").unwrap().kind, ColumnKind::Blob);
}

// =============================================================================
// Test: not_mapped fields and probed types
// =============================================================================

pub type Money = f64;

#[derive(Debug, Clone, Default)]
pub struct Tags(pub Vec<String>);

#[allow(dead_code)]
#[derive(Debug, Clone, Record)]
#[record(table = "Orders")]
pub struct Order {
    #[column(key)]
    pub id: i32,
    pub total: Money,
    pub tags: Tags,
    #[column(not_mapped)]
    pub cached_label: String,
}

#[test]
fn test_order_alias_is_probed() {
    let schema = Order::schema();
    let total = schema.field("total").unwrap();
    assert!(matches!(total.ty, FieldType::Probed(_)));
    assert_eq!(total.semantic_type(), SemanticType::Double);
}

#[test]
fn test_order_unknown_type_is_excluded() {
    let desired = extract(&Order::schema(), &SqlServerDialect::new()).unwrap();
    assert!(!desired.contains("tags"));
    assert!(!desired.contains("cached_label"));
    let names: Vec<&str> = desired.column_names().collect();
    assert_eq!(names, vec!["id", "total"]);
}

// =============================================================================
// Test: key count is checked at extraction time
// =============================================================================

#[allow(dead_code)]
#[derive(Debug, Clone, Record)]
pub struct Keyless {
    pub name: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Record)]
pub struct DoubleKeyed {
    #[column(key)]
    pub id: i32,
    #[column(key)]
    pub code: i32,
}

#[test]
fn test_keyless_fails() {
    let err = extract(&Keyless::schema(), &SqliteDialect::new()).unwrap_err();
    assert!(matches!(err, SchemaError::NoKeyDefined { type_name } if type_name == "Keyless"));
}

#[test]
fn test_double_keyed_fails() {
    let err = extract(&DoubleKeyed::schema(), &SqliteDialect::new()).unwrap_err();
    assert!(matches!(err, SchemaError::MultipleKeys { fields, .. } if fields == ["id", "code"]));
}

// =============================================================================
// Test: date-like names outside the last path segment are not dates
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MyDateTimeRange {
    pub start: i64,
    pub end: i64,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Record)]
pub struct Booking {
    #[column(key)]
    pub id: i32,
    pub starts: chrono::DateTime<Utc>,
    pub window: MyDateTimeRange,
    pub history: Vec<DateTime<Utc>>,
}

#[test]
fn test_booking_dates_resolve_by_last_segment() {
    let schema = Booking::schema();
    assert!(matches!(
        schema.field("starts").unwrap().ty,
        FieldType::Known(SemanticType::DateTime)
    ));
    for name in ["window", "history"] {
        let field = schema.field(name).unwrap();
        assert!(matches!(field.ty, FieldType::Probed(_)), "{name}");
        assert_eq!(field.semantic_type(), SemanticType::Other, "{name}");
    }

    let desired = extract(&schema, &SqlServerDialect::new()).unwrap();
    let names: Vec<&str> = desired.column_names().collect();
    assert_eq!(names, vec!["id", "starts"]);
}
