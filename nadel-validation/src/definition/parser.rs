//! Reads Nadel directive applications into definitions.
//!
//! Parsers only check what the overall schema's own validation cannot: the shape of
//! `NadelJSON` values and the syntax of dotted paths. Everything else is left to validation.

use apollo_compiler::Name;
use apollo_compiler::ast::Directive;
use apollo_compiler::ast::Value;

use super::hydration::NadelHydrationArgumentDefinition;
use super::hydration::NadelHydrationArgumentValue;
use super::hydration::NadelHydrationCondition;
use super::hydration::NadelHydrationConditionPredicate;
use super::hydration::NadelHydrationDefinition;
use crate::directives::CONDITION_PREDICATE_FIELD;
use crate::directives::CONDITION_RESULT_FIELD;
use crate::directives::CONDITION_SOURCE_FIELD_FIELD;
use crate::directives::HYDRATED_ARGUMENTS_ARGUMENT_NAME;
use crate::directives::HYDRATED_BATCH_SIZE_ARGUMENT_NAME;
use crate::directives::HYDRATED_FIELD_ARGUMENT_NAME;
use crate::directives::HYDRATED_IDENTIFIED_BY_ARGUMENT_NAME;
use crate::directives::HYDRATED_INDEXED_ARGUMENT_NAME;
use crate::directives::HYDRATED_SERVICE_ARGUMENT_NAME;
use crate::directives::HYDRATED_TIMEOUT_ARGUMENT_NAME;
use crate::directives::HYDRATED_WHEN_ARGUMENT_NAME;
use crate::directives::HYDRATION_ARGUMENT_NAME_FIELD;
use crate::directives::HYDRATION_ARGUMENT_PREFIX;
use crate::directives::HYDRATION_ARGUMENT_VALUE_FIELD;
use crate::directives::HYDRATION_SOURCE_PREFIX;
use crate::directives::PARTITION_PATH_ARGUMENT_NAME;
use crate::directives::PREDICATE_EQUALS;
use crate::directives::PREDICATE_MATCHES;
use crate::directives::PREDICATE_STARTS_WITH;
use crate::directives::RENAMED_FROM_ARGUMENT_NAME;

/// `@renamed(from: "a.b")`, as a path of one or more field names.
pub(crate) fn parse_renamed(directive: &Directive) -> Result<Vec<Name>, String> {
    let from = directive
        .specified_argument_by_name(&RENAMED_FROM_ARGUMENT_NAME)
        .and_then(|value| value.as_str())
        .ok_or_else(|| format!("`{RENAMED_FROM_ARGUMENT_NAME}` must be a string"))?;
    parse_path(from)
}

/// `@renamed(from: "Name")` on a type. Type renames have no path.
pub(crate) fn parse_type_renamed(directive: &Directive) -> Result<Name, String> {
    match parse_renamed(directive)?.as_slice() {
        [name] => Ok(name.clone()),
        _ => Err("a type can only be renamed from a single type name".to_owned()),
    }
}

/// `@partition(pathToPartitionArg: ["filter", "ids"])`
pub(crate) fn parse_partition(directive: &Directive) -> Result<Vec<Name>, String> {
    let path = directive
        .specified_argument_by_name(&PARTITION_PATH_ARGUMENT_NAME)
        .and_then(|value| value.as_list())
        .ok_or_else(|| format!("`{PARTITION_PATH_ARGUMENT_NAME}` must be a list of strings"))?;
    if path.is_empty() {
        return Err(format!("`{PARTITION_PATH_ARGUMENT_NAME}` must not be empty"));
    }
    path.iter()
        .map(|segment| {
            segment
                .as_str()
                .ok_or_else(|| format!("`{PARTITION_PATH_ARGUMENT_NAME}` must be a list of strings"))
                .and_then(parse_name)
        })
        .collect()
}

pub(crate) fn parse_hydrated(directive: &Directive) -> Result<NadelHydrationDefinition, String> {
    let mut service_name = None;
    let mut actor_field_path = None;
    let mut arguments = Vec::new();
    let mut identified_by = None;
    let mut is_indexed = false;
    let mut batch_size = None;
    let mut timeout = None;
    let mut condition = None;

    for arg in &directive.arguments {
        let arg_name = &arg.name;
        let value: &Value = &arg.value;
        if matches!(value, Value::Null) {
            continue;
        }

        if *arg_name == HYDRATED_SERVICE_ARGUMENT_NAME {
            service_name = Some(expect_str(arg_name, value)?.to_owned());
        } else if *arg_name == HYDRATED_FIELD_ARGUMENT_NAME {
            actor_field_path = Some(parse_path(expect_str(arg_name, value)?)?);
        } else if *arg_name == HYDRATED_ARGUMENTS_ARGUMENT_NAME {
            let list = value
                .as_list()
                .ok_or_else(|| format!("`{arg_name}` must be a list"))?;
            arguments = list
                .iter()
                .map(|argument| parse_hydration_argument(argument))
                .collect::<Result<_, _>>()?;
        } else if *arg_name == HYDRATED_IDENTIFIED_BY_ARGUMENT_NAME {
            identified_by = Some(expect_str(arg_name, value)?.to_owned());
        } else if *arg_name == HYDRATED_INDEXED_ARGUMENT_NAME {
            is_indexed = value
                .to_bool()
                .ok_or_else(|| format!("`{arg_name}` must be a boolean"))?;
        } else if *arg_name == HYDRATED_BATCH_SIZE_ARGUMENT_NAME {
            let size = value
                .to_i32()
                .ok_or_else(|| format!("`{arg_name}` must be an integer"))?;
            batch_size = Some(
                u32::try_from(size)
                    .ok()
                    .filter(|size| *size > 0)
                    .ok_or_else(|| format!("`{arg_name}` must be positive"))?,
            );
        } else if *arg_name == HYDRATED_TIMEOUT_ARGUMENT_NAME {
            timeout = Some(
                value
                    .to_i32()
                    .ok_or_else(|| format!("`{arg_name}` must be an integer"))?,
            );
        } else if *arg_name == HYDRATED_WHEN_ARGUMENT_NAME {
            condition = Some(parse_condition(value)?);
        }
    }

    Ok(NadelHydrationDefinition {
        service_name,
        actor_field_path: actor_field_path
            .ok_or_else(|| format!("`{HYDRATED_FIELD_ARGUMENT_NAME}` is required"))?,
        arguments,
        identified_by,
        is_indexed,
        batch_size,
        timeout,
        condition,
    })
}

fn parse_hydration_argument(value: &Value) -> Result<NadelHydrationArgumentDefinition, String> {
    let fields = value
        .as_object()
        .ok_or_else(|| "hydration arguments must be objects".to_owned())?;
    let name = object_field(fields, HYDRATION_ARGUMENT_NAME_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("hydration argument `{HYDRATION_ARGUMENT_NAME_FIELD}` must be a string"))
        .and_then(parse_name)?;
    let value = object_field(fields, HYDRATION_ARGUMENT_VALUE_FIELD)
        .ok_or_else(|| format!("hydration argument `{name}` has no `{HYDRATION_ARGUMENT_VALUE_FIELD}`"))?;

    let text = value.as_str();
    let value = if let Some(path) = text.and_then(|s| s.strip_prefix(HYDRATION_SOURCE_PREFIX)) {
        NadelHydrationArgumentValue::FieldResultValue {
            path: parse_path(path)?,
        }
    } else if let Some(argument) = text.and_then(|s| s.strip_prefix(HYDRATION_ARGUMENT_PREFIX))
    {
        NadelHydrationArgumentValue::ArgumentValue {
            name: parse_name(argument)?,
        }
    } else {
        NadelHydrationArgumentValue::StaticValue(to_json(value)?)
    };
    Ok(NadelHydrationArgumentDefinition { name, value })
}

fn parse_condition(value: &Value) -> Result<NadelHydrationCondition, String> {
    let result = value
        .as_object()
        .and_then(|fields| object_field(fields, CONDITION_RESULT_FIELD))
        .and_then(Value::as_object)
        .ok_or_else(|| format!("`{HYDRATED_WHEN_ARGUMENT_NAME}` must have a `{CONDITION_RESULT_FIELD}` object"))?;
    let source_field = object_field(result, CONDITION_SOURCE_FIELD_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("`{CONDITION_SOURCE_FIELD_FIELD}` must be a string"))
        .and_then(parse_path)?;
    let predicates = object_field(result, CONDITION_PREDICATE_FIELD)
        .and_then(Value::as_object)
        .ok_or_else(|| format!("`{CONDITION_PREDICATE_FIELD}` must be an object"))?;

    let mut predicate = None;
    for (name, value) in predicates {
        if matches!(**value, Value::Null) {
            continue;
        }
        if predicate.is_some() {
            return Err(format!("`{CONDITION_PREDICATE_FIELD}` must have exactly one field"));
        }
        predicate = Some(match name.as_str() {
            PREDICATE_EQUALS => NadelHydrationConditionPredicate::Equals(to_json(value)?),
            PREDICATE_STARTS_WITH => {
                NadelHydrationConditionPredicate::StartsWith(expect_str(name, value)?.to_owned())
            }
            PREDICATE_MATCHES => {
                NadelHydrationConditionPredicate::Matches(expect_str(name, value)?.to_owned())
            }
            other => return Err(format!("unknown predicate `{other}`")),
        });
    }

    Ok(NadelHydrationCondition {
        source_field,
        predicate: predicate
            .ok_or_else(|| format!("`{CONDITION_PREDICATE_FIELD}` must have exactly one field"))?,
    })
}

fn object_field<'a>(
    fields: &'a [(Name, apollo_compiler::Node<Value>)],
    name: &str,
) -> Option<&'a Value> {
    fields
        .iter()
        .find(|(field_name, _)| field_name.as_str() == name)
        .map(|(_, value)| &**value)
}

fn expect_str<'a>(name: &Name, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("`{name}` must be a string"))
}

fn parse_path(path: &str) -> Result<Vec<Name>, String> {
    path.split('.').map(parse_name).collect()
}

fn parse_name(name: &str) -> Result<Name, String> {
    Name::new(name).map_err(|_| format!("`{name}` is not a valid GraphQL name"))
}

/// Converts a literal into the JSON the execution engine will send.
fn to_json(value: &Value) -> Result<serde_json::Value, String> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Enum(name) => serde_json::Value::String(name.to_string()),
        Value::Int(i) => {
            let int: i64 = i
                .to_string()
                .parse()
                .map_err(|_| format!("`{i}` is out of range"))?;
            int.into()
        }
        Value::Float(f) => {
            let float: f64 = f
                .to_string()
                .parse()
                .map_err(|_| format!("`{f}` is not a valid float"))?;
            serde_json::Number::from_f64(float)
                .map(serde_json::Value::Number)
                .ok_or_else(|| format!("`{f}` is not a finite float"))?
        }
        Value::List(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json(item))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(name, value)| Ok((name.to_string(), to_json(value)?)))
                .collect::<Result<_, String>>()?,
        ),
        Value::Variable(name) => return Err(format!("variable `${name}` is not allowed here")),
    })
}

#[cfg(test)]
mod tests {
    use apollo_compiler::Node;
    use apollo_compiler::ast;
    use apollo_compiler::name;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn directive(sdl: &str) -> Node<Directive> {
        let source = format!("type T {{ f: Int {sdl} }}");
        let document = ast::Document::parse(source, "directive.graphql").unwrap();
        let Some(ast::Definition::ObjectTypeDefinition(ty)) = document.definitions.first() else {
            panic!("expected an object type");
        };
        ty.fields[0].directives[0].clone()
    }

    #[test]
    fn parses_renames_and_deep_renames() {
        assert_eq!(
            parse_renamed(&directive(r#"@renamed(from: "title")"#)).unwrap(),
            vec![name!("title")]
        );
        assert_eq!(
            parse_renamed(&directive(r#"@renamed(from: "details.title")"#)).unwrap(),
            vec![name!("details"), name!("title")]
        );
        assert!(parse_renamed(&directive(r#"@renamed(from: "details..title")"#)).is_err());
        assert!(parse_type_renamed(&directive(r#"@renamed(from: "a.b")"#)).is_err());
    }

    #[test]
    fn parses_partition_paths() {
        assert_eq!(
            parse_partition(&directive(r#"@partition(pathToPartitionArg: ["filter", "ids"])"#))
                .unwrap(),
            vec![name!("filter"), name!("ids")]
        );
        assert!(parse_partition(&directive("@partition(pathToPartitionArg: [])")).is_err());
    }

    #[test]
    fn parses_hydration_bindings() {
        let hydration = parse_hydrated(&directive(
            r#"@hydrated(
                service: "users"
                field: "users.byIds"
                arguments: [
                    { name: "ids", value: "$source.ownerId" }
                    { name: "locale", value: "$argument.lang" }
                    { name: "limit", value: 10 }
                    { name: "filter", value: { active: true, tags: ["a", B] } }
                ]
                identifiedBy: "id"
                batchSize: 50
                timeout: 1000
            )"#,
        ))
        .unwrap();

        assert_eq!(
            hydration,
            NadelHydrationDefinition {
                service_name: Some("users".to_owned()),
                actor_field_path: vec![name!("users"), name!("byIds")],
                arguments: vec![
                    NadelHydrationArgumentDefinition {
                        name: name!("ids"),
                        value: NadelHydrationArgumentValue::FieldResultValue {
                            path: vec![name!("ownerId")],
                        },
                    },
                    NadelHydrationArgumentDefinition {
                        name: name!("locale"),
                        value: NadelHydrationArgumentValue::ArgumentValue {
                            name: name!("lang"),
                        },
                    },
                    NadelHydrationArgumentDefinition {
                        name: name!("limit"),
                        value: NadelHydrationArgumentValue::StaticValue(json!(10)),
                    },
                    NadelHydrationArgumentDefinition {
                        name: name!("filter"),
                        value: NadelHydrationArgumentValue::StaticValue(
                            json!({ "active": true, "tags": ["a", "B"] })
                        ),
                    },
                ],
                identified_by: Some("id".to_owned()),
                is_indexed: false,
                batch_size: Some(50),
                timeout: Some(1000),
                condition: None,
            }
        );
    }

    #[test]
    fn parses_hydration_conditions() {
        let hydration = parse_hydrated(&directive(
            r#"@hydrated(
                field: "user"
                arguments: [{ name: "id", value: "$source.ownerId" }]
                when: { result: { sourceField: "type", predicate: { startsWith: "user/" } } }
            )"#,
        ))
        .unwrap();
        assert_eq!(
            hydration.condition,
            Some(NadelHydrationCondition {
                source_field: vec![name!("type")],
                predicate: NadelHydrationConditionPredicate::StartsWith("user/".to_owned()),
            })
        );
    }

    #[test]
    fn rejects_ambiguous_predicates() {
        let error = parse_hydrated(&directive(
            r#"@hydrated(
                field: "user"
                when: { result: { sourceField: "type", predicate: { equals: "a", matches: "b" } } }
            )"#,
        ))
        .unwrap_err();
        assert_eq!(error, "`predicate` must have exactly one field");
    }

    #[test]
    fn requires_an_actor_field() {
        let error = parse_hydrated(&directive(r#"@hydrated(service: "users")"#)).unwrap_err();
        assert_eq!(error, "`field` is required");
    }
}
