use insta::assert_snapshot;
use nadel_validation::NadelSchemaValidation;
use nadel_validation::NadelSchemas;
use nadel_validation::NadelSchemasError;
use nadel_validation::NadelValidationConfig;
use nadel_validation::schema::NadelServiceSchemaElementRef;
use pretty_assertions::assert_eq;

use crate::test_helpers::error_codes;
use crate::test_helpers::error_messages;
use crate::test_helpers::instructions;
use crate::test_helpers::schemas;
use crate::test_helpers::validate;

#[test]
fn valid_service_yields_instructions() {
    let result = validate(&[(
        "issues",
        r#"
        type Query {
          issue(id: ID!): Issue
          issues: [Issue]
        }
        type Issue @renamed(from: "Ticket") {
          id: ID!
          title: String @renamed(from: "summary")
          status: Status
          reporterName: String @renamed(from: "reporter.name")
          legacy: String @stubbed
        }
        enum Status { OPEN CLOSED }
        "#,
        r#"
        type Query {
          issue(id: ID!): Ticket
          issues: [Ticket!]!
        }
        type Ticket {
          id: ID!
          summary: String!
          status: Status
          reporter: Reporter
        }
        type Reporter { name: String! }
        enum Status { OPEN CLOSED REOPENED }
        "#,
    )]);

    assert!(!result.is_error(), "{}", error_messages(&result));
    assert_snapshot!(instructions(&result), @r###"
    [issues] rename field Issue.title <- summary
    [issues] deep rename field Issue.reporterName <- reporter.name
    [issues] stub field Issue.legacy
    [issues] rename type Issue <- Ticket
    "###);
}

#[test]
fn missing_underlying_type() {
    let result = validate(&[(
        "comments",
        "type Query { comment: Comment } type Comment { id: ID }",
        "type Query { comment: Note } type Note { id: ID }",
    )]);
    assert_snapshot!(error_messages(&result), @r###"
    Field `Query.comment` has output type `Comment` which is not compatible with underlying type `Note` in service `comments`
    Could not find underlying type `Comment` for overall type `Comment` in service `comments`
    "###);
}

#[test]
fn two_overall_types_backed_by_one_underlying_type() {
    let result = validate(&[(
        "things",
        r#"
        type Query { a: A b: B }
        type A @renamed(from: "X") { id: ID }
        type B @renamed(from: "X") { id: ID }
        "#,
        "type Query { a: X b: X } type X { id: ID }",
    )]);
    assert_snapshot!(
        error_messages(&result),
        @"Overall types `A`, `B` all map to the same underlying type `X` in service `things`"
    );
}

#[test]
fn kinds_must_match() {
    let result = validate(&[(
        "nodes",
        "type Query { node: Node } type Node { id: ID }",
        r#"
        type Query { node: Node }
        interface Node { id: ID }
        type Leaf implements Node { id: ID }
        "#,
    )]);
    assert_snapshot!(
        error_messages(&result),
        @"Overall object `Node` is backed by interface `Node` in service `nodes`, the kinds must match"
    );
}

#[test]
fn checks_each_kind_of_type() {
    let result = validate(&[(
        "search",
        r#"
        type Query { search(filter: Filter): [Result] }
        interface Entity { id: ID }
        type Result implements Entity { id: ID kind: Kind }
        enum Kind { A B C }
        input Filter { kind: Kind text: String limit: Int! }
        "#,
        r#"
        type Query { search(filter: Filter): [Result] }
        interface Entity { id: ID }
        type Result { id: ID kind: Kind }
        enum Kind { A B }
        input Filter { kind: Kind text: String! }
        "#,
    )]);
    assert_eq!(
        error_codes(&result),
        [
            "MissingUnderlyingInterfaceImplementation",
            "MissingUnderlyingEnumValue",
            "IncompatibleInputFieldType",
            "MissingUnderlyingInputField",
        ]
    );
}

#[test]
fn shared_service_is_only_validated_through_its_users() {
    let schemas = schemas(&[
        (
            "shared",
            "type Query { health: String } type Money { amount: Int currency: String }",
            "type Query { health: String }",
        ),
        (
            "billing",
            "extend type Query { invoice: Invoice } type Invoice { total: Money }",
            r#"
            type Query { invoice: Invoice }
            type Invoice { total: Money }
            type Money { amount: Int currency: String }
            "#,
        ),
    ]);
    let run = NadelSchemaValidation::new(&schemas).run();

    assert!(!run.result.is_error(), "{}", error_messages(&run.result));
    let visited = run
        .visited
        .iter()
        .map(|NadelServiceSchemaElementRef { service, overall, underlying }| {
            format!("{service}:{overall}:{underlying}")
        })
        .collect::<Vec<_>>();
    assert_eq!(
        visited,
        ["billing:Query:Query", "billing:Invoice:Invoice", "billing:Money:Money"]
    );
}

#[test]
fn types_with_only_hidden_fields() {
    let services = [(
        "accounts",
        r#"
        type Query { me: Account }
        type Account { secret: String @hidden token: String @hidden }
        "#,
        "type Query { me: Account } type Account { secret: String token: String }",
    )];

    let result = validate(&services);
    assert_eq!(error_codes(&result), ["AllFieldsUsingHiddenDirective"]);

    let schemas = schemas(&services);
    let lenient = NadelSchemaValidation::new(&schemas)
        .with_config(NadelValidationConfig {
            reject_all_hidden_types: false,
            ..Default::default()
        })
        .validate();
    assert!(!lenient.is_error(), "{}", error_messages(&lenient));
}

#[test]
fn namespaced_fields_return_objects() {
    let result = validate(&[(
        "issues",
        r#"
        type Query {
          issues: IssueQueries @namespaced
          tag: String @namespaced
        }
        type IssueQueries { byId(id: ID!): String }
        "#,
        r#"
        type Query { issues: IssueQueries tag: String }
        type IssueQueries { byId(id: ID!): String }
        "#,
    )]);
    assert_snapshot!(
        error_messages(&result),
        @"Namespaced field `Query.tag` must return an object type but returns `String`"
    );
}

#[test]
fn namespace_fields_belong_to_their_declaring_service() {
    let result = validate(&[
        (
            "issues",
            r#"
            type Query { jira: JiraQueries @namespaced }
            type JiraQueries { issue(id: ID!): String }
            "#,
            r#"
            type Query { jira: JiraQueries }
            type JiraQueries { issue(id: ID!): String }
            "#,
        ),
        (
            "boards",
            "extend type JiraQueries { board(id: ID!): String }",
            r#"
            type Query { jira: JiraQueries }
            type JiraQueries { board(id: ID!): String }
            "#,
        ),
    ]);
    assert!(!result.is_error(), "{}", error_messages(&result));
}

#[test]
fn reports_schema_assembly_failures() {
    let duplicated = NadelSchemas::builder()
        .service("a", "type Query { a: Int }", "type Query { a: Int }")
        .service("a", "extend type Query { b: Int }", "type Query { b: Int }")
        .build();
    assert!(matches!(
        duplicated,
        Err(NadelSchemasError::DuplicatedService { service }) if service == "a"
    ));

    let invalid = NadelSchemas::builder()
        .service("a", "type Query { a: Int }", "type Query { a: Missing }")
        .build();
    assert!(matches!(
        invalid,
        Err(NadelSchemasError::InvalidUnderlyingSchema { service, .. }) if service == "a"
    ));
}

#[test]
fn shared_input_types_are_validated_once() {
    let fields = (0..10)
        .map(|index| format!("f{index}(filter: Filter): Int"))
        .collect::<Vec<_>>()
        .join("\n");
    let sdl = format!("type Query {{ {fields} }} input Filter {{ text: String }}");
    let schemas = schemas(&[("search", &sdl, &sdl)]);
    let run = NadelSchemaValidation::new(&schemas).run();

    assert!(!run.result.is_error(), "{}", error_messages(&run.result));
    assert_eq!(run.visited.len(), 2);
}
