use insta::assert_snapshot;
use nadel_validation::NadelSchemaValidationResult;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::test_helpers::Service;
use crate::test_helpers::error_codes;
use crate::test_helpers::error_messages;
use crate::test_helpers::instructions;
use crate::test_helpers::validate;

const USERS: Service<'static> = (
    "users",
    r#"
    extend type Query {
      user(id: ID!): User
      users(ids: [ID!]!): [User]
      bot(id: ID!): Bot
      userByRef(ref: UserRef!): User
      userByRank(rank: Int!, region: String!): User
    }
    type User { id: ID! name: String }
    type Bot { id: ID! }
    input UserRef { id: ID! region: String! }
    "#,
    r#"
    type Query {
      user(id: ID!): User
      users(ids: [ID!]!): [User]
      bot(id: ID!): Bot
      userByRef(ref: UserRef!): User
      userByRank(rank: Int!, region: String!): User
    }
    type User { id: ID! name: String }
    type Bot { id: ID! }
    input UserRef { id: ID! region: String! }
    "#,
);

fn validate_issues(overall_issue: &str, underlying_issue: &str) -> NadelSchemaValidationResult {
    let overall = format!("type Query {{ issue(id: ID!): Issue }}\n{overall_issue}");
    let underlying = format!("type Query {{ issue(id: ID!): Issue }}\n{underlying_issue}");
    validate(&[("issues", &overall, &underlying), USERS])
}

#[test]
fn single_and_batch_hydrations() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          owner: User @hydrated(service: "users", field: "user", arguments: [{ name: "id", value: "$source.ownerId" }])
          watchers: [User]
            @hydrated(
              service: "users"
              field: "users"
              arguments: [{ name: "ids", value: "$source.watcherIds" }]
              identifiedBy: "id"
              batchSize: 50
            )
          reviewer: User @hydrated(field: "user", arguments: [{ name: "id", value: "$source.ownerId" }])
        }
        "#,
        "type Issue { id: ID! ownerId: ID watcherIds: [ID!] }",
    );

    assert!(!result.is_error(), "{}", error_messages(&result));
    assert_snapshot!(instructions(&result), @r###"
    [issues] hydrate field Issue.owner from users:user(id: $source.ownerId)
    [issues] hydrate field Issue.watchers from users:users(ids: $source.watcherIds) batched by 50
    [issues] hydrate field Issue.reviewer from users:user(id: $source.ownerId)
    "###);
}

#[test]
fn batch_size_defaults_to_the_configured_size() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          watchers: [User] @hydrated(field: "users", arguments: [{ name: "ids", value: "$source.watcherIds" }], indexed: true)
        }
        "#,
        "type Issue { id: ID! watcherIds: [ID!] }",
    );
    assert_snapshot!(
        instructions(&result),
        @"[issues] hydrate field Issue.watchers from users:users(ids: $source.watcherIds) batched by 200"
    );
}

#[test]
fn every_hydration_problem_is_reported() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          owner: User! @hydrated(service: "people", field: "user", arguments: [{ name: "id", value: "$source.ownerId" }])
          reviewer: User @hydrated(service: "users", field: "userByEmail", arguments: [{ name: "id", value: "$source.reviewerId" }])
          assignee: User
            @hydrated(
              service: "users"
              field: "user"
              arguments: [
                { name: "key", value: "$source.assigneeId" }
                { name: "id", value: "$source.missing" }
                { name: "id", value: "$argument.x" }
              ]
            )
          watchers: [User] @hydrated(service: "users", field: "users", arguments: [{ name: "ids", value: "$source.watcherIds" }])
        }
        "#,
        "type Issue { id: ID! ownerId: ID reviewerId: ID assigneeId: ID watcherIds: [ID!] }",
    );

    assert_eq!(
        error_codes(&result),
        [
            "HydrationFieldMustBeNullable",
            "MissingHydrationActorService",
            "MissingHydrationActorField",
            "NonExistentHydrationActorFieldArgument",
            "MissingHydrationFieldValueSource",
            "DuplicatedHydrationArgument",
            "BatchHydrationMissingIdentifiedBy",
        ]
    );
    assert_eq!(result.instructions().count(), 0);
}

#[test]
fn argument_values_must_fit_the_actor_arguments() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          byFlag: User @hydrated(service: "users", field: "user", arguments: [{ name: "id", value: "$source.flag" }])
          byRef: User @hydrated(service: "users", field: "userByRef", arguments: [{ name: "ref", value: "$source.ref" }])
          byRank(rank: Int): User @hydrated(service: "users", field: "userByRank", arguments: [{ name: "rank", value: "$argument.rank" }])
        }
        "#,
        r#"
        type Issue { id: ID! flag: Boolean ref: Ref }
        type Ref { id: ID! }
        "#,
    );

    assert_snapshot!(error_messages(&result), @r###"
    Hydrated field `Issue.byFlag` supplies `Boolean` to actor argument `id` of type `ID!`
    Hydrated field `Issue.byRef` supplies an object to actor argument `ref` but it has no field for required input field `UserRef.region`
    Hydrated field `Issue.byRank` supplies `Int` to actor argument `rank` of type `Int!`
    Hydrated field `Issue.byRank` does not bind required argument `region` of actor field `userByRank`
    "###);
}

#[test]
fn source_lists_may_feed_single_actor_arguments_and_back() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          watchers: [User] @hydrated(field: "user", arguments: [{ name: "id", value: "$source.watcherIds" }])
          owners: [User] @hydrated(field: "users", arguments: [{ name: "ids", value: "$source.ownerId" }], identifiedBy: "id")
          nullableItems: [User] @hydrated(field: "users", arguments: [{ name: "ids", value: "$source.looseIds" }], identifiedBy: "id")
        }
        "#,
        "type Issue { id: ID! ownerId: ID watcherIds: [ID] looseIds: [ID] }",
    );
    assert_snapshot!(
        error_messages(&result),
        @"Hydrated field `Issue.nullableItems` supplies `[ID]` to actor argument `ids` of type `[ID!]!`"
    );
}

#[test]
fn actor_output_must_fit_the_hydrated_field() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          owner: Issue @hydrated(field: "user", arguments: [{ name: "id", value: "$source.ownerId" }])
        }
        "#,
        "type Issue { id: ID! ownerId: ID }",
    );
    assert_snapshot!(
        error_messages(&result),
        @"Hydrated field `Issue.owner` cannot return `User` produced by actor field `user`"
    );
}

#[test]
fn polymorphic_hydration_into_a_union() {
    let result = validate_issues(
        r#"
        union Actor = User | Bot
        type Issue {
          id: ID!
          creator: Actor
            @hydrated(
              field: "user"
              arguments: [{ name: "id", value: "$source.creatorId" }]
              when: { result: { sourceField: "creatorId", predicate: { startsWith: "user/" } } }
            )
            @hydrated(
              field: "bot"
              arguments: [{ name: "id", value: "$source.creatorId" }]
              when: { result: { sourceField: "creatorId", predicate: { startsWith: "bot/" } } }
            )
        }
        "#,
        "type Issue { id: ID! creatorId: ID }",
    );

    assert!(!result.is_error(), "{}", error_messages(&result));
    assert_snapshot!(instructions(&result), @r###"
    [issues] hydrate field Issue.creator from users:user(id: $source.creatorId)
    [issues] hydrate field Issue.creator from users:bot(id: $source.creatorId)
    "###);
}

#[test]
fn polymorphic_hydrations_must_agree() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          labels: [String]
          creator: User
            @hydrated(
              field: "user"
              arguments: [{ name: "id", value: "$source.creatorId" }]
              when: { result: { sourceField: "labels", predicate: { equals: "bot" } } }
            )
            @hydrated(field: "users", arguments: [{ name: "ids", value: "$source.creatorId" }], identifiedBy: "id")
        }
        "#,
        "type Issue { id: ID! labels: [String] creatorId: ID }",
    );

    assert_eq!(
        error_codes(&result),
        [
            "HydrationConditionUnsupportedFieldType",
            "FieldWithPolymorphicHydrationMustReturnAUnion",
            "HydrationsMismatch",
            "SomeHydrationsHaveMissingConditions",
        ]
    );
}

#[rstest]
#[case::string_prefix(r#"{ sourceField: "code", predicate: { startsWith: "ab" } }"#, None)]
#[case::id_equals_int(r#"{ sourceField: "ownerId", predicate: { equals: 3 } }"#, None)]
#[case::int_equals_int(r#"{ sourceField: "rank", predicate: { equals: 3 } }"#, None)]
#[case::missing_field(
    r#"{ sourceField: "nope", predicate: { equals: 3 } }"#,
    Some("HydrationConditionSourceFieldDoesNotExist")
)]
#[case::unsupported_type(
    r#"{ sourceField: "score", predicate: { equals: 3 } }"#,
    Some("HydrationConditionUnsupportedFieldType")
)]
#[case::int_equals_string(
    r#"{ sourceField: "rank", predicate: { equals: "3" } }"#,
    Some("HydrationConditionPredicateDoesNotMatchSourceFieldType")
)]
#[case::int_prefix(
    r#"{ sourceField: "rank", predicate: { startsWith: "3" } }"#,
    Some("HydrationConditionPredicateRequiresStringSourceField")
)]
#[case::broken_pattern(
    r#"{ sourceField: "code", predicate: { matches: "(" } }"#,
    Some("HydrationConditionInvalidRegex")
)]
fn hydration_conditions(#[case] condition: &str, #[case] expected: Option<&str>) {
    let overall = r#"
        type Issue {
          id: ID!
          code: String
          rank: Int
          score: Float
          owner: User
            @hydrated(
              field: "user"
              arguments: [{ name: "id", value: "$source.ownerId" }]
              when: { result: CONDITION }
            )
        }
        "#
    .replace("CONDITION", condition);
    let result = validate_issues(
        &overall,
        "type Issue { id: ID! code: String rank: Int score: Float ownerId: ID }",
    );
    assert_eq!(error_codes(&result), expected.into_iter().collect::<Vec<_>>());
}

#[test]
fn batch_hydrations_read_exactly_one_source_value() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          fixed: [User] @hydrated(field: "users", arguments: [{ name: "ids", value: ["1", "2"] }], identifiedBy: "id")
          doubled: [User]
            @hydrated(
              field: "users"
              arguments: [{ name: "ids", value: "$source.ownerIds" }, { name: "others", value: "$source.watcherIds" }]
              identifiedBy: "id"
            )
        }
        "#,
        "type Issue { id: ID! ownerIds: [ID!] watcherIds: [ID!] }",
    );
    assert_eq!(
        error_codes(&result),
        [
            "NoSourceArgsInBatchHydration",
            "NonExistentHydrationActorFieldArgument",
            "MultipleSourceArgsInBatchHydration",
        ]
    );
}

#[test]
fn argument_values_must_name_an_argument_of_the_field() {
    let result = validate_issues(
        r#"
        type Issue {
          id: ID!
          byRank: User
            @hydrated(
              field: "userByRank"
              arguments: [{ name: "rank", value: "$argument.rank" }, { name: "region", value: "eu" }]
            )
        }
        "#,
        "type Issue { id: ID! }",
    );
    assert_snapshot!(
        error_messages(&result),
        @"Hydrated field `Issue.byRank` reads `$argument.rank` which is not an argument of the field"
    );
}

#[rstest]
#[case::all_conditional(true, true, None)]
#[case::none_conditional(false, false, None)]
#[case::partly_conditional(true, false, Some("SomeHydrationsHaveMissingConditions"))]
fn conditions_on_polymorphic_hydrations(
    #[case] user_condition: bool,
    #[case] bot_condition: bool,
    #[case] expected: Option<&str>,
) {
    let when = |enabled: bool, prefix: &str| {
        if enabled {
            format!(r#"when: {{ result: {{ sourceField: "creatorId", predicate: {{ startsWith: "{prefix}" }} }} }}"#)
        } else {
            String::new()
        }
    };
    let overall = format!(
        r#"
        union Actor = User | Bot
        type Issue {{
          id: ID!
          creator: Actor
            @hydrated(field: "user", arguments: [{{ name: "id", value: "$source.creatorId" }}] {})
            @hydrated(field: "bot", arguments: [{{ name: "id", value: "$source.creatorId" }}] {})
        }}
        "#,
        when(user_condition, "user/"),
        when(bot_condition, "bot/"),
    );
    let result = validate_issues(&overall, "type Issue { id: ID! creatorId: ID }");
    assert_eq!(error_codes(&result), expected.into_iter().collect::<Vec<_>>());
}

#[test]
fn inferred_actor_service_declares_the_namespaced_field() {
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
            "extend type JiraQueries { board(id: ID!): Board } type Board { id: ID! }",
            r#"
            type Query { jira: JiraQueries }
            type JiraQueries { board(id: ID!): Board }
            type Board { id: ID! }
            "#,
        ),
        (
            "cards",
            r#"
            extend type Query { card(id: ID!): Card }
            type Card {
              id: ID!
              board: Board @hydrated(field: "jira.board", arguments: [{ name: "id", value: "$source.boardId" }])
            }
            "#,
            r#"
            type Query { card(id: ID!): Card }
            type Card { id: ID! boardId: ID }
            "#,
        ),
    ]);

    assert!(!result.is_error(), "{}", error_messages(&result));
    assert_snapshot!(
        instructions(&result),
        @"[cards] hydrate field Card.board from boards:jira.board(id: $source.boardId)"
    );
}
