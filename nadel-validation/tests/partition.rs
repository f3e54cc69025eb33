use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::test_helpers::error_codes;
use crate::test_helpers::error_messages;
use crate::test_helpers::instructions;
use crate::test_helpers::validate;

const TYPES: &str = r#"
type Mutation {
  closeIssues(ids: [ID!]!): CloseIssuesPayload @partition(pathToPartitionArg: ["ids"])
}
type CloseIssuesPayload { success: Boolean issues: [Issue] }
type Subscription {
  issueChanged(ids: [ID!]!): [Issue] @partition(pathToPartitionArg: ["ids"])
}
type Issue {
  id: ID!
  related(ids: [ID!]!): [Issue] @partition(pathToPartitionArg: ["ids"])
}
input IssueFilter { ids: [ID!]! text: String }
"#;

#[test]
fn partitioned_fields() {
    let overall = format!(
        r#"
        type Query {{
          issues(ids: [ID!]!): [Issue] @partition(pathToPartitionArg: ["ids"])
          search(filter: IssueFilter!): [Issue] @partition(pathToPartitionArg: ["filter", "ids"])
          issue(id: ID!): Issue @partition(pathToPartitionArg: ["id"])
        }}
        {TYPES}
        "#
    );
    let underlying = format!(
        r#"
        type Query {{
          issues(ids: [ID!]!): [Issue]
          search(filter: IssueFilter!): [Issue]
          issue(id: ID!): Issue
        }}
        {}
        "#,
        TYPES.replace(r#" @partition(pathToPartitionArg: ["ids"])"#, "")
    );
    let result = validate(&[("issues", &overall, &underlying)]);

    assert_eq!(
        error_codes(&result),
        [
            "PartitionAppliedToFieldWithUnsupportedOutputType",
            "InvalidPartitionArgument",
            "PartitionAppliedToSubscriptionField",
            "PartitionAppliedToUnsupportedField",
        ]
    );
    assert_snapshot!(instructions(&result), @r###"
    [issues] partition field Query.issues by ids
    [issues] partition field Query.search by filter.ids
    [issues] partition field Mutation.closeIssues by ids
    "###);
}

#[test]
fn payloads_need_a_single_success_flag() {
    let sdl = |directive: &str| {
        format!(
            r#"
            type Query {{ ping: String }}
            type Mutation {{
              archive(ids: [ID!]!): ArchivePayload {directive}
            }}
            type ArchivePayload {{ success: Boolean archived: Int }}
            "#
        )
    };
    let result = validate(&[(
        "issues",
        &sdl(r#"@partition(pathToPartitionArg: ["ids"])"#),
        &sdl(""),
    )]);
    assert_snapshot!(
        error_messages(&result),
        @"Field `Mutation.archive` returns `ArchivePayload` which is neither a list nor a mutation payload so it cannot use @partition"
    );
}
