//! Whether a value of one type can stand in for another.

use std::collections::HashSet;

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast::Type;
use apollo_compiler::schema::InputObjectType;

use super::wrapping::NadelTypeWrappingRule;
use super::wrapping::is_type_wrapping_valid;
use crate::schema::NadelFieldsContainer;

/// An overall output may be looser than the underlying output it exposes.
///
/// `expected_underlying_name` is the name the overall named type has in the underlying schema.
pub(crate) fn is_output_type_assignable(
    overall: &Type,
    underlying: &Type,
    expected_underlying_name: &Name,
) -> bool {
    is_type_wrapping_valid(overall, underlying, NadelTypeWrappingRule::LhsMustBeLooserOrSame)
        && underlying.inner_named_type() == expected_underlying_name
}

/// An overall input must be at least as strict as the underlying input it is passed to.
pub(crate) fn is_input_type_assignable(
    overall: &Type,
    underlying: &Type,
    expected_underlying_name: &Name,
) -> bool {
    is_type_wrapping_valid(overall, underlying, NadelTypeWrappingRule::LhsMustBeStricterOrSame)
        && underlying.inner_named_type() == expected_underlying_name
}

/// Why a hydration argument value does not fit the actor argument.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum HydrationArgumentMismatch {
    Type,
    /// A required input field has no same-named field on the supplied object.
    MissingInputField { input_type: Name, input_field: Name },
    IncompatibleInputField { input_type: Name, input_field: Name },
}

/// Checks values supplied to hydration actor arguments.
///
/// Supplied types live in `supplied_schema` (a service's underlying schema for `$source` values,
/// the overall schema for `$argument` values). Actor arguments live in the overall schema.
pub(crate) struct HydrationArgumentAssignability<'a> {
    pub(crate) supplied_schema: &'a Schema,
    pub(crate) actor_schema: &'a Schema,
}

impl HydrationArgumentAssignability<'_> {
    /// `ignore_outer_nullability` is set for `$source` values: a null source is never sent.
    pub(crate) fn check(
        &self,
        supplied: &Type,
        required: &Type,
        ignore_outer_nullability: bool,
    ) -> Result<(), HydrationArgumentMismatch> {
        let supplied = if ignore_outer_nullability {
            supplied.clone().non_null()
        } else {
            supplied.clone()
        };

        // Batch hydrations collect single values into a list, or unpack one list layer.
        let (supplied, required) = match (supplied.is_list(), required.is_list()) {
            (true, false) => {
                let item = supplied.item_type().clone();
                let item = if ignore_outer_nullability {
                    item.non_null()
                } else {
                    item
                };
                (item, required.clone())
            }
            (false, true) => (supplied, required.item_type().clone()),
            _ => (supplied, required.clone()),
        };

        self.check_exact(&supplied, &required, &mut HashSet::new())
    }

    fn check_exact(
        &self,
        supplied: &Type,
        required: &Type,
        seen: &mut HashSet<(Name, Name)>,
    ) -> Result<(), HydrationArgumentMismatch> {
        if !is_type_wrapping_valid(supplied, required, NadelTypeWrappingRule::LhsMustBeStricterOrSame)
        {
            return Err(HydrationArgumentMismatch::Type);
        }
        let supplied_name = supplied.inner_named_type();
        let required_name = required.inner_named_type();
        if is_scalar_accepted(supplied_name, required_name) {
            return Ok(());
        }

        match (
            NadelFieldsContainer::lookup(self.supplied_schema, supplied_name),
            self.actor_schema.get_input_object(required_name),
        ) {
            (Some(object), Some(input)) => self.check_object_as_input(object, input, seen),
            _ => Err(HydrationArgumentMismatch::Type),
        }
    }

    /// Every input field the actor cannot do without needs a compatible field on the object.
    fn check_object_as_input(
        &self,
        object: NadelFieldsContainer<'_>,
        input: &InputObjectType,
        seen: &mut HashSet<(Name, Name)>,
    ) -> Result<(), HydrationArgumentMismatch> {
        if !seen.insert((object.name().clone(), input.name.clone())) {
            return Ok(());
        }
        for (input_field_name, input_field) in &input.fields {
            let is_required = input_field.ty.is_non_null() && input_field.default_value.is_none();
            let Some(field) = object.field(input_field_name) else {
                if is_required {
                    return Err(HydrationArgumentMismatch::MissingInputField {
                        input_type: input.name.clone(),
                        input_field: input_field_name.clone(),
                    });
                }
                continue;
            };
            // Absent optional fields are sent as null, present ones must fit.
            let supplied = if is_required {
                field.ty.clone()
            } else {
                field.ty.clone().non_null()
            };
            if self.check_exact(&supplied, &input_field.ty, seen).is_err() {
                return Err(HydrationArgumentMismatch::IncompatibleInputField {
                    input_type: input.name.clone(),
                    input_field: input_field_name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Scalar coercions the execution engine performs when passing values along.
fn is_scalar_accepted(supplied: &Name, required: &Name) -> bool {
    supplied == required
        || matches!(
            (supplied.as_str(), required.as_str()),
            ("String" | "Int", "ID") | ("ID", "String")
        )
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;
    use rstest::rstest;

    use super::*;

    fn ty(source: &str) -> Type {
        Type::parse(source, "type.graphql").unwrap()
    }

    #[rstest]
    #[case("String", "String!", true)]
    #[case("String!", "String", false)]
    #[case("[String]", "[String!]!", true)]
    #[case("[String]", "String", false)]
    fn output_types_may_be_looser(#[case] overall: &str, #[case] underlying: &str, #[case] ok: bool) {
        assert_eq!(
            is_output_type_assignable(&ty(overall), &ty(underlying), &name!("String")),
            ok
        );
    }

    #[rstest]
    #[case("String!", "String", true)]
    #[case("String", "String!", false)]
    #[case("[ID!]!", "[ID]", true)]
    fn input_types_must_be_stricter(#[case] overall: &str, #[case] underlying: &str, #[case] ok: bool) {
        let expected = ty(underlying).inner_named_type().clone();
        assert_eq!(
            is_input_type_assignable(&ty(overall), &ty(underlying), &expected),
            ok
        );
    }

    #[test]
    fn renamed_types_match_by_underlying_name() {
        assert!(is_output_type_assignable(&ty("Issue"), &ty("Ticket"), &name!("Ticket")));
        assert!(!is_output_type_assignable(&ty("Issue"), &ty("Issue"), &name!("Ticket")));
    }

    fn schema() -> Schema {
        Schema::parse(
            r#"
            type Query { a: Int }
            type Owner { id: ID! name: String tags: [String] }
            type Anonymous { name: String }
            input OwnerInput { id: ID! name: String = "n" }
            input TagsInput { tags: Int }
            input Nested { owner: OwnerInput! }
            type Holder { owner: Owner! }
            "#,
            "schema.graphql",
        )
        .unwrap()
    }

    #[rstest]
    #[case("ID!", "[ID]", true, true)]
    #[case("[ID]", "ID", true, true)]
    #[case("[[ID]]", "ID", true, false)]
    #[case("ID", "ID!", true, true)]
    #[case("ID", "ID!", false, false)]
    #[case("String", "ID", false, true)]
    #[case("Int!", "ID", false, true)]
    #[case("ID", "String", false, true)]
    #[case("Int", "String", false, false)]
    #[case("Boolean", "ID", false, false)]
    #[case("[ID]", "[ID!]!", true, false)]
    fn hydration_arguments(
        #[case] supplied: &str,
        #[case] required: &str,
        #[case] from_source: bool,
        #[case] ok: bool,
    ) {
        let schema = schema();
        let check = HydrationArgumentAssignability {
            supplied_schema: &schema,
            actor_schema: &schema,
        };
        assert_eq!(check.check(&ty(supplied), &ty(required), from_source).is_ok(), ok);
    }

    #[test]
    fn objects_match_input_objects_structurally() {
        let schema = schema();
        let check = HydrationArgumentAssignability {
            supplied_schema: &schema,
            actor_schema: &schema,
        };
        assert_eq!(check.check(&ty("Owner"), &ty("OwnerInput"), true), Ok(()));
        assert_eq!(check.check(&ty("Holder"), &ty("Nested"), true), Ok(()));
        assert_eq!(
            check.check(&ty("Anonymous"), &ty("OwnerInput"), true),
            Err(HydrationArgumentMismatch::MissingInputField {
                input_type: name!("OwnerInput"),
                input_field: name!("id"),
            })
        );
        assert_eq!(
            check.check(&ty("Owner"), &ty("TagsInput"), true),
            Err(HydrationArgumentMismatch::IncompatibleInputField {
                input_type: name!("TagsInput"),
                input_field: name!("tags"),
            })
        );
    }
}
