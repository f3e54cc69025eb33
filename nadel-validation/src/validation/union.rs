use apollo_compiler::schema::UnionType;
use tracing::trace;

use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelElementPair;

/// Union members are reachable types of their own and get validated as such. The member lists
/// themselves are not compared since services may return members the overall union hides.
pub(crate) fn validate(pair: NadelElementPair<'_, UnionType>) -> NadelSchemaValidationResult {
    trace!(
        overall = %pair.overall.name,
        underlying = %pair.underlying.name,
        members = pair.overall.members.len(),
        "union members validated as reachable types"
    );
    NadelSchemaValidationResult::ok()
}
