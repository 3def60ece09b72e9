use tracing::debug;

use crate::content_type::ContentType;

/// Pick the codec for `incoming`: the first candidate declaring a type that
/// matches it. A type without a `version` never matches a versioned codec.
pub(crate) fn select<'c, C, F>(
    candidates: &'c [Box<C>],
    content_types: F,
    incoming: &ContentType,
) -> Option<&'c C>
where
    C: ?Sized,
    F: Fn(&C) -> Vec<ContentType>,
{
    let index = candidates.iter().position(|candidate| {
        content_types(&**candidate)
            .iter()
            .any(|declared| declared.matches(incoming))
    });
    match index {
        Some(index) => debug!(content_type = %incoming, index, "negotiated codec"),
        None => debug!(content_type = %incoming, "no codec declares a matching type"),
    }
    index.map(|index| &*candidates[index])
}
