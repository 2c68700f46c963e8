use crate::DeclFunc;

/// Sort functions for stable output.
///
/// Methods come first, grouped by receiver type name in ascending order.
/// Free functions come last. Within a group, functions are ordered by name.
pub fn sort_funcs(funcs: &mut [DeclFunc]) {
    funcs.sort_by(|a, b| {
        let a_recv = a.receiver.as_ref().map(|r| r.type_name.as_str());
        let b_recv = b.receiver.as_ref().map(|r| r.type_name.as_str());

        match (a_recv, b_recv) {
            (Some(x), Some(y)) if x != y => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            _ => a.name.cmp(&b.name),
        }
    });
}
