//! Reference Rewriter
//!
//! Produces an independent copy of an assistant with every dependency ID
//! translated through a [`MappingTable`]. IDs without a mapping entry are
//! kept as they are.

use crate::mapping::MappingTable;
use crate::resource::Resource;
use crate::shape::SHAPES;

/// Copy of `assistant` with dependency references mapped to the destination
///
/// Only fields reached by a dependency shape can change; every other field
/// is carried over unchanged. The input is never modified.
#[must_use]
pub fn rewrite(assistant: &Resource, table: &MappingTable) -> Resource {
    let mut copy = assistant.clone();
    rewrite_in_place(&mut copy, table);
    copy
}

/// Number of references [`rewrite`] would change
#[must_use]
pub fn count_rewrites(assistant: &Resource, table: &MappingTable) -> usize {
    let mut count = 0;
    for shape in SHAPES {
        shape.for_each(assistant.fields(), |id| {
            if table.get(shape.kind, id).is_some_and(|dest| dest != id) {
                count += 1;
            }
        });
    }
    count
}

fn rewrite_in_place(resource: &mut Resource, table: &MappingTable) {
    for shape in SHAPES {
        shape.for_each_mut(resource.fields_mut(), |id| {
            if let Some(dest) = table.get(shape.kind, id) {
                dest.clone_into(id);
            }
        });
    }
}
