//! The revert operation: restore every touched element to pristine state.

use dirfix_dom::{Document, NodeId};
use tracing::debug;

use crate::apply::TAG_ATTR;

const DIRECTIONAL_PROPS: &[&str] = &["direction", "text-align", "unicode-bidi"];

fn is_touched(doc: &Document, element: NodeId) -> bool {
    if doc.attr(element, TAG_ATTR).is_some() {
        return true;
    }
    doc.style(element)
        .map(|style| DIRECTIONAL_PROPS.iter().any(|prop| style.get(prop).is_some()))
        .unwrap_or(false)
}

/// Clear the directional style properties and the classification tag from
/// every element carrying either. All of an element's engine state is
/// removed in one visit; there is no partially-reverted state. Safe to
/// call on an untouched document. Returns the number of elements reverted.
pub fn revert_all(doc: &mut Document) -> dirfix_dom::Result<usize> {
    let touched: Vec<NodeId> = doc
        .elements()
        .filter(|&id| is_touched(doc, id))
        .collect();

    for &id in &touched {
        for prop in DIRECTIONAL_PROPS {
            doc.remove_style_property(id, prop)?;
        }
        doc.remove_attribute(id, TAG_ATTR)?;
    }
    if !touched.is_empty() {
        debug!(count = touched.len(), "reverted directional styling");
    }
    Ok(touched.len())
}
