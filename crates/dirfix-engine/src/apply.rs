//! The direction applicator: classification plus styling policy.

use dirfix_classify::{Script, classify, contains_latin};
use dirfix_dom::{Document, NodeId};
use dirfix_settings::Mode;
use tracing::trace;

use crate::filter::is_code_element;

/// Attribute carrying a pending classification in manual mode.
pub const TAG_ATTR: &str = "data-dirfix";

/// Tags eligible for bulk initialization: the standard prose containers.
pub const ELIGIBLE_TAGS: &[&str] = &[
    "p", "div", "span", "h1", "h2", "h3", "h4", "h5", "h6", "li", "td", "th",
];

/// Evaluate one element under the given mode.
///
/// Returns true when a visual change was made. No-ops on empty text and on
/// code content. In auto mode an `unknown` classification leaves the
/// element untouched; in manual mode the classification is stored in the
/// [`TAG_ATTR`] attribute and nothing visual happens.
pub fn apply(doc: &mut Document, element: NodeId, mode: Mode) -> dirfix_dom::Result<bool> {
    let text = doc.text_content(element);
    if text.trim().is_empty() {
        return Ok(false);
    }
    if is_code_element(doc, element) {
        return Ok(false);
    }

    let script = classify(&text);
    trace!(?script, ?mode, "evaluated element");
    match mode {
        Mode::Auto => apply_visual(doc, element, script, &text),
        Mode::Manual => {
            doc.set_attribute(element, TAG_ATTR, script.as_str())?;
            Ok(false)
        }
    }
}

/// Write the directional style properties for `script`.
fn apply_visual(
    doc: &mut Document,
    element: NodeId,
    script: Script,
    text: &str,
) -> dirfix_dom::Result<bool> {
    match script {
        Script::Rtl => {
            doc.set_style_property(element, "direction", "rtl")?;
            doc.set_style_property(element, "text-align", "right")?;
            if contains_latin(text) {
                // Mixed script: embedded Latin runs need bidi isolation.
                doc.set_style_property(element, "unicode-bidi", "embed")?;
            }
            Ok(true)
        }
        Script::Ltr => {
            doc.set_style_property(element, "direction", "ltr")?;
            doc.set_style_property(element, "text-align", "left")?;
            Ok(true)
        }
        Script::Unknown => Ok(false),
    }
}

/// Style every element tagged `rtl` or `ltr` by an earlier manual-mode
/// pass. Tags on code content are left pending. Returns true when any
/// visual change was made.
pub fn apply_manual(doc: &mut Document) -> dirfix_dom::Result<bool> {
    let tagged: Vec<(NodeId, Script)> = doc
        .elements()
        .filter_map(|id| {
            let script = Script::from_attr(doc.attr(id, TAG_ATTR)?)?;
            matches!(script, Script::Rtl | Script::Ltr).then_some((id, script))
        })
        .collect();

    let mut changed = false;
    for (id, script) in tagged {
        if is_code_element(doc, id) {
            continue;
        }
        let text = doc.text_content(id);
        changed |= apply_visual(doc, id, script, &text)?;
    }
    Ok(changed)
}
