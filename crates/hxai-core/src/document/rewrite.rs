//! Element lookup and inner-content replacement on HTML source.
//!
//! Built on `lol_html`'s streaming rewriter: bytes outside the matched
//! element pass through untouched, so a replacement never reformats the rest
//! of the document. Lookup works by letting the rewriter drop unique comment
//! markers around (and inside) the match, then slicing the annotated output.

use std::borrow::Cow;
use std::cell::Cell;
use std::rc::Rc;

use lol_html::html_content::{ContentType, Element, EndTag};
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, rewrite_str};
use uuid::Uuid;

use hxai_types::document::LocatedElement;
use hxai_types::error::DocumentError;

/// Comment markers unique to one lookup.
struct Markers {
    outer_start: String,
    inner_start: String,
    inner_end: String,
    outer_end: String,
}

impl Markers {
    fn new() -> Self {
        let tag = Uuid::now_v7().simple().to_string();
        Self {
            outer_start: format!("<!--hxai:{tag}:outer-start-->"),
            inner_start: format!("<!--hxai:{tag}:inner-start-->"),
            inner_end: format!("<!--hxai:{tag}:inner-end-->"),
            outer_end: format!("<!--hxai:{tag}:outer-end-->"),
        }
    }
}

/// Build a selector matching elements whose `id` attribute equals `element_id`.
///
/// An attribute selector with a quoted value is used instead of `#id` so that
/// ids which are not valid CSS identifiers (`1col`, `a.b`) still match.
pub fn id_selector(element_id: &str) -> Result<Selector, DocumentError> {
    if element_id.is_empty() {
        return Err(DocumentError::InvalidId("element id is empty".to_string()));
    }
    if element_id.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(DocumentError::InvalidId(format!(
            "element id '{element_id}' contains whitespace"
        )));
    }

    let mut escaped = String::with_capacity(element_id.len() + 2);
    for c in element_id.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_control() => escaped.push_str(&format!("\\{:x} ", c as u32)),
            c => escaped.push(c),
        }
    }

    format!("[id=\"{escaped}\"]")
        .parse::<Selector>()
        .map_err(|e| DocumentError::InvalidId(format!("element id '{element_id}': {e}")))
}

/// Find the single element with `id == element_id` in `html`.
///
/// # Errors
///
/// - `TargetNotFound` when nothing matches.
/// - `AmbiguousTarget` when more than one element matches.
/// - `Rewrite` when an element that can hold content has no end tag of its
///   own (an implied close such as `<li>one<li>two`).
pub fn locate(html: &str, element_id: &str) -> Result<LocatedElement, DocumentError> {
    let selector = id_selector(element_id)?;
    let markers = Markers::new();

    let mut matches = 0usize;
    let mut tag_name = String::new();
    let mut has_content = false;
    let mut closed = None;

    let handlers = ElementContentHandlers::default().element(|el: &mut Element<'_, '_>| {
        matches += 1;
        if matches == 1 {
            tag_name = el.tag_name();
            el.before(&markers.outer_start, ContentType::Html);
            el.after(&markers.outer_end, ContentType::Html);
            if el.can_have_content() {
                has_content = true;
                closed = Some(watch_end_tag(el));
                el.prepend(&markers.inner_start, ContentType::Html);
                el.append(&markers.inner_end, ContentType::Html);
            }
        }
        Ok(())
    });

    let annotated = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![(Cow::Owned(selector), handlers)],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| DocumentError::Rewrite(e.to_string()))?;

    check_match_count(element_id, matches)?;
    if has_content && !closed.is_some_and(|c| c.get()) {
        return Err(unterminated(element_id));
    }

    let outer_html = between(&annotated, &markers.outer_start, &markers.outer_end)
        .ok_or_else(|| unterminated(element_id))?;
    let inner_html = if has_content {
        between(outer_html, &markers.inner_start, &markers.inner_end)
            .ok_or_else(|| unterminated(element_id))?
            .to_string()
    } else {
        String::new()
    };

    Ok(LocatedElement {
        id: element_id.to_string(),
        tag_name,
        outer_html: strip_markers(outer_html, &markers),
        inner_html,
    })
}

/// Replace the children of the element with `id == element_id` by
/// `fragment`, inserted as raw markup. Returns the rewritten document.
///
/// Fails like [`locate`] when the id matches zero or several elements. A
/// void element (`<img>`, `<br>`) cannot receive content and is rejected,
/// and so is an element without its own end tag, whose content would
/// otherwise swallow the following siblings.
pub fn replace_inner(html: &str, element_id: &str, fragment: &str) -> Result<String, DocumentError> {
    let selector = id_selector(element_id)?;

    let mut matches = 0usize;
    let mut void_tag = None;
    let mut closed = None;
    let handlers = ElementContentHandlers::default().element(|el: &mut Element<'_, '_>| {
        matches += 1;
        if el.can_have_content() {
            if closed.is_none() {
                closed = Some(watch_end_tag(el));
            }
            el.set_inner_content(fragment, ContentType::Html);
        } else {
            void_tag = Some(el.tag_name());
        }
        Ok(())
    });

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![(Cow::Owned(selector), handlers)],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| DocumentError::Rewrite(e.to_string()))?;

    check_match_count(element_id, matches)?;
    if let Some(tag) = void_tag {
        return Err(DocumentError::Rewrite(format!(
            "<{tag}> element '{element_id}' cannot hold content"
        )));
    }
    if !closed.is_some_and(|c| c.get()) {
        return Err(unterminated(element_id));
    }
    Ok(rewritten)
}

fn check_match_count(element_id: &str, matches: usize) -> Result<(), DocumentError> {
    match matches {
        0 => Err(DocumentError::TargetNotFound(element_id.to_string())),
        1 => Ok(()),
        count => Err(DocumentError::AmbiguousTarget {
            id: element_id.to_string(),
            count,
        }),
    }
}

/// Flag set once `el`'s own end tag (same tag name) is seen.
fn watch_end_tag(el: &mut Element<'_, '_>) -> Rc<Cell<bool>> {
    let closed = Rc::new(Cell::new(false));
    let tag = el.tag_name();
    if let Some(handlers) = el.end_tag_handlers() {
        let flag = Rc::clone(&closed);
        handlers.push(Box::new(move |end: &mut EndTag<'_>| {
            if end.name().eq_ignore_ascii_case(&tag) {
                flag.set(true);
            }
            Ok(())
        }));
    }
    closed
}

fn unterminated(element_id: &str) -> DocumentError {
    DocumentError::Rewrite(format!("element '{element_id}' has no end tag"))
}

/// Slice of `haystack` strictly between `start` and the following `end`.
fn between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let len = haystack[from..].find(end)?;
    Some(&haystack[from..from + len])
}

fn strip_markers(html: &str, markers: &Markers) -> String {
    html.replace(&markers.inner_start, "")
        .replace(&markers.inner_end, "")
}
