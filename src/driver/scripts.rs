//! Scripts evaluated in the page through WebDriver `execute`.
//!
//! Each is a function body: arguments arrive in `arguments[..]` and the
//! result must be `return`ed. Missing elements throw so the failure surfaces
//! as a command error.

/// `(selector, value)` -> value now held by the element
pub const SET_VALUE: &str = r#"
const el = document.querySelector(arguments[0]);
if (!el) { throw new Error('no element matches ' + arguments[0]); }
el.value = arguments[1];
el.dispatchEvent(new Event('input', { bubbles: true }));
el.dispatchEvent(new Event('change', { bubbles: true }));
return el.value;
"#;

/// `(selector)` -> the element's `value` property
pub const READ_VALUE: &str = r#"
const el = document.querySelector(arguments[0]);
if (!el) { throw new Error('no element matches ' + arguments[0]); }
return el.value;
"#;

/// `(selector)` -> the element's rendered text
pub const INNER_TEXT: &str = r#"
const el = document.querySelector(arguments[0]);
if (!el) { throw new Error('no element matches ' + arguments[0]); }
return el.innerText;
"#;

/// `(selector)` -> whether a checkbox or radio is checked
pub const IS_CHECKED: &str = r#"
const el = document.querySelector(arguments[0]);
if (!el) { throw new Error('no element matches ' + arguments[0]); }
return el.checked === true;
"#;

/// `(host selector, inner selector)` -> `{ html, missing }`.
///
/// Attaches an open root when the host has none, matching what a test would
/// see on a host whose root was never populated.
pub const SHADOW_CONTENT: &str = r#"
const host = document.querySelector(arguments[0]);
if (!host) { return { html: null, missing: 'shadow host' }; }
const root = host.shadowRoot || host.attachShadow({ mode: 'open' });
if (!root) { return { html: null, missing: 'shadow root' }; }
const inner = root.querySelector(arguments[1]);
if (!inner) { return { html: null, missing: 'shadow element' }; }
return { html: inner.innerHTML, missing: null };
"#;

/// `(table selector, row, cell)` -> text of that cell
pub const TABLE_CELL: &str = r#"
const table = document.querySelector(arguments[0]);
if (!table) { throw new Error('no table matches ' + arguments[0]); }
return table.rows[arguments[1]].cells[arguments[2]].innerText;
"#;
