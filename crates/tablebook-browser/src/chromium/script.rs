//! Page-side scripts evaluated through `Runtime.evaluate`.
//!
//! Each builder returns a self-invoking expression that resolves its
//! [`Locator`] into `el` and answers with a `{ status, ... }` object. A
//! `status` of `"missing"` means the locator matched nothing.

use serde_json::Value;

use crate::locator::Locator;

/// Attribute used to hand a resolved element over to `DOM.querySelector`.
pub(crate) const REF_ATTR: &str = "data-tablebook-ref";

const NORMALIZE: &str = "const norm = (input) => (input || '').replace(/\\s+/g, ' ').trim();";

const VISIBLE: &str = r"const isVisible = (node) => {
        if (!(node instanceof Element)) return false;
        const style = window.getComputedStyle(node);
        if (style.visibility === 'hidden' || style.display === 'none') return false;
        const rect = node.getBoundingClientRect();
        return rect.width > 0 || rect.height > 0 || node.getClientRects().length > 0;
    };";

fn js_string(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}

fn implicit_role_selector(role: &str) -> String {
    let explicit = format!("[role=\"{}\"]", role.replace('"', "\\\""));
    let implicit = match role {
        "button" => "button, input[type=\"button\"], input[type=\"submit\"], input[type=\"reset\"]",
        "link" => "a[href]",
        "textbox" => "input:not([type]), input[type=\"text\"], input[type=\"email\"], input[type=\"tel\"], textarea",
        "checkbox" => "input[type=\"checkbox\"]",
        "combobox" => "select",
        _ => return explicit,
    };
    format!("{explicit}, {implicit}")
}

/// Statements that bind `el` to the element `locator` resolves to, or `null`.
fn resolve(locator: &Locator) -> String {
    match locator {
        Locator::Css { selector } => format!(
            "const el = document.querySelector({selector});",
            selector = js_string(selector),
        ),
        Locator::CssText { selector, text } => format!(
            r"const target = {text};
    const el = Array.from(document.querySelectorAll({selector}))
        .find((node) => norm(node.innerText || node.textContent) === target) || null;",
            selector = js_string(selector),
            text = js_string(text.trim()),
        ),
        Locator::Text { text } => format!(
            r"const target = {text};
    const hits = Array.from(document.querySelectorAll('body *'))
        .filter((node) => norm(node.innerText || node.textContent) === target);
    const el = hits.find((node) => !hits.some((other) => other !== node && node.contains(other))) || null;",
            text = js_string(text.trim()),
        ),
        Locator::Role { role, name } => format!(
            r"const wanted = {name}.toLowerCase();
    const accessibleName = (node) => {{
        const label = node.getAttribute('aria-label');
        if (label) return norm(label);
        const labelledby = node.getAttribute('aria-labelledby');
        if (labelledby) {{
            return norm(labelledby.split(/\s+/)
                .map((id) => document.getElementById(id))
                .map((ref) => (ref ? ref.textContent : ''))
                .join(' '));
        }}
        if (node instanceof HTMLInputElement && node.value) return norm(node.value);
        if (node.title) return norm(node.title);
        return norm(node.innerText || node.textContent);
    }};
    const el = Array.from(document.querySelectorAll({selector}))
        .find((node) => accessibleName(node).toLowerCase().includes(wanted)) || null;",
            selector = js_string(&implicit_role_selector(role)),
            name = js_string(name.trim()),
        ),
    }
}

fn wrap(locator: &Locator, body: &str) -> String {
    format!(
        r"(() => {{
    {NORMALIZE}
    {VISIBLE}
    {resolve}
    if (!el) {{ return {{ status: 'missing' }}; }}
    {body}
}})()",
        resolve = resolve(locator),
    )
}

pub(crate) fn visible(locator: &Locator) -> String {
    wrap(locator, "return { status: 'ok', visible: isVisible(el) };")
}

pub(crate) fn parent_text(locator: &Locator) -> String {
    wrap(
        locator,
        "const parent = el.parentElement;\n    return { status: 'ok', text: parent ? (parent.textContent || '') : '' };",
    )
}

/// Finds an `<option>` by value or label; with `apply` it also selects it and
/// fires the `input`/`change` events a user selection would.
pub(crate) fn option(locator: &Locator, value: &str, apply: bool) -> String {
    let body = format!(
        r"const wantedOption = {value};
    const options = Array.from(el.options || []);
    const opt = options.find((o) => o.value === wantedOption)
        || options.find((o) => norm(o.label || o.textContent) === wantedOption);
    if (!opt) {{ return {{ status: 'no-option' }}; }}
    if ({apply}) {{
        el.value = opt.value;
        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    }}
    return {{ status: 'ok', value: opt.value }};",
        value = js_string(value),
        apply = if apply { "true" } else { "false" },
    );
    wrap(locator, &body)
}

/// Tags the resolved element with `token` so it can be located by
/// [`ref_selector`]. Also clears form fields when `clear` is set.
pub(crate) fn mark(locator: &Locator, token: &str, clear: bool) -> String {
    let body = format!(
        r"el.setAttribute({attr}, {token});
    if ({clear} && 'value' in el) {{
        el.value = '';
        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    }}
    return {{ status: 'ok', visible: isVisible(el) }};",
        attr = js_string(REF_ATTR),
        token = js_string(token),
        clear = if clear { "true" } else { "false" },
    );
    wrap(locator, &body)
}

pub(crate) fn ref_selector(token: &str) -> String {
    format!("[{REF_ATTR}=\"{token}\"]")
}

/// The `status` field of a script result.
pub(crate) fn status(value: &Value) -> Option<&str> {
    value.get("status").and_then(Value::as_str)
}
