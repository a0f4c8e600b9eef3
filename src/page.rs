use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Returns the document markup with every level-2 heading marked by its layout state.
///
/// Layout cannot be observed once the DOM is serialized, so the `data-rendered`
/// attribute carries it into the snapshot. Only a detached clone is marked; the
/// live page is left untouched.
pub const SNAPSHOT_SCRIPT: &str = r#"(() => {
    const headings = 'h2, [role="heading"][aria-level="2"]';
    const rendered = Array.from(document.querySelectorAll(headings))
        .map((el) => el.offsetWidth > 0 && el.offsetHeight > 0);
    const copy = document.documentElement.cloneNode(true);
    copy.querySelectorAll(headings).forEach((el, i) => {
        el.setAttribute('data-rendered', rendered[i] ? 'true' : 'false');
    });
    return copy.outerHTML;
})()"#;

/// A loaded, DOM-queryable page owned by the caller.
///
/// Implementations wrap whatever browser automation the caller uses. The
/// extractor never opens, navigates or closes the page.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Runs `script` against the current document and returns its result.
    async fn evaluate(&self, script: &str) -> Result<Value>;
    /// Resolves once `selector` matches, or fails with [`ExtractError::Timeout`].
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;
    /// Clicks the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;
    /// Sends an Escape key press to the page.
    async fn press_escape(&self) -> Result<()>;
}

/// Captures the current document as HTML via [`SNAPSHOT_SCRIPT`].
pub async fn snapshot(page: &dyn PageHandle) -> Result<String> {
    match page.evaluate(SNAPSHOT_SCRIPT).await? {
        Value::String(html) => Ok(html),
        other => Err(ExtractError::Script(format!(
            "snapshot returned {} instead of a string",
            value_kind(&other)
        ))),
    }
}

/// Checks whether `selector` currently matches anything on the page.
pub async fn selector_exists(page: &dyn PageHandle, selector: &str) -> Result<bool> {
    let literal = serde_json::to_string(selector)?;
    let script = format!("document.querySelector({}) !== null", literal);
    match page.evaluate(&script).await? {
        Value::Bool(found) => Ok(found),
        other => Err(ExtractError::Script(format!(
            "selector check returned {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
