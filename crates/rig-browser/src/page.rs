//! Page navigation, scripting, and UI waits.
//!
//! The wait helpers mirror the three things UI steps actually wait for:
//! the page finishing its load, an element existing in the DOM, and an
//! element being rendered where a user could see it. On timeout the
//! current URL is captured and logged; a stuck step is almost always on
//! the wrong page.

use crate::error::{BrowserError, Result};
use crate::wait::{WaitConfig, wait_for_result};
use chromiumoxide::page::Page as ChromePage;
use tracing::error;

/// A browser tab.
///
/// Created by [`crate::Browser::new_page`]; cheap to clone into wait
/// closures because chromiumoxide pages are handles.
#[derive(Debug)]
pub struct Page {
    inner: ChromePage,
}

impl Page {
    pub(crate) fn new(page: ChromePage) -> Self {
        Self { inner: page }
    }

    /// Navigates to a URL and waits for the document to finish loading.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NavigationFailed`] if the navigation is
    /// rejected, or a timeout error if the load never completes.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_load(WaitConfig::default()).await
    }

    /// Waits until `document.readyState` reports "complete".
    ///
    /// `navigate` calls this automatically; call it yourself after
    /// triggering navigation from inside the page.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::WaitTimeout`] if the page does not finish
    /// loading in time.
    pub async fn wait_for_load(&self, config: WaitConfig) -> Result<()> {
        let result = wait_for_result(
            || {
                let page = self.inner.clone();
                async move {
                    let ready: String = evaluate_on(&page, "document.readyState").await?;
                    Ok(ready == "complete")
                }
            },
            config,
            "page load",
        )
        .await;

        self.contextualize(result).await
    }

    /// Waits for at least one element matching `selector` to exist in
    /// the DOM. The element does not have to be visible.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::WaitTimeout`] if no match appears in time.
    pub async fn wait_for_present(&self, selector: &str, config: WaitConfig) -> Result<()> {
        let script = format!("!!document.querySelector({})", js_string(selector)?);

        let result = wait_for_result(
            || {
                let page = self.inner.clone();
                let script = script.clone();
                async move { evaluate_on(&page, &script).await }
            },
            config,
            &format!("element '{selector}' present"),
        )
        .await;

        self.contextualize(result).await
    }

    /// Waits for an element matching `selector` to be rendered with a
    /// non-empty box, i.e. actually displayed to the user.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::WaitTimeout`] if the element never
    /// becomes visible.
    pub async fn wait_for_visible(&self, selector: &str, config: WaitConfig) -> Result<()> {
        let script = format!(
            "(() => {{ \
                const el = document.querySelector({}); \
                if (!el) return false; \
                const box = el.getBoundingClientRect(); \
                return box.width > 0 && box.height > 0; \
            }})()",
            js_string(selector)?
        );

        let result = wait_for_result(
            || {
                let page = self.inner.clone();
                let script = script.clone();
                async move { evaluate_on(&page, &script).await }
            },
            config,
            &format!("element '{selector}' visible"),
        )
        .await;

        self.contextualize(result).await
    }

    /// Evaluates JavaScript in the page and deserializes the result.
    ///
    /// Never interpolate untrusted input into the script.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Script`] if evaluation fails or the
    /// result does not deserialize to `T`.
    pub async fn evaluate<T>(&self, script: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        evaluate_on(&self.inner, script).await
    }

    /// Current page URL.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Script`] if evaluation fails.
    pub async fn url(&self) -> Result<String> {
        self.evaluate("window.location.href").await
    }

    /// Current document title.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Script`] if evaluation fails.
    pub async fn title(&self) -> Result<String> {
        self.evaluate("document.title").await
    }

    /// Closes the tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the CDP close call fails.
    pub async fn close(self) -> Result<()> {
        self.inner.close().await.map_err(BrowserError::Cdp)
    }

    /// Fills in the page URL on wait timeouts and logs them. The URL at
    /// timeout is the single most useful diagnostic for a stuck step.
    async fn contextualize(&self, result: Result<()>) -> Result<()> {
        match result {
            Err(BrowserError::WaitTimeout {
                condition, timeout, ..
            }) => {
                let page_url = self
                    .url()
                    .await
                    .unwrap_or_else(|_| String::from("<unavailable>"));
                error!(%condition, ?timeout, %page_url, "wait condition timed out");
                Err(BrowserError::WaitTimeout {
                    condition,
                    timeout,
                    page_url,
                })
            }
            other => other,
        }
    }
}

/// Evaluates a script on a page handle and deserializes the result.
async fn evaluate_on<T>(page: &ChromePage, script: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let evaluation = page
        .evaluate(script)
        .await
        .map_err(|e| BrowserError::Script(e.to_string()))?;

    evaluation
        .into_value()
        .map_err(|e| BrowserError::Script(e.to_string()))
}

/// Encodes a selector as a JavaScript string literal. JSON encoding
/// handles quotes, backticks, and newlines, which keeps selectors from
/// escaping into the script.
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| BrowserError::Script(e.to_string()))
}
