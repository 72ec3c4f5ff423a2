//! Headless Chromium page source.
//!
//! One browser per page: `ChromePage::open` launches Chromium, navigates to
//! the page and waits for load; dropping the page closes the browser.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use headless_chrome::protocol::cdp::Page::{CaptureScreenshotFormatOption, Viewport};
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use image::RgbImage;
use serde::de::DeserializeOwned;
use url::Url;

use blockscope_core::collector::{Category, ElementProbe, PageSource, filter_probes};
use blockscope_core::layout::{PageSize, RawElement};
use blockscope_core::{LayoutError, Result};

/// Browser launch settings.
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    /// Browser executable; `None` lets headless_chrome locate one.
    pub executable: Option<PathBuf>,
    /// Applied to navigation and every script evaluation.
    pub timeout: Duration,
    pub window_size: (u32, u32),
}

pub struct ChromePage {
    // Keeps the browser process alive for as long as the tab is used.
    _browser: Browser,
    tab: Arc<Tab>,
    url: Url,
}

impl ChromePage {
    /// Launches a browser and loads `url`.
    pub fn open(url: &Url, options: &ChromeOptions) -> anyhow::Result<Self> {
        let launch = LaunchOptionsBuilder::default()
            .headless(true)
            .path(options.executable.clone())
            .window_size(Some(options.window_size))
            .idle_browser_timeout(options.timeout + Duration::from_secs(30))
            .args(vec![
                OsStr::new("--force-device-scale-factor=1"),
                OsStr::new("--hide-scrollbars"),
                OsStr::new("--allow-file-access-from-files"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| anyhow!("invalid browser launch options: {e}"))?;

        let browser = Browser::new(launch).context("failed to launch headless Chromium")?;
        let tab = browser.new_tab().context("failed to open a browser tab")?;
        tab.set_default_timeout(options.timeout);
        tab.navigate_to(url.as_str())
            .with_context(|| format!("failed to navigate to {url}"))?;
        tab.wait_until_navigated()
            .with_context(|| format!("page did not finish loading: {url}"))?;

        tracing::debug!(%url, "page loaded");
        Ok(Self {
            _browser: browser,
            tab,
            url: url.clone(),
        })
    }

    /// Evaluates a script that returns a JSON string and decodes it.
    fn eval_json<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| collector_error(&self.url, e))?;
        let Some(serde_json::Value::String(json)) = result.value else {
            return Err(LayoutError::Collector(format!(
                "script returned no JSON string for {}",
                self.url
            )));
        };
        serde_json::from_str(&json)
            .map_err(|e| LayoutError::Collector(format!("malformed script result: {e}")))
    }
}

fn collector_error(url: &Url, err: impl std::fmt::Display) -> LayoutError {
    LayoutError::Collector(format!("{url}: {err:#}"))
}

/// Script listing every element matched by each selector, in selector order.
///
/// Rectangles are in page coordinates (viewport rect plus scroll offset).
/// Visibility mirrors a typical browser-automation check: the element has a
/// box and is not hidden by `visibility`.
fn probe_script(selectors: &[&str]) -> String {
    let selectors = serde_json::to_string(selectors).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"(function() {{
  var selectors = {selectors};
  var out = [];
  selectors.forEach(function(sel) {{
    document.querySelectorAll(sel).forEach(function(el) {{
      var r = el.getBoundingClientRect();
      var cs = getComputedStyle(el);
      var visible = r.width > 0 && r.height > 0 && cs.visibility !== 'hidden' && cs.display !== 'none';
      var direct = Array.from(el.childNodes).some(function(node) {{
        return node.nodeType === Node.TEXT_NODE && node.textContent.trim() !== '';
      }});
      out.push({{
        rect: {{ x: r.left + window.scrollX, y: r.top + window.scrollY, width: r.width, height: r.height }},
        text: el.innerText ? (el.textContent || '') : '',
        tag: el.tagName.toLowerCase(),
        has_direct_text: direct,
        visible: visible
      }});
    }});
  }});
  return JSON.stringify(out);
}})()"#
    )
}

const PAGE_SIZE_SCRIPT: &str = "JSON.stringify([document.documentElement.scrollWidth, document.documentElement.scrollHeight])";

impl PageSource for ChromePage {
    fn list_elements(&mut self, categories: &[Category]) -> Result<Vec<RawElement>> {
        let selectors: Vec<&str> = categories.iter().map(|c| c.selector()).collect();
        let probes: Vec<ElementProbe> = self.eval_json(&probe_script(&selectors))?;
        let matched = probes.len();
        let elements = filter_probes(probes);
        tracing::debug!(matched, kept = elements.len(), "probed elements");
        Ok(elements)
    }

    fn page_size(&mut self) -> Result<PageSize> {
        let (width, height): (f64, f64) = self.eval_json(PAGE_SIZE_SCRIPT)?;
        Ok(PageSize::new(width, height))
    }

    fn screenshot(&mut self) -> Result<RgbImage> {
        let size = self.page_size()?;
        size.check()?;
        let clip = Viewport {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
            scale: 1.0,
        };
        let png = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| collector_error(&self.url, e))?;
        Ok(image::load_from_memory(&png)?.to_rgb8())
    }
}
