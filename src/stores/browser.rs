use std::{
    future::Future,
    path::Path,
    process::{Child, Command},
    thread,
    time::Duration,
};

use _model::StoreRecord;
use anyhow::{Context, Result};
use fantoccini::{elements::Element, wd::Capabilities, Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{Browser, Config, WebDriverConfig};

const DRIVER_STARTUP: Duration = Duration::from_secs(1);

/// Opens a WebDriver session, hands it to `scrape`, and always closes it again.
pub fn run<F, Fut>(config: &Config, scrape: F) -> Result<Vec<StoreRecord>>
where
    F: FnOnce(Client) -> Fut,
    Fut: Future<Output = Result<Vec<StoreRecord>>>,
{
    let _driver = match &config.webdriver.binary {
        Some(path) => Some(Driver::spawn(path, &config.webdriver.url)?),
        None => None,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let client = ClientBuilder::native()
            .capabilities(capabilities(&config.webdriver, &config.user_agent))
            .connect(&config.webdriver.url)
            .await
            .with_context(|| format!("Failed to connect to WebDriver at {}", config.webdriver.url))?;

        let result = scrape(client.clone()).await;
        let closed = client.close().await;
        let stores = result?;
        closed.context("Failed to close browser session")?;
        Ok::<_, anyhow::Error>(stores)
    })
}

fn capabilities(config: &WebDriverConfig, user_agent: &str) -> Capabilities {
    let mut args = vec![
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        format!("--window-size={}", config.window_size),
        format!("--user-agent={user_agent}"),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let (name, options) = match config.browser {
        Browser::Edge => ("MicrosoftEdge", "ms:edgeOptions"),
        Browser::Chrome => ("chrome", "goog:chromeOptions"),
    };

    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!(name));
    caps.insert(options.to_string(), json!({ "args": args }));
    caps
}

/// `<option>` elements of the `select` that carry a non-empty value.
pub async fn options(c: &Client, select: &str) -> Result<Vec<Element>> {
    let select = c
        .find(Locator::Css(select))
        .await
        .with_context(|| format!("Missing select {select:?}"))?;

    let mut output = Vec::new();
    for option in select.find_all(Locator::Css("option")).await? {
        if option.attr("value").await?.is_some_and(|x| !x.is_empty()) {
            output.push(option);
        }
    }
    Ok(output)
}

/// A locally launched WebDriver process, killed on drop.
struct Driver {
    child: Child,
}

impl Driver {
    fn spawn(binary: &Path, url: &str) -> Result<Self> {
        let mut command = Command::new(binary);
        if let Some(port) = port(url) {
            command.arg(format!("--port={port}"));
        }

        info!("Starting WebDriver {}", binary.display());
        let child = command
            .spawn()
            .with_context(|| format!("Failed to start WebDriver {}", binary.display()))?;
        thread::sleep(DRIVER_STARTUP);

        Ok(Self { child })
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        debug!("Stopping WebDriver");
        if let Err(e) = self.child.kill() {
            warn!("Failed to stop WebDriver: {e}");
        }
        let _ = self.child.wait();
    }
}

fn port(url: &str) -> Option<u16> {
    let (_, rest) = url.rsplit_once(':')?;
    rest.trim_end_matches('/').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_capabilities() {
        let config = WebDriverConfig::default();
        let caps = capabilities(&config, "test-agent");
        assert_eq!(caps["browserName"], "MicrosoftEdge");
        let args = caps["ms:edgeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--no-sandbox")));
        assert!(args.contains(&json!("--user-agent=test-agent")));
        assert!(!args.contains(&json!("--headless=new")));
    }

    #[test]
    fn headless_chrome_capabilities() {
        let config = WebDriverConfig {
            browser: Browser::Chrome,
            headless: true,
            ..Default::default()
        };
        let caps = capabilities(&config, "ua");
        assert_eq!(caps["browserName"], "chrome");
        assert!(caps["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap()
            .contains(&json!("--headless=new")));
    }

    #[test]
    fn driver_port() {
        assert_eq!(port("http://localhost:9515"), Some(9515));
        assert_eq!(port("http://localhost:4444/"), Some(4444));
        assert_eq!(port("http://localhost"), None);
    }
}
