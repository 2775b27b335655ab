use crate::crawlers::crawler::{Connect, PageRenderer};
use crate::error::CrawlError;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::Duration;

/// Renderer backed by a WebDriver session
pub struct WebDriverRenderer {
    client: Client,
    current_url: String,
}

impl WebDriverRenderer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current_url: String::new(),
        }
    }

    fn session_error(&self, context: &str, error: CmdError) -> CrawlError {
        if error.to_string().contains("Unable to find session") {
            ::log::warn!("Lost session while {} {}", context, self.current_url);
        }
        CrawlError::Session(format!("{} {}: {}", context, self.current_url, error))
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError> {
        self.current_url = url.to_string();
        self.client
            .goto(url)
            .await
            .map_err(|e| CrawlError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), CrawlError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(CrawlError::Timeout {
                what: format!("'{}' on {}", selector, self.current_url),
                after: timeout,
            }),
            Err(e) => Err(self.session_error("waiting on", e)),
        }
    }

    async fn execute_script(&mut self, script: &str) -> Result<(), CrawlError> {
        self.client
            .execute(script, vec![])
            .await
            .map(|_| ())
            .map_err(|e| CrawlError::Script(e.to_string()))
    }

    async fn current_body(&mut self) -> Result<String, CrawlError> {
        match self.client.source().await {
            Ok(source) => Ok(source),
            Err(e) => Err(self.session_error("getting source for", e)),
        }
    }

    async fn close(&mut self) -> Result<(), CrawlError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| CrawlError::Session(e.to_string()))
    }
}

/// Opens WebDriver sessions, trying well-known local ports when the
/// configured endpoint is unreachable
#[derive(Debug, Clone)]
pub struct WebDriverConnector {
    webdriver_url: String,
    browser_args: Vec<String>,
}

impl WebDriverConnector {
    pub fn new(webdriver_url: &str, browser_args: Vec<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            browser_args,
        }
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        if !self.browser_args.is_empty() {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": self.browser_args }),
            );
        }
        caps
    }

    async fn try_connect(&self, url: &str) -> Result<Client, CrawlError> {
        ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(url)
            .await
            .map_err(|e| CrawlError::Connect(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl Connect for WebDriverConnector {
    type Renderer = WebDriverRenderer;

    async fn connect(&self) -> Result<WebDriverRenderer, CrawlError> {
        let first_error = match self.try_connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(WebDriverRenderer::new(client));
            }
            Err(e) => {
                ::log::error!("{}", e);
                e
            }
        };

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // Selenium / geckodriver default
            "http://127.0.0.1:4444",
        ];

        for url in fallback_urls.iter() {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = self.try_connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(WebDriverRenderer::new(client));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(first_error)
    }
}
