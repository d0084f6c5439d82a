use super::{Document, DocumentError};
use reqwest::Client;
use scraper::{Html, Node, Selector};
use std::time::Duration;

/// Elements whose text is never part of the page content.
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Fetches a web page and turns its visible text into one [`Document`].
pub struct WebPageLoader {
    url: String,
    client: Client,
}

impl WebPageLoader {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("chatbot-service/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn load(&self) -> Result<Vec<Document>, DocumentError> {
        let fetch_err = |message: String| DocumentError::Fetch {
            url: self.url.clone(),
            message,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {}", status)));
        }

        let html = response.text().await.map_err(|e| fetch_err(e.to_string()))?;
        let (title, text) = extract_text(&html)?;

        if text.is_empty() {
            return Err(DocumentError::Empty(self.url.clone()));
        }

        tracing::debug!(url = %self.url, text_len = text.len(), "Loaded web page");

        Ok(vec![Document::new(text)
            .with_metadata("source", self.url.as_str())
            .with_metadata("title", title)])
    }
}

/// Return the page title and the body's visible text, one text node per line.
fn extract_text(html: &str) -> Result<(String, String), DocumentError> {
    let document = Html::parse_document(html);
    let title_selector =
        Selector::parse("title").map_err(|e| DocumentError::Parse(e.to_string()))?;
    let body_selector = Selector::parse("body").map_err(|e| DocumentError::Parse(e.to_string()))?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let Some(body) = document.select(&body_selector).next() else {
        return Ok((title, String::new()));
    };

    let lines: Vec<&str> = body
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let skipped = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
                });
                let trimmed = text.trim();
                (!skipped && !trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        })
        .collect();

    Ok((title, lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_visible_text() {
        let html = r#"<html><head><title> Magazine </title><style>p{}</style></head>
            <body><h1>Heading</h1><script>var x = 1;</script>
            <p>First paragraph.</p><noscript>enable js</noscript><p>Second</p></body></html>"#;

        let (title, text) = extract_text(html).unwrap();

        assert_eq!(title, "Magazine");
        assert_eq!(text, "Heading\nFirst paragraph.\nSecond");
    }

    #[test]
    fn page_without_body_text_is_empty() {
        let (_, text) = extract_text("<html><body>   </body></html>").unwrap();
        assert!(text.is_empty());
    }
}
