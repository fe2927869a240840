use scraper::{Html, Selector};

use crate::error::{ImportError, Result};

/// Compiled selector paths for the lenient HTML view of a document.
#[derive(Debug, Clone)]
pub struct HtmlView {
    selectors: Vec<Selector>,
}

impl HtmlView {
    pub fn new(paths: &[String]) -> Result<Self> {
        let selectors = paths
            .iter()
            .map(|p| {
                Selector::parse(p).map_err(|e| ImportError::Selector {
                    selector: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { selectors })
    }

    /// Rendered (descendant) text of every matched element, trimmed, grouped
    /// by selector in configuration order.
    pub fn extract(&self, markup: &str) -> Vec<String> {
        let document = Html::parse_document(markup);
        self.selectors
            .iter()
            .flat_map(|sel| {
                document
                    .select(sel)
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
