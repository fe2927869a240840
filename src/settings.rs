use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

pub const ENV_PREFIX: &str = "TOPIC_IMPORT";

/// Shown after `--help` in both binaries. Nothing here needs to be set.
pub const ENV_HELP: &str = "\
Environment overrides (all optional; lists are comma-separated):
  TOPIC_IMPORT_HTTP__TIMEOUT_SECS        request timeout [default: 300]
  TOPIC_IMPORT_HTTP__STRICT              abort on the first failed submission [default: false]
  TOPIC_IMPORT_PROGRESS__TSV_BATCH       progress interval for TSV imports [default: 1000]
  TOPIC_IMPORT_PROGRESS__NEWSML_BATCH    progress interval for NewsML imports [default: 100]
  TOPIC_IMPORT_NEWSML__SUBJECT_TAGS      subject code elements [default: SubjectMatter,SubjectDetail]
  TOPIC_IMPORT_NEWSML__TEXT_TAGS         structured text elements [default: HeadLine]
  TOPIC_IMPORT_NEWSML__HTML_SELECTORS    CSS selectors for body text [default: body\\.content]
  TOPIC_IMPORT_NEWSML__EXTENSION         corpus file extension [default: xml]
  TOPIC_IMPORT_NEWSML__EXCLUDED_DIRS     directories to skip [default: .svn]";

/// Runtime settings. Every default reproduces the stock importer behavior,
/// so an empty environment needs no configuration at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub http: HttpSettings,
    pub progress: ProgressSettings,
    pub newsml: NewsmlSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    /// Abort on the first failed submission instead of logging and moving on.
    pub strict: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    pub tsv_batch: usize,
    pub newsml_batch: usize,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            tsv_batch: 1000,
            newsml_batch: 100,
        }
    }
}

/// Which elements of a NewsML document carry labels and text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewsmlSettings {
    /// Elements whose `FormalName` attribute is an IPTC subject code.
    pub subject_tags: Vec<String>,
    /// Elements whose direct text joins the payload.
    pub text_tags: Vec<String>,
    /// CSS selectors evaluated over the lenient HTML parse.
    pub html_selectors: Vec<String>,
    pub extension: String,
    pub excluded_dirs: Vec<String>,
}

impl Default for NewsmlSettings {
    fn default() -> Self {
        Self {
            subject_tags: vec!["SubjectMatter".into(), "SubjectDetail".into()],
            text_tags: vec!["HeadLine".into()],
            html_selectors: vec![r"body\.content".into()],
            extension: "xml".into(),
            excluded_dirs: vec![".svn".into()],
        }
    }
}

impl Settings {
    /// Load defaults overlaid with `TOPIC_IMPORT_*` environment variables,
    /// e.g. `TOPIC_IMPORT_NEWSML__TEXT_TAGS=HeadLine,SubHeadLine`.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("newsml.subject_tags")
                    .with_list_parse_key("newsml.text_tags")
                    .with_list_parse_key("newsml.html_selectors")
                    .with_list_parse_key("newsml.excluded_dirs"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_behavior() {
        let s = Settings::default();
        assert_eq!(s.progress.tsv_batch, 1000);
        assert_eq!(s.progress.newsml_batch, 100);
        assert!(!s.http.strict);
        assert_eq!(s.newsml.subject_tags.len(), 2);
        assert_eq!(s.newsml.text_tags, vec!["HeadLine".to_string()]);
        assert_eq!(s.newsml.html_selectors.len(), 1);
        assert_eq!(s.newsml.excluded_dirs, vec![".svn".to_string()]);
    }

    #[test]
    fn empty_source_deserializes_to_defaults() {
        let s: Settings = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.newsml, NewsmlSettings::default());
        assert_eq!(s.http.timeout_secs, 300);
    }

    #[test]
    fn overrides_replace_single_fields() {
        let s: Settings = Config::builder()
            .set_override("progress.newsml_batch", 10)
            .unwrap()
            .set_override("http.strict", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.progress.newsml_batch, 10);
        assert_eq!(s.progress.tsv_batch, 1000);
        assert!(s.http.strict);
    }
}
