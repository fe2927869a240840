use sha1::{Digest, Sha1};

use super::html_view::HtmlView;
use super::tsv::TrainingExample;
use super::xml_view;
use crate::error::Result;
use crate::settings::NewsmlSettings;

pub const IPTC_SUBJECT_NAMESPACE: &str = "http://cv.iptc.org/newscodes/subjectcode/";

const FRAGMENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDocument {
    /// Lowercase hex SHA-1 of `text`.
    pub id: String,
    pub subjects: Vec<String>,
    pub text: String,
}

impl NewsDocument {
    /// A document without subject codes carries no training signal.
    pub fn is_labeled(&self) -> bool {
        !self.subjects.is_empty()
    }

    pub fn into_example(self) -> TrainingExample {
        TrainingExample {
            id: self.id,
            concepts: self.subjects,
            text: self.text,
        }
    }
}

/// Turns one NewsML buffer into a `NewsDocument` by combining a strict XML
/// pass (subject codes, structured text) with a lenient HTML pass (rendered
/// body text).
#[derive(Debug, Clone)]
pub struct NewsmlDecoder {
    subject_tags: Vec<String>,
    text_tags: Vec<String>,
    html: HtmlView,
}

impl NewsmlDecoder {
    pub fn new(settings: &NewsmlSettings) -> Result<Self> {
        Ok(Self {
            subject_tags: settings.subject_tags.clone(),
            text_tags: settings.text_tags.clone(),
            html: HtmlView::new(&settings.html_selectors)?,
        })
    }

    pub fn decode(&self, content: &[u8]) -> std::result::Result<NewsDocument, quick_xml::Error> {
        let fields = xml_view::extract(content, &self.subject_tags, &self.text_tags)?;
        let markup = fields.decode(content)?;

        let text = fields
            .texts
            .iter()
            .cloned()
            .chain(self.html.extract(&markup))
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join(FRAGMENT_SEPARATOR);

        let subjects = fields
            .subject_codes
            .iter()
            .map(|code| format!("{}{}", IPTC_SUBJECT_NAMESPACE, code))
            .collect();

        Ok(NewsDocument {
            id: content_id(&text),
            subjects,
            text,
        })
    }
}

pub fn content_id(text: &str) -> String {
    format!("{:x}", Sha1::digest(text.as_bytes()))
}
