use std::time::Duration;

use reqwest::blocking::{Client, Request};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::Result;
use crate::parser::{Concept, TrainingExample};
use crate::query::QueryParams;

pub const CONCEPT_PATH: &str = "/concept";
pub const TRAINING_SET_PATH: &str = "/trainingset";
pub const TRAINER_PATH: &str = "/trainer";

/// Outcome of one exchange with the topic model service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub status: u16,
    pub body_len: usize,
}

impl Submission {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The three remote calls the importers make. Any HTTP status comes back as
/// a `Submission`; only transport failures are errors.
pub trait IngestSink {
    fn register_concept(&mut self, concept: &Concept) -> Result<Submission>;
    fn register_example(&mut self, example: &TrainingExample) -> Result<Submission>;
    fn trigger_training(&mut self) -> Result<Submission>;
}

/// Blocking HTTP client for a topic classification service rooted at
/// `base_url`.
#[derive(Debug, Clone)]
pub struct TopicModelClient {
    client: Client,
    base_url: String,
}

impl TopicModelClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn concept_request(&self, concept: &Concept) -> Result<Request> {
        let query = QueryParams::new()
            .push("id", concept.id.as_str())
            .push("primary_topic", concept.primary_topic.as_str())
            .extend("broader", concept.broader.iter().map(String::as_str));
        self.empty_post(&query.apply(&self.endpoint(CONCEPT_PATH)))
    }

    pub fn example_request(&self, example: &TrainingExample) -> Result<Request> {
        let query = QueryParams::new()
            .push("example_id", example.id.as_str())
            .extend("concept", example.concepts.iter().map(String::as_str));
        let request = self
            .client
            .post(query.apply(&self.endpoint(TRAINING_SET_PATH)))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(example.text.clone())
            .build()?;
        Ok(request)
    }

    pub fn training_request(&self) -> Result<Request> {
        self.empty_post(&self.endpoint(TRAINER_PATH))
    }

    // POST with an explicit zero-length body, never a bodyless request.
    fn empty_post(&self, url: &str) -> Result<Request> {
        let request = self
            .client
            .post(url)
            .body(Vec::<u8>::new())
            .build()?;
        Ok(request)
    }

    fn send(&self, request: Request) -> Result<Submission> {
        let url = request.url().to_string();
        let response = self.client.execute(request)?;
        let status = response.status().as_u16();
        // Drain the body so the exchange completes before the next record.
        let body = response.bytes()?;
        debug!(url = %url, status, body_len = body.len(), "submitted");
        Ok(Submission {
            status,
            body_len: body.len(),
        })
    }
}

impl IngestSink for TopicModelClient {
    fn register_concept(&mut self, concept: &Concept) -> Result<Submission> {
        let request = self.concept_request(concept)?;
        self.send(request)
    }

    fn register_example(&mut self, example: &TrainingExample) -> Result<Submission> {
        let request = self.example_request(example)?;
        self.send(request)
    }

    fn trigger_training(&mut self) -> Result<Submission> {
        let request = self.training_request()?;
        self.send(request)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::parser::{decode_concept, decode_training_example};

    fn client() -> TopicModelClient {
        TopicModelClient::new("http://localhost:8080/topic/model/", Duration::from_secs(5)).unwrap()
    }

    fn body_bytes(req: &Request) -> &[u8] {
        req.body().and_then(|b| b.as_bytes()).unwrap_or_default()
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        assert_eq!(client().base_url(), "http://localhost:8080/topic/model");
    }

    #[test]
    fn concept_request_shape() {
        let concept = decode_concept("Cats\tFelines Pets\tCat\n").unwrap();
        let req = client().concept_request(&concept).unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.url().as_str(),
            "http://localhost:8080/topic/model/concept\
             ?id=http%3A%2F%2Fdbpedia.org%2Fresource%2FCats\
             &primary_topic=http%3A%2F%2Fdbpedia.org%2Fresource%2FCat\
             &broader=http%3A%2F%2Fdbpedia.org%2Fresource%2FFelines\
             &broader=http%3A%2F%2Fdbpedia.org%2Fresource%2FPets"
        );
        assert!(req.body().is_some());
        assert!(body_bytes(&req).is_empty());
    }

    #[test]
    fn concept_without_broader_has_no_broader_param() {
        let concept = decode_concept("cat\t\\N\tdog").unwrap();
        let req = client().concept_request(&concept).unwrap();
        assert!(!req.url().as_str().contains("broader="));
    }

    #[test]
    fn example_request_repeats_concepts() {
        let example = TrainingExample {
            id: "x".into(),
            concepts: vec!["A B".into(), "C".into(), "C".into()],
            text: "body text".into(),
        };
        let req = client().example_request(&example).unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.url().path(), "/topic/model/trainingset");
        assert_eq!(
            req.url().query(),
            Some("example_id=x&concept=A%20B&concept=C&concept=C")
        );
        assert_eq!(
            req.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_bytes(&req), b"body text");
    }

    #[test]
    fn example_body_is_raw_text() {
        let example = decode_training_example("ex1\tfoo bar\tsome text\n").unwrap();
        let req = client().example_request(&example).unwrap();
        assert_eq!(body_bytes(&req), b"some text\n");
    }

    #[test]
    fn training_request_is_bare_post() {
        let req = client().training_request().unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.url().as_str(), "http://localhost:8080/topic/model/trainer");
        assert!(req.url().query().is_none());
        assert!(req.body().is_some());
        assert!(body_bytes(&req).is_empty());
    }

    #[test]
    fn submission_success_range() {
        assert!(Submission { status: 204, body_len: 0 }.is_success());
        assert!(!Submission { status: 404, body_len: 10 }.is_success());
        assert!(!Submission { status: 500, body_len: 0 }.is_success());
    }
}
