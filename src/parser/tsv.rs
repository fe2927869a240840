use crate::error::{ImportError, Result};

pub const DBPEDIA_NAMESPACE: &str = "http://dbpedia.org/resource/";

/// How a SQL dump spells NULL in the broader-concepts column.
pub const SQL_NULL: &str = r"\N";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub id: String,
    pub broader: Vec<String>,
    pub primary_topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub id: String,
    pub concepts: Vec<String>,
    pub text: String,
}

pub fn dbpedia(key: &str) -> String {
    format!("{}{}", DBPEDIA_NAMESPACE, key.trim())
}

/// Decode `concept \t broader... \t primary_topic`.
pub fn decode_concept(line: &str) -> Result<Concept> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(malformed(line, fields.len()));
    }

    let raw_broader = fields[1].trim();
    let broader = if raw_broader == SQL_NULL {
        Vec::new()
    } else {
        raw_broader.split_whitespace().map(dbpedia).collect()
    };

    Ok(Concept {
        id: dbpedia(fields[0]),
        broader,
        primary_topic: dbpedia(fields[2]),
    })
}

/// Decode `example_id \t categories \t text`. The text is kept verbatim,
/// trailing newline and embedded tabs included.
pub fn decode_training_example(line: &str) -> Result<TrainingExample> {
    let mut fields = line.splitn(3, '\t');
    let (Some(id), Some(categories), Some(text)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed(line, line.split('\t').count()));
    };

    Ok(TrainingExample {
        id: dbpedia(id),
        concepts: categories.split_whitespace().map(dbpedia).collect(),
        text: text.to_string(),
    })
}

fn malformed(line: &str, found: usize) -> ImportError {
    ImportError::MalformedRecord {
        line: line.trim_end().to_string(),
        expected: 3,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_broader_is_empty() {
        let c = decode_concept("cat\t\\N\tdog").unwrap();
        assert_eq!(c.id, "http://dbpedia.org/resource/cat");
        assert!(c.broader.is_empty());
        assert_eq!(c.primary_topic, "http://dbpedia.org/resource/dog");
    }

    #[test]
    fn null_broader_with_padding() {
        let c = decode_concept("cat\t \\N \tdog\n").unwrap();
        assert!(c.broader.is_empty());
        assert_eq!(c.primary_topic, "http://dbpedia.org/resource/dog");
    }

    #[test]
    fn broader_tokens_are_prefixed_in_order() {
        let c = decode_concept("Category:Cats\tCategory:Felines Category:Pets  Category:Felines\tCat\n")
            .unwrap();
        assert_eq!(
            c.broader,
            vec![
                "http://dbpedia.org/resource/Category:Felines",
                "http://dbpedia.org/resource/Category:Pets",
                "http://dbpedia.org/resource/Category:Felines",
            ]
        );
        assert_eq!(c.primary_topic, "http://dbpedia.org/resource/Cat");
    }

    #[test]
    fn short_concept_line_is_malformed() {
        let err = decode_concept("cat\tdog\n").unwrap_err();
        match err {
            ImportError::MalformedRecord { expected, found, .. } => {
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn training_example_keeps_body_verbatim() {
        let e = decode_training_example("ex1\tfoo bar\tsome text\n").unwrap();
        assert_eq!(e.id, "http://dbpedia.org/resource/ex1");
        assert_eq!(
            e.concepts,
            vec![
                "http://dbpedia.org/resource/foo",
                "http://dbpedia.org/resource/bar",
            ]
        );
        assert_eq!(e.text, "some text\n");
    }

    #[test]
    fn training_body_may_contain_tabs() {
        let e = decode_training_example("ex2\tfoo\tcol a\tcol b\n").unwrap();
        assert_eq!(e.text, "col a\tcol b\n");
    }

    #[test]
    fn training_line_without_body_is_malformed() {
        assert!(matches!(
            decode_training_example("ex3\tfoo\n"),
            Err(ImportError::MalformedRecord { found: 2, .. })
        ));
    }
}
