pub mod fixtures {
    use lopdf::{
        content::{Content, Operation},
        Dictionary, Document, Object, Stream, StringFormat,
    };

    use crate::models::domain::Question;

    /// One `BT … Td … Tj … ET` block: a fragment at `(x, y)` in page space.
    pub fn line(x: i64, y: i64, text: &str) -> (i64, i64, String) {
        (x, y, text.to_string())
    }

    pub struct PdfPage {
        pub fragments: Vec<(i64, i64, String)>,
    }

    impl PdfPage {
        pub fn new(fragments: Vec<(i64, i64, String)>) -> Self {
            Self { fragments }
        }
    }

    /// Builds an in-memory PDF with one content stream per page.
    pub fn build_pdf(pages: &[PdfPage]) -> Vec<u8> {
        build_pdf_with_info(pages, &[])
    }

    pub fn build_pdf_with_info(pages: &[PdfPage], info: &[(&str, &str)]) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for page in pages {
            let mut operations = Vec::new();
            for (x, y, text) in &page.fragments {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(*x), Object::Integer(*y)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(text.as_str())],
                ));
                operations.push(Operation::new("ET", vec![]));
            }

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                content.encode().expect("content should encode"),
            ));

            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(page_ids.len() as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        if !info.is_empty() {
            let mut info_dict = Dictionary::new();
            for (key, value) in info {
                info_dict.set(*key, Object::string_literal(*value));
            }
            let info_id = doc.add_object(info_dict);
            doc.trailer.set("Info", Object::Reference(info_id));
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("test PDF should save");
        buffer
    }

    /// `BT /<font> 12 Tf x y Td <bytes> Tj ET`, with the string written in hex
    /// so arbitrary bytes survive a save.
    pub fn text_ops(font: &str, x: i64, y: i64, bytes: &[u8]) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(12)],
            ),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(bytes.to_vec(), StringFormat::Hexadecimal)],
            ),
            Operation::new("ET", vec![]),
        ]
    }

    /// A Type1 Helvetica font dictionary, optionally with a named encoding.
    pub fn simple_font(encoding: Option<&str>) -> Dictionary {
        let mut font = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]);
        if let Some(encoding) = encoding {
            font.set("Encoding", Object::Name(encoding.as_bytes().to_vec()));
        }
        font
    }

    /// Builds a one-page PDF whose content operations and `/Resources` are
    /// produced by `page`, which may add further objects (fonts, forms) first.
    pub fn build_single_page_pdf(
        page: impl FnOnce(&mut Document) -> (Vec<Operation>, Dictionary),
    ) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let (operations, resources) = page(&mut doc);
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("content should encode"),
        ));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]));

        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(1)),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("test PDF should save");
        buffer
    }

    /// Adds a `/Subtype /Form` XObject stream and returns its id.
    pub fn add_form_xobject(
        doc: &mut Document,
        operations: Vec<Operation>,
        matrix: [i64; 6],
        resources: Dictionary,
    ) -> lopdf::ObjectId {
        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Form".to_vec())),
            (
                "BBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            (
                "Matrix",
                Object::Array(matrix.iter().map(|n| Object::Integer(*n)).collect()),
            ),
            ("Resources", Object::Dictionary(resources)),
        ]);
        let content = Content { operations };
        doc.add_object(Stream::new(
            dict,
            content.encode().expect("form content should encode"),
        ))
    }

    pub fn sample_question() -> Question {
        Question {
            question: Some("What is the capital of France?".to_string()),
            options: Some(vec![
                "Paris".to_string(),
                "Lyon".to_string(),
                "Marseille".to_string(),
                "Nice".to_string(),
            ]),
            correct_answer: Some("Paris".to_string()),
            explanation: Some("Paris has been the capital since 987.".to_string()),
        }
    }

    /// A model reply wrapping `count` questions in chatty prose and a code fence.
    pub fn sample_model_reply(count: usize) -> String {
        let questions: Vec<Question> = (0..count).map(|_| sample_question()).collect();
        format!(
            "Sure! Here are your questions:\n```json\n{}\n```\nGood luck!",
            serde_json::to_string_pretty(&questions).expect("questions should serialize")
        )
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }

    /// Hand-built `multipart/form-data` body for handler tests.
    pub struct MultipartBody {
        boundary: String,
        body: Vec<u8>,
    }

    impl MultipartBody {
        pub fn new() -> Self {
            Self {
                boundary: "----quizgen-test-boundary".to_string(),
                body: Vec::new(),
            }
        }

        pub fn text(mut self, name: &str, value: &str) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    self.boundary, name, value
                )
                .as_bytes(),
            );
            self
        }

        pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    self.boundary, name, file_name, content_type
                )
                .as_bytes(),
            );
            self.body.extend_from_slice(data);
            self.body.extend_from_slice(b"\r\n");
            self
        }

        pub fn content_type(&self) -> String {
            format!("multipart/form-data; boundary={}", self.boundary)
        }

        pub fn finish(mut self) -> (String, Vec<u8>) {
            self.body
                .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
            (self.content_type(), self.body)
        }
    }

    impl Default for MultipartBody {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_build_pdf_loads_back() {
        let pdf = build_pdf(&[PdfPage::new(vec![line(72, 700, "hi")]), PdfPage::new(vec![])]);
        let doc = lopdf::Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_sample_model_reply_mentions_every_question() {
        let reply = sample_model_reply(3);
        assert_eq!(reply.matches("capital of France").count(), 3);
    }
}
