#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    pub body: Option<String>,
}

impl Commit {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = (!body.trim().is_empty()).then_some(body);
        self
    }

    /// Subject line followed by the extended body, if any.
    pub fn full_text(&self) -> String {
        match &self.body {
            Some(body) => format!("{}\n{}", self.message, body),
            None => self.message.clone(),
        }
    }
}
