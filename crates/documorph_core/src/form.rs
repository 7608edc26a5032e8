use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// A file to attach under a multipart field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub field: String,
    pub path: PathBuf,
}

/// Snapshot of a submitted form: where it posts to and what it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    page_path: String,
    fields: Vec<FormField>,
    attachments: Vec<Attachment>,
}

impl FormData {
    pub fn new(page_path: impl Into<String>) -> Self {
        let mut page_path = page_path.into();
        if !page_path.starts_with('/') {
            page_path.insert(0, '/');
        }
        Self {
            page_path,
            fields: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Sets a field, replacing an earlier value with the same name.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(FormField { name, value }),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn with_attachment(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(Attachment {
            field: field.into(),
            path: path.into(),
        });
        self
    }
}
