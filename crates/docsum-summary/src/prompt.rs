//! Prompt composition.

use crate::error::PromptError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prepends the operator's prompt template to extracted text.
///
/// The template is read again on every call so edits apply to the next file.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    template_path: PathBuf,
}

impl PromptComposer {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// `template + "\n" + extracted_text`.
    pub fn compose(&self, extracted_text: &str) -> Result<String, PromptError> {
        compose(&self.template_path, extracted_text)
    }
}

/// Read the template at `template_path` and return `template + "\n" + extracted_text`.
pub fn compose(template_path: &Path, extracted_text: &str) -> Result<String, PromptError> {
    let template =
        std::fs::read_to_string(template_path).map_err(|source| PromptError::TemplateMissing {
            path: template_path.to_path_buf(),
            source,
        })?;

    debug!(
        "Composed prompt from {:?} ({} + {} chars)",
        template_path,
        template.len(),
        extracted_text.len()
    );

    let mut prompt = String::with_capacity(template.len() + 1 + extracted_text.len());
    prompt.push_str(&template);
    prompt.push('\n');
    prompt.push_str(extracted_text);
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_compose_is_template_newline_text() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("summarize-notes.md");
        let template = "# Summarize\n\nWrite three bullet points about:\n";
        std::fs::write(&template_path, template).unwrap();

        let text = "Quarterly revenue grew 12%.\nCosts were flat.";
        let prompt = compose(&template_path, text).unwrap();

        assert_eq!(
            prompt.as_bytes(),
            format!("{}\n{}", template, text).as_bytes()
        );
        assert_eq!(prompt.strip_prefix(template).unwrap(), "\nQuarterly revenue grew 12%.\nCosts were flat.");
    }

    #[test]
    fn test_compose_rereads_template() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("prompt.md");
        let composer = PromptComposer::new(&template_path);

        std::fs::write(&template_path, "first").unwrap();
        assert_eq!(composer.compose("body").unwrap(), "first\nbody");

        std::fs::write(&template_path, "second").unwrap();
        assert_eq!(composer.compose("body").unwrap(), "second\nbody");
    }

    #[test]
    fn test_compose_missing_template() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.md");

        let err = compose(&missing, "text").unwrap_err();
        match err {
            PromptError::TemplateMissing { path, .. } => assert_eq!(path, missing),
        }
    }

    #[test]
    fn test_compose_directory_is_missing_template() {
        let dir = tempdir().unwrap();
        assert!(compose(dir.path(), "text").is_err());
    }
}
