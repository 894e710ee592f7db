use std::path::PathBuf;

use anyhow::{Result, anyhow};
use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use crate::services::latex::RenderedLatex;

/// One remote compilation endpoint together with the multipart field name it
/// expects for uploaded files.
#[derive(Debug, Clone)]
pub struct CompileService {
    pub name: String,
    pub url: String,
    pub file_field: String,
}

/// The statically ordered fallback chain. LaTeX.Online takes `resources`
/// parts, LaTeXOnline.cc takes `files[]` parts.
pub fn default_services() -> Vec<CompileService> {
    vec![
        CompileService {
            name: "LaTeX.Online".to_string(),
            url: "https://latex.ytotech.com/builds/sync".to_string(),
            file_field: "resources".to_string(),
        },
        CompileService {
            name: "LaTeXOnline.cc".to_string(),
            url: "https://latexonline.cc/compile".to_string(),
            file_field: "files[]".to_string(),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct CompiledPdf {
    pub service: String,
    pub pdf_id: String,
}

pub struct CompileClient {
    client: reqwest::Client,
    services: Vec<CompileService>,
    output_dir: PathBuf,
}

impl CompileClient {
    pub fn new(services: Vec<CompileService>, output_dir: impl Into<PathBuf>) -> Self {
        CompileClient {
            client: reqwest::Client::new(),
            services,
            output_dir: output_dir.into(),
        }
    }

    pub fn from_env() -> Self {
        let output_dir = std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./output".to_string());
        Self::new(default_services(), output_dir)
    }

    pub fn pdf_path(&self, id: &Uuid) -> PathBuf {
        self.output_dir.join(format!("{id}.pdf"))
    }

    /// Tries each service in order and keeps the first accepted result. A
    /// result is accepted only on a success status with a PDF content type.
    /// Sequential: one request in flight at a time, no retry, no backoff.
    pub async fn compile(&self, files: &RenderedLatex) -> Result<CompiledPdf> {
        let mut last_error = "no compilation services configured".to_string();

        for service in &self.services {
            tracing::info!(service = %service.name, "trying compilation service");
            match self.try_service(service, files).await {
                Ok(bytes) => {
                    let id = Uuid::new_v4();
                    tokio::fs::create_dir_all(&self.output_dir).await?;
                    tokio::fs::write(self.pdf_path(&id), &bytes).await?;
                    tracing::info!(service = %service.name, pdf_id = %id, "compilation succeeded");
                    return Ok(CompiledPdf {
                        service: service.name.clone(),
                        pdf_id: id.to_string(),
                    });
                }
                Err(err) => {
                    tracing::warn!(service = %service.name, error = %err, "compilation service failed");
                    last_error = err.to_string();
                }
            }
        }

        Err(anyhow!("All compilation services failed. Last error: {last_error}"))
    }

    async fn try_service(&self, service: &CompileService, files: &RenderedLatex) -> Result<Vec<u8>> {
        let form = Form::new()
            .text("compiler", "pdflatex")
            .part(
                service.file_field.clone(),
                Part::text(files.main_tex.clone())
                    .file_name("main.tex")
                    .mime_str("text/plain")?,
            )
            .part(
                service.file_field.clone(),
                Part::text(files.references_bib.clone())
                    .file_name("references.bib")
                    .mime_str("text/plain")?,
            );

        let response = self
            .client
            .post(&service.url)
            .header(reqwest::header::ACCEPT, "application/pdf")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP {status}: {body}"));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("application/pdf") {
            return Err(anyhow!("Invalid response type: {content_type}"));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThesisRecord;
    use crate::services::latex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PDF_BYTES: &[u8] = b"%PDF-1.5 fake body";

    fn rendered() -> RenderedLatex {
        latex::render(&ThesisRecord::default())
    }

    fn service(name: &str, url: String, field: &str) -> CompileService {
        CompileService {
            name: name.to_string(),
            url,
            file_field: field.to_string(),
        }
    }

    #[tokio::test]
    async fn falls_back_to_second_service_and_attributes_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/first"))
            .respond_with(ResponseTemplate::new(500).set_body_string("compiler exploded"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/second"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BYTES, "application/pdf"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = CompileClient::new(
            vec![
                service("LaTeX.Online", format!("{}/first", server.uri()), "resources"),
                service("LaTeXOnline.cc", format!("{}/second", server.uri()), "files[]"),
            ],
            dir.path(),
        );

        let compiled = client.compile(&rendered()).await.unwrap();
        assert_eq!(compiled.service, "LaTeXOnline.cc");

        let id = Uuid::try_parse(&compiled.pdf_id).unwrap();
        let stored = std::fs::read(client.pdf_path(&id)).unwrap();
        assert_eq!(stored, PDF_BYTES);
    }

    #[tokio::test]
    async fn first_success_short_circuits_the_chain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/first"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BYTES, "application/pdf"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/second"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BYTES, "application/pdf"))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = CompileClient::new(
            vec![
                service("LaTeX.Online", format!("{}/first", server.uri()), "resources"),
                service("LaTeXOnline.cc", format!("{}/second", server.uri()), "files[]"),
            ],
            dir.path(),
        );

        let compiled = client.compile(&rendered()).await.unwrap();
        assert_eq!(compiled.service, "LaTeX.Online");
    }

    #[tokio::test]
    async fn wrong_content_type_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/only"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>queued</html>"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = CompileClient::new(
            vec![service("LaTeX.Online", format!("{}/only", server.uri()), "resources")],
            dir.path(),
        );

        let err = client.compile(&rendered()).await.unwrap_err();
        assert!(err.to_string().contains("All compilation services failed"));
    }

    #[tokio::test]
    async fn exhausted_chain_reports_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/first"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/second"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = CompileClient::new(
            vec![
                service("LaTeX.Online", format!("{}/first", server.uri()), "resources"),
                service("LaTeXOnline.cc", format!("{}/second", server.uri()), "files[]"),
            ],
            dir.path(),
        );

        let err = client.compile(&rendered()).await.unwrap_err();
        assert!(err.to_string().contains("gone"));
        // No PDF was written.
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
