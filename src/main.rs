mod models;
mod services;
mod utils;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use models::{
    AcademicLevel, AssistKind, AssistRequest, Chapter, CompilationState, CompilationStatus,
    GenerationReply, GenerationRequest, MAX_CHAPTERS, RewriteOutline, RewriteRequest,
    ThesisRecord,
};
use services::compiler::CompileClient;
use services::diagrams::{self, DiagramFormat, DiagramRequest, DiagramStyle};
use services::latex::{self, RenderedLatex};
use services::llm::GenerationClient;

#[derive(Clone)]
struct AppState {
    thesis: Arc<RwLock<ThesisRecord>>,
    status: Arc<RwLock<CompilationStatus>>,
    llm: Arc<GenerationClient>,
    compiler: Arc<CompileClient>,
}

impl AppState {
    fn new(llm: GenerationClient, compiler: CompileClient) -> Self {
        AppState {
            thesis: Arc::new(RwLock::new(ThesisRecord::default())),
            status: Arc::new(RwLock::new(CompilationStatus::idle())),
            llm: Arc::new(llm),
            compiler: Arc::new(compiler),
        }
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/thesis", get(get_thesis).put(put_thesis))
        .route("/thesis/chapters", post(add_chapter))
        .route("/thesis/chapters/:index", put(set_chapter).delete(remove_chapter))
        .route("/render", get(render_latex))
        .route("/compile", post(compile_thesis))
        .route("/status", get(compilation_status))
        .route("/download/pdf/:id", get(download_pdf))
        .route("/download/source", get(download_source))
        .route("/generate", post(generate))
        .route("/assist", post(assist))
        .route("/rewrite", post(rewrite))
        .route("/diagrams", get(list_diagrams))
        .route("/diagram", post(render_diagram))
        .route("/diagram/:id/download", get(download_diagram))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let state = AppState::new(GenerationClient::from_env(), CompileClient::from_env());
    let app = app(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<String> {
    let html_content = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>ThesisForge</title>
        <meta charset="utf-8">
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .info-box { background-color: #f0f8ff; padding: 20px; border-radius: 8px; margin: 20px 0; }
            .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
        </style>
    </head>
    <body>
        <h1>ThesisForge</h1>

        <div class="info-box">
            <h2>Service Information</h2>
            <p>This service assembles thesis metadata into a LaTeX document, compiles it to PDF via remote compilation services, and offers AI-assisted content generation.</p>
        </div>

        <h2>Available Endpoints:</h2>
        <div class="endpoint">GET / - This information page</div>
        <div class="endpoint">GET /health - Health check</div>
        <div class="endpoint">GET|PUT /thesis - Read or replace the thesis record</div>
        <div class="endpoint">POST /thesis/chapters - Append a chapter (max 6)</div>
        <div class="endpoint">PUT|DELETE /thesis/chapters/{index} - Replace or remove a chapter (min 1)</div>
        <div class="endpoint">GET /render - Generated LaTeX source files</div>
        <div class="endpoint">POST /compile - Compile the thesis to PDF</div>
        <div class="endpoint">GET /status - Last compilation status</div>
        <div class="endpoint">GET /download/pdf/{id} - Download a compiled PDF</div>
        <div class="endpoint">GET /download/source - Download the LaTeX sources as a zip</div>
        <div class="endpoint">POST /generate - Raw AI text generation</div>
        <div class="endpoint">POST /assist - Side-panel generation (chapter, improve, bibliography)</div>
        <div class="endpoint">POST /rewrite - Rewrite the thesis for a new topic</div>
        <div class="endpoint">GET /diagrams - Diagram template catalog</div>
        <div class="endpoint">POST /diagram - Render a diagram template</div>
        <div class="endpoint">GET /diagram/{id}/download - Download diagram source</div>
    </body>
    </html>
    "#
    .to_string();

    Html(html_content)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn get_thesis(State(state): State<AppState>) -> Json<ThesisRecord> {
    Json(state.thesis.read().await.clone())
}

async fn put_thesis(
    State(state): State<AppState>,
    Json(mut record): Json<ThesisRecord>,
) -> Json<ThesisRecord> {
    // Whole-record replacement; the chapter bounds stay loosely enforced.
    if record.chapters.is_empty() {
        record.chapters.push(Chapter::placeholder());
    }
    record.chapters.truncate(MAX_CHAPTERS);
    *state.thesis.write().await = record.clone();
    Json(record)
}

async fn add_chapter(State(state): State<AppState>) -> Json<ThesisRecord> {
    let mut record = state.thesis.write().await;
    record.add_chapter();
    Json(record.clone())
}

async fn set_chapter(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(chapter): Json<Chapter>,
) -> Result<Json<ThesisRecord>, StatusCode> {
    let mut record = state.thesis.write().await;
    if record.set_chapter(index, chapter) {
        Ok(Json(record.clone()))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn remove_chapter(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Json<ThesisRecord> {
    let mut record = state.thesis.write().await;
    // Removing the last chapter or an out-of-range index is a silent no-op.
    record.remove_chapter(index);
    Json(record.clone())
}

async fn render_latex(State(state): State<AppState>) -> Json<RenderedLatex> {
    let record = state.thesis.read().await.clone();
    Json(latex::render(&record))
}

async fn compile_thesis(State(state): State<AppState>) -> Json<CompilationStatus> {
    let record = state.thesis.read().await.clone();
    let files = latex::render(&record);

    *state.status.write().await = CompilationStatus {
        state: CompilationState::Compiling,
        message: "Generating LaTeX files and compiling PDF...".to_string(),
        pdf_id: None,
        service: None,
        latex_source: Some(files.main_tex.clone()),
    };

    let status = match state.compiler.compile(&files).await {
        Ok(compiled) => CompilationStatus {
            state: CompilationState::Success,
            message: format!(
                "PDF compiled successfully using {}! Click to download your thesis.",
                compiled.service
            ),
            pdf_id: Some(compiled.pdf_id),
            service: Some(compiled.service),
            latex_source: Some(files.main_tex),
        },
        Err(err) => {
            tracing::error!(error = %err, "compilation failed");
            CompilationStatus {
                state: CompilationState::Failed,
                message: format!(
                    "Compilation failed: {err}. You can still download the LaTeX source files to compile manually."
                ),
                pdf_id: None,
                service: None,
                latex_source: Some(files.main_tex),
            }
        }
    };

    *state.status.write().await = status.clone();
    Json(status)
}

async fn compilation_status(State(state): State<AppState>) -> Json<CompilationStatus> {
    Json(state.status.read().await.clone())
}

async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    // Ids are uuids; anything else never names a stored file.
    let id = Uuid::try_parse(&id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let bytes = tokio::fs::read(state.compiler.pdf_path(&id))
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let title = state.thesis.read().await.title.clone();
    let filename = format!("{}_thesis.pdf", utils::safe_file_stem(&title));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

async fn download_source(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    let record = state.thesis.read().await.clone();
    let files = latex::render(&record);
    let bytes = utils::source_bundle(&files).map_err(|err| {
        tracing::error!(error = %err, "source bundling failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let filename = format!("{}_latex_source.zip", utils::safe_file_stem(&record.title));
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

type GenerationError = (StatusCode, Json<serde_json::Value>);

fn generation_error() -> GenerationError {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": "Failed to generate AI content. Please check your connection and try again."
        })),
    )
}

async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GenerationReply>, GenerationError> {
    match state.llm.generate(&request).await {
        Ok(reply) => Ok(Json(reply)),
        Err(err) => {
            tracing::error!(error = %err, task = ?request.task, "generation failed");
            Err(generation_error())
        }
    }
}

async fn assist(
    State(state): State<AppState>,
    Json(request): Json<AssistRequest>,
) -> Result<Json<serde_json::Value>, GenerationError> {
    // Mirrors the UI guard: everything but improve needs a prompt.
    if request.prompt.trim().is_empty() && request.kind != AssistKind::Improve {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "A prompt is required." })),
        ));
    }

    let result = match request.kind {
        AssistKind::Chapter => {
            let thesis_title = match request.thesis_title {
                Some(title) => title,
                None => state.thesis.read().await.title.clone(),
            };
            state
                .llm
                .generate_chapter(&request.prompt, &thesis_title, AcademicLevel::default())
                .await
        }
        AssistKind::Improve => match request.current_content {
            Some(content) => state.llm.improve_text(&content, request.focus).await,
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "There is no content to improve." })),
                ));
            }
        },
        AssistKind::Bibliography => {
            state
                .llm
                .generate_bibliography(
                    &request.prompt,
                    request.count.unwrap_or(5),
                    request.style.unwrap_or_default(),
                )
                .await
        }
    };

    match result {
        Ok(content) => Ok(Json(json!({ "content": content }))),
        Err(err) => {
            tracing::error!(error = %err, kind = ?request.kind, "assist generation failed");
            Err(generation_error())
        }
    }
}

async fn rewrite(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteOutline>, GenerationError> {
    let current_title = match request.current_title {
        Some(title) => title,
        None => state.thesis.read().await.title.clone(),
    };

    let outline = state
        .llm
        .rewrite_thesis(&current_title, &request.new_topic, &request.field, request.level)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "thesis rewrite failed");
            generation_error()
        })?;

    if request.apply {
        let mut record = state.thesis.write().await;
        record.title = outline.title.clone();
        // Chapters splice in only when the parser found any, clamped to the
        // form's maximum.
        if !outline.chapters.is_empty() {
            let mut chapters = outline.chapters.clone();
            chapters.truncate(MAX_CHAPTERS);
            record.chapters = chapters;
        }
    }

    Ok(Json(outline))
}

async fn list_diagrams() -> Json<[diagrams::TemplateMeta; 8]> {
    Json(diagrams::TEMPLATES)
}

async fn render_diagram(Json(request): Json<DiagramRequest>) -> Json<diagrams::DiagramResponse> {
    Json(diagrams::render(&request))
}

#[derive(Debug, Deserialize)]
struct DiagramDownloadQuery {
    #[serde(default)]
    format: DiagramFormat,
    #[serde(default)]
    style: DiagramStyle,
    #[serde(default)]
    context: Option<String>,
}

async fn download_diagram(
    Path(id): Path<String>,
    Query(query): Query<DiagramDownloadQuery>,
) -> impl IntoResponse {
    let request = DiagramRequest {
        template: id,
        format: query.format,
        style: query.style,
        context: query.context,
    };
    let response = diagrams::render(&request);

    let content = match query.format {
        DiagramFormat::Tikz => diagrams::standalone_tikz(&response.code),
        _ => response.code.clone(),
    };
    let filename = diagrams::file_name(&response.title, query.format);
    (
        [
            (header::CONTENT_TYPE, query.format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    )
}
