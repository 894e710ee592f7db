use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::json;

use crate::models::{
    AcademicLevel, BibliographyStyle, GenerationReply, GenerationRequest, ImproveFocus,
    RewriteOutline, TaskKind,
};
use crate::services::outline;

/// Returned when the remote model answers without a text field.
pub const FALLBACK_TEXT: &str = "Unable to generate content. Please try again.";

const DUMMY_KEY: &str = "dummy_key";

/// Chat-completion client for an OpenRouter-compatible endpoint. One call per
/// user action; no retry, no streaming.
pub struct GenerationClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GenerationClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        GenerationClient {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// The API credential is the only environment-supplied secret. Without it
    /// the client still runs against keyless local endpoints.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("OPENROUTER_API_KEY").unwrap_or_else(|_| DUMMY_KEY.to_string());
        let base_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());
        Self::new(base_url, api_key)
    }

    /// Sends one chat request: the task's fixed system instruction plus one
    /// user message embedding prompt, context and complexity. Returns the
    /// first choice's text or the fixed fallback string.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationReply> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| request.task.default_model().to_string());

        let user_message = match &request.context {
            Some(context) => format!(
                "Context: {context}\n\nComplexity Level: {}\n\nRequest: {}",
                request.complexity.unwrap_or_default().as_str(),
                request.prompt
            ),
            None => request.prompt.clone(),
        };

        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": request.task.system_prompt() },
                { "role": "user", "content": user_message },
            ],
            "temperature": request.task.temperature(),
            "max_tokens": request.task.max_tokens(),
        });

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body);
        if self.api_key != DUMMY_KEY {
            builder = builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            );
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("generation endpoint returned HTTP {status}"));
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_else(|| FALLBACK_TEXT.to_string());

        Ok(GenerationReply { content, model })
    }

    /// Chapter generation for the side panel: the chapter kind is picked by
    /// keyword match on the user's prompt.
    pub async fn generate_chapter(
        &self,
        prompt: &str,
        thesis_title: &str,
        level: AcademicLevel,
    ) -> Result<String> {
        let kind = ChapterKind::from_prompt(prompt);
        let request = GenerationRequest {
            prompt: chapter_prompt(kind, prompt, thesis_title, level),
            task: TaskKind::Content,
            complexity: Some(level.complexity()),
            model: None,
            context: None,
        };
        Ok(self.generate(&request).await?.content)
    }

    pub async fn improve_text(&self, text: &str, focus: Option<ImproveFocus>) -> Result<String> {
        let request = GenerationRequest {
            prompt: improve_prompt(text, focus),
            task: TaskKind::Improve,
            complexity: None,
            model: None,
            context: None,
        };
        Ok(self.generate(&request).await?.content)
    }

    pub async fn generate_bibliography(
        &self,
        topic: &str,
        count: usize,
        style: BibliographyStyle,
    ) -> Result<String> {
        let request = GenerationRequest {
            prompt: bibliography_prompt(topic, count, style),
            task: TaskKind::Bibliography,
            complexity: None,
            model: None,
            context: None,
        };
        Ok(self.generate(&request).await?.content)
    }

    /// Requests a full thesis rewrite and decomposes the response with the
    /// best-effort outline parser.
    pub async fn rewrite_thesis(
        &self,
        current_title: &str,
        new_topic: &str,
        field: &str,
        level: AcademicLevel,
    ) -> Result<RewriteOutline> {
        let request = GenerationRequest {
            prompt: rewrite_prompt(current_title, new_topic, field, level),
            task: TaskKind::Rewrite,
            complexity: Some(level.complexity()),
            model: None,
            context: None,
        };
        let reply = self.generate(&request).await?;
        Ok(outline::parse_rewrite(&reply.content))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterKind {
    Introduction,
    Literature,
    Methodology,
    Results,
    Conclusion,
    Default,
}

impl ChapterKind {
    pub fn from_prompt(prompt: &str) -> Self {
        let lower = prompt.to_lowercase();
        if lower.contains("introduction") {
            ChapterKind::Introduction
        } else if lower.contains("literature") {
            ChapterKind::Literature
        } else if lower.contains("methodology") {
            ChapterKind::Methodology
        } else if lower.contains("result") {
            ChapterKind::Results
        } else if lower.contains("conclusion") {
            ChapterKind::Conclusion
        } else {
            ChapterKind::Default
        }
    }
}

fn chapter_prompt(
    kind: ChapterKind,
    prompt: &str,
    thesis_title: &str,
    level: AcademicLevel,
) -> String {
    let level = level.as_str();
    match kind {
        ChapterKind::Introduction => format!(
            "Write a comprehensive introduction chapter for a {level}-level thesis titled \"{thesis_title}\". Include: background with context and significance, clear problem statement with research questions, specific objectives and hypotheses, scope and limitations, thesis structure overview, and contribution summary. Use formal academic language with proper citations and examples. Make it detailed and scholarly."
        ),
        ChapterKind::Literature => format!(
            "Write an extensive literature review for \"{thesis_title}\" at {level} level. Include: systematic review of relevant literature, theoretical frameworks, methodological approaches in the field, critical analysis of existing work, identification of research gaps, and positioning of current research. Organize thematically with proper academic citations. Ensure comprehensive coverage."
        ),
        ChapterKind::Methodology => format!(
            "Write a detailed methodology chapter for \"{thesis_title}\" at {level} level. Include: research paradigm and philosophy, research design and approach, data collection methods, sampling strategy, data analysis techniques, validity and reliability measures, ethical considerations, and limitations. Justify all methodological choices with academic rigor."
        ),
        ChapterKind::Results => format!(
            "Write a comprehensive results and analysis chapter for \"{thesis_title}\" at {level} level. Include: presentation of findings, statistical analysis, interpretation of results, comparison with existing research, discussion of implications, and references to figures and tables. Maintain objectivity and academic rigor."
        ),
        ChapterKind::Conclusion => format!(
            "Write a thorough conclusion chapter for \"{thesis_title}\" at {level} level. Include: summary of key findings, theoretical contributions, practical implications, limitations and challenges, recommendations for practice, suggestions for future research, and final reflections. Synthesize the entire work."
        ),
        ChapterKind::Default => format!(
            "Write comprehensive academic content for a chapter titled \"{prompt}\" in a {level}-level thesis about \"{thesis_title}\". Ensure scholarly depth, proper structure, academic language, and appropriate complexity for the academic level. Include relevant examples, theoretical frameworks, and critical analysis."
        ),
    }
}

fn improve_prompt(text: &str, focus: Option<ImproveFocus>) -> String {
    let focus_line = focus
        .map(|f| format!(" Focus specifically on improving {}.", f.as_str()))
        .unwrap_or_default();
    format!(
        "Improve this academic text for better scholarly quality:\n\n\"{text}\"\n\n{focus_line} Maintain academic rigor while enhancing readability and precision. Add depth and sophistication where appropriate."
    )
}

fn bibliography_prompt(topic: &str, count: usize, style: BibliographyStyle) -> String {
    format!(
        "Generate {count} realistic, high-quality BibTeX entries for academic references related to \"{topic}\". {}. Include: a mix of journal articles, conference papers, books, and technical reports; proper DOI and URL fields where applicable; complete author names and affiliations; accurate publication details with realistic venues; relevant keywords and abstracts where appropriate. Ensure all entries are properly formatted BibTeX and use realistic publication years and venues for the field.",
        style.hint()
    )
}

fn rewrite_prompt(
    current_title: &str,
    new_topic: &str,
    field: &str,
    level: AcademicLevel,
) -> String {
    format!(
        "Transform the thesis \"{current_title}\" to focus on \"{new_topic}\" in the field of \"{field}\".\n\nGenerate:\n1. A new professional thesis title\n2. 5-7 comprehensive chapters with titles and detailed content\n3. Ensure academic rigor appropriate for {} level\n4. Include proper academic structure and scholarly language\n5. Make each chapter substantial with theoretical frameworks, methodologies, and analysis\n\nFormat the response as:\nTITLE: [New thesis title]\n\nCHAPTER 1: [Chapter title]\n[Detailed chapter content...]\n\nCHAPTER 2: [Chapter title]\n[Detailed chapter content...]\n\nContinue for all chapters.",
        level.as_str()
    )
}
