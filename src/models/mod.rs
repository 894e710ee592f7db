use serde::{Deserialize, Serialize};

/// Chapters are bounded: the form always keeps at least one and never more
/// than six.
pub const MIN_CHAPTERS: usize = 1;
pub const MAX_CHAPTERS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

impl Chapter {
    pub fn placeholder() -> Self {
        Chapter {
            title: "New Chapter".to_string(),
            content: "Chapter content goes here...".to_string(),
        }
    }
}

/// The user-editable thesis record. Mutated only by whole-field replacement;
/// there are no derived or cached fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThesisRecord {
    pub title: String,
    pub author: String,
    pub university: String,
    pub degree: String,
    pub supervisor: String,
    pub year: String,
    pub chapters: Vec<Chapter>,
    pub bibliography: String,
}

impl ThesisRecord {
    /// Appends a placeholder chapter. No effect at the maximum.
    pub fn add_chapter(&mut self) -> bool {
        if self.chapters.len() >= MAX_CHAPTERS {
            return false;
        }
        self.chapters.push(Chapter::placeholder());
        true
    }

    /// Removes the chapter at `index`. No effect at the minimum or out of
    /// range.
    pub fn remove_chapter(&mut self, index: usize) -> bool {
        if self.chapters.len() <= MIN_CHAPTERS || index >= self.chapters.len() {
            return false;
        }
        self.chapters.remove(index);
        true
    }

    /// Replaces the chapter at `index` wholesale.
    pub fn set_chapter(&mut self, index: usize, chapter: Chapter) -> bool {
        match self.chapters.get_mut(index) {
            Some(slot) => {
                *slot = chapter;
                true
            }
            None => false,
        }
    }
}

impl Default for ThesisRecord {
    fn default() -> Self {
        ThesisRecord {
            title: "Machine Learning Applications in Renewable Energy Systems".to_string(),
            author: "John Doe".to_string(),
            university: "University of Technology".to_string(),
            degree: "Master of Technology".to_string(),
            supervisor: "Dr. Jane Smith".to_string(),
            year: "2024".to_string(),
            chapters: vec![
                Chapter {
                    title: "Introduction".to_string(),
                    content: "This chapter introduces the research problem and objectives. The rapid growth of renewable energy systems has created new challenges in optimization and prediction that can be addressed through machine learning techniques.".to_string(),
                },
                Chapter {
                    title: "Literature Review".to_string(),
                    content: "This chapter reviews existing literature on machine learning applications in renewable energy. Previous studies have shown promising results in wind power forecasting and solar energy optimization.".to_string(),
                },
                Chapter {
                    title: "Methodology".to_string(),
                    content: "This chapter describes the methodology used in the research. We employed deep learning neural networks and ensemble methods to predict energy output from weather data.".to_string(),
                },
                Chapter {
                    title: "Results and Analysis".to_string(),
                    content: "This chapter presents the results of our experiments. The proposed model achieved 95% accuracy in predicting solar energy output, outperforming traditional statistical methods.".to_string(),
                },
                Chapter {
                    title: "Conclusion".to_string(),
                    content: "This chapter concludes the thesis with a summary of findings and future work. Our research demonstrates the potential of machine learning in optimizing renewable energy systems.".to_string(),
                },
            ],
            bibliography: "@article{smith2023ml,\n  title={Machine Learning for Renewable Energy: A Comprehensive Review},\n  author={Smith, Jane and Johnson, Bob},\n  journal={Energy Systems Journal},\n  volume={45},\n  number={3},\n  pages={123--145},\n  year={2023},\n  publisher={Academic Press}\n}\n\n@inproceedings{doe2022solar,\n  title={Deep Learning Approaches for Solar Energy Prediction},\n  author={Doe, John and Wilson, Alice},\n  booktitle={International Conference on Renewable Energy},\n  pages={67--78},\n  year={2022},\n  organization={IEEE}\n}".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationState {
    Idle,
    Compiling,
    Success,
    Failed,
}

/// Last compilation outcome, kept for the status endpoint. On failure the
/// rendered source stays in `latex_source` so the user is never left without
/// an artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationStatus {
    pub state: CompilationState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latex_source: Option<String>,
}

impl CompilationStatus {
    pub fn idle() -> Self {
        CompilationStatus {
            state: CompilationState::Idle,
            message: "Ready to compile".to_string(),
            pdf_id: None,
            service: None,
            latex_source: None,
        }
    }
}

/// Task tag for the generation client. Each task carries a fixed system
/// instruction, a default model and sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Content,
    Improve,
    Latex,
    Bibliography,
    Structure,
    Diagram,
    Outline,
    Rewrite,
    Enhance,
}

pub const MODEL_DEEPSEEK_R1: &str = "deepseek/deepseek-r1-0528:free";
pub const MODEL_DEEPSEEK_QWEN: &str = "deepseek/deepseek-r1-0528-qwen3-8b:free";
pub const MODEL_MISTRAL_SMALL: &str = "mistralai/mistral-small-3.2-24b-instruct:free";

impl TaskKind {
    pub fn system_prompt(self) -> &'static str {
        match self {
            TaskKind::Content => "You are an expert academic writing assistant. Generate comprehensive, well-structured scholarly content with proper citations, examples, and academic rigor. Use formal academic language appropriate for peer review.",
            TaskKind::Improve => "You are a senior academic editor with expertise in scholarly writing. Enhance clarity, coherence, academic tone, and logical flow while preserving original meaning. Focus on precision and scholarly excellence.",
            TaskKind::Latex => "You are a LaTeX expert specializing in academic documents. Generate clean, well-formatted LaTeX code with proper document structure, mathematical equations, figures, tables, and cross-references. Include TikZ diagrams when appropriate.",
            TaskKind::Bibliography => "You are a bibliography specialist. Create properly formatted BibTeX entries following academic standards. Include DOI, proper capitalization, and complete bibliographic information.",
            TaskKind::Structure => "You are a thesis structure expert. Create detailed, logical thesis outlines with proper academic hierarchy, estimated page counts, and comprehensive section breakdowns.",
            TaskKind::Diagram => "You are a technical diagram specialist. Generate detailed TikZ/LaTeX code for academic diagrams including flowcharts, architectural diagrams, timelines, and conceptual frameworks.",
            TaskKind::Outline => "You are an academic planning expert. Create detailed chapter outlines with learning objectives, key concepts, and logical progression suitable for thesis-level work.",
            TaskKind::Rewrite => "You are an expert thesis transformation specialist. Completely rewrite and restructure academic content while maintaining scholarly rigor. Transform topics, methodologies, and focus areas while preserving academic quality.",
            TaskKind::Enhance => "You are a content enhancement specialist. Dramatically improve academic content by adding depth, sophistication, and scholarly rigor. Enhance complexity and academic level while maintaining clarity.",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            TaskKind::Content | TaskKind::Structure | TaskKind::Outline | TaskKind::Rewrite => {
                MODEL_DEEPSEEK_R1
            }
            TaskKind::Latex | TaskKind::Diagram => MODEL_DEEPSEEK_QWEN,
            TaskKind::Improve | TaskKind::Bibliography | TaskKind::Enhance => MODEL_MISTRAL_SMALL,
        }
    }

    /// Code-like output wants low temperature.
    pub fn temperature(self) -> f64 {
        match self {
            TaskKind::Latex | TaskKind::Bibliography => 0.3,
            _ => 0.7,
        }
    }

    /// Long-form tasks get the larger token ceiling.
    pub fn max_tokens(self) -> u32 {
        match self {
            TaskKind::Structure | TaskKind::Content | TaskKind::Rewrite => 4000,
            _ => 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Basic => "basic",
            Complexity::Intermediate => "intermediate",
            Complexity::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicLevel {
    Bachelor,
    #[default]
    Master,
    Phd,
}

impl AcademicLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AcademicLevel::Bachelor => "bachelor",
            AcademicLevel::Master => "master",
            AcademicLevel::Phd => "phd",
        }
    }

    pub fn complexity(self) -> Complexity {
        match self {
            AcademicLevel::Bachelor => Complexity::Basic,
            AcademicLevel::Master => Complexity::Intermediate,
            AcademicLevel::Phd => Complexity::Advanced,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub task: TaskKind,
    #[serde(default)]
    pub complexity: Option<Complexity>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReply {
    pub content: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    #[serde(default)]
    pub current_title: Option<String>,
    pub new_topic: String,
    pub field: String,
    #[serde(default)]
    pub level: AcademicLevel,
    /// Splice the parsed outline back into the thesis record.
    #[serde(default)]
    pub apply: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RewriteOutline {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistKind {
    Chapter,
    Improve,
    Bibliography,
}

/// Optional emphasis for the improve task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImproveFocus {
    Clarity,
    Flow,
    Grammar,
    AcademicTone,
}

impl ImproveFocus {
    pub fn as_str(self) -> &'static str {
        match self {
            ImproveFocus::Clarity => "clarity",
            ImproveFocus::Flow => "flow",
            ImproveFocus::Grammar => "grammar",
            ImproveFocus::AcademicTone => "academic tone",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BibliographyStyle {
    Recent,
    Foundational,
    #[default]
    Mixed,
}

impl BibliographyStyle {
    pub fn hint(self) -> &'static str {
        match self {
            BibliographyStyle::Recent => "Focus on publications from the last 3 years (2022-2024)",
            BibliographyStyle::Foundational => "Include seminal works and foundational papers",
            BibliographyStyle::Mixed => {
                "Include a mix of recent work (2022-2024) and foundational papers"
            }
        }
    }
}

/// One request from the side panel: the panel kind decides which prompt
/// builder runs.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistRequest {
    pub kind: AssistKind,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub thesis_title: Option<String>,
    #[serde(default)]
    pub current_content: Option<String>,
    #[serde(default)]
    pub focus: Option<ImproveFocus>,
    #[serde(default)]
    pub style: Option<BibliographyStyle>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_five_chapters_and_two_references() {
        let record = ThesisRecord::default();
        assert_eq!(record.chapters.len(), 5);
        assert_eq!(record.bibliography.matches('@').count(), 2);
    }

    #[test]
    fn add_chapter_stops_at_maximum() {
        let mut record = ThesisRecord::default();
        assert!(record.add_chapter());
        assert_eq!(record.chapters.len(), MAX_CHAPTERS);
        // Further adds have no effect.
        assert!(!record.add_chapter());
        assert!(!record.add_chapter());
        assert_eq!(record.chapters.len(), MAX_CHAPTERS);
    }

    #[test]
    fn remove_chapter_keeps_at_least_one() {
        let mut record = ThesisRecord::default();
        while record.chapters.len() > MIN_CHAPTERS {
            assert!(record.remove_chapter(0));
        }
        assert_eq!(record.chapters.len(), MIN_CHAPTERS);
        assert!(!record.remove_chapter(0));
        assert_eq!(record.chapters.len(), MIN_CHAPTERS);
    }

    #[test]
    fn remove_chapter_rejects_out_of_range_index() {
        let mut record = ThesisRecord::default();
        assert!(!record.remove_chapter(99));
        assert_eq!(record.chapters.len(), 5);
    }

    #[test]
    fn set_chapter_replaces_in_place() {
        let mut record = ThesisRecord::default();
        let chapter = Chapter {
            title: "Discussion".to_string(),
            content: "Revised content.".to_string(),
        };
        assert!(record.set_chapter(1, chapter.clone()));
        assert_eq!(record.chapters[1], chapter);
        assert!(!record.set_chapter(99, chapter));
    }

    #[test]
    fn task_model_table_matches_mapping() {
        assert_eq!(TaskKind::Content.default_model(), MODEL_DEEPSEEK_R1);
        assert_eq!(TaskKind::Structure.default_model(), MODEL_DEEPSEEK_R1);
        assert_eq!(TaskKind::Outline.default_model(), MODEL_DEEPSEEK_R1);
        assert_eq!(TaskKind::Rewrite.default_model(), MODEL_DEEPSEEK_R1);
        assert_eq!(TaskKind::Latex.default_model(), MODEL_DEEPSEEK_QWEN);
        assert_eq!(TaskKind::Diagram.default_model(), MODEL_DEEPSEEK_QWEN);
        assert_eq!(TaskKind::Improve.default_model(), MODEL_MISTRAL_SMALL);
        assert_eq!(TaskKind::Bibliography.default_model(), MODEL_MISTRAL_SMALL);
        assert_eq!(TaskKind::Enhance.default_model(), MODEL_MISTRAL_SMALL);
    }

    #[test]
    fn sampling_tables() {
        assert_eq!(TaskKind::Latex.temperature(), 0.3);
        assert_eq!(TaskKind::Bibliography.temperature(), 0.3);
        assert_eq!(TaskKind::Content.temperature(), 0.7);
        assert_eq!(TaskKind::Rewrite.max_tokens(), 4000);
        assert_eq!(TaskKind::Improve.max_tokens(), 2000);
    }

    #[test]
    fn task_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TaskKind::Bibliography).unwrap(), "\"bibliography\"");
        let task: TaskKind = serde_json::from_str("\"rewrite\"").unwrap();
        assert_eq!(task, TaskKind::Rewrite);
    }

    #[test]
    fn assist_options_use_wire_names() {
        let focus: ImproveFocus = serde_json::from_str("\"academic-tone\"").unwrap();
        assert_eq!(focus, ImproveFocus::AcademicTone);
        let style: BibliographyStyle = serde_json::from_str("\"foundational\"").unwrap();
        assert_eq!(style, BibliographyStyle::Foundational);
        assert!(style.hint().contains("seminal"));
    }
}
