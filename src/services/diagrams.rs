use serde::{Deserialize, Serialize};

/// Output dialect for a diagram snippet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    Tikz,
    Mermaid,
    #[serde(rename = "chartjs")]
    ChartJs,
}

impl DiagramFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramFormat::Tikz => "tikz",
            DiagramFormat::Mermaid => "mermaid",
            DiagramFormat::ChartJs => "chartjs",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            DiagramFormat::Tikz => "tex",
            DiagramFormat::Mermaid => "mmd",
            DiagramFormat::ChartJs => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DiagramFormat::ChartJs => "application/json",
            _ => "text/plain",
        }
    }

    pub fn instructions(self) -> Vec<String> {
        let lines: [&str; 4] = match self {
            DiagramFormat::Tikz => [
                "Add \\usepackage{tikz} to your LaTeX preamble",
                "For charts, also add \\usepackage{pgfplots} and \\pgfplotsset{compat=1.18}",
                "Insert the TikZ code where you want the graph to appear",
                "Compile with pdflatex or xelatex",
            ],
            DiagramFormat::Mermaid => [
                "Use in Markdown documents with ```mermaid code blocks",
                "Use online Mermaid editors for standalone diagrams",
                "Integrate with documentation platforms that support Mermaid",
                "Export as SVG or PNG for inclusion in documents",
            ],
            DiagramFormat::ChartJs => [
                "Include Chart.js library in your HTML: <script src=\"https://cdn.jsdelivr.net/npm/chart.js\"></script>",
                "Create a canvas element: <canvas id=\"myChart\"></canvas>",
                "Initialize the chart with the provided configuration",
                "Customize colors, labels, and data as needed",
            ],
        };
        lines.iter().map(|line| line.to_string()).collect()
    }
}

/// Cosmetic TikZ presets: fill colors, node style, arrow style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramStyle {
    #[default]
    Academic,
    Modern,
    Minimal,
    Colorful,
}

struct StyleConfig {
    colors: &'static [&'static str],
    node_style: &'static str,
    arrow_style: &'static str,
}

impl DiagramStyle {
    fn config(self) -> StyleConfig {
        match self {
            DiagramStyle::Academic => StyleConfig {
                colors: &["blue!20", "green!20", "red!20", "yellow!20"],
                node_style: "draw, rectangle, minimum width=3cm, minimum height=1cm, text centered",
                arrow_style: "thick, ->, >=stealth",
            },
            DiagramStyle::Modern => StyleConfig {
                colors: &["cyan!30", "magenta!30", "orange!30", "purple!30"],
                node_style: "draw, rounded corners, minimum width=3cm, minimum height=1cm, text centered, drop shadow",
                arrow_style: "ultra thick, ->, >=stealth, rounded corners",
            },
            DiagramStyle::Minimal => StyleConfig {
                colors: &["gray!10", "gray!20", "gray!30", "gray!40"],
                node_style: "draw, rectangle, minimum width=2.5cm, minimum height=0.8cm, text centered",
                arrow_style: "->, >=stealth",
            },
            DiagramStyle::Colorful => StyleConfig {
                colors: &["red!40", "blue!40", "green!40", "yellow!40", "purple!40", "orange!40"],
                node_style: "draw, rounded rectangle, minimum width=3cm, minimum height=1cm, text centered, thick",
                arrow_style: "very thick, ->, >=stealth, rounded corners",
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateMeta {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub prompt: &'static str,
}

/// The fixed template catalog. Unknown ids fall back to a default literal.
pub const TEMPLATES: [TemplateMeta; 8] = [
    TemplateMeta {
        id: "performance_comparison",
        title: "Performance Comparison",
        description: "Bar chart comparing algorithm/method performance",
        category: "statistical",
        prompt: "Create a performance comparison bar chart showing accuracy, speed, and efficiency metrics for different algorithms or methods in {context}",
    },
    TemplateMeta {
        id: "research_methodology_flow",
        title: "Research Methodology Flow",
        description: "Flowchart showing research process steps",
        category: "flow",
        prompt: "Generate a comprehensive research methodology flowchart showing data collection, analysis, validation, and conclusion steps for {context}",
    },
    TemplateMeta {
        id: "system_architecture",
        title: "System Architecture",
        description: "Technical architecture diagram",
        category: "architecture",
        prompt: "Create a detailed system architecture diagram showing components, data flow, and interactions for {context}",
    },
    TemplateMeta {
        id: "conceptual_framework",
        title: "Conceptual Framework",
        description: "Theoretical framework visualization",
        category: "conceptual",
        prompt: "Design a conceptual framework diagram illustrating theoretical relationships, variables, and hypotheses for {context}",
    },
    TemplateMeta {
        id: "timeline_milestones",
        title: "Project Timeline",
        description: "Research timeline with milestones",
        category: "timeline",
        prompt: "Create a project timeline showing research phases, milestones, deliverables, and dependencies for {context}",
    },
    TemplateMeta {
        id: "data_distribution",
        title: "Data Distribution",
        description: "Statistical distribution charts",
        category: "statistical",
        prompt: "Generate statistical distribution charts (histogram, pie chart, box plot) showing data patterns and insights for {context}",
    },
    TemplateMeta {
        id: "trend_analysis",
        title: "Trend Analysis",
        description: "Line chart showing trends over time",
        category: "statistical",
        prompt: "Create a trend analysis line chart showing changes, patterns, and projections over time for {context}",
    },
    TemplateMeta {
        id: "process_workflow",
        title: "Process Workflow",
        description: "Detailed process workflow diagram",
        category: "flow",
        prompt: "Design a detailed workflow diagram showing process steps, decision points, and outcomes for {context}",
    },
];

pub fn lookup(id: &str) -> Option<&'static TemplateMeta> {
    TEMPLATES.iter().find(|template| template.id == id)
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagramRequest {
    pub template: String,
    #[serde(default)]
    pub format: DiagramFormat,
    #[serde(default)]
    pub style: DiagramStyle,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagramResponse {
    pub code: String,
    pub title: String,
    pub description: String,
    pub format: &'static str,
    pub instructions: Vec<String>,
}

/// Table lookup only. The context string is cosmetic: it is substituted into
/// the template's description line and, for the custom fallback diagram,
/// truncated into a node label.
pub fn render(request: &DiagramRequest) -> DiagramResponse {
    let context = request.context.as_deref().unwrap_or("research project");
    let meta = lookup(&request.template);

    let title = meta.map(|m| m.title).unwrap_or("Custom Graph").to_string();
    let description = match meta {
        Some(m) => m.prompt.replace("{context}", context),
        None => context.to_string(),
    };

    let id = meta.map(|m| m.id).unwrap_or("");
    let code = match request.format {
        DiagramFormat::Tikz => tikz_code(id, request.style, context),
        DiagramFormat::Mermaid => mermaid_code(id),
        DiagramFormat::ChartJs => chartjs_code(id),
    };

    DiagramResponse {
        code,
        title,
        description,
        format: request.format.as_str(),
        instructions: request.format.instructions(),
    }
}

/// Wraps a TikZ snippet into a compilable standalone document for download.
pub fn standalone_tikz(code: &str) -> String {
    format!(
        "\\documentclass{{standalone}}\n\\usepackage{{tikz}}\n\\usepackage{{pgfplots}}\n\\pgfplotsset{{compat=1.18}}\n\\begin{{document}}\n{code}\n\\end{{document}}"
    )
}

/// Download filename: whitespace collapsed to underscores plus the dialect
/// extension.
pub fn file_name(title: &str, format: DiagramFormat) -> String {
    let stem = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.{}", stem, format.file_extension())
}

fn apply_style(snippet: &str, style: DiagramStyle) -> String {
    let config = style.config();
    let mut out = snippet
        .replace("<<NODE>>", config.node_style)
        .replace("<<ARROW>>", config.arrow_style);
    for (slot, color) in config.colors.iter().enumerate() {
        out = out.replace(&format!("<<C{slot}>>"), color);
    }
    out
}

fn truncated(context: &str) -> String {
    let head: String = context.chars().take(20).collect();
    format!("{head}...")
}

fn tikz_code(id: &str, style: DiagramStyle, context: &str) -> String {
    match id {
        "performance_comparison" => TIKZ_BAR_CHART.to_string(),
        "trend_analysis" => TIKZ_LINE_CHART.to_string(),
        "data_distribution" => TIKZ_PIE_CHART.to_string(),
        "timeline_milestones" => TIKZ_TIMELINE.to_string(),
        "research_methodology_flow" => apply_style(TIKZ_METHODOLOGY_FLOW, style),
        "process_workflow" => apply_style(TIKZ_FLOWCHART, style),
        "system_architecture" => apply_style(TIKZ_ARCHITECTURE, style),
        "conceptual_framework" => apply_style(TIKZ_CONCEPTUAL, style),
        _ => TIKZ_DEFAULT.replace("<<LABEL>>", &truncated(context)),
    }
}

fn mermaid_code(id: &str) -> String {
    match id {
        "research_methodology_flow" => MERMAID_METHODOLOGY_FLOW,
        "process_workflow" => MERMAID_FLOWCHART,
        "system_architecture" => MERMAID_ARCHITECTURE,
        "conceptual_framework" => MERMAID_MINDMAP,
        "timeline_milestones" => MERMAID_GANTT,
        "performance_comparison" => MERMAID_BAR_CHART,
        "trend_analysis" => MERMAID_LINE_CHART,
        "data_distribution" => MERMAID_PIE_CHART,
        _ => MERMAID_DEFAULT,
    }
    .to_string()
}

fn chartjs_code(id: &str) -> String {
    match id {
        "trend_analysis" | "timeline_milestones" => CHARTJS_LINE,
        "data_distribution" => CHARTJS_PIE,
        // Non-chart templates fall back to the bar configuration.
        _ => CHARTJS_BAR,
    }
    .to_string()
}

const TIKZ_BAR_CHART: &str = r"\begin{tikzpicture}
\begin{axis}[
    ybar,
    enlargelimits=0.15,
    legend style={at={(0.5,-0.15)},anchor=north,legend columns=-1},
    ylabel={Performance (\%)},
    symbolic x coords={Method A,Method B,Method C,Proposed},
    xtick=data,
    nodes near coords,
    nodes near coords align={vertical},
    width=12cm,
    height=8cm
]
\addplot coordinates {(Method A,75) (Method B,82) (Method C,78) (Proposed,94)};
\addplot coordinates {(Method A,68) (Method B,79) (Method C,85) (Proposed,91)};
\addplot coordinates {(Method A,72) (Method B,76) (Method C,80) (Proposed,89)};
\legend{Accuracy,Precision,Recall}
\end{axis}
\end{tikzpicture}";

const TIKZ_LINE_CHART: &str = r"\begin{tikzpicture}
\begin{axis}[
    xlabel={Time},
    ylabel={Performance},
    legend pos=north west,
    grid=major,
    width=12cm,
    height=8cm
]
\addplot[color=blue,mark=*] coordinates {
    (1,65) (2,72) (3,78) (4,85) (5,89) (6,94)
};
\addplot[color=red,mark=square] coordinates {
    (1,60) (2,68) (3,75) (4,82) (5,87) (6,91)
};
\legend{Method A,Method B}
\end{axis}
\end{tikzpicture}";

const TIKZ_PIE_CHART: &str = r"\begin{tikzpicture}
\pie[text=legend, radius=3]{
    30/Category A,
    25/Category B,
    25/Category C,
    20/Category D
}
\end{tikzpicture}";

const TIKZ_TIMELINE: &str = r"\begin{tikzpicture}[scale=1.2]
\draw[thick] (0,0) -- (10,0);
\foreach \x/\year/\event in {0/2020/Project Start, 2.5/2021/Phase 1, 5/2022/Phase 2, 7.5/2023/Phase 3, 10/2024/Completion} {
    \draw (\x,0) -- (\x,0.2);
    \node[above] at (\x,0.2) {\year};
    \node[below, text width=2cm, text centered] at (\x,-0.5) {\event};
}
\end{tikzpicture}";

const TIKZ_METHODOLOGY_FLOW: &str = r"\begin{tikzpicture}[node distance=2cm, auto]
\tikzstyle{process} = [<<NODE>>, fill=<<C0>>]
\tikzstyle{decision} = [diamond, <<NODE>>, fill=<<C1>>]
\tikzstyle{arrow} = [<<ARROW>>]

\node (start) [process] {Literature Review};
\node (design) [process, below of=start] {Research Design};
\node (collect) [process, below of=design] {Data Collection};
\node (analyze) [process, below of=collect] {Data Analysis};
\node (validate) [decision, below of=analyze] {Results Valid?};
\node (conclude) [process, below of=validate] {Conclusions};

\draw [arrow] (start) -- (design);
\draw [arrow] (design) -- (collect);
\draw [arrow] (collect) -- (analyze);
\draw [arrow] (analyze) -- (validate);
\draw [arrow] (validate) -- node[anchor=west] {Yes} (conclude);
\draw [arrow] (validate.west) -- ++(-2,0) |- (collect.west) node[anchor=south] {No};
\end{tikzpicture}";

const TIKZ_FLOWCHART: &str = r"\begin{tikzpicture}[node distance=2cm, auto]
\tikzstyle{process} = [<<NODE>>, fill=<<C0>>]
\tikzstyle{decision} = [diamond, <<NODE>>, fill=<<C1>>]
\tikzstyle{terminal} = [<<NODE>>, rounded corners, fill=<<C2>>]
\tikzstyle{arrow} = [<<ARROW>>]

\node (start) [terminal] {Start};
\node (input) [process, below of=start] {Input Data};
\node (process1) [process, below of=input] {Process Step 1};
\node (decision1) [decision, below of=process1] {Decision?};
\node (process2) [process, below of=decision1, yshift=-1cm] {Process Step 2};
\node (output) [process, below of=process2] {Generate Output};
\node (end) [terminal, below of=output] {End};

\draw [arrow] (start) -- (input);
\draw [arrow] (input) -- (process1);
\draw [arrow] (process1) -- (decision1);
\draw [arrow] (decision1) -- node[anchor=west] {Yes} (process2);
\draw [arrow] (decision1.east) -- ++(2,0) |- (output.east) node[anchor=south, pos=0.25] {No};
\draw [arrow] (process2) -- (output);
\draw [arrow] (output) -- (end);
\end{tikzpicture}";

const TIKZ_ARCHITECTURE: &str = r"\begin{tikzpicture}[scale=0.8]
\tikzstyle{component} = [rectangle, <<NODE>>, fill=<<C0>>]
\tikzstyle{database} = [cylinder, draw, fill=<<C1>>, text width=2cm, text centered, minimum height=1.5cm]
\tikzstyle{interface} = [ellipse, draw, fill=<<C2>>, text width=2cm, text centered, minimum height=1cm]

\node (ui) [interface] at (0,4) {User Interface};
\node (api) [component] at (0,2) {API Layer};
\node (auth) [component] at (-3,0) {Authentication};
\node (core) [component] at (0,0) {Core Logic};
\node (ml) [component] at (3,0) {ML Engine};
\node (db) [database] at (0,-2) {Database};
\node (cache) [database] at (3,-2) {Cache};

\draw[<<ARROW>>] (ui) -- (api);
\draw[<<ARROW>>] (api) -- (auth);
\draw[<<ARROW>>] (api) -- (core);
\draw[<<ARROW>>] (core) -- (ml);
\draw[<<ARROW>>] (core) -- (db);
\draw[<<ARROW>>] (ml) -- (cache);
\end{tikzpicture}";

const TIKZ_CONCEPTUAL: &str = r"\begin{tikzpicture}
\node[<<NODE>>, fill=<<C0>>] (concept1) at (0,2) {Core Concept};
\node[<<NODE>>, fill=<<C1>>] (concept2) at (-3,0) {Related Idea A};
\node[<<NODE>>, fill=<<C2>>] (concept3) at (3,0) {Related Idea B};
\node[<<NODE>>, fill=<<C3>>] (concept4) at (0,-2) {Application};

\draw[<<ARROW>>] (concept1) -- (concept2);
\draw[<<ARROW>>] (concept1) -- (concept3);
\draw[<<ARROW>>] (concept2) -- (concept4);
\draw[<<ARROW>>] (concept3) -- (concept4);
\end{tikzpicture}";

const TIKZ_DEFAULT: &str = r"\begin{tikzpicture}
\node[draw, rectangle, fill=blue!20, text width=3cm, text centered] (A) at (0,2) {<<LABEL>>};
\node[draw, rectangle, fill=green!20, text width=3cm, text centered] (B) at (4,2) {Process};
\node[draw, rectangle, fill=red!20, text width=3cm, text centered] (C) at (2,0) {Output};
\draw[->] (A) -- (B);
\draw[->] (B) -- (C);
\end{tikzpicture}";

const MERMAID_METHODOLOGY_FLOW: &str = r"graph TD
    A[Literature Review] --> B[Problem Identification]
    B --> C[Research Questions]
    C --> D[Methodology Design]
    D --> E[Data Collection]
    E --> F[Data Analysis]
    F --> G{Results Valid?}
    G -->|Yes| H[Conclusions]
    G -->|No| E
    H --> I[Future Work]

    style A fill:#e1f5fe
    style H fill:#c8e6c9
    style G fill:#fff3e0";

const MERMAID_FLOWCHART: &str = r"graph TD
    A[Start] --> B[Input Data]
    B --> C[Process Data]
    C --> D{Decision Point}
    D -->|Yes| E[Path A]
    D -->|No| F[Path B]
    E --> G[Output A]
    F --> G
    G --> H[End]

    style A fill:#e1f5fe
    style H fill:#c8e6c9
    style D fill:#fff3e0";

const MERMAID_ARCHITECTURE: &str = r#"graph TB
    subgraph "Frontend"
        UI[User Interface]
        WEB[Web App]
    end

    subgraph "Backend"
        API[API Gateway]
        AUTH[Authentication]
        CORE[Core Logic]
    end

    subgraph "Data"
        DB[(Database)]
        CACHE[(Cache)]
    end

    UI --> API
    WEB --> API
    API --> AUTH
    API --> CORE
    CORE --> DB
    CORE --> CACHE"#;

const MERMAID_MINDMAP: &str = r"mindmap
  root((Central Concept))
    Branch A
      Sub-concept A1
      Sub-concept A2
    Branch B
      Sub-concept B1
      Sub-concept B2
    Branch C
      Sub-concept C1
      Sub-concept C2";

const MERMAID_GANTT: &str = r"gantt
    title Project Timeline
    dateFormat  YYYY-MM-DD
    section Phase 1
    Research        :2024-01-01, 30d
    Analysis        :2024-02-01, 20d
    section Phase 2
    Development     :2024-03-01, 45d
    Testing         :2024-04-15, 15d
    section Phase 3
    Deployment      :2024-05-01, 10d
    Documentation   :2024-05-11, 10d";

const MERMAID_BAR_CHART: &str = r#"xychart-beta
    title "Performance Comparison"
    x-axis [Method A, Method B, Method C, Proposed]
    y-axis "Accuracy (%)" 0 --> 100
    bar [75, 82, 78, 94]"#;

const MERMAID_LINE_CHART: &str = r#"xychart-beta
    title "Trend Analysis"
    x-axis [Jan, Feb, Mar, Apr, May, Jun]
    y-axis "Performance" 0 --> 100
    line [65, 72, 78, 85, 89, 94]"#;

const MERMAID_PIE_CHART: &str = r#"pie title Data Distribution
    "Category A" : 30
    "Category B" : 25
    "Category C" : 25
    "Category D" : 20"#;

const MERMAID_DEFAULT: &str = r"graph LR
    A[Start] --> B[Process]
    B --> C[Decision]
    C -->|Yes| D[Success]
    C -->|No| E[Retry]
    E --> B";

const CHARTJS_BAR: &str = r#"{
  type: 'bar',
  data: {
    labels: ['Method A', 'Method B', 'Method C', 'Proposed Method'],
    datasets: [{
      label: 'Accuracy (%)',
      data: [75, 82, 78, 94],
      backgroundColor: 'rgba(54, 162, 235, 0.8)',
      borderColor: 'rgba(54, 162, 235, 1)',
      borderWidth: 1
    }, {
      label: 'Precision (%)',
      data: [68, 79, 85, 91],
      backgroundColor: 'rgba(255, 99, 132, 0.8)',
      borderColor: 'rgba(255, 99, 132, 1)',
      borderWidth: 1
    }]
  },
  options: {
    responsive: true,
    plugins: {
      title: {
        display: true,
        text: 'Performance Comparison Analysis'
      }
    },
    scales: {
      y: {
        beginAtZero: true,
        max: 100
      }
    }
  }
}"#;

const CHARTJS_LINE: &str = r#"{
  type: 'line',
  data: {
    labels: ['Jan', 'Feb', 'Mar', 'Apr', 'May', 'Jun'],
    datasets: [{
      label: 'Performance Trend',
      data: [65, 72, 78, 85, 89, 94],
      borderColor: 'rgb(75, 192, 192)',
      backgroundColor: 'rgba(75, 192, 192, 0.2)',
      tension: 0.1,
      fill: true
    }, {
      label: 'Baseline',
      data: [60, 65, 70, 75, 80, 85],
      borderColor: 'rgb(255, 99, 132)',
      backgroundColor: 'rgba(255, 99, 132, 0.2)',
      tension: 0.1,
      fill: false
    }]
  },
  options: {
    responsive: true,
    plugins: {
      title: {
        display: true,
        text: 'Performance Trend Over Time'
      }
    },
    scales: {
      y: {
        beginAtZero: true,
        title: {
          display: true,
          text: 'Performance Score'
        }
      },
      x: {
        title: {
          display: true,
          text: 'Time Period'
        }
      }
    }
  }
}"#;

const CHARTJS_PIE: &str = r#"{
  type: 'pie',
  data: {
    labels: ['Category A', 'Category B', 'Category C', 'Category D'],
    datasets: [{
      data: [30, 25, 25, 20],
      backgroundColor: [
        'rgba(255, 99, 132, 0.8)',
        'rgba(54, 162, 235, 0.8)',
        'rgba(255, 205, 86, 0.8)',
        'rgba(75, 192, 192, 0.8)'
      ],
      borderColor: [
        'rgba(255, 99, 132, 1)',
        'rgba(54, 162, 235, 1)',
        'rgba(255, 205, 86, 1)',
        'rgba(75, 192, 192, 1)'
      ],
      borderWidth: 2
    }]
  },
  options: {
    responsive: true,
    plugins: {
      title: {
        display: true,
        text: 'Data Distribution Analysis'
      },
      legend: {
        position: 'bottom'
      }
    }
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn request(template: &str, format: DiagramFormat) -> DiagramRequest {
        DiagramRequest {
            template: template.to_string(),
            format,
            style: DiagramStyle::default(),
            context: None,
        }
    }

    #[test]
    fn catalog_covers_five_categories() {
        let mut categories: Vec<&str> = TEMPLATES.iter().map(|t| t.category).collect();
        categories.sort_unstable();
        categories.dedup();
        assert_eq!(
            categories,
            vec!["architecture", "conceptual", "flow", "statistical", "timeline"]
        );
    }

    #[test]
    fn every_template_renders_in_all_three_dialects() {
        for template in &TEMPLATES {
            for format in [DiagramFormat::Tikz, DiagramFormat::Mermaid, DiagramFormat::ChartJs] {
                let response = render(&request(template.id, format));
                assert!(!response.code.is_empty(), "{} {:?}", template.id, format);
                assert_eq!(response.title, template.title);
                assert_eq!(response.instructions.len(), 4);
            }
        }
    }

    #[test]
    fn context_is_substituted_into_description() {
        let mut req = request("system_architecture", DiagramFormat::Tikz);
        req.context = Some("solar microgrids".to_string());
        let response = render(&req);
        assert!(response.description.contains("solar microgrids"));
        assert!(!response.description.contains("{context}"));
    }

    #[test]
    fn missing_context_uses_generic_placeholder() {
        let response = render(&request("trend_analysis", DiagramFormat::Mermaid));
        assert!(response.description.contains("research project"));
    }

    #[test]
    fn unknown_id_falls_back_to_default_literal() {
        let mut req = request("does_not_exist", DiagramFormat::Tikz);
        req.context = Some("a custom pipeline for stream processing".to_string());
        let response = render(&req);
        assert_eq!(response.title, "Custom Graph");
        // Truncated context ends up as a node label.
        assert!(response.code.contains("a custom pipeline for..."));

        let mermaid = render(&request("does_not_exist", DiagramFormat::Mermaid));
        assert_eq!(mermaid.code, MERMAID_DEFAULT);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut req = request("nope", DiagramFormat::Tikz);
        req.context = Some("日本語のコンテキストが二十文字を超えても安全です".to_string());
        let response = render(&req);
        assert!(response.code.contains("..."));
    }

    #[test]
    fn style_presets_change_tikz_fills() {
        let academic = render(&request("conceptual_framework", DiagramFormat::Tikz));
        assert!(academic.code.contains("fill=blue!20"));
        assert!(!academic.code.contains("<<"));

        let mut req = request("conceptual_framework", DiagramFormat::Tikz);
        req.style = DiagramStyle::Minimal;
        let minimal = render(&req);
        assert!(minimal.code.contains("fill=gray!10"));
        assert!(minimal.code.contains("->, >=stealth"));
    }

    #[test]
    fn chart_templates_map_to_chart_configs() {
        let bar = render(&request("performance_comparison", DiagramFormat::ChartJs));
        assert!(bar.code.contains("type: 'bar'"));
        let line = render(&request("trend_analysis", DiagramFormat::ChartJs));
        assert!(line.code.contains("type: 'line'"));
        let pie = render(&request("data_distribution", DiagramFormat::ChartJs));
        assert!(pie.code.contains("type: 'pie'"));
        // Flow templates have no chart form and fall back to the bar config.
        let fallback = render(&request("process_workflow", DiagramFormat::ChartJs));
        assert!(fallback.code.contains("type: 'bar'"));
    }

    #[test]
    fn standalone_wrapper_is_compilable_shell() {
        let wrapped = standalone_tikz("\\begin{tikzpicture}\\end{tikzpicture}");
        assert!(wrapped.starts_with("\\documentclass{standalone}"));
        assert!(wrapped.ends_with("\\end{document}"));
        assert!(wrapped.contains("pgfplots"));
    }

    #[test]
    fn file_names_use_underscores_and_dialect_extension() {
        assert_eq!(
            file_name("Research Methodology Flow", DiagramFormat::Tikz),
            "Research_Methodology_Flow.tex"
        );
        assert_eq!(file_name("Trend Analysis", DiagramFormat::Mermaid), "Trend_Analysis.mmd");
        assert_eq!(file_name("Data Distribution", DiagramFormat::ChartJs), "Data_Distribution.json");
    }
}
