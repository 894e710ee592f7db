use crate::models::ThesisRecord;

/// Both generated files. `references_bib` is the bibliography text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RenderedLatex {
    pub main_tex: String,
    pub references_bib: String,
}

/// Escapes LaTeX reserved characters in one pass, then turns double newlines
/// into explicit paragraph breaks. Total over any input.
pub fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out.replace("\n\n", "\n\n\\par\n")
}

/// Renders the thesis record into the fixed document scaffold. Pure: no side
/// effects, no error conditions, byte-identical output for identical input.
pub fn render(record: &ThesisRecord) -> RenderedLatex {
    let title = escape_latex(&record.title);
    let author = escape_latex(&record.author);
    let university = escape_latex(&record.university);
    let degree = escape_latex(&record.degree);
    let supervisor = escape_latex(&record.supervisor);
    let year = escape_latex(&record.year);

    let chapters = record
        .chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| {
            let chapter_title = escape_latex(&chapter.title);
            let number = (index + 1).to_string();
            // User text is spliced last so placeholder-shaped input in a
            // chapter never gets substituted.
            CHAPTER_BLOCK
                .replace("<<N>>", &number)
                .replace("<<CHAPTER_TITLE_LOWER>>", &chapter_title.to_lowercase())
                .replace("<<CHAPTER_TITLE>>", &chapter_title)
                .replace("<<CHAPTER_CONTENT>>", &escape_latex(&chapter.content))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let main_tex = SCAFFOLD
        .replace("<<TITLE_LOWER>>", &title.to_lowercase())
        .replace("<<TITLE>>", &title)
        .replace("<<AUTHOR>>", &author)
        .replace("<<UNIVERSITY>>", &university)
        .replace("<<DEGREE>>", &degree)
        .replace("<<SUPERVISOR>>", &supervisor)
        .replace("<<YEAR>>", &year)
        .replace("<<CHAPTERS>>", &chapters);

    RenderedLatex {
        main_tex,
        references_bib: record.bibliography.clone(),
    }
}

const SCAFFOLD: &str = r#"\documentclass[12pt,a4paper]{report}

% Essential packages
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{geometry}
\geometry{margin=1in}
\usepackage{setspace}
\doublespacing
\usepackage{fancyhdr}
\usepackage{graphicx}
\usepackage{amsmath,amsthm,amssymb}
\usepackage{listings}
\usepackage{xcolor}
\usepackage[style=ieee,backend=bibtex]{biblatex}
\usepackage{hyperref}

% Bibliography setup
\addbibresource{references.bib}

% Hyperref setup
\hypersetup{
    colorlinks=true,
    linkcolor=blue,
    filecolor=magenta,
    urlcolor=cyan,
    citecolor=red,
    pdftitle={<<TITLE>>},
    pdfauthor={<<AUTHOR>>}
}

% Header and footer setup
\pagestyle{fancy}
\fancyhf{}
\fancyhead[RO,LE]{\thepage}
\fancyhead[LO]{\leftmark}
\renewcommand{\headrulewidth}{0.4pt}

% Title information
\title{<<TITLE>>}
\author{<<AUTHOR>>}
\date{<<YEAR>>}

% Theorem environments
\newtheorem{theorem}{Theorem}[chapter]
\newtheorem{lemma}[theorem]{Lemma}
\newtheorem{definition}[theorem]{Definition}
\newtheorem{corollary}[theorem]{Corollary}

\begin{document}

% Title Page
\begin{titlepage}
    \centering
    \vspace*{2cm}

    {\Huge\bfseries <<TITLE>>\par}
    \vspace{2cm}

    {\Large A thesis submitted in partial fulfillment\par}
    {\Large of the requirements for the degree of\par}
    \vspace{1cm}

    {\Large\bfseries <<DEGREE>>\par}
    \vspace{2cm}

    {\large by\par}
    {\Large\bfseries <<AUTHOR>>\par}
    \vspace{2cm}

    {\large Under the supervision of\par}
    {\Large <<SUPERVISOR>>\par}
    \vspace{2cm}

    {\large <<UNIVERSITY>>\par}
    {\large <<YEAR>>\par}

    \vfill
\end{titlepage}

% Front matter
\pagenumbering{roman}
\setcounter{page}{2}

% Abstract
\chapter*{Abstract}
\addcontentsline{toc}{chapter}{Abstract}
This thesis presents research on <<TITLE_LOWER>>. The work contributes to the field by providing new insights and methodologies that advance our understanding of the subject matter.

\vspace{1cm}
\noindent\textbf{Keywords:} thesis, research, academic work

\newpage

% Table of Contents
\tableofcontents
\newpage

% List of Figures and Tables
\listoffigures
\addcontentsline{toc}{chapter}{List of Figures}
\newpage

\listoftables
\addcontentsline{toc}{chapter}{List of Tables}
\newpage

% Main content
\pagenumbering{arabic}
\setcounter{page}{1}

<<CHAPTERS>>

% Appendices
\appendix
\chapter{Additional Materials}
\label{app:additional}

This appendix contains supplementary materials, additional data, and detailed calculations that support the main thesis content.

\section{Supplementary Data}
Additional data and results that support the main findings.

\section{Code Listings}
Sample code implementations and algorithms used in the research.

\begin{lstlisting}[language=Python, caption=Sample Python Code]
# Sample code for demonstration
def sample_function(x, y):
    """
    A sample function for demonstration purposes
    """
    result = x * y + 10
    return result

# Usage example
output = sample_function(5, 3)
print(f"Result: {output}")
\end{lstlisting}

% Bibliography
\newpage
\printbibliography[title=References]
\addcontentsline{toc}{chapter}{References}

\end{document}"#;

const CHAPTER_BLOCK: &str = r#"\chapter{<<CHAPTER_TITLE>>}
\label{chap:<<N>>}

<<CHAPTER_CONTENT>>

\section{Overview}
This section provides an overview of the chapter content and its significance to the overall thesis.

\section{Key Concepts}
This section introduces the key concepts and terminology used throughout the chapter.

% Sample equation
\begin{equation}
\label{eq:sample<<N>>}
y = f(x) + \epsilon
\end{equation}

Where $y$ represents the output variable, $f(x)$ is the function of input $x$, and $\epsilon$ is the error term.

% Sample figure placeholder
\begin{figure}[htbp]
\centering
\fbox{\parbox{0.8\textwidth}{\centering\vspace{2cm}Figure <<N>>: Sample Figure\\(Replace with actual figure)\vspace{2cm}}}
\caption{Sample figure for Chapter <<N>>}
\label{fig:sample<<N>>}
\end{figure}

% Sample table
\begin{table}[htbp]
\centering
\begin{tabular}{|l|c|r|}
\hline
\textbf{Parameter} & \textbf{Value} & \textbf{Unit} \\
\hline
Sample Parameter 1 & 10.5 & units \\
Sample Parameter 2 & 25.3 & units \\
Sample Parameter 3 & 8.7 & units \\
\hline
\end{tabular}
\caption{Sample data table for Chapter <<N>>}
\label{tab:sample<<N>>}
\end{table}

\section{Summary}
This chapter has presented the key findings and contributions related to <<CHAPTER_TITLE_LOWER>>. The results demonstrate the importance of this work in the broader context of the thesis.

\newpage"#;
