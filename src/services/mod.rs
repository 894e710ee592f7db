pub mod compiler;
pub mod diagrams;
pub mod latex;
pub mod llm;
pub mod outline;
