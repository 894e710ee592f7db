use std::io::{Cursor, Write};

use anyhow::Result;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::services::latex::RenderedLatex;

/// Replaces every non-alphanumeric character with an underscore so thesis
/// titles survive as download filenames.
pub fn safe_file_stem(input: &str) -> String {
    input
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

/// Bundles the two generated source files into an in-memory zip archive.
pub fn source_bundle(files: &RenderedLatex) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("main.tex", options)?;
    writer.write_all(files.main_tex.as_bytes())?;
    writer.start_file("references.bib", options)?;
    writer.write_all(files.references_bib.as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThesisRecord;
    use crate::services::latex;
    use std::io::Read;

    #[test]
    fn file_stem_keeps_only_ascii_alphanumerics() {
        assert_eq!(
            safe_file_stem("Machine Learning: A Survey (2024)"),
            "Machine_Learning__A_Survey__2024_"
        );
        assert_eq!(safe_file_stem(""), "");
        assert_eq!(safe_file_stem("plain"), "plain");
    }

    #[test]
    fn bundle_contains_exactly_the_two_generated_files() {
        let files = latex::render(&ThesisRecord::default());
        let bytes = source_bundle(&files).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut main_tex = String::new();
        archive
            .by_name("main.tex")
            .unwrap()
            .read_to_string(&mut main_tex)
            .unwrap();
        assert_eq!(main_tex, files.main_tex);

        let mut references = String::new();
        archive
            .by_name("references.bib")
            .unwrap()
            .read_to_string(&mut references)
            .unwrap();
        assert_eq!(references, files.references_bib);
    }
}
