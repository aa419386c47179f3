//! BibTeX entries.

use crate::models::{Author, CitationMetadata, ContainerType};

/// Entry type for a container kind
fn entry_type(container: ContainerType) -> &'static str {
    match container {
        ContainerType::Journal | ContainerType::Other => "article",
        ContainerType::Book => "book",
        ContainerType::Conference => "inproceedings",
        ContainerType::Preprint => "misc",
    }
}

/// Field holding the journal name for a given entry type
fn container_field(entry_type: &str) -> &'static str {
    match entry_type {
        "inproceedings" => "booktitle",
        "misc" => "howpublished",
        _ => "journal",
    }
}

/// Escape BibTeX special characters in a single pass
///
/// ```
/// assert_eq!(doi_cite::cite::escape_bibtex("50% & more"), "50\\% \\& more");
/// ```
pub fn escape_bibtex(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// `surname_year`, lowercased, e.g. `doe_2021`
pub fn citation_key(meta: &CitationMetadata) -> String {
    let name: String = meta
        .authors
        .first()
        .and_then(Author::sort_name)
        .map(|name| {
            name.chars()
                .filter(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | ',' | '\\'))
                .flat_map(char::to_lowercase)
                .collect()
        })
        .filter(|name: &String| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}_{}", name, meta.year().unwrap_or("nd"))
}

/// One name in BibTeX's `Family, Given` form; literal names are braced
fn bibtex_name(author: &Author) -> Option<String> {
    match (author.family_name(), author.given_name(), author.full_name()) {
        (Some(family), Some(given), _) => Some(format!(
            "{}, {}",
            escape_bibtex(family),
            escape_bibtex(given)
        )),
        (Some(family), None, _) => Some(escape_bibtex(family)),
        (None, _, Some(full)) => Some(format!("{{{}}}", escape_bibtex(full))),
        (None, _, None) => None,
    }
}

/// Render a BibTeX entry with only the fields present in `meta`
pub fn format_bibtex(meta: &CitationMetadata) -> String {
    let entry_type = entry_type(meta.container_type);

    // Values are escaped on insertion
    let mut fields: Vec<(&str, String)> = Vec::new();

    let people: Vec<String> = meta.authors.iter().filter_map(bibtex_name).collect();
    if !people.is_empty() {
        let field = if meta.is_edited_work { "editor" } else { "author" };
        fields.push((field, people.join(" and ")));
    }

    let text_fields = [
        ("title", meta.title()),
        (container_field(entry_type), meta.journal()),
        ("year", meta.year()),
        ("volume", meta.volume()),
        ("number", meta.issue()),
        ("pages", meta.pages()),
        ("publisher", meta.publisher()),
        ("doi", meta.doi()),
        ("url", meta.url()),
    ];
    fields.extend(
        text_fields
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, escape_bibtex(v)))),
    );

    let mut out = format!("@{}{{{},\n", entry_type, citation_key(meta));
    for (key, value) in fields {
        out.push_str(&format!("  {} = {{{}}},\n", key, value));
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::test_support::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_bibtex("50% & more"), "50\\% \\& more");
        assert_eq!(escape_bibtex("a_b {c} #1 $2"), "a\\_b \\{c\\} \\#1 \\$2");
        assert_eq!(escape_bibtex("C:\\path"), "C:\\textbackslash{}path");
        assert_eq!(escape_bibtex("plain"), "plain");
    }

    #[test]
    fn test_article_entry() {
        assert_eq!(
            format_bibtex(&two_authors()),
            "@article{doe_2021,\n  author = {Doe, Jane and Smith, John},\n  title = {A Study},\n  journal = {Nature},\n  year = {2021},\n  volume = {590},\n  pages = {123-130},\n  doi = {10.1038/s41586-021-00001-0},\n}"
        );
    }

    #[test]
    fn test_citation_key_fallbacks() {
        let mut meta = article();
        meta.year = None;
        assert_eq!(citation_key(&meta), "doe_nd");

        meta.authors = vec![Author::literal("World Health Organization")];
        meta.year = Some("2020".to_string());
        assert_eq!(citation_key(&meta), "worldhealthorganization_2020");

        meta.authors.clear();
        assert_eq!(citation_key(&meta), "unknown_2020");
    }

    #[test]
    fn test_entry_types() {
        let mut meta = article();
        meta.container_type = ContainerType::Conference;
        meta.journal = Some("Proc. SIGMOD".to_string());
        let bib = format_bibtex(&meta);
        assert!(bib.starts_with("@inproceedings{"));
        assert!(bib.contains("  booktitle = {Proc. SIGMOD},\n"));

        meta.container_type = ContainerType::Preprint;
        meta.journal = Some("arXiv".to_string());
        let bib = format_bibtex(&meta);
        assert!(bib.starts_with("@misc{"));
        assert!(bib.contains("  howpublished = {arXiv},\n"));

        meta.container_type = ContainerType::Other;
        assert!(format_bibtex(&meta).starts_with("@article{"));
    }

    #[test]
    fn test_edited_book_uses_editor_field() {
        let bib = format_bibtex(&book());
        assert!(bib.starts_with("@book{editor_2019,\n"));
        assert!(bib.contains("  editor = {Editor, Ann},\n"));
        assert!(bib.contains("  publisher = {Springer},\n"));
        assert!(!bib.contains("journal"));
    }

    #[test]
    fn test_literal_author_is_braced_and_escaped() {
        let mut meta = article();
        meta.authors = vec![Author::literal("R&D Group")];
        meta.title = "100% Proof".to_string();
        let bib = format_bibtex(&meta);
        assert!(bib.contains("  author = {{R\\&D Group}},\n"));
        assert!(bib.contains("  title = {100\\% Proof},\n"));
    }
}
