//! Marker and modifier integration tests

mod common;

use common::fixtures::{article, einstein, THREE_AUTHORS};
use impress_citekey::{expand, BibEntry, CiteKeyGenerator, EntryType, KeyGeneratorConfig};
use rstest::rstest;

fn raw(pattern: &str, entry: &BibEntry) -> String {
    expand(pattern, entry, None, ',')
}

/// Expanded and legalized, without duplicate handling
fn key(pattern: &str, entry: &BibEntry) -> String {
    CiteKeyGenerator::new(KeyGeneratorConfig::default().with_default_pattern(pattern))
        .unwrap()
        .raw_key(entry)
}

// === Author Markers ===

#[rstest]
#[case("auth", "Newton")]
#[case("authForeIni", "I")]
#[case("authors", "NewtonMaxwellEinstein")]
#[case("authors2", "NewtonMaxwellEtAl")]
#[case("authorLast", "Einstein")]
#[case("authorLastForeIni", "A")]
#[case("authorIni", "NewtoME")]
#[case("authorsAlpha", "NME")]
#[case("auth.auth.ea", "Newton.Maxwell.ea")]
#[case("auth.etal", "Newton.etal")]
#[case("authEtAl", "NewtonEtAl")]
#[case("authshort", "NME")]
#[case("authIni4", "NeME")]
#[case("auth3", "New")]
#[case("auth3_2", "Max")]
#[case("auth3_4", "")]
#[case("author", THREE_AUTHORS)]
fn test_author_markers(#[case] marker: &str, #[case] expected: &str) {
    let entry = article(&[("author", THREE_AUTHORS)]);
    assert_eq!(raw(&format!("[{}]", marker), &entry), expected, "marker: {}", marker);
}

#[rstest]
#[case("edtr", "Newton")]
#[case("edtrForeIni", "I")]
#[case("editors", "NewtonMaxwellEinstein")]
#[case("editorLast", "Einstein")]
#[case("editorIni", "NewtoME")]
#[case("edtr.edtr.ea", "Newton.Maxwell.ea")]
#[case("edtrshort", "NME")]
#[case("edtrIni2", "NM")]
#[case("edtr3_2", "Max")]
#[case("edtr4", "Newt")]
fn test_editor_markers(#[case] marker: &str, #[case] expected: &str) {
    let entry = BibEntry::new(EntryType::Book).with_field("editor", THREE_AUTHORS);
    assert_eq!(raw(&format!("[{}]", marker), &entry), expected, "marker: {}", marker);
}

#[rstest]
#[case("Newton and Maxwell and Einstein and Bohr", 4, "NMEB")]
#[case("Newton and Maxwell", 4, "NeMa")]
#[case("Newton", 4, "Newt")]
#[case("Aachen and others", 4, "Aac+")]
fn test_auth_ini_n(#[case] authors: &str, #[case] n: usize, #[case] expected: &str) {
    let entry = article(&[("author", authors)]);
    assert_eq!(raw(&format!("[authIni{}]", n), &entry), expected);
}

#[test]
fn test_author_falls_back_to_editor() {
    let entry = BibEntry::new(EntryType::Book).with_field("editor", "Isaac Newton");
    assert_eq!(raw("[auth]", &entry), "Newton");
    assert_eq!(raw("[pureauth]", &entry), "");
}

#[test]
fn test_institution_author() {
    let entry = article(&[("author", "{Massachusetts Institute of Technology}"), ("year", "2020")]);
    assert_eq!(key("[auth][year]", &entry), "MIT2020");
}

#[test]
fn test_latex_in_names_is_transliterated() {
    let entry = article(&[("author", r#"Johann K{\"o}ning"#)]);
    assert_eq!(raw("[auth3]", &entry), "Koe");
    assert_eq!(key("[auth]", &entry), "Koening");
}

// === Title Markers ===

#[rstest]
#[case("title", "Cloud Computing: the Next Revolution in IT")]
#[case("fulltitle", "Cloud Computing: The Next Revolution in IT")]
#[case("shorttitle", "Cloud Computing: Next")]
#[case("veryshorttitle", "Cloud")]
#[case("shorttitleINI", "CCT")]
#[case("camel", "CloudComputingTheNextRevolutionInIT")]
#[case("camel2", "CloudComputing")]
fn test_title_markers(#[case] marker: &str, #[case] expected: &str) {
    let entry = article(&[("title", "Cloud Computing: The Next Revolution in IT")]);
    assert_eq!(raw(&format!("[{}]", marker), &entry), expected, "marker: {}", marker);
}

const OPEN_SOURCE_TITLE: &str = "Open Source Software and the \"Private-Collective\" \
                                 Innovation Model: Issues for Organization Science";

#[rstest]
#[case("[camel1]", "Open")]
#[case("[camel4]", "OpenSourceSoftwareAnd")]
#[case("[camel10]", "OpenSourceSoftwareAndThePrivateCollectiveInnovationModelIssues")]
#[case("[veryshorttitle]", "Open")]
fn test_camel_n_marker(#[case] pattern: &str, #[case] expected: &str) {
    let entry = article(&[("title", OPEN_SOURCE_TITLE)]);
    assert_eq!(raw(pattern, &entry), expected, "pattern: {}", pattern);
}

#[rstest]
#[case("Camel Title Formatter", "[title:camel]", "CamelTitleFormatter")]
#[case("CAMEL TITLE FORMATTER", "[title:camel]", "CamelTitleFormatter")]
#[case("cAMEL tITLE fORMATTER", "[title:camel]", "CamelTitleFormatter")]
#[case("c", "[title:camel]", "C")]
#[case(
    "Open Source Software And The Private Collective Innovation Model Issues",
    "[title:camel4]",
    "OpenSourceSoftwareAnd"
)]
#[case("A very short title", "[title:shorttitle]", "Very Short Title")]
#[case("Short title", "[title:shorttitle]", "Short Title")]
#[case("A Title", "[title:shorttitle]", "Title")]
#[case("A very short title", "[title:veryshorttitle]", "Very")]
#[case("A v", "[title:veryshorttitle]", "V")]
#[case("A very short title", "[veryshorttitle]", "Very")]
fn test_title_modifiers(#[case] title: &str, #[case] pattern: &str, #[case] expected: &str) {
    let entry = BibEntry::default().with_field("title", title);
    assert_eq!(raw(pattern, &entry), expected, "pattern: {}", pattern);
}

#[test]
fn test_unprotect_terms_modifier() {
    let entry = article(&[("journal", "{ACS} Medicinal Chemistry Letters")]);
    assert_eq!(raw("[JOURNAL:unprotect_terms]", &entry), "ACS Medicinal Chemistry Letters");
}

// === Page and Year Markers ===

#[rstest]
#[case("7--27", "7", "27", "")]
#[case("--27", "27", "27", "--")]
#[case("41,7,73--97", "7", "97", "")]
#[case("43+", "43", "43", "")]
#[case("L--27", "27", "27", "L--")]
fn test_page_markers(
    #[case] pages: &str,
    #[case] first: &str,
    #[case] last: &str,
    #[case] prefix: &str,
) {
    let entry = article(&[("pages", pages)]);
    assert_eq!(raw("[firstpage]", &entry), first);
    assert_eq!(raw("[lastpage]", &entry), last);
    assert_eq!(raw("[pageprefix]", &entry), prefix);
}

#[rstest]
#[case("2019", "19")]
#[case("in press", "IP")]
#[case("submitted", "IP")]
#[case("", "")]
fn test_shortyear(#[case] year: &str, #[case] expected: &str) {
    assert_eq!(raw("[shortyear]", &article(&[("year", year)])), expected);
}

#[test]
fn test_year_from_date() {
    let entry = article(&[("author", "Jane Doe"), ("date", "2020-03-14")]);
    assert_eq!(raw("[auth][year]-[month]", &entry), "Doe2020-3");
}

// === Keyword Markers ===

#[rstest]
#[case("keyword1", "w1")]
#[case("keyword2", "w2a w2b")]
#[case("keyword9", "")]
#[case("keywords", "w1w2aw2bw3")]
#[case("keywords2", "w1w2aw2b")]
fn test_keyword_markers(#[case] marker: &str, #[case] expected: &str) {
    let entry = article(&[("keywords", "w1, w2a w2b, w3")]);
    assert_eq!(raw(&format!("[{}]", marker), &entry), expected);
}

// === Modifiers ===

#[rstest]
#[case("[auth:lower]", "einstein")]
#[case("[auth:upper]", "EINSTEIN")]
#[case("[auth:truncate3]", "Ein")]
#[case("[auth:upper:truncate3]", "EIN")]
#[case("[journal:(nojournal)]", "nojournal")]
#[case("[journal:()]", "")]
#[case("[journal:(auth[year])]", "auth1905")]
#[case("[auth:(unused)]", "Einstein")]
#[case("[auth:nonsense]", "Einstein")]
fn test_modifiers(#[case] pattern: &str, #[case] expected: &str) {
    assert_eq!(raw(pattern, &einstein()), expected, "pattern: {}", pattern);
}

#[test]
fn test_chained_modifiers_on_full_key() {
    let entry = article(&[
        ("author", "Isaac Newton"),
        ("year", "2019"),
        ("title", "the InTeresting title longer than THREE words"),
    ]);
    assert_eq!(
        key("[auth:upper][year][shorttitle:capitalize]", &entry),
        "NEWTON2019InterestingTitleLonger"
    );
}

#[test]
fn test_abbr_modifier() {
    let entry = article(&[("title", "Process Viewing Patterns")]);
    assert_eq!(raw("[title:abbr]", &entry), "PVP");
}

// === Pattern Syntax ===

#[test]
fn test_literals_and_escapes() {
    let entry = article(&[
        ("author", "Kitsune"),
        ("year", "2017"),
        ("pages", "213--216"),
    ])
    .with_type(EntryType::Misc);
    assert_eq!(raw("[year]_[auth]_[firstpage]", &entry), "2017_Kitsune_213");
    assert_eq!(raw("[entrytype:lower]", &entry), "misc");
    assert_eq!(raw(r"\[[year]\]", &entry), "[2017]");
}

#[test]
fn test_missing_fields_leave_literals() {
    assert_eq!(raw("[author] - [year]", &BibEntry::default()), " - ");
}

#[test]
fn test_unclosed_bracket_does_not_panic() {
    assert_eq!(raw("[auth", &einstein()), "Einstein");
}

#[test]
fn test_unknown_marker_reads_field() {
    let entry = einstein().with_field("doi", "10.1000/xyz");
    assert_eq!(raw("[doi]", &entry), "10.1000/xyz");
    assert_eq!(raw("[DOI]", &entry), "10.1000/xyz");
}
