use pretty_assertions::assert_eq;
use shelfwise_catalog::{
    BookRecord, CatalogError, GET_SUMMARY_BY_TITLE, SummaryCatalog, SummaryTool, load_records,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_load_records_trims_and_skips_blanks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("books.json");
    tokio::fs::write(
        &path,
        r#"[
            {"title": "  Dune ", "summary": "Spice.\n"},
            {"title": "", "summary": "orphan summary"},
            {"title": "Emma", "summary": "   "},
            {"title": "1984", "summary": "Big Brother."}
        ]"#,
    )
    .await
    .unwrap();

    let records = load_records(&path).await.unwrap();
    assert_eq!(
        records,
        vec![
            BookRecord::new("Dune", "Spice."),
            BookRecord::new("1984", "Big Brother."),
        ]
    );
}

#[tokio::test]
async fn test_load_records_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        load_records(&missing).await,
        Err(CatalogError::Read { .. })
    ));

    let malformed = dir.path().join("malformed.json");
    tokio::fs::write(&malformed, "{\"title\": \"Dune\"}").await.unwrap();
    assert!(matches!(
        load_records(&malformed).await,
        Err(CatalogError::Parse { .. })
    ));

    let blank = dir.path().join("blank.json");
    tokio::fs::write(&blank, r#"[{"title": " ", "summary": " "}]"#)
        .await
        .unwrap();
    assert!(matches!(
        load_records(&blank).await,
        Err(CatalogError::NoRecords(_))
    ));
}

#[tokio::test]
async fn test_loaded_records_answer_tool_calls() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("books.json");
    tokio::fs::write(
        &path,
        r#"[{"title": "The Name of the Wind", "summary": "Kvothe tells his story."}]"#,
    )
    .await
    .unwrap();

    let records = load_records(&path).await.unwrap();
    let tool = SummaryTool::new(SummaryCatalog::from_records(&records));

    assert_eq!(
        tool.call(GET_SUMMARY_BY_TITLE, r#"{"title": "the name of the wind"}"#),
        "Kvothe tells his story."
    );
}
