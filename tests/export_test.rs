use anyhow::Result;
use robotevents_cli::render::{export_csv, Renderer, Shape, MAX_ROWS};
use serde_json::{json, Value};
use tempfile::TempDir;

fn matches_page(count: usize) -> Value {
    let rows: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Q{i}"),
                "alliances": [{"color": "red"}, {"color": "blue"}],
                "scored": i % 2 == 0
            })
        })
        .collect();
    json!({"data": rows})
}

#[test]
fn large_table_is_capped_but_csv_is_complete() -> Result<()> {
    let value = matches_page(45);

    let mut out = Vec::new();
    let shape = Renderer::plain(120).render(&mut out, "Team Matches", &value)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("(Showing 20 of 45 results)"));
    assert!(text.contains("│ Q20 "));
    assert!(!text.contains("│ Q21 "));

    let rows = match shape {
        Shape::Table(rows) => rows,
        other => panic!("expected a table, got {other:?}"),
    };
    assert!(rows.len() > MAX_ROWS);

    let dir = TempDir::new()?;
    let path = dir.path().join("team_matches.csv");
    let written = export_csv(rows, &path)?;
    assert_eq!(written, 45);

    let mut reader = csv::Reader::from_path(&path)?;
    let headers = reader.headers()?.clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["id", "name", "alliances", "scored"]);

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 45);
    assert_eq!(&records[44][1], "Q45");
    assert_eq!(&records[0][2], r#"[{"color":"red"},{"color":"blue"}]"#);
    assert_eq!(&records[1][3], "true");
    Ok(())
}

#[test]
fn table_of_exactly_twenty_has_no_notice() -> Result<()> {
    let mut out = Vec::new();
    Renderer::plain(120).render(&mut out, "Team Matches", &matches_page(MAX_ROWS))?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("│ Q20 "));
    assert!(!text.contains("Showing"));
    Ok(())
}

#[test]
fn export_into_missing_directory_fails() {
    let value = matches_page(1);
    let rows = value["data"].as_array().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    assert!(export_csv(rows, &path).is_err());
}
