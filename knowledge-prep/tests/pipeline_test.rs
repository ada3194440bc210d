//! # Preparation Pipeline Tests
//!
//! Runs HTML → JSON → context files on a temporary folder and checks the
//! result can be served by the context loader.

use hmo_intake::{ContextSource, FileContextLoader, Hmo, MembershipTier};
use knowledge_prep::{convert_dir, generate_all, load_pages};

const OPTOMETRY_PAGE: &str = r#"<html><body>
<h2>שירותי אופטומטריה</h2>
<p>בדיקות ראייה ומשקפיים.</p>
<p>קופות החולים "מכבי", "מאוחדת" ו"כללית" מעניקות הטבות.</p>
<ul><li>בדיקת ראייה: בדיקה מקיפה אצל אופטומטריסט</li></ul>
<table>
  <tr><th>שירות</th><th>מכבי</th><th>מאוחדת</th><th>כללית</th></tr>
  <tr>
    <td>בדיקת ראייה</td>
    <td><strong>זהב:</strong> חינם<br><strong>כסף:</strong> 30 ₪</td>
    <td><strong>זהב:</strong> 20 ₪</td>
    <td><strong>ארד:</strong> 60 ₪</td>
  </tr>
</table>
<h3>מספרי טלפון</h3>
<ul><li>מאוחדת: *3833</li></ul>
</body></html>"#;

#[tokio::test]
async fn test_full_pipeline_produces_loadable_contexts() {
    // Arrange
    let root = tempfile::tempdir().unwrap();
    let html_dir = root.path().join("html");
    let json_dir = root.path().join("json");
    let out_dir = root.path().join("contexts");
    std::fs::create_dir_all(&html_dir).unwrap();
    std::fs::write(html_dir.join("optometry_services.html"), OPTOMETRY_PAGE).unwrap();
    std::fs::write(html_dir.join("README.txt"), "not a page").unwrap();

    // Act
    let json_files = convert_dir(&html_dir, &json_dir).unwrap();
    let context_files = generate_all(&json_dir, &out_dir).unwrap();

    // Assert
    assert_eq!(json_files, vec![json_dir.join("optometry_services.json")]);
    assert_eq!(context_files.len(), 9);

    let pages = load_pages(&json_dir).unwrap();
    assert_eq!(pages[0].0, "optometry_services");
    assert_eq!(pages[0].1.title, "שירותי אופטומטריה");

    let loader = FileContextLoader::new(&out_dir);
    assert_eq!(loader.available().await.len(), 9);

    let meuhedet_gold = loader
        .load(Hmo::Meuhedet, MembershipTier::Gold)
        .await
        .unwrap();
    assert!(meuhedet_gold.contains("הטבות: 20 ₪"));
    assert!(meuhedet_gold.contains(r#"קופת החולים "מאוחדת" מעניקות הטבות."#));
    assert!(meuhedet_gold.contains("מאוחדת: *3833"));

    let clalit_gold = loader
        .load(Hmo::Clalit, MembershipTier::Gold)
        .await
        .unwrap();
    assert!(clalit_gold.contains("הטבות: לא זמין"));
}

#[test]
fn test_missing_input_folder_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let err = convert_dir(&root.path().join("missing"), &root.path().join("out")).unwrap_err();
    assert!(err.to_string().contains("missing"));
}
