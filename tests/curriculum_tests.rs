use courseline_tool::persistence::UnitRow;
use courseline_tool::{Curriculum, CurriculumCatalog, Unit};

fn unit_row(curriculum_id: &str, sequence: u32, code: &str) -> UnitRow {
    UnitRow {
        curriculum_id: curriculum_id.to_string(),
        curriculum_name: format!("{curriculum_id} name"),
        level_id: "LV1".to_string(),
        sequence,
        unit_code: code.to_string(),
        unit_label: format!("Label {code}"),
        book_full_name: format!("Book {code}"),
    }
}

fn unit(sequence: u32, code: &str) -> Unit {
    Unit {
        sequence,
        code: code.to_string(),
        label: format!("Label {code}"),
        full_name: format!("Book {code}"),
    }
}

#[test]
fn catalog_groups_rows_by_curriculum() {
    let rows = vec![
        unit_row("CUR-A", 1, "A1"),
        unit_row("CUR-B", 1, "B1"),
        unit_row("CUR-A", 2, "A2"),
    ];
    let catalog = CurriculumCatalog::from_rows(&rows);
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("CUR-A").unwrap().len(), 2);
    assert_eq!(catalog.get("CUR-B").unwrap().len(), 1);
    assert!(catalog.get("CUR-C").is_none());
}

#[test]
fn units_are_sorted_by_sequence_regardless_of_row_order() {
    let rows = vec![
        unit_row("CUR-A", 3, "A3"),
        unit_row("CUR-A", 1, "A1"),
        unit_row("CUR-A", 2, "A2"),
    ];
    let catalog = CurriculumCatalog::from_rows(&rows);
    let curriculum = catalog.get("CUR-A").unwrap();
    let codes: Vec<&str> = curriculum.units().iter().map(|u| u.code.as_str()).collect();
    assert_eq!(codes, vec!["A1", "A2", "A3"]);
}

#[test]
fn unit_at_wraps_modulo_length() {
    let curriculum = Curriculum::new(
        "CUR-A",
        "Cycle",
        "LV2",
        vec![unit(1, "U1"), unit(2, "U2"), unit(3, "U3")],
    );
    assert_eq!(curriculum.unit_at(0).unwrap().code, "U1");
    assert_eq!(curriculum.unit_at(2).unwrap().code, "U3");
    assert_eq!(curriculum.unit_at(3).unwrap().code, "U1");
    assert_eq!(curriculum.unit_at(7).unwrap().code, "U2");
}

#[test]
fn unit_at_on_empty_curriculum_is_none() {
    let curriculum = Curriculum::new("CUR-E", "Empty", "LV1", vec![]);
    assert!(curriculum.is_empty());
    assert!(curriculum.unit_at(0).is_none());
}

#[test]
fn empty_row_set_yields_empty_catalog() {
    let catalog = CurriculumCatalog::from_rows(&[]);
    assert!(catalog.is_empty());
}
