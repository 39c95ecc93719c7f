use reportal::schema::{interpret, FilterField, RawDescriptor, SchemaError};

fn descriptor(name: &str, item_type: &str) -> RawDescriptor {
    RawDescriptor {
        module_id: 10,
        item_section: "Filters".to_string(),
        item_name: name.to_string(),
        item_type: item_type.to_string(),
        item_caption: None,
        item_order: None,
        is_mandatory: false,
        is_hidden: false,
        help_lookup_key: None,
        item_max_length: None,
    }
}

fn mandatory(name: &str, item_type: &str) -> RawDescriptor {
    let mut raw = descriptor(name, item_type);
    raw.is_mandatory = true;
    raw
}

#[test]
fn test_every_descriptor_appears_in_exactly_one_field() {
    let raw = vec![
        descriptor("FromDate", "date"),
        descriptor("ToDate", "date"),
        descriptor("ClientID", "text"),
        descriptor("FromRegionID", "text"),
        descriptor("ToRegionID", "text"),
        descriptor("IncludeClosed", "checkbox"),
    ];

    let layout = interpret(&raw, 10, 1);

    let mut names: Vec<&str> = layout.descriptors().map(|d| d.name.as_str()).collect();
    names.sort_unstable();
    let mut expected: Vec<&str> = raw.iter().map(|d| d.item_name.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(names, expected);

    // Two range pairs plus two singles.
    assert_eq!(layout.len(), 4);
}

#[test]
fn test_from_to_pair_merges_regardless_of_order() {
    let raw = vec![
        descriptor("ToDate", "date"),
        descriptor("ClientID", "text"),
        descriptor("FromDate", "date"),
    ];

    let layout = interpret(&raw, 10, 1);

    assert_eq!(layout.len(), 2);
    let range = layout.field("FromDate").expect("range field");
    match range {
        FilterField::Range { from, to } => {
            assert_eq!(from.name, "FromDate");
            assert_eq!(to.name, "ToDate");
        }
        FilterField::Single(_) => panic!("expected a range pair"),
    }
}

#[test]
fn test_unpaired_from_and_to_stay_single() {
    let raw = vec![descriptor("FromDate", "date"), descriptor("ToAccount", "text")];

    let layout = interpret(&raw, 10, 1);

    assert_eq!(layout.len(), 2);
    assert!(matches!(layout.fields()[0], FilterField::Single(_)));
    assert!(matches!(layout.fields()[1], FilterField::Single(_)));
}

#[test]
fn test_mandatory_fields_sort_first_stably() {
    let raw = vec![
        descriptor("Alpha", "text"),
        mandatory("Beta", "text"),
        descriptor("Gamma", "text"),
        mandatory("Delta", "text"),
    ];

    let layout = interpret(&raw, 10, 1);

    let names: Vec<&str> = layout.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["Beta", "Delta", "Alpha", "Gamma"]);
}

#[test]
fn test_range_pair_mandatory_when_either_side_is() {
    let raw = vec![descriptor("FromDate", "date"), {
        let mut to = descriptor("ToDate", "date");
        to.is_mandatory = true;
        to
    }];

    let layout = interpret(&raw, 10, 1);
    assert!(layout.fields()[0].is_mandatory());
}

#[test]
fn test_initial_advanced_split_at_three_fields() {
    let raw = vec![
        descriptor("A", "text"),
        descriptor("B", "text"),
        descriptor("C", "text"),
        descriptor("D", "text"),
        descriptor("E", "text"),
    ];

    let layout = interpret(&raw, 10, 1);

    assert_eq!(layout.initial().len(), 3);
    assert_eq!(layout.advanced().len(), 2);
    assert!(layout.has_advanced());

    let small = interpret(&raw[..2], 10, 1);
    assert_eq!(small.initial().len(), 2);
    assert!(small.advanced().is_empty());
    assert!(!small.has_advanced());
}

#[test]
fn test_item_order_sorts_ascending_with_missing_as_zero() {
    let mut first = descriptor("Late", "text");
    first.item_order = Some(5);
    let mut second = descriptor("Early", "text");
    second.item_order = Some(1);
    let unordered = descriptor("Default", "text");

    let layout = interpret(&[first, second, unordered], 10, 1);

    let names: Vec<&str> = layout.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["Default", "Early", "Late"]);
}

#[test]
fn test_filters_other_sections_and_modules() {
    let mut display = descriptor("Total", "text");
    display.item_section = "Display".to_string();
    let mut foreign = descriptor("Other", "text");
    foreign.module_id = 99;

    let layout = interpret(&[display, foreign, descriptor("Kept", "text")], 10, 1);

    assert_eq!(layout.len(), 1);
    assert_eq!(layout.fields()[0].name(), "Kept");
}

#[test]
fn test_unknown_item_type_is_flagged_not_silently_text() {
    let raw = vec![descriptor("Good", "text"), descriptor("Weird", "slider")];

    let layout = interpret(&raw, 10, 1);

    assert_eq!(layout.len(), 1);
    assert_eq!(layout.rejected().len(), 1);
    assert!(matches!(
        &layout.rejected()[0],
        SchemaError::UnknownItemType { name, tag } if name == "Weird" && tag == "slider"
    ));
}

#[test]
fn test_summary_stripped_reports_drop_summary_and_hidden() {
    let mut hidden = descriptor("Plumbing", "text");
    hidden.is_hidden = true;
    let raw = vec![
        descriptor("ISSUMMARY", "checkbox"),
        hidden,
        descriptor("ClientID", "text"),
    ];

    let stripped = interpret(&raw, 10, 1203);
    assert_eq!(stripped.len(), 1);
    assert_eq!(stripped.fields()[0].name(), "ClientID");

    // Other reports keep both; the override is an explicit exception.
    let ordinary = interpret(&raw, 10, 55);
    assert_eq!(ordinary.len(), 3);
}

#[test]
fn test_empty_descriptor_list_yields_empty_layout() {
    let layout = interpret(&[], 10, 1);
    assert!(layout.is_empty());
    assert!(layout.rejected().is_empty());
}
