//! Soft uniqueness inside owned lists

use arxml::catalog::SenderReceiverInterface;
use arxml::model::{Named, plan_unique_name, unique_name};

fn names(interface: &SenderReceiverInterface) -> Vec<&str> {
    interface.data_elements.iter().map(Named::name).collect()
}

#[test]
fn test_repeated_base_sequence() {
    let mut interface = SenderReceiverInterface::default();
    assert_eq!(interface.add_data_element("X", None), "X");
    assert_eq!(interface.add_data_element("X", None), "X_1");
    assert_eq!(names(&interface), vec!["X_0", "X_1"]);
    assert_eq!(interface.add_data_element("X", None), "X_2");
    assert_eq!(names(&interface), vec!["X_0", "X_1", "X_2"]);
}

#[test]
fn test_unrelated_names_are_ignored() {
    let mut items = vec!["Xa".to_string(), "X_b".to_string(), "Y_3".to_string()];
    assert_eq!(unique_name(&mut items, "X"), "X");
    assert_eq!(items, vec!["Xa", "X_b", "Y_3"]);
}

#[test]
fn test_numbered_items_without_exact_match() {
    let mut items = vec!["X_4".to_string(), "X_2".to_string()];
    assert_eq!(unique_name(&mut items, "X"), "X_5");
    assert_eq!(items, vec!["X_4", "X_2"]);
}

#[test]
fn test_plan_leaves_items_untouched() {
    let items = vec!["X".to_string()];
    let plan = plan_unique_name(&items, "X");
    assert_eq!(plan.name, "X_1");
    assert_eq!(plan.rename, Some((0, "X_0".to_string())));
    assert_eq!(items, vec!["X"]);

    let mut items = items;
    assert_eq!(plan.apply(&mut items), "X_1");
    assert_eq!(items, vec!["X_0"]);
}
