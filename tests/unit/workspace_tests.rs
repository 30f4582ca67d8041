//! Ownership, naming and path tests for the workspace arena

use arxml::catalog::{SwBaseType, Unit};
use arxml::{ArxmlError, ElementKind, Metadata, Owner, ReferencePath, Workspace};
use regex::Regex;

fn unit() -> Unit {
    Unit {
        display_name: Some("m".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_paths_follow_containment() {
    let mut workspace = Workspace::new();
    let deep = workspace.make_packages("/A/B/C").unwrap();
    let element = workspace.create_element("Meter", unit());
    workspace.append(deep, element).unwrap();

    assert_eq!(workspace.compute_path(element).as_deref(), Some("/A/B/C/Meter"));
    assert_eq!(workspace.owner(element), Some(Owner::Package(deep)));
    assert_eq!(workspace.find("A/B/C/Meter"), Some(element));

    let reference = workspace.reference_to(element).unwrap();
    assert_eq!(reference.as_str(), "/A/B/C/Meter");
    assert_eq!(reference.dest(), Some(Unit::KIND));
    assert_eq!(workspace.resolve(&reference).unwrap(), element);
}

#[test]
fn test_floating_node_has_no_path() {
    let mut workspace = Workspace::new();
    let package = workspace.create_package("Loose");
    let element = workspace.create_element("Meter", unit());
    workspace.append(package, element).unwrap();

    // the package itself is not attached anywhere
    assert_eq!(workspace.compute_path(element), None);
    assert_eq!(workspace.reference_to(element), None);

    workspace.append_package(package).unwrap();
    assert_eq!(workspace.compute_path(element).as_deref(), Some("/Loose/Meter"));
}

#[test]
fn test_path_is_stable_until_reparented() {
    let mut workspace = Workspace::new();
    let first = workspace.make_packages("/First").unwrap();
    let second = workspace.make_packages("/Second").unwrap();
    let element = workspace.create_element("Meter", unit());
    workspace.append(first, element).unwrap();
    let before = workspace.compute_path(element);
    assert_eq!(workspace.compute_path(element), before);

    workspace.detach(element).unwrap();
    assert_eq!(workspace.compute_path(element), None);
    workspace.append(second, element).unwrap();
    assert_eq!(workspace.compute_path(element).as_deref(), Some("/Second/Meter"));
}

#[test]
fn test_sibling_names_are_unique() {
    let mut workspace = Workspace::new();
    let package = workspace.make_packages("/Units").unwrap();
    workspace
        .add_element(package, "Meter", Metadata::default(), Box::new(unit()))
        .unwrap();
    let nodes = workspace.len();

    let result = workspace.add_element(package, "Meter", Metadata::default(), Box::new(unit()));
    assert!(matches!(
        result,
        Err(ArxmlError::DuplicateName { ref name, ref container }) if name == "Meter" && container == "/Units"
    ));
    // nothing was allocated for the rejected element
    assert_eq!(workspace.len(), nodes);

    // a package and an element share one namespace
    assert!(matches!(
        workspace.make_packages_in(package, "Meter"),
        Err(ArxmlError::NotAPackage { .. })
    ));
}

#[test]
fn test_append_requires_floating_child() {
    let mut workspace = Workspace::new();
    let first = workspace.make_packages("/First").unwrap();
    let second = workspace.make_packages("/Second").unwrap();
    let element = workspace.create_element("Meter", unit());
    workspace.append(first, element).unwrap();

    assert!(matches!(
        workspace.append(second, element),
        Err(ArxmlError::AlreadyAttached { .. })
    ));
    assert_eq!(workspace.elements(first), &[element]);
}

#[test]
fn test_packages_cannot_contain_themselves() {
    let mut workspace = Workspace::new();
    let outer = workspace.make_packages("/Outer/Inner").unwrap();
    let top = workspace.find("/Outer").unwrap();
    workspace.detach(top).unwrap();

    assert!(matches!(
        workspace.append(outer, top),
        Err(ArxmlError::CyclicContainment { .. })
    ));
}

#[test]
fn test_elements_are_not_top_level() {
    let mut workspace = Workspace::new();
    let element = workspace.create_element("Meter", unit());
    assert!(matches!(
        workspace.append_package(element),
        Err(ArxmlError::InvalidChild { .. })
    ));
}

#[test]
fn test_remove_drops_subtree() {
    let mut workspace = Workspace::new();
    let inner = workspace.make_packages("/Outer/Inner").unwrap();
    let element = workspace.create_element("Meter", unit());
    workspace.append(inner, element).unwrap();
    let outer = workspace.find("/Outer").unwrap();

    workspace.remove(outer).unwrap();
    assert!(!workspace.contains(outer));
    assert!(!workspace.contains(inner));
    assert!(!workspace.contains(element));
    assert!(workspace.packages().is_empty());
    assert!(workspace.is_empty());
}

#[test]
fn test_rename_checks_siblings() {
    let mut workspace = Workspace::new();
    let package = workspace.make_packages("/Units").unwrap();
    let meter = workspace
        .add_element(package, "Meter", Metadata::default(), Box::new(unit()))
        .unwrap();
    let second = workspace
        .add_element(package, "Second", Metadata::default(), Box::new(unit()))
        .unwrap();

    assert!(workspace.rename(second, "Meter").is_err());
    workspace.rename(second, "Sec").unwrap();
    assert_eq!(workspace.find("/Units/Sec"), Some(second));
    assert_eq!(workspace.find("/Units/Second"), None);

    // unchecked rename: lookup keeps returning the first holder
    workspace.set_name(second, "Meter").unwrap();
    assert_eq!(workspace.find("/Units/Meter"), Some(meter));
    workspace.rename(meter, "Metre").unwrap();
    assert_eq!(workspace.find("/Units/Meter"), Some(second));
}

#[test]
fn test_filter_is_restartable() {
    let mut workspace = Workspace::new();
    let package = workspace.make_packages("/Units").unwrap();
    for name in ["Meter", "Second", "Kelvin"] {
        workspace
            .add_element(package, name, Metadata::default(), Box::new(unit()))
            .unwrap();
    }

    let wanted = ["Kelvin", "Meter", "Missing"];
    let found = workspace.filter(package, &wanted);
    let names: Vec<_> = found
        .clone()
        .filter_map(|id| workspace.name(id))
        .collect();
    assert_eq!(names, vec!["Meter", "Kelvin"]);
    assert_eq!(found.count(), 2);

    let pattern = Regex::new("^(Meter|Second)$").unwrap();
    assert_eq!(workspace.filter_pattern(package, &pattern).count(), 2);
}

#[test]
fn test_resolve_checks_kind() {
    let mut workspace = Workspace::new();
    let package = workspace.make_packages("/Units").unwrap();
    workspace
        .add_element(package, "Meter", Metadata::default(), Box::new(unit()))
        .unwrap();

    let wrong = ReferencePath::new("/Units/Meter", SwBaseType::KIND).unwrap();
    assert!(matches!(
        workspace.resolve(&wrong),
        Err(ArxmlError::InvalidReferenceKind { .. })
    ));
    let missing = ReferencePath::new("/Units/Foot", Unit::KIND).unwrap();
    assert!(matches!(
        workspace.resolve(&missing),
        Err(ArxmlError::UnresolvedReference { .. })
    ));
}

#[test]
fn test_typed_payload_access() {
    let mut workspace = Workspace::new();
    let package = workspace.make_packages("/Units").unwrap();
    let meter = workspace
        .add_element(package, "Meter", Metadata::default(), Box::new(unit()))
        .unwrap();

    assert!(workspace.element::<SwBaseType>(meter).is_none());
    workspace.element_mut::<Unit>(meter).unwrap().factor_si_to_unit = Some(1.0);
    assert_eq!(
        workspace.element::<Unit>(meter).unwrap().factor_si_to_unit,
        Some(1.0)
    );
    assert!(workspace.element_dyn(package).is_none());
}

#[test]
fn test_package_map_roles() {
    let mut workspace = Workspace::new();
    workspace.set_package_map(
        [("units".to_string(), "/Catalog/Units".to_string())]
            .into_iter()
            .collect(),
    );

    let units = workspace.package_for("units").unwrap();
    assert_eq!(workspace.compute_path(units).as_deref(), Some("/Catalog/Units"));
    assert_eq!(workspace.package_for("units").unwrap(), units);

    workspace
        .add_element(units, "Meter", Metadata::default(), Box::new(unit()))
        .unwrap();
    assert!(workspace.find_element("units", "Meter").is_some());
    assert!(workspace.find_element("types", "Meter").is_none());
    assert!(matches!(
        workspace.package_for("types"),
        Err(ArxmlError::Config(_))
    ));
}
