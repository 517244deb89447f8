//! Stack catalog queries against the built-in table and custom catalogs

use deploy_center::stack::{Os, StackCatalog, StackFilter, WebAppStack};
use std::fs;
use tempfile::TempDir;

fn builtin() -> StackCatalog {
    StackCatalog::builtin().expect("built-in catalog should parse")
}

fn values(stacks: &[WebAppStack]) -> Vec<&str> {
    stacks.iter().map(|s| s.value.as_str()).collect()
}

fn find<'a>(stacks: &'a [WebAppStack], value: &str) -> &'a WebAppStack {
    stacks
        .iter()
        .find(|s| s.value == value)
        .unwrap_or_else(|| panic!("stack {} missing", value))
}

fn minor_values(stack: &WebAppStack) -> Vec<&str> {
    stack
        .major_versions
        .iter()
        .flat_map(|major| major.minor_versions.iter())
        .map(|minor| minor.value.as_str())
        .collect()
}

#[test]
fn test_builtin_order() {
    let stacks = builtin().stacks(&StackFilter::default());
    assert_eq!(
        values(&stacks),
        vec![
            "aspnet",
            "node",
            "python",
            "php",
            "dotnetcore",
            "ruby",
            "java",
            "javacontainers"
        ]
    );
}

#[test]
fn test_remove_hidden_applies_at_every_level() {
    let stacks = builtin().stacks(&StackFilter {
        remove_hidden: true,
        ..Default::default()
    });
    assert_eq!(stacks.len(), 8);

    // hidden Linux-only minor disappears
    let node = find(&stacks, "node");
    assert!(!minor_values(node).contains(&"12.9"));
    assert_eq!(node.minor_version_count(), 5);

    // hidden on both OSes empties the minor, then the major
    let php = find(&stacks, "php");
    assert_eq!(php.major_versions.len(), 1);
    assert_eq!(php.major_versions[0].value, "7");

    let dotnet = find(&stacks, "dotnetcore");
    assert!(dotnet.major_versions.iter().all(|m| m.value != "6"));

    let containers = find(&stacks, "javacontainers");
    assert!(containers.major_versions.iter().all(|m| m.value != "jbosseap"));
}

#[test]
fn test_stack_id_filter() {
    let stacks = builtin().stacks(&StackFilter::for_stack("python"));
    assert_eq!(values(&stacks), vec!["python"]);
    assert_eq!(stacks[0], *builtin().get("python").unwrap());

    assert!(builtin().stacks(&StackFilter::for_stack("cobol")).is_empty());
}

#[test]
fn test_os_filter() {
    let windows = builtin().stacks(&StackFilter::for_os(Os::Windows));
    assert!(!values(&windows).contains(&"ruby"));
    assert_eq!(windows.len(), 7);

    for stack in &windows {
        for major in &stack.major_versions {
            for minor in &major.minor_versions {
                assert!(minor.stack_settings.linux_runtime_settings.is_none());
                assert!(minor.stack_settings.windows_runtime_settings.is_some());
            }
        }
    }

    let linux = builtin().stacks(&StackFilter::for_os(Os::Linux));
    assert!(!values(&linux).contains(&"aspnet"));
    assert_eq!(linux.len(), 7);
}

#[test]
fn test_filters_compose() {
    let stacks = builtin().stacks(&StackFilter {
        os: Some(Os::Linux),
        stack_id: Some("java".to_string()),
        remove_deprecated: true,
        ..Default::default()
    });

    assert_eq!(values(&stacks), vec!["java"]);
    assert_eq!(minor_values(&stacks[0]), vec!["11.0", "8.0"]);
    assert_eq!(
        stacks[0].major_versions[0].minor_versions[0]
            .stack_settings
            .linux_runtime_settings
            .as_ref()
            .map(|s| s.runtime_version.as_str()),
        Some("JAVA|11-java11")
    );
}

#[test]
fn test_remove_every_flag() {
    let stacks = builtin().stacks(&StackFilter {
        remove_hidden: true,
        remove_deprecated: true,
        remove_preview: true,
        ..Default::default()
    });

    for stack in &stacks {
        for major in &stack.major_versions {
            for minor in &major.minor_versions {
                for os in Os::all_variants() {
                    if let Some(settings) = minor.stack_settings.for_os(*os) {
                        assert!(!settings.is_hidden && !settings.is_deprecated && !settings.is_preview);
                    }
                }
            }
        }
    }

    let node = find(&stacks, "node");
    assert_eq!(minor_values(node), vec!["14-lts", "12-lts"]);
    assert_eq!(node.github_action_version(Os::Linux), Some("14.x"));
}

#[test]
fn test_github_action_versions() {
    let catalog = builtin();
    assert_eq!(
        catalog.get("node").unwrap().github_action_version(Os::Linux),
        Some("16.x")
    );
    assert_eq!(
        catalog.get("dotnetcore").unwrap().github_action_version(Os::Windows),
        Some("6.0.x")
    );
    assert_eq!(
        catalog.get("php").unwrap().github_action_version(Os::Linux),
        None
    );
    assert_eq!(
        catalog.get("ruby").unwrap().github_action_version(Os::Windows),
        None
    );
}

#[test]
fn test_results_are_independent_copies() {
    let catalog = builtin();
    let filter = StackFilter::default();

    let mut first = catalog.stacks(&filter);
    first[0].display_text = "changed".to_string();
    first[0].major_versions.clear();
    first.truncate(1);

    let second = catalog.stacks(&filter);
    assert_eq!(second.len(), 8);
    assert_ne!(second[0].display_text, "changed");
    assert!(!second[0].major_versions.is_empty());
}

const CUSTOM: &str = r#"[
  {
    "displayText": "Legacy",
    "value": "legacy",
    "preferredOs": "linux",
    "isHidden": true,
    "isDeprecated": true,
    "majorVersions": [
      {
        "displayText": "Legacy 1",
        "value": "1",
        "minorVersions": [
          {
            "displayText": "Legacy 1.0",
            "value": "1.0",
            "stackSettings": {
              "linuxRuntimeSettings": { "runtimeVersion": "LEGACY|1.0" }
            }
          }
        ]
      }
    ]
  },
  {
    "displayText": "Next",
    "value": "next",
    "preferredOs": "windows",
    "isPreview": true,
    "majorVersions": [
      {
        "displayText": "Next 1",
        "value": "1",
        "minorVersions": [
          {
            "displayText": "Next 1.0",
            "value": "1.0",
            "stackSettings": {
              "windowsRuntimeSettings": {
                "runtimeVersion": "1.0",
                "gitHubActionSettings": { "isSupported": true, "supportedVersion": "1.x" }
              }
            }
          }
        ]
      }
    ]
  }
]"#;

#[test]
fn test_stack_level_flags() {
    let catalog = StackCatalog::from_json(CUSTOM).unwrap();

    let visible = catalog.stacks(&StackFilter {
        remove_hidden: true,
        ..Default::default()
    });
    assert_eq!(values(&visible), vec!["next"]);

    let stable = catalog.stacks(&StackFilter {
        remove_preview: true,
        ..Default::default()
    });
    assert_eq!(values(&stable), vec!["legacy"]);

    let neither = catalog.stacks(&StackFilter {
        remove_deprecated: true,
        remove_preview: true,
        ..Default::default()
    });
    assert!(neither.is_empty());
}

#[test]
fn test_catalog_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stacks.json");
    fs::write(&path, CUSTOM).unwrap();

    let catalog = StackCatalog::from_file(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.get("next").unwrap().github_action_version(Os::Windows),
        Some("1.x")
    );
    assert!(catalog.stacks(&StackFilter::for_os(Os::Windows)).len() == 1);
}

#[test]
fn test_catalog_rejects_unknown_os() {
    let json = CUSTOM.replace("\"preferredOs\": \"linux\"", "\"preferredOs\": \"beos\"");
    assert!(StackCatalog::from_json(&json).is_err());
}
