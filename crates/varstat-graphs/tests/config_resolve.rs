use std::fs;

use varstat_core::{Catalog, Field, FieldOption, FieldType};
use varstat_graphs::{slug, ProjectConfig};

const CONFIG: &str = r#"
visit: visit
slug: cohort
charts:
  - chart: age
    title: Age at Visit
  - chart: gender
    title: Gender
webservers:
  - name: Staging
    url: file:///srv/staging
  - name: Production
    url: https://example.org
  - name: Production Mirror
    url: /srv/mirror
"#;

fn catalog() -> Catalog {
    Catalog::new(vec![
        Field::new("visit", "Visit", FieldType::Choices)
            .with_options(vec![FieldOption::new("1", "Baseline")]),
        Field::new("age", "Age", FieldType::Numeric),
        Field::new("gender", "Gender", FieldType::Choices),
    ])
}

fn load() -> ProjectConfig {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join(".varstat.yml");
    fs::write(&path, CONFIG).expect("write config");
    ProjectConfig::load(&path).expect("load config")
}

#[test]
fn histogram_comparison_comes_first() {
    let config = load();
    let titles: Vec<String> = config.comparisons().into_iter().map(|c| c.title).collect();
    assert_eq!(titles, vec!["Histogram", "Age at Visit", "Gender"]);

    let catalog = catalog();
    let resolved = config.resolve(&catalog).expect("resolve");
    assert_eq!(resolved.stratification.id, "visit");
    let slugs: Vec<&str> = resolved.entries.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["histogram", "age-at-visit", "gender"]);
    assert!(resolved.entries[0].histogram);
    assert!(!resolved.entries[1].histogram);
}

#[test]
fn slugs_lowercase_and_hyphenate() {
    assert_eq!(slug("Histogram"), "histogram");
    assert_eq!(slug("Body Mass Index"), "body-mass-index");
}

#[test]
fn webservers_match_by_unique_prefix() {
    let config = load();
    assert_eq!(config.webserver("stag").expect("staging").name, "Staging");
    assert_eq!(
        config.webserver("PRODUCTION M").expect("mirror").url,
        "/srv/mirror"
    );

    let ambiguous = config.webserver("prod").expect_err("two matches");
    assert_eq!(ambiguous.info().code, "config.webserver_ambiguous");
    let unmatched = config.webserver("qa").expect_err("no match");
    assert_eq!(unmatched.info().code, "config.webserver_unmatched");
}

#[test]
fn unreadable_config_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = ProjectConfig::load(&dir.path().join(".varstat.yml")).expect_err("missing file");
    assert!(err.is_fatal());
    assert_eq!(err.info().code, "config.read");
}
